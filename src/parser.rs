use nom::{
    branch::alt,
    bytes::complete::{is_a, tag, take_till1},
    character::complete::{digit1, space1},
    combinator::{all_consuming, eof, map_res, peek},
    multi::many0,
    sequence::{preceded, terminated, tuple},
    IResult,
};
use thiserror::Error;

use crate::ast::{Command::*, *};
use crate::error::{SemanticError, SyntaxError};

/// Internal labels start with this; user symbols may not.
pub const RESERVED_PREFIX: &str = "__";

/// Largest value an A-instruction can load.
pub const MAX_LITERAL: u16 = 32767;

/// Largest `call` argument count; the frame words are added to it.
pub const MAX_CALL_ARGS: u16 = MAX_LITERAL - 5;

const SYMBOL_CHARS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_.$:0123456789";

/// Why a single line failed to classify.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Semantic(#[from] SemanticError),
}

fn integer(input: &str) -> IResult<&str, u16> {
    map_res(digit1, |c: &str| c.parse())(input)
}

#[test]
fn test_integer() {
    assert_eq!(integer("32767"), Ok(("", 32767)));
    assert!(integer("70000").is_err());
    assert!(integer("x1").is_err());
}

fn prim(input: &str) -> IResult<&str, ArithOp> {
    map_res(
        alt((
            tag("add"),
            tag("sub"),
            tag("neg"),
            tag("eq"),
            tag("gt"),
            tag("lt"),
            tag("and"),
            tag("or"),
            tag("not"),
        )),
        |prim: &str| prim.parse::<ArithOp>(),
    )(input)
}

#[test]
fn test_prim() {
    assert_eq!(prim("neg"), Ok(("", ArithOp::Neg)));
    assert!(all_consuming(prim)("adds").is_err());
}

fn keyword(input: &str) -> IResult<&str, &str> {
    terminated(
        alt((
            tag("push"),
            tag("pop"),
            tag("label"),
            tag("goto"),
            tag("if-goto"),
            tag("function"),
            tag("call"),
            tag("return"),
        )),
        peek(alt((space1, eof))),
    )(input)
}

fn argument(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace())(input)
}

/// A keyword followed by its whitespace separated arguments.
fn keyword_line(input: &str) -> IResult<&str, (&str, Vec<&str>)> {
    all_consuming(tuple((keyword, many0(preceded(space1, argument)))))(input)
}

#[test]
fn test_keyword_line() {
    assert_eq!(
        keyword_line("push  pointer  1"),
        Ok(("", ("push", vec!["pointer", "1"])))
    );
    assert_eq!(keyword_line("return"), Ok(("", ("return", vec![]))));
    assert!(keyword_line("pushy constant 1").is_err());
}

fn number(text: &str) -> Result<u16, SyntaxError> {
    all_consuming(integer)(text)
        .map(|(_, n)| n)
        .map_err(|_| SyntaxError::InvalidNumber(text.to_string()))
}

fn symbol_chars(input: &str) -> IResult<&str, &str> {
    is_a(SYMBOL_CHARS)(input)
}

#[test]
fn test_symbol_chars() {
    assert_eq!(symbol_chars("Main.fib$x:1"), Ok(("", "Main.fib$x:1")));
    assert_eq!(symbol_chars("LOOP(1)"), Ok(("(1)", "LOOP")));
}

/// Check a name against the assembler's symbol rules.
pub fn validate_symbol(text: &str) -> Result<(), SemanticError> {
    if all_consuming(symbol_chars)(text).is_err() {
        return Err(SemanticError::InvalidSymbol(text.to_string()));
    }
    if text.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(SemanticError::LabelStartsWithDigit(text.to_string()));
    }
    if text.starts_with(RESERVED_PREFIX) {
        return Err(SemanticError::ReservedLabel(text.to_string()));
    }
    Ok(())
}

fn symbol(text: &str) -> Result<String, SemanticError> {
    validate_symbol(text)?;
    Ok(text.to_string())
}

fn segment_access(seg: &str, index: &str) -> Result<(Segment, u16), ClassifyError> {
    let segment: Segment = seg.parse()?;
    let index = number(index)?;
    if segment == Segment::Constant && index > MAX_LITERAL {
        return Err(SemanticError::ConstantOutOfRange { value: index, max: MAX_LITERAL }.into());
    }
    if let Some(max) = segment.max_index() {
        if index > max {
            return Err(SemanticError::IndexOutOfRange { segment, index, max }.into());
        }
    }
    Ok((segment, index))
}

fn expect_args(keyword: &'static str, args: &[&str], expected: usize) -> Result<(), SyntaxError> {
    if args.len() != expected {
        return Err(SyntaxError::WrongArgumentCount {
            keyword,
            expected,
            found: args.len(),
        });
    }
    Ok(())
}

/// Classify one stripped, non-empty line.
pub fn classify(line: &str) -> Result<Command, ClassifyError> {
    if let Ok((_, op)) = all_consuming(prim)(line) {
        return Ok(Arithmetic(op));
    }

    let (_, (word, args)) =
        keyword_line(line).map_err(|_| SyntaxError::UnknownCommand(line.to_string()))?;

    let command = match word {
        "push" | "pop" => {
            let keyword = if word == "push" { "push" } else { "pop" };
            expect_args(keyword, &args, 2)?;
            let (segment, index) = segment_access(args[0], args[1])?;
            if keyword == "push" {
                Push(segment, index)
            } else if segment == Segment::Constant {
                return Err(SemanticError::PopConstant.into());
            } else {
                Pop(segment, index)
            }
        }
        "label" => {
            expect_args("label", &args, 1)?;
            Label(symbol(args[0])?)
        }
        "goto" => {
            expect_args("goto", &args, 1)?;
            Goto(symbol(args[0])?)
        }
        "if-goto" => {
            expect_args("if-goto", &args, 1)?;
            IfGoto(symbol(args[0])?)
        }
        "function" => {
            expect_args("function", &args, 2)?;
            Function(symbol(args[0])?, number(args[1])?)
        }
        "call" => {
            expect_args("call", &args, 2)?;
            let name = symbol(args[0])?;
            let count = number(args[1])?;
            if count > MAX_CALL_ARGS {
                return Err(SemanticError::ConstantOutOfRange {
                    value: count,
                    max: MAX_CALL_ARGS,
                }
                .into());
            }
            Call(name, count)
        }
        "return" => {
            expect_args("return", &args, 0)?;
            Return
        }
        _ => return Err(SyntaxError::UnknownCommand(line.to_string()).into()),
    };

    Ok(command)
}

/// Strip comments and blank lines, keeping 1-based line numbers.
pub fn lines(input: &str) -> impl Iterator<Item = (usize, &str)> {
    input.lines().enumerate().filter_map(|(i, line)| {
        let line = line.split_once("//").map(|(s, _)| s).unwrap_or(line).trim();
        if line.is_empty() {
            None
        } else {
            Some((i + 1, line))
        }
    })
}

/// Classify every command of a unit, stopping at the first bad line.
pub fn parse(input: &str) -> Result<Vec<SourceCommand>, (usize, String, ClassifyError)> {
    lines(input)
        .map(|(line, text)| {
            classify(text)
                .map(|command| SourceCommand {
                    line,
                    text: text.to_string(),
                    command,
                })
                .map_err(|err| (line, text.to_string(), err))
        })
        .collect()
}
