use std::fmt;
use std::str::FromStr;

use crate::error::SemanticError;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Segment {
    Constant,
    Local,
    Static,
    Argument,
    This,
    That,
    Pointer,
    Temp,
}

impl Segment {
    pub fn name(&self) -> &'static str {
        match self {
            Segment::Constant => "constant",
            Segment::Local => "local",
            Segment::Static => "static",
            Segment::Argument => "argument",
            Segment::This => "this",
            Segment::That => "that",
            Segment::Pointer => "pointer",
            Segment::Temp => "temp",
        }
    }

    /// Largest index the segment accepts, if it is bounded.
    pub fn max_index(&self) -> Option<u16> {
        match self {
            Segment::Pointer => Some(1),
            Segment::Temp => Some(7),
            _ => None,
        }
    }
}

impl FromStr for Segment {
    type Err = SemanticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "constant" => Segment::Constant,
            "local" => Segment::Local,
            "static" => Segment::Static,
            "argument" => Segment::Argument,
            "this" => Segment::This,
            "that" => Segment::That,
            "pointer" => Segment::Pointer,
            "temp" => Segment::Temp,
            _ => return Err(SemanticError::UnknownSegment(s.to_string())),
        })
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

/// How an operator uses the stack.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Arity {
    /// Rewrites the top value in place.
    Unary,
    /// Pops two, pushes one.
    Binary,
    /// Pops two, pushes a boolean.
    Comparison,
}

impl ArithOp {
    pub const ALL: [ArithOp; 9] = [
        ArithOp::Add,
        ArithOp::Sub,
        ArithOp::Neg,
        ArithOp::Eq,
        ArithOp::Gt,
        ArithOp::Lt,
        ArithOp::And,
        ArithOp::Or,
        ArithOp::Not,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ArithOp::Add => "add",
            ArithOp::Sub => "sub",
            ArithOp::Neg => "neg",
            ArithOp::Eq => "eq",
            ArithOp::Gt => "gt",
            ArithOp::Lt => "lt",
            ArithOp::And => "and",
            ArithOp::Or => "or",
            ArithOp::Not => "not",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            ArithOp::Neg | ArithOp::Not => Arity::Unary,
            ArithOp::Add | ArithOp::Sub | ArithOp::And | ArithOp::Or => Arity::Binary,
            ArithOp::Eq | ArithOp::Gt | ArithOp::Lt => Arity::Comparison,
        }
    }
}

impl FromStr for ArithOp {
    type Err = SemanticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArithOp::ALL
            .iter()
            .copied()
            .find(|op| op.name() == s)
            .ok_or_else(|| SemanticError::UnknownOperator(s.to_string()))
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Command {
    // Stack Basics
    Arithmetic(ArithOp),
    Push(Segment, u16),
    Pop(Segment, u16),

    // Control
    Label(String),
    Goto(String),
    IfGoto(String),

    // Functions
    Function(String, u16),
    Call(String, u16),
    Return,
}

impl Command {
    pub fn keyword(&self) -> &'static str {
        match self {
            Command::Arithmetic(op) => op.name(),
            Command::Push(..) => "push",
            Command::Pop(..) => "pop",
            Command::Label(_) => "label",
            Command::Goto(_) => "goto",
            Command::IfGoto(_) => "if-goto",
            Command::Function(..) => "function",
            Command::Call(..) => "call",
            Command::Return => "return",
        }
    }

    /// First argument: the operator name for arithmetic, the segment for
    /// push/pop, the symbol for everything else. `return` has none.
    pub fn arg1(&self) -> Result<&str, SemanticError> {
        match self {
            Command::Arithmetic(op) => Ok(op.name()),
            Command::Push(seg, _) | Command::Pop(seg, _) => Ok(seg.name()),
            Command::Label(sym)
            | Command::Goto(sym)
            | Command::IfGoto(sym)
            | Command::Function(sym, _)
            | Command::Call(sym, _) => Ok(sym),
            Command::Return => Err(SemanticError::MissingArgument {
                command: self.keyword(),
                position: 1,
            }),
        }
    }

    /// Second argument, carried only by push, pop, function and call.
    pub fn arg2(&self) -> Result<u16, SemanticError> {
        match self {
            Command::Push(_, n) | Command::Pop(_, n) | Command::Function(_, n) | Command::Call(_, n) => {
                Ok(*n)
            }
            _ => Err(SemanticError::MissingArgument {
                command: self.keyword(),
                position: 2,
            }),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Command::Arithmetic(op) => f.write_str(op.name()),
            Command::Push(seg, n) => write!(f, "push {} {}", seg, n),
            Command::Pop(seg, n) => write!(f, "pop {} {}", seg, n),
            Command::Label(sym) => write!(f, "label {}", sym),
            Command::Goto(sym) => write!(f, "goto {}", sym),
            Command::IfGoto(sym) => write!(f, "if-goto {}", sym),
            Command::Function(sym, n) => write!(f, "function {} {}", sym, n),
            Command::Call(sym, n) => write!(f, "call {} {}", sym, n),
            Command::Return => f.write_str("return"),
        }
    }
}

/// A classified command together with where it came from.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct SourceCommand {
    /// 1-based line number in the unit.
    pub line: usize,
    /// The stripped source text.
    pub text: String,
    pub command: Command,
}
