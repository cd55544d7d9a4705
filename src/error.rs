use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::ast::Segment;

/// The line is not a command of the language.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("unrecognized command `{0}`")]
    UnknownCommand(String),

    #[error("`{keyword}` takes {expected} argument(s), found {found}")]
    WrongArgumentCount {
        keyword: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("`{0}` is not a non-negative integer")]
    InvalidNumber(String),
}

/// The line is well formed but breaks a rule of the target machine or run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SemanticError {
    #[error("unknown segment `{0}`")]
    UnknownSegment(String),

    #[error("unknown arithmetic operator `{0}`")]
    UnknownOperator(String),

    #[error("cannot pop into the constant segment")]
    PopConstant,

    #[error("index {index} is out of range for segment `{segment}` (max {max})")]
    IndexOutOfRange { segment: Segment, index: u16, max: u16 },

    #[error("value {value} does not fit an address literal (max {max})")]
    ConstantOutOfRange { value: u16, max: u16 },

    #[error("`{0}` may only contain letters, digits, `_`, `.`, `$` and `:`")]
    InvalidSymbol(String),

    #[error("label `{0}` must not start with a digit")]
    LabelStartsWithDigit(String),

    #[error("label `{0}` uses the reserved prefix `__`")]
    ReservedLabel(String),

    #[error("label `{0}` is already defined")]
    DuplicateLabel(String),

    #[error("`{command}` has no argument {position}")]
    MissingArgument { command: &'static str, position: u8 },

    #[error("function `{0}` is called but never defined")]
    UndefinedFunction(String),
}

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("{unit}:{line}: {source} (in `{text}`)")]
    Syntax {
        unit: String,
        line: usize,
        text: String,
        source: SyntaxError,
    },

    #[error("{unit}:{line}: {source} (in `{text}`)")]
    Semantic {
        unit: String,
        line: usize,
        text: String,
        source: SemanticError,
    },

    /// The unit's name cannot prefix its static symbols.
    #[error("unit `{unit}`: {source}")]
    UnitName { unit: String, source: SemanticError },

    /// A rule checked after every unit has been translated.
    #[error("{0}")]
    Run(#[from] SemanticError),

    #[error("{}: {}", .path.display(), .source)]
    Io { path: PathBuf, source: io::Error },

    #[error("output error: {0}")]
    Output(#[from] io::Error),

    #[error("{0}")]
    Input(String),
}

pub type Result<T> = std::result::Result<T, TranslateError>;
