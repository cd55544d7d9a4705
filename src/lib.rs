//! Translator from the stack-based VM intermediate language to Hack assembly.
//!
//! [`driver::run`] is the entry point: it feeds [`driver::Unit`]s through a
//! single [`session::Session`] and writes one assembly stream.

pub mod ast;
pub mod config;
pub mod driver;
pub mod error;
pub mod labels;
pub mod parser;
pub mod segment;
pub mod session;
pub mod sources;
pub mod translator;

pub use config::{Bootstrap, Options};
pub use driver::{run, translate, Driver, Unit};
pub use error::{Result, SemanticError, SyntaxError, TranslateError};
