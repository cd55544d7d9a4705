//! Generated control-point labels and the registry of user-defined ones.
//!
//! The target assembler has a single flat symbol table, so every label the
//! run defines must be unique. Generated labels carry the run-wide occurrence
//! counter and live under [`RESERVED_PREFIX`], which user symbols may not use.

use std::collections::HashSet;

use crate::error::SemanticError;
use crate::parser::{validate_symbol, RESERVED_PREFIX};

/// Targets for one comparison: where the true branch starts, and the join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonLabels {
    pub on_true: String,
    pub end: String,
}

pub fn comparison(occurrence: usize) -> ComparisonLabels {
    ComparisonLabels {
        on_true: format!("{}CMP_TRUE.{}", RESERVED_PREFIX, occurrence),
        end: format!("{}CMP_END.{}", RESERVED_PREFIX, occurrence),
    }
}

pub fn return_address(function: &str, occurrence: usize) -> String {
    format!("{}RET.{}.{}", RESERVED_PREFIX, function, occurrence)
}

/// Every user label and function entry defined so far in the run.
#[derive(Debug, Default)]
pub struct LabelRegistry {
    defined: HashSet<String>,
}

impl LabelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, name: &str) -> Result<(), SemanticError> {
        validate_symbol(name)?;
        if !self.defined.insert(name.to_string()) {
            return Err(SemanticError::DuplicateLabel(name.to_string()));
        }
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.defined.contains(name)
    }

    pub fn len(&self) -> usize {
        self.defined.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defined.is_empty()
    }
}
