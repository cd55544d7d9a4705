use std::collections::BTreeSet;

use crate::labels::LabelRegistry;

/// State shared by every command of one translation run.
///
/// The occurrence counter and label registry span the whole run; the file
/// name is swapped in by the driver before each unit.
#[derive(Debug, Default)]
pub struct Session {
    file_name: String,
    occurrence: usize,
    labels: LabelRegistry,
    functions: BTreeSet<String>,
    callees: BTreeSet<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new unit; statics now resolve to `<file_name>.<index>`.
    pub fn set_file_name(&mut self, file_name: &str) {
        self.file_name = file_name.to_string();
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Claim the next occurrence index.
    pub fn next_occurrence(&mut self) -> usize {
        let tmp = self.occurrence;
        self.occurrence += 1;
        tmp
    }

    pub fn occurrences(&self) -> usize {
        self.occurrence
    }

    pub fn labels_mut(&mut self) -> &mut LabelRegistry {
        &mut self.labels
    }

    pub fn labels(&self) -> &LabelRegistry {
        &self.labels
    }

    pub fn record_function(&mut self, name: &str) {
        self.functions.insert(name.to_string());
    }

    pub fn record_call(&mut self, name: &str) {
        self.callees.insert(name.to_string());
    }

    /// Called names with no `function` definition so far, sorted.
    pub fn unresolved_calls(&self) -> Vec<&str> {
        self.callees
            .difference(&self.functions)
            .map(String::as_str)
            .collect()
    }
}
