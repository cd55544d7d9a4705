/// When to prefix the output with the stack setup and entry call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bootstrap {
    /// Only when one of the units is named `Sys`.
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub bootstrap: Bootstrap,
    /// Function the bootstrap calls.
    pub entry_point: String,
    /// Initial value of SP.
    pub stack_base: u16,
    /// Precede each command's instructions with a `// <command>` line.
    pub annotate: bool,
    /// Fail the run when a called function is never defined.
    pub strict_calls: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            bootstrap: Bootstrap::Auto,
            entry_point: "Sys.init".to_string(),
            stack_base: 256,
            annotate: true,
            strict_calls: false,
        }
    }
}

impl Options {
    pub fn wants_bootstrap<'a>(&self, mut unit_names: impl Iterator<Item = &'a str>) -> bool {
        match self.bootstrap {
            Bootstrap::Always => true,
            Bootstrap::Never => false,
            Bootstrap::Auto => unit_names.any(|name| name == "Sys"),
        }
    }
}
