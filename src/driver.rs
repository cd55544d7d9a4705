use std::io::Write;

use log::{info, warn};

use crate::config::Options;
use crate::error::{Result, SemanticError, TranslateError};
use crate::parser::{self, ClassifyError};
use crate::session::Session;
use crate::translator;

/// One source file: its short name (used for statics) and its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub name: String,
    pub source: String,
}

impl Unit {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Unit {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Feeds units through one session into a single output sink.
pub struct Driver<W: Write> {
    session: Session,
    options: Options,
    out: W,
}

impl<W: Write> Driver<W> {
    pub fn new(out: W, options: Options) -> Self {
        Driver {
            session: Session::new(),
            options,
            out,
        }
    }

    fn write(&mut self, lines: &[String]) -> Result<()> {
        for line in lines {
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }

    fn annotate(&mut self, text: &str) -> Result<()> {
        if self.options.annotate {
            writeln!(self.out, "// {}", text)?;
        }
        Ok(())
    }

    /// Emit the stack setup and the call to the configured entry point.
    pub fn bootstrap(&mut self) -> Result<()> {
        info!(
            "bootstrap: SP={} entry={}",
            self.options.stack_base, self.options.entry_point
        );
        self.annotate("bootstrap")?;
        let lines = translator::bootstrap(
            &mut self.session,
            self.options.stack_base,
            &self.options.entry_point,
        );
        self.write(&lines)
    }

    pub fn translate_unit(&mut self, unit: &Unit) -> Result<()> {
        parser::validate_symbol(&unit.name).map_err(|source| TranslateError::UnitName {
            unit: unit.name.clone(),
            source,
        })?;
        self.session.set_file_name(&unit.name);

        let commands = parser::parse(&unit.source).map_err(|(line, text, err)| match err {
            ClassifyError::Syntax(source) => TranslateError::Syntax {
                unit: unit.name.clone(),
                line,
                text,
                source,
            },
            ClassifyError::Semantic(source) => TranslateError::Semantic {
                unit: unit.name.clone(),
                line,
                text,
                source,
            },
        })?;
        info!("translating {} ({} commands)", unit.name, commands.len());

        for command in &commands {
            self.annotate(&command.text)?;
            let lines = translator::translate(&mut self.session, &command.command).map_err(
                |source| TranslateError::Semantic {
                    unit: unit.name.clone(),
                    line: command.line,
                    text: command.text.clone(),
                    source,
                },
            )?;
            self.write(&lines)?;
        }
        Ok(())
    }

    /// Check calls against definitions and hand back the flushed sink.
    pub fn finish(mut self) -> Result<W> {
        let unresolved: Vec<String> = self
            .session
            .unresolved_calls()
            .into_iter()
            .map(str::to_string)
            .collect();
        if let Some(first) = unresolved.first() {
            if self.options.strict_calls {
                return Err(SemanticError::UndefinedFunction(first.clone()).into());
            }
            for name in &unresolved {
                warn!("function {} is called but never defined", name);
            }
        }

        self.out.flush()?;
        info!(
            "translated {} commands, {} labels defined",
            self.session.occurrences(),
            self.session.labels().len()
        );
        Ok(self.out)
    }
}

/// Translate the units in order into `out`, bootstrapping per `options`.
pub fn run<W: Write>(units: &[Unit], options: &Options, out: W) -> Result<W> {
    let bootstrap = options.wants_bootstrap(units.iter().map(|unit| unit.name.as_str()));
    let mut driver = Driver::new(out, options.clone());
    if bootstrap {
        driver.bootstrap()?;
    }
    for unit in units {
        driver.translate_unit(unit)?;
    }
    driver.finish()
}

/// Translate into a string.
pub fn translate(units: &[Unit], options: &Options) -> Result<String> {
    let bytes = run(units, options, Vec::new())?;
    String::from_utf8(bytes).map_err(|err| TranslateError::Input(err.to_string()))
}
