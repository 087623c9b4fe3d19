//! Command-line construction.
//!
//! A [`CommandLine`] keeps two representations of the same invocation,
//! appended to in lockstep: the string shown to the user, where values that
//! may contain spaces are double-quoted, and the argument vector handed to
//! the process runner, which is never quoted.

use crate::params::{render_decimal, Choice};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// One command-line argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandArg {
    value: String,
    rendered: String,
}

impl CommandArg {
    /// An argument shown as-is.
    #[must_use]
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            rendered: value.clone(),
            value,
        }
    }

    /// An argument shown in double quotes.
    #[must_use]
    pub fn quoted(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            rendered: format!("\"{value}\""),
            value,
        }
    }

    /// The value passed to the process.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The value as shown in the log.
    #[must_use]
    pub fn rendered(&self) -> &str {
        &self.rendered
    }
}

/// A program plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandLine {
    program: PathBuf,
    args: Vec<CommandArg>,
}

impl CommandLine {
    /// Starts a command for the given program.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// The program to execute.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// The arguments in order.
    #[must_use]
    pub fn args(&self) -> &[CommandArg] {
        &self.args
    }

    /// The argument vector for the process runner.
    #[must_use]
    pub fn argv(&self) -> Vec<&str> {
        self.args.iter().map(CommandArg::value).collect()
    }

    /// The human-readable command line.
    #[must_use]
    pub fn display(&self) -> String {
        let mut line = format!("\"{}\"", self.program.display());
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg.rendered());
        }
        line
    }

    /// Returns true if the argument vector contains `flag`.
    #[must_use]
    pub fn has_arg(&self, flag: &str) -> bool {
        self.args.iter().any(|arg| arg.value == flag)
    }

    /// Appends an unquoted argument.
    pub fn arg(&mut self, value: impl Into<String>) -> &mut Self {
        self.args.push(CommandArg::plain(value));
        self
    }

    /// Appends a quoted argument.
    pub fn quoted(&mut self, value: impl Into<String>) -> &mut Self {
        self.args.push(CommandArg::quoted(value));
        self
    }

    /// Appends a quoted path argument.
    pub fn quoted_path(&mut self, path: &Path) -> &mut Self {
        self.quoted(path.display().to_string())
    }

    /// Appends `flag` when `enabled` is true.
    pub fn flag_if(&mut self, enabled: bool, flag: &str) -> &mut Self {
        if enabled {
            self.arg(flag);
        }
        self
    }

    /// Appends `flag "value"` when a value is present.
    pub fn option_quoted(&mut self, flag: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            self.arg(flag).quoted(value);
        }
        self
    }

    /// Appends `flag value` when a decimal is present and differs from the tool default.
    pub fn option_decimal(&mut self, flag: &str, value: Option<f64>, default: Option<f64>) -> &mut Self {
        if let Some(value) = value {
            let is_default = default.is_some_and(|d| (value - d).abs() < f64::EPSILON);
            if !is_default {
                self.arg(flag).arg(render_decimal(value));
            }
        }
        self
    }

    /// Appends `flag value` when an integer is present and differs from the tool default.
    pub fn option_integer(&mut self, flag: &str, value: Option<u32>, default: Option<u32>) -> &mut Self {
        if let Some(value) = value {
            if default != Some(value) {
                self.arg(flag).arg(value.to_string());
            }
        }
        self
    }

    /// Appends the flags of a chosen categorical value.
    pub fn choice(&mut self, choice: Option<&Choice>) -> &mut Self {
        if let Some(choice) = choice {
            for flag in choice.flags {
                self.arg(*flag);
            }
        }
        self
    }

    /// Appends pass-through tokens verbatim.
    pub fn extra(&mut self, tokens: &[String]) -> &mut Self {
        for token in tokens {
            self.arg(token.clone());
        }
        self
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_and_argv_are_built_together() {
        let mut cmd = CommandLine::new("/opt/lastools/bin/lasinfo");
        cmd.arg("-i").quoted("my data/a.las").arg("-nh");

        assert_eq!(cmd.display(), "\"/opt/lastools/bin/lasinfo\" -i \"my data/a.las\" -nh");
        assert_eq!(cmd.argv(), vec!["-i", "my data/a.las", "-nh"]);
    }

    #[test]
    fn test_quoted_value_keeps_inner_quotes_out_of_argv() {
        let mut cmd = CommandLine::new("lasclip");
        cmd.option_quoted("-poly", Some("fence.shp"));

        assert_eq!(cmd.args()[1].rendered(), "\"fence.shp\"");
        assert_eq!(cmd.args()[1].value(), "fence.shp");
    }

    #[test]
    fn test_option_defaults_are_omitted() {
        let mut cmd = CommandLine::new("lastile");
        cmd.option_decimal("-tile_size", Some(1000.0), Some(1000.0))
            .option_decimal("-buffer", Some(25.0), Some(0.0))
            .option_decimal("-drop_above", None, None)
            .option_integer("-cores", Some(1), Some(1))
            .option_integer("-fill", Some(3), Some(0));

        assert_eq!(cmd.argv(), vec!["-buffer", "25.0", "-fill", "3"]);
    }

    #[test]
    fn test_choice_and_extra() {
        const TXT: Choice = Choice::new("xyzi", &["-otxt", "-oparse", "xyzi"]);
        let mut cmd = CommandLine::new("las2las");
        cmd.choice(Some(&TXT)).choice(None).extra(&["-keep_class".to_string(), "\"2\"".to_string()]);

        assert_eq!(cmd.argv(), vec!["-otxt", "-oparse", "xyzi", "-keep_class", "\"2\""]);
        assert!(cmd.has_arg("-oparse"));
    }
}
