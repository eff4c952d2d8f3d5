//! Command line option model.
//!
//! A [`CliOption`] is a single flag with a fixed arity and a set of default
//! values. An [`OptionTable`] holds the options in declaration order and
//! binds them against the raw token stream.
//!
//! ## Matching
//!
//! Every option scans the *whole* token stream. Each occurrence of its short
//! or long label removes the label and the next `arity` tokens, replacing
//! the option's values. The last occurrence wins. Tokens nobody claims are
//! left in the stream as positional arguments.
//!
//! ```rust
//! use adept::options::{CliOption, OptionTable};
//!
//! let mut table = OptionTable::new(vec![
//!     CliOption::new("-r", "--repo", 1, "Repository url. Current default: %0")
//!         .with_defaults(&["maven.google.com"])
//!         .with_arg_labels(&["url"]),
//! ]);
//! let mut tokens = vec!["-r".to_string(), "custom.repo".to_string(), "a:1".to_string()];
//! table.parse_all(&mut tokens).unwrap();
//! assert_eq!(table.get("--repo").unwrap().value_at(0).unwrap(), "custom.repo");
//! assert_eq!(tokens, vec!["a:1".to_string()]);
//! ```

pub mod help;

use thiserror::Error;

/// Errors raised while binding or reading options.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OptionError {
    /// The token stream ended before the option received all its arguments.
    #[error("option {label} expects {expected} argument(s), but only {found} remained")]
    Malformed {
        label: String,
        expected: usize,
        found: usize,
    },

    /// Indexed access past the end of the option's values.
    #[error("attempt to access element {index} of option {label}, which has {len} value(s)")]
    OutOfRange {
        label: String,
        index: usize,
        len: usize,
    },
}

/// A fixed-arity command line flag and the values bound to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOption {
    short_label: String,
    long_label: String,
    arity: usize,
    arg_labels: Vec<String>,
    help_template: String,
    values: Vec<String>,
    bound: bool,
}

impl CliOption {
    pub fn new(short_label: &str, long_label: &str, arity: usize, help_template: &str) -> Self {
        Self {
            short_label: short_label.to_string(),
            long_label: long_label.to_string(),
            arity,
            arg_labels: Vec::new(),
            help_template: help_template.to_string(),
            values: Vec::new(),
            bound: false,
        }
    }

    /// Values used until the option is matched on the command line.
    pub fn with_defaults(mut self, defaults: &[&str]) -> Self {
        self.values = defaults.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Argument names shown in help, ie `-d <path>`.
    pub fn with_arg_labels(mut self, labels: &[&str]) -> Self {
        self.arg_labels = labels.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn short_label(&self) -> &str {
        &self.short_label
    }

    pub fn long_label(&self) -> &str {
        &self.long_label
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn arg_labels(&self) -> &[String] {
        &self.arg_labels
    }

    pub fn help_template(&self) -> &str {
        &self.help_template
    }

    /// Bound values, or the defaults if the option was never matched.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    /// Returns true if `token` is one of this option's labels.
    pub fn is_label(&self, token: &str) -> bool {
        (!self.short_label.is_empty() && token == self.short_label)
            || (!self.long_label.is_empty() && token == self.long_label)
    }

    /// Binds this option against `tokens`, removing every occurrence of the
    /// option and its arguments from the stream.
    ///
    /// Returns whether the option is bound after the call. On error neither
    /// `tokens` nor the option is modified.
    pub fn matches(&mut self, tokens: &mut Vec<String>) -> Result<bool, OptionError> {
        let mut remaining = Vec::with_capacity(tokens.len());
        let mut last_values: Option<Vec<String>> = None;

        let mut i = 0;
        while i < tokens.len() {
            let token = &tokens[i];
            i += 1;
            if !self.is_label(token) {
                remaining.push(token.clone());
                continue;
            }

            let available = tokens.len() - i;
            if available < self.arity {
                return Err(OptionError::Malformed {
                    label: token.clone(),
                    expected: self.arity,
                    found: available,
                });
            }
            last_values = Some(tokens[i..i + self.arity].to_vec());
            i += self.arity;
        }

        if let Some(values) = last_values {
            self.values = values;
            self.bound = true;
        }
        *tokens = remaining;
        Ok(self.bound)
    }

    /// Returns the bound or default value at `index`.
    pub fn value_at(&self, index: usize) -> Result<&str, OptionError> {
        self.values
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| OptionError::OutOfRange {
                label: self.display_label().to_string(),
                index,
                len: self.values.len(),
            })
    }

    fn display_label(&self) -> &str {
        if self.short_label.is_empty() {
            &self.long_label
        } else {
            &self.short_label
        }
    }
}

/// Ordered collection of options. Declaration order is also help order.
#[derive(Debug, Clone, Default)]
pub struct OptionTable {
    options: Vec<CliOption>,
}

impl OptionTable {
    pub fn new(options: Vec<CliOption>) -> Self {
        Self { options }
    }

    pub fn push(&mut self, option: CliOption) {
        self.options.push(option);
    }

    pub fn iter(&self) -> impl Iterator<Item = &CliOption> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Looks an option up by its short or long label.
    pub fn get(&self, label: &str) -> Option<&CliOption> {
        self.options.iter().find(|opt| opt.is_label(label))
    }

    /// Runs every option over the token stream, one full pass per option.
    ///
    /// Whatever is left in `tokens` afterwards is positional. If any option
    /// is malformed, the table and the stream are left untouched.
    pub fn parse_all(&mut self, tokens: &mut Vec<String>) -> Result<(), OptionError> {
        let mut staged = self.options.clone();
        let mut remaining = tokens.clone();
        for option in &mut staged {
            option.matches(&mut remaining)?;
        }
        self.options = staged;
        *tokens = remaining;
        Ok(())
    }
}
