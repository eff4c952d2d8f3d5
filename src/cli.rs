//! The adept command line: flag declarations and the help screen.

use crate::config::{DEFAULT_INDEX, DEFAULT_REPO};
use crate::options::{CliOption, OptionTable, help};

pub const HELP: &str = "--help";
pub const OUT_DIR: &str = "--out-dir";
pub const DEPS: &str = "--deps";
pub const REPO: &str = "--repo";
pub const FORCE: &str = "--force";
pub const INDEX: &str = "--index";

pub const HELP_START_INDENT: usize = 0;
pub const HELP_TEXT_INDENT: usize = 25;
pub const HELP_WRAP_COLUMN: usize = 100;

pub const HELP_INTRO: &str = "\nadept\n\n\
A simple command line utility for managing Android dependencies.\n\n\
Usage: adept [options] <packages>, where each package is formatted as <path>:<version>.\n\
For example, to fetch com.google.android.material version 1.4.0, use: adept com.google.android.material:1.4.0\n\n\
Available options:";

/// Builds the option table. Declaration order is help order.
pub fn option_table() -> OptionTable {
    OptionTable::new(vec![
        CliOption::new("-h", HELP, 0, "Displays this help menu."),
        CliOption::new(
            "-d",
            OUT_DIR,
            1,
            "Specifies the directory to which the fetched libraries will be written.",
        )
        .with_defaults(&["."])
        .with_arg_labels(&["path"]),
        CliOption::new(
            "-D",
            DEPS,
            1,
            "If this option is specified, all subdependencies will also be fetched.",
        )
        .with_defaults(&["."])
        .with_arg_labels(&["path"]),
        CliOption::new(
            "-r",
            REPO,
            1,
            "Specifies the url of the repository to download the libraries from. Current default: %0",
        )
        .with_defaults(&[DEFAULT_REPO])
        .with_arg_labels(&["url"]),
        CliOption::new(
            "-f",
            FORCE,
            0,
            "Forces the action to complete, overwriting existing files even if they are up-to-date.",
        ),
        CliOption::new(
            "-i",
            INDEX,
            1,
            "Specifies an alternate master index file to search for in the repository. Current default: %0",
        )
        .with_defaults(&[DEFAULT_INDEX])
        .with_arg_labels(&["index"]),
    ])
}

/// Full help screen, wrapped at `wrap_column`.
pub fn help_text(table: &OptionTable, wrap_column: usize) -> String {
    let mut text = String::from(HELP_INTRO);
    for option in table.iter() {
        text.push('\n');
        text.push_str(&help::render(
            option,
            HELP_START_INDENT,
            HELP_TEXT_INDENT,
            wrap_column,
        ));
    }
    text
}

/// Wrap column for the current terminal: the default, or narrower if the
/// terminal is.
pub fn wrap_column() -> usize {
    let term = console::Term::stdout();
    if !term.is_term() {
        return HELP_WRAP_COLUMN;
    }
    let (_rows, cols) = term.size();
    let cols = cols as usize;
    if cols > HELP_TEXT_INDENT + 20 {
        cols.min(HELP_WRAP_COLUMN)
    } else {
        HELP_WRAP_COLUMN
    }
}

pub fn print_help(table: &OptionTable) {
    println!("{}", help_text(table, wrap_column()));
}
