//! The adept driver: argument vector in, exit code out.
//!
//! ```text
//! args -> option table -> help?              -> exit 0
//!                      -> package specs       -> exit -1 on the first bad one
//!                      -> master index fetch  -> exit 1 on failure
//!                      -> package downloads   -> exit -2 if a package is unknown
//! ```

use crate::cli;
use crate::config::{FetchConfig, Settings};
use crate::deps::{self, FileStatus};
use crate::fetch::{CancelToken, FetchError, Fetcher, Transport, UreqTransport};
use crate::index::{MasterIndex, ResolveError};
use crate::options::{OptionError, OptionTable};
use crate::package::{self, PACKAGE_FORMAT, PackageSpec, PackageSpecError};
use anyhow::{Context, Result};
use colored::*;
use thiserror::Error;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Ok,
    InvalidPackage,
    PackageNotFound,
    Failure,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::InvalidPackage => -1,
            Self::PackageNotFound => -2,
            Self::Failure => 1,
        }
    }
}

/// Command line problems caught before any network access.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CliError {
    #[error(transparent)]
    Option(#[from] OptionError),

    #[error(transparent)]
    Package(#[from] PackageSpecError),
}

/// What the command line asks for.
#[derive(Debug, Clone)]
pub enum Invocation {
    Help(OptionTable),
    Fetch {
        settings: Settings,
        packages: Vec<PackageSpec>,
    },
}

/// Binds the options and interprets what is left as package specs.
pub fn parse_args(args: Vec<String>) -> Result<Invocation, CliError> {
    let mut table = cli::option_table();
    if args.is_empty() {
        return Ok(Invocation::Help(table));
    }

    let mut tokens = args;
    table.parse_all(&mut tokens)?;

    if table.get(cli::HELP).is_some_and(|opt| opt.is_bound()) {
        return Ok(Invocation::Help(table));
    }

    let packages = package::parse_all(&tokens)?;
    let settings = Settings::from_table(&table)?;
    Ok(Invocation::Fetch { settings, packages })
}

/// Runs adept against the network.
pub fn run(args: Vec<String>) -> ExitCode {
    let config = FetchConfig {
        show_progress: console::Term::stdout().is_term(),
        ..FetchConfig::default()
    };
    let cancel = CancelToken::new();
    if let Err(e) = install_interrupt_handler(&cancel) {
        eprintln!("{} {:#}", "warning:".yellow().bold(), e);
    }
    let transport = UreqTransport::new(&config).with_cancel_token(cancel.clone());
    let mut fetcher = Fetcher::new(transport)
        .with_max_redirects(config.max_redirects)
        .with_cancel_token(cancel);
    run_with(args, &mut fetcher)
}

/// Routes Ctrl-C to `cancel`. The running download stops at its next read;
/// a second Ctrl-C exits at once.
pub fn install_interrupt_handler(cancel: &CancelToken) -> Result<()> {
    let cancel = cancel.clone();
    ctrlc::set_handler(move || {
        if cancel.is_cancelled() {
            std::process::exit(130);
        }
        eprintln!("{} Interrupted, stopping...", "!".yellow().bold());
        cancel.cancel();
    })
    .context("Failed to install the Ctrl-C handler")
}

/// Runs adept over the given fetcher.
pub fn run_with<T: Transport>(args: Vec<String>, fetcher: &mut Fetcher<T>) -> ExitCode {
    let invocation = match parse_args(args) {
        Ok(invocation) => invocation,
        Err(CliError::Package(e)) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            eprintln!("{}", PACKAGE_FORMAT);
            return ExitCode::InvalidPackage;
        }
        Err(CliError::Option(e)) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            eprintln!("Run 'adept --help' for usage.");
            return ExitCode::Failure;
        }
    };

    match invocation {
        Invocation::Help(table) => {
            cli::print_help(&table);
            ExitCode::Ok
        }
        Invocation::Fetch { settings, packages } => {
            match fetch_all(fetcher, &settings, &packages) {
                Ok(()) => ExitCode::Ok,
                Err(e) => {
                    eprintln!("{} {:#}", "error:".red().bold(), e);
                    if let Some(FetchError::Cancelled { .. }) = e.downcast_ref::<FetchError>() {
                        eprintln!("Interrupted; files already written were kept.");
                    }
                    if let Some(ResolveError::UnknownVersion { available, .. }) =
                        e.downcast_ref::<ResolveError>()
                    {
                        eprintln!("Available versions: {}", available.join(", "));
                    }
                    if e.downcast_ref::<ResolveError>().is_some() {
                        ExitCode::PackageNotFound
                    } else {
                        ExitCode::Failure
                    }
                }
            }
        }
    }
}

fn fetch_all<T: Transport>(
    fetcher: &mut Fetcher<T>,
    settings: &Settings,
    packages: &[PackageSpec],
) -> Result<()> {
    if settings.deps_dir.is_some() {
        println!(
            "{} Sub-dependency resolution is not supported yet; --deps is ignored",
            "ℹ".blue()
        );
    }

    let fetched = fetcher
        .fetch(&settings.index_url())
        .context("Failed to fetch the master index")?;
    let index = MasterIndex::parse(&String::from_utf8_lossy(&fetched.body))
        .context("Unreadable master index")?;
    println!(
        "{} Master index lists {} groups",
        "✓".green(),
        index.groups().len()
    );

    if packages.is_empty() {
        println!("{} No packages requested.", "ℹ".blue());
        return Ok(());
    }

    let results = deps::fetch_packages(fetcher, settings, &index, packages)?;
    let written: usize = results
        .iter()
        .map(|r| {
            r.files
                .iter()
                .filter(|(_, s)| *s == FileStatus::Written)
                .count()
        })
        .sum();
    println!(
        "{} Done: {} package(s), {} file(s) written to {}",
        "✓".green(),
        results.len(),
        written,
        settings.out_dir.display()
    );
    Ok(())
}
