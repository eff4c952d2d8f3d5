//! # adept - Android dependency fetcher
//!
//! adept downloads Android libraries from a Maven repository
//! (`maven.google.com` by default) given `<path>:<version>` specifiers.
//!
//! ```bash
//! adept -d libs com.google.android.material:1.4.0
//! ```
//!
//! ## Module Organization
//!
//! - [`options`] - Fixed-arity flag model, token stream binding, help rendering
//! - [`fetch`] - HTTP fetching with redirect following
//! - [`index`] - Master and group index parsing
//! - [`deps`] - Package downloads
//! - [`app`] - The driver tying it all together

/// Driver: argument vector in, exit code out.
pub mod app;

/// Flag declarations and the help screen.
pub mod cli;

/// Run settings and fetch tuning.
pub mod config;

/// Package downloads.
pub mod deps;

/// HTTP fetching with redirect following.
pub mod fetch;

/// Repository index parsing.
pub mod index;

/// Command line option model.
pub mod options;

/// `<path>:<version>` package specifiers.
pub mod package;
