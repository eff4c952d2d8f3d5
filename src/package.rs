//! Package specifiers given on the command line, ie `com.google.android.material:1.4.0`.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

pub const PACKAGE_FORMAT: &str =
    "Expected format: <package path>:<package version>, ie com.google.android.material:1.4.0";

static PACKAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^\s:]+):([^\s:]+)$").expect("package regex"));

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid package name: {token}")]
pub struct PackageSpecError {
    pub token: String,
}

/// A requested `<path>:<version>` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    pub path: String,
    pub version: String,
}

impl PackageSpec {
    pub fn parse(token: &str) -> Result<Self, PackageSpecError> {
        let caps = PACKAGE_RE.captures(token).ok_or_else(|| PackageSpecError {
            token: token.to_string(),
        })?;
        Ok(Self {
            path: caps[1].to_string(),
            version: caps[2].to_string(),
        })
    }
}

impl fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path, self.version)
    }
}

/// Parses every token; the first invalid one stops parsing.
pub fn parse_all(tokens: &[String]) -> Result<Vec<PackageSpec>, PackageSpecError> {
    tokens.iter().map(|t| PackageSpec::parse(t)).collect()
}
