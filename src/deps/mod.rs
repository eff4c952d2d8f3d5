//! Package downloads.
//!
//! For every requested package:
//!
//! - locate its group in the master index
//! - check the version against the group index
//! - download the POM, then the `.aar` or `.jar` it describes
//!
//! Files land in the output directory. Existing files are kept unless
//! `--force` was given.

mod fetch;

pub use fetch::{FileStatus, PackageFiles, fetch_packages};
