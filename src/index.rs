//! Maven repository indexes.
//!
//! Google's Maven repository publishes two kinds of index:
//!
//! - `master-index.xml` - one element per group id under the root
//!   (`<androidx.core/>`)
//! - `<group path>/group-index.xml` - one element per artifact with a
//!   comma-separated `versions` attribute
//!
//! Only direct children of the root element count. Comments, nested
//! elements and extra attributes are ignored; a document that is not
//! well-formed XML is an [`IndexError`].

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::BTreeMap;
use thiserror::Error;

pub const GROUP_INDEX: &str = "group-index.xml";

/// A requested package that the repository does not have.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("package not found: no group in the master index matches {path}")]
    UnknownGroup { path: String },

    #[error("package not found: group {group} has no artifact {artifact}")]
    UnknownArtifact { group: String, artifact: String },

    #[error("package not found: {group}:{artifact} has no version {version}")]
    UnknownVersion {
        group: String,
        artifact: String,
        version: String,
        available: Vec<String>,
    },
}

/// An index or POM that could not be read as XML.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("malformed {document}: {reason}")]
pub struct IndexError {
    pub document: &'static str,
    pub reason: String,
}

impl IndexError {
    fn new(document: &'static str, reason: impl ToString) -> Self {
        Self {
            document,
            reason: reason.to_string(),
        }
    }
}

/// Calls `visit` with every element directly under the root.
fn for_each_child<'a>(
    xml: &'a str,
    document: &'static str,
    mut visit: impl FnMut(&BytesStart<'a>) -> Result<(), IndexError>,
) -> Result<(), IndexError> {
    let mut reader = Reader::from_str(xml);
    let mut depth = 0usize;
    let mut saw_root = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if depth == 1 {
                    visit(&e)?;
                }
                saw_root = true;
                depth += 1;
            }
            Ok(Event::Empty(e)) => {
                if depth == 1 {
                    visit(&e)?;
                }
                saw_root = true;
            }
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(IndexError::new(document, e)),
        }
    }

    if !saw_root {
        return Err(IndexError::new(document, "no root element"));
    }
    if depth != 0 {
        return Err(IndexError::new(document, "unexpected end of document"));
    }
    Ok(())
}

fn element_name(document: &'static str, e: &BytesStart<'_>) -> Result<String, IndexError> {
    std::str::from_utf8(e.name().as_ref())
        .map(str::to_string)
        .map_err(|err| IndexError::new(document, err))
}

fn attribute(
    document: &'static str,
    e: &BytesStart<'_>,
    key: &str,
) -> Result<Option<String>, IndexError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| IndexError::new(document, err))?;
        if attr.key.as_ref() == key.as_bytes() {
            let value = attr
                .unescape_value()
                .map_err(|err| IndexError::new(document, err))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Group ids listed in the master index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MasterIndex {
    groups: Vec<String>,
}

impl MasterIndex {
    pub fn parse(xml: &str) -> Result<Self, IndexError> {
        let mut groups = Vec::new();
        for_each_child(xml, "master index", |e| {
            groups.push(element_name("master index", e)?);
            Ok(())
        })?;
        Ok(Self { groups })
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn contains(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }

    /// Splits a package path into group and artifact.
    ///
    /// The longest listed group that is either the whole path or a prefix
    /// followed by `.` wins. A path equal to a group names the artifact
    /// after the group's last segment (`com.google.android.material`
    /// resolves to artifact `material`).
    pub fn locate(&self, path: &str) -> Result<Coordinates, ResolveError> {
        self.groups
            .iter()
            .filter_map(|group| {
                if path == group {
                    let artifact = group.rsplit('.').next().unwrap_or(group.as_str());
                    Some((group, artifact))
                } else {
                    path.strip_prefix(group.as_str())
                        .and_then(|rest| rest.strip_prefix('.'))
                        .filter(|artifact| !artifact.is_empty())
                        .map(|artifact| (group, artifact))
                }
            })
            .max_by_key(|(group, _)| group.len())
            .map(|(group, artifact)| Coordinates {
                group: group.clone(),
                artifact: artifact.to_string(),
            })
            .ok_or_else(|| ResolveError::UnknownGroup {
                path: path.to_string(),
            })
    }
}

/// Group and artifact id of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinates {
    pub group: String,
    pub artifact: String,
}

impl Coordinates {
    /// `androidx.core` becomes `androidx/core`.
    pub fn group_path(&self) -> String {
        self.group.replace('.', "/")
    }

    pub fn group_index_url(&self, repo_url: &str) -> String {
        format!("{}/{}/{}", repo_url, self.group_path(), GROUP_INDEX)
    }

    pub fn file_name(&self, version: &str, extension: &str) -> String {
        format!("{}-{}.{}", self.artifact, version, extension)
    }

    pub fn file_url(&self, repo_url: &str, version: &str, extension: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            repo_url,
            self.group_path(),
            self.artifact,
            version,
            self.file_name(version, extension)
        )
    }
}

/// Artifacts and versions listed in a group index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupIndex {
    artifacts: BTreeMap<String, Vec<String>>,
}

impl GroupIndex {
    /// Children without a `versions` attribute are skipped.
    pub fn parse(xml: &str) -> Result<Self, IndexError> {
        let mut artifacts = BTreeMap::new();
        for_each_child(xml, "group index", |e| {
            if let Some(versions) = attribute("group index", e, "versions")? {
                let versions = versions
                    .split(',')
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
                    .collect();
                artifacts.insert(element_name("group index", e)?, versions);
            }
            Ok(())
        })?;
        Ok(Self { artifacts })
    }

    pub fn versions(&self, artifact: &str) -> Option<&[String]> {
        self.artifacts.get(artifact).map(Vec::as_slice)
    }

    /// Checks that `coords` is published at `version`.
    pub fn ensure(&self, coords: &Coordinates, version: &str) -> Result<(), ResolveError> {
        let versions = self
            .versions(&coords.artifact)
            .ok_or_else(|| ResolveError::UnknownArtifact {
                group: coords.group.clone(),
                artifact: coords.artifact.clone(),
            })?;

        if versions.iter().any(|v| v == version) {
            Ok(())
        } else {
            Err(ResolveError::UnknownVersion {
                group: coords.group.clone(),
                artifact: coords.artifact.clone(),
                version: version.to_string(),
                available: versions.to_vec(),
            })
        }
    }
}

/// What a POM says the main artifact is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Packaging {
    Jar,
    Aar,
    /// Metadata only, nothing else to download.
    Pom,
}

impl Packaging {
    /// Reads the project's `<packaging>`; Maven's default is `jar`.
    pub fn from_pom(pom: &str) -> Result<Self, IndexError> {
        let mut reader = Reader::from_str(pom);
        let mut depth = 0usize;
        let mut in_packaging = false;
        let mut packaging = String::new();
        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    in_packaging = depth == 1 && e.name().as_ref() == b"packaging";
                    depth += 1;
                }
                Ok(Event::End(_)) => {
                    in_packaging = false;
                    depth = depth.saturating_sub(1);
                }
                Ok(Event::Text(text)) if in_packaging => {
                    let text = text.unescape().map_err(|e| IndexError::new("POM", e))?;
                    packaging.push_str(&text);
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(IndexError::new("POM", e)),
            }
        }

        Ok(match packaging.trim() {
            "aar" => Self::Aar,
            "pom" => Self::Pom,
            _ => Self::Jar,
        })
    }

    pub fn extension(self) -> Option<&'static str> {
        match self {
            Self::Jar => Some("jar"),
            Self::Aar => Some("aar"),
            Self::Pom => None,
        }
    }
}
