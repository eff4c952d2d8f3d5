use crate::config::Settings;
use crate::fetch::{Fetcher, Transport};
use crate::index::{Coordinates, GroupIndex, MasterIndex, Packaging};
use crate::package::PackageSpec;
use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Written,
    /// Already present and `--force` was not given.
    Skipped,
}

/// Files produced for one package.
#[derive(Debug, Clone)]
pub struct PackageFiles {
    pub package: PackageSpec,
    pub coordinates: Coordinates,
    pub files: Vec<(PathBuf, FileStatus)>,
}

pub fn fetch_packages<T: Transport>(
    fetcher: &mut Fetcher<T>,
    settings: &Settings,
    index: &MasterIndex,
    packages: &[PackageSpec],
) -> Result<Vec<PackageFiles>> {
    fs::create_dir_all(&settings.out_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            settings.out_dir.display()
        )
    })?;

    println!("{} Fetching {} package(s)...", "📦".blue(), packages.len());
    packages
        .iter()
        .map(|package| fetch_package(fetcher, settings, index, package))
        .collect()
}

fn fetch_package<T: Transport>(
    fetcher: &mut Fetcher<T>,
    settings: &Settings,
    index: &MasterIndex,
    package: &PackageSpec,
) -> Result<PackageFiles> {
    let coordinates = index.locate(&package.path)?;
    let repo = settings.repo_url();
    let version = package.version.as_str();

    let group_index = fetcher
        .fetch(&coordinates.group_index_url(&repo))
        .with_context(|| format!("Failed to fetch group index for {}", coordinates.group))?;
    GroupIndex::parse(&String::from_utf8_lossy(&group_index.body))
        .with_context(|| format!("Unreadable group index for {}", coordinates.group))?
        .ensure(&coordinates, version)?;

    let mut files = Vec::new();

    let pom_path = settings.out_dir.join(coordinates.file_name(version, "pom"));
    let status = fetch_file(
        fetcher,
        &coordinates.file_url(&repo, version, "pom"),
        &pom_path,
        settings.force,
    )?;
    files.push((pom_path.clone(), status));

    let pom = fs::read(&pom_path)
        .with_context(|| format!("Failed to read {}", pom_path.display()))?;
    let packaging = Packaging::from_pom(&String::from_utf8_lossy(&pom))
        .with_context(|| format!("Unreadable POM {}", pom_path.display()))?;
    if let Some(ext) = packaging.extension() {
        let path = settings.out_dir.join(coordinates.file_name(version, ext));
        let status = fetch_file(
            fetcher,
            &coordinates.file_url(&repo, version, ext),
            &path,
            settings.force,
        )?;
        files.push((path, status));
    }

    Ok(PackageFiles {
        package: package.clone(),
        coordinates,
        files,
    })
}

/// Downloads `url` to `path`, unless the file exists and `force` is off.
fn fetch_file<T: Transport>(
    fetcher: &mut Fetcher<T>,
    url: &str,
    path: &Path,
    force: bool,
) -> Result<FileStatus> {
    if path.exists() && !force {
        println!(
            "   {} {} exists, skipping (use --force to overwrite)",
            "ℹ".blue(),
            path.display()
        );
        return Ok(FileStatus::Skipped);
    }

    let fetched = fetcher.fetch(url)?;
    fs::write(path, &fetched.body)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("   {} Wrote {}", "✓".green(), path.display());
    Ok(FileStatus::Written)
}
