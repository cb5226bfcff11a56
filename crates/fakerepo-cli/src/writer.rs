//! Materializes a generated package set on disk.
//!
//! Root files are written first, then package directories are written in
//! parallel on the rayon pool. The package set must be complete (edges
//! and build times) before this runs; nothing here touches the RNG.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use fakerepo_core::{Package, PackageSet};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::DependencyProtocol;
use crate::templates;

/// Directory under the destination holding one folder per package.
pub const PACKAGES_DIR: &str = "packages";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    pub with_turbo: bool,
    pub with_nx: bool,
    pub protocol: DependencyProtocol,
    /// Allow writing into a non-empty destination.
    pub force: bool,
    pub seed: String,
}

/// What a write produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteSummary {
    pub destination: PathBuf,
    pub root_files: Vec<String>,
    pub packages_written: usize,
    pub files_written: usize,
}

/// Write the whole repository for `set` under `destination`.
///
/// # Errors
///
/// Fails when the destination is non-empty without `force`, or on any I/O
/// error. A failure part-way through can leave some files behind.
pub fn write_repo(
    destination: &Path,
    set: &PackageSet,
    options: &WriteOptions,
) -> Result<WriteSummary> {
    ensure_destination(destination, options.force)?;

    let root_files = write_root_files(destination, set.len(), options)?;
    let packages_root = destination.join(PACKAGES_DIR);
    fs::create_dir_all(&packages_root)
        .with_context(|| format!("Failed to create {}", packages_root.display()))?;

    let packages_written = write_packages(&packages_root, set.as_slice(), options.protocol)?;

    info!(
        destination = %destination.display(),
        packages = packages_written,
        root_files = root_files.len(),
        "wrote repository"
    );

    Ok(WriteSummary {
        destination: destination.to_path_buf(),
        files_written: root_files.len() + packages_written,
        root_files,
        packages_written,
    })
}

fn ensure_destination(destination: &Path, force: bool) -> Result<()> {
    if destination.exists() {
        if !destination.is_dir() {
            bail!("{} exists and is not a directory", destination.display());
        }
        let occupied = fs::read_dir(destination)
            .with_context(|| format!("Failed to read {}", destination.display()))?
            .next()
            .is_some();
        if occupied && !force {
            bail!(
                "{} is not empty; pass --force to write into it anyway",
                destination.display()
            );
        }
    }
    fs::create_dir_all(destination)
        .with_context(|| format!("Failed to create {}", destination.display()))
}

fn write_root_files(
    destination: &Path,
    package_count: usize,
    options: &WriteOptions,
) -> Result<Vec<String>> {
    let root_manifest =
        templates::to_json_file(&templates::root_manifest(options.with_turbo, options.with_nx))?;
    let mut files: Vec<(&str, String)> = vec![
        ("fake-build.js", templates::FAKE_BUILD_SCRIPT.to_string()),
        ("package.json", root_manifest),
        ("README.md", templates::root_readme(package_count, &options.seed)),
        (".gitignore", templates::GIT_IGNORE.to_string()),
    ];
    if options.with_nx {
        files.push(("nx.json", templates::to_json_file(&templates::nx_config())?));
    }
    if options.with_turbo {
        files.push(("turbo.json", templates::to_json_file(&templates::turbo_config())?));
    }

    let mut written = Vec::with_capacity(files.len());
    for (name, content) in files {
        write_file(&destination.join(name), &content)?;
        written.push(name.to_string());
    }
    Ok(written)
}

fn write_packages(
    packages_root: &Path,
    packages: &[Package],
    protocol: DependencyProtocol,
) -> Result<usize> {
    debug!(
        packages = packages.len(),
        threads = rayon::current_num_threads(),
        "writing packages"
    );
    packages
        .par_iter()
        .try_for_each(|package| write_package(packages_root, package, protocol))?;
    Ok(packages.len())
}

/// Write one package directory: manifest plus empty `dist/` and `src/`.
fn write_package(
    packages_root: &Path,
    package: &Package,
    protocol: DependencyProtocol,
) -> Result<()> {
    let dir = packages_root.join(&package.name);
    for sub in ["dist", "src"] {
        let path = dir.join(sub);
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
    }
    let manifest = templates::to_json_file(&templates::package_manifest(package, protocol))?;
    write_file(&dir.join("package.json"), &manifest)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
