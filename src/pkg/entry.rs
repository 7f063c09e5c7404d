use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::pkg::error::PkgError;
use crate::pkg::manifest::Manifest;
use crate::pkg::walk::{self, INDEX_FILE, WalkContext};

/// Normalize either form of package path into (directory, manifest path).
/// Accepts the package root or its package.json directly.
pub fn manifest_location(package_path: &Path) -> anyhow::Result<(PathBuf, PathBuf)> {
    let manifest_path = if package_path.is_dir() {
        package_path.join("package.json")
    } else {
        package_path.to_path_buf()
    };
    let dir = manifest_path
        .parent()
        .with_context(|| format!("{} has no parent directory", manifest_path.display()))?
        .to_path_buf();
    Ok((dir, manifest_path))
}

/// Resolve a package's entry points and walk each one, returning the union
/// of external module names. Precedence: `main`, else every `bin` value,
/// else a conventional index file.
///
/// One WalkContext spans all of the package's entry points, so a file
/// shared between two bin scripts is walked once.
pub fn package_deps(package_path: &Path) -> anyhow::Result<BTreeSet<String>> {
    let (dir, manifest_path) = manifest_location(package_path)?;
    let manifest = Manifest::load(&manifest_path)?;
    let mut ctx = WalkContext::new();
    let mut deps = BTreeSet::new();

    if let Some(main) = &manifest.main {
        walk::walk_file(&mut ctx, &walk::normalize_path(&dir.join(main)), &mut deps)?;
        return Ok(deps);
    }

    if let Some(bin) = &manifest.bin {
        for path in bin.paths() {
            walk::walk_file(&mut ctx, &walk::normalize_path(&dir.join(path)), &mut deps)?;
        }
        return Ok(deps);
    }

    let index = dir.join(INDEX_FILE);
    if index.is_file() {
        walk::walk_file(&mut ctx, &index, &mut deps)?;
        return Ok(deps);
    }

    let package = manifest
        .name
        .clone()
        .unwrap_or_else(|| dir.display().to_string());
    Err(PkgError::EntrypointUndetermined(package).into())
}
