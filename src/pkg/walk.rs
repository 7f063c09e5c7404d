// Purpose: Walk a package's local require-graph and accumulate external module names.
// Inputs/Outputs: Consumes resolved file paths, produces normalized top-level package names.
// Invariants: The visited set guarantees termination on cyclic and diamond-shaped graphs.
// Gotchas: Path repair runs during resolution, so only concrete file paths are marked visited.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use anyhow::Context;

use crate::pkg::error::PkgError;
use crate::pkg::require_scan;

pub const INDEX_FILE: &str = "index.js";
pub const SOURCE_EXT: &str = "js";

/// Traversal state for one package's full set of entry points. Scoping the
/// visited set here keeps concurrent per-package runs independent: a file
/// reachable from two packages is walked once per package.
#[derive(Debug, Default)]
pub struct WalkContext {
    visited: HashSet<PathBuf>,
}

impl WalkContext {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathKind {
    File,
    Dir,
    Missing,
}

fn path_kind(p: &Path) -> anyhow::Result<PathKind> {
    match fs::metadata(p) {
        Ok(md) if md.is_dir() => Ok(PathKind::Dir),
        Ok(_) => Ok(PathKind::File),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(PathKind::Missing),
        Err(err) => Err(err).with_context(|| format!("stat {}", p.display())),
    }
}

fn with_source_ext(p: &Path) -> PathBuf {
    let mut s = p.as_os_str().to_os_string();
    s.push(".");
    s.push(SOURCE_EXT);
    PathBuf::from(s)
}

/// Collapse `.` and `..` components without touching the filesystem.
pub fn normalize_path(p: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for part in p.components() {
        match part {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Fallback chain over resolution strategies: the path as a file, its
/// directory index, then the path with the source extension appended.
fn resolve_source_path(path: &Path) -> anyhow::Result<PathBuf> {
    match path_kind(path)? {
        PathKind::File => return Ok(path.to_path_buf()),
        PathKind::Dir => {
            let index = path.join(INDEX_FILE);
            if path_kind(&index)? == PathKind::File {
                return Ok(index);
            }
        }
        PathKind::Missing => {
            if path.extension().and_then(|e| e.to_str()) != Some(SOURCE_EXT) {
                let with_ext = with_source_ext(path);
                if path_kind(&with_ext)? == PathKind::File {
                    return Ok(with_ext);
                }
            }
        }
    }
    Err(PkgError::Unresolvable {
        path: path.to_path_buf(),
    }
    .into())
}

fn is_local(spec: &str) -> bool {
    spec.starts_with('.')
}

/// `@scope/name/sub...` keeps the first two segments, anything else keeps
/// the first; subpaths never reach the output.
pub fn external_name(spec: &str) -> String {
    let mut segments = spec.split('/').filter(|s| !s.is_empty());
    match segments.next() {
        Some(scope) if scope.starts_with('@') => match segments.next() {
            Some(name) => format!("{}/{}", scope, name),
            None => scope.to_string(),
        },
        Some(first) => first.to_string(),
        None => spec.to_string(),
    }
}

/// Walk the local require-graph from `path`, adding every normalized
/// external module name reachable through relative specifiers to `out`.
/// Builtin names are collected too; the version resolver filters them.
pub fn walk_file(
    ctx: &mut WalkContext,
    path: &Path,
    out: &mut BTreeSet<String>,
) -> anyhow::Result<()> {
    let resolved = resolve_source_path(path)?;
    if !ctx.visited.insert(resolved.clone()) {
        return Ok(());
    }
    let text =
        fs::read_to_string(&resolved).with_context(|| format!("read {}", resolved.display()))?;
    let dir = resolved
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    for spec in require_scan::scan_refs_in_text(&text) {
        if is_local(&spec) {
            let target = normalize_path(&dir.join(&spec));
            walk_file(ctx, &target, out)?;
        } else {
            out.insert(external_name(&spec));
        }
    }
    Ok(())
}
