// Purpose: Drive the per-package pipeline (walk, resolve versions, rewrite manifest).
// Inputs/Outputs: Consumes a workspace root and root manifest, rewrites package manifests in place.
// Invariants: Batch mode gives every package its own traversal context; first failure aborts.
// Gotchas: Manifests rewritten before a batch failure stay rewritten.

use std::path::{Path, PathBuf};
use std::thread;

use anyhow::anyhow;

use crate::pkg::discover;
use crate::pkg::entry;
use crate::pkg::manifest::{self, Manifest};
use crate::pkg::versions;

/// Path fragment marking legacy packages excluded from batch runs.
const LEGACY_EXCLUDE: &str = "widget";

fn update_job_count(task_count: usize) -> usize {
    if task_count == 0 {
        return 1;
    }
    let from_env = std::env::var("DEPSYNC_JOBS")
        .ok()
        .and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|n| *n > 0);
    let default = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4);
    from_env.unwrap_or(default).clamp(1, task_count)
}

/// Rewrite one package's `dependencies` from its require-graph.
pub fn update_single_package(
    workspace_root: &Path,
    root_manifest: &Manifest,
    package_path: &Path,
) -> anyhow::Result<()> {
    let (_dir, manifest_path) = entry::manifest_location(package_path)?;
    let deps = entry::package_deps(package_path)?;
    let resolved = versions::versions_for(root_manifest, workspace_root, &deps)?;
    manifest::rewrite_dependencies(&manifest_path, &resolved)?;
    eprintln!("updated {}", manifest_path.display());
    Ok(())
}

/// Update every package under the workspace's vendored-packages tree,
/// excluding legacy paths. Packages run on scoped worker threads in chunks;
/// joining a chunk surfaces the first failure and abandons the batch.
pub fn update_all_packages(workspace_root: &Path, root_manifest: &Manifest) -> anyhow::Result<()> {
    let packages: Vec<PathBuf> = discover::find_packages(&versions::vendor_root(workspace_root))?
        .into_iter()
        .filter(|p| !p.to_string_lossy().contains(LEGACY_EXCLUDE))
        .collect();

    let jobs = update_job_count(packages.len());
    for chunk in packages.chunks(jobs) {
        thread::scope(|scope| -> anyhow::Result<()> {
            let mut handles = Vec::with_capacity(chunk.len());
            for package in chunk {
                handles.push((
                    package,
                    scope.spawn(move || {
                        update_single_package(workspace_root, root_manifest, package)
                    }),
                ));
            }
            for (package, h) in handles {
                let joined = h
                    .join()
                    .map_err(|_| anyhow!("update worker panicked for {}", package.display()))?;
                joined?;
            }
            Ok(())
        })?;
    }
    Ok(())
}
