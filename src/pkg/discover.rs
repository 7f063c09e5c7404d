use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

/// Recursively scan for package boundaries under `root`. A directory that
/// contains a package.json is a package, and its subdirectories are not
/// scanned as independent packages. Results are sorted.
pub fn find_packages(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> anyhow::Result<()> {
        for ent in fs::read_dir(dir).with_context(|| format!("read_dir {}", dir.display()))? {
            let ent = ent?;
            let p = ent.path();
            if !p.is_dir() {
                continue;
            }
            if p.join("package.json").is_file() {
                out.push(p);
            } else {
                walk(&p, out)?;
            }
        }
        Ok(())
    }

    let mut out = vec![];
    walk(root, &mut out)?;
    out.sort();
    Ok(out)
}
