use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use strsim::jaro_winkler;

use crate::pkg::builtins;
use crate::pkg::error::PkgError;
use crate::pkg::manifest::Manifest;

/// Conventional vendored-modules location under the workspace root.
pub fn vendor_root(workspace_root: &Path) -> PathBuf {
    workspace_root.join("packages").join("node_modules")
}

fn vendored_version(workspace_root: &Path, name: &str) -> Option<String> {
    let mut path = vendor_root(workspace_root);
    for segment in name.split('/') {
        path.push(segment);
    }
    path.push("package.json");
    Manifest::load(&path).ok()?.version
}

fn best_name_match<'a>(
    needle: &str,
    candidates: impl IntoIterator<Item = &'a String>,
) -> Option<String> {
    let mut best: Option<(f64, &str)> = None;
    for c in candidates {
        let score = jaro_winkler(needle, c);
        if best.map(|(s, _)| score > s).unwrap_or(true) {
            best = Some((score, c.as_str()));
        }
    }
    match best {
        Some((score, name)) if score >= 0.84 => Some(name.to_string()),
        _ => None,
    }
}

/// Map every non-builtin external name to a version string. Precedence:
/// root `dependencies`, `devDependencies`, `optionalDependencies`, then the
/// vendored copy's own manifest version. A name with no source at all is
/// fatal; the error names the module.
pub fn versions_for(
    root: &Manifest,
    workspace_root: &Path,
    names: &BTreeSet<String>,
) -> anyhow::Result<BTreeMap<String, String>> {
    let mut out = BTreeMap::new();
    for name in names {
        if builtins::is_builtin(name) {
            continue;
        }
        let declared = root
            .dependencies
            .get(name)
            .or_else(|| root.dev_dependencies.get(name))
            .or_else(|| root.optional_dependencies.get(name));
        let version = match declared {
            Some(v) => v.clone(),
            None => match vendored_version(workspace_root, name) {
                Some(v) => v,
                None => {
                    let known = root
                        .dependencies
                        .keys()
                        .chain(root.dev_dependencies.keys())
                        .chain(root.optional_dependencies.keys());
                    let hint =
                        best_name_match(name, known).map(|m| format!("did you mean \"{}\"?", m));
                    return Err(PkgError::MissingVersion {
                        name: name.clone(),
                        hint,
                    }
                    .into());
                }
            },
        };
        out.insert(name.clone(), version);
    }
    Ok(out)
}
