use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

/// Typed view of a package.json. Only the fields the pipeline consults are
/// modeled; write-back goes through the raw document, so every other field
/// survives a rewrite untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default)]
    pub bin: Option<Bin>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: BTreeMap<String, String>,
    #[serde(default, rename = "optionalDependencies")]
    pub optional_dependencies: BTreeMap<String, String>,
}

/// `bin` is either one path or a command-name map of paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Bin {
    Single(String),
    Named(BTreeMap<String, String>),
}

impl Bin {
    pub fn paths(&self) -> Vec<&str> {
        match self {
            Bin::Single(path) => vec![path.as_str()],
            Bin::Named(map) => map.values().map(|p| p.as_str()).collect(),
        }
    }
}

impl Manifest {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))
    }
}

/// Replace the `dependencies` key of the manifest at `path`, leaving every
/// other key and its position intact. Serialization is two-space pretty
/// print with a trailing newline.
pub fn rewrite_dependencies(path: &Path, deps: &BTreeMap<String, String>) -> anyhow::Result<()> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let mut doc: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))?;
    let obj = doc
        .as_object_mut()
        .with_context(|| format!("{} is not a JSON object", path.display()))?;
    obj.insert("dependencies".to_string(), serde_json::to_value(deps)?);
    let mut out = serde_json::to_string_pretty(&doc)?;
    out.push('\n');
    fs::write(path, out).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Bin, Manifest, rewrite_dependencies};
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(prefix: &str) -> PathBuf {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time drift")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "depsync-{}-{}-{}",
            prefix,
            std::process::id(),
            nonce
        ))
    }

    #[test]
    fn parses_bin_as_single_path_or_map() {
        let single: Manifest =
            serde_json::from_str(r#"{"name": "a", "bin": "./cli.js"}"#).expect("single bin");
        assert_eq!(single.bin.expect("bin").paths(), vec!["./cli.js"]);

        let named: Manifest = serde_json::from_str(
            r#"{"name": "b", "bin": {"b": "./bin/b.js", "b-admin": "./bin/admin.js"}}"#,
        )
        .expect("named bin");
        let named_bin = named.bin.expect("bin");
        let mut paths = named_bin.paths();
        paths.sort();
        assert_eq!(paths, vec!["./bin/admin.js", "./bin/b.js"]);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let m: Manifest = serde_json::from_str(r#"{"name": "bare"}"#).expect("parse");
        assert!(m.main.is_none());
        assert!(m.bin.is_none());
        assert!(m.dependencies.is_empty());
        assert!(m.dev_dependencies.is_empty());
        assert!(m.optional_dependencies.is_empty());
    }

    #[test]
    fn rewrite_replaces_dependencies_and_preserves_other_keys_in_order() {
        let root = temp_dir("manifest-rewrite");
        fs::create_dir_all(&root).expect("mkdir");
        let path = root.join("package.json");
        fs::write(
            &path,
            concat!(
                "{\n",
                "  \"name\": \"sdk-core\",\n",
                "  \"version\": \"3.1.0\",\n",
                "  \"dependencies\": {\n",
                "    \"stale\": \"0.0.1\"\n",
                "  },\n",
                "  \"scripts\": {\n",
                "    \"test\": \"mocha\"\n",
                "  }\n",
                "}\n"
            ),
        )
        .expect("write manifest");

        let mut deps = BTreeMap::new();
        deps.insert("left-pad".to_string(), "^1.3.0".to_string());
        rewrite_dependencies(&path, &deps).expect("rewrite");

        let out = fs::read_to_string(&path).expect("read back");
        assert!(out.ends_with("}\n"), "must keep a trailing newline");
        assert!(out.contains("  \"name\""), "two-space indentation");
        assert!(!out.contains("stale"), "old dependencies replaced");
        assert!(out.contains("\"left-pad\": \"^1.3.0\""));

        let name = out.find("\"name\"").expect("name key");
        let version = out.find("\"version\"").expect("version key");
        let deps_key = out.find("\"dependencies\"").expect("dependencies key");
        let scripts = out.find("\"scripts\"").expect("scripts key");
        assert!(
            name < version && version < deps_key && deps_key < scripts,
            "key order must survive the rewrite"
        );

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn rewrite_adds_dependencies_when_absent() {
        let root = temp_dir("manifest-add");
        fs::create_dir_all(&root).expect("mkdir");
        let path = root.join("package.json");
        fs::write(&path, "{\n  \"name\": \"fresh\"\n}\n").expect("write manifest");

        let mut deps = BTreeMap::new();
        deps.insert("lodash".to_string(), "^4.17.21".to_string());
        rewrite_dependencies(&path, &deps).expect("rewrite");

        let doc: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).expect("read back")).expect("json");
        assert_eq!(doc["dependencies"]["lodash"], "^4.17.21");
        assert_eq!(doc["name"], "fresh");

        let _ = fs::remove_dir_all(root);
    }
}
