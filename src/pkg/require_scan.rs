use regex::Regex;

/// Extract the module specifiers referenced by a JS source file, in textual
/// order: `require(...)` arguments plus static `import`/`export ... from`
/// sources. Duplicates are kept; callers accumulate into a set.
pub fn scan_refs_in_text(src: &str) -> Vec<String> {
    let re = Regex::new(
        r#"(?x)
        \brequire\s*\(\s*["'`]([^"'`]+)["'`]\s*\)
        | \b(?:import|export)\b[^;"'`]*?\bfrom\s*["']([^"']+)["']
        | \bimport\s*["']([^"']+)["']
        "#,
    )
    .unwrap();
    re.captures_iter(src)
        .filter_map(|c| {
            c.get(1)
                .or_else(|| c.get(2))
                .or_else(|| c.get(3))
                .map(|m| m.as_str().to_string())
        })
        .collect()
}
