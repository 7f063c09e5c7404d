use std::path::PathBuf;
use thiserror::Error;

/// Fatal, user-facing conditions of the dependency-update pipeline. Anything
/// not covered here (I/O, JSON parsing) propagates as a plain anyhow error.
#[derive(Debug, Error)]
pub enum PkgError {
    #[error("cannot resolve {}: no such file, directory index, or .js sibling", path.display())]
    Unresolvable { path: PathBuf },

    #[error("cannot determine entrypoint for {0}")]
    EntrypointUndetermined(String),

    #[error("failed to determine version for {name}; is it missing from package.json?{}", format_hint(hint))]
    MissingVersion { name: String, hint: Option<String> },
}

fn format_hint(hint: &Option<String>) -> String {
    match hint {
        Some(h) => format!(" ({})", h),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = PkgError::Unresolvable {
            path: PathBuf::from("/ws/pkg/lib/missing"),
        };
        assert!(err.to_string().contains("cannot resolve"));
        assert!(err.to_string().contains("lib/missing"));

        let err = PkgError::EntrypointUndetermined("sdk-core".to_string());
        assert!(err.to_string().contains("entrypoint"));
        assert!(err.to_string().contains("sdk-core"));

        let err = PkgError::MissingVersion {
            name: "left-pad".to_string(),
            hint: None,
        };
        assert!(err.to_string().contains("left-pad"));
        assert!(err.to_string().contains("missing from package.json"));

        let err = PkgError::MissingVersion {
            name: "lodsh".to_string(),
            hint: Some("did you mean \"lodash\"?".to_string()),
        };
        assert!(err.to_string().contains("lodsh"));
        assert!(err.to_string().contains("did you mean \"lodash\"?"));
    }
}
