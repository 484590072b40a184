//! Error types.
//!
//! Only one failure is hard: a script that cannot be read, since no registry
//! can be built without it. Everything that goes wrong while reading result
//! artifacts is an [`AbsentReason`] attached to the affected variable.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Scan result type.
pub type Result<T> = std::result::Result<T, ScanError>;

/// Hard failures of a scan pass.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot read script {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a registered variable has no value.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum AbsentReason {
    /// The expected artifact does not exist in the result directory.
    #[error("missing output file '{file}'")]
    MissingArtifact { file: String },

    /// The artifact exists but holds no usable number.
    #[error("cannot read a value from '{file}': {detail}")]
    UnparsableScalar { file: String, detail: String },

    /// A header table has no column for the variable.
    #[error("no column matching '{variable}' in '{file}'")]
    UnmatchedColumn { file: String, variable: String },

    /// The table could not be read at all.
    #[error("malformed table '{file}': {detail}")]
    MalformedInput { file: String, detail: String },
}

impl AbsentReason {
    /// True when the artifact exists but its content could not be used.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::UnparsableScalar { .. } | Self::MalformedInput { .. })
    }

    pub(crate) fn missing(file: impl Into<String>) -> Self {
        Self::MissingArtifact { file: file.into() }
    }

    pub(crate) fn unparsable(file: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::UnparsableScalar { file: file.into(), detail: detail.into() }
    }

    pub(crate) fn malformed(file: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::MalformedInput { file: file.into(), detail: detail.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unusable_content_is_corrupt() {
        assert!(AbsentReason::unparsable("a.txt", "content 'x'").is_corrupt());
        assert!(AbsentReason::malformed("t.csv", "empty table").is_corrupt());
        assert!(!AbsentReason::missing("a.txt").is_corrupt());
        let unmatched = AbsentReason::UnmatchedColumn { file: "t.csv".into(), variable: "DX".into() };
        assert!(!unmatched.is_corrupt());
    }
}
