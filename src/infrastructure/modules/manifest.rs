//! Artifact manifest definition

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::application::errors::ArtifactError;

/// On-disk descriptor of one command, event or router.
///
/// ```yaml
/// export: Ping
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArtifactManifest {
    /// Catalog symbol to instantiate
    pub export: Option<String>,

    /// Free-form note for maintainers
    pub description: Option<String>,
}

impl ArtifactManifest {
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ArtifactError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// The declared export, or a clear error when there is none
    pub fn export(&self) -> Result<&str, ArtifactError> {
        match self.export.as_deref().map(str::trim) {
            Some(export) if !export.is_empty() => Ok(export),
            _ => Err(ArtifactError::MissingExport),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_export() {
        let manifest = ArtifactManifest::parse("export: Ping\ndescription: replies pong").unwrap();
        assert_eq!(manifest.export().unwrap(), "Ping");
        assert_eq!(manifest.description.as_deref(), Some("replies pong"));
    }

    #[test]
    fn test_missing_export() {
        let manifest = ArtifactManifest::parse("description: nothing here").unwrap();
        assert!(matches!(manifest.export(), Err(ArtifactError::MissingExport)));
    }

    #[test]
    fn test_blank_export() {
        let manifest = ArtifactManifest::parse("export: \"  \"").unwrap();
        assert!(matches!(manifest.export(), Err(ArtifactError::MissingExport)));
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            ArtifactManifest::parse("export: [unterminated"),
            Err(ArtifactError::Manifest(_))
        ));
    }
}
