//! Document decoding and the canonical encoding used for change detection.

use crate::error::{ConfigError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

/// On-disk serialization format, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// `.yaml` / `.yml`
    #[cfg(feature = "yaml")]
    Yaml,
    /// `.toml`
    #[cfg(feature = "toml")]
    Toml,
    /// `.json`
    Json,
}

impl DocumentFormat {
    /// Detect the format from a path's file extension.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedFormat`] if the path has no
    /// extension or the extension is not a supported (and enabled) format.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                ConfigError::UnsupportedFormat(format!("no file extension: {}", path.display()))
            })?;

        match extension {
            #[cfg(feature = "yaml")]
            "yaml" | "yml" => Ok(Self::Yaml),
            #[cfg(feature = "toml")]
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Decode raw file bytes into a document value.
///
/// # Errors
///
/// Returns [`ConfigError::Decode`] if the bytes are not valid for the format
/// or do not match the shape of `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8], format: DocumentFormat) -> Result<T> {
    match format {
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => serde_yaml::from_slice(bytes).map_err(|e| ConfigError::Decode {
            format: "YAML",
            message: e.to_string(),
        }),
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => {
            let text = std::str::from_utf8(bytes).map_err(|e| ConfigError::Decode {
                format: "TOML",
                message: e.to_string(),
            })?;
            toml::from_str(text).map_err(|e| ConfigError::Decode {
                format: "TOML",
                message: e.to_string(),
            })
        }
        DocumentFormat::Json => serde_json::from_slice(bytes).map_err(|e| ConfigError::Decode {
            format: "JSON",
            message: e.to_string(),
        }),
    }
}

/// Canonical byte encoding of a document, used solely for equality
/// comparison between the currently held value and a freshly decoded one.
///
/// Compact JSON regardless of the on-disk format, so a formatting-only
/// rewrite of the file never counts as a change. The encoding is never
/// written to disk.
///
/// # Errors
///
/// Returns [`ConfigError::Encode`] if the document cannot be serialized
/// (for example, a map with non-string keys).
pub fn canonical_bytes<T: Serialize>(document: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(document).map_err(ConfigError::Encode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::path::PathBuf;

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn detects_format_from_extension() {
        #[cfg(feature = "yaml")]
        {
            assert_eq!(
                DocumentFormat::from_path(Path::new("config.yaml")).unwrap(),
                DocumentFormat::Yaml
            );
            assert_eq!(
                DocumentFormat::from_path(Path::new("config.yml")).unwrap(),
                DocumentFormat::Yaml
            );
        }
        #[cfg(feature = "toml")]
        assert_eq!(
            DocumentFormat::from_path(Path::new("config.toml")).unwrap(),
            DocumentFormat::Toml
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("config.json")).unwrap(),
            DocumentFormat::Json
        );
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = DocumentFormat::from_path(Path::new("config.ini")).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn rejects_missing_extension() {
        let err = DocumentFormat::from_path(&PathBuf::from("config")).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn decodes_json() {
        let sample: Sample =
            decode(br#"{"name": "a", "count": 3}"#, DocumentFormat::Json).unwrap();
        assert_eq!(
            sample,
            Sample {
                name: "a".to_string(),
                count: 3
            }
        );
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn decodes_yaml() {
        let sample: Sample = decode(b"name: a\ncount: 3\n", DocumentFormat::Yaml).unwrap();
        assert_eq!(sample.name, "a");
        assert_eq!(sample.count, 3);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn decodes_toml() {
        let sample: Sample = decode(b"name = \"a\"\ncount = 3\n", DocumentFormat::Toml).unwrap();
        assert_eq!(sample.name, "a");
        assert_eq!(sample.count, 3);
    }

    #[test]
    fn decode_reports_malformed_content() {
        let err = decode::<Sample>(b"{not json", DocumentFormat::Json).unwrap_err();
        assert!(matches!(err, ConfigError::Decode { format: "JSON", .. }));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn decode_reports_shape_mismatch() {
        // Valid YAML, wrong shape for the target type.
        let err = decode::<Sample>(b"name: a\ncount: not-a-number\n", DocumentFormat::Yaml)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Decode { format: "YAML", .. }));
    }

    #[test]
    fn canonical_encoding_is_stable_across_formats() {
        #[cfg(all(feature = "yaml", feature = "toml"))]
        {
            let from_yaml: Sample = decode(b"name: a\ncount: 3\n", DocumentFormat::Yaml).unwrap();
            let from_toml: Sample =
                decode(b"name = \"a\"\ncount = 3\n", DocumentFormat::Toml).unwrap();
            assert_eq!(
                canonical_bytes(&from_yaml).unwrap(),
                canonical_bytes(&from_toml).unwrap()
            );
        }

        let a = Sample {
            name: "a".to_string(),
            count: 3,
        };
        let b = Sample {
            name: "a".to_string(),
            count: 4,
        };
        assert_eq!(canonical_bytes(&a).unwrap(), canonical_bytes(&a).unwrap());
        assert_ne!(canonical_bytes(&a).unwrap(), canonical_bytes(&b).unwrap());
    }
}
