//! Read-only table of AMP extension components, keyed by AMP tag name.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

const BUILTIN_EXTENSIONS: &str = include_str!("extensions.toml");

pub const AMP_PREFIX: &str = "amp-";
pub const BENTO_PREFIX: &str = "bento-";

/// Capabilities of one AMP extension.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtensionSpec {
    /// A standalone Bento build of this component exists.
    #[serde(default)]
    pub bento: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum SpecTableError {
    #[error("failed to read component spec table {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid component spec table: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("extension name {0:?} does not start with `amp-`")]
    InvalidExtensionName(String),
}

#[derive(Deserialize)]
struct SpecTableFile {
    #[serde(default)]
    extensions: BTreeMap<String, ExtensionSpec>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComponentSpecTable {
    extensions: BTreeMap<String, ExtensionSpec>,
}

impl ComponentSpecTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table of AMP extensions shipped with this crate.
    pub fn builtin() -> Arc<ComponentSpecTable> {
        static BUILTIN: OnceLock<Arc<ComponentSpecTable>> = OnceLock::new();
        BUILTIN
            .get_or_init(|| {
                Arc::new(
                    ComponentSpecTable::from_toml_str(BUILTIN_EXTENSIONS)
                        .expect("built-in extension table is valid"),
                )
            })
            .clone()
    }

    /// Parse a table of the form:
    ///
    /// ```toml
    /// [extensions.amp-accordion]
    /// bento = true
    /// ```
    pub fn from_toml_str(input: &str) -> Result<Self, SpecTableError> {
        let file: SpecTableFile = toml::from_str(input)?;
        if let Some(bad) = file
            .extensions
            .keys()
            .find(|name| !name.starts_with(AMP_PREFIX))
        {
            return Err(SpecTableError::InvalidExtensionName(bad.clone()));
        }
        Ok(Self {
            extensions: file.extensions,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SpecTableError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| SpecTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_toml_str(&input)?;
        log::debug!(
            target: "amp.specs",
            "loaded {} extension specs from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Builder-style insert, mostly for tests and embedders assembling tables in code.
    pub fn with_extension(mut self, amp_name: impl Into<String>, spec: ExtensionSpec) -> Self {
        self.extensions.insert(amp_name.into(), spec);
        self
    }

    pub fn contains(&self, amp_name: &str) -> bool {
        self.extensions.contains_key(amp_name)
    }

    pub fn get(&self, amp_name: &str) -> Option<&ExtensionSpec> {
        self.extensions.get(amp_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExtensionSpec)> {
        self.extensions.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}
