use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Question catalog source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// TOML file with `[[questions]]` entries (None = built-in questions).
    #[serde(default)]
    pub path: Option<PathBuf>,
}
