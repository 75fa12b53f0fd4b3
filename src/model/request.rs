use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Entradas de uma conversão: o catálogo PO e o documento Fluent de origem.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ConvertRequest {
    #[serde(alias = "po")]
    pub catalog_path: PathBuf,

    #[serde(alias = "ftl")]
    pub fluent_path: PathBuf,
}

impl ConvertRequest {
    pub fn new(catalog_path: impl Into<PathBuf>, fluent_path: impl Into<PathBuf>) -> Self {
        ConvertRequest {
            catalog_path: catalog_path.into(),
            fluent_path: fluent_path.into(),
        }
    }
}
