use std::fs;
use std::path::Path;

use crate::error::{ConvertError, MergeError};
use crate::model::catalog::{Catalog, Translations, DEFAULT_CONTEXT};
use crate::model::fluent::Resource;
use crate::model::request::ConvertRequest;
use crate::parsers::{fluent, po};
use crate::services::{encoding, rebuild};

/// Lê o catálogo e o documento Fluent e devolve o documento traduzido.
///
/// Ou o documento sai completo, ou sai um erro; nunca um resultado parcial.
pub fn convert(request: &ConvertRequest) -> Result<String, ConvertError> {
    tracing::debug!(
        catalog = %request.catalog_path.display(),
        fluent = %request.fluent_path.display(),
        "converting"
    );

    let catalog = load_catalog(&request.catalog_path)?;
    let resource = load_fluent(&request.fluent_path)?;

    Ok(merge(&catalog, &resource)?)
}

/// Mescla em memória, usando só o contexto padrão do catálogo.
pub fn merge(catalog: &Catalog, resource: &Resource) -> Result<String, MergeError> {
    rebuild::rebuild(&resource.body, default_translations(catalog))
}

pub fn default_translations(catalog: &Catalog) -> &Translations {
    static EMPTY: std::sync::OnceLock<Translations> = std::sync::OnceLock::new();

    match catalog.context(DEFAULT_CONTEXT) {
        Some(t) => t,
        None => {
            tracing::warn!("catalog has no default context, nothing will be translated");
            EMPTY.get_or_init(Translations::new)
        }
    }
}

pub fn load_catalog(path: &Path) -> Result<Catalog, ConvertError> {
    let bytes = read(path)?;
    let (text, enc) = encoding::decode_catalog(&bytes);
    tracing::debug!(path = %path.display(), encoding = enc.name(), "decoded catalog");

    po::parse(&text).map_err(|source| ConvertError::Catalog {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_fluent(path: &Path) -> Result<Resource, ConvertError> {
    let bytes = read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(parse_fluent(&text))
}

/// Normaliza as quebras de linha (e o BOM) antes de analisar.
pub fn parse_fluent(text: &str) -> Resource {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    fluent::parse(&encoding::normalize_newlines(text))
}

fn read(path: &Path) -> Result<Vec<u8>, ConvertError> {
    fs::read(path).map_err(|source| ConvertError::Read {
        path: path.to_path_buf(),
        source,
    })
}
