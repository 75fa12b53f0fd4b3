//! Mescla traduções de um catálogo gettext (.po) num documento Fluent (.ftl).
//!
//! Cada mensagem cujo valor é texto simples é procurada no catálogo pelo texto
//! original; o documento resultante mantém a ordem e o espaçamento do original.

pub mod error;
pub mod model;
pub mod parsers;
pub mod services;

pub use error::{CatalogError, ConvertError, MergeError};
pub use model::request::ConvertRequest;
pub use services::convert::{convert, merge};
