use crate::error::MergeError;
use crate::model::catalog::Translations;
use crate::model::fluent::Entry;
use crate::services::{spacing, transcode};

/// Monta o documento traduzido, entrada por entrada, na ordem original.
///
/// Entre duas entradas vai o mesmo espaçamento do original, mesmo quando uma
/// delas sai vazia. Qualquer entrada não suportada aborta tudo.
pub fn rebuild(entries: &[Entry], translations: &Translations) -> Result<String, MergeError> {
    let mut out: Vec<String> = Vec::with_capacity(entries.len() * 2);
    let mut kept = 0usize;

    for (i, entry) in entries.iter().enumerate() {
        let text = transcode::transcode(entry, translations)?;
        if !text.is_empty() {
            kept += 1;
        }
        out.push(text);

        if let Some(next) = entries.get(i + 1) {
            out.push(spacing::gap(entry.span(), next.span()));
        }
    }

    tracing::info!(
        entries = entries.len(),
        translated = kept,
        dropped = entries.len() - kept,
        "rebuilt Fluent document"
    );

    Ok(out.concat())
}
