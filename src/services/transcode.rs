use crate::error::MergeError;
use crate::model::catalog::Translations;
use crate::model::fluent::{Entry, Message};
use crate::services::lookup;

/// Texto de saída de uma entrada; vazio quando ela some do documento.
pub fn transcode(entry: &Entry, translations: &Translations) -> Result<String, MergeError> {
    match entry {
        Entry::Message(message) => Ok(message_text(message, translations)),

        // Termos e comentários soltos não são migrados.
        Entry::Term(_) | Entry::Comment(_) | Entry::GroupComment(_) => Ok(String::new()),

        Entry::ResourceComment(_) | Entry::Junk(_) => {
            tracing::error!(kind = %entry.kind(), span = ?entry.span(), "unhandled Fluent entry");
            Err(MergeError::UnsupportedEntry {
                kind: entry.kind(),
                span: entry.span(),
            })
        }
    }
}

pub fn message_text(message: &Message, translations: &Translations) -> String {
    let value = lookup::localized(message.value.as_ref(), translations);

    if value.is_empty() && message.attributes.is_empty() {
        tracing::debug!(id = %message.id, "message has no translation, dropping");
        return String::new();
    }

    let attributes: Vec<String> = message
        .attributes
        .iter()
        .filter_map(|attr| {
            let localized = lookup::localized(Some(&attr.value), translations);
            if localized.is_empty() {
                tracing::debug!(id = %message.id, attribute = %attr.id, "attribute has no translation");
                None
            } else {
                Some(format!("  .{} = {}", attr.id, localized))
            }
        })
        .collect();

    if value.is_empty() && attributes.is_empty() {
        tracing::debug!(id = %message.id, "message and attributes have no translation, dropping");
        return String::new();
    }

    let mut lines: Vec<String> = Vec::with_capacity(attributes.len() + 2);

    if let Some(comment) = &message.comment {
        lines.extend(comment.content.split('\n').map(|line| match line {
            "" => "#".to_string(),
            _ => format!("# {line}"),
        }));
    }

    lines.push(format!("{} = {}", message.id, value));
    lines.extend(attributes);

    lines.join("\n")
}
