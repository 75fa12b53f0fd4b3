use std::borrow::Cow;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};

use crate::parsers::po;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Decodifica os bytes de um catálogo PO.
///
/// Ordem: BOM UTF-8, `charset=` do cabeçalho, UTF-8 válido, e por fim chardetng.
pub fn decode_catalog(bytes: &[u8]) -> (String, &'static Encoding) {
    if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        let (text, _) = UTF_8.decode_without_bom_handling(rest);
        return (text.into_owned(), UTF_8);
    }

    // O cabeçalho é ASCII em qualquer charset suportado pelo gettext.
    let declared = po::sniff_charset(&String::from_utf8_lossy(head(bytes)))
        .and_then(|label| Encoding::for_label(label.as_bytes()));

    if let Some(encoding) = declared {
        let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
        if had_errors {
            tracing::warn!(encoding = encoding.name(), "catalog has bytes invalid for its declared charset");
        }
        return (text.into_owned(), encoding);
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return (text.to_string(), UTF_8);
    }

    let encoding = guess(bytes);
    tracing::warn!(
        encoding = encoding.name(),
        "catalog declares no usable charset, falling back to detection"
    );
    let (text, _) = encoding.decode_without_bom_handling(bytes);
    (text.into_owned(), encoding)
}

/// Normaliza CRLF/CR para LF; os spans do Fluent são calculados sobre o texto normalizado.
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

fn guess(bytes: &[u8]) -> &'static Encoding {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

// O cabeçalho fica no começo do arquivo
fn head(bytes: &[u8]) -> &[u8] {
    &bytes[..bytes.len().min(4096)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_utf8_bom() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("msgid \"é\"".as_bytes());
        let (text, encoding) = decode_catalog(&bytes);
        assert_eq!(text, "msgid \"é\"");
        assert_eq!(encoding, UTF_8);
    }

    #[test]
    fn honours_declared_charset() {
        let mut bytes = b"msgid \"\"\nmsgstr \"Content-Type: text/plain; charset=ISO-8859-1\\n\"\n\nmsgid \"caf".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"\"\n");
        let (text, encoding) = decode_catalog(&bytes);
        assert!(text.contains("caf\u{e9}"));
        assert_eq!(encoding.name(), "windows-1252");
    }

    #[test]
    fn plain_utf8_without_header() {
        let (text, encoding) = decode_catalog("msgid \"ñ\"".as_bytes());
        assert_eq!(text, "msgid \"ñ\"");
        assert_eq!(encoding, UTF_8);
    }

    #[test]
    fn normalizes_crlf() {
        assert_eq!(normalize_newlines("a = b\r\nc = d\r\n"), "a = b\nc = d\n");
        assert!(matches!(normalize_newlines("a = b\n"), Cow::Borrowed(_)));
    }

    #[test]
    fn undeclared_legacy_bytes_are_detected() {
        let mut bytes = b"msgid \"Caf".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"\"\nmsgstr \"Caf");
        bytes.push(0xE9);
        bytes.extend_from_slice(b"\"\n");
        let (text, encoding) = decode_catalog(&bytes);
        assert_ne!(encoding, UTF_8);
        assert!(!text.contains('\u{fffd}'));
    }
}
