use crate::model::catalog::Translations;
use crate::model::fluent::{Pattern, PatternElement};

/// Texto do padrão quando ele é um único elemento de texto não vazio.
pub fn simple_text(pattern: &Pattern) -> Option<&str> {
    match pattern.elements.as_slice() {
        [PatternElement::Text(text)] if !text.is_empty() => Some(text),
        _ => None,
    }
}

/// Chave de busca no catálogo: só a primeira quebra de linha vira espaço.
pub fn catalog_key(text: &str) -> String {
    text.replacen('\n', " ", 1)
}

/// Tradução de um padrão simples; vazio quando não há o que traduzir.
///
/// Padrões com placeables ou mais de um elemento não são suportados e saem vazios.
pub fn localized<'a>(pattern: Option<&Pattern>, translations: &'a Translations) -> &'a str {
    let Some(text) = pattern.and_then(simple_text) else {
        return "";
    };

    translations
        .get(&catalog_key(text))
        .map(|record| record.localized())
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::TranslationRecord;

    fn catalog(pairs: &[(&str, &str)]) -> Translations {
        pairs
            .iter()
            .map(|(id, s)| (id.to_string(), TranslationRecord::new(*id, *s)))
            .collect()
    }

    #[test]
    fn finds_exact_match() {
        let t = catalog(&[("Hello", "Bonjour")]);
        assert_eq!(localized(Some(&Pattern::text("Hello")), &t), "Bonjour");
    }

    #[test]
    fn missing_pattern_is_empty() {
        let t = catalog(&[("Hello", "Bonjour")]);
        assert_eq!(localized(None, &t), "");
    }

    #[test]
    fn no_match_is_empty() {
        let t = catalog(&[("Hello", "Bonjour")]);
        assert_eq!(localized(Some(&Pattern::text("Bye")), &t), "");
    }

    #[test]
    fn empty_msgstr_is_empty() {
        let t = catalog(&[("Hello", "")]);
        assert_eq!(localized(Some(&Pattern::text("Hello")), &t), "");

        let mut no_forms = Translations::new();
        no_forms.insert(
            "Hello".into(),
            TranslationRecord {
                msgid: "Hello".into(),
                ..Default::default()
            },
        );
        assert_eq!(localized(Some(&Pattern::text("Hello")), &no_forms), "");
    }

    #[test]
    fn placeables_are_not_translated() {
        let t = catalog(&[("Hello, ", "Bonjour, ")]);
        let pattern = Pattern {
            elements: vec![
                PatternElement::Text("Hello, ".into()),
                PatternElement::Placeable("$name".into()),
            ],
        };
        assert_eq!(localized(Some(&pattern), &t), "");

        let only_placeable = Pattern {
            elements: vec![PatternElement::Placeable("\"Hello\"".into())],
        };
        assert_eq!(localized(Some(&only_placeable), &t), "");
    }

    #[test]
    fn empty_pattern_is_empty() {
        let t = catalog(&[("", "nada")]);
        assert_eq!(localized(Some(&Pattern::default()), &t), "");
        assert_eq!(localized(Some(&Pattern::text("")), &t), "");
    }

    #[test]
    fn first_newline_becomes_space() {
        let t = catalog(&[("Line one line two", "Ligne un ligne deux")]);
        let pattern = Pattern::text("Line one\nline two");
        assert_eq!(localized(Some(&pattern), &t), "Ligne un ligne deux");
    }

    #[test]
    fn only_first_newline_is_replaced() {
        assert_eq!(catalog_key("a\nb\nc"), "a b\nc");

        let t = catalog(&[("a b c", "x"), ("a b\nc", "y")]);
        assert_eq!(localized(Some(&Pattern::text("a\nb\nc")), &t), "y");

        let flat_only = catalog(&[("a b c", "x")]);
        assert_eq!(localized(Some(&Pattern::text("a\nb\nc")), &flat_only), "");
    }
}
