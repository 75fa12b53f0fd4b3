use serde::{Deserialize, Serialize};

use crate::model::catalog::Translations;
use crate::model::fluent::{Entry, Pattern};
use crate::services::lookup;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct QaIssue {
    pub entry_id: String,
    pub code: String,
    pub message: String,
}

impl QaIssue {
    fn new(entry_id: impl Into<String>, code: &str, message: impl Into<String>) -> Self {
        QaIssue {
            entry_id: entry_id.into(),
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// Aponta o que vai faltar no documento mesclado, sem abortar em Junk.
pub fn run(entries: &[Entry], translations: &Translations) -> Vec<QaIssue> {
    let mut issues: Vec<QaIssue> = Vec::new();

    for entry in entries {
        match entry {
            Entry::Message(m) => {
                let value = lookup::localized(m.value.as_ref(), translations);

                if let Some(pattern) = &m.value {
                    check_pattern(&m.id, pattern, &mut issues);
                }

                let mut attrs_translated = 0usize;
                for attr in &m.attributes {
                    let attr_id = format!("{}.{}", m.id, attr.id);
                    check_pattern(&attr_id, &attr.value, &mut issues);

                    if lookup::localized(Some(&attr.value), translations).is_empty() {
                        issues.push(QaIssue::new(
                            attr_id,
                            "UNTRANSLATED_ATTRIBUTE",
                            "Attribute has no translation and will be omitted",
                        ));
                    } else {
                        attrs_translated += 1;
                    }
                }

                if value.is_empty() && attrs_translated == 0 {
                    issues.push(QaIssue::new(
                        m.id.clone(),
                        "UNTRANSLATED_MESSAGE",
                        "Message has no translation and will be dropped",
                    ));
                }
            }

            Entry::Term(t) => issues.push(QaIssue::new(
                format!("-{}", t.id),
                "TERM_SKIPPED",
                "Terms are not migrated",
            )),

            Entry::Junk(j) => {
                let detail = j.annotations.first().cloned().unwrap_or_default();
                let at = j.span.map(|s| s.start.to_string()).unwrap_or_default();
                issues.push(QaIssue::new(
                    at,
                    "JUNK",
                    format!("Unparseable Fluent content aborts the merge: {detail}"),
                ));
            }

            Entry::ResourceComment(_) => issues.push(QaIssue::new(
                String::new(),
                "UNSUPPORTED_ENTRY",
                "Resource comments (###) abort the merge",
            )),

            Entry::Comment(_) | Entry::GroupComment(_) => {}
        }
    }

    issues
}

fn check_pattern(id: &str, pattern: &Pattern, issues: &mut Vec<QaIssue>) {
    match lookup::simple_text(pattern) {
        None if !pattern.elements.is_empty() => issues.push(QaIssue::new(
            id,
            "UNSUPPORTED_PATTERN",
            "Value has placeables or several elements and cannot be looked up",
        )),
        // Depois da primeira quebra, as demais continuam na chave
        Some(text) if text.matches('\n').count() > 1 => issues.push(QaIssue::new(
            id,
            "MULTILINE_KEY",
            format!("Lookup key keeps raw newlines: {:?}", lookup::catalog_key(text)),
        )),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::TranslationRecord;
    use crate::services::convert::parse_fluent;

    fn catalog(pairs: &[(&str, &str)]) -> Translations {
        pairs
            .iter()
            .map(|(id, s)| (id.to_string(), TranslationRecord::new(*id, *s)))
            .collect()
    }

    fn codes(issues: &[QaIssue]) -> Vec<(&str, &str)> {
        issues
            .iter()
            .map(|i| (i.entry_id.as_str(), i.code.as_str()))
            .collect()
    }

    #[test]
    fn clean_document_has_no_issues() {
        let res = parse_fluent("greeting = Hello\n");
        assert!(run(&res.body, &catalog(&[("Hello", "Bonjour")])).is_empty());
    }

    #[test]
    fn reports_dropped_messages_and_attributes() {
        let res = parse_fluent("login = Log in\n    .title = Click\n");
        let issues = run(&res.body, &Translations::new());
        assert_eq!(
            codes(&issues),
            vec![
                ("login.title", "UNTRANSLATED_ATTRIBUTE"),
                ("login", "UNTRANSLATED_MESSAGE"),
            ]
        );
    }

    #[test]
    fn reports_placeables() {
        let res = parse_fluent("hi = Hello { $name }\n");
        let issues = run(&res.body, &Translations::new());
        assert_eq!(
            codes(&issues),
            vec![("hi", "UNSUPPORTED_PATTERN"), ("hi", "UNTRANSLATED_MESSAGE")]
        );
    }

    #[test]
    fn reports_multiline_keys() {
        let res = parse_fluent("long =\n    one\n    two\n    three\n");
        let t = catalog(&[("one two\nthree", "un deux\ntrois")]);
        let issues = run(&res.body, &t);
        assert_eq!(codes(&issues), vec![("long", "MULTILINE_KEY")]);
    }

    #[test]
    fn reports_terms_and_junk() {
        let res = parse_fluent("-brand = Firefox\n\n!!!\n");
        let issues = run(&res.body, &Translations::new());
        assert_eq!(issues[0].code, "TERM_SKIPPED");
        assert_eq!(issues[0].entry_id, "-brand");
        assert_eq!(issues[1].code, "JUNK");
    }
}
