use std::sync::OnceLock;

use regex::Regex;

use crate::error::CatalogError;
use crate::model::catalog::{Catalog, TranslationRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Msgctxt,
    Msgid,
    MsgidPlural,
    Msgstr(usize),
}

#[derive(Default)]
struct PendingRecord {
    record: TranslationRecord,
    has_msgid: bool,
    has_msgstr: bool,
    field: Option<Field>,
}

impl PendingRecord {
    fn push_str(&mut self, field: Field, value: &str) {
        let r = &mut self.record;
        match field {
            Field::Msgctxt => r.msgctxt.get_or_insert_with(String::new).push_str(value),
            Field::Msgid => r.msgid.push_str(value),
            Field::MsgidPlural => r.msgid_plural.get_or_insert_with(String::new).push_str(value),
            Field::Msgstr(n) => {
                if r.msgstr.len() <= n {
                    r.msgstr.resize(n + 1, String::new());
                }
                r.msgstr[n].push_str(value);
            }
        }
    }
}

/// Lê um catálogo gettext (.po) já decodificado.
///
/// Entradas obsoletas (`#~`) são ignoradas; a entrada de cabeçalho (`msgid ""`)
/// preenche `headers` e `charset`.
pub fn parse(text: &str) -> Result<Catalog, CatalogError> {
    let mut catalog = Catalog::default();
    let mut pending = PendingRecord::default();

    for (i, raw) in text.lines().enumerate() {
        let ln = i + 1;
        let line = raw.trim_end_matches('\r').trim();

        // Linha vazia separa entradas
        if line.is_empty() {
            if pending.has_msgid {
                flush(&mut catalog, &mut pending);
            }
            continue;
        }

        if line.starts_with("#~") {
            continue;
        }

        if let Some(comment) = line.strip_prefix('#') {
            if pending.has_msgstr {
                flush(&mut catalog, &mut pending);
            }
            push_comment(&mut pending.record, comment);
            continue;
        }

        if line.starts_with('"') {
            let value = unquote(line, ln)?;
            let field = pending.field.ok_or(CatalogError::OrphanString { line: ln })?;
            pending.push_str(field, &value);
            continue;
        }

        let (keyword, rest) = match line.find(char::is_whitespace) {
            Some(pos) => (&line[..pos], line[pos..].trim_start()),
            None => (line, ""),
        };

        let field = keyword_field(keyword, ln)?;
        let value = unquote(rest, ln)?;

        match field {
            Field::Msgctxt | Field::Msgid => {
                // msgctxt/msgid depois de um msgstr abre uma nova entrada
                if pending.has_msgstr {
                    flush(&mut catalog, &mut pending);
                }
                if field == Field::Msgid {
                    pending.record.msgid.clear();
                    pending.has_msgid = true;
                } else {
                    pending.record.msgctxt = Some(String::new());
                }
            }
            Field::MsgidPlural => pending.record.msgid_plural = Some(String::new()),
            Field::Msgstr(n) => {
                if !pending.has_msgid {
                    return Err(CatalogError::MissingMsgid { line: ln });
                }
                if pending.record.msgstr.len() > n {
                    pending.record.msgstr[n].clear();
                }
                pending.has_msgstr = true;
            }
        }

        pending.field = Some(field);
        pending.push_str(field, &value);
    }

    if pending.has_msgid {
        flush(&mut catalog, &mut pending);
    }

    if catalog.charset.is_empty() {
        catalog.charset = "utf-8".to_string();
    }

    Ok(catalog)
}

/// Extrai o `charset=` de um cabeçalho `Content-Type` (ou de qualquer texto que o contenha).
pub fn sniff_charset(text: &str) -> Option<String> {
    static CHARSET_RE: OnceLock<Regex> = OnceLock::new();
    let re = CHARSET_RE.get_or_init(|| {
        Regex::new(r"(?i)charset\s*=\s*([A-Za-z0-9_.:\-]+)").expect("charset regex is valid")
    });

    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
}

fn flush(catalog: &mut Catalog, pending: &mut PendingRecord) {
    let done = std::mem::take(pending);
    let record = done.record;

    if record.msgid.is_empty() && record.msgctxt.is_none() {
        for line in record.localized().lines() {
            if let Some((key, value)) = line.split_once(':') {
                catalog
                    .headers
                    .insert(key.trim().to_string(), value.trim().to_string());
            }
        }

        if let Some(charset) = catalog
            .headers
            .get("Content-Type")
            .and_then(|ct| sniff_charset(ct))
        {
            catalog.charset = charset;
        }
    }

    catalog.insert(record);
}

// Limite de formas aceitas em `msgstr[N]`.
const MAX_PLURAL_FORMS: usize = 256;

fn keyword_field(keyword: &str, line: usize) -> Result<Field, CatalogError> {
    match keyword {
        "msgctxt" => Ok(Field::Msgctxt),
        "msgid" => Ok(Field::Msgid),
        "msgid_plural" => Ok(Field::MsgidPlural),
        "msgstr" => Ok(Field::Msgstr(0)),
        _ => {
            let index = keyword
                .strip_prefix("msgstr[")
                .and_then(|rest| rest.strip_suffix(']'))
                .ok_or_else(|| CatalogError::UnknownKeyword {
                    line,
                    keyword: keyword.to_string(),
                })?;

            match index.trim().parse::<usize>() {
                Ok(n) if n < MAX_PLURAL_FORMS => Ok(Field::Msgstr(n)),
                _ => Err(CatalogError::InvalidPluralIndex {
                    line,
                    index: index.to_string(),
                }),
            }
        }
    }
}

fn push_comment(record: &mut TranslationRecord, comment: &str) {
    let c = &mut record.comments;
    let (bucket, text) = match comment.chars().next() {
        Some('.') => (&mut c.extracted, &comment[1..]),
        Some(':') => (&mut c.reference, &comment[1..]),
        Some(',') => (&mut c.flag, &comment[1..]),
        Some('|') => (&mut c.previous, &comment[1..]),
        _ => (&mut c.translator, comment),
    };
    bucket.push(text.trim().to_string());
}

/// Remove as aspas e decodifica os escapes numa única passada.
fn unquote(s: &str, line: usize) -> Result<String, CatalogError> {
    let body = s
        .trim()
        .strip_prefix('"')
        .ok_or(CatalogError::ExpectedString { line })?;

    let mut out = String::with_capacity(body.len());
    let mut chars = body.char_indices();

    while let Some((idx, c)) = chars.next() {
        match c {
            '"' => {
                if !body[idx + 1..].trim().is_empty() {
                    return Err(CatalogError::ExpectedString { line });
                }
                return Ok(out);
            }
            '\\' => match chars.next().map(|(_, e)| e) {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('a') => out.push('\u{07}'),
                Some('b') => out.push('\u{08}'),
                Some('f') => out.push('\u{0C}'),
                Some('v') => out.push('\u{0B}'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => break,
            },
            _ => out.push(c),
        }
    }

    Err(CatalogError::UnterminatedString { line })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::DEFAULT_CONTEXT;

    fn lookup<'a>(catalog: &'a Catalog, msgid: &str) -> &'a TranslationRecord {
        catalog
            .context(DEFAULT_CONTEXT)
            .and_then(|t| t.get(msgid))
            .unwrap_or_else(|| panic!("missing msgid {msgid:?}"))
    }

    #[test]
    fn parse_simple_po() {
        let content = r#"
msgid "Hello"
msgstr "Bonjour"

msgid "Goodbye"
msgstr "Au revoir"
"#;
        let catalog = parse(content).unwrap();
        assert_eq!(lookup(&catalog, "Hello").localized(), "Bonjour");
        assert_eq!(lookup(&catalog, "Goodbye").localized(), "Au revoir");
    }

    #[test]
    fn entries_without_blank_separator() {
        let content = "msgid \"A\"\nmsgstr \"a\"\nmsgid \"B\"\nmsgstr \"b\"\n";
        let catalog = parse(content).unwrap();
        assert_eq!(lookup(&catalog, "A").localized(), "a");
        assert_eq!(lookup(&catalog, "B").localized(), "b");
    }

    #[test]
    fn context_goes_to_its_own_map() {
        let content = r#"
msgctxt "menu"
msgid "File"
msgstr "Fichier"
"#;
        let catalog = parse(content).unwrap();
        assert!(catalog
            .context(DEFAULT_CONTEXT)
            .map_or(true, |t| !t.contains_key("File")));
        let menu = catalog.context("menu").unwrap();
        assert_eq!(menu["File"].localized(), "Fichier");
        assert_eq!(menu["File"].msgctxt.as_deref(), Some("menu"));
    }

    #[test]
    fn multiline_strings_concatenate() {
        let content = r#"
msgid ""
"Hello "
"World"
msgstr ""
"Bonjour "
"Monde"
"#;
        let catalog = parse(content).unwrap();
        assert_eq!(lookup(&catalog, "Hello World").localized(), "Bonjour Monde");
    }

    #[test]
    fn plural_forms() {
        let content = r#"
msgid "One file"
msgid_plural "{n} files"
msgstr[0] "Un fichier"
msgstr[1] "{n} fichiers"
"#;
        let catalog = parse(content).unwrap();
        let record = lookup(&catalog, "One file");
        assert_eq!(record.msgid_plural.as_deref(), Some("{n} files"));
        assert_eq!(record.msgstr, vec!["Un fichier", "{n} fichiers"]);
        assert_eq!(record.localized(), "Un fichier");
    }

    #[test]
    fn comments_are_classified() {
        let content = r#"
# Translator note
#. Extracted note
#: src/main.rs:10
#, fuzzy
#| msgid "Helo"
msgid "Hello"
msgstr "Salut"
"#;
        let catalog = parse(content).unwrap();
        let comments = &lookup(&catalog, "Hello").comments;
        assert_eq!(comments.translator, vec!["Translator note"]);
        assert_eq!(comments.extracted, vec!["Extracted note"]);
        assert_eq!(comments.reference, vec!["src/main.rs:10"]);
        assert_eq!(comments.flag, vec!["fuzzy"]);
        assert_eq!(comments.previous, vec!["msgid \"Helo\""]);
    }

    #[test]
    fn obsolete_entries_are_skipped() {
        let content = "#~ msgid \"Old\"\n#~ msgstr \"Vieux\"\n\nmsgid \"New\"\nmsgstr \"Neuf\"\n";
        let catalog = parse(content).unwrap();
        let default = catalog.context(DEFAULT_CONTEXT).unwrap();
        assert!(!default.contains_key("Old"));
        assert_eq!(default["New"].localized(), "Neuf");
    }

    #[test]
    fn header_populates_headers_and_charset() {
        let content = r#"msgid ""
msgstr ""
"Language: fr\n"
"Content-Type: text/plain; charset=ISO-8859-1\n"

msgid "Yes"
msgstr "Oui"
"#;
        let catalog = parse(content).unwrap();
        assert_eq!(catalog.headers.get("Language").map(String::as_str), Some("fr"));
        assert_eq!(catalog.charset, "iso-8859-1");
        assert!(catalog.context(DEFAULT_CONTEXT).unwrap().contains_key(""));
    }

    #[test]
    fn charset_defaults_to_utf8() {
        let catalog = parse("msgid \"a\"\nmsgstr \"b\"\n").unwrap();
        assert_eq!(catalog.charset, "utf-8");
    }

    #[test]
    fn later_duplicates_win() {
        let content = "msgid \"A\"\nmsgstr \"first\"\n\nmsgid \"A\"\nmsgstr \"second\"\n";
        let catalog = parse(content).unwrap();
        assert_eq!(lookup(&catalog, "A").localized(), "second");
    }

    #[test]
    fn unescape_sequences() {
        let content = r#"
msgid "Line 1\nLine 2 \"quoted\""
msgstr "Ligne 1\nLigne 2 \"cité\""
"#;
        let catalog = parse(content).unwrap();
        assert_eq!(
            lookup(&catalog, "Line 1\nLine 2 \"quoted\"").localized(),
            "Ligne 1\nLigne 2 \"cité\""
        );
    }

    #[test]
    fn double_backslash_is_not_a_newline() {
        assert_eq!(unquote(r#""line\\nend""#, 1).unwrap(), "line\\nend");
        assert_eq!(unquote(r#""line\nend""#, 1).unwrap(), "line\nend");
    }

    #[test]
    fn unknown_keyword_is_an_error() {
        let err = parse("msgid \"a\"\nmsgfoo \"b\"\n").unwrap_err();
        assert_eq!(
            err,
            CatalogError::UnknownKeyword {
                line: 2,
                keyword: "msgfoo".into()
            }
        );
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let err = parse("msgid \"a\nmsgstr \"b\"\n").unwrap_err();
        assert_eq!(err, CatalogError::UnterminatedString { line: 1 });
    }

    #[test]
    fn msgstr_without_msgid_is_an_error() {
        let err = parse("msgstr \"b\"\n").unwrap_err();
        assert_eq!(err, CatalogError::MissingMsgid { line: 1 });
    }

    #[test]
    fn orphan_continuation_is_an_error() {
        let err = parse("\"dangling\"\n").unwrap_err();
        assert_eq!(err, CatalogError::OrphanString { line: 1 });
    }

    #[test]
    fn bad_plural_index_is_an_error() {
        let err = parse("msgid \"a\"\nmsgstr[x] \"b\"\n").unwrap_err();
        assert_eq!(
            err,
            CatalogError::InvalidPluralIndex {
                line: 2,
                index: "x".into()
            }
        );
    }

    #[test]
    fn huge_plural_index_is_an_error() {
        for index in ["256", "1000000000", "18446744073709551615", "99999999999999999999999"] {
            let text = format!("msgid \"a\"\nmsgid_plural \"as\"\nmsgstr[{index}] \"b\"\n");
            assert_eq!(
                parse(&text).unwrap_err(),
                CatalogError::InvalidPluralIndex {
                    line: 3,
                    index: index.into()
                }
            );
        }
    }

    #[test]
    fn last_plural_index_is_accepted() {
        let catalog = parse("msgid \"a\"\nmsgid_plural \"as\"\nmsgstr[255] \"b\"\n").unwrap();
        let record = &catalog.context("").unwrap()["a"];
        assert_eq!(record.msgstr.len(), 256);
        assert_eq!(record.msgstr[255], "b");
    }

    #[test]
    fn sniffs_charset() {
        assert_eq!(
            sniff_charset("text/plain; charset=UTF-8").as_deref(),
            Some("utf-8")
        );
        assert_eq!(sniff_charset("text/plain"), None);
    }
}
