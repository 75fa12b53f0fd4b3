use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Contexto padrão (sem `msgctxt`).
pub const DEFAULT_CONTEXT: &str = "";

/// msgid -> registro, dentro de um único contexto.
pub type Translations = HashMap<String, TranslationRecord>;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Catalog {
    #[serde(default)]
    pub charset: String,

    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// contexto -> (msgid -> registro)
    #[serde(default)]
    pub translations: HashMap<String, Translations>,
}

impl Catalog {
    pub fn context(&self, context: &str) -> Option<&Translations> {
        self.translations.get(context)
    }

    pub fn insert(&mut self, record: TranslationRecord) {
        let context = record.msgctxt.clone().unwrap_or_default();
        self.translations
            .entry(context)
            .or_default()
            .insert(record.msgid.clone(), record);
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct TranslationRecord {
    #[serde(default)]
    pub msgctxt: Option<String>,

    pub msgid: String,

    #[serde(default)]
    pub msgid_plural: Option<String>,

    #[serde(default)]
    pub msgstr: Vec<String>,

    #[serde(default)]
    pub comments: RecordComments,
}

impl TranslationRecord {
    pub fn new(msgid: impl Into<String>, msgstr: impl Into<String>) -> Self {
        TranslationRecord {
            msgid: msgid.into(),
            msgstr: vec![msgstr.into()],
            ..Default::default()
        }
    }

    /// Primeira forma traduzida; vazio quando não há `msgstr`.
    pub fn localized(&self) -> &str {
        self.msgstr.first().map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct RecordComments {
    #[serde(default)]
    pub translator: Vec<String>,

    #[serde(default)]
    pub extracted: Vec<String>,

    #[serde(default)]
    pub reference: Vec<String>,

    #[serde(default)]
    pub flag: Vec<String>,

    #[serde(default)]
    pub previous: Vec<String>,
}

impl RecordComments {
    pub fn is_empty(&self) -> bool {
        self.translator.is_empty()
            && self.extracted.is_empty()
            && self.reference.is_empty()
            && self.flag.is_empty()
            && self.previous.is_empty()
    }
}
