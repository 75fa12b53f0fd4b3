use std::fmt;

use serde::{Deserialize, Serialize};

/// Intervalo em bytes no texto Fluent original.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Resource {
    pub body: Vec<Entry>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Entry {
    Message(Message),
    Term(Term),
    Comment(Comment),
    GroupComment(Comment),
    ResourceComment(Comment),
    Junk(Junk),
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Message,
    Term,
    Comment,
    GroupComment,
    ResourceComment,
    Junk,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntryKind::Message => "Message",
            EntryKind::Term => "Term",
            EntryKind::Comment => "Comment",
            EntryKind::GroupComment => "GroupComment",
            EntryKind::ResourceComment => "ResourceComment",
            EntryKind::Junk => "Junk",
        };
        f.write_str(name)
    }
}

impl Entry {
    pub fn kind(&self) -> EntryKind {
        match self {
            Entry::Message(_) => EntryKind::Message,
            Entry::Term(_) => EntryKind::Term,
            Entry::Comment(_) => EntryKind::Comment,
            Entry::GroupComment(_) => EntryKind::GroupComment,
            Entry::ResourceComment(_) => EntryKind::ResourceComment,
            Entry::Junk(_) => EntryKind::Junk,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Entry::Message(m) => m.span,
            Entry::Term(t) => t.span,
            Entry::Comment(c) | Entry::GroupComment(c) | Entry::ResourceComment(c) => c.span,
            Entry::Junk(j) => j.span,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: String,

    #[serde(default)]
    pub value: Option<Pattern>,

    #[serde(default)]
    pub attributes: Vec<Attribute>,

    #[serde(default)]
    pub comment: Option<Comment>,

    #[serde(default)]
    pub span: Option<Span>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Term {
    pub id: String,
    pub value: Pattern,

    #[serde(default)]
    pub attributes: Vec<Attribute>,

    #[serde(default)]
    pub comment: Option<Comment>,

    #[serde(default)]
    pub span: Option<Span>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub id: String,
    pub value: Pattern,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Comment {
    pub content: String,

    #[serde(default)]
    pub span: Option<Span>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Junk {
    pub content: String,

    #[serde(default)]
    pub annotations: Vec<String>,

    #[serde(default)]
    pub span: Option<Span>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Pattern {
    pub elements: Vec<PatternElement>,
}

impl Pattern {
    pub fn text(value: impl Into<String>) -> Self {
        Pattern {
            elements: vec![PatternElement::Text(value.into())],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", content = "value")]
pub enum PatternElement {
    Text(String),
    /// Fonte bruta da expressão entre `{` e `}`.
    Placeable(String),
}
