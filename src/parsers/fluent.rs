use crate::model::fluent::{
    Attribute, Comment, Entry, Junk, Message, Pattern, PatternElement, Resource, Span, Term,
};

type ParseResult<T> = Result<T, String>;

/// Lê um documento Fluent (LF) preservando os spans de cada entrada.
///
/// Nunca falha: trechos que não formam uma entrada válida viram `Junk`.
pub fn parse(text: &str) -> Resource {
    Parser::new(text).resource()
}

// Elemento intermediário antes do dedent; `Indent` guarda quebras + recuo.
enum RawElement {
    Text(String),
    Placeable(String),
    Indent(String),
}

// Forma da expressão, o suficiente para as regras de seletor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expr {
    Literal,
    Variable,
    Function,
    MessageRef { attribute: bool },
    TermRef { attribute: bool },
    Placeable,
}

struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Parser {
            src,
            bytes: src.as_bytes(),
            pos: 0,
        }
    }

    fn resource(&mut self) -> Resource {
        let mut body = Vec::new();
        let mut last_comment: Option<Comment> = None;

        self.skip_blank_block();

        while !self.is_eof() {
            let entry = self.entry_or_junk();
            let blank_lines = self.skip_blank_block();

            // Comentário colado na próxima linha: pode pertencer à mensagem seguinte.
            let entry = match entry {
                Entry::Comment(comment) if blank_lines == 0 && !self.is_eof() => {
                    if let Some(prev) = last_comment.replace(comment) {
                        body.push(Entry::Comment(prev));
                    }
                    continue;
                }
                other => other,
            };

            let entry = match (last_comment.take(), entry) {
                (Some(comment), Entry::Message(mut message)) => {
                    attach_span(&mut message.span, &comment);
                    message.comment = Some(comment);
                    Entry::Message(message)
                }
                (Some(comment), Entry::Term(mut term)) => {
                    attach_span(&mut term.span, &comment);
                    term.comment = Some(comment);
                    Entry::Term(term)
                }
                (Some(comment), other) => {
                    body.push(Entry::Comment(comment));
                    other
                }
                (None, other) => other,
            };

            body.push(entry);
        }

        if let Some(comment) = last_comment {
            body.push(Entry::Comment(comment));
        }

        Resource { body }
    }

    fn entry_or_junk(&mut self) -> Entry {
        let start = self.pos;

        let annotation = match self.entry() {
            Ok(entry) => match self.expect_line_end() {
                Ok(()) => return entry,
                Err(e) => e,
            },
            Err(e) => e,
        };

        self.pos = start;
        self.skip_to_next_entry_start();

        Entry::Junk(Junk {
            content: self.src[start..self.pos].to_string(),
            annotations: vec![annotation],
            span: Some(Span::new(start, self.pos)),
        })
    }

    fn entry(&mut self) -> ParseResult<Entry> {
        match self.current() {
            Some(b'#') => self.comment(),
            Some(b'-') => self.term().map(Entry::Term),
            Some(c) if is_id_start(c) => self.message().map(Entry::Message),
            _ => Err("expected an entry start".into()),
        }
    }

    fn comment(&mut self) -> ParseResult<Entry> {
        let start = self.pos;
        let level = self.hashes_at(self.pos);
        if level > 3 {
            return Err("expected a comment of at most three '#'".into());
        }

        let mut lines: Vec<String> = Vec::new();

        loop {
            self.pos += level;

            match self.current() {
                None | Some(b'\n') => lines.push(String::new()),
                Some(b' ') => {
                    self.pos += 1;
                    let end = self.line_end(self.pos);
                    lines.push(self.src[self.pos..end].to_string());
                    self.pos = end;
                }
                Some(_) => return Err("expected a space after '#'".into()),
            }

            if self.current() == Some(b'\n') && self.comment_level_at(self.pos + 1) == Some(level) {
                self.pos += 1;
                continue;
            }

            break;
        }

        let comment = Comment {
            content: lines.join("\n"),
            span: Some(Span::new(start, self.pos)),
        };

        Ok(match level {
            1 => Entry::Comment(comment),
            2 => Entry::GroupComment(comment),
            _ => Entry::ResourceComment(comment),
        })
    }

    fn message(&mut self) -> ParseResult<Message> {
        let start = self.pos;
        let id = self.identifier()?;

        self.skip_blank_inline();
        self.expect_byte(b'=')?;

        let value = self.maybe_pattern()?;
        let attributes = self.attributes()?;

        if value.is_none() && attributes.is_empty() {
            return Err(format!(
                "expected message \"{id}\" to have a value or attributes"
            ));
        }

        Ok(Message {
            id,
            value,
            attributes,
            comment: None,
            span: Some(Span::new(start, self.pos)),
        })
    }

    fn term(&mut self) -> ParseResult<Term> {
        let start = self.pos;
        self.expect_byte(b'-')?;
        let id = self.identifier()?;

        self.skip_blank_inline();
        self.expect_byte(b'=')?;

        let value = self
            .maybe_pattern()?
            .ok_or_else(|| format!("expected term \"-{id}\" to have a value"))?;
        let attributes = self.attributes()?;

        Ok(Term {
            id,
            value,
            attributes,
            comment: None,
            span: Some(Span::new(start, self.pos)),
        })
    }

    fn attributes(&mut self) -> ParseResult<Vec<Attribute>> {
        let mut attributes = Vec::new();

        loop {
            let next = self.blank_end(self.pos);
            if self.bytes.get(next) != Some(&b'.') {
                break;
            }

            self.pos = next + 1;
            let id = self.identifier()?;

            self.skip_blank_inline();
            self.expect_byte(b'=')?;

            let value = self
                .maybe_pattern()?
                .ok_or_else(|| format!("expected attribute \".{id}\" to have a value"))?;

            attributes.push(Attribute { id, value });
        }

        Ok(attributes)
    }

    fn identifier(&mut self) -> ParseResult<String> {
        let start = self.pos;

        match self.current() {
            Some(c) if is_id_start(c) => self.pos += 1,
            _ => return Err("expected an identifier".into()),
        }

        while let Some(c) = self.current() {
            if c.is_ascii_alphanumeric() || c == b'_' || c == b'-' {
                self.pos += 1;
            } else {
                break;
            }
        }

        Ok(self.src[start..self.pos].to_string())
    }

    fn maybe_pattern(&mut self) -> ParseResult<Option<Pattern>> {
        let inline = self.blank_inline_end(self.pos);

        match self.bytes.get(inline) {
            None | Some(b'\n') => {}
            Some(_) => {
                self.pos = inline;
                return self.pattern(false).map(Some);
            }
        }

        let (next_line, _) = self.blank_block_end(inline);
        if self.is_value_continuation(next_line) {
            self.pos = next_line;
            return self.pattern(true).map(Some);
        }

        Ok(None)
    }

    fn pattern(&mut self, is_block: bool) -> ParseResult<Pattern> {
        let mut raw: Vec<RawElement> = Vec::new();
        let mut common_indent = usize::MAX;

        if is_block {
            let indent = self.skip_blank_inline();
            common_indent = indent;
            raw.push(RawElement::Indent(" ".repeat(indent)));
        }

        while let Some(c) = self.current() {
            match c {
                b'\n' => {
                    let (next_line, newlines) = self.blank_block_end(self.pos);
                    if !self.is_value_continuation(next_line) {
                        break;
                    }

                    self.pos = next_line;
                    let indent = self.skip_blank_inline();
                    common_indent = common_indent.min(indent);
                    raw.push(RawElement::Indent(format!(
                        "{}{}",
                        "\n".repeat(newlines),
                        " ".repeat(indent)
                    )));
                }
                b'{' => raw.push(RawElement::Placeable(self.placeable()?)),
                b'}' => return Err("unbalanced closing brace in text".into()),
                _ => raw.push(RawElement::Text(self.text_element())),
            }
        }

        Ok(dedent(raw, common_indent))
    }

    fn text_element(&mut self) -> String {
        let start = self.pos;

        while let Some(c) = self.current() {
            if matches!(c, b'\n' | b'{' | b'}') {
                break;
            }
            self.pos += 1;
        }

        self.src[start..self.pos].to_string()
    }

    fn placeable(&mut self) -> ParseResult<String> {
        let start = self.pos;
        self.expect_byte(b'{')?;
        self.skip_blank();
        self.expression()?;
        self.expect_byte(b'}')?;

        Ok(self.src[start + 1..self.pos - 1].trim().to_string())
    }

    // Valida a expressão; o conteúdo fica só como texto bruto no padrão.
    fn expression(&mut self) -> ParseResult<()> {
        let selector = self.inline_expression()?;
        self.skip_blank();

        if !self.src[self.pos..].starts_with("->") {
            if let Expr::TermRef { attribute: true } = selector {
                return Err("term attributes cannot be used as placeables".into());
            }
            return Ok(());
        }

        match selector {
            Expr::MessageRef { attribute: false } => {
                return Err("message references cannot be used as selectors".into())
            }
            Expr::MessageRef { attribute: true } => {
                return Err("message attributes cannot be used as selectors".into())
            }
            Expr::TermRef { attribute: false } => {
                return Err("terms cannot be used as selectors".into())
            }
            Expr::Placeable => return Err("placeables cannot be used as selectors".into()),
            _ => {}
        }

        self.pos += 2;
        self.skip_blank_inline();
        if self.current() != Some(b'\n') {
            return Err("expected a line end after '->'".into());
        }

        self.variants()?;
        self.skip_blank();
        Ok(())
    }

    fn variants(&mut self) -> ParseResult<()> {
        let mut count = 0usize;
        let mut has_default = false;

        loop {
            self.skip_blank();

            let is_default = match self.current() {
                Some(b'*') => {
                    if has_default {
                        return Err("a select expression can only have one default variant".into());
                    }
                    self.pos += 1;
                    true
                }
                Some(b'[') => false,
                _ => break,
            };

            self.expect_byte(b'[')?;
            self.skip_blank();
            match self.current() {
                Some(c) if c.is_ascii_digit() || c == b'-' => self.number_literal()?,
                _ => {
                    self.identifier()?;
                }
            }
            self.skip_blank();
            self.expect_byte(b']')?;

            self.maybe_pattern()?
                .ok_or_else(|| "expected the variant to have a value".to_string())?;

            has_default |= is_default;
            count += 1;
        }

        if count == 0 {
            return Err("expected at least one variant after '->'".into());
        }
        if !has_default {
            return Err("expected a default variant".into());
        }

        Ok(())
    }

    fn inline_expression(&mut self) -> ParseResult<Expr> {
        match self.current() {
            Some(b'{') => {
                self.placeable()?;
                Ok(Expr::Placeable)
            }
            Some(c) if c.is_ascii_digit() => {
                self.number_literal()?;
                Ok(Expr::Literal)
            }
            Some(b'-') if self.bytes.get(self.pos + 1).is_some_and(u8::is_ascii_digit) => {
                self.number_literal()?;
                Ok(Expr::Literal)
            }
            Some(b'"') => {
                self.string_literal()?;
                Ok(Expr::Literal)
            }
            Some(b'$') => {
                self.pos += 1;
                self.identifier()?;
                Ok(Expr::Variable)
            }
            Some(b'-') => {
                self.pos += 1;
                self.identifier()?;
                let attribute = self.attribute_accessor()?;
                if self.bytes.get(self.blank_end(self.pos)) == Some(&b'(') {
                    self.pos = self.blank_end(self.pos);
                    self.call_arguments()?;
                }
                Ok(Expr::TermRef { attribute })
            }
            Some(c) if is_id_start(c) => {
                let id = self.identifier()?;
                let next = self.blank_end(self.pos);
                if self.bytes.get(next) == Some(&b'(') {
                    if !is_function_name(&id) {
                        return Err(format!("invalid function name \"{id}\""));
                    }
                    self.pos = next;
                    self.call_arguments()?;
                    return Ok(Expr::Function);
                }
                let attribute = self.attribute_accessor()?;
                Ok(Expr::MessageRef { attribute })
            }
            _ => Err("expected an inline expression".into()),
        }
    }

    fn attribute_accessor(&mut self) -> ParseResult<bool> {
        if self.current() != Some(b'.') {
            return Ok(false);
        }
        self.pos += 1;
        self.identifier()?;
        Ok(true)
    }

    fn call_arguments(&mut self) -> ParseResult<()> {
        self.expect_byte(b'(')?;
        self.skip_blank();

        let mut named: Vec<String> = Vec::new();

        while self.current() != Some(b')') {
            let arg_start = self.pos;
            let expr = self.inline_expression()?;
            self.skip_blank();

            if self.current() == Some(b':') {
                if expr != (Expr::MessageRef { attribute: false }) {
                    return Err("named argument names must be identifiers".into());
                }
                let name = self.src[arg_start..self.pos].trim().to_string();
                if named.contains(&name) {
                    return Err(format!("duplicate named argument \"{name}\""));
                }
                named.push(name);

                self.pos += 1;
                self.skip_blank();
                match self.inline_expression()? {
                    Expr::Literal => {}
                    _ => return Err("named argument values must be literals".into()),
                }
            } else if !named.is_empty() {
                return Err("positional arguments must come before named ones".into());
            }

            self.skip_blank();
            if self.current() == Some(b',') {
                self.pos += 1;
                self.skip_blank();
                continue;
            }
            break;
        }

        self.expect_byte(b')')
    }

    fn number_literal(&mut self) -> ParseResult<()> {
        if self.current() == Some(b'-') {
            self.pos += 1;
        }
        if self.skip_digits() == 0 {
            return Err("expected a number".into());
        }
        if self.current() == Some(b'.') {
            self.pos += 1;
            if self.skip_digits() == 0 {
                return Err("expected a number".into());
            }
        }
        Ok(())
    }

    fn skip_digits(&mut self) -> usize {
        let start = self.pos;
        while self.current().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn string_literal(&mut self) -> ParseResult<()> {
        self.expect_byte(b'"')?;

        loop {
            match self.current() {
                None | Some(b'\n') => return Err("unterminated string literal".into()),
                Some(b'\\') => {
                    self.pos += 1;
                    self.escape_sequence()?;
                }
                Some(b'"') => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    // Só `\\`, `\"`, `\uXXXX` e `\UXXXXXX` são escapes válidos.
    fn escape_sequence(&mut self) -> ParseResult<()> {
        let digits = match self.current() {
            Some(b'\\') | Some(b'"') => 0,
            Some(b'u') => 4,
            Some(b'U') => 6,
            None | Some(b'\n') => return Err("unterminated string literal".into()),
            Some(_) => return Err("unknown escape sequence".into()),
        };
        self.pos += 1;

        for _ in 0..digits {
            match self.current() {
                Some(c) if c.is_ascii_hexdigit() => self.pos += 1,
                _ => return Err("invalid unicode escape sequence".into()),
            }
        }
        Ok(())
    }

    // Linha indentada que não começa com `[`, `*`, `.` ou `}`; `{` continua em qualquer coluna.
    fn is_value_continuation(&self, line_start: usize) -> bool {
        let indent_end = self.blank_inline_end(line_start);

        match self.bytes.get(indent_end) {
            Some(b'{') => true,
            None | Some(b'\n') => false,
            Some(_) if indent_end == line_start => false,
            Some(c) => !matches!(c, b'}' | b'.' | b'[' | b'*'),
        }
    }

    fn skip_to_next_entry_start(&mut self) {
        loop {
            match self.src[self.pos..].find('\n') {
                None => {
                    self.pos = self.bytes.len();
                    return;
                }
                Some(offset) => {
                    self.pos += offset + 1;
                    match self.current() {
                        Some(c) if is_id_start(c) || c == b'-' || c == b'#' => return,
                        _ => {}
                    }
                }
            }
        }
    }

    fn expect_line_end(&mut self) -> ParseResult<()> {
        match self.current() {
            None => Ok(()),
            Some(b'\n') => {
                self.pos += 1;
                Ok(())
            }
            Some(_) => Err("expected a line end".into()),
        }
    }

    fn expect_byte(&mut self, expected: u8) -> ParseResult<()> {
        if self.current() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(format!("expected '{}'", expected as char))
        }
    }

    /// Pula linhas em branco e devolve quantas foram consumidas.
    fn skip_blank_block(&mut self) -> usize {
        let (end, newlines) = self.blank_block_end(self.pos);
        self.pos = end;
        newlines
    }

    fn skip_blank(&mut self) {
        self.pos = self.blank_end(self.pos);
    }

    fn skip_blank_inline(&mut self) -> usize {
        let end = self.blank_inline_end(self.pos);
        let count = end - self.pos;
        self.pos = end;
        count
    }

    fn blank_block_end(&self, mut at: usize) -> (usize, usize) {
        let mut newlines = 0;

        loop {
            let line_start = at;
            let after = self.blank_inline_end(at);

            match self.bytes.get(after) {
                Some(b'\n') => {
                    newlines += 1;
                    at = after + 1;
                }
                None => return (after, newlines),
                Some(_) => return (line_start, newlines),
            }
        }
    }

    fn blank_inline_end(&self, mut at: usize) -> usize {
        while self.bytes.get(at) == Some(&b' ') {
            at += 1;
        }
        at
    }

    fn blank_end(&self, mut at: usize) -> usize {
        while matches!(self.bytes.get(at), Some(b' ') | Some(b'\n')) {
            at += 1;
        }
        at
    }

    fn line_end(&self, from: usize) -> usize {
        self.src[from..]
            .find('\n')
            .map(|offset| from + offset)
            .unwrap_or(self.bytes.len())
    }

    fn hashes_at(&self, at: usize) -> usize {
        self.bytes[at.min(self.bytes.len())..]
            .iter()
            .take_while(|&&b| b == b'#')
            .count()
    }

    fn comment_level_at(&self, at: usize) -> Option<usize> {
        let level = self.hashes_at(at);
        if level == 0 || level > 3 {
            return None;
        }

        match self.bytes.get(at + level) {
            None | Some(b'\n') | Some(b' ') => Some(level),
            _ => None,
        }
    }

    fn current(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }
}

fn is_id_start(c: u8) -> bool {
    c.is_ascii_alphabetic()
}

fn is_function_name(id: &str) -> bool {
    id.bytes()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == b'_' || c == b'-')
        && id.as_bytes().first().is_some_and(u8::is_ascii_uppercase)
}

fn attach_span(span: &mut Option<Span>, comment: &Comment) {
    if let (Some(span), Some(comment_span)) = (span.as_mut(), comment.span) {
        span.start = comment_span.start;
    }
}

fn dedent(raw: Vec<RawElement>, common_indent: usize) -> Pattern {
    let mut elements: Vec<PatternElement> = Vec::with_capacity(raw.len());

    for element in raw {
        let text = match element {
            RawElement::Placeable(expr) => {
                elements.push(PatternElement::Placeable(expr));
                continue;
            }
            RawElement::Text(text) => text,
            RawElement::Indent(mut indent) => {
                let keep = indent.len().saturating_sub(common_indent);
                indent.truncate(keep);
                if indent.is_empty() {
                    continue;
                }
                indent
            }
        };

        match elements.last_mut() {
            Some(PatternElement::Text(prev)) => prev.push_str(&text),
            _ => elements.push(PatternElement::Text(text)),
        }
    }

    // Espaços e quebras no fim do último texto não fazem parte do valor.
    if let Some(PatternElement::Text(last)) = elements.last_mut() {
        let trimmed = last.trim_end_matches([' ', '\n']).len();
        last.truncate(trimmed);
        if last.is_empty() {
            elements.pop();
        }
    }

    Pattern { elements }
}
