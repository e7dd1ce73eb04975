//! HTML tokenizer.
//!
//! A state machine over the practical subset of the WHATWG tokenizer that
//! statute pages use: tags with quoted, unquoted and boolean attributes,
//! comments, DOCTYPE, character references, and raw text inside
//! `<script>`/`<style>`. Malformed input never panics; whatever cannot be
//! parsed as markup is emitted as text.

use crate::entities::{decode_numeric, lookup_entity};

// ---------------------------------------------------------------------------
// Token types
// ---------------------------------------------------------------------------

/// A single token emitted by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    StartTag(StartTagToken),
    EndTag(EndTagToken),
    Character(String),
    Comment(String),
    Doctype(String),
    Eof,
}

/// An opening tag with attributes and self-closing flag.
#[derive(Debug, Clone, PartialEq)]
pub struct StartTagToken {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub self_closing: bool,
}

/// A closing tag.
#[derive(Debug, Clone, PartialEq)]
pub struct EndTagToken {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Data,
    TagOpen,
    EndTagOpen,
    TagName,
    BeforeAttributeName,
    AttributeName,
    AfterAttributeName,
    BeforeAttributeValue,
    AttributeValueDoubleQuoted,
    AttributeValueSingleQuoted,
    AttributeValueUnquoted,
    AfterAttributeValueQuoted,
    SelfClosingStartTag,
    MarkupDeclarationOpen,
    BogusComment,
    RawText,
}

/// Tag under construction.
#[derive(Debug, Default)]
struct TagBuilder {
    name: String,
    attributes: Vec<(String, String)>,
    self_closing: bool,
    is_end_tag: bool,
    attr_name: String,
    attr_value: String,
}

impl TagBuilder {
    fn new(is_end_tag: bool) -> Self {
        Self {
            is_end_tag,
            ..Self::default()
        }
    }

    fn finish_attribute(&mut self) {
        if self.attr_name.is_empty() {
            self.attr_value.clear();
            return;
        }
        let name = std::mem::take(&mut self.attr_name).to_ascii_lowercase();
        let value = std::mem::take(&mut self.attr_value);
        // First occurrence wins, as in browsers.
        if !self.attributes.iter().any(|(n, _)| *n == name) {
            self.attributes.push((name, value));
        }
    }

    fn into_token(mut self) -> Token {
        self.finish_attribute();
        let name = self.name.to_ascii_lowercase();
        if self.is_end_tag {
            Token::EndTag(EndTagToken { name })
        } else {
            Token::StartTag(StartTagToken {
                name,
                attributes: self.attributes,
                self_closing: self.self_closing,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

/// HTML tokenizer. Construct with [`Tokenizer::new`], then call
/// [`Tokenizer::tokenize`].
pub struct Tokenizer {
    input: Vec<char>,
    pos: usize,
    state: State,
    tag: Option<TagBuilder>,
    text: String,
    /// Name of the raw-text element we are inside, if any.
    raw_text_end: Option<String>,
    /// Token queued behind the one just returned.
    pending: Option<Token>,
}

impl Tokenizer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
            state: State::Data,
            tag: None,
            text: String::new(),
            raw_text_end: None,
            pending: None,
        }
    }

    /// Consume the input and return the token stream, always terminated
    /// by [`Token::Eof`]. Adjacent character tokens are coalesced.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token == Token::Eof;
            if let Token::Character(ref s) = token
                && let Some(Token::Character(prev)) = tokens.last_mut()
            {
                prev.push_str(s);
                continue;
            }
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    // -- helpers ------------------------------------------------------------

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn consume(&mut self) -> Option<char> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn starts_with_ci(&self, s: &str) -> bool {
        s.chars()
            .enumerate()
            .all(|(i, c)| self.input.get(self.pos + i).is_some_and(|x| x.eq_ignore_ascii_case(&c)))
    }

    fn take_text(&mut self) -> Option<Token> {
        if self.text.is_empty() {
            None
        } else {
            Some(Token::Character(std::mem::take(&mut self.text)))
        }
    }

    fn tag_mut(&mut self) -> &mut TagBuilder {
        self.tag.get_or_insert_with(|| TagBuilder::new(false))
    }

    fn emit_tag(&mut self) -> Token {
        self.state = State::Data;
        let tag = self.tag.take().unwrap_or_default();
        let token = tag.into_token();
        if let Token::StartTag(ref t) = token
            && matches!(t.name.as_str(), "script" | "style")
            && !t.self_closing
        {
            self.raw_text_end = Some(t.name.clone());
            self.state = State::RawText;
        }
        token
    }

    /// Resolve a character reference starting just after `&`. On failure
    /// the `&` is returned literally and nothing is consumed.
    fn char_ref(&mut self) -> String {
        let start = self.pos;
        let mut body = String::new();
        while let Some(c) = self.peek() {
            if c == ';' || body.len() > 32 {
                break;
            }
            if !(c.is_ascii_alphanumeric() || c == '#') {
                break;
            }
            body.push(c);
            self.pos += 1;
        }
        let terminated = self.peek() == Some(';');
        let resolved = if body.starts_with('#') {
            decode_numeric(&body).map(String::from)
        } else {
            lookup_entity(&body).map(String::from)
        };
        match resolved {
            Some(s) if terminated || body.starts_with('#') => {
                if terminated {
                    self.pos += 1;
                }
                s
            },
            _ => {
                self.pos = start;
                "&".to_string()
            },
        }
    }

    // -- state dispatch -------------------------------------------------------

    fn next_token(&mut self) -> Token {
        if let Some(token) = self.pending.take() {
            return token;
        }
        loop {
            let emitted = match self.state {
                State::Data => self.state_data(),
                State::TagOpen => self.state_tag_open(),
                State::EndTagOpen => self.state_end_tag_open(),
                State::TagName => self.state_tag_name(),
                State::BeforeAttributeName => self.state_before_attr_name(),
                State::AttributeName => self.state_attr_name(),
                State::AfterAttributeName => self.state_after_attr_name(),
                State::BeforeAttributeValue => self.state_before_attr_value(),
                State::AttributeValueDoubleQuoted => self.state_attr_value_quoted('"'),
                State::AttributeValueSingleQuoted => self.state_attr_value_quoted('\''),
                State::AttributeValueUnquoted => self.state_attr_value_unquoted(),
                State::AfterAttributeValueQuoted => self.state_after_attr_value_quoted(),
                State::SelfClosingStartTag => self.state_self_closing(),
                State::MarkupDeclarationOpen => self.state_markup_declaration(),
                State::BogusComment => self.state_bogus_comment(),
                State::RawText => self.state_raw_text(),
            };
            if let Some(token) = emitted {
                return token;
            }
        }
    }

    fn state_data(&mut self) -> Option<Token> {
        match self.consume() {
            Some('<') => {
                self.state = State::TagOpen;
                self.take_text()
            },
            Some('&') => {
                let s = self.char_ref();
                self.text.push_str(&s);
                None
            },
            Some(c) => {
                self.text.push(c);
                None
            },
            None => Some(self.take_text().unwrap_or(Token::Eof)),
        }
    }

    fn state_tag_open(&mut self) -> Option<Token> {
        match self.peek() {
            Some('!') => {
                self.pos += 1;
                self.state = State::MarkupDeclarationOpen;
            },
            Some('/') => {
                self.pos += 1;
                self.state = State::EndTagOpen;
            },
            Some(c) if c.is_ascii_alphabetic() => {
                self.tag = Some(TagBuilder::new(false));
                self.state = State::TagName;
            },
            Some('?') => self.state = State::BogusComment,
            _ => {
                self.text.push('<');
                self.state = State::Data;
            },
        }
        None
    }

    fn state_end_tag_open(&mut self) -> Option<Token> {
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() => {
                self.tag = Some(TagBuilder::new(true));
                self.state = State::TagName;
            },
            Some('>') => {
                self.pos += 1;
                self.state = State::Data;
            },
            None => {
                self.text.push_str("</");
                self.state = State::Data;
            },
            _ => self.state = State::BogusComment,
        }
        None
    }

    fn state_tag_name(&mut self) -> Option<Token> {
        match self.consume() {
            Some(c) if c.is_ascii_whitespace() => self.state = State::BeforeAttributeName,
            Some('/') => self.state = State::SelfClosingStartTag,
            Some('>') => return Some(self.emit_tag()),
            Some(c) => self.tag_mut().name.push(c),
            None => return Some(Token::Eof),
        }
        None
    }

    fn state_before_attr_name(&mut self) -> Option<Token> {
        match self.peek() {
            Some(c) if c.is_ascii_whitespace() => self.pos += 1,
            Some('/') | Some('>') | None => self.state = State::AfterAttributeName,
            Some(_) => {
                self.tag_mut().finish_attribute();
                self.state = State::AttributeName;
            },
        }
        None
    }

    fn state_attr_name(&mut self) -> Option<Token> {
        match self.peek() {
            Some(c) if c.is_ascii_whitespace() || c == '/' || c == '>' => {
                self.state = State::AfterAttributeName;
            },
            None => self.state = State::AfterAttributeName,
            Some('=') => {
                self.pos += 1;
                self.state = State::BeforeAttributeValue;
            },
            Some(c) => {
                self.pos += 1;
                self.tag_mut().attr_name.push(c);
            },
        }
        None
    }

    fn state_after_attr_name(&mut self) -> Option<Token> {
        match self.consume() {
            Some(c) if c.is_ascii_whitespace() => {},
            Some('/') => self.state = State::SelfClosingStartTag,
            Some('=') => self.state = State::BeforeAttributeValue,
            Some('>') => return Some(self.emit_tag()),
            Some(_) => {
                self.pos -= 1;
                self.tag_mut().finish_attribute();
                self.state = State::AttributeName;
            },
            None => return Some(Token::Eof),
        }
        None
    }

    fn state_before_attr_value(&mut self) -> Option<Token> {
        match self.peek() {
            Some(c) if c.is_ascii_whitespace() => self.pos += 1,
            Some('"') => {
                self.pos += 1;
                self.state = State::AttributeValueDoubleQuoted;
            },
            Some('\'') => {
                self.pos += 1;
                self.state = State::AttributeValueSingleQuoted;
            },
            Some('>') => {
                self.pos += 1;
                return Some(self.emit_tag());
            },
            _ => self.state = State::AttributeValueUnquoted,
        }
        None
    }

    fn state_attr_value_quoted(&mut self, quote: char) -> Option<Token> {
        match self.consume() {
            Some(c) if c == quote => self.state = State::AfterAttributeValueQuoted,
            Some('&') => {
                let s = self.char_ref();
                self.tag_mut().attr_value.push_str(&s);
            },
            Some(c) => self.tag_mut().attr_value.push(c),
            None => return Some(Token::Eof),
        }
        None
    }

    fn state_attr_value_unquoted(&mut self) -> Option<Token> {
        match self.consume() {
            Some(c) if c.is_ascii_whitespace() => self.state = State::BeforeAttributeName,
            Some('>') => return Some(self.emit_tag()),
            Some('&') => {
                let s = self.char_ref();
                self.tag_mut().attr_value.push_str(&s);
            },
            Some(c) => self.tag_mut().attr_value.push(c),
            None => return Some(Token::Eof),
        }
        None
    }

    fn state_after_attr_value_quoted(&mut self) -> Option<Token> {
        match self.peek() {
            Some(c) if c.is_ascii_whitespace() => {
                self.pos += 1;
                self.state = State::BeforeAttributeName;
            },
            Some('/') => {
                self.pos += 1;
                self.state = State::SelfClosingStartTag;
            },
            Some('>') => {
                self.pos += 1;
                return Some(self.emit_tag());
            },
            None => return Some(Token::Eof),
            Some(_) => self.state = State::BeforeAttributeName,
        }
        None
    }

    fn state_self_closing(&mut self) -> Option<Token> {
        match self.peek() {
            Some('>') => {
                self.pos += 1;
                self.tag_mut().self_closing = true;
                Some(self.emit_tag())
            },
            None => Some(Token::Eof),
            Some(_) => {
                self.state = State::BeforeAttributeName;
                None
            },
        }
    }

    fn state_markup_declaration(&mut self) -> Option<Token> {
        if self.starts_with_ci("--") {
            self.pos += 2;
            let mut body = String::new();
            loop {
                if self.starts_with_ci("-->") {
                    self.pos += 3;
                    break;
                }
                match self.consume() {
                    Some(c) => body.push(c),
                    None => break,
                }
            }
            self.state = State::Data;
            return Some(Token::Comment(body));
        }
        if self.starts_with_ci("doctype") {
            self.pos += "doctype".len();
            let mut body = String::new();
            while let Some(c) = self.consume() {
                if c == '>' {
                    break;
                }
                body.push(c);
            }
            self.state = State::Data;
            return Some(Token::Doctype(body.trim().to_string()));
        }
        self.state = State::BogusComment;
        None
    }

    fn state_bogus_comment(&mut self) -> Option<Token> {
        let mut body = String::new();
        while let Some(c) = self.consume() {
            if c == '>' {
                break;
            }
            body.push(c);
        }
        self.state = State::Data;
        Some(Token::Comment(body))
    }

    fn state_raw_text(&mut self) -> Option<Token> {
        let end = self.raw_text_end.clone().unwrap_or_default();
        let closing = format!("</{end}");
        loop {
            if self.starts_with_ci(&closing) {
                self.pos += closing.chars().count();
                while let Some(c) = self.consume() {
                    if c == '>' {
                        break;
                    }
                }
                self.raw_text_end = None;
                self.state = State::Data;
                let end_tag = Token::EndTag(EndTagToken { name: end });
                return match self.take_text() {
                    Some(text) => {
                        self.pending = Some(end_tag);
                        Some(text)
                    },
                    None => Some(end_tag),
                };
            }
            match self.consume() {
                Some(c) => self.text.push(c),
                None => {
                    self.state = State::Data;
                    return Some(self.take_text().unwrap_or(Token::Eof));
                },
            }
        }
    }
}

/// Convenience: tokenize a string in one call.
pub fn tokenize(input: &str) -> Vec<Token> {
    Tokenizer::new(input).tokenize()
}
