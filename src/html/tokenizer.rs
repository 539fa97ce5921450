//! Minimal HTML tokenizer.
//!
//! Produces a flat token stream with byte spans into the source document.
//! It understands start/end tags with quoted and unquoted attributes,
//! comments, doctypes and the raw-text contents of `script` and `style`.
//! Malformed markup never fails: unterminated constructs run to the end of
//! the document and stray `<` characters are treated as text.

use std::ops::Range;

/// Elements whose contents are raw text, not markup.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// A tag attribute. Names are lowercased, values are entity-decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: Option<String>,
}

/// Kind of token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    StartTag {
        name: String,
        attributes: Vec<Attribute>,
        self_closing: bool,
    },
    EndTag {
        name: String,
    },
    Text,
    Comment,
    Doctype,
}

/// A token and the byte range it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

impl Token {
    /// Tag name for start and end tags.
    pub fn tag_name(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::StartTag { name, .. } | TokenKind::EndTag { name } => Some(name),
            _ => None,
        }
    }

    /// Look up an attribute value on a start tag.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match &self.kind {
            TokenKind::StartTag { attributes, .. } => attributes
                .iter()
                .find(|a| a.name == name)
                .and_then(|a| a.value.as_deref()),
            _ => None,
        }
    }

    pub fn is_start(&self, tag: &str) -> bool {
        matches!(&self.kind, TokenKind::StartTag { name, .. } if name == tag)
    }

    pub fn is_end(&self, tag: &str) -> bool {
        matches!(&self.kind, TokenKind::EndTag { name } if name == tag)
    }
}

/// Tokenize an HTML document.
pub fn tokenize(source: &str) -> Vec<Token> {
    Tokenizer::new(source).run()
}

struct Tokenizer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    /// ASCII-lowercased copy with identical byte offsets
    lower: String,
    pos: usize,
    tokens: Vec<Token>,
}

impl<'a> Tokenizer<'a> {
    fn new(src: &'a str) -> Self {
        Tokenizer {
            src,
            bytes: src.as_bytes(),
            lower: src.to_ascii_lowercase(),
            pos: 0,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Token> {
        while self.pos < self.bytes.len() {
            let start = self.pos;
            let rest = &self.src[start..];

            if rest.starts_with("<!--") {
                let end = self.find_from(start + 4, "-->").map_or(self.bytes.len(), |i| i + 3);
                self.push(TokenKind::Comment, start, end);
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                let end = self.find_from(start, ">").map_or(self.bytes.len(), |i| i + 1);
                self.push(TokenKind::Doctype, start, end);
            } else if rest.starts_with("</") && self.is_name_start(start + 2) {
                self.end_tag(start);
            } else if rest.starts_with('<') && self.is_name_start(start + 1) {
                self.start_tag(start);
            } else {
                self.text(start);
            }
        }
        self.tokens
    }

    fn push(&mut self, kind: TokenKind, start: usize, end: usize) {
        self.tokens.push(Token {
            kind,
            span: start..end,
        });
        self.pos = end;
    }

    fn find_from(&self, from: usize, needle: &str) -> Option<usize> {
        self.src.get(from..)?.find(needle).map(|i| i + from)
    }

    fn is_name_start(&self, at: usize) -> bool {
        self.bytes.get(at).is_some_and(|b| b.is_ascii_alphabetic())
    }

    fn text(&mut self, start: usize) {
        // A leading '<' that did not open a tag is plain text.
        let first = self.src[start..].chars().next().map_or(1, char::len_utf8);
        let from = start + first;
        let end = self.find_from(from, "<").unwrap_or(self.bytes.len());
        self.push(TokenKind::Text, start, end);
    }

    fn read_name(&mut self) -> String {
        let start = self.pos;
        while let Some(&b) = self.bytes.get(self.pos) {
            if b.is_ascii_whitespace() || b == b'>' || b == b'/' || b == b'=' {
                break;
            }
            self.pos += 1;
        }
        self.lower[start..self.pos].to_string()
    }

    fn skip_whitespace(&mut self) {
        while self.bytes.get(self.pos).is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn end_tag(&mut self, start: usize) {
        self.pos = start + 2;
        let name = self.read_name();
        let end = self.find_from(self.pos, ">").map_or(self.bytes.len(), |i| i + 1);
        self.push(TokenKind::EndTag { name }, start, end);
    }

    fn start_tag(&mut self, start: usize) {
        self.pos = start + 1;
        let name = self.read_name();
        let mut attributes = Vec::new();
        let mut self_closing = false;

        loop {
            self.skip_whitespace();
            match self.bytes.get(self.pos) {
                None => break,
                Some(b'>') => {
                    self.pos += 1;
                    break;
                }
                Some(b'/') => {
                    self.pos += 1;
                    if self.bytes.get(self.pos) == Some(&b'>') {
                        self_closing = true;
                        self.pos += 1;
                        break;
                    }
                }
                Some(_) => {
                    if let Some(attribute) = self.attribute() {
                        attributes.push(attribute);
                    }
                }
            }
        }

        let end = self.pos;

        // `/>` does not close a raw-text element; its contents run to the
        // matching end tag. Only a `/>` with no end tag anywhere after it
        // stands alone.
        let raw_text_end = if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
            let close = format!("</{}", name);
            match self.lower[end..].find(&close) {
                Some(i) => Some(end + i),
                None if !self_closing => Some(self.bytes.len()),
                None => None,
            }
        } else {
            None
        };
        let self_closing = self_closing && raw_text_end.is_none();

        self.push(
            TokenKind::StartTag {
                name,
                attributes,
                self_closing,
            },
            start,
            end,
        );

        if let Some(content_end) = raw_text_end {
            if content_end > end {
                self.push(TokenKind::Text, end, content_end);
            }
        }
    }

    fn attribute(&mut self) -> Option<Attribute> {
        let before = self.pos;
        let name = self.read_name();
        if self.pos == before {
            // Stray '=' or similar; step over it.
            self.pos += 1;
            return None;
        }

        self.skip_whitespace();
        if self.bytes.get(self.pos) != Some(&b'=') {
            return Some(Attribute { name, value: None });
        }
        self.pos += 1;
        self.skip_whitespace();

        let value = match self.bytes.get(self.pos) {
            Some(&quote) if quote == b'"' || quote == b'\'' => {
                let value_start = self.pos + 1;
                let value_end = self.src[value_start..]
                    .find(quote as char)
                    .map_or(self.bytes.len(), |i| i + value_start);
                self.pos = (value_end + 1).min(self.bytes.len());
                &self.src[value_start..value_end]
            }
            _ => {
                let value_start = self.pos;
                while let Some(&b) = self.bytes.get(self.pos) {
                    if b.is_ascii_whitespace() || b == b'>' {
                        break;
                    }
                    self.pos += 1;
                }
                &self.src[value_start..self.pos]
            }
        };

        Some(Attribute {
            name,
            value: Some(decode_entities(value)),
        })
    }
}

/// Decode the handful of character references that show up in URLs.
fn decode_entities(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
