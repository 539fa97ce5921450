//! HTML entry extraction.
//!
//! Splits an HTML document into the markup a sandbox renders (the body
//! fragment) and the external resources it pulls in. Resources are absolute
//! URLs referenced by stylesheet `<link>`s, `<script src>` and `@import`
//! rules inside `<style>`, in document order with duplicates removed (first
//! occurrence wins). The elements and `@import` rules that were turned into
//! resources are cut out of the body, which makes extraction idempotent on
//! its own output.

pub mod tokenizer;

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use tokenizer::{tokenize, Token, TokenKind};

static CSS_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@import\s+(?:url\(\s*)?["']?([^"')\s;]+)"#).expect("valid @import regex")
});

/// Result of extracting an HTML entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlInfo {
    /// Body fragment, `None` when the document has no renderable body
    pub body: Option<String>,
    /// External resource URLs in first-seen order
    pub external_resources: Vec<String>,
}

/// Extract the body fragment and external resources from a document.
///
/// A missing document yields the empty result.
pub fn extract(document: Option<&str>) -> HtmlInfo {
    match document {
        Some(doc) => Extraction::new(doc).finish(),
        None => HtmlInfo::default(),
    }
}

/// Check whether a reference points outside the sandbox.
pub fn is_external_url(href: &str) -> bool {
    if href.starts_with("//") {
        return true;
    }
    Url::parse(href)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

fn is_stylesheet_link(token: &Token) -> bool {
    match token.attribute("rel") {
        None => true,
        Some(rel) => rel
            .split_ascii_whitespace()
            .any(|r| r.eq_ignore_ascii_case("stylesheet")),
    }
}

struct Extraction<'a> {
    doc: &'a str,
    resources: Vec<String>,
    /// Spans removed from the body
    cuts: Vec<Range<usize>>,
    /// Structural spans (doctype, html tags, head) removed when there is no body
    structure: Vec<Range<usize>>,
    body: Option<Range<usize>>,
}

/// An open `<style>` element and the external `@import` rules found in it.
struct StyleBlock {
    open: Range<usize>,
    rules: Vec<Range<usize>>,
    other_css: bool,
}

impl StyleBlock {
    fn open(span: Range<usize>) -> Self {
        StyleBlock {
            open: span,
            rules: Vec::new(),
            other_css: false,
        }
    }

    /// Spans to cut once the element closes at `end`. A style holding
    /// nothing but external imports goes as a whole.
    fn close(self, end: usize) -> Vec<Range<usize>> {
        if self.rules.is_empty() {
            Vec::new()
        } else if self.other_css {
            self.rules
        } else {
            vec![self.open.start..end]
        }
    }
}

impl<'a> Extraction<'a> {
    fn new(doc: &'a str) -> Self {
        let mut extraction = Extraction {
            doc,
            resources: Vec::new(),
            cuts: Vec::new(),
            structure: Vec::new(),
            body: None,
        };
        extraction.walk(&tokenize(doc));
        extraction
    }

    fn add_resource(&mut self, url: &str) {
        let url = url.trim();
        if is_external_url(url) && !self.resources.iter().any(|r| r == url) {
            self.resources.push(url.to_string());
        }
    }

    /// Collect the external `@import` URLs of a stylesheet, recording the
    /// span of each such rule in `block`.
    fn scan_imports(&self, span: Range<usize>, block: Option<&mut StyleBlock>) -> Vec<String> {
        let css = &self.doc[span.clone()];
        let mut urls = Vec::new();
        let mut rules = Vec::new();
        for caps in CSS_IMPORT.captures_iter(css) {
            let (Some(rule), Some(url)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if !is_external_url(url.as_str()) {
                continue;
            }
            let end = css[rule.end()..]
                .find(';')
                .map_or(css.len(), |i| rule.end() + i + 1);
            rules.push(rule.start()..end);
            urls.push(url.as_str().to_string());
        }

        if let Some(block) = block {
            let mut cursor = 0;
            for rule in &rules {
                if !css[cursor..rule.start].trim().is_empty() {
                    block.other_css = true;
                }
                cursor = rule.end;
            }
            if !css[cursor..].trim().is_empty() {
                block.other_css = true;
            }
            block
                .rules
                .extend(rules.into_iter().map(|r| span.start + r.start..span.start + r.end));
        }
        urls
    }

    fn walk(&mut self, tokens: &[Token]) {
        let mut body_start = None;
        let mut body_end = None;
        let mut html_end = None;
        let mut head_start = None;
        let mut pending_script = None;
        let mut style = None;

        for token in tokens {
            match &token.kind {
                TokenKind::Doctype => self.structure.push(token.span.clone()),
                TokenKind::StartTag { name, self_closing, .. } => match name.as_str() {
                    "html" => self.structure.push(token.span.clone()),
                    "head" => head_start = head_start.or(Some(token.span.start)),
                    "body" if body_start.is_none() => body_start = Some(token.span.end),
                    "link" => {
                        if let Some(href) = token.attribute("href") {
                            if is_stylesheet_link(token) && is_external_url(href.trim()) {
                                self.add_resource(href);
                                self.cuts.push(token.span.clone());
                            }
                        }
                    }
                    "script" => {
                        if let Some(src) = token.attribute("src") {
                            if is_external_url(src.trim()) {
                                self.add_resource(src);
                                if *self_closing {
                                    self.cuts.push(token.span.clone());
                                } else {
                                    pending_script = Some(token.span.clone());
                                }
                            }
                        }
                    }
                    "style" if !*self_closing => {
                        style = Some(StyleBlock::open(token.span.clone()));
                    }
                    _ => {}
                },
                TokenKind::EndTag { name } => match name.as_str() {
                    "html" => {
                        html_end = html_end.or(Some(token.span.start));
                        self.structure.push(token.span.clone());
                    }
                    "head" => {
                        if let Some(start) = head_start.take() {
                            self.structure.push(start..token.span.end);
                        }
                    }
                    "body" if body_start.is_some() && body_end.is_none() => {
                        body_end = Some(token.span.start)
                    }
                    "script" => {
                        if let Some(open) = pending_script.take() {
                            self.cuts.push(open.start..token.span.end);
                        }
                    }
                    "style" => {
                        if let Some(block) = style.take() {
                            self.cuts.extend(block.close(token.span.end));
                        }
                    }
                    _ => {}
                },
                TokenKind::Text if style.is_some() => {
                    for url in self.scan_imports(token.span.clone(), style.as_mut()) {
                        self.add_resource(&url);
                    }
                }
                TokenKind::Text | TokenKind::Comment => {}
            }
        }

        // A script whose end tag never arrived is cut up to its start tag.
        if let Some(open) = pending_script {
            self.cuts.push(open);
        }
        if let Some(block) = style {
            self.cuts.extend(block.rules);
        }
        // An unclosed head swallows nothing beyond its start tag.
        if let Some(start) = head_start {
            let end = self.doc[start..].find('>').map_or(self.doc.len(), |i| start + i + 1);
            self.structure.push(start..end);
        }

        self.body = body_start.map(|start| {
            let end = body_end.or(html_end.filter(|&e| e >= start)).unwrap_or(self.doc.len());
            start..end
        });
    }

    fn finish(self) -> HtmlInfo {
        let (range, mut cuts) = match self.body.clone() {
            Some(range) => (range, self.cuts),
            None => {
                let mut cuts = self.cuts;
                cuts.extend(self.structure);
                (0..self.doc.len(), cuts)
            }
        };

        cuts.sort_by_key(|c| c.start);

        let mut body = String::new();
        let mut cursor = range.start;
        for cut in cuts {
            let start = cut.start.max(range.start);
            let end = cut.end.min(range.end);
            if start >= end || end <= cursor {
                continue;
            }
            if start > cursor {
                body.push_str(&self.doc[cursor..start]);
            }
            cursor = end;
        }
        if cursor < range.end {
            body.push_str(&self.doc[cursor..range.end]);
        }

        let body = body.trim();
        HtmlInfo {
            body: (!body.is_empty()).then(|| body.to_string()),
            external_resources: self.resources,
        }
    }
}
