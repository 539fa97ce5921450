//! Static dependency usage scanning.
//!
//! Finds module specifiers referenced by `import`, `export ... from`,
//! `require()` and dynamic `import()` without executing or fully parsing the
//! code. Comments are blanked out first so commented-out imports do not
//! count. String literals are left intact, so a string whose text looks like
//! an import can still produce a reference; computed specifiers are never
//! found. Both directions only affect which devDependencies survive.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::descriptor::SandboxFile;

/// File extensions that are scanned for references.
pub const SCANNED_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs", "ts", "tsx", "vue", "svelte"];

static IMPORT_FROM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b(?:import|export)\b[^;'"`]*?\bfrom\s*["']([^"'\n]+)["']"#)
        .expect("valid import-from regex")
});

static BARE_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bimport\s*["']([^"'\n]+)["']"#).expect("valid bare import regex")
});

static CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b(?:require|import)\s*\(\s*(?:"([^"\n]+)"|'([^'\n]+)'|`([^`$\n]+)`)\s*\)"#)
        .expect("valid require regex")
});

/// Scan files and return every referenced package specifier.
pub fn scan(files: &[SandboxFile]) -> BTreeSet<String> {
    let mut references = BTreeSet::new();

    for file in files {
        if file.is_binary || !is_scanned(&file.title) {
            continue;
        }
        references.extend(scan_source(&file.code));
    }

    tracing::debug!("found {} dependency references", references.len());
    references
}

/// Scan a single source text.
pub fn scan_source(code: &str) -> BTreeSet<String> {
    let code = strip_comments(code);
    let mut references = BTreeSet::new();

    let mut add = |specifier: &str| {
        let specifier = specifier.trim();
        if is_package_specifier(specifier) {
            references.insert(specifier.to_string());
        }
    };

    for caps in IMPORT_FROM.captures_iter(&code) {
        add(&caps[1]);
    }
    for caps in BARE_IMPORT.captures_iter(&code) {
        add(&caps[1]);
    }
    for caps in CALL.captures_iter(&code) {
        if let Some(m) = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)) {
            add(m.as_str());
        }
    }

    references
}

/// Whether a usage reference refers to a declared dependency.
///
/// `lodash` and `lodash/pickBy` both refer to `lodash`; `lodash-es` does not.
pub fn references_dependency(reference: &str, name: &str) -> bool {
    match reference.strip_prefix(name) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

fn is_scanned(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .is_some_and(|(_, ext)| SCANNED_EXTENSIONS.contains(&ext))
}

/// Relative, absolute, URL and protocol specifiers never name a package.
fn is_package_specifier(specifier: &str) -> bool {
    !specifier.is_empty()
        && !specifier.starts_with('.')
        && !specifier.starts_with('/')
        && !specifier.contains("://")
        && !specifier.starts_with("node:")
}

/// Replace comments with spaces, keeping string and template literals.
///
/// Newlines inside comments are kept so line structure survives.
fn strip_comments(code: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Code,
        Str(char),
        LineComment,
        BlockComment,
    }

    let mut out = String::with_capacity(code.len());
    let mut state = State::Code;
    let mut chars = code.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::BlockComment;
                }
                '"' | '\'' | '`' => {
                    out.push(c);
                    state = State::Str(c);
                }
                _ => out.push(c),
            },
            State::Str(quote) => {
                out.push(c);
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if c == quote || (c == '\n' && quote != '`') {
                    state = State::Code;
                }
            }
            State::LineComment => {
                if c == '\n' {
                    out.push('\n');
                    state = State::Code;
                } else {
                    out.push(' ');
                }
            }
            State::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("  ");
                    state = State::Code;
                } else if c == '\n' {
                    out.push('\n');
                } else {
                    out.push(' ');
                }
            }
        }
    }

    out
}
