//! npm version specifier handling.
//!
//! npm ranges are translated into one `semver::VersionReq` per `||`
//! alternative. The translation covers what package.json files use in
//! practice: caret/tilde/comparison operators, space-separated comparator
//! sets, hyphen ranges and `x`/`*` wildcards.

use semver::{Version, VersionReq};

/// How a declared specifier should be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Specifier {
    /// A dist-tag such as `latest` or `next`
    Tag(String),
    /// One or more semver ranges (any may match)
    Range(Vec<VersionReq>),
    /// A URL, git or path specifier used as-is
    Verbatim(String),
}

/// Classify and translate a declared version specifier.
pub fn parse_specifier(spec: &str) -> Result<Specifier, String> {
    let spec = spec.trim();

    if spec.is_empty() || spec == "*" || spec == "latest" {
        return Ok(Specifier::Tag("latest".to_string()));
    }

    if is_verbatim(spec) {
        return Ok(Specifier::Verbatim(spec.to_string()));
    }

    if spec
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() && c != 'v' && c != 'x' && c != 'X')
    {
        return Ok(Specifier::Tag(spec.to_string()));
    }

    let reqs = spec
        .split("||")
        .map(|alt| translate_range(alt.trim()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Specifier::Range(reqs))
}

fn is_verbatim(spec: &str) -> bool {
    const PREFIXES: &[&str] = &[
        "http://", "https://", "git://", "git+", "github:", "gitlab:", "bitbucket:", "file:",
        "link:", "npm:",
    ];
    PREFIXES.iter().any(|p| spec.starts_with(p))
}

/// Translate one comparator set (no `||`) into a `VersionReq`.
fn translate_range(range: &str) -> Result<VersionReq, String> {
    if range.is_empty() {
        return Ok(VersionReq::STAR);
    }

    let tokens = join_operators(range);

    // Hyphen range: `1.2.3 - 2.3.4`
    let comparators: Vec<String> = if tokens.len() == 3 && tokens[1] == "-" {
        vec![
            format!(">={}", strip_v(&tokens[0])),
            upper_bound_inclusive(strip_v(&tokens[2])),
        ]
    } else {
        tokens.iter().map(|t| translate_comparator(t)).collect()
    };

    let joined = comparators
        .into_iter()
        .filter(|c| c != "*")
        .collect::<Vec<_>>()
        .join(", ");

    if joined.is_empty() {
        return Ok(VersionReq::STAR);
    }

    VersionReq::parse(&joined).map_err(|e| format!("invalid version range `{}`: {}", range, e))
}

/// Split on whitespace, re-attaching operators written apart from their version (`>= 1.0`).
fn join_operators(range: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    let mut pending_op: Option<String> = None;

    for part in range.split_whitespace() {
        if matches!(part, ">" | ">=" | "<" | "<=" | "=" | "~" | "^") {
            pending_op = Some(part.to_string());
            continue;
        }
        match pending_op.take() {
            Some(op) => tokens.push(format!("{}{}", op, part)),
            None => tokens.push(part.to_string()),
        }
    }

    tokens
}

fn strip_v(version: &str) -> &str {
    version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('='))
        .unwrap_or(version)
}

fn is_wildcard(part: &str) -> bool {
    matches!(part, "x" | "X" | "*")
}

fn translate_comparator(token: &str) -> String {
    let op_len = token
        .find(|c: char| c.is_ascii_alphanumeric() || c == '*')
        .unwrap_or(token.len());
    let (op, version) = token.split_at(op_len);
    let version = strip_v(version);

    if version.is_empty() || is_wildcard(version) {
        return "*".to_string();
    }

    let parts: Vec<&str> = version.split('.').collect();
    let wildcard_at = parts.iter().position(|p| is_wildcard(p));

    match (op, wildcard_at) {
        // `1.x`, `1.2.*`
        ("" | "=", Some(idx)) => {
            let fixed: Vec<&str> = parts[..idx].to_vec();
            format!("={}", fixed.join("."))
        }
        (_, Some(idx)) => {
            let fixed: Vec<&str> = parts[..idx].to_vec();
            format!("{}{}", op, fixed.join("."))
        }
        // A bare version is exact in npm, with partial versions acting as ranges.
        ("", None) => format!("={}", version),
        _ => format!("{}{}", op, version),
    }
}

/// Inclusive upper bound of a hyphen range, respecting partial versions.
fn upper_bound_inclusive(version: &str) -> String {
    let parts: Vec<&str> = version.split('.').filter(|p| !is_wildcard(p)).collect();
    match parts.len() {
        1 => format!("<{}", parts[0].parse::<u64>().map_or(0, |m| m + 1)),
        2 => {
            let minor = parts[1].parse::<u64>().map_or(0, |m| m + 1);
            format!("<{}.{}", parts[0], minor)
        }
        _ => format!("<={}", version),
    }
}

/// Pick the highest version matching any of the requirements.
///
/// Pre-release versions only match requirements that mention a pre-release
/// of the same `major.minor.patch`, following semver semantics.
pub fn select_version<'a, I>(reqs: &[VersionReq], available: I) -> Option<Version>
where
    I: IntoIterator<Item = &'a str>,
{
    available
        .into_iter()
        .filter_map(|v| Version::parse(v).ok())
        .filter(|v| reqs.iter().any(|r| r.matches(v)))
        .max()
}

/// Parse a version string, allowing for incomplete versions.
pub fn parse_version_lenient(s: &str) -> Option<Version> {
    let s = strip_v(s.trim());

    // Try exact parse first
    if let Ok(v) = s.parse() {
        return Some(v);
    }

    // Try adding missing components
    let parts: Vec<&str> = s.split('.').collect();
    match parts.len() {
        1 => {
            let major: u64 = parts[0].parse().ok()?;
            Some(Version::new(major, 0, 0))
        }
        2 => {
            let major: u64 = parts[0].parse().ok()?;
            let minor: u64 = parts[1].parse().ok()?;
            Some(Version::new(major, minor, 0))
        }
        _ => None,
    }
}

/// Lowest concrete version named by a specifier, without consulting a registry.
///
/// `^18` becomes `18.0.0`, `~1.2.3` becomes `1.2.3`, `>=2 <3` becomes
/// `2.0.0`. Specifiers without a lower bound have no offline answer.
pub fn lower_bound(spec: &str) -> Option<Version> {
    let spec = spec.trim();
    let first_alt = spec.split("||").next()?.trim();
    let tokens = join_operators(first_alt);

    tokens.iter().find_map(|token| {
        let op_len = token
            .find(|c: char| c.is_ascii_digit() || c == 'v')
            .unwrap_or(token.len());
        let (op, version) = token.split_at(op_len);
        if !matches!(op, "" | "=" | "^" | "~" | ">=") {
            return None;
        }
        let fixed: Vec<&str> = version
            .split('.')
            .take_while(|p| !is_wildcard(p))
            .collect();
        parse_version_lenient(&fixed.join("."))
    })
}
