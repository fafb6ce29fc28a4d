//! Parser for the output of `java -version`.
//!
//! ## Grammar
//!
//! ```text
//! token   := quoted string following the word "version"
//!          | first DIGITS ("." DIGITS)* in the text
//! major   := X      when token is "1." X ...   (legacy, e.g. 1.8.0_301)
//!          | N      when token is N ...        (modern, e.g. 17.0.2, 21)
//! ```
//!
//! Anything after the dotted numeric run (`_301`, `-ea`, `+7`) is ignored.

use thiserror::Error;

/// Why a version string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionParseError {
    #[error("no version number found in {0:?}")]
    NoVersion(String),

    #[error("version component {0:?} is not a number")]
    InvalidComponent(String),
}

/// A parsed Java runtime version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaVersion {
    /// The version token as printed, e.g. `1.8.0_301`.
    pub raw: String,
    /// Major version after legacy mapping, e.g. `8`.
    pub major: u32,
}

/// Parses the full `java -version` text into a [`JavaVersion`].
///
/// ## Examples
///
/// ```
/// use oapi_fetch_lib::java_version::parse;
///
/// let v = parse(r#"java version "1.8.0_301""#).unwrap();
/// assert_eq!(v.major, 8);
///
/// let v = parse(r#"openjdk version "17.0.2" 2022-01-18"#).unwrap();
/// assert_eq!(v.major, 17);
/// ```
///
/// ## Errors
///
/// Returns [`VersionParseError`] when no version token is present or a
/// component overflows.
pub fn parse(text: &str) -> Result<JavaVersion, VersionParseError> {
    let token = quoted_version(text)
        .and_then(numeric_run)
        .or_else(|| numeric_run(text))
        .ok_or_else(|| VersionParseError::NoVersion(text.trim().to_string()))?;

    let mut parts = token.split('.');
    let first = parse_component(parts.next().unwrap_or_default())?;
    let major = match (first, parts.next()) {
        (1, Some(second)) => parse_component(second)?,
        _ => first,
    };

    Ok(JavaVersion {
        raw: version_label(text, token),
        major,
    })
}

/// Convenience wrapper returning only the major version.
pub fn parse_major(text: &str) -> Result<u32, VersionParseError> {
    parse(text).map(|v| v.major)
}

/// Returns the contents of the first `"..."` directly following a `version`
/// word. Occurrences without a quote (`-Dapp.version=17`) are skipped.
fn quoted_version(text: &str) -> Option<&str> {
    text.match_indices("version").find_map(|(index, word)| {
        let rest = text[index + word.len()..].trim_start().strip_prefix('"')?;
        let end = rest.find('"')?;
        Some(&rest[..end])
    })
}

/// Returns the leftmost `DIGITS ("." DIGITS)*` run in `s`.
fn numeric_run(s: &str) -> Option<&str> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let bytes = s.as_bytes();
    let mut end = start;
    while end < bytes.len() {
        let b = bytes[end];
        let dot_then_digit =
            b == b'.' && bytes.get(end + 1).is_some_and(|next| next.is_ascii_digit());
        if b.is_ascii_digit() || dot_then_digit {
            end += 1;
        } else {
            break;
        }
    }
    Some(&s[start..end])
}

fn parse_component(component: &str) -> Result<u32, VersionParseError> {
    component
        .parse::<u32>()
        .map_err(|_| VersionParseError::InvalidComponent(component.to_string()))
}

/// Prefers the full quoted version (keeps `_301` suffixes) for display.
fn version_label(text: &str, token: &str) -> String {
    quoted_version(text)
        .filter(|quoted| quoted.starts_with(token))
        .unwrap_or(token)
        .to_string()
}
