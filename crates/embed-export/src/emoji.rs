//! Emoji catalog lookups and `:shortcode:` substitution.
//!
//! References arrive in four shapes: CDN URLs, bare numeric ids, literal
//! glyphs and legacy `<a:name:id>` mention tokens. All of them are resolved
//! against a catalog passed in by the caller.

use crate::errors::{ExportError, ExportResult};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

/// Name of the catalog object the generated program is expected to define.
pub const EMOJI_OBJECT: &str = "emojis";

static EMOJI_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/emojis/(\d{15,22})\.").expect("emoji id regex"));
static LEGACY_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^<(a)?:([A-Za-z0-9_~-]+):(\d{15,22})>$").expect("legacy token regex")
});
static SHORTCODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^:([A-Za-z0-9_~-]+):$").expect("shortcode regex"));
static BARE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{15,22}$").expect("bare id regex"));
static TEXT_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(<a?:[A-Za-z0-9_~-]+:\d+>)|:([A-Za-z0-9_~-]{2,32}):").expect("text token regex")
});
static BARE_IDENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("identifier regex"));

/// One custom emoji known to the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl EmojiEntry {
    /// Builds an entry from the minimal `{name, url}` pair.
    pub fn from_url(name: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            id: extract_emoji_id(&url).map(str::to_string),
            name: name.into(),
            urls: vec![url],
            aliases: Vec::new(),
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())?
            .to_string();

        let mut urls: Vec<String> = Vec::new();
        if let Some(url) = value.get("url").and_then(Value::as_str) {
            urls.push(url.trim().to_string());
        }
        if let Some(list) = value.get("urls").and_then(Value::as_array) {
            for url in list.iter().filter_map(Value::as_str) {
                let url = url.trim().to_string();
                if !urls.contains(&url) {
                    urls.push(url);
                }
            }
        }
        urls.retain(|url| !url.is_empty());

        let aliases = value
            .get("aliases")
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(Value::as_str)
                    .map(|alias| alias.trim().trim_matches(':').to_string())
                    .filter(|alias| !alias.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let id = match value.get("id") {
            Some(Value::String(id)) if !id.trim().is_empty() => Some(id.trim().to_string()),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => urls
                .iter()
                .find_map(|url| extract_emoji_id(url))
                .map(str::to_string),
        };

        Some(Self {
            id,
            name,
            urls,
            aliases,
        })
    }

    fn animated(&self) -> bool {
        self.urls
            .iter()
            .any(|url| normalize_url(url).to_ascii_lowercase().ends_with(".gif"))
    }

    fn to_ref(&self, animated: bool) -> EmojiRef {
        EmojiRef::Custom {
            name: self.name.clone(),
            id: self.id.clone(),
            animated: animated || self.animated(),
        }
    }
}

/// Caller-supplied set of custom emoji, consulted per export call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmojiCatalog {
    entries: Vec<EmojiEntry>,
}

impl EmojiCatalog {
    pub fn new(entries: Vec<EmojiEntry>) -> Self {
        Self { entries }
    }

    /// Parses either a bare array of entries or an object with an `emojis` array.
    ///
    /// Entries without a name are skipped.
    pub fn from_value(value: &Value) -> ExportResult<Self> {
        let list = match value {
            Value::Array(list) => list,
            Value::Object(map) => map
                .get("emojis")
                .and_then(Value::as_array)
                .ok_or_else(|| ExportError::InvalidCatalog("missing `emojis` array".into()))?,
            Value::Null => return Ok(Self::default()),
            other => {
                return Err(ExportError::InvalidCatalog(format!(
                    "expected an array, got {}",
                    json_kind(other)
                )));
            }
        };
        Ok(Self {
            entries: list.iter().filter_map(EmojiEntry::from_value).collect(),
        })
    }

    pub fn from_json_str(input: &str) -> ExportResult<Self> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_value(&value)
    }

    pub fn entries(&self) -> &[EmojiEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns a catalog where `overrides` win over `self` on lookups.
    pub fn merged_with(&self, overrides: &EmojiCatalog) -> EmojiCatalog {
        let mut entries = overrides.entries.clone();
        entries.extend(self.entries.iter().cloned());
        EmojiCatalog { entries }
    }

    fn by_id(&self, id: &str) -> Option<&EmojiEntry> {
        self.entries
            .iter()
            .find(|entry| entry.id.as_deref() == Some(id))
    }

    fn by_name(&self, name: &str) -> Option<&EmojiEntry> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|entry| entry.aliases.iter().any(|alias| alias == name))
            })
    }

    fn by_url(&self, url: &str) -> Option<&EmojiEntry> {
        if let Some(entry) = self
            .entries
            .iter()
            .find(|entry| entry.urls.first().map(String::as_str) == Some(url))
        {
            return Some(entry);
        }

        let normalized = normalize_url(url);
        if let Some(entry) = self.entries.iter().find(|entry| {
            entry
                .urls
                .iter()
                .any(|candidate| normalize_url(candidate) == normalized)
        }) {
            return Some(entry);
        }

        let id = extract_emoji_id(url)?;
        self.entries.iter().find(|entry| {
            entry.id.as_deref() == Some(id)
                || entry
                    .urls
                    .iter()
                    .any(|candidate| extract_emoji_id(candidate) == Some(id))
        })
    }
}

/// A resolved emoji, ready to be placed on a button or select option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmojiRef {
    /// A catalog or mention-token emoji, looked up by name in generated code.
    Custom {
        name: String,
        id: Option<String>,
        animated: bool,
    },
    /// A native pictographic character, emitted verbatim.
    Unicode(String),
}

impl EmojiRef {
    pub fn name(&self) -> &str {
        match self {
            EmojiRef::Custom { name, .. } => name,
            EmojiRef::Unicode(glyph) => glyph,
        }
    }
}

/// Resolves an emoji reference to its display name.
///
/// Returns `None` when the reference cannot be matched; callers omit the
/// emoji rather than emit a placeholder.
pub fn resolve(reference: &str, catalog: &EmojiCatalog) -> Option<String> {
    resolve_emoji(reference, catalog).map(|emoji| emoji.name().to_string())
}

/// Resolves an emoji reference, keeping the id and animation flag when known.
pub fn resolve_emoji(reference: &str, catalog: &EmojiCatalog) -> Option<EmojiRef> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }

    if let Some(entry) = catalog.by_id(reference) {
        trace!(reference, name = %entry.name, "emoji matched by id");
        return Some(entry.to_ref(false));
    }

    if is_url(reference) {
        let found = catalog.by_url(reference).map(|entry| entry.to_ref(false));
        if found.is_none() {
            trace!(reference, "emoji url not in catalog");
        }
        return found;
    }

    if let Some(caps) = LEGACY_TOKEN_RE.captures(reference) {
        let animated = caps.get(1).is_some();
        let id = &caps[3];
        if let Some(entry) = catalog.by_id(id) {
            return Some(entry.to_ref(animated));
        }
        return Some(EmojiRef::Custom {
            name: caps[2].to_string(),
            id: Some(id.to_string()),
            animated,
        });
    }

    // Unmatched shortcodes and bare ids are omitted rather than passed through.
    if let Some(caps) = SHORTCODE_RE.captures(reference) {
        return catalog.by_name(&caps[1]).map(|entry| entry.to_ref(false));
    }

    if let Some(entry) = catalog.by_name(reference) {
        return Some(entry.to_ref(false));
    }

    if BARE_ID_RE.is_match(reference) {
        trace!(reference, "numeric emoji id not in catalog");
        return None;
    }

    Some(EmojiRef::Unicode(reference.to_string()))
}

/// Rewrites `:name:` tokens into `${emojis.name}` lookups for the generated program.
///
/// Mention tokens such as `<:name:123>` and all-digit tokens like the middle
/// of `12:30:45` are left as they are.
pub fn substitute_shortcodes(text: &str) -> String {
    TEXT_TOKEN_RE
        .replace_all(text, |caps: &Captures<'_>| {
            if caps.get(1).is_some() {
                return caps[0].to_string();
            }
            let name = &caps[2];
            if name.chars().all(|ch| ch.is_ascii_digit()) {
                return caps[0].to_string();
            }
            format!("${{{}}}", lookup_expression(name))
        })
        .into_owned()
}

/// `emojis.name`, or `emojis["name"]` when the name is not a bare identifier.
pub fn lookup_expression(name: &str) -> String {
    if is_bare_identifier(name) {
        format!("{EMOJI_OBJECT}.{name}")
    } else {
        format!("{EMOJI_OBJECT}[{}]", js_string(name))
    }
}

pub fn is_bare_identifier(name: &str) -> bool {
    BARE_IDENT_RE.is_match(name)
}

/// Double-quoted JS string literal.
pub(crate) fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

/// Extracts the snowflake id from a `/emojis/<id>.<ext>` CDN URL.
pub fn extract_emoji_id(url: &str) -> Option<&str> {
    EMOJI_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str())
}

/// Strips the query string and fragment.
pub fn normalize_url(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

fn is_url(reference: &str) -> bool {
    let lower = reference.to_ascii_lowercase();
    lower.starts_with("https://") || lower.starts_with("http://")
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
