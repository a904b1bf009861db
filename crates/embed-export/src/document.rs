//! Editor document model and its ingestion from loose JSON.
//!
//! Documents come from live editor state or from pasted JSON, so every field
//! is read defensively: missing ids are synthesized, unknown styles fall back
//! to `secondary`, scalar content is coerced to text and unknown item types
//! are kept as [`ItemKind::Unknown`] for the mapper to drop.

use crate::emoji::EmojiCatalog;
use crate::errors::{ExportError, ExportResult};
use crate::ids::IdGenerator;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Where an item is placed relative to the main container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    #[default]
    Main,
    Footer,
}

impl Placement {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "footer" | "bottom" | "below" => Placement::Footer,
            _ => Placement::Main,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    Primary,
    #[default]
    Secondary,
    Success,
    Danger,
    Link,
}

impl ButtonStyle {
    /// Parses a style name; anything unrecognised becomes `Secondary`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "primary" | "blurple" => ButtonStyle::Primary,
            "success" | "green" => ButtonStyle::Success,
            "danger" | "red" => ButtonStyle::Danger,
            "link" | "url" => ButtonStyle::Link,
            _ => ButtonStyle::Secondary,
        }
    }
}

/// Internal navigation targets a button may point at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonLinks {
    pub modal: Option<String>,
    pub sub_document: Option<String>,
    pub document: Option<String>,
}

/// Every legacy way the editor has had of saying "this button is off".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisabledFlags {
    pub disabled: bool,
    pub is_disabled: bool,
    pub inactive: bool,
    pub enabled: Option<bool>,
    pub is_enabled: Option<bool>,
    pub active: Option<bool>,
    pub is_active: Option<bool>,
    pub status: Option<String>,
    /// The editor's "no action" target.
    pub no_action: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub id: String,
    pub label: Option<String>,
    pub style: ButtonStyle,
    pub emoji: Option<String>,
    pub href: Option<String>,
    pub links: ButtonLinks,
    pub flags: DisabledFlags,
}

impl Button {
    /// Parses a button object; non-objects yield `None`.
    pub fn from_value(value: &Value, ids: &mut dyn IdGenerator) -> Option<Self> {
        let map = value.as_object()?;
        let id = id_field(map, "id").unwrap_or_else(|| ids.next_id("button"));
        let action = string_field(map, "action");

        Some(Self {
            id,
            label: string_field(map, "label").or_else(|| string_field(map, "text")),
            style: string_field(map, "style")
                .map(|style| ButtonStyle::parse(&style))
                .unwrap_or_default(),
            emoji: emoji_reference(map),
            href: string_field(map, "href").or_else(|| string_field(map, "url")),
            links: ButtonLinks {
                modal: id_field(map, "modalId").or_else(|| id_field(map, "modal")),
                sub_document: id_field(map, "subEmbedId").or_else(|| id_field(map, "subEmbed")),
                document: id_field(map, "embedId").or_else(|| id_field(map, "targetEmbedId")),
            },
            flags: DisabledFlags {
                disabled: bool_field(map, "disabled").unwrap_or(false),
                is_disabled: bool_field(map, "isDisabled").unwrap_or(false),
                inactive: bool_field(map, "inactive").unwrap_or(false),
                enabled: bool_field(map, "enabled"),
                is_enabled: bool_field(map, "isEnabled"),
                active: bool_field(map, "active"),
                is_active: bool_field(map, "isActive"),
                status: string_field(map, "status"),
                no_action: action
                    .as_deref()
                    .is_some_and(|action| action.eq_ignore_ascii_case("none")),
            },
        })
    }
}

/// One raw select option before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawOption {
    Entry(Map<String, Value>),
    Delimited(String),
}

/// A select list whose options may live under several field names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListItem {
    pub custom_id: Option<String>,
    pub placeholder: Option<String>,
    /// Candidate sources in priority order: `list`, `options`, `items`, `values`.
    pub sources: Vec<Vec<RawOption>>,
}

pub const LIST_SOURCE_FIELDS: [&str; 4] = ["list", "options", "items", "values"];

#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    Image {
        url: String,
    },
    Separator,
    Text {
        content: String,
        thumb_url: Option<String>,
    },
    TextWithButton {
        content: String,
        button: Option<Button>,
        thumb_url: Option<String>,
    },
    Buttons {
        buttons: Vec<Button>,
    },
    List(ListItem),
    Unknown {
        kind: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: String,
    pub placement: Placement,
    pub kind: ItemKind,
}

impl Item {
    /// Parses one editor item. Never fails: unreadable items become `Unknown`.
    pub fn from_value(value: &Value, ids: &mut dyn IdGenerator) -> Self {
        let empty = Map::new();
        let map = value.as_object().unwrap_or(&empty);
        let id = id_field(map, "id").unwrap_or_else(|| ids.next_id("item"));
        let placement = string_field(map, "placement")
            .or_else(|| string_field(map, "position"))
            .or_else(|| string_field(map, "area"))
            .map(|value| Placement::parse(&value))
            .unwrap_or_default();
        let kind_name = string_field(map, "type").unwrap_or_default();

        let kind = match kind_name.as_str() {
            "image" => ItemKind::Image {
                url: string_field(map, "url").unwrap_or_default(),
            },
            "separator" | "divider" => ItemKind::Separator,
            "text" => ItemKind::Text {
                content: content_field(map),
                thumb_url: thumb_field(map),
            },
            "text-with-button" | "text_with_button" | "textWithButton" => {
                ItemKind::TextWithButton {
                    content: content_field(map),
                    button: map
                        .get("button")
                        .and_then(|button| Button::from_value(button, ids)),
                    thumb_url: thumb_field(map),
                }
            }
            "buttons" => ItemKind::Buttons {
                buttons: map
                    .get("buttons")
                    .and_then(Value::as_array)
                    .map(|list| {
                        list.iter()
                            .filter_map(|button| Button::from_value(button, ids))
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            "list" | "select" => ItemKind::List(ListItem {
                custom_id: string_field(map, "customId"),
                placeholder: string_field(map, "placeholder"),
                sources: LIST_SOURCE_FIELDS
                    .iter()
                    .map(|field| raw_options(map.get(*field)))
                    .collect(),
            }),
            _ => ItemKind::Unknown { kind: kind_name },
        };

        Self {
            id,
            placement,
            kind,
        }
    }
}

/// The editor's embed: the only input of an export call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub items: Vec<Item>,
    pub color: Option<i64>,
    pub image_url: Option<String>,
    pub emojis: EmojiCatalog,
}

impl Document {
    /// Reads a document object, or a bare array of items.
    pub fn from_value(value: &Value, ids: &mut dyn IdGenerator) -> ExportResult<Self> {
        let (map, items) = match value {
            Value::Array(items) => (None, Some(items)),
            Value::Object(map) => (
                Some(map),
                map.get("items")
                    .or_else(|| map.get("blocks"))
                    .and_then(Value::as_array),
            ),
            _ => {
                return Err(ExportError::InvalidDocument(
                    "expected an object or an array of items".into(),
                ));
            }
        };

        let items = items
            .map(|list| list.iter().map(|item| Item::from_value(item, ids)).collect())
            .unwrap_or_default();

        let Some(map) = map else {
            return Ok(Self {
                items,
                ..Self::default()
            });
        };

        let emojis = match map.get("emojis") {
            Some(value) => EmojiCatalog::from_value(value)?,
            None => EmojiCatalog::default(),
        };

        Ok(Self {
            items,
            color: map.get("color").and_then(color_value),
            image_url: string_field(map, "imageUrl").or_else(|| string_field(map, "image")),
            emojis,
        })
    }

    pub fn from_json_str(input: &str, ids: &mut dyn IdGenerator) -> ExportResult<Self> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_value(&value, ids)
    }
}

/// Emoji reference from `emoji` (string or object) or the adjacent
/// `emojiUrl` / `emojiId` / `emojiName` fields.
pub(crate) fn emoji_reference(map: &Map<String, Value>) -> Option<String> {
    match map.get("emoji") {
        Some(Value::String(reference)) if !reference.trim().is_empty() => {
            return Some(reference.trim().to_string());
        }
        Some(Value::Object(emoji)) => {
            let name = string_field(emoji, "name");
            let id = id_field(emoji, "id");
            match (name, id) {
                (Some(name), Some(id)) => {
                    let animated = bool_field(emoji, "animated").unwrap_or(false);
                    let prefix = if animated { "a" } else { "" };
                    return Some(format!("<{prefix}:{name}:{id}>"));
                }
                (Some(name), None) => return Some(name),
                (None, id) => {
                    if let Some(url) = string_field(emoji, "url") {
                        return Some(url);
                    }
                    if id.is_some() {
                        return id;
                    }
                }
            }
        }
        _ => {}
    }

    ["emojiUrl", "emoji_url", "emojiId", "emojiName"]
        .iter()
        .find_map(|field| id_field(map, field))
}

/// Trimmed, non-empty string field.
pub(crate) fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Like [`string_field`] but also accepts numbers (editor ids are sometimes numeric).
pub(crate) fn id_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::Number(number) => Some(number.to_string()),
        _ => string_field(map, key),
    }
}

/// Lenient boolean: `true`, `1`, `"true"`, `"yes"`, `"1"`.
pub(crate) fn bool_field(map: &Map<String, Value>, key: &str) -> Option<bool> {
    match map.get(key)? {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => Some(number.as_f64().is_some_and(|n| n != 0.0)),
        Value::String(text) => Some(matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes"
        )),
        _ => None,
    }
}

fn content_field(map: &Map<String, Value>) -> String {
    map.get("content")
        .or_else(|| map.get("text"))
        .and_then(scalar_to_string)
        .unwrap_or_default()
}

fn thumb_field(map: &Map<String, Value>) -> Option<String> {
    string_field(map, "thumbUrl").or_else(|| string_field(map, "thumbnail"))
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn raw_options(value: Option<&Value>) -> Vec<RawOption> {
    match value {
        Some(Value::Array(list)) => list
            .iter()
            .filter_map(|entry| match entry {
                Value::Object(map) => Some(RawOption::Entry(map.clone())),
                other => scalar_to_string(other)
                    .filter(|text| !text.trim().is_empty())
                    .map(RawOption::Delimited),
            })
            .collect(),
        Some(Value::String(text)) => text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| RawOption::Delimited(line.to_string()))
            .collect(),
        _ => Vec::new(),
    }
}

/// Integer colors, or `#RRGGBB` / `0xRRGGBB` strings. Fractional and
/// non-finite numbers are ignored.
fn color_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|n| n.is_finite() && n.fract() == 0.0)
                .map(|n| n as i64)
        }),
        Value::String(text) => {
            let text = text.trim();
            let hex = text
                .strip_prefix('#')
                .or_else(|| text.strip_prefix("0x"))
                .or_else(|| text.strip_prefix("0X"))?;
            i64::from_str_radix(hex, 16).ok()
        }
        _ => None,
    }
}
