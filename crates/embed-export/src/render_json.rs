//! Component tree -> Discord message components JSON.

use crate::document::ButtonStyle;
use crate::emoji::EmojiRef;
use crate::ir::{ButtonAction, ButtonComponent, Component, ComponentTree, SelectMenu};
use serde_json::{Map, Value, json};
use tracing::debug;

mod kind {
    pub const ACTION_ROW: u8 = 1;
    pub const BUTTON: u8 = 2;
    pub const STRING_SELECT: u8 = 3;
    pub const SECTION: u8 = 9;
    pub const TEXT_DISPLAY: u8 = 10;
    pub const THUMBNAIL: u8 = 11;
    pub const MEDIA_GALLERY: u8 = 12;
    pub const SEPARATOR: u8 = 14;
    pub const CONTAINER: u8 = 17;
}

/// `{"components": [container, ...trailing]}`.
pub fn render_json(tree: &ComponentTree) -> Value {
    let mut components = Vec::with_capacity(1 + tree.trailing.len());
    components.push(container_json(tree.accent_color, &tree.children));
    components.extend(tree.trailing.iter().map(component_json));
    debug!(top_level = components.len(), "rendered component json");
    json!({ "components": components })
}

pub fn button_style_code(style: ButtonStyle) -> u8 {
    match style {
        ButtonStyle::Primary => 1,
        ButtonStyle::Secondary => 2,
        ButtonStyle::Success => 3,
        ButtonStyle::Danger => 4,
        ButtonStyle::Link => 5,
    }
}

fn container_json(accent_color: Option<u32>, children: &[Component]) -> Value {
    let mut container = Map::new();
    container.insert("type".into(), json!(kind::CONTAINER));
    if let Some(color) = accent_color {
        container.insert("accent_color".into(), json!(color));
    }
    container.insert(
        "components".into(),
        Value::Array(children.iter().map(component_json).collect()),
    );
    Value::Object(container)
}

fn component_json(component: &Component) -> Value {
    match component {
        Component::Container {
            accent_color,
            children,
        } => container_json(*accent_color, children),
        Component::Media { items } => json!({
            "type": kind::MEDIA_GALLERY,
            "items": items
                .iter()
                .map(|item| json!({ "media": { "url": item.url } }))
                .collect::<Vec<_>>(),
        }),
        Component::Separator => json!({
            "type": kind::SEPARATOR,
            "divider": true,
            "spacing": 1,
        }),
        Component::Section {
            texts,
            thumb_url,
            button,
        } => {
            let accessory = match (button, thumb_url) {
                (Some(button), _) => Some(button_json(button)),
                (None, Some(url)) => Some(json!({
                    "type": kind::THUMBNAIL,
                    "media": { "url": url },
                })),
                (None, None) => None,
            };
            match accessory {
                Some(accessory) => json!({
                    "type": kind::SECTION,
                    "components": texts.iter().map(|text| text_json(text)).collect::<Vec<_>>(),
                    "accessory": accessory,
                }),
                None => text_json(&texts.join("\n")),
            }
        }
        Component::ActionRow { buttons } => json!({
            "type": kind::ACTION_ROW,
            "components": buttons.iter().map(button_json).collect::<Vec<_>>(),
        }),
        Component::SelectRow(menu) => json!({
            "type": kind::ACTION_ROW,
            "components": [select_json(menu)],
        }),
        Component::Text { content } => text_json(content),
    }
}

fn text_json(content: &str) -> Value {
    json!({ "type": kind::TEXT_DISPLAY, "content": content })
}

fn button_json(button: &ButtonComponent) -> Value {
    let mut map = Map::new();
    map.insert("type".into(), json!(kind::BUTTON));
    map.insert("style".into(), json!(button_style_code(button.style)));
    if let Some(label) = &button.label {
        map.insert("label".into(), json!(label));
    }
    if let Some(emoji) = &button.emoji {
        map.insert("emoji".into(), emoji_json(emoji));
    }
    match &button.action {
        ButtonAction::Url(url) => {
            map.insert("url".into(), json!(url));
        }
        ButtonAction::Custom(custom_id) => {
            map.insert("custom_id".into(), json!(custom_id));
            if button.disabled {
                map.insert("disabled".into(), json!(true));
            }
        }
    }
    Value::Object(map)
}

fn select_json(menu: &SelectMenu) -> Value {
    let options: Vec<Value> = menu
        .options
        .iter()
        .map(|option| {
            let mut map = Map::new();
            map.insert("label".into(), json!(option.label));
            map.insert("value".into(), json!(option.value));
            if let Some(description) = &option.description {
                map.insert("description".into(), json!(description));
            }
            if let Some(emoji) = &option.emoji {
                map.insert("emoji".into(), emoji_json(emoji));
            }
            if option.default {
                map.insert("default".into(), json!(true));
            }
            Value::Object(map)
        })
        .collect();

    json!({
        "type": kind::STRING_SELECT,
        "custom_id": menu.custom_id,
        "placeholder": menu.placeholder,
        "options": options,
    })
}

fn emoji_json(emoji: &EmojiRef) -> Value {
    match emoji {
        EmojiRef::Unicode(glyph) => json!({ "name": glyph }),
        EmojiRef::Custom { name, id, animated } => {
            let mut map = Map::new();
            map.insert("name".into(), json!(name));
            if let Some(id) = id {
                map.insert("id".into(), json!(id));
            }
            if *animated {
                map.insert("animated".into(), json!(true));
            }
            Value::Object(map)
        }
    }
}
