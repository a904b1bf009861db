//! Intermediate component tree shared by both renderers.

use crate::document::ButtonStyle;
use crate::emoji::EmojiRef;

/// Protocol limits applied while building the tree. Excess is clipped, never rejected.
pub mod limits {
    pub const MAX_BUTTONS_PER_ROW: usize = 5;
    pub const MAX_SELECT_OPTIONS: usize = 25;
    pub const MAX_OPTION_TEXT: usize = 100;
    pub const MAX_CUSTOM_ID: usize = 100;
    pub const MAX_BUTTON_LABEL: usize = 80;
    pub const MAX_PLACEHOLDER: usize = 150;
}

/// What a button does when pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    Custom(String),
    Url(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonComponent {
    pub label: Option<String>,
    /// Never `Link` for custom buttons; always `Link` for URL buttons.
    pub style: ButtonStyle,
    pub emoji: Option<EmojiRef>,
    pub action: ButtonAction,
    /// Always false for URL buttons.
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
    pub description: Option<String>,
    pub emoji: Option<EmojiRef>,
    pub default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectMenu {
    pub custom_id: String,
    pub placeholder: String,
    pub options: Vec<SelectOption>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    Container {
        accent_color: Option<u32>,
        children: Vec<Component>,
    },
    Media {
        items: Vec<MediaItem>,
    },
    Separator,
    Section {
        texts: Vec<String>,
        thumb_url: Option<String>,
        button: Option<ButtonComponent>,
    },
    ActionRow {
        buttons: Vec<ButtonComponent>,
    },
    SelectRow(SelectMenu),
    Text {
        content: String,
    },
}

/// Root of the IR: one container plus the components rendered below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentTree {
    pub accent_color: Option<u32>,
    pub children: Vec<Component>,
    pub trailing: Vec<Component>,
}

impl ComponentTree {
    /// The root container as a [`Component`].
    pub fn container(&self) -> Component {
        Component::Container {
            accent_color: self.accent_color,
            children: self.children.clone(),
        }
    }
}

/// Keeps at most `max` characters.
pub(crate) fn clip(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}
