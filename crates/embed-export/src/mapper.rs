//! Item -> component rules.

use crate::document::{Button, ButtonStyle, DisabledFlags, Item, ItemKind};
use crate::emoji::{EmojiCatalog, resolve_emoji, substitute_shortcodes};
use crate::ir::{ButtonAction, ButtonComponent, Component, MediaItem, clip, limits};
use tracing::debug;

const DISABLED_STATUSES: [&str; 3] = ["disabled", "inactive", "off"];

/// Maps one document item to at most one component.
///
/// List items are handled by the option parser before they get here and
/// always map to `None`, as do unknown items and items missing their
/// required field.
pub fn map_item(item: &Item, catalog: &EmojiCatalog) -> Option<Component> {
    match &item.kind {
        ItemKind::Image { url } => {
            let url = url.trim();
            if url.is_empty() {
                debug!(item = %item.id, "image item without url dropped");
                return None;
            }
            Some(Component::Media {
                items: vec![MediaItem {
                    url: url.to_string(),
                }],
            })
        }
        ItemKind::Separator => Some(Component::Separator),
        ItemKind::Text { content, thumb_url } => {
            text_section(&item.id, content, thumb_url.clone(), None)
        }
        ItemKind::TextWithButton {
            content,
            button,
            thumb_url,
        } => text_section(
            &item.id,
            content,
            thumb_url.clone(),
            button.as_ref().map(|button| map_button(button, catalog)),
        ),
        ItemKind::Buttons { buttons } => {
            if buttons.is_empty() {
                debug!(item = %item.id, "buttons item without buttons dropped");
                return None;
            }
            if buttons.len() > limits::MAX_BUTTONS_PER_ROW {
                debug!(
                    item = %item.id,
                    count = buttons.len(),
                    "action row truncated to {}",
                    limits::MAX_BUTTONS_PER_ROW
                );
            }
            Some(Component::ActionRow {
                buttons: buttons
                    .iter()
                    .take(limits::MAX_BUTTONS_PER_ROW)
                    .map(|button| map_button(button, catalog))
                    .collect(),
            })
        }
        ItemKind::List(_) => None,
        ItemKind::Unknown { kind } => {
            debug!(item = %item.id, kind = %kind, "unknown item type dropped");
            None
        }
    }
}

/// Resolves a button's target, style, emoji and disabled state.
///
/// An `href` always wins and produces a link button that can never be
/// disabled; internal link fields are then ignored.
pub fn map_button(button: &Button, catalog: &EmojiCatalog) -> ButtonComponent {
    let label = button
        .label
        .as_deref()
        .map(|label| clip(label, limits::MAX_BUTTON_LABEL));
    let emoji = button
        .emoji
        .as_deref()
        .and_then(|reference| resolve_emoji(reference, catalog));

    if let Some(href) = &button.href {
        return ButtonComponent {
            label,
            style: ButtonStyle::Link,
            emoji,
            action: ButtonAction::Url(href.clone()),
            disabled: false,
        };
    }

    let style = match button.style {
        ButtonStyle::Link => ButtonStyle::Secondary,
        other => other,
    };
    let disabled = button.style != ButtonStyle::Link && is_disabled(&button.flags);

    ButtonComponent {
        label,
        style,
        emoji,
        action: ButtonAction::Custom(clip(&custom_action_id(button), limits::MAX_CUSTOM_ID)),
        disabled,
    }
}

/// `modal:` > `sub:` > `doc:` > `btn:<own id>`.
pub fn custom_action_id(button: &Button) -> String {
    let links = &button.links;
    if let Some(modal) = &links.modal {
        format!("modal:{modal}")
    } else if let Some(sub) = &links.sub_document {
        format!("sub:{sub}")
    } else if let Some(document) = &links.document {
        format!("doc:{document}")
    } else {
        format!("btn:{}", button.id)
    }
}

/// Any single legacy flag is enough to disable a button.
pub fn is_disabled(flags: &DisabledFlags) -> bool {
    let status_disabled = flags.status.as_deref().is_some_and(|status| {
        DISABLED_STATUSES
            .iter()
            .any(|candidate| status.eq_ignore_ascii_case(candidate))
    });

    flags.disabled
        || flags.is_disabled
        || flags.inactive
        || flags.enabled == Some(false)
        || flags.is_enabled == Some(false)
        || flags.active == Some(false)
        || flags.is_active == Some(false)
        || status_disabled
        || flags.no_action
}

fn text_section(
    item_id: &str,
    content: &str,
    thumb_url: Option<String>,
    button: Option<ButtonComponent>,
) -> Option<Component> {
    if content.trim().is_empty() {
        debug!(item = item_id, "text item without content dropped");
        return None;
    }
    Some(Component::Section {
        texts: vec![substitute_shortcodes(content)],
        thumb_url,
        button,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ButtonLinks, Placement};
    use crate::emoji::{EmojiEntry, EmojiRef};

    fn button(id: &str) -> Button {
        Button {
            id: id.to_string(),
            label: Some("Go".into()),
            style: ButtonStyle::Primary,
            emoji: None,
            href: None,
            links: ButtonLinks::default(),
            flags: DisabledFlags::default(),
        }
    }

    fn item(kind: ItemKind) -> Item {
        Item {
            id: "i".into(),
            placement: Placement::Main,
            kind,
        }
    }

    #[test]
    fn empty_image_maps_to_none() {
        let catalog = EmojiCatalog::default();
        assert_eq!(map_item(&item(ItemKind::Image { url: "  ".into() }), &catalog), None);
        assert_eq!(
            map_item(&item(ItemKind::Image { url: "https://x/y.png".into() }), &catalog),
            Some(Component::Media {
                items: vec![MediaItem {
                    url: "https://x/y.png".into()
                }]
            })
        );
    }

    #[test]
    fn text_gets_shortcodes_substituted() {
        let mapped = map_item(
            &item(ItemKind::Text {
                content: "Hi :wave:".into(),
                thumb_url: Some("https://x/t.png".into()),
            }),
            &EmojiCatalog::default(),
        );
        assert_eq!(
            mapped,
            Some(Component::Section {
                texts: vec!["Hi ${emojis.wave}".into()],
                thumb_url: Some("https://x/t.png".into()),
                button: None,
            })
        );
    }

    #[test]
    fn blank_text_and_unknown_items_drop() {
        let catalog = EmojiCatalog::default();
        let blank = item(ItemKind::Text {
            content: " \n".into(),
            thumb_url: None,
        });
        assert_eq!(map_item(&blank, &catalog), None);
        let unknown = item(ItemKind::Unknown {
            kind: "poll".into(),
        });
        assert_eq!(map_item(&unknown, &catalog), None);
        assert_eq!(map_item(&item(ItemKind::Separator), &catalog), Some(Component::Separator));
    }

    #[test]
    fn action_row_keeps_five_buttons() {
        let buttons = (0..7).map(|n| button(&n.to_string())).collect();
        let Some(Component::ActionRow { buttons }) =
            map_item(&item(ItemKind::Buttons { buttons }), &EmojiCatalog::default())
        else {
            panic!("expected action row");
        };
        assert_eq!(buttons.len(), 5);
        assert_eq!(buttons[4].action, ButtonAction::Custom("btn:4".into()));
    }

    #[test]
    fn href_wins_over_internal_links() {
        let mut b = button("b");
        b.href = Some("https://example.com".into());
        b.links.modal = Some("m".into());
        b.flags.disabled = true;
        let mapped = map_button(&b, &EmojiCatalog::default());
        assert_eq!(mapped.action, ButtonAction::Url("https://example.com".into()));
        assert_eq!(mapped.style, ButtonStyle::Link);
        assert!(!mapped.disabled);
    }

    #[test]
    fn custom_id_priority() {
        let mut b = button("own");
        assert_eq!(custom_action_id(&b), "btn:own");
        b.links.document = Some("d".into());
        assert_eq!(custom_action_id(&b), "doc:d");
        b.links.sub_document = Some("s".into());
        assert_eq!(custom_action_id(&b), "sub:s");
        b.links.modal = Some("m".into());
        assert_eq!(custom_action_id(&b), "modal:m");
    }

    #[test]
    fn any_legacy_flag_disables() {
        let cases = [
            DisabledFlags {
                inactive: true,
                ..Default::default()
            },
            DisabledFlags {
                is_enabled: Some(false),
                ..Default::default()
            },
            DisabledFlags {
                is_active: Some(false),
                ..Default::default()
            },
            DisabledFlags {
                status: Some("Disabled".into()),
                ..Default::default()
            },
            DisabledFlags {
                no_action: true,
                ..Default::default()
            },
        ];
        for flags in &cases {
            assert!(is_disabled(flags), "{flags:?}");
        }
        assert!(!is_disabled(&DisabledFlags {
            enabled: Some(true),
            status: Some("live".into()),
            ..Default::default()
        }));
    }

    #[test]
    fn link_style_without_href_is_never_disabled() {
        let mut b = button("l");
        b.style = ButtonStyle::Link;
        b.flags.disabled = true;
        let mapped = map_button(&b, &EmojiCatalog::default());
        assert_eq!(mapped.style, ButtonStyle::Secondary);
        assert!(!mapped.disabled);
        assert_eq!(mapped.action, ButtonAction::Custom("btn:l".into()));
    }

    #[test]
    fn long_labels_and_ids_are_clipped() {
        let mut b = button(&"i".repeat(150));
        b.label = Some("ж".repeat(90));
        let mapped = map_button(&b, &EmojiCatalog::default());
        assert_eq!(
            mapped.label.as_deref().map(|label| label.chars().count()),
            Some(limits::MAX_BUTTON_LABEL)
        );
        let ButtonAction::Custom(custom_id) = &mapped.action else {
            panic!("expected custom action");
        };
        assert_eq!(custom_id.chars().count(), limits::MAX_CUSTOM_ID);
        assert!(custom_id.starts_with("btn:iii"));
    }

    #[test]
    fn text_with_missing_button_is_a_plain_section() {
        let mapped = map_item(
            &item(ItemKind::TextWithButton {
                content: "No button here".into(),
                button: None,
                thumb_url: None,
            }),
            &EmojiCatalog::default(),
        );
        assert_eq!(
            mapped,
            Some(Component::Section {
                texts: vec!["No button here".into()],
                thumb_url: None,
                button: None,
            })
        );
    }

    #[test]
    fn unresolved_emoji_is_omitted() {
        let catalog = EmojiCatalog::new(vec![EmojiEntry::from_url(
            "star",
            "https://cdn/emojis/123456789012345678.png",
        )]);
        let mut b = button("e");
        b.emoji = Some("https://cdn/unknown.png".into());
        assert_eq!(map_button(&b, &catalog).emoji, None);
        b.emoji = Some("https://cdn/emojis/123456789012345678.png".into());
        assert_eq!(
            map_button(&b, &catalog).emoji,
            Some(EmojiRef::Custom {
                name: "star".into(),
                id: Some("123456789012345678".into()),
                animated: false,
            })
        );
    }
}
