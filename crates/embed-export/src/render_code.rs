//! Component tree -> discord.js builder source.
//!
//! Custom ids are made unique while walking: the second `btn:x` becomes
//! `btn:x#2`, the third `btn:x#3`, in emission order (container first, then
//! trailing rows). A suffix already taken by a literal id is skipped, and the
//! base is clipped so the suffixed id stays within the custom id limit.

use crate::config::CodeNames;
use crate::document::ButtonStyle;
use crate::emoji::{EMOJI_OBJECT, EmojiRef, js_string, lookup_expression};
use crate::ir::{
    ButtonAction, ButtonComponent, Component, ComponentTree, MediaItem, SelectMenu, clip, limits,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use tracing::debug;

static LOOKUP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"\$\{{{EMOJI_OBJECT}(?:\.[A-Za-z_$][A-Za-z0-9_$]*|\["(?:[^"\\]|\\.)*"\])\}}"#
    ))
    .expect("lookup regex")
});

/// Renders the tree as builder code using the given variable names.
pub fn render_code(tree: &ComponentTree, names: &CodeNames) -> String {
    let mut writer = CodeWriter::default();
    let mut lines = vec![format!("const {} = new ContainerBuilder()", names.container)];
    if let Some(color) = tree.accent_color {
        lines.push(format!("  .setAccentColor(0x{color:06X})"));
    }
    for child in &tree.children {
        for call in writer.container_calls(child) {
            lines.push(format!("  {call}"));
        }
    }
    if let Some(last) = lines.last_mut() {
        last.push(';');
    }

    let mut out = lines.join("\n");
    out.push_str("\n\n");
    out.push_str(&format!("const {} = [];\n", names.rows));
    for component in &tree.trailing {
        let expr = writer.standalone(component);
        out.push_str(&format!("{}.push({expr});\n", names.rows));
    }
    out.push('\n');
    out.push_str(&format!(
        "const {} = [{}, ...{}];\n",
        names.components, names.container, names.rows
    ));

    debug!(
        bytes = out.len(),
        custom_ids = writer.emitted.len(),
        "rendered builder code"
    );
    out
}

/// discord.js `ButtonStyle` member for a style.
pub fn button_style_const(style: ButtonStyle) -> &'static str {
    match style {
        ButtonStyle::Primary => "ButtonStyle.Primary",
        ButtonStyle::Secondary => "ButtonStyle.Secondary",
        ButtonStyle::Success => "ButtonStyle.Success",
        ButtonStyle::Danger => "ButtonStyle.Danger",
        ButtonStyle::Link => "ButtonStyle.Link",
    }
}

#[derive(Debug, Clone, Copy)]
enum Part {
    TextDisplay,
    Section,
    MediaGallery,
    Separator,
    ActionRow,
    Container,
}

impl Part {
    fn builder(self) -> &'static str {
        match self {
            Part::TextDisplay => "TextDisplayBuilder",
            Part::Section => "SectionBuilder",
            Part::MediaGallery => "MediaGalleryBuilder",
            Part::Separator => "SeparatorBuilder",
            Part::ActionRow => "ActionRowBuilder",
            Part::Container => "ContainerBuilder",
        }
    }

    /// `(adder, callback parameter)` on `ContainerBuilder`.
    fn container_adder(self) -> Option<(&'static str, &'static str)> {
        match self {
            Part::TextDisplay => Some(("addTextDisplayComponents", "text")),
            Part::Section => Some(("addSectionComponents", "section")),
            Part::MediaGallery => Some(("addMediaGalleryComponents", "gallery")),
            Part::Separator => Some(("addSeparatorComponents", "separator")),
            Part::ActionRow => Some(("addActionRowComponents", "row")),
            Part::Container => None,
        }
    }
}

#[derive(Debug, Default)]
struct CodeWriter {
    emitted: HashSet<String>,
    /// Next suffix to try per base id.
    next_suffix: HashMap<String, usize>,
}

impl CodeWriter {
    fn unique_id(&mut self, custom_id: &str) -> String {
        if self.emitted.insert(custom_id.to_string()) {
            return custom_id.to_string();
        }
        let mut n = self.next_suffix.get(custom_id).copied().unwrap_or(2);
        loop {
            let suffix = format!("#{n}");
            let room = limits::MAX_CUSTOM_ID.saturating_sub(suffix.len());
            let candidate = format!("{}{suffix}", clip(custom_id, room));
            n += 1;
            if self.emitted.insert(candidate.clone()) {
                self.next_suffix.insert(custom_id.to_string(), n);
                return candidate;
            }
        }
    }

    /// One `.addXComponents(...)` call per component; nested containers are flattened.
    fn container_calls(&mut self, component: &Component) -> Vec<String> {
        if let Component::Container { children, .. } = component {
            return children
                .iter()
                .flat_map(|child| self.container_calls(child))
                .collect();
        }
        let (part, chain) = self.chain(component);
        match part.container_adder() {
            Some((adder, param)) => vec![format!(".{adder}(({param}) => {param}{chain})")],
            None => Vec::new(),
        }
    }

    /// `new XBuilder()...` expression for a top-level component.
    fn standalone(&mut self, component: &Component) -> String {
        let (part, chain) = self.chain(component);
        format!("new {}(){chain}", part.builder())
    }

    fn chain(&mut self, component: &Component) -> (Part, String) {
        match component {
            Component::Container {
                accent_color,
                children,
            } => {
                let mut chain = accent_color
                    .map(|color| format!(".setAccentColor(0x{color:06X})"))
                    .unwrap_or_default();
                for child in children {
                    for call in self.container_calls(child) {
                        chain.push_str(&call);
                    }
                }
                (Part::Container, chain)
            }
            Component::Text { content } => (Part::TextDisplay, text_chain(content)),
            Component::Section {
                texts,
                thumb_url,
                button,
            } => match (button, thumb_url) {
                (None, None) => (Part::TextDisplay, text_chain(&texts.join("\n"))),
                (button, thumb_url) => {
                    let texts = texts
                        .iter()
                        .map(|text| format!("(text) => text{}", text_chain(text)))
                        .collect::<Vec<_>>()
                        .join(", ");
                    let accessory = match (button, thumb_url) {
                        (Some(button), _) => format!(
                            ".setButtonAccessory((button) => button{})",
                            self.button_chain(button)
                        ),
                        (None, Some(url)) => format!(
                            ".setThumbnailAccessory((thumbnail) => thumbnail.setURL({}))",
                            js_string(url)
                        ),
                        (None, None) => String::new(),
                    };
                    (
                        Part::Section,
                        format!(".addTextDisplayComponents({texts}){accessory}"),
                    )
                }
            },
            Component::Media { items } => (Part::MediaGallery, media_chain(items)),
            Component::Separator => (Part::Separator, ".setDivider(true)".to_string()),
            Component::ActionRow { buttons } => {
                let buttons = buttons
                    .iter()
                    .map(|button| format!("new ButtonBuilder(){}", self.button_chain(button)))
                    .collect::<Vec<_>>()
                    .join(", ");
                (Part::ActionRow, format!(".addComponents({buttons})"))
            }
            Component::SelectRow(menu) => (
                Part::ActionRow,
                format!(".addComponents({})", self.select_expr(menu)),
            ),
        }
    }

    fn button_chain(&mut self, button: &ButtonComponent) -> String {
        let mut chain = String::new();
        match &button.action {
            ButtonAction::Url(url) => {
                if let Some(label) = &button.label {
                    chain.push_str(&format!(".setLabel({})", js_string(label)));
                }
                chain.push_str(&format!(
                    ".setStyle({}).setURL({})",
                    button_style_const(ButtonStyle::Link),
                    js_string(url)
                ));
                if let Some(emoji) = &button.emoji {
                    chain.push_str(&format!(".setEmoji({})", emoji_expr(emoji)));
                }
            }
            ButtonAction::Custom(custom_id) => {
                let custom_id = self.unique_id(custom_id);
                chain.push_str(&format!(".setCustomId({})", js_string(&custom_id)));
                if let Some(label) = &button.label {
                    chain.push_str(&format!(".setLabel({})", js_string(label)));
                }
                chain.push_str(&format!(".setStyle({})", button_style_const(button.style)));
                if let Some(emoji) = &button.emoji {
                    chain.push_str(&format!(".setEmoji({})", emoji_expr(emoji)));
                }
                if button.disabled {
                    chain.push_str(".setDisabled(true)");
                }
            }
        }
        chain
    }

    fn select_expr(&mut self, menu: &SelectMenu) -> String {
        let custom_id = self.unique_id(&menu.custom_id);
        let options = menu
            .options
            .iter()
            .map(|option| {
                let mut fields = vec![
                    format!("label: {}", js_string(&option.label)),
                    format!("value: {}", js_string(&option.value)),
                ];
                if let Some(description) = &option.description {
                    fields.push(format!("description: {}", js_string(description)));
                }
                if let Some(emoji) = &option.emoji {
                    fields.push(format!("emoji: {}", emoji_expr(emoji)));
                }
                if option.default {
                    fields.push("default: true".to_string());
                }
                format!("{{ {} }}", fields.join(", "))
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "new StringSelectMenuBuilder().setCustomId({}).setPlaceholder({}).addOptions({options})",
            js_string(&custom_id),
            js_string(&menu.placeholder)
        )
    }
}

fn text_chain(content: &str) -> String {
    format!(".setContent({})", template_literal(content))
}

fn media_chain(items: &[MediaItem]) -> String {
    let items = items
        .iter()
        .map(|item| format!("(item) => item.setURL({})", js_string(&item.url)))
        .collect::<Vec<_>>()
        .join(", ");
    format!(".addItems({items})")
}

fn emoji_expr(emoji: &EmojiRef) -> String {
    match emoji {
        EmojiRef::Custom { name, .. } => format!("{}.id", lookup_expression(name)),
        EmojiRef::Unicode(glyph) => js_string(glyph),
    }
}

/// Backtick literal in which only emoji lookups stay interpolated.
fn template_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('`');
    let mut last = 0;
    for lookup in LOOKUP_RE.find_iter(text) {
        escape_template_text(&text[last..lookup.start()], &mut out);
        out.push_str(lookup.as_str());
        last = lookup.end();
    }
    escape_template_text(&text[last..], &mut out);
    out.push('`');
    out
}

fn escape_template_text(text: &str, out: &mut String) {
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '`' => out.push_str("\\`"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
            other => out.push(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button(custom_id: &str) -> ButtonComponent {
        ButtonComponent {
            label: Some("Go".into()),
            style: ButtonStyle::Primary,
            emoji: None,
            action: ButtonAction::Custom(custom_id.into()),
            disabled: false,
        }
    }

    fn tree(children: Vec<Component>, trailing: Vec<Component>) -> ComponentTree {
        ComponentTree {
            accent_color: None,
            children,
            trailing,
        }
    }

    #[test]
    fn empty_tree_still_declares_rows() {
        let code = render_code(&tree(Vec::new(), Vec::new()), &CodeNames::default());
        assert_eq!(
            code,
            "const container = new ContainerBuilder();\n\nconst footerRows = [];\n\nconst components = [container, ...footerRows];\n"
        );
    }

    #[test]
    fn duplicate_custom_ids_get_suffixes() {
        let row = Component::ActionRow {
            buttons: vec![button("btn:x"), button("btn:x")],
        };
        let trailing = Component::ActionRow {
            buttons: vec![button("btn:x")],
        };
        let code = render_code(&tree(vec![row], vec![trailing]), &CodeNames::default());
        assert_eq!(code.matches(r#"setCustomId("btn:x")"#).count(), 1);
        assert_eq!(code.matches(r#"setCustomId("btn:x#2")"#).count(), 1);
        assert_eq!(code.matches(r#"setCustomId("btn:x#3")"#).count(), 1);
        assert!(code.find("btn:x#2").unwrap() < code.find("btn:x#3").unwrap());
    }

    #[test]
    fn suffixes_skip_ids_already_taken() {
        let row = Component::ActionRow {
            buttons: vec![button("btn:x"), button("btn:x#2"), button("btn:x")],
        };
        let code = render_code(&tree(vec![row], Vec::new()), &CodeNames::default());
        assert_eq!(code.matches(r#"setCustomId("btn:x")"#).count(), 1);
        assert_eq!(code.matches(r#"setCustomId("btn:x#2")"#).count(), 1);
        assert_eq!(code.matches(r#"setCustomId("btn:x#3")"#).count(), 1);
    }

    #[test]
    fn suffixed_ids_stay_within_limit() {
        let long = format!("btn:{}", "a".repeat(96));
        let mut writer = CodeWriter::default();
        assert_eq!(writer.unique_id(&long), long);
        let second = writer.unique_id(&long);
        assert_eq!(second.chars().count(), limits::MAX_CUSTOM_ID);
        assert!(second.ends_with("a#2"));
        assert_ne!(second, long);
    }

    #[test]
    fn template_literal_keeps_only_emoji_lookups_live() {
        assert_eq!(
            template_literal("Hi ${emojis.wave} `${user}` \\ ${emojis[\"my-emoji\"]}\nbye"),
            "`Hi ${emojis.wave} \\`\\${user}\\` \\\\ ${emojis[\"my-emoji\"]}\\nbye`"
        );
    }

    #[test]
    fn emoji_expressions() {
        let custom = EmojiRef::Custom {
            name: "star".into(),
            id: None,
            animated: false,
        };
        assert_eq!(emoji_expr(&custom), "emojis.star.id");
        let dashed = EmojiRef::Custom {
            name: "gold-star".into(),
            id: Some("1".into()),
            animated: false,
        };
        assert_eq!(emoji_expr(&dashed), r#"emojis["gold-star"].id"#);
        assert_eq!(emoji_expr(&EmojiRef::Unicode("🔥".into())), "\"🔥\"");
    }

    #[test]
    fn url_buttons_have_no_custom_id_or_disabled() {
        let link = ButtonComponent {
            label: Some("Docs".into()),
            style: ButtonStyle::Link,
            emoji: None,
            action: ButtonAction::Url("https://docs".into()),
            disabled: true,
        };
        let mut writer = CodeWriter::default();
        assert_eq!(
            writer.button_chain(&link),
            r#".setLabel("Docs").setStyle(ButtonStyle.Link).setURL("https://docs")"#
        );
    }

    #[test]
    fn standalone_text_and_separator() {
        let mut writer = CodeWriter::default();
        assert_eq!(
            writer.standalone(&Component::Text {
                content: "hi".into()
            }),
            "new TextDisplayBuilder().setContent(`hi`)"
        );
        assert_eq!(
            writer.standalone(&Component::Separator),
            "new SeparatorBuilder().setDivider(true)"
        );
    }
}
