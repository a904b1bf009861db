//! Normalizes the many shapes a select list arrives in.
//!
//! Options come as objects, as `label|description|emoji|selected|value`
//! strings, or hidden inside free text as `N - label - description` rating
//! lines.

use crate::document::{ListItem, RawOption, bool_field, emoji_reference, id_field};
use crate::emoji::{EmojiCatalog, resolve_emoji};
use crate::ir::{SelectMenu, SelectOption, clip, limits};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

pub const DEFAULT_PLACEHOLDER: &str = "Choose an option";
pub const RATING_PLACEHOLDER: &str = "Rate";

static RATING_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([1-5])\s*[-–—]\s*(.+?)(?:\s+[-–—]\s+(.+?))?\s*$").expect("rating regex")
});

/// Builds a select menu from a list item, or `None` when no option survives.
pub fn parse_options(
    list: &ListItem,
    item_id: &str,
    catalog: &EmojiCatalog,
) -> Option<SelectMenu> {
    let source = list.sources.iter().find(|source| !source.is_empty())?;

    let mut options: Vec<SelectOption> = source
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| match raw {
            RawOption::Entry(map) => option_from_entry(map, index, catalog),
            RawOption::Delimited(text) => option_from_delimited(text, index, catalog),
        })
        .collect();

    if options.is_empty() {
        debug!(item_id, "list item has no usable options");
        return None;
    }
    if options.len() > limits::MAX_SELECT_OPTIONS {
        debug!(
            item_id,
            count = options.len(),
            "select options truncated to {}",
            limits::MAX_SELECT_OPTIONS
        );
        options.truncate(limits::MAX_SELECT_OPTIONS);
    }

    let custom_id = list
        .custom_id
        .clone()
        .unwrap_or_else(|| format!("select:{item_id}"));
    let placeholder = list
        .placeholder
        .clone()
        .unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_string());

    Some(SelectMenu {
        custom_id: clip(&custom_id, limits::MAX_CUSTOM_ID),
        placeholder: clip(&placeholder, limits::MAX_PLACEHOLDER),
        options,
    })
}

/// Extracts `<1-5> - label[ - description]` lines from free text into a rating select.
pub fn parse_rating_text(text: &str, item_id: &str) -> Option<SelectMenu> {
    let mut options: Vec<SelectOption> = text
        .lines()
        .filter_map(|line| RATING_LINE_RE.captures(line))
        .filter_map(|caps| {
            // `3 - ` leaves only whitespace for the label.
            let label = caps[2].trim();
            if label.is_empty() {
                return None;
            }
            Some(SelectOption {
                label: clip(label, limits::MAX_OPTION_TEXT),
                value: format!("rate_{}", &caps[1]),
                description: caps
                    .get(3)
                    .map(|desc| clip(desc.as_str().trim(), limits::MAX_OPTION_TEXT)),
                emoji: None,
                default: false,
            })
        })
        .collect();

    if options.is_empty() {
        return None;
    }
    options.truncate(limits::MAX_SELECT_OPTIONS);

    Some(SelectMenu {
        custom_id: clip(&format!("rating:{item_id}"), limits::MAX_CUSTOM_ID),
        placeholder: RATING_PLACEHOLDER.to_string(),
        options,
    })
}

fn option_from_entry(
    map: &Map<String, Value>,
    index: usize,
    catalog: &EmojiCatalog,
) -> Option<SelectOption> {
    let label = id_field(map, "label").or_else(|| id_field(map, "text"))?;
    let value = id_field(map, "value").unwrap_or_else(|| slugify(&label, index));
    let default = ["default", "selected", "isDefault"]
        .iter()
        .any(|key| bool_field(map, key).unwrap_or(false));

    Some(SelectOption {
        label: clip(&label, limits::MAX_OPTION_TEXT),
        value: clip(&value, limits::MAX_OPTION_TEXT),
        description: id_field(map, "description")
            .map(|desc| clip(&desc, limits::MAX_OPTION_TEXT)),
        emoji: emoji_reference(map).and_then(|reference| resolve_emoji(&reference, catalog)),
        default,
    })
}

fn option_from_delimited(
    text: &str,
    index: usize,
    catalog: &EmojiCatalog,
) -> Option<SelectOption> {
    let fields: Vec<&str> = text.split('|').map(str::trim).collect();
    let field = |n: usize| fields.get(n).copied().filter(|value| !value.is_empty());

    let label = field(0)?;
    let selected = field(3).is_some_and(|flag| {
        matches!(flag.to_ascii_lowercase().as_str(), "selected" | "true" | "1")
    });
    let value = field(4)
        .map(str::to_string)
        .unwrap_or_else(|| slugify(label, index));

    Some(SelectOption {
        label: clip(label, limits::MAX_OPTION_TEXT),
        value: clip(&value, limits::MAX_OPTION_TEXT),
        description: field(1).map(|desc| clip(desc, limits::MAX_OPTION_TEXT)),
        emoji: field(2).and_then(|reference| resolve_emoji(reference, catalog)),
        default: selected,
    })
}

/// Lowercased label with runs of non-alphanumerics collapsed to `_`.
fn slugify(label: &str, index: usize) -> String {
    let mut slug = String::with_capacity(label.len());
    for ch in label.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug = slug.trim_end_matches('_');
    if slug.is_empty() {
        format!("option_{}", index + 1)
    } else {
        slug.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emoji::EmojiRef;
    use serde_json::json;

    fn list_from(field: usize, entries: Vec<RawOption>) -> ListItem {
        let mut sources = vec![Vec::new(); 4];
        sources[field] = entries;
        ListItem {
            custom_id: None,
            placeholder: None,
            sources,
        }
    }

    fn entry(value: Value) -> RawOption {
        RawOption::Entry(value.as_object().unwrap().clone())
    }

    #[test]
    fn reads_object_entries() {
        let list = list_from(
            1,
            vec![
                entry(json!({"label": "Red Apple", "description": "crisp", "selected": true})),
                entry(json!({"text": "Pear", "value": "p", "emoji": "🍐"})),
                entry(json!({"description": "no label"})),
            ],
        );
        let menu = parse_options(&list, "fruit", &EmojiCatalog::default()).unwrap();
        assert_eq!(menu.custom_id, "select:fruit");
        assert_eq!(menu.placeholder, DEFAULT_PLACEHOLDER);
        assert_eq!(menu.options.len(), 2);
        assert_eq!(menu.options[0].value, "red_apple");
        assert!(menu.options[0].default);
        assert_eq!(menu.options[0].description.as_deref(), Some("crisp"));
        assert_eq!(menu.options[1].value, "p");
        assert_eq!(menu.options[1].emoji, Some(EmojiRef::Unicode("🍐".into())));
    }

    #[test]
    fn reads_delimited_entries() {
        let list = list_from(
            0,
            vec![
                RawOption::Delimited("Alpha|First letter|⭐|SELECTED|a".into()),
                RawOption::Delimited("Beta".into()),
                RawOption::Delimited("|orphan description".into()),
            ],
        );
        let menu = parse_options(&list, "greek", &EmojiCatalog::default()).unwrap();
        assert_eq!(menu.options.len(), 2);
        let alpha = &menu.options[0];
        assert_eq!(alpha.value, "a");
        assert!(alpha.default);
        assert_eq!(alpha.emoji, Some(EmojiRef::Unicode("⭐".into())));
        let beta = &menu.options[1];
        assert_eq!(beta.value, "beta");
        assert_eq!(beta.description, None);
        assert!(!beta.default);
    }

    #[test]
    fn first_non_empty_source_wins() {
        let mut list = list_from(2, vec![RawOption::Delimited("From items".into())]);
        list.sources[3] = vec![RawOption::Delimited("From values".into())];
        let menu = parse_options(&list, "x", &EmojiCatalog::default()).unwrap();
        assert_eq!(menu.options[0].label, "From items");
    }

    #[test]
    fn truncates_to_twenty_five_options() {
        let entries = (1..=30)
            .map(|n| RawOption::Delimited(format!("Option {n}")))
            .collect();
        let menu = parse_options(&list_from(1, entries), "many", &EmojiCatalog::default()).unwrap();
        assert_eq!(menu.options.len(), 25);
        assert_eq!(menu.options[24].value, "option_25");
    }

    #[test]
    fn clips_long_labels() {
        let long = "x".repeat(140);
        let list = list_from(0, vec![RawOption::Delimited(format!("{long}|{long}"))]);
        let menu = parse_options(&list, "long", &EmojiCatalog::default()).unwrap();
        assert_eq!(menu.options[0].label.chars().count(), 100);
        assert_eq!(menu.options[0].description.as_ref().unwrap().len(), 100);
        assert_eq!(menu.options[0].value.len(), 100);
    }

    #[test]
    fn empty_lists_yield_none() {
        assert!(parse_options(&ListItem::default(), "e", &EmojiCatalog::default()).is_none());
        let list = list_from(0, vec![RawOption::Delimited("  |  ".into())]);
        assert!(parse_options(&list, "e", &EmojiCatalog::default()).is_none());
    }

    #[test]
    fn slug_falls_back_to_position() {
        assert_eq!(slugify("!!!", 2), "option_3");
        assert_eq!(slugify("Да, конечно!", 0), "да_конечно");
    }

    #[test]
    fn extracts_rating_lines() {
        let menu =
            parse_rating_text("1 - Плохо - совсем не понравилось\n5 - Отлично", "r1").unwrap();
        assert_eq!(menu.custom_id, "rating:r1");
        let values: Vec<&str> = menu.options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, ["rate_1", "rate_5"]);
        assert_eq!(menu.options[0].label, "Плохо");
        assert_eq!(
            menu.options[0].description.as_deref(),
            Some("совсем не понравилось")
        );
        assert_eq!(menu.options[1].label, "Отлично");
        assert_eq!(menu.options[1].description, None);
    }

    #[test]
    fn ignores_text_without_rating_lines() {
        assert!(parse_rating_text("Welcome!\n10 - not a rating\n0 - nope", "r").is_none());
        assert!(parse_rating_text("", "r").is_none());
    }

    #[test]
    fn rating_lines_without_label_are_skipped() {
        let menu = parse_rating_text("3 - \n5 - Good", "r").unwrap();
        let labels: Vec<&str> = menu.options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, ["Good"]);
        assert_eq!(menu.options[0].value, "rate_5");
        assert!(parse_rating_text("1 -   \n2 -\t", "r").is_none());
    }
}
