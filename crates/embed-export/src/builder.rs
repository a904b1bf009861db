//! Walks a document and assembles the component tree.

use crate::document::{Document, ItemKind, Placement};
use crate::emoji::EmojiCatalog;
use crate::ir::{Component, ComponentTree};
use crate::mapper::map_item;
use crate::options::{parse_options, parse_rating_text};
use tracing::debug;

/// Builds the IR for one export call.
///
/// Items keep their document order. Footer buttons and selects, and selects
/// extracted from rating-style text, go to `trailing`; everything else that
/// maps lands in the container.
pub fn build_tree(document: &Document, catalog: &EmojiCatalog) -> ComponentTree {
    let mut children: Vec<Component> = Vec::new();
    let mut trailing: Vec<Component> = Vec::new();

    for item in &document.items {
        match &item.kind {
            ItemKind::List(list) => {
                let Some(menu) = parse_options(list, &item.id, catalog) else {
                    debug!(item = %item.id, "list item dropped");
                    continue;
                };
                let select = Component::SelectRow(menu);
                match item.placement {
                    Placement::Footer => trailing.push(select),
                    Placement::Main => children.push(select),
                }
            }
            ItemKind::Text { content, .. } => {
                if let Some(menu) = parse_rating_text(content, &item.id) {
                    debug!(item = %item.id, options = menu.options.len(), "rating text became a select");
                    trailing.push(Component::SelectRow(menu));
                } else if let Some(component) = map_item(item, catalog) {
                    children.push(component);
                }
            }
            ItemKind::Buttons { .. } if item.placement == Placement::Footer => {
                if let Some(component) = map_item(item, catalog) {
                    trailing.push(component);
                }
            }
            _ => {
                if let Some(component) = map_item(item, catalog) {
                    children.push(component);
                }
            }
        }
    }

    debug!(
        items = document.items.len(),
        children = children.len(),
        trailing = trailing.len(),
        "component tree built"
    );

    ComponentTree {
        accent_color: document.color.map(|color| color as u32),
        children,
        trailing,
    }
}
