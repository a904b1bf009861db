//! Export engine for the embed editor.
//!
//! A [`Document`] is mapped into a [`ComponentTree`] (one container plus
//! trailing rows), which is then rendered either as Discord message
//! components JSON or as discord.js builder code that reproduces it.

pub mod builder;
pub mod config;
pub mod document;
pub mod emoji;
pub mod errors;
pub mod ids;
pub mod ir;
pub mod mapper;
pub mod options;
pub mod render_code;
pub mod render_json;
pub mod renderer;

pub use builder::build_tree;
pub use config::{CodeNames, OutputFormat};
pub use document::{Button, ButtonStyle, Document, Item, ItemKind, ListItem, Placement, RawOption};
pub use emoji::{EmojiCatalog, EmojiEntry, EmojiRef, resolve, resolve_emoji, substitute_shortcodes};
pub use errors::{ExportError, ExportResult};
pub use ids::{IdGenerator, RandomIds, SequentialIds};
pub use ir::{ButtonAction, ButtonComponent, Component, ComponentTree, SelectMenu, SelectOption};
pub use mapper::map_item;
pub use options::{parse_options, parse_rating_text};
pub use render_code::render_code;
pub use render_json::render_json;
pub use renderer::{CodeRenderer, JsonRenderer, TreeRenderer};

use serde_json::Value;

/// Artifacts produced by one export call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Export {
    pub json: Option<Value>,
    pub code: Option<String>,
}

/// Builds the tree once and renders the artifacts `format` asks for.
pub fn export(
    document: &Document,
    catalog: &EmojiCatalog,
    format: OutputFormat,
    names: &CodeNames,
) -> Export {
    let tree = build_tree(document, catalog);
    Export {
        json: format.wants_json().then(|| JsonRenderer.render(&tree)),
        code: format
            .wants_code()
            .then(|| CodeRenderer::new(names.clone()).render(&tree)),
    }
}

/// Convenience helper: both artifacts, the document's own catalog, default names.
pub fn export_document(document: &Document) -> Export {
    export(
        document,
        &document.emojis,
        OutputFormat::Both,
        &CodeNames::default(),
    )
}
