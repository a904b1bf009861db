use crate::config::CodeNames;
use crate::ir::ComponentTree;
use crate::render_code::render_code;
use crate::render_json::render_json;
use serde_json::Value;

/// Trait describing a renderer that turns a component tree into one artifact.
pub trait TreeRenderer {
    type Output;

    fn render(&self, tree: &ComponentTree) -> Self::Output;
}

/// Renders the wire JSON consumed by whatever sends the message.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer;

impl TreeRenderer for JsonRenderer {
    type Output = Value;

    fn render(&self, tree: &ComponentTree) -> Value {
        render_json(tree)
    }
}

/// Renders discord.js builder code with configurable variable names.
#[derive(Debug, Default, Clone)]
pub struct CodeRenderer {
    pub names: CodeNames,
}

impl CodeRenderer {
    pub fn new(names: CodeNames) -> Self {
        Self {
            names: names.sanitized(),
        }
    }
}

impl TreeRenderer for CodeRenderer {
    type Output = String;

    fn render(&self, tree: &ComponentTree) -> String {
        render_code(tree, &self.names)
    }
}
