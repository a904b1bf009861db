//! Synthetic ids for items and buttons that arrive without one.

use uuid::Uuid;

/// Source of fallback ids. Ids only need to be unique within one document.
pub trait IdGenerator {
    fn next_id(&mut self, prefix: &str) -> String;
}

/// Random ids (`<prefix>_<8 hex chars>`), the default for live exports.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self, prefix: &str) -> String {
        let simple = Uuid::new_v4().simple().to_string();
        format!("{prefix}_{}", &simple[..8])
    }
}

/// Deterministic counter ids (`<prefix>_1`, `<prefix>_2`, ...).
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    next: usize,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next += 1;
        format!("{prefix}_{}", self.next)
    }
}
