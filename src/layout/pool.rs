//! Pooling of definition handlers

use std::cell::RefCell;

use super::definition::LayoutDefinitionTag;

/// Reuses [`LayoutDefinitionTag`] instances across evaluations
///
/// Nested definitions each acquire their own handler; a handler goes back to
/// the pool only after its evaluation has ended.
#[derive(Debug, Default)]
pub struct TagPool {
    enabled: bool,
    idle: RefCell<Vec<LayoutDefinitionTag>>,
}

impl TagPool {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            idle: RefCell::new(Vec::new()),
        }
    }

    pub fn acquire(&self) -> LayoutDefinitionTag {
        if !self.enabled {
            return LayoutDefinitionTag::new();
        }
        self.idle.borrow_mut().pop().unwrap_or_default()
    }

    pub fn release(&self, mut tag: LayoutDefinitionTag) {
        if self.enabled {
            tag.reset();
            self.idle.borrow_mut().push(tag);
        }
    }

    /// Number of handlers waiting for reuse
    pub fn idle(&self) -> usize {
        self.idle.borrow().len()
    }
}
