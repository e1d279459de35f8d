//! Page registry for storing and retrieving pages by path

use std::collections::HashMap;

use crate::error::LayoutError;

use super::node::{Node, Page};

/// Registry of pages keyed by path
#[derive(Debug, Default, Clone)]
pub struct PageSet {
    pages: HashMap<String, Page>,
}

impl PageSet {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page
    pub fn register(&mut self, page: Page) -> Result<(), LayoutError> {
        if self.pages.contains_key(&page.path) {
            return Err(LayoutError::DuplicatePage { path: page.path });
        }
        self.pages.insert(page.path.clone(), page);
        Ok(())
    }

    /// Register a page built from a path and nodes
    pub fn with_page(
        mut self,
        path: impl Into<String>,
        nodes: Vec<Node>,
    ) -> Result<Self, LayoutError> {
        self.register(Page::new(path, nodes))?;
        Ok(self)
    }

    /// Get a page by path
    pub fn get(&self, path: &str) -> Option<&Page> {
        self.pages.get(path)
    }

    /// Get a page by path or fail
    pub fn require(&self, path: &str) -> Result<&Page, LayoutError> {
        self.get(path).ok_or_else(|| LayoutError::page_not_found(path))
    }

    /// Check if a page exists
    pub fn contains(&self, path: &str) -> bool {
        self.pages.contains_key(path)
    }

    /// All page paths, sorted
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.pages.keys().map(|s| s.as_str()).collect();
        paths.sort_unstable();
        paths
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
