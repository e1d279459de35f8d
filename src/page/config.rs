//! Configuration for the page engine

use serde::Deserialize;

/// Configuration options for page evaluation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Deepest allowed nesting of page includes, including component re-entry
    pub max_include_depth: usize,

    /// Reuse layout definition handlers across evaluations
    pub pool_tags: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_include_depth: 32,
            pool_tags: true,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the include depth limit
    pub fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }

    /// Enable or disable definition handler pooling
    pub fn with_pool_tags(mut self, pool: bool) -> Self {
        self.pool_tags = pool;
        self
    }
}
