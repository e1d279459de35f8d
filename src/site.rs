//! Site files: engine configuration plus a page set, in TOML
//!
//! ```toml
//! [metadata]
//! name = "demo"
//!
//! [engine]
//! max_include_depth = 16
//!
//! [pages."/index"]
//! nodes = [{ text = "hello" }]
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use crate::error::LayoutError;
use crate::page::{Engine, EngineConfig, Node, Page, PageSet};

/// Errors that can occur when loading a site file
#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Failed to read site file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse site TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid page set: {0}")]
    PageError(#[from] LayoutError),
}

/// A loaded site
#[derive(Debug, Clone)]
pub struct Site {
    /// Optional name for the site
    pub name: Option<String>,
    /// Optional description
    pub description: Option<String>,
    /// Engine configuration, defaults when the file has no `[engine]` table
    pub config: EngineConfig,
    /// Every page of the site
    pub pages: PageSet,
}

/// TOML structure for deserializing sites
#[derive(Deserialize)]
struct TomlSite {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    engine: EngineConfig,
    #[serde(default)]
    pages: IndexMap<String, TomlPage>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

#[derive(Deserialize)]
struct TomlPage {
    #[serde(default)]
    nodes: Vec<Node>,
}

/// A small site with a page rendered through two nested layouts
pub const EXAMPLE_SITE: &str = r#"
[metadata]
name = "demo"
description = "A page rendered through a nested layout"

[engine]
max_include_depth = 16

[pages."/index"]
nodes = [
    { render = { layout = "/layout/page", params = { title = "Home" }, body = [
        { component = { name = "content", body = [
            { text = "<p>Welcome</p>" },
        ] } },
    ] } },
]

[pages."/layout/page"]
nodes = [
    { definition = { body = [
        { render = { layout = "/layout/base", params = { site = "Demo" }, body = [
            { component = { name = "main", body = [
                { text = "<main>" },
                { component = { name = "content", body = [{ text = "<p>No content</p>" }] } },
                { text = "</main>" },
            ] } },
        ] } },
    ] } },
    { text = "never written" },
]

[pages."/layout/base"]
nodes = [
    { definition = { body = [
        { text = "<html><head><title>" },
        { attr = "title" },
        { text = " | " },
        { attr = "site" },
        { text = "</title></head><body>" },
        { component = { name = "header", body = [{ text = "<h1>Default header</h1>" }] } },
        { component = { name = "main" } },
        { text = "</body></html>" },
    ] } },
    { text = "never written" },
]
"#;

impl Site {
    /// Load a site from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SiteError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a site from a TOML string
    pub fn from_str(content: &str) -> Result<Self, SiteError> {
        let parsed: TomlSite = toml::from_str(content)?;

        let mut pages = PageSet::new();
        for (path, page) in parsed.pages {
            pages.register(Page::new(path, page.nodes))?;
        }

        Ok(Site {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            config: parsed.engine,
            pages,
        })
    }

    /// Build an engine for this site
    pub fn into_engine(self) -> Engine {
        Engine::with_config(self.pages, self.config)
    }
}
