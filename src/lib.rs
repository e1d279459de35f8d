//! Page Layout - two-phase layout composition for page templates
//!
//! A page invokes a layout with parameters and named component overrides; the
//! layout page's definition emits a fixed skeleton and hands control back to
//! the overrides at its named components. This gives base-layout plus
//! per-page-override composition without static template inheritance.
//!
//! # Example
//!
//! ```rust
//! use page_layout::{Engine, Node, PageSet};
//!
//! let pages = PageSet::new()
//!     .with_page(
//!         "/index",
//!         vec![Node::render(
//!             "/layout/base",
//!             [("title", "Home")],
//!             vec![Node::component("header", vec![Node::text("<h1>Hi</h1>")])],
//!         )],
//!     )
//!     .and_then(|p| {
//!         p.with_page(
//!             "/layout/base",
//!             vec![Node::definition(vec![
//!                 Node::text("<title>"),
//!                 Node::attr("title"),
//!                 Node::text("</title>"),
//!                 Node::component("header", vec![Node::text("<h1>Default</h1>")]),
//!             ])],
//!         )
//!     })
//!     .unwrap();
//!
//! let html = Engine::new(pages).render("/index").unwrap();
//! assert_eq!(html, "<title>Home</title><h1>Hi</h1>");
//! ```

pub mod error;
pub mod layout;
pub mod page;
pub mod site;

pub use error::LayoutError;
pub use layout::{LayoutComponentRenderer, LayoutContext, LayoutDefinitionTag};
pub use page::{Engine, EngineConfig, Node, Page, PageSet, ParamValue, Request};
pub use site::{Site, SiteError};

use thiserror::Error;

/// Errors that can occur while rendering a site file
#[derive(Debug, Error)]
pub enum RenderError {
    /// Error while loading the site
    #[error("site error: {0}")]
    Site(#[from] SiteError),

    /// Error while evaluating pages
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
}

/// Load a site from TOML and render one of its pages
///
/// # Example
///
/// ```rust
/// use page_layout::render_site;
///
/// let html = render_site(r#"
/// [pages."/index"]
/// nodes = [{ text = "hello" }]
/// "#, "/index").unwrap();
///
/// assert_eq!(html, "hello");
/// ```
pub fn render_site(source: &str, page: &str) -> Result<String, RenderError> {
    let engine = Site::from_str(source)?.into_engine();
    Ok(engine.render(page)?)
}
