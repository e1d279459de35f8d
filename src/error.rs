//! Error types for layout composition and page evaluation

use thiserror::Error;

/// Errors that can occur while evaluating pages and layouts
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A layout definition was reached without a layout render invocation
    #[error(
        "the page {page} contains a layout definition and was invoked directly; \
         a layout definition can only be invoked by a page that contains a layout render"
    )]
    DirectInvocation { page: String },

    /// A component extension point was evaluated outside any layout
    #[error("component '{component}' in page {page} is not inside a layout definition")]
    ComponentOutsideLayout { page: String, component: String },

    /// The layout page finished without ever entering its definition
    #[error("layout {layout} rendered from {page} never reached a layout definition")]
    LayoutNotRendered { layout: String, page: String },

    /// Two overrides with the same name in one render invocation
    #[error("duplicate component '{component}' for layout {layout}")]
    DuplicateComponent { layout: String, component: String },

    /// Page path not present in the page set
    #[error("page not found: {path}")]
    PageNotFound { path: String },

    /// Two pages registered under the same path
    #[error("duplicate page definition: {path}")]
    DuplicatePage { path: String },

    /// Includes nested deeper than the configured limit
    #[error("include depth {depth} exceeded while including {page}: {}", chain.join(" -> "))]
    IncludeDepthExceeded {
        page: String,
        depth: usize,
        chain: Vec<String>,
    },

    /// A component renderer was popped or rendered with nothing on its stack
    #[error("page environment stack of component '{component}' is empty")]
    EmptyEnvironmentStack { component: String },

    /// End of a definition reached on a handler that was never started
    #[error("layout definition in {page} ended without an active start")]
    TagNotActive { page: String },

    /// Start of a definition on a handler that is still active
    #[error("layout definition handler started in {page} while still active")]
    TagAlreadyActive { page: String },

    /// A component renderer outlived the layout context that owns it
    #[error("layout context for component '{component}' has been released")]
    ContextReleased { component: String },
}

impl LayoutError {
    /// Create a direct invocation error for a page
    pub fn direct_invocation(page: impl Into<String>) -> Self {
        Self::DirectInvocation { page: page.into() }
    }

    /// Create an empty stack error for a component
    pub fn empty_stack(component: impl Into<String>) -> Self {
        Self::EmptyEnvironmentStack {
            component: component.into(),
        }
    }

    /// Create a page not found error
    pub fn page_not_found(path: impl Into<String>) -> Self {
        Self::PageNotFound { path: path.into() }
    }

    /// Structural misuse of the layout tags or page set, fixable by the page author
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::DirectInvocation { .. }
                | Self::ComponentOutsideLayout { .. }
                | Self::LayoutNotRendered { .. }
                | Self::DuplicateComponent { .. }
                | Self::PageNotFound { .. }
                | Self::DuplicatePage { .. }
                | Self::IncludeDepthExceeded { .. }
        )
    }

    /// Broken invariant inside the layout machinery itself
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::EmptyEnvironmentStack { .. }
                | Self::TagNotActive { .. }
                | Self::TagAlreadyActive { .. }
                | Self::ContextReleased { .. }
        )
    }

    /// The page path the error refers to, if any
    pub fn page(&self) -> Option<&str> {
        match self {
            Self::DirectInvocation { page }
            | Self::ComponentOutsideLayout { page, .. }
            | Self::LayoutNotRendered { page, .. }
            | Self::IncludeDepthExceeded { page, .. }
            | Self::TagNotActive { page }
            | Self::TagAlreadyActive { page } => Some(page),
            Self::PageNotFound { path } | Self::DuplicatePage { path } => Some(path),
            _ => None,
        }
    }
}
