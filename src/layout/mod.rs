//! Two-phase layout composition
//!
//! A page invokes a layout through a render node, supplying parameters and
//! named component overrides. The render side builds a [`LayoutContext`] and
//! evaluates the layout page with it; the layout page's definition publishes
//! the parameters and components and emits the skeleton. Wherever the skeleton
//! asks for a component that has an override, the override's renderer re-enters
//! the invoking page in the component render phase to produce just that piece.
//!
//! # Example
//!
//! ```text
//! /index:        render "/layout/base" (title: "Home") {
//!                    component header { <h1>Hi</h1> }
//!                }
//!
//! /layout/base:  definition {
//!                    <title>${title}</title>
//!                    component header { <h1>Default</h1> }
//!                }
//! ```

mod context;
mod definition;
mod pool;
mod renderer;

pub use context::{ComponentPhaseGuard, LayoutContext, LayoutContextBuilder};
pub use definition::{BodyAction, LayoutDefinitionTag, PageAction};
pub use pool::TagPool;
pub use renderer::{Include, LayoutComponentRenderer};
