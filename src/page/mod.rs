//! Page evaluation engine
//!
//! Pages are trees of [`Node`]s held in a [`PageSet`]. The [`Engine`]
//! evaluates them against a [`Request`], whose attributes and [`Output`] are
//! shared by every page included while serving it.

pub mod config;
pub mod engine;
pub mod env;
pub mod node;
pub mod output;
pub mod path;
pub mod registry;
pub mod request;

pub use config::EngineConfig;
pub use engine::{Engine, Flow};
pub use env::Environment;
pub use node::{Node, Page, ParamValue};
pub use output::{Output, SilentGuard};
pub use path::NodePath;
pub use registry::PageSet;
pub use request::{DepthGuard, Request, Value};
