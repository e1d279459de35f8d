//! Page tree types evaluated by the engine

use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;

/// A parameter value supplied by a layout render invocation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Integer(n) => write!(f, "{}", n),
            ParamValue::Float(n) => write!(f, "{}", n),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Integer(n)
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        ParamValue::Float(n)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

/// A node in a page tree
///
/// The meaning of [`Node::Component`] depends on where it appears: directly
/// inside a [`Node::Render`] body it captures an override, anywhere inside a
/// layout definition it marks a named extension point whose body is the
/// default content.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    /// Literal output
    Text(String),
    /// Write the value of a request attribute
    Attr(String),
    /// Invoke a layout with parameters and component overrides
    Render {
        layout: String,
        #[serde(default)]
        params: IndexMap<String, ParamValue>,
        #[serde(default)]
        body: Vec<Node>,
    },
    /// Named component: override capture or extension point
    Component {
        name: String,
        #[serde(default)]
        body: Vec<Node>,
    },
    /// The layout definition wrapping a layout page's skeleton
    Definition {
        #[serde(default)]
        body: Vec<Node>,
    },
}

impl Node {
    pub fn text(s: impl Into<String>) -> Self {
        Node::Text(s.into())
    }

    pub fn attr(name: impl Into<String>) -> Self {
        Node::Attr(name.into())
    }

    pub fn component(name: impl Into<String>, body: Vec<Node>) -> Self {
        Node::Component {
            name: name.into(),
            body,
        }
    }

    pub fn definition(body: Vec<Node>) -> Self {
        Node::Definition { body }
    }

    /// Build a render invocation
    pub fn render<K, V>(
        layout: impl Into<String>,
        params: impl IntoIterator<Item = (K, V)>,
        body: Vec<Node>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<ParamValue>,
    {
        Node::Render {
            layout: layout.into(),
            params: params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            body,
        }
    }
}

/// A page: a path and its node tree
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub path: String,
    pub nodes: Vec<Node>,
}

impl Page {
    pub fn new(path: impl Into<String>, nodes: Vec<Node>) -> Self {
        Self {
            path: path.into(),
            nodes,
        }
    }
}
