//! Request-scoped state shared by every page evaluated for one request

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::layout::LayoutComponentRenderer;

use super::node::ParamValue;
use super::output::Output;

/// A request attribute
#[derive(Clone)]
pub enum Value {
    /// A plain value, written with `Display`
    Param(ParamValue),
    /// A component renderer published by a layout definition
    Component(Rc<LayoutComponentRenderer>),
}

impl Value {
    pub fn as_component(&self) -> Option<&Rc<LayoutComponentRenderer>> {
        match self {
            Value::Component(r) => Some(r),
            Value::Param(_) => None,
        }
    }

    pub fn as_param(&self) -> Option<&ParamValue> {
        match self {
            Value::Param(p) => Some(p),
            Value::Component(_) => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Param(p) => f.debug_tuple("Param").field(p).finish(),
            Value::Component(r) => f.debug_tuple("Component").field(&r.name()).finish(),
        }
    }
}

impl From<ParamValue> for Value {
    fn from(p: ParamValue) -> Self {
        Value::Param(p)
    }
}

/// Attributes, output, and include depth of one request
#[derive(Debug, Default)]
pub struct Request {
    attributes: RefCell<HashMap<String, Value>>,
    out: Output,
    depth: Cell<usize>,
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.attributes.borrow_mut().insert(name.into(), value.into());
    }

    pub fn attribute(&self, name: &str) -> Option<Value> {
        self.attributes.borrow().get(name).cloned()
    }

    pub fn remove_attribute(&self, name: &str) -> Option<Value> {
        self.attributes.borrow_mut().remove(name)
    }

    pub fn out(&self) -> &Output {
        &self.out
    }

    /// Current include nesting
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    /// Count one more nested include until the guard is dropped
    pub fn enter(&self) -> DepthGuard<'_> {
        self.depth.set(self.depth.get() + 1);
        DepthGuard { request: self }
    }

    pub fn into_output(self) -> String {
        self.out.into_string()
    }
}

/// Decrements the include depth on drop
#[derive(Debug)]
pub struct DepthGuard<'a> {
    request: &'a Request,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.request.depth.set(self.request.depth.get() - 1);
    }
}
