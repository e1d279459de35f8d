//! Renderers for component overrides

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::error::LayoutError;
use crate::page::{Environment, Request};

use super::context::LayoutContext;

/// Something that can evaluate a page in a given environment
pub trait Include {
    fn include(&self, request: &Request, env: Rc<Environment>) -> Result<(), LayoutError>;
}

/// Renders the override of one named component
///
/// The override lives in the body of the render invocation, so rendering it
/// re-enters the page that holds that invocation with the owning context in
/// the component render phase. The re-entry runs on top of the environment
/// currently at the top of the stack; definitions push their environment when
/// they start and pop it when they end, so nested layouts each see their own.
pub struct LayoutComponentRenderer {
    name: String,
    context: Weak<LayoutContext>,
    stack: RefCell<Vec<Rc<Environment>>>,
}

impl LayoutComponentRenderer {
    pub(crate) fn new(name: String, context: Weak<LayoutContext>) -> Self {
        Self {
            name,
            context,
            stack: RefCell::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Make `env` the environment for subsequent renders until popped
    pub fn push_environment(&self, env: Rc<Environment>) {
        self.stack.borrow_mut().push(env);
    }

    /// Discard the top environment
    pub fn pop_environment(&self) -> Result<Rc<Environment>, LayoutError> {
        self.stack
            .borrow_mut()
            .pop()
            .ok_or_else(|| LayoutError::empty_stack(&self.name))
    }

    pub fn current_environment(&self) -> Option<Rc<Environment>> {
        self.stack.borrow().last().cloned()
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.borrow().len()
    }

    /// Write the override into the request output
    ///
    /// Outside the definition that published this renderer there is no
    /// environment to re-enter from, and nothing is written.
    pub fn render(&self, include: &dyn Include, request: &Request) -> Result<(), LayoutError> {
        let Some(env) = self.current_environment() else {
            debug!(component = %self.name, "no layout definition in progress, nothing rendered");
            return Ok(());
        };
        let context = self
            .context
            .upgrade()
            .ok_or_else(|| LayoutError::ContextReleased {
                component: self.name.clone(),
            })?;

        debug!(
            component = %self.name,
            layout = %context.layout(),
            page = %context.render_page(),
            "rendering component override"
        );

        let _phase = context.enter_component_phase(&self.name);
        let _silent = request.out().silence(true);
        let reentry = env.include(context.render_page(), Some(Rc::clone(&context)));
        include.include(request, reentry)
    }
}

impl fmt::Debug for LayoutComponentRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutComponentRenderer")
            .field("name", &self.name)
            .field("stack_depth", &self.stack_depth())
            .finish()
    }
}
