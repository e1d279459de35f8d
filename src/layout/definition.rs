//! The layout definition handler
//!
//! A layout page wraps its skeleton in a definition. Reaching the definition
//! start publishes the invoker's parameters and component renderers into the
//! request and marks the layout as rendered. Reaching its end unwinds the
//! renderer stacks, puts back whatever the component attributes held before,
//! restores the output mode and stops the rest of the page.
//!
//! When the definition is re-entered while its context is in the component
//! render phase, nothing is published and the definition's own output is
//! silenced, so only the targeted component comes out.

use std::rc::Rc;

use tracing::{debug, trace};

use crate::error::LayoutError;
use crate::page::{Environment, Request, Value};

use super::context::LayoutContext;

/// What the engine does with the definition body after start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyAction {
    /// Evaluate the body inline into the current output
    EvalBodyInclude,
}

/// What the engine does with the enclosing page after end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    /// Evaluate nothing more of the enclosing page
    SkipPage,
}

/// Per-evaluation state, present only between start and end
#[derive(Debug)]
struct ActiveDefinition {
    context: Rc<LayoutContext>,
    component_render_phase: bool,
    saved_silent: bool,
    /// Component attributes as they were before start
    shadowed: Vec<(String, Option<Value>)>,
}

/// Handler for one layout definition evaluation at a time
///
/// Instances may be pooled and reused; all per-evaluation state is dropped
/// when [`end`](Self::end) runs, whatever its outcome.
#[derive(Debug, Default)]
pub struct LayoutDefinitionTag {
    active: Option<ActiveDefinition>,
}

impl LayoutDefinitionTag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Context resolved at start, until end
    pub fn context(&self) -> Option<&Rc<LayoutContext>> {
        self.active.as_ref().map(|a| &a.context)
    }

    /// Phase captured at start, until end
    pub fn is_component_render_phase(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|a| a.component_render_phase)
    }

    /// Open the definition evaluated in `env`
    pub fn start(
        &mut self,
        env: &Rc<Environment>,
        request: &Request,
    ) -> Result<BodyAction, LayoutError> {
        if self.active.is_some() {
            return Err(LayoutError::TagAlreadyActive {
                page: env.page().to_string(),
            });
        }

        let context =
            LayoutContext::lookup(env).ok_or_else(|| LayoutError::direct_invocation(env.page()))?;
        let phase = context.is_component_render_phase();

        debug!(
            page = %env.page(),
            layout = %context.layout(),
            component_render_phase = phase,
            "layout definition start"
        );

        let mut shadowed = Vec::new();
        if !phase {
            for (name, value) in context.parameters() {
                request.set_attribute(name.as_str(), value.clone());
            }
            for (name, renderer) in context.components() {
                renderer.push_environment(Rc::clone(env));
                shadowed.push((name.clone(), request.attribute(name)));
                request.set_attribute(name.as_str(), Value::Component(Rc::clone(renderer)));
            }
            // Committed to rendering; the body has not run yet.
            context.set_rendered(true);
        }

        let out = request.out();
        let saved_silent = out.is_silent();
        out.set_silent(phase);

        self.active = Some(ActiveDefinition {
            context,
            component_render_phase: phase,
            saved_silent,
            shadowed,
        });
        Ok(BodyAction::EvalBodyInclude)
    }

    /// Close the definition evaluated in `env`
    pub fn end(&mut self, env: &Environment, request: &Request) -> Result<PageAction, LayoutError> {
        let active = self.active.take().ok_or_else(|| LayoutError::TagNotActive {
            page: env.page().to_string(),
        })?;

        let mut result = Ok(PageAction::SkipPage);
        if !active.component_render_phase {
            for renderer in active.context.components().values() {
                if let Err(e) = renderer.pop_environment() {
                    if result.is_ok() {
                        result = Err(e);
                    }
                }
            }
        }

        for (name, previous) in active.shadowed.into_iter().rev() {
            match previous {
                Some(value) => request.set_attribute(name, value),
                None => {
                    request.remove_attribute(&name);
                }
            }
        }
        request.out().set_silent(active.saved_silent);

        trace!(
            page = %env.page(),
            layout = %active.context.layout(),
            "layout definition end"
        );
        result
    }

    /// Drop any per-evaluation state left behind by an abandoned evaluation
    pub fn reset(&mut self) {
        self.active = None;
    }
}
