//! Per-render layout state shared between a render invocation and the
//! definition it evaluates

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::LayoutError;
use crate::page::{Environment, NodePath, ParamValue};

use super::renderer::LayoutComponentRenderer;

/// State for one layout render invocation
///
/// Created by the render side before the definition page is evaluated and
/// handed to that evaluation through its [`Environment`]. Parameters and
/// components are fixed at construction; the phase, target component and
/// `rendered` flag change while the layout is being produced.
///
/// The render invocation is identified by its page and its [`NodePath`]
/// within that page, so a re-entry finds exactly the invocation that created
/// the context even when the page renders the same layout more than once or
/// the invocation sits inside another invocation's override.
pub struct LayoutContext {
    layout: String,
    render_env: Rc<Environment>,
    render_path: NodePath,
    parameters: IndexMap<String, ParamValue>,
    components: IndexMap<String, Rc<LayoutComponentRenderer>>,
    component_render_phase: Cell<bool>,
    component: RefCell<Option<String>>,
    rendered: Cell<bool>,
}

impl LayoutContext {
    /// Start building a context for `layout`, rendered from `render_env`
    pub fn builder(
        layout: impl Into<String>,
        render_env: Rc<Environment>,
    ) -> LayoutContextBuilder {
        LayoutContextBuilder {
            layout: layout.into(),
            render_env,
            render_path: NodePath::root(),
            parameters: IndexMap::new(),
            components: Vec::new(),
        }
    }

    /// Find the context handed to the page evaluation in `env`
    pub fn lookup(env: &Environment) -> Option<Rc<LayoutContext>> {
        env.layout().cloned()
    }

    /// Path of the layout page being rendered
    pub fn layout(&self) -> &str {
        &self.layout
    }

    /// Environment of the page containing the render invocation
    pub fn render_env(&self) -> &Rc<Environment> {
        &self.render_env
    }

    /// Path of the page containing the render invocation
    pub fn render_page(&self) -> &str {
        self.render_env.page()
    }

    /// Position of the render invocation within the render page
    pub fn render_path(&self) -> &NodePath {
        &self.render_path
    }

    pub fn parameters(&self) -> &IndexMap<String, ParamValue> {
        &self.parameters
    }

    pub fn components(&self) -> &IndexMap<String, Rc<LayoutComponentRenderer>> {
        &self.components
    }

    pub fn component(&self, name: &str) -> Option<&Rc<LayoutComponentRenderer>> {
        self.components.get(name)
    }

    pub fn is_component_render_phase(&self) -> bool {
        self.component_render_phase.get()
    }

    pub fn set_component_render_phase(&self, phase: bool) {
        self.component_render_phase.set(phase);
    }

    /// Name of the component being rendered during the component render phase
    pub fn current_component(&self) -> Option<String> {
        self.component.borrow().clone()
    }

    pub fn set_current_component(&self, name: Option<String>) {
        *self.component.borrow_mut() = name;
    }

    /// True once the definition has committed to rendering, not once it finished
    pub fn is_rendered(&self) -> bool {
        self.rendered.get()
    }

    pub fn set_rendered(&self, rendered: bool) {
        self.rendered.set(rendered);
    }

    /// Whether the render node at `path` of `page` created this context
    pub fn is_render_site(&self, page: &str, path: &NodePath) -> bool {
        self.render_page() == page && &self.render_path == path
    }

    /// Child index of the node at `path` of `page` on the way to the render
    /// invocation, if the invocation lies below that node
    pub fn step_towards_site(&self, page: &str, path: &NodePath) -> Option<usize> {
        if self.render_page() != page {
            return None;
        }
        path.step_towards(&self.render_path)
    }

    /// Enter the component render phase for `name`, restoring the previous
    /// phase and target when the guard is dropped
    pub fn enter_component_phase(&self, name: &str) -> ComponentPhaseGuard<'_> {
        let previous_phase = self.component_render_phase.replace(true);
        let previous_component = self.component.replace(Some(name.to_string()));
        ComponentPhaseGuard {
            context: self,
            previous_phase,
            previous_component,
        }
    }
}

impl fmt::Debug for LayoutContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutContext")
            .field("layout", &self.layout)
            .field("render_page", &self.render_page())
            .field("render_path", &self.render_path)
            .field("parameters", &self.parameters)
            .field("components", &self.components.keys().collect::<Vec<_>>())
            .field("component_render_phase", &self.component_render_phase.get())
            .field("component", &self.component.borrow())
            .field("rendered", &self.rendered.get())
            .finish()
    }
}

/// Restores the phase and target component of a context on drop
pub struct ComponentPhaseGuard<'a> {
    context: &'a LayoutContext,
    previous_phase: bool,
    previous_component: Option<String>,
}

impl Drop for ComponentPhaseGuard<'_> {
    fn drop(&mut self) {
        self.context.component_render_phase.set(self.previous_phase);
        *self.context.component.borrow_mut() = self.previous_component.take();
    }
}

/// Builder for [`LayoutContext`]
#[derive(Debug)]
pub struct LayoutContextBuilder {
    layout: String,
    render_env: Rc<Environment>,
    render_path: NodePath,
    parameters: IndexMap<String, ParamValue>,
    components: Vec<String>,
}

impl LayoutContextBuilder {
    /// Position of the render invocation within the render page
    pub fn at(mut self, path: NodePath) -> Self {
        self.render_path = path;
        self
    }

    pub fn parameter(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    pub fn parameters(mut self, params: IndexMap<String, ParamValue>) -> Self {
        self.parameters.extend(params);
        self
    }

    /// Register an override for the component `name`
    pub fn component(mut self, name: impl Into<String>) -> Self {
        self.components.push(name.into());
        self
    }

    /// Create the context and one renderer per registered component
    pub fn build(self) -> Result<Rc<LayoutContext>, LayoutError> {
        for (i, name) in self.components.iter().enumerate() {
            if self.components[..i].contains(name) {
                return Err(LayoutError::DuplicateComponent {
                    layout: self.layout,
                    component: name.clone(),
                });
            }
        }

        let LayoutContextBuilder {
            layout,
            render_env,
            render_path,
            parameters,
            components,
        } = self;

        Ok(Rc::new_cyclic(|weak| LayoutContext {
            layout,
            render_env,
            render_path,
            parameters,
            components: components
                .into_iter()
                .map(|name| {
                    let renderer = LayoutComponentRenderer::new(name.clone(), weak.clone());
                    (name, Rc::new(renderer))
                })
                .collect(),
            component_render_phase: Cell::new(false),
            component: RefCell::new(None),
            rendered: Cell::new(false),
        }))
    }
}
