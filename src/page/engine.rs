//! Page evaluation
//!
//! Walks page trees, writing text and attributes into the request output and
//! driving the layout nodes:
//! - `Render` builds a [`LayoutContext`] and includes the layout page with it
//! - `Definition` runs a pooled [`LayoutDefinitionTag`] around its body
//! - `Component` is an extension point of the enclosing definition
//!
//! During a component re-entry (the context handed to the page is in the
//! component render phase) the page is walked along the [`NodePath`] of the
//! render invocation that owns the context. That invocation emits the
//! targeted override and halts the page. Everything else on the way there is
//! either silent or skipped.

use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::LayoutError;
use crate::layout::{BodyAction, Include, LayoutContext, LayoutDefinitionTag, PageAction, TagPool};

use super::config::EngineConfig;
use super::env::Environment;
use super::node::{Node, ParamValue};
use super::path::NodePath;
use super::registry::PageSet;
use super::request::{Request, Value};

/// Outcome of evaluating a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep evaluating the current page
    Continue,
    /// Evaluate nothing more of the current page
    SkipPage,
}

/// Evaluates pages from a [`PageSet`]
#[derive(Debug)]
pub struct Engine {
    pages: PageSet,
    config: EngineConfig,
    tags: TagPool,
}

impl Engine {
    /// Create an engine with default configuration
    pub fn new(pages: PageSet) -> Self {
        Self::with_config(pages, EngineConfig::default())
    }

    pub fn with_config(pages: PageSet, config: EngineConfig) -> Self {
        let tags = TagPool::new(config.pool_tags);
        Self {
            pages,
            config,
            tags,
        }
    }

    pub fn pages(&self) -> &PageSet {
        &self.pages
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tag_pool(&self) -> &TagPool {
        &self.tags
    }

    /// Evaluate `path` as a fresh request and return its output
    pub fn render(&self, path: &str) -> Result<String, LayoutError> {
        let request = Request::new();
        self.render_into(&request, path)?;
        Ok(request.into_output())
    }

    /// Evaluate `path` as a top-level page of an existing request
    pub fn render_into(&self, request: &Request, path: &str) -> Result<(), LayoutError> {
        self.include(request, Environment::root(path))
    }

    /// Evaluate the children of the node at `parent`
    fn eval_nodes(
        &self,
        nodes: &[Node],
        request: &Request,
        env: &Rc<Environment>,
        parent: &NodePath,
    ) -> Result<Flow, LayoutError> {
        for (index, node) in nodes.iter().enumerate() {
            if self.eval_node(node, request, env, &parent.child(index))? == Flow::SkipPage {
                return Ok(Flow::SkipPage);
            }
        }
        Ok(Flow::Continue)
    }

    fn eval_node(
        &self,
        node: &Node,
        request: &Request,
        env: &Rc<Environment>,
        at: &NodePath,
    ) -> Result<Flow, LayoutError> {
        match node {
            Node::Text(text) => {
                request.out().write(text);
                Ok(Flow::Continue)
            }
            Node::Attr(name) => self.eval_attr(name, request, env),
            Node::Render {
                layout,
                params,
                body,
            } => self.eval_render(layout, params, body, request, env, at),
            Node::Component { name, body } => {
                self.eval_extension_point(name, body, request, env, at)
            }
            Node::Definition { body } => self.eval_definition(body, request, env, at),
        }
    }

    fn eval_attr(
        &self,
        name: &str,
        request: &Request,
        env: &Rc<Environment>,
    ) -> Result<Flow, LayoutError> {
        match request.attribute(name) {
            Some(Value::Param(value)) => request.out().write(&value.to_string()),
            Some(Value::Component(renderer)) => {
                if !in_component_phase(env) {
                    renderer.render(self, request)?;
                }
            }
            None => trace!(attribute = name, page = env.page(), "attribute not set"),
        }
        Ok(Flow::Continue)
    }

    fn eval_render(
        &self,
        layout: &str,
        params: &IndexMap<String, ParamValue>,
        body: &[Node],
        request: &Request,
        env: &Rc<Environment>,
        at: &NodePath,
    ) -> Result<Flow, LayoutError> {
        if let Some(ctx) = LayoutContext::lookup(env) {
            if ctx.is_component_render_phase() {
                return self.seek_render_site(&ctx, body, request, env, at);
            }
        }

        let mut builder = LayoutContext::builder(layout, Rc::clone(env))
            .at(at.clone())
            .parameters(params.clone());
        for node in body {
            if let Node::Component { name, .. } = node {
                builder = builder.component(name.as_str());
            }
        }
        let ctx = builder.build()?;

        debug!(
            layout,
            page = env.page(),
            at = %at,
            components = ctx.components().len(),
            "rendering layout"
        );

        self.include(request, env.include(layout, Some(Rc::clone(&ctx))))?;

        if !ctx.is_rendered() {
            return Err(LayoutError::LayoutNotRendered {
                layout: layout.to_string(),
                page: env.page().to_string(),
            });
        }
        Ok(Flow::Continue)
    }

    /// Walk towards the render invocation that owns `ctx` during a re-entry
    ///
    /// The invocation itself emits the targeted override and halts the page.
    /// An enclosing invocation descends into the override that holds it.
    /// Any other invocation is skipped.
    fn seek_render_site(
        &self,
        ctx: &Rc<LayoutContext>,
        body: &[Node],
        request: &Request,
        env: &Rc<Environment>,
        at: &NodePath,
    ) -> Result<Flow, LayoutError> {
        if ctx.is_render_site(env.page(), at) {
            return self.eval_component_override(ctx, body, request, at);
        }

        let step = ctx.step_towards_site(env.page(), at);
        match step.and_then(|index| body.get(index).map(|node| (index, node))) {
            Some((index, Node::Component { body: inner, .. })) => {
                self.eval_nodes(inner, request, env, &at.child(index))
            }
            _ => Ok(Flow::Continue),
        }
    }

    /// Emit the body of the component targeted by a re-entry, then halt
    fn eval_component_override(
        &self,
        ctx: &Rc<LayoutContext>,
        body: &[Node],
        request: &Request,
        at: &NodePath,
    ) -> Result<Flow, LayoutError> {
        let target = ctx.current_component();
        let component = body.iter().enumerate().find_map(|(index, node)| match node {
            Node::Component { name, body } if Some(name) == target.as_ref() => {
                Some((index, body))
            }
            _ => None,
        });

        if let Some((index, component_body)) = component {
            let _audible = request.out().silence(false);
            self.eval_nodes(component_body, request, ctx.render_env(), &at.child(index))?;
        }
        Ok(Flow::SkipPage)
    }

    fn eval_extension_point(
        &self,
        name: &str,
        default_body: &[Node],
        request: &Request,
        env: &Rc<Environment>,
        at: &NodePath,
    ) -> Result<Flow, LayoutError> {
        let ctx = LayoutContext::lookup(env).ok_or_else(|| LayoutError::ComponentOutsideLayout {
            page: env.page().to_string(),
            component: name.to_string(),
        })?;

        if ctx.is_component_render_phase() {
            // Only a default body holding the render invocation is walked.
            if ctx.step_towards_site(env.page(), at).is_some() {
                return self.eval_nodes(default_body, request, env, at);
            }
            return Ok(Flow::Continue);
        }

        match ctx.component(name).cloned() {
            Some(renderer) => {
                renderer.render(self, request)?;
                Ok(Flow::Continue)
            }
            None => self.eval_nodes(default_body, request, env, at),
        }
    }

    fn eval_definition(
        &self,
        body: &[Node],
        request: &Request,
        env: &Rc<Environment>,
        at: &NodePath,
    ) -> Result<Flow, LayoutError> {
        let mut tag = self.tags.acquire();
        let result = self.eval_definition_with(&mut tag, body, request, env, at);
        self.tags.release(tag);
        result
    }

    fn eval_definition_with(
        &self,
        tag: &mut LayoutDefinitionTag,
        body: &[Node],
        request: &Request,
        env: &Rc<Environment>,
        at: &NodePath,
    ) -> Result<Flow, LayoutError> {
        match tag.start(env, request)? {
            BodyAction::EvalBodyInclude => {}
        }

        // End runs whatever the body did.
        let body_result = self.eval_nodes(body, request, env, at);
        let end_result = tag.end(env, request);
        body_result?;

        match end_result? {
            PageAction::SkipPage => Ok(Flow::SkipPage),
        }
    }
}

impl Include for Engine {
    fn include(&self, request: &Request, env: Rc<Environment>) -> Result<(), LayoutError> {
        if request.depth() >= self.config.max_include_depth {
            return Err(LayoutError::IncludeDepthExceeded {
                page: env.page().to_string(),
                depth: request.depth(),
                chain: env.chain(),
            });
        }

        let _depth = request.enter();
        let page = self.pages.require(env.page())?;
        trace!(page = env.page(), depth = request.depth(), "evaluating page");

        // A skipped page only ends this include.
        self.eval_nodes(&page.nodes, request, &env, &NodePath::root())?;
        Ok(())
    }
}

fn in_component_phase(env: &Environment) -> bool {
    env.layout()
        .is_some_and(|ctx| ctx.is_component_render_phase())
}
