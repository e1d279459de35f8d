//! Page evaluation environments

use std::rc::Rc;

use crate::layout::LayoutContext;

/// One page evaluation: the page being evaluated, the layout context handed
/// to it by the invoking render (if any), and the environment that included it.
#[derive(Debug)]
pub struct Environment {
    page: String,
    layout: Option<Rc<LayoutContext>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// Environment for a top-level request
    pub fn root(page: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            page: page.into(),
            layout: None,
            parent: None,
        })
    }

    /// Environment for a page included from this one
    pub fn include(
        self: &Rc<Self>,
        page: impl Into<String>,
        layout: Option<Rc<LayoutContext>>,
    ) -> Rc<Self> {
        Rc::new(Self {
            page: page.into(),
            layout,
            parent: Some(Rc::clone(self)),
        })
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    pub fn layout(&self) -> Option<&Rc<LayoutContext>> {
        self.layout.as_ref()
    }

    pub fn parent(&self) -> Option<&Rc<Environment>> {
        self.parent.as_ref()
    }

    /// Page paths from the root request down to this environment
    pub fn chain(&self) -> Vec<String> {
        let mut chain = vec![self.page.clone()];
        let mut cur = self.parent.as_ref();
        while let Some(env) = cur {
            chain.push(env.page.clone());
            cur = env.parent.as_ref();
        }
        chain.reverse();
        chain
    }
}
