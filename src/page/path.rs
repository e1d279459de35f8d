//! Node positions within a page tree

use std::fmt;

/// Position of a node in its page: child indexes from the page root
///
/// Every node list is indexed the same way, whether it is the page itself, a
/// definition body, a component's default body, a render body, or a
/// component override inside a render body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// The page root
    pub fn root() -> Self {
        Self::default()
    }

    /// Position of the `index`th child of this node
    pub fn child(&self, index: usize) -> Self {
        let mut indexes = self.0.clone();
        indexes.push(index);
        Self(indexes)
    }

    pub fn indexes(&self) -> &[usize] {
        &self.0
    }

    /// Index of the child of this node that leads to `descendant`
    ///
    /// `None` unless `descendant` lies strictly below this node.
    pub fn step_towards(&self, descendant: &NodePath) -> Option<usize> {
        if descendant.0.len() > self.0.len() && descendant.0.starts_with(&self.0) {
            Some(descendant.0[self.0.len()])
        } else {
            None
        }
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indexes: Vec<usize>) -> Self {
        Self(indexes)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        for index in &self.0 {
            write!(f, "/{}", index)?;
        }
        Ok(())
    }
}
