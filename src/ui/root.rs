use anyhow::Result;

use super::{MountTarget, Node};

/// The single top-level element shown at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root {
    node: Node,
}

impl Root {
    pub fn new(text: &str) -> Result<Self> {
        let mut node = Node::new();
        node.set_text(text)?;
        Ok(Self { node })
    }

    pub fn text(&self) -> Option<&str> {
        self.node.text()
    }

    pub fn mounted_at(&self) -> Option<&str> {
        self.node.mounted_at()
    }

    pub fn render(&self) -> String {
        self.node.render()
    }

    pub fn mount(&mut self, target: &dyn MountTarget, selector: &str) -> Result<()> {
        self.node.mount(target, selector)
    }
}
