use anyhow::Result;
use html_escape::encode_text;

use super::MountTarget;

/// Base UI element: a piece of text that can be mounted into the page once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    text: Option<String>,
    mounted_at: Option<String>,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> Result<()> {
        if let Some(selector) = &self.mounted_at {
            anyhow::bail!("Cannot set text: node is already mounted at '{}'", selector);
        }
        self.text = Some(text.into());
        Ok(())
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn mounted_at(&self) -> Option<&str> {
        self.mounted_at.as_deref()
    }

    pub fn render(&self) -> String {
        format!("<div>{}</div>", encode_text(self.text.as_deref().unwrap_or("")))
    }

    /// Attach the rendered node under `selector`. Only the first successful mount counts.
    pub fn mount(&mut self, target: &dyn MountTarget, selector: &str) -> Result<()> {
        if let Some(existing) = &self.mounted_at {
            anyhow::bail!("Node is already mounted at '{}'", existing);
        }
        target.attach(selector, &self.render())?;
        self.mounted_at = Some(selector.to_string());
        tracing::debug!("Mounted node at '{}'", selector);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::testing::RecordingTarget;

    #[test]
    fn test_mount_attaches_rendered_text() {
        let target = RecordingTarget::default();
        let mut node = Node::new();
        node.set_text("a < b").unwrap();

        node.mount(&target, "#app").unwrap();

        assert_eq!(node.mounted_at(), Some("#app"));
        assert_eq!(
            *target.attached.lock().unwrap(),
            vec![("#app".to_string(), "<div>a &lt; b</div>".to_string())]
        );
    }

    #[test]
    fn test_render_escapes_markup() {
        let mut node = Node::new();
        node.set_text("<b>Tom & Jerry</b> こんにちは").unwrap();

        assert_eq!(node.render(), "<div>&lt;b&gt;Tom &amp; Jerry&lt;/b&gt; こんにちは</div>");
    }

    #[test]
    fn test_second_mount_is_rejected() {
        let target = RecordingTarget::default();
        let mut node = Node::new();

        node.mount(&target, "#app").unwrap();
        assert!(node.mount(&target, "#other").is_err());
        assert_eq!(target.attached.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_text_is_frozen_after_mount() {
        let target = RecordingTarget::default();
        let mut node = Node::new();
        node.set_text("Hello").unwrap();
        node.mount(&target, "#app").unwrap();

        assert!(node.set_text("Bye").is_err());
        assert_eq!(node.text(), Some("Hello"));
    }

    #[test]
    fn test_failed_attach_leaves_node_unmounted() {
        let target = RecordingTarget { reject: true, ..Default::default() };
        let mut node = Node::new();

        assert!(node.mount(&target, "#missing").is_err());
        assert_eq!(node.mounted_at(), None);
    }
}
