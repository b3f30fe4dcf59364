use anyhow::{Result, Context};
use serde::{Serialize, Deserialize};
use tauri::{Runtime, Webview};

use super::MountTarget;

/// Emitted by the page when the mount point does not exist.
pub const MOUNT_FAILED_EVENT: &str = "mount-failed";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MountFailed {
    pub selector: String,
}

/// Mounts into a live webview by evaluating a small script in the page.
pub struct WebviewTarget<'a, R: Runtime> {
    webview: &'a Webview<R>,
}

impl<'a, R: Runtime> WebviewTarget<'a, R> {
    pub fn new(webview: &'a Webview<R>) -> Self {
        Self { webview }
    }
}

impl<R: Runtime> MountTarget for WebviewTarget<'_, R> {
    fn attach(&self, selector: &str, markup: &str) -> Result<()> {
        let script = mount_script(selector, markup)?;
        self.webview
            .eval(&script)
            .with_context(|| format!("Failed to mount into '{}'", selector))
    }
}

/// Script that replaces the children of `selector` with `markup`, or reports
/// a `mount-failed` event when nothing matches.
pub fn mount_script(selector: &str, markup: &str) -> Result<String> {
    let selector = serde_json::to_string(selector)?;
    let markup = serde_json::to_string(markup)?;
    let failure = serde_json::to_string(MOUNT_FAILED_EVENT)?;
    Ok(format!(
        r#"(() => {{
  const el = document.querySelector({selector});
  if (!el) {{
    window.__TAURI__?.event?.emit({failure}, {{ selector: {selector} }});
    return;
  }}
  el.innerHTML = {markup};
}})();"#
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_script_embeds_json_literals() {
        let script = mount_script("#app", "<div>Hello</div>").unwrap();

        assert!(script.contains(r##"document.querySelector("#app")"##));
        assert!(script.contains(r#"el.innerHTML = "<div>Hello</div>";"#));
        assert!(script.contains(r#"emit("mount-failed""#));
    }

    #[test]
    fn test_mount_script_quotes_hostile_input() {
        let script = mount_script("#a\"); alert(1); (\"", "x").unwrap();

        assert!(script.contains(r##"document.querySelector("#a\"); alert(1); (\"")"##));
    }
}
