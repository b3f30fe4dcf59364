mod node;
mod root;
pub mod webview;

pub use node::Node;
pub use root::Root;

use anyhow::Result;

/// Something a rendered node can be attached to, addressed by CSS selector.
pub trait MountTarget {
    fn attach(&self, selector: &str, markup: &str) -> Result<()>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;
    use super::*;

    /// Records every attachment instead of touching a page.
    #[derive(Default)]
    pub(crate) struct RecordingTarget {
        pub attached: Mutex<Vec<(String, String)>>,
        pub reject: bool,
    }

    impl MountTarget for RecordingTarget {
        fn attach(&self, selector: &str, markup: &str) -> Result<()> {
            if self.reject {
                anyhow::bail!("no element matches '{}'", selector);
            }
            self.attached.lock().unwrap().push((selector.to_string(), markup.to_string()));
            Ok(())
        }
    }
}
