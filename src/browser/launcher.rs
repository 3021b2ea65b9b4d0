// src/browser/launcher.rs
//! External verification destination seam.
//!
//! The flow controller has no control over or visibility into the issuer's
//! page; all it can do is open the URL in a new browsing context and ask
//! whether that context is still alive. [`VerificationBrowser`] captures
//! exactly that surface, with [`SystemBrowser`] delegating to the
//! platform's URL opener.

use std::process::{Child, Command};
use std::sync::Mutex;

/// Handle to an opened external browsing context.
pub trait WindowHandle: Send {
    /// Whether the external context has gone away, interpreted by the flow
    /// controller as the user having returned.
    fn is_closed(&self) -> bool;
}

/// Opens external verification destinations.
pub trait VerificationBrowser: Send + Sync {
    /// Opens `url` in a new browsing context.
    ///
    /// # Returns
    /// - `Some(handle)` when the context opened
    /// - `None` when it could not be opened (the pop-up-blocked case); the
    ///   caller must not commit any pending state
    fn open(&self, url: &str) -> Option<Box<dyn WindowHandle>>;
}

#[cfg(target_os = "macos")]
const OPENER: &[&str] = &["open"];
#[cfg(target_os = "windows")]
const OPENER: &[&str] = &["cmd", "/C", "start"];
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const OPENER: &[&str] = &["xdg-open"];

/// Opens URLs through the platform opener and tracks the spawned process.
pub struct SystemBrowser;

impl VerificationBrowser for SystemBrowser {
    fn open(&self, url: &str) -> Option<Box<dyn WindowHandle>> {
        match Command::new(OPENER[0]).args(&OPENER[1..]).arg(url).spawn() {
            Ok(child) => Some(Box::new(ProcessWindow {
                child: Mutex::new(child),
            })),
            Err(e) => {
                log::warn!("could not open {}: {}", url, e);
                None
            }
        }
    }
}

/// Window handle backed by the opener process. Most openers hand the URL to
/// a running browser and exit immediately, in which case the handle reports
/// closed and the reload path (a surviving pending record) carries the flow
/// instead.
struct ProcessWindow {
    child: Mutex<Child>,
}

impl WindowHandle for ProcessWindow {
    fn is_closed(&self) -> bool {
        let mut child = self.child.lock().expect("window lock poisoned");
        match child.try_wait() {
            Ok(Some(_)) => true,
            Ok(None) => false,
            Err(e) => {
                log::warn!("could not probe opener process: {}", e);
                true
            }
        }
    }
}

#[cfg(test)]
pub mod fakes {
    //! Controllable browser doubles for flow-controller tests.

    use super::{VerificationBrowser, WindowHandle};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    /// Browser fake recording opened URLs; every window shares one closed
    /// flag so tests can simulate the user coming back.
    pub struct FakeBrowser {
        pub blocked: bool,
        pub closed: Arc<AtomicBool>,
        pub opened: Mutex<Vec<String>>,
    }

    impl FakeBrowser {
        pub fn new() -> Self {
            FakeBrowser {
                blocked: false,
                closed: Arc::new(AtomicBool::new(false)),
                opened: Mutex::new(Vec::new()),
            }
        }

        pub fn blocking() -> Self {
            FakeBrowser {
                blocked: true,
                ..Self::new()
            }
        }

        pub fn opened_urls(&self) -> Vec<String> {
            self.opened.lock().unwrap().clone()
        }

        pub fn close_window(&self) {
            self.closed.store(true, Ordering::SeqCst);
        }
    }

    impl VerificationBrowser for FakeBrowser {
        fn open(&self, url: &str) -> Option<Box<dyn WindowHandle>> {
            if self.blocked {
                return None;
            }
            self.opened.lock().unwrap().push(url.to_string());
            Some(Box::new(FakeWindow {
                closed: self.closed.clone(),
            }))
        }
    }

    struct FakeWindow {
        closed: Arc<AtomicBool>,
    }

    impl WindowHandle for FakeWindow {
        fn is_closed(&self) -> bool {
            self.closed.load(Ordering::SeqCst)
        }
    }
}
