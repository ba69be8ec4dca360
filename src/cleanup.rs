//! Guaranteed removal of transient artifacts.
//!
//! A `CleanupScope` collects the paths an operation creates along the way.
//! Dropping the scope removes every path still registered, so the removal
//! runs on normal return, on error return, and on unwind alike. `main` keeps
//! its scope on the stack and only converts errors into an exit status after
//! the scope has dropped, which keeps `std::process::exit` from bypassing it.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::debug;

/// Registry of transient files to remove when the scope ends
#[derive(Debug, Default)]
pub struct CleanupScope {
    paths: Mutex<Vec<PathBuf>>,
}

impl CleanupScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a path for removal at scope end
    pub fn register(&self, path: impl Into<PathBuf>) {
        if let Ok(mut paths) = self.paths.lock() {
            paths.push(path.into());
        }
    }

    /// Withdraw a path that has been promoted to a durable artifact
    /// (typically after a successful rename into place)
    pub fn release(&self, path: &Path) {
        if let Ok(mut paths) = self.paths.lock() {
            paths.retain(|p| p != path);
        }
    }

    /// Number of paths currently registered
    pub fn pending(&self) -> usize {
        self.paths.lock().map(|p| p.len()).unwrap_or(0)
    }
}

impl Drop for CleanupScope {
    fn drop(&mut self) {
        let paths = match self.paths.get_mut() {
            Ok(paths) => std::mem::take(paths),
            Err(poisoned) => std::mem::take(poisoned.into_inner()),
        };

        for path in paths {
            match std::fs::remove_file(&path) {
                Ok(()) => debug!("removed transient artifact: {}", path.display()),
                // Already gone or never created is fine; anything else is
                // best-effort only.
                Err(err) => debug!("cleanup skipped {}: {err}", path.display()),
            }
        }
    }
}

/// Run `body` with a fresh scope, removing its artifacts on every exit path
pub fn with_cleanup<T>(body: impl FnOnce(&CleanupScope) -> T) -> T {
    let scope = CleanupScope::new();
    body(&scope)
}
