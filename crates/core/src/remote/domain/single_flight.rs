use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Process-wide single-flight registry keyed by remote path.
///
/// Two interleaved delete/rename sequences against the same target could
/// destroy both copies of a recording, so at most one replacement may be
/// in flight per path. The guard releases the path on drop, including
/// on panic and error paths.
#[derive(Default)]
pub struct PathLocks {
    in_flight: Mutex<HashSet<String>>,
}

impl PathLocks {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Claim `path`, or return `None` if another attempt already holds it.
    pub fn try_lock(self: &Arc<Self>, path: &str) -> Option<PathGuard> {
        let mut in_flight = self.in_flight.lock().ok()?;
        if !in_flight.insert(path.to_string()) {
            return None;
        }
        Some(PathGuard {
            locks: Arc::clone(self),
            path: path.to_string(),
        })
    }

    fn release(&self, path: &str) {
        if let Ok(mut in_flight) = self.in_flight.lock() {
            in_flight.remove(path);
        }
    }
}

pub struct PathGuard {
    locks: Arc<PathLocks>,
    path: String,
}

impl Drop for PathGuard {
    fn drop(&mut self) {
        self.locks.release(&self.path);
    }
}
