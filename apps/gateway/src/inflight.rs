//! Submissions currently being forwarded, shared by every request.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use foldify_core::tool::Tool;

use crate::session::SessionToken;

/// Keys of submissions still waiting on the backend
#[derive(Debug, Default)]
pub struct InFlight {
    keys: Mutex<HashSet<String>>,
}

impl InFlight {
    /// Claim `key`, or `None` while a submission with the same key is pending.
    /// Never awaits, so the check and the insert cannot interleave.
    pub fn claim(self: &Arc<Self>, key: String) -> Option<InFlightClaim> {
        let mut keys = self.keys.lock().unwrap_or_else(PoisonError::into_inner);
        if !keys.insert(key.clone()) {
            return None;
        }
        Some(InFlightClaim {
            registry: Arc::clone(self),
            key,
        })
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }
}

/// Frees its key when dropped, however the submission ended
#[derive(Debug)]
pub struct InFlightClaim {
    registry: Arc<InFlight>,
    key: String,
}

impl Drop for InFlightClaim {
    fn drop(&mut self) {
        self.registry
            .keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

/// One browser session submitting one job name to one tool
pub fn submission_key(session: Option<&SessionToken>, tool: Tool, job_name: &str) -> String {
    let session = session.map(|token| token.0.as_str()).unwrap_or("-");
    format!("{}:{}:{}", session, tool.key(), job_name)
}
