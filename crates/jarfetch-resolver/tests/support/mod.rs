//! In-memory transport double for resolver tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use jarfetch_maven::error::TransportError;
use jarfetch_maven::transport::Transport;

/// Serves canned bodies by exact URL and records every GET.
///
/// Unknown URLs answer 404 (`Ok(None)`); URLs under a prefix marked
/// unreachable answer with a connectivity error, like a host that is down.
#[derive(Default)]
pub struct MemoryTransport {
    routes: Mutex<HashMap<String, Vec<u8>>>,
    down_prefixes: Mutex<Vec<String>>,
    log: Mutex<Vec<String>>,
}

#[allow(dead_code)] // each test binary uses a different slice of the double
impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(&self, url: &str, body: impl Into<Vec<u8>>) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), body.into());
    }

    /// Every URL starting with `prefix` fails with a connectivity error.
    pub fn mark_unreachable(&self, prefix: &str) {
        self.down_prefixes.lock().unwrap().push(prefix.to_string());
    }

    pub fn requests(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn requested(&self, url: &str) -> bool {
        self.log.lock().unwrap().iter().any(|u| u == url)
    }

    pub fn clear_log(&self) {
        self.log.lock().unwrap().clear();
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn get(&self, url: &str) -> Result<Option<Vec<u8>>, TransportError> {
        self.log.lock().unwrap().push(url.to_string());

        let down = self
            .down_prefixes
            .lock()
            .unwrap()
            .iter()
            .any(|p| url.starts_with(p.as_str()));
        if down {
            return Err(TransportError::Connectivity {
                url: url.to_string(),
                message: "connection refused".to_string(),
            });
        }

        Ok(self.routes.lock().unwrap().get(url).cloned())
    }
}
