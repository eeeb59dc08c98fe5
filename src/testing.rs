//! Scripted transport shared by unit tests

use crate::error::{MirrorError, MirrorResult};
use crate::transport::Transport;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Mutex;

/// Canned reply for one request
#[derive(Debug, Clone)]
pub enum Reply {
    Body(Vec<u8>),
    Status(u16),
    Unreachable,
}

impl Reply {
    pub fn body(bytes: impl AsRef<[u8]>) -> Self {
        Self::Body(bytes.as_ref().to_vec())
    }
}

/// Replies are consumed in order per URL; the last one repeats forever.
/// URLs without a script behave like an unreachable host.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, url: &str, replies: Vec<Reply>) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), replies.into());
        self
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    fn next_reply(&self, url: &str) -> MirrorResult<Vec<u8>> {
        *self.calls.lock().unwrap().entry(url.to_string()).or_default() += 1;

        let reply = {
            let mut routes = self.routes.lock().unwrap();
            match routes.get_mut(url) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(Reply::Body(bytes)) => Ok(bytes),
            Some(Reply::Status(status)) => Err(MirrorError::Http {
                url: url.to_string(),
                status,
            }),
            Some(Reply::Unreachable) | None => Err(MirrorError::network(url, "connection refused")),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str) -> MirrorResult<Vec<u8>> {
        self.next_reply(url)
    }

    async fn download(&self, url: &str, dest: &Path) -> MirrorResult<()> {
        let bytes = self.next_reply(url)?;
        tokio::fs::write(dest, bytes)
            .await
            .map_err(|e| MirrorError::io(format!("writing {}", dest.display()), e))
    }
}
