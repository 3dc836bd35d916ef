//! Test doubles for the ports.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::{Arc, Mutex};

use barrelhub_domain::error::{BarrelHubError, TransportError};
use serde_json::Value;
use tokio::sync::oneshot;

use crate::ports::{ErrorReporter, Request, Transport};

type Reply = Result<Value, TransportError>;

enum Scripted {
    Now(Reply),
    Later(oneshot::Receiver<Reply>),
}

/// Transport answering from per-path queues of scripted replies.
///
/// Paths without a queued reply answer with a 404 transport error.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: Mutex<HashMap<String, VecDeque<Scripted>>>,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn reply(&self, path: &str, reply: Reply) {
        self.push(path, Scripted::Now(reply));
    }

    pub(crate) fn reply_ok(&self, path: &str, body: Value) {
        self.reply(path, Ok(body));
    }

    pub(crate) fn fail(&self, path: &str, message: &str) {
        self.reply(path, Err(TransportError::network(path, message)));
    }

    /// Queue a reply that resolves only when the returned sender fires.
    pub(crate) fn defer(&self, path: &str) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.push(path, Scripted::Later(rx));
        tx
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn request_count(&self, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .count()
    }

    /// Yield until `count` requests for `path` have been issued.
    pub(crate) async fn wait_for_requests(&self, path: &str, count: usize) {
        while self.request_count(path) < count {
            tokio::task::yield_now().await;
        }
    }

    fn push(&self, path: &str, scripted: Scripted) {
        self.replies
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(scripted);
    }
}

impl Transport for ScriptedTransport {
    fn request(&self, request: Request) -> impl Future<Output = Reply> + Send {
        let path = request.path.clone();
        let scripted = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&path)
            .and_then(VecDeque::pop_front);
        self.requests.lock().unwrap().push(request);
        async move {
            match scripted {
                Some(Scripted::Now(reply)) => reply,
                Some(Scripted::Later(rx)) => rx
                    .await
                    .unwrap_or_else(|_| Err(TransportError::network(path, "reply dropped"))),
                None => Err(TransportError::status(path, 404, "no scripted reply")),
            }
        }
    }
}

/// Reporter keeping every error message.
#[derive(Default)]
pub(crate) struct RecordingReporter {
    reports: Mutex<Vec<(String, String)>>,
}

impl RecordingReporter {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn reports(&self) -> Vec<(String, String)> {
        self.reports.lock().unwrap().clone()
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, context: &str, error: &BarrelHubError) {
        self.reports
            .lock()
            .unwrap()
            .push((context.to_string(), error.to_string()));
    }
}
