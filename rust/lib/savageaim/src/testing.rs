//! Test doubles shared by the unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use savageaim_client::{ApiError, ApiRequest, ApiResponse, Gateway, Method};
use serde_json::{json, Value};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::config::Endpoints;
use crate::model::{Character, Notification};
use crate::store::Store;
use crate::toast::{ChannelSink, Toast};

pub(crate) const ME: &str = "/backend/api/me/";

enum Reply {
    Status(u16, Value),
    Fail(String),
}

type Key = (Method, String);

/// Scripted gateway. Unscripted requests get a 404.
#[derive(Default)]
pub(crate) struct FakeGateway {
    replies: Mutex<HashMap<Key, Reply>>,
    delays: Mutex<HashMap<Key, Duration>>,
    sent: Mutex<Vec<ApiRequest>>,
}

impl FakeGateway {
    pub fn reply(&self, method: Method, path: &str, status: u16, body: Value) {
        let mut replies = self.replies.lock().unwrap();
        replies.insert((method, path.to_string()), Reply::Status(status, body));
    }

    pub fn fail(&self, method: Method, path: &str, reason: &str) {
        let mut replies = self.replies.lock().unwrap();
        replies.insert((method, path.to_string()), Reply::Fail(reason.to_string()));
    }

    pub fn delay(&self, method: Method, path: &str, delay: Duration) {
        self.delays.lock().unwrap().insert((method, path.to_string()), delay);
    }

    pub fn requests(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .cloned()
            .collect()
    }

    pub fn calls(&self, method: Method, path: &str) -> usize {
        self.requests(method, path).len()
    }
}

#[async_trait::async_trait]
impl Gateway for FakeGateway {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let key = (request.method.clone(), request.path.clone());
        self.sent.lock().unwrap().push(request);

        let delay = self.delays.lock().unwrap().get(&key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let replies = self.replies.lock().unwrap();
        match replies.get(&key) {
            Some(Reply::Status(status, body)) => Ok(ApiResponse::new(*status, body.to_string())),
            Some(Reply::Fail(reason)) => Err(ApiError::Transport(reason.clone())),
            None => Ok(ApiResponse::new(404, "")),
        }
    }
}

/// A store wired to a fake gateway and a channel toast sink.
pub(crate) fn harness() -> (Store, Arc<FakeGateway>, UnboundedReceiver<Toast>) {
    let gateway = Arc::new(FakeGateway::default());
    let (sink, rx) = ChannelSink::new();
    let store = Store::new(gateway.clone(), Arc::new(sink), Endpoints::default());
    (store, gateway, rx)
}

/// Drain every toast shown so far.
pub(crate) fn toasts(rx: &mut UnboundedReceiver<Toast>) -> Vec<Toast> {
    let mut out = Vec::new();
    while let Ok(toast) = rx.try_recv() {
        out.push(toast);
    }
    out
}

pub(crate) fn user_json(id: Option<u64>) -> Value {
    json!({
        "avatar_url": "",
        "id": id,
        "loot_manager_version": "fifo",
        "loot_solver_greed": false,
        "theme": "beta",
        "username": if id.is_some() { "aria" } else { "" },
    })
}

pub(crate) fn character(id: u64, user_id: u64, verified: bool) -> Character {
    Character {
        id,
        name: format!("Character {}", id),
        world: "Lich".to_string(),
        user_id,
        verified,
        ..Default::default()
    }
}

pub(crate) fn notification(id: u64, read: bool) -> Notification {
    Notification {
        id,
        read,
        text: format!("notification {}", id),
        kind: "team_join".to_string(),
        ..Default::default()
    }
}
