use anyhow::{anyhow, Result};
use async_trait::async_trait;
use hbdm_rs::Transport;
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

/// 记录请求并按顺序返回预设的 data
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<Value, String>>>,
    pub calls: Mutex<Vec<(String, BTreeMap<String, String>)>>,
}

impl MockTransport {
    pub fn with(data: Value) -> Self {
        let mock = MockTransport::default();
        mock.push(data);
        mock
    }

    pub fn failing(msg: &str) -> Self {
        let mock = MockTransport::default();
        mock.responses.lock().unwrap().push_back(Err(msg.to_string()));
        mock
    }

    pub fn push(&self, data: Value) {
        self.responses.lock().unwrap().push_back(Ok(data));
    }

    pub fn last_call(&self) -> (String, BTreeMap<String, String>) {
        self.calls.lock().unwrap().last().cloned().expect("no request sent")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn do_request(&self, path: &str, params: &BTreeMap<String, String>) -> Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((path.to_string(), params.clone()));
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(data)) => Ok(data),
            Some(Err(msg)) => Err(anyhow!(msg)),
            None => Err(anyhow!("no response queued")),
        }
    }
}
