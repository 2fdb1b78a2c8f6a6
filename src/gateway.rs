use crate::errors::GatewayError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::future::Future;
use tracing::debug;

pub type Params = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetLikeStatus,
    Like,
    CancelLike,
    MostLiked,
    DocumentQuery,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Self::GetLikeStatus => "get-like-status",
            Self::Like => "like",
            Self::CancelLike => "cancel-like",
            Self::MostLiked => "most-liked",
            Self::DocumentQuery => "document-query",
        }
    }

    pub fn wire_id(self) -> &'static str {
        match self {
            Self::GetLikeStatus => "Services.GetLikeStatus",
            Self::Like => "Services.Like",
            Self::CancelLike => "Services.CancelLike",
            Self::MostLiked => "Services.MostLiked",
            Self::DocumentQuery => "Document.Query",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationResponse {
    pub data: Option<Value>,
}

pub trait Gateway: Send + Sync {
    fn invoke(
        &self,
        operation: Operation,
        params: Params,
    ) -> impl Future<Output = Result<OperationResponse, GatewayError>> + Send;
}

#[derive(Debug, Serialize)]
struct AutomationRequest<'a> {
    params: &'a Params,
    context: Params,
}

#[derive(Clone)]
pub struct AutomationClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
}

impl AutomationClient {
    pub fn new(base_url: &str, username: &str, password: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    pub fn operation_url(&self, operation: Operation) -> String {
        format!("{}/site/automation/{}", self.base_url, operation.wire_id())
    }
}

impl Gateway for AutomationClient {
    async fn invoke(
        &self,
        operation: Operation,
        params: Params,
    ) -> Result<OperationResponse, GatewayError> {
        let body = AutomationRequest {
            params: &params,
            context: Params::new(),
        };
        let payload = serde_json::to_vec(&body)?;

        debug!(operation = operation.name(), "invoking automation operation");
        let response = self
            .http
            .post(self.operation_url(operation))
            .basic_auth(&self.username, Some(&self.password))
            .header(reqwest::header::CONTENT_TYPE, "application/json+nxrequest")
            .header(reqwest::header::ACCEPT, "application/json+nxentity, */*")
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        decode_body(&bytes)
    }
}

pub fn decode_body(bytes: &[u8]) -> Result<OperationResponse, GatewayError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(OperationResponse { data: None });
    }
    let value: Value = serde_json::from_slice(bytes)?;
    let data = if value.is_null() { None } else { Some(value) };
    Ok(OperationResponse { data })
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    pub struct MockGateway {
        replies: Arc<Mutex<VecDeque<Result<OperationResponse, u16>>>>,
        calls: Arc<Mutex<Vec<(Operation, Params)>>>,
    }

    impl MockGateway {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(&self, data: Value) -> &Self {
            self.replies
                .lock()
                .unwrap()
                .push_back(Ok(OperationResponse { data: Some(data) }));
            self
        }

        pub fn reply_empty(&self) -> &Self {
            self.replies
                .lock()
                .unwrap()
                .push_back(Ok(OperationResponse { data: None }));
            self
        }

        pub fn fail(&self, status: u16) -> &Self {
            self.replies.lock().unwrap().push_back(Err(status));
            self
        }

        pub fn calls(&self) -> Vec<(Operation, Params)> {
            self.calls.lock().unwrap().clone()
        }

        pub fn operations(&self) -> Vec<Operation> {
            self.calls().into_iter().map(|(op, _)| op).collect()
        }
    }

    impl Gateway for MockGateway {
        async fn invoke(
            &self,
            operation: Operation,
            params: Params,
        ) -> Result<OperationResponse, GatewayError> {
            self.calls.lock().unwrap().push((operation, params));
            let next = self.replies.lock().unwrap().pop_front();
            match next {
                Some(Ok(response)) => Ok(response),
                Some(Err(status)) => Err(GatewayError::Status {
                    status,
                    body: String::new(),
                }),
                None => Err(GatewayError::Status {
                    status: 599,
                    body: "no scripted reply".to_string(),
                }),
            }
        }
    }
}
