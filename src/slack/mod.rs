use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Response,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use crate::config::Config;

pub mod modal;
pub mod payloads;
pub mod verify;

pub use modal::{ModalTemplate, SlackModal, CLICK_ME_VALUE};
pub use payloads::{InteractionCallback, SlashCommand, SlackInteraction};

#[derive(Debug, Error)]
pub enum SlackError {
    #[error("Slack API request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Slack API error: {0}")]
    Api(String),
    #[error("invalid Slack token")]
    InvalidToken,
}

/// Identifies the modal a `views.update` call replaces.
///
/// `hash` guards against overwriting a newer version of the view; Slack
/// answers `hash_conflict` when it is stale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewTarget {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub external_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hash: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub view_id: String,
}

/// The two outbound operations this service performs against Slack.
#[async_trait]
pub trait DialogClient: Send + Sync {
    async fn open_view(&self, trigger_id: &str, view: &Value) -> Result<Value, SlackError>;

    async fn update_view(&self, target: &ViewTarget, view: &Value) -> Result<Value, SlackError>;
}

#[derive(Serialize)]
struct OpenRequest<'a> {
    trigger_id: &'a str,
    view: &'a Value,
}

#[derive(Serialize)]
struct UpdateRequest<'a> {
    view: &'a Value,
    #[serde(flatten)]
    target: &'a ViewTarget,
}

#[derive(Debug, Clone)]
pub struct SlackApp {
    client: reqwest::Client,
    api_url: String,
}

impl SlackApp {
    pub fn new(config: &Config) -> Result<Self, SlackError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        headers.insert(
            AUTHORIZATION,
            format!("Bearer {}", config.slack_token)
                .parse()
                .map_err(|_| SlackError::InvalidToken)?,
        );

        Ok(Self {
            client: reqwest::Client::builder().default_headers(headers).build()?,
            api_url: config.api_url.clone(),
        })
    }

    async fn validate_slack(&self, response: Response) -> Result<Value, SlackError> {
        let data: Value = response.error_for_status()?.json().await?;

        if data["ok"].as_bool() != Some(true) {
            let code = data["error"].as_str().unwrap_or("unknown_error").to_string();
            error!(error = %code, response = %data, "Slack API error");
            return Err(SlackError::Api(code));
        }

        Ok(data)
    }

    async fn call<T: Serialize + ?Sized>(&self, method: &str, body: &T) -> Result<Value, SlackError> {
        debug!(method, "calling Slack API");
        let res = self
            .client
            .post(format!("{}/{}", self.api_url, method))
            .json(body)
            .send()
            .await?;

        self.validate_slack(res).await
    }
}

#[async_trait]
impl DialogClient for SlackApp {
    async fn open_view(&self, trigger_id: &str, view: &Value) -> Result<Value, SlackError> {
        self.call("views.open", &OpenRequest { trigger_id, view })
            .await
    }

    async fn update_view(&self, target: &ViewTarget, view: &Value) -> Result<Value, SlackError> {
        self.call("views.update", &UpdateRequest { view, target })
            .await
    }
}

#[cfg(test)]
pub mod testing {
    use std::{collections::HashSet, sync::Mutex};

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Open { trigger_id: String, view: Value },
        Update { target: ViewTarget, view: Value },
    }

    /// Records every call and, like Slack, refuses a trigger id twice.
    #[derive(Default)]
    pub struct RecordingClient {
        pub calls: Mutex<Vec<Call>>,
        used_triggers: Mutex<HashSet<String>>,
        pub fail_updates: bool,
    }

    impl RecordingClient {
        pub fn failing_updates() -> Self {
            Self {
                fail_updates: true,
                ..Default::default()
            }
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DialogClient for RecordingClient {
        async fn open_view(&self, trigger_id: &str, view: &Value) -> Result<Value, SlackError> {
            self.calls.lock().unwrap().push(Call::Open {
                trigger_id: trigger_id.to_string(),
                view: view.clone(),
            });
            if !self.used_triggers.lock().unwrap().insert(trigger_id.to_string()) {
                return Err(SlackError::Api("expired_trigger_id".to_string()));
            }
            Ok(serde_json::json!({"ok": true}))
        }

        async fn update_view(&self, target: &ViewTarget, view: &Value) -> Result<Value, SlackError> {
            self.calls.lock().unwrap().push(Call::Update {
                target: target.clone(),
                view: view.clone(),
            });
            if self.fail_updates {
                return Err(SlackError::Api("hash_conflict".to_string()));
            }
            Ok(serde_json::json!({"ok": true}))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn update_request_omits_empty_ids() {
        let view = json!({"type": "modal"});
        let target = ViewTarget {
            hash: "h-1".to_string(),
            view_id: "V1".to_string(),
            ..Default::default()
        };

        let body = serde_json::to_value(UpdateRequest {
            view: &view,
            target: &target,
        })
        .unwrap();

        assert_eq!(body, json!({"view": {"type": "modal"}, "hash": "h-1", "view_id": "V1"}));

        let unhashed = ViewTarget {
            external_id: "ext-1".to_string(),
            ..Default::default()
        };
        let body = serde_json::to_value(UpdateRequest {
            view: &view,
            target: &unhashed,
        })
        .unwrap();

        assert_eq!(body, json!({"view": {"type": "modal"}, "external_id": "ext-1"}));
    }

    #[test]
    fn open_request_shape() {
        let view = json!({"type": "modal"});
        let body = serde_json::to_value(OpenRequest {
            trigger_id: "t-1",
            view: &view,
        })
        .unwrap();

        assert_eq!(body, json!({"trigger_id": "t-1", "view": {"type": "modal"}}));
    }

    #[test]
    fn client_builds_from_config() {
        let mut config = Config::for_tests("secret");
        assert!(SlackApp::new(&config).is_ok());

        config.slack_token = "bad\ntoken".to_string();
        assert!(matches!(SlackApp::new(&config), Err(SlackError::InvalidToken)));
    }
}
