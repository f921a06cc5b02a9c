use log::{debug, warn};
use serde_json::Value;
use thiserror::Error;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder};

use crate::config::Config;
use crate::model::RequestSpec;

/// Shown for every failure that is not reported by the backend itself.
pub const FALLBACK_MESSAGE: &str = "Failed to connect to the server. Is the backend running?";

// Endpoints disagree on where they put the result. Checked in order.
const RESULT_FIELDS: [&str; 4] = ["processedData", "summary", "processedSummary", "original"];

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{0}")]
    Backend(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("response is not a JSON object")]
    NotAnObject,
}

impl DispatchError {
    /// Text for the user. Only errors reported by the backend are shown as-is.
    pub fn user_message(&self) -> String {
        match self {
            Self::Backend(message) => message.clone(),
            Self::Transport(_) | Self::Decode(_) | Self::NotAnObject => {
                FALLBACK_MESSAGE.to_string()
            }
        }
    }
}

/// Settled result of one dispatch, already reduced to what gets displayed.
/// An empty `Output` means the backend answered without any known result field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Output(String),
    Failed(String),
}

impl From<Result<String, DispatchError>> for Outcome {
    fn from(value: Result<String, DispatchError>) -> Self {
        match value {
            Ok(output) => Self::Output(output),
            Err(err) => Self::Failed(err.user_message()),
        }
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    client: Client,
    base_url: String,
}

impl Dispatcher {
    pub fn new(config: &Config) -> Result<Self, DispatchError> {
        let mut builder = ClientBuilder::new();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Performs the call described by `spec` and extracts the result text.
    ///
    /// The status code is not inspected: any JSON object body is normalized,
    /// so a 4xx/5xx carrying `{"error": ...}` surfaces as `DispatchError::Backend`.
    pub async fn send(&self, spec: &RequestSpec) -> Result<String, DispatchError> {
        let url = format!("{}{}", self.base_url, spec.endpoint);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        debug!("POST {url}");
        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(&spec.body)
            .send()
            .await?;
        debug!("{url} answered {}", response.status());

        let bytes = response.bytes().await?;
        let payload: Value = serde_json::from_slice(&bytes)?;
        normalize(&payload)
    }

    /// Like [`Dispatcher::send`], with every failure converted to its user-facing message.
    pub async fn dispatch(&self, spec: &RequestSpec) -> Outcome {
        let result = self.send(spec).await;
        match &result {
            Ok(output) if output.is_empty() => {
                warn!("{} returned no recognized result field", spec.endpoint);
            }
            Ok(_) => {}
            Err(DispatchError::Backend(message)) => {
                debug!("{} reported an error: {message}", spec.endpoint);
            }
            Err(err) => warn!("{} failed: {err}", spec.endpoint),
        }
        Outcome::from(result)
    }
}

/// Reduces a backend payload to the text to display.
///
/// A truthy `error` wins over any result field. Otherwise the first truthy
/// entry of `RESULT_FIELDS` is returned, or an empty string if there is none.
pub fn normalize(payload: &Value) -> Result<String, DispatchError> {
    let object = payload.as_object().ok_or(DispatchError::NotAnObject)?;

    if let Some(error) = object.get("error").filter(|value| is_truthy(value)) {
        return Err(DispatchError::Backend(render(error)));
    }

    Ok(RESULT_FIELDS
        .iter()
        .find_map(|field| object.get(*field).filter(|value| is_truthy(value)))
        .map(render)
        .unwrap_or_default())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map_or(true, |n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize, DispatchError, Outcome, FALLBACK_MESSAGE};
    use serde_json::json;

    #[test]
    fn processed_data_wins_over_lower_fields() {
        let payload = json!({
            "original": "O",
            "processedSummary": "P",
            "summary": "Y",
            "processedData": "X",
        });
        assert_eq!(normalize(&payload).unwrap(), "X");
    }

    #[test]
    fn summary_used_without_processed_data() {
        assert_eq!(normalize(&json!({ "summary": "Y" })).unwrap(), "Y");
    }

    #[test]
    fn empty_fields_are_skipped() {
        let payload = json!({
            "processedData": "",
            "summary": null,
            "processedSummary": "P",
        });
        assert_eq!(normalize(&payload).unwrap(), "P");
    }

    #[test]
    fn original_is_last_resort() {
        assert_eq!(normalize(&json!({ "original": "O" })).unwrap(), "O");
    }

    #[test]
    fn unknown_fields_give_empty_output() {
        assert_eq!(normalize(&json!({ "status": "ok" })).unwrap(), "");
    }

    #[test]
    fn error_takes_precedence() {
        let payload = json!({ "error": "bad input", "processedData": "X" });
        match normalize(&payload) {
            Err(DispatchError::Backend(message)) => assert_eq!(message, "bad input"),
            other => panic!("expected backend error, got {other:?}"),
        }
    }

    #[test]
    fn falsy_error_is_ignored() {
        let payload = json!({ "error": "", "summary": "Y" });
        assert_eq!(normalize(&payload).unwrap(), "Y");
        let payload = json!({ "error": false, "summary": "Y" });
        assert_eq!(normalize(&payload).unwrap(), "Y");
    }

    #[test]
    fn non_string_values_are_rendered_as_json() {
        assert_eq!(normalize(&json!({ "summary": ["a", "b"] })).unwrap(), r#"["a","b"]"#);
        match normalize(&json!({ "error": { "code": 3 } })) {
            Err(DispatchError::Backend(message)) => assert_eq!(message, r#"{"code":3}"#),
            other => panic!("expected backend error, got {other:?}"),
        }
    }

    #[test]
    fn non_object_payload_is_rejected() {
        assert!(matches!(
            normalize(&json!(["processedData"])),
            Err(DispatchError::NotAnObject)
        ));
    }

    #[test]
    fn only_backend_errors_reach_the_user_verbatim() {
        let decode = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        assert_eq!(DispatchError::Decode(decode).user_message(), FALLBACK_MESSAGE);
        assert_eq!(DispatchError::NotAnObject.user_message(), FALLBACK_MESSAGE);
        assert_eq!(
            DispatchError::Backend("bad input".to_string()).user_message(),
            "bad input"
        );
    }

    #[test]
    fn outcome_from_result() {
        assert_eq!(
            Outcome::from(Ok("X".to_string())),
            Outcome::Output("X".to_string())
        );
        assert_eq!(
            Outcome::from(Err(DispatchError::NotAnObject)),
            Outcome::Failed(FALLBACK_MESSAGE.to_string())
        );
    }
}
