use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// MCP invocation payload: a tool name plus free-form arguments.
#[derive(Debug, Deserialize)]
pub struct InvokeRequest {
    pub tool: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: text.into(),
        }
    }
}

/// The invocation envelope: the only externally observable output shape of
/// an agent run.
#[derive(Debug, Serialize)]
pub struct InvokeResponse {
    pub content: Vec<ContentBlock>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl InvokeResponse {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            is_error: false,
        }
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            is_error: true,
        }
    }
}

/// Client-error body with an optional machine-readable code.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub endpoints: EndpointIndex,
}

#[derive(Debug, Serialize)]
pub struct EndpointIndex {
    pub manifest: &'static str,
    pub invoke: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_shape() {
        let value = serde_json::to_value(InvokeResponse::success("4")).expect("serializes");
        assert_eq!(
            value,
            json!({"content": [{"type": "text", "text": "4"}], "isError": false})
        );
    }

    #[test]
    fn failure_envelope_sets_is_error() {
        let value = serde_json::to_value(InvokeResponse::failure("boom")).expect("serializes");
        assert_eq!(value["isError"], true);
        assert_eq!(value["content"][0]["text"], "boom");
    }

    #[test]
    fn error_body_omits_absent_code() {
        let value = serde_json::to_value(ErrorBody {
            error: "nope".into(),
            code: None,
        })
        .expect("serializes");
        assert!(value.get("code").is_none());
    }

    #[test]
    fn invoke_request_tolerates_missing_arguments() {
        let request: InvokeRequest =
            serde_json::from_str(r#"{"tool":"agent_executor"}"#).expect("parses");
        assert_eq!(request.tool, "agent_executor");
        assert!(request.arguments.is_empty());
    }
}
