//! `primp_request`: one HTTP request with browser impersonation.

use serde_json::json;

use crate::args::ArgumentResolver;
use crate::descriptor::{
    enum_list, Method, ReturnFormat, DEFAULT_IMPERSONATE, DEFAULT_IMPERSONATE_OS,
    DEFAULT_TIMEOUT_SECS,
};
use crate::error::Result;
use crate::executor::RequestExecutor;
use crate::format;
use crate::impersonate::{self, Browser, ImpersonateOs};
use crate::protocol::{ToolCallResult, ToolDefinition};

use super::{Tool, ToolContext};

/// Tool for making HTTP requests.
pub struct RequestTool;

#[async_trait::async_trait]
impl Tool for RequestTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "primp_request".into(),
            description: "Make HTTP requests using primp with browser impersonation".into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "url": {
                        "type": "string",
                        "description": "The URL to make the request to"
                    },
                    "method": {
                        "type": "string",
                        "enum": enum_list(Method::ALL, Method::as_str),
                        "default": "GET",
                        "description": "HTTP method to use"
                    },
                    "headers": {
                        "type": "object",
                        "additionalProperties": {"type": "string"},
                        "description": "HTTP headers to include in the request"
                    },
                    "params": {
                        "type": "object",
                        "additionalProperties": {"type": "string"},
                        "description": "URL query parameters"
                    },
                    "data": {
                        "oneOf": [
                            {"type": "string"},
                            {"type": "object", "additionalProperties": {"type": "string"}}
                        ],
                        "description": "Request body: raw text, or form fields sent urlencoded"
                    },
                    "json_body": {
                        "description": "JSON value to send as the request body (takes precedence over data)"
                    },
                    "auth": {
                        "type": "object",
                        "properties": {
                            "username": {"type": "string"},
                            "password": {"type": "string"}
                        },
                        "required": ["username", "password"],
                        "description": "Basic authentication credentials"
                    },
                    "bearer_token": {
                        "type": "string",
                        "description": "Bearer token; overrides any Authorization header"
                    },
                    "impersonate": {
                        "type": "string",
                        "enum": enum_list(Browser::ALL, Browser::as_str),
                        "default": DEFAULT_IMPERSONATE,
                        "description": "Browser to impersonate"
                    },
                    "impersonate_os": {
                        "type": "string",
                        "enum": enum_list(ImpersonateOs::ALL, ImpersonateOs::as_str),
                        "default": DEFAULT_IMPERSONATE_OS,
                        "description": "Operating system to impersonate"
                    },
                    "proxy": {
                        "type": "string",
                        "description": "Proxy URL (e.g., http://proxy:8080, socks5://127.0.0.1:9050)"
                    },
                    "timeout": {
                        "type": "number",
                        "exclusiveMinimum": 0,
                        "default": DEFAULT_TIMEOUT_SECS,
                        "description": "Request timeout in seconds"
                    },
                    "verify": {
                        "type": "boolean",
                        "default": true,
                        "description": "Whether to verify SSL certificates"
                    },
                    "follow_redirects": {
                        "type": "boolean",
                        "default": true,
                        "description": "Whether to follow redirects"
                    },
                    "return_format": {
                        "type": "string",
                        "enum": enum_list(ReturnFormat::ALL, ReturnFormat::as_str),
                        "default": "text",
                        "description": "Format to return response content in"
                    }
                },
                "required": ["url"]
            }),
        }
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
        context: &ToolContext,
    ) -> Result<ToolCallResult> {
        let descriptor = ArgumentResolver::new(&arguments)?.request()?;
        let impersonation =
            impersonate::select(&descriptor.impersonate.browser, &descriptor.impersonate.os)?;
        let return_format = descriptor.return_format;

        let prepared = RequestExecutor::prepare_request(descriptor, impersonation);
        let response = context.executor.execute(prepared).await?;

        Ok(ToolCallResult::text(format::render(&response, return_format)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use crate::executor::tests::RecordingTransport;
    use crate::transport::PreparedBody;

    #[test]
    fn schema_lists_every_identifier() {
        let schema = RequestTool.definition().input_schema;
        let browsers = schema["properties"]["impersonate"]["enum"].as_array().unwrap();
        assert_eq!(browsers.len(), Browser::ALL.len());
        assert_eq!(schema["required"], json!(["url"]));
        assert_eq!(schema["properties"]["return_format"]["enum"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn get_json_with_chrome_windows() {
        let transport = Arc::new(RecordingTransport::replying(
            "application/json",
            r#"{"url": "https://httpbin.org/get"}"#,
        ));
        let context = ToolContext::new(transport.clone());

        let result = RequestTool
            .execute(
                json!({
                    "url": "https://httpbin.org/get",
                    "method": "GET",
                    "impersonate": "chrome_131",
                    "impersonate_os": "windows",
                    "return_format": "json"
                }),
                &context,
            )
            .await
            .unwrap();

        assert!(!result.is_error);
        let parsed: serde_json::Value = serde_json::from_str(result.first_text().unwrap()).unwrap();
        assert_eq!(parsed, json!({"url": "https://httpbin.org/get"}));

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, Method::Get);
        assert_eq!(sent[0].body, PreparedBody::Empty);
        assert_eq!(sent[0].impersonation.browser(), Browser::Chrome131);
        assert_eq!(sent[0].impersonation.os(), ImpersonateOs::Windows);
        assert!(sent[0]
            .headers
            .iter()
            .any(|(n, v)| n == "user-agent" && v.contains("Chrome/131")));
    }

    #[tokio::test]
    async fn passes_query_and_policy_through() {
        let transport = Arc::new(RecordingTransport::replying("text/plain", "ok"));
        let context = ToolContext::new(transport.clone());

        RequestTool
            .execute(
                json!({
                    "url": "https://example.com/search",
                    "params": {"q": "rust"},
                    "timeout": 5,
                    "verify": false,
                    "follow_redirects": false,
                    "proxy": "http://127.0.0.1:3128"
                }),
                &context,
            )
            .await
            .unwrap();

        let sent = transport.sent();
        assert_eq!(sent[0].query, vec![("q".to_string(), "rust".to_string())]);
        assert_eq!(sent[0].policy.timeout.as_secs(), 5);
        assert!(!sent[0].policy.verify);
        assert!(!sent[0].policy.follow_redirects);
        assert_eq!(sent[0].policy.proxy.as_deref(), Some("http://127.0.0.1:3128"));
    }
}
