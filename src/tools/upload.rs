//! `primp_upload`: multipart file upload.

use serde_json::json;

use crate::args::ArgumentResolver;
use crate::descriptor::{
    enum_list, Method, DEFAULT_CONTENT_TYPE, DEFAULT_IMPERSONATE, DEFAULT_IMPERSONATE_OS,
    DEFAULT_TIMEOUT_SECS,
};
use crate::error::Result;
use crate::executor::RequestExecutor;
use crate::format;
use crate::impersonate::{self, Browser, ImpersonateOs};
use crate::protocol::{ToolCallResult, ToolDefinition};

use super::{Tool, ToolContext};

/// Tool for uploading files as multipart form data.
pub struct UploadTool;

#[async_trait::async_trait]
impl Tool for UploadTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "primp_upload".into(),
            description: "Upload files using primp with multipart form data".into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "url": {
                        "type": "string",
                        "description": "The URL to upload to"
                    },
                    "method": {
                        "type": "string",
                        "enum": enum_list(Method::UPLOAD, Method::as_str),
                        "default": "POST",
                        "description": "HTTP method to use"
                    },
                    "files": {
                        "type": "array",
                        "minItems": 1,
                        "items": {
                            "type": "object",
                            "properties": {
                                "name": {"type": "string", "description": "Form field name"},
                                "filename": {"type": "string", "description": "File name"},
                                "content": {"type": "string", "description": "File content (base64 encoded)"},
                                "content_type": {
                                    "type": "string",
                                    "default": DEFAULT_CONTENT_TYPE,
                                    "description": "MIME type"
                                }
                            },
                            "required": ["name", "filename", "content"]
                        },
                        "description": "Files to upload"
                    },
                    "data": {
                        "type": "object",
                        "additionalProperties": {"type": "string"},
                        "description": "Additional form fields"
                    },
                    "headers": {
                        "type": "object",
                        "additionalProperties": {"type": "string"},
                        "description": "HTTP headers to include"
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
                        "description": "Proxy URL (e.g., http://proxy:8080)"
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
                    }
                },
                "required": ["url", "files"]
            }),
        }
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
        context: &ToolContext,
    ) -> Result<ToolCallResult> {
        let descriptor = ArgumentResolver::new(&arguments)?.upload()?;
        let impersonation =
            impersonate::select(&descriptor.impersonate.browser, &descriptor.impersonate.os)?;

        tracing::debug!(
            files = descriptor.files.len(),
            fields = descriptor.fields.len(),
            "uploading"
        );

        let prepared = RequestExecutor::prepare_upload(descriptor, impersonation);
        let response = context.executor.execute(prepared).await?;

        Ok(ToolCallResult::text(format::summary(&response)))
    }
}
