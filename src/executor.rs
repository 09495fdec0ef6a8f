//! Request construction and execution.
//!
//! Turns a descriptor plus resolved [`Impersonation`] into a
//! [`PreparedRequest`] and sends it through the configured
//! [`HttpTransport`], exactly once.

use std::sync::Arc;
use std::time::Instant;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::descriptor::{FormData, HeaderSpec, RequestDescriptor, UploadRequestDescriptor};
use crate::error::Result;
use crate::impersonate::Impersonation;
use crate::response::ResponseRecord;
use crate::transport::{HttpTransport, MultipartField, PreparedBody, PreparedRequest};

/// Headers owned by the multipart encoder.
const MULTIPART_MANAGED_HEADERS: &[&str] = &["content-type", "content-length"];

/// Builds and sends requests.
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn HttpTransport>,
}

impl RequestExecutor {
    /// Create an executor over a transport.
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Assemble a `primp_request` call.
    pub fn prepare_request(
        descriptor: RequestDescriptor,
        impersonation: Impersonation,
    ) -> PreparedRequest {
        let body = match (descriptor.json_body, descriptor.data) {
            (Some(json), _) => PreparedBody::Json(json),
            (None, Some(FormData::Fields(fields))) => PreparedBody::Form(fields),
            (None, Some(FormData::Raw(text))) => PreparedBody::Raw(text),
            (None, None) => PreparedBody::Empty,
        };

        PreparedRequest {
            method: descriptor.method,
            url: descriptor.url,
            query: descriptor.params,
            headers: assemble_headers(&impersonation, &descriptor.headers),
            body,
            policy: descriptor.policy,
            impersonation,
        }
    }

    /// Assemble a `primp_upload` call. Text fields precede file parts.
    pub fn prepare_upload(
        descriptor: UploadRequestDescriptor,
        impersonation: Impersonation,
    ) -> PreparedRequest {
        let mut headers = assemble_headers(&impersonation, &descriptor.headers);
        headers.retain(|(name, _)| {
            !MULTIPART_MANAGED_HEADERS
                .iter()
                .any(|managed| name.eq_ignore_ascii_case(managed))
        });

        let parts = descriptor
            .fields
            .into_iter()
            .map(|(name, value)| MultipartField::Text { name, value })
            .chain(descriptor.files.into_iter().map(MultipartField::File))
            .collect();

        PreparedRequest {
            method: descriptor.method,
            url: descriptor.url,
            query: Vec::new(),
            headers,
            body: PreparedBody::Multipart(parts),
            policy: descriptor.policy,
            impersonation,
        }
    }

    /// Send a prepared request. No retries.
    pub async fn execute(&self, request: PreparedRequest) -> Result<ResponseRecord> {
        let method = request.method;
        let url = request.url.clone();
        tracing::debug!(
            %method,
            %url,
            impersonate = %request.impersonation,
            timeout_ms = request.policy.timeout.as_millis() as u64,
            proxied = request.policy.proxy.is_some(),
            "sending request"
        );

        let started = Instant::now();
        match self.transport.send(request).await {
            Ok(response) => {
                tracing::info!(
                    %method,
                    %url,
                    status = response.status,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "request completed"
                );
                Ok(response)
            }
            Err(e) => {
                tracing::warn!(
                    %method,
                    %url,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "request failed: {}",
                    e
                );
                Err(e)
            }
        }
    }
}

/// Final header list for a request.
///
/// Precedence, lowest first: impersonation defaults, caller headers, basic
/// auth, bearer token. Later layers replace earlier ones by case-insensitive
/// name, keeping the earlier position.
pub fn assemble_headers(impersonation: &Impersonation, requested: &HeaderSpec) -> Vec<(String, String)> {
    let mut headers = impersonation.default_headers();

    for (name, value) in &requested.headers {
        set_header(&mut headers, name, value.clone());
    }

    if let Some(auth) = &requested.auth {
        let credentials = BASE64.encode(format!("{}:{}", auth.username, auth.password));
        set_header(&mut headers, "Authorization", format!("Basic {credentials}"));
    }

    if let Some(token) = &requested.bearer_token {
        set_header(&mut headers, "Authorization", format!("Bearer {token}"));
    }

    headers
}

fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: String) {
    match headers
        .iter()
        .position(|(existing, _)| existing.eq_ignore_ascii_case(name))
    {
        Some(index) => {
            headers[index] = (name.to_string(), value);
            let mut i = index + 1;
            while i < headers.len() {
                if headers[i].0.eq_ignore_ascii_case(name) {
                    headers.remove(i);
                } else {
                    i += 1;
                }
            }
        }
        None => headers.push((name.to_string(), value)),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::descriptor::{
        BasicAuth, ExecutionPolicy, FileUpload, ImpersonationSpec, Method, ReturnFormat,
    };
    use crate::error::Error;

    /// Records every request and answers with a canned response or error.
    pub(crate) struct RecordingTransport {
        pub requests: Mutex<Vec<PreparedRequest>>,
        reply: Box<dyn Fn() -> Result<ResponseRecord> + Send + Sync>,
    }

    impl RecordingTransport {
        pub fn replying(content_type: &str, body: &str) -> Self {
            let content_type = content_type.to_string();
            let body = body.to_string();
            Self {
                requests: Mutex::new(Vec::new()),
                reply: Box::new(move || {
                    Ok(ResponseRecord {
                        status: 200,
                        reason: Some("OK".into()),
                        url: "https://example.com/".into(),
                        headers: vec![("content-type".into(), content_type.clone())],
                        body: body.clone(),
                    })
                }),
            }
        }

        pub fn failing(message: &str) -> Self {
            let message = message.to_string();
            Self {
                requests: Mutex::new(Vec::new()),
                reply: Box::new(move || Err(Error::RequestExecution(message.clone()))),
            }
        }

        pub fn sent(&self) -> Vec<PreparedRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpTransport for RecordingTransport {
        async fn send(&self, request: PreparedRequest) -> Result<ResponseRecord> {
            self.requests.lock().unwrap().push(request);
            (self.reply)()
        }
    }

    fn descriptor() -> RequestDescriptor {
        RequestDescriptor {
            url: "https://httpbin.org/anything".into(),
            method: Method::Post,
            headers: HeaderSpec::default(),
            params: Vec::new(),
            data: None,
            json_body: None,
            impersonate: ImpersonationSpec::default(),
            policy: ExecutionPolicy::default(),
            return_format: ReturnFormat::Text,
        }
    }

    fn header<'a>(headers: &'a [(String, String)], name: &str) -> Vec<&'a str> {
        headers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    #[test]
    fn caller_headers_override_profile_defaults() {
        let spec = HeaderSpec {
            headers: vec![
                ("User-Agent".into(), "custom/1.0".into()),
                ("X-Extra".into(), "yes".into()),
            ],
            ..Default::default()
        };
        let headers = assemble_headers(&Impersonation::default(), &spec);

        assert_eq!(header(&headers, "user-agent"), vec!["custom/1.0"]);
        assert_eq!(header(&headers, "x-extra"), vec!["yes"]);
        // Overridden header keeps the profile's position.
        let defaults = Impersonation::default().default_headers();
        let default_pos = defaults.iter().position(|(n, _)| n == "user-agent").unwrap();
        assert_eq!(headers[default_pos].0, "User-Agent");
    }

    #[test]
    fn bearer_token_wins_over_everything() {
        let spec = HeaderSpec {
            headers: vec![("authorization".into(), "Token caller".into())],
            auth: Some(BasicAuth {
                username: "user".into(),
                password: "pass".into(),
            }),
            bearer_token: Some("abc123".into()),
        };
        let headers = assemble_headers(&Impersonation::default(), &spec);
        assert_eq!(header(&headers, "authorization"), vec!["Bearer abc123"]);
    }

    #[test]
    fn basic_auth_overrides_caller_authorization() {
        let spec = HeaderSpec {
            headers: vec![("Authorization".into(), "Token caller".into())],
            auth: Some(BasicAuth {
                username: "user".into(),
                password: "pass".into(),
            }),
            bearer_token: None,
        };
        let headers = assemble_headers(&Impersonation::default(), &spec);
        assert_eq!(header(&headers, "authorization"), vec!["Basic dXNlcjpwYXNz"]);
    }

    #[test]
    fn json_body_takes_precedence_over_data() {
        let mut d = descriptor();
        d.json_body = Some(json!({"k": "v"}));
        d.data = Some(FormData::Fields(vec![("a".into(), "1".into())]));
        let prepared = RequestExecutor::prepare_request(d, Impersonation::default());
        assert_eq!(prepared.body, PreparedBody::Json(json!({"k": "v"})));
    }

    #[test]
    fn selects_single_body_encoding() {
        let mut d = descriptor();
        d.data = Some(FormData::Fields(vec![("a".into(), "1".into())]));
        let prepared = RequestExecutor::prepare_request(d, Impersonation::default());
        assert_eq!(prepared.body, PreparedBody::Form(vec![("a".into(), "1".into())]));

        let mut d = descriptor();
        d.data = Some(FormData::Raw("raw".into()));
        let prepared = RequestExecutor::prepare_request(d, Impersonation::default());
        assert_eq!(prepared.body, PreparedBody::Raw("raw".into()));

        let prepared = RequestExecutor::prepare_request(descriptor(), Impersonation::default());
        assert_eq!(prepared.body, PreparedBody::Empty);
    }

    #[test]
    fn upload_puts_fields_before_files_and_drops_content_type() {
        let upload = UploadRequestDescriptor {
            url: "https://httpbin.org/post".into(),
            method: Method::Post,
            files: vec![FileUpload {
                name: "file".into(),
                filename: "example.txt".into(),
                content: b"Hello World".to_vec(),
                content_type: "text/plain".into(),
            }],
            fields: vec![("description".into(), "Test upload".into())],
            headers: HeaderSpec {
                headers: vec![("Content-Type".into(), "application/json".into())],
                ..Default::default()
            },
            impersonate: ImpersonationSpec::default(),
            policy: ExecutionPolicy::default(),
        };
        let prepared = RequestExecutor::prepare_upload(upload, Impersonation::default());

        assert!(header(&prepared.headers, "content-type").is_empty());
        let PreparedBody::Multipart(parts) = prepared.body else {
            panic!("expected multipart body");
        };
        assert_eq!(parts.len(), 2);
        assert!(matches!(&parts[0], MultipartField::Text { name, value }
            if name == "description" && value == "Test upload"));
        assert!(matches!(&parts[1], MultipartField::File(f)
            if f.name == "file" && f.content == b"Hello World"));
    }

    #[tokio::test]
    async fn execute_sends_exactly_once() {
        let transport = Arc::new(RecordingTransport::replying("text/plain", "ok"));
        let executor = RequestExecutor::new(transport.clone());
        let prepared = RequestExecutor::prepare_request(descriptor(), Impersonation::default());

        let response = executor.execute(prepared).await.unwrap();
        assert_eq!(response.body, "ok");
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn execute_surfaces_transport_failure() {
        let transport = Arc::new(RecordingTransport::failing("operation timed out"));
        let executor = RequestExecutor::new(transport.clone());
        let prepared = RequestExecutor::prepare_request(descriptor(), Impersonation::default());

        let err = executor.execute(prepared).await.unwrap_err();
        assert!(matches!(err, Error::RequestExecution(_)));
        assert_eq!(transport.sent().len(), 1);
    }
}
