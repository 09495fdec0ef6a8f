//! HTTP transport capability.
//!
//! [`HttpTransport`] is the seam between request construction and the
//! network. [`ReqwestTransport`] is the production implementation; tests
//! substitute an in-memory one.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart;
use reqwest::redirect;

use crate::descriptor::{ExecutionPolicy, FileUpload, Method};
use crate::error::{Error, Result};
use crate::impersonate::Impersonation;
use crate::response::ResponseRecord;

/// Redirect hops followed when redirects are enabled.
pub const MAX_REDIRECTS: usize = 10;

/// A fully assembled request, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    /// HTTP method.
    pub method: Method,
    /// Target URL, without the extra query parameters.
    pub url: String,
    /// Query parameters appended to `url`.
    pub query: Vec<(String, String)>,
    /// Final header list, precedence already applied.
    pub headers: Vec<(String, String)>,
    /// Body encoding.
    pub body: PreparedBody,
    /// Timeout, TLS, redirect and proxy policy.
    pub policy: ExecutionPolicy,
    /// Profile the headers were derived from.
    pub impersonation: Impersonation,
}

/// Exactly one body encoding per request.
#[derive(Debug, Clone, PartialEq)]
pub enum PreparedBody {
    /// No body.
    Empty,
    /// JSON-encoded value.
    Json(serde_json::Value),
    /// `application/x-www-form-urlencoded` fields.
    Form(Vec<(String, String)>),
    /// Raw text.
    Raw(String),
    /// `multipart/form-data` parts in order.
    Multipart(Vec<MultipartField>),
}

/// One part of a multipart body.
#[derive(Debug, Clone, PartialEq)]
pub enum MultipartField {
    /// Plain text field.
    Text {
        /// Field name.
        name: String,
        /// Field value.
        value: String,
    },
    /// File part.
    File(FileUpload),
}

/// Issues one HTTP exchange.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send the request once. Transport failures are
    /// [`Error::RequestExecution`]; HTTP error statuses are not failures.
    async fn send(&self, request: PreparedRequest) -> Result<ResponseRecord>;
}

/// `reqwest`-backed transport.
///
/// Timeout, certificate verification, redirects and proxy are client-level
/// settings in reqwest, so each call gets a client built for its policy.
/// Proxy environment variables are ignored: only an explicit `proxy`
/// argument routes traffic through a proxy.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    connect_timeout: Option<Duration>,
}

impl ReqwestTransport {
    /// Create a transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the TCP/TLS connect phase separately from the overall timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    fn client(&self, policy: &ExecutionPolicy) -> Result<reqwest::Client> {
        let redirect_policy = if policy.follow_redirects {
            redirect::Policy::limited(MAX_REDIRECTS)
        } else {
            redirect::Policy::none()
        };

        let mut builder = reqwest::Client::builder()
            .timeout(policy.timeout)
            .danger_accept_invalid_certs(!policy.verify)
            .redirect(redirect_policy);

        if let Some(connect_timeout) = self.connect_timeout {
            builder = builder.connect_timeout(connect_timeout.min(policy.timeout));
        }

        builder = match &policy.proxy {
            Some(proxy) => builder.proxy(reqwest::Proxy::all(proxy)?),
            None => builder.no_proxy(),
        };

        Ok(builder.build()?)
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
        Method::Head => reqwest::Method::HEAD,
        Method::Options => reqwest::Method::OPTIONS,
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| Error::validation(format!("headers.{name}"), "invalid header name"))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| Error::validation(format!("headers.{name}"), "invalid header value"))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

fn multipart_form(fields: Vec<MultipartField>) -> Result<multipart::Form> {
    let mut form = multipart::Form::new();
    for field in fields {
        form = match field {
            MultipartField::Text { name, value } => form.text(name, value),
            MultipartField::File(file) => {
                let part = multipart::Part::bytes(file.content)
                    .file_name(file.filename)
                    .mime_str(&file.content_type)
                    .map_err(|_| {
                        Error::validation(
                            format!("files.{}.content_type", file.name),
                            format!("`{}` is not a valid MIME type", file.content_type),
                        )
                    })?;
                form.part(file.name, part)
            }
        };
    }
    Ok(form)
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: PreparedRequest) -> Result<ResponseRecord> {
        let client = self.client(&request.policy)?;

        let mut builder = client
            .request(to_reqwest_method(request.method), &request.url)
            .headers(header_map(&request.headers)?);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        builder = match request.body {
            PreparedBody::Empty => builder,
            PreparedBody::Json(value) => builder.json(&value),
            PreparedBody::Form(fields) => builder.form(&fields),
            PreparedBody::Raw(text) => builder.body(text),
            PreparedBody::Multipart(fields) => builder.multipart(multipart_form(fields)?),
        };

        let response = builder.send().await?;

        let status = response.status();
        let url = response.url().to_string();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().await?;

        Ok(ResponseRecord {
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_string),
            url,
            headers,
            body,
        })
    }
}
