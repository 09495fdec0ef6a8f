//! Strongly-typed request descriptors.
//!
//! Built once per tool call by [`crate::args::ArgumentResolver`], consumed
//! once by [`crate::executor::RequestExecutor`], then dropped.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: f64 = 30.0;

/// Default impersonated browser.
pub const DEFAULT_IMPERSONATE: &str = "chrome_131";

/// Default impersonated OS.
pub const DEFAULT_IMPERSONATE_OS: &str = "windows";

/// Default MIME type of an uploaded part.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// HTTP method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    #[default]
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
    /// HEAD
    Head,
    /// OPTIONS
    Options,
}

impl Method {
    /// Every method accepted by `primp_request`.
    pub const ALL: &'static [Method] = &[
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Patch,
        Method::Delete,
        Method::Head,
        Method::Options,
    ];

    /// Methods accepted by `primp_upload`.
    pub const UPLOAD: &'static [Method] = &[Method::Post, Method::Put, Method::Patch];

    /// Uppercase method name.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }
}

impl FromStr for Method {
    type Err = ();

    /// Case-insensitive parse.
    fn from_str(s: &str) -> std::result::Result<Self, ()> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Representation requested for the response body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ReturnFormat {
    /// Verbatim body text.
    #[default]
    Text,
    /// Parsed and pretty-printed JSON.
    Json,
    /// HTML rendered as markdown.
    Markdown,
    /// HTML stripped to plain text.
    PlainText,
    /// Body with a status/header block.
    RichText,
}

impl ReturnFormat {
    /// Every format.
    pub const ALL: &'static [ReturnFormat] = &[
        ReturnFormat::Text,
        ReturnFormat::Json,
        ReturnFormat::Markdown,
        ReturnFormat::PlainText,
        ReturnFormat::RichText,
    ];

    /// Wire identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            ReturnFormat::Text => "text",
            ReturnFormat::Json => "json",
            ReturnFormat::Markdown => "markdown",
            ReturnFormat::PlainText => "plain_text",
            ReturnFormat::RichText => "rich_text",
        }
    }
}

impl FromStr for ReturnFormat {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, ()> {
        ReturnFormat::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or(())
    }
}

/// Basic authentication credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// `data` argument of `primp_request`.
#[derive(Debug, Clone, PartialEq)]
pub enum FormData {
    /// Key/value pairs, sent form-urlencoded.
    Fields(Vec<(String, String)>),
    /// Raw text, sent verbatim.
    Raw(String),
}

/// Headers and auth shared by both tools.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderSpec {
    /// Caller-supplied headers, in argument order.
    pub headers: Vec<(String, String)>,
    /// Basic credentials.
    pub auth: Option<BasicAuth>,
    /// Bearer token; always wins over any other `Authorization`.
    pub bearer_token: Option<String>,
}

/// Transport policy shared by both tools.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionPolicy {
    /// Whole-exchange timeout.
    pub timeout: Duration,
    /// Verify TLS certificates.
    pub verify: bool,
    /// Follow 3xx redirects.
    pub follow_redirects: bool,
    /// Proxy URL routing the entire exchange.
    pub proxy: Option<String>,
}

impl Default for ExecutionPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS),
            verify: true,
            follow_redirects: true,
            proxy: None,
        }
    }
}

/// Unresolved impersonation identifiers.
///
/// Kept as strings until [`crate::impersonate::select`] so that unknown
/// identifiers surface as an impersonation error rather than a validation one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImpersonationSpec {
    /// Browser identifier.
    pub browser: String,
    /// OS identifier.
    pub os: String,
}

impl Default for ImpersonationSpec {
    fn default() -> Self {
        Self {
            browser: DEFAULT_IMPERSONATE.into(),
            os: DEFAULT_IMPERSONATE_OS.into(),
        }
    }
}

/// Normalized `primp_request` call.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    /// Target URL.
    pub url: String,
    /// HTTP method.
    pub method: Method,
    /// Header and auth inputs.
    pub headers: HeaderSpec,
    /// Query parameters.
    pub params: Vec<(String, String)>,
    /// Form or raw body.
    pub data: Option<FormData>,
    /// JSON body; takes precedence over `data`.
    pub json_body: Option<serde_json::Value>,
    /// Impersonation identifiers.
    pub impersonate: ImpersonationSpec,
    /// Transport policy.
    pub policy: ExecutionPolicy,
    /// Response rendering.
    pub return_format: ReturnFormat,
}

/// One multipart file part, already base64-decoded.
#[derive(Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// Form field name.
    pub name: String,
    /// File name.
    pub filename: String,
    /// Decoded bytes.
    pub content: Vec<u8>,
    /// MIME type.
    pub content_type: String,
}

impl fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileUpload")
            .field("name", &self.name)
            .field("filename", &self.filename)
            .field("content", &format_args!("<{} bytes>", self.content.len()))
            .field("content_type", &self.content_type)
            .finish()
    }
}

/// Normalized `primp_upload` call.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequestDescriptor {
    /// Target URL.
    pub url: String,
    /// POST, PUT or PATCH.
    pub method: Method,
    /// File parts in argument order.
    pub files: Vec<FileUpload>,
    /// Non-file form fields.
    pub fields: Vec<(String, String)>,
    /// Header and auth inputs.
    pub headers: HeaderSpec,
    /// Impersonation identifiers.
    pub impersonate: ImpersonationSpec,
    /// Transport policy.
    pub policy: ExecutionPolicy,
}

/// Used by schema generation and error messages.
pub(crate) fn enum_list<T: Copy>(items: &[T], f: fn(T) -> &'static str) -> Vec<&'static str> {
    items.iter().copied().map(f).collect()
}
