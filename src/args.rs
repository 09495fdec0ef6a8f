//! Tool argument resolution.
//!
//! Converts the loosely-typed JSON argument object of a tool call into a
//! [`RequestDescriptor`] or [`UploadRequestDescriptor`]. This is the only
//! place arguments are validated; everything downstream trusts the
//! descriptor.
//!
//! Scalar fields fail fast in a fixed order (url, method, enumerations,
//! nested structures) so error messages are deterministic. The upload file
//! list is the exception: every bad part is collected and reported at once.
//!
//! JSON `null` is treated the same as an absent field. Values are never
//! coerced across types: `"30"` is not a timeout.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::header::{HeaderName, HeaderValue};
use serde_json::{Map, Value};

use crate::descriptor::{
    enum_list, BasicAuth, ExecutionPolicy, FileUpload, FormData, HeaderSpec, ImpersonationSpec,
    Method, RequestDescriptor, ReturnFormat, UploadRequestDescriptor, DEFAULT_CONTENT_TYPE,
    DEFAULT_IMPERSONATE, DEFAULT_IMPERSONATE_OS, DEFAULT_TIMEOUT_SECS,
};
use crate::error::{Error, FieldError, Result};

/// Accepted names for the JSON body, in lookup order.
const JSON_BODY_KEYS: &[&str] = &["json_body", "json", "json_data"];

/// Positive timeouts below this are raised to it.
const MIN_TIMEOUT: Duration = Duration::from_millis(1);

/// Validates a tool call's argument object.
pub struct ArgumentResolver<'a> {
    args: Option<&'a Map<String, Value>>,
}

impl<'a> ArgumentResolver<'a> {
    /// Wrap a raw argument value. `null` is an empty argument set.
    pub fn new(arguments: &'a Value) -> Result<Self> {
        match arguments {
            Value::Object(map) => Ok(Self { args: Some(map) }),
            Value::Null => Ok(Self { args: None }),
            _ => Err(Error::validation("arguments", "expected an object")),
        }
    }

    /// Resolve `primp_request` arguments.
    pub fn request(&self) -> Result<RequestDescriptor> {
        let url = self.url()?;
        let method = self.method(Method::ALL, Method::Get)?;
        let impersonate = self.impersonation()?;
        let return_format = self.return_format()?;
        let headers = self.header_spec()?;
        let params = self.string_map("params")?;
        let data = self.form_data()?;
        let json_body = self.json_body();
        let policy = self.policy()?;

        Ok(RequestDescriptor {
            url,
            method,
            headers,
            params,
            data,
            json_body,
            impersonate,
            policy,
            return_format,
        })
    }

    /// Resolve `primp_upload` arguments.
    pub fn upload(&self) -> Result<UploadRequestDescriptor> {
        let url = self.url()?;
        let method = self.method(Method::UPLOAD, Method::Post)?;
        let impersonate = self.impersonation()?;
        let headers = self.header_spec()?;
        let files = self.files()?;
        let fields = self.string_map("data")?;
        let policy = self.policy()?;

        Ok(UploadRequestDescriptor {
            url,
            method,
            files,
            fields,
            headers,
            impersonate,
            policy,
        })
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.args
            .and_then(|map| map.get(key))
            .filter(|value| !value.is_null())
    }

    fn string(&self, key: &str) -> Result<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(type_error(key, "a string", other)),
        }
    }

    fn string_or(&self, key: &str, default: &str) -> Result<String> {
        Ok(self.string(key)?.unwrap_or_else(|| default.to_string()))
    }

    fn bool_or(&self, key: &str, default: bool) -> Result<bool> {
        match self.get(key) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => Err(type_error(key, "a boolean", other)),
        }
    }

    fn url(&self) -> Result<String> {
        let url = self
            .string("url")?
            .ok_or_else(|| Error::validation("url", "missing required field"))?;
        check_url("url", &url, &["http", "https"])?;
        Ok(url)
    }

    fn method(&self, allowed: &[Method], default: Method) -> Result<Method> {
        let Some(raw) = self.string("method")? else {
            return Ok(default);
        };
        raw.parse::<Method>()
            .ok()
            .filter(|method| allowed.contains(method))
            .ok_or_else(|| {
                Error::validation(
                    "method",
                    format!(
                        "`{raw}` is not one of {}",
                        enum_list(allowed, Method::as_str).join(", ")
                    ),
                )
            })
    }

    /// Identifiers are type-checked here but resolved by
    /// [`crate::impersonate::select`].
    fn impersonation(&self) -> Result<ImpersonationSpec> {
        Ok(ImpersonationSpec {
            browser: self.string_or("impersonate", DEFAULT_IMPERSONATE)?,
            os: self.string_or("impersonate_os", DEFAULT_IMPERSONATE_OS)?,
        })
    }

    fn return_format(&self) -> Result<ReturnFormat> {
        let Some(raw) = self.string("return_format")? else {
            return Ok(ReturnFormat::default());
        };
        raw.parse::<ReturnFormat>().map_err(|()| {
            Error::validation(
                "return_format",
                format!(
                    "`{raw}` is not one of {}",
                    enum_list(ReturnFormat::ALL, ReturnFormat::as_str).join(", ")
                ),
            )
        })
    }

    fn header_spec(&self) -> Result<HeaderSpec> {
        let headers = self.string_map("headers")?;
        for (name, value) in &headers {
            if HeaderName::from_bytes(name.as_bytes()).is_err() {
                return Err(Error::validation(
                    format!("headers.{name}"),
                    "invalid header name",
                ));
            }
            if HeaderValue::from_str(value).is_err() {
                return Err(Error::validation(
                    format!("headers.{name}"),
                    "invalid header value",
                ));
            }
        }

        let auth = match self.get("auth") {
            None => None,
            Some(Value::Object(map)) => {
                let field = |key: &str| match map.get(key) {
                    Some(Value::String(s)) => Ok(s.clone()),
                    None | Some(Value::Null) => Err(Error::validation(
                        format!("auth.{key}"),
                        "missing required field",
                    )),
                    Some(other) => Err(type_error(&format!("auth.{key}"), "a string", other)),
                };
                Some(BasicAuth {
                    username: field("username")?,
                    password: field("password")?,
                })
            }
            Some(other) => return Err(type_error("auth", "an object", other)),
        };

        let bearer_token = self.string("bearer_token")?.filter(|t| !t.is_empty());
        if let Some(token) = &bearer_token {
            if HeaderValue::from_str(&format!("Bearer {token}")).is_err() {
                return Err(Error::validation(
                    "bearer_token",
                    "not representable as a header value",
                ));
            }
        }

        Ok(HeaderSpec {
            headers,
            auth,
            bearer_token,
        })
    }

    fn string_map(&self, key: &str) -> Result<Vec<(String, String)>> {
        match self.get(key) {
            None => Ok(Vec::new()),
            Some(Value::Object(map)) => map
                .iter()
                .map(|(k, v)| match v {
                    Value::String(s) => Ok((k.clone(), s.clone())),
                    other => Err(type_error(&format!("{key}.{k}"), "a string", other)),
                })
                .collect(),
            Some(other) => Err(type_error(key, "an object of strings", other)),
        }
    }

    fn form_data(&self) -> Result<Option<FormData>> {
        match self.get("data") {
            None => Ok(None),
            Some(Value::String(raw)) => Ok(Some(FormData::Raw(raw.clone()))),
            Some(Value::Object(_)) => Ok(Some(FormData::Fields(self.string_map("data")?))),
            Some(other) => Err(type_error("data", "a string or an object of strings", other)),
        }
    }

    fn json_body(&self) -> Option<serde_json::Value> {
        JSON_BODY_KEYS
            .iter()
            .find_map(|key| self.get(key))
            .cloned()
    }

    fn policy(&self) -> Result<ExecutionPolicy> {
        let proxy = self.string("proxy")?;
        if let Some(proxy) = &proxy {
            check_url("proxy", proxy, &["http", "https", "socks5", "socks5h"])?;
        }

        let timeout = match self.get("timeout") {
            None => Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS),
            Some(Value::Number(n)) => n
                .as_f64()
                .filter(|secs| secs.is_finite() && *secs > 0.0)
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
                .map(|timeout| timeout.max(MIN_TIMEOUT))
                .ok_or_else(|| {
                    Error::validation("timeout", "must be a positive number of seconds")
                })?,
            Some(other) => return Err(type_error("timeout", "a number", other)),
        };

        Ok(ExecutionPolicy {
            timeout,
            verify: self.bool_or("verify", true)?,
            follow_redirects: self.bool_or("follow_redirects", true)?,
            proxy,
        })
    }

    fn files(&self) -> Result<Vec<FileUpload>> {
        let entries = match self.get("files") {
            None => return Err(Error::validation("files", "missing required field")),
            Some(Value::Array(entries)) => entries,
            Some(other) => return Err(type_error("files", "an array", other)),
        };
        if entries.is_empty() {
            return Err(Error::validation("files", "must contain at least one file"));
        }

        let mut files = Vec::with_capacity(entries.len());
        let mut errors = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            match file_upload(index, entry) {
                Ok(file) => files.push(file),
                Err(mut part_errors) => errors.append(&mut part_errors),
            }
        }

        if errors.is_empty() {
            Ok(files)
        } else {
            Err(Error::Validation(errors))
        }
    }
}

fn file_upload(index: usize, entry: &Value) -> std::result::Result<FileUpload, Vec<FieldError>> {
    let Value::Object(map) = entry else {
        return Err(vec![FieldError::new(
            format!("files[{index}]"),
            format!("expected an object, got {}", json_type(entry)),
        )]);
    };

    let mut errors = Vec::new();
    let mut field = |key: &str, required: bool| -> Option<String> {
        match map.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            None | Some(Value::Null) => {
                if required {
                    errors.push(FieldError::new(
                        format!("files[{index}].{key}"),
                        "missing required field",
                    ));
                }
                None
            }
            Some(other) => {
                errors.push(FieldError::new(
                    format!("files[{index}].{key}"),
                    format!("expected a string, got {}", json_type(other)),
                ));
                None
            }
        }
    };

    let name = field("name", true);
    let filename = field("filename", true);
    let content = field("content", true);
    let content_type = field("content_type", false);

    if let Some(raw) = &content_type {
        if let Err(e) = raw.parse::<mime::Mime>() {
            errors.push(FieldError::new(
                format!("files[{index}].content_type"),
                format!("`{raw}` is not a valid MIME type: {e}"),
            ));
        }
    }

    let decoded = content.and_then(|encoded| match BASE64.decode(encoded.trim()) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            let part = name.as_deref().unwrap_or("?");
            errors.push(FieldError::new(
                format!("files[{index}].content"),
                format!("invalid base64 in part `{part}`: {e}"),
            ));
            None
        }
    });

    match (name, filename, decoded) {
        (Some(name), Some(filename), Some(content)) if errors.is_empty() => Ok(FileUpload {
            name,
            filename,
            content,
            content_type: content_type.unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
        }),
        _ => Err(errors),
    }
}

fn check_url(field: &str, raw: &str, schemes: &[&str]) -> Result<()> {
    if raw.trim().is_empty() {
        return Err(Error::validation(field, "must not be empty"));
    }
    let parsed = url::Url::parse(raw)
        .map_err(|e| Error::validation(field, format!("invalid URL: {e}")))?;
    if !schemes.contains(&parsed.scheme()) {
        return Err(Error::validation(
            field,
            format!("unsupported scheme `{}`", parsed.scheme()),
        ));
    }
    Ok(())
}

fn type_error(field: &str, expected: &str, got: &Value) -> Error {
    Error::validation(field, format!("expected {expected}, got {}", json_type(got)))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(args: Value) -> Result<RequestDescriptor> {
        ArgumentResolver::new(&args)?.request()
    }

    fn upload(args: Value) -> Result<UploadRequestDescriptor> {
        ArgumentResolver::new(&args)?.upload()
    }

    fn fields(err: Error) -> Vec<String> {
        match err {
            Error::Validation(fields) => fields.into_iter().map(|f| f.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn applies_every_default() {
        let d = request(json!({"url": "https://example.com"})).unwrap();
        assert_eq!(d.method, Method::Get);
        assert_eq!(d.return_format, ReturnFormat::Text);
        assert_eq!(d.impersonate, ImpersonationSpec::default());
        assert_eq!(d.policy, ExecutionPolicy::default());
        assert_eq!(d.policy.timeout, Duration::from_secs(30));
        assert!(d.headers.headers.is_empty());
        assert!(d.headers.auth.is_none());
        assert!(d.headers.bearer_token.is_none());
        assert!(d.params.is_empty());
        assert!(d.data.is_none());
        assert!(d.json_body.is_none());
    }

    #[test]
    fn keeps_explicit_values() {
        let d = request(json!({
            "url": "https://example.com/api",
            "method": "patch",
            "headers": {"X-Trace": "abc"},
            "params": {"q": "rust"},
            "json_body": {"a": [1, 2]},
            "auth": {"username": "u", "password": "p"},
            "bearer_token": "tok",
            "impersonate": "firefox_133",
            "impersonate_os": "linux",
            "proxy": "socks5://127.0.0.1:9050",
            "timeout": 2.5,
            "verify": false,
            "follow_redirects": false,
            "return_format": "rich_text"
        }))
        .unwrap();

        assert_eq!(d.method, Method::Patch);
        assert_eq!(d.headers.headers, vec![("X-Trace".into(), "abc".into())]);
        assert_eq!(d.params, vec![("q".into(), "rust".into())]);
        assert_eq!(d.json_body, Some(json!({"a": [1, 2]})));
        assert_eq!(d.headers.auth.as_ref().unwrap().username, "u");
        assert_eq!(d.headers.bearer_token.as_deref(), Some("tok"));
        assert_eq!(d.impersonate.browser, "firefox_133");
        assert_eq!(d.impersonate.os, "linux");
        assert_eq!(d.policy.proxy.as_deref(), Some("socks5://127.0.0.1:9050"));
        assert_eq!(d.policy.timeout, Duration::from_millis(2500));
        assert!(!d.policy.verify);
        assert!(!d.policy.follow_redirects);
        assert_eq!(d.return_format, ReturnFormat::RichText);
    }

    #[test]
    fn null_means_absent() {
        let d = request(json!({"url": "https://example.com", "timeout": null, "headers": null}))
            .unwrap();
        assert_eq!(d.policy.timeout, Duration::from_secs(30));
        assert!(d.headers.headers.is_empty());
    }

    #[test]
    fn missing_url_is_reported_first() {
        let err = request(json!({"method": "BREW", "return_format": "xml"})).unwrap_err();
        assert_eq!(fields(err), vec!["url"]);
    }

    #[test]
    fn missing_arguments_object_reports_url() {
        let err = request(Value::Null).unwrap_err();
        assert_eq!(fields(err), vec!["url"]);
        let err = request(json!("https://example.com")).unwrap_err();
        assert_eq!(fields(err), vec!["arguments"]);
    }

    #[test]
    fn rejects_bad_urls() {
        for url in ["", "   ", "not a url", "ftp://example.com/file"] {
            let err = request(json!({ "url": url })).unwrap_err();
            assert_eq!(fields(err), vec!["url"], "url {url:?}");
        }
    }

    #[test]
    fn method_is_checked_before_return_format() {
        let err = request(json!({
            "url": "https://example.com",
            "method": "BREW",
            "return_format": "xml"
        }))
        .unwrap_err();
        assert_eq!(fields(err), vec!["method"]);
    }

    #[test]
    fn rejects_values_outside_enumerations() {
        let err = request(json!({"url": "https://example.com", "return_format": "xml"}))
            .unwrap_err();
        assert!(err.to_string().contains("plain_text"));
    }

    #[test]
    fn does_not_coerce_types() {
        let err = request(json!({"url": "https://example.com", "timeout": "30"})).unwrap_err();
        assert_eq!(fields(err), vec!["timeout"]);

        let err = request(json!({"url": "https://example.com", "verify": "false"})).unwrap_err();
        assert_eq!(fields(err), vec!["verify"]);

        let err = request(json!({"url": "https://example.com", "params": {"page": 2}}))
            .unwrap_err();
        assert_eq!(fields(err), vec!["params.page"]);
    }

    #[test]
    fn rejects_non_positive_timeout() {
        for timeout in [json!(0), json!(-1.5)] {
            let err = request(json!({"url": "https://example.com", "timeout": timeout}))
                .unwrap_err();
            assert_eq!(fields(err), vec!["timeout"]);
        }
    }

    #[test]
    fn data_accepts_text_or_fields() {
        let d = request(json!({"url": "https://example.com", "data": "a=1&b=2"})).unwrap();
        assert_eq!(d.data, Some(FormData::Raw("a=1&b=2".into())));

        let d = request(json!({"url": "https://example.com", "data": {"a": "1"}})).unwrap();
        assert_eq!(d.data, Some(FormData::Fields(vec![("a".into(), "1".into())])));

        let err = request(json!({"url": "https://example.com", "data": [1]})).unwrap_err();
        assert_eq!(fields(err), vec!["data"]);
    }

    #[test]
    fn json_body_aliases() {
        let d = request(json!({"url": "https://example.com", "json": {"k": 1}})).unwrap();
        assert_eq!(d.json_body, Some(json!({"k": 1})));

        let d = request(json!({
            "url": "https://example.com",
            "json_data": [1],
            "json_body": {"k": 2}
        }))
        .unwrap();
        assert_eq!(d.json_body, Some(json!({"k": 2})));
    }

    #[test]
    fn impersonation_identifiers_are_not_resolved_here() {
        let d = request(json!({"url": "https://example.com", "impersonate": "netscape_1"}))
            .unwrap();
        assert_eq!(d.impersonate.browser, "netscape_1");

        let err = request(json!({"url": "https://example.com", "impersonate": 131})).unwrap_err();
        assert_eq!(fields(err), vec!["impersonate"]);
    }

    #[test]
    fn auth_requires_both_credentials() {
        let err = request(json!({"url": "https://example.com", "auth": {"username": "u"}}))
            .unwrap_err();
        assert_eq!(fields(err), vec!["auth.password"]);
    }

    #[test]
    fn rejects_invalid_header_names() {
        let err = request(json!({"url": "https://example.com", "headers": {"bad header": "x"}}))
            .unwrap_err();
        assert_eq!(fields(err), vec!["headers.bad header"]);
    }

    #[test]
    fn rejects_bad_proxy() {
        let err = request(json!({"url": "https://example.com", "proxy": "gopher://x"}))
            .unwrap_err();
        assert_eq!(fields(err), vec!["proxy"]);
    }

    #[test]
    fn upload_decodes_files() {
        let d = upload(json!({
            "url": "https://httpbin.org/post",
            "files": [{
                "name": "file",
                "filename": "example.txt",
                "content": "SGVsbG8gV29ybGQ=",
                "content_type": "text/plain"
            }],
            "data": {"description": "Test upload"}
        }))
        .unwrap();

        assert_eq!(d.method, Method::Post);
        assert_eq!(d.files.len(), 1);
        assert_eq!(d.files[0].content, b"Hello World");
        assert_eq!(d.files[0].content_type, "text/plain");
        assert_eq!(d.fields, vec![("description".into(), "Test upload".into())]);
    }

    #[test]
    fn upload_defaults_content_type() {
        let d = upload(json!({
            "url": "https://example.com/upload",
            "files": [{"name": "f", "filename": "a.bin", "content": "AAE="}]
        }))
        .unwrap();
        assert_eq!(d.files[0].content_type, DEFAULT_CONTENT_TYPE);
        assert_eq!(d.files[0].content, vec![0u8, 1]);
    }

    #[test]
    fn upload_reads_os_from_its_own_key() {
        let d = upload(json!({
            "url": "https://example.com/upload",
            "impersonate": "safari_18_0",
            "impersonate_os": "macos",
            "files": [{"name": "f", "filename": "a", "content": ""}]
        }))
        .unwrap();
        assert_eq!(d.impersonate.browser, "safari_18_0");
        assert_eq!(d.impersonate.os, "macos");
    }

    #[test]
    fn upload_requires_files() {
        let err = upload(json!({"url": "https://example.com"})).unwrap_err();
        assert_eq!(fields(err), vec!["files"]);

        let err = upload(json!({"url": "https://example.com", "files": []})).unwrap_err();
        assert_eq!(fields(err), vec!["files"]);
    }

    #[test]
    fn upload_restricts_methods() {
        let err = upload(json!({
            "url": "https://example.com",
            "method": "GET",
            "files": [{"name": "f", "filename": "a", "content": ""}]
        }))
        .unwrap_err();
        assert_eq!(fields(err), vec!["method"]);
    }

    #[test]
    fn upload_reports_every_bad_part() {
        let err = upload(json!({
            "url": "https://example.com",
            "files": [
                {"name": "ok", "filename": "a", "content": "SGk="},
                {"name": "broken", "filename": "b", "content": "%%%not base64%%%"},
                {"filename": "c", "content": "SGk="},
                "nope"
            ]
        }))
        .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("part `broken`"), "{message}");
        assert_eq!(
            fields(err),
            vec!["files[1].content", "files[2].name", "files[3]"]
        );
    }

    #[test]
    fn upload_rejects_bad_mime_alongside_other_errors() {
        let err = upload(json!({
            "url": "https://example.com",
            "files": [
                {"name": "broken", "filename": "a", "content": "%%%"},
                {"name": "typed", "filename": "b", "content": "SGk=", "content_type": "not a mime"}
            ]
        }))
        .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("`not a mime` is not a valid MIME type"), "{message}");
        assert_eq!(
            fields(err),
            vec!["files[0].content", "files[1].content_type"]
        );
    }

    #[test]
    fn tiny_timeout_is_raised_to_minimum() {
        let d = request(json!({"url": "https://example.com", "timeout": 1e-12})).unwrap();
        assert_eq!(d.policy.timeout, MIN_TIMEOUT);
    }
}
