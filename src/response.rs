//! Executed-response record and its body representations.

use scraper::Html;

use crate::error::{Error, Result};

/// Elements whose text never reaches a reader.
const INVISIBLE_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Result of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseRecord {
    /// Status code.
    pub status: u16,
    /// Canonical reason phrase, when the code has one.
    pub reason: Option<String>,
    /// Final URL after redirects.
    pub url: String,
    /// Response headers in wire order. Repeated names appear repeatedly.
    pub headers: Vec<(String, String)>,
    /// Body decoded as text (charset from `Content-Type`, lossy UTF-8 otherwise).
    pub body: String,
}

impl ResponseRecord {
    /// First header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// `Content-Type` header.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// `200 OK`, or just the code when there is no reason phrase.
    pub fn status_line(&self) -> String {
        match &self.reason {
            Some(reason) => format!("{} {}", self.status, reason),
            None => self.status.to_string(),
        }
    }

    /// Whether the body should be treated as HTML.
    ///
    /// Trusts `Content-Type` when present; otherwise sniffs the first bytes.
    pub fn is_html(&self) -> bool {
        if let Some(content_type) = self.content_type() {
            let content_type = content_type.to_ascii_lowercase();
            return content_type.contains("text/html") || content_type.contains("xhtml");
        }
        let head: String = self
            .body
            .trim_start()
            .chars()
            .take(15)
            .collect::<String>()
            .to_ascii_lowercase();
        head.starts_with("<!doctype html") || head.starts_with("<html")
    }

    /// Raw body text.
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Body parsed as JSON.
    pub fn json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.body)
    }

    /// Body rendered as markdown. Non-HTML bodies pass through.
    pub fn markdown(&self) -> Result<String> {
        if !self.is_html() {
            return Ok(self.body.clone());
        }

        let options = htmd::options::Options {
            heading_style: htmd::options::HeadingStyle::Atx,
            code_block_style: htmd::options::CodeBlockStyle::Fenced,
            link_style: htmd::options::LinkStyle::Inlined,
            ..Default::default()
        };
        let converter = htmd::HtmlToMarkdown::builder()
            .options(options)
            .skip_tags(INVISIBLE_ELEMENTS.to_vec())
            .build();
        converter.convert(&self.body).map_err(|e| Error::Format {
            format: "markdown",
            reason: e.to_string(),
        })
    }

    /// Body stripped of markup. Non-HTML bodies pass through.
    ///
    /// Every visible text run becomes one line with its whitespace collapsed.
    pub fn plain_text(&self) -> String {
        if !self.is_html() {
            return self.body.clone();
        }

        let document = Html::parse_document(&self.body);
        let mut lines = Vec::new();
        for node in document.root_element().descendants() {
            let Some(text) = node.value().as_text() else {
                continue;
            };
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|element| INVISIBLE_ELEMENTS.contains(&element.name()))
            });
            if hidden {
                continue;
            }
            let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if !collapsed.is_empty() {
                lines.push(collapsed);
            }
        }
        lines.join("\n")
    }
}
