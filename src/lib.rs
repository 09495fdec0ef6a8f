//! # primp-mcp
//!
//! MCP (Model Context Protocol) server for HTTP requests with browser
//! impersonation.
//!
//! The server speaks JSON-RPC 2.0 over stdio and exposes two tools to AI
//! assistants and other MCP clients.
//!
//! ## Available Tools
//!
//! - `primp_request`: Issue an HTTP request that presents itself as a chosen
//!   browser and OS, returning the response as text, markdown, plain text,
//!   JSON or a status/header summary.
//! - `primp_upload`: Upload one or more base64-encoded files as
//!   `multipart/form-data`, alongside plain form fields.
//!
//! ## Pipeline
//!
//! Every tool call runs the same stages:
//!
//! 1. [`args::ArgumentResolver`] validates raw arguments into a descriptor.
//! 2. [`impersonate::select`] picks the browser/OS profile.
//! 3. [`executor::RequestExecutor`] assembles headers and body and sends the
//!    request through an [`HttpTransport`].
//! 4. [`format`] renders the response.
//!
//! Any failure along the way becomes a single `Error: ...` text block with
//! `isError: true`; the server itself keeps running.
//!
//! ## Usage with VS Code
//!
//! Add to your `.vscode/mcp.json`:
//!
//! ```json
//! {
//!   "servers": {
//!     "primp": {
//!       "command": "primp-mcp",
//!       "args": ["--stdio"],
//!       "env": {}
//!     }
//!   }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod args;
pub mod descriptor;
pub mod error;
pub mod executor;
pub mod format;
pub mod impersonate;
pub mod protocol;
pub mod response;
pub mod server;
pub mod tools;
pub mod transport;

pub use descriptor::{Method, RequestDescriptor, ReturnFormat, UploadRequestDescriptor};
pub use error::{Error, Result};
pub use impersonate::{Browser, ImpersonateOs, Impersonation};
pub use protocol::{JsonRpcRequest, JsonRpcResponse, McpMessage, ToolCallResult};
pub use response::ResponseRecord;
pub use server::McpServer;
pub use tools::{Tool, ToolRegistry};
pub use transport::{HttpTransport, ReqwestTransport};
