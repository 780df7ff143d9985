//! # Data Retrieval Module
//!
//! Generic HTTP retrieval shared by every market client. The market modules
//! only deal with parsing; request building, header injection and the
//! optional retry middleware live here.
//!
//! ## Contained Modules:
//!
//! - **`ky_http`**: a text-oriented `ApiClient` built on `reqwest` and
//!   `reqwest-middleware`. Upstream bodies are JavaScript fragments or JSONP,
//!   so the client hands back the decoded text and leaves the parsing to the
//!   caller.

/// Generic HTTP API client with optional retry middleware.
pub mod ky_http;
