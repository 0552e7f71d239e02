//! # apicall
//!
//! apicall is a small fluent wrapper for issuing one-off HTTP requests.
//! It accumulates a request configuration through a chainable API and then
//! hands the finished request to `reqwest`, which owns connections, TLS,
//! redirects and wire framing.
//!
//! It provides a fluent, chainable API to configure:
//! - HTTP methods (GET, POST, PUT, DELETE, PATCH, HEAD, OPTIONS)
//! - Headers and query parameters
//! - A text body for POST, PUT and PATCH
//! - One authentication scheme: Basic, Bearer, API key or OAuth2 form
//!
//! ```rust,no_run
//! use apicall::prelude::*;
//!
//! async fn run() -> apicall::Result<()> {
//!     let rs = ApiCall::get("https://jsonplaceholder.typicode.com/posts")
//!         .header("Accept", "application/json")
//!         .query_param("userId", "1")
//!         .execute()
//!         .await?;
//!     assert!(rs.is_success());
//!     Ok(())
//! }
//! ```
//!
//! ## Notes
//! - Every execution prints a request/response summary to stdout, errors go to stderr.
//! - A body set on a method without a body (GET, DELETE, ...) is dropped silently.
//! - `oauth2` turns the request itself into a token request: its body is replaced
//!   by the URL-encoded OAuth2 form. The token is not forwarded to later calls.

pub mod api;
pub mod error;
pub mod prelude;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;
