use std::{collections::BTreeMap, fmt};

use reqwest::StatusCode;
use serde::Serialize;

use super::method::Method;
use crate::Result;

/// Normalized outcome of one executed call.
///
/// Every status code, 4xx and 5xx included, ends up here; `is_success` is
/// only advisory.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status_code: u16,
    headers: BTreeMap<String, String>,
    body: Option<String>,
}

impl Response {
    pub fn new(status_code: u16, headers: BTreeMap<String, String>, body: Option<String>) -> Self {
        Response {
            status_code,
            headers,
            body,
        }
    }

    /// Reads the whole payload of `rs` as text.
    ///
    /// `body` stays `None` when the transport carries no entity at all: HEAD
    /// requests and 1xx, 204 or 304 statuses.
    pub(crate) async fn read(rs: reqwest::Response, method: Method) -> Result<Self> {
        let status = rs.status();
        let headers: BTreeMap<String, String> = rs
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_owned(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let body = if method == Method::Head || !has_entity(status) {
            None
        } else {
            Some(rs.text().await?)
        };

        Ok(Response::new(status.as_u16(), headers, body))
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Looks a header up ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn into_body(self) -> Option<String> {
        self.body
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

fn has_entity(status: StatusCode) -> bool {
    !(status.is_informational()
        || status == StatusCode::NO_CONTENT
        || status == StatusCode::NOT_MODIFIED)
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Status Code: {}", self.status_code)?;
        writeln!(f)?;
        writeln!(f, "Headers:")?;
        for (name, value) in &self.headers {
            writeln!(f, "{name}: {value}")?;
        }
        writeln!(f)?;
        writeln!(f, "Body:")?;
        f.write_str(self.body.as_deref().unwrap_or("(none)"))
    }
}
