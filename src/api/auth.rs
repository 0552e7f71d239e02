//! Authentication schemes a call can carry.
//!
//! Exactly one scheme is active per call. Basic, Bearer and API key schemes turn
//! into request headers. OAuth2 instead replaces the request body with a
//! URL-encoded token form, the call itself being the token request; an
//! `access_token` among its parameters is still sent as a Bearer header.

use std::{collections::BTreeMap, fmt};

use reqwest::{
    RequestBuilder,
    header::{HeaderName, HeaderValue},
};

use crate::{Error, Result};

pub static FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub static TOKEN_URL: &str = "token_url";
pub static ACCESS_TOKEN: &str = "access_token";

#[derive(Clone, Default, PartialEq, Eq)]
pub enum Auth {
    #[default]
    None,
    Basic {
        username: String,
        password: String,
    },
    Bearer {
        token: String,
    },
    ApiKey {
        header_name: String,
        key: String,
    },
    OAuth2 {
        params: BTreeMap<String, String>,
    },
}

impl Auth {
    pub fn kind(&self) -> &'static str {
        match self {
            Auth::None => "none",
            Auth::Basic { .. } => "basic",
            Auth::Bearer { .. } => "bearer",
            Auth::ApiKey { .. } => "api_key",
            Auth::OAuth2 { .. } => "oauth2",
        }
    }

    /// Adds the headers this scheme contributes to `rq`.
    pub(crate) fn apply(&self, rq: RequestBuilder) -> Result<RequestBuilder> {
        let rq = match self {
            Auth::None => rq,
            Auth::Basic { username, password } => rq.basic_auth(username, Some(password)),
            Auth::Bearer { token } => rq.bearer_auth(token),
            Auth::ApiKey { header_name, key } => {
                let invalid = || Error::InvalidHeader {
                    name: header_name.clone(),
                };
                let name = HeaderName::from_bytes(header_name.as_bytes()).map_err(|_| invalid())?;
                let mut value = HeaderValue::from_str(key).map_err(|_| invalid())?;
                value.set_sensitive(true);
                rq.header(name, value)
            }
            Auth::OAuth2 { params } => match params.get(ACCESS_TOKEN) {
                Some(token) => rq.bearer_auth(token),
                None => rq,
            },
        };
        Ok(rq)
    }

    /// Form body replacing the request body when OAuth2 is active.
    pub(crate) fn form(&self) -> Option<String> {
        match self {
            Auth::OAuth2 { params } => Some(oauth2_form(params, None)),
            _ => None,
        }
    }
}

/// Encodes the OAuth2 token form.
///
/// Fields go in a fixed order: `grant_type`, `client_id`, `client_secret`,
/// `username` and `password` (only as a pair), `scope`. Missing fields are
/// skipped, except `grant_type` which falls back to `default_grant` when given.
/// Any other parameter, `token_url` included, is never sent.
pub(crate) fn oauth2_form(params: &BTreeMap<String, String>, default_grant: Option<&str>) -> String {
    let mut form = url::form_urlencoded::Serializer::new(String::new());

    if let Some(grant) = params.get("grant_type").map(String::as_str).or(default_grant) {
        form.append_pair("grant_type", grant);
    }
    for field in ["client_id", "client_secret"] {
        if let Some(value) = params.get(field) {
            form.append_pair(field, value);
        }
    }
    if let (Some(username), Some(password)) = (params.get("username"), params.get("password")) {
        form.append_pair("username", username);
        form.append_pair("password", password);
    }
    if let Some(scope) = params.get("scope") {
        form.append_pair("scope", scope);
    }

    form.finish()
}

// Credentials never reach logs.
impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::None => f.write_str("None"),
            Auth::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Auth::Bearer { .. } => f.debug_struct("Bearer").field("token", &"***").finish(),
            Auth::ApiKey { header_name, .. } => f
                .debug_struct("ApiKey")
                .field("header_name", header_name)
                .field("key", &"***")
                .finish(),
            Auth::OAuth2 { params } => f
                .debug_struct("OAuth2")
                .field("params", &params.keys().collect::<Vec<_>>())
                .finish(),
        }
    }
}
