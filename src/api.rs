//! Request builder and executor.
//!
//! A call starts from a per-verb factory on [`ApiCall`], is configured through
//! the [`Configure`] chain and ends with exactly one `execute`. Body-capable
//! verbs hand out a [`CallDetailsWithBody`], which is the only handle exposing
//! `body`.
//!
//! ```rust,no_run
//! use apicall::prelude::*;
//!
//! async fn run() -> apicall::Result<()> {
//!     let rs = ApiCall::post("https://jsonplaceholder.typicode.com/posts")
//!         .header("Content-Type", "application/json")
//!         .body(r#"{"title": "foo"}"#)
//!         .bearer_auth("token")
//!         .execute()
//!         .await?;
//!     println!("{}", rs.status_code());
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod method;
pub mod response;

use std::{collections::BTreeMap, future::Future};

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::{Error, Result};
use auth::{Auth, FORM_CONTENT_TYPE, TOKEN_URL};
use method::Method;
use response::Response;

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
static DEFAULT_CONTENT_TYPE: &str = "text/plain";
static DEFAULT_GRANT_TYPE: &str = "client_credentials";

trait Rq {
    fn apply_if<T, F>(self, val: Option<T>, fun: F) -> Self
    where
        Self: Sized,
        F: FnOnce(Self, T) -> Self,
    {
        if let Some(val) = val {
            fun(self, val)
        } else {
            self
        }
    }
}

impl Rq for reqwest::RequestBuilder {}

/// Accumulated configuration of a single request.
#[derive(Debug, Clone)]
pub struct ApiCall {
    base_url: String,
    method: Method,
    headers: BTreeMap<String, String>,
    query_params: BTreeMap<String, String>,
    body: Option<String>,
    auth: Auth,
}

impl ApiCall {
    pub fn new(base_url: impl Into<String>) -> Self {
        ApiCall {
            base_url: base_url.into(),
            method: Method::Get,
            headers: BTreeMap::new(),
            query_params: BTreeMap::new(),
            body: None,
            auth: Auth::None,
        }
    }

    pub fn request(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn get(url: impl Into<String>) -> CallDetails {
        ApiCall::new(url).request(Method::Get).details()
    }

    pub fn post(url: impl Into<String>) -> CallDetailsWithBody {
        ApiCall::new(url).request(Method::Post).details_with_body()
    }

    pub fn put(url: impl Into<String>) -> CallDetailsWithBody {
        ApiCall::new(url).request(Method::Put).details_with_body()
    }

    pub fn delete(url: impl Into<String>) -> CallDetails {
        ApiCall::new(url).request(Method::Delete).details()
    }

    pub fn patch(url: impl Into<String>) -> CallDetailsWithBody {
        ApiCall::new(url).request(Method::Patch).details_with_body()
    }

    pub fn head(url: impl Into<String>) -> CallDetails {
        ApiCall::new(url).request(Method::Head).details()
    }

    pub fn options(url: impl Into<String>) -> CallDetails {
        ApiCall::new(url).request(Method::Options).details()
    }

    /// Handle matching the configured method, for verbs only known at runtime.
    pub fn handle(self) -> Handle {
        if self.method.has_body() {
            Handle::WithBody(self.details_with_body())
        } else {
            Handle::Plain(self.details())
        }
    }

    fn details(self) -> CallDetails {
        CallDetails { call: self }
    }

    fn details_with_body(self) -> CallDetailsWithBody {
        CallDetailsWithBody { call: self }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .map(|(_, value)| value.as_str())
    }

    /// Content type and body actually sent, if any.
    fn payload(&self) -> Option<(String, String)> {
        let form = self.auth.form();
        if !self.method.has_body() {
            if self.body.is_some() || form.is_some() {
                tracing::debug!(method = %self.method, "body dropped, method carries no body");
            }
            return None;
        }
        if let Some(form) = form {
            return Some((FORM_CONTENT_TYPE.into(), form));
        }
        let body = self.body.clone()?;
        let content_type = self.content_type().unwrap_or(DEFAULT_CONTENT_TYPE);
        Some((content_type.into(), body))
    }

    /// Translates the configuration into a transport request without sending it.
    pub fn build_request(&self, client: &reqwest::Client) -> Result<reqwest::Request> {
        let url = parse_url(&self.base_url)?;

        // Names differing only in case all go out.
        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            headers.append(header_name(name)?, header_value(name, value)?);
        }

        let payload = self.payload();
        if let Some((content_type, _)) = &payload {
            headers.insert(CONTENT_TYPE, header_value("content-type", content_type)?);
        }

        let rq = client
            .request(self.method.into(), url)
            .query(&self.query_params)
            .headers(headers);
        let rq = self
            .auth
            .apply(rq)?
            .apply_if(payload, |rq, (_, body)| rq.body(body))
            .build()?;

        tracing::debug!(
            url = %rq.url(),
            headers = rq.headers().len(),
            body = rq.body().is_some(),
            "request assembled"
        );
        Ok(rq)
    }

    /// Sends the request and prints the response summary.
    ///
    /// HTTP error statuses still come back as `Ok`; only URL, header and
    /// transport failures are errors.
    #[tracing::instrument(
        name = "execute",
        skip_all,
        fields(method = %self.method, url = %self.base_url, auth = self.auth.kind())
    )]
    pub async fn execute(self) -> Result<Response> {
        let result = async {
            let client = client()?;
            let rq = self.build_request(&client)?;
            send(&client, rq, self.method).await
        }
        .await;
        report(self.method, result)
    }

    /// Posts the OAuth2 form to the `token_url` parameter and returns the raw
    /// token response.
    ///
    /// Nothing else from the configuration is sent. `grant_type` defaults to
    /// `client_credentials`.
    #[tracing::instrument(name = "token_request", skip_all)]
    pub async fn execute_oauth2_token_request(self) -> Result<Response> {
        let Auth::OAuth2 { params } = &self.auth else {
            tracing::error!(auth = self.auth.kind(), "token request without OAuth2");
            return Err(Error::OAuth2NotConfigured("auth type is not OAuth2"));
        };
        let Some(token_url) = params.get(TOKEN_URL) else {
            tracing::error!("token request without token_url");
            return Err(Error::OAuth2NotConfigured("missing token_url"));
        };

        let result = async {
            let client = client()?;
            let rq = client
                .post(parse_url(token_url)?)
                .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(auth::oauth2_form(params, Some(DEFAULT_GRANT_TYPE)))
                .build()?;
            send(&client, rq, Method::Post).await
        }
        .await;
        report(Method::Post, result)
    }
}

fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|source| Error::InvalidUrl {
        url: url.into(),
        source,
    })
}

fn header_name(name: &str) -> Result<HeaderName> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|_| Error::InvalidHeader { name: name.into() })
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| Error::InvalidHeader { name: name.into() })
}

// One client per call, dropped with it.
fn client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().user_agent(APP_USER_AGENT).build()?)
}

async fn send(client: &reqwest::Client, rq: reqwest::Request, method: Method) -> Result<Response> {
    tracing::info!(url = %rq.url(), "dispatching");
    let rs = client.execute(rq).await?;
    Response::read(rs, method).await
}

fn report(method: Method, result: Result<Response>) -> Result<Response> {
    match result {
        Ok(rs) => {
            tracing::info!(status = rs.status_code(), "completed");
            println!("=== {method} Response ===");
            println!("{rs}");
            println!("============================\n");
            if rs.is_success() {
                println!("Request was successful!");
            } else {
                println!("Request failed!");
            }
            Ok(rs)
        }
        Err(err) => {
            tracing::error!(error = %err, "request failed");
            eprintln!("Error executing request: {err}");
            Err(err)
        }
    }
}

/// Configuration shared by every handle.
///
/// Each call mutates the underlying [`ApiCall`] in place and hands the handle
/// back. Setting an auth scheme replaces whichever one was set before.
pub trait Configure: Sized {
    fn call(&self) -> &ApiCall;

    fn call_mut(&mut self) -> &mut ApiCall;

    fn into_call(self) -> ApiCall;

    fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.call_mut().headers.insert(name.into(), value.into());
        self
    }

    fn query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.call_mut().query_params.insert(name.into(), value.into());
        self
    }

    fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.call_mut().auth = Auth::Basic {
            username: username.into(),
            password: password.into(),
        };
        self
    }

    fn bearer_auth(mut self, token: impl Into<String>) -> Self {
        self.call_mut().auth = Auth::Bearer {
            token: token.into(),
        };
        self
    }

    fn api_key_auth(mut self, header_name: impl Into<String>, key: impl Into<String>) -> Self {
        self.call_mut().auth = Auth::ApiKey {
            header_name: header_name.into(),
            key: key.into(),
        };
        self
    }

    /// Turns the call into an OAuth2 token request. See [`auth::oauth2_form`]
    /// for the fields that are sent.
    fn oauth2<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.call_mut().auth = Auth::OAuth2 {
            params: params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        };
        self
    }

    fn execute(self) -> impl Future<Output = Result<Response>> + Send {
        self.into_call().execute()
    }

    fn execute_oauth2_token_request(self) -> impl Future<Output = Result<Response>> + Send {
        self.into_call().execute_oauth2_token_request()
    }
}

/// Handle picked by [`ApiCall::handle`].
#[derive(Debug, Clone)]
pub enum Handle {
    Plain(CallDetails),
    WithBody(CallDetailsWithBody),
}

/// Handle for methods without a body.
#[derive(Debug, Clone)]
pub struct CallDetails {
    call: ApiCall,
}

/// Handle for POST, PUT and PATCH.
#[derive(Debug, Clone)]
pub struct CallDetailsWithBody {
    call: ApiCall,
}

impl CallDetailsWithBody {
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.call.body = Some(body.into());
        self
    }
}

impl Configure for CallDetails {
    fn call(&self) -> &ApiCall {
        &self.call
    }

    fn call_mut(&mut self) -> &mut ApiCall {
        &mut self.call
    }

    fn into_call(self) -> ApiCall {
        self.call
    }
}

impl Configure for CallDetailsWithBody {
    fn call(&self) -> &ApiCall {
        &self.call
    }

    fn call_mut(&mut self) -> &mut ApiCall {
        &mut self.call
    }

    fn into_call(self) -> ApiCall {
        self.call
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

    use crate::{Error, prelude::*};

    fn build(details: impl Configure) -> reqwest::Request {
        details
            .call()
            .build_request(&reqwest::Client::new())
            .unwrap()
    }

    fn body(rq: &reqwest::Request) -> Option<&str> {
        rq.body()
            .and_then(|b| b.as_bytes())
            .map(|b| std::str::from_utf8(b).unwrap())
    }

    #[test]
    fn test_get_with_query_and_header() {
        let rq = build(
            ApiCall::get("http://x/posts")
                .query_param("userId", "1")
                .header("Accept", "application/json"),
        );

        assert_eq!(rq.method(), reqwest::Method::GET);
        assert_eq!(rq.url().as_str(), "http://x/posts?userId=1");
        assert_eq!(rq.headers()["accept"], "application/json");
        assert!(rq.body().is_none());
    }

    #[test]
    fn test_query_params_are_encoded() {
        let rq = build(
            ApiCall::get("http://x/search?page=2")
                .query_param("q", "a b&c=d")
                .query_param("lang", "żółw")
                .query_param("q", "rust & tokio"),
        );

        let pairs: Vec<(String, String)> = rq.url().query_pairs().into_owned().collect();
        assert_eq!(pairs.len(), 3);
        assert!(pairs.contains(&("page".into(), "2".into())));
        assert!(pairs.contains(&("q".into(), "rust & tokio".into())));
        assert!(pairs.contains(&("lang".into(), "żółw".into())));
        assert!(rq.url().query().unwrap().contains("q=rust+%26+tokio"));
    }

    #[test]
    fn test_no_query_leaves_url_untouched() {
        let rq = build(ApiCall::delete("http://x/posts/1"));
        assert_eq!(rq.url().as_str(), "http://x/posts/1");
        assert_eq!(rq.method(), reqwest::Method::DELETE);
    }

    #[test]
    fn test_body_defaults_to_text_plain() {
        let rq = build(ApiCall::put("http://x/posts/1").body("hello"));
        assert_eq!(rq.headers()[CONTENT_TYPE], "text/plain");
        assert_eq!(body(&rq), Some("hello"));
    }

    #[test]
    fn test_body_content_type_lookup_ignores_case() {
        let rq = build(
            ApiCall::patch("http://x/posts/1")
                .header("content-TYPE", "application/json")
                .body(r#"{"title":"foo"}"#),
        );
        assert_eq!(rq.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(rq.headers().get_all(CONTENT_TYPE).iter().count(), 1);
        assert_eq!(body(&rq), Some(r#"{"title":"foo"}"#));
    }

    #[test]
    fn test_body_dropped_for_methods_without_body() {
        for method in [Method::Get, Method::Delete, Method::Head, Method::Options] {
            let rq = build(
                ApiCall::new("http://x/posts")
                    .request(method)
                    .details_with_body()
                    .body("ignored"),
            );
            assert!(rq.body().is_none(), "{method} carried a body");
            assert!(!rq.headers().contains_key(CONTENT_TYPE));
        }
    }

    #[test]
    fn test_post_without_body() {
        let rq = build(ApiCall::post("http://x/posts"));
        assert!(rq.body().is_none());
        assert!(!rq.headers().contains_key(CONTENT_TYPE));
    }

    #[test]
    fn test_header_overwrite() {
        let rq = build(
            ApiCall::get("http://x/")
                .header("X-Trace", "a")
                .header("X-Trace", "b"),
        );
        assert_eq!(rq.headers().get_all("x-trace").iter().count(), 1);
        assert_eq!(rq.headers()["x-trace"], "b");
    }

    #[test]
    fn test_headers_differing_in_case_are_all_sent() {
        let rq = build(
            ApiCall::get("http://x/")
                .header("X-Trace", "a")
                .header("x-trace", "b"),
        );
        let values: Vec<_> = rq.headers().get_all("x-trace").iter().collect();
        assert_eq!(values, ["a", "b"]);
    }

    #[test]
    fn test_handle_follows_method() {
        for method in [Method::Post, Method::Put, Method::Patch] {
            let handle = ApiCall::new("http://x/").request(method).handle();
            assert!(matches!(handle, Handle::WithBody(_)), "{method}");
        }
        for method in [Method::Get, Method::Delete, Method::Head, Method::Options] {
            let handle = ApiCall::new("http://x/").request(method).handle();
            assert!(matches!(handle, Handle::Plain(_)), "{method}");
        }
    }

    #[test]
    fn test_bearer_auth() {
        let rq = build(ApiCall::get("http://x/").bearer_auth("abc"));
        assert_eq!(rq.headers()[AUTHORIZATION], "Bearer abc");
    }

    #[test]
    fn test_last_auth_wins() {
        let rq = build(
            ApiCall::get("http://x/")
                .bearer_auth("abc")
                .api_key_auth("X-API-Key", "key-1"),
        );
        assert_eq!(rq.headers()["x-api-key"], "key-1");
        assert!(!rq.headers().contains_key(AUTHORIZATION));

        let rq = build(
            ApiCall::post("http://x/")
                .oauth2([("client_id", "A")])
                .basic_auth("user", "pass")
                .body("plain"),
        );
        assert_eq!(rq.headers()[AUTHORIZATION], "Basic dXNlcjpwYXNz");
        assert_eq!(rq.headers()[CONTENT_TYPE], "text/plain");
        assert_eq!(body(&rq), Some("plain"));
    }

    #[test]
    fn test_oauth2_replaces_body() {
        let rq = build(
            ApiCall::post("http://x/anything")
                .header("Content-Type", "application/json")
                .body("{}")
                .oauth2([
                    ("grant_type", "client_credentials"),
                    ("client_id", "A"),
                    ("client_secret", "B"),
                ]),
        );

        assert_eq!(rq.method(), reqwest::Method::POST);
        assert_eq!(
            rq.headers()[CONTENT_TYPE],
            "application/x-www-form-urlencoded"
        );
        assert!(!rq.headers().contains_key(AUTHORIZATION));
        assert_eq!(
            body(&rq),
            Some("grant_type=client_credentials&client_id=A&client_secret=B")
        );
    }

    #[test]
    fn test_oauth2_on_get_sends_nothing() {
        let rq = build(ApiCall::get("http://x/").oauth2([("client_id", "A")]));
        assert!(rq.body().is_none());
        assert!(!rq.headers().contains_key(CONTENT_TYPE));
        assert!(!rq.headers().contains_key(AUTHORIZATION));
    }

    #[test]
    fn test_oauth2_access_token_sent_as_bearer() {
        let rq = build(
            ApiCall::get("http://x/me")
                .oauth2([("access_token", "t0k"), ("client_id", "A")]),
        );
        assert_eq!(rq.headers()[AUTHORIZATION], "Bearer t0k");
        assert!(rq.body().is_none());
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ApiCall::get("not a url")
            .call()
            .build_request(&reqwest::Client::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { ref url, .. } if url == "not a url"));
    }

    #[test]
    fn test_invalid_header() {
        let err = ApiCall::get("http://x/")
            .header("bad header", "v")
            .call()
            .build_request(&reqwest::Client::new())
            .unwrap_err();
        assert!(err.is_configuration());

        let err = ApiCall::get("http://x/")
            .header("X-Ok", "line\nbreak")
            .call()
            .build_request(&reqwest::Client::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidHeader { ref name } if name == "X-Ok"));
    }

    mod wire {
        use wiremock::matchers::{body_string, header, method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        use crate::{Error, prelude::*};

        #[tokio::test]
        async fn test_get_scenario() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/posts"))
                .and(query_param("userId", "1"))
                .and(header("Accept", "application/json"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .insert_header("X-Total", "1")
                        .set_body_string(r#"[{"id":1}]"#),
                )
                .expect(1)
                .mount(&server)
                .await;

            let rs = ApiCall::get(format!("{}/posts", server.uri()))
                .query_param("userId", "1")
                .header("Accept", "application/json")
                .execute()
                .await
                .unwrap();

            assert_eq!(rs.status_code(), 200);
            assert!(rs.is_success());
            assert_eq!(rs.header("x-total"), Some("1"));
            assert_eq!(rs.body(), Some(r#"[{"id":1}]"#));

            let received = server.received_requests().await.unwrap();
            assert!(received[0].body.is_empty());
        }

        #[tokio::test]
        async fn test_post_json_body() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/posts"))
                .and(header("content-type", "application/json"))
                .and(body_string(r#"{"title":"foo"}"#))
                .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"id":101}"#))
                .expect(1)
                .mount(&server)
                .await;

            let rs = ApiCall::post(format!("{}/posts", server.uri()))
                .header("Content-Type", "application/json")
                .body(r#"{"title":"foo"}"#)
                .execute()
                .await
                .unwrap();

            assert_eq!(rs.status_code(), 201);
            assert_eq!(rs.body(), Some(r#"{"id":101}"#));
        }

        #[tokio::test]
        async fn test_oauth2_scenario() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/anything"))
                .and(header("content-type", "application/x-www-form-urlencoded"))
                .and(body_string(
                    "grant_type=client_credentials&client_id=A&client_secret=B",
                ))
                .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
                .expect(1)
                .mount(&server)
                .await;

            let rs = ApiCall::post(format!("{}/anything", server.uri()))
                .oauth2([
                    ("grant_type", "client_credentials"),
                    ("client_id", "A"),
                    ("client_secret", "B"),
                ])
                .execute()
                .await
                .unwrap();
            assert!(rs.is_success());
        }

        #[tokio::test]
        async fn test_basic_auth_is_sent() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(header("authorization", "Basic dXNlcjpwYXNz"))
                .respond_with(ResponseTemplate::new(200))
                .expect(1)
                .mount(&server)
                .await;

            let rs = ApiCall::get(server.uri())
                .basic_auth("user", "pass")
                .execute()
                .await
                .unwrap();
            assert_eq!(rs.status_code(), 200);
        }

        #[tokio::test]
        async fn test_error_status_is_ok() {
            let server = MockServer::start().await;
            Mock::given(method("DELETE"))
                .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
                .mount(&server)
                .await;

            let rs = ApiCall::delete(format!("{}/posts/9", server.uri()))
                .execute()
                .await
                .unwrap();
            assert_eq!(rs.status_code(), 404);
            assert!(!rs.is_success());
            assert_eq!(rs.body(), Some("missing"));
        }

        #[tokio::test]
        async fn test_head_has_no_body() {
            let server = MockServer::start().await;
            Mock::given(method("HEAD"))
                .respond_with(ResponseTemplate::new(200))
                .mount(&server)
                .await;

            let rs = ApiCall::head(server.uri()).execute().await.unwrap();
            assert_eq!(rs.status_code(), 200);
            assert_eq!(rs.body(), None);
        }

        #[tokio::test]
        async fn test_token_request() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/token"))
                .and(header("content-type", "application/x-www-form-urlencoded"))
                .and(body_string("grant_type=client_credentials&client_id=A"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_string(r#"{"access_token":"t0k","token_type":"Bearer"}"#),
                )
                .expect(1)
                .mount(&server)
                .await;

            let token_url = format!("{}/token", server.uri());
            let rs = ApiCall::get(format!("{}/resource", server.uri()))
                .header("Accept", "application/json")
                .oauth2([("client_id", "A"), ("token_url", token_url.as_str())])
                .execute_oauth2_token_request()
                .await
                .unwrap();

            let token: serde_json::Value = serde_json::from_str(rs.body().unwrap()).unwrap();
            assert_eq!(token["access_token"], "t0k");
        }

        #[tokio::test]
        async fn test_token_request_misconfigured() {
            let err = ApiCall::post("http://127.0.0.1/")
                .bearer_auth("t")
                .execute_oauth2_token_request()
                .await
                .unwrap_err();
            assert!(matches!(err, Error::OAuth2NotConfigured(_)));

            let err = ApiCall::post("http://127.0.0.1/")
                .oauth2([("client_id", "A")])
                .execute_oauth2_token_request()
                .await
                .unwrap_err();
            assert!(matches!(err, Error::OAuth2NotConfigured("missing token_url")));
        }

        #[tokio::test]
        async fn test_connection_failure() {
            let port = {
                let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
                listener.local_addr().unwrap().port()
            };

            let err = ApiCall::get(format!("http://127.0.0.1:{port}/"))
                .execute()
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Transport(_)));
            assert!(!err.is_configuration());
        }

        #[tokio::test]
        async fn test_malformed_url_fails_before_sending() {
            let err = ApiCall::options("http//missing-colon")
                .execute()
                .await
                .unwrap_err();
            assert!(matches!(err, Error::InvalidUrl { .. }));
        }
    }
}
