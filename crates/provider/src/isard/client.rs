use crate::config::{AuthMethod, ConnectionConfig};
use crate::isard::{Deployments, Desktops, EntityKind, StatusRef, StatusSource};
use async_trait::async_trait;
use isard_common::prelude::{AuthError, Error, IsardError, Result};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{Client, Method, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::OnceCell;

/// Path of the login endpoint used by the `form` authentication method.
///
pub const LOGIN_PATH: &str = "/authentication/login";

/// Characters left as-is when an ID is placed in a URL path.
///
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encodes an ID for use as a single URL path segment.
///
pub(crate) fn segment(id: &str) -> String {
    utf8_percent_encode(id, PATH_SEGMENT).to_string()
}

/// Concrete implementation of the Isard API traits using `reqwest`.
///
/// Holds the base URL and the bearer token, and lazily builds the underlying
/// HTTP client on first use.
///
pub struct IsardClient {
    client: OnceCell<Client>,
    url: String,
    token: SecretString,
    ssl_verification: bool,
    timeout: Duration,
}

impl IsardClient {
    /// Creates a new instance of the Isard client.
    ///
    /// # Arguments
    ///
    /// * `endpoint`: Host name or base URL of the Isard installation.
    /// * `token`: Bearer token sent with every request.
    ///
    pub fn new(endpoint: &str, token: SecretString) -> Result<Self> {
        if token.expose_secret().trim().is_empty() {
            return Err(Error::Auth(AuthError::MissingToken));
        }
        Ok(Self {
            client: OnceCell::new(),
            url: base_url(endpoint),
            token,
            ssl_verification: true,
            timeout: Duration::from_secs(60),
        })
    }

    /// Enables or disables TLS certificate verification.
    ///
    pub fn with_ssl_verification(mut self, enabled: bool) -> Self {
        self.ssl_verification = enabled;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds a client from the connection settings, signing in first when the
    /// `form` method is configured.
    ///
    #[tracing::instrument(level = "trace", target = "client", skip(connection), fields(endpoint = %connection.endpoint))]
    pub async fn connect(connection: &ConnectionConfig) -> Result<Self> {
        let token = match connection.auth_method {
            AuthMethod::Token => connection
                .token
                .clone()
                .ok_or(Error::Auth(AuthError::MissingToken))?,
            AuthMethod::Form => {
                let (Some(username), Some(password)) = (&connection.username, &connection.password)
                else {
                    return Err(Error::Auth(AuthError::MissingCredentials));
                };
                let http = build_http_client(
                    HeaderMap::new(),
                    connection.ssl_verification,
                    connection.timeout(),
                )?;
                sign_in(
                    &http,
                    &base_url(&connection.endpoint),
                    &connection.category_id,
                    username,
                    password,
                )
                .await?
            }
        };

        Ok(Self::new(&connection.endpoint, token)?
            .with_ssl_verification(connection.ssl_verification)
            .with_timeout(connection.timeout()))
    }

    /// Lazily initializes and returns a reference to the `reqwest::Client`.
    ///
    /// The client carries the `Authorization` header as a default header.
    ///
    async fn get_client(&self) -> Result<&Client> {
        self.client
            .get_or_try_init(|| async {
                let mut auth_header =
                    HeaderValue::from_str(&format!("Bearer {}", self.token.expose_secret()))?;
                auth_header.set_sensitive(true);

                let mut headers = HeaderMap::new();
                headers.insert(AUTHORIZATION, auth_header);

                build_http_client(headers, self.ssl_verification, self.timeout)
            })
            .await
    }

    /// Sends a request and turns any non-2xx answer into an API error.
    ///
    /// # Arguments
    ///
    /// * `method`: HTTP method to use for the request.
    /// * `path`: API endpoint path.
    /// * `body`: Optional JSON request body.
    /// * `error_var`: Operation reported if the API call fails.
    ///
    /// # Returns
    ///
    /// The raw successful response.
    ///
    pub(crate) async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        error_var: IsardError,
    ) -> Result<Response>
    where
        B: Serialize + ?Sized + Sync,
    {
        let client = self.get_client().await?;
        let url = format!("{}{}", self.url, path);

        let mut request = client.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;

        match response.status() {
            status if status.is_success() => {
                tracing::trace!(target: "client", %method, path, %status, "Request succeeded");
                Ok(response)
            }
            status => {
                let text = response.text().await?;
                tracing::debug!(target: "client", %method, path, %status, body = %text, "Request failed");
                Err(Error::Isard(error_var, status, text))
            }
        }
    }

    /// Generic helper to perform a request and decode its JSON body.
    ///
    /// # Types
    ///
    /// * `B`: Type of the request body, which must be serializable.
    /// * `D`: Type of the response data, which must be deserializable.
    ///
    pub(crate) async fn make_request<B, D>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        error_var: IsardError,
    ) -> Result<D>
    where
        B: Serialize + ?Sized + Sync,
        D: DeserializeOwned,
    {
        let response = self.send(method, path, body, error_var).await?;
        Ok(response.json::<D>().await?)
    }

    /// Performs a request whose response body is irrelevant.
    ///
    pub(crate) async fn make_empty_request<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        error_var: IsardError,
    ) -> Result<()>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.send(method, path, body, error_var).await.map(|_| ())
    }

    /// Deletes a resource, treating an already absent one as deleted.
    ///
    pub(crate) async fn delete_idempotent(&self, path: &str) -> Result<()> {
        match self
            .make_empty_request::<()>(Method::DELETE, path, None, IsardError::Delete)
            .await
        {
            Err(error) if error.is_not_found() => {
                tracing::debug!(target: "client", path, "Already deleted");
                Ok(())
            }
            result => result,
        }
    }
}

#[async_trait]
impl StatusSource for IsardClient {
    async fn status(&self, entity: &StatusRef) -> Result<String> {
        match entity.kind {
            EntityKind::Desktop => self.desktop_status(&entity.id).await,
            EntityKind::Deployment => self.deployment_status(&entity.id).await,
        }
    }
}

// -----------------------------------------------------------------------------

/// Normalizes the configured endpoint into a base URL without trailing slash.
///
fn base_url(endpoint: &str) -> String {
    let endpoint = endpoint.trim().trim_end_matches('/');
    if endpoint.contains("://") {
        endpoint.to_owned()
    } else {
        format!("https://{}", endpoint)
    }
}

fn build_http_client(headers: HeaderMap, ssl_verification: bool, timeout: Duration) -> Result<Client> {
    Client::builder()
        .default_headers(headers)
        .danger_accept_invalid_certs(!ssl_verification)
        .use_rustls_tls()
        .timeout(timeout)
        .build()
        .map_err(Error::from)
}

/// Exchanges form credentials for a bearer token.
///
/// # Arguments
///
/// * `http`: Unauthenticated HTTP client.
/// * `base_url`: Base URL of the Isard installation.
/// * `category_id`: Category the user belongs to.
/// * `username`: Login name.
/// * `password`: Login password.
///
/// # Returns
///
/// The token found in the login response.
///
#[tracing::instrument(level = "trace", target = "client", skip(http, password))]
async fn sign_in(
    http: &Client,
    base_url: &str,
    category_id: &str,
    username: &str,
    password: &SecretString,
) -> Result<SecretString> {
    let url = format!("{}{}", base_url, LOGIN_PATH);
    let form = Form::new()
        .text("username", username.to_owned())
        .text("password", password.expose_secret().to_owned());

    let response = http
        .post(&url)
        .query(&[("provider", "form"), ("category_id", category_id)])
        .header(ACCEPT, "text/plain")
        .multipart(form)
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(Error::Isard(IsardError::SignIn, status, text));
    }

    let token = extract_token(&text).ok_or(Error::Auth(AuthError::EmptyToken))?;
    tracing::info!(target: "client", "Signed in with form credentials");
    Ok(token.into())
}

/// Finds the token in a login response body.
///
/// Accepts `{"data": "<token>"}`, `{"token": "<token>"}`,
/// `{"data": {"token": "<token>"}}` or the token as plain text.
///
fn extract_token(body: &str) -> Option<String> {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        value
            .get("data")
            .and_then(Value::as_str)
            .or_else(|| value.get("token").and_then(Value::as_str))
            .or_else(|| value.pointer("/data/token").and_then(Value::as_str))
            .map(str::to_owned)
    });

    let token = match from_json {
        Some(token) => token,
        None if body.trim_start().starts_with('{') => return None,
        None => body.trim().trim_matches('"').to_owned(),
    };
    (!token.is_empty()).then_some(token)
}
