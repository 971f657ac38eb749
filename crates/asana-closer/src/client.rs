//! Asana REST client.
//!
//! API Documentation: <https://developers.asana.com/reference/rest-api-reference>

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::models::{
    CreateStoryRequest, DataEnvelope, ErrorResponse, Story, Task, UpdateTaskRequest, User,
};
use crate::reference::TaskReference;

/// Base URL for the Asana API.
pub const DEFAULT_API_URL: &str = "https://app.asana.com/api/1.0";

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Personal access token. Never printed.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    /// Wrap a token, returning `None` for empty or whitespace-only input.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Connection settings for [`AsanaClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL, without trailing slash
    pub api_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// The two task operations the closer needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Set a task's completion flag.
    async fn update_task_completion(
        &self,
        task: &TaskReference,
        completed: bool,
    ) -> Result<Task, ClientError>;

    /// Append a comment story to a task's activity feed.
    async fn add_task_comment(
        &self,
        task: &TaskReference,
        text: &str,
    ) -> Result<Story, ClientError>;
}

/// Authenticated Asana API handle.
#[derive(Clone)]
pub struct AsanaClient {
    client: Client,
    api_url: String,
    credential: Credential,
    timeout_secs: u64,
    user: User,
}

impl fmt::Debug for AsanaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsanaClient")
            .field("api_url", &self.api_url)
            .field("user", &self.user.gid)
            .finish_non_exhaustive()
    }
}

impl AsanaClient {
    /// Build a client and verify the credential against `GET /users/me`.
    ///
    /// # Errors
    /// Returns [`ClientError::Authentication`] if the token is empty or
    /// rejected, and other variants if Asana cannot be reached.
    pub async fn connect(credential: &str, config: &ClientConfig) -> Result<Self, ClientError> {
        let credential = Credential::new(credential)
            .ok_or_else(|| ClientError::Authentication("credential is empty".to_string()))?;
        Self::connect_with(credential, config).await
    }

    /// Same as [`AsanaClient::connect`] for an already validated credential.
    pub async fn connect_with(
        credential: Credential,
        config: &ClientConfig,
    ) -> Result<Self, ClientError> {
        let api_url = config.api_url.trim_end_matches('/').to_string();
        Url::parse(&api_url)
            .map_err(|e| ClientError::InvalidConfig(format!("api url '{api_url}': {e}")))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let mut this = Self {
            client,
            api_url,
            credential,
            timeout_secs: config.timeout_secs,
            user: User::default(),
        };

        this.user = match this.get::<User>("/users/me").await {
            Ok(user) => user,
            Err(ClientError::Api { status, message })
                if status == StatusCode::UNAUTHORIZED.as_u16()
                    || status == StatusCode::FORBIDDEN.as_u16() =>
            {
                return Err(ClientError::Authentication(format!(
                    "Asana rejected the credential ({status}): {message}"
                )));
            }
            Err(e) => return Err(e),
        };

        debug!(user_gid = %this.user.gid, "Authenticated with Asana");
        Ok(this)
    }

    /// The user the credential belongs to.
    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }

    /// Make an authenticated GET request.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}{path}", self.api_url);
        debug!(url = %url, "GET request");

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.credential.expose())
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        self.handle_response(response).await
    }

    /// Make an authenticated request with a JSON body.
    async fn send_json<T, B>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let url = format!("{}{path}", self.api_url);
        debug!(url = %url, method = %method, "JSON request");

        let response = self
            .client
            .request(method, &url)
            .bearer_auth(self.credential.expose())
            .json(&DataEnvelope::new(body))
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        self.handle_response(response).await
    }

    fn send_error(&self, e: reqwest::Error) -> ClientError {
        if e.is_timeout() {
            ClientError::Timeout(self.timeout_secs)
        } else {
            ClientError::Http(e)
        }
    }

    /// Unwrap the `data` envelope on success, or decode Asana's error body.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        let text = response.text().await.map_err(|e| self.send_error(e))?;

        if status.is_success() {
            serde_json::from_str::<DataEnvelope<T>>(&text)
                .map(|envelope| envelope.data)
                .map_err(|e| {
                    warn!(error = %e, "Failed to parse Asana response");
                    ClientError::Serialization(e)
                })
        } else {
            Err(ClientError::Api {
                status: status.as_u16(),
                message: ErrorResponse::message(&text).unwrap_or(text),
            })
        }
    }
}

#[async_trait]
impl TaskApi for AsanaClient {
    async fn update_task_completion(
        &self,
        task: &TaskReference,
        completed: bool,
    ) -> Result<Task, ClientError> {
        self.send_json(
            reqwest::Method::PUT,
            &format!("/tasks/{task}"),
            &UpdateTaskRequest { completed },
        )
        .await
    }

    async fn add_task_comment(
        &self,
        task: &TaskReference,
        text: &str,
    ) -> Result<Story, ClientError> {
        self.send_json(
            reqwest::Method::POST,
            &format!("/tasks/{task}/stories"),
            &CreateStoryRequest {
                text: text.to_string(),
            },
        )
        .await
    }
}
