//! HTTP implementation of the lists API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::{ApiError, ApiResult, ListsApi};
use crate::config::ClientConfig;
use crate::models::{AuthUser, List, ListItem, NewListItem};

#[derive(Debug, Serialize)]
struct NameBody<'a> {
    name: &'a str,
}

/// Lists API over HTTP, forwarding the session cookie on every call
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base: Url,
}

impl HttpClient {
    pub fn new(base_url: &str, session_cookie: Option<&str>) -> ApiResult<Self> {
        Self::build(base_url, session_cookie, None, None)
    }

    pub fn from_config(config: &ClientConfig) -> ApiResult<Self> {
        let timeout = (config.request_timeout_secs > 0)
            .then(|| Duration::from_secs(config.request_timeout_secs));

        Self::build(
            &config.api_url,
            config.session_cookie.as_deref(),
            timeout,
            Some(&config.user_agent),
        )
    }

    fn build(
        base_url: &str,
        session_cookie: Option<&str>,
        timeout: Option<Duration>,
        user_agent: Option<&str>,
    ) -> ApiResult<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| ApiError::Transport(format!("Invalid API url '{}': {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::Transport(format!(
                "Invalid API url '{}'",
                base_url
            )));
        }

        let mut headers = HeaderMap::new();
        if let Some(cookie) = session_cookie.filter(|c| !c.is_empty()) {
            let value = HeaderValue::from_str(cookie)
                .map_err(|_| ApiError::Transport("Session cookie is not a valid header".into()))?;
            headers.insert(COOKIE, value);
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(agent) = user_agent {
            builder = builder.user_agent(agent.to_string());
        }

        Ok(Self {
            client: builder.build()?,
            base,
        })
    }

    /// Join path segments onto the base url, percent-encoding each one
    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.url(segments);
        debug!("{} {}", method, url);
        self.client.request(method, url)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        expected: &'static str,
    ) -> ApiResult<T> {
        let response = request.send().await?;
        let body = checked_body(response).await?;

        serde_json::from_slice(&body).map_err(|e| {
            warn!("Could not decode {} from API response: {}", expected, e);
            ApiError::Incomplete(expected)
        })
    }
}

/// Read the body of a response, turning non-2xx statuses into errors
async fn checked_body(response: Response) -> ApiResult<Vec<u8>> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        let err = ApiError::from_body(status.as_u16(), &body);
        warn!("API returned {}: {}", status, err);
        return Err(err);
    }

    Ok(body.to_vec())
}

#[async_trait]
impl ListsApi for HttpClient {
    async fn auth_user(&self) -> ApiResult<AuthUser> {
        self.fetch(self.request(Method::GET, &["auth"]), "user")
            .await
    }

    async fn get_all_lists(&self) -> ApiResult<Vec<List>> {
        self.fetch(self.request(Method::GET, &["list"]), "lists")
            .await
    }

    async fn get_list(&self, slug: &str) -> ApiResult<List> {
        self.fetch(self.request(Method::GET, &["list", slug]), "list")
            .await
    }

    async fn add_list(&self, name: &str) -> ApiResult<List> {
        let request = self
            .request(Method::POST, &["list"])
            .json(&NameBody { name });
        self.fetch(request, "list").await
    }

    async fn update_list(&self, slug: &str, name: &str) -> ApiResult<List> {
        let request = self
            .request(Method::POST, &["list", slug])
            .json(&NameBody { name });
        self.fetch(request, "list").await
    }

    async fn delete_list(&self, slug: &str) -> ApiResult<List> {
        self.fetch(self.request(Method::POST, &["list", "delete", slug]), "list")
            .await
    }

    async fn get_list_item(&self, slug: &str, item_id: &str) -> ApiResult<ListItem> {
        self.fetch(
            self.request(Method::GET, &["list-item", slug, item_id]),
            "list item",
        )
        .await
    }

    async fn add_list_item(&self, slug: &str, item: &NewListItem) -> ApiResult<ListItem> {
        let request = self.request(Method::POST, &["list-item", slug]).json(item);
        self.fetch(request, "list item").await
    }

    async fn delete_list_item(&self, slug: &str, item_id: &str) -> ApiResult<()> {
        let response = self
            .request(Method::POST, &["list-item", slug, "delete", item_id])
            .send()
            .await?;
        checked_body(response).await?;
        Ok(())
    }
}
