use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::{GitHubComment, GitHubErrorBody, GitHubUser, ThreadHost, ThreadRef};
use crate::errors::GateError;
use crate::gates::Comment;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const PER_PAGE: usize = 100;
const API_VERSION: &str = "2022-11-28";
const CLIENT_USER_AGENT: &str = concat!("approval-gate/", env!("CARGO_PKG_VERSION"));

#[derive(Serialize)]
struct NewComment<'a> {
    body: &'a str,
}

/// REST client for the handful of GitHub endpoints the gate uses.
///
/// Every call is attempted exactly once; failures are returned to the caller.
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
}

impl GitHubClient {
    pub fn new(api_url: &str, token: &str) -> Result<Self, GateError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| GateError::Config("token contains invalid characters".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch one page of a list endpoint.
    async fn get_page<T: DeserializeOwned>(
        &self,
        url: &str,
        page: u32,
    ) -> Result<Vec<T>, GateError> {
        debug!(url, page, "GET");
        let resp = self
            .http
            .get(url)
            .query(&[
                ("per_page", PER_PAGE.to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await?;
        let resp = check_status(resp).await?;
        Ok(resp.json::<Vec<T>>().await?)
    }

    /// Walk a list endpoint until a short page comes back.
    async fn paginate<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>, GateError> {
        let mut all = Vec::new();
        let mut page = 1u32;

        loop {
            let items: Vec<T> = self.get_page(url, page).await?;
            let count = items.len();
            all.extend(items);

            if count < PER_PAGE {
                break; // Last page
            }
            page += 1;
        }

        Ok(all)
    }
}

/// Turn a non-2xx response into `GateError::Api`, keeping GitHub's message.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, GateError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<GitHubErrorBody>(&text)
        .map(|b| b.message)
        .unwrap_or_else(|_| {
            if text.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            } else {
                text
            }
        });

    Err(GateError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ThreadHost for GitHubClient {
    async fn list_team_members(
        &self,
        org: &str,
        team_slug: &str,
    ) -> Result<Vec<String>, GateError> {
        let url = format!("{}/orgs/{}/teams/{}/members", self.api_url, org, team_slug);
        match self.paginate::<GitHubUser>(&url).await {
            Ok(users) => Ok(users.into_iter().map(|u| u.login).collect()),
            Err(GateError::Api { status: 404, .. }) => Err(GateError::TeamNotFound {
                team: team_slug.to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    async fn list_issue_comments(&self, thread: &ThreadRef) -> Result<Vec<Comment>, GateError> {
        let url = format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.api_url, thread.owner, thread.repo, thread.number
        );
        let comments = self.paginate::<GitHubComment>(&url).await?;
        Ok(comments.into_iter().map(Comment::from).collect())
    }

    async fn create_comment(&self, thread: &ThreadRef, body: &str) -> Result<(), GateError> {
        let url = format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.api_url, thread.owner, thread.repo, thread.number
        );
        debug!(url = %url, "POST");
        let resp = self
            .http
            .post(&url)
            .json(&NewComment { body })
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }
}
