use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::GitHubConfig;

/// 仓库访问错误
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid GitHub URL: {0}")]
    InvalidUrl(String),

    #[error("repository not found: {0}")]
    NotFound(String),

    #[error("GitHub rate limit exceeded")]
    RateLimited,

    #[error("unexpected HTTP status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode repository metadata: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("README not found on branches: {}", tried.join(", "))]
    ReadmeNotFound { tried: Vec<String> },
}

/// 仓库坐标 owner/repo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoLocator {
    pub owner: String,
    pub repo: String,
}

impl RepoLocator {
    /// 从仓库URL解析，例如 `https://github.com/owner/repo/`
    pub fn parse(url: &str) -> Result<Self, FetchError> {
        let trimmed = url.trim().trim_end_matches('/');
        let pattern = Regex::new(r"github\.com/([^/\s]+)/([^/\s?#]+)")
            .map_err(|_| FetchError::InvalidUrl(url.to_string()))?;

        let captures = pattern
            .captures(trimmed)
            .ok_or_else(|| FetchError::InvalidUrl(url.to_string()))?;

        let owner = captures[1].to_string();
        let repo = captures[2].trim_end_matches(".git").to_string();
        if repo.is_empty() {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }

        Ok(Self { owner, repo })
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl std::fmt::Display for RepoLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// 仓库元数据接口返回的字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoInfo {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    pub html_url: String,
}

/// 仓库数据来源
#[async_trait]
pub trait RepositorySource: Send + Sync {
    /// 获取仓库元数据
    async fn fetch_metadata(&self, locator: &RepoLocator) -> Result<RepoInfo, FetchError>;

    /// 依次尝试各个分支，返回第一个成功获取的README
    async fn fetch_readme(
        &self,
        locator: &RepoLocator,
        branches: &[String],
    ) -> Result<String, FetchError>;
}

/// 基于GitHub REST API和raw文件服务的数据来源
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    config: GitHubConfig,
}

impl GitHubClient {
    pub fn new(config: GitHubConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self::with_http_client(config, http))
    }

    /// 使用外部构造的HTTP客户端
    pub fn with_http_client(config: GitHubConfig, http: reqwest::Client) -> Self {
        Self { http, config }
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .header(USER_AGENT, self.config.user_agent.as_str())
    }

    fn metadata_url(&self, locator: &RepoLocator) -> String {
        format!(
            "{}/repos/{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            locator.owner,
            locator.repo
        )
    }

    fn readme_url(&self, locator: &RepoLocator, branch: &str) -> String {
        format!(
            "{}/{}/{}/{}/README.md",
            self.config.raw_base_url.trim_end_matches('/'),
            locator.owner,
            locator.repo,
            branch
        )
    }
}

#[async_trait]
impl RepositorySource for GitHubClient {
    async fn fetch_metadata(&self, locator: &RepoLocator) -> Result<RepoInfo, FetchError> {
        let url = self.metadata_url(locator);
        debug!(%url, "fetching repository metadata");

        let mut request = self.get(&url).header(ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.config.token {
            request = request.header(AUTHORIZATION, format!("token {}", token));
        }

        let response = request.send().await?;
        match response.status() {
            status if status.is_success() => {
                let body = response.text().await?;
                let info: RepoInfo = serde_json::from_str(&body)?;
                info!(repo = %locator, stars = info.stargazers_count, "✅ repository metadata fetched");
                Ok(info)
            }
            StatusCode::NOT_FOUND => Err(FetchError::NotFound(locator.full_name())),
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => Err(FetchError::RateLimited),
            status => Err(FetchError::Status {
                status: status.as_u16(),
                url,
            }),
        }
    }

    async fn fetch_readme(
        &self,
        locator: &RepoLocator,
        branches: &[String],
    ) -> Result<String, FetchError> {
        for branch in branches {
            let url = self.readme_url(locator, branch);
            match self.get(&url).send().await {
                Ok(response) if response.status().is_success() => match response.text().await {
                    Ok(readme) => {
                        info!(repo = %locator, %branch, length = readme.len(), "✅ README fetched");
                        return Ok(readme);
                    }
                    Err(e) => {
                        warn!(repo = %locator, %branch, error = %e, "⚠️ README body could not be read");
                    }
                },
                Ok(response) => {
                    debug!(repo = %locator, %branch, status = %response.status(), "README not on branch");
                }
                Err(e) => {
                    warn!(repo = %locator, %branch, error = %e, "⚠️ README request failed");
                }
            }
        }

        Err(FetchError::ReadmeNotFound {
            tried: branches.to_vec(),
        })
    }
}
