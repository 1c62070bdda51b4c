//! Issue-tracker surface used by the coordinator and analyst tools.
//!
//! `GithubTracker` talks to the GitHub REST API, scoped to one repository.
//! `NoOpTracker` is used when no tracker is reachable. Tests provide mocks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::GithubConfig;

const GITHUB_API_VERSION: &str = "2022-11-28";

/// Errors from the issue tracker backend.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("tracker returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    #[error("tracker unavailable: {0}")]
    Unavailable(String),
}

/// An issue type the repository accepts (e.g. Bug, Feature).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueType {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl IssueType {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: Some(description.to_string()),
        }
    }
}

/// Types offered when the tracker cannot list its own.
pub fn default_issue_types() -> Vec<IssueType> {
    vec![
        IssueType::new("Feature", "A request, idea, or new functionality."),
        IssueType::new("Bug", "An unexpected problem or behavior"),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A fully resolved issue ready to be filed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueDraft {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedIssue {
    pub number: u64,
    pub html_url: String,
    pub title: String,
}

/// One existing issue returned by a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSummary {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub html_url: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Repository-scoped issue tracker operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IssueTracker: Send + Sync {
    async fn list_issue_types(&self) -> Result<Vec<IssueType>, TrackerError>;

    async fn list_labels(&self) -> Result<Vec<Label>, TrackerError>;

    async fn search_issues(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<IssueSummary>, TrackerError>;

    async fn create_issue(&self, draft: IssueDraft) -> Result<CreatedIssue, TrackerError>;
}

/// Issue types from the tracker, or the defaults on any failure.
pub async fn issue_types_or_default(tracker: &dyn IssueTracker) -> Vec<IssueType> {
    match tracker.list_issue_types().await {
        Ok(types) if !types.is_empty() => types,
        Ok(_) => default_issue_types(),
        Err(err) => {
            warn!(error = %err, "Listing issue types failed; using defaults");
            default_issue_types()
        }
    }
}

/// Labels from the tracker, or none on any failure.
pub async fn labels_or_empty(tracker: &dyn IssueTracker) -> Vec<Label> {
    tracker.list_labels().await.unwrap_or_else(|err| {
        warn!(error = %err, "Listing labels failed; continuing without labels");
        Vec::new()
    })
}

#[derive(Deserialize)]
struct SearchResponse {
    items: Vec<IssueSummary>,
}

/// GitHub REST implementation.
pub struct GithubTracker {
    client: reqwest::Client,
    config: GithubConfig,
}

impl GithubTracker {
    pub fn new(config: GithubConfig) -> Result<Self, TrackerError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.token))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("issue-agents"));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn repository(&self) -> &str {
        &self.config.repository
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.repository,
            path
        )
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, TrackerError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(TrackerError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl IssueTracker for GithubTracker {
    async fn list_issue_types(&self) -> Result<Vec<IssueType>, TrackerError> {
        let url = format!(
            "{}/orgs/{}/issue-types",
            self.config.api_url.trim_end_matches('/'),
            self.config.owner()
        );
        let resp = Self::check(self.client.get(&url).send().await?).await?;
        Ok(resp.json().await?)
    }

    async fn list_labels(&self) -> Result<Vec<Label>, TrackerError> {
        let resp = self
            .client
            .get(self.repo_url("labels"))
            .query(&[("per_page", "100")])
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    async fn search_issues(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<IssueSummary>, TrackerError> {
        let url = format!("{}/search/issues", self.config.api_url.trim_end_matches('/'));
        let q = format!("repo:{} is:issue {}", self.config.repository, query);
        let per_page = limit.clamp(1, 100).to_string();
        let resp = self
            .client
            .get(&url)
            .query(&[("q", q.as_str()), ("per_page", per_page.as_str())])
            .send()
            .await?;
        let found: SearchResponse = Self::check(resp).await?.json().await?;
        Ok(found.items)
    }

    async fn create_issue(&self, draft: IssueDraft) -> Result<CreatedIssue, TrackerError> {
        let resp = self
            .client
            .post(self.repo_url("issues"))
            .json(&draft)
            .send()
            .await?;
        let created: CreatedIssue = Self::check(resp).await?.json().await?;
        info!(
            repository = %self.config.repository,
            number = created.number,
            "Issue created"
        );
        Ok(created)
    }
}

/// Tracker used when nothing is configured: reads are empty, writes fail.
pub struct NoOpTracker;

#[async_trait]
impl IssueTracker for NoOpTracker {
    async fn list_issue_types(&self) -> Result<Vec<IssueType>, TrackerError> {
        Ok(Vec::new())
    }

    async fn list_labels(&self) -> Result<Vec<Label>, TrackerError> {
        Ok(Vec::new())
    }

    async fn search_issues(
        &self,
        _query: &str,
        _limit: usize,
    ) -> Result<Vec<IssueSummary>, TrackerError> {
        Ok(Vec::new())
    }

    async fn create_issue(&self, _draft: IssueDraft) -> Result<CreatedIssue, TrackerError> {
        Err(TrackerError::Unavailable("no issue tracker configured".into()))
    }
}

/// Explicit user consent before an issue is filed.
#[async_trait]
pub trait ApprovalGate: Send + Sync {
    async fn approve(&self, draft: &IssueDraft) -> bool;
}

/// Approves everything. For tests and `--yes`.
pub struct AutoApprove;

#[async_trait]
impl ApprovalGate for AutoApprove {
    async fn approve(&self, _draft: &IssueDraft) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_issue_types_fall_back_on_error() {
        let mut tracker = MockIssueTracker::new();
        tracker
            .expect_list_issue_types()
            .returning(|| Err(TrackerError::Status { status: 404, body: "Not Found".into() }));

        let types = issue_types_or_default(&tracker).await;
        assert_eq!(types, default_issue_types());
    }

    #[tokio::test]
    async fn test_issue_types_fall_back_on_empty() {
        let mut tracker = MockIssueTracker::new();
        tracker.expect_list_issue_types().returning(|| Ok(Vec::new()));
        let types = issue_types_or_default(&tracker).await;
        assert_eq!(types.len(), 2);
    }

    #[tokio::test]
    async fn test_issue_types_from_tracker() {
        let mut tracker = MockIssueTracker::new();
        tracker
            .expect_list_issue_types()
            .returning(|| Ok(vec![IssueType::new("Task", "A unit of work")]));
        let types = issue_types_or_default(&tracker).await;
        assert_eq!(types, vec![IssueType::new("Task", "A unit of work")]);
    }

    #[tokio::test]
    async fn test_labels_empty_on_error() {
        let mut tracker = MockIssueTracker::new();
        tracker
            .expect_list_labels()
            .returning(|| Err(TrackerError::Unavailable("offline".into())));
        assert!(labels_or_empty(&tracker).await.is_empty());
    }

    #[tokio::test]
    async fn test_noop_tracker_refuses_writes() {
        let draft = IssueDraft {
            title: "t".into(),
            body: "b".into(),
            labels: vec![],
            issue_type: None,
        };
        assert!(NoOpTracker.create_issue(draft).await.is_err());
        assert!(NoOpTracker.search_issues("crash", 5).await.unwrap().is_empty());
    }

    #[test]
    fn test_draft_serializes_type_field() {
        let draft = IssueDraft {
            title: "[Bug]: Login crashes".into(),
            body: "body".into(),
            labels: vec!["bug".into()],
            issue_type: Some("Bug".into()),
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["type"], "Bug");
        assert_eq!(json["labels"][0], "bug");

        let untyped = IssueDraft {
            issue_type: None,
            ..draft
        };
        let json = serde_json::to_value(&untyped).unwrap();
        assert!(json.get("type").is_none());
    }

    #[test]
    fn test_github_tracker_builds() {
        let tracker = GithubTracker::new(GithubConfig {
            repository: "acme/widgets".into(),
            token: "ghp_test".into(),
            api_url: "https://api.github.com/".into(),
        })
        .unwrap();
        assert_eq!(tracker.repository(), "acme/widgets");
        assert_eq!(
            tracker.repo_url("labels"),
            "https://api.github.com/repos/acme/widgets/labels"
        );
    }
}
