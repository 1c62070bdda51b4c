use anyhow::{bail, Context, Result};
use rig::providers::openai;
use serde::Deserialize;

const DEFAULT_LLM_URL: &str = "https://api.openai.com/v1";
const DEFAULT_LLM_MODEL: &str = "gpt-4o";
const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
const DEFAULT_MAX_TURNS: usize = 20;

/// OpenAI-compatible inference endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Endpoint {
    pub url: String,
    pub model: String,
    pub api_key: String,
}

/// Repository-scoped GitHub access.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubConfig {
    /// `owner/name`
    pub repository: String,
    pub token: String,
    pub api_url: String,
}

impl GithubConfig {
    /// Repository owner (user or organization).
    pub fn owner(&self) -> &str {
        self.repository
            .split_once('/')
            .map(|(owner, _)| owner)
            .unwrap_or(self.repository.as_str())
    }
}

/// Where an issue template comes from. Inline content wins over a URL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateSource {
    pub inline: Option<String>,
    pub url: Option<String>,
}

impl TemplateSource {
    pub fn is_configured(&self) -> bool {
        self.inline.is_some() || self.url.is_some()
    }
}

/// Top-level configuration for one issue-drafting deployment.
#[derive(Debug, Clone)]
pub struct IssueConfig {
    /// Model backing the coordinator, writer and analyst.
    pub llm: Endpoint,
    pub github: GithubConfig,
    /// Project documentation handed to the writer.
    pub docs_url: Option<String>,
    pub bug_template: TemplateSource,
    pub feature_template: TemplateSource,
    /// Tool-call turns allowed per agent prompt.
    pub max_turns: usize,
}

impl IssueConfig {
    /// Load from the process environment.
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let repository = get("GITHUB_REPOSITORY")
            .context("GITHUB_REPOSITORY is required (format: owner/name)")?;
        validate_repository(&repository)?;
        let token = get("GITHUB_PAT").context("GITHUB_PAT is required")?;

        let api_key = get("ISSUE_LLM_API_KEY")
            .or_else(|| get("OPENAI_API_KEY"))
            .unwrap_or_else(|| "not-needed".into());

        let max_turns = get("ISSUE_MAX_TURNS")
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_MAX_TURNS);

        Ok(Self {
            llm: Endpoint {
                url: get("ISSUE_LLM_URL").unwrap_or_else(|| DEFAULT_LLM_URL.into()),
                model: get("ISSUE_LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.into()),
                api_key,
            },
            github: GithubConfig {
                repository,
                token,
                api_url: get("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_GITHUB_API_URL.into()),
            },
            docs_url: get("DOCS_URL"),
            bug_template: TemplateSource {
                inline: get("TEMPLATE_BUG"),
                url: get("TEMPLATE_BUG_URL"),
            },
            feature_template: TemplateSource {
                inline: get("TEMPLATE_FEATURE"),
                url: get("TEMPLATE_FEATURE_URL"),
            },
            max_turns,
        })
    }

    /// Override the target repository (e.g. from a CLI flag).
    pub fn with_repository(mut self, repository: &str) -> Result<Self> {
        validate_repository(repository)?;
        self.github.repository = repository.to_string();
        Ok(self)
    }

    /// Build the rig client for the configured endpoint.
    pub fn completions_client(&self) -> Result<openai::CompletionsClient> {
        openai::CompletionsClient::builder()
            .api_key(&self.llm.api_key)
            .base_url(&self.llm.url)
            .build()
            .context("Failed to build completions client")
    }
}

fn validate_repository(repository: &str) -> Result<()> {
    match repository.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok(())
        }
        _ => bail!("invalid repository `{repository}`, expected owner/name"),
    }
}

/// Check if an inference endpoint is reachable (GET /models).
pub async fn check_endpoint(url: &str) -> bool {
    let models_url = format!("{url}/models");
    match reqwest::Client::new()
        .get(&models_url)
        .timeout(std::time::Duration::from_secs(5))
        .send()
        .await
    {
        Ok(resp) => resp.status().is_success(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = IssueConfig::from_lookup(lookup(&[
            ("GITHUB_REPOSITORY", "acme/widgets"),
            ("GITHUB_PAT", "ghp_test"),
        ]))
        .unwrap();

        assert_eq!(config.llm.url, DEFAULT_LLM_URL);
        assert_eq!(config.llm.model, DEFAULT_LLM_MODEL);
        assert_eq!(config.llm.api_key, "not-needed");
        assert_eq!(config.github.api_url, DEFAULT_GITHUB_API_URL);
        assert_eq!(config.github.owner(), "acme");
        assert_eq!(config.max_turns, DEFAULT_MAX_TURNS);
        assert!(config.docs_url.is_none());
        assert!(!config.bug_template.is_configured());
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = IssueConfig::from_lookup(lookup(&[
            ("GITHUB_REPOSITORY", "acme/widgets"),
            ("GITHUB_PAT", "ghp_test"),
            ("ISSUE_LLM_URL", "http://localhost:8080/v1"),
            ("ISSUE_LLM_MODEL", "local-model"),
            ("OPENAI_API_KEY", "sk-fallback"),
            ("ISSUE_MAX_TURNS", "7"),
            ("DOCS_URL", "https://example.com/docs.md"),
            ("TEMPLATE_BUG", "bug body"),
            ("TEMPLATE_FEATURE_URL", "https://example.com/feature.md"),
        ]))
        .unwrap();

        assert_eq!(config.llm.url, "http://localhost:8080/v1");
        assert_eq!(config.llm.model, "local-model");
        assert_eq!(config.llm.api_key, "sk-fallback");
        assert_eq!(config.max_turns, 7);
        assert_eq!(config.bug_template.inline.as_deref(), Some("bug body"));
        assert!(config.feature_template.is_configured());
    }

    #[test]
    fn test_missing_repository_is_an_error() {
        let err = IssueConfig::from_lookup(lookup(&[("GITHUB_PAT", "ghp_test")])).unwrap_err();
        assert!(err.to_string().contains("GITHUB_REPOSITORY"));
    }

    #[test]
    fn test_missing_token_is_an_error() {
        let err = IssueConfig::from_lookup(lookup(&[("GITHUB_REPOSITORY", "acme/widgets")]))
            .unwrap_err();
        assert!(err.to_string().contains("GITHUB_PAT"));
    }

    #[test]
    fn test_invalid_repository_rejected() {
        for repo in ["widgets", "/widgets", "acme/", "a/b/c"] {
            let result = IssueConfig::from_lookup(lookup(&[
                ("GITHUB_REPOSITORY", repo),
                ("GITHUB_PAT", "ghp_test"),
            ]));
            assert!(result.is_err(), "expected {repo:?} to be rejected");
        }
    }

    #[test]
    fn test_zero_max_turns_falls_back() {
        let config = IssueConfig::from_lookup(lookup(&[
            ("GITHUB_REPOSITORY", "acme/widgets"),
            ("GITHUB_PAT", "ghp_test"),
            ("ISSUE_MAX_TURNS", "0"),
        ]))
        .unwrap();
        assert_eq!(config.max_turns, DEFAULT_MAX_TURNS);
    }

    #[test]
    fn test_with_repository_override() {
        let config = IssueConfig::from_lookup(lookup(&[
            ("GITHUB_REPOSITORY", "acme/widgets"),
            ("GITHUB_PAT", "ghp_test"),
        ]))
        .unwrap()
        .with_repository("other/repo")
        .unwrap();
        assert_eq!(config.github.repository, "other/repo");
        assert_eq!(config.github.owner(), "other");
    }
}
