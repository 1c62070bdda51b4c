//! Issue templates and reference documentation for the writer.
//!
//! Everything here is optional: a source that is not configured or cannot be
//! fetched becomes an empty string and the writer runs without it.

use tracing::{debug, warn};

use crate::config::{IssueConfig, TemplateSource};

/// Reference docs beyond this many characters are cut off.
pub const MAX_DOCS_CHARS: usize = 50_000;

const FRONTMATTER_DELIM: &str = "---\n";

/// Fetch a text document over HTTP.
pub async fn fetch_content(client: &reqwest::Client, url: &str) -> Result<String, reqwest::Error> {
    client
        .get(url)
        .timeout(std::time::Duration::from_secs(15))
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
}

/// Drop a leading `---` YAML front-matter block (as in GitHub issue forms).
pub fn strip_yaml_frontmatter(content: &str) -> &str {
    let Some(rest) = content.strip_prefix(FRONTMATTER_DELIM) else {
        return content;
    };
    match rest.split_once(FRONTMATTER_DELIM) {
        Some((_, body)) => body,
        None => content,
    }
}

/// Cut `text` to at most `max` characters on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Inputs rendered into the writer's preamble.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriterContext {
    pub bug_template: String,
    pub feature_template: String,
    pub docs: String,
}

impl WriterContext {
    /// Load templates and docs as configured. Never fails.
    pub async fn load(config: &IssueConfig) -> Self {
        let client = reqwest::Client::new();
        let bug_template = load_template(&client, "bug", &config.bug_template).await;
        let feature_template = load_template(&client, "feature", &config.feature_template).await;

        let docs = match &config.docs_url {
            Some(url) => match fetch_content(&client, url).await {
                Ok(docs) => truncate_chars(&docs, MAX_DOCS_CHARS).to_string(),
                Err(err) => {
                    warn!(url = %url, error = %err, "Failed to fetch reference docs; continuing without");
                    String::new()
                }
            },
            None => String::new(),
        };

        debug!(
            bug_template = !bug_template.is_empty(),
            feature_template = !feature_template.is_empty(),
            docs_chars = docs.chars().count(),
            "Writer context loaded"
        );

        Self {
            bug_template,
            feature_template,
            docs,
        }
    }
}

async fn load_template(client: &reqwest::Client, kind: &str, source: &TemplateSource) -> String {
    if let Some(inline) = &source.inline {
        return strip_yaml_frontmatter(inline).to_string();
    }
    let Some(url) = &source.url else {
        return String::new();
    };
    match fetch_content(client, url).await {
        Ok(content) => strip_yaml_frontmatter(&content).to_string(),
        Err(err) => {
            warn!(template = kind, url = %url, error = %err, "Failed to fetch issue template");
            String::new()
        }
    }
}
