//! Provider-origin records carried by tasks for round-trip writes.

use super::ParseTaskEnumError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// External tracker a task was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    /// GitLab issues, work items, and milestones.
    #[serde(rename = "gitlab")]
    GitLab,
    /// Azure DevOps work items.
    #[serde(rename = "azure_devops")]
    AzureDevOps,
    /// Tasks that only exist locally.
    #[serde(rename = "local")]
    Local,
}

impl ProviderKind {
    /// Returns provider name in canonical storage format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GitLab => "gitlab",
            Self::AzureDevOps => "azure_devops",
            Self::Local => "local",
        }
    }
}

impl TryFrom<&str> for ProviderKind {
    type Error = ParseTaskEnumError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "gitlab" => Ok(Self::GitLab),
            "azure_devops" | "azuredevops" | "ado" => Ok(Self::AzureDevOps),
            "local" => Ok(Self::Local),
            _ => Err(ParseTaskEnumError::new("provider", value)),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Remote record needed to write a task back to its provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderSource {
    /// Provider the task originates from.
    pub provider: ProviderKind,
    /// Provider-global identifier, such as a GraphQL global id.
    pub remote_id: String,
    /// Browser URL of the remote record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
    /// Optimistic-concurrency token (revision or etag), when the provider
    /// supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    /// Last modification time reported by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProviderSource {
    /// Creates a source record with only the required fields.
    #[must_use]
    pub fn new(provider: ProviderKind, remote_id: impl Into<String>) -> Self {
        Self {
            provider,
            remote_id: remote_id.into(),
            web_url: None,
            revision: None,
            updated_at: None,
        }
    }

    /// Sets the browser URL.
    #[must_use]
    pub fn with_web_url(mut self, web_url: impl Into<String>) -> Self {
        self.web_url = Some(web_url.into());
        self
    }

    /// Sets the concurrency token.
    #[must_use]
    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = Some(revision.into());
        self
    }
}
