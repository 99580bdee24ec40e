use async_trait::async_trait;
use serde::Deserialize;

use crate::document::ConfigDocument;

pub mod cli;
#[cfg(test)]
pub(crate) mod recording;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DistributionSummary {
    pub id: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub domain_name: String,
}

/// A distribution config together with the ETag it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedConfig {
    pub config: ConfigDocument,
    pub etag: String,
}

/// What the service reports back after an accepted update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatedDistribution {
    pub id: String,
    pub domain_name: String,
    pub status: String,
    pub aliases: Vec<String>,
    pub certificate_arn: Option<String>,
}

/// The three CloudFront control-plane calls this tool makes. Every call is attempted
/// once; errors carry whatever detail the provider gave back.
#[async_trait]
pub trait DistributionProvider {
    async fn list_distributions(&self) -> anyhow::Result<Vec<DistributionSummary>>;

    async fn get_distribution_config(&self, distribution_id: &str) -> anyhow::Result<FetchedConfig>;

    /// Applies `config` only if the distribution is still at `if_match`.
    async fn update_distribution(
        &self,
        distribution_id: &str,
        config: &ConfigDocument,
        if_match: &str,
    ) -> anyhow::Result<UpdatedDistribution>;
}
