use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;

use crate::document::{ConfigDocument, VIEWER_CERTIFICATE_KEY, alias_items};

use super::{DistributionProvider, DistributionSummary, FetchedConfig, UpdatedDistribution};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List,
    GetConfig { distribution_id: String },
    Update {
        distribution_id: String,
        config: ConfigDocument,
        if_match: String,
    },
}

/// In-memory provider that replays canned responses and records every call made to it.
/// Clones share the call log.
#[derive(Debug, Clone, Default)]
pub struct RecordingProvider {
    pub distributions: Vec<DistributionSummary>,
    pub fetched: Option<FetchedConfig>,
    pub domain_name: String,
    pub list_error: Option<String>,
    pub get_error: Option<String>,
    pub update_error: Option<String>,
    pub call_log: Arc<Mutex<Vec<Call>>>,
}

impl RecordingProvider {
    pub fn calls(&self) -> Vec<Call> {
        self.call_log.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.call_log.lock().unwrap().push(call);
    }
}

#[async_trait]
impl DistributionProvider for RecordingProvider {
    async fn list_distributions(&self) -> anyhow::Result<Vec<DistributionSummary>> {
        self.record(Call::List);
        if let Some(ref err) = self.list_error {
            return Err(anyhow!("{err}"));
        }
        Ok(self.distributions.clone())
    }

    async fn get_distribution_config(&self, distribution_id: &str) -> anyhow::Result<FetchedConfig> {
        self.record(Call::GetConfig {
            distribution_id: distribution_id.to_string(),
        });
        if let Some(ref err) = self.get_error {
            return Err(anyhow!("{err}"));
        }
        self.fetched.clone().ok_or_else(|| anyhow!("NoSuchDistribution: {distribution_id}"))
    }

    async fn update_distribution(
        &self,
        distribution_id: &str,
        config: &ConfigDocument,
        if_match: &str,
    ) -> anyhow::Result<UpdatedDistribution> {
        self.record(Call::Update {
            distribution_id: distribution_id.to_string(),
            config: config.clone(),
            if_match: if_match.to_string(),
        });
        if let Some(ref err) = self.update_error {
            return Err(anyhow!("{err}"));
        }

        let certificate_arn = config
            .get(VIEWER_CERTIFICATE_KEY)
            .and_then(|cert| cert.get("ACMCertificateArn"))
            .and_then(|arn| arn.as_str())
            .map(String::from);

        Ok(UpdatedDistribution {
            id: distribution_id.to_string(),
            domain_name: self.domain_name.clone(),
            status: String::from("InProgress"),
            aliases: alias_items(config),
            certificate_arn,
        })
    }
}
