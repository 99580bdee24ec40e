use std::ffi::OsString;

use anyhow::{Context, bail};
use aws_config::{BehaviorVersion, Region, meta::region::RegionProviderChain};

use crate::util::optional_string_from_utf8;

pub const ACCOUNT_ID_VAR: &str = "AWS_ACCOUNT_ID";
pub const STS_REGION_VAR: &str = "AWS_STS_REGION";

/// Which AWS account the credentials in the environment are expected to belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsAccountConfig {
    pub account_id: Option<String>,
    pub sts_region: String,
}

impl Default for AwsAccountConfig {
    fn default() -> Self {
        Self {
            account_id: Default::default(),
            sts_region: String::from("us-east-1"),
        }
    }
}

impl AwsAccountConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> anyhow::Result<AwsAccountConfig> {
        let mut config = AwsAccountConfig::default();

        if let Some(account_id) = optional_string_from_utf8(lookup(ACCOUNT_ID_VAR))
            .with_context(|| format!("{ACCOUNT_ID_VAR} is not valid UTF-8"))?
            && !account_id.is_empty()
        {
            config.account_id = Some(account_id);
        }

        if let Some(sts_region) = optional_string_from_utf8(lookup(STS_REGION_VAR))
            .with_context(|| format!("{STS_REGION_VAR} is not valid UTF-8"))?
            && !sts_region.is_empty()
        {
            config.sts_region = sts_region;
        }

        Ok(config)
    }

    /// Confirms the ambient credentials belong to `account_id` when one is configured.
    /// Returns the caller's account ID, or `None` when no account is pinned.
    pub async fn verify_sts(&self) -> anyhow::Result<Option<String>> {
        let Some(ref account_id) = self.account_id else {
            tracing::info!("No {} set, skipping sts:GetCallerIdentity check.", ACCOUNT_ID_VAR);
            return Ok(None);
        };

        let sts_config = aws_config::defaults(BehaviorVersion::latest())
            .region(RegionProviderChain::first_try(Region::new(self.sts_region.clone())))
            .load()
            .await;

        let caller_identity = aws_sdk_sts::Client::new(&sts_config)
            .get_caller_identity()
            .send()
            .await
            .inspect_err(|e| tracing::error!("sts:GetCallerIdentity in {} failed: {}", self.sts_region, e))?;

        let caller_account_id = caller_identity
            .account
            .context("sts:GetCallerIdentity returned no account ID")?;
        check_account_id(account_id, &caller_account_id)?;

        Ok(Some(caller_account_id))
    }
}

fn check_account_id(pinned: &str, caller: &str) -> anyhow::Result<()> {
    if pinned != caller {
        bail!("{ACCOUNT_ID_VAR} is {pinned}, but the credentials in use belong to account {caller}");
    }
    Ok(())
}
