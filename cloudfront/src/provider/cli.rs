use std::{
    path::{Path, PathBuf},
    process::Stdio,
};

use anyhow::{Context, bail};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::process::Command;

use crate::{
    config::CertUpdateConfig,
    document::{ConfigDocument, VIEWER_CERTIFICATE_KEY, alias_items},
};

use super::{DistributionProvider, DistributionSummary, FetchedConfig, UpdatedDistribution};

/// Talks to CloudFront by running the `aws` command line tool with JSON output.
#[derive(Debug, Clone)]
pub struct AwsCliProvider {
    aws_cli: String,
    staging_path: PathBuf,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListDistributionsOutput {
    distribution_list: Option<DistributionList>,
    next_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DistributionList {
    #[serde(default)]
    items: Option<Vec<DistributionSummary>>,
}

#[derive(Deserialize)]
struct GetDistributionConfigOutput {
    #[serde(rename = "ETag")]
    e_tag: String,
    #[serde(rename = "DistributionConfig")]
    distribution_config: ConfigDocument,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct UpdateDistributionOutput {
    distribution: DistributionOutput,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DistributionOutput {
    id: String,
    domain_name: String,
    status: String,
    distribution_config: ConfigDocument,
}

impl AwsCliProvider {
    pub fn new(aws_cli: impl Into<String>, staging_path: impl Into<PathBuf>) -> Self {
        Self {
            aws_cli: aws_cli.into(),
            staging_path: staging_path.into(),
        }
    }

    pub fn from_config(config: &CertUpdateConfig) -> Self {
        Self::new(config.aws_cli.clone(), config.staging_path.clone())
    }

    async fn run_json(&self, args: &[&str]) -> anyhow::Result<Vec<u8>> {
        tracing::info!("Running {} {}", self.aws_cli, args.join(" "));

        let output = Command::new(&self.aws_cli)
            .args(args)
            .args(["--output", "json"])
            .stdin(Stdio::null())
            .output()
            .await
            .with_context(|| format!("Failed to run {}", self.aws_cli))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            tracing::error!("{} {} failed: {}", self.aws_cli, args.join(" "), output.status);
            if stderr.is_empty() {
                bail!("{} {} exited with {}", self.aws_cli, args.join(" "), output.status);
            }
            bail!("{}", stderr);
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl DistributionProvider for AwsCliProvider {
    async fn list_distributions(&self) -> anyhow::Result<Vec<DistributionSummary>> {
        let mut results = Vec::new();

        let mut next_token: Option<String> = None;
        loop {
            let mut args = vec!["cloudfront", "list-distributions"];
            if let Some(ref token) = next_token {
                args.extend(["--starting-token", token.as_str()]);
            }

            let stdout = self.run_json(&args).await?;
            let (items, token) = parse_distribution_list(&stdout)?;
            results.extend(items);

            next_token = token;
            if next_token.is_none() {
                break;
            }
        }

        Ok(results)
    }

    async fn get_distribution_config(&self, distribution_id: &str) -> anyhow::Result<FetchedConfig> {
        let stdout = self
            .run_json(&["cloudfront", "get-distribution-config", "--id", distribution_id])
            .await?;
        parse_distribution_config(&stdout)
    }

    async fn update_distribution(
        &self,
        distribution_id: &str,
        config: &ConfigDocument,
        if_match: &str,
    ) -> anyhow::Result<UpdatedDistribution> {
        write_staging_file(&self.staging_path, config).await?;

        let config_arg = format!("file://{}", self.staging_path.display());
        let stdout = self
            .run_json(&[
                "cloudfront",
                "update-distribution",
                "--id",
                distribution_id,
                "--distribution-config",
                &config_arg,
                "--if-match",
                if_match,
            ])
            .await?;
        parse_update_response(&stdout)
    }
}

/// Writes `config` in compact form to `path`. The file is left in place afterwards.
pub async fn write_staging_file(path: &Path, config: &ConfigDocument) -> anyhow::Result<()> {
    let bytes = serde_json::to_vec(config)?;
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Wrote updated distribution config to {}", path.display());
    Ok(())
}

fn parse_distribution_list(stdout: &[u8]) -> anyhow::Result<(Vec<DistributionSummary>, Option<String>)> {
    let output: ListDistributionsOutput =
        serde_json::from_slice(stdout).context("Malformed list-distributions response")?;

    let items = output.distribution_list.and_then(|list| list.items).unwrap_or_default();
    Ok((items, output.next_token))
}

fn parse_distribution_config(stdout: &[u8]) -> anyhow::Result<FetchedConfig> {
    let output: GetDistributionConfigOutput =
        serde_json::from_slice(stdout).context("Malformed get-distribution-config response")?;

    Ok(FetchedConfig {
        config: output.distribution_config,
        etag: output.e_tag,
    })
}

fn parse_update_response(stdout: &[u8]) -> anyhow::Result<UpdatedDistribution> {
    let output: UpdateDistributionOutput =
        serde_json::from_slice(stdout).context("Malformed update-distribution response")?;
    let dist = output.distribution;

    let certificate_arn = dist
        .distribution_config
        .get(VIEWER_CERTIFICATE_KEY)
        .and_then(|cert| cert.get("ACMCertificateArn"))
        .and_then(Value::as_str)
        .map(String::from);

    Ok(UpdatedDistribution {
        aliases: alias_items(&dist.distribution_config),
        id: dist.id,
        domain_name: dist.domain_name,
        status: dist.status,
        certificate_arn,
    })
}
