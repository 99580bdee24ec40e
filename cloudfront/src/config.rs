use std::{ffi::OsString, path::PathBuf};

use cloudfront_cert_core::{config::AwsAccountConfig, util::optional_string_from_utf8};

use crate::error::CertUpdateError;

pub const CERTIFICATE_ARN_VAR: &str = "ACM_CERTIFICATE_ARN";
pub const AWS_CLI_VAR: &str = "AWS_CLI";

pub const DISTRIBUTION_COMMENT: &str = "sharespace frontend distribution";
pub const DOMAIN_NAMES: &[&str] = &["itsonlycastlesburning.com", "*.itsonlycastlesburning.com"];
pub const MINIMUM_PROTOCOL_VERSION: &str = "TLSv1.2_2021";
pub const STAGING_PATH: &str = "/tmp/dist-config-updated.json";

/// Everything a run needs, built once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertUpdateConfig {
    pub certificate_arn: String,
    pub distribution_comment: String,
    pub domain_names: Vec<String>,
    pub minimum_protocol_version: String,
    /// Where the mutated config is written for `update-distribution` to read.
    pub staging_path: PathBuf,
    pub aws_cli: String,
    pub account: AwsAccountConfig,
}

impl CertUpdateConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Result<CertUpdateConfig, CertUpdateError> {
        let certificate_arn = optional_string_from_utf8(lookup(CERTIFICATE_ARN_VAR))
            .map_err(|_| CertUpdateError::InvalidEnv(CERTIFICATE_ARN_VAR))?
            .filter(|arn| !arn.is_empty())
            .ok_or(CertUpdateError::MissingEnv(CERTIFICATE_ARN_VAR))?;

        let aws_cli = optional_string_from_utf8(lookup(AWS_CLI_VAR))
            .map_err(|_| CertUpdateError::InvalidEnv(AWS_CLI_VAR))?
            .filter(|cli| !cli.is_empty())
            .unwrap_or_else(|| String::from("aws"));

        let account = AwsAccountConfig::from_lookup(&lookup).map_err(|e| CertUpdateError::AccountCheck(format!("{e:#}")))?;

        Ok(CertUpdateConfig {
            certificate_arn,
            distribution_comment: DISTRIBUTION_COMMENT.to_string(),
            domain_names: DOMAIN_NAMES.iter().map(|s| s.to_string()).collect(),
            minimum_protocol_version: MINIMUM_PROTOCOL_VERSION.to_string(),
            staging_path: PathBuf::from(STAGING_PATH),
            aws_cli,
            account,
        })
    }
}
