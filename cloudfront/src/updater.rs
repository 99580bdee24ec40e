use std::{ffi::OsString, io::Write};

use crate::{
    config::CertUpdateConfig,
    error::CertUpdateError,
    provider::{DistributionProvider, UpdatedDistribution},
};

pub mod fetch;
pub mod mutate;
pub mod resolve;
pub mod submit;

/// Runs the lookup, read, mutate, write-back sequence against one provider.
/// Progress lines go to `out`; the first failing step ends the run.
pub struct CertificateUpdater<'a, P> {
    config: &'a CertUpdateConfig,
    provider: &'a P,
}

impl<'a, P: DistributionProvider> CertificateUpdater<'a, P> {
    pub fn new(config: &'a CertUpdateConfig, provider: &'a P) -> Self {
        Self { config, provider }
    }

    pub async fn run(&self, out: &mut impl Write) -> Result<UpdatedDistribution, CertUpdateError> {
        writeln!(out, "🔧 Updating CloudFront distribution with certificate...")?;
        writeln!(out, "   Certificate ARN: {}", self.config.certificate_arn)?;
        writeln!(out, "   Domain names: {}", self.config.domain_names.join(", "))?;

        let distribution_id = self.resolve_distribution(out).await?;
        let fetched = self.fetch_config(&distribution_id, out).await?;
        let updated_config = self.mutate_config(&fetched.config, out)?;
        self.submit(&distribution_id, &updated_config, &fetched.etag, out).await
    }
}

/// Builds the config from `lookup`, checks the AWS account if one is pinned, then runs
/// the update. `make_provider` is only called once the config is known to be complete.
pub async fn execute<P, F>(
    lookup: impl Fn(&str) -> Option<OsString>,
    make_provider: F,
    out: &mut impl Write,
) -> Result<UpdatedDistribution, CertUpdateError>
where
    P: DistributionProvider,
    F: FnOnce(&CertUpdateConfig) -> P,
{
    let config = CertUpdateConfig::from_lookup(lookup)?;

    if let Some(account_id) = config
        .account
        .verify_sts()
        .await
        .map_err(|e| CertUpdateError::AccountCheck(format!("{e:#}")))?
    {
        tracing::info!("Credentials verified for account {}", account_id);
    }

    let provider = make_provider(&config);
    CertificateUpdater::new(&config, &provider).run(out).await
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use serde_json::{Value, json};

    use super::*;
    use crate::{
        config::{
            CERTIFICATE_ARN_VAR,
            tests::{lookup_from, test_config},
        },
        document::{ALIASES_KEY, ConfigDocument, VIEWER_CERTIFICATE_KEY},
        error::Stage,
        provider::{
            DistributionSummary, FetchedConfig,
            recording::{Call, RecordingProvider},
        },
    };

    const ARN: &str = "arn:aws:acm:...:cert/abc";

    fn existing_config() -> ConfigDocument {
        let Value::Object(config) = json!({
            "CallerReference": "sharespace-frontend",
            "Aliases": { "Quantity": 1, "Items": ["old.example.com"] },
            "Comment": "sharespace frontend distribution",
            "ViewerCertificate": { "CloudFrontDefaultCertificate": true },
            "Enabled": true
        }) else {
            unreachable!()
        };
        config
    }

    fn provider_with_target() -> RecordingProvider {
        RecordingProvider {
            distributions: vec![
                DistributionSummary {
                    id: String::from("E999"),
                    comment: String::from("marketing site"),
                    domain_name: String::from("d999.cloudfront.net"),
                },
                DistributionSummary {
                    id: String::from("E123"),
                    comment: String::from("sharespace frontend distribution"),
                    domain_name: String::from("d123.cloudfront.net"),
                },
            ],
            fetched: Some(FetchedConfig {
                config: existing_config(),
                etag: String::from("E_OLD"),
            }),
            domain_name: String::from("d123.cloudfront.net"),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn updates_matching_distribution_with_fetched_etag() {
        let config = test_config(ARN);
        let provider = provider_with_target();

        let mut out = Vec::<u8>::new();
        let updated = CertificateUpdater::new(&config, &provider).run(&mut out).await.unwrap();

        let calls = provider.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], Call::List);
        assert_eq!(
            calls[1],
            Call::GetConfig {
                distribution_id: String::from("E123")
            }
        );
        let Call::Update {
            distribution_id,
            config: submitted,
            if_match,
        } = &calls[2]
        else {
            panic!("expected an update call, got {:?}", calls[2]);
        };
        assert_eq!(distribution_id, "E123");
        assert_eq!(if_match, "E_OLD");
        assert_eq!(
            submitted[ALIASES_KEY],
            json!({ "Quantity": 2, "Items": ["itsonlycastlesburning.com", "*.itsonlycastlesburning.com"] })
        );
        assert_eq!(submitted[VIEWER_CERTIFICATE_KEY]["ACMCertificateArn"], ARN);
        assert_eq!(submitted["CallerReference"], "sharespace-frontend");
        assert_eq!(submitted["Enabled"], true);

        assert_eq!(updated.id, "E123");
        assert_eq!(updated.status, "InProgress");

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("   Certificate ARN: arn:aws:acm:...:cert/abc\n"));
        assert!(out.contains("   Domain names: itsonlycastlesburning.com, *.itsonlycastlesburning.com\n"));
        assert!(out.contains("✅ Found distribution ID: E123\n"));
        assert!(out.contains("✅ Retrieved current distribution config (ETag: E_OLD)\n"));
        assert!(out.contains("✅ Distribution updated successfully!\n"));
        assert!(out.contains("   Certificate: abc\n"));
        assert!(out.contains("      *.itsonlycastlesburning.com → d123.cloudfront.net\n"));
    }

    #[tokio::test]
    async fn no_matching_comment_stops_after_listing() {
        let config = test_config(ARN);
        let mut provider = provider_with_target();
        provider.distributions.retain(|d| d.id != "E123");

        let mut out = Vec::<u8>::new();
        let err = CertificateUpdater::new(&config, &provider).run(&mut out).await.unwrap_err();

        assert!(matches!(err, CertUpdateError::DistributionNotFound(ref c) if c == "sharespace frontend distribution"));
        assert_eq!(provider.calls(), vec![Call::List]);
    }

    #[tokio::test]
    async fn listing_failure_is_fatal() {
        let config = test_config(ARN);
        let provider = RecordingProvider {
            list_error: Some(String::from("Unable to locate credentials")),
            ..provider_with_target()
        };

        let err = CertificateUpdater::new(&config, &provider)
            .run(&mut Vec::<u8>::new())
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Some(Stage::ListDistributions));
        assert_eq!(err.report_line(), "❌ Error listing distributions: Unable to locate credentials");
        assert_eq!(provider.calls(), vec![Call::List]);
    }

    #[tokio::test]
    async fn fetch_failure_skips_update() {
        let config = test_config(ARN);
        let provider = RecordingProvider {
            get_error: Some(String::from("AccessDenied")),
            ..provider_with_target()
        };

        let err = CertificateUpdater::new(&config, &provider)
            .run(&mut Vec::<u8>::new())
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Some(Stage::GetDistributionConfig));
        assert_eq!(provider.calls().len(), 2);
    }

    #[tokio::test]
    async fn stale_etag_is_reported_without_retry() {
        let detail = "An error occurred (PreconditionFailed) when calling the UpdateDistribution operation: \
                      The request failed because it didn't meet the preconditions in one or more request-header fields.";
        let config = test_config(ARN);
        let provider = RecordingProvider {
            update_error: Some(detail.to_string()),
            ..provider_with_target()
        };

        let mut out = Vec::<u8>::new();
        let err = CertificateUpdater::new(&config, &provider).run(&mut out).await.unwrap_err();

        assert_eq!(err.stage(), Some(Stage::UpdateDistribution));
        assert_eq!(err.report_line(), format!("❌ Error updating distribution: {detail}"));

        let calls = provider.calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(calls[2], Call::Update { .. }));

        let out = String::from_utf8(out).unwrap();
        assert!(!out.contains("Distribution updated successfully"));
    }

    #[tokio::test]
    async fn missing_certificate_arn_halts_before_any_call() {
        let provider = provider_with_target();
        let built = Cell::new(false);

        let mut out = Vec::<u8>::new();
        let err = execute(
            lookup_from(&[]),
            |_| {
                built.set(true);
                provider.clone()
            },
            &mut out,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CertUpdateError::MissingEnv(CERTIFICATE_ARN_VAR)));
        assert!(!built.get());
        assert!(provider.calls().is_empty());
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn execute_runs_the_full_update() {
        let provider = provider_with_target();

        let updated = execute(
            lookup_from(&[(CERTIFICATE_ARN_VAR, ARN)]),
            |config| {
                assert_eq!(config.certificate_arn, ARN);
                provider.clone()
            },
            &mut Vec::<u8>::new(),
        )
        .await
        .unwrap();

        assert_eq!(updated.certificate_arn.as_deref(), Some(ARN));
        assert_eq!(
            updated.aliases,
            vec![
                String::from("itsonlycastlesburning.com"),
                String::from("*.itsonlycastlesburning.com")
            ]
        );
        assert_eq!(provider.calls().len(), 3);
    }
}
