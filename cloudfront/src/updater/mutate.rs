use std::io::Write;

use crate::{
    document::{ALIASES_KEY, Aliases, ConfigDocument, VIEWER_CERTIFICATE_KEY, ViewerCertificate},
    error::CertUpdateError,
    preview::render_change_preview,
    provider::DistributionProvider,
};

use super::CertificateUpdater;

/// Returns a copy of `config` serving `certificate_arn` over SNI for `domain_names`.
/// Only `ViewerCertificate` and `Aliases` change; every other key keeps its value and position.
pub fn apply_certificate(
    config: &ConfigDocument,
    certificate_arn: &str,
    domain_names: &[String],
    minimum_protocol_version: &str,
) -> ConfigDocument {
    let mut updated = config.clone();

    updated.insert(
        VIEWER_CERTIFICATE_KEY.to_string(),
        ViewerCertificate::acm_sni(certificate_arn, minimum_protocol_version).to_value(),
    );
    updated.insert(ALIASES_KEY.to_string(), Aliases::new(domain_names).to_value());

    updated
}

impl<P: DistributionProvider> CertificateUpdater<'_, P> {
    pub fn mutate_config(&self, config: &ConfigDocument, out: &mut impl Write) -> Result<ConfigDocument, CertUpdateError> {
        let updated = apply_certificate(
            config,
            &self.config.certificate_arn,
            &self.config.domain_names,
            &self.config.minimum_protocol_version,
        );

        writeln!(out, "✅ Updated configuration:")?;
        writeln!(out, "   ViewerCertificate: ACM with SNI-only")?;
        writeln!(out, "   Aliases: {:?}", self.config.domain_names)?;
        write!(out, "{}", render_change_preview(config, &updated)?)?;

        Ok(updated)
    }
}
