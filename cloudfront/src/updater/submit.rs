use std::io::{self, Write};

use cloudfront_cert_core::util::extract_certificate_id;

use crate::{
    document::ConfigDocument,
    error::{CertUpdateError, Stage},
    provider::{DistributionProvider, UpdatedDistribution},
};

use super::CertificateUpdater;

impl<P: DistributionProvider> CertificateUpdater<'_, P> {
    /// Single attempt. A stale `etag` comes back as an ordinary update failure.
    pub async fn submit(
        &self,
        distribution_id: &str,
        config: &ConfigDocument,
        etag: &str,
        out: &mut impl Write,
    ) -> Result<UpdatedDistribution, CertUpdateError> {
        writeln!(out, "\n🚀 Updating CloudFront distribution...")?;

        let updated = self
            .provider
            .update_distribution(distribution_id, config, etag)
            .await
            .map_err(|e| CertUpdateError::provider(Stage::UpdateDistribution, e))?;

        tracing::info!("Distribution {} accepted update, status {}", updated.id, updated.status);

        write_report(&updated, &self.config.domain_names, out)?;
        Ok(updated)
    }
}

pub fn write_report(updated: &UpdatedDistribution, domain_names: &[String], out: &mut impl Write) -> io::Result<()> {
    let certificate_id = updated
        .certificate_arn
        .as_deref()
        .map(extract_certificate_id)
        .unwrap_or("(none)");

    writeln!(out, "✅ Distribution updated successfully!")?;
    writeln!(out, "\n📊 Distribution details:")?;
    writeln!(out, "   ID: {}", updated.id)?;
    writeln!(out, "   Domain: {}", updated.domain_name)?;
    writeln!(out, "   Aliases: {:?}", updated.aliases)?;
    writeln!(out, "   Certificate: {certificate_id}")?;
    writeln!(out, "\n⏳ Status: {}", updated.status)?;
    writeln!(out, "\n📝 Next steps:")?;
    writeln!(out, "   1. Add CNAME records in your DNS provider:")?;
    for domain in domain_names {
        writeln!(out, "      {domain} → {}", updated.domain_name)?;
    }
    writeln!(out, "   2. Wait for DNS propagation (5-15 minutes)")?;
    writeln!(out, "   3. Distribution will complete deployment (may take 10-15 minutes)")?;
    Ok(())
}
