use std::io::Write;

use crate::{
    error::{CertUpdateError, Stage},
    provider::{DistributionProvider, DistributionSummary},
};

use super::CertificateUpdater;

/// First distribution, in listing order, whose comment is exactly `comment`.
pub fn find_distribution_id<'d>(distributions: &'d [DistributionSummary], comment: &str) -> Option<&'d str> {
    distributions
        .iter()
        .find(|dist| dist.comment == comment)
        .map(|dist| dist.id.as_str())
}

impl<P: DistributionProvider> CertificateUpdater<'_, P> {
    pub async fn resolve_distribution(&self, out: &mut impl Write) -> Result<String, CertUpdateError> {
        let distributions = self
            .provider
            .list_distributions()
            .await
            .map_err(|e| CertUpdateError::provider(Stage::ListDistributions, e))?;

        tracing::debug!("Listed {} distributions", distributions.len());

        let Some(distribution_id) = find_distribution_id(&distributions, &self.config.distribution_comment) else {
            return Err(CertUpdateError::DistributionNotFound(
                self.config.distribution_comment.clone(),
            ));
        };

        writeln!(out, "✅ Found distribution ID: {distribution_id}")?;
        Ok(distribution_id.to_string())
    }
}
