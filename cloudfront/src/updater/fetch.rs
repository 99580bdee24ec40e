use std::io::Write;

use crate::{
    error::{CertUpdateError, Stage},
    provider::{DistributionProvider, FetchedConfig},
};

use super::CertificateUpdater;

impl<P: DistributionProvider> CertificateUpdater<'_, P> {
    pub async fn fetch_config(&self, distribution_id: &str, out: &mut impl Write) -> Result<FetchedConfig, CertUpdateError> {
        let fetched = self
            .provider
            .get_distribution_config(distribution_id)
            .await
            .map_err(|e| CertUpdateError::provider(Stage::GetDistributionConfig, e))?;

        writeln!(out, "✅ Retrieved current distribution config (ETag: {})", fetched.etag)?;
        Ok(fetched)
    }
}
