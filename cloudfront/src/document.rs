use serde::Deserialize;
use serde_json::{Map, Value, json};

/// A CloudFront `DistributionConfig` as returned by the API. Key order is preserved so
/// that everything this tool doesn't touch goes back exactly as it came.
pub type ConfigDocument = Map<String, Value>;

pub const VIEWER_CERTIFICATE_KEY: &str = "ViewerCertificate";
pub const ALIASES_KEY: &str = "Aliases";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ViewerCertificate {
    #[serde(rename = "ACMCertificateArn")]
    pub acm_certificate_arn: String,
    #[serde(rename = "SSLSupportMethod")]
    pub ssl_support_method: String,
    #[serde(rename = "MinimumProtocolVersion")]
    pub minimum_protocol_version: String,
    #[serde(rename = "CertificateSource")]
    pub certificate_source: String,
}

impl ViewerCertificate {
    /// An ACM certificate served with SNI only.
    pub fn acm_sni(certificate_arn: &str, minimum_protocol_version: &str) -> Self {
        Self {
            acm_certificate_arn: certificate_arn.to_string(),
            ssl_support_method: String::from("sni-only"),
            minimum_protocol_version: minimum_protocol_version.to_string(),
            certificate_source: String::from("acm"),
        }
    }

    pub fn to_value(&self) -> Value {
        json!({
            "ACMCertificateArn": self.acm_certificate_arn,
            "SSLSupportMethod": self.ssl_support_method,
            "MinimumProtocolVersion": self.minimum_protocol_version,
            "CertificateSource": self.certificate_source,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Aliases {
    #[serde(rename = "Quantity")]
    pub quantity: usize,
    #[serde(rename = "Items", default)]
    pub items: Vec<String>,
}

impl Aliases {
    pub fn new(items: &[String]) -> Self {
        Self {
            quantity: items.len(),
            items: items.to_vec(),
        }
    }

    pub fn to_value(&self) -> Value {
        json!({
            "Quantity": self.quantity,
            "Items": self.items,
        })
    }
}

/// Reads the alias items out of a config, treating an absent block as no aliases.
pub fn alias_items(config: &ConfigDocument) -> Vec<String> {
    config
        .get(ALIASES_KEY)
        .and_then(|aliases| Aliases::deserialize(aliases).ok())
        .map(|aliases| aliases.items)
        .unwrap_or_default()
}
