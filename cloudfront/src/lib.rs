pub mod config;
pub mod document;
pub mod error;
pub mod preview;
pub mod provider;
pub mod updater;

pub use config::CertUpdateConfig;
pub use error::CertUpdateError;
pub use updater::{CertificateUpdater, execute};
