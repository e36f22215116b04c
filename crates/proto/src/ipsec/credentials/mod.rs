//! Credential model consumed by the IKE tasks
//!
//! - [`Identification`] - typed identity built from raw payload bytes
//! - [`Certificate`] - X.509 certificate or CRL as seen by the trust layer
//! - [`AuthConfig`] - ordered authentication context of one direction
//! - [`CredentialStore`] - lookup and enumeration of known certificates
//!
//! Signature verification and chain building are done by the trust layer
//! behind [`CredentialStore`]; this module only describes credentials.

mod auth_cfg;
mod certificate;
mod identification;
mod store;

pub use auth_cfg::{AuthConfig, AuthRule, AuthValue};
pub use certificate::{Certificate, CertificateType, KeyType, X509Flags};
pub use identification::Identification;
pub use store::{CredentialManager, CredentialStore};
