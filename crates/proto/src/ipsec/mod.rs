//! IPSec control plane: IKE certificate pre-exchange
//!
//! This module implements the task that exchanges X.509 certificates and
//! certificate requests before peer authentication, for both IKE
//! generations:
//!
//! - **IKEv2** (RFC 7296) - CERTREQ carrying SHA-1 key identifiers, hash-and-URL
//!   certificate lookup (RFC 7296 Section 3.6)
//! - **IKEv1** (RFC 2409) - CR carrying a single distinguished name, main mode
//!   and aggressive mode
//!
//! # Architecture
//!
//! ```text
//! Task scheduler (per IKE SA)
//!   └── CertPreTask::build / process
//!         ├── certificate request processing  → local AuthConfig (CA hints)
//!         ├── certificate processing          → remote AuthConfig (EE, IM, CRL, URLs)
//!         └── certificate request building    → outgoing CERTREQ / CR payloads
//!                     ↑
//!         CredentialStore (trusted CAs, key-id / DN lookup)
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use warden_platform::{Task, TaskStatus};
//! use warden_proto::ipsec::{
//!     config::{IkeConfig, Settings},
//!     credentials::{Certificate, CredentialManager},
//!     ike::{ExchangeType, IkeMessage, IkeVersion, PayloadType},
//!     sa::IkeSaManager,
//!     tasks::cert_pre::CertPreTask,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let creds = CredentialManager::new();
//! creds.add_cert(
//!     Certificate::x509("C=CH, O=Example, CN=Example Root CA", vec![0x30, 0x01], vec![0xAA; 64])
//!         .with_ca()
//!         .with_public_key_info(vec![0x30, 0x59, 0x01]),
//!     true,
//! );
//!
//! let mut manager = IkeSaManager::new(Arc::new(creds), Settings::default());
//! let sa = manager.create(IkeVersion::V2, false, Arc::new(IkeConfig::builder().build()?), None);
//!
//! // Responder answers IKE_SA_INIT with a CERTREQ for every trusted CA
//! let mut task = CertPreTask::new(&manager, sa, false)?;
//! let mut response = IkeMessage::response(IkeVersion::V2, ExchangeType::IkeSaInit, 0, false);
//! assert_eq!(task.build(&mut manager, &mut response)?, TaskStatus::NeedMore);
//! assert!(response.payload(PayloadType::CERTREQ).is_some());
//! # Ok(())
//! # }
//! ```
//!
//! # References
//!
//! - [RFC 7296](https://datatracker.ietf.org/doc/html/rfc7296) - IKEv2 Protocol
//! - [RFC 2409](https://datatracker.ietf.org/doc/html/rfc2409) - IKEv1 Protocol

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod credentials;
pub mod error;
pub mod ike;
pub mod logging;
pub mod metrics;
pub mod sa;
pub mod tasks;

// Re-export commonly used types
pub use config::{IkeConfig, PeerConfig, Settings};
pub use error::{Error, Result};
pub use sa::{IkeSa, IkeSaId, IkeSaManager};
pub use tasks::cert_pre::CertPreTask;
