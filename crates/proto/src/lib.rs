//! Protocol implementations for the Warden IPsec stack.
//!
//! This crate provides the IKE control-plane tasks that run inside a
//! per-session task scheduler:
//!
//! - **IKE certificate pre-exchange** - certificate and certificate-request
//!   handling for IKEv2 (RFC 7296) and IKEv1 (RFC 2409) sessions
//!
//! # Features
//!
//! - `ipsec` (default) - IKE task support
//! - `serde` - `Serialize`/`Deserialize` for configuration types
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use warden_proto::ipsec::{
//!     config::{IkeConfig, Settings},
//!     credentials::CredentialManager,
//!     ike::IkeVersion,
//!     sa::IkeSaManager,
//!     tasks::cert_pre::CertPreTask,
//! };
//!
//! let mut manager = IkeSaManager::new(Arc::new(CredentialManager::new()), Settings::default());
//! let ike_cfg = IkeConfig::builder().build().unwrap();
//! let sa = manager.create(IkeVersion::V2, true, Arc::new(ike_cfg), None);
//!
//! let task = CertPreTask::new(&manager, sa, true).unwrap();
//! assert!(!task.is_final());
//! ```
//!
//! # References
//!
//! - [RFC 7296](https://datatracker.ietf.org/doc/html/rfc7296) - IKEv2 Protocol
//! - [RFC 2409](https://datatracker.ietf.org/doc/html/rfc2409) - IKEv1 Protocol
//! - [RFC 4739](https://datatracker.ietf.org/doc/html/rfc4739) - Multiple Authentication Exchanges

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

#[cfg(feature = "ipsec")]
pub mod ipsec;
