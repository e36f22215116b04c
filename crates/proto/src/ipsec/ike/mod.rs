//! IKE message model shared by both protocol generations
//!
//! Payloads arrive here already decoded by the message layer; this module
//! only describes them as structured values.
//!
//! # Certificate payloads
//!
//! ```text
//!  IKEv2 CERT (37) / IKEv1 CERT (6)
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! | Cert Encoding |                                               |
//! +-+-+-+-+-+-+-+-+                                               |
//! ~                       Certificate Data                        ~
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//!
//!  IKEv2 CERTREQ (38)                IKEv1 CR (7)
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+     +-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! | Cert Encoding |           |     | Cert Type     |           |
//! +-+-+-+-+-+-+-+-+           |     +-+-+-+-+-+-+-+-+           |
//! ~  SHA-1 key-id * N         ~     ~  DER Distinguished Name   ~
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+     +-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! # References
//!
//! - [RFC 7296 Section 3.6](https://datatracker.ietf.org/doc/html/rfc7296#section-3.6) - Certificate Payload
//! - [RFC 7296 Section 3.7](https://datatracker.ietf.org/doc/html/rfc7296#section-3.7) - Certificate Request Payload
//! - [RFC 2408 Section 3.10](https://datatracker.ietf.org/doc/html/rfc2408#section-3.10) - IKEv1 Certificate Request

pub mod constants;
pub mod message;
pub mod payload;

pub use constants::*;
pub use message::*;
pub use payload::*;
