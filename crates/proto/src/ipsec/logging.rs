//! Structured logging for the certificate pre-exchange
//!
//! Provides structured, contextual logging using the `tracing` framework.
//! Every event carries the IKE SA it belongs to.
//!
//! # Log Levels
//!
//! - **TRACE**: Legacy exchange state transitions
//! - **DEBUG**: Unknown CA key identifiers, authentication method decisions
//! - **INFO**: Certificates and certificate requests sent or received
//! - **WARN**: Dropped or unsupported certificate payloads
//!
//! # Example
//!
//! ```no_run
//! use warden_proto::ipsec::{logging, IkeSaId};
//!
//! // Initialize tracing subscriber (in tests or applications)
//! tracing_subscriber::fmt()
//!     .with_env_filter("warden_proto::ipsec=debug")
//!     .init();
//!
//! logging::log_certreq_sent(IkeSaId::new(1), "C=CH, O=Example, CN=Root CA");
//! ```

use tracing::{debug, info, trace, warn};

use super::sa::IkeSaId;

/// Log a certificate request resolved to a trusted CA
pub fn log_certreq_received(ike_sa: IkeSaId, ca: &str) {
    info!(ike_sa = %ike_sa, ca = ca, "received cert request");
}

/// Log a certificate request naming a CA we don't know
///
/// # Arguments
///
/// * `ike_sa` - IKE SA the request arrived on
/// * `key_id` - Key identifier or DER encoded name from the request
pub fn log_certreq_unknown_ca(ike_sa: IkeSaId, key_id: &[u8]) {
    debug!(
        ike_sa = %ike_sa,
        key_id = %hex::encode(key_id),
        "received cert request for unknown ca"
    );
}

/// Log the number of unresolved CAs in one certificate request sweep
pub fn log_unknown_ca_count(ike_sa: IkeSaId, count: usize) {
    info!(
        ike_sa = %ike_sa,
        count = count,
        "received cert requests for an unknown ca"
    );
}

/// Log a certificate request for a certificate type other than X.509
pub fn log_certreq_type_not_supported(ike_sa: IkeSaId, cert_type: &str) {
    warn!(
        ike_sa = %ike_sa,
        cert_type = cert_type,
        "cert request type not supported - ignored"
    );
}

/// Log that the peer accepts hash-and-URL encoded certificates
pub fn log_http_cert_lookup_supported(ike_sa: IkeSaId) {
    debug!(ike_sa = %ike_sa, "peer supports HTTP cert lookup");
}

/// Log a received end-entity or intermediate certificate
pub fn log_cert_received(ike_sa: IkeSaId, subject: &str, end_entity: bool) {
    if end_entity {
        info!(ike_sa = %ike_sa, subject = subject, "received end entity cert");
    } else {
        info!(ike_sa = %ike_sa, subject = subject, "received issuer cert");
    }
}

/// Log a deferred hash-and-URL certificate reference
pub fn log_hash_url_received(ike_sa: IkeSaId, url: &str, end_entity: bool) {
    if end_entity {
        info!(ike_sa = %ike_sa, url = url, "received hash-and-url for end entity cert");
    } else {
        info!(ike_sa = %ike_sa, url = url, "received hash-and-url for issuer cert");
    }
}

/// Log a hash-and-URL payload we never advertised support for
pub fn log_hash_url_rejected(ike_sa: IkeSaId) {
    warn!(
        ike_sa = %ike_sa,
        "received hash-and-url encoded cert, but we don't accept them, ignore"
    );
}

/// Log a hash-and-URL payload without usable hash or URL
pub fn log_hash_url_invalid(ike_sa: IkeSaId) {
    warn!(ike_sa = %ike_sa, "received invalid hash-and-url encoded cert, ignore");
}

/// Log a received CRL
pub fn log_crl_received(ike_sa: IkeSaId, issuer: &str) {
    info!(ike_sa = %ike_sa, issuer = issuer, "received CRL");
}

/// Log a certificate payload with an unsupported encoding
pub fn log_encoding_not_supported(ike_sa: IkeSaId, encoding: u8) {
    warn!(
        ike_sa = %ike_sa,
        encoding = encoding,
        "cert payload encoding not supported - ignored"
    );
}

/// Log a CA advertised in an outgoing certificate request
pub fn log_certreq_sent(ike_sa: IkeSaId, ca: &str) {
    info!(ike_sa = %ike_sa, ca = ca, "sending cert request");
}

/// Log the legacy authentication method decision
pub fn log_auth_method(ike_sa: IkeSaId, method: u16, requires_certs: bool) {
    debug!(
        ike_sa = %ike_sa,
        auth_method = method,
        requires_certs = requires_certs,
        "legacy authentication method"
    );
}

/// Log a legacy exchange state transition
pub fn log_cert_pre_state_transition(ike_sa: IkeSaId, old_state: &str, new_state: &str) {
    trace!(
        ike_sa = %ike_sa,
        state_from = old_state,
        state_to = new_state,
        "cert pre-exchange state transition"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_functions_compile() {
        // These should not panic
        let sa = IkeSaId::new(7);
        log_certreq_received(sa, "CN=Root CA");
        log_certreq_unknown_ca(sa, &[0x01, 0x02, 0x03]);
        log_unknown_ca_count(sa, 2);
        log_certreq_type_not_supported(sa, "Gpg");
        log_http_cert_lookup_supported(sa);
        log_cert_received(sa, "CN=moon", true);
        log_cert_received(sa, "CN=Sub CA", false);
        log_hash_url_received(sa, "http://ca.example.org/moon.der", true);
        log_hash_url_rejected(sa);
        log_hash_url_invalid(sa);
        log_crl_received(sa, "CN=Root CA");
        log_encoding_not_supported(sa, 13);
        log_certreq_sent(sa, "CN=Root CA");
        log_auth_method(sa, 3, true);
        log_cert_pre_state_transition(sa, "Init", "SaSeen");
    }
}
