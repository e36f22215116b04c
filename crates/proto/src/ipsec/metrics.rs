//! Metrics for the certificate pre-exchange
//!
//! Counters for certificate and certificate request traffic, shared by all
//! IKE SAs of a manager. All metrics use atomic operations for thread-safe
//! updates.
//!
//! # Example
//!
//! ```
//! use warden_proto::ipsec::metrics::CertMetrics;
//!
//! let metrics = CertMetrics::new();
//!
//! metrics.record_certreq_received();
//! metrics.record_ca_hint();
//! metrics.record_unknown_ca(2);
//!
//! let snapshot = metrics.snapshot();
//! assert_eq!(snapshot.ca_hints, 1);
//! assert_eq!(snapshot.unknown_ca, 2);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Certificate exchange metrics
///
/// Clones share the same counters.
#[derive(Debug, Clone)]
pub struct CertMetrics {
    /// Certificate request payloads received
    pub certreqs_received: Arc<AtomicU64>,

    /// Certificate request payloads sent
    pub certreqs_sent: Arc<AtomicU64>,

    /// Requested CAs not found in the trust store
    pub unknown_ca: Arc<AtomicU64>,

    /// Requested CAs recorded as hints
    pub ca_hints: Arc<AtomicU64>,

    /// End-entity certificates received
    pub end_entity_certs: Arc<AtomicU64>,

    /// Intermediate certificates received
    pub intermediate_certs: Arc<AtomicU64>,

    /// Hash-and-URL references deferred to authentication
    pub hash_url_deferred: Arc<AtomicU64>,

    /// Hash-and-URL payloads dropped because we never advertised support
    pub hash_url_rejected: Arc<AtomicU64>,

    /// Certificate revocation lists received
    pub crls_received: Arc<AtomicU64>,

    /// Certificate payloads with an unsupported encoding
    pub unsupported_encodings: Arc<AtomicU64>,
}

impl CertMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self {
            certreqs_received: Arc::new(AtomicU64::new(0)),
            certreqs_sent: Arc::new(AtomicU64::new(0)),
            unknown_ca: Arc::new(AtomicU64::new(0)),
            ca_hints: Arc::new(AtomicU64::new(0)),
            end_entity_certs: Arc::new(AtomicU64::new(0)),
            intermediate_certs: Arc::new(AtomicU64::new(0)),
            hash_url_deferred: Arc::new(AtomicU64::new(0)),
            hash_url_rejected: Arc::new(AtomicU64::new(0)),
            crls_received: Arc::new(AtomicU64::new(0)),
            unsupported_encodings: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Record a received certificate request payload
    pub fn record_certreq_received(&self) {
        self.certreqs_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a sent certificate request payload
    pub fn record_certreq_sent(&self) {
        self.certreqs_sent.fetch_add(1, Ordering::Relaxed);
    }

    /// Record unresolved CA references
    pub fn record_unknown_ca(&self, count: usize) {
        self.unknown_ca.fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Record a resolved CA hint
    pub fn record_ca_hint(&self) {
        self.ca_hints.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a received certificate
    pub fn record_cert_received(&self, end_entity: bool) {
        if end_entity {
            self.end_entity_certs.fetch_add(1, Ordering::Relaxed);
        } else {
            self.intermediate_certs.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a deferred hash-and-URL reference
    pub fn record_hash_url_deferred(&self) {
        self.hash_url_deferred.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a dropped hash-and-URL payload
    pub fn record_hash_url_rejected(&self) {
        self.hash_url_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a received CRL
    pub fn record_crl_received(&self) {
        self.crls_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a certificate payload with unsupported encoding
    pub fn record_unsupported_encoding(&self) {
        self.unsupported_encodings.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    ///
    /// Values may be slightly inconsistent across metrics due to concurrent updates.
    pub fn snapshot(&self) -> CertMetricsSnapshot {
        CertMetricsSnapshot {
            certreqs_received: self.certreqs_received.load(Ordering::Relaxed),
            certreqs_sent: self.certreqs_sent.load(Ordering::Relaxed),
            unknown_ca: self.unknown_ca.load(Ordering::Relaxed),
            ca_hints: self.ca_hints.load(Ordering::Relaxed),
            end_entity_certs: self.end_entity_certs.load(Ordering::Relaxed),
            intermediate_certs: self.intermediate_certs.load(Ordering::Relaxed),
            hash_url_deferred: self.hash_url_deferred.load(Ordering::Relaxed),
            hash_url_rejected: self.hash_url_rejected.load(Ordering::Relaxed),
            crls_received: self.crls_received.load(Ordering::Relaxed),
            unsupported_encodings: self.unsupported_encodings.load(Ordering::Relaxed),
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.certreqs_received.store(0, Ordering::Relaxed);
        self.certreqs_sent.store(0, Ordering::Relaxed);
        self.unknown_ca.store(0, Ordering::Relaxed);
        self.ca_hints.store(0, Ordering::Relaxed);
        self.end_entity_certs.store(0, Ordering::Relaxed);
        self.intermediate_certs.store(0, Ordering::Relaxed);
        self.hash_url_deferred.store(0, Ordering::Relaxed);
        self.hash_url_rejected.store(0, Ordering::Relaxed);
        self.crls_received.store(0, Ordering::Relaxed);
        self.unsupported_encodings.store(0, Ordering::Relaxed);
    }
}

impl Default for CertMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time snapshot of [`CertMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CertMetricsSnapshot {
    /// Certificate request payloads received
    pub certreqs_received: u64,

    /// Certificate request payloads sent
    pub certreqs_sent: u64,

    /// Requested CAs not found
    pub unknown_ca: u64,

    /// Requested CAs recorded as hints
    pub ca_hints: u64,

    /// End-entity certificates received
    pub end_entity_certs: u64,

    /// Intermediate certificates received
    pub intermediate_certs: u64,

    /// Deferred hash-and-URL references
    pub hash_url_deferred: u64,

    /// Dropped hash-and-URL payloads
    pub hash_url_rejected: u64,

    /// CRLs received
    pub crls_received: u64,

    /// Unsupported certificate encodings
    pub unsupported_encodings: u64,
}

impl CertMetricsSnapshot {
    /// Share of requested CAs found in the trust store (0.0 to 1.0)
    pub fn ca_resolution_rate(&self) -> f64 {
        let total = self.ca_hints + self.unknown_ca;
        if total == 0 {
            return 1.0;
        }
        self.ca_hints as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = CertMetrics::new();
        assert_eq!(metrics.snapshot(), CertMetricsSnapshot::default());
    }

    #[test]
    fn test_cert_counters() {
        let metrics = CertMetrics::new();
        metrics.record_cert_received(true);
        metrics.record_cert_received(false);
        metrics.record_cert_received(false);
        metrics.record_crl_received();
        metrics.record_unsupported_encoding();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.end_entity_certs, 1);
        assert_eq!(snapshot.intermediate_certs, 2);
        assert_eq!(snapshot.crls_received, 1);
        assert_eq!(snapshot.unsupported_encodings, 1);
    }

    #[test]
    fn test_ca_resolution_rate() {
        let metrics = CertMetrics::new();
        assert_eq!(metrics.snapshot().ca_resolution_rate(), 1.0);

        metrics.record_ca_hint();
        metrics.record_unknown_ca(3);
        assert_eq!(metrics.snapshot().ca_resolution_rate(), 0.25);
    }

    #[test]
    fn test_metrics_reset() {
        let metrics = CertMetrics::new();
        metrics.record_certreq_sent();
        metrics.record_hash_url_deferred();
        metrics.record_hash_url_rejected();
        metrics.reset();

        assert_eq!(metrics.snapshot(), CertMetricsSnapshot::default());
    }

    #[test]
    fn test_metrics_clone() {
        let metrics1 = CertMetrics::new();
        metrics1.record_certreq_received();

        let metrics2 = metrics1.clone();
        metrics2.record_certreq_received();

        // Both share the same counters
        assert_eq!(metrics1.snapshot().certreqs_received, 2);
        assert_eq!(metrics2.snapshot().certreqs_received, 2);
    }
}
