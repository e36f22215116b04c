use std::sync::Arc;

use super::Certificate;

/// Authentication context rule kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthRule {
    /// Trusted CA certificate (constraint or hint)
    CaCert,
    /// End-entity certificate
    SubjectCert,
    /// Intermediate CA certificate
    ImCert,
    /// CRL or other revocation material
    RevocationCert,
    /// URL of a hash-and-URL encoded end-entity certificate
    SubjectHashUrl,
    /// URL of a hash-and-URL encoded intermediate certificate
    ImHashUrl,
}

/// Value stored under an [`AuthRule`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthValue {
    /// Shared certificate
    Cert(Arc<Certificate>),
    /// Deferred certificate reference
    Url(String),
}

impl AuthValue {
    /// Certificate, if this value holds one
    pub fn cert(&self) -> Option<&Arc<Certificate>> {
        match self {
            AuthValue::Cert(cert) => Some(cert),
            AuthValue::Url(_) => None,
        }
    }

    /// URL, if this value holds one
    pub fn url(&self) -> Option<&str> {
        match self {
            AuthValue::Url(url) => Some(url),
            AuthValue::Cert(_) => None,
        }
    }
}

/// Ordered multi-map of authentication rules
///
/// Insertion order is preserved; the authentication task relies on the
/// first `SubjectCert` being the peer's own certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthConfig {
    entries: Vec<(AuthRule, AuthValue)>,
}

impl AuthConfig {
    /// Create empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule
    pub fn add(&mut self, rule: AuthRule, value: AuthValue) {
        self.entries.push((rule, value));
    }

    /// Append a certificate rule
    pub fn add_cert(&mut self, rule: AuthRule, cert: Arc<Certificate>) {
        self.add(rule, AuthValue::Cert(cert));
    }

    /// Append a URL rule
    pub fn add_url(&mut self, rule: AuthRule, url: impl Into<String>) {
        self.add(rule, AuthValue::Url(url.into()));
    }

    /// Builder-style variant of [`AuthConfig::add_cert`]
    pub fn with_cert(mut self, rule: AuthRule, cert: Arc<Certificate>) -> Self {
        self.add_cert(rule, cert);
        self
    }

    /// Iterate over all rules in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (AuthRule, &AuthValue)> + '_ {
        self.entries.iter().map(|(rule, value)| (*rule, value))
    }

    /// Iterate over the values of one rule kind
    pub fn rules(&self, rule: AuthRule) -> impl Iterator<Item = &AuthValue> + '_ {
        self.entries
            .iter()
            .filter(move |(r, _)| *r == rule)
            .map(|(_, value)| value)
    }

    /// Iterate over the certificates of one rule kind
    pub fn certs(&self, rule: AuthRule) -> impl Iterator<Item = &Arc<Certificate>> + '_ {
        self.rules(rule).filter_map(AuthValue::cert)
    }

    /// Number of values stored under one rule kind
    pub fn count(&self, rule: AuthRule) -> usize {
        self.rules(rule).count()
    }

    /// Total number of rules
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order() {
        let ee = Arc::new(Certificate::x509("CN=moon", vec![1], vec![1]));
        let im = Arc::new(Certificate::x509("CN=Sub CA", vec![2], vec![2]).with_ca());

        let mut auth = AuthConfig::new();
        auth.add_cert(AuthRule::SubjectCert, ee.clone());
        auth.add_cert(AuthRule::ImCert, im.clone());
        auth.add_url(AuthRule::ImHashUrl, "http://ca.example.org/sub.der");

        let rules: Vec<AuthRule> = auth.iter().map(|(rule, _)| rule).collect();
        assert_eq!(
            rules,
            vec![AuthRule::SubjectCert, AuthRule::ImCert, AuthRule::ImHashUrl]
        );
        assert_eq!(auth.certs(AuthRule::SubjectCert).next(), Some(&ee));
        assert_eq!(auth.certs(AuthRule::ImCert).next(), Some(&im));
        assert_eq!(
            auth.rules(AuthRule::ImHashUrl).next().and_then(AuthValue::url),
            Some("http://ca.example.org/sub.der")
        );
        assert_eq!(auth.len(), 3);
    }

    #[test]
    fn test_count() {
        let ca = Arc::new(Certificate::x509("CN=Root CA", vec![1], vec![1]).with_ca());
        let auth = AuthConfig::new()
            .with_cert(AuthRule::CaCert, ca.clone())
            .with_cert(AuthRule::CaCert, ca);

        assert_eq!(auth.count(AuthRule::CaCert), 2);
        assert_eq!(auth.count(AuthRule::SubjectCert), 0);
        assert!(AuthConfig::new().is_empty());
    }
}
