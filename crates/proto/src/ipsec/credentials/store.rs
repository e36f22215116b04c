use std::sync::{Arc, PoisonError, RwLock};

use super::{Certificate, CertificateType, Identification, KeyType};

/// Certificate lookup as provided by the trust layer
///
/// Implementations are shared by every IKE SA and must allow concurrent
/// readers.
pub trait CredentialStore: Send + Sync {
    /// Find a certificate matching type, key type and identity
    ///
    /// With `trusted` set only certificates the store trusts are returned.
    fn get_cert(
        &self,
        cert_type: CertificateType,
        key_type: KeyType,
        id: &Identification,
        trusted: bool,
    ) -> Option<Arc<Certificate>>;

    /// Enumerate certificates, optionally restricted to an identity
    fn certs(
        &self,
        cert_type: CertificateType,
        key_type: KeyType,
        id: Option<&Identification>,
        trusted: bool,
    ) -> Vec<Arc<Certificate>>;
}

#[derive(Debug)]
struct StoredCert {
    cert: Arc<Certificate>,
    trusted: bool,
}

impl StoredCert {
    fn matches(
        &self,
        cert_type: CertificateType,
        key_type: KeyType,
        id: Option<&Identification>,
        trusted: bool,
    ) -> bool {
        (!trusted || self.trusted)
            && cert_type.matches(self.cert.cert_type())
            && key_type.matches(self.cert.key_type())
            && id.map_or(true, |id| self.cert.matches(id))
    }
}

/// In-memory credential store
#[derive(Debug, Default)]
pub struct CredentialManager {
    certs: RwLock<Vec<StoredCert>>,
}

impl CredentialManager {
    /// Create empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a certificate, returning the shared handle
    pub fn add_cert(&self, cert: Certificate, trusted: bool) -> Arc<Certificate> {
        let cert = Arc::new(cert);
        self.add_shared(cert.clone(), trusted);
        cert
    }

    /// Add an already shared certificate
    pub fn add_shared(&self, cert: Arc<Certificate>, trusted: bool) {
        self.certs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(StoredCert { cert, trusted });
    }

    /// Number of stored certificates
    pub fn len(&self) -> usize {
        self.certs.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CredentialStore for CredentialManager {
    fn get_cert(
        &self,
        cert_type: CertificateType,
        key_type: KeyType,
        id: &Identification,
        trusted: bool,
    ) -> Option<Arc<Certificate>> {
        self.certs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|stored| stored.matches(cert_type, key_type, Some(id), trusted))
            .map(|stored| stored.cert.clone())
    }

    fn certs(
        &self,
        cert_type: CertificateType,
        key_type: KeyType,
        id: Option<&Identification>,
        trusted: bool,
    ) -> Vec<Arc<Certificate>> {
        self.certs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|stored| stored.matches(cert_type, key_type, id, trusted))
            .map(|stored| stored.cert.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipsec::ike::IdType;
    use std::thread;

    fn ca(name: &str, spki: u8) -> Certificate {
        Certificate::x509(name, name.as_bytes().to_vec(), vec![spki, spki])
            .with_ca()
            .with_public_key_info(vec![0x30, spki])
    }

    #[test]
    fn test_lookup_by_key_id() {
        let store = CredentialManager::new();
        let root = store.add_cert(ca("CN=Root CA", 1), true);
        store.add_cert(ca("CN=Other CA", 2), true);

        let key_id = root.pubkey_info_sha1().unwrap();
        let id = Identification::from_encoding(IdType::KeyId, &key_id).unwrap();
        let found = store.get_cert(CertificateType::X509, KeyType::Any, &id, true);
        assert_eq!(found, Some(root));
    }

    #[test]
    fn test_trusted_only() {
        let store = CredentialManager::new();
        let cached = store.add_cert(ca("CN=Cached", 3), false);

        let id = Identification::from_encoding(IdType::DerAsn1Dn, b"CN=Cached").unwrap();
        assert!(store
            .get_cert(CertificateType::X509, KeyType::Any, &id, true)
            .is_none());
        assert_eq!(
            store.get_cert(CertificateType::X509, KeyType::Any, &id, false),
            Some(cached)
        );
    }

    #[test]
    fn test_enumerate_filters() {
        let store = CredentialManager::new();
        store.add_cert(ca("CN=Root CA", 1), true);
        store.add_cert(Certificate::crl("CN=Root CA", vec![1], vec![9]), true);
        store.add_cert(ca("CN=Untrusted", 2), false);

        assert_eq!(store.len(), 3);
        assert_eq!(
            store.certs(CertificateType::Any, KeyType::Any, None, true).len(),
            2
        );
        assert_eq!(
            store.certs(CertificateType::X509, KeyType::Any, None, false).len(),
            2
        );
        assert_eq!(
            store.certs(CertificateType::X509Crl, KeyType::Any, None, true).len(),
            1
        );
    }

    #[test]
    fn test_concurrent_readers() {
        let store = Arc::new(CredentialManager::new());
        for i in 0..16u8 {
            store.add_cert(ca(&format!("CN=CA {}", i), i), true);
        }

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    store
                        .certs(CertificateType::X509, KeyType::Any, None, true)
                        .len()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 16);
        }
    }
}
