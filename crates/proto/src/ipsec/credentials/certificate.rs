use sha1::{Digest, Sha1};

use super::Identification;
use crate::ipsec::ike::{IdType, SHA1_LEN};

/// Credential types known to the trust layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CertificateType {
    /// Wildcard for lookups
    Any,
    /// X.509 certificate
    X509,
    /// X.509 certificate revocation list
    X509Crl,
    /// X.509 attribute certificate
    X509Ac,
    /// OCSP response
    X509OcspResponse,
    /// Raw public key trusted by configuration
    TrustedPubkey,
    /// PGP certificate
    Gpg,
}

impl CertificateType {
    /// Check whether a certificate of type `other` satisfies a lookup for `self`
    pub fn matches(self, other: CertificateType) -> bool {
        self == CertificateType::Any || self == other
    }
}

/// Public key algorithm of a certificate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// Wildcard for lookups
    Any,
    /// RSA
    Rsa,
    /// ECDSA
    Ecdsa,
    /// Ed25519
    Ed25519,
}

impl KeyType {
    /// Check whether a key of type `other` satisfies a lookup for `self`
    pub fn matches(self, other: KeyType) -> bool {
        self == KeyType::Any || self == other
    }
}

/// X.509 certificate flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct X509Flags(u8);

impl X509Flags {
    /// Basic constraints CA flag
    pub const CA: u8 = 0x01;
    /// Self-signed certificate
    pub const SELF_SIGNED: u8 = 0x02;
    /// OCSP signer extended key usage
    pub const OCSP_SIGNER: u8 = 0x04;

    /// Create new flags
    pub fn new(value: u8) -> Self {
        X509Flags(value)
    }

    /// Check if a flag is set
    pub fn contains(self, flag: u8) -> bool {
        (self.0 & flag) != 0
    }

    /// Set a flag
    pub fn insert(&mut self, flag: u8) {
        self.0 |= flag;
    }

    /// Get raw value
    pub fn value(self) -> u8 {
        self.0
    }
}

/// A certificate or CRL as handed out by the trust layer
///
/// Parsing happens in the trust layer; this type keeps the fields the IKE
/// tasks need: the subject for logging and DN matching, the CA flag, and the
/// DER blobs key identifiers are computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    cert_type: CertificateType,
    subject: String,
    subject_dn: Vec<u8>,
    flags: X509Flags,
    public_key_info: Option<Vec<u8>>,
    key_type: KeyType,
    encoding: Vec<u8>,
}

impl Certificate {
    /// X.509 certificate with the given subject and DER encoding
    ///
    /// `subject_dn` is the DER encoded subject name; `subject` is its
    /// printable form.
    pub fn x509(subject: impl Into<String>, subject_dn: Vec<u8>, encoding: Vec<u8>) -> Self {
        Certificate {
            cert_type: CertificateType::X509,
            subject: subject.into(),
            subject_dn,
            flags: X509Flags::default(),
            public_key_info: None,
            key_type: KeyType::Any,
            encoding,
        }
    }

    /// Certificate revocation list issued by `issuer`
    pub fn crl(issuer: impl Into<String>, issuer_dn: Vec<u8>, encoding: Vec<u8>) -> Self {
        Certificate {
            cert_type: CertificateType::X509Crl,
            ..Self::x509(issuer, issuer_dn, encoding)
        }
    }

    /// Mark as certificate authority
    pub fn with_ca(mut self) -> Self {
        self.flags.insert(X509Flags::CA);
        self
    }

    /// Set additional X.509 flags
    pub fn with_flags(mut self, flag: u8) -> Self {
        self.flags.insert(flag);
        self
    }

    /// Attach the DER encoded SubjectPublicKeyInfo
    pub fn with_public_key_info(mut self, public_key_info: Vec<u8>) -> Self {
        self.public_key_info = Some(public_key_info);
        self
    }

    /// Set public key algorithm
    pub fn with_key_type(mut self, key_type: KeyType) -> Self {
        self.key_type = key_type;
        self
    }

    /// Credential type
    pub fn cert_type(&self) -> CertificateType {
        self.cert_type
    }

    /// Printable subject (issuer for CRLs)
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// DER encoded subject (issuer for CRLs)
    pub fn subject_dn(&self) -> &[u8] {
        &self.subject_dn
    }

    /// X.509 flags
    pub fn flags(&self) -> X509Flags {
        self.flags
    }

    /// Check the basic constraints CA flag
    pub fn is_ca(&self) -> bool {
        self.cert_type == CertificateType::X509 && self.flags.contains(X509Flags::CA)
    }

    /// DER encoded SubjectPublicKeyInfo, if the certificate carries a usable key
    pub fn public_key_info(&self) -> Option<&[u8]> {
        self.public_key_info.as_deref()
    }

    /// Public key algorithm
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// DER encoding
    pub fn encoding(&self) -> &[u8] {
        &self.encoding
    }

    /// SHA-1 over the SubjectPublicKeyInfo, the key identifier used in
    /// IKEv2 certificate requests
    pub fn pubkey_info_sha1(&self) -> Option<[u8; SHA1_LEN]> {
        self.public_key_info.as_deref().map(sha1_digest)
    }

    /// SHA-1 over the DER encoding, the hash used in hash-and-URL payloads
    pub fn encoding_sha1(&self) -> [u8; SHA1_LEN] {
        sha1_digest(&self.encoding)
    }

    /// Check whether this certificate carries the given identity
    pub fn matches(&self, id: &Identification) -> bool {
        match id.id_type() {
            IdType::KeyId => {
                self.pubkey_info_sha1()
                    .map_or(false, |key_id| key_id[..] == *id.data())
                    || self.encoding_sha1()[..] == *id.data()
            }
            IdType::DerAsn1Dn => self.subject_dn == id.data(),
            _ => self.subject.as_bytes() == id.data(),
        }
    }
}

fn sha1_digest(data: &[u8]) -> [u8; SHA1_LEN] {
    let mut hasher = Sha1::new();
    hasher.update(data);
    hasher.finalize().into()
}
