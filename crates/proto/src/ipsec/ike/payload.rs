//! IKE payload structures
//!
//! Implements the decoded form of the IKE payloads seen by the certificate
//! pre-exchange: certificates, certificate requests, notifications and the
//! IKEv1 SA payload, plus the sibling payloads that share a message with them.

use std::sync::Arc;

use super::constants::{CertEncoding, NotifyType, PayloadType, SHA1_LEN};
use crate::ipsec::credentials::{Certificate, CertificateType};

/// IKE Payload types
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, PartialEq)]
pub enum IkePayload {
    /// IKEv1 Security Association payload
    SAv1(SaV1Payload),

    /// Key Exchange payload
    KE(KePayload),

    /// Nonce payload
    Nonce(NoncePayload),

    /// Identification payload (Initiator)
    IDi(IdPayload),

    /// Identification payload (Responder)
    IDr(IdPayload),

    /// Authentication payload
    AUTH(AuthPayload),

    /// IKEv2 Certificate payload
    CERT(CertPayload),

    /// IKEv1 Certificate payload
    CERTv1(CertPayload),

    /// IKEv2 Certificate Request payload
    CERTREQ(CertReqPayload),

    /// IKEv1 Certificate Request payload
    CERTREQv1(CertReqV1Payload),

    /// Notify payload
    N(NotifyPayload),

    /// Payload not interpreted by this crate (store raw data)
    Unknown {
        /// Payload type
        payload_type: PayloadType,
        /// Raw payload data (excluding header)
        data: Vec<u8>,
    },
}

impl IkePayload {
    /// Get payload type
    pub fn payload_type(&self) -> PayloadType {
        match self {
            IkePayload::SAv1(_) => PayloadType::SAv1,
            IkePayload::KE(_) => PayloadType::KE,
            IkePayload::Nonce(_) => PayloadType::Nonce,
            IkePayload::IDi(_) => PayloadType::IDi,
            IkePayload::IDr(_) => PayloadType::IDr,
            IkePayload::AUTH(_) => PayloadType::AUTH,
            IkePayload::CERT(_) => PayloadType::CERT,
            IkePayload::CERTv1(_) => PayloadType::CERTv1,
            IkePayload::CERTREQ(_) => PayloadType::CERTREQ,
            IkePayload::CERTREQv1(_) => PayloadType::CERTREQv1,
            IkePayload::N(_) => PayloadType::N,
            IkePayload::Unknown { payload_type, .. } => *payload_type,
        }
    }
}

/// Authentication methods negotiated in the IKEv1 SA payload
/// (RFC 2409 Appendix A, plus XAuth and hybrid private-use values)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthMethodV1 {
    /// Pre-shared key (1)
    Psk,
    /// DSS signatures (2)
    DssSig,
    /// RSA signatures (3)
    RsaSig,
    /// Encryption with RSA (4)
    RsaEnc,
    /// Revised encryption with RSA (5)
    RsaEncRev,
    /// ECDSA with SHA-256 on P-256 (9, RFC 4754)
    EcdsaSha256,
    /// ECDSA with SHA-384 on P-384 (10, RFC 4754)
    EcdsaSha384,
    /// ECDSA with SHA-512 on P-521 (11, RFC 4754)
    EcdsaSha521,
    /// Hybrid RSA, initiator side (64221)
    HybridInitRsa,
    /// Hybrid RSA, responder side (64222)
    HybridRespRsa,
    /// XAuth with pre-shared key, initiator side (65001)
    XauthInitPsk,
    /// XAuth with pre-shared key, responder side (65002)
    XauthRespPsk,
    /// XAuth with RSA signatures, initiator side (65005)
    XauthInitRsa,
    /// XAuth with RSA signatures, responder side (65006)
    XauthRespRsa,
    /// Any other method
    Other(u16),
}

impl AuthMethodV1 {
    /// Convert from u16
    pub fn from_u16(value: u16) -> Self {
        match value {
            1 => AuthMethodV1::Psk,
            2 => AuthMethodV1::DssSig,
            3 => AuthMethodV1::RsaSig,
            4 => AuthMethodV1::RsaEnc,
            5 => AuthMethodV1::RsaEncRev,
            9 => AuthMethodV1::EcdsaSha256,
            10 => AuthMethodV1::EcdsaSha384,
            11 => AuthMethodV1::EcdsaSha521,
            64221 => AuthMethodV1::HybridInitRsa,
            64222 => AuthMethodV1::HybridRespRsa,
            65001 => AuthMethodV1::XauthInitPsk,
            65002 => AuthMethodV1::XauthRespPsk,
            65005 => AuthMethodV1::XauthInitRsa,
            65006 => AuthMethodV1::XauthRespRsa,
            other => AuthMethodV1::Other(other),
        }
    }

    /// Convert to u16
    pub fn to_u16(self) -> u16 {
        match self {
            AuthMethodV1::Psk => 1,
            AuthMethodV1::DssSig => 2,
            AuthMethodV1::RsaSig => 3,
            AuthMethodV1::RsaEnc => 4,
            AuthMethodV1::RsaEncRev => 5,
            AuthMethodV1::EcdsaSha256 => 9,
            AuthMethodV1::EcdsaSha384 => 10,
            AuthMethodV1::EcdsaSha521 => 11,
            AuthMethodV1::HybridInitRsa => 64221,
            AuthMethodV1::HybridRespRsa => 64222,
            AuthMethodV1::XauthInitPsk => 65001,
            AuthMethodV1::XauthRespPsk => 65002,
            AuthMethodV1::XauthInitRsa => 65005,
            AuthMethodV1::XauthRespRsa => 65006,
            AuthMethodV1::Other(value) => value,
        }
    }

    /// Whether peers using this method exchange certificates in the
    /// certificate pre-exchange
    pub fn requires_certificates(self) -> bool {
        matches!(
            self,
            AuthMethodV1::RsaSig | AuthMethodV1::XauthInitRsa | AuthMethodV1::XauthRespRsa
        )
    }
}

/// IKEv1 Security Association Payload (RFC 2408 Section 3.4)
///
/// Only the authentication method attribute of each proposed transform is
/// kept; the remaining attributes belong to the proposal negotiation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SaV1Payload {
    /// Authentication method of each proposed transform, in order
    pub auth_methods: Vec<AuthMethodV1>,
}

impl SaV1Payload {
    /// Create SA payload with a single proposed authentication method
    pub fn new(auth_method: AuthMethodV1) -> Self {
        SaV1Payload {
            auth_methods: vec![auth_method],
        }
    }

    /// Add another proposed transform
    pub fn add_auth_method(mut self, auth_method: AuthMethodV1) -> Self {
        self.auth_methods.push(auth_method);
        self
    }

    /// Authentication method of the first proposal
    pub fn auth_method(&self) -> Option<AuthMethodV1> {
        self.auth_methods.first().copied()
    }
}

/// Key Exchange Payload (RFC 7296 Section 3.4)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KePayload {
    /// Diffie-Hellman group number
    pub dh_group: u16,

    /// Key exchange data (public key)
    pub key_data: Vec<u8>,
}

impl KePayload {
    /// Create new KE payload
    pub fn new(dh_group: u16, key_data: Vec<u8>) -> Self {
        KePayload { dh_group, key_data }
    }
}

/// Nonce Payload (RFC 7296 Section 3.9)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoncePayload {
    /// Nonce data
    pub nonce: Vec<u8>,
}

impl NoncePayload {
    /// Create new nonce payload
    pub fn new(nonce: Vec<u8>) -> Self {
        NoncePayload { nonce }
    }
}

/// ID Type for Identification Payload (RFC 7296 Section 3.5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum IdType {
    /// IPv4 address
    Ipv4Addr = 1,
    /// Fully-qualified domain name
    Fqdn = 2,
    /// RFC 822 email address
    Rfc822Addr = 3,
    /// IPv6 address
    Ipv6Addr = 5,
    /// DER encoded ASN.1 X.500 Distinguished Name
    DerAsn1Dn = 9,
    /// DER encoded ASN.1 X.509 GeneralName
    DerAsn1Gn = 10,
    /// Opaque key identifier
    KeyId = 11,
}

impl IdType {
    /// Convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(IdType::Ipv4Addr),
            2 => Some(IdType::Fqdn),
            3 => Some(IdType::Rfc822Addr),
            5 => Some(IdType::Ipv6Addr),
            9 => Some(IdType::DerAsn1Dn),
            10 => Some(IdType::DerAsn1Gn),
            11 => Some(IdType::KeyId),
            _ => None,
        }
    }

    /// Convert to u8
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

/// Identification Payload (RFC 7296 Section 3.5)
///
/// Used for IDi (Initiator) and IDr (Responder) payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdPayload {
    /// ID type
    pub id_type: IdType,

    /// Identification data
    pub data: Vec<u8>,
}

impl IdPayload {
    /// Create new ID payload
    pub fn new(id_type: IdType, data: Vec<u8>) -> Self {
        IdPayload { id_type, data }
    }

    /// Create ID from FQDN
    pub fn from_fqdn(fqdn: &str) -> Self {
        IdPayload {
            id_type: IdType::Fqdn,
            data: fqdn.as_bytes().to_vec(),
        }
    }
}

/// Authentication Method (RFC 7296 Section 3.8)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AuthMethod {
    /// RSA Digital Signature
    RsaSig = 1,
    /// Shared Key Message Integrity Code
    SharedKeyMic = 2,
    /// DSS Digital Signature
    DssSig = 3,
    /// ECDSA with SHA-256 on P-256 curve
    EcdsaSha256P256 = 9,
    /// ECDSA with SHA-384 on P-384 curve
    EcdsaSha384P384 = 10,
    /// ECDSA with SHA-512 on P-521 curve
    EcdsaSha512P521 = 11,
    /// Generic Digital Signature (RFC 7427)
    DigitalSignature = 14,
}

impl AuthMethod {
    /// Convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(AuthMethod::RsaSig),
            2 => Some(AuthMethod::SharedKeyMic),
            3 => Some(AuthMethod::DssSig),
            9 => Some(AuthMethod::EcdsaSha256P256),
            10 => Some(AuthMethod::EcdsaSha384P384),
            11 => Some(AuthMethod::EcdsaSha512P521),
            14 => Some(AuthMethod::DigitalSignature),
            _ => None,
        }
    }

    /// Convert to u8
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

/// Authentication Payload (RFC 7296 Section 3.8)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPayload {
    /// Authentication method
    pub auth_method: AuthMethod,

    /// Authentication data
    pub auth_data: Vec<u8>,
}

impl AuthPayload {
    /// Create new AUTH payload
    pub fn new(auth_method: AuthMethod, auth_data: Vec<u8>) -> Self {
        AuthPayload {
            auth_method,
            auth_data,
        }
    }
}

/// Notify Payload (RFC 7296 Section 3.10)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyPayload {
    /// Notification type
    pub notify_type: NotifyType,

    /// Notification data
    pub data: Vec<u8>,
}

impl NotifyPayload {
    /// Create new notify payload
    pub fn new(notify_type: NotifyType, data: Vec<u8>) -> Self {
        NotifyPayload { notify_type, data }
    }
}

impl CertEncoding {
    /// Credential type carried by this encoding
    pub fn certificate_type(self) -> CertificateType {
        match self {
            CertEncoding::X509Signature => CertificateType::X509,
            CertEncoding::Crl => CertificateType::X509Crl,
            CertEncoding::X509Attribute => CertificateType::X509Ac,
            CertEncoding::OcspContent => CertificateType::X509OcspResponse,
            CertEncoding::Pgp => CertificateType::Gpg,
            CertEncoding::RawRsaKey => CertificateType::TrustedPubkey,
            _ => CertificateType::Any,
        }
    }
}

/// Certificate Payload (RFC 7296 Section 3.6, RFC 2408 Section 3.9)
///
/// The message layer decodes signature and CRL encodings into a
/// [`Certificate`]; hash-and-URL data is kept raw as a 20-byte SHA-1 hash of
/// the DER certificate followed by the URL.
#[derive(Debug, Clone, PartialEq)]
pub struct CertPayload {
    encoding: CertEncoding,
    data: Vec<u8>,
    cert: Option<Arc<Certificate>>,
}

impl CertPayload {
    /// Create payload from its parts
    pub fn new(encoding: CertEncoding, data: Vec<u8>, cert: Option<Arc<Certificate>>) -> Self {
        CertPayload {
            encoding,
            data,
            cert,
        }
    }

    /// X.509 certificate carried by value
    pub fn x509(cert: Arc<Certificate>) -> Self {
        CertPayload {
            encoding: CertEncoding::X509Signature,
            data: cert.encoding().to_vec(),
            cert: Some(cert),
        }
    }

    /// Certificate revocation list carried by value
    pub fn crl(crl: Arc<Certificate>) -> Self {
        CertPayload {
            encoding: CertEncoding::Crl,
            data: crl.encoding().to_vec(),
            cert: Some(crl),
        }
    }

    /// X.509 certificate referenced by hash and URL
    pub fn hash_and_url(hash: [u8; SHA1_LEN], url: &str) -> Self {
        let mut data = Vec::with_capacity(SHA1_LEN + url.len());
        data.extend_from_slice(&hash);
        data.extend_from_slice(url.as_bytes());
        CertPayload {
            encoding: CertEncoding::X509HashAndUrl,
            data,
            cert: None,
        }
    }

    /// Payload with an encoding this crate does not decode
    pub fn raw(encoding: CertEncoding, data: Vec<u8>) -> Self {
        CertPayload {
            encoding,
            data,
            cert: None,
        }
    }

    /// Certificate encoding
    pub fn encoding(&self) -> CertEncoding {
        self.encoding
    }

    /// Raw certificate data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Decoded certificate, if the message layer produced one
    pub fn cert(&self) -> Option<Arc<Certificate>> {
        self.cert.clone()
    }

    /// SHA-1 hash of a hash-and-URL encoded certificate
    pub fn hash(&self) -> Option<&[u8]> {
        if self.encoding != CertEncoding::X509HashAndUrl || self.data.len() < SHA1_LEN {
            return None;
        }
        Some(&self.data[..SHA1_LEN])
    }

    /// URL of a hash-and-URL encoded certificate
    pub fn url(&self) -> Option<&str> {
        if self.encoding != CertEncoding::X509HashAndUrl || self.data.len() <= SHA1_LEN {
            return None;
        }
        std::str::from_utf8(&self.data[SHA1_LEN..]).ok()
    }
}

/// IKEv2 Certificate Request Payload (RFC 7296 Section 3.7)
///
/// Carries the SHA-1 hashes of the SubjectPublicKeyInfo of each trusted CA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertReqPayload {
    encoding: CertEncoding,
    key_ids: Vec<Vec<u8>>,
}

impl CertReqPayload {
    /// Create empty request for the given encoding
    pub fn new(encoding: CertEncoding) -> Self {
        CertReqPayload {
            encoding,
            key_ids: Vec::new(),
        }
    }

    /// Create empty request for X.509 certificates
    pub fn x509() -> Self {
        Self::new(CertEncoding::X509Signature)
    }

    /// Append a CA key identifier
    pub fn add_key_id(&mut self, key_id: &[u8]) {
        self.key_ids.push(key_id.to_vec());
    }

    /// Builder-style variant of [`CertReqPayload::add_key_id`]
    pub fn with_key_id(mut self, key_id: &[u8]) -> Self {
        self.add_key_id(key_id);
        self
    }

    /// Requested certificate encoding
    pub fn encoding(&self) -> CertEncoding {
        self.encoding
    }

    /// Requested certificate type
    pub fn cert_type(&self) -> CertificateType {
        self.encoding.certificate_type()
    }

    /// Iterate over advertised key identifiers
    pub fn key_ids(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.key_ids.iter().map(Vec::as_slice)
    }

    /// Number of advertised key identifiers
    pub fn len(&self) -> usize {
        self.key_ids.len()
    }

    /// Check if no key identifier has been added
    pub fn is_empty(&self) -> bool {
        self.key_ids.is_empty()
    }
}

/// IKEv1 Certificate Request Payload (RFC 2408 Section 3.10)
///
/// Names at most one certificate authority by its DER encoded subject.
/// An empty authority is legal on the wire and sent by some clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertReqV1Payload {
    encoding: CertEncoding,
    dn: Vec<u8>,
}

impl CertReqV1Payload {
    /// Create request for the given encoding and authority
    pub fn new(encoding: CertEncoding, dn: Vec<u8>) -> Self {
        CertReqV1Payload { encoding, dn }
    }

    /// Create X.509 request naming one authority
    pub fn x509(dn: Vec<u8>) -> Self {
        Self::new(CertEncoding::X509Signature, dn)
    }

    /// Requested certificate encoding
    pub fn encoding(&self) -> CertEncoding {
        self.encoding
    }

    /// Requested certificate type
    pub fn cert_type(&self) -> CertificateType {
        self.encoding.certificate_type()
    }

    /// DER encoded authority, possibly empty
    pub fn dn(&self) -> &[u8] {
        &self.dn
    }

    /// Replace the named authority
    pub fn set_dn(&mut self, dn: &[u8]) {
        self.dn = dn.to_vec();
    }
}
