//! IKE protocol constants from RFC 7296, RFC 2408 and RFC 2409

/// IKE version 1 header byte (major 1, minor 0)
pub const IKEV1_VERSION: u8 = 0x10;

/// IKE version 2 header byte (major 2, minor 0)
pub const IKEV2_VERSION: u8 = 0x20;

/// Length of a SHA-1 key identifier or hash-and-URL hash
pub const SHA1_LEN: usize = 20;

/// IKE protocol generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IkeVersion {
    /// IKEv1 (RFC 2409)
    V1,
    /// IKEv2 (RFC 7296)
    V2,
}

impl IkeVersion {
    /// Header version byte
    pub fn to_u8(self) -> u8 {
        match self {
            IkeVersion::V1 => IKEV1_VERSION,
            IkeVersion::V2 => IKEV2_VERSION,
        }
    }

    /// Parse from header version byte (major version only)
    pub fn from_u8(value: u8) -> Option<Self> {
        match value >> 4 {
            1 => Some(IkeVersion::V1),
            2 => Some(IkeVersion::V2),
            _ => None,
        }
    }
}

/// Exchange Types (RFC 2408 Section 3.1, RFC 7296 Section 3.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ExchangeType {
    /// IKEv1 Identity Protection, i.e. main mode (2)
    IdProt = 2,
    /// IKEv1 Aggressive mode (4)
    Aggressive = 4,
    /// IKEv1 Informational (5)
    InformationalV1 = 5,
    /// IKEv1 Transaction, XAuth and mode config (6)
    Transaction = 6,
    /// IKEv1 Quick mode (32)
    QuickMode = 32,
    /// IKE_SA_INIT exchange (34)
    IkeSaInit = 34,
    /// IKE_AUTH exchange (35)
    IkeAuth = 35,
    /// CREATE_CHILD_SA exchange (36)
    CreateChildSa = 36,
    /// INFORMATIONAL exchange (37)
    Informational = 37,
}

impl ExchangeType {
    /// Convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            2 => Some(ExchangeType::IdProt),
            4 => Some(ExchangeType::Aggressive),
            5 => Some(ExchangeType::InformationalV1),
            6 => Some(ExchangeType::Transaction),
            32 => Some(ExchangeType::QuickMode),
            34 => Some(ExchangeType::IkeSaInit),
            35 => Some(ExchangeType::IkeAuth),
            36 => Some(ExchangeType::CreateChildSa),
            37 => Some(ExchangeType::Informational),
            _ => None,
        }
    }

    /// Convert to u8
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Protocol generation this exchange belongs to
    pub fn version(self) -> IkeVersion {
        match self {
            ExchangeType::IdProt
            | ExchangeType::Aggressive
            | ExchangeType::InformationalV1
            | ExchangeType::Transaction
            | ExchangeType::QuickMode => IkeVersion::V1,
            ExchangeType::IkeSaInit
            | ExchangeType::IkeAuth
            | ExchangeType::CreateChildSa
            | ExchangeType::Informational => IkeVersion::V2,
        }
    }
}

/// IKE message flags (RFC 7296 Section 3.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IkeFlags(u8);

impl IkeFlags {
    /// Response flag (bit 5)
    pub const RESPONSE: u8 = 0x20;
    /// Version flag (bit 4)
    pub const VERSION: u8 = 0x10;
    /// Initiator flag (bit 3)
    pub const INITIATOR: u8 = 0x08;

    /// Create new flags
    pub fn new(value: u8) -> Self {
        IkeFlags(value & 0x38)
    }

    /// Flags for a request sent by the original initiator or responder
    pub fn request(is_initiator: bool) -> Self {
        if is_initiator {
            IkeFlags(Self::INITIATOR)
        } else {
            IkeFlags(0)
        }
    }

    /// Flags for a response sent by the original initiator or responder
    pub fn response(is_initiator: bool) -> Self {
        let mut flags = Self::RESPONSE;
        if is_initiator {
            flags |= Self::INITIATOR;
        }
        IkeFlags(flags)
    }

    /// Check if this is a response
    pub fn is_response(self) -> bool {
        (self.0 & Self::RESPONSE) != 0
    }

    /// Check if this is from initiator
    pub fn is_initiator(self) -> bool {
        (self.0 & Self::INITIATOR) != 0
    }

    /// Get raw value
    pub fn value(self) -> u8 {
        self.0
    }
}

/// Payload Types (RFC 2408 Section 3.1, RFC 7296 Section 3.2)
///
/// The IKEv1 and IKEv2 number spaces do not overlap, so both generations
/// share one enumeration.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PayloadType {
    /// No next payload (0)
    None = 0,
    /// IKEv1 Security Association (1)
    SAv1 = 1,
    /// IKEv1 Key Exchange (4)
    KEv1 = 4,
    /// IKEv1 Identification (5)
    IDv1 = 5,
    /// IKEv1 Certificate (6)
    CERTv1 = 6,
    /// IKEv1 Certificate Request (7)
    CERTREQv1 = 7,
    /// IKEv1 Hash (8)
    HASHv1 = 8,
    /// IKEv1 Signature (9)
    SIGv1 = 9,
    /// IKEv1 Nonce (10)
    NONCEv1 = 10,
    /// IKEv1 Notification (11)
    Nv1 = 11,
    /// IKEv1 Vendor ID (13)
    Vv1 = 13,
    /// Security Association (33)
    SA = 33,
    /// Key Exchange (34)
    KE = 34,
    /// Identification - Initiator (35)
    IDi = 35,
    /// Identification - Responder (36)
    IDr = 36,
    /// Certificate (37)
    CERT = 37,
    /// Certificate Request (38)
    CERTREQ = 38,
    /// Authentication (39)
    AUTH = 39,
    /// Nonce (40)
    Nonce = 40,
    /// Notify (41)
    N = 41,
    /// Delete (42)
    D = 42,
    /// Vendor ID (43)
    V = 43,
    /// Traffic Selector - Initiator (44)
    TSi = 44,
    /// Traffic Selector - Responder (45)
    TSr = 45,
    /// Encrypted and Authenticated (46)
    SK = 46,
    /// Configuration (47)
    CP = 47,
    /// Extensible Authentication (48)
    EAP = 48,
}

impl PayloadType {
    /// Convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(PayloadType::None),
            1 => Some(PayloadType::SAv1),
            4 => Some(PayloadType::KEv1),
            5 => Some(PayloadType::IDv1),
            6 => Some(PayloadType::CERTv1),
            7 => Some(PayloadType::CERTREQv1),
            8 => Some(PayloadType::HASHv1),
            9 => Some(PayloadType::SIGv1),
            10 => Some(PayloadType::NONCEv1),
            11 => Some(PayloadType::Nv1),
            13 => Some(PayloadType::Vv1),
            33 => Some(PayloadType::SA),
            34 => Some(PayloadType::KE),
            35 => Some(PayloadType::IDi),
            36 => Some(PayloadType::IDr),
            37 => Some(PayloadType::CERT),
            38 => Some(PayloadType::CERTREQ),
            39 => Some(PayloadType::AUTH),
            40 => Some(PayloadType::Nonce),
            41 => Some(PayloadType::N),
            42 => Some(PayloadType::D),
            43 => Some(PayloadType::V),
            44 => Some(PayloadType::TSi),
            45 => Some(PayloadType::TSr),
            46 => Some(PayloadType::SK),
            47 => Some(PayloadType::CP),
            48 => Some(PayloadType::EAP),
            _ => None,
        }
    }

    /// Convert to u8
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

/// Notify Message Types (RFC 7296 Section 3.10.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotifyType {
    /// INVALID_SYNTAX (7)
    InvalidSyntax,
    /// NO_PROPOSAL_CHOSEN (14)
    NoProposalChosen,
    /// AUTHENTICATION_FAILED (24)
    AuthenticationFailed,
    /// INITIAL_CONTACT (16384)
    InitialContact,
    /// NAT_DETECTION_SOURCE_IP (16388)
    NatDetectionSourceIp,
    /// NAT_DETECTION_DESTINATION_IP (16389)
    NatDetectionDestinationIp,
    /// HTTP_CERT_LOOKUP_SUPPORTED (16402)
    HttpCertLookupSupported,
    /// MULTIPLE_AUTH_SUPPORTED (16404, RFC 4739)
    MultipleAuthSupported,
    /// ANOTHER_AUTH_FOLLOWS (16405, RFC 4739)
    AnotherAuthFollows,
    /// Any other notify type
    Other(u16),
}

impl NotifyType {
    /// Convert from u16
    pub fn from_u16(value: u16) -> Self {
        match value {
            7 => NotifyType::InvalidSyntax,
            14 => NotifyType::NoProposalChosen,
            24 => NotifyType::AuthenticationFailed,
            16384 => NotifyType::InitialContact,
            16388 => NotifyType::NatDetectionSourceIp,
            16389 => NotifyType::NatDetectionDestinationIp,
            16402 => NotifyType::HttpCertLookupSupported,
            16404 => NotifyType::MultipleAuthSupported,
            16405 => NotifyType::AnotherAuthFollows,
            other => NotifyType::Other(other),
        }
    }

    /// Convert to u16
    pub fn to_u16(self) -> u16 {
        match self {
            NotifyType::InvalidSyntax => 7,
            NotifyType::NoProposalChosen => 14,
            NotifyType::AuthenticationFailed => 24,
            NotifyType::InitialContact => 16384,
            NotifyType::NatDetectionSourceIp => 16388,
            NotifyType::NatDetectionDestinationIp => 16389,
            NotifyType::HttpCertLookupSupported => 16402,
            NotifyType::MultipleAuthSupported => 16404,
            NotifyType::AnotherAuthFollows => 16405,
            NotifyType::Other(value) => value,
        }
    }

    /// Check if this is an error notification (types below 16384)
    pub fn is_error(self) -> bool {
        self.to_u16() < 16384
    }
}

/// Certificate Encodings (RFC 7296 Section 3.6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CertEncoding {
    /// PKCS #7 wrapped X.509 certificate (1)
    Pkcs7WrappedX509,
    /// PGP certificate (2)
    Pgp,
    /// DNS signed key (3)
    DnsSignedKey,
    /// X.509 certificate - signature (4)
    X509Signature,
    /// Kerberos token (6)
    KerberosToken,
    /// Certificate revocation list (7)
    Crl,
    /// Authority revocation list (8)
    Arl,
    /// SPKI certificate (9)
    Spki,
    /// X.509 certificate - attribute (10)
    X509Attribute,
    /// Raw RSA key (11)
    RawRsaKey,
    /// Hash and URL of X.509 certificate (12)
    X509HashAndUrl,
    /// Hash and URL of X.509 bundle (13)
    X509HashAndUrlBundle,
    /// OCSP content (14, RFC 4806)
    OcspContent,
    /// Unassigned or private encoding
    Other(u8),
}

impl CertEncoding {
    /// Convert from u8
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => CertEncoding::Pkcs7WrappedX509,
            2 => CertEncoding::Pgp,
            3 => CertEncoding::DnsSignedKey,
            4 => CertEncoding::X509Signature,
            6 => CertEncoding::KerberosToken,
            7 => CertEncoding::Crl,
            8 => CertEncoding::Arl,
            9 => CertEncoding::Spki,
            10 => CertEncoding::X509Attribute,
            11 => CertEncoding::RawRsaKey,
            12 => CertEncoding::X509HashAndUrl,
            13 => CertEncoding::X509HashAndUrlBundle,
            14 => CertEncoding::OcspContent,
            other => CertEncoding::Other(other),
        }
    }

    /// Convert to u8
    pub fn to_u8(self) -> u8 {
        match self {
            CertEncoding::Pkcs7WrappedX509 => 1,
            CertEncoding::Pgp => 2,
            CertEncoding::DnsSignedKey => 3,
            CertEncoding::X509Signature => 4,
            CertEncoding::KerberosToken => 6,
            CertEncoding::Crl => 7,
            CertEncoding::Arl => 8,
            CertEncoding::Spki => 9,
            CertEncoding::X509Attribute => 10,
            CertEncoding::RawRsaKey => 11,
            CertEncoding::X509HashAndUrl => 12,
            CertEncoding::X509HashAndUrlBundle => 13,
            CertEncoding::OcspContent => 14,
            CertEncoding::Other(value) => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_type_conversion() {
        assert_eq!(ExchangeType::from_u8(2), Some(ExchangeType::IdProt));
        assert_eq!(ExchangeType::from_u8(4), Some(ExchangeType::Aggressive));
        assert_eq!(ExchangeType::from_u8(34), Some(ExchangeType::IkeSaInit));
        assert_eq!(ExchangeType::from_u8(35), Some(ExchangeType::IkeAuth));
        assert_eq!(ExchangeType::from_u8(99), None);

        assert_eq!(ExchangeType::IdProt.to_u8(), 2);
        assert_eq!(ExchangeType::IkeAuth.to_u8(), 35);
    }

    #[test]
    fn test_exchange_type_version() {
        assert_eq!(ExchangeType::IdProt.version(), IkeVersion::V1);
        assert_eq!(ExchangeType::Aggressive.version(), IkeVersion::V1);
        assert_eq!(ExchangeType::QuickMode.version(), IkeVersion::V1);
        assert_eq!(ExchangeType::IkeSaInit.version(), IkeVersion::V2);
        assert_eq!(ExchangeType::Informational.version(), IkeVersion::V2);
    }

    #[test]
    fn test_ike_version_byte() {
        assert_eq!(IkeVersion::V1.to_u8(), 0x10);
        assert_eq!(IkeVersion::V2.to_u8(), 0x20);
        assert_eq!(IkeVersion::from_u8(0x20), Some(IkeVersion::V2));
        assert_eq!(IkeVersion::from_u8(0x10), Some(IkeVersion::V1));
        assert_eq!(IkeVersion::from_u8(0x30), None);
    }

    #[test]
    fn test_ike_flags() {
        let flags = IkeFlags::request(true);
        assert!(!flags.is_response());
        assert!(flags.is_initiator());

        let flags = IkeFlags::response(false);
        assert!(flags.is_response());
        assert!(!flags.is_initiator());

        assert_eq!(IkeFlags::new(0xFF).value(), 0x38);
    }

    #[test]
    fn test_payload_type_conversion() {
        assert_eq!(PayloadType::from_u8(6), Some(PayloadType::CERTv1));
        assert_eq!(PayloadType::from_u8(7), Some(PayloadType::CERTREQv1));
        assert_eq!(PayloadType::from_u8(37), Some(PayloadType::CERT));
        assert_eq!(PayloadType::from_u8(38), Some(PayloadType::CERTREQ));
        assert_eq!(PayloadType::from_u8(255), None);

        assert_eq!(PayloadType::SAv1.to_u8(), 1);
        assert_eq!(PayloadType::AUTH.to_u8(), 39);
    }

    #[test]
    fn test_notify_type_conversion() {
        assert_eq!(
            NotifyType::from_u16(16402),
            NotifyType::HttpCertLookupSupported
        );
        assert_eq!(NotifyType::from_u16(16405), NotifyType::AnotherAuthFollows);
        assert_eq!(NotifyType::from_u16(40000), NotifyType::Other(40000));
        assert_eq!(NotifyType::AnotherAuthFollows.to_u16(), 16405);

        assert!(NotifyType::AuthenticationFailed.is_error());
        assert!(!NotifyType::HttpCertLookupSupported.is_error());
    }

    #[test]
    fn test_cert_encoding_conversion() {
        for value in 0u8..=255 {
            assert_eq!(CertEncoding::from_u8(value).to_u8(), value);
        }
        assert_eq!(CertEncoding::from_u8(4), CertEncoding::X509Signature);
        assert_eq!(CertEncoding::from_u8(12), CertEncoding::X509HashAndUrl);
        assert_eq!(CertEncoding::from_u8(5), CertEncoding::Other(5));
    }
}
