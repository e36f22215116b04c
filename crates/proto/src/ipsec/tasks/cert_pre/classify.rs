use std::sync::Arc;

use crate::ipsec::{
    credentials::{Certificate, CertificateType, CredentialStore, Identification, KeyType},
    ike::{CertEncoding, CertPayload, IdType},
};

/// Extract the certificate a payload carries or references
///
/// Signature encoded payloads yield their embedded certificate. Hash-and-URL
/// payloads are resolved against certificates the store already knows,
/// trusted or not; nothing is fetched. Other encodings yield nothing.
pub(crate) fn try_get_cert(
    payload: &CertPayload,
    credentials: &dyn CredentialStore,
) -> Option<Arc<Certificate>> {
    match payload.encoding() {
        CertEncoding::X509Signature => payload.cert(),
        CertEncoding::X509HashAndUrl => {
            let id = Identification::from_encoding(IdType::KeyId, payload.hash()?)?;
            credentials.get_cert(CertificateType::X509, KeyType::Any, &id, false)
        }
        _ => None,
    }
}
