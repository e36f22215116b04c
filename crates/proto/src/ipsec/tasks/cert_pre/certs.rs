use std::sync::Arc;

use super::classify::try_get_cert;
use crate::ipsec::{
    credentials::{AuthRule, Certificate},
    ike::{CertEncoding, CertPayload, IkeMessage, IkePayload},
    logging,
    sa::SaContext,
};

/// Import the peer's certificates into the remote auth context
///
/// The first certificate of a message is the peer's end-entity certificate;
/// any following ones are intermediates. Hash-and-URL payloads are only
/// accepted if `accept_hash_url` is set; references that can't be resolved
/// from the store are recorded as URLs for the authentication task.
pub(crate) fn process_certs(ctx: &mut SaContext<'_>, message: &IkeMessage, accept_hash_url: bool) {
    let mut first = true;

    for payload in message.payloads() {
        let cert_payload = match payload {
            IkePayload::CERT(cert_payload) | IkePayload::CERTv1(cert_payload) => cert_payload,
            _ => continue,
        };

        match cert_payload.encoding() {
            CertEncoding::X509HashAndUrl if !accept_hash_url => {
                logging::log_hash_url_rejected(ctx.sa.id());
                ctx.metrics.record_hash_url_rejected();
            }
            CertEncoding::X509Signature | CertEncoding::X509HashAndUrl => {
                if import_cert(ctx, cert_payload, first) {
                    first = false;
                }
            }
            CertEncoding::Crl => {
                if let Some(crl) = cert_payload.cert() {
                    logging::log_crl_received(ctx.sa.id(), crl.subject());
                    ctx.sa.auth_cfg_mut(false).add_cert(AuthRule::RevocationCert, crl);
                    ctx.metrics.record_crl_received();
                }
            }
            CertEncoding::Pkcs7WrappedX509
            | CertEncoding::Pgp
            | CertEncoding::DnsSignedKey
            | CertEncoding::KerberosToken
            | CertEncoding::Arl
            | CertEncoding::Spki
            | CertEncoding::X509Attribute
            | CertEncoding::RawRsaKey
            | CertEncoding::X509HashAndUrlBundle
            | CertEncoding::OcspContent
            | CertEncoding::Other(_) => {
                logging::log_encoding_not_supported(ctx.sa.id(), cert_payload.encoding().to_u8());
                ctx.metrics.record_unsupported_encoding();
            }
        }
    }
}

/// Record one signature or hash-and-URL payload, returns whether anything
/// was added
fn import_cert(ctx: &mut SaContext<'_>, payload: &CertPayload, end_entity: bool) -> bool {
    if let Some(cert) = try_get_cert(payload, ctx.credentials) {
        add_cert(ctx, cert, end_entity);
        return true;
    }
    if payload.encoding() != CertEncoding::X509HashAndUrl {
        return false;
    }

    // fetched later, and only if authentication needs it
    let Some(url) = payload.url() else {
        logging::log_hash_url_invalid(ctx.sa.id());
        return false;
    };
    let rule = if end_entity {
        AuthRule::SubjectHashUrl
    } else {
        AuthRule::ImHashUrl
    };
    logging::log_hash_url_received(ctx.sa.id(), url, end_entity);
    ctx.sa.auth_cfg_mut(false).add_url(rule, url);
    ctx.metrics.record_hash_url_deferred();
    true
}

fn add_cert(ctx: &mut SaContext<'_>, cert: Arc<Certificate>, end_entity: bool) {
    let rule = if end_entity {
        AuthRule::SubjectCert
    } else {
        AuthRule::ImCert
    };
    logging::log_cert_received(ctx.sa.id(), cert.subject(), end_entity);
    ctx.sa.auth_cfg_mut(false).add_cert(rule, cert);
    ctx.metrics.record_cert_received(end_entity);
}
