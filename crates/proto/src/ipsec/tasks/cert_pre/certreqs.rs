use crate::ipsec::{
    credentials::{AuthRule, CertificateType, Identification, KeyType},
    ike::{IdType, IkeMessage, IkePayload, NotifyType},
    logging,
    sa::{Condition, Extension, SaContext},
};

/// Record the CAs the peer asks for as hints in the local auth context
///
/// Also picks up the peer's HTTP_CERT_LOOKUP_SUPPORTED notify. Unknown or
/// malformed requests are logged and counted, never reported as errors.
pub(crate) fn process_certreqs(ctx: &mut SaContext<'_>, message: &IkeMessage) {
    for payload in message.payloads() {
        match payload {
            IkePayload::CERTREQ(req) => {
                if !accept_request(ctx, req.cert_type()) {
                    continue;
                }
                let unknown = req
                    .key_ids()
                    .filter(|key_id| !add_ca_hint(ctx, IdType::KeyId, key_id))
                    .count();
                report_unknown(ctx, unknown);
            }
            IkePayload::CERTREQv1(req) => {
                if !accept_request(ctx, req.cert_type()) {
                    continue;
                }
                // some clients send requests without a DN
                let resolved = !req.dn().is_empty() && add_ca_hint(ctx, IdType::DerAsn1Dn, req.dn());
                report_unknown(ctx, usize::from(!resolved));
            }
            IkePayload::N(notify) if notify.notify_type == NotifyType::HttpCertLookupSupported => {
                logging::log_http_cert_lookup_supported(ctx.sa.id());
                ctx.sa.enable_extension(Extension::HashAndUrl);
            }
            _ => {}
        }
    }
}

fn accept_request(ctx: &mut SaContext<'_>, cert_type: CertificateType) -> bool {
    ctx.sa.set_condition(Condition::CertReqSeen, true);
    ctx.metrics.record_certreq_received();

    if cert_type != CertificateType::X509 {
        logging::log_certreq_type_not_supported(ctx.sa.id(), &format!("{:?}", cert_type));
        return false;
    }
    true
}

fn add_ca_hint(ctx: &mut SaContext<'_>, id_type: IdType, encoding: &[u8]) -> bool {
    let Some(id) = Identification::from_encoding(id_type, encoding) else {
        return false;
    };

    match ctx
        .credentials
        .get_cert(CertificateType::X509, KeyType::Any, &id, true)
    {
        Some(ca) => {
            logging::log_certreq_received(ctx.sa.id(), ca.subject());
            ctx.sa.auth_cfg_mut(true).add_cert(AuthRule::CaCert, ca);
            ctx.metrics.record_ca_hint();
            true
        }
        None => {
            logging::log_certreq_unknown_ca(ctx.sa.id(), encoding);
            false
        }
    }
}

fn report_unknown(ctx: &SaContext<'_>, unknown: usize) {
    if unknown > 0 {
        logging::log_unknown_ca_count(ctx.sa.id(), unknown);
        ctx.metrics.record_unknown_ca(unknown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipsec::{
        config::Settings,
        credentials::CredentialManager,
        ike::{CertEncoding, CertReqPayload, CertReqV1Payload, ExchangeType, IkeVersion},
        tasks::cert_pre::fixtures::{ca_cert, dn, ike_sa, manager},
    };

    #[test]
    fn test_key_ids_resolved_and_unknown() {
        let creds = CredentialManager::new();
        let root = creds.add_cert(ca_cert("Root CA", 1), true);
        let sub = creds.add_cert(ca_cert("Sub CA", 2), true);
        let mut manager = manager(creds, Settings::default());
        let id = ike_sa(&mut manager, IkeVersion::V2, false, None);

        let req = CertReqPayload::x509()
            .with_key_id(&root.pubkey_info_sha1().unwrap())
            .with_key_id(&[0x99; 20])
            .with_key_id(&sub.pubkey_info_sha1().unwrap());
        let mut message = IkeMessage::request(IkeVersion::V2, ExchangeType::IkeAuth, 1, true);
        message.add_payload(IkePayload::CERTREQ(req));

        process_certreqs(&mut manager.context(id).unwrap(), &message);

        let sa = manager.get(id).unwrap();
        let hints: Vec<_> = sa.auth_cfg(true).certs(AuthRule::CaCert).cloned().collect();
        assert_eq!(hints, vec![root, sub]);
        assert!(sa.auth_cfg(false).is_empty());
        assert!(sa.has_condition(Condition::CertReqSeen));

        let snapshot = manager.metrics().snapshot();
        assert_eq!(snapshot.ca_hints, 2);
        assert_eq!(snapshot.unknown_ca, 1);
        assert_eq!(snapshot.certreqs_received, 1);
    }

    #[test]
    fn test_untrusted_ca_not_hinted() {
        let creds = CredentialManager::new();
        let cached = creds.add_cert(ca_cert("Cached CA", 3), false);
        let mut manager = manager(creds, Settings::default());
        let id = ike_sa(&mut manager, IkeVersion::V2, false, None);

        let mut message = IkeMessage::request(IkeVersion::V2, ExchangeType::IkeAuth, 1, true);
        message.add_payload(IkePayload::CERTREQ(
            CertReqPayload::x509().with_key_id(&cached.pubkey_info_sha1().unwrap()),
        ));

        process_certreqs(&mut manager.context(id).unwrap(), &message);

        assert_eq!(manager.get(id).unwrap().auth_cfg(true).count(AuthRule::CaCert), 0);
        assert_eq!(manager.metrics().snapshot().unknown_ca, 1);
    }

    #[test]
    fn test_unsupported_cert_type() {
        let creds = CredentialManager::new();
        let root = creds.add_cert(ca_cert("Root CA", 1), true);
        let mut manager = manager(creds, Settings::default());
        let id = ike_sa(&mut manager, IkeVersion::V2, false, None);

        let req = CertReqPayload::new(CertEncoding::Pgp).with_key_id(&root.pubkey_info_sha1().unwrap());
        let mut message = IkeMessage::request(IkeVersion::V2, ExchangeType::IkeAuth, 1, true);
        message.add_payload(IkePayload::CERTREQ(req));

        process_certreqs(&mut manager.context(id).unwrap(), &message);

        let sa = manager.get(id).unwrap();
        assert!(sa.auth_cfg(true).is_empty());
        // still counts as a seen request
        assert!(sa.has_condition(Condition::CertReqSeen));
        assert_eq!(manager.metrics().snapshot().unknown_ca, 0);
    }

    #[test]
    fn test_legacy_dn_request() {
        let creds = CredentialManager::new();
        let root = creds.add_cert(ca_cert("Root CA", 1), true);
        let mut manager = manager(creds, Settings::default());
        let id = ike_sa(&mut manager, IkeVersion::V1, false, None);

        let mut message = IkeMessage::request(IkeVersion::V1, ExchangeType::IdProt, 0, true);
        message.add_payload(IkePayload::CERTREQv1(CertReqV1Payload::x509(dn("Root CA"))));
        message.add_payload(IkePayload::CERTREQv1(CertReqV1Payload::x509(dn("Other CA"))));

        process_certreqs(&mut manager.context(id).unwrap(), &message);

        let hints: Vec<_> = manager
            .get(id)
            .unwrap()
            .auth_cfg(true)
            .certs(AuthRule::CaCert)
            .cloned()
            .collect();
        assert_eq!(hints, vec![root]);
        assert_eq!(manager.metrics().snapshot().unknown_ca, 1);
    }

    #[test]
    fn test_legacy_empty_dn_counted() {
        let creds = CredentialManager::new();
        creds.add_cert(ca_cert("Root CA", 1), true);
        let mut manager = manager(creds, Settings::default());
        let id = ike_sa(&mut manager, IkeVersion::V1, false, None);

        let mut message = IkeMessage::request(IkeVersion::V1, ExchangeType::IdProt, 0, true);
        message.add_payload(IkePayload::CERTREQv1(CertReqV1Payload::x509(Vec::new())));

        process_certreqs(&mut manager.context(id).unwrap(), &message);

        let sa = manager.get(id).unwrap();
        assert!(sa.auth_cfg(true).is_empty());
        assert!(sa.has_condition(Condition::CertReqSeen));
        assert_eq!(manager.metrics().snapshot().unknown_ca, 1);
    }

    #[test]
    fn test_http_cert_lookup_notify() {
        let mut manager = manager(CredentialManager::new(), Settings::default());
        let id = ike_sa(&mut manager, IkeVersion::V2, true, None);

        let mut message = IkeMessage::response(IkeVersion::V2, ExchangeType::IkeSaInit, 0, false);
        message.add_notify(NotifyType::MultipleAuthSupported, Vec::new());
        process_certreqs(&mut manager.context(id).unwrap(), &message);
        assert!(!manager.get(id).unwrap().supports_extension(Extension::HashAndUrl));

        message.add_notify(NotifyType::HttpCertLookupSupported, Vec::new());
        process_certreqs(&mut manager.context(id).unwrap(), &message);

        let sa = manager.get(id).unwrap();
        assert!(sa.supports_extension(Extension::HashAndUrl));
        assert!(!sa.has_condition(Condition::CertReqSeen));
    }
}
