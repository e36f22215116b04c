use crate::ipsec::{
    credentials::{AuthRule, Certificate, CertificateType, KeyType},
    ike::{CertReqPayload, CertReqV1Payload, IkeMessage, IkePayload, NotifyType},
    logging,
    sa::{IkeSaId, SaContext},
};

/// Shape of outgoing certificate requests, fixed by protocol generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RequestFormat {
    /// One CERTREQ carrying the key identifiers of all requested CAs
    KeyIds,
    /// One CR per requested CA, each naming it by DN
    DistinguishedName,
}

/// Add certificate requests for the CAs we trust to an outgoing message
///
/// CAs required by the peer config are preferred; without any, every
/// trusted CA is requested. Returns `true` if hash-and-URL support was
/// advertised along with the requests.
pub(crate) fn build_certreqs(
    ctx: &mut SaContext<'_>,
    message: &mut IkeMessage,
    format: RequestFormat,
) -> bool {
    if !ctx.sa.ike_cfg().send_certreq {
        return false;
    }
    match format {
        RequestFormat::KeyIds => build_key_id_request(ctx, message),
        RequestFormat::DistinguishedName => {
            build_dn_requests(ctx, message);
            false
        }
    }
}

fn build_key_id_request(ctx: &mut SaContext<'_>, message: &mut IkeMessage) -> bool {
    let id = ctx.sa.id();
    let mut req: Option<CertReqPayload> = None;

    if let Some(peer_cfg) = ctx.sa.peer_cfg() {
        for auth in peer_cfg.auth_cfgs(false) {
            for ca in auth.certs(AuthRule::CaCert) {
                add_key_id(id, &mut req, ca);
            }
        }
    }
    if req.is_none() {
        for cert in trusted_certs(ctx) {
            add_key_id(id, &mut req, &cert);
        }
    }

    let Some(req) = req else {
        return false;
    };
    message.add_payload(IkePayload::CERTREQ(req));
    ctx.metrics.record_certreq_sent();

    if ctx.settings.hash_and_url {
        message.add_notify(NotifyType::HttpCertLookupSupported, Vec::new());
        return true;
    }
    false
}

fn add_key_id(id: IkeSaId, req: &mut Option<CertReqPayload>, cert: &Certificate) {
    if !cert.is_ca() {
        return;
    }
    let Some(key_id) = cert.pubkey_info_sha1() else {
        return;
    };
    req.get_or_insert_with(CertReqPayload::x509).add_key_id(&key_id);
    logging::log_certreq_sent(id, cert.subject());
}

fn build_dn_requests(ctx: &mut SaContext<'_>, message: &mut IkeMessage) {
    let id = ctx.sa.id();
    let mut sent = 0;

    // a CR names a single CA, only the first round's constraints apply
    if let Some(auth) = ctx.sa.peer_cfg().and_then(|peer_cfg| peer_cfg.auth_cfgs(false).first()) {
        for ca in auth.certs(AuthRule::CaCert) {
            if add_dn_request(id, message, ca) {
                sent += 1;
            }
        }
    }
    if sent == 0 {
        for cert in trusted_certs(ctx) {
            if add_dn_request(id, message, &cert) {
                sent += 1;
            }
        }
    }

    for _ in 0..sent {
        ctx.metrics.record_certreq_sent();
    }
}

fn add_dn_request(id: IkeSaId, message: &mut IkeMessage, cert: &Certificate) -> bool {
    if !cert.is_ca() || cert.public_key_info().is_none() {
        return false;
    }
    message.add_payload(IkePayload::CERTREQv1(CertReqV1Payload::x509(
        cert.subject_dn().to_vec(),
    )));
    logging::log_certreq_sent(id, cert.subject());
    true
}

fn trusted_certs(ctx: &SaContext<'_>) -> Vec<std::sync::Arc<Certificate>> {
    ctx.credentials
        .certs(CertificateType::Any, KeyType::Any, None, true)
}
