//! Shared builders for the unit tests of this task

use std::sync::Arc;

use crate::ipsec::{
    config::{IkeConfig, PeerConfig, Settings},
    credentials::{Certificate, CredentialManager},
    ike::IkeVersion,
    sa::{IkeSaId, IkeSaManager},
};

/// DER-like subject encoding, unique per name
pub(crate) fn dn(name: &str) -> Vec<u8> {
    let mut der = vec![0x30, name.len() as u8];
    der.extend_from_slice(name.as_bytes());
    der
}

pub(crate) fn ca_cert(name: &str, seed: u8) -> Certificate {
    Certificate::x509(format!("C=CH, O=Example, CN={}", name), dn(name), vec![0x30, 0x82, seed, 0x01])
        .with_ca()
        .with_public_key_info(vec![0x30, 0x59, seed])
}

pub(crate) fn ee_cert(name: &str, seed: u8) -> Certificate {
    Certificate::x509(format!("C=CH, O=Example, CN={}", name), dn(name), vec![0x30, 0x82, seed, 0x02])
        .with_public_key_info(vec![0x30, 0x2a, seed])
}

pub(crate) fn manager(creds: CredentialManager, settings: Settings) -> IkeSaManager {
    IkeSaManager::new(Arc::new(creds), settings)
}

pub(crate) fn ike_sa(
    manager: &mut IkeSaManager,
    version: IkeVersion,
    initiator: bool,
    peer_cfg: Option<PeerConfig>,
) -> IkeSaId {
    let ike_cfg = Arc::new(IkeConfig::builder().build().unwrap());
    manager.create(version, initiator, ike_cfg, peer_cfg.map(Arc::new))
}
