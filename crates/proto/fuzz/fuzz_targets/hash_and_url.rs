//! Fuzz target for hash-and-URL certificate payloads.
//!
//! Feeds arbitrary payload bodies through the certificate pre-exchange of an
//! IKEv2 responder that advertised hash-and-URL support. Malformed input must
//! be ignored, never panic.
//!
//! Run with:
//! ```bash
//! cd crates/proto
//! cargo +nightly fuzz run hash_and_url -- -max_total_time=300
//! ```

#![no_main]
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;
use warden_platform::Task;
use warden_proto::ipsec::{
    config::{IkeConfig, Settings},
    credentials::{Certificate, CredentialManager},
    ike::{CertEncoding, CertPayload, ExchangeType, IkeMessage, IkePayload, IkeVersion},
    sa::IkeSaManager,
    tasks::cert_pre::CertPreTask,
};

fuzz_target!(|data: &[u8]| {
    let creds = CredentialManager::new();
    creds.add_cert(
        Certificate::x509("CN=Fuzz CA", vec![0x30, 0x00], vec![0x30, 0x01])
            .with_ca()
            .with_public_key_info(vec![0x30, 0x02]),
        true,
    );
    let mut manager = IkeSaManager::new(
        Arc::new(creds),
        Settings::builder().with_hash_and_url(true).build(),
    );
    let ike_cfg = IkeConfig::builder().build().expect("default config is valid");
    let sa = manager.create(IkeVersion::V2, false, Arc::new(ike_cfg), None);
    let mut task = CertPreTask::new(&manager, sa, false).expect("SA was just created");

    let mut response = IkeMessage::response(IkeVersion::V2, ExchangeType::IkeSaInit, 0, false);
    task.build(&mut manager, &mut response).expect("responder builds");
    assert!(task.accepts_hash_and_url());

    let mut request = IkeMessage::request(IkeVersion::V2, ExchangeType::IkeAuth, 1, true);
    request.add_payload(IkePayload::CERT(CertPayload::raw(
        CertEncoding::X509HashAndUrl,
        data.to_vec(),
    )));
    task.process(&mut manager, &request).expect("processing never fails");

    // at most one deferred or resolved entry per payload
    let sa = manager.get(sa).expect("SA still exists");
    assert!(sa.auth_cfg(false).len() <= 1);
});
