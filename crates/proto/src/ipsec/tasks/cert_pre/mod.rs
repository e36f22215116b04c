//! Certificate pre-exchange task
//!
//! Runs ahead of authentication on every IKE SA and handles the certificate
//! payloads of the exchange:
//!
//! - received CERTREQ/CR payloads become CA hints in the local auth context,
//!   consulted when we pick the certificate chain to send
//! - received CERT payloads become end-entity, intermediate, CRL or deferred
//!   hash-and-URL entries in the remote auth context
//! - outgoing messages get CERTREQ/CR payloads for the CAs we trust
//!
//! # Message flow
//!
//! ```text
//! IKEv2                                    IKEv1 main mode (responder)
//!
//! Initiator              Responder         Initiator              Responder
//!   IKE_SA_INIT ───────────▶                 SA ────────────────────▶ auth method
//!               ◀─────────── CERTREQ                                 ◀──────────── SA
//!   IKE_AUTH, CERTREQ ─────▶                 KE ────────────────────▶ CR
//!   [CERT]                                                           ◀──────────── KE, CR
//!               ◀─────────── [CERT], AUTH    ID, CERT, SIG ─────────▶ certs (final)
//! ```
//!
//! The IKEv1 initiator direction is not supported and fails the task.

mod certreqs;
mod certs;
mod classify;
#[cfg(test)]
pub(crate) mod fixtures;
mod legacy;
mod request;

pub use legacy::CertPreState;

use warden_platform::{Task, TaskStatus, WardenResult};

use self::request::RequestFormat;
use crate::ipsec::{
    ike::{ExchangeType, IkeMessage, IkeVersion, NotifyType, PayloadType},
    logging,
    sa::{IkeSaId, IkeSaManager, SaContext},
    tasks::TaskType,
    Error, Result,
};

/// Role and generation specific behaviour, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flavor {
    Initiator,
    Responder,
    LegacyInitiator,
    LegacyResponder(CertPreState),
}

/// Certificate pre-exchange task of one IKE SA
#[derive(Debug)]
pub struct CertPreTask {
    ike_sa: IkeSaId,
    initiator: bool,
    /// We advertised hash-and-URL support and accept such payloads
    do_http_lookup: bool,
    final_round: bool,
    flavor: Flavor,
    request_format: RequestFormat,
}

impl CertPreTask {
    /// Create the task for an IKE SA
    ///
    /// # Errors
    ///
    /// Returns [`Error::SaNotFound`] if `ike_sa` does not exist.
    pub fn new(manager: &IkeSaManager, ike_sa: IkeSaId, initiator: bool) -> Result<Self> {
        let version = manager.checkout(ike_sa)?.version();
        let (flavor, request_format) = match (version, initiator) {
            (IkeVersion::V2, true) => (Flavor::Initiator, RequestFormat::KeyIds),
            (IkeVersion::V2, false) => (Flavor::Responder, RequestFormat::KeyIds),
            (IkeVersion::V1, true) => (Flavor::LegacyInitiator, RequestFormat::DistinguishedName),
            (IkeVersion::V1, false) => (
                Flavor::LegacyResponder(CertPreState::Init),
                RequestFormat::DistinguishedName,
            ),
        };

        Ok(CertPreTask {
            ike_sa,
            initiator,
            do_http_lookup: false,
            final_round: false,
            flavor,
            request_format,
        })
    }

    /// IKE SA this task works for
    pub fn ike_sa(&self) -> IkeSaId {
        self.ike_sa
    }

    /// Check if we are the initiator
    pub fn is_initiator(&self) -> bool {
        self.initiator
    }

    /// Check if the final authentication round has been seen
    pub fn is_final(&self) -> bool {
        self.final_round
    }

    /// Check if hash-and-URL encoded certificates are accepted
    pub fn accepts_hash_and_url(&self) -> bool {
        self.do_http_lookup
    }

    /// IKEv1 exchange state, `None` for IKEv2
    pub fn state(&self) -> Option<CertPreState> {
        match self.flavor {
            Flavor::Initiator | Flavor::Responder => None,
            Flavor::LegacyInitiator => Some(CertPreState::Init),
            Flavor::LegacyResponder(state) => Some(state),
        }
    }

    fn build_certreqs(&mut self, ctx: &mut SaContext<'_>, message: &mut IkeMessage) {
        if request::build_certreqs(ctx, message, self.request_format) {
            self.do_http_lookup = true;
        }
    }

    fn build_i(&mut self, manager: &mut IkeSaManager, message: &mut IkeMessage) -> Result<TaskStatus> {
        let mut ctx = manager.context(self.ike_sa)?;
        // requests go out with the first IKE_AUTH
        if message.message_id() == 1 {
            self.build_certreqs(&mut ctx, message);
        }
        Ok(TaskStatus::NeedMore)
    }

    fn process_i(&mut self, manager: &mut IkeSaManager, message: &IkeMessage) -> Result<TaskStatus> {
        let mut ctx = manager.context(self.ike_sa)?;
        if message.exchange_type() == ExchangeType::IkeSaInit {
            certreqs::process_certreqs(&mut ctx, message);
        }
        certs::process_certs(&mut ctx, message, self.do_http_lookup);

        self.final_round = is_final_auth_round(message);
        Ok(completion(self.final_round))
    }

    fn process_r(&mut self, manager: &mut IkeSaManager, message: &IkeMessage) -> Result<TaskStatus> {
        let mut ctx = manager.context(self.ike_sa)?;
        if message.exchange_type() != ExchangeType::IkeSaInit {
            certreqs::process_certreqs(&mut ctx, message);
            certs::process_certs(&mut ctx, message, self.do_http_lookup);
        }
        self.final_round = is_final_auth_round(message);
        Ok(TaskStatus::NeedMore)
    }

    fn build_r(&mut self, manager: &mut IkeSaManager, message: &mut IkeMessage) -> Result<TaskStatus> {
        let mut ctx = manager.context(self.ike_sa)?;
        if message.exchange_type() == ExchangeType::IkeSaInit {
            self.build_certreqs(&mut ctx, message);
        }
        Ok(completion(self.final_round))
    }

    fn process_r_v1(
        &mut self,
        manager: &mut IkeSaManager,
        message: &IkeMessage,
        state: CertPreState,
    ) -> Result<TaskStatus> {
        let mut ctx = manager.context(self.ike_sa)?;

        let requires_certs = legacy::check_auth_method(message).map(|(method, requires_certs)| {
            logging::log_auth_method(self.ike_sa, method, requires_certs);
            requires_certs
        });
        let (next, round) = state.on_message(message.exchange_type(), requires_certs);

        if round.certreqs {
            certreqs::process_certreqs(&mut ctx, message);
        }
        if round.certs {
            certs::process_certs(&mut ctx, message, self.do_http_lookup);
        }
        if round.final_round {
            self.final_round = true;
        }
        if next != state {
            logging::log_cert_pre_state_transition(self.ike_sa, state.name(), next.name());
        }
        self.flavor = Flavor::LegacyResponder(next);
        Ok(TaskStatus::NeedMore)
    }

    fn build_r_v1(
        &mut self,
        manager: &mut IkeSaManager,
        message: &mut IkeMessage,
        state: CertPreState,
    ) -> Result<TaskStatus> {
        let mut ctx = manager.context(self.ike_sa)?;
        if state.sends_requests(message.exchange_type()) {
            self.build_certreqs(&mut ctx, message);
        }
        Ok(completion(self.final_round))
    }
}

impl Task for CertPreTask {
    type Context = IkeSaManager;
    type Message = IkeMessage;
    type Handle = IkeSaId;
    type Kind = TaskType;

    fn build(&mut self, manager: &mut IkeSaManager, message: &mut IkeMessage) -> WardenResult<TaskStatus> {
        let status = match self.flavor {
            Flavor::Initiator => self.build_i(manager, message),
            Flavor::Responder => self.build_r(manager, message),
            Flavor::LegacyInitiator => Err(legacy_initiator_unsupported()),
            Flavor::LegacyResponder(state) => self.build_r_v1(manager, message, state),
        }?;
        Ok(status)
    }

    fn process(&mut self, manager: &mut IkeSaManager, message: &IkeMessage) -> WardenResult<TaskStatus> {
        let status = match self.flavor {
            Flavor::Initiator => self.process_i(manager, message),
            Flavor::Responder => self.process_r(manager, message),
            Flavor::LegacyInitiator => Err(legacy_initiator_unsupported()),
            Flavor::LegacyResponder(state) => self.process_r_v1(manager, message, state),
        }?;
        Ok(status)
    }

    fn kind(&self) -> TaskType {
        TaskType::IkeCertPre
    }

    fn migrate(&mut self, ike_sa: IkeSaId) {
        self.ike_sa = ike_sa;
    }
}

/// Check if a message completes authentication
///
/// That is the case if it carries an AUTH payload and no
/// ANOTHER_AUTH_FOLLOWS notify (RFC 4739).
pub fn is_final_auth_round(message: &IkeMessage) -> bool {
    message.payload(PayloadType::AUTH).is_some()
        && message.notify(NotifyType::AnotherAuthFollows).is_none()
}

fn completion(final_round: bool) -> TaskStatus {
    if final_round {
        TaskStatus::Success
    } else {
        TaskStatus::NeedMore
    }
}

fn legacy_initiator_unsupported() -> Error {
    Error::NotImplemented("IKEv1 certificate pre-exchange as initiator".into())
}

#[cfg(test)]
mod tests {
    use super::fixtures::{ca_cert, dn, ee_cert, ike_sa, manager};
    use super::*;
    use crate::ipsec::{
        config::Settings,
        credentials::{AuthRule, CredentialManager},
        ike::{
            AuthMethod, AuthMethodV1, AuthPayload, CertPayload, CertReqPayload, CertReqV1Payload,
            IkePayload, SaV1Payload,
        },
    };
    use std::sync::Arc;
    use warden_platform::WardenError;

    fn auth_payload() -> IkePayload {
        IkePayload::AUTH(AuthPayload::new(AuthMethod::RsaSig, vec![0xA5; 16]))
    }

    fn sa_payload(method: AuthMethodV1) -> IkePayload {
        IkePayload::SAv1(SaV1Payload::new(method))
    }

    #[test]
    fn test_final_auth_round() {
        let mut message = IkeMessage::response(IkeVersion::V2, ExchangeType::IkeAuth, 1, false);
        assert!(!is_final_auth_round(&message));

        message.add_payload(auth_payload());
        assert!(is_final_auth_round(&message));

        message.add_notify(NotifyType::AnotherAuthFollows, Vec::new());
        assert!(!is_final_auth_round(&message));
    }

    #[test]
    fn test_flavor_selection() {
        let mut manager = manager(CredentialManager::new(), Settings::default());
        let v2 = ike_sa(&mut manager, IkeVersion::V2, true, None);
        let v1 = ike_sa(&mut manager, IkeVersion::V1, false, None);

        let task = CertPreTask::new(&manager, v2, true).unwrap();
        assert_eq!(task.state(), None);
        assert_eq!(task.kind(), TaskType::IkeCertPre);
        assert!(task.is_initiator());
        assert!(!task.is_final());
        assert!(!task.accepts_hash_and_url());

        let task = CertPreTask::new(&manager, v1, false).unwrap();
        assert_eq!(task.state(), Some(CertPreState::Init));
        assert_eq!(task.ike_sa(), v1);

        assert!(matches!(
            CertPreTask::new(&manager, IkeSaId::new(42), true),
            Err(Error::SaNotFound(42))
        ));
    }

    #[test]
    fn test_v2_responder_flow() {
        let creds = CredentialManager::new();
        let root = creds.add_cert(ca_cert("Root CA", 1), true);
        let mut manager = manager(creds, Settings::builder().with_hash_and_url(true).build());
        let id = ike_sa(&mut manager, IkeVersion::V2, false, None);
        let mut task = CertPreTask::new(&manager, id, false).unwrap();

        // IKE_SA_INIT: requests are ignored, ours are sent
        let mut request = IkeMessage::request(IkeVersion::V2, ExchangeType::IkeSaInit, 0, true);
        request.add_payload(IkePayload::CERTREQ(
            CertReqPayload::x509().with_key_id(&root.pubkey_info_sha1().unwrap()),
        ));
        assert_eq!(task.process(&mut manager, &request).unwrap(), TaskStatus::NeedMore);
        assert!(manager.get(id).unwrap().auth_cfg(true).is_empty());

        let mut response = IkeMessage::response(IkeVersion::V2, ExchangeType::IkeSaInit, 0, false);
        assert_eq!(task.build(&mut manager, &mut response).unwrap(), TaskStatus::NeedMore);
        assert!(response.payload(PayloadType::CERTREQ).is_some());
        assert!(response.notify(NotifyType::HttpCertLookupSupported).is_some());
        assert!(task.accepts_hash_and_url());

        // IKE_AUTH with the initiator's certificate and final AUTH
        let ee = Arc::new(ee_cert("carol", 2));
        let mut request = IkeMessage::request(IkeVersion::V2, ExchangeType::IkeAuth, 1, true);
        request.add_payload(IkePayload::CERT(CertPayload::x509(ee.clone())));
        request.add_payload(IkePayload::CERTREQ(
            CertReqPayload::x509().with_key_id(&root.pubkey_info_sha1().unwrap()),
        ));
        request.add_payload(auth_payload());
        assert_eq!(task.process(&mut manager, &request).unwrap(), TaskStatus::NeedMore);
        assert!(task.is_final());

        let sa = manager.get(id).unwrap();
        assert_eq!(sa.auth_cfg(true).certs(AuthRule::CaCert).next(), Some(&root));
        assert_eq!(sa.auth_cfg(false).certs(AuthRule::SubjectCert).next(), Some(&ee));

        let mut response = IkeMessage::response(IkeVersion::V2, ExchangeType::IkeAuth, 1, false);
        assert_eq!(task.build(&mut manager, &mut response).unwrap(), TaskStatus::Success);
        assert!(response.payloads().is_empty());
    }

    #[test]
    fn test_v2_initiator_flow() {
        let creds = CredentialManager::new();
        let root = creds.add_cert(ca_cert("Root CA", 1), true);
        let mut manager = manager(creds, Settings::default());
        let id = ike_sa(&mut manager, IkeVersion::V2, true, None);
        let mut task = CertPreTask::new(&manager, id, true).unwrap();

        // nothing in IKE_SA_INIT
        let mut request = IkeMessage::request(IkeVersion::V2, ExchangeType::IkeSaInit, 0, true);
        assert_eq!(task.build(&mut manager, &mut request).unwrap(), TaskStatus::NeedMore);
        assert!(request.payloads().is_empty());

        let mut response = IkeMessage::response(IkeVersion::V2, ExchangeType::IkeSaInit, 0, false);
        response.add_payload(IkePayload::CERTREQ(
            CertReqPayload::x509().with_key_id(&root.pubkey_info_sha1().unwrap()),
        ));
        assert_eq!(task.process(&mut manager, &response).unwrap(), TaskStatus::NeedMore);
        assert_eq!(manager.get(id).unwrap().auth_cfg(true).count(AuthRule::CaCert), 1);

        let mut request = IkeMessage::request(IkeVersion::V2, ExchangeType::IkeAuth, 1, true);
        assert_eq!(task.build(&mut manager, &mut request).unwrap(), TaskStatus::NeedMore);
        assert!(request.payload(PayloadType::CERTREQ).is_some());
        assert!(!task.accepts_hash_and_url());

        // intermediate round of multiple authentication
        let mut response = IkeMessage::response(IkeVersion::V2, ExchangeType::IkeAuth, 1, false);
        response.add_payload(auth_payload());
        response.add_notify(NotifyType::AnotherAuthFollows, Vec::new());
        assert_eq!(task.process(&mut manager, &response).unwrap(), TaskStatus::NeedMore);

        let mut response = IkeMessage::response(IkeVersion::V2, ExchangeType::IkeAuth, 2, false);
        response.add_payload(IkePayload::CERT(CertPayload::x509(Arc::new(ee_cert("moon", 3)))));
        response.add_payload(auth_payload());
        assert_eq!(task.process(&mut manager, &response).unwrap(), TaskStatus::Success);
        assert_eq!(manager.get(id).unwrap().auth_cfg(false).count(AuthRule::SubjectCert), 1);
    }

    #[test]
    fn test_v1_main_mode_responder() {
        let creds = CredentialManager::new();
        let root = creds.add_cert(ca_cert("Root CA", 1), true);
        let mut manager = manager(creds, Settings::default());
        let id = ike_sa(&mut manager, IkeVersion::V1, false, None);
        let mut task = CertPreTask::new(&manager, id, false).unwrap();

        // SA
        let mut message = IkeMessage::request(IkeVersion::V1, ExchangeType::IdProt, 0, true);
        message.add_payload(sa_payload(AuthMethodV1::RsaSig));
        assert_eq!(task.process(&mut manager, &message).unwrap(), TaskStatus::NeedMore);
        assert_eq!(task.state(), Some(CertPreState::SaSeen));

        let mut reply = IkeMessage::response(IkeVersion::V1, ExchangeType::IdProt, 0, false);
        assert_eq!(task.build(&mut manager, &mut reply).unwrap(), TaskStatus::NeedMore);
        assert!(reply.payloads().is_empty());

        // KE with a CR
        let mut message = IkeMessage::request(IkeVersion::V1, ExchangeType::IdProt, 0, true);
        message.add_payload(IkePayload::CERTREQv1(CertReqV1Payload::x509(dn("Root CA"))));
        task.process(&mut manager, &message).unwrap();
        assert_eq!(task.state(), Some(CertPreState::SaSeenPost));
        assert_eq!(
            manager.get(id).unwrap().auth_cfg(true).certs(AuthRule::CaCert).next(),
            Some(&root)
        );

        let mut reply = IkeMessage::response(IkeVersion::V1, ExchangeType::IdProt, 0, false);
        assert_eq!(task.build(&mut manager, &mut reply).unwrap(), TaskStatus::NeedMore);
        assert_eq!(reply.payloads_of(PayloadType::CERTREQv1).count(), 1);

        // ID, CERT, SIG
        let ee = Arc::new(ee_cert("carol", 2));
        let mut message = IkeMessage::request(IkeVersion::V1, ExchangeType::IdProt, 0, true);
        message.add_payload(IkePayload::CERTv1(CertPayload::x509(ee.clone())));
        assert_eq!(task.process(&mut manager, &message).unwrap(), TaskStatus::NeedMore);
        assert_eq!(task.state(), Some(CertPreState::RequestSent));
        assert!(task.is_final());
        assert_eq!(
            manager.get(id).unwrap().auth_cfg(false).certs(AuthRule::SubjectCert).next(),
            Some(&ee)
        );

        let mut reply = IkeMessage::response(IkeVersion::V1, ExchangeType::IdProt, 0, false);
        assert_eq!(task.build(&mut manager, &mut reply).unwrap(), TaskStatus::Success);
        assert!(reply.payloads().is_empty());
    }

    #[test]
    fn test_v1_main_mode_psk() {
        let mut manager = manager(CredentialManager::new(), Settings::default());
        let id = ike_sa(&mut manager, IkeVersion::V1, false, None);
        let mut task = CertPreTask::new(&manager, id, false).unwrap();

        let mut message = IkeMessage::request(IkeVersion::V1, ExchangeType::IdProt, 0, true);
        message.add_payload(sa_payload(AuthMethodV1::Psk));
        task.process(&mut manager, &message).unwrap();

        assert_eq!(task.state(), Some(CertPreState::NoCert));
        assert!(task.is_final());

        let mut reply = IkeMessage::response(IkeVersion::V1, ExchangeType::IdProt, 0, false);
        assert_eq!(task.build(&mut manager, &mut reply).unwrap(), TaskStatus::Success);
    }

    #[test]
    fn test_v1_aggressive_responder() {
        let creds = CredentialManager::new();
        creds.add_cert(ca_cert("Root CA", 1), true);
        let mut manager = manager(creds, Settings::default());
        let id = ike_sa(&mut manager, IkeVersion::V1, false, None);
        let mut task = CertPreTask::new(&manager, id, false).unwrap();

        let ee = Arc::new(ee_cert("carol", 2));
        let mut message = IkeMessage::request(IkeVersion::V1, ExchangeType::Aggressive, 0, true);
        message.add_payload(sa_payload(AuthMethodV1::XauthInitRsa));
        message.add_payload(IkePayload::CERTv1(CertPayload::x509(ee)));
        assert_eq!(task.process(&mut manager, &message).unwrap(), TaskStatus::NeedMore);
        assert!(task.is_final());
        assert_eq!(manager.get(id).unwrap().auth_cfg(false).count(AuthRule::SubjectCert), 1);

        let mut reply = IkeMessage::response(IkeVersion::V1, ExchangeType::Aggressive, 0, false);
        assert_eq!(task.build(&mut manager, &mut reply).unwrap(), TaskStatus::Success);
        assert_eq!(reply.payloads_of(PayloadType::CERTREQv1).count(), 1);
    }

    #[test]
    fn test_v1_initiator_unsupported() {
        let mut manager = manager(CredentialManager::new(), Settings::default());
        let id = ike_sa(&mut manager, IkeVersion::V1, true, None);
        let mut task = CertPreTask::new(&manager, id, true).unwrap();

        let mut message = IkeMessage::request(IkeVersion::V1, ExchangeType::IdProt, 0, true);
        message.add_payload(sa_payload(AuthMethodV1::RsaSig));

        assert!(matches!(
            task.build(&mut manager, &mut message),
            Err(WardenError::NotImplemented(_))
        ));
        assert!(matches!(
            task.process(&mut manager, &message),
            Err(WardenError::NotImplemented(_))
        ));
    }

    #[test]
    fn test_stale_handle_fails() {
        let mut manager = manager(CredentialManager::new(), Settings::default());
        let id = ike_sa(&mut manager, IkeVersion::V2, false, None);
        let mut task = CertPreTask::new(&manager, id, false).unwrap();
        manager.remove(id);

        let message = IkeMessage::request(IkeVersion::V2, ExchangeType::IkeAuth, 1, true);
        assert!(matches!(
            task.process(&mut manager, &message),
            Err(WardenError::Other(_))
        ));
    }

    #[test]
    fn test_migrate_keeps_state() {
        let creds = CredentialManager::new();
        creds.add_cert(ca_cert("Root CA", 1), true);
        let mut manager = manager(creds, Settings::builder().with_hash_and_url(true).build());
        let old = ike_sa(&mut manager, IkeVersion::V2, false, None);
        let new = ike_sa(&mut manager, IkeVersion::V2, false, None);
        let mut task = CertPreTask::new(&manager, old, false).unwrap();

        let mut response = IkeMessage::response(IkeVersion::V2, ExchangeType::IkeSaInit, 0, false);
        task.build(&mut manager, &mut response).unwrap();
        assert!(task.accepts_hash_and_url());

        task.migrate(new);
        assert_eq!(task.ike_sa(), new);
        assert!(task.accepts_hash_and_url());

        let mut request = IkeMessage::request(IkeVersion::V2, ExchangeType::IkeAuth, 1, true);
        request.add_payload(IkePayload::CERT(CertPayload::hash_and_url(
            [0x33; 20],
            "http://ca.example.org/carol.der",
        )));
        task.process(&mut manager, &request).unwrap();

        assert_eq!(manager.get(new).unwrap().auth_cfg(false).count(AuthRule::SubjectHashUrl), 1);
        assert!(manager.get(old).unwrap().auth_cfg(false).is_empty());
        Box::new(task).destroy();
    }
}
