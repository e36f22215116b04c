//! IKEv1 certificate pre-exchange state machine
//!
//! ```text
//! Main mode (responder)
//!
//!   Init ──SA: RSA/XAuth-RSA──▶ SaSeen ──KE: certreqs──▶ SaSeenPost ──ID: certreqs+certs──▶ RequestSent
//!     │                                                      (build: send CRs)
//!     └──SA: other method / no SA──▶ NoCert (final)
//!
//! Aggressive mode (responder)
//!
//!   any ──SA: RSA/XAuth-RSA, certreqs+certs──▶ SaSeen (final)
//!   any ──SA: other method / no SA──────────▶ NoCert (final)
//! ```

use std::fmt;

use crate::ipsec::ike::{ExchangeType, IkeMessage, IkePayload};

/// Progress of the IKEv1 certificate pre-exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CertPreState {
    /// Nothing seen yet
    Init,
    /// SA payload negotiated a certificate based method
    SaSeen,
    /// Key exchange round processed, requests go out with our answer
    SaSeenPost,
    /// Certificates processed and requests sent
    RequestSent,
    /// Negotiated method does not use certificates
    NoCert,
}

impl CertPreState {
    /// Name as used in logs
    pub fn name(self) -> &'static str {
        match self {
            CertPreState::Init => "Init",
            CertPreState::SaSeen => "SaSeen",
            CertPreState::SaSeenPost => "SaSeenPost",
            CertPreState::RequestSent => "RequestSent",
            CertPreState::NoCert => "NoCert",
        }
    }

    /// Check if the state no longer changes in main mode
    pub fn is_terminal(self) -> bool {
        matches!(self, CertPreState::RequestSent | CertPreState::NoCert)
    }

    /// Transition for an inbound message
    ///
    /// `requires_certs` is the outcome of inspecting the message's SA
    /// payload, `None` if it has none.
    pub(crate) fn on_message(
        self,
        exchange: ExchangeType,
        requires_certs: Option<bool>,
    ) -> (CertPreState, Round) {
        match exchange {
            ExchangeType::IdProt => match self {
                CertPreState::Init => negotiated(requires_certs, Round::default()),
                CertPreState::SaSeen => (CertPreState::SaSeenPost, Round::CERTREQS),
                CertPreState::SaSeenPost => (CertPreState::RequestSent, Round::CERTREQS_AND_CERTS),
                CertPreState::RequestSent | CertPreState::NoCert => (self, Round::default()),
            },
            ExchangeType::Aggressive => negotiated(requires_certs, Round::CERTREQS_AND_CERTS),
            _ => (self, Round::default()),
        }
    }

    /// Check if the outgoing message in this state carries certificate requests
    pub(crate) fn sends_requests(self, exchange: ExchangeType) -> bool {
        match exchange {
            ExchangeType::IdProt => self == CertPreState::SaSeenPost,
            ExchangeType::Aggressive => self != CertPreState::NoCert,
            _ => false,
        }
    }
}

impl fmt::Display for CertPreState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Work for one inbound legacy message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Round {
    /// Process certificate requests
    pub certreqs: bool,
    /// Process certificates
    pub certs: bool,
    /// Last round of the exchange
    pub final_round: bool,
}

impl Round {
    const CERTREQS: Round = Round {
        certreqs: true,
        certs: false,
        final_round: false,
    };

    const CERTREQS_AND_CERTS: Round = Round {
        certreqs: true,
        certs: true,
        final_round: true,
    };

    fn finish(self) -> Round {
        Round {
            final_round: true,
            ..self
        }
    }
}

/// Outcome of the SA payload inspection
///
/// Without certificate based authentication nothing is processed and the
/// exchange is final right away.
fn negotiated(requires_certs: Option<bool>, round: Round) -> (CertPreState, Round) {
    match requires_certs {
        Some(true) => (CertPreState::SaSeen, round),
        Some(false) | None => (CertPreState::NoCert, Round::default().finish()),
    }
}

/// Inspect the authentication method proposed in the message's SA payload
///
/// Returns `None` if the message carries no IKEv1 SA payload.
pub(crate) fn check_auth_method(message: &IkeMessage) -> Option<(u16, bool)> {
    message.payloads().iter().find_map(|payload| match payload {
        IkePayload::SAv1(sa) => Some(match sa.auth_method() {
            Some(method) => (method.to_u16(), method.requires_certificates()),
            None => (0, false),
        }),
        _ => None,
    })
}
