//! IKE SA session objects
//!
//! An [`IkeSa`] holds the per-session state tasks read and mutate: role,
//! protocol generation, configuration, conditions, negotiated extensions and
//! the authentication context of each direction. Sessions are owned by the
//! [`IkeSaManager`]; tasks refer to them through a copyable [`IkeSaId`]
//! handle and only borrow the session for the duration of one call.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::{
    config::{IkeConfig, PeerConfig, Settings},
    credentials::{AuthConfig, CredentialStore},
    ike::IkeVersion,
    metrics::CertMetrics,
    Error, Result,
};

/// Handle to an IKE SA owned by an [`IkeSaManager`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IkeSaId(u64);

impl IkeSaId {
    /// Create handle from a raw unique id
    pub fn new(id: u64) -> Self {
        IkeSaId(id)
    }

    /// Raw unique id
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for IkeSaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Session conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    /// We are behind a NAT
    NatHere,
    /// Peer is behind a NAT
    NatThere,
    /// Peer sent at least one certificate request
    CertReqSeen,
    /// We initiated the original IKE SA (survives rekeying)
    OriginalInitiator,
    /// Local and remote authentication completed
    Authenticated,
}

impl Condition {
    fn bit(self) -> u32 {
        match self {
            Condition::NatHere => 0x01,
            Condition::NatThere => 0x02,
            Condition::CertReqSeen => 0x04,
            Condition::OriginalInitiator => 0x08,
            Condition::Authenticated => 0x10,
        }
    }
}

/// Protocol extensions supported by the peer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extension {
    /// Peer accepts hash-and-URL encoded certificates
    HashAndUrl,
    /// Multiple authentication rounds (RFC 4739)
    MultipleAuth,
    /// MOBIKE (RFC 4555)
    Mobike,
}

impl Extension {
    fn bit(self) -> u32 {
        match self {
            Extension::HashAndUrl => 0x01,
            Extension::MultipleAuth => 0x02,
            Extension::Mobike => 0x04,
        }
    }
}

/// IKE Security Association as seen by its tasks
#[derive(Debug)]
pub struct IkeSa {
    id: IkeSaId,
    version: IkeVersion,
    initiator: bool,
    ike_cfg: Arc<IkeConfig>,
    peer_cfg: Option<Arc<PeerConfig>>,
    conditions: u32,
    extensions: u32,
    local_auth: AuthConfig,
    remote_auth: AuthConfig,
}

impl IkeSa {
    /// Create new IKE SA
    pub fn new(
        id: IkeSaId,
        version: IkeVersion,
        initiator: bool,
        ike_cfg: Arc<IkeConfig>,
        peer_cfg: Option<Arc<PeerConfig>>,
    ) -> Self {
        let mut sa = IkeSa {
            id,
            version,
            initiator,
            ike_cfg,
            peer_cfg,
            conditions: 0,
            extensions: 0,
            local_auth: AuthConfig::new(),
            remote_auth: AuthConfig::new(),
        };
        sa.set_condition(Condition::OriginalInitiator, initiator);
        sa
    }

    /// Session handle
    pub fn id(&self) -> IkeSaId {
        self.id
    }

    /// Protocol generation
    pub fn version(&self) -> IkeVersion {
        self.version
    }

    /// Change protocol generation (before the first exchange)
    pub fn set_version(&mut self, version: IkeVersion) {
        self.version = version;
    }

    /// Check if we are the initiator of this IKE SA
    pub fn is_initiator(&self) -> bool {
        self.initiator
    }

    /// IKE configuration
    pub fn ike_cfg(&self) -> &IkeConfig {
        &self.ike_cfg
    }

    /// Peer configuration, once one is selected
    pub fn peer_cfg(&self) -> Option<&PeerConfig> {
        self.peer_cfg.as_deref()
    }

    /// Select a peer configuration
    pub fn set_peer_cfg(&mut self, peer_cfg: Arc<PeerConfig>) {
        self.peer_cfg = Some(peer_cfg);
    }

    /// Check a condition
    pub fn has_condition(&self, condition: Condition) -> bool {
        (self.conditions & condition.bit()) != 0
    }

    /// Set or clear a condition
    pub fn set_condition(&mut self, condition: Condition, value: bool) {
        if value {
            self.conditions |= condition.bit();
        } else {
            self.conditions &= !condition.bit();
        }
    }

    /// Record an extension supported by the peer
    pub fn enable_extension(&mut self, extension: Extension) {
        self.extensions |= extension.bit();
    }

    /// Check if the peer supports an extension
    pub fn supports_extension(&self, extension: Extension) -> bool {
        (self.extensions & extension.bit()) != 0
    }

    /// Authentication context of the current round
    pub fn auth_cfg(&self, local: bool) -> &AuthConfig {
        if local {
            &self.local_auth
        } else {
            &self.remote_auth
        }
    }

    /// Mutable authentication context of the current round
    pub fn auth_cfg_mut(&mut self, local: bool) -> &mut AuthConfig {
        if local {
            &mut self.local_auth
        } else {
            &mut self.remote_auth
        }
    }
}

/// Owner of all IKE SAs plus the state they share
pub struct IkeSaManager {
    sessions: HashMap<IkeSaId, IkeSa>,
    next_id: u64,
    credentials: Arc<dyn CredentialStore>,
    settings: Settings,
    metrics: CertMetrics,
}

impl IkeSaManager {
    /// Create manager over a shared credential store
    pub fn new(credentials: Arc<dyn CredentialStore>, settings: Settings) -> Self {
        IkeSaManager {
            sessions: HashMap::new(),
            next_id: 1,
            credentials,
            settings,
            metrics: CertMetrics::new(),
        }
    }

    /// Create a new IKE SA and return its handle
    pub fn create(
        &mut self,
        version: IkeVersion,
        initiator: bool,
        ike_cfg: Arc<IkeConfig>,
        peer_cfg: Option<Arc<PeerConfig>>,
    ) -> IkeSaId {
        let id = IkeSaId(self.next_id);
        self.next_id += 1;
        self.sessions
            .insert(id, IkeSa::new(id, version, initiator, ike_cfg, peer_cfg));
        id
    }

    /// Look up an IKE SA
    pub fn get(&self, id: IkeSaId) -> Option<&IkeSa> {
        self.sessions.get(&id)
    }

    /// Look up an IKE SA for modification
    pub fn get_mut(&mut self, id: IkeSaId) -> Option<&mut IkeSa> {
        self.sessions.get_mut(&id)
    }

    /// Borrow an IKE SA, failing for stale handles
    pub fn checkout(&self, id: IkeSaId) -> Result<&IkeSa> {
        self.get(id).ok_or(Error::SaNotFound(id.value()))
    }

    /// Borrow an IKE SA mutably, failing for stale handles
    pub fn checkout_mut(&mut self, id: IkeSaId) -> Result<&mut IkeSa> {
        self.get_mut(id).ok_or(Error::SaNotFound(id.value()))
    }

    /// Remove an IKE SA
    pub fn remove(&mut self, id: IkeSaId) -> Option<IkeSa> {
        self.sessions.remove(&id)
    }

    /// Number of IKE SAs
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Check if no IKE SA exists
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Shared credential store
    pub fn credentials(&self) -> Arc<dyn CredentialStore> {
        self.credentials.clone()
    }

    /// Daemon-wide settings
    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Certificate exchange metrics
    pub fn metrics(&self) -> &CertMetrics {
        &self.metrics
    }
}

/// Exclusive view of one IKE SA plus the shared state a task call needs
pub struct SaContext<'a> {
    /// The IKE SA the task works for
    pub sa: &'a mut IkeSa,
    /// Shared credential store
    pub credentials: &'a dyn CredentialStore,
    /// Daemon-wide settings
    pub settings: Settings,
    /// Certificate exchange metrics
    pub metrics: &'a CertMetrics,
}

impl IkeSaManager {
    /// Borrow an IKE SA together with the shared state, failing for stale handles
    pub fn context(&mut self, id: IkeSaId) -> Result<SaContext<'_>> {
        let IkeSaManager {
            sessions,
            credentials,
            settings,
            metrics,
            ..
        } = self;
        let sa = sessions
            .get_mut(&id)
            .ok_or(Error::SaNotFound(id.value()))?;
        Ok(SaContext {
            sa,
            credentials: &**credentials,
            settings: *settings,
            metrics,
        })
    }
}

impl fmt::Debug for IkeSaManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IkeSaManager")
            .field("sessions", &self.sessions.len())
            .field("next_id", &self.next_id)
            .field("settings", &self.settings)
            .finish()
    }
}
