//! IKE, peer and global configuration
//!
//! Provides the configuration objects an IKE SA is bound to, with builder
//! patterns in the style of the rest of the crate.

use super::{
    credentials::AuthConfig,
    ike::IkeVersion,
    Error, Result,
};

/// IKE-level configuration shared by all peers reached over it
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IkeConfig {
    /// Local address or `%any`
    pub local: String,

    /// Remote address or `%any`
    pub remote: String,

    /// Protocol generation, `None` accepts both
    pub version: Option<IkeVersion>,

    /// Send certificate requests to the peer
    pub send_certreq: bool,
}

impl IkeConfig {
    /// Create builder for IKE configuration
    pub fn builder() -> IkeConfigBuilder {
        IkeConfigBuilder::new()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.local.is_empty() {
            return Err(Error::InvalidParameter("local address cannot be empty".into()));
        }
        if self.remote.is_empty() {
            return Err(Error::InvalidParameter("remote address cannot be empty".into()));
        }
        Ok(())
    }
}

/// Builder for [`IkeConfig`]
#[derive(Default)]
pub struct IkeConfigBuilder {
    local: Option<String>,
    remote: Option<String>,
    version: Option<IkeVersion>,
    send_certreq: Option<bool>,
}

impl IkeConfigBuilder {
    /// Create new IKE config builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set local address
    pub fn with_local(mut self, local: impl Into<String>) -> Self {
        self.local = Some(local.into());
        self
    }

    /// Set remote address
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = Some(remote.into());
        self
    }

    /// Restrict to one protocol generation
    pub fn with_version(mut self, version: IkeVersion) -> Self {
        self.version = Some(version);
        self
    }

    /// Enable or disable sending certificate requests
    pub fn with_send_certreq(mut self, send_certreq: bool) -> Self {
        self.send_certreq = Some(send_certreq);
        self
    }

    /// Build IKE configuration
    pub fn build(self) -> Result<IkeConfig> {
        let config = IkeConfig {
            local: self.local.unwrap_or_else(|| "%any".to_string()),
            remote: self.remote.unwrap_or_else(|| "%any".to_string()),
            version: self.version,
            send_certreq: self.send_certreq.unwrap_or(true),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Peer configuration
///
/// Each authentication round has one [`AuthConfig`] per direction. The
/// remote rounds carry the constraints the peer must satisfy, e.g. the CA
/// its certificate has to chain up to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeerConfig {
    /// Connection name
    pub name: String,

    /// Local authentication rounds
    pub local_auth: Vec<AuthConfig>,

    /// Remote authentication rounds
    pub remote_auth: Vec<AuthConfig>,
}

impl PeerConfig {
    /// Create builder for peer configuration
    pub fn builder() -> PeerConfigBuilder {
        PeerConfigBuilder::new()
    }

    /// Authentication rounds of one direction
    pub fn auth_cfgs(&self, local: bool) -> &[AuthConfig] {
        if local {
            &self.local_auth
        } else {
            &self.remote_auth
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::InvalidParameter("peer name cannot be empty".into()));
        }
        Ok(())
    }
}

/// Builder for [`PeerConfig`]
#[derive(Default)]
pub struct PeerConfigBuilder {
    name: Option<String>,
    local_auth: Vec<AuthConfig>,
    remote_auth: Vec<AuthConfig>,
}

impl PeerConfigBuilder {
    /// Create new peer config builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set connection name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append a local authentication round
    pub fn with_local_auth(mut self, auth: AuthConfig) -> Self {
        self.local_auth.push(auth);
        self
    }

    /// Append a remote authentication round
    pub fn with_remote_auth(mut self, auth: AuthConfig) -> Self {
        self.remote_auth.push(auth);
        self
    }

    /// Build peer configuration
    pub fn build(self) -> Result<PeerConfig> {
        let config = PeerConfig {
            name: self
                .name
                .ok_or_else(|| Error::InvalidParameter("peer name is required".into()))?,
            local_auth: self.local_auth,
            remote_auth: self.remote_auth,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Daemon-wide settings
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Settings {
    /// Advertise and accept hash-and-URL encoded certificates
    pub hash_and_url: bool,
}

impl Settings {
    /// Create builder for settings
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }
}

/// Builder for [`Settings`]
#[derive(Default)]
pub struct SettingsBuilder {
    hash_and_url: bool,
}

impl SettingsBuilder {
    /// Enable or disable hash-and-URL support
    pub fn with_hash_and_url(mut self, enabled: bool) -> Self {
        self.hash_and_url = enabled;
        self
    }

    /// Build settings
    pub fn build(self) -> Settings {
        Settings {
            hash_and_url: self.hash_and_url,
        }
    }
}
