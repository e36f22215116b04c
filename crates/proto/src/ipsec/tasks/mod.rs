//! IKE SA tasks
//!
//! Each task handles one concern of an exchange and is driven by the
//! per-SA scheduler through [`warden_platform::Task`]. Tasks hold an
//! [`IkeSaId`](crate::ipsec::IkeSaId) rather than the IKE SA itself and
//! borrow it from the [`IkeSaManager`](crate::ipsec::IkeSaManager) for the
//! duration of a single `build` or `process` call.

use std::fmt;

pub mod cert_pre;

/// Kinds of tasks an IKE SA scheduler queues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskType {
    /// IKE_SA_INIT negotiation
    IkeInit,
    /// NAT detection
    IkeNatd,
    /// Vendor ID exchange
    IkeVendor,
    /// Certificate and certificate request exchange before authentication
    IkeCertPre,
    /// Peer authentication
    IkeAuth,
    /// Certificate sending after authentication
    IkeCertPost,
    /// IKE SA rekeying
    IkeRekey,
    /// IKE SA deletion
    IkeDelete,
    /// Dead peer detection
    IkeDpd,
    /// CHILD_SA creation
    ChildCreate,
}

impl TaskType {
    /// Name as used in logs
    pub fn name(self) -> &'static str {
        match self {
            TaskType::IkeInit => "IKE_INIT",
            TaskType::IkeNatd => "IKE_NATD",
            TaskType::IkeVendor => "IKE_VENDOR",
            TaskType::IkeCertPre => "IKE_CERT_PRE",
            TaskType::IkeAuth => "IKE_AUTH",
            TaskType::IkeCertPost => "IKE_CERT_POST",
            TaskType::IkeRekey => "IKE_REKEY",
            TaskType::IkeDelete => "IKE_DELETE",
            TaskType::IkeDpd => "IKE_DPD",
            TaskType::ChildCreate => "CHILD_CREATE",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
