use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::ipsec::ike::IdType;

/// Typed identity, e.g. a CA key identifier or distinguished name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identification {
    id_type: IdType,
    data: Vec<u8>,
}

impl Identification {
    /// Build an identity from its encoding
    ///
    /// Returns `None` for empty input, which can't identify anything.
    pub fn from_encoding(id_type: IdType, data: &[u8]) -> Option<Self> {
        if data.is_empty() {
            return None;
        }
        Some(Identification {
            id_type,
            data: data.to_vec(),
        })
    }

    /// Identity kind
    pub fn id_type(&self) -> IdType {
        self.id_type
    }

    /// Raw encoding
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Display for Identification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id_type {
            IdType::Fqdn | IdType::Rfc822Addr => {
                write!(f, "{}", String::from_utf8_lossy(&self.data))
            }
            IdType::Ipv4Addr if self.data.len() == 4 => {
                let octets: [u8; 4] = [self.data[0], self.data[1], self.data[2], self.data[3]];
                write!(f, "{}", Ipv4Addr::from(octets))
            }
            IdType::Ipv6Addr if self.data.len() == 16 => {
                let mut octets = [0u8; 16];
                octets.copy_from_slice(&self.data);
                write!(f, "{}", Ipv6Addr::from(octets))
            }
            _ => {
                let hex: Vec<String> = self.data.iter().map(|b| format!("{:02x}", b)).collect();
                write!(f, "{}", hex.join(":"))
            }
        }
    }
}
