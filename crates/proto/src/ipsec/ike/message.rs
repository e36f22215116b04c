//! IKE message structures
//!
//! A decoded IKE message: the header fields the tasks look at, plus the
//! ordered list of payloads. Encryption and wire encoding are handled by
//! the message layer before a message reaches a task.

use super::constants::*;
use super::payload::{IkePayload, NotifyPayload};

/// IKE message header
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                       IKE SA Initiator's SPI                  |
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                       IKE SA Responder's SPI                  |
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |  Next Payload | MjVer | MnVer | Exchange Type |     Flags     |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                          Message ID                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IkeHeader {
    /// Initiator's Security Parameter Index (8 bytes)
    pub initiator_spi: [u8; 8],

    /// Responder's Security Parameter Index (8 bytes, zero for the first request)
    pub responder_spi: [u8; 8],

    /// Protocol generation
    pub version: IkeVersion,

    /// Exchange type
    pub exchange_type: ExchangeType,

    /// Message flags
    pub flags: IkeFlags,

    /// Message ID
    pub message_id: u32,
}

impl IkeHeader {
    /// Create a new IKE header
    pub fn new(
        version: IkeVersion,
        exchange_type: ExchangeType,
        flags: IkeFlags,
        message_id: u32,
    ) -> Self {
        IkeHeader {
            initiator_spi: [0; 8],
            responder_spi: [0; 8],
            version,
            exchange_type,
            flags,
            message_id,
        }
    }

    /// Set both SPIs
    pub fn with_spis(mut self, initiator_spi: [u8; 8], responder_spi: [u8; 8]) -> Self {
        self.initiator_spi = initiator_spi;
        self.responder_spi = responder_spi;
        self
    }
}

/// Decoded IKE message
#[derive(Debug, Clone, PartialEq)]
pub struct IkeMessage {
    /// Message header
    pub header: IkeHeader,

    /// Payloads in message order
    pub payloads: Vec<IkePayload>,
}

impl IkeMessage {
    /// Create an empty message
    pub fn new(header: IkeHeader) -> Self {
        IkeMessage {
            header,
            payloads: Vec::new(),
        }
    }

    /// Create an empty request
    ///
    /// `is_initiator` is the role of the sender within the IKE SA.
    pub fn request(
        version: IkeVersion,
        exchange_type: ExchangeType,
        message_id: u32,
        is_initiator: bool,
    ) -> Self {
        Self::new(IkeHeader::new(
            version,
            exchange_type,
            IkeFlags::request(is_initiator),
            message_id,
        ))
    }

    /// Create an empty response
    pub fn response(
        version: IkeVersion,
        exchange_type: ExchangeType,
        message_id: u32,
        is_initiator: bool,
    ) -> Self {
        Self::new(IkeHeader::new(
            version,
            exchange_type,
            IkeFlags::response(is_initiator),
            message_id,
        ))
    }

    /// Protocol generation of the message
    pub fn version(&self) -> IkeVersion {
        self.header.version
    }

    /// Exchange type
    pub fn exchange_type(&self) -> ExchangeType {
        self.header.exchange_type
    }

    /// Message ID
    pub fn message_id(&self) -> u32 {
        self.header.message_id
    }

    /// Check if this is a request
    pub fn is_request(&self) -> bool {
        !self.header.flags.is_response()
    }

    /// All payloads in order
    pub fn payloads(&self) -> &[IkePayload] {
        &self.payloads
    }

    /// Iterate over payloads of one type
    pub fn payloads_of(&self, payload_type: PayloadType) -> impl Iterator<Item = &IkePayload> + '_ {
        self.payloads
            .iter()
            .filter(move |payload| payload.payload_type() == payload_type)
    }

    /// First payload of the given type
    pub fn payload(&self, payload_type: PayloadType) -> Option<&IkePayload> {
        self.payloads_of(payload_type).next()
    }

    /// First notify of the given type
    pub fn notify(&self, notify_type: NotifyType) -> Option<&NotifyPayload> {
        self.payloads.iter().find_map(|payload| match payload {
            IkePayload::N(notify) if notify.notify_type == notify_type => Some(notify),
            _ => None,
        })
    }

    /// Append a payload
    pub fn add_payload(&mut self, payload: IkePayload) {
        self.payloads.push(payload);
    }

    /// Append a notify payload
    pub fn add_notify(&mut self, notify_type: NotifyType, data: Vec<u8>) {
        self.add_payload(IkePayload::N(NotifyPayload::new(notify_type, data)));
    }
}
