//! Frame layout and codec
//!
//! One frame on the wire is `[length: u64][tag: u32][payload: length bytes]`
//! with native-endian words and a bincode-encoded payload. Native byte
//! order is safe here: both endpoints are processes of the same build on
//! the same host; this format makes no cross-architecture guarantee.

use bytes::{BufMut, Bytes, BytesMut};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::messages::WireMessage;

/// Bytes of the length word
pub const LENGTH_SIZE: usize = std::mem::size_of::<u64>();

/// Bytes of the type tag
pub const TAG_SIZE: usize = std::mem::size_of::<u32>();

/// Bytes of the complete frame header
pub const HEADER_SIZE: usize = LENGTH_SIZE + TAG_SIZE;

/// Maximum payload size (16 MiB)
///
/// A declared length above this means the stream is desynchronized or the
/// peer is misbehaving; either way the connection is torn down.
pub const MAX_PAYLOAD_SIZE: usize = 16 * 1024 * 1024;

/// Frame codec error
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("Serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("Payload too large: {size} bytes (max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Malformed payload for frame type {frame_type:?}: {source}")]
    Malformed {
        frame_type: FrameType,
        source: bincode::Error,
    },
}

/// The closed, versioned set of frame type tags
///
/// Values are fixed wire contract; new tags may only be appended.
/// Unrecognized values are valid on the wire (forward compatibility) and
/// are drained and discarded by the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum FrameType {
    Debug = 0,
    StyleSheet = 1,
    State = 2,
    Mark = 3,
    Hidden = 4,
    Focus = 5,
    AddMessage = 6,
    UpdateMessage = 7,
}

impl FrameType {
    /// Map a raw tag back to a known type; None for forward-compat tags
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(FrameType::Debug),
            1 => Some(FrameType::StyleSheet),
            2 => Some(FrameType::State),
            3 => Some(FrameType::Mark),
            4 => Some(FrameType::Hidden),
            5 => Some(FrameType::Focus),
            6 => Some(FrameType::AddMessage),
            7 => Some(FrameType::UpdateMessage),
            _ => None,
        }
    }

    pub fn raw(self) -> u32 {
        self as u32
    }
}

/// Decoded frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Exact byte count of the encoded payload
    pub length: u64,
    /// Raw type tag; may be unknown to this build
    pub raw_type: u32,
}

impl FrameHeader {
    pub fn new(length: u64, raw_type: u32) -> Self {
        Self { length, raw_type }
    }

    pub fn decode(buf: &[u8; HEADER_SIZE]) -> Self {
        let mut len = [0u8; LENGTH_SIZE];
        len.copy_from_slice(&buf[..LENGTH_SIZE]);
        let mut tag = [0u8; TAG_SIZE];
        tag.copy_from_slice(&buf[LENGTH_SIZE..]);

        Self {
            length: u64::from_ne_bytes(len),
            raw_type: u32::from_ne_bytes(tag),
        }
    }

    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[..LENGTH_SIZE].copy_from_slice(&self.length.to_ne_bytes());
        buf[LENGTH_SIZE..].copy_from_slice(&self.raw_type.to_ne_bytes());
        buf
    }

    pub fn frame_type(&self) -> Option<FrameType> {
        FrameType::from_raw(self.raw_type)
    }
}

/// Result of decoding one complete payload
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// A recognized, well-formed message
    Frame(WireMessage),
    /// Unknown tag; payload was consumed to keep the stream framed and is
    /// discarded
    Ignored,
}

/// Encode one complete frame: header followed by payload
pub fn encode_frame(msg: &WireMessage) -> Result<Bytes, WireError> {
    let payload = match msg {
        WireMessage::Debug(m) => encode_payload(m),
        WireMessage::StyleSheet(m) => encode_payload(m),
        WireMessage::State(m) => encode_payload(m),
        WireMessage::Mark(m) => encode_payload(m),
        WireMessage::Hidden(m) => encode_payload(m),
        WireMessage::Focus(m) => encode_payload(m),
        WireMessage::AddMessage(m) => encode_payload(m),
        WireMessage::UpdateMessage(m) => encode_payload(m),
    }?;

    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(WireError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD_SIZE,
        });
    }

    let header = FrameHeader::new(payload.len() as u64, msg.frame_type().raw());

    let mut buf = BytesMut::with_capacity(HEADER_SIZE + payload.len());
    buf.put_slice(&header.encode());
    buf.put_slice(&payload);
    Ok(buf.freeze())
}

/// Decode a fully-read payload for the given raw tag
///
/// Unknown tags succeed with [`Decoded::Ignored`]; a malformed payload for
/// a known tag is a hard decode failure.
pub fn decode_payload(raw_type: u32, payload: &[u8]) -> Result<Decoded, WireError> {
    let Some(frame_type) = FrameType::from_raw(raw_type) else {
        return Ok(Decoded::Ignored);
    };

    let msg = match frame_type {
        FrameType::Debug => WireMessage::Debug(decode_one(frame_type, payload)?),
        FrameType::StyleSheet => WireMessage::StyleSheet(decode_one(frame_type, payload)?),
        FrameType::State => WireMessage::State(decode_one(frame_type, payload)?),
        FrameType::Mark => WireMessage::Mark(decode_one(frame_type, payload)?),
        FrameType::Hidden => WireMessage::Hidden(decode_one(frame_type, payload)?),
        FrameType::Focus => WireMessage::Focus(decode_one(frame_type, payload)?),
        FrameType::AddMessage => WireMessage::AddMessage(decode_one(frame_type, payload)?),
        FrameType::UpdateMessage => WireMessage::UpdateMessage(decode_one(frame_type, payload)?),
    };

    Ok(Decoded::Frame(msg))
}

fn encode_payload<T: Serialize>(payload: &T) -> Result<Vec<u8>, WireError> {
    Ok(bincode::serialize(payload)?)
}

fn decode_one<T: DeserializeOwned>(frame_type: FrameType, payload: &[u8]) -> Result<T, WireError> {
    bincode::deserialize(payload).map_err(|source| WireError::Malformed { frame_type, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages;
    use crate::types::{Address, Chunk, Element, ElementKind, Tag};

    fn sample_message() -> crate::types::Message {
        crate::types::Message {
            mid: "mid-1@example.org".into(),
            sender: Address::new("Alice", "alice@example.org", "Alice <alice@example.org>"),
            to: vec![Address::new("Bob", "bob@example.org", "Bob <bob@example.org>")],
            cc: vec![],
            bcc: vec![],
            date_pretty: "today 12:00".into(),
            date_verbose: "Mon, 01 Jan 2024 12:00:00 +0000".into(),
            subject: "hi".into(),
            tags: vec![Tag {
                tag: "inbox".into(),
                fg: "#000000".into(),
                bg: "#ffffff".into(),
            }],
            gravatar: None,
            preview: "hi there".into(),
            patch: false,
            missing_content: false,
            root: Chunk {
                mime_type: "text/plain".into(),
                id: 0,
                sibling: false,
                viewable: true,
                preferred: true,
                attachment: false,
                is_signed: false,
                is_encrypted: false,
                content: "hi there".into(),
                children: vec![],
            },
            mime_messages: vec![],
            attachments: vec![],
        }
    }

    fn roundtrip(msg: WireMessage) -> WireMessage {
        let frame = encode_frame(&msg).unwrap();
        let mut header = [0u8; HEADER_SIZE];
        header.copy_from_slice(&frame[..HEADER_SIZE]);
        let header = FrameHeader::decode(&header);

        assert_eq!(header.length as usize, frame.len() - HEADER_SIZE);
        assert_eq!(header.frame_type(), Some(msg.frame_type()));

        match decode_payload(header.raw_type, &frame[HEADER_SIZE..]).unwrap() {
            Decoded::Frame(m) => m,
            Decoded::Ignored => panic!("known frame type was ignored"),
        }
    }

    #[test]
    fn test_roundtrip_all_variants() {
        let messages = vec![
            WireMessage::Debug(messages::Debug {
                msg: "hello from the extension".into(),
            }),
            WireMessage::StyleSheet(messages::StyleSheet {
                css: "body { margin: 0; }".into(),
            }),
            WireMessage::State(messages::State {
                focused: "mid-1@example.org".into(),
                messages: vec![messages::MessageState {
                    mid: "mid-1@example.org".into(),
                    marked: false,
                    expanded: true,
                    elements: vec![
                        Element::empty(),
                        Element::new(ElementKind::Part, 0),
                        Element::new(ElementKind::Attachment, 2),
                    ],
                }],
            }),
            WireMessage::Mark(messages::Mark {
                mid: "mid-1@example.org".into(),
                marked: true,
            }),
            WireMessage::Hidden(messages::Hidden {
                mid: "mid-1@example.org".into(),
                hidden: false,
            }),
            WireMessage::Focus(messages::Focus {
                mid: "mid-1@example.org".into(),
                focus: true,
                element: 1,
            }),
            WireMessage::AddMessage(messages::AddMessage {
                message: sample_message(),
            }),
            WireMessage::UpdateMessage(messages::UpdateMessage {
                message: sample_message(),
            }),
        ];

        for msg in messages {
            let decoded = roundtrip(msg.clone());
            assert_eq!(msg, decoded);
        }
    }

    #[test]
    fn test_header_roundtrip() {
        let header = FrameHeader::new(4242, 3);
        let decoded = FrameHeader::decode(&header.encode());
        assert_eq!(header, decoded);
    }

    #[test]
    fn test_unknown_tag_is_ignored() {
        // A tag from some future protocol version: framing succeeds,
        // payload is discarded.
        let result = decode_payload(900, b"anything at all").unwrap();
        assert_eq!(result, Decoded::Ignored);
    }

    #[test]
    fn test_truncated_payload_is_hard_error() {
        let frame = encode_frame(&WireMessage::Focus(messages::Focus {
            mid: "mid-1@example.org".into(),
            focus: true,
            element: 1,
        }))
        .unwrap();

        let payload = &frame[HEADER_SIZE..];
        let result = decode_payload(FrameType::Focus.raw(), &payload[..payload.len() - 2]);
        assert!(matches!(result, Err(WireError::Malformed { .. })));
    }

    #[test]
    fn test_frame_type_raw_roundtrip() {
        for raw in 0..8 {
            let ft = FrameType::from_raw(raw).unwrap();
            assert_eq!(ft.raw(), raw);
        }
        assert!(FrameType::from_raw(8).is_none());
    }
}
