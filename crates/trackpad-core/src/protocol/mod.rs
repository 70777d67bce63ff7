//! Protocol module containing the semantic event type and its JSON codec.

pub mod codec;
pub mod event;

pub use codec::{decode_event, encode_event, ProtocolError};
pub use event::*;
