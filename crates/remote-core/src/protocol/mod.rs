//! Protocol module containing message types and the JSON codec.

pub mod codec;
pub mod messages;

pub use codec::{decode, encode, DecodeError};
pub use messages::*;
