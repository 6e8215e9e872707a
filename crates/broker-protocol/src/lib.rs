//! # Broker Protocol
//!
//! The fixed-layout binary wire codec for the VerniyMQ TCP protocol:
//! UTF-32BE fixed-width strings, big-endian integers, and the auth, header,
//! response, and message frames built from them.

pub mod codec;
pub mod command;
pub mod error;
pub mod frames;

pub use command::{Command, ResponseResult};
pub use error::CodecError;
pub use frames::{
    AuthFrame, HeaderFrame, MessageFrame, ResponseHeader, AUTH_FRAME_SIZE, HEADER_FRAME_SIZE,
    MESSAGE_ID_BYTES, RESPONSE_HEADER_SIZE,
};
