//! Fixed-layout frames exchanged over the TCP connection.
//!
//! All multi-byte integers are big-endian; all string fields are fixed-width
//! UTF-32BE, zero-padded, with trailing NUL units trimmed on decode.

use crate::codec::{decode_utf32_fixed, encode_utf32_fixed};
use crate::command::{Command, ResponseResult};
use crate::error::CodecError;

pub const ACCOUNT_ID_UNITS: usize = 32;
pub const PASSWORD_UNITS: usize = 64;
pub const SESSION_TOKEN_UNITS: usize = 32;
pub const QUEUE_NAME_UNITS: usize = 128;
pub const MESSAGE_ID_BYTES: usize = 26;

pub const AUTH_FRAME_SIZE: usize = ACCOUNT_ID_UNITS * 4 + PASSWORD_UNITS * 4;
pub const HEADER_FRAME_SIZE: usize = SESSION_TOKEN_UNITS * 4 + 1 + QUEUE_NAME_UNITS * 4 + 8;
pub const RESPONSE_HEADER_SIZE: usize = 1 + 8;

/// Credentials sent once at the start of a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFrame {
    pub account_id: String,
    pub password: String,
}

impl AuthFrame {
    pub fn encode(&self) -> [u8; AUTH_FRAME_SIZE] {
        let mut out = [0u8; AUTH_FRAME_SIZE];
        out[0..ACCOUNT_ID_UNITS * 4]
            .copy_from_slice(&encode_utf32_fixed(&self.account_id, ACCOUNT_ID_UNITS));
        out[ACCOUNT_ID_UNITS * 4..].copy_from_slice(&encode_utf32_fixed(
            &self.password,
            PASSWORD_UNITS,
        ));
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() != AUTH_FRAME_SIZE {
            return Err(CodecError::BufferTooShort {
                expected: AUTH_FRAME_SIZE,
                actual: bytes.len(),
            });
        }
        let account_id = decode_utf32_fixed(&bytes[0..ACCOUNT_ID_UNITS * 4], "account_id")?;
        let password = decode_utf32_fixed(&bytes[ACCOUNT_ID_UNITS * 4..], "password")?;
        Ok(Self {
            account_id,
            password,
        })
    }
}

/// Header preceding every post-authentication command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderFrame {
    pub session_token: String,
    pub command: Command,
    pub queue_name: String,
    pub data_size: u64,
}

impl HeaderFrame {
    pub fn encode(&self) -> [u8; HEADER_FRAME_SIZE] {
        let mut out = [0u8; HEADER_FRAME_SIZE];
        let mut offset = 0;

        out[offset..offset + SESSION_TOKEN_UNITS * 4]
            .copy_from_slice(&encode_utf32_fixed(&self.session_token, SESSION_TOKEN_UNITS));
        offset += SESSION_TOKEN_UNITS * 4;

        out[offset] = self.command.as_u8();
        offset += 1;

        out[offset..offset + QUEUE_NAME_UNITS * 4]
            .copy_from_slice(&encode_utf32_fixed(&self.queue_name, QUEUE_NAME_UNITS));
        offset += QUEUE_NAME_UNITS * 4;

        out[offset..offset + 8].copy_from_slice(&self.data_size.to_be_bytes());
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() != HEADER_FRAME_SIZE {
            return Err(CodecError::BufferTooShort {
                expected: HEADER_FRAME_SIZE,
                actual: bytes.len(),
            });
        }
        let mut offset = 0;

        let session_token =
            decode_utf32_fixed(&bytes[offset..offset + SESSION_TOKEN_UNITS * 4], "session_token")?;
        offset += SESSION_TOKEN_UNITS * 4;

        let command = Command::try_from(bytes[offset])?;
        offset += 1;

        let queue_name =
            decode_utf32_fixed(&bytes[offset..offset + QUEUE_NAME_UNITS * 4], "queue_name")?;
        offset += QUEUE_NAME_UNITS * 4;

        let data_size = u64::from_be_bytes(bytes[offset..offset + 8].try_into().unwrap());

        Ok(Self {
            session_token,
            command,
            queue_name,
            data_size,
        })
    }

    /// A `HeaderFrame` whose raw bytes are all zero — tolerated as a
    /// no-op keep-alive.
    pub fn is_blank(bytes: &[u8]) -> bool {
        bytes.iter().all(|b| *b == 0)
    }
}

/// Fixed 9-byte header preceding every response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseHeader {
    pub result: ResponseResult,
    pub data_size: u64,
}

impl ResponseHeader {
    pub fn encode(&self) -> [u8; RESPONSE_HEADER_SIZE] {
        let mut out = [0u8; RESPONSE_HEADER_SIZE];
        out[0] = self.result.as_u8();
        out[1..9].copy_from_slice(&self.data_size.to_be_bytes());
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() != RESPONSE_HEADER_SIZE {
            return Err(CodecError::BufferTooShort {
                expected: RESPONSE_HEADER_SIZE,
                actual: bytes.len(),
            });
        }
        let result = ResponseResult::try_from(bytes[0])?;
        let data_size = u64::from_be_bytes(bytes[1..9].try_into().unwrap());
        Ok(Self { result, data_size })
    }
}

/// 26-byte message id followed by the payload, the body of a `Consume`
/// response.
pub struct MessageFrame;

impl MessageFrame {
    /// Concatenate the id and payload into a single response body.
    pub fn encode(id: &[u8; MESSAGE_ID_BYTES], payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(MESSAGE_ID_BYTES + payload.len());
        out.extend_from_slice(id);
        out.extend_from_slice(payload);
        out
    }

    /// Split a response body into its id prefix and payload.
    pub fn decode(bytes: &[u8]) -> Result<([u8; MESSAGE_ID_BYTES], &[u8]), CodecError> {
        if bytes.len() < MESSAGE_ID_BYTES {
            return Err(CodecError::BufferTooShort {
                expected: MESSAGE_ID_BYTES,
                actual: bytes.len(),
            });
        }
        let mut id = [0u8; MESSAGE_ID_BYTES];
        id.copy_from_slice(&bytes[0..MESSAGE_ID_BYTES]);
        Ok((id, &bytes[MESSAGE_ID_BYTES..]))
    }
}

#[cfg(test)]
#[path = "frames_tests.rs"]
mod tests;
