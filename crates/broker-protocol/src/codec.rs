//! UTF-32BE fixed-width string encoding shared by every frame.

use crate::error::CodecError;

/// Encode `s` into exactly `units` 4-byte big-endian code units, zero-padding
/// any remainder. Panics if `s` has more than `units` characters — callers
/// validate field lengths before encoding.
pub fn encode_utf32_fixed(s: &str, units: usize) -> Vec<u8> {
    let chars: Vec<char> = s.chars().collect();
    assert!(
        chars.len() <= units,
        "string has {} code points, field only holds {units}",
        chars.len()
    );
    let mut out = Vec::with_capacity(units * 4);
    for ch in &chars {
        out.extend_from_slice(&(*ch as u32).to_be_bytes());
    }
    out.resize(units * 4, 0);
    out
}

/// Decode `units` 4-byte big-endian code units, trimming trailing NUL units.
pub fn decode_utf32_fixed(bytes: &[u8], field: &str) -> Result<String, CodecError> {
    let mut chars = Vec::new();
    for chunk in bytes.chunks_exact(4) {
        let code = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        if code == 0 {
            break;
        }
        let ch = char::from_u32(code).ok_or_else(|| CodecError::InvalidUtf32 {
            field: field.to_string(),
        })?;
        chars.push(ch);
    }
    Ok(chars.into_iter().collect())
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
