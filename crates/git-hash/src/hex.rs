use crate::HashError;

const HEX_ENCODE: &[u8; 16] = b"0123456789abcdef";

fn nibble(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Hex-encode `bytes` to a new lowercase `String`.
pub fn hex_to_string(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        s.push(HEX_ENCODE[(b >> 4) as usize] as char);
        s.push(HEX_ENCODE[(b & 0x0f) as usize] as char);
    }
    s
}

/// Decode a hex string into `buf`. The caller has already checked that
/// `hex.len() == buf.len() * 2`.
pub(crate) fn hex_decode(hex: &str, buf: &mut [u8]) -> Result<(), HashError> {
    let hex = hex.as_bytes();
    debug_assert_eq!(hex.len(), buf.len() * 2);
    for (i, out) in buf.iter_mut().enumerate() {
        let pos = i * 2;
        let hi = nibble(hex[pos]).ok_or(HashError::InvalidHex {
            position: pos,
            character: hex[pos] as char,
        })?;
        let lo = nibble(hex[pos + 1]).ok_or(HashError::InvalidHex {
            position: pos + 1,
            character: hex[pos + 1] as char,
        })?;
        *out = (hi << 4) | lo;
    }
    Ok(())
}
