/// Shared helpers for diagnostics
use std::fmt::Write;

/// Render a byte slice as lowercase hex for logging and raw-value
/// diagnostics.
pub fn hex_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        // write! to a String cannot fail
        let _ = write!(out, "{:02x}", byte);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_string() {
        assert_eq!(hex_string(&[]), "");
        assert_eq!(hex_string(&[0xFF, 0x00, 0x0B]), "ff000b");
    }
}
