/// Decoding of the WS980WiFi fixed-layout response frame
use log::{debug, warn};

use crate::models::DecodedReading;
use crate::protocol::fields::FieldSpec;
use crate::utils::hex_string;

/// Length in bytes of a usable station response.
///
/// The station answers the status query with a single 82-byte record
/// (164 hex characters). Anything else is treated as "no data this
/// cycle": every field decodes to `None` rather than failing the poll.
pub const EXPECTED_FRAME_LEN: usize = 82;

/// Decode a raw response frame into one reading per field spec, in
/// table order.
///
/// A frame of the wrong length (including an empty buffer from a
/// zero-byte read) yields all-absent readings and never an error, so
/// the caller's retry logic only has to care about transport failures.
pub fn decode_frame(specs: &[FieldSpec], frame: &[u8]) -> Vec<DecodedReading> {
    if frame.len() != EXPECTED_FRAME_LEN {
        if !frame.is_empty() {
            warn!(
                "Discarding frame of unexpected length {} (expected {})",
                frame.len(),
                EXPECTED_FRAME_LEN
            );
        }
        return specs
            .iter()
            .map(|spec| DecodedReading {
                key: spec.key,
                value: None,
                raw_hex: String::new(),
            })
            .collect();
    }

    specs
        .iter()
        .map(|spec| {
            let slice = &frame[spec.offset..spec.offset + spec.width];
            let value = decode_field(spec, slice);
            debug!("Read data of {}: {} -> {:?}", spec.key, hex_string(slice), value);
            DecodedReading {
                key: spec.key,
                value,
                raw_hex: hex_string(slice),
            }
        })
        .collect()
}

/// Decode one field slice to its physical value, or `None` for a
/// sentinel pattern.
fn decode_field(spec: &FieldSpec, slice: &[u8]) -> Option<f64> {
    if is_sentinel(slice) {
        return None;
    }

    // Big-endian integer, assembled before any scaling so equal raw
    // bytes always produce bit-identical floats.
    let mut raw: u64 = 0;
    for byte in slice {
        raw = (raw << 8) | u64::from(*byte);
    }

    let value = if spec.signed {
        sign_extend(raw, spec.width) as f64
    } else {
        raw as f64
    };

    Some(value / f64::from(spec.scale))
}

/// Width-specific patterns the station uses for "sensor not installed".
/// A short or empty slice counts as sentinel too.
fn is_sentinel(slice: &[u8]) -> bool {
    matches!(
        slice,
        []
            | [0xFF]
            | [0x7F, 0xFF]
            | [0x0F, 0xFF]
            | [0xFF, 0xFF]
            | [0x00, 0x00, 0x00, 0x00]
            | [0x00, 0xFF, 0xFF, 0xFF]
    )
}

/// Two's-complement interpretation of a `width`-byte big-endian value.
fn sign_extend(raw: u64, width: usize) -> i64 {
    let bits = width as u32 * 8;
    if raw & (1 << (bits - 1)) != 0 {
        raw as i64 - (1i64 << bits)
    } else {
        raw as i64
    }
}
