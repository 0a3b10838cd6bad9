//! Encoded polyline format used by the directions service.
//!
//! Each coordinate is stored as a zig-zag delta against the previous point,
//! split into 5-bit chunks offset by 63 so the result is printable ASCII.

/// Precision used by the directions service (1e-5 degrees).
pub const DIRECTIONS_PRECISION: u32 = 5;

const CHUNK_BITS: u32 = 5;
const CHUNK_MASK: i64 = 0x1f;
const CONTINUATION: i64 = 0x20;
const ASCII_OFFSET: u8 = 63;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PolylineError {
    #[error("polyline truncated at byte {0}")]
    Truncated(usize),
    #[error("invalid polyline byte {byte:#04x} at {index}")]
    InvalidByte { byte: u8, index: usize },
    #[error("polyline value overflows at byte {0}")]
    Overflow(usize),
}

/// Decodes into `(latitude, longitude)` pairs.
pub fn decode(encoded: &str, precision: u32) -> Result<Vec<(f64, f64)>, PolylineError> {
    let factor = 10_f64.powi(precision as i32);
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut latitude: i64 = 0;
    let mut longitude: i64 = 0;
    let mut points = Vec::new();

    while index < bytes.len() {
        latitude = accumulate(latitude, bytes, &mut index)?;
        longitude = accumulate(longitude, bytes, &mut index)?;
        points.push((latitude as f64 / factor, longitude as f64 / factor));
    }

    Ok(points)
}

pub fn encode(points: &[(f64, f64)], precision: u32) -> String {
    let factor = 10_f64.powi(precision as i32);
    let mut output = String::new();
    let mut previous = (0_i64, 0_i64);

    for &(latitude, longitude) in points {
        let current = (
            (latitude * factor).round() as i64,
            (longitude * factor).round() as i64,
        );
        push_value(current.0 - previous.0, &mut output);
        push_value(current.1 - previous.1, &mut output);
        previous = current;
    }

    output
}

/// Applies the next delta to a running coordinate.
fn accumulate(total: i64, bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
    let start = *index;
    let delta = next_delta(bytes, index)?;
    total
        .checked_add(delta)
        .ok_or(PolylineError::Overflow(start))
}

fn next_delta(bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let byte = *bytes.get(*index).ok_or(PolylineError::Truncated(*index))?;
        if !(ASCII_OFFSET..=ASCII_OFFSET + 63).contains(&byte) {
            return Err(PolylineError::InvalidByte {
                byte,
                index: *index,
            });
        }
        if shift > 60 {
            return Err(PolylineError::Overflow(*index));
        }
        *index += 1;

        let chunk = (byte - ASCII_OFFSET) as i64;
        result |= (chunk & CHUNK_MASK) << shift;
        shift += CHUNK_BITS;
        if chunk & CONTINUATION == 0 {
            break;
        }
    }

    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

fn push_value(value: i64, output: &mut String) {
    let mut remaining = if value < 0 { !(value << 1) } else { value << 1 };
    while remaining >= CONTINUATION {
        output.push(((((remaining & CHUNK_MASK) | CONTINUATION) as u8) + ASCII_OFFSET) as char);
        remaining >>= CHUNK_BITS;
    }
    output.push(((remaining as u8) + ASCII_OFFSET) as char);
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    #[test]
    fn decode_reference_polyline() {
        let points = decode(REFERENCE, DIRECTIONS_PRECISION).unwrap();
        assert_eq!(
            points,
            vec![(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)]
        );
    }

    #[test]
    fn encode_reference_points() {
        let encoded = encode(
            &[(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)],
            DIRECTIONS_PRECISION,
        );
        assert_eq!(encoded, REFERENCE);
    }

    #[test]
    fn empty_input_decodes_to_no_points() {
        assert!(decode("", DIRECTIONS_PRECISION).unwrap().is_empty());
    }

    #[test]
    fn truncated_and_invalid_input_is_rejected() {
        // latitude present, longitude missing
        assert_eq!(
            decode("_p~iF", DIRECTIONS_PRECISION),
            Err(PolylineError::Truncated(5))
        );
        assert!(matches!(
            decode("_p~iF ps|U", DIRECTIONS_PRECISION),
            Err(PolylineError::InvalidByte { byte: b' ', index: 5 })
        ));
    }

    #[test]
    fn runaway_deltas_report_overflow() {
        // each group is a near-maximal positive delta; the third on one axis overflows
        let encoded = "}~~~~~~~~~~~F".repeat(6);
        assert_eq!(
            decode(&encoded, DIRECTIONS_PRECISION),
            Err(PolylineError::Overflow(52))
        );
    }
}
