//! Numeric field codec for ASD-STAN Direct Remote ID messages
//!
//!  Pure scale/quantization transforms from the fixed-width wire integers
//!  to physical units, per the ASTM F3411 encoding tables. Every function
//!  is total over its input type; sentinel raw values decode to the
//!  documented sentinel physical values and are never collapsed away.

/// Altitude sentinel produced when the raw field is zero (unknown/invalid).
#[allow(dead_code)]
pub const ALTITUDE_UNKNOWN: f32 = -1000.0;

/// Direction sentinel meaning the track direction is unknown.
#[allow(dead_code)]
pub const DIRECTION_UNKNOWN: f32 = 361.0;

/// Horizontal speed sentinel in m/s (raw 255 with the coarse multiplier).
#[allow(dead_code)]
pub const HORIZONTAL_SPEED_UNKNOWN: f32 = 255.0;

/// Vertical speed sentinel magnitude in m/s.
#[allow(dead_code)]
pub const VERTICAL_SPEED_UNKNOWN: f32 = 63.0;

/// Raw location timestamp value meaning "unknown".
#[allow(dead_code)]
pub const TIMESTAMP_UNKNOWN_RAW: u16 = 0xFFFF;

/// Unix seconds at the Remote ID epoch, 2019-01-01 00:00:00 UTC.
pub const REMOTE_ID_EPOCH: i64 = 1_546_300_800;

/// Decode an altitude/height field: 0.5 m steps offset by -1000 m.
///
/// A raw value of 0 yields exactly -1000.0, the standard's
/// "unknown or invalid" sentinel.
pub fn decode_altitude(raw: u16) -> f32 {
    raw as f32 * 0.5 - 1000.0
}

/// Decode a latitude/longitude field: 1e-7 degree steps, signed.
///
/// A raw value of 0 yields 0.0, which the standard defines as
/// "unpopulated". The codec does not distinguish that from a genuine
/// zero reading; that is the consumer's call.
pub fn decode_coordinate(raw: i32) -> f64 {
    raw as f64 * 1e-7
}

/// Decode the track direction in degrees.
///
/// The wire carries a 0-179 degree value plus a separate east/west
/// segment flag that adds 180. The reserved value 361 means unknown.
/// Values above 359 other than 361 are returned as decoded; range
/// validation is left to the caller.
pub fn decode_direction(raw: u8, east_west_segment: bool) -> f32 {
    let degrees = raw as u16 + if east_west_segment { 180 } else { 0 };
    degrees as f32
}

/// Decode the horizontal (ground) speed in m/s.
///
/// Two-segment scale selected by the speed-multiplier flag from the
/// Location flags byte: 0.25 m/s steps below the breakpoint, 0.75 m/s
/// steps offset by 63.75 m/s above it. Maximum encodable speed is
/// 254.25 m/s; raw 255 on the coarse segment is the 255 m/s unknown
/// sentinel.
pub fn decode_horizontal_speed(raw: u8, coarse_multiplier: bool) -> f32 {
    if coarse_multiplier {
        raw as f32 * 0.75 + 255.0 * 0.25
    } else {
        raw as f32 * 0.25
    }
}

/// Decode the vertical speed in m/s: signed 0.5 m/s steps.
///
/// Positive is climb, negative is descent. The maximum magnitude is
/// 62 m/s; ±63 is the unknown sentinel.
pub fn decode_vertical_speed(raw: i8) -> f32 {
    raw as f32 * 0.5
}

/// Decode the Location timestamp: tenths of a second since the start
/// of the current UTC hour.
///
/// The raw sentinel 0xFFFF (unknown) decodes to 6553.5, outside the
/// 0..3600 range of valid values.
pub fn decode_timestamp(raw: u16) -> f32 {
    raw as f32 * 0.1
}

/// Decode the System message timestamp to Unix seconds.
///
/// The wire carries UTC seconds since the Remote ID epoch (2019-01-01).
pub fn decode_system_timestamp(raw: u32) -> i64 {
    raw as i64 + REMOTE_ID_EPOCH
}

/// Read a little-endian u16 at `offset`.
pub fn le_u16(payload: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([payload[offset], payload[offset + 1]])
}

/// Read a little-endian u32 at `offset`.
pub fn le_u32(payload: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        payload[offset],
        payload[offset + 1],
        payload[offset + 2],
        payload[offset + 3],
    ])
}

/// Read a little-endian i32 at `offset`.
pub fn le_i32(payload: &[u8], offset: usize) -> i32 {
    i32::from_le_bytes([
        payload[offset],
        payload[offset + 1],
        payload[offset + 2],
        payload[offset + 3],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_altitude_sentinel() {
        assert_eq!(decode_altitude(0), ALTITUDE_UNKNOWN);
        assert_eq!(decode_altitude(0), -1000.0);
    }

    #[test]
    fn test_altitude_scale() {
        assert_eq!(decode_altitude(2000), 0.0);
        assert_eq!(decode_altitude(2001), 0.5);
        assert_eq!(decode_altitude(u16::MAX), 31767.5);
    }

    #[test]
    fn test_altitude_monotonic() {
        // non-decreasing over the whole raw domain
        let mut prev = decode_altitude(0);
        for raw in 1..=u16::MAX {
            let v = decode_altitude(raw);
            assert!(v >= prev, "altitude decreased at raw {}", raw);
            prev = v;
        }
    }

    #[test]
    fn test_coordinate_scale() {
        assert_eq!(decode_coordinate(0), 0.0);
        assert_eq!(decode_coordinate(511_975_420), 51.1975420);
        assert_eq!(decode_coordinate(-1_800_000_000), -180.0);
    }

    #[test]
    fn test_coordinate_symmetry() {
        // antisymmetric except at i32::MIN
        for raw in [1, 45, 900_000_000, 1_800_000_000, i32::MAX] {
            assert_eq!(decode_coordinate(raw), -decode_coordinate(-raw));
        }
    }

    #[test]
    fn test_direction() {
        assert_eq!(decode_direction(0, false), 0.0);
        assert_eq!(decode_direction(179, false), 179.0);
        assert_eq!(decode_direction(0, true), 180.0);
        assert_eq!(decode_direction(179, true), 359.0);
        // 361 sentinel as encoded on the wire
        assert_eq!(decode_direction(181, true), DIRECTION_UNKNOWN);
        // out-of-range raws decode permissively
        assert_eq!(decode_direction(255, true), 435.0);
    }

    #[test]
    fn test_horizontal_speed_segments() {
        assert_eq!(decode_horizontal_speed(0, false), 0.0);
        assert_eq!(decode_horizontal_speed(4, false), 1.0);
        assert_eq!(decode_horizontal_speed(255, false), 63.75);
        assert_eq!(decode_horizontal_speed(0, true), 63.75);
        assert_eq!(decode_horizontal_speed(254, true), 254.25);
        assert_eq!(decode_horizontal_speed(255, true), HORIZONTAL_SPEED_UNKNOWN);
    }

    #[test]
    fn test_vertical_speed() {
        assert_eq!(decode_vertical_speed(0), 0.0);
        assert_eq!(decode_vertical_speed(10), 5.0);
        assert_eq!(decode_vertical_speed(-10), -5.0);
        assert_eq!(decode_vertical_speed(126), 63.0);
        assert_eq!(decode_vertical_speed(-126), -VERTICAL_SPEED_UNKNOWN);
    }

    #[test]
    fn test_timestamp() {
        assert_eq!(decode_timestamp(0), 0.0);
        assert_eq!(decode_timestamp(36000), 3600.0);
        assert_eq!(decode_timestamp(1234), 123.4);
        assert!(decode_timestamp(TIMESTAMP_UNKNOWN_RAW) > 3600.0);
    }

    #[test]
    fn test_system_timestamp() {
        assert_eq!(decode_system_timestamp(0), REMOTE_ID_EPOCH);
        // 2019-01-01 00:01:40 UTC
        assert_eq!(decode_system_timestamp(100), 1_546_300_900);
    }

    #[test]
    fn test_le_readers() {
        let buf = [0x01, 0x02, 0x03, 0x04, 0xFF];
        assert_eq!(le_u16(&buf, 0), 0x0201);
        assert_eq!(le_u16(&buf, 3), 0xFF04);
        assert_eq!(le_u32(&buf, 0), 0x04030201);
        assert_eq!(le_i32(&buf, 1), 0xFF040302u32 as i32);
    }
}
