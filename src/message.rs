//! ASD-STAN Direct Remote ID message decoder
//!
//!  Decodes single 25-byte broadcast messages into structured records.
//!
//! Field layouts follow the ASTM F3411 / ASD-STAN prEN 4709-002 message
//! tables. Decoding is total: every byte pattern produces a record, with
//! unrecognized discriminants preserved in `Unknown` variants instead of
//! being rejected. Payload bytes the standard marks reserved (e.g. the
//! Basic ID and Operator ID tails) are not carried in the records.

use std::fmt;

use serde::Serialize;

use crate::codec;

/// Payload length of a single message, without the header byte.
pub const MESSAGE_PAYLOAD_BYTES: usize = 24;

/// Full length of a single message including the header byte.
pub const MESSAGE_BYTES: usize = 25;

/// Header type nibble reserved for the message-pack wrapper.
pub const PACK_TYPE_NIBBLE: u8 = 0xF;

/// Message type from the header's high nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MessageType {
    BasicId,
    Location,
    Auth,
    SelfId,
    System,
    OperatorId,
    Unknown(u8),
}

impl MessageType {
    /// Classify a header type nibble.
    pub fn from_nibble(nibble: u8) -> Self {
        match nibble {
            0 => MessageType::BasicId,
            1 => MessageType::Location,
            2 => MessageType::Auth,
            3 => MessageType::SelfId,
            4 => MessageType::System,
            5 => MessageType::OperatorId,
            n => MessageType::Unknown(n),
        }
    }
}

/// UAS identifier type carried in a Basic ID message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IdType {
    /// Not assigned.
    None,
    /// ANSI/CTA-2063-A serial number (text).
    SerialNumber,
    /// Civil Aviation Authority registration (text).
    CaaRegistrationId,
    /// UTM-assigned UUID (binary).
    UtmAssignedUuid,
    /// ICAO-managed specific session ID (binary).
    SpecificSessionId,
    Unknown(u8),
}

impl From<u8> for IdType {
    fn from(raw: u8) -> Self {
        match raw {
            0 => IdType::None,
            1 => IdType::SerialNumber,
            2 => IdType::CaaRegistrationId,
            3 => IdType::UtmAssignedUuid,
            4 => IdType::SpecificSessionId,
            n => IdType::Unknown(n),
        }
    }
}

impl IdType {
    /// Whether the UAS ID bytes are NUL-padded text rather than binary.
    pub fn is_textual(&self) -> bool {
        matches!(self, IdType::SerialNumber | IdType::CaaRegistrationId)
    }
}

/// Airframe type carried in a Basic ID message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UavType {
    None,
    Aeroplane,
    Copter,
    Gyroplane,
    HybridLift,
    Ornithopter,
    Glider,
    Kite,
    FreeBalloon,
    CaptiveBalloon,
    Airship,
    FreeFallParachute,
    Rocket,
    TetheredPoweredAircraft,
    GroundObstacle,
    Other,
    Unknown(u8),
}

impl From<u8> for UavType {
    fn from(raw: u8) -> Self {
        match raw {
            0 => UavType::None,
            1 => UavType::Aeroplane,
            2 => UavType::Copter,
            3 => UavType::Gyroplane,
            4 => UavType::HybridLift,
            5 => UavType::Ornithopter,
            6 => UavType::Glider,
            7 => UavType::Kite,
            8 => UavType::FreeBalloon,
            9 => UavType::CaptiveBalloon,
            10 => UavType::Airship,
            11 => UavType::FreeFallParachute,
            12 => UavType::Rocket,
            13 => UavType::TetheredPoweredAircraft,
            14 => UavType::GroundObstacle,
            15 => UavType::Other,
            n => UavType::Unknown(n),
        }
    }
}

/// Operational status from the Location message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UavStatus {
    Undeclared,
    Ground,
    Airborne,
    Emergency,
    /// Remote ID system failure.
    Failure,
    Unknown(u8),
}

impl From<u8> for UavStatus {
    fn from(raw: u8) -> Self {
        match raw {
            0 => UavStatus::Undeclared,
            1 => UavStatus::Ground,
            2 => UavStatus::Airborne,
            3 => UavStatus::Emergency,
            4 => UavStatus::Failure,
            n => UavStatus::Unknown(n),
        }
    }
}

/// Reference datum for the height field (single wire bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HeightReference {
    /// Height above the takeoff point.
    TakeOff,
    /// Height above ground level.
    Ground,
}

impl HeightReference {
    fn from_bit(bit: bool) -> Self {
        if bit {
            HeightReference::Ground
        } else {
            HeightReference::TakeOff
        }
    }
}

/// Horizontal position accuracy bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HorizontalAccuracy {
    /// No estimate available (or worse than 10 NM).
    Unspecified,
    Nm10,
    Nm4,
    Nm2,
    Nm1,
    Nm0_5,
    Nm0_3,
    Nm0_1,
    Nm0_05,
    M30,
    M10,
    M3,
    M1,
    Unknown(u8),
}

impl From<u8> for HorizontalAccuracy {
    fn from(raw: u8) -> Self {
        match raw {
            0 => HorizontalAccuracy::Unspecified,
            1 => HorizontalAccuracy::Nm10,
            2 => HorizontalAccuracy::Nm4,
            3 => HorizontalAccuracy::Nm2,
            4 => HorizontalAccuracy::Nm1,
            5 => HorizontalAccuracy::Nm0_5,
            6 => HorizontalAccuracy::Nm0_3,
            7 => HorizontalAccuracy::Nm0_1,
            8 => HorizontalAccuracy::Nm0_05,
            9 => HorizontalAccuracy::M30,
            10 => HorizontalAccuracy::M10,
            11 => HorizontalAccuracy::M3,
            12 => HorizontalAccuracy::M1,
            n => HorizontalAccuracy::Unknown(n),
        }
    }
}

/// Vertical position accuracy bucket (also used for baro altitude).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VerticalAccuracy {
    Unspecified,
    M150,
    M45,
    M25,
    M10,
    M3,
    M1,
    Unknown(u8),
}

impl From<u8> for VerticalAccuracy {
    fn from(raw: u8) -> Self {
        match raw {
            0 => VerticalAccuracy::Unspecified,
            1 => VerticalAccuracy::M150,
            2 => VerticalAccuracy::M45,
            3 => VerticalAccuracy::M25,
            4 => VerticalAccuracy::M10,
            5 => VerticalAccuracy::M3,
            6 => VerticalAccuracy::M1,
            n => VerticalAccuracy::Unknown(n),
        }
    }
}

/// Speed accuracy bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpeedAccuracy {
    Unspecified,
    Mps10,
    Mps3,
    Mps1,
    Mps0_3,
    Unknown(u8),
}

impl From<u8> for SpeedAccuracy {
    fn from(raw: u8) -> Self {
        match raw {
            0 => SpeedAccuracy::Unspecified,
            1 => SpeedAccuracy::Mps10,
            2 => SpeedAccuracy::Mps3,
            3 => SpeedAccuracy::Mps1,
            4 => SpeedAccuracy::Mps0_3,
            n => SpeedAccuracy::Unknown(n),
        }
    }
}

/// Timestamp accuracy: multiples of 0.1 s, 0 = no estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimestampAccuracy {
    Unspecified,
    /// Accuracy in tenths of a second, 1..=15.
    Tenths(u8),
}

impl From<u8> for TimestampAccuracy {
    fn from(raw: u8) -> Self {
        match raw {
            0 => TimestampAccuracy::Unspecified,
            n => TimestampAccuracy::Tenths(n),
        }
    }
}

impl TimestampAccuracy {
    /// Accuracy in seconds, if an estimate is present.
    #[allow(dead_code)]
    pub fn seconds(&self) -> Option<f32> {
        match self {
            TimestampAccuracy::Unspecified => None,
            TimestampAccuracy::Tenths(n) => Some(*n as f32 * 0.1),
        }
    }
}

/// Kind of text carried by a Self ID message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DescriptionType {
    /// Free-form information text.
    Text,
    /// Emergency status description.
    Emergency,
    /// Extended status description.
    ExtendedStatus,
    Unknown(u8),
}

impl From<u8> for DescriptionType {
    fn from(raw: u8) -> Self {
        match raw {
            0 => DescriptionType::Text,
            1 => DescriptionType::Emergency,
            2 => DescriptionType::ExtendedStatus,
            n => DescriptionType::Unknown(n),
        }
    }
}

/// Which location the System message reports for the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperatorLocationType {
    TakeOff,
    LiveGnss,
    Fixed,
    Unknown(u8),
}

impl From<u8> for OperatorLocationType {
    fn from(raw: u8) -> Self {
        match raw {
            0 => OperatorLocationType::TakeOff,
            1 => OperatorLocationType::LiveGnss,
            2 => OperatorLocationType::Fixed,
            n => OperatorLocationType::Unknown(n),
        }
    }
}

/// Regulatory regime the classification fields belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperatorClassification {
    Undeclared,
    EuropeanUnion,
    Unknown(u8),
}

impl From<u8> for OperatorClassification {
    fn from(raw: u8) -> Self {
        match raw {
            0 => OperatorClassification::Undeclared,
            1 => OperatorClassification::EuropeanUnion,
            n => OperatorClassification::Unknown(n),
        }
    }
}

/// European UAV category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UavEuCategory {
    Undeclared,
    Open,
    Specific,
    Certified,
    Unknown(u8),
}

impl From<u8> for UavEuCategory {
    fn from(raw: u8) -> Self {
        match raw {
            0 => UavEuCategory::Undeclared,
            1 => UavEuCategory::Open,
            2 => UavEuCategory::Specific,
            3 => UavEuCategory::Certified,
            n => UavEuCategory::Unknown(n),
        }
    }
}

/// European UAV class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UavEuClass {
    Undeclared,
    Class0,
    Class1,
    Class2,
    Class3,
    Class4,
    Class5,
    Class6,
    Unknown(u8),
}

impl From<u8> for UavEuClass {
    fn from(raw: u8) -> Self {
        match raw {
            0 => UavEuClass::Undeclared,
            1 => UavEuClass::Class0,
            2 => UavEuClass::Class1,
            3 => UavEuClass::Class2,
            4 => UavEuClass::Class3,
            5 => UavEuClass::Class4,
            6 => UavEuClass::Class5,
            7 => UavEuClass::Class6,
            n => UavEuClass::Unknown(n),
        }
    }
}

/// Authentication method from an Auth message header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuthType {
    None,
    UasIdSignature,
    OperatorIdSignature,
    MessageSetSignature,
    NetworkRemoteId,
    SpecificMethod,
    Unknown(u8),
}

impl From<u8> for AuthType {
    fn from(raw: u8) -> Self {
        match raw {
            0 => AuthType::None,
            1 => AuthType::UasIdSignature,
            2 => AuthType::OperatorIdSignature,
            3 => AuthType::MessageSetSignature,
            4 => AuthType::NetworkRemoteId,
            5 => AuthType::SpecificMethod,
            n => AuthType::Unknown(n),
        }
    }
}

/// Basic ID message: who the UAS is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicIdRecord {
    pub version: u8,
    pub id_type: IdType,
    pub uav_type: UavType,
    /// Raw identifier bytes; interpretation depends on `id_type`.
    pub uas_id: [u8; 20],
}

impl BasicIdRecord {
    /// Render the UAS ID as trimmed text when the ID type is textual.
    pub fn uas_id_string(&self) -> Option<String> {
        if self.id_type.is_textual() {
            Some(trimmed_text(&self.uas_id))
        } else {
            None
        }
    }
}

/// Location/Vector message: where the UAS is and how it moves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationRecord {
    pub version: u8,
    pub status: UavStatus,
    pub height_reference: HeightReference,
    /// Track direction in degrees; 361 = unknown.
    pub direction: f32,
    /// Ground speed in m/s; 255 = unknown.
    pub horizontal_speed: f32,
    /// Climb (+) / descent (-) speed in m/s; ±63 = unknown.
    pub vertical_speed: f32,
    /// Degrees; 0.0 = unpopulated.
    pub latitude: f64,
    /// Degrees; 0.0 = unpopulated.
    pub longitude: f64,
    /// Meters; -1000 = unknown.
    pub baro_altitude: f32,
    /// Meters; -1000 = unknown.
    pub geo_altitude: f32,
    /// Meters above `height_reference`; -1000 = unknown.
    pub height: f32,
    pub horizontal_accuracy: HorizontalAccuracy,
    pub vertical_accuracy: VerticalAccuracy,
    pub baro_accuracy: VerticalAccuracy,
    pub speed_accuracy: SpeedAccuracy,
    /// Seconds since the start of the current UTC hour.
    pub timestamp: f32,
    pub timestamp_accuracy: TimestampAccuracy,
}

/// One page of an Authentication message.
///
/// Pages are surfaced independently in arrival order; reassembling the
/// full authentication payload is the caller's concern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthRecord {
    pub version: u8,
    pub auth_type: AuthType,
    pub page_number: u8,
    /// Index of the last page; page 0 only.
    pub last_page_index: Option<u8>,
    /// Total authentication data length in bytes; page 0 only.
    pub length: Option<u8>,
    /// Unix timestamp; page 0 only.
    pub timestamp: Option<i64>,
    /// Authentication data carried by this page (17 bytes on page 0,
    /// 23 bytes on later pages).
    pub data: Vec<u8>,
}

/// Self ID message: free-text self description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelfIdRecord {
    pub version: u8,
    pub description_type: DescriptionType,
    /// Raw NUL-padded description bytes.
    pub description_raw: [u8; 23],
}

impl SelfIdRecord {
    /// Description with trailing padding trimmed.
    pub fn description(&self) -> String {
        trimmed_text(&self.description_raw)
    }
}

/// System message: operator location and operating-area data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemRecord {
    pub version: u8,
    pub operator_location_type: OperatorLocationType,
    pub classification: OperatorClassification,
    /// Degrees; 0.0 = unpopulated.
    pub operator_latitude: f64,
    /// Degrees; 0.0 = unpopulated.
    pub operator_longitude: f64,
    pub area_count: u16,
    /// Meters.
    pub area_radius: u16,
    /// Meters; -1000 = unknown.
    pub area_ceiling: f32,
    /// Meters; -1000 = unknown.
    pub area_floor: f32,
    pub eu_category: UavEuCategory,
    pub eu_class: UavEuClass,
    /// Meters; -1000 = unknown.
    pub operator_altitude: f32,
    /// Unix seconds.
    pub timestamp: i64,
}

/// Operator ID message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperatorIdRecord {
    pub version: u8,
    /// Raw operator ID type; 0 = CAA-assigned registration.
    pub id_type: u8,
    /// Raw identifier bytes, NUL-padded text for type 0.
    pub operator_id: [u8; 20],
}

impl OperatorIdRecord {
    /// Operator ID rendered as trimmed text.
    pub fn operator_id_string(&self) -> String {
        trimmed_text(&self.operator_id)
    }
}

/// A decoded Remote ID message, one variant per message type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DecodedMessage {
    BasicId(BasicIdRecord),
    Location(LocationRecord),
    Auth(AuthRecord),
    SelfId(SelfIdRecord),
    System(SystemRecord),
    OperatorId(OperatorIdRecord),
    /// Forward-compatibility arm: undefined type nibble with its raw payload.
    Unknown {
        message_type: u8,
        version: u8,
        payload: [u8; 24],
    },
}

impl DecodedMessage {
    pub fn message_type(&self) -> MessageType {
        match self {
            DecodedMessage::BasicId(_) => MessageType::BasicId,
            DecodedMessage::Location(_) => MessageType::Location,
            DecodedMessage::Auth(_) => MessageType::Auth,
            DecodedMessage::SelfId(_) => MessageType::SelfId,
            DecodedMessage::System(_) => MessageType::System,
            DecodedMessage::OperatorId(_) => MessageType::OperatorId,
            DecodedMessage::Unknown { message_type, .. } => MessageType::Unknown(*message_type),
        }
    }

    /// Protocol version from the header's low nibble (informational).
    #[allow(dead_code)]
    pub fn version(&self) -> u8 {
        match self {
            DecodedMessage::BasicId(r) => r.version,
            DecodedMessage::Location(r) => r.version,
            DecodedMessage::Auth(r) => r.version,
            DecodedMessage::SelfId(r) => r.version,
            DecodedMessage::System(r) => r.version,
            DecodedMessage::OperatorId(r) => r.version,
            DecodedMessage::Unknown { version, .. } => *version,
        }
    }
}

/// Decode one message from its header byte and 24-byte payload.
///
/// Pure function of its inputs; never fails. Unrecognized type nibbles
/// produce the `Unknown` variant with the payload preserved verbatim.
pub fn decode_message(header: u8, payload: &[u8; MESSAGE_PAYLOAD_BYTES]) -> DecodedMessage {
    let version = header & 0x0F;
    match MessageType::from_nibble(header >> 4) {
        MessageType::BasicId => DecodedMessage::BasicId(decode_basic_id(version, payload)),
        MessageType::Location => DecodedMessage::Location(decode_location(version, payload)),
        MessageType::Auth => DecodedMessage::Auth(decode_auth(version, payload)),
        MessageType::SelfId => DecodedMessage::SelfId(decode_self_id(version, payload)),
        MessageType::System => DecodedMessage::System(decode_system(version, payload)),
        MessageType::OperatorId => DecodedMessage::OperatorId(decode_operator_id(version, payload)),
        MessageType::Unknown(n) => DecodedMessage::Unknown {
            message_type: n,
            version,
            payload: *payload,
        },
    }
}

fn decode_basic_id(version: u8, p: &[u8; MESSAGE_PAYLOAD_BYTES]) -> BasicIdRecord {
    let mut uas_id = [0u8; 20];
    uas_id.copy_from_slice(&p[1..21]);
    BasicIdRecord {
        version,
        id_type: IdType::from(p[0] >> 4),
        uav_type: UavType::from(p[0] & 0x0F),
        uas_id,
    }
}

fn decode_location(version: u8, p: &[u8; MESSAGE_PAYLOAD_BYTES]) -> LocationRecord {
    // Flags byte: status in the high nibble, then height reference,
    // east/west direction segment and speed multiplier bits.
    let height_ref_bit = (p[0] & 0x04) != 0;
    let ew_segment = (p[0] & 0x02) != 0;
    let speed_mult = (p[0] & 0x01) != 0;

    LocationRecord {
        version,
        status: UavStatus::from(p[0] >> 4),
        height_reference: HeightReference::from_bit(height_ref_bit),
        direction: codec::decode_direction(p[1], ew_segment),
        horizontal_speed: codec::decode_horizontal_speed(p[2], speed_mult),
        vertical_speed: codec::decode_vertical_speed(p[3] as i8),
        latitude: codec::decode_coordinate(codec::le_i32(p, 4)),
        longitude: codec::decode_coordinate(codec::le_i32(p, 8)),
        baro_altitude: codec::decode_altitude(codec::le_u16(p, 12)),
        geo_altitude: codec::decode_altitude(codec::le_u16(p, 14)),
        height: codec::decode_altitude(codec::le_u16(p, 16)),
        horizontal_accuracy: HorizontalAccuracy::from(p[18] & 0x0F),
        vertical_accuracy: VerticalAccuracy::from(p[18] >> 4),
        speed_accuracy: SpeedAccuracy::from(p[19] & 0x0F),
        baro_accuracy: VerticalAccuracy::from(p[19] >> 4),
        timestamp: codec::decode_timestamp(codec::le_u16(p, 20)),
        timestamp_accuracy: TimestampAccuracy::from(p[22] & 0x0F),
    }
}

fn decode_auth(version: u8, p: &[u8; MESSAGE_PAYLOAD_BYTES]) -> AuthRecord {
    let page_number = p[0] & 0x0F;
    if page_number == 0 {
        AuthRecord {
            version,
            auth_type: AuthType::from(p[0] >> 4),
            page_number,
            last_page_index: Some(p[1]),
            length: Some(p[2]),
            timestamp: Some(codec::decode_system_timestamp(codec::le_u32(p, 3))),
            data: p[7..24].to_vec(),
        }
    } else {
        AuthRecord {
            version,
            auth_type: AuthType::from(p[0] >> 4),
            page_number,
            last_page_index: None,
            length: None,
            timestamp: None,
            data: p[1..24].to_vec(),
        }
    }
}

fn decode_self_id(version: u8, p: &[u8; MESSAGE_PAYLOAD_BYTES]) -> SelfIdRecord {
    let mut description_raw = [0u8; 23];
    description_raw.copy_from_slice(&p[1..24]);
    SelfIdRecord {
        version,
        description_type: DescriptionType::from(p[0]),
        description_raw,
    }
}

fn decode_system(version: u8, p: &[u8; MESSAGE_PAYLOAD_BYTES]) -> SystemRecord {
    SystemRecord {
        version,
        operator_location_type: OperatorLocationType::from(p[0] & 0x03),
        classification: OperatorClassification::from((p[0] >> 2) & 0x07),
        operator_latitude: codec::decode_coordinate(codec::le_i32(p, 1)),
        operator_longitude: codec::decode_coordinate(codec::le_i32(p, 5)),
        area_count: codec::le_u16(p, 9),
        // Radius is wire-encoded in 10 m steps.
        area_radius: p[11] as u16 * 10,
        area_ceiling: codec::decode_altitude(codec::le_u16(p, 12)),
        area_floor: codec::decode_altitude(codec::le_u16(p, 14)),
        eu_class: UavEuClass::from(p[16] & 0x0F),
        eu_category: UavEuCategory::from(p[16] >> 4),
        operator_altitude: codec::decode_altitude(codec::le_u16(p, 17)),
        timestamp: codec::decode_system_timestamp(codec::le_u32(p, 19)),
    }
}

fn decode_operator_id(version: u8, p: &[u8; MESSAGE_PAYLOAD_BYTES]) -> OperatorIdRecord {
    let mut operator_id = [0u8; 20];
    operator_id.copy_from_slice(&p[1..21]);
    OperatorIdRecord {
        version,
        id_type: p[0],
        operator_id,
    }
}

/// Render a NUL-padded fixed-width text field, trimming the padding.
fn trimmed_text(bytes: &[u8]) -> String {
    let end = bytes
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |pos| pos + 1);
    String::from_utf8_lossy(&bytes[..end])
        .trim_end()
        .to_string()
}

fn uav_type_str(t: UavType) -> &'static str {
    match t {
        UavType::None => "Not specified",
        UavType::Aeroplane => "Aeroplane",
        UavType::Copter => "Helicopter/Multirotor",
        UavType::Gyroplane => "Gyroplane",
        UavType::HybridLift => "Hybrid lift",
        UavType::Ornithopter => "Ornithopter",
        UavType::Glider => "Glider",
        UavType::Kite => "Kite",
        UavType::FreeBalloon => "Free balloon",
        UavType::CaptiveBalloon => "Captive balloon",
        UavType::Airship => "Airship",
        UavType::FreeFallParachute => "Free-fall parachute",
        UavType::Rocket => "Rocket",
        UavType::TetheredPoweredAircraft => "Tethered powered aircraft",
        UavType::GroundObstacle => "Ground obstacle",
        UavType::Other => "Other",
        UavType::Unknown(_) => "Unknown",
    }
}

fn status_str(s: UavStatus) -> &'static str {
    match s {
        UavStatus::Undeclared => "Undeclared",
        UavStatus::Ground => "On the ground",
        UavStatus::Airborne => "Airborne",
        UavStatus::Emergency => "EMERGENCY",
        UavStatus::Failure => "Remote ID failure",
        UavStatus::Unknown(_) => "Unknown",
    }
}

impl fmt::Display for DecodedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedMessage::BasicId(r) => {
                writeln!(f, "Basic ID (v{})", r.version)?;
                writeln!(f, "  ID Type   : {:?}", r.id_type)?;
                writeln!(f, "  UAV Type  : {}", uav_type_str(r.uav_type))?;
                match r.uas_id_string() {
                    Some(id) => writeln!(f, "  UAS ID    : {}", id),
                    None => writeln!(f, "  UAS ID    : {:02X?}", r.uas_id),
                }
            }
            DecodedMessage::Location(r) => {
                writeln!(f, "Location (v{})", r.version)?;
                writeln!(f, "  Status    : {}", status_str(r.status))?;
                writeln!(f, "  Position  : {:.7}, {:.7}", r.latitude, r.longitude)?;
                writeln!(
                    f,
                    "  Altitude  : geo {:.1} m, baro {:.1} m, height {:.1} m ({:?})",
                    r.geo_altitude, r.baro_altitude, r.height, r.height_reference
                )?;
                writeln!(
                    f,
                    "  Vector    : {:.0} deg, {:.2} m/s horizontal, {:.1} m/s vertical",
                    r.direction, r.horizontal_speed, r.vertical_speed
                )?;
                writeln!(f, "  Timestamp : {:.1} s past the hour", r.timestamp)
            }
            DecodedMessage::Auth(r) => {
                writeln!(f, "Authentication (v{})", r.version)?;
                writeln!(f, "  Auth Type : {:?}", r.auth_type)?;
                writeln!(f, "  Page      : {}", r.page_number)?;
                if let (Some(last), Some(len)) = (r.last_page_index, r.length) {
                    // last page index comes off the wire; widen before the +1
                    writeln!(
                        f,
                        "  Pages     : {} total, {} data bytes",
                        last as u16 + 1,
                        len
                    )?;
                }
                writeln!(f, "  Data      : {:02X?}", r.data)
            }
            DecodedMessage::SelfId(r) => {
                writeln!(f, "Self ID (v{})", r.version)?;
                writeln!(f, "  Type      : {:?}", r.description_type)?;
                writeln!(f, "  Text      : {}", r.description())
            }
            DecodedMessage::System(r) => {
                writeln!(f, "System (v{})", r.version)?;
                writeln!(
                    f,
                    "  Operator  : {:.7}, {:.7} ({:?}, alt {:.1} m)",
                    r.operator_latitude,
                    r.operator_longitude,
                    r.operator_location_type,
                    r.operator_altitude
                )?;
                writeln!(
                    f,
                    "  Area      : {} UAS, radius {} m, floor {:.1} m, ceiling {:.1} m",
                    r.area_count, r.area_radius, r.area_floor, r.area_ceiling
                )?;
                writeln!(
                    f,
                    "  Class     : {:?} / {:?} / {:?}",
                    r.classification, r.eu_category, r.eu_class
                )?;
                writeln!(f, "  Timestamp : {} (unix)", r.timestamp)
            }
            DecodedMessage::OperatorId(r) => {
                writeln!(f, "Operator ID (v{})", r.version)?;
                writeln!(f, "  ID Type   : {}", r.id_type)?;
                writeln!(f, "  ID        : {}", r.operator_id_string())
            }
            DecodedMessage::Unknown {
                message_type,
                version,
                payload,
            } => {
                writeln!(f, "Unknown message type {} (v{})", message_type, version)?;
                writeln!(f, "  Payload   : {:02X?}", payload)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_with(bytes: &[(usize, u8)]) -> [u8; 24] {
        let mut p = [0u8; 24];
        for &(i, b) in bytes {
            p[i] = b;
        }
        p
    }

    #[test]
    fn test_message_type_from_nibble() {
        assert_eq!(MessageType::from_nibble(0), MessageType::BasicId);
        assert_eq!(MessageType::from_nibble(5), MessageType::OperatorId);
        assert_eq!(MessageType::from_nibble(6), MessageType::Unknown(6));
        assert_eq!(MessageType::from_nibble(0xF), MessageType::Unknown(0xF));
    }

    #[test]
    fn test_decode_basic_id() {
        let mut p = [0u8; 24];
        p[0] = 0x12; // serial number, copter
        p[1..9].copy_from_slice(b"1596F123");
        let msg = decode_message(0x00, &p);
        match msg {
            DecodedMessage::BasicId(r) => {
                assert_eq!(r.id_type, IdType::SerialNumber);
                assert_eq!(r.uav_type, UavType::Copter);
                assert_eq!(r.uas_id_string().as_deref(), Some("1596F123"));
            }
            other => panic!("wrong variant: {:?}", other),
        }
    }

    #[test]
    fn test_basic_id_binary_id_has_no_string() {
        let p = payload_with(&[(0, 0x30), (1, 0xDE), (2, 0xAD)]); // UTM UUID
        match decode_message(0x00, &p) {
            DecodedMessage::BasicId(r) => {
                assert_eq!(r.id_type, IdType::UtmAssignedUuid);
                assert!(r.uas_id_string().is_none());
            }
            other => panic!("wrong variant: {:?}", other),
        }
    }

    #[test]
    fn test_decode_location_all_zero() {
        // All-zero payload decodes to sentinels, not errors.
        let p = [0u8; 24];
        match decode_message(0x10, &p) {
            DecodedMessage::Location(r) => {
                assert_eq!(r.version, 0);
                assert_eq!(r.status, UavStatus::Undeclared);
                assert_eq!(r.latitude, 0.0);
                assert_eq!(r.longitude, 0.0);
                assert_eq!(r.baro_altitude, -1000.0);
                assert_eq!(r.geo_altitude, -1000.0);
                assert_eq!(r.height, -1000.0);
                assert_eq!(r.direction, 0.0);
                assert_eq!(r.horizontal_speed, 0.0);
                assert_eq!(r.height_reference, HeightReference::TakeOff);
            }
            other => panic!("wrong variant: {:?}", other),
        }
    }

    #[test]
    fn test_decode_location_fields() {
        let mut p = [0u8; 24];
        p[0] = 0x23; // airborne, E/W segment set, coarse speed multiplier
        p[1] = 10; // direction 10 + 180
        p[2] = 100; // 100 * 0.75 + 63.75 = 138.75 m/s
        p[3] = 0xFB; // -5 as i8 -> -2.5 m/s
        p[4..8].copy_from_slice(&511_975_420i32.to_le_bytes());
        p[8..12].copy_from_slice(&(-45_000_000i32).to_le_bytes());
        p[12..14].copy_from_slice(&2100u16.to_le_bytes()); // 50 m baro
        p[14..16].copy_from_slice(&2200u16.to_le_bytes()); // 100 m geo
        p[16..18].copy_from_slice(&2020u16.to_le_bytes()); // 10 m height
        p[18] = 0x4A; // horiz 10m, vert 10m
        p[19] = 0x13; // speed 1 m/s, baro 150m
        p[20..22].copy_from_slice(&1234u16.to_le_bytes());
        p[22] = 0x05;

        match decode_message(0x11, &p) {
            DecodedMessage::Location(r) => {
                assert_eq!(r.version, 1);
                assert_eq!(r.status, UavStatus::Airborne);
                assert_eq!(r.direction, 190.0);
                assert_eq!(r.horizontal_speed, 138.75);
                assert_eq!(r.vertical_speed, -2.5);
                assert_eq!(r.latitude, 51.1975420);
                assert_eq!(r.longitude, -4.5);
                assert_eq!(r.baro_altitude, 50.0);
                assert_eq!(r.geo_altitude, 100.0);
                assert_eq!(r.height, 10.0);
                assert_eq!(r.horizontal_accuracy, HorizontalAccuracy::M10);
                assert_eq!(r.vertical_accuracy, VerticalAccuracy::M10);
                assert_eq!(r.speed_accuracy, SpeedAccuracy::Mps1);
                assert_eq!(r.baro_accuracy, VerticalAccuracy::M150);
                assert_eq!(r.timestamp, 123.4);
                assert_eq!(r.timestamp_accuracy.seconds(), Some(0.5));
            }
            other => panic!("wrong variant: {:?}", other),
        }
    }

    #[test]
    fn test_decode_auth_page_zero() {
        let mut p = [0u8; 24];
        p[0] = 0x10; // UAS ID signature, page 0
        p[1] = 2; // last page index
        p[2] = 40; // total length
        p[3..7].copy_from_slice(&100u32.to_le_bytes());
        p[7] = 0xAB;
        match decode_message(0x20, &p) {
            DecodedMessage::Auth(r) => {
                assert_eq!(r.auth_type, AuthType::UasIdSignature);
                assert_eq!(r.page_number, 0);
                assert_eq!(r.last_page_index, Some(2));
                assert_eq!(r.length, Some(40));
                assert_eq!(r.timestamp, Some(1_546_300_900));
                assert_eq!(r.data.len(), 17);
                assert_eq!(r.data[0], 0xAB);
            }
            other => panic!("wrong variant: {:?}", other),
        }
    }

    #[test]
    fn test_decode_auth_later_page() {
        let mut p = [0u8; 24];
        p[0] = 0x12; // UAS ID signature, page 2
        p[1] = 0xCD;
        match decode_message(0x20, &p) {
            DecodedMessage::Auth(r) => {
                assert_eq!(r.page_number, 2);
                assert!(r.last_page_index.is_none());
                assert!(r.length.is_none());
                assert!(r.timestamp.is_none());
                assert_eq!(r.data.len(), 23);
                assert_eq!(r.data[0], 0xCD);
            }
            other => panic!("wrong variant: {:?}", other),
        }
    }

    #[test]
    fn test_decode_self_id() {
        let mut p = [0u8; 24];
        p[0] = 0;
        p[1..13].copy_from_slice(b"Survey drone");
        match decode_message(0x30, &p) {
            DecodedMessage::SelfId(r) => {
                assert_eq!(r.description_type, DescriptionType::Text);
                assert_eq!(r.description(), "Survey drone");
                // padding preserved in the raw bytes
                assert_eq!(r.description_raw[12..], [0u8; 11]);
            }
            other => panic!("wrong variant: {:?}", other),
        }
    }

    #[test]
    fn test_decode_system() {
        let mut p = [0u8; 24];
        p[0] = 0x05; // live GNSS (1), EU classification (1)
        p[1..5].copy_from_slice(&520_000_000i32.to_le_bytes());
        p[5..9].copy_from_slice(&48_000_000i32.to_le_bytes());
        p[9..11].copy_from_slice(&3u16.to_le_bytes());
        p[11] = 5; // 50 m radius
        p[12..14].copy_from_slice(&2240u16.to_le_bytes()); // ceiling 120 m
        p[14..16].copy_from_slice(&2000u16.to_le_bytes()); // floor 0 m
        p[16] = 0x12; // open category, class 0
        p[17..19].copy_from_slice(&2010u16.to_le_bytes()); // operator at 5 m
        p[19..23].copy_from_slice(&86400u32.to_le_bytes());
        match decode_message(0x40, &p) {
            DecodedMessage::System(r) => {
                assert_eq!(r.operator_location_type, OperatorLocationType::LiveGnss);
                assert_eq!(r.classification, OperatorClassification::EuropeanUnion);
                assert_eq!(r.operator_latitude, 52.0);
                assert_eq!(r.operator_longitude, 4.8);
                assert_eq!(r.area_count, 3);
                assert_eq!(r.area_radius, 50);
                assert_eq!(r.area_ceiling, 120.0);
                assert_eq!(r.area_floor, 0.0);
                assert_eq!(r.eu_category, UavEuCategory::Open);
                assert_eq!(r.eu_class, UavEuClass::Class1);
                assert_eq!(r.operator_altitude, 5.0);
                assert_eq!(r.timestamp, 1_546_300_800 + 86400);
            }
            other => panic!("wrong variant: {:?}", other),
        }
    }

    #[test]
    fn test_decode_operator_id() {
        let mut p = [0u8; 24];
        p[1..17].copy_from_slice(b"FIN87astrdge12k8");
        match decode_message(0x50, &p) {
            DecodedMessage::OperatorId(r) => {
                assert_eq!(r.id_type, 0);
                assert_eq!(r.operator_id_string(), "FIN87astrdge12k8");
            }
            other => panic!("wrong variant: {:?}", other),
        }
    }

    #[test]
    fn test_decode_unknown_type() {
        // Undefined type nibble is preserved, not rejected.
        let mut p = [0u8; 24];
        p[0] = 0x42;
        match decode_message(0x60, &p) {
            DecodedMessage::Unknown {
                message_type,
                version,
                payload,
            } => {
                assert_eq!(message_type, 6);
                assert_eq!(version, 0);
                assert_eq!(payload[0], 0x42);
            }
            other => panic!("wrong variant: {:?}", other),
        }
    }

    #[test]
    fn test_open_enums_preserve_raw() {
        assert_eq!(UavStatus::from(9), UavStatus::Unknown(9));
        assert_eq!(IdType::from(7), IdType::Unknown(7));
        assert_eq!(HorizontalAccuracy::from(13), HorizontalAccuracy::Unknown(13));
        assert_eq!(AuthType::from(0xA), AuthType::Unknown(0xA));
        assert_eq!(UavEuClass::from(8), UavEuClass::Unknown(8));
    }

    #[test]
    fn test_trimmed_text() {
        assert_eq!(trimmed_text(b"ABC\0\0\0"), "ABC");
        assert_eq!(trimmed_text(b"\0\0\0"), "");
        assert_eq!(trimmed_text(b"A B \0"), "A B");
    }

    #[test]
    fn test_display_does_not_panic() {
        let p = [0u8; 24];
        for header in [0x00u8, 0x10, 0x20, 0x30, 0x40, 0x50, 0x90] {
            let msg = decode_message(header, &p);
            let _ = format!("{}", msg);
        }
    }

    #[test]
    fn test_display_auth_max_page_index() {
        // Page 0 with last page index 255: the page total must not
        // overflow when rendered.
        let p = payload_with(&[(0, 0x10), (1, 255), (2, 40)]);
        match decode_message(0x20, &p) {
            DecodedMessage::Auth(ref r) => assert_eq!(r.last_page_index, Some(255)),
            ref other => panic!("wrong variant: {:?}", other),
        }
        let rendered = format!("{}", decode_message(0x20, &p));
        assert!(rendered.contains("256 total"));
    }
}
