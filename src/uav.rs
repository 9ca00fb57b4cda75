//! UAV sighting store
//!
//!  Maintains a table of recently seen UAVs built from decoded Remote ID
//!  frames. Messages are attributed to a UAV through the Basic ID message
//!  in the same frame (message pack); correlation by transmitter address
//!  belongs to the capture layer and is not done here.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::message::{DecodedMessage, UavStatus, UavType};

/// Tracked UAV data, latest reading per message type.
#[derive(Debug, Clone)]
pub struct Uav {
    /// UAS ID rendered as text (hex for binary ID types).
    pub uas_id: String,
    pub uav_type: UavType,
    pub status: UavStatus,
    pub latitude: f64,
    pub longitude: f64,
    /// Meters; -1000 = unknown.
    pub geo_altitude: f32,
    /// Meters; -1000 = unknown.
    pub height: f32,
    /// m/s; 255 = unknown.
    pub horizontal_speed: f32,
    /// Degrees; 361 = unknown.
    pub direction: f32,
    pub operator_id: String,
    pub description: String,
    pub operator_latitude: f64,
    pub operator_longitude: f64,
    /// Last seen timestamp
    pub seen: Instant,
    /// Message count
    pub messages: u64,
}

impl Uav {
    pub fn new(uas_id: String, uav_type: UavType) -> Self {
        Self {
            uas_id,
            uav_type,
            status: UavStatus::Undeclared,
            latitude: 0.0,
            longitude: 0.0,
            geo_altitude: -1000.0,
            height: -1000.0,
            horizontal_speed: 255.0,
            direction: 361.0,
            operator_id: String::new(),
            description: String::new(),
            operator_latitude: 0.0,
            operator_longitude: 0.0,
            seen: Instant::now(),
            messages: 0,
        }
    }
}

/// Serializable view of one tracked UAV for the JSON surfaces.
#[derive(Debug, Clone, Serialize)]
pub struct UavSnapshot {
    pub uas_id: String,
    pub uav_type: UavType,
    pub status: UavStatus,
    pub lat: f64,
    pub lon: f64,
    pub geo_altitude: f32,
    pub height: f32,
    pub speed: f32,
    pub direction: f32,
    pub operator_id: String,
    pub description: String,
    pub operator_lat: f64,
    pub operator_lon: f64,
    pub messages: u64,
    pub age_seconds: u64,
}

/// Store for tracking multiple UAVs.
pub struct UavStore {
    uavs: HashMap<String, Uav>,
    ttl: Duration,
    /// Frames seen that carried no Basic ID and could not be attributed.
    unattributed_frames: u64,
}

impl UavStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            uavs: HashMap::new(),
            ttl: Duration::from_secs(ttl_secs),
            unattributed_frames: 0,
        }
    }

    /// Update the store from one decoded frame.
    ///
    /// Returns the UAS ID the frame was attributed to, or None when the
    /// frame carried no Basic ID message.
    pub fn update_from_frame(&mut self, messages: &[DecodedMessage]) -> Option<String> {
        let basic = messages.iter().find_map(|m| match m {
            DecodedMessage::BasicId(r) => Some(r),
            _ => None,
        });

        let Some(basic) = basic else {
            self.unattributed_frames += 1;
            return None;
        };

        let key = basic
            .uas_id_string()
            .unwrap_or_else(|| hex_id(&basic.uas_id));

        let uav = self
            .uavs
            .entry(key.clone())
            .or_insert_with(|| Uav::new(key.clone(), basic.uav_type));
        uav.seen = Instant::now();
        uav.uav_type = basic.uav_type;

        for msg in messages {
            uav.messages += 1;
            match msg {
                DecodedMessage::BasicId(_) => {}
                DecodedMessage::Location(r) => {
                    uav.status = r.status;
                    uav.latitude = r.latitude;
                    uav.longitude = r.longitude;
                    uav.geo_altitude = r.geo_altitude;
                    uav.height = r.height;
                    uav.horizontal_speed = r.horizontal_speed;
                    uav.direction = r.direction;
                }
                DecodedMessage::SelfId(r) => {
                    uav.description = r.description();
                }
                DecodedMessage::System(r) => {
                    uav.operator_latitude = r.operator_latitude;
                    uav.operator_longitude = r.operator_longitude;
                }
                DecodedMessage::OperatorId(r) => {
                    uav.operator_id = r.operator_id_string();
                }
                // Auth pages and unknown types count but carry no
                // tracked state.
                DecodedMessage::Auth(_) | DecodedMessage::Unknown { .. } => {}
            }
        }

        Some(key)
    }

    /// Get a UAV by its UAS ID.
    #[allow(dead_code)]
    pub fn get(&self, uas_id: &str) -> Option<&Uav> {
        self.uavs.get(uas_id)
    }

    /// Iterate over all tracked UAVs.
    pub fn all(&self) -> impl Iterator<Item = &Uav> {
        self.uavs.values()
    }

    /// Remove UAVs not seen within the TTL.
    pub fn remove_stale(&mut self) {
        let now = Instant::now();
        self.uavs
            .retain(|_, u| now.duration_since(u.seen) <= self.ttl);
    }

    pub fn len(&self) -> usize {
        self.uavs.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.uavs.is_empty()
    }

    /// Number of frames that could not be attributed to a UAV.
    pub fn unattributed_frames(&self) -> u64 {
        self.unattributed_frames
    }

    /// Snapshot of the store for JSON output.
    pub fn snapshot(&self) -> Vec<UavSnapshot> {
        let now = Instant::now();
        self.uavs
            .values()
            .map(|u| UavSnapshot {
                uas_id: u.uas_id.clone(),
                uav_type: u.uav_type,
                status: u.status,
                lat: u.latitude,
                lon: u.longitude,
                geo_altitude: u.geo_altitude,
                height: u.height,
                speed: u.horizontal_speed,
                direction: u.direction,
                operator_id: u.operator_id.clone(),
                description: u.description.clone(),
                operator_lat: u.operator_latitude,
                operator_lon: u.operator_longitude,
                messages: u.messages,
                age_seconds: now.duration_since(u.seen).as_secs(),
            })
            .collect()
    }
}

/// Hex rendering for binary UAS IDs, trailing zero bytes stripped.
fn hex_id(bytes: &[u8]) -> String {
    let end = bytes
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |pos| pos + 1);
    let mut s = String::with_capacity(end * 2);
    for b in &bytes[..end] {
        s.push_str(&format!("{:02X}", b));
    }
    s
}
