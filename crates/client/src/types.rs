//! Wire mapping: MEATER Cloud JSON → read-only domain snapshots.
//!
//! Mapping is field-by-field over `serde_json::Value`. Missing, null or
//! wrongly-typed fields become zero values; nothing here returns an error.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// `remaining` value the cloud reports while it is still estimating.
pub const REMAINING_UNKNOWN: i64 = -1;

// ── Envelope ────────────────────────────────────────────────────────

/// Common response wrapper: `{status, statusCode, data}`.
#[derive(Debug, Clone, Default)]
pub struct Envelope {
    pub status: String,
    pub status_code: i64,
    pub data: Value,
}

impl Envelope {
    /// Parse a response body. Unparseable text yields an empty envelope
    /// (`data` = null), which maps to zero-valued objects downstream.
    pub fn parse(body: &str) -> Self {
        let json: Value = serde_json::from_str(body).unwrap_or(Value::Null);
        Self {
            status: str_field(&json, "status"),
            status_code: json["statusCode"].as_i64().unwrap_or(0),
            data: json["data"].clone(),
        }
    }
}

// ── Probe temperature ───────────────────────────────────────────────

/// Internal (meat) and ambient temperatures reported by a probe, in °C.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ProbeTemperature {
    internal: f64,
    ambient: f64,
}

impl ProbeTemperature {
    pub fn internal(&self) -> f64 {
        self.internal
    }

    pub fn ambient(&self) -> f64 {
        self.ambient
    }

    fn from_json(v: &Value) -> Self {
        Self {
            internal: f64_field(v, "internal"),
            ambient: f64_field(v, "ambient"),
        }
    }
}

// ── Cook temperature / time ─────────────────────────────────────────

/// Target and peak temperatures for a cook, in °C.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CookTemperature {
    target: f64,
    peak: f64,
}

impl CookTemperature {
    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn peak(&self) -> f64 {
        self.peak
    }

    fn from_json(v: &Value) -> Self {
        Self {
            target: f64_field(v, "target"),
            peak: f64_field(v, "peak"),
        }
    }
}

/// Elapsed and remaining time for a cook, in seconds.
///
/// `remaining` is [`REMAINING_UNKNOWN`] while the estimate is being computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CookTime {
    elapsed: i64,
    remaining: i64,
}

impl CookTime {
    pub fn elapsed_secs(&self) -> i64 {
        self.elapsed
    }

    pub fn remaining_secs(&self) -> i64 {
        self.remaining
    }

    pub fn remaining_known(&self) -> bool {
        self.remaining != REMAINING_UNKNOWN
    }

    pub fn elapsed_mins(&self) -> f64 {
        self.elapsed as f64 / 60.0
    }

    /// Remaining time in minutes, or `-1.0` while unknown.
    pub fn remaining_mins(&self) -> f64 {
        if !self.remaining_known() {
            return -1.0;
        }
        self.remaining as f64 / 60.0
    }

    fn from_json(v: &Value) -> Self {
        Self {
            elapsed: i64_field(v, "elapsed"),
            remaining: i64_field(v, "remaining"),
        }
    }
}

// ── Cook state ──────────────────────────────────────────────────────

/// Phase of a cook as reported by the cloud.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CookState {
    NotStarted,
    Configured,
    Started,
    ReadyForResting,
    Resting,
    SlightlyUnderdone,
    Finished,
    SlightlyOverdone,
    Overcook,
    #[default]
    Unknown,
}

impl CookState {
    pub const ALL: [CookState; 10] = [
        CookState::NotStarted,
        CookState::Configured,
        CookState::Started,
        CookState::ReadyForResting,
        CookState::Resting,
        CookState::SlightlyUnderdone,
        CookState::Finished,
        CookState::SlightlyOverdone,
        CookState::Overcook,
        CookState::Unknown,
    ];

    /// Total mapping from the wire label. Labels are matched exactly.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Not Started" => CookState::NotStarted,
            "Configured" => CookState::Configured,
            "Started" => CookState::Started,
            "Ready For Resting" => CookState::ReadyForResting,
            "Resting" => CookState::Resting,
            "Slightly Underdone" => CookState::SlightlyUnderdone,
            "Finished" => CookState::Finished,
            "Slightly Overdone" => CookState::SlightlyOverdone,
            "OVERCOOK!" => CookState::Overcook,
            _ => CookState::Unknown,
        }
    }

    /// Wire label for this state (`"Unknown"` for the fallback).
    pub fn label(&self) -> &'static str {
        match self {
            CookState::NotStarted => "Not Started",
            CookState::Configured => "Configured",
            CookState::Started => "Started",
            CookState::ReadyForResting => "Ready For Resting",
            CookState::Resting => "Resting",
            CookState::SlightlyUnderdone => "Slightly Underdone",
            CookState::Finished => "Finished",
            CookState::SlightlyOverdone => "Slightly Overdone",
            CookState::Overcook => "OVERCOOK!",
            CookState::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for CookState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<&str> for CookState {
    fn from(label: &str) -> Self {
        CookState::from_label(label)
    }
}

// ── Cook ────────────────────────────────────────────────────────────

/// A cook configured in the MEATER app and tracked by the cloud.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Cook {
    id: String,
    name: String,
    state: CookState,
    temperature: CookTemperature,
    time: CookTime,
}

impl Cook {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> CookState {
        self.state
    }

    pub fn temperature(&self) -> CookTemperature {
        self.temperature
    }

    pub fn time(&self) -> CookTime {
        self.time
    }

    fn from_json(v: &Value) -> Self {
        Self {
            id: str_field(v, "id"),
            name: str_field(v, "name"),
            state: CookState::from_label(v["state"].as_str().unwrap_or("")),
            temperature: CookTemperature::from_json(&v["temperature"]),
            time: CookTime::from_json(&v["time"]),
        }
    }
}

// ── Device ──────────────────────────────────────────────────────────

/// Snapshot of one MEATER probe from a single API response.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Device {
    id: String,
    temperature: ProbeTemperature,
    cook: Option<Cook>,
    updated_at: i64,
}

impl Device {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn temperature(&self) -> ProbeTemperature {
        self.temperature
    }

    /// Active cook, if one is configured for this probe.
    pub fn cook(&self) -> Option<&Cook> {
        self.cook.as_ref()
    }

    /// Last update as a UNIX timestamp (seconds).
    pub fn updated_at(&self) -> i64 {
        self.updated_at
    }

    /// Map a device object. Null or non-object input yields the zero device.
    pub fn from_json(v: &Value) -> Self {
        Self {
            id: str_field(v, "id"),
            temperature: ProbeTemperature::from_json(&v["temperature"]),
            cook: v.get("cook").filter(|c| c.is_object()).map(Cook::from_json),
            updated_at: i64_field(v, "updated_at"),
        }
    }
}

/// Devices in the order the cloud returned them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DeviceList {
    devices: Vec<Device>,
}

impl DeviceList {
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn first(&self) -> Option<&Device> {
        self.devices.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Device> {
        self.devices.iter()
    }

    pub fn as_slice(&self) -> &[Device] {
        &self.devices
    }

    /// Map the `data` object of a list response (`{devices: [...]}`).
    pub fn from_json(v: &Value) -> Self {
        let devices = v["devices"]
            .as_array()
            .map(|items| items.iter().map(Device::from_json).collect())
            .unwrap_or_default();
        Self { devices }
    }
}

impl IntoIterator for DeviceList {
    type Item = Device;
    type IntoIter = std::vec::IntoIter<Device>;

    fn into_iter(self) -> Self::IntoIter {
        self.devices.into_iter()
    }
}

impl<'a> IntoIterator for &'a DeviceList {
    type Item = &'a Device;
    type IntoIter = std::slice::Iter<'a, Device>;

    fn into_iter(self) -> Self::IntoIter {
        self.devices.iter()
    }
}

// ── Field helpers ───────────────────────────────────────────────────

fn str_field(v: &Value, key: &str) -> String {
    v[key].as_str().unwrap_or("").to_string()
}

fn f64_field(v: &Value, key: &str) -> f64 {
    v[key].as_f64().unwrap_or(0.0)
}

fn i64_field(v: &Value, key: &str) -> i64 {
    v[key]
        .as_i64()
        .or_else(|| v[key].as_f64().map(|f| f as i64))
        .unwrap_or(0)
}
