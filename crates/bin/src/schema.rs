//! The display state schema.
//!
//! These types are opaque payloads to the engine; what makes them
//! addressable is the `record!` declarations, which mirror each
//! field's serialization name. Wire names are the contract with the
//! display client and must not change.

use serde::{
    Deserialize, Serialize,
    de::{self, Deserializer},
    ser::{SerializeStruct, Serializer},
};
use vitrine::record;

/// Root of the display state tree.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Panel {
    #[serde(rename = "dateTime")]
    pub date_time: DateTime,
    pub weather: Weather,
    pub streams: Vec<Stream>,
    pub display: Display,
    pub faces: Faces,
}

record! {
    Panel {
        date_time: "dateTime",
        weather: _,
        streams: _,
        display: _,
        faces: _,
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DateTime {
    pub visible: bool,
}

record! {
    DateTime {
        visible: _,
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Weather {
    pub high: f32,
    pub low: f32,
    pub icon: String,
    pub visible: bool,
}

record! {
    Weather {
        high: _,
        low: _,
        icon: _,
        visible: _,
    }
}

/// One video stream tile.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Stream {
    pub url: String,
    pub name: String,
    pub visible: bool,
}

record! {
    Stream {
        url: _,
        name: _,
        visible: _,
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Faces {
    /// Most recent face detection, if any.
    #[serde(rename = "predicted", skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<FaceDetected>,
    pub threshold: f32,
}

record! {
    Faces {
        last_seen: "predicted",
        threshold: _,
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceDetected {
    pub name: String,
    /// RFC 3339 timestamp of the detection.
    pub time: String,
    pub probability: f32,
}

record! {
    FaceDetected {
        name: _,
        time: _,
        probability: _,
    }
}

/// Display power control. The panel hardware only understands three
/// states, so the value is validated at the serialization boundary.
#[derive(Debug, Default, Clone)]
pub struct Display {
    pub power_status: String,
}

record! {
    Display {
        power_status: "powerStatus",
    }
}

impl Serialize for Display {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Display", 1)?;
        let status = if self.power_status.is_empty() {
            "unknown"
        } else {
            &self.power_status
        };
        state.serialize_field("powerStatus", status)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for Display {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Wire {
            #[serde(rename = "powerStatus", default)]
            power_status: String,
        }

        let wire = Wire::deserialize(deserializer)?;
        match wire.power_status.as_str() {
            "on" | "standby" | "unknown" => Ok(Display {
                power_status: wire.power_status,
            }),
            other => Err(de::Error::custom(format!(
                "unknown power value: '{other}'"
            ))),
        }
    }
}
