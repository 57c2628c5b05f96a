//! Behavioral tag classification
//!
//! Tags are independent, non-exclusive labels derived from a single frame's
//! kinematics. A frame with missing or malformed fields simply fails to earn
//! the tag; classification itself is total and never errors.

use serde::{Deserialize, Serialize};

use crate::aircraft::AircraftFrame;

/// Vertical rate below which an aircraft counts as descending (ft/min)
const DESCENT_RATE_FPM: f64 = -256.0;
/// Altitude ceiling for the low-and-slow profile (ft)
const LOW_ALTITUDE_FT: i32 = 3000;
/// Ground speed ceiling for the low-and-slow profile (kt)
const SLOW_SPEED_KT: f64 = 150.0;

/// Behavioral classification label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    Descending,
    LowAndSlow,
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tag::Descending => write!(f, "descending"),
            Tag::LowAndSlow => write!(f, "low_and_slow"),
        }
    }
}

/// Classify a frame, returning its tags in fixed rule order
pub fn classify(frame: &AircraftFrame) -> Vec<Tag> {
    let mut tags = Vec::new();

    // Absent rate defaults to level flight
    if frame.vertical_rate_fpm.unwrap_or(0.0) < DESCENT_RATE_FPM {
        tags.push(Tag::Descending);
    }

    // Absent altitude/speed default high and fast, excluding the aircraft
    let altitude = frame.altitude_ft.unwrap_or(i32::MAX);
    let speed = frame.ground_speed_kt.unwrap_or(f64::MAX);
    if altitude < LOW_ALTITUDE_FT && speed < SLOW_SPEED_KT {
        tags.push(Tag::LowAndSlow);
    }

    tags
}

/// Render a tag set for message text, e.g. "descending, low_and_slow"
pub fn format_tags(tags: &[Tag]) -> String {
    tags.iter()
        .map(Tag::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
