//! Geofence evaluation
//!
//! A geofence is a cylinder around the reference point: a radius in km and an
//! altitude ceiling in feet MSL, with an optional approach-heading filter on
//! top. Bearings are always computed reference → aircraft; the heading filter
//! therefore checks the aircraft's heading against the *reciprocal* bearing
//! (an aircraft flying toward the reference points back along it).

use serde::{Deserialize, Serialize};

use crate::aircraft::AircraftFrame;
use crate::geodesy::{angular_difference_deg, haversine_km, initial_bearing_deg};

/// Distance and bearing of an aircraft relative to the reference point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoMeasurement {
    /// Great-circle distance in kilometers
    pub distance_km: f64,
    /// Initial bearing from the reference point to the aircraft, [0, 360)
    pub bearing_deg: f64,
}

/// Geofence boundary around a fixed reference point
#[derive(Debug, Clone)]
pub struct Geofence {
    /// Reference point (latitude, longitude) in degrees
    pub center: (f64, f64),
    /// Horizontal radius in kilometers
    pub radius_km: f64,
    /// Altitude ceiling in feet MSL
    pub altitude_max_ft: i32,
    /// Approach-heading tolerance in degrees; None disables heading filtering
    /// (pure proximity + altitude profile)
    pub heading_tolerance_deg: Option<f64>,
}

impl Geofence {
    /// Measure an aircraft's distance and bearing from the reference point
    ///
    /// Returns None when the frame has no position.
    pub fn measure(&self, frame: &AircraftFrame) -> Option<GeoMeasurement> {
        let (lat, lon) = frame.position?;
        Some(GeoMeasurement {
            distance_km: haversine_km(self.center.0, self.center.1, lat, lon),
            bearing_deg: initial_bearing_deg(self.center.0, self.center.1, lat, lon),
        })
    }

    /// Check whether a frame is in scope this cycle
    ///
    /// Qualifies iff position is present, distance is within the radius,
    /// altitude is present and at or below the ceiling, and (when the profile
    /// enables it) the aircraft is heading toward the reference point. Missing
    /// required fields disqualify the frame; nothing here can error.
    pub fn evaluate(&self, frame: &AircraftFrame) -> Option<GeoMeasurement> {
        let measurement = self.measure(frame)?;
        if measurement.distance_km > self.radius_km {
            return None;
        }
        let altitude = frame.altitude_ft?;
        if altitude > self.altitude_max_ft {
            return None;
        }
        if let Some(tolerance) = self.heading_tolerance_deg
            && !is_approaching(frame.heading_deg, measurement.bearing_deg, tolerance)
        {
            return None;
        }
        Some(measurement)
    }
}

/// Check whether an aircraft's heading points back toward the reference
///
/// `bearing_to_aircraft` is the reference → aircraft bearing, so an
/// approaching aircraft flies along its reciprocal. A missing heading never
/// passes the filter.
pub fn is_approaching(
    heading_deg: Option<f64>,
    bearing_to_aircraft: f64,
    tolerance_deg: f64,
) -> bool {
    let Some(heading) = heading_deg else {
        return false;
    };
    let reciprocal = (bearing_to_aircraft + 180.0) % 360.0;
    angular_difference_deg(heading, reciprocal) <= tolerance_deg
}
