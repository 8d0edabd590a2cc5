use chrono::{DateTime, Utc};
use geo::{Distance, Haversine, Point};
use serde::{Deserialize, Serialize};

/// Convenience alias for UTC DT
pub type UtcDT = DateTime<Utc>;

/// A "part" of a location
pub type LocationComponent = f64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
/// Some point on the globe as reported by a positioning service
pub struct Location {
    /// Latitude in degrees
    pub lat: LocationComponent,
    /// Longitude in degrees
    pub long: LocationComponent,
}

impl Location {
    /// Great-circle distance to another location in meters
    pub fn distance_to(&self, other: &Location) -> f64 {
        Haversine.distance(
            Point::new(self.long, self.lat),
            Point::new(other.long, other.lat),
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
/// A single raw fix delivered by the positioning service.
///
/// Fields are carried exactly as reported, implausible values included;
/// deciding whether a fix is trustworthy is [MotionState](crate::MotionState)'s job.
pub struct PositionFix {
    pub location: Location,
    /// When the service recorded the fix
    pub timestamp: UtcDT,
    /// Uncertainty radius in meters, smaller is better
    pub horizontal_accuracy: f64,
    /// Ground speed in m/s, negative when the service couldn't determine it
    pub speed: f64,
    /// Heading in degrees from true north, if known
    pub heading: Option<f64>,
}
