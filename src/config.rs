use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// The kind of permission grant the tracker will ask the service for
pub enum AuthorizationMode {
    /// Updates only while the host app is in the foreground
    WhenInUse,
    /// Updates at any time, needed for background tracking
    Always,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
/// Hint to the positioning service about what the fixes will be used for,
/// lets it tune sensor usage
pub enum ActivityType {
    Other,
    AutomotiveNavigation,
    #[default]
    Fitness,
    OtherNavigation,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
/// Accuracy level to request from the service. Higher accuracy costs battery.
pub enum DesiredAccuracy {
    #[default]
    BestForNavigation,
    Best,
    NearestTenMeters,
    HundredMeters,
    Kilometer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Knobs applied to the positioning service when a tracker is created
pub struct TrackerConfig {
    /// Accuracy to request, the service treats this as a goal not a guarantee
    pub desired_accuracy: DesiredAccuracy,
    pub activity_type: ActivityType,
    /// Which permission request to make in [request_authorization](crate::LocationTracker::request_authorization)
    pub authorization_mode: AuthorizationMode,
    /// Minimum horizontal movement in meters before the service reports a new
    /// fix, 0 to report everything
    pub distance_filter: f64,
    /// Keep delivering fixes while the host app is backgrounded (the host
    /// must also hold the matching platform entitlement)
    pub allow_background_updates: bool,
    /// Let the service pause delivery when the user is unlikely to be moving
    pub pause_updates_automatically: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            desired_accuracy: DesiredAccuracy::default(),
            activity_type: ActivityType::default(),
            authorization_mode: AuthorizationMode::WhenInUse,
            distance_filter: 0.0,
            allow_background_updates: true,
            pause_updates_automatically: false,
        }
    }
}
