mod config;
mod location;
mod motion;
mod provider;
mod tracker;

pub use config::{ActivityType, AuthorizationMode, DesiredAccuracy, TrackerConfig};
pub use location::{Location, PositionFix, UtcDT};
pub use motion::MotionState;
pub use provider::{
    AccuracyAuthorization, AuthorizationStatus, LocationProvider, ProviderUpdate,
};
pub use tracker::{LocationTracker, RouteSink, TrackerDelegate};

pub mod prelude {
    use anyhow::Error as AnyhowError;
    use std::result::Result as StdResult;
    pub type Result<T = (), E = AnyhowError> = StdResult<T, E>;
    pub use anyhow::Context;
}
