use serde::{Deserialize, Serialize};

use crate::{
    config::{AuthorizationMode, TrackerConfig},
    location::PositionFix,
};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
/// Permission state as reported by the positioning service
pub enum AuthorizationStatus {
    /// The user hasn't been asked yet
    #[default]
    NotDetermined,
    /// Denied device-wide by policy, the user can't change it
    Restricted,
    /// The user said no
    Denied,
    AuthorizedWhenInUse,
    AuthorizedAlways,
}

impl AuthorizationStatus {
    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::AuthorizedWhenInUse | Self::AuthorizedAlways)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
/// Whether the user granted precise positioning or a coarse approximation
pub enum AccuracyAuthorization {
    #[default]
    Full,
    Reduced,
}

#[derive(Debug, Clone)]
/// Signals pushed up from the positioning service
pub enum ProviderUpdate {
    /// The permission grant changed (user action or first-time prompt result)
    AuthorizationChanged(AuthorizationStatus, AccuracyAuthorization),
    /// A batch of raw fixes in the order the service recorded them
    Locations(Vec<PositionFix>),
    /// The service reported a failure. Carried through as-is, the tracker
    /// surfaces it and keeps running.
    Error(String),
    /// The service shut down delivery, used to help consumers know when to
    /// stop consuming updates
    Stopped,
}

/// Binding to whatever the platform's positioning service is. The real value
/// (satellite/cell/WiFi fusion, permission arbitration) lives behind this
/// seam, implementations just forward to it.
pub trait LocationProvider: Send + Sync {
    /// Apply tracker configuration to the underlying service
    fn configure(&self, config: &TrackerConfig);
    /// Whether device-wide location services are switched on at all
    fn services_enabled(&self) -> bool;
    /// Current permission grant
    fn authorization_status(&self) -> AuthorizationStatus;
    /// Current precision grant
    fn accuracy_authorization(&self) -> AccuracyAuthorization;
    /// Prompt the user for the given permission. The outcome arrives later as
    /// an [ProviderUpdate::AuthorizationChanged] update.
    fn request_authorization(&self, mode: AuthorizationMode);
    /// Begin delivery of fixes, honoring the configured filters
    fn start_updates(&self);
    /// Halt delivery of fixes
    fn stop_updates(&self);
    /// Receive pending updates, resolving once at least one is available
    fn receive_updates(
        &self,
    ) -> impl std::future::Future<Output = impl Iterator<Item = ProviderUpdate>> + Send;
}
