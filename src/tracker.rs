use std::sync::Arc;

use anyhow::bail;
use chrono::Utc;
use log::{debug, error, warn};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::prelude::*;

use crate::{
    config::TrackerConfig,
    location::{PositionFix, UtcDT},
    motion::MotionState,
    provider::{AccuracyAuthorization, AuthorizationStatus, LocationProvider, ProviderUpdate},
};

/// Receiver for an optional workout route recording. Gets every raw batch
/// before filtering so the recorded route matches what the service reported.
pub trait RouteSink: Send + Sync {
    fn insert_route_data(&self, fixes: &[PositionFix]) -> Result;
}

/// Callbacks forwarded from the positioning service, implemented by whatever
/// the host app uses for error reporting and UI refresh
pub trait TrackerDelegate: Send + Sync {
    fn on_authorization_changed(
        &self,
        status: AuthorizationStatus,
        accuracy: AccuracyAuthorization,
    );
    /// A raw batch arrived, delivered after the motion summary was updated
    fn on_locations_received(&self, fixes: &[PositionFix]);
    /// The service reported a failure, passed through unmodified
    fn on_error(&self, error: &str);
}

struct TrackerState {
    authorization: AuthorizationStatus,
    accuracy: AccuracyAuthorization,
    motion: MotionState,
}

/// Struct representing an ongoing tracking session, applies configuration to
/// the positioning service behind [LocationProvider], consumes its update
/// stream, and maintains the [MotionState] summary for the caller to read
/// after each batch.
pub struct LocationTracker<P: LocationProvider, R: RouteSink, D: TrackerDelegate> {
    config: TrackerConfig,
    provider: Arc<P>,
    route_sink: Option<R>,
    delegate: D,
    state: RwLock<TrackerState>,
    cancel: CancellationToken,
}

impl<P: LocationProvider, R: RouteSink, D: TrackerDelegate> LocationTracker<P, R, D> {
    pub fn new(
        config: TrackerConfig,
        provider: Arc<P>,
        route_sink: Option<R>,
        delegate: D,
    ) -> Self {
        provider.configure(&config);

        let state = TrackerState {
            authorization: provider.authorization_status(),
            accuracy: provider.accuracy_authorization(),
            motion: MotionState::default(),
        };

        Self {
            config,
            provider,
            route_sink,
            delegate,
            state: RwLock::new(state),
            cancel: CancellationToken::new(),
        }
    }

    /// Prompt the user for the permission named in the config. The outcome
    /// shows up later as an authorization change on the update stream.
    pub fn request_authorization(&self) -> Result {
        if !self.provider.services_enabled() {
            bail!("Location services are disabled on this device");
        }

        self.provider
            .request_authorization(self.config.authorization_mode);

        Ok(())
    }

    pub fn start_updates(&self) {
        self.provider.start_updates();
    }

    pub fn stop_updates(&self) {
        self.provider.stop_updates();
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub async fn authorization(&self) -> AuthorizationStatus {
        self.state.read().await.authorization
    }

    pub async fn accuracy_authorization(&self) -> AccuracyAuthorization {
        self.state.read().await.accuracy
    }

    /// Snapshot of the running motion summary
    pub async fn motion(&self) -> MotionState {
        self.state.read().await.motion
    }

    /// Discard accumulated motion, used when a new session starts over the
    /// same tracker
    pub async fn reset_motion(&self) {
        self.state.write().await.motion.reset();
    }

    /// Stop the tracking loop
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Fold one update into the tracker state.
    /// Returns whether the tracking loop should be broken.
    fn consume_update(&self, state: &mut TrackerState, update: ProviderUpdate, now: UtcDT) -> bool {
        match update {
            ProviderUpdate::AuthorizationChanged(status, accuracy) => {
                debug!("Authorization changed: {status:?} ({accuracy:?})");
                state.authorization = status;
                state.accuracy = accuracy;
                self.delegate.on_authorization_changed(status, accuracy);
                false
            }
            ProviderUpdate::Locations(fixes) => {
                if let Some(sink) = &self.route_sink {
                    if let Err(why) = sink.insert_route_data(&fixes) {
                        warn!("Error inserting route data: {why:?}");
                    }
                }

                for fix in &fixes {
                    state.motion.process(*fix, now);
                }

                self.delegate.on_locations_received(&fixes);
                false
            }
            ProviderUpdate::Error(why) => {
                error!("Positioning service failed: {why}");
                self.delegate.on_error(&why);
                false
            }
            ProviderUpdate::Stopped => true,
        }
    }

    #[cfg(test)]
    fn get_now() -> UtcDT {
        let fake = tokio::time::Instant::now();
        let real = std::time::Instant::now();
        Utc::now() + (fake.into_std().duration_since(real) + std::time::Duration::from_secs(1))
    }

    #[cfg(not(test))]
    fn get_now() -> UtcDT {
        Utc::now()
    }

    /// Main loop of the tracker, consumes updates from [LocationProvider]
    /// until shut down or the service stops delivery.
    pub async fn main_loop(&self) -> Result {
        let res = 'tracking: loop {
            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => {
                    break 'tracking Ok(());
                }

                updates = self.provider.receive_updates() => {
                    let mut state = self.state.write().await;
                    for update in updates {
                        if self.consume_update(&mut state, update, Self::get_now()) {
                            break 'tracking Ok(());
                        }
                    }
                }
            }
        };

        self.provider.stop_updates();

        res
    }
}
