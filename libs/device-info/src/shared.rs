use crate::config::DeviceInfoConfig;
use crate::model::DeviceSnapshotView;
use crate::notifications::EnvironmentChange;
use crate::snapshot::DeviceInformation;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Cloneable handle that serializes access to one [`DeviceInformation`].
///
/// Host notifications may be applied from any thread or task while event
/// composers read views; every access goes through a single lock.
#[derive(Debug, Clone)]
pub struct SharedDeviceInformation {
    inner: Arc<RwLock<DeviceInformation>>,
    refresh_before_read: bool,
}

impl SharedDeviceInformation {
    /// Wrap a snapshot, refreshing pulled fields before every view.
    #[must_use]
    pub fn new(snapshot: DeviceInformation) -> Self {
        Self {
            inner: Arc::new(RwLock::new(snapshot)),
            refresh_before_read: true,
        }
    }

    #[must_use]
    pub fn from_config(snapshot: DeviceInformation, config: &DeviceInfoConfig) -> Self {
        Self::new(snapshot).with_refresh_before_read(config.refresh_before_read)
    }

    #[must_use]
    pub fn with_refresh_before_read(mut self, enabled: bool) -> Self {
        self.refresh_before_read = enabled;
        self
    }

    /// View of the current facts, as attached to the next event.
    #[must_use]
    pub fn view(&self) -> DeviceSnapshotView {
        if self.refresh_before_read {
            let mut snapshot = self.inner.write();
            snapshot.refresh();
            snapshot.view()
        } else {
            self.inner.read().view()
        }
    }

    /// Run `f` against the snapshot under a read lock.
    pub fn read<R>(&self, f: impl FnOnce(&DeviceInformation) -> R) -> R {
        f(&*self.inner.read())
    }

    /// Run `f` against the snapshot under the write lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut DeviceInformation) -> R) -> R {
        f(&mut *self.inner.write())
    }

    pub fn refresh(&self) {
        self.inner.write().refresh();
    }

    pub fn apply(&self, change: &EnvironmentChange) {
        self.inner.write().apply(change);
    }

    /// Apply changes from `changes` until `cancel` fires or the feed closes.
    ///
    /// If the listener falls behind and changes are dropped, the pulled
    /// fields are refreshed; dropped push values are lost until the host
    /// reports them again.
    ///
    /// # Panics
    /// Panics if called outside of a Tokio runtime.
    #[must_use = "dropping the handle detaches the listener"]
    pub fn spawn_change_listener(
        &self,
        changes: broadcast::Receiver<EnvironmentChange>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let target = self.clone();
        tokio::spawn(async move { target.listen(changes, cancel).await })
    }

    /// Subscribe to the snapshot provider's own feed, if it has one.
    ///
    /// # Panics
    /// Panics if called outside of a Tokio runtime.
    #[must_use]
    pub fn spawn_provider_listener(&self, cancel: CancellationToken) -> Option<JoinHandle<()>> {
        let changes = self.read(DeviceInformation::provider_changes)?;
        Some(self.spawn_change_listener(changes, cancel))
    }

    async fn listen(
        &self,
        mut changes: broadcast::Receiver<EnvironmentChange>,
        cancel: CancellationToken,
    ) {
        tracing::debug!("Device information change listener started");
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    tracing::debug!("Device information change listener cancelled");
                    break;
                }
                received = changes.recv() => match received {
                    Ok(change) => {
                        tracing::trace!(?change, "Applying environment change");
                        self.apply(&change);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Device information listener lagged, refreshing");
                        self.refresh();
                    }
                    Err(RecvError::Closed) => {
                        tracing::debug!("Environment change feed closed");
                        break;
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Orientation;
    use crate::provider::{EnvironmentFacts, FixedEnvironment};

    fn shared_with(facts: EnvironmentFacts) -> (Arc<FixedEnvironment>, SharedDeviceInformation) {
        let env = Arc::new(FixedEnvironment::new(facts));
        let shared = SharedDeviceInformation::new(DeviceInformation::new(env.clone()));
        (env, shared)
    }

    #[test]
    fn view_refreshes_pulled_fields_by_default() {
        let (env, shared) = shared_with(EnvironmentFacts {
            orientation: Some("portrait".to_owned()),
            ..Default::default()
        });

        env.update(|facts| facts.orientation = Some("landscapeRight".to_owned()));

        assert_eq!(shared.view().orientation, Orientation::LandscapeRight);
    }

    #[test]
    fn view_without_refresh_keeps_last_sample() {
        let (env, shared) = shared_with(EnvironmentFacts {
            device_language: Some("en-US".to_owned()),
            ..Default::default()
        });
        let shared = shared.with_refresh_before_read(false);

        env.update(|facts| facts.device_language = Some("pt-BR".to_owned()));
        assert_eq!(shared.view().device_language, "en-US");

        shared.refresh();
        assert_eq!(shared.view().device_language, "pt-BR");
    }

    #[test]
    fn clones_share_state() {
        let (_env, shared) = shared_with(EnvironmentFacts::default());
        let other = shared.clone();

        other.apply(&EnvironmentChange::WiFiConnectivity(true));
        other.update(|snapshot| snapshot.set_voice_over_enabled(true));

        assert!(shared.read(DeviceInformation::is_wifi_connected));
        assert!(shared.read(DeviceInformation::is_voice_over_enabled));
    }
}
