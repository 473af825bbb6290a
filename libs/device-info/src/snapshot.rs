use crate::model::{DeviceSnapshotView, Orientation, RadioType, StatusBarHeight};
use crate::notifications::EnvironmentChange;
use crate::provider::EnvironmentProvider;
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Facts captured once when the snapshot is created
///
/// There is no mutating API: once captured, these values live as long as
/// the snapshot that owns them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticFacts {
    os: String,
    version: String,
    manufacturer: String,
    brand: String,
    model: String,
    app_name: String,
    app_version: String,
    app_build: String,
}

impl StaticFacts {
    fn capture(provider: &dyn EnvironmentProvider) -> Self {
        Self {
            os: provider.os_name().unwrap_or_default(),
            version: provider.os_version().unwrap_or_default(),
            manufacturer: provider.manufacturer().unwrap_or_default(),
            brand: provider.brand().unwrap_or_default(),
            model: provider.model().unwrap_or_default(),
            app_name: provider.app_name().unwrap_or_default(),
            app_version: provider.app_version().unwrap_or_default(),
            app_build: provider.app_build().unwrap_or_default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn os(&self) -> &str {
        &self.os
    }

    #[inline]
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[inline]
    #[must_use]
    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    #[inline]
    #[must_use]
    pub fn brand(&self) -> &str {
        &self.brand
    }

    #[inline]
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[inline]
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    #[inline]
    #[must_use]
    pub fn app_version(&self) -> &str {
        &self.app_version
    }

    #[inline]
    #[must_use]
    pub fn app_build(&self) -> &str {
        &self.app_build
    }
}

/// Clamp a reported status bar height, warning when the input is invalid.
fn checked_status_bar_height(height: f64) -> StatusBarHeight {
    if !height.is_finite() || height < 0.0 {
        tracing::warn!(height, "Invalid status bar height, clamping to zero");
    }
    StatusBarHeight::new(height)
}

fn resolve_radio_type(raw: Option<String>) -> RadioType {
    let Some(raw) = raw else {
        return RadioType::Unknown;
    };
    let radio = RadioType::from_raw(&raw);
    if radio == RadioType::Unknown && !raw.is_empty() {
        tracing::debug!(raw = %raw, "Unrecognized radio technology, reporting unknown");
    }
    radio
}

fn resolve_orientation(raw: Option<String>) -> Orientation {
    let Some(raw) = raw else {
        return Orientation::Unknown;
    };
    let orientation = Orientation::from_raw(&raw);
    if orientation == Orientation::Unknown && !raw.is_empty() {
        tracing::debug!(raw = %raw, "Unrecognized device orientation, reporting unknown");
    }
    orientation
}

/// Device and application facts attached to analytics events
///
/// Static facts are captured at construction. Volatile facts split in two:
/// push fields (connectivity, accessibility, status bar height) are stored
/// by the `set_*` methods as the host reports them, while pull fields
/// (language, carrier, radio technology, orientation) are re-read from the
/// provider by [`DeviceInformation::refresh`].
///
/// Single-owner: wrap it in [`crate::SharedDeviceInformation`] when updates
/// and reads happen on different threads.
#[allow(clippy::struct_excessive_bools)] // one flag per host signal
pub struct DeviceInformation {
    provider: Arc<dyn EnvironmentProvider>,
    facts: StaticFacts,

    device_language: String,
    current_network_operator: String,
    current_network_radio_type: RadioType,
    orientation: Orientation,

    is_wifi_connected: bool,
    is_online: bool,
    is_apple_watch_connected: bool,
    is_voice_over_enabled: bool,
    status_bar_height: StatusBarHeight,
}

impl DeviceInformation {
    /// Capture static facts and best-effort initial volatile facts.
    ///
    /// Never fails: unavailable facts become empty strings, `false`, zero
    /// or `unknown`.
    #[must_use]
    pub fn new(provider: Arc<dyn EnvironmentProvider>) -> Self {
        let facts = StaticFacts::capture(provider.as_ref());

        let mut snapshot = Self {
            device_language: String::new(),
            current_network_operator: String::new(),
            current_network_radio_type: RadioType::Unknown,
            orientation: Orientation::Unknown,
            is_wifi_connected: provider.wifi_connected().unwrap_or(false),
            is_online: provider.online().unwrap_or(false),
            is_apple_watch_connected: provider.apple_watch_connected().unwrap_or(false),
            is_voice_over_enabled: provider.voice_over_enabled().unwrap_or(false),
            status_bar_height: provider
                .status_bar_height()
                .map_or(StatusBarHeight::ZERO, checked_status_bar_height),
            facts,
            provider,
        };
        snapshot.refresh();

        tracing::debug!(
            os = %snapshot.facts.os,
            os_version = %snapshot.facts.version,
            model = %snapshot.facts.model,
            app = %snapshot.facts.app_name,
            app_version = %snapshot.facts.app_version,
            "Captured device information"
        );

        snapshot
    }

    /// Re-read language, carrier, radio technology and orientation.
    ///
    /// Static and push fields are left untouched. Repeated calls without an
    /// environment change produce the same values.
    pub fn refresh(&mut self) {
        self.device_language = self.provider.device_language().unwrap_or_default();
        self.current_network_operator = self.provider.network_operator().unwrap_or_default();
        self.current_network_radio_type = resolve_radio_type(self.provider.network_radio_type());
        self.orientation = resolve_orientation(self.provider.orientation());

        tracing::trace!(
            language = %self.device_language,
            operator = %self.current_network_operator,
            radio = %self.current_network_radio_type,
            orientation = %self.orientation,
            "Refreshed device information"
        );
    }

    /// Route a host notification: push changes are stored, pull changes refresh.
    pub fn apply(&mut self, change: &EnvironmentChange) {
        match *change {
            EnvironmentChange::WiFiConnectivity(connected) => self.set_wifi_connected(connected),
            EnvironmentChange::Reachability(online) => self.set_online(online),
            EnvironmentChange::AppleWatchConnectivity(connected) => {
                self.set_apple_watch_connected(connected);
            }
            EnvironmentChange::VoiceOver(enabled) => self.set_voice_over_enabled(enabled),
            EnvironmentChange::StatusBarHeight(height) => self.set_status_bar_height(height),
            EnvironmentChange::Locale
            | EnvironmentChange::NetworkCarrier
            | EnvironmentChange::Orientation => self.refresh(),
        }
    }

    pub fn set_wifi_connected(&mut self, connected: bool) {
        self.is_wifi_connected = connected;
    }

    pub fn set_online(&mut self, online: bool) {
        self.is_online = online;
    }

    pub fn set_apple_watch_connected(&mut self, connected: bool) {
        self.is_apple_watch_connected = connected;
    }

    pub fn set_voice_over_enabled(&mut self, enabled: bool) {
        self.is_voice_over_enabled = enabled;
    }

    /// Store a new status bar height; negative or non-finite input becomes zero.
    pub fn set_status_bar_height(&mut self, height: f64) {
        self.status_bar_height = checked_status_bar_height(height);
    }

    /// Subscribe to the provider's change notifications, if it emits any.
    #[must_use]
    pub fn provider_changes(&self) -> Option<broadcast::Receiver<EnvironmentChange>> {
        self.provider.changes()
    }

    #[inline]
    #[must_use]
    pub fn static_facts(&self) -> &StaticFacts {
        &self.facts
    }

    #[inline]
    #[must_use]
    pub fn os(&self) -> &str {
        self.facts.os()
    }

    #[inline]
    #[must_use]
    pub fn version(&self) -> &str {
        self.facts.version()
    }

    #[inline]
    #[must_use]
    pub fn manufacturer(&self) -> &str {
        self.facts.manufacturer()
    }

    #[inline]
    #[must_use]
    pub fn brand(&self) -> &str {
        self.facts.brand()
    }

    #[inline]
    #[must_use]
    pub fn model(&self) -> &str {
        self.facts.model()
    }

    #[inline]
    #[must_use]
    pub fn app_name(&self) -> &str {
        self.facts.app_name()
    }

    #[inline]
    #[must_use]
    pub fn app_version(&self) -> &str {
        self.facts.app_version()
    }

    #[inline]
    #[must_use]
    pub fn app_build(&self) -> &str {
        self.facts.app_build()
    }

    #[inline]
    #[must_use]
    pub fn device_language(&self) -> &str {
        &self.device_language
    }

    #[inline]
    #[must_use]
    pub fn current_network_operator(&self) -> &str {
        &self.current_network_operator
    }

    #[inline]
    #[must_use]
    pub fn current_network_radio_type(&self) -> RadioType {
        self.current_network_radio_type
    }

    #[inline]
    #[must_use]
    pub fn is_wifi_connected(&self) -> bool {
        self.is_wifi_connected
    }

    #[inline]
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.is_online
    }

    #[inline]
    #[must_use]
    pub fn is_apple_watch_connected(&self) -> bool {
        self.is_apple_watch_connected
    }

    #[inline]
    #[must_use]
    pub fn is_voice_over_enabled(&self) -> bool {
        self.is_voice_over_enabled
    }

    #[inline]
    #[must_use]
    pub fn status_bar_height(&self) -> f64 {
        self.status_bar_height.get()
    }

    #[inline]
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Copy every field into a serializable view.
    #[must_use]
    pub fn view(&self) -> DeviceSnapshotView {
        DeviceSnapshotView {
            os: self.facts.os.clone(),
            version: self.facts.version.clone(),
            manufacturer: self.facts.manufacturer.clone(),
            brand: self.facts.brand.clone(),
            model: self.facts.model.clone(),
            app_name: self.facts.app_name.clone(),
            app_version: self.facts.app_version.clone(),
            app_build: self.facts.app_build.clone(),
            device_language: self.device_language.clone(),
            current_network_operator: self.current_network_operator.clone(),
            current_network_radio_type: self.current_network_radio_type,
            is_wifi_connected: self.is_wifi_connected,
            is_online: self.is_online,
            is_apple_watch_connected: self.is_apple_watch_connected,
            is_voice_over_enabled: self.is_voice_over_enabled,
            status_bar_height: self.status_bar_height,
            orientation: self.orientation,
        }
    }
}

impl fmt::Debug for DeviceInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceInformation")
            .field("facts", &self.facts)
            .field("device_language", &self.device_language)
            .field("current_network_operator", &self.current_network_operator)
            .field(
                "current_network_radio_type",
                &self.current_network_radio_type,
            )
            .field("orientation", &self.orientation)
            .field("is_wifi_connected", &self.is_wifi_connected)
            .field("is_online", &self.is_online)
            .field("is_apple_watch_connected", &self.is_apple_watch_connected)
            .field("is_voice_over_enabled", &self.is_voice_over_enabled)
            .field("status_bar_height", &self.status_bar_height)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{EnvironmentFacts, FixedEnvironment};

    fn snapshot_with(facts: EnvironmentFacts) -> (Arc<FixedEnvironment>, DeviceInformation) {
        let env = Arc::new(FixedEnvironment::new(facts));
        let snapshot = DeviceInformation::new(env.clone());
        (env, snapshot)
    }

    #[test]
    fn empty_provider_yields_defaults() {
        let (_env, snapshot) = snapshot_with(EnvironmentFacts::default());

        assert_eq!(snapshot.os(), "");
        assert_eq!(snapshot.app_build(), "");
        assert_eq!(snapshot.device_language(), "");
        assert_eq!(snapshot.current_network_operator(), "");
        assert_eq!(snapshot.current_network_radio_type(), RadioType::Unknown);
        assert_eq!(snapshot.orientation(), Orientation::Unknown);
        assert!(!snapshot.is_wifi_connected());
        assert!(!snapshot.is_online());
        assert!(!snapshot.is_apple_watch_connected());
        assert!(!snapshot.is_voice_over_enabled());
        assert!(snapshot.status_bar_height().abs() < f64::EPSILON);
    }

    #[test]
    fn initial_push_values_come_from_provider() {
        let (_env, snapshot) = snapshot_with(EnvironmentFacts {
            wifi_connected: Some(true),
            online: Some(true),
            voice_over_enabled: Some(true),
            status_bar_height: Some(-12.0),
            ..Default::default()
        });

        assert!(snapshot.is_wifi_connected());
        assert!(snapshot.is_online());
        assert!(snapshot.is_voice_over_enabled());
        assert!(!snapshot.is_apple_watch_connected());
        assert!(snapshot.status_bar_height().abs() < f64::EPSILON);
    }

    /// Count WARN events emitted while `f` runs.
    fn warnings_during(f: impl FnOnce()) -> usize {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use tracing_subscriber::layer::SubscriberExt;

        #[derive(Clone, Default)]
        struct WarningCount(Arc<AtomicUsize>);

        impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for WarningCount {
            fn on_event(
                &self,
                event: &tracing::Event<'_>,
                _ctx: tracing_subscriber::layer::Context<'_, S>,
            ) {
                if *event.metadata().level() == tracing::Level::WARN {
                    self.0.fetch_add(1, Ordering::SeqCst);
                }
            }
        }

        let count = WarningCount::default();
        let seen = count.0.clone();
        tracing::subscriber::with_default(tracing_subscriber::registry().with(count), f);
        seen.load(Ordering::SeqCst)
    }

    #[test]
    fn invalid_initial_status_bar_height_warns_like_setter() {
        let from_provider = warnings_during(|| {
            let (_env, snapshot) = snapshot_with(EnvironmentFacts {
                status_bar_height: Some(f64::NAN),
                ..Default::default()
            });
            assert!(snapshot.status_bar_height().abs() < f64::EPSILON);
        });
        let from_setter = warnings_during(|| {
            let (_env, mut snapshot) = snapshot_with(EnvironmentFacts::default());
            snapshot.set_status_bar_height(f64::NAN);
        });

        assert_eq!(from_provider, 1);
        assert_eq!(from_setter, 1);
        assert_eq!(
            warnings_during(|| drop(snapshot_with(EnvironmentFacts {
                status_bar_height: Some(20.0),
                ..Default::default()
            }))),
            0
        );
    }

    #[test]
    fn refresh_does_not_reread_push_fields() {
        let (env, mut snapshot) = snapshot_with(EnvironmentFacts {
            online: Some(true),
            ..Default::default()
        });

        env.update(|facts| facts.online = Some(false));
        snapshot.refresh();

        assert!(snapshot.is_online());
    }

    #[test]
    fn apply_routes_pull_changes_to_refresh() {
        let (env, mut snapshot) = snapshot_with(EnvironmentFacts {
            orientation: Some("portrait".to_owned()),
            ..Default::default()
        });

        env.update(|facts| facts.orientation = Some("faceDown".to_owned()));
        snapshot.apply(&EnvironmentChange::Orientation);

        assert_eq!(snapshot.orientation(), Orientation::FaceDown);
    }

    #[test]
    fn apply_stores_push_values() {
        let (_env, mut snapshot) = snapshot_with(EnvironmentFacts::default());

        snapshot.apply(&EnvironmentChange::AppleWatchConnectivity(true));
        snapshot.apply(&EnvironmentChange::StatusBarHeight(47.0));

        assert!(snapshot.is_apple_watch_connected());
        assert!((snapshot.status_bar_height() - 47.0).abs() < f64::EPSILON);
    }

    #[test]
    fn debug_output_omits_provider() {
        let (_env, snapshot) = snapshot_with(EnvironmentFacts::default());
        let rendered = format!("{snapshot:?}");

        assert!(rendered.starts_with("DeviceInformation"));
        assert!(!rendered.contains("provider"));
    }
}
