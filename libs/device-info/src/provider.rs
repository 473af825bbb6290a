use crate::notifications::{ChangeFeed, EnvironmentChange};
use parking_lot::RwLock;
use tokio::sync::broadcast;

/// Source of raw host facts for a [`crate::DeviceInformation`] snapshot.
///
/// Every method returns `None` when the fact is unavailable. Raw radio and
/// orientation strings are mapped onto closed enums by the snapshot, so
/// implementations may return whatever the platform reports.
///
/// The push-field methods (`wifi_connected` through `status_bar_height`)
/// are read once, at construction, as initial values. Later updates for
/// those fields arrive through [`EnvironmentProvider::changes`] or direct
/// setter calls.
pub trait EnvironmentProvider: Send + Sync {
    fn os_name(&self) -> Option<String>;
    fn os_version(&self) -> Option<String>;
    fn manufacturer(&self) -> Option<String>;
    fn brand(&self) -> Option<String>;
    fn model(&self) -> Option<String>;
    fn app_name(&self) -> Option<String>;
    fn app_version(&self) -> Option<String>;
    fn app_build(&self) -> Option<String>;

    fn device_language(&self) -> Option<String>;
    fn network_operator(&self) -> Option<String>;
    fn network_radio_type(&self) -> Option<String>;
    fn orientation(&self) -> Option<String>;

    fn wifi_connected(&self) -> Option<bool> {
        None
    }

    fn online(&self) -> Option<bool> {
        None
    }

    fn apple_watch_connected(&self) -> Option<bool> {
        None
    }

    fn voice_over_enabled(&self) -> Option<bool> {
        None
    }

    fn status_bar_height(&self) -> Option<f64> {
        None
    }

    /// Subscribe to change notifications, if the provider emits any.
    fn changes(&self) -> Option<broadcast::Receiver<EnvironmentChange>> {
        None
    }
}

/// Raw facts held by a [`FixedEnvironment`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvironmentFacts {
    pub os_name: Option<String>,
    pub os_version: Option<String>,
    pub manufacturer: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub app_name: Option<String>,
    pub app_version: Option<String>,
    pub app_build: Option<String>,
    pub device_language: Option<String>,
    pub network_operator: Option<String>,
    pub network_radio_type: Option<String>,
    pub orientation: Option<String>,
    pub wifi_connected: Option<bool>,
    pub online: Option<bool>,
    pub apple_watch_connected: Option<bool>,
    pub voice_over_enabled: Option<bool>,
    pub status_bar_height: Option<f64>,
}

/// Provider backed by facts supplied from outside the process' own
/// introspection, e.g. a foreign host runtime or a test.
///
/// Facts can be replaced at any time with [`FixedEnvironment::update`];
/// changes are announced on [`FixedEnvironment::feed`] only when published.
#[derive(Debug, Default)]
pub struct FixedEnvironment {
    facts: RwLock<EnvironmentFacts>,
    feed: ChangeFeed,
}

impl FixedEnvironment {
    #[must_use]
    pub fn new(facts: EnvironmentFacts) -> Self {
        Self {
            facts: RwLock::new(facts),
            feed: ChangeFeed::default(),
        }
    }

    #[must_use]
    pub fn with_feed(facts: EnvironmentFacts, feed: ChangeFeed) -> Self {
        Self {
            facts: RwLock::new(facts),
            feed,
        }
    }

    /// Mutate the held facts in place.
    pub fn update(&self, f: impl FnOnce(&mut EnvironmentFacts)) {
        f(&mut *self.facts.write());
    }

    #[must_use]
    pub fn facts(&self) -> EnvironmentFacts {
        self.facts.read().clone()
    }

    #[inline]
    #[must_use]
    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }
}

impl EnvironmentProvider for FixedEnvironment {
    fn os_name(&self) -> Option<String> {
        self.facts.read().os_name.clone()
    }

    fn os_version(&self) -> Option<String> {
        self.facts.read().os_version.clone()
    }

    fn manufacturer(&self) -> Option<String> {
        self.facts.read().manufacturer.clone()
    }

    fn brand(&self) -> Option<String> {
        self.facts.read().brand.clone()
    }

    fn model(&self) -> Option<String> {
        self.facts.read().model.clone()
    }

    fn app_name(&self) -> Option<String> {
        self.facts.read().app_name.clone()
    }

    fn app_version(&self) -> Option<String> {
        self.facts.read().app_version.clone()
    }

    fn app_build(&self) -> Option<String> {
        self.facts.read().app_build.clone()
    }

    fn device_language(&self) -> Option<String> {
        self.facts.read().device_language.clone()
    }

    fn network_operator(&self) -> Option<String> {
        self.facts.read().network_operator.clone()
    }

    fn network_radio_type(&self) -> Option<String> {
        self.facts.read().network_radio_type.clone()
    }

    fn orientation(&self) -> Option<String> {
        self.facts.read().orientation.clone()
    }

    fn wifi_connected(&self) -> Option<bool> {
        self.facts.read().wifi_connected
    }

    fn online(&self) -> Option<bool> {
        self.facts.read().online
    }

    fn apple_watch_connected(&self) -> Option<bool> {
        self.facts.read().apple_watch_connected
    }

    fn voice_over_enabled(&self) -> Option<bool> {
        self.facts.read().voice_over_enabled
    }

    fn status_bar_height(&self) -> Option<f64> {
        self.facts.read().status_bar_height
    }

    fn changes(&self) -> Option<broadcast::Receiver<EnvironmentChange>> {
        Some(self.feed.subscribe())
    }
}
