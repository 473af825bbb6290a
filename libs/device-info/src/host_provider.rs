use crate::config::{AppIdentity, DeviceInfoConfig};
use crate::notifications::{ChangeFeed, EnvironmentChange};
use crate::provider::EnvironmentProvider;
use sysinfo::System;
use tokio::sync::broadcast;

/// Hardware vendor and model of the current machine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HardwareIdentity {
    pub manufacturer: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
}

impl HardwareIdentity {
    /// Collect the identity of the machine the code runs on
    #[must_use]
    pub fn collect() -> Self {
        // Use platform-specific hardware detection
        #[cfg(target_os = "linux")]
        {
            super::hardware_linux::collect_hardware_identity()
        }
        #[cfg(target_os = "macos")]
        {
            super::hardware_macos::collect_hardware_identity()
        }
        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        {
            Self::default()
        }
    }
}

/// Platform family name for the compile target
fn os_family() -> String {
    let os = std::env::consts::OS;
    match os {
        "macos" => "macOS",
        "ios" => "iOS",
        "linux" => "Linux",
        "windows" => "Windows",
        "android" => "Android",
        "freebsd" => "FreeBSD",
        _ => os,
    }
    .to_owned()
}

fn executable_name() -> Option<String> {
    let exe = std::env::current_exe().ok()?;
    exe.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
}

/// Best-effort provider for desktop and server hosts
///
/// Static facts are collected once at construction. The locale is re-read
/// from the process environment on every refresh. Carrier, radio, watch,
/// screen reader, status bar and orientation facts have no desktop source
/// and are reported as unavailable; hosts that learn them publish changes on
/// [`HostEnvironmentProvider::feed`].
#[derive(Debug)]
pub struct HostEnvironmentProvider {
    os_name: String,
    os_version: Option<String>,
    hardware: HardwareIdentity,
    app: AppIdentity,
    feed: ChangeFeed,
}

impl HostEnvironmentProvider {
    #[must_use]
    pub fn new(config: &DeviceInfoConfig) -> Self {
        let os_version = System::os_version().or_else(System::kernel_version);
        let hardware = HardwareIdentity::collect();

        let mut app = config.app.clone();
        if app.name.is_none() {
            app.name = executable_name();
        }

        tracing::debug!(
            os_version = os_version.as_deref().unwrap_or("unknown"),
            manufacturer = hardware.manufacturer.as_deref().unwrap_or("unknown"),
            model = hardware.model.as_deref().unwrap_or("unknown"),
            "Collected host identity"
        );

        Self {
            os_name: os_family(),
            os_version,
            hardware,
            app,
            feed: config.change_feed(),
        }
    }

    /// Feed the host publishes environment changes on
    #[inline]
    #[must_use]
    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    /// Whether a local address for the default route exists.
    fn detect_online() -> bool {
        match local_ip_address::local_ip() {
            Ok(ip) => {
                tracing::debug!(ip = %ip, "Detected local IP address");
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "No local IP address, assuming offline");
                false
            }
        }
    }
}

impl EnvironmentProvider for HostEnvironmentProvider {
    fn os_name(&self) -> Option<String> {
        Some(self.os_name.clone())
    }

    fn os_version(&self) -> Option<String> {
        self.os_version.clone()
    }

    fn manufacturer(&self) -> Option<String> {
        self.hardware.manufacturer.clone()
    }

    fn brand(&self) -> Option<String> {
        self.hardware.brand.clone()
    }

    fn model(&self) -> Option<String> {
        self.hardware.model.clone()
    }

    fn app_name(&self) -> Option<String> {
        self.app.name.clone()
    }

    fn app_version(&self) -> Option<String> {
        self.app.version.clone()
    }

    fn app_build(&self) -> Option<String> {
        self.app.build.clone()
    }

    fn device_language(&self) -> Option<String> {
        crate::locale::language_from_env()
    }

    fn network_operator(&self) -> Option<String> {
        None
    }

    fn network_radio_type(&self) -> Option<String> {
        None
    }

    fn orientation(&self) -> Option<String> {
        None
    }

    fn online(&self) -> Option<bool> {
        Some(Self::detect_online())
    }

    fn changes(&self) -> Option<broadcast::Receiver<EnvironmentChange>> {
        Some(self.feed.subscribe())
    }
}
