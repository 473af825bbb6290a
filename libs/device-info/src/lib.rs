#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Device Information Library
//!
//! This library keeps a snapshot of the device and application facts that
//! analytics events are enriched with:
//! - Static facts captured once (OS, hardware identity, app identity)
//! - Volatile facts that are either pushed by the host (connectivity,
//!   accessibility, status bar height) or pulled on refresh (locale,
//!   carrier, radio technology, orientation)
//!
//! Raw facts come from an [`EnvironmentProvider`]. The snapshot itself is
//! synchronous and single-owner; [`SharedDeviceInformation`] adds the lock
//! and change-listener task for hosts that update it from other threads.

mod locale;

// Platform-specific hardware identity collectors
#[cfg(target_os = "linux")]
mod hardware_linux;
#[cfg(target_os = "macos")]
mod hardware_macos;

pub mod config;
pub mod error;
pub mod host_provider;
pub mod model;
pub mod notifications;
pub mod provider;
pub mod shared;
pub mod snapshot;

pub use config::{AppIdentity, DeviceInfoConfig};
pub use error::DeviceInfoError;
pub use host_provider::{HardwareIdentity, HostEnvironmentProvider};
pub use model::{DeviceSnapshotView, Orientation, RadioType, StatusBarHeight};
pub use notifications::{ChangeFeed, EnvironmentChange};
pub use provider::{EnvironmentFacts, EnvironmentProvider, FixedEnvironment};
pub use shared::SharedDeviceInformation;
pub use snapshot::{DeviceInformation, StaticFacts};
