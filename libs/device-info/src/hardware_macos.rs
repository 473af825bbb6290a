use crate::host_provider::HardwareIdentity;
use std::process::Command;

const APPLE: &str = "Apple";

/// Collect hardware identity on macOS using `sysctl`
pub fn collect_hardware_identity() -> HardwareIdentity {
    HardwareIdentity {
        manufacturer: Some(APPLE.to_owned()),
        brand: Some(APPLE.to_owned()),
        model: read_hw_model(),
    }
}

fn read_hw_model() -> Option<String> {
    let Ok(output) = Command::new("sysctl").args(["-n", "hw.model"]).output() else {
        tracing::debug!("sysctl unavailable, hardware model unknown");
        return None;
    };

    if !output.status.success() {
        return None;
    }

    let model = String::from_utf8_lossy(&output.stdout).trim().to_owned();
    (!model.is_empty()).then_some(model)
}
