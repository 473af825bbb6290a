use crate::host_provider::HardwareIdentity;
use std::path::Path;

const DMI_ROOT: &str = "/sys/class/dmi/id";

/// Vendor placeholders firmware leaves in unset DMI fields
const PLACEHOLDERS: [&str; 6] = [
    "to be filled by o.e.m.",
    "default string",
    "not specified",
    "not applicable",
    "system product name",
    "none",
];

/// Collect hardware identity on Linux from the DMI tables exported in sysfs
pub fn collect_hardware_identity() -> HardwareIdentity {
    read_dmi_identity(Path::new(DMI_ROOT))
}

fn read_dmi_identity(root: &Path) -> HardwareIdentity {
    let manufacturer = read_dmi_field(root, "sys_vendor");
    let brand = read_dmi_field(root, "product_family")
        .or_else(|| read_dmi_field(root, "board_vendor"))
        .or_else(|| manufacturer.clone());
    let model = read_dmi_field(root, "product_name");

    if manufacturer.is_none() && model.is_none() {
        tracing::debug!(root = %root.display(), "No DMI hardware identity available");
    }

    HardwareIdentity {
        manufacturer,
        brand,
        model,
    }
}

fn read_dmi_field(root: &Path, field: &str) -> Option<String> {
    let raw = std::fs::read_to_string(root.join(field)).ok()?;
    let value = raw.trim();
    let placeholder = PLACEHOLDERS
        .iter()
        .any(|p| value.eq_ignore_ascii_case(p));
    if value.is_empty() || placeholder {
        None
    } else {
        Some(value.to_owned())
    }
}
