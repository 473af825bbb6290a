use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Lowercase ASCII alphanumerics only, so `Landscape-Left`, `landscape_left`
/// and `landscapeLeft` compare equal.
fn normalize_label(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Prefix Core Telephony puts on radio access technology identifiers
const CORE_TELEPHONY_PREFIX: &str = "CTRadioAccessTechnology";

/// Radio technology of the current network connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RadioType {
    None,
    Cellular2G,
    Cellular3G,
    Cellular4G,
    Cellular5G,
    WiFi,
    #[default]
    Unknown,
}

impl RadioType {
    pub const ALL: [Self; 7] = [
        Self::None,
        Self::Cellular2G,
        Self::Cellular3G,
        Self::Cellular4G,
        Self::Cellular5G,
        Self::WiFi,
        Self::Unknown,
    ];

    /// Map a raw platform value onto the closed set.
    ///
    /// Accepts the labels themselves, common technology names (`lte`,
    /// `edge`, `hspa`, ...) and Core Telephony identifiers such as
    /// `CTRadioAccessTechnologyLTE`. Anything else is [`RadioType::Unknown`].
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        let raw = raw.trim();
        let raw = raw.strip_prefix(CORE_TELEPHONY_PREFIX).unwrap_or(raw);
        match normalize_label(raw).as_str() {
            "none" | "notconnected" | "offline" => Self::None,
            "2g" | "gprs" | "edge" | "gsm" | "cdma" | "cdma1x" | "1xrtt" => Self::Cellular2G,
            "3g" | "umts" | "wcdma" | "hspa" | "hsdpa" | "hsupa" | "evdo" | "cdmaevdorev0"
            | "cdmaevdoreva" | "cdmaevdorevb" | "ehrpd" => Self::Cellular3G,
            "4g" | "lte" => Self::Cellular4G,
            "5g" | "nr" | "nrnsa" => Self::Cellular5G,
            "wifi" | "wlan" => Self::WiFi,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Cellular2G => "2G",
            Self::Cellular3G => "3G",
            Self::Cellular4G => "4G",
            Self::Cellular5G => "5G",
            Self::WiFi => "Wi-Fi",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RadioType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RadioType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RadioType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_raw(&raw))
    }
}

/// Physical orientation of the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
    FaceUp,
    FaceDown,
    #[default]
    Unknown,
}

impl Orientation {
    pub const ALL: [Self; 7] = [
        Self::Portrait,
        Self::PortraitUpsideDown,
        Self::LandscapeLeft,
        Self::LandscapeRight,
        Self::FaceUp,
        Self::FaceDown,
        Self::Unknown,
    ];

    /// Map a raw platform value onto the closed set.
    ///
    /// Labels match regardless of case and separators. Numeric codes follow
    /// the `UIDeviceOrientation` ordering (`0` unknown through `6` face down).
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        match normalize_label(raw).as_str() {
            "portrait" | "1" => Self::Portrait,
            "portraitupsidedown" | "upsidedown" | "2" => Self::PortraitUpsideDown,
            "landscapeleft" | "3" => Self::LandscapeLeft,
            "landscaperight" | "4" => Self::LandscapeRight,
            "faceup" | "5" => Self::FaceUp,
            "facedown" | "6" => Self::FaceDown,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::PortraitUpsideDown => "portrait-upside-down",
            Self::LandscapeLeft => "landscape-left",
            Self::LandscapeRight => "landscape-right",
            Self::FaceUp => "face-up",
            Self::FaceDown => "face-down",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Orientation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Orientation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_raw(&raw))
    }
}

/// Status bar height in logical units. Always finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
#[serde(transparent)]
pub struct StatusBarHeight(f64);

impl StatusBarHeight {
    pub const ZERO: Self = Self(0.0);

    /// Negative and non-finite values clamp to zero.
    #[must_use]
    pub fn new(value: f64) -> Self {
        if value.is_finite() && value > 0.0 {
            Self(value)
        } else {
            Self::ZERO
        }
    }

    #[inline]
    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl From<f64> for StatusBarHeight {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for StatusBarHeight {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Self::new)
    }
}

/// Read-only copy of every snapshot field, as handed to the event composer
#[allow(clippy::struct_excessive_bools)] // one flag per host signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSnapshotView {
    pub os: String,
    pub version: String,
    pub manufacturer: String,
    pub brand: String,
    pub model: String,
    pub app_name: String,
    pub app_version: String,
    pub app_build: String,
    pub device_language: String,
    pub current_network_operator: String,
    pub current_network_radio_type: RadioType,
    #[serde(rename = "isWiFiConnected")]
    pub is_wifi_connected: bool,
    pub is_online: bool,
    pub is_apple_watch_connected: bool,
    pub is_voice_over_enabled: bool,
    pub status_bar_height: StatusBarHeight,
    pub orientation: Orientation,
}

impl DeviceSnapshotView {
    /// Flatten the view into `device_info_*` event properties.
    #[must_use]
    pub fn event_properties(&self) -> serde_json::Map<String, serde_json::Value> {
        use serde_json::Value;

        let entries = [
            ("device_info_os", Value::from(self.os.as_str())),
            ("device_info_os_version", Value::from(self.version.as_str())),
            (
                "device_info_manufacturer",
                Value::from(self.manufacturer.as_str()),
            ),
            ("device_info_brand", Value::from(self.brand.as_str())),
            ("device_info_model", Value::from(self.model.as_str())),
            ("device_info_app_name", Value::from(self.app_name.as_str())),
            (
                "device_info_app_version",
                Value::from(self.app_version.as_str()),
            ),
            (
                "device_info_app_version_code",
                Value::from(self.app_build.as_str()),
            ),
            (
                "device_info_language",
                Value::from(self.device_language.as_str()),
            ),
            (
                "device_info_network_operator",
                Value::from(self.current_network_operator.as_str()),
            ),
            (
                "device_info_radio_type",
                Value::from(self.current_network_radio_type.as_str()),
            ),
            (
                "device_info_wifi_connected",
                Value::from(self.is_wifi_connected),
            ),
            ("device_info_online", Value::from(self.is_online)),
            (
                "device_info_apple_watch_connected",
                Value::from(self.is_apple_watch_connected),
            ),
            (
                "device_info_voiceover_enabled",
                Value::from(self.is_voice_over_enabled),
            ),
            (
                "device_info_status_bar_height",
                Value::from(self.status_bar_height.get()),
            ),
            (
                "device_info_orientation",
                Value::from(self.orientation.as_str()),
            ),
        ];

        entries
            .into_iter()
            .map(|(key, value)| (key.to_owned(), value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn radio_type_accepts_labels_and_core_telephony_ids() {
        assert_eq!(RadioType::from_raw("Wi-Fi"), RadioType::WiFi);
        assert_eq!(RadioType::from_raw("wifi"), RadioType::WiFi);
        assert_eq!(RadioType::from_raw("none"), RadioType::None);
        assert_eq!(RadioType::from_raw("2G"), RadioType::Cellular2G);
        assert_eq!(
            RadioType::from_raw("CTRadioAccessTechnologyEdge"),
            RadioType::Cellular2G
        );
        assert_eq!(
            RadioType::from_raw("CTRadioAccessTechnologyHSDPA"),
            RadioType::Cellular3G
        );
        assert_eq!(
            RadioType::from_raw("CTRadioAccessTechnologyLTE"),
            RadioType::Cellular4G
        );
        assert_eq!(
            RadioType::from_raw("CTRadioAccessTechnologyNRNSA"),
            RadioType::Cellular5G
        );
        assert_eq!(RadioType::from_raw("HSPA+"), RadioType::Cellular3G);
    }

    #[test]
    fn radio_type_unrecognized_is_unknown() {
        assert_eq!(RadioType::from_raw(""), RadioType::Unknown);
        assert_eq!(RadioType::from_raw("6G"), RadioType::Unknown);
        assert_eq!(
            RadioType::from_raw("CTRadioAccessTechnologyFuture"),
            RadioType::Unknown
        );
    }

    #[test]
    fn orientation_accepts_any_case_and_separator() {
        assert_eq!(
            Orientation::from_raw("landscapeLeft"),
            Orientation::LandscapeLeft
        );
        assert_eq!(
            Orientation::from_raw("LANDSCAPE_RIGHT"),
            Orientation::LandscapeRight
        );
        assert_eq!(
            Orientation::from_raw("portrait-upside-down"),
            Orientation::PortraitUpsideDown
        );
        assert_eq!(Orientation::from_raw("face up"), Orientation::FaceUp);
        assert_eq!(Orientation::from_raw("6"), Orientation::FaceDown);
        assert_eq!(Orientation::from_raw("0"), Orientation::Unknown);
        assert_eq!(Orientation::from_raw("sideways"), Orientation::Unknown);
    }

    #[test]
    fn labels_parse_back_to_themselves() {
        for radio in RadioType::ALL {
            assert_eq!(RadioType::from_raw(radio.as_str()), radio);
        }
        for orientation in Orientation::ALL {
            assert_eq!(Orientation::from_raw(orientation.as_str()), orientation);
        }
    }

    #[test]
    fn enums_serialize_as_labels() {
        assert_eq!(
            serde_json::to_value(RadioType::WiFi).unwrap(),
            serde_json::json!("Wi-Fi")
        );
        assert_eq!(
            serde_json::to_value(Orientation::FaceDown).unwrap(),
            serde_json::json!("face-down")
        );
        let parsed: Orientation = serde_json::from_value(serde_json::json!("diagonal")).unwrap();
        assert_eq!(parsed, Orientation::Unknown);
    }

    #[test]
    fn status_bar_height_clamps_invalid_values() {
        assert_eq!(StatusBarHeight::new(-20.0), StatusBarHeight::ZERO);
        assert_eq!(StatusBarHeight::new(f64::NAN), StatusBarHeight::ZERO);
        assert_eq!(StatusBarHeight::new(f64::INFINITY), StatusBarHeight::ZERO);
        assert_eq!(StatusBarHeight::new(44.0), StatusBarHeight(44.0));

        let parsed: StatusBarHeight = serde_json::from_value(serde_json::json!(-3.5)).unwrap();
        assert_eq!(parsed, StatusBarHeight::ZERO);
    }

    proptest! {
        #[test]
        fn status_bar_height_is_never_negative(value in proptest::num::f64::ANY) {
            let height = StatusBarHeight::new(value);
            prop_assert!(height.get() >= 0.0);
            prop_assert!(height.get().is_finite());
        }

        #[test]
        fn raw_radio_values_stay_in_closed_set(raw in ".{0,24}") {
            prop_assert!(RadioType::ALL.contains(&RadioType::from_raw(&raw)));
        }

        #[test]
        fn raw_orientation_values_stay_in_closed_set(raw in ".{0,24}") {
            prop_assert!(Orientation::ALL.contains(&Orientation::from_raw(&raw)));
        }
    }
}
