use serde::Serialize;

/// Host operating system as reported to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperatingSystem {
    /// Apple desktop.
    #[serde(rename = "macOS")]
    MacOS,
    /// Apple mobile.
    #[serde(rename = "iOS")]
    IOS,
    /// Microsoft Windows.
    Windows,
    /// Android.
    Android,
    /// Desktop Linux and other Linux-based platforms.
    Linux,
    /// Anything not recognized.
    Unknown,
}

/// Platform strings reported by Apple desktops.
const MAC_PLATFORMS: &[&str] = &["Macintosh", "MacIntel", "MacPPC", "Mac68K", "macOS"];
/// Platform strings reported by Windows.
const WINDOWS_PLATFORMS: &[&str] = &["Win32", "Win64", "Windows", "WinCE"];
/// Platform strings reported by iOS devices.
const IOS_PLATFORMS: &[&str] = &["iPhone", "iPad", "iPod"];

/// What: Detect the operating system from browser-reported strings.
///
/// Inputs:
/// - `user_agent`: `navigator.userAgent`.
/// - `platform`: `navigator.userAgentData.platform`, falling back to `navigator.platform`.
///
/// Output:
/// - Best-guess [`OperatingSystem`].
///
/// Details:
/// - Platform lists are checked first; Android is only visible in the user agent.
#[must_use]
pub fn detect_os(user_agent: &str, platform: Option<&str>) -> OperatingSystem {
    let platform = platform.unwrap_or_default();
    if MAC_PLATFORMS.contains(&platform) {
        OperatingSystem::MacOS
    } else if IOS_PLATFORMS.contains(&platform) {
        OperatingSystem::IOS
    } else if WINDOWS_PLATFORMS.contains(&platform) {
        OperatingSystem::Windows
    } else if user_agent.contains("Android") {
        OperatingSystem::Android
    } else if platform.contains("Linux") {
        OperatingSystem::Linux
    } else {
        OperatingSystem::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Common browser strings map to the expected systems.
    fn detect_os_common_platforms() {
        assert_eq!(detect_os("", Some("MacIntel")), OperatingSystem::MacOS);
        assert_eq!(detect_os("", Some("macOS")), OperatingSystem::MacOS);
        assert_eq!(detect_os("", Some("iPhone")), OperatingSystem::IOS);
        assert_eq!(detect_os("", Some("Win32")), OperatingSystem::Windows);
        assert_eq!(
            detect_os("Mozilla/5.0 (Linux; Android 14; Pixel 8)", Some("Linux armv8l")),
            OperatingSystem::Android
        );
        assert_eq!(detect_os("Mozilla/5.0 (X11)", Some("Linux x86_64")), OperatingSystem::Linux);
        assert_eq!(detect_os("", None), OperatingSystem::Unknown);
    }

    #[test]
    /// What: Serialized names match what the UI expects.
    fn serialized_names() {
        let names: Vec<String> = [
            OperatingSystem::MacOS,
            OperatingSystem::IOS,
            OperatingSystem::Windows,
            OperatingSystem::Unknown,
        ]
        .iter()
        .map(|os| serde_json::to_string(os).expect("serializes"))
        .collect();
        assert_eq!(names, vec!["\"macOS\"", "\"iOS\"", "\"Windows\"", "\"Unknown\""]);
    }
}
