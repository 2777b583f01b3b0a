//! Device classification for recorded clicks.

use serde::{Deserialize, Serialize};
use std::fmt;
use woothee::parser::Parser;

/// Coarse platform category of the client that followed a short link.
///
/// The set is closed: every click lands in exactly one variant, and any
/// signal that cannot be recognized is counted as [`DeviceType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Desktop,
    Mobile,
    Tablet,
    Other,
}

impl DeviceType {
    /// All variants, in display order.
    pub const ALL: [DeviceType; 4] = [
        DeviceType::Desktop,
        DeviceType::Mobile,
        DeviceType::Tablet,
        DeviceType::Other,
    ];

    /// Lowercase name used in JSON, storage keys and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Desktop => "desktop",
            DeviceType::Mobile => "mobile",
            DeviceType::Tablet => "tablet",
            DeviceType::Other => "other",
        }
    }

    /// Classifies a free-form device label, e.g. a value reported by the caller.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Unrecognized labels map to [`DeviceType::Other`].
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "desktop" | "pc" => DeviceType::Desktop,
            "mobile" | "smartphone" | "mobilephone" => DeviceType::Mobile,
            "tablet" => DeviceType::Tablet,
            _ => DeviceType::Other,
        }
    }

    /// Classifies a `User-Agent` header value.
    ///
    /// Windows PCs are settled first, so the legacy `Tablet PC` token of
    /// desktop Internet Explorer does not count as a tablet. Tablets are
    /// detected next because woothee reports iPads and Android tablets under
    /// the smartphone category. Missing, empty and unparseable agents
    /// (crawlers, appliances, unknown clients) map to [`DeviceType::Other`].
    pub fn from_user_agent(user_agent: Option<&str>) -> Self {
        let ua = match user_agent {
            Some(s) if !s.trim().is_empty() => s,
            _ => return DeviceType::Other,
        };

        let parsed = Parser::new().parse(ua);

        if matches!(&parsed, Some(r) if r.category == "pc" && r.os.starts_with("Windows")) {
            return DeviceType::Desktop;
        }

        if is_tablet(ua) {
            return DeviceType::Tablet;
        }

        match parsed {
            Some(result) => match result.category {
                "pc" => DeviceType::Desktop,
                "smartphone" | "mobilephone" => DeviceType::Mobile,
                _ => DeviceType::Other,
            },
            None => DeviceType::Other,
        }
    }
}

fn is_tablet(ua: &str) -> bool {
    ua.contains("iPad")
        || (ua.contains("Android") && !ua.contains("Mobile"))
        || ua
            .match_indices("Tablet")
            .any(|(i, _)| !ua[i..].starts_with("Tablet PC"))
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME_WINDOWS: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const SAFARI_IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const SAFARI_IPAD: &str = "Mozilla/5.0 (iPad; CPU OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const ANDROID_TABLET: &str = "Mozilla/5.0 (Linux; Android 13; SM-X700) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const IE_TABLET_PC: &str = "Mozilla/4.0 (compatible; MSIE 8.0; Windows NT 6.1; Trident/4.0; SLCC2; .NET CLR 2.0.50727; Tablet PC 2.0)";
    const FIREFOX_OS_TABLET: &str = "Mozilla/5.0 (Tablet; rv:26.0) Gecko/26.0 Firefox/26.0";
    const GOOGLEBOT: &str = "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";

    #[test]
    fn test_desktop_user_agent() {
        assert_eq!(
            DeviceType::from_user_agent(Some(CHROME_WINDOWS)),
            DeviceType::Desktop
        );
    }

    #[test]
    fn test_mobile_user_agent() {
        assert_eq!(
            DeviceType::from_user_agent(Some(SAFARI_IPHONE)),
            DeviceType::Mobile
        );
    }

    #[test]
    fn test_tablet_user_agents() {
        assert_eq!(
            DeviceType::from_user_agent(Some(SAFARI_IPAD)),
            DeviceType::Tablet
        );
        assert_eq!(
            DeviceType::from_user_agent(Some(ANDROID_TABLET)),
            DeviceType::Tablet
        );
    }

    #[test]
    fn test_windows_tablet_pc_is_desktop() {
        assert_eq!(
            DeviceType::from_user_agent(Some(IE_TABLET_PC)),
            DeviceType::Desktop
        );
    }

    #[test]
    fn test_tablet_token() {
        assert!(is_tablet(FIREFOX_OS_TABLET));
        assert!(!is_tablet("Mozilla/4.0 (compatible; Tablet PC 2.0)"));
        assert!(is_tablet("Mozilla/5.0 (Tablet PC 2.0; Tablet; rv:26.0)"));
    }

    #[test]
    fn test_unrecognized_user_agents_are_other() {
        assert_eq!(DeviceType::from_user_agent(None), DeviceType::Other);
        assert_eq!(DeviceType::from_user_agent(Some("")), DeviceType::Other);
        assert_eq!(
            DeviceType::from_user_agent(Some("definitely not a browser")),
            DeviceType::Other
        );
        assert_eq!(
            DeviceType::from_user_agent(Some(GOOGLEBOT)),
            DeviceType::Other
        );
    }

    #[test]
    fn test_from_label() {
        assert_eq!(DeviceType::from_label("desktop"), DeviceType::Desktop);
        assert_eq!(DeviceType::from_label(" MOBILE "), DeviceType::Mobile);
        assert_eq!(DeviceType::from_label("Tablet"), DeviceType::Tablet);
        assert_eq!(DeviceType::from_label("smart-fridge"), DeviceType::Other);
        assert_eq!(DeviceType::from_label(""), DeviceType::Other);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&DeviceType::Tablet).unwrap();
        assert_eq!(json, "\"tablet\"");

        let parsed: DeviceType = serde_json::from_str("\"desktop\"").unwrap();
        assert_eq!(parsed, DeviceType::Desktop);
    }
}
