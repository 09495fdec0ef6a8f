//! Browser impersonation profiles.
//!
//! Maps an `(impersonate, impersonate_os)` identifier pair onto an
//! [`Impersonation`] profile. Selection is a pure lookup over closed
//! enumerations: no I/O, no shared state. The profile contributes the
//! default request headers (User-Agent, client hints, Accept family) that
//! a real browser of that version and platform would send.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Browser family of an impersonation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrowserFamily {
    /// Google Chrome.
    Chrome,
    /// Microsoft Edge.
    Edge,
    /// Mozilla Firefox.
    Firefox,
    /// Desktop Safari.
    Safari,
    /// Safari on iPad.
    SafariIpad,
    /// Safari on iPhone.
    SafariIphone,
    /// OkHttp (Android/JVM HTTP client).
    OkHttp,
}

macro_rules! browsers {
    ($($variant:ident => ($id:literal, $family:ident, $version:literal)),* $(,)?) => {
        /// Supported browser identifiers.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Browser {
            $(
                #[doc = $id]
                $variant,
            )*
        }

        impl Browser {
            /// Every supported browser, newest first within each family.
            pub const ALL: &'static [Browser] = &[$(Browser::$variant),*];

            /// Wire identifier (e.g. `chrome_131`).
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Browser::$variant => $id,)*
                }
            }

            /// Browser family.
            pub fn family(self) -> BrowserFamily {
                match self {
                    $(Browser::$variant => BrowserFamily::$family,)*
                }
            }

            /// Dotted version string (e.g. `131`, `17.4.1`, `4.12.0`).
            pub fn version(self) -> &'static str {
                match self {
                    $(Browser::$variant => $version,)*
                }
            }
        }

        impl FromStr for Browser {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($id => Ok(Browser::$variant),)*
                    other => Err(Error::UnsupportedImpersonation {
                        kind: "browser",
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

browsers! {
    Chrome131 => ("chrome_131", Chrome, "131"),
    Chrome130 => ("chrome_130", Chrome, "130"),
    Chrome129 => ("chrome_129", Chrome, "129"),
    Chrome128 => ("chrome_128", Chrome, "128"),
    Chrome127 => ("chrome_127", Chrome, "127"),
    Chrome126 => ("chrome_126", Chrome, "126"),
    Chrome125 => ("chrome_125", Chrome, "125"),
    Chrome124 => ("chrome_124", Chrome, "124"),
    Chrome123 => ("chrome_123", Chrome, "123"),
    Chrome120 => ("chrome_120", Chrome, "120"),
    Chrome119 => ("chrome_119", Chrome, "119"),
    Chrome118 => ("chrome_118", Chrome, "118"),
    Chrome117 => ("chrome_117", Chrome, "117"),
    Chrome116 => ("chrome_116", Chrome, "116"),
    Chrome115 => ("chrome_115", Chrome, "115"),
    Chrome114 => ("chrome_114", Chrome, "114"),
    Chrome113 => ("chrome_113", Chrome, "113"),
    Chrome112 => ("chrome_112", Chrome, "112"),
    Chrome111 => ("chrome_111", Chrome, "111"),
    Chrome110 => ("chrome_110", Chrome, "110"),
    Chrome109 => ("chrome_109", Chrome, "109"),
    Chrome108 => ("chrome_108", Chrome, "108"),
    Chrome107 => ("chrome_107", Chrome, "107"),
    Chrome106 => ("chrome_106", Chrome, "106"),
    Chrome105 => ("chrome_105", Chrome, "105"),
    Chrome104 => ("chrome_104", Chrome, "104"),
    Chrome103 => ("chrome_103", Chrome, "103"),
    Chrome102 => ("chrome_102", Chrome, "102"),
    Chrome101 => ("chrome_101", Chrome, "101"),
    Chrome100 => ("chrome_100", Chrome, "100"),
    Chrome99 => ("chrome_99", Chrome, "99"),
    Safari18_0 => ("safari_18_0", Safari, "18.0"),
    Safari17_5 => ("safari_17_5", Safari, "17.5"),
    Safari17_4_1 => ("safari_17_4_1", Safari, "17.4.1"),
    Safari17_2_1 => ("safari_17_2_1", Safari, "17.2.1"),
    Safari17_0 => ("safari_17_0", Safari, "17.0"),
    Safari16_5 => ("safari_16_5", Safari, "16.5"),
    Safari15_6_1 => ("safari_15_6_1", Safari, "15.6.1"),
    Safari15_5 => ("safari_15_5", Safari, "15.5"),
    Safari15_3 => ("safari_15_3", Safari, "15.3"),
    Safari15_0 => ("safari_15_0", Safari, "15.0"),
    Safari14_1_2 => ("safari_14_1_2", Safari, "14.1.2"),
    Safari14_0_3 => ("safari_14_0_3", Safari, "14.0.3"),
    Safari13_1_3 => ("safari_13_1_3", Safari, "13.1.3"),
    Safari13_0_5 => ("safari_13_0_5", Safari, "13.0.5"),
    Safari12_1_2 => ("safari_12_1_2", Safari, "12.1.2"),
    Safari12_0 => ("safari_12_0", Safari, "12.0"),
    SafariIpad18_0 => ("safari_ipad_18_0", SafariIpad, "18.0"),
    SafariIpad17_5 => ("safari_ipad_17_5", SafariIpad, "17.5"),
    SafariIpad17_4_1 => ("safari_ipad_17_4_1", SafariIpad, "17.4.1"),
    SafariIpad17_2_1 => ("safari_ipad_17_2_1", SafariIpad, "17.2.1"),
    SafariIpad17_0 => ("safari_ipad_17_0", SafariIpad, "17.0"),
    SafariIpad16_5 => ("safari_ipad_16_5", SafariIpad, "16.5"),
    SafariIpad15_6_1 => ("safari_ipad_15_6_1", SafariIpad, "15.6.1"),
    SafariIpad15_5 => ("safari_ipad_15_5", SafariIpad, "15.5"),
    SafariIpad15_3 => ("safari_ipad_15_3", SafariIpad, "15.3"),
    SafariIpad15_0 => ("safari_ipad_15_0", SafariIpad, "15.0"),
    SafariIphone18_0 => ("safari_iphone_18_0", SafariIphone, "18.0"),
    SafariIphone17_5 => ("safari_iphone_17_5", SafariIphone, "17.5"),
    SafariIphone17_4_1 => ("safari_iphone_17_4_1", SafariIphone, "17.4.1"),
    SafariIphone17_2_1 => ("safari_iphone_17_2_1", SafariIphone, "17.2.1"),
    SafariIphone17_0 => ("safari_iphone_17_0", SafariIphone, "17.0"),
    SafariIphone16_5 => ("safari_iphone_16_5", SafariIphone, "16.5"),
    SafariIphone15_6_1 => ("safari_iphone_15_6_1", SafariIphone, "15.6.1"),
    SafariIphone15_5 => ("safari_iphone_15_5", SafariIphone, "15.5"),
    SafariIphone15_3 => ("safari_iphone_15_3", SafariIphone, "15.3"),
    SafariIphone15_0 => ("safari_iphone_15_0", SafariIphone, "15.0"),
    Edge131 => ("edge_131", Edge, "131"),
    Edge130 => ("edge_130", Edge, "130"),
    Edge129 => ("edge_129", Edge, "129"),
    Edge128 => ("edge_128", Edge, "128"),
    Edge127 => ("edge_127", Edge, "127"),
    Edge126 => ("edge_126", Edge, "126"),
    Edge125 => ("edge_125", Edge, "125"),
    Edge124 => ("edge_124", Edge, "124"),
    Edge123 => ("edge_123", Edge, "123"),
    Edge122 => ("edge_122", Edge, "122"),
    Edge121 => ("edge_121", Edge, "121"),
    Edge120 => ("edge_120", Edge, "120"),
    Edge119 => ("edge_119", Edge, "119"),
    Edge118 => ("edge_118", Edge, "118"),
    Edge117 => ("edge_117", Edge, "117"),
    Edge116 => ("edge_116", Edge, "116"),
    Edge115 => ("edge_115", Edge, "115"),
    Edge114 => ("edge_114", Edge, "114"),
    Edge113 => ("edge_113", Edge, "113"),
    Edge112 => ("edge_112", Edge, "112"),
    Edge111 => ("edge_111", Edge, "111"),
    Edge110 => ("edge_110", Edge, "110"),
    Edge109 => ("edge_109", Edge, "109"),
    Edge108 => ("edge_108", Edge, "108"),
    Edge107 => ("edge_107", Edge, "107"),
    Edge106 => ("edge_106", Edge, "106"),
    Edge105 => ("edge_105", Edge, "105"),
    Edge104 => ("edge_104", Edge, "104"),
    Edge103 => ("edge_103", Edge, "103"),
    Edge102 => ("edge_102", Edge, "102"),
    Edge101 => ("edge_101", Edge, "101"),
    Edge100 => ("edge_100", Edge, "100"),
    Edge99 => ("edge_99", Edge, "99"),
    Firefox133 => ("firefox_133", Firefox, "133"),
    Firefox132 => ("firefox_132", Firefox, "132"),
    Firefox131 => ("firefox_131", Firefox, "131"),
    Firefox130 => ("firefox_130", Firefox, "130"),
    Firefox129 => ("firefox_129", Firefox, "129"),
    Firefox128 => ("firefox_128", Firefox, "128"),
    Firefox127 => ("firefox_127", Firefox, "127"),
    Firefox126 => ("firefox_126", Firefox, "126"),
    Firefox125 => ("firefox_125", Firefox, "125"),
    Firefox124 => ("firefox_124", Firefox, "124"),
    Firefox123 => ("firefox_123", Firefox, "123"),
    Firefox122 => ("firefox_122", Firefox, "122"),
    Firefox121 => ("firefox_121", Firefox, "121"),
    Firefox120 => ("firefox_120", Firefox, "120"),
    Firefox119 => ("firefox_119", Firefox, "119"),
    Firefox118 => ("firefox_118", Firefox, "118"),
    Firefox117 => ("firefox_117", Firefox, "117"),
    Firefox116 => ("firefox_116", Firefox, "116"),
    Firefox115 => ("firefox_115", Firefox, "115"),
    Firefox114 => ("firefox_114", Firefox, "114"),
    Firefox113 => ("firefox_113", Firefox, "113"),
    Firefox112 => ("firefox_112", Firefox, "112"),
    Firefox111 => ("firefox_111", Firefox, "111"),
    Firefox110 => ("firefox_110", Firefox, "110"),
    Firefox109 => ("firefox_109", Firefox, "109"),
    Firefox108 => ("firefox_108", Firefox, "108"),
    Firefox107 => ("firefox_107", Firefox, "107"),
    Firefox106 => ("firefox_106", Firefox, "106"),
    Firefox105 => ("firefox_105", Firefox, "105"),
    Firefox104 => ("firefox_104", Firefox, "104"),
    Firefox103 => ("firefox_103", Firefox, "103"),
    Firefox102 => ("firefox_102", Firefox, "102"),
    Firefox101 => ("firefox_101", Firefox, "101"),
    Firefox100 => ("firefox_100", Firefox, "100"),
    Firefox99 => ("firefox_99", Firefox, "99"),
    OkHttp5_0_0 => ("okhttp_5_0_0", OkHttp, "5.0.0"),
    OkHttp4_12_0 => ("okhttp_4_12_0", OkHttp, "4.12.0"),
    OkHttp4_11_0 => ("okhttp_4_11_0", OkHttp, "4.11.0"),
    OkHttp4_10_0 => ("okhttp_4_10_0", OkHttp, "4.10.0"),
    OkHttp4_9_3 => ("okhttp_4_9_3", OkHttp, "4.9.3"),
    OkHttp3_14_9 => ("okhttp_3_14_9", OkHttp, "3.14.9"),
}

impl Default for Browser {
    fn default() -> Self {
        Browser::Chrome131
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported operating systems.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ImpersonateOs {
    /// Windows 10/11.
    #[default]
    Windows,
    /// macOS.
    MacOs,
    /// Desktop Linux.
    Linux,
    /// Android.
    Android,
    /// iOS.
    Ios,
}

impl ImpersonateOs {
    /// Every supported OS.
    pub const ALL: &'static [ImpersonateOs] = &[
        ImpersonateOs::Windows,
        ImpersonateOs::MacOs,
        ImpersonateOs::Linux,
        ImpersonateOs::Android,
        ImpersonateOs::Ios,
    ];

    /// Wire identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            ImpersonateOs::Windows => "windows",
            ImpersonateOs::MacOs => "macos",
            ImpersonateOs::Linux => "linux",
            ImpersonateOs::Android => "android",
            ImpersonateOs::Ios => "ios",
        }
    }

    fn is_mobile(self) -> bool {
        matches!(self, ImpersonateOs::Android | ImpersonateOs::Ios)
    }

    /// Value of the `sec-ch-ua-platform` client hint.
    fn client_hint_platform(self) -> &'static str {
        match self {
            ImpersonateOs::Windows => "\"Windows\"",
            ImpersonateOs::MacOs => "\"macOS\"",
            ImpersonateOs::Linux => "\"Linux\"",
            ImpersonateOs::Android => "\"Android\"",
            ImpersonateOs::Ios => "\"iOS\"",
        }
    }
}

impl FromStr for ImpersonateOs {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "windows" => Ok(ImpersonateOs::Windows),
            "macos" => Ok(ImpersonateOs::MacOs),
            "linux" => Ok(ImpersonateOs::Linux),
            "android" => Ok(ImpersonateOs::Android),
            "ios" => Ok(ImpersonateOs::Ios),
            other => Err(Error::UnsupportedImpersonation {
                kind: "os",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ImpersonateOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved impersonation profile handed to the executor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Impersonation {
    browser: Browser,
    os: ImpersonateOs,
}

/// Resolve identifier strings into a profile.
///
/// The browser is checked first, so a request naming two bad identifiers
/// reports the browser.
pub fn select(browser: &str, os: &str) -> Result<Impersonation> {
    let browser = browser.parse::<Browser>()?;
    let os = os.parse::<ImpersonateOs>()?;
    Ok(Impersonation::new(browser, os))
}

const CHROMIUM_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";
const GECKO_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const WEBKIT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

impl Impersonation {
    /// Create a profile from already-parsed identifiers.
    pub fn new(browser: Browser, os: ImpersonateOs) -> Self {
        Self { browser, os }
    }

    /// Impersonated browser.
    pub fn browser(&self) -> Browser {
        self.browser
    }

    /// Impersonated OS.
    pub fn os(&self) -> ImpersonateOs {
        self.os
    }

    fn major(&self) -> &'static str {
        let version = self.browser.version();
        version.split('.').next().unwrap_or(version)
    }

    /// User-Agent string for this profile.
    ///
    /// Safari variants and OkHttp carry their own platform; the requested
    /// OS only shapes Chrome, Edge and Firefox.
    pub fn user_agent(&self) -> String {
        let major = self.major();
        let version = self.browser.version();
        match self.browser.family() {
            BrowserFamily::Chrome => match self.os {
                ImpersonateOs::Ios => format!(
                    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) CriOS/{major}.0.0.0 Mobile/15E148 Safari/604.1"
                ),
                ImpersonateOs::Android => format!(
                    "Mozilla/5.0 (Linux; Android 10; K) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{major}.0.0.0 Mobile Safari/537.36"
                ),
                os => format!(
                    "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{major}.0.0.0 Safari/537.36",
                    desktop_platform(os)
                ),
            },
            BrowserFamily::Edge => match self.os {
                ImpersonateOs::Ios => format!(
                    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) EdgiOS/{major}.0.0.0 Mobile/15E148 Safari/605.1.15"
                ),
                ImpersonateOs::Android => format!(
                    "Mozilla/5.0 (Linux; Android 10; K) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{major}.0.0.0 Mobile Safari/537.36 EdgA/{major}.0.0.0"
                ),
                os => format!(
                    "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{major}.0.0.0 Safari/537.36 Edg/{major}.0.0.0",
                    desktop_platform(os)
                ),
            },
            BrowserFamily::Firefox => match self.os {
                ImpersonateOs::Windows => format!(
                    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:{major}.0) Gecko/20100101 Firefox/{major}.0"
                ),
                ImpersonateOs::MacOs => format!(
                    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:{major}.0) Gecko/20100101 Firefox/{major}.0"
                ),
                ImpersonateOs::Linux => format!(
                    "Mozilla/5.0 (X11; Linux x86_64; rv:{major}.0) Gecko/20100101 Firefox/{major}.0"
                ),
                ImpersonateOs::Android => format!(
                    "Mozilla/5.0 (Android 13; Mobile; rv:{major}.0) Gecko/{major}.0 Firefox/{major}.0"
                ),
                ImpersonateOs::Ios => format!(
                    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) FxiOS/{major}.0 Mobile/15E148 Safari/605.1.15"
                ),
            },
            BrowserFamily::Safari => format!(
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/{version} Safari/605.1.15"
            ),
            BrowserFamily::SafariIpad => format!(
                "Mozilla/5.0 (iPad; CPU OS {} like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/{version} Mobile/15E148 Safari/604.1",
                version.replace('.', "_")
            ),
            BrowserFamily::SafariIphone => format!(
                "Mozilla/5.0 (iPhone; CPU iPhone OS {} like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/{version} Mobile/15E148 Safari/604.1",
                version.replace('.', "_")
            ),
            BrowserFamily::OkHttp => format!("okhttp/{version}"),
        }
    }

    /// Default headers in the order the impersonated client sends them.
    ///
    /// Names are lowercase. Caller headers override these by
    /// case-insensitive name.
    pub fn default_headers(&self) -> Vec<(String, String)> {
        let major = self.major();
        let mut headers: Vec<(&str, String)> = Vec::with_capacity(12);

        match self.browser.family() {
            BrowserFamily::Chrome | BrowserFamily::Edge if self.os != ImpersonateOs::Ios => {
                let brand = if self.browser.family() == BrowserFamily::Edge {
                    "Microsoft Edge"
                } else {
                    "Google Chrome"
                };
                headers.push((
                    "sec-ch-ua",
                    format!(
                        "\"{brand}\";v=\"{major}\", \"Chromium\";v=\"{major}\", \"Not_A Brand\";v=\"24\""
                    ),
                ));
                headers.push((
                    "sec-ch-ua-mobile",
                    if self.os.is_mobile() { "?1" } else { "?0" }.to_string(),
                ));
                headers.push((
                    "sec-ch-ua-platform",
                    self.os.client_hint_platform().to_string(),
                ));
                headers.push(("upgrade-insecure-requests", "1".into()));
                headers.push(("user-agent", self.user_agent()));
                headers.push(("accept", CHROMIUM_ACCEPT.into()));
                push_fetch_metadata(&mut headers);
                headers.push(("accept-language", "en-US,en;q=0.9".into()));
                headers.push(("priority", "u=0, i".into()));
            }
            BrowserFamily::Firefox => {
                headers.push(("user-agent", self.user_agent()));
                headers.push(("accept", GECKO_ACCEPT.into()));
                headers.push(("accept-language", "en-US,en;q=0.5".into()));
                headers.push(("upgrade-insecure-requests", "1".into()));
                push_fetch_metadata(&mut headers);
                headers.push(("priority", "u=0, i".into()));
            }
            BrowserFamily::OkHttp => {
                headers.push(("accept", "*/*".into()));
                headers.push(("user-agent", self.user_agent()));
            }
            // WebKit: desktop/mobile Safari and every iOS browser.
            _ => {
                push_fetch_metadata(&mut headers);
                headers.push(("accept", WEBKIT_ACCEPT.into()));
                headers.push(("user-agent", self.user_agent()));
                headers.push(("accept-language", "en-US,en;q=0.9".into()));
                headers.push(("priority", "u=0, i".into()));
            }
        }

        headers
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }
}

fn desktop_platform(os: ImpersonateOs) -> &'static str {
    match os {
        ImpersonateOs::MacOs => "Macintosh; Intel Mac OS X 10_15_7",
        ImpersonateOs::Linux => "X11; Linux x86_64",
        _ => "Windows NT 10.0; Win64; x64",
    }
}

fn push_fetch_metadata(headers: &mut Vec<(&str, String)>) {
    headers.push(("sec-fetch-site", "none".into()));
    headers.push(("sec-fetch-mode", "navigate".into()));
    headers.push(("sec-fetch-user", "?1".into()));
    headers.push(("sec-fetch-dest", "document".into()));
}

impl fmt::Display for Impersonation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.browser, self.os)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
        headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn every_identifier_round_trips() {
        assert_eq!(Browser::ALL.len(), 141);
        for browser in Browser::ALL {
            assert_eq!(browser.as_str().parse::<Browser>().unwrap(), *browser);
        }
        for os in ImpersonateOs::ALL {
            assert_eq!(os.as_str().parse::<ImpersonateOs>().unwrap(), *os);
        }
    }

    #[test]
    fn covers_documented_ranges() {
        for id in [
            "chrome_99",
            "chrome_131",
            "firefox_99",
            "firefox_133",
            "safari_12_0",
            "safari_18_0",
            "safari_ipad_18_0",
            "safari_iphone_15_0",
            "edge_99",
            "edge_131",
            "okhttp_3_14_9",
            "okhttp_5_0_0",
        ] {
            assert!(id.parse::<Browser>().is_ok(), "{id} should be supported");
        }
    }

    #[test]
    fn unknown_browser_is_rejected() {
        let err = select("netscape_1", "windows").unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedImpersonation { kind: "browser", ref value } if value == "netscape_1"
        ));
    }

    #[test]
    fn unknown_os_is_rejected() {
        let err = select("chrome_131", "beos").unwrap_err();
        assert!(matches!(err, Error::UnsupportedImpersonation { kind: "os", .. }));
    }

    #[test]
    fn identifiers_are_case_sensitive() {
        assert!(select("Chrome_131", "windows").is_err());
        assert!(select("chrome_131", "Windows").is_err());
    }

    #[test]
    fn chrome_windows_profile() {
        let profile = select("chrome_131", "windows").unwrap();
        assert_eq!(profile, Impersonation::default());

        let headers = profile.default_headers();
        let ua = header(&headers, "user-agent").unwrap();
        assert!(ua.contains("Windows NT 10.0"));
        assert!(ua.contains("Chrome/131.0.0.0"));
        assert_eq!(header(&headers, "sec-ch-ua-platform"), Some("\"Windows\""));
        assert_eq!(header(&headers, "sec-ch-ua-mobile"), Some("?0"));
        assert!(header(&headers, "sec-ch-ua").unwrap().contains("Google Chrome"));
    }

    #[test]
    fn edge_android_is_mobile() {
        let headers = select("edge_120", "android").unwrap().default_headers();
        assert_eq!(header(&headers, "sec-ch-ua-mobile"), Some("?1"));
        assert!(header(&headers, "user-agent").unwrap().contains("EdgA/120"));
        assert!(header(&headers, "sec-ch-ua").unwrap().contains("Microsoft Edge"));
    }

    #[test]
    fn firefox_sends_no_client_hints() {
        let headers = select("firefox_133", "linux").unwrap().default_headers();
        assert!(header(&headers, "sec-ch-ua").is_none());
        assert!(header(&headers, "user-agent")
            .unwrap()
            .contains("rv:133.0) Gecko/20100101 Firefox/133.0"));
    }

    #[test]
    fn safari_device_ignores_requested_os() {
        let profile = select("safari_ipad_17_4_1", "windows").unwrap();
        let ua = profile.user_agent();
        assert!(ua.contains("iPad; CPU OS 17_4_1"));
        assert!(ua.contains("Version/17.4.1"));
    }

    #[test]
    fn okhttp_user_agent() {
        let profile = select("okhttp_4_12_0", "android").unwrap();
        assert_eq!(profile.user_agent(), "okhttp/4.12.0");
    }
}
