//! Wallet extension install links
//!
//! Users without an external wallet are sent to the extension store of their
//! browser. Unknown browsers get the wallet's own download page.

use std::fmt;
use std::str::FromStr;

use tracing::info;

use crate::core::error::LinkError;

const CHROME_STORE_URL: &str =
    "https://chrome.google.com/webstore/detail/metamask/nkbihfbeogaeaoehlefnkodbefgpgknn";
const FIREFOX_ADDONS_URL: &str = "https://addons.mozilla.org/firefox/addon/ether-metamask/";
const OPERA_ADDONS_URL: &str = "https://addons.opera.com/extensions/details/metamask/";
const FALLBACK_URL: &str = "https://metamask.io/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Browser {
    Chrome,
    Firefox,
    Opera,
    #[default]
    Other,
}

impl Browser {
    /// Download page of the wallet extension for this browser
    pub fn install_url(self) -> &'static str {
        match self {
            Browser::Chrome => CHROME_STORE_URL,
            Browser::Firefox => FIREFOX_ADDONS_URL,
            Browser::Opera => OPERA_ADDONS_URL,
            Browser::Other => FALLBACK_URL,
        }
    }
}

impl FromStr for Browser {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chrome" | "chromium" => Ok(Browser::Chrome),
            "firefox" => Ok(Browser::Firefox),
            "opera" => Ok(Browser::Opera),
            "other" | "" => Ok(Browser::Other),
            other => Err(format!("Unknown browser '{}'", other)),
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Browser::Chrome => "chrome",
            Browser::Firefox => "firefox",
            Browser::Opera => "opera",
            Browser::Other => "other",
        };
        f.write_str(name)
    }
}

/// Open the install page for `browser` in the system browser.
///
/// Returns the URL that was opened.
pub fn open_install_page(browser: Browser) -> Result<&'static str, LinkError> {
    let url = browser.install_url();
    open::that(url)
        .map_err(|e| LinkError::ProviderUnavailable(format!("Failed to open {}: {}", url, e)))?;
    info!(browser = %browser, url = url, "Opened wallet install page");
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_browser_has_its_own_url() {
        assert!(Browser::Chrome.install_url().contains("chrome.google.com"));
        assert!(Browser::Firefox.install_url().contains("addons.mozilla.org"));
        assert!(Browser::Opera.install_url().contains("addons.opera.com"));
        assert_eq!(Browser::Other.install_url(), "https://metamask.io/");
        assert_ne!(Browser::Chrome.install_url(), Browser::Firefox.install_url());
    }

    #[test]
    fn test_parse_browser() {
        assert_eq!("Firefox".parse::<Browser>().unwrap(), Browser::Firefox);
        assert_eq!("chromium".parse::<Browser>().unwrap(), Browser::Chrome);
        assert_eq!("".parse::<Browser>().unwrap(), Browser::Other);
        assert!("netscape".parse::<Browser>().is_err());
    }
}
