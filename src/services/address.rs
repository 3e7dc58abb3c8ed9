//! Address context
//!
//! A value object describing the address a sequence run was started from:
//! the base part used to build share links and the raw fragment that carries
//! the slug. Read once per run.

use url::Url;

use crate::storage::Settings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressContext {
    delimiter: char,
    /// origin + path, no query, no trailing slash
    base_url: Option<String>,
    /// Text after the first delimiter, still percent-encoded.
    fragment: String,
}

impl AddressContext {
    pub fn parse(address: &str, delimiter: char) -> Self {
        let address = address.trim();
        let (base, fragment) = match address.split_once(delimiter) {
            Some((base, fragment)) => (base, fragment),
            None => (address, ""),
        };

        let base_url = Url::parse(base).ok().and_then(|url| {
            if !url.has_host() {
                return None;
            }
            let origin = url.origin().ascii_serialization();
            let path = url.path().trim_end_matches('/');
            Some(format!("{}{}", origin, path))
        });

        Self {
            delimiter,
            base_url,
            fragment: fragment.to_string(),
        }
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn has_fragment(&self) -> bool {
        !self.fragment.is_empty()
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Share link for `slug`: custom base from settings when set, otherwise
    /// the detected base of this address.
    pub fn short_url(&self, settings: &Settings, slug: &str) -> Option<String> {
        let base = settings
            .custom_base_url
            .as_deref()
            .or(self.base_url.as_deref())?
            .trim_end_matches('/');

        Some(format!(
            "{}/{}{}",
            base,
            self.delimiter,
            urlencoding::encode(slug)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_fragment() {
        let ctx = AddressContext::parse("https://links.example/app/?utm=x#abc", '#');
        assert_eq!(ctx.fragment(), "abc");
        assert!(ctx.has_fragment());
        assert_eq!(ctx.base_url(), Some("https://links.example/app"));
    }

    #[test]
    fn test_parse_without_fragment() {
        let ctx = AddressContext::parse("https://links.example/", '#');
        assert_eq!(ctx.fragment(), "");
        assert!(!ctx.has_fragment());
        assert_eq!(ctx.base_url(), Some("https://links.example"));
    }

    #[test]
    fn test_empty_fragment_after_delimiter() {
        let ctx = AddressContext::parse("https://links.example/#", '#');
        assert!(!ctx.has_fragment());
    }

    #[test]
    fn test_fragment_keeps_later_delimiters() {
        let ctx = AddressContext::parse("https://links.example/#a#b", '#');
        assert_eq!(ctx.fragment(), "a#b");
    }

    #[test]
    fn test_relative_address_has_no_base() {
        let ctx = AddressContext::parse("#abc", '#');
        assert_eq!(ctx.fragment(), "abc");
        assert_eq!(ctx.base_url(), None);
        assert_eq!(ctx.short_url(&Settings::default(), "abc"), None);
    }

    #[test]
    fn test_short_url_prefers_custom_base() {
        let ctx = AddressContext::parse("https://links.example/app/", '#');
        let settings = Settings {
            custom_base_url: Some("https://s.example".into()),
            ..Default::default()
        };
        assert_eq!(
            ctx.short_url(&settings, "my link").as_deref(),
            Some("https://s.example/#my%20link")
        );
        assert_eq!(
            ctx.short_url(&Settings::default(), "abc").as_deref(),
            Some("https://links.example/app/#abc")
        );
    }
}
