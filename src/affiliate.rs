// src/affiliate.rs

//! Affiliate tracking for outbound marketplace links.

use crate::config::StoreConfig;

/// Rewrites marketplace links so they carry the store's tracking identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffiliateNormalizer {
    domain: String,
    param: String,
    tracking_id: String,
}

impl AffiliateNormalizer {
    pub fn new(
        domain: impl Into<String>,
        param: impl Into<String>,
        tracking_id: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into().to_lowercase(),
            param: param.into(),
            tracking_id: tracking_id.into(),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(
            &config.marketplace_domain,
            &config.tracking_param,
            &config.tracking_id,
        )
    }

    pub fn tracking_id(&self) -> &str {
        &self.tracking_id
    }

    /// Whether the link points at the marketplace or one of its subdomains.
    pub fn is_marketplace(&self, link: &str) -> bool {
        host(link).is_some_and(|host| {
            host == self.domain
                || host
                    .strip_suffix(&self.domain)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }

    /// Ensure a marketplace link carries the tracking identifier.
    ///
    /// Other links are returned unchanged. The first existing tracking
    /// parameter is rewritten in place; otherwise one is appended. Every
    /// other query pair and the fragment are kept as written.
    pub fn normalize(&self, link: &str) -> String {
        if !self.is_marketplace(link) {
            return link.to_string();
        }

        let (before_fragment, fragment) = match link.split_once('#') {
            Some((head, tail)) => (head, Some(tail)),
            None => (link, None),
        };

        let tracked = format!("{}={}", self.param, self.tracking_id);
        let mut result = match before_fragment.split_once('?') {
            Some((base, query)) => {
                let mut pairs: Vec<&str> = query.split('&').collect();
                let existing = pairs
                    .iter()
                    .position(|pair| pair.split('=').next() == Some(self.param.as_str()));

                match existing {
                    Some(index) => {
                        pairs[index] = &tracked;
                        format!("{base}?{}", pairs.join("&"))
                    }
                    None if query.is_empty() => format!("{base}?{tracked}"),
                    None if query.ends_with('&') => format!("{base}?{query}{tracked}"),
                    None => format!("{base}?{query}&{tracked}"),
                }
            }
            None => format!("{before_fragment}?{tracked}"),
        };

        if let Some(fragment) = fragment {
            result.push('#');
            result.push_str(fragment);
        }
        result
    }
}

/// Lowercased host of a link.
///
/// Scheme-relative (`//host/x`) and scheme-less (`host/x`) links are read as
/// https. Root-relative paths have no host.
fn host(link: &str) -> Option<String> {
    let link = link.trim();
    let absolute = if link.starts_with("//") {
        format!("https:{link}")
    } else if link.starts_with('/') || has_scheme(link) {
        link.to_string()
    } else {
        format!("https://{link}")
    };

    url::Url::parse(&absolute)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
}

fn has_scheme(link: &str) -> bool {
    link.split('/').next().is_some_and(|head| head.contains(':'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> AffiliateNormalizer {
        AffiliateNormalizer::new("amazon.com", "tag", "abc-20")
    }

    #[test]
    fn test_replaces_existing_tag() {
        assert_eq!(
            normalizer().normalize("https://amazon.com/x?tag=old-20"),
            "https://amazon.com/x?tag=abc-20"
        );
    }

    #[test]
    fn test_appends_with_question_mark() {
        assert_eq!(
            normalizer().normalize("https://amazon.com/x"),
            "https://amazon.com/x?tag=abc-20"
        );
    }

    #[test]
    fn test_appends_with_ampersand() {
        assert_eq!(
            normalizer().normalize("https://www.amazon.com/dp/123?ref=sr_1&qid=9"),
            "https://www.amazon.com/dp/123?ref=sr_1&qid=9&tag=abc-20"
        );
    }

    #[test]
    fn test_keeps_other_params_and_fragment() {
        assert_eq!(
            normalizer().normalize("https://amazon.com/dp/1?a=%20b&tag=old&c=d#reviews"),
            "https://amazon.com/dp/1?a=%20b&tag=abc-20&c=d#reviews"
        );
        assert_eq!(
            normalizer().normalize("https://amazon.com/dp/1#top"),
            "https://amazon.com/dp/1?tag=abc-20#top"
        );
    }

    #[test]
    fn test_only_first_tag_rewritten() {
        assert_eq!(
            normalizer().normalize("https://amazon.com/x?tag=a&tag=b"),
            "https://amazon.com/x?tag=abc-20&tag=b"
        );
    }

    #[test]
    fn test_similar_param_name_not_touched() {
        assert_eq!(
            normalizer().normalize("https://amazon.com/x?hashtag=1"),
            "https://amazon.com/x?hashtag=1&tag=abc-20"
        );
    }

    #[test]
    fn test_empty_and_dangling_query() {
        assert_eq!(
            normalizer().normalize("https://amazon.com/x?"),
            "https://amazon.com/x?tag=abc-20"
        );
        assert_eq!(
            normalizer().normalize("https://amazon.com/x?a=1&"),
            "https://amazon.com/x?a=1&tag=abc-20"
        );
    }

    #[test]
    fn test_scheme_less_links_tagged() {
        let n = normalizer();
        assert_eq!(
            n.normalize("www.amazon.com/dp/1"),
            "www.amazon.com/dp/1?tag=abc-20"
        );
        assert_eq!(
            n.normalize("//amazon.com/x?tag=old"),
            "//amazon.com/x?tag=abc-20"
        );
        assert_eq!(n.normalize("amazon.com"), "amazon.com?tag=abc-20");
        for link in ["mailto:orders@amazon.com", "www.example.org/amazon.com"] {
            assert_eq!(n.normalize(link), link);
        }
    }

    #[test]
    fn test_non_marketplace_unchanged() {
        let n = normalizer();
        for link in [
            "https://bookshop.org/x?tag=old",
            "https://notamazon.com/x",
            "https://amazon.com.example.net/x",
            "/relative/amazon.com",
            "",
            "not a url",
        ] {
            assert_eq!(n.normalize(link), link);
        }
    }

    #[test]
    fn test_idempotent() {
        let n = normalizer();
        for link in [
            "https://amazon.com/x",
            "https://amazon.com/x?tag=old-20",
            "https://smile.amazon.com/x?a=1#f",
            "https://amazon.com/x?tag=",
            "https://amazon.com/x?",
            "https://example.org/y",
            "www.amazon.com/dp/1",
            "//amazon.com/x#top",
        ] {
            let once = n.normalize(link);
            assert_eq!(n.normalize(&once), once, "not idempotent for {link}");
        }
    }

    #[test]
    fn test_from_config() {
        let n = AffiliateNormalizer::from_config(&StoreConfig::default());
        assert_eq!(n.tracking_id(), "youraffiliateID-20");
        assert!(n.is_marketplace("https://AMAZON.com/x"));
    }
}
