//! Source credibility and publisher classification by domain

use crate::evidence::SourceType;
use url::Url;

/// Credibility assigned to domains that are not in the table
pub const DEFAULT_CREDIBILITY: f64 = 0.5;

/// High-credibility news domains used for the trusted search tier
pub const TRUSTED_NEWS_DOMAINS: &[&str] = &[
    "reuters.com",
    "bbc.com",
    "apnews.com",
    "nytimes.com",
    "theguardian.com",
    "washingtonpost.com",
];

/// Dedicated fact-checking outlets used for the fact-check search tier
pub const FACT_CHECK_DOMAINS: &[&str] = &["snopes.com", "factcheck.org", "politifact.com"];

const FACT_CHECKERS: &[&str] = &["snopes.com", "factcheck.org", "politifact.com", "fullfact.org"];

const GOVERNMENT: &[&str] = &["who.int", "nasa.gov", "cdc.gov", "nih.gov", "un.org"];

const ACADEMIC: &[&str] = &["arxiv.org", "nature.com", "science.org", "scholar.google.com"];

const CREDIBILITY_TABLE: &[(&str, f64)] = &[
    // wire services and broadcasters
    ("reuters.com", 0.95),
    ("apnews.com", 0.95),
    ("bbc.com", 0.90),
    ("bbc.co.uk", 0.90),
    ("npr.org", 0.88),
    ("pbs.org", 0.87),
    ("nytimes.com", 0.85),
    ("theguardian.com", 0.85),
    ("washingtonpost.com", 0.85),
    ("economist.com", 0.85),
    ("aljazeera.com", 0.80),
    ("cnn.com", 0.75),
    // fact checkers
    ("snopes.com", 0.90),
    ("factcheck.org", 0.92),
    ("politifact.com", 0.90),
    ("fullfact.org", 0.90),
    // government and intergovernmental
    ("nasa.gov", 0.98),
    ("who.int", 0.95),
    ("cdc.gov", 0.95),
    ("nih.gov", 0.95),
    ("nist.gov", 0.95),
    ("noaa.gov", 0.95),
    ("un.org", 0.90),
    ("ipcc.ch", 0.95),
    // academic and reference
    ("nature.com", 0.95),
    ("science.org", 0.95),
    ("arxiv.org", 0.80),
    ("britannica.com", 0.88),
    ("wikipedia.org", 0.70),
    ("minecraft.net", 0.80),
    // known low-quality
    ("infowars.com", 0.10),
    ("naturalnews.com", 0.10),
    ("beforeitsnews.com", 0.10),
];

/// Extract the host of a URL, lowercased and without a leading `www.`
///
/// Returns an empty string when no host can be found. Scheme-less input such
/// as `snopes.com/fact-check` is parsed as if it were `http://`.
///
/// # Examples
///
/// ```
/// use claimcheck_domain::credibility::extract_domain;
///
/// assert_eq!(extract_domain("https://www.NASA.gov/solar-system/earth/"), "nasa.gov");
/// assert_eq!(extract_domain("not a url"), "");
/// ```
pub fn extract_domain(url: &str) -> String {
    let url = url.trim();
    let parsed = Url::parse(url)
        .ok()
        .filter(|parsed| parsed.host_str().is_some())
        .or_else(|| {
            if url.contains("://") {
                None
            } else {
                Url::parse(&format!("http://{}", url)).ok()
            }
        });

    let Some(host) = parsed.as_ref().and_then(Url::host_str) else {
        return String::new();
    };
    let host = host.trim_end_matches('.').to_lowercase();
    if !host.contains('.') {
        return String::new();
    }

    match host.strip_prefix("www.") {
        Some(stripped) => stripped.to_string(),
        None => host,
    }
}

/// Look up credibility for a domain, falling back to parent domains
///
/// `climate.nasa.gov` resolves to the `nasa.gov` entry. Unknown domains
/// (and the empty domain) get [`DEFAULT_CREDIBILITY`].
pub fn credibility_for(domain: &str) -> f64 {
    let domain = domain.trim().to_lowercase();
    for candidate in parent_chain(&domain) {
        if let Some((_, score)) = CREDIBILITY_TABLE.iter().find(|(d, _)| *d == candidate) {
            return *score;
        }
    }
    DEFAULT_CREDIBILITY
}

/// Infer the publisher category of a domain
pub fn infer_source_type(domain: &str) -> SourceType {
    let domain = domain.trim().to_lowercase();
    if domain.is_empty() {
        return SourceType::Unknown;
    }

    if in_list(&domain, FACT_CHECKERS) {
        SourceType::FactChecker
    } else if in_list(&domain, GOVERNMENT)
        || domain.ends_with(".gov")
        || domain.ends_with(".gov.uk")
    {
        SourceType::Government
    } else if in_list(&domain, ACADEMIC) || domain.ends_with(".edu") {
        SourceType::Academic
    } else if credibility_for(&domain) >= 0.7 {
        SourceType::News
    } else {
        SourceType::Unknown
    }
}

fn in_list(domain: &str, list: &[&str]) -> bool {
    parent_chain(domain).any(|d| list.iter().any(|entry| *entry == d))
}

/// The domain itself, then each parent that still has at least two labels
fn parent_chain(domain: &str) -> impl Iterator<Item = &str> {
    let mut next = if domain.is_empty() { None } else { Some(domain) };
    std::iter::from_fn(move || {
        let current = next?;
        next = current
            .split_once('.')
            .map(|(_, parent)| parent)
            .filter(|parent| parent.contains('.'));
        Some(current)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_extract_domain() {
        assert_eq!(extract_domain("https://www.reuters.com/world/x?y=1"), "reuters.com");
        assert_eq!(extract_domain("http://user@Climate.NASA.gov:8080/a"), "climate.nasa.gov");
        assert_eq!(extract_domain("snopes.com/fact-check/flat-earth"), "snopes.com");
        assert_eq!(extract_domain(""), "");
        assert_eq!(extract_domain("localhost"), "");
    }

    #[test]
    fn test_extract_domain_follows_url_parsing() {
        assert_eq!(extract_domain("https://www.nasa.gov\\solar-system"), "nasa.gov");
        assert_eq!(credibility_for(&extract_domain("https://www.nasa.gov\\solar-system")), 0.98);
        assert_eq!(extract_domain("https://nasa.gov.:443/x"), "nasa.gov");
        assert_eq!(extract_domain("https://www.snopes.com#top"), "snopes.com");
        assert_eq!(extract_domain("snopes.com:443/fact-check"), "snopes.com");
        assert_eq!(extract_domain("https:///nowhere"), "");
        assert_eq!(extract_domain("ftp://[::1]/file"), "");
    }

    proptest! {
        #[test]
        fn prop_extract_domain_recovers_host(
            label in "[a-v][a-z0-9]{0,9}",
            tld in "(com|org|gov|co\\.uk)",
            path in "[a-zA-Z0-9/_.-]{0,20}",
            www in any::<bool>(),
        ) {
            let host = format!("{}.{}", label, tld);
            let prefix = if www { "www." } else { "" };
            let url = format!("https://{}{}/{}", prefix, host.to_uppercase(), path);
            prop_assert_eq!(extract_domain(&url), host);
        }

        #[test]
        fn prop_extract_domain_never_panics(input in "\\PC{0,40}") {
            let domain = extract_domain(&input);
            prop_assert_eq!(domain.clone(), domain.to_lowercase());
            prop_assert!(!domain.contains('/') && !domain.chars().any(char::is_whitespace));
        }
    }

    #[test]
    fn test_credibility_lookup_with_subdomain_fallback() {
        assert_eq!(credibility_for("nasa.gov"), 0.98);
        assert_eq!(credibility_for("climate.nasa.gov"), 0.98);
        assert_eq!(credibility_for("news.bbc.co.uk"), 0.90);
        assert_eq!(credibility_for("example.org"), DEFAULT_CREDIBILITY);
        assert_eq!(credibility_for(""), DEFAULT_CREDIBILITY);
    }

    #[test]
    fn test_source_type_inference() {
        assert_eq!(infer_source_type("snopes.com"), SourceType::FactChecker);
        assert_eq!(infer_source_type("nasa.gov"), SourceType::Government);
        assert_eq!(infer_source_type("energy.gov"), SourceType::Government);
        assert_eq!(infer_source_type("ons.gov.uk"), SourceType::Government);
        assert_eq!(infer_source_type("mit.edu"), SourceType::Academic);
        assert_eq!(infer_source_type("arxiv.org"), SourceType::Academic);
        assert_eq!(infer_source_type("reuters.com"), SourceType::News);
        assert_eq!(infer_source_type("infowars.com"), SourceType::Unknown);
        assert_eq!(infer_source_type(""), SourceType::Unknown);
    }

    #[test]
    fn test_search_tiers_are_in_table() {
        for d in TRUSTED_NEWS_DOMAINS.iter().chain(FACT_CHECK_DOMAINS) {
            assert!(credibility_for(d) > 0.8, "{} should be high credibility", d);
        }
    }
}
