//! URL helpers shared by detection and planning.
//!
//! Both callers treat an unparseable URL as a degraded input rather than an
//! error, so every helper here returns an `Option`.

use url::Url;

/// Hostname of `raw`, or `None` if it does not parse or has no host.
pub fn hostname(raw: &str) -> Option<String> {
    Url::parse(raw)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}

/// Path component of `raw`, or `None` if it does not parse as a URL.
pub fn path(raw: &str) -> Option<String> {
    Url::parse(raw).ok().map(|u| u.path().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hostname_of_valid_url() {
        assert_eq!(
            hostname("https://jobs.example.com/apply?x=1").as_deref(),
            Some("jobs.example.com")
        );
    }

    #[test]
    fn hostname_of_garbage_is_none() {
        assert_eq!(hostname("not a url"), None);
        assert_eq!(hostname(""), None);
    }

    #[test]
    fn path_excludes_host_and_query() {
        assert_eq!(
            path("https://login.example.com/account/signup?next=/").as_deref(),
            Some("/account/signup")
        );
        assert_eq!(path("/signup"), None);
    }
}
