use std::fmt;
use std::str::FromStr;

/// A path that skips authentication
///
/// Rules ending in `*` match any path starting with the rest of the rule.
/// Every other rule must match exactly. Request paths get a trailing slash
/// before matching, so `/api/v1/status/` also covers `/api/v1/status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExcludedPath {
    Exact(String),
    Prefix(String),
}

impl ExcludedPath {
    pub fn matches(&self, normalized_path: &str) -> bool {
        match self {
            Self::Exact(rule) => normalized_path == rule,
            Self::Prefix(prefix) => normalized_path.starts_with(prefix.as_str()),
        }
    }

    /// Parse a list of rule strings
    pub fn parse_all<I, S>(rules: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        rules.into_iter().map(|r| Self::from(r.as_ref())).collect()
    }
}

impl From<&str> for ExcludedPath {
    fn from(rule: &str) -> Self {
        match rule.strip_suffix('*') {
            Some(prefix) => Self::Prefix(prefix.to_string()),
            None => Self::Exact(rule.to_string()),
        }
    }
}

impl FromStr for ExcludedPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for ExcludedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(rule) => f.write_str(rule),
            Self::Prefix(prefix) => write!(f, "{prefix}*"),
        }
    }
}

/// Whether `path` needs an authenticated principal
///
/// Only a path matching one of `excluded_paths` is let through. A missing
/// path or an empty rule list always requires auth.
pub fn require_auth(path: Option<&str>, excluded_paths: &[ExcludedPath]) -> bool {
    let Some(path) = path else {
        return true;
    };
    if excluded_paths.is_empty() {
        return true;
    }

    let normalized = if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{path}/")
    };

    !excluded_paths.iter().any(|rule| rule.matches(&normalized))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn api_rules() -> Vec<ExcludedPath> {
        ExcludedPath::parse_all([
            "/api/v1/status/",
            "/api/v1/unauthorized/",
            "/api/v1/forbidden/",
        ])
    }

    #[test]
    fn test_parse_rules() {
        assert_eq!(
            ExcludedPath::from("/api/v1/admin*"),
            ExcludedPath::Prefix("/api/v1/admin".to_string())
        );
        assert_eq!(
            "/api/v1/status/".parse::<ExcludedPath>(),
            Ok(ExcludedPath::Exact("/api/v1/status/".to_string()))
        );
        assert_eq!(ExcludedPath::from("/a*").to_string(), "/a*");
    }

    #[test]
    fn test_missing_path_requires_auth() {
        assert!(require_auth(None, &api_rules()));
        assert!(require_auth(None, &[]));
    }

    #[test]
    fn test_trailing_slash_normalization() {
        let rules = api_rules();
        assert!(!require_auth(Some("/api/v1/status"), &rules));
        assert!(!require_auth(Some("/api/v1/status/"), &rules));
        assert!(require_auth(Some("/api/v1/users"), &rules));
    }

    #[test]
    fn test_matching_is_case_sensitive_and_exact() {
        let rules = api_rules();
        assert!(require_auth(Some("/api/v1/STATUS"), &rules));
        assert!(require_auth(Some("/api/v1/status/extra"), &rules));
        assert!(require_auth(Some("/api/v1/stat"), &rules));
    }

    #[test]
    fn test_wildcard_rule() {
        let rules = ExcludedPath::parse_all(["/api/v1/admin*"]);

        assert!(!require_auth(Some("/api/v1/admin/users"), &rules));
        assert!(!require_auth(Some("/api/v1/admin"), &rules));
        assert!(!require_auth(Some("/api/v1/administrators"), &rules));
        assert!(require_auth(Some("/api/v1/adm"), &rules));
    }

    #[test]
    fn test_star_matches_literally_elsewhere() {
        // Only a trailing star is a wildcard
        let rules = ExcludedPath::parse_all(["/a*/b/"]);
        assert!(require_auth(Some("/ax/b"), &rules));
        assert!(!require_auth(Some("/a*/b"), &rules));
    }

    proptest! {
        #[test]
        fn prop_no_rules_always_requires_auth(path in ".*") {
            prop_assert!(require_auth(Some(path.as_str()), &[]));
        }

        #[test]
        fn prop_exact_rule_excludes_its_own_path(segment in "[a-z]{1,12}") {
            let bare = format!("/{segment}");
            let slashed = format!("/{segment}/");
            let rules = ExcludedPath::parse_all([slashed.as_str()]);
            prop_assert!(!require_auth(Some(bare.as_str()), &rules));
            prop_assert!(!require_auth(Some(slashed.as_str()), &rules));
        }

        #[test]
        fn prop_prefix_rule_excludes_extensions(base in "/[a-z]{1,8}", rest in "[a-z/]{0,12}") {
            let rules = ExcludedPath::parse_all([format!("{base}*")]);
            let path = format!("{base}{rest}");
            prop_assert!(!require_auth(Some(path.as_str()), &rules));
        }
    }
}
