//! Posting URL normalization.
//!
//! The normalized URL is the posting's identity key, so two spellings
//! of the same address must normalize identically: surrounding
//! whitespace is trimmed and the scheme and host are lowercased. Path,
//! query and fragment keep their case, since many boards use
//! case-sensitive posting ids.

/// Normalize a posting URL into its identity-key form.
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();

    let Some(scheme_end) = trimmed.find("://") else {
        return trimmed.to_string();
    };

    let scheme = &trimmed[..scheme_end];
    let rest = &trimmed[scheme_end + 3..];

    let host_end = rest
        .find(['/', '?', '#'])
        .unwrap_or(rest.len());
    let host = &rest[..host_end];
    let tail = &rest[host_end..];

    format!("{}://{}{}", scheme.to_lowercase(), host.to_lowercase(), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(
            normalize_url("  https://boards.example.com/j/1  "),
            "https://boards.example.com/j/1"
        );
    }

    #[test]
    fn test_normalize_lowercases_scheme_and_host() {
        assert_eq!(
            normalize_url("HTTPS://Boards.Example.COM/j/1"),
            "https://boards.example.com/j/1"
        );
    }

    #[test]
    fn test_normalize_preserves_path_case() {
        assert_eq!(
            normalize_url("https://boards.example.com/Jobs/AbC123"),
            "https://boards.example.com/Jobs/AbC123"
        );
    }

    #[test]
    fn test_normalize_preserves_query_and_fragment() {
        assert_eq!(
            normalize_url("https://Boards.example.com/search?Q=Rust#Top"),
            "https://boards.example.com/search?Q=Rust#Top"
        );
    }

    #[test]
    fn test_normalize_host_only_url() {
        assert_eq!(
            normalize_url("https://Boards.Example.com"),
            "https://boards.example.com"
        );
    }

    #[test]
    fn test_normalize_host_followed_by_query() {
        assert_eq!(
            normalize_url("https://Example.com?id=9"),
            "https://example.com?id=9"
        );
    }

    #[test]
    fn test_normalize_without_scheme_is_trim_only() {
        assert_eq!(normalize_url("  Boards.example.com/j/1 "), "Boards.example.com/j/1");
    }

    #[test]
    fn test_equivalent_spellings_collide() {
        let a = normalize_url("https://boards.example.com/j/1");
        let b = normalize_url("  HTTPS://BOARDS.EXAMPLE.COM/j/1");
        assert_eq!(a, b);
    }
}
