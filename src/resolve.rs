/// Schemes that mark an address as already absolute.
///
/// Matching is a plain prefix check, so `https` and `rtmps` are covered as well.
const ABSOLUTE_PREFIXES: [&str; 2] = ["http", "rtmp"];

/// Whether `address` can be used as-is without a prefix
#[must_use]
pub fn is_absolute(address: &str) -> bool {
    ABSOLUTE_PREFIXES.iter().any(|p| address.starts_with(p))
}

/// Prepends `prefix` to relative addresses, leaving absolute ones untouched
#[must_use]
pub fn resolve(address: &str, prefix: &str) -> String {
    if is_absolute(address) {
        address.to_string()
    } else {
        format!("{prefix}{address}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "http://h/";

    #[test]
    fn absolute_addresses_pass_through() {
        for addr in [
            "http://example.com/a.json",
            "https://example.com/a.json",
            "rtmp://live.example.com/app/stream",
            "rtmps://live.example.com/app/stream",
        ] {
            assert_eq!(resolve(addr, PREFIX), addr);
        }
    }

    #[test]
    fn relative_addresses_get_prefixed() {
        assert_eq!(resolve("json/a.txt", PREFIX), "http://h/json/a.txt");
        assert_eq!(resolve("", PREFIX), "http://h/");
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(resolve("HTTP://x", PREFIX), "http://h/HTTP://x");
        assert!(!is_absolute("Rtmp://x"));
    }

    #[test]
    fn empty_prefix_is_identity() {
        assert_eq!(resolve("x", ""), "x");
    }
}
