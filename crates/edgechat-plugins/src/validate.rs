//! Value grammars shared by plugin flag validators.

use std::sync::LazyLock;

use regex::Regex;

static HOSTNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(([a-zA-Z0-9]|[a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9])\.)*([A-Za-z0-9]|[A-Za-z0-9][A-Za-z0-9-]*[A-Za-z0-9])$",
    )
    .expect("hostname regex should compile")
});

static IPV4_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,3}\.){3}\d{1,3}$").expect("ipv4 regex should compile")
});

/// DNS hostname or dotted-quad IPv4 address.
///
/// The IPv4 form checks shape only (`999.1.1.1` passes).
pub fn is_host(value: &str) -> bool {
    HOSTNAME_RE.is_match(value) || IPV4_RE.is_match(value)
}

/// One or more ASCII digits.
pub fn is_unsigned(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Comma-separated ports and `a-b` ranges, every endpoint in 1..=65535.
///
/// Reversed ranges (`200-100`) are accepted; the tool normalises them.
pub fn is_port_spec(value: &str) -> bool {
    value.split(',').all(|part| {
        let endpoints: Vec<&str> = part.split('-').collect();
        endpoints.len() <= 2 && endpoints.iter().all(|p| is_port(p))
    })
}

fn is_port(value: &str) -> bool {
    is_unsigned(value) && value.parse::<u32>().is_ok_and(|n| (1..=65_535).contains(&n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hosts() {
        for ok in ["example.com", "a", "sub-1.example.co", "10.0.0.1", "localhost"] {
            assert!(is_host(ok), "{ok} should be accepted");
        }
        for bad in ["", "-example.com", "example-.com", "exa mple.com", "a..b", "http://x", "x_y.com"] {
            assert!(!is_host(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn port_specs() {
        for ok in ["80", "80,443", "100-200", "80,100-200,443", "1", "65535", "200-100"] {
            assert!(is_port_spec(ok), "{ok} should be accepted");
        }
        for bad in ["0", "65536", "abc", "100-", "-80", "80,", "1-2-3", "", "99999999999"] {
            assert!(!is_port_spec(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn unsigned() {
        assert!(is_unsigned("0"));
        assert!(is_unsigned("90000"));
        assert!(!is_unsigned(""));
        assert!(!is_unsigned("-1"));
        assert!(!is_unsigned("1e3"));
    }
}
