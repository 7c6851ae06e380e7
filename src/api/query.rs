//! Query string parsing module
//!
//! Minimal `application/x-www-form-urlencoded` query handling: key
//! lookup plus percent-decoding, enough for the `path` parameter the
//! viewer front-end sends.

/// Extract a named parameter from a raw query string, percent-decoded
pub fn query_param(query: &str, name: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then(|| percent_decode(value))
    })
}

/// Decode `%XX` escapes and `+` as space
///
/// Malformed escapes are kept literally rather than rejected; the path
/// they produce will simply fail the existence check downstream.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                if let (Some(hi), Some(lo)) = (hex_val(bytes[i + 1]), hex_val(bytes[i + 2])) {
                    out.push(hi * 16 + lo);
                    i += 3;
                } else {
                    out.push(b'%');
                    i += 1;
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

const fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_lookup() {
        assert_eq!(
            query_param("path=notes.md", "path"),
            Some("notes.md".to_string())
        );
        assert_eq!(
            query_param("a=1&path=sub/c.md&b=2", "path"),
            Some("sub/c.md".to_string())
        );
        assert_eq!(query_param("other=x", "path"), None);
        assert_eq!(query_param("", "path"), None);
    }

    #[test]
    fn test_percent_decoding() {
        assert_eq!(
            query_param("path=my%20notes.md", "path"),
            Some("my notes.md".to_string())
        );
        assert_eq!(
            query_param("path=a+b.md", "path"),
            Some("a b.md".to_string())
        );
        assert_eq!(
            query_param("path=sub%2Fc.md", "path"),
            Some("sub/c.md".to_string())
        );
    }

    #[test]
    fn test_malformed_escape_kept_literal() {
        assert_eq!(
            query_param("path=50%25.md", "path"),
            Some("50%.md".to_string())
        );
        assert_eq!(
            query_param("path=bad%zz.md", "path"),
            Some("bad%zz.md".to_string())
        );
        assert_eq!(query_param("path=trail%2", "path"), Some("trail%2".to_string()));
    }
}
