//! Short-code utilities: generation, URL validation and code extraction

use rand::Rng;
use uuid::Uuid;

/// Base-62 digits, value order
pub const BASE62_ALPHABET: &[u8; 62] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Exclusive upper bound of the random salt
pub const SALT_RANGE: u64 = 100_000_000;

/// Encode `value` in base 62; zero encodes as `"0"`
pub fn to_base62(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE62_ALPHABET[(value % 62) as usize]);
        value /= 62;
    }
    digits.reverse();

    // Every byte comes from the ASCII alphabet
    digits.into_iter().map(char::from).collect()
}

/// Random salt in `[0, SALT_RANGE)`
pub fn generate_salt() -> u64 {
    rand::thread_rng().gen_range(0..SALT_RANGE)
}

/// Short code from the low 32 bits of a record id plus a random salt
pub fn generate_short_code(id: &Uuid) -> String {
    let tail = (id.as_u128() & 0xffff_ffff) as u64;
    to_base62(tail + generate_salt())
}

/// Whether `candidate` parses as an absolute URL
pub fn is_valid_url(candidate: &str) -> bool {
    url::Url::parse(candidate).is_ok()
}

/// Bare code, or the final path segment of a full short URL
pub fn extract_short_code(short_or_code: &str) -> &str {
    match short_or_code.rsplit_once('/') {
        Some((_, last)) => last,
        None => short_or_code,
    }
}

/// Public short URL for a code
pub fn short_url(base_url: &str, code: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_base62() {
        assert_eq!(to_base62(0), "0");
        assert_eq!(to_base62(9), "9");
        assert_eq!(to_base62(10), "a");
        assert_eq!(to_base62(61), "Z");
        assert_eq!(to_base62(62), "10");
        assert_eq!(to_base62(3843), "ZZ");
        assert_eq!(to_base62(u64::MAX), "lYGhA16ahyf");
    }

    #[test]
    fn test_generated_codes_use_alphabet() {
        for _ in 0..200 {
            let code = generate_short_code(&Uuid::new_v4());
            assert!(!code.is_empty());
            // 2^32 + 10^8 stays below 62^6
            assert!(code.len() <= 6, "code too long: {}", code);
            assert!(code.bytes().all(|b| BASE62_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn test_salt_range() {
        for _ in 0..1000 {
            assert!(generate_salt() < SALT_RANGE);
        }
    }

    #[test]
    fn test_is_valid_url() {
        assert!(is_valid_url("https://example.com/a?b=c"));
        assert!(is_valid_url("ftp://files.example.com"));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url("example.com/path"));
        assert!(!is_valid_url(""));
    }

    #[test]
    fn test_extract_short_code() {
        assert_eq!(extract_short_code("abc"), "abc");
        assert_eq!(extract_short_code("http://localhost:3000/abc"), "abc");
        assert_eq!(extract_short_code("http://localhost:3000/"), "");
    }

    #[test]
    fn test_short_url_joins_once() {
        assert_eq!(short_url("http://localhost:3000", "abc"), "http://localhost:3000/abc");
        assert_eq!(short_url("http://localhost:3000/", "abc"), "http://localhost:3000/abc");
        assert_eq!(extract_short_code(&short_url("https://s.io", "x9")), "x9");
    }
}
