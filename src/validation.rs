use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Largest image accepted for the logo or banner.
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

pub fn is_valid_email(string: &str) -> Result<(), String> {
    static RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
    match RE.is_match(string) {
        true => Ok(()),
        false => Err("invalid email".to_string()),
    }
}

pub fn is_non_empty(field: &str, value: &str) -> Result<(), String> {
    match value.trim().is_empty() {
        true => Err(format!("{field} is required")),
        false => Ok(()),
    }
}

pub fn is_at_most(field: &str, value: &str, max: usize) -> Result<(), String> {
    match value.chars().count() <= max {
        true => Ok(()),
        false => Err(format!("{field} is too long (max {max} characters)")),
    }
}

/// Parses a capacity limit typed into a form. It has to be a whole number
/// greater than zero.
pub fn parse_capacity_limit(string: &str) -> Result<u32, String> {
    match string.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err("The team limit must be a valid, positive number.".to_string()),
    }
}

/// Checks a logo/banner reference. Either an http(s) URL, or an inline
/// `data:image/...;base64,` URL whose payload is at most
/// [`MAX_IMAGE_BYTES`].
pub fn is_valid_image_ref(string: &str) -> Result<(), String> {
    let url = Url::parse(string)
        .map_err(|_| format!("`{string}` is not a valid image URL"))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        "data" => {
            let (header, payload) = url
                .path()
                .split_once(',')
                .ok_or_else(|| "malformed data URL".to_string())?;
            if !header.starts_with("image/") {
                return Err("data URLs must contain an image".to_string());
            }
            // base64 encodes 3 bytes as 4 characters
            let decoded_len = if header.ends_with(";base64") {
                payload.len() / 4 * 3
            } else {
                payload.len()
            };
            if decoded_len > MAX_IMAGE_BYTES {
                return Err("The image is too large. The limit is 2MB."
                    .to_string());
            }
            Ok(())
        }
        other => Err(format!("unsupported image URL scheme `{other}`")),
    }
}

#[cfg(test)]
#[test]
fn test_email() {
    assert!(is_valid_email("hello@example.com").is_ok());
    assert!(is_valid_email("hello@example").is_err());
    assert!(is_valid_email("he llo@example.com").is_err());
    assert!(is_valid_email("").is_err());
}

#[cfg(test)]
#[test]
fn test_capacity_limit() {
    assert_eq!(parse_capacity_limit(" 16 "), Ok(16));
    assert!(parse_capacity_limit("0").is_err());
    assert!(parse_capacity_limit("-3").is_err());
    assert!(parse_capacity_limit("sixteen").is_err());
}

#[cfg(test)]
#[test]
fn test_image_refs() {
    assert!(is_valid_image_ref("https://example.com/logo.png").is_ok());
    assert!(is_valid_image_ref("data:image/png;base64,iVBORw0KGgo=").is_ok());
    assert!(is_valid_image_ref("data:text/plain;base64,aGVsbG8=").is_err());
    assert!(is_valid_image_ref("ftp://example.com/logo.png").is_err());

    let huge = format!("data:image/png;base64,{}", "A".repeat(3 * 1024 * 1024));
    assert!(is_valid_image_ref(&huge).is_err());
}
