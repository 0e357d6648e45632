/// Country code every stored phone number carries.
pub const COUNTRY_PREFIX: &str = "34";

/// Keep only the digits of `raw` and make sure they start with the Spanish country code.
///
/// Total and idempotent: the result is always digits-only and begins with `34`.
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.starts_with(COUNTRY_PREFIX) {
        digits
    } else {
        format!("{COUNTRY_PREFIX}{digits}")
    }
}
