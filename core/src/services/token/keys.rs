//! Key layout in the revocation store.

const REFRESH_PREFIX: &str = "refresh:";
const BLACKLIST_PREFIX: &str = "blacklist:";

/// Scan pattern covering every active refresh token
pub const REFRESH_PATTERN: &str = "refresh:*";

/// Marker value stored for blacklisted ids
pub const BLACKLIST_MARKER: &str = "1";

/// Active refresh entry; the value is the owning subject
pub fn refresh_key(jti: &str) -> String {
    format!("{}{}", REFRESH_PREFIX, jti)
}

pub fn blacklist_key(jti: &str) -> String {
    format!("{}{}", BLACKLIST_PREFIX, jti)
}

/// Token id from an active refresh key
pub fn jti_from_refresh_key(key: &str) -> Option<&str> {
    key.strip_prefix(REFRESH_PREFIX).filter(|jti| !jti.is_empty())
}
