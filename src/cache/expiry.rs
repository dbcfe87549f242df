//! Expiry Policy Module
//!
//! Computes absolute expiration timestamps and decides staleness.

use chrono::{DateTime, Duration, Utc};

/// Default TTL in seconds applied when neither an explicit expiry nor a TTL is given.
pub const DEFAULT_TTL_SECS: u64 = 3600;

// == Resolve Expiry ==
/// Computes the absolute expiry of an entry written at `now`.
///
/// Precedence:
/// 1. `explicit` is used as-is when present (already absolute)
/// 2. otherwise `now + ttl` when a TTL is given
/// 3. otherwise `now + default_ttl`
///
/// # Arguments
/// * `now` - The time of the write
/// * `explicit` - Optional absolute expiry
/// * `ttl` - Optional relative TTL in seconds
/// * `default_ttl` - Backend default TTL in seconds
pub fn resolve_expiry(
    now: DateTime<Utc>,
    explicit: Option<DateTime<Utc>>,
    ttl: Option<u64>,
    default_ttl: u64,
) -> DateTime<Utc> {
    match (explicit, ttl) {
        (Some(at), _) => at,
        (None, Some(ttl)) => after(now, ttl),
        (None, None) => after(now, default_ttl),
    }
}

// == Is Expired ==
/// Checks whether an entry expiring at `expires_at` is stale at `now`.
///
/// Boundary condition: an entry is stale once `now >= expires_at`, so a
/// value is only ever served while `now < expires_at`.
pub fn is_expired(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now >= expires_at
}

// == Remaining TTL ==
/// Whole seconds left until `expires_at`, rounded up. `None` once stale.
pub fn remaining_ttl_secs(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Option<u64> {
    if is_expired(expires_at, now) {
        return None;
    }
    let millis = (expires_at - now).num_milliseconds().max(1) as u64;
    Some(millis.div_ceil(1000))
}

/// `now + secs`, saturating at the latest representable instant.
fn after(now: DateTime<Utc>, secs: u64) -> DateTime<Utc> {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
