use std::fmt::Write;

use rand::Rng;
use time::{Duration, OffsetDateTime};

pub const RESET_TOKEN_TTL: Duration = Duration::hours(1);

/// 32 random bytes, hex encoded.
pub fn generate_reset_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();

    bytes.iter().fold(String::with_capacity(64), |mut acc, b| {
        let _ = write!(acc, "{b:02x}");
        acc
    })
}

pub fn reset_token_expiry() -> OffsetDateTime {
    OffsetDateTime::now_utc() + RESET_TOKEN_TTL
}
