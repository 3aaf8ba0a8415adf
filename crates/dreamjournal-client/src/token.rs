use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, Validation, decode};

use dreamjournal_types::api::Claims;

/// Reads the claims of a bearer token without checking its signature.
///
/// The client never holds the signing secret; this only tells us what the
/// server put in the token. Returns `None` for opaque or malformed tokens.
pub fn peek_claims(token: &str) -> Option<Claims> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .ok()
        .map(|data| data.claims)
}

pub fn expires_at(token: &str) -> Option<DateTime<Utc>> {
    peek_claims(token).and_then(|claims| DateTime::from_timestamp(claims.exp, 0))
}

/// True only when the token carries an `exp` claim that lies in the past.
pub fn is_expired(token: &str, now: DateTime<Utc>) -> bool {
    expires_at(token).is_some_and(|exp| exp <= now)
}
