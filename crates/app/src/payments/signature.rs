//! Webhook signature verification.
//!
//! The vendor signs `"{timestamp}.{raw body}"` with HMAC-SHA256 and sends
//! `t={timestamp},v1={hex}` in the signature header. Several `v1` entries may
//! be present while a secret is being rolled.

use hmac::{Hmac, Mac};
use jiff::{SignedDuration, Timestamp};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Maximum clock distance between the signature timestamp and now.
pub const DEFAULT_SIGNATURE_TOLERANCE: SignedDuration = SignedDuration::from_secs(300);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature header has no timestamp")]
    MissingTimestamp,

    #[error("signature header has no v1 signature")]
    MissingSignature,

    #[error("signature timestamp is not a unix time")]
    InvalidTimestamp,

    #[error("signature timestamp is outside the tolerance window")]
    OutsideTolerance,

    #[error("no signature matches the payload")]
    Mismatch,

    #[error("webhook secret is empty")]
    EmptySecret,
}

fn mac(secret: &str, timestamp: i64, payload: &[u8]) -> Result<HmacSha256, SignatureError> {
    if secret.is_empty() {
        return Err(SignatureError::EmptySecret);
    }

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_len| SignatureError::EmptySecret)?;

    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);

    Ok(mac)
}

/// Verify a webhook payload against its signature header.
///
/// # Errors
///
/// Returns a [`SignatureError`] describing the first check that failed.
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    now: Timestamp,
    tolerance: SignedDuration,
) -> Result<(), SignatureError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = Some(value),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp: i64 = timestamp
        .ok_or(SignatureError::MissingTimestamp)?
        .parse()
        .map_err(|_nan| SignatureError::InvalidTimestamp)?;

    if signatures.is_empty() {
        return Err(SignatureError::MissingSignature);
    }

    let signed_at = Timestamp::from_second(timestamp).map_err(|_range| SignatureError::InvalidTimestamp)?;

    if now.duration_since(signed_at).abs() > tolerance {
        return Err(SignatureError::OutsideTolerance);
    }

    let expected = mac(secret, timestamp, payload)?;

    let matched = signatures.iter().any(|signature| {
        hex::decode(signature).is_ok_and(|bytes| expected.clone().verify_slice(&bytes).is_ok())
    });

    if matched {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

/// Build a signature header the way the vendor does.
///
/// # Errors
///
/// Returns [`SignatureError::EmptySecret`] when `secret` is empty.
pub fn signature_header(
    payload: &[u8],
    secret: &str,
    timestamp: i64,
) -> Result<String, SignatureError> {
    let signature = hex::encode(mac(secret, timestamp, payload)?.finalize().into_bytes());

    Ok(format!("t={timestamp},v1={signature}"))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const SECRET: &str = "whsec_test";
    const PAYLOAD: &[u8] = br#"{"id":"evt_1","type":"checkout.session.completed"}"#;

    fn now() -> Timestamp {
        Timestamp::from_second(1_767_225_600).unwrap_or(Timestamp::UNIX_EPOCH)
    }

    #[test]
    fn valid_signature_is_accepted() -> TestResult {
        let header = signature_header(PAYLOAD, SECRET, now().as_second())?;

        verify_signature(PAYLOAD, &header, SECRET, now(), DEFAULT_SIGNATURE_TOLERANCE)?;

        Ok(())
    }

    #[test]
    fn any_matching_v1_entry_is_accepted() -> TestResult {
        let good = signature_header(PAYLOAD, SECRET, now().as_second())?;
        let (_, good_signature) = good.split_once(",v1=").ok_or("no v1 entry")?;
        let header = format!("t={},v1={},v1={good_signature}", now().as_second(), "00".repeat(32));

        verify_signature(PAYLOAD, &header, SECRET, now(), DEFAULT_SIGNATURE_TOLERANCE)?;

        Ok(())
    }

    #[test]
    fn tampered_payload_is_rejected() -> TestResult {
        let header = signature_header(PAYLOAD, SECRET, now().as_second())?;

        let result = verify_signature(
            br#"{"id":"evt_2"}"#,
            &header,
            SECRET,
            now(),
            DEFAULT_SIGNATURE_TOLERANCE,
        );

        assert_eq!(result, Err(SignatureError::Mismatch));

        Ok(())
    }

    #[test]
    fn wrong_secret_is_rejected() -> TestResult {
        let header = signature_header(PAYLOAD, "whsec_other", now().as_second())?;

        let result = verify_signature(PAYLOAD, &header, SECRET, now(), DEFAULT_SIGNATURE_TOLERANCE);

        assert_eq!(result, Err(SignatureError::Mismatch));

        Ok(())
    }

    #[test]
    fn stale_and_future_timestamps_are_rejected() -> TestResult {
        for offset in [-301, 301] {
            let header = signature_header(PAYLOAD, SECRET, now().as_second() + offset)?;

            let result =
                verify_signature(PAYLOAD, &header, SECRET, now(), DEFAULT_SIGNATURE_TOLERANCE);

            assert_eq!(result, Err(SignatureError::OutsideTolerance), "offset {offset}");
        }

        Ok(())
    }

    #[test]
    fn timestamp_at_tolerance_edge_is_accepted() -> TestResult {
        let header = signature_header(PAYLOAD, SECRET, now().as_second() - 300)?;

        verify_signature(PAYLOAD, &header, SECRET, now(), DEFAULT_SIGNATURE_TOLERANCE)?;

        Ok(())
    }

    #[test]
    fn malformed_headers_are_rejected() {
        let check = |header: &str| {
            verify_signature(PAYLOAD, header, SECRET, now(), DEFAULT_SIGNATURE_TOLERANCE)
        };

        assert_eq!(check(""), Err(SignatureError::MissingTimestamp));
        assert_eq!(check("v1=abcd"), Err(SignatureError::MissingTimestamp));
        assert_eq!(check("t=soon,v1=abcd"), Err(SignatureError::InvalidTimestamp));
        assert_eq!(
            check(&format!("t={}", now().as_second())),
            Err(SignatureError::MissingSignature)
        );
        assert_eq!(
            check(&format!("t={},v1=not-hex", now().as_second())),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert_eq!(
            signature_header(PAYLOAD, "", 0),
            Err(SignatureError::EmptySecret)
        );
    }
}
