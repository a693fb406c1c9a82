//! Compact cart encoding carried in checkout session metadata.
//!
//! Each line is `{product_uuid_simple}:{quantity}:{unit_price}`; lines are
//! comma separated and packed into `cart_0`, `cart_1`, ... values that never
//! split a line and never exceed [`METADATA_VALUE_LIMIT`] characters.

use std::collections::BTreeMap;

use thiserror::Error;
use uuid::Uuid;

use crate::domain::products::records::ProductUuid;

/// Longest metadata value the vendor accepts.
pub const METADATA_VALUE_LIMIT: usize = 500;

/// Keys left for the cart once other metadata is set.
pub const MAX_CART_CHUNKS: usize = 40;

const CART_KEY_PREFIX: &str = "cart_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigestEntry {
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub unit_price: u64,
}

impl DigestEntry {
    fn encode(&self) -> String {
        format!(
            "{}:{}:{}",
            self.product_uuid.into_uuid().simple(),
            self.quantity,
            self.unit_price
        )
    }

    fn decode(entry: &str) -> Result<Self, DigestError> {
        let malformed = || DigestError::Malformed(entry.to_string());

        let mut parts = entry.split(':');

        let (Some(uuid), Some(quantity), Some(unit_price), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };

        let quantity: u32 = quantity.parse().map_err(|_nan| malformed())?;

        if quantity == 0 {
            return Err(malformed());
        }

        Ok(Self {
            product_uuid: ProductUuid::from_uuid(Uuid::parse_str(uuid).map_err(|_bad| malformed())?),
            quantity,
            unit_price: unit_price.parse().map_err(|_nan| malformed())?,
        })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DigestError {
    #[error("session metadata carries no cart")]
    Missing,

    #[error("malformed cart entry: {0:?}")]
    Malformed(String),

    #[error("cart is too large to fit in session metadata")]
    TooLarge,
}

/// Encode cart lines into metadata-sized chunks.
///
/// # Errors
///
/// Returns [`DigestError::TooLarge`] when more than [`MAX_CART_CHUNKS`] values
/// would be needed.
pub fn encode_digest(entries: &[DigestEntry]) -> Result<Vec<String>, DigestError> {
    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();

    for entry in entries {
        let encoded = entry.encode();

        if !current.is_empty() && current.len() + 1 + encoded.len() > METADATA_VALUE_LIMIT {
            chunks.push(std::mem::take(&mut current));
        }

        if !current.is_empty() {
            current.push(',');
        }

        current.push_str(&encoded);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    if chunks.len() > MAX_CART_CHUNKS {
        return Err(DigestError::TooLarge);
    }

    Ok(chunks)
}

/// Decode chunks produced by [`encode_digest`].
///
/// # Errors
///
/// Returns [`DigestError::Missing`] for an empty cart and
/// [`DigestError::Malformed`] for any entry that does not parse.
pub fn decode_digest<'a>(
    chunks: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<DigestEntry>, DigestError> {
    let entries = chunks
        .into_iter()
        .flat_map(|chunk| chunk.split(','))
        .map(DigestEntry::decode)
        .collect::<Result<Vec<_>, _>>()?;

    if entries.is_empty() {
        return Err(DigestError::Missing);
    }

    Ok(entries)
}

/// Cart chunks keyed `cart_0..cart_n`.
///
/// # Errors
///
/// See [`encode_digest`].
pub fn digest_metadata(entries: &[DigestEntry]) -> Result<BTreeMap<String, String>, DigestError> {
    Ok(encode_digest(entries)?
        .into_iter()
        .enumerate()
        .map(|(index, chunk)| (format!("{CART_KEY_PREFIX}{index}"), chunk))
        .collect())
}

/// Read the cart back out of session metadata. Chunks are read in index order
/// until the first missing key.
///
/// # Errors
///
/// See [`decode_digest`].
pub fn decode_metadata(
    metadata: &BTreeMap<String, String>,
) -> Result<Vec<DigestEntry>, DigestError> {
    let chunks = (0..)
        .map_while(|index| metadata.get(&format!("{CART_KEY_PREFIX}{index}")))
        .map(String::as_str);

    decode_digest(chunks)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn entry(quantity: u32, unit_price: u64) -> DigestEntry {
        DigestEntry {
            product_uuid: ProductUuid::new(),
            quantity,
            unit_price,
        }
    }

    #[test]
    fn single_line_uses_simple_uuid() -> TestResult {
        let line = entry(2, 60_000);

        let chunks = encode_digest(&[line])?;

        assert_eq!(
            chunks,
            vec![format!("{}:2:60000", line.product_uuid.into_uuid().simple())]
        );

        Ok(())
    }

    #[test]
    fn large_cart_is_split_on_line_boundaries() -> TestResult {
        let lines: Vec<DigestEntry> = (1..=20).map(|i| entry(i, u64::from(i) * 1_000)).collect();

        let metadata = digest_metadata(&lines)?;

        assert!(metadata.len() > 1, "expected several chunks");
        assert!(
            metadata.values().all(|v| v.len() <= METADATA_VALUE_LIMIT),
            "chunk over limit"
        );
        assert_eq!(decode_metadata(&metadata)?, lines);

        Ok(())
    }

    #[test]
    fn oversized_cart_is_rejected() {
        let lines: Vec<DigestEntry> = (0..MAX_CART_CHUNKS * 20).map(|_| entry(1, 100)).collect();

        assert_eq!(encode_digest(&lines), Err(DigestError::TooLarge));
    }

    #[test]
    fn missing_cart_is_rejected() {
        assert_eq!(decode_metadata(&BTreeMap::new()), Err(DigestError::Missing));
    }

    #[test]
    fn malformed_entries_are_rejected() {
        let uuid = Uuid::nil().simple().to_string();

        for bad in [
            "nonsense".to_string(),
            format!("{uuid}:1"),
            format!("{uuid}:1:100:extra"),
            format!("{uuid}:0:100"),
            format!("{uuid}:-1:100"),
            format!("{uuid}:1:1.50"),
            "zzzz:1:100".to_string(),
        ] {
            assert!(
                matches!(decode_digest([bad.as_str()]), Err(DigestError::Malformed(_))),
                "{bad} should be rejected"
            );
        }
    }
}
