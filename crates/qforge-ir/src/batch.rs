//! Binary interchange format for batches of circuits.
//!
//! A batch on the wire is:
//!
//! ```text
//! +--------+---------+------------------------------------+
//! | "QFRG" | version | MessagePack (named fields) payload |
//! +--------+---------+------------------------------------+
//!   4 bytes  1 byte
//! ```
//!
//! The payload is the circuit list serialized with `rmp-serde`. Services
//! exchange batches as standard base64 text inside JSON bodies.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};

use crate::circuit::Circuit;
use crate::error::{IrError, IrResult};

/// Magic bytes opening every encoded batch.
pub const MAGIC: &[u8; 4] = b"QFRG";

/// Format version written by this build.
pub const FORMAT_VERSION: u8 = 1;

const HEADER_LEN: usize = MAGIC.len() + 1;

/// An ordered batch of circuits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CircuitBatch(Vec<Circuit>);

impl CircuitBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of circuits in the batch.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the batch holds no circuits.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a circuit.
    pub fn push(&mut self, circuit: Circuit) {
        self.0.push(circuit);
    }

    /// Iterate over the circuits in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Circuit> {
        self.0.iter()
    }

    /// Borrow the circuits as a slice.
    pub fn as_slice(&self) -> &[Circuit] {
        &self.0
    }

    /// Consume the batch, returning the circuits.
    pub fn into_inner(self) -> Vec<Circuit> {
        self.0
    }

    /// Encode the batch into its binary form.
    pub fn to_bytes(&self) -> IrResult<Vec<u8>> {
        let mut out = Vec::with_capacity(HEADER_LEN + 64 * self.0.len());
        out.extend_from_slice(MAGIC);
        out.push(FORMAT_VERSION);
        rmp_serde::encode::write_named(&mut out, &self.0)?;
        Ok(out)
    }

    /// Decode a batch from its binary form.
    ///
    /// Every decoded circuit is re-validated, so a malformed payload cannot
    /// smuggle out-of-range operands past the builder checks.
    pub fn from_bytes(bytes: &[u8]) -> IrResult<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(if bytes.starts_with(&MAGIC[..bytes.len()]) {
                IrError::Truncated(bytes.len())
            } else {
                IrError::BadMagic
            });
        }
        if &bytes[..MAGIC.len()] != MAGIC {
            return Err(IrError::BadMagic);
        }
        let version = bytes[MAGIC.len()];
        if version != FORMAT_VERSION {
            return Err(IrError::UnsupportedVersion {
                found: version,
                supported: FORMAT_VERSION,
            });
        }

        let circuits: Vec<Circuit> = rmp_serde::from_slice(&bytes[HEADER_LEN..])?;
        for circuit in &circuits {
            circuit.check()?;
        }
        Ok(Self(circuits))
    }

    /// Encode the batch as standard base64 text.
    pub fn to_base64(&self) -> IrResult<String> {
        Ok(BASE64.encode(self.to_bytes()?))
    }

    /// Decode a batch from standard base64 text.
    ///
    /// ASCII whitespace (line wrapping) is ignored.
    pub fn from_base64(text: &str) -> IrResult<Self> {
        let bytes = if text.bytes().any(|b| b.is_ascii_whitespace()) {
            let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
            BASE64.decode(compact)?
        } else {
            BASE64.decode(text)?
        };
        Self::from_bytes(&bytes)
    }
}

impl From<Vec<Circuit>> for CircuitBatch {
    fn from(circuits: Vec<Circuit>) -> Self {
        Self(circuits)
    }
}

impl From<Circuit> for CircuitBatch {
    fn from(circuit: Circuit) -> Self {
        Self(vec![circuit])
    }
}

impl FromIterator<Circuit> for CircuitBatch {
    fn from_iter<T: IntoIterator<Item = Circuit>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for CircuitBatch {
    type Item = Circuit;
    type IntoIter = std::vec::IntoIter<Circuit>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a CircuitBatch {
    type Item = &'a Circuit;
    type IntoIter = std::slice::Iter<'a, Circuit>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let bytes = CircuitBatch::new().to_bytes().unwrap();
        assert_eq!(&bytes[..4], b"QFRG");
        assert_eq!(bytes[4], FORMAT_VERSION);
    }

    #[test]
    fn test_bad_magic() {
        let err = CircuitBatch::from_bytes(b"QPY\x00\x01\x02").unwrap_err();
        assert!(matches!(err, IrError::BadMagic));
    }

    #[test]
    fn test_truncated_header() {
        let err = CircuitBatch::from_bytes(b"QFR").unwrap_err();
        assert!(matches!(err, IrError::Truncated(3)));
    }

    #[test]
    fn test_unsupported_version() {
        let mut bytes = CircuitBatch::new().to_bytes().unwrap();
        bytes[4] = 9;
        let err = CircuitBatch::from_bytes(&bytes).unwrap_err();
        assert!(matches!(
            err,
            IrError::UnsupportedVersion {
                found: 9,
                supported: 1
            }
        ));
    }

    #[test]
    fn test_garbage_body() {
        let mut bytes = MAGIC.to_vec();
        bytes.push(FORMAT_VERSION);
        bytes.extend_from_slice(&[0xc1, 0xff, 0x00]);
        assert!(matches!(
            CircuitBatch::from_bytes(&bytes),
            Err(IrError::Decode(_))
        ));
    }

    #[test]
    fn test_invalid_base64() {
        assert!(matches!(
            CircuitBatch::from_base64("not base64!!"),
            Err(IrError::Base64(_))
        ));
    }

    #[test]
    fn test_base64_ignores_line_breaks() {
        let batch = CircuitBatch::from(Circuit::bell().unwrap());
        let text = batch.to_base64().unwrap();
        let (head, tail) = text.split_at(text.len() / 2);
        let wrapped = format!("{head}\n{tail}\n");
        assert_eq!(CircuitBatch::from_base64(&wrapped).unwrap(), batch);
    }
}
