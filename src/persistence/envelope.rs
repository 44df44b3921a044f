//! Versioned JSON envelope wrapped around every persisted record

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{PersistError, PersistResult};

/// Current on-disk format version
pub const SAVE_VERSION: u32 = 1;

/// A persisted payload with its format version and save time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub version: u32,
    /// Unix timestamp (ms) when written
    pub saved_at: f64,
    pub payload: T,
}

impl<T: Serialize + DeserializeOwned> Envelope<T> {
    pub fn new(payload: T, saved_at: f64) -> Self {
        Self {
            version: SAVE_VERSION,
            saved_at,
            payload,
        }
    }

    pub fn encode(&self) -> PersistResult<String> {
        serde_json::to_string(self).map_err(PersistError::Serialize)
    }

    /// Parse and check the version
    pub fn decode(json: &str) -> PersistResult<Self> {
        let envelope: Envelope<T> =
            serde_json::from_str(json).map_err(PersistError::Deserialize)?;
        if envelope.version != SAVE_VERSION {
            return Err(PersistError::UnsupportedVersion {
                found: envelope.version,
                expected: SAVE_VERSION,
            });
        }
        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Record {
        best: u32,
    }

    #[test]
    fn test_decode_reads_written_envelope() {
        let json = Envelope::new(Record { best: 12 }, 1000.0).encode().unwrap();
        let envelope = Envelope::<Record>::decode(&json).unwrap();
        assert_eq!(envelope.payload, Record { best: 12 });
        assert_eq!(envelope.saved_at, 1000.0);
    }

    #[test]
    fn test_decode_rejects_future_version() {
        let json = r#"{"version":9,"saved_at":0.0,"payload":{"best":1}}"#;
        let err = Envelope::<Record>::decode(json).unwrap_err();
        assert!(matches!(
            err,
            PersistError::UnsupportedVersion {
                found: 9,
                expected: SAVE_VERSION
            }
        ));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            Envelope::<Record>::decode("42"),
            Err(PersistError::Deserialize(_))
        ));
    }
}
