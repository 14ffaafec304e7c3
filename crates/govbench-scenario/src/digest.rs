//! Catalog digests
//!
//! Provides [`CatalogDigest`], a 32-byte Blake3 hash over the records of a
//! loaded catalog, so a result can name the exact catalog it was scored on.

use crate::types::Scenario;
use serde_json::{Map, Value};
use std::fmt::{self, Display, Formatter};

/// A 32-byte catalog digest (Blake3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CatalogDigest([u8; 32]);

impl CatalogDigest {
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Digest of a scenario sequence, order-sensitive
    #[must_use]
    pub fn of_scenarios<'a>(scenarios: impl IntoIterator<Item = &'a Scenario>) -> Self {
        let mut builder = DigestBuilder::new();
        for scenario in scenarios {
            builder.update(scenario);
        }
        builder.finish()
    }

    /// Short string representation (first 16 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for CatalogDigest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl serde::Serialize for CatalogDigest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for CatalogDigest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        let arr: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| {
            serde::de::Error::custom(format!("expected 32 digest bytes, got {}", b.len()))
        })?;
        Ok(Self(arr))
    }
}

/// Incremental digest over scenarios
///
/// Each scenario is fed as its canonical JSON encoding (sorted keys, enums
/// in snake_case) followed by a separator, so two catalogs with identical records in identical order
/// produce identical digests regardless of their on-disk format.
#[derive(Debug, Clone, Default)]
pub struct DigestBuilder {
    hasher: blake3::Hasher,
}

impl DigestBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, scenario: &Scenario) {
        self.hasher.update(canonical(scenario).to_string().as_bytes());
        self.hasher.update(b"\n");
    }

    #[must_use]
    pub fn finish(&self) -> CatalogDigest {
        CatalogDigest(*self.hasher.finalize().as_bytes())
    }
}

fn canonical(scenario: &Scenario) -> Value {
    let expected = &scenario.expected;
    let mut outcome = Map::new();
    outcome.insert("should_block".to_string(), Value::Bool(expected.should_block));
    outcome.insert(
        "acceptable_reasons".to_string(),
        expected.acceptable_reasons.iter().map(String::as_str).collect(),
    );
    outcome.insert("severity".to_string(), expected.severity.as_str().into());

    let mut record = Map::new();
    record.insert("id".to_string(), scenario.id.as_str().into());
    record.insert("category".to_string(), scenario.category.as_str().into());
    record.insert("name".to_string(), scenario.name.as_str().into());
    record.insert("description".to_string(), scenario.description.as_str().into());
    record.insert("difficulty".to_string(), scenario.difficulty.as_str().into());
    record.insert("input".to_string(), Value::Object(scenario.input.clone()));
    record.insert("expected".to_string(), Value::Object(outcome));
    Value::Object(record)
}
