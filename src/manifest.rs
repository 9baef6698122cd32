//! Resolution Manifest - SHA-256 Fingerprints
//!
//! The fingerprint covers the resolved entries only, so two runs over the
//! same source state agree even though their timestamps differ.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{to_string, Value};
use sha2::{Digest, Sha256};

use crate::resolver::{Resolution, Resolver};
use crate::ENGINE_VERSION;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionManifest {
    pub engine_version: String,
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<Resolution>,
    pub fingerprint: String,
}

impl ResolutionManifest {
    /// Resolve every slot and fingerprint the result
    pub fn build(resolver: &Resolver) -> Result<Self, serde_json::Error> {
        let entries = resolver.resolve_all();
        let fingerprint = compute_fingerprint(&entries)?;
        Ok(Self {
            engine_version: ENGINE_VERSION.to_string(),
            generated_at: Utc::now(),
            entries,
            fingerprint,
        })
    }
}

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Convert to canonical JSON (sorted keys, no whitespace)
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    to_string(&sort_value(&v))
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                sorted
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sort_value(v)))
                    .collect(),
            )
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_value).collect()),
        _ => v.clone(),
    }
}

/// fingerprint = sha256(canonical_json(entries))
pub fn compute_fingerprint(entries: &[Resolution]) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(&entries)?;
    Ok(sha256_hex(canonical.as_bytes()))
}
