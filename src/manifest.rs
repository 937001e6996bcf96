//! Manifest parsing and normalization.
//!
//! A manifest is a small versioned JSON document listing published files by
//! their SHA-256 digest:
//!
//! ```json
//! {
//!   "verify_version": "v1",
//!   "items": [
//!     { "item_id": "...", "item_name": "...", "sha256": "...", "notes": "..." }
//!   ]
//! }
//! ```

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, VerifyError};

/// The only manifest schema version this tool accepts.
pub const SUPPORTED_VERSION: &str = "v1";

const VERSION_KEY: &str = "verify_version";
const ITEMS_KEY: &str = "items";

/// Defaults applied to item fields that are absent or not strings.
///
/// | field       | record field | default |
/// |-------------|--------------|---------|
/// | `item_id`   | `id`         | `""`    |
/// | `item_name` | `name`       | `""`    |
/// | `sha256`    | `digest_hex` | `""`    |
/// | `notes`     | `notes`      | `""`    |
///
/// A record with an empty digest is kept but can never match.
const FIELD_DEFAULTS: [(&str, &str); 4] = [
    ("item_id", ""),
    ("item_name", ""),
    ("sha256", ""),
    ("notes", ""),
];

/// One published artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestRecord {
    pub id: String,
    pub name: String,
    /// Trimmed, lowercase hex digest.
    pub digest_hex: String,
    pub notes: String,
}

/// A loaded and validated manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub version: String,
    /// Records in document order. Duplicates are kept; the first match wins.
    pub records: Vec<ManifestRecord>,
}

impl Manifest {
    /// Parse and validate a manifest from JSON bytes.
    pub fn from_json(json_bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(json_bytes)?;
        Self::from_value(&value)
    }

    /// Validate the schema of an already-parsed document.
    pub fn from_value(value: &Value) -> Result<Self> {
        let version = match value.get(VERSION_KEY) {
            Some(Value::String(v)) if v == SUPPORTED_VERSION => v.clone(),
            Some(Value::String(v)) => {
                return Err(VerifyError::SchemaUnsupported {
                    version: Some(v.clone()),
                })
            }
            Some(other) => {
                return Err(VerifyError::SchemaUnsupported {
                    version: Some(other.to_string()),
                })
            }
            None => return Err(VerifyError::SchemaUnsupported { version: None }),
        };

        let items = value
            .get(ITEMS_KEY)
            .and_then(Value::as_array)
            .ok_or(VerifyError::MissingItems)?;

        let records = items.iter().map(ManifestRecord::from_entry).collect();

        Ok(Manifest { version, records })
    }

    /// First record whose digest equals `digest_hex`.
    ///
    /// The input is normalized the same way record digests are, so the
    /// comparison is case-insensitive. An empty digest matches nothing.
    pub fn find(&self, digest_hex: &str) -> Option<&ManifestRecord> {
        let wanted = normalize_digest(digest_hex);
        if wanted.is_empty() {
            return None;
        }
        self.records.iter().find(|r| r.digest_hex == wanted)
    }
}

impl ManifestRecord {
    /// Map one raw `items` entry to a record, filling defaults.
    ///
    /// Entries that are not JSON objects become records with every field
    /// defaulted.
    pub fn from_entry(entry: &Value) -> Self {
        let fields = entry.as_object();
        let [id, name, digest, notes] =
            FIELD_DEFAULTS.map(|(key, default)| string_field(fields, key, default));

        ManifestRecord {
            id,
            name,
            digest_hex: normalize_digest(&digest),
            notes,
        }
    }
}

/// Canonical digest form: surrounding whitespace trimmed, lowercase.
pub fn normalize_digest(digest: &str) -> String {
    digest.trim().to_ascii_lowercase()
}

fn string_field(fields: Option<&Map<String, Value>>, key: &str, default: &str) -> String {
    fields
        .and_then(|map| map.get(key))
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGEST: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    fn parse(json: Value) -> Result<Manifest> {
        Manifest::from_json(json.to_string().as_bytes())
    }

    #[test]
    fn test_parse_full_record() {
        let manifest = parse(serde_json::json!({
            "verify_version": "v1",
            "items": [{
                "item_id": "A-001",
                "item_name": "Annual report",
                "sha256": DIGEST,
                "notes": "final"
            }]
        }))
        .unwrap();

        assert_eq!(manifest.version, "v1");
        assert_eq!(
            manifest.records,
            vec![ManifestRecord {
                id: "A-001".to_string(),
                name: "Annual report".to_string(),
                digest_hex: DIGEST.to_string(),
                notes: "final".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let manifest = parse(serde_json::json!({
            "verify_version": "v1",
            "items": [{}, "not an object", { "item_id": 7, "sha256": null }]
        }))
        .unwrap();

        assert_eq!(manifest.records.len(), 3);
        for record in &manifest.records {
            assert_eq!(record.id, "");
            assert_eq!(record.name, "");
            assert_eq!(record.digest_hex, "");
            assert_eq!(record.notes, "");
        }
    }

    #[test]
    fn test_digest_trimmed_and_lowercased() {
        let manifest = parse(serde_json::json!({
            "verify_version": "v1",
            "items": [{ "sha256": format!("  {}\n", DIGEST.to_uppercase()) }]
        }))
        .unwrap();

        assert_eq!(manifest.records[0].digest_hex, DIGEST);
    }

    #[test]
    fn test_empty_items_accepted() {
        let manifest = parse(serde_json::json!({ "verify_version": "v1", "items": [] })).unwrap();
        assert!(manifest.records.is_empty());
    }

    #[test]
    fn test_wrong_version_rejected() {
        let result = parse(serde_json::json!({
            "verify_version": "v2",
            "items": [{ "sha256": DIGEST }]
        }));
        assert!(matches!(
            result,
            Err(VerifyError::SchemaUnsupported { version: Some(ref v) }) if v == "v2"
        ));
    }

    #[test]
    fn test_missing_version_rejected() {
        let result = parse(serde_json::json!({ "items": [] }));
        assert!(matches!(
            result,
            Err(VerifyError::SchemaUnsupported { version: None })
        ));
    }

    #[test]
    fn test_non_string_version_rejected() {
        let result = parse(serde_json::json!({ "verify_version": 1, "items": [] }));
        assert!(matches!(result, Err(VerifyError::SchemaUnsupported { .. })));
    }

    #[test]
    fn test_missing_items_rejected() {
        let result = parse(serde_json::json!({ "verify_version": "v1" }));
        assert!(matches!(result, Err(VerifyError::MissingItems)));

        let result = parse(serde_json::json!({ "verify_version": "v1", "items": {} }));
        assert!(matches!(result, Err(VerifyError::MissingItems)));
    }

    #[test]
    fn test_not_json_rejected() {
        let result = Manifest::from_json(b"<html>not found</html>");
        assert!(matches!(result, Err(VerifyError::Json(_))));
    }

    #[test]
    fn test_legacy_serial_schema_rejected() {
        let result = parse(serde_json::json!({
            "shares_total": 10,
            "shares": [{ "serial": "S-1", "sha256": DIGEST }]
        }));
        assert!(matches!(result, Err(VerifyError::SchemaUnsupported { .. })));
    }

    #[test]
    fn test_find_first_duplicate_wins() {
        let manifest = parse(serde_json::json!({
            "verify_version": "v1",
            "items": [
                { "item_id": "first", "sha256": DIGEST },
                { "item_id": "second", "sha256": DIGEST }
            ]
        }))
        .unwrap();

        assert_eq!(manifest.find(DIGEST).unwrap().id, "first");
    }

    #[test]
    fn test_find_case_insensitive() {
        let manifest = parse(serde_json::json!({
            "verify_version": "v1",
            "items": [{ "item_id": "upper", "sha256": DIGEST.to_uppercase() }]
        }))
        .unwrap();

        assert_eq!(manifest.find(DIGEST).unwrap().id, "upper");
    }

    #[test]
    fn test_empty_digest_never_matches() {
        let manifest = parse(serde_json::json!({
            "verify_version": "v1",
            "items": [{ "item_id": "blank" }]
        }))
        .unwrap();

        assert!(manifest.find("").is_none());
        assert!(manifest.find(DIGEST).is_none());
    }
}
