//! Built-in per-test-type scrubbing handlers.

use report_pipeline_core::{Document, SanitiseError};
use serde_yaml::Value;

use crate::bridge_db::BridgeDb;
use crate::dispatch::TestSanitiser;

/// Scrubs bridge endpoints from `bridge_reachability` measurements.
///
/// For an endpoint the bridge db knows, every occurrence of the address is
/// replaced with the hashed fingerprint (including inside nested values
/// such as log lines), `bridge_address` and `input` are set to the hashed
/// fingerprint, and the distribution channel is recorded. Endpoints the db
/// does not know cannot be attributed, so `bridge_address` is nulled and
/// the rest is left alone. An address that is itself a hashed fingerprint
/// is already scrubbed output and passes through untouched, so re-running
/// the handler is a no-op.
pub struct BridgeReachability;

impl TestSanitiser for BridgeReachability {
    fn sanitise(
        &self,
        mut entry: Document,
        bridge_db: &BridgeDb,
    ) -> Result<Document, SanitiseError> {
        let address = entry
            .get_str("bridge_address")
            .or_else(|| entry.get_str("input"))
            .map(str::to_string);
        let Some(address) = address else {
            return Ok(entry);
        };

        match bridge_db.hashed_fingerprint(&address) {
            Some(hashed) => {
                let distributor = bridge_db
                    .get(&address)
                    .map(|bridge| bridge.distributor.clone());

                let mut scrubbed = scrub_document(entry, &address, &hashed);
                scrubbed.insert("bridge_address", hashed.as_str());
                scrubbed.insert("input", hashed.as_str());
                if let Some(distributor) = distributor {
                    scrubbed.insert("distributor", distributor.as_str());
                }
                Ok(scrubbed)
            }
            // Substituted output from an earlier pass; already scrubbed.
            None if bridge_db.is_hashed_fingerprint(&address) => Ok(entry),
            None => {
                entry.insert("bridge_address", Value::Null);
                Ok(entry)
            }
        }
    }
}

/// Scrubs db-known endpoints from `tcp_connect` measurements.
pub struct TcpConnect;

impl TestSanitiser for TcpConnect {
    fn sanitise(
        &self,
        entry: Document,
        bridge_db: &BridgeDb,
    ) -> Result<Document, SanitiseError> {
        let Some(address) = entry.get_str("input").map(str::to_string) else {
            return Ok(entry);
        };
        let Some(hashed) = bridge_db.hashed_fingerprint(&address) else {
            return Ok(entry);
        };

        let mut scrubbed = scrub_document(entry, &address, &hashed);
        scrubbed.insert("input", hashed.as_str());
        Ok(scrubbed)
    }
}

/// Replaces every occurrence of `needle` in the document's string values,
/// recursing through sequences and nested mappings.
fn scrub_document(doc: Document, needle: &str, replacement: &str) -> Document {
    doc.iter()
        .map(|(name, value)| {
            (
                name.clone(),
                scrub_value(value.clone(), needle, replacement),
            )
        })
        .collect()
}

fn scrub_value(value: Value, needle: &str, replacement: &str) -> Value {
    match value {
        Value::String(text) if text.contains(needle) => {
            Value::String(text.replace(needle, replacement))
        }
        Value::Sequence(items) => Value::Sequence(
            items
                .into_iter()
                .map(|item| scrub_value(item, needle, replacement))
                .collect(),
        ),
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(key, item)| (key, scrub_value(item, needle, replacement)))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge_db::BridgeEntry;

    fn db() -> BridgeDb {
        let mut db = BridgeDb::new();
        db.insert(
            "1.2.3.4:443",
            BridgeEntry {
                fingerprint: "AAAA".to_string(),
                hashed_fingerprint: Some("hashed".to_string()),
                distributor: "email".to_string(),
                transport: Some("obfs4".to_string()),
            },
        );
        db
    }

    fn entry(yaml: &str) -> Document {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_known_bridge_is_fully_scrubbed() {
        let doc = entry(
            "bridge_address: 1.2.3.4:443\n\
             input: 1.2.3.4:443\n\
             logs:\n\
             - 'connecting to 1.2.3.4:443'\n\
             - 'handshake ok'\n",
        );

        let out = BridgeReachability.sanitise(doc, &db()).unwrap();
        assert_eq!(out.get_str("bridge_address"), Some("hashed"));
        assert_eq!(out.get_str("input"), Some("hashed"));
        assert_eq!(out.get_str("distributor"), Some("email"));

        let logs = out.get("logs").unwrap().as_sequence().unwrap();
        assert_eq!(logs[0].as_str(), Some("connecting to hashed"));
        assert_eq!(logs[1].as_str(), Some("handshake ok"));
    }

    #[test]
    fn test_scrubbing_is_idempotent() {
        let doc = entry("bridge_address: 1.2.3.4:443\ninput: 1.2.3.4:443\n");

        let once = BridgeReachability.sanitise(doc, &db()).unwrap();
        assert_eq!(once.get_str("bridge_address"), Some("hashed"));
        let twice = BridgeReachability.sanitise(once.clone(), &db()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unknown_bridge_scrub_is_idempotent() {
        let doc = entry("bridge_address: 9.9.9.9:1\ninput: 9.9.9.9:1\n");

        let once = BridgeReachability.sanitise(doc, &db()).unwrap();
        let twice = BridgeReachability.sanitise(once.clone(), &db()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unknown_bridge_is_nulled_not_attributed() {
        let doc = entry("bridge_address: 9.9.9.9:1\ninput: 9.9.9.9:1\n");

        let out = BridgeReachability.sanitise(doc, &db()).unwrap();
        assert_eq!(out.get("bridge_address"), Some(&Value::Null));
        // No identity to substitute: the input stays as measured.
        assert_eq!(out.get_str("input"), Some("9.9.9.9:1"));
        assert!(!out.contains("distributor"));
    }

    #[test]
    fn test_entry_without_address_fields_is_untouched() {
        let doc = entry("success: false\n");
        let out = BridgeReachability.sanitise(doc.clone(), &db()).unwrap();
        assert_eq!(out, doc);
    }

    #[test]
    fn test_tcp_connect_scrubs_known_input() {
        let doc = entry("input: 1.2.3.4:443\nstatus:\n  success: true\n");
        let out = TcpConnect.sanitise(doc, &db()).unwrap();
        assert_eq!(out.get_str("input"), Some("hashed"));
    }

    #[test]
    fn test_tcp_connect_leaves_unknown_input() {
        let doc = entry("input: example.org:80\n");
        let out = TcpConnect.sanitise(doc.clone(), &db()).unwrap();
        assert_eq!(out, doc);
    }

    #[test]
    fn test_scrub_value_recurses_into_nested_mappings() {
        let value: Value =
            serde_yaml::from_str("outer:\n  inner: 'saw 1.2.3.4:443 here'\n").unwrap();
        let out = scrub_value(value, "1.2.3.4:443", "hashed");
        let text = out
            .get("outer")
            .and_then(|v| v.get("inner"))
            .and_then(Value::as_str);
        assert_eq!(text, Some("saw hashed here"));
    }
}
