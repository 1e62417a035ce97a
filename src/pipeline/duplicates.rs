//! Duplicate guard: read-only probe of natural keys against the store.

use crate::types::NormalizedRecord;

/// Returns the first natural key of `record` that `lookup` reports as already taken.
///
/// Keys are probed in order and the probe stops at the first hit. Null and empty keys (an
/// absent `corporate_email`, for instance) are never probed.
pub fn find_duplicate<'k, K, F>(record: &NormalizedRecord, keys: &'k [K], mut lookup: F) -> Option<&'k str>
where
    K: AsRef<str>,
    F: FnMut(&str, &str) -> bool,
{
    keys.iter().map(|k| k.as_ref()).find(|&field| {
        record
            .get(field)
            .as_key()
            .is_some_and(|value| lookup(field, value.as_str()))
    })
}

/// Whether any natural key of `record` already exists according to `lookup`.
pub fn is_duplicate<K, F>(record: &NormalizedRecord, keys: &[K], lookup: F) -> bool
where
    K: AsRef<str>,
    F: FnMut(&str, &str) -> bool,
{
    find_duplicate(record, keys, lookup).is_some()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::types::FieldValue;

    const KEYS: &[&str] = &["document_number", "personal_email", "corporate_email"];

    fn record(doc: &str, email: &str, corporate: Option<&str>) -> NormalizedRecord {
        let mut r = NormalizedRecord::new(2);
        r.set("document_number", FieldValue::Text(doc.to_string()));
        r.set("personal_email", FieldValue::Text(email.to_string()));
        r.set(
            "corporate_email",
            corporate.map_or(FieldValue::Null, |c| FieldValue::Text(c.to_string())),
        );
        r
    }

    #[test]
    fn hit_on_any_key_is_a_duplicate() {
        let rec = record("1", "a@b.com", None);
        assert!(is_duplicate(&rec, KEYS, |f, v| f == "personal_email" && v == "a@b.com"));
        assert!(!is_duplicate(&rec, KEYS, |_, _| false));
    }

    #[test]
    fn short_circuits_on_first_hit() {
        let probed = RefCell::new(Vec::new());
        let rec = record("1", "a@b.com", Some("a@corp.com"));
        let hit = find_duplicate(&rec, KEYS, |f, _| {
            probed.borrow_mut().push(f.to_string());
            f == "document_number"
        });
        assert_eq!(hit, Some("document_number"));
        assert_eq!(probed.into_inner(), vec!["document_number"]);
    }

    #[test]
    fn absent_corporate_email_is_not_probed() {
        let probed = RefCell::new(Vec::new());
        let rec = record("1", "a@b.com", None);
        let hit = find_duplicate(&rec, KEYS, |f, _| {
            probed.borrow_mut().push(f.to_string());
            false
        });
        assert_eq!(hit, None);
        assert_eq!(probed.into_inner(), vec!["document_number", "personal_email"]);
    }
}
