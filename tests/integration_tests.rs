//! End-to-end tests for table construction, lookup, and persistence.

use perfect_kv::{BloomFilter, PhfBuilder, PhfError, PhfTable};
use std::collections::HashMap;

// ============================================================================
// CORRECTNESS
// ============================================================================

#[test]
fn every_build_key_maps_to_its_value() {
    let mut data = HashMap::new();
    for i in 0..1000u32 {
        data.insert(
            format!("key-{:04x}-{:04x}", i / 256, i % 256),
            format!("value_{}", i),
        );
    }

    let table = PhfTable::from_map(data.clone()).unwrap();

    for (key, expected_value) in &data {
        assert_eq!(table.get(key).unwrap(), expected_value, "failed for {key}");
    }

    assert_eq!(table.len(), 1000);
    assert_eq!(table.g().len(), table.values().len());
}

#[test]
fn construction_terminates_across_sizes() {
    for n in [1usize, 2, 10, 1000, 50_000] {
        let entries: Vec<(String, usize)> =
            (0..n).map(|i| (format!("size-{n}-key-{i}"), i)).collect();
        let table = PhfTable::from_entries(entries).unwrap();
        assert_eq!(table.len(), n);

        // Spot-check a few lookups rather than all 50k.
        for i in [0, n / 2, n - 1] {
            assert_eq!(table.get(&format!("size-{n}-key-{i}")).unwrap(), &i);
        }
    }
}

#[test]
fn minimality_no_slot_left_unset() {
    let entries: Vec<(String, usize)> = (0..2500).map(|i| (format!("m{i}"), i)).collect();
    let table = PhfTable::from_entries(entries).unwrap();

    let mut payloads: Vec<usize> = table.values().to_vec();
    payloads.sort_unstable();
    assert_eq!(payloads, (0..2500).collect::<Vec<_>>());
}

#[test]
fn rebuild_is_byte_identical() {
    // Two maps with the same contents but independent (and so differently
    // ordered) hash state must produce identical tables: bucket order, seed
    // choice, and the free-list walk are all deterministic.
    let mut a = HashMap::new();
    let mut b = HashMap::new();
    for i in 0..2000u32 {
        a.insert(format!("det-{i}"), i);
    }
    for i in (0..2000u32).rev() {
        b.insert(format!("det-{i}"), i);
    }

    let ta = PhfTable::from_map(a).unwrap();
    let tb = PhfTable::from_map(b).unwrap();

    assert_eq!(ta.g(), tb.g());
    assert_eq!(ta.values(), tb.values());
    assert_eq!(ta.to_json().unwrap(), tb.to_json().unwrap());
}

#[test]
fn absent_key_lookup_never_panics() {
    let entries: Vec<(String, u32)> = (0..100).map(|i| (format!("real-{i}"), i)).collect();
    let table = PhfTable::from_entries(entries).unwrap();

    for i in 0..1000 {
        // Returns some value with no membership guarantee; must not panic
        // or index out of range.
        let _ = table.get(&format!("fake-{i}"));
    }
}

// ============================================================================
// ERROR CASES
// ============================================================================

#[test]
fn duplicate_keys_rejected_not_dropped() {
    let result = PhfBuilder::with_entries(vec![
        ("twice".to_string(), "a".to_string()),
        ("once".to_string(), "b".to_string()),
        ("twice".to_string(), "c".to_string()),
    ])
    .build();

    assert!(matches!(result, Err(PhfError::DuplicateKey { key }) if key == "twice"));
}

#[test]
fn empty_input_rejected() {
    let result: Result<PhfTable<String>, _> = PhfTable::from_entries(Vec::new());
    assert!(matches!(result, Err(PhfError::EmptyKeySet)));
}

// ============================================================================
// PERSISTENCE
// ============================================================================

#[test]
fn binary_roundtrip_is_verbatim() {
    let mut data = HashMap::new();
    for i in 0..1000 {
        data.insert(format!("persist-{i}"), format!("value-{i}"));
    }
    let original = PhfTable::from_map(data).unwrap();

    let path = "/tmp/test_phf_integration_persist.bin";
    original.save_to_file(path).unwrap();
    let loaded: PhfTable<String> = PhfTable::load_from_file(path).unwrap();

    assert_eq!(loaded.g(), original.g());
    assert_eq!(loaded.values(), original.values());
    for i in [0, 100, 500, 999] {
        let key = format!("persist-{i}");
        assert_eq!(loaded.get(&key).unwrap(), original.get(&key).unwrap());
    }

    std::fs::remove_file(path).ok();
}

#[test]
fn json_roundtrip_matches_original_artifact_shape() {
    let table = PhfTable::from_entries(vec![
        ("cat".to_string(), "1".to_string()),
        ("dog".to_string(), "2".to_string()),
        ("emu".to_string(), "3".to_string()),
    ])
    .unwrap();

    let json = table.to_json().unwrap();
    assert!(json.contains("\"G\""));
    assert!(json.contains("\"V\""));

    let restored: PhfTable<String> = PhfTable::from_json(&json).unwrap();
    assert_eq!(restored.get("cat").unwrap(), "1");
    assert_eq!(restored.get("dog").unwrap(), "2");
    assert_eq!(restored.get("emu").unwrap(), "3");
}

#[test]
fn truncated_file_rejected() {
    let path = "/tmp/test_phf_integration_truncated.bin";
    let table = PhfTable::from_entries(vec![("k".to_string(), "v".to_string())]).unwrap();
    table.save_to_file(path).unwrap();

    let content = std::fs::read(path).unwrap();
    std::fs::write(path, &content[..content.len() / 2]).unwrap();

    let result: Result<PhfTable<String>, _> = PhfTable::load_from_file(path);
    assert!(result.is_err());

    std::fs::remove_file(path).ok();
}

// ============================================================================
// FILTER + TABLE COMPOSITION
// ============================================================================

#[test]
fn bloom_gated_lookups_reject_most_absent_keys() {
    let keys: Vec<String> = (0..1000).map(|i| format!("/path/{i}")).collect();
    let entries: Vec<(String, String)> = keys
        .iter()
        .map(|k| (k.clone(), format!("ts-{k}")))
        .collect();

    let table = PhfTable::from_entries(entries).unwrap();
    let mut filter = BloomFilter::new(keys.len(), 0.0001);
    for key in &keys {
        filter.add(key);
    }

    // Every real key passes the filter and resolves correctly.
    for key in &keys {
        assert!(filter.contains(key));
        assert_eq!(table.get(key).unwrap(), &format!("ts-{key}"));
    }

    // Absent keys are almost all stopped before touching the table.
    let passed = (0..10_000)
        .filter(|i| filter.contains(&format!("/absent/{i}")))
        .count();
    assert!(passed < 100, "filter passed {passed}/10000 absent keys");
}
