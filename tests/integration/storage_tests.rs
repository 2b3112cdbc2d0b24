//! Key-value store integration tests

#[cfg(test)]
mod tests {
    use aitelemetry_selfmon::storage::{KeyValueStore, LocalStore};
    use tempfile::TempDir;

    #[test]
    fn test_local_store_shared_between_handles() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let writer = LocalStore::open(&path).unwrap();
        let reader = LocalStore::open(&path).unwrap();

        writer.set("appInsightsThrottle-0", "2024-5-15.0.0").unwrap();
        assert_eq!(
            reader.get("appInsightsThrottle-0").unwrap().as_deref(),
            Some("2024-5-15.0.0")
        );

        reader.set("appInsightsThrottle-0", "2024-5-16.0.0").unwrap();
        assert_eq!(
            writer.get("appInsightsThrottle-0").unwrap().as_deref(),
            Some("2024-5-16.0.0")
        );

        assert!(writer.remove("appInsightsThrottle-0").unwrap());
        assert_eq!(reader.get("appInsightsThrottle-0").unwrap(), None);
    }

    #[test]
    fn test_local_store_file_is_json_object() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        let store = LocalStore::open(&path).unwrap();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["a"], "1");
        assert_eq!(parsed["b"], "2");
    }
}
