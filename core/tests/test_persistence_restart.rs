use msgmap_core::{Identifier, MessageStore, StoreKind};

#[test]
fn test_records_survive_new_handle() {
    let dir = tempfile::tempdir().unwrap();

    // First handle: record two invoices
    {
        let store = MessageStore::in_dir(dir.path(), StoreKind::Invoice);
        store.upsert("inv-2024-001", 1201, -1004900809502_i64).unwrap();
        store.upsert("inv-2024-002", 1202, -1004900809502_i64).unwrap();
        assert_eq!(store.len(), 2);
    }

    // Second handle on the same directory: both are still there
    {
        let store = MessageStore::in_dir(dir.path(), StoreKind::Invoice);
        assert_eq!(store.len(), 2);
        let record = store.get("inv-2024-002").unwrap();
        assert_eq!(record.message_id, Identifier::Number(1202));
        assert_eq!(
            record.message_link(),
            Some("https://t.me/c/4900809502/1202".to_string())
        );

        store.remove("inv-2024-001").unwrap();
    }

    // Third handle sees the removal
    {
        let store = MessageStore::open(dir.path().join("messages.json"));
        assert!(store.get("inv-2024-001").is_none());
        assert_eq!(store.len(), 1);
    }
}

#[test]
fn test_reads_file_written_by_another_writer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("messages.json");

    // Offset-less timestamp, string ids, non-ASCII key
    std::fs::write(
        &path,
        r#"{
  "Rechnung Größe 7": {
    "message_id": "88",
    "chat_id": "-1001234567890",
    "timestamp": "2024-03-01T09:15:00.123456"
  },
  "inv-9": {
    "message_id": 9,
    "chat_id": 99,
    "timestamp": "2024-03-01T10:00:00.000Z"
  }
}"#,
    )
    .unwrap();

    let store = MessageStore::open(&path);
    let map = store.load_all();
    assert_eq!(map.len(), 2);

    let umlaut = &map["Rechnung Größe 7"];
    assert_eq!(umlaut.message_id, Identifier::Text("88".to_string()));
    assert_eq!(umlaut.chat_id, Identifier::Text("-1001234567890".to_string()));
    assert!(umlaut.parsed_timestamp().is_some());

    // Rewriting keeps the other entry's values exactly
    store.upsert("inv-10", 10, 99).unwrap();
    let reloaded = store.load_all();
    assert_eq!(reloaded.len(), 3);
    assert_eq!(reloaded["Rechnung Größe 7"], *umlaut);
    assert_eq!(reloaded["inv-9"].timestamp, "2024-03-01T10:00:00.000Z");

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("Rechnung Größe 7"));
}
