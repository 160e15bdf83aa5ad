use std::io;
use std::sync::Mutex;

use async_trait::async_trait;
use flex_json::{route, DocumentOptions, JsonError, TypedRead, Value};
use flex_json_config::{ConfigFile, FileStorage, Storage};
use serde_json::json;

/// In-memory storage that counts writes.
#[derive(Default)]
struct MemoryStorage {
    bytes: Mutex<Option<Vec<u8>>>,
    writes: Mutex<usize>,
}

impl MemoryStorage {
    fn with_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: Mutex::new(Some(bytes.to_vec())),
            writes: Mutex::new(0),
        }
    }

    fn exists_now(&self) -> bool {
        self.bytes.lock().unwrap().is_some()
    }

    fn read_now(&self) -> io::Result<Vec<u8>> {
        self.bytes
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }

    fn write_now(&self, bytes: &[u8]) {
        *self.bytes.lock().unwrap() = Some(bytes.to_vec());
        *self.writes.lock().unwrap() += 1;
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn exists(&self) -> io::Result<bool> {
        Ok(self.exists_now())
    }

    async fn read(&self) -> io::Result<Vec<u8>> {
        self.read_now()
    }

    async fn write(&self, bytes: &[u8]) -> io::Result<()> {
        self.write_now(bytes);
        Ok(())
    }

    fn exists_sync(&self) -> io::Result<bool> {
        Ok(self.exists_now())
    }

    fn read_sync(&self) -> io::Result<Vec<u8>> {
        self.read_now()
    }

    fn write_sync(&self, bytes: &[u8]) -> io::Result<()> {
        self.write_now(bytes);
        Ok(())
    }
}

/// Storage whose every operation fails.
struct BrokenStorage;

#[async_trait]
impl Storage for BrokenStorage {
    async fn exists(&self) -> io::Result<bool> {
        Err(io::Error::from(io::ErrorKind::PermissionDenied))
    }

    async fn read(&self) -> io::Result<Vec<u8>> {
        Err(io::Error::from(io::ErrorKind::PermissionDenied))
    }

    async fn write(&self, _bytes: &[u8]) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::PermissionDenied))
    }

    fn exists_sync(&self) -> io::Result<bool> {
        Err(io::Error::from(io::ErrorKind::PermissionDenied))
    }

    fn read_sync(&self) -> io::Result<Vec<u8>> {
        Err(io::Error::from(io::ErrorKind::PermissionDenied))
    }

    fn write_sync(&self, _bytes: &[u8]) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::PermissionDenied))
    }
}

#[tokio::test]
async fn load_creates_missing_file_from_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let config = ConfigFile::new(
        Some(path.clone()),
        json!({"name": "app", "port": 8080}),
        DocumentOptions::default(),
    )
    .unwrap();

    config.load().await.unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text, "{\n    \"name\": \"app\",\n    \"port\": 8080\n}");
    assert_eq!(config.get("port").get_as_number().unwrap(), 8080.0);
}

#[tokio::test]
async fn load_replaces_data_with_stored_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"port": 9000, "extra": [true]}"#).unwrap();

    let config =
        ConfigFile::new(Some(path), json!({"port": 8080}), DocumentOptions::default()).unwrap();
    config.load().await.unwrap();

    assert_eq!(config.get("port").get_as_number().unwrap(), 9000.0);
    assert!(config.get(route!["extra", 0]).get_as_boolean().unwrap());
}

#[tokio::test]
async fn malformed_data_leaves_document_unchanged() {
    let storage = MemoryStorage::with_bytes(b"{\"port\": ");
    let config = ConfigFile::with_storage(
        Some(Box::new(storage)),
        json!({"port": 8080}),
        DocumentOptions::default(),
    )
    .unwrap();
    config.set("port", 1).unwrap();

    config.load().await.unwrap();

    assert_eq!(config.data(), Value::from(json!({"port": 1})));
}

#[test]
fn load_sync_writes_before_reading_missing_resource() {
    let config = ConfigFile::with_storage(
        Some(Box::new(MemoryStorage::default())),
        json!({"a": 1}),
        DocumentOptions::default(),
    )
    .unwrap();
    config.set("a", 2).unwrap();

    config.load_sync().unwrap();

    assert_eq!(config.data(), Value::from(json!({"a": 2})));
    assert!(config.storage().unwrap().exists_sync().unwrap());
}

#[tokio::test]
async fn save_then_load_roundtrip_compact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let writer = ConfigFile::new(Some(path.clone()), json!({}), DocumentOptions::default()).unwrap();
    writer.set(route!["servers", 0, "host"], "a.example").unwrap();
    writer.save(true).await.unwrap();
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        r#"{"servers":[{"host":"a.example"}]}"#
    );

    let reader = ConfigFile::new(Some(path), json!({}), DocumentOptions::default()).unwrap();
    reader.load_sync().unwrap();
    assert_eq!(
        reader.get(route!["servers", 0, "host"]).get_as_string().unwrap(),
        "a.example"
    );
}

#[tokio::test]
async fn readonly_config_loads_but_rejects_edits() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"mode": "stored"}"#).unwrap();

    let options = DocumentOptions::new().with_readonly(true);
    let config = ConfigFile::new(Some(path), json!({"mode": "default"}), options).unwrap();
    config.load().await.unwrap();

    assert_eq!(config.get("mode").get_as_string().unwrap(), "stored");
    assert!(matches!(config.set("mode", "x"), Err(JsonError::EditReadonly)));
    assert!(matches!(config.reset_data(), Err(JsonError::EditReadonly)));
}

#[tokio::test]
async fn io_failures_propagate() {
    let config = ConfigFile::with_storage(
        Some(Box::new(BrokenStorage)),
        json!({}),
        DocumentOptions::default(),
    )
    .unwrap();
    assert!(matches!(config.load().await, Err(JsonError::Io(_))));
    assert!(matches!(config.save_sync(false), Err(JsonError::Io(_))));
}

#[test]
fn file_storage_exposes_path() {
    let storage = FileStorage::new("/tmp/some.json");
    assert_eq!(storage.path().to_str(), Some("/tmp/some.json"));
}
