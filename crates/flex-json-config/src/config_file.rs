use std::ops::Deref;
use std::path::PathBuf;

use flex_json::{Document, DocumentOptions, JsonResult, Value};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::storage::{FileStorage, Storage};

/// A [`Document`] paired with the storage it is loaded from and saved to.
///
/// Without storage, [`load`](ConfigFile::load) and [`save`](ConfigFile::save)
/// do nothing. A config derefs to its document, so reads and writes go
/// through the usual handle API.
///
/// # Example
///
/// ```no_run
/// use flex_json::{DocumentOptions, TypedRead};
/// use flex_json_config::ConfigFile;
/// use serde_json::json;
///
/// # async fn run() -> flex_json::JsonResult<()> {
/// let config = ConfigFile::new(
///     Some("settings.json".into()),
///     json!({"port": 8080}),
///     DocumentOptions::default(),
/// )?;
/// config.load().await?;
/// let port = config.get("port").get_as_number()?;
/// config.set("port", port + 1.0)?;
/// config.save(false).await?;
/// # Ok(())
/// # }
/// ```
pub struct ConfigFile {
    document: Document,
    storage: Option<Box<dyn Storage>>,
    default_config: Value,
}

impl ConfigFile {
    /// Config backed by the file at `path`, or by nothing when `path` is
    /// `None`. The document starts as a copy of `default_config`.
    pub fn new(
        path: Option<PathBuf>,
        default_config: impl Into<Value>,
        options: DocumentOptions,
    ) -> JsonResult<Self> {
        let storage = path.map(|path| Box::new(FileStorage::new(path)) as Box<dyn Storage>);
        Self::with_storage(storage, default_config, options)
    }

    pub fn with_storage(
        storage: Option<Box<dyn Storage>>,
        default_config: impl Into<Value>,
        options: DocumentOptions,
    ) -> JsonResult<Self> {
        let default_config = default_config.into();
        let document = Document::with_options(default_config.clone(), options)?;
        Ok(Self {
            document,
            storage,
            default_config,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn default_config(&self) -> &Value {
        &self.default_config
    }

    pub fn storage(&self) -> Option<&dyn Storage> {
        self.storage.as_deref()
    }

    /// Reads the stored document, creating the resource from the current
    /// data first if it does not exist yet.
    ///
    /// Data that fails to parse is logged and ignored; the in-memory document
    /// is left as it was. Loading ignores the readonly flag.
    pub async fn load(&self) -> JsonResult<&Self> {
        let Some(storage) = self.storage.as_deref() else {
            return Ok(self);
        };
        if !storage.exists().await? {
            tracing::debug!("config storage missing, writing current data");
            self.save(false).await?;
        }
        let bytes = storage.read().await?;
        self.apply_loaded(&bytes)?;
        Ok(self)
    }

    pub fn load_sync(&self) -> JsonResult<&Self> {
        let Some(storage) = self.storage.as_deref() else {
            return Ok(self);
        };
        if !storage.exists_sync()? {
            tracing::debug!("config storage missing, writing current data");
            self.save_sync(false)?;
        }
        let bytes = storage.read_sync()?;
        self.apply_loaded(&bytes)?;
        Ok(self)
    }

    /// Writes the current data as compact JSON, or indented by four spaces
    /// when `compact` is false.
    pub async fn save(&self, compact: bool) -> JsonResult<&Self> {
        let Some(storage) = self.storage.as_deref() else {
            return Ok(self);
        };
        let bytes = self.render(compact)?;
        storage.write(&bytes).await?;
        tracing::debug!(bytes = bytes.len(), compact, "saved config");
        Ok(self)
    }

    pub fn save_sync(&self, compact: bool) -> JsonResult<&Self> {
        let Some(storage) = self.storage.as_deref() else {
            return Ok(self);
        };
        let bytes = self.render(compact)?;
        storage.write_sync(&bytes)?;
        tracing::debug!(bytes = bytes.len(), compact, "saved config");
        Ok(self)
    }

    /// Restores a copy of the default config. Fails on a readonly config.
    pub fn reset_data(&self) -> JsonResult<&Self> {
        self.document.set_data(self.default_config.clone())?;
        tracing::debug!("config reset to defaults");
        Ok(self)
    }

    fn apply_loaded(&self, bytes: &[u8]) -> JsonResult<()> {
        match serde_json::from_slice::<serde_json::Value>(bytes) {
            Ok(parsed) => {
                self.document.install(Value::from(parsed))?;
                tracing::debug!(bytes = bytes.len(), "loaded config");
            }
            Err(error) => {
                tracing::warn!(error = %error, "malformed config data, keeping current value");
            }
        }
        Ok(())
    }

    fn render(&self, compact: bool) -> JsonResult<Vec<u8>> {
        let data = self.document.data();
        if compact {
            return Ok(serde_json::to_vec(&data)?);
        }
        let mut out = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
        data.serialize(&mut serializer)?;
        Ok(out)
    }
}

impl Deref for ConfigFile {
    type Target = Document;

    fn deref(&self) -> &Document {
        &self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_without_storage_load_and_save_are_noops() {
        let config = ConfigFile::new(None, json!({"a": 1}), DocumentOptions::default()).unwrap();
        config.load_sync().unwrap();
        config.save_sync(true).unwrap();
        assert!(config.storage().is_none());
        assert_eq!(config.data(), Value::from(json!({"a": 1})));
    }

    #[test]
    fn test_render_pretty_uses_four_spaces() {
        let config = ConfigFile::new(None, json!({"a": [1]}), DocumentOptions::default()).unwrap();
        let pretty = String::from_utf8(config.render(false).unwrap()).unwrap();
        assert_eq!(pretty, "{\n    \"a\": [\n        1\n    ]\n}");
        let compact = String::from_utf8(config.render(true).unwrap()).unwrap();
        assert_eq!(compact, r#"{"a":[1]}"#);
    }

    #[test]
    fn test_reset_restores_defaults_copy() {
        let config = ConfigFile::new(None, json!({"a": 1}), DocumentOptions::default()).unwrap();
        config.set("a", 5).unwrap();
        config.reset_data().unwrap();
        assert_eq!(config.data(), Value::from(json!({"a": 1})));
        config.set("a", 6).unwrap();
        assert_eq!(config.default_config(), &Value::from(json!({"a": 1})));
    }
}
