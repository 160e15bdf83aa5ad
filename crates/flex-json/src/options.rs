//! Construction-time settings for documents.

/// Capabilities of the value model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonOptions {
    /// Accept [`Value::BigInt`](crate::Value::BigInt) nodes.
    pub allow_bigint: bool,
}

/// Settings fixed when a [`Document`](crate::Document) is created.
///
/// # Example
///
/// ```
/// use flex_json::DocumentOptions;
///
/// let opts = DocumentOptions::new().with_fast_mode(true).with_bigint(true);
/// assert!(opts.fast_mode);
/// assert!(!opts.readonly);
/// assert!(opts.json.allow_bigint);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentOptions {
    /// Reject every mutation on the document and all handles derived from it.
    pub readonly: bool,
    /// Let path handles cache the value they resolved on first read.
    pub fast_mode: bool,
    pub json: JsonOptions,
}

impl DocumentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    pub fn with_fast_mode(mut self, fast_mode: bool) -> Self {
        self.fast_mode = fast_mode;
        self
    }

    pub fn with_bigint(mut self, allow_bigint: bool) -> Self {
        self.json.allow_bigint = allow_bigint;
        self
    }
}
