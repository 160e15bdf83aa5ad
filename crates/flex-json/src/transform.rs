//! Value-to-value transformations and chains of them.

use std::fmt;

use crate::error::JsonResult;
use crate::value::Value;

/// Turns one value into another.
///
/// Closures `Fn(Value) -> JsonResult<Value>` are transformers too.
pub trait JsonTransformer {
    fn transform(&self, value: Value) -> JsonResult<Value>;
}

impl<F> JsonTransformer for F
where
    F: Fn(Value) -> JsonResult<Value>,
{
    fn transform(&self, value: Value) -> JsonResult<Value> {
        self(value)
    }
}

/// Applies its transformers in insertion order, feeding each one the output
/// of the previous. An empty chain returns its input.
///
/// # Example
///
/// ```
/// use flex_json::transform::TransformerChain;
/// use flex_json::{JsonResult, JsonTransformer, Value};
///
/// let chain = TransformerChain::new()
///     .then(|v: Value| -> JsonResult<Value> { Ok(Value::Array(vec![v])) })
///     .then(|v: Value| -> JsonResult<Value> { Ok(Value::Array(vec![v])) });
/// assert_eq!(chain.transform(Value::from(1)).unwrap().to_string(), "[[1]]");
/// ```
#[derive(Default)]
pub struct TransformerChain {
    transformers: Vec<Box<dyn JsonTransformer>>,
}

impl TransformerChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, transformer: impl JsonTransformer + 'static) -> Self {
        self.transformers.push(Box::new(transformer));
        self
    }

    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }
}

impl fmt::Debug for TransformerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformerChain")
            .field("len", &self.transformers.len())
            .finish()
    }
}

impl JsonTransformer for TransformerChain {
    fn transform(&self, value: Value) -> JsonResult<Value> {
        self.transformers
            .iter()
            .try_fold(value, |current, transformer| transformer.transform(current))
    }
}
