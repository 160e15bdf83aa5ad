//! Zero-copy readonly cursor.
//!
//! A [`JsonReader`] borrows the tree it walks, so it cannot outlive the
//! borrow it was created from (see [`PathHandle::reader`](crate::PathHandle::reader)).
//! It never caches and never writes.

use crate::error::{JsonError, JsonResult};
use crate::guards::TypedRead;
use crate::navigator::read_value;
use crate::options::JsonOptions;
use crate::route::{PathStep, Route};
use crate::value::Value;

#[derive(Debug, Clone, Copy)]
pub struct JsonReader<'a> {
    options: JsonOptions,
    data: Option<&'a Value>,
}

impl<'a> JsonReader<'a> {
    pub fn new(data: Option<&'a Value>, options: JsonOptions) -> Self {
        Self { options, data }
    }

    /// Reader over a whole tree.
    ///
    /// ```
    /// use flex_json::{route, JsonOptions, JsonReader, TypedRead, Value};
    /// use serde_json::json;
    ///
    /// let value = Value::from(json!({"a": [{"b": "x"}]}));
    /// let reader = JsonReader::from_value(&value, JsonOptions::default());
    /// assert_eq!(reader.get(route!["a", 0, "b"]).get_as_string().unwrap(), "x");
    /// assert!(!reader.has(route!["a", 0, "b", "c"]));
    /// ```
    pub fn from_value(value: &'a Value, options: JsonOptions) -> Self {
        Self::new(Some(value), options)
    }

    pub fn options(&self) -> JsonOptions {
        self.options
    }

    pub fn get(&self, route: impl Into<Route>) -> JsonReader<'a> {
        let route = route.into();
        JsonReader::new(
            self.data.and_then(|node| read_value(node, route.steps())),
            self.options,
        )
    }

    pub fn get_value(&self) -> Option<&'a Value> {
        self.data
    }

    pub fn has(&self, route: impl Into<Route>) -> bool {
        self.get(route).exists()
    }

    pub fn exists(&self) -> bool {
        self.data.is_some()
    }

    pub fn map_entry<T>(
        &self,
        mut f: impl FnMut(PathStep, JsonReader<'a>) -> T,
    ) -> JsonResult<Vec<T>> {
        Ok(self.entries()?.map(|(step, item)| f(step, item)).collect())
    }

    pub fn map_array<T>(
        &self,
        mut f: impl FnMut(usize, JsonReader<'a>) -> T,
    ) -> JsonResult<Vec<T>> {
        Ok(self.array_items()?.map(|(index, item)| f(index, item)).collect())
    }

    pub fn map_object<T>(
        &self,
        mut f: impl FnMut(&'a str, JsonReader<'a>) -> T,
    ) -> JsonResult<Vec<T>> {
        Ok(self.object_items()?.map(|(key, item)| f(key, item)).collect())
    }

    pub fn find_entry(
        &self,
        mut predicate: impl FnMut(&PathStep, &JsonReader<'a>) -> bool,
    ) -> JsonResult<Option<(PathStep, JsonReader<'a>)>> {
        Ok(self.entries()?.find(|(step, item)| predicate(step, item)))
    }

    pub fn find_array(
        &self,
        mut predicate: impl FnMut(usize, &JsonReader<'a>) -> bool,
    ) -> JsonResult<Option<(usize, JsonReader<'a>)>> {
        Ok(self.array_items()?.find(|(index, item)| predicate(*index, item)))
    }

    pub fn find_object(
        &self,
        mut predicate: impl FnMut(&str, &JsonReader<'a>) -> bool,
    ) -> JsonResult<Option<(&'a str, JsonReader<'a>)>> {
        Ok(self.object_items()?.find(|(key, item)| predicate(*key, item)))
    }

    pub fn filter_entry(
        &self,
        mut predicate: impl FnMut(&PathStep, &JsonReader<'a>) -> bool,
    ) -> JsonResult<Vec<(PathStep, JsonReader<'a>)>> {
        Ok(self
            .entries()?
            .filter(|(step, item)| predicate(step, item))
            .collect())
    }

    pub fn filter_array(
        &self,
        mut predicate: impl FnMut(usize, &JsonReader<'a>) -> bool,
    ) -> JsonResult<Vec<(usize, JsonReader<'a>)>> {
        Ok(self
            .array_items()?
            .filter(|(index, item)| predicate(*index, item))
            .collect())
    }

    pub fn filter_object(
        &self,
        mut predicate: impl FnMut(&str, &JsonReader<'a>) -> bool,
    ) -> JsonResult<Vec<(&'a str, JsonReader<'a>)>> {
        Ok(self
            .object_items()?
            .filter(|(key, item)| predicate(*key, item))
            .collect())
    }

    pub fn for_each_entry(&self, mut f: impl FnMut(PathStep, JsonReader<'a>)) -> JsonResult<()> {
        self.entries()?.for_each(|(step, item)| f(step, item));
        Ok(())
    }

    pub fn for_each_array(&self, mut f: impl FnMut(usize, JsonReader<'a>)) -> JsonResult<()> {
        self.array_items()?.for_each(|(index, item)| f(index, item));
        Ok(())
    }

    pub fn for_each_object(&self, mut f: impl FnMut(&'a str, JsonReader<'a>)) -> JsonResult<()> {
        self.object_items()?.for_each(|(key, item)| f(key, item));
        Ok(())
    }

    fn wrap(&self, data: &'a Value) -> JsonReader<'a> {
        JsonReader::new(Some(data), self.options)
    }

    fn entries(&self) -> JsonResult<impl Iterator<Item = (PathStep, JsonReader<'a>)> + 'a> {
        let data = self.data;
        let entries: Vec<_> = match data {
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(index, item)| (PathStep::Index(index), self.wrap(item)))
                .collect(),
            Some(Value::Object(map)) => map
                .iter()
                .map(|(key, item)| (PathStep::Key(key.clone()), self.wrap(item)))
                .collect(),
            other => return Err(JsonError::invalid_type("object", other)),
        };
        Ok(entries.into_iter())
    }

    fn array_items(&self) -> JsonResult<impl Iterator<Item = (usize, JsonReader<'a>)> + 'a> {
        let data = self.data;
        match data {
            Some(Value::Array(items)) => {
                let reader = *self;
                Ok(items
                    .iter()
                    .enumerate()
                    .map(move |(index, item)| (index, reader.wrap(item))))
            }
            other => Err(JsonError::invalid_type("array", other)),
        }
    }

    fn object_items(&self) -> JsonResult<impl Iterator<Item = (&'a str, JsonReader<'a>)> + 'a> {
        let data = self.data;
        match data {
            Some(Value::Object(map)) => {
                let reader = *self;
                Ok(map
                    .iter()
                    .map(move |(key, item)| (key.as_str(), reader.wrap(item))))
            }
            other => Err(JsonError::invalid_type("object", other)),
        }
    }
}

impl TypedRead for JsonReader<'_> {
    fn with_value<R>(&self, f: impl FnOnce(Option<&Value>) -> R) -> R {
        f(self.data)
    }

    fn json_options(&self) -> JsonOptions {
        self.options
    }
}
