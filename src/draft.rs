// ABOUTME: Working copy of a record that is being created or edited
// ABOUTME: Field access by dotted path plus ordered list editing with step renumbering

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::DraftError;
use crate::remote::models::Metadata;
use crate::resource::Resource;

/// Describes an ordered list inside a draft that the user can grow and shrink.
///
/// When `sequence_key` is set, every item is an object carrying its 1-indexed
/// position under that key, and the positions are rewritten after each change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayField {
    pub path: &'static str,
    pub sequence_key: Option<&'static str>,
}

impl ArrayField {
    pub const fn list(path: &'static str) -> Self {
        Self {
            path,
            sequence_key: None,
        }
    }

    pub const fn sequence(path: &'static str, key: &'static str) -> Self {
        Self {
            path,
            sequence_key: Some(key),
        }
    }
}

/// Partial record held by the controller. Serialized as-is for create/update.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Draft(Map<String, Value>);

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a draft from a JSON object; anything else yields an empty draft.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    /// Deep copy of `record` without the server-assigned metadata. Sequences
    /// are renumbered, so gaps left by the backend do not survive into the draft.
    pub fn from_record<R: Resource>(record: &R) -> Result<Self, serde_json::Error> {
        let mut draft = Self::from_value(serde_json::to_value(record)?);
        for key in Metadata::KEYS {
            draft.0.remove(key);
        }
        for field in R::ARRAY_FIELDS {
            draft.renumber(field);
        }
        Ok(draft)
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.0.get(segments.next()?)?;
        for segment in segments {
            current = current.get(segment)?;
        }
        Some(current)
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Sets a field, creating intermediate objects along the path.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<(), DraftError> {
        let (parent, key) = self.parent_mut(path)?;
        parent.insert(key.to_string(), value.into());
        Ok(())
    }

    /// Sets `key` on the object at `index` of the list at `path`.
    pub fn set_item_field(
        &mut self,
        path: &str,
        index: usize,
        key: &str,
        value: impl Into<Value>,
    ) -> Result<(), DraftError> {
        let items = self.array_mut(path)?;
        let len = items.len();
        let item = items.get_mut(index).ok_or_else(|| DraftError::IndexOutOfRange {
            field: path.to_string(),
            index,
            len,
        })?;
        let fields = item
            .as_object_mut()
            .ok_or_else(|| DraftError::NotAnObject(format!("{}.{}", path, index)))?;
        fields.insert(key.to_string(), value.into());
        Ok(())
    }

    /// Rewrites the positions of a sequence field. Plain lists and missing
    /// paths are left alone.
    pub fn renumber(&mut self, field: &ArrayField) {
        let Some(key) = field.sequence_key else {
            return;
        };
        if let Some(Value::Array(items)) = self.get_mut(field.path) {
            renumber(items, key);
        }
    }

    pub fn array(&self, path: &str) -> Option<&Vec<Value>> {
        self.get(path).and_then(Value::as_array)
    }

    /// Appends an item. Text items are trimmed and blank ones are ignored,
    /// in which case `Ok(false)` is returned.
    pub fn push(&mut self, field: &ArrayField, value: Value) -> Result<bool, DraftError> {
        let mut value = match value {
            Value::String(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Ok(false);
                }
                Value::String(trimmed.to_string())
            }
            other => other,
        };

        let items = self.array_mut(field.path)?;
        if let (Some(key), Value::Object(item)) = (field.sequence_key, &mut value) {
            item.insert(key.to_string(), Value::from(items.len() + 1));
        }
        items.push(value);
        Ok(true)
    }

    /// Removes the item at `index` and renumbers the rest when the list is a sequence.
    pub fn remove(&mut self, field: &ArrayField, index: usize) -> Result<Value, DraftError> {
        let items = self.array_mut(field.path)?;
        if index >= items.len() {
            return Err(DraftError::IndexOutOfRange {
                field: field.path.to_string(),
                index,
                len: items.len(),
            });
        }

        let removed = items.remove(index);
        if let Some(key) = field.sequence_key {
            renumber(items, key);
        }
        Ok(removed)
    }

    fn get_mut(&mut self, path: &str) -> Option<&mut Value> {
        let mut segments = path.split('.');
        let mut current = self.0.get_mut(segments.next()?)?;
        for segment in segments {
            current = current.get_mut(segment)?;
        }
        Some(current)
    }

    fn array_mut(&mut self, path: &str) -> Result<&mut Vec<Value>, DraftError> {
        let (parent, key) = self.parent_mut(path)?;
        parent
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()))
            .as_array_mut()
            .ok_or_else(|| DraftError::NotAnArray(path.to_string()))
    }

    fn parent_mut<'p>(
        &mut self,
        path: &'p str,
    ) -> Result<(&mut Map<String, Value>, &'p str), DraftError> {
        let segments: Vec<&str> = path.split('.').collect();
        let (key, parents) = match segments.split_last() {
            Some(split) => split,
            None => return Err(DraftError::NotAnObject(path.to_string())),
        };

        let mut current = &mut self.0;
        for (depth, segment) in parents.iter().enumerate() {
            let next = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            current = match next.as_object_mut() {
                Some(map) => map,
                None => return Err(DraftError::NotAnObject(parents[..=depth].join("."))),
            };
        }
        Ok((current, *key))
    }
}

fn renumber(items: &mut [Value], key: &str) {
    for (position, item) in items.iter_mut().enumerate() {
        if let Some(fields) = item.as_object_mut() {
            fields.insert(key.to_string(), Value::from(position + 1));
        }
    }
}
