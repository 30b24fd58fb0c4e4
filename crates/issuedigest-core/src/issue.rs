use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;

use log::debug;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ReportLoadError;

/// A single finding from a policy report, kept exactly as it was read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct IssueRecord {
    fields: Map<String, Value>,
}

/// Ordered issue records loaded from one report document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct IssueCollection {
    records: Vec<IssueRecord>,
}

/// The `name` value an issue is grouped by.
///
/// String names and other JSON values never compare equal, so `"42"` and
/// `42` land in different groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum IssueKind {
    /// `name` absent or null.
    Missing,
    Named(String),
    Other(Value),
}

impl IssueKind {
    fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Missing,
            Some(Value::String(name)) => Self::Named(name.clone()),
            Some(other) => Self::Other(other.clone()),
        }
    }

    pub fn is_named(&self, name: &str) -> bool {
        matches!(self, Self::Named(own) if own == name)
    }
}

impl Hash for IssueKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Missing => {}
            Self::Named(name) => name.hash(state),
            Self::Other(value) => value.to_string().hash(state),
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "(none)"),
            Self::Named(name) => write!(f, "{name}"),
            Self::Other(value) => write!(f, "{value} ({})", json_type_name(value)),
        }
    }
}

impl IssueRecord {
    fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn kind(&self) -> IssueKind {
        IssueKind::from_value(self.fields.get("name"))
    }

    pub fn detail(&self) -> Option<Cow<'_, str>> {
        match self.fields.get("detail")? {
            Value::Null => None,
            Value::String(text) => Some(Cow::Borrowed(text.as_str())),
            other => Some(Cow::Owned(other.to_string())),
        }
    }

    /// `metadata.name`, only when it is a string.
    pub fn metadata_name(&self) -> Option<&str> {
        self.fields
            .get("metadata")?
            .as_object()?
            .get("name")?
            .as_str()
    }
}

impl IssueCollection {
    pub fn load(path: &Path) -> Result<Self, ReportLoadError> {
        let contents = fs::read_to_string(path).map_err(|source| ReportLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let collection = Self::from_json_str(&contents)?;
        if collection.is_empty() {
            debug!("report {} contains no issues", path.display());
        } else {
            debug!(
                "loaded {} issues from {}",
                collection.len(),
                path.display()
            );
        }
        Ok(collection)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, ReportLoadError> {
        let document: Value = serde_json::from_str(contents)?;
        let items = match document {
            Value::Array(items) => items,
            other => {
                return Err(ReportLoadError::NotAnArray {
                    found: json_type_name(&other),
                })
            }
        };

        let records = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(fields) => Ok(IssueRecord::new(fields)),
                _ => Err(ReportLoadError::NotAnObject { index }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IssueRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a IssueCollection {
    type Item = &'a IssueRecord;
    type IntoIter = std::slice::Iter<'a, IssueRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
