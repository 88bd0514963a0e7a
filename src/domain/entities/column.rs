use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An entity record as held by the record cache: a JSON object of attributes.
pub type Record = Map<String, Value>;

/// Widget-facing column options. `name` is the key a cell is stored under in
/// each row; everything else is passed to the grid untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnOptions {
    pub name: String,
    pub data: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ColumnOptions {
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            data: name.clone(),
            name,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Stable identifier and the attribute read from each record.
    pub label: String,
    pub options: ColumnOptions,
}

impl ColumnDescriptor {
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            options: ColumnOptions::named(label.clone()),
            label,
        }
    }

    pub fn with_options(label: impl Into<String>, options: ColumnOptions) -> Self {
        Self {
            label: label.into(),
            options,
        }
    }

    pub fn output_key(&self) -> &str {
        &self.options.name
    }
}

/// One display row. Keys are column output keys in descriptor order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(pub Map<String, Value>);

impl Row {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}
