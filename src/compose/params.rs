//! Request parameters.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{RemusError, Result};

/// Value given to the placeholder `transcription-fantom5-range` field. The
/// promoter category takes no range mode but still lists the parameter.
pub const TRANSCRIPTION_RANGE_PLACEHOLDER: &str = "=-=-=-=";

/// Text value of an enabled `*-used` checkbox.
pub const CHECKBOX_ON: &str = "on";

/// A raw parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    List(Vec<String>),
}

impl ParamValue {
    /// Whether this value counts as supplied: non-empty text, or a list
    /// with at least one entry. `"0"` is present.
    pub fn is_present(&self) -> bool {
        match self {
            ParamValue::Text(text) => !text.is_empty(),
            ParamValue::List(items) => !items.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(text) => Some(text.as_str()),
            ParamValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ParamValue::List(items) => Some(items.as_slice()),
            ParamValue::Text(_) => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(text: &str) -> Self {
        ParamValue::Text(text.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(text: String) -> Self {
        ParamValue::Text(text)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(items: Vec<String>) -> Self {
        ParamValue::List(items)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(items: Vec<&str>) -> Self {
        ParamValue::List(items.into_iter().map(String::from).collect())
    }
}

/// Shape accepted from TOML request files.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawParam {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
    List(Vec<String>),
}

impl<'de> Deserialize<'de> for ParamValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match RawParam::deserialize(deserializer)? {
            RawParam::Text(text) => ParamValue::Text(text),
            RawParam::Integer(n) => ParamValue::Text(n.to_string()),
            RawParam::Float(x) => ParamValue::Text(x.to_string()),
            RawParam::Flag(true) => ParamValue::Text(CHECKBOX_ON.to_string()),
            RawParam::Flag(false) => ParamValue::Text(String::new()),
            RawParam::List(items) => ParamValue::List(items),
        })
    }
}

/// Parameters of one composition request, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ParameterBundle {
    values: BTreeMap<String, ParamValue>,
}

impl ParameterBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a checkbox-style flag: `on` when enabled, absent otherwise.
    pub fn set_flag(&mut self, name: impl Into<String>, enabled: bool) {
        let name = name.into();
        if enabled {
            self.values.insert(name, ParamValue::from(CHECKBOX_ON));
        } else {
            self.values.remove(&name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        self.values.remove(name)
    }

    /// Values of `names`, in the order given.
    pub fn extract<'b>(&'b self, names: &[&str]) -> Vec<Option<&'b ParamValue>> {
        names.iter().map(|name| self.values.get(*name)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Parameters that passed the gate, in declared order.
#[derive(Debug, Clone, Copy)]
pub struct GatedParams<'b> {
    entries: &'b [(&'static str, &'b ParamValue)],
}

impl<'b> GatedParams<'b> {
    pub fn new(entries: &'b [(&'static str, &'b ParamValue)]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &'b [(&'static str, &'b ParamValue)] {
        self.entries
    }

    fn value(&self, name: &str) -> Result<&'b ParamValue> {
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
            .ok_or_else(|| RemusError::invalid_parameter(name, "", "not declared for this category"))
    }

    /// A text parameter.
    pub fn text(&self, name: &str) -> Result<&'b str> {
        match self.value(name)? {
            ParamValue::Text(text) => Ok(text.as_str()),
            ParamValue::List(items) => Err(RemusError::invalid_parameter(
                name,
                items.join(","),
                "expected a single value",
            )),
        }
    }

    /// A list parameter. A single text value counts as a one-item list.
    pub fn list(&self, name: &str) -> Result<Vec<String>> {
        Ok(match self.value(name)? {
            ParamValue::List(items) => items.clone(),
            ParamValue::Text(text) => vec![text.clone()],
        })
    }

    /// A non-negative, finite decimal number.
    pub fn number(&self, name: &str) -> Result<f64> {
        let text = self.text(name)?;
        let value: f64 = text
            .trim()
            .parse()
            .map_err(|_| RemusError::invalid_parameter(name, text, "not a number"))?;

        if !value.is_finite() || value < 0.0 {
            return Err(RemusError::invalid_parameter(
                name,
                text,
                "distance must be a non-negative finite number",
            ));
        }
        Ok(value)
    }
}
