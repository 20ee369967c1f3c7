use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw values collected by a step form, keyed by field name.
pub type FormValues = BTreeMap<String, Value>;

/// Validated values ready to be merged into [`FormData`].
pub type FormPatch = BTreeMap<String, Value>;

/// Accumulated wizard values across all completed steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData(BTreeMap<String, Value>);

impl FormData {
    pub fn new(values: BTreeMap<String, Value>) -> Self {
        Self(values)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    pub fn get_list(&self, key: &str) -> Vec<String> {
        self.0
            .get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Shallow merge: every key of `patch` replaces the stored value.
    pub fn merge(&mut self, patch: &FormPatch) {
        for (key, value) in patch {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Returns a copy with `patch` applied, leaving `self` untouched.
    pub fn merged_with(&self, patch: &FormPatch) -> FormData {
        let mut preview = self.clone();
        preview.merge(patch);
        preview
    }
}

/// Owner of the wizard's [`FormData`].
#[derive(Debug, Clone)]
pub struct FormStore {
    data: FormData,
    defaults: FormData,
}

impl FormStore {
    pub fn new(defaults: FormData) -> Self {
        Self {
            data: defaults.clone(),
            defaults,
        }
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    pub fn defaults(&self) -> &FormData {
        &self.defaults
    }

    pub fn set_form_data(&mut self, patch: &FormPatch) {
        self.data.merge(patch);
    }

    pub fn reset(&mut self) {
        self.data = self.defaults.clone();
    }

    pub fn is_default(&self) -> bool {
        self.data == self.defaults
    }
}
