//! Request body form built from a resolved request schema.

use crate::vars::substitute;
use crate::CallError;
use rpcdesk_protoset::ResolvedField;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    /// Legal values for enum fields; empty means free text.
    pub options: Vec<String>,
    pub value: String,
}

/// One entry per request field, in declaration order.
///
/// Every value is sent as a JSON string; grpcurl converts strings to the
/// field's declared type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestBody {
    fields: Vec<FormField>,
}

impl RequestBody {
    pub fn from_fields(fields: &[ResolvedField]) -> Self {
        RequestBody {
            fields: fields
                .iter()
                .map(|f| FormField {
                    name: f.name.clone(),
                    options: f.options.clone(),
                    value: String::new(),
                })
                .collect(),
        }
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// Set a field's value (trimmed). Fails for names not in the form.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), CallError> {
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.name == name)
            .ok_or_else(|| CallError::UnknownField(name.to_string()))?;
        field.value = value.trim().to_string();
        Ok(())
    }

    /// Pre-fill from a previously serialized body (a JSON object).
    ///
    /// Keys that are not fields of this form are ignored, as is a body that
    /// does not parse. Returns how many fields were filled.
    pub fn prefill(&mut self, saved_body: &str) -> usize {
        if saved_body.trim().is_empty() {
            return 0;
        }
        let saved: serde_json::Map<String, serde_json::Value> =
            match serde_json::from_str(saved_body) {
                Ok(map) => map,
                Err(err) => {
                    tracing::debug!(error = %err, "saved body is not a JSON object, skipping prefill");
                    return 0;
                }
            };

        let mut filled = 0;
        for field in &mut self.fields {
            let Some(value) = saved.get(&field.name) else {
                continue;
            };
            field.value = match value {
                serde_json::Value::String(s) => s.trim().to_string(),
                other => other.to_string(),
            };
            filled += 1;
        }
        filled
    }

    /// Substitute `{{name}}` tokens in every value.
    pub fn with_variables(mut self, vars: &BTreeMap<String, String>) -> Self {
        for field in &mut self.fields {
            field.value = substitute(&field.value, vars);
        }
        self
    }

    /// Enum fields whose value is set but not one of the legal symbols.
    pub fn invalid_choices(&self) -> Vec<&FormField> {
        self.fields
            .iter()
            .filter(|f| !f.options.is_empty() && !f.value.is_empty())
            .filter(|f| !f.options.iter().any(|o| *o == f.value))
            .collect()
    }

    /// The `-d` payload: a JSON object in field order, or an empty string
    /// when the request has no fields.
    pub fn to_json_string(&self) -> String {
        if self.fields.is_empty() {
            return String::new();
        }
        // String keys and values always serialize.
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Serialize for RequestBody {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in &self.fields {
            map.serialize_entry(&field.name, &field.value)?;
        }
        map.end()
    }
}
