//! Flat, fully-qualified type lookup over a [`DescriptorSet`].

use crate::model::{DescriptorSet, EnumDescriptor, MessageDescriptor};
use std::collections::HashMap;

/// Fully-qualified message and enum names → declarations.
///
/// Keys never carry a leading `.`; use [`TypeIndex::message`] /
/// [`TypeIndex::enum_type`] with references exactly as they appear in a
/// descriptor and the separator is stripped for you.
#[derive(Debug, Default)]
pub struct TypeIndex<'a> {
    messages: HashMap<String, &'a MessageDescriptor>,
    enums: HashMap<String, &'a EnumDescriptor>,
}

impl<'a> TypeIndex<'a> {
    pub fn build(set: &'a DescriptorSet) -> Self {
        let mut index = TypeIndex::default();
        for file in &set.files {
            for m in &file.messages {
                index.index_message(&file.package, m);
            }
            for e in &file.enums {
                index
                    .enums
                    .insert(qualify_type_name(&file.package, &e.name), e);
            }
        }
        index
    }

    fn index_message(&mut self, prefix: &str, m: &'a MessageDescriptor) {
        let fqn = qualify_type_name(prefix, &m.name);
        for e in &m.nested_enums {
            self.enums.insert(qualify_type_name(&fqn, &e.name), e);
        }
        for nested in &m.nested_messages {
            self.index_message(&fqn, nested);
        }
        self.messages.insert(fqn, m);
    }

    pub fn message(&self, reference: &str) -> Option<&'a MessageDescriptor> {
        self.messages.get(strip_leading_separator(reference)).copied()
    }

    pub fn enum_type(&self, reference: &str) -> Option<&'a EnumDescriptor> {
        self.enums.get(strip_leading_separator(reference)).copied()
    }

    /// Fully-qualified message names, sorted.
    pub fn message_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.messages.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// `prefix.name`, or just `name` when the prefix (package) is empty.
pub fn qualify_type_name(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

/// Drops exactly one leading `.` (descriptor references are written `.pkg.Type`).
pub fn strip_leading_separator(reference: &str) -> &str {
    reference.strip_prefix('.').unwrap_or(reference)
}
