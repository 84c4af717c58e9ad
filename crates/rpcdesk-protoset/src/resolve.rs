//! Request schema resolution: method name → ordered input fields.

use crate::index::TypeIndex;
use crate::model::{DescriptorSet, MessageDescriptor, MethodDescriptor};

/// One input of a request form.
///
/// `options` is empty for every non-enum field, and also for an enum field
/// whose enum could not be found in the set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    pub name: String,
    pub options: Vec<String>,
}

impl ResolvedField {
    pub fn new(name: impl Into<String>, options: Vec<String>) -> Self {
        ResolvedField {
            name: name.into(),
            options,
        }
    }
}

/// A call name split into `package`, `service` and `method`.
///
/// The package is everything before the last two dot-separated segments and
/// may be empty, in which case any file's package matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallName<'a> {
    pub package: String,
    pub service: &'a str,
    pub method: &'a str,
}

impl<'a> CallName<'a> {
    /// `None` unless the name has at least `Service.Method`.
    pub fn parse(call_name: &'a str) -> Option<Self> {
        let parts: Vec<&str> = call_name.split('.').collect();
        if parts.len() < 2 {
            return None;
        }
        let method = parts[parts.len() - 1];
        let service = parts[parts.len() - 2];
        let package = parts[..parts.len() - 2].join(".");
        Some(CallName {
            package,
            service,
            method,
        })
    }
}

/// First method matching `call` in file → service → method order.
pub fn find_method<'s>(set: &'s DescriptorSet, call: &CallName<'_>) -> Option<&'s MethodDescriptor> {
    set.files
        .iter()
        .filter(|file| call.package.is_empty() || file.package == call.package)
        .flat_map(|file| file.services.iter())
        .filter(|service| service.name == call.service)
        .flat_map(|service| service.methods.iter())
        .find(|method| method.name == call.method)
}

/// The input message of `call_name`, if the method and its type can be found.
pub fn request_message<'s>(
    set: &'s DescriptorSet,
    index: &TypeIndex<'s>,
    call_name: &str,
) -> Option<&'s MessageDescriptor> {
    let call = CallName::parse(call_name)?;
    let method = find_method(set, &call)?;
    index.message(&method.input_type)
}

/// Ordered request fields of `call_name`, enum fields annotated with their
/// symbolic values.
///
/// An empty result means "nothing to fill in": the name is not
/// `Service.Method`-shaped, no method matches, the input type is missing
/// from the set, or the request message really has no fields.
pub fn resolve_request_fields(set: &DescriptorSet, call_name: &str) -> Vec<ResolvedField> {
    let index = TypeIndex::build(set);
    let Some(message) = request_message(set, &index, call_name) else {
        tracing::debug!(call_name, "no request message resolved");
        return Vec::new();
    };

    message
        .fields
        .iter()
        .map(|field| {
            let options = match (&field.type_name, field.is_enum()) {
                (Some(type_name), true) => index
                    .enum_type(type_name)
                    .map(|e| e.value_names())
                    .unwrap_or_default(),
                _ => Vec::new(),
            };
            ResolvedField::new(field.name.clone(), options)
        })
        .collect()
}
