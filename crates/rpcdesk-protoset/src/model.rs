//! Parsed descriptor tree.
//!
//! The wire messages in [`crate::wire`] mirror `descriptor.proto` with every
//! field optional. This module is the shape the rest of the crate works with:
//! absent names become empty strings, packages are trimmed, and every field
//! has a [`FieldKind`] (an absent or unrecognised type tag never fails the
//! parse).

use crate::wire;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorSet {
    pub files: Vec<FileDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileDescriptor {
    /// File path as recorded by the compiler (`foo/bar.proto`), if present.
    pub name: Option<String>,
    /// Trimmed package; empty for the root package.
    pub package: String,
    pub messages: Vec<MessageDescriptor>,
    pub enums: Vec<EnumDescriptor>,
    pub services: Vec<ServiceDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageDescriptor {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
    pub nested_messages: Vec<MessageDescriptor>,
    pub nested_enums: Vec<EnumDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub number: i32,
    pub label: FieldLabel,
    pub kind: FieldKind,
    /// Referenced type for message/enum/group fields, as written in the
    /// descriptor (usually with a leading `.`).
    pub type_name: Option<String>,
}

impl FieldDescriptor {
    pub fn is_enum(&self) -> bool {
        self.kind == FieldKind::Enum
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Double,
    Float,
    Int64,
    Uint64,
    Int32,
    Fixed64,
    Fixed32,
    Bool,
    String,
    Group,
    Message,
    Bytes,
    Uint32,
    Enum,
    Sfixed32,
    Sfixed64,
    Sint32,
    Sint64,
}

impl From<wire::FieldType> for FieldKind {
    fn from(value: wire::FieldType) -> Self {
        use wire::FieldType as T;
        match value {
            T::Double => FieldKind::Double,
            T::Float => FieldKind::Float,
            T::Int64 => FieldKind::Int64,
            T::Uint64 => FieldKind::Uint64,
            T::Int32 => FieldKind::Int32,
            T::Fixed64 => FieldKind::Fixed64,
            T::Fixed32 => FieldKind::Fixed32,
            T::Bool => FieldKind::Bool,
            T::String => FieldKind::String,
            T::Group => FieldKind::Group,
            T::Message => FieldKind::Message,
            T::Bytes => FieldKind::Bytes,
            T::Uint32 => FieldKind::Uint32,
            T::Enum => FieldKind::Enum,
            T::Sfixed32 => FieldKind::Sfixed32,
            T::Sfixed64 => FieldKind::Sfixed64,
            T::Sint32 => FieldKind::Sint32,
            T::Sint64 => FieldKind::Sint64,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FieldLabel {
    #[default]
    Optional,
    Required,
    Repeated,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumDescriptor {
    pub name: String,
    pub values: Vec<EnumValue>,
}

impl EnumDescriptor {
    pub fn value_names(&self) -> Vec<String> {
        self.values.iter().map(|v| v.name.clone()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub name: String,
    pub methods: Vec<MethodDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: String,
    pub input_type: String,
    pub output_type: String,
    pub client_streaming: bool,
    pub server_streaming: bool,
}

// =============================================================================
// Wire → model
// =============================================================================

impl From<wire::FileDescriptorSet> for DescriptorSet {
    fn from(set: wire::FileDescriptorSet) -> Self {
        DescriptorSet {
            files: set.file.into_iter().map(FileDescriptor::from).collect(),
        }
    }
}

impl From<wire::FileDescriptorProto> for FileDescriptor {
    fn from(file: wire::FileDescriptorProto) -> Self {
        FileDescriptor {
            name: file.name,
            package: file.package.as_deref().unwrap_or("").trim().to_string(),
            messages: file.message_type.into_iter().map(MessageDescriptor::from).collect(),
            enums: file.enum_type.into_iter().map(EnumDescriptor::from).collect(),
            services: file.service.into_iter().map(ServiceDescriptor::from).collect(),
        }
    }
}

impl From<wire::DescriptorProto> for MessageDescriptor {
    fn from(m: wire::DescriptorProto) -> Self {
        MessageDescriptor {
            name: m.name.unwrap_or_default(),
            fields: m.field.into_iter().map(FieldDescriptor::from).collect(),
            nested_messages: m.nested_type.into_iter().map(MessageDescriptor::from).collect(),
            nested_enums: m.enum_type.into_iter().map(EnumDescriptor::from).collect(),
        }
    }
}

impl From<wire::FieldDescriptorProto> for FieldDescriptor {
    fn from(f: wire::FieldDescriptorProto) -> Self {
        // `type` may be left unset when `type_name` is filled in; a reference
        // then reads as a message, otherwise as the proto2 default (`double`).
        let kind = match f.kind.map(wire::FieldType::try_from) {
            Some(Ok(kind)) => FieldKind::from(kind),
            _ if f.type_name.is_some() => FieldKind::Message,
            _ => FieldKind::Double,
        };
        // Unknown labels read as optional.
        let label = match f.label.map(wire::FieldLabel::try_from) {
            Some(Ok(wire::FieldLabel::Required)) => FieldLabel::Required,
            Some(Ok(wire::FieldLabel::Repeated)) => FieldLabel::Repeated,
            _ => FieldLabel::Optional,
        };
        FieldDescriptor {
            name: f.name.unwrap_or_default(),
            number: f.number.unwrap_or_default(),
            label,
            kind,
            type_name: f.type_name,
        }
    }
}

impl From<wire::EnumDescriptorProto> for EnumDescriptor {
    fn from(e: wire::EnumDescriptorProto) -> Self {
        EnumDescriptor {
            name: e.name.unwrap_or_default(),
            values: e
                .value
                .into_iter()
                .map(|v| EnumValue {
                    name: v.name.unwrap_or_default(),
                    number: v.number.unwrap_or_default(),
                })
                .collect(),
        }
    }
}

impl From<wire::ServiceDescriptorProto> for ServiceDescriptor {
    fn from(s: wire::ServiceDescriptorProto) -> Self {
        ServiceDescriptor {
            name: s.name.unwrap_or_default(),
            methods: s
                .method
                .into_iter()
                .map(|m| MethodDescriptor {
                    name: m.name.unwrap_or_default(),
                    input_type: m.input_type.unwrap_or_default(),
                    output_type: m.output_type.unwrap_or_default(),
                    client_streaming: m.client_streaming.unwrap_or(false),
                    server_streaming: m.server_streaming.unwrap_or(false),
                })
                .collect(),
        }
    }
}
