//! Descriptor-set fixtures built from the wire messages, so tests exercise
//! the same bytes `protoc --descriptor_set_out` would produce.

#![allow(dead_code)]

use prost::Message as _;
use rpcdesk_protoset::wire::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FieldType, FileDescriptorProto, FileDescriptorSet, MethodDescriptorProto,
    ServiceDescriptorProto,
};

pub fn file(package: Option<&str>) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("test.proto".to_string()),
        package: package.map(str::to_string),
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

pub fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field: fields,
        ..Default::default()
    }
}

pub fn scalar(name: &str, number: i32, kind: FieldType) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(1),
        kind: Some(kind as i32),
        json_name: Some(name.to_string()),
        ..Default::default()
    }
}

pub fn typed(name: &str, number: i32, kind: FieldType, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..scalar(name, number, kind)
    }
}

pub fn enumeration(name: &str, values: &[&str]) -> EnumDescriptorProto {
    EnumDescriptorProto {
        name: Some(name.to_string()),
        value: values
            .iter()
            .enumerate()
            .map(|(i, v)| EnumValueDescriptorProto {
                name: Some(v.to_string()),
                number: Some(i as i32),
            })
            .collect(),
    }
}

pub fn service(name: &str, methods: &[(&str, &str)]) -> ServiceDescriptorProto {
    ServiceDescriptorProto {
        name: Some(name.to_string()),
        method: methods
            .iter()
            .map(|(m, input)| MethodDescriptorProto {
                name: Some(m.to_string()),
                input_type: Some(input.to_string()),
                output_type: Some(".google.protobuf.Empty".to_string()),
                ..Default::default()
            })
            .collect(),
    }
}

pub fn encode(files: Vec<FileDescriptorProto>) -> Vec<u8> {
    FileDescriptorSet { file: files }.encode_to_vec()
}

/// `pkg.Greeter` with `Hello(HelloRequest)` and `Bye(ByeRequest)`;
/// `HelloRequest { string name; int32 count; Status status; }`.
pub fn greeter_protoset() -> Vec<u8> {
    let mut f = file(Some("pkg"));
    f.enum_type.push(enumeration("Status", &["OK", "FAIL"]));
    f.message_type.push(message(
        "HelloRequest",
        vec![
            scalar("name", 1, FieldType::String),
            scalar("count", 2, FieldType::Int32),
            typed("status", 3, FieldType::Enum, ".pkg.Status"),
        ],
    ));
    f.message_type.push(message("ByeRequest", vec![]));
    f.service.push(service(
        "Greeter",
        &[("Hello", ".pkg.HelloRequest"), ("Bye", ".pkg.ByeRequest")],
    ));
    encode(vec![f])
}
