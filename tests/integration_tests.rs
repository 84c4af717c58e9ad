//! Integration tests across the rpcdesk crates
//!
//! These tests follow a call from protoset bytes to a grpcurl command line:
//! - Protoset → resolved request fields → request body
//! - Saved call store → reload → request
//! - Environment variables → substituted command
//!
//! Run with: cargo test --test integration_tests

use std::collections::BTreeMap;

use prost::Message as _;
use rpcdesk_call::{CallRequest, GrpcurlExecutor, RequestBody};
use rpcdesk_protoset::wire::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FieldType, FileDescriptorProto, FileDescriptorSet, MethodDescriptorProto,
    ServiceDescriptorProto,
};
use rpcdesk_storage::{CallRepository, EnvironmentStore, JsonCallStore, SavedCall};
use tempfile::tempdir;

// ============================================================================
// Fixtures
// ============================================================================

fn orders_protoset() -> Vec<u8> {
    let field = |name: &str, number: i32, kind: FieldType, type_name: Option<&str>| {
        FieldDescriptorProto {
            name: Some(name.to_string()),
            number: Some(number),
            label: Some(1),
            kind: Some(kind as i32),
            type_name: type_name.map(str::to_string),
            json_name: None,
        }
    };
    let file = FileDescriptorProto {
        name: Some("shop/orders.proto".to_string()),
        package: Some("shop.v1".to_string()),
        message_type: vec![DescriptorProto {
            name: Some("PlaceOrderRequest".to_string()),
            field: vec![
                field("sku", 1, FieldType::String, None),
                field("quantity", 2, FieldType::Uint32, None),
                field("priority", 3, FieldType::Enum, Some(".shop.v1.Priority")),
            ],
            ..Default::default()
        }],
        enum_type: vec![EnumDescriptorProto {
            name: Some("Priority".to_string()),
            value: ["LOW", "HIGH"]
                .iter()
                .enumerate()
                .map(|(i, v)| EnumValueDescriptorProto {
                    name: Some(v.to_string()),
                    number: Some(i as i32),
                })
                .collect(),
        }],
        service: vec![ServiceDescriptorProto {
            name: Some("Orders".to_string()),
            method: vec![MethodDescriptorProto {
                name: Some("PlaceOrder".to_string()),
                input_type: Some(".shop.v1.PlaceOrderRequest".to_string()),
                output_type: Some(".shop.v1.PlaceOrderResponse".to_string()),
                ..Default::default()
            }],
        }],
        syntax: Some("proto3".to_string()),
    };
    FileDescriptorSet { file: vec![file] }.encode_to_vec()
}

// ============================================================================
// Protoset → body → command
// ============================================================================

#[test]
fn test_resolved_fields_become_grpcurl_payload() {
    let bytes = orders_protoset();
    let methods = rpcdesk_protoset::list_methods_from_bytes(&bytes).unwrap();
    assert_eq!(methods, vec!["shop.v1.Orders.PlaceOrder"]);

    let fields =
        rpcdesk_protoset::resolve_request_fields_from_bytes(&bytes, methods[0].as_str()).unwrap();
    let mut body = RequestBody::from_fields(&fields);
    body.set("sku", "  A-100 ").unwrap();
    body.set("quantity", "{{qty}}").unwrap();
    body.set("priority", "HIGH").unwrap();
    assert!(body.set("colour", "red").is_err());

    let vars = BTreeMap::from([
        ("qty".to_string(), "3".to_string()),
        ("addr".to_string(), "orders.internal:443".to_string()),
    ]);
    let body = body.with_variables(&vars);
    assert!(body.invalid_choices().is_empty());

    let request = CallRequest {
        bearer_token: "tok".to_string(),
        protoset: "orders.protoset".to_string(),
        server: "{{addr}}".to_string(),
        method: methods[0].to_string(),
        body: body.to_json_string(),
        ..Default::default()
    }
    .with_variables(&vars);
    request.validate().unwrap();

    assert_eq!(
        GrpcurlExecutor::default().build_args(&request),
        vec![
            "grpcurl",
            "-H",
            "authorization: Bearer tok",
            "--protoset",
            "orders.protoset",
            "-d",
            r#"{"sku":"A-100","quantity":"3","priority":"HIGH"}"#,
            "orders.internal:443",
            "shop.v1.Orders.PlaceOrder",
        ]
    );
}

// ============================================================================
// Saved calls and environments on disk
// ============================================================================

#[test]
fn test_saved_call_reloads_into_same_request() {
    let dir = tempdir().unwrap();
    let protoset_path = dir.path().join("orders.protoset");
    std::fs::write(&protoset_path, orders_protoset()).unwrap();

    let set = rpcdesk_protoset::load(&protoset_path).unwrap();
    let fields = rpcdesk_protoset::resolve_request_fields(&set, "shop.v1.Orders.PlaceOrder");
    let mut body = RequestBody::from_fields(&fields);
    body.set("sku", "{{sku}}").unwrap();

    let calls_path = dir.path().join("saved_calls.json");
    let mut store = JsonCallStore::open(&calls_path);
    let index = store
        .append(SavedCall {
            protoset: protoset_path.display().to_string(),
            server: "localhost:50051".to_string(),
            method: "shop.v1.Orders.PlaceOrder".to_string(),
            plaintext: true,
            cookie: "{{session}}".to_string(),
            bearer_token: "ignored".to_string(),
            body: body.to_json_string(),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(index, 0);

    let mut envs = EnvironmentStore::open(dir.path().join("environments.json"));
    envs.save_environment(
        "staging",
        BTreeMap::from([
            ("sku".to_string(), "B-7".to_string()),
            ("session".to_string(), "abc".to_string()),
        ]),
    )
    .unwrap();

    // Fresh handles see what the first ones wrote.
    let reopened = JsonCallStore::open(&calls_path);
    let saved = reopened.get(0).unwrap().clone();
    let vars = EnvironmentStore::open(dir.path().join("environments.json")).environment("staging");

    let mut form = RequestBody::from_fields(&fields);
    assert_eq!(form.prefill(&saved.body), 3);
    let form = form.with_variables(&vars);

    let request = CallRequest {
        plaintext: saved.plaintext,
        cookie: saved.cookie,
        bearer_token: saved.bearer_token,
        protoset: saved.protoset,
        server: saved.server,
        method: saved.method,
        body: form.to_json_string(),
    }
    .with_variables(&vars);

    let argv = GrpcurlExecutor::new("grpcurl").build_args(&request);
    assert_eq!(&argv[1..4], ["-plaintext", "-H", "Cookie:s=abc"]);
    assert!(!argv.iter().any(|a| a.contains("Bearer")));
    assert!(argv.contains(&r#"{"sku":"B-7","quantity":"","priority":""}"#.to_string()));
}
