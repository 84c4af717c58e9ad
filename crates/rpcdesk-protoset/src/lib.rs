//! Protoset introspection (binary `FileDescriptorSet` → callable methods and
//! request schemas).
//!
//! A protoset is what `protoc --descriptor_set_out=...` writes: a serialized
//! `google.protobuf.FileDescriptorSet`. This crate answers the two questions
//! an interactive RPC client asks of one:
//!
//! - which methods can I call? ([`list_methods`]), and
//! - what does the request of a given method look like?
//!   ([`resolve_request_fields`]).
//!
//! Everything here is pure computation over bytes the caller already read.
//! Decoding is all-or-nothing: a truncated or otherwise malformed protoset is
//! a [`ProtosetError`], never a partially populated [`DescriptorSet`].
//!
//! Name lookups that fail (a half-typed method name, a dangling type
//! reference) are not errors. They resolve to an empty field list, which is
//! also what a method with an empty request message resolves to.

use prost::Message as _;
use std::path::{Path, PathBuf};

pub mod cache;
pub mod catalogue;
pub mod index;
pub mod model;
pub mod resolve;
pub mod wire;

pub use cache::ProtosetCache;
pub use catalogue::{list_methods, CallableMethod};
pub use index::TypeIndex;
pub use model::{
    DescriptorSet, EnumDescriptor, EnumValue, FieldDescriptor, FieldKind, FieldLabel,
    FileDescriptor, MessageDescriptor, MethodDescriptor, ServiceDescriptor,
};
pub use resolve::{resolve_request_fields, CallName, ResolvedField};

#[derive(Debug, thiserror::Error)]
pub enum ProtosetError {
    #[error("malformed descriptor set: {0}")]
    Malformed(#[from] prost::DecodeError),
    #[error("failed to read protoset {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Decode a serialized `FileDescriptorSet`.
pub fn parse(bytes: &[u8]) -> Result<DescriptorSet, ProtosetError> {
    let raw = wire::FileDescriptorSet::decode(bytes)?;
    let set = DescriptorSet::from(raw);
    tracing::debug!(
        bytes = bytes.len(),
        files = set.files.len(),
        "parsed descriptor set"
    );
    Ok(set)
}

/// Read and decode a protoset file.
pub fn load(path: impl AsRef<Path>) -> Result<DescriptorSet, ProtosetError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| ProtosetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&bytes)
}

/// [`list_methods`] over raw bytes, keeping "could not parse" distinct from
/// "parsed, but declares no services".
pub fn list_methods_from_bytes(bytes: &[u8]) -> Result<Vec<CallableMethod>, ProtosetError> {
    Ok(list_methods(&parse(bytes)?))
}

/// [`resolve_request_fields`] over raw bytes; only decoding can fail.
pub fn resolve_request_fields_from_bytes(
    bytes: &[u8],
    call_name: &str,
) -> Result<Vec<ResolvedField>, ProtosetError> {
    Ok(resolve_request_fields(&parse(bytes)?, call_name))
}
