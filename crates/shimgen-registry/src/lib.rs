//! Khronos registry model and loader.
//!
//! Normalizes the free-form registry XML (`gl.xml`, `egl.xml`) into closed,
//! immutable descriptors:
//! - `Command` - one entry point's name, return type, and ordered parameters
//! - `Feature` - a versioned bundle of required command names
//! - `Extension` - a tag-gated bundle of requirement blocks
//!
//! The loader assumes a well-formed registry: a command entry without a
//! `<proto>` or `<name>` is a fatal error, not a recoverable one.

mod model;
mod parse;


pub use model::{Command, Extension, Feature, Param, Registry, Require};

/// Errors raised while loading a registry document.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read registry: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed registry XML: {0}")]
    Xml(#[from] xml::reader::Error),

    /// A `<command>` entry without a `<proto>` child.
    #[error("command entry is missing its <proto>")]
    MissingProto,

    /// A `<proto>` without a `<name>` child.
    #[error("command entry is missing its <name>")]
    MissingName,

    /// A `<feature>` element without a `name` attribute.
    #[error("feature entry is missing its name attribute")]
    UnnamedFeature,

    /// An `<extension>` element without a `name` attribute.
    #[error("extension entry is missing its name attribute")]
    UnnamedExtension,

    /// A `<command name=…/>` reference without the `name` attribute.
    #[error("command reference in '{0}' is missing its name attribute")]
    UnnamedReference(String),
}

/// Result type for registry loading.
pub type Result<T> = std::result::Result<T, RegistryError>;
