//! Descriptor types produced by the loader.

use std::io::Read;
use std::path::Path;

use indexmap::IndexMap;

use crate::Result;
use crate::parse::RegistryParser;

/// One parameter of a command, as it must appear in a C declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Declaration tokens in order: qualifiers, base type, pointer markers,
    /// the declared name, and any array suffix. Each token is a single word.
    pub tokens: Vec<String>,
    /// The declared parameter name.
    pub name: String,
    /// Optional `len` attribute naming another parameter or a constant that
    /// governs an array parameter's length. Carried through verbatim.
    pub len: Option<String>,
}

impl Param {
    /// Full declaration text, e.g. `const EGLint * attrib_list`.
    pub fn decl(&self) -> String {
        self.tokens.join(" ")
    }

    /// Declaration text with the declared-name token removed, for use in a
    /// function-pointer typedef's formal list.
    pub fn type_decl(&self) -> String {
        let mut tokens: Vec<&str> = self.tokens.iter().map(String::as_str).collect();
        if let Some(pos) = tokens.iter().position(|t| *t == self.name) {
            tokens.remove(pos);
        }
        tokens.join(" ")
    }
}

/// Immutable descriptor of one API entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Unique across the whole registry.
    pub name: String,
    /// Return type text, e.g. `EGLBoolean` or `const char *`. `void` for
    /// commands that return nothing.
    pub return_type: String,
    /// Parameters in call-signature order.
    pub params: Vec<Param>,
}

impl Command {
    /// Whether the command returns a value.
    pub fn has_return(&self) -> bool {
        !self.return_type.eq_ignore_ascii_case("void")
    }

    /// Comma-joined full parameter declarations.
    pub fn param_list(&self) -> String {
        let decls: Vec<String> = self.params.iter().map(Param::decl).collect();
        decls.join(", ")
    }

    /// Comma-joined type-only parameter declarations (typedef formal list).
    pub fn type_list(&self) -> String {
        let decls: Vec<String> = self.params.iter().map(Param::type_decl).collect();
        decls.join(", ")
    }

    /// Comma-joined argument names for forwarding a call.
    pub fn arg_list(&self) -> String {
        let names: Vec<&str> = self.params.iter().map(|p| p.name.as_str()).collect();
        names.join(", ")
    }
}

/// A named, versioned bundle of required command names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    pub name: String,
    /// The `api` attribute, when present (e.g. `gles2`).
    pub api: Option<String>,
    /// Required command names across all of the feature's require blocks,
    /// in document order.
    pub commands: Vec<String>,
}

/// One requirement block inside an extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Require {
    /// Optional API scope: when present, the block only applies to profiles
    /// whose tag matches.
    pub api: Option<String>,
    pub commands: Vec<String>,
}

/// An optionally tag-scoped bundle of requirement blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub name: String,
    /// The `|`-split `supported` tag list. `None` when the attribute is
    /// absent entirely, which is a registry-authoring error the resolver
    /// surfaces without aborting.
    pub supported: Option<Vec<String>>,
    pub requires: Vec<Require>,
}

/// The parsed registry: every descriptor the generator consumes.
///
/// Maps preserve document order; canonical output order is imposed later by
/// the emitter, not here.
#[derive(Debug, Default)]
pub struct Registry {
    pub commands: IndexMap<String, Command>,
    pub features: IndexMap<String, Feature>,
    pub extensions: Vec<Extension>,
}

impl Registry {
    /// Parse a registry from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        RegistryParser::new(reader).parse()
    }

    /// Parse a registry file from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn command(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub fn feature(&self, name: &str) -> Option<&Feature> {
        self.features.get(name)
    }
}
