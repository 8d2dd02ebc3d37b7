//! Profile resolution and dispatch-source emission.
//!
//! Two stages over a loaded registry:
//! - `resolve` - compute the command set one output profile must expose
//!   (union of its features' commands plus tag-filtered extension
//!   requirements)
//! - `emit_module` - render one profile as a self-contained C++ module of
//!   lazy-binding trampolines

mod emit;
mod resolve;

#[cfg(test)]
mod resolve_tests;

pub use emit::emit_module;
pub use resolve::{Diagnostics, Profile, ProfileSpec, resolve};

/// Fatal resolution errors. Each one means the registry and the profile
/// configuration disagree, which indicates a corrupt or mismatched input.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ResolveError {
    #[error("profile '{profile}' requires unknown feature '{feature}'")]
    UnknownFeature { profile: String, feature: String },

    #[error("feature '{feature}' requires unknown command '{command}'")]
    UnknownFeatureCommand { feature: String, command: String },

    #[error("extension '{extension}' requires unknown command '{command}'")]
    UnknownExtensionCommand { extension: String, command: String },
}

/// Result type for resolution.
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Result type for passes that produce output alongside collected
/// diagnostics. Fatal errors use the outer `Result`.
pub type PassResult<T> = std::result::Result<(T, Diagnostics), ResolveError>;
