//! Per-profile command-set resolution.

use std::collections::BTreeMap;

use shimgen_registry::{Command, Registry};

use crate::{PassResult, ResolveError};

/// Static definition of one output profile.
#[derive(Debug, Clone, Copy)]
pub struct ProfileSpec<'s> {
    /// Output module/folder name.
    pub name: &'s str,
    /// Tags this profile accepts, used both against an extension's
    /// `supported` list and against a require block's `api` scope.
    /// The GLES2+ profile carries both `gles2` and `gles3`.
    pub api_tags: &'s [&'s str],
    /// Feature names whose commands the profile must expose.
    pub features: &'s [&'s str],
    /// Headers the emitted module references.
    pub includes: &'s [&'s str],
    /// Extra type declarations emitted before the generated passes.
    pub prelude: &'s [&'s str],
}

/// One resolved output target. Commands are keyed by name; the `BTreeMap`
/// keeps them in the canonical ascending order every emission pass uses.
#[derive(Debug, Clone)]
pub struct Profile<'r> {
    pub name: String,
    pub commands: BTreeMap<&'r str, &'r Command>,
    pub includes: Vec<String>,
    pub prelude: Vec<String>,
}

impl<'r> Profile<'r> {
    /// Plain union of already-resolved profiles, in the given order. No
    /// independent feature or extension walk happens here.
    pub fn union(name: &str, parts: &[&Profile<'r>], prelude: &[&str]) -> Profile<'r> {
        let mut commands = BTreeMap::new();
        let mut includes = Vec::new();
        for part in parts {
            commands.extend(part.commands.iter().map(|(&n, &c)| (n, c)));
            includes.extend(part.includes.iter().cloned());
        }
        Profile {
            name: name.to_owned(),
            commands,
            includes,
            prelude: prelude.iter().map(|s| (*s).to_owned()).collect(),
        }
    }
}

/// Non-fatal findings collected during resolution, in encounter order.
/// Currently these are extensions that declare no `supported` tags at all,
/// a registry-authoring error worth surfacing without aborting the run.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    notes: Vec<String>,
}

impl Diagnostics {
    pub fn push(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.notes.iter().map(String::as_str)
    }
}

/// Resolve the command set for one profile.
///
/// Every command a declared feature requires is unioned in, then every
/// requirement block of every applicable extension. Lookup failures are
/// fatal; an extension without `supported` tags is reported and treated as
/// inapplicable to every profile.
pub fn resolve<'r>(registry: &'r Registry, spec: &ProfileSpec<'_>) -> PassResult<Profile<'r>> {
    let mut commands: BTreeMap<&'r str, &'r Command> = BTreeMap::new();
    let mut diagnostics = Diagnostics::default();

    for &feature_name in spec.features {
        let feature =
            registry
                .feature(feature_name)
                .ok_or_else(|| ResolveError::UnknownFeature {
                    profile: spec.name.to_owned(),
                    feature: feature_name.to_owned(),
                })?;
        for command_name in &feature.commands {
            let command =
                registry
                    .command(command_name)
                    .ok_or_else(|| ResolveError::UnknownFeatureCommand {
                        feature: feature.name.clone(),
                        command: command_name.clone(),
                    })?;
            commands.insert(command.name.as_str(), command);
        }
    }

    for extension in &registry.extensions {
        let Some(supported) = &extension.supported else {
            diagnostics.push(format!(
                "extension {} declares no supported tags",
                extension.name
            ));
            continue;
        };
        if !supported.iter().any(|tag| spec.api_tags.contains(&tag.as_str())) {
            continue;
        }
        for require in &extension.requires {
            if let Some(api) = &require.api {
                if !spec.api_tags.contains(&api.as_str()) {
                    continue;
                }
            }
            for command_name in &require.commands {
                let command = registry.command(command_name).ok_or_else(|| {
                    ResolveError::UnknownExtensionCommand {
                        extension: extension.name.clone(),
                        command: command_name.clone(),
                    }
                })?;
                commands.insert(command.name.as_str(), command);
            }
        }
    }

    let profile = Profile {
        name: spec.name.to_owned(),
        commands,
        includes: spec.includes.iter().map(|s| (*s).to_owned()).collect(),
        prelude: spec.prelude.iter().map(|s| (*s).to_owned()).collect(),
    };
    Ok((profile, diagnostics))
}
