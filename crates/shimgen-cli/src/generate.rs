//! The generation run: load both registries, resolve every profile, and
//! write one module per profile plus the combined one.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use shimgen_gen::{Diagnostics, Profile, emit_module, resolve};
use shimgen_registry::Registry;

use crate::profiles;


/// Provenance line written at the top of every generated module.
const PROVENANCE: &str = "shimgen";

pub struct GenerateArgs {
    pub registry_dir: PathBuf,
    pub out_dir: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Registry(#[from] shimgen_registry::RegistryError),

    #[error(transparent)]
    Resolve(#[from] shimgen_gen::ResolveError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub fn run(args: GenerateArgs) {
    if let Err(e) = generate(&args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

pub fn generate(args: &GenerateArgs) -> Result<(), GenerateError> {
    let egl_registry = Registry::from_file(&args.registry_dir.join("egl-registry/api/egl.xml"))?;
    let gl_registry = Registry::from_file(&args.registry_dir.join("opengl-registry/xml/gl.xml"))?;

    let overrides: BTreeSet<&str> = profiles::MANUAL_IMPL_FUNCS.iter().copied().collect();

    let (egl, diagnostics) = resolve(&egl_registry, &profiles::EGL)?;
    report(&diagnostics);
    let (gles2, diagnostics) = resolve(&gl_registry, &profiles::GLES2)?;
    report(&diagnostics);
    let (gles1, diagnostics) = resolve(&gl_registry, &profiles::GLES1)?;
    report(&diagnostics);

    // Include order matters in the union: egl, then GLES2+, then GLES1.
    let single = Profile::union(
        profiles::SINGLE_NAME,
        &[&egl, &gles2, &gles1],
        profiles::SINGLE_PRELUDE,
    );

    for profile in [&egl, &gles2, &gles1, &single] {
        write_module(&args.out_dir, profile, &overrides)?;
    }
    Ok(())
}

fn report(diagnostics: &Diagnostics) {
    for note in diagnostics.iter() {
        warn!("{}", note);
    }
}

fn write_module(
    out_dir: &Path,
    profile: &Profile<'_>,
    overrides: &BTreeSet<&str>,
) -> Result<(), GenerateError> {
    let dir = out_dir.join(&profile.name);
    fs::create_dir_all(&dir).map_err(|source| GenerateError::Write {
        path: dir.clone(),
        source,
    })?;
    let path = dir.join("auto.cpp");
    let text = emit_module(profile, overrides, PROVENANCE);
    fs::write(&path, text).map_err(|source| GenerateError::Write {
        path: path.clone(),
        source,
    })?;
    println!("Generated {}/auto.cpp", profile.name);
    Ok(())
}
