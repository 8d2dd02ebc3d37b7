//! CLI surface: argument builders, the top-level command, and extraction
//! from `ArgMatches` into the generate command's args.

use std::path::PathBuf;

use clap::{Arg, ArgMatches, Command, value_parser};

use crate::generate::GenerateArgs;


/// Registry base directory (-r/--registry).
fn registry_arg() -> Arg {
    Arg::new("registry")
        .short('r')
        .long("registry")
        .value_name("DIR")
        .value_parser(value_parser!(PathBuf))
        .help("Directory holding the opengl-registry and egl-registry checkouts")
}

/// Output root (-o/--out).
fn out_arg() -> Arg {
    Arg::new("out")
        .short('o')
        .long("out")
        .value_name("DIR")
        .value_parser(value_parser!(PathBuf))
        .help("Directory the generated modules are written under")
}

/// Build the complete CLI.
pub fn build_cli() -> Command {
    Command::new("shimgen")
        .about("Generate fake-driver dispatch sources from the Khronos XML registries")
        .arg(registry_arg())
        .arg(out_arg())
}

/// Raw values pulled from clap, before defaults apply.
pub struct GenerateParams {
    pub registry_dir: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
}

impl GenerateParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            registry_dir: m.get_one::<PathBuf>("registry").cloned(),
            out_dir: m.get_one::<PathBuf>("out").cloned(),
        }
    }
}

impl From<GenerateParams> for GenerateArgs {
    fn from(p: GenerateParams) -> Self {
        Self {
            registry_dir: p.registry_dir.unwrap_or_else(|| PathBuf::from("thirdparty")),
            out_dir: p.out_dir.unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}
