mod cli;
mod generate;
mod profiles;

fn main() {
    let matches = match cli::build_cli().try_get_matches() {
        Ok(matches) => matches,
        // Unrecognized options and malformed syntax print the problem plus
        // usage and exit cleanly; so do --help and --version. Generation
        // only runs on a fully understood command line.
        Err(err) => {
            let _ = err.print();
            return;
        }
    };

    init_tracing();

    let params = cli::GenerateParams::from_matches(&matches);
    generate::run(params.into());
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}
