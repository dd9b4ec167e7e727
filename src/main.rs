use clap::Parser;
use tracing::{debug, error};

use layline::cli::{self, output, Cli};
use layline::config::Config;

fn main() {
    let cli = Cli::parse();
    cli.color.apply();
    output::configure(output::OutputConfig::new(cli.json, cli.quiet));

    let mut config = match Config::load_or_default(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            output::error(&format!("Failed to load config: {e}"));
            std::process::exit(1);
        }
    };

    match cli.verbose {
        0 => {}
        1 => config.logging.level = "debug".into(),
        _ => config.logging.level = "trace".into(),
    }
    config.init_logging();
    debug!(command = ?cli.command, "layline starting");

    if let Err(e) = cli::run(&cli.command, &config) {
        error!(error = %e, "command failed");
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
