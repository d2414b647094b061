use clap::Parser;
use passit_db_cli::cli::Cli;
use passit_db_cli::error::exit_with_error;

fn init_tracing(cli: &Cli) {
    // --quiet: no logs. --verbose: RUST_LOG, or info. Default: warnings only,
    // since there are no progress bars here and stdout carries only the JSON
    // result, so library warnings on stderr never mix with command output.
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };

    let ansi = !(cli.no_color || std::env::var_os("NO_COLOR").is_some());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(ansi)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    init_tracing(&cli);

    if let Err(e) = passit_db_cli::run(cli).await {
        exit_with_error(e);
    }
}
