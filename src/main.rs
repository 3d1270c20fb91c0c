use std::env;
use std::process::ExitCode;

use duel_arena::cli;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let code = cli::run_with_args(&args);
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
