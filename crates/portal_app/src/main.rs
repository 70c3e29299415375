use std::process::ExitCode;

use clap::Parser;

mod platform;

fn main() -> ExitCode {
    let cli = platform::cli::Cli::parse();
    match platform::run_app(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("portal_probe: {err:#}");
            ExitCode::from(platform::app::EXIT_ERROR)
        }
    }
}
