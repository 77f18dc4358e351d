use std::process::ExitCode;

use clap::Parser;
use cmec_bundle::cli::Cli;
use cmec_bundle::commands::execute;
use cmec_bundle::config::AppConfig;
use cmec_bundle::BundleSummary;
use log::error;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[cmec-bundle] {e}");
            return ExitCode::from(&e);
        }
    };

    match execute(cli, &config) {
        Ok(bundle) => {
            match serde_json::to_string_pretty(&BundleSummary::from(&bundle)) {
                Ok(summary) => println!("{summary}"),
                Err(e) => {
                    eprintln!("[cmec-bundle] {e}");
                    return ExitCode::from(5);
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            eprintln!("[cmec-bundle] {e}");
            ExitCode::from(&e)
        }
    }
}
