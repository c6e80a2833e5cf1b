//! fanboxd - CLI entry point.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use fanboxd::{
    cli::Args,
    config::{validate_config, Config},
    daemon::FanboxD,
    download::DownloadResult,
    error::{exit_codes, Error, Result},
    output::{print_banner, print_error, print_info, print_warning},
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(DownloadResult::Success) => ExitCode::from(exit_codes::SUCCESS as u8),
        Ok(_) => ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_)
                | Error::ConfigValidation { .. }
                | Error::MissingConfig(_)
                | Error::Proxy(_) => ExitCode::from(exit_codes::CONFIG_ERROR as u8),
                Error::Api(_) => ExitCode::from(exit_codes::API_ERROR as u8),
                Error::Download(_) => ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8),
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<DownloadResult> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    // Print banner
    print_banner();

    let mode = args.run_mode();

    // Load configuration
    let config_path = args.config.clone();
    let mut config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        print_warning(&format!(
            "Configuration file not found: {}",
            config_path.display()
        ));
        print_info("Using default configuration with CLI arguments");
        Config::default()
    };

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);

    // Validate configuration
    validate_config(&config)?;

    print_info(&format!(
        "Download directory: {}",
        config.download_dir.display()
    ));
    if config.as_daemon {
        print_info(&format!("Poll interval: {}s", config.interval));
    }

    let fanboxd = Arc::new(FanboxD::new(config)?);

    // Ctrl-C stops the daemon and aborts in-flight work.
    {
        let fanboxd = Arc::clone(&fanboxd);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                fanboxd.stop();
            }
        });
    }

    let result = fanboxd.start(mode).await;
    print_info(&format!("Run finished: {}", result));
    Ok(result)
}
