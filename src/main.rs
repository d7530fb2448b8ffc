//! Watchman duplicate device report - CLI entry point.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use watchman_dedup::{
    api::{DeviceSource, WatchmanApi},
    cli::Args,
    config::{run_setup, validate_config, Config, LEGACY_ENV_FILE},
    dedup::analyze,
    error::{exit_codes, Error, Result},
    output::{
        create_spinner, hidden_spinner, print_banner, print_config_summary, print_error,
        print_info, print_success, print_summary, print_warning,
    },
    report::{deliver_all, ordered_sinks, ConsoleSink, CsvSink, EmailSink, Report, ReportSink},
};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.verbose {
        "debug"
    } else if args.email_only {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if args.show_console() {
        print_banner();
    }

    // Setup prompts block on the terminal, so config is resolved before the
    // Ctrl-C handler takes over SIGINT.
    let result = match load_config(&args) {
        Ok(config) => {
            tokio::select! {
                result = run(&args, config) => result,
                _ = tokio::signal::ctrl_c() => Err(Error::Cancelled),
            }
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            if args.show_console() {
                print_error(&format!("{}", e));
            } else {
                tracing::error!("{}", e);
            }
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

/// Resolve the configuration: file, legacy `.env`, or interactive setup, then CLI overrides.
fn load_config(args: &Args) -> Result<Config> {
    let show = args.show_console();
    let legacy = Path::new(LEGACY_ENV_FILE);

    let mut config = if args.reset_config {
        if show {
            print_info("Creating new configuration...");
        }
        run_setup(&args.config)?
    } else if args.config.exists() {
        if show {
            print_info(&format!("Loading configuration from {}", args.config.display()));
        }
        Config::load(&args.config)?
    } else if legacy.exists() {
        if show {
            print_info(&format!("Loading configuration from {}", legacy.display()));
        }
        Config::load_env_file(legacy)?
    } else if args.has_credentials() {
        if show {
            print_info("Using credentials from command line arguments");
        }
        Config::default()
    } else {
        if show {
            print_warning(&format!(
                "Configuration file not found: {}",
                args.config.display()
            ));
        }
        run_setup(&args.config)?
    };

    args.merge_into_config(&mut config);
    validate_config(&config)?;

    Ok(config)
}

async fn run(args: &Args, config: Config) -> Result<()> {
    let show = args.show_console();

    let attachment = config
        .output
        .csv_filename
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    let email_sink = match (&config.email, config.email_configured()) {
        (Some(email), true) => {
            let sink = EmailSink::new(email.clone());
            Some(match attachment {
                Some(name) => sink.with_attachment_name(name),
                None => sink,
            })
        }
        _ => None,
    };

    if show {
        let csv_path = config.output.csv_filename.display().to_string();
        print_config_summary(
            &config.watchman.subdomain,
            email_sink.as_ref().map(EmailSink::recipient),
            config.output.export_csv.then_some(csv_path.as_str()),
        );
    }

    // Fetch all computers
    let api = WatchmanApi::new(&config.watchman)?;
    let spinner = if show {
        create_spinner("Fetching computers from Watchman...")
    } else {
        hidden_spinner()
    };
    let records = api.fetch_all().await;
    spinner.finish_and_clear();
    let records = records?;

    if records.is_empty() {
        if show {
            print_info("No computers found in Watchman.");
        }
        return Ok(());
    }

    if show {
        print_info(&format!(
            "Analyzing {} computers for duplicates...",
            records.len()
        ));
    }

    let analysis = analyze(&records);
    let report = Report::new(&analysis, &config.watchman.subdomain);

    if !analysis.has_duplicates() {
        if show {
            ConsoleSink::new().deliver(&report).await?;
            if email_sink.is_some() {
                print_info("No email sent - no duplicates to report");
            }
        }
        return Ok(());
    }

    let csv_sink = config
        .output
        .export_csv
        .then(|| CsvSink::new(&config.output.csv_filename));
    if let Some(csv) = &csv_sink {
        if show {
            print_info(&format!("Exporting CSV to {}", csv.path().display()));
        }
    }
    if show && email_sink.is_some() {
        print_info("Sending email report...");
    }

    let sinks = ordered_sinks(show.then(ConsoleSink::new), csv_sink, email_sink);
    let delivered = deliver_all(&sinks, &report).await;
    if show && delivered.is_ok() && sinks.iter().any(|sink| sink.name() != "console") {
        print_success("Report delivered");
    }

    if show {
        print_summary(&analysis);
    }

    delivered
}
