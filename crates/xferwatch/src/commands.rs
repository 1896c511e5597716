use std::sync::Arc;

use clap::ArgMatches;
use tracing::{error, info, warn};

use xferwatch_core::config::WatchConfig;
use xferwatch_core::events;
use xferwatch_core::{
    HttpStatusSource, PollError, PollTiming, StatusPoller, StatusSource, StopReason,
};

use crate::report::{StatusReload, WatchReport, format_status};

/// Load configuration with warning on errors.
///
/// Falls back to defaults if config loading fails, but notifies the user via:
/// - stderr message for immediate visibility
/// - structured log event `cli.config.load_failed` for debugging
fn load_config_with_warning() -> WatchConfig {
    match WatchConfig::load_hierarchy() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check ~/.xferwatch/config.toml and ./.xferwatch/config.toml for errors.",
                e
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            WatchConfig::default()
        }
    }
}

/// Apply command-line overrides on top of the file configuration.
fn resolve_config(matches: &ArgMatches) -> Result<WatchConfig, Box<dyn std::error::Error>> {
    let mut config = load_config_with_warning();

    if let Some(url) = matches.get_one::<String>("url") {
        config.server.base_url = Some(url.clone());
    }
    if let Ok(Some(interval)) = matches.try_get_one::<u64>("interval-ms") {
        config.poll.interval_ms = Some(*interval);
    }
    if let Ok(Some(delay)) = matches.try_get_one::<u64>("reload-delay-ms") {
        config.poll.reload_delay_ms = Some(*delay);
    }

    if let Err(e) = config.validate() {
        eprintln!("❌ {}", e);
        events::log_app_error(&e);
        return Err(e.into());
    }

    Ok(config)
}

fn build_source(config: &WatchConfig) -> Result<HttpStatusSource, Box<dyn std::error::Error>> {
    HttpStatusSource::from_config(config).map_err(|e| {
        eprintln!("❌ {}", e);
        events::log_app_error(&e);
        e.into()
    })
}

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    events::log_app_startup();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let result = match matches.subcommand() {
        Some(("status", sub_matches)) => runtime.block_on(handle_status_command(sub_matches)),
        Some(("clear", sub_matches)) => runtime.block_on(handle_clear_command(sub_matches)),
        Some(("watch", sub_matches)) => runtime.block_on(handle_watch_command(sub_matches)),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    };

    events::log_app_shutdown();
    result
}

async fn handle_status_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    let config = resolve_config(matches)?;
    let source = build_source(&config)?;

    info!(
        event = "cli.status_started",
        url = source.url(),
        json_output = json_output
    );

    match source.fetch_status().await {
        Ok(status) => {
            if json_output {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("{}", format_status(&status));
            }

            info!(event = "cli.status_completed", active = status.active);
            Ok(())
        }
        Err(e) => {
            report_fetch_failure(source.url(), &e);
            Err(e.into())
        }
    }
}

async fn handle_clear_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    let config = resolve_config(matches)?;
    let source = build_source(&config)?;

    info!(
        event = "cli.clear_started",
        url = source.clear_url(),
        json_output = json_output
    );

    if let Err(e) = source.clear_status().await {
        eprintln!("❌ Failed to clear status at {}: {}", source.clear_url(), e);
        if e.is_transport() {
            eprintln!("   Hint: Is the transfer server running? Use --url to point at it.");
        }
        error!(
            event = "cli.clear_failed",
            url = source.clear_url(),
            error = %e
        );
        events::log_app_error(&e);
        return Err(e.into());
    }

    // Show the status as the server now reports it.
    match source.fetch_status().await {
        Ok(status) => {
            if json_output {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("✅ Transfer status cleared.");
                println!("{}", format_status(&status));
            }

            info!(event = "cli.clear_completed", active = status.active);
            Ok(())
        }
        Err(e) => {
            report_fetch_failure(source.url(), &e);
            Err(e.into())
        }
    }
}

async fn handle_watch_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    let assume_active = matches.get_flag("assume-active");
    let config = resolve_config(matches)?;
    let source = Arc::new(build_source(&config)?);

    info!(
        event = "cli.watch_started",
        url = source.url(),
        assume_active = assume_active,
        json_output = json_output
    );

    // Stands in for the in-progress indicator of a freshly rendered page.
    let indicator_present = if assume_active {
        true
    } else {
        match source.fetch_status().await {
            Ok(status) if status.active => {
                if !json_output {
                    println!("{}", format_status(&status));
                }
                true
            }
            Ok(status) => {
                if json_output {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&WatchReport::idle(status))?
                    );
                } else {
                    println!("No transfer in progress.");
                    println!("{}", format_status(&status));
                }
                info!(event = "cli.watch_completed", outcome = "idle");
                return Ok(());
            }
            Err(e) => {
                report_fetch_failure(source.url(), &e);
                return Err(e.into());
            }
        }
    };

    let reload = Arc::new(StatusReload::new(Arc::clone(&source), !json_output));
    let mut poller = StatusPoller::new(
        Arc::clone(&source),
        Arc::clone(&reload),
        PollTiming::from(&config),
    );
    poller.start(indicator_present);

    let stop_handle = poller.stop_handle();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!(event = "cli.watch_interrupted");
            stop_handle.stop();
        }
    });

    let outcome = poller.wait().await;
    interrupt.abort();

    let Some(outcome) = outcome else {
        return Err("Polling task ended unexpectedly".into());
    };

    if json_output {
        let report = WatchReport::new(&outcome, reload.refreshed());
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    info!(
        event = "cli.watch_completed",
        ticks = outcome.ticks,
        reloaded = outcome.reloaded
    );

    match outcome.reason {
        StopReason::Completed(status) => {
            if !json_output && !outcome.reloaded {
                println!("{}", format_status(&status));
            }
            Ok(())
        }
        StopReason::Cancelled => {
            if !json_output {
                println!("Stopped watching.");
            }
            Ok(())
        }
        StopReason::Failed(e) => {
            if !json_output {
                eprintln!("❌ Stopped polling: {}", e);
            }
            error!(
                event = "cli.watch_failed",
                error = %e
            );
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

fn report_fetch_failure(url: &str, e: &PollError) {
    eprintln!("❌ Failed to fetch status from {}: {}", url, e);
    if e.is_transport() {
        eprintln!("   Hint: Is the transfer server running? Use --url to point at it.");
    }
    error!(
        event = "cli.status_fetch_failed",
        url = url,
        error = %e
    );
    events::log_app_error(e);
}
