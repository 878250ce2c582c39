//! CourierSync CLI - a terminal client for the CourierSync package services.
//!
//! This binary provides a command-driven interface for tracking packages,
//! managing the courier session, and recording route checkpoints, address
//! corrections, and shipment incidents.

use std::io;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use couriersync::api::ApiError;
use couriersync::app::App;
use couriersync::models::{Incident, LocationEntry, Package};
use couriersync::tracking::{StepState, TrackingReport};
use couriersync::utils::{format_date, format_optional};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Set up logging with environment-based filter
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    info!("CourierSync client starting");

    if let Err(e) = run().await {
        match e.downcast_ref::<ApiError>() {
            Some(ApiError::SessionExpired) => {
                eprintln!("Session expired - run `couriersync login` to start a new one.");
            }
            _ => eprintln!("Error: {e:#}"),
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let Some(command) = args.get(1).map(String::as_str) else {
        print_usage();
        return Ok(());
    };

    let mut app = App::new()?;

    match command {
        "login" => app.login_interactive().await?,
        "logout" => {
            app.auth.logout().await;
            println!("Session closed.");
        }
        "whoami" => print_session(&app),
        "track" => {
            let code = require_code(&args, "track <code>")?;
            match app.track(code).await? {
                Some(report) => print_tracking_report(&report),
                None => println!("No package found for code {code}."),
            }
        }
        "packages" => {
            let packages = app.list_packages(args.get(2).map(String::as_str)).await?;
            print_packages(&packages);
        }
        "in-route" => {
            let packages = app.in_route(args.get(2).map(String::as_str)).await?;
            print_packages(&packages);
        }
        "inventory" => {
            let summary = app.inventory_summary().await?;
            println!("{}", summary.report());
        }
        "history" => {
            let code = require_code(&args, "history <code>")?;
            print_locations(&app.location_history(code).await?);
        }
        "locate" => {
            let code = require_code(&args, "locate <code>")?;
            match app.last_location(code).await? {
                Some(entry) => print_location(&entry),
                None => println!("No locations recorded for {code}."),
            }
        }
        "checkpoint" => {
            let code = require_code(&args, "checkpoint <code>")?;
            app.register_checkpoint_interactive(code).await?;
        }
        "address" => {
            let code = require_code(&args, "address <code>")?;
            app.correct_address_interactive(code).await?;
        }
        "incidents" => {
            let incidents = app.incident_list(args.get(2).map(String::as_str)).await?;
            print_incidents(&incidents);
        }
        "report" => {
            let code = require_code(&args, "report <code> <description> [--kind <kind>]")?;
            let (description, kind) = parse_report_args(&args[3..])?;
            app.report_incident(code, &description, kind).await?;
            println!("Incident recorded for {code}.");
        }
        _ => print_usage(),
    }

    Ok(())
}

fn require_code<'a>(args: &'a [String], usage: &str) -> Result<&'a str> {
    args.get(2)
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("Missing package code. Usage: couriersync {usage}"))
}

/// Split `report` arguments into the description words and an optional
/// `--kind <kind>` flag, which may appear anywhere among them.
fn parse_report_args(rest: &[String]) -> Result<(String, Option<String>)> {
    let mut words: Vec<&str> = Vec::new();
    let mut kind = None;

    let mut iter = rest.iter();
    while let Some(arg) = iter.next() {
        if arg == "--kind" {
            kind = iter.next().cloned();
            if kind.is_none() {
                anyhow::bail!("--kind requires a value");
            }
        } else {
            words.push(arg);
        }
    }

    if words.is_empty() {
        anyhow::bail!(
            "Missing incident description. Usage: couriersync report <code> <description> [--kind <kind>]"
        );
    }
    Ok((words.join(" "), kind))
}

fn print_usage() {
    println!("CourierSync {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: couriersync <command> [args]");
    println!();
    println!("Commands:");
    println!("  login                    Sign in and store the session");
    println!("  logout                   Revoke the refresh token and clear the session");
    println!("  whoami                   Show the stored role and permissions");
    println!("  track <code>             Full tracking report for a package");
    println!("  packages [filter]        List packages, optionally filtered by code");
    println!("  in-route [code]          Packages currently on a route");
    println!("  inventory                Inventory summary with delivery rate");
    println!("  history <code>           Location history, oldest first");
    println!("  locate <code>            Latest recorded location");
    println!("  checkpoint <code>        Register a route checkpoint (interactive)");
    println!("  address <code>           Correct the delivery address (interactive)");
    println!("  incidents [code]         List incidents, optionally for one package");
    println!("  report <code> <text...>  Report an incident [--kind <kind>]");
}

fn print_session(app: &App) {
    if !app.auth.is_authenticated() {
        println!("Not logged in.");
        return;
    }
    let role = app.auth.user_role().unwrap_or_else(|| "unknown".to_string());
    println!("Role: {role}");

    let permissions = app.auth.user_permissions();
    if permissions.is_empty() {
        println!("Permissions: none");
    } else {
        println!("Permissions: {}", permissions.join(", "));
    }
}

fn print_tracking_report(report: &TrackingReport) {
    println!();
    println!("Guía N° {}", report.guide_number);
    println!("Estado: {}", report.status.label());
    println!("Destino: {}", report.destination);
    println!("Remitente: {}", report.sender);
    println!("Destinatario: {}", report.recipient);
    println!("Peso: {}", report.weight);
    println!("Dimensiones: {}", report.dimensions);
    println!("Novedades: {}", report.remarks);
    println!("Ubicación actual: {}", report.current_location);
    println!("Última actualización: {}", report.last_update);

    if report.route.is_empty() {
        return;
    }
    println!();
    println!("Recorrido:");
    for step in &report.route {
        let marker = match step.state {
            StepState::Completed => "✓",
            StepState::Current => "●",
        };
        if step.date.is_empty() {
            println!("  {} {}", marker, step.place);
        } else {
            println!("  {} {} ({})", marker, step.place, step.date);
        }
    }
}

fn print_packages(packages: &[Package]) {
    if packages.is_empty() {
        println!("No packages found.");
        return;
    }
    println!(
        "{:<16} {:<12} {:<24} {}",
        "CODE", "STATUS", "RECIPIENT", "DESTINATION"
    );
    for package in packages {
        println!(
            "{:<16} {:<12} {:<24} {}",
            package.tracking_code().unwrap_or("-"),
            package.normalized_status().label(),
            format_optional(package.recipient.as_deref(), "-"),
            format_optional(package.destination.as_deref(), "-"),
        );
    }
    println!();
    println!("{} package(s)", packages.len());
}

fn print_location(entry: &LocationEntry) {
    let date = entry
        .recorded_at
        .as_deref()
        .map(format_date)
        .unwrap_or_else(|| "-".to_string());
    match (entry.latitude, entry.longitude) {
        (Some(lat), Some(lon)) => println!("{:<12} {} ({:.5}, {:.5})", date, entry.place, lat, lon),
        _ => println!("{:<12} {}", date, entry.place),
    }
}

fn print_locations(entries: &[LocationEntry]) {
    if entries.is_empty() {
        println!("No locations recorded.");
        return;
    }
    for entry in entries {
        print_location(entry);
    }
    println!();
    println!("{} checkpoint(s)", entries.len());
}

fn print_incidents(incidents: &[Incident]) {
    if incidents.is_empty() {
        println!("No incidents recorded.");
        return;
    }
    for incident in incidents {
        println!(
            "{:<12} {:<16} [{}] {}",
            incident
                .recorded_at
                .as_deref()
                .map(format_date)
                .unwrap_or_else(|| "-".to_string()),
            format_optional(incident.package_code.as_deref(), "-"),
            format_optional(incident.kind.as_deref(), "general"),
            format_optional(incident.description.as_deref(), "(no description)"),
        );
    }
    println!();
    println!("{} incident(s)", incidents.len());
}
