//! Application orchestration for the CourierSync CLI.
//!
//! This module contains the core `App` struct that wires configuration,
//! session storage, the auth service, and the API services together, and
//! owns the interactive prompt flows (login, checkpoint registration,
//! address correction).

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::api::{http_client, ApiClient, ApiError, IncidentService, PackageService};
use crate::auth::{AuthService, CredentialStore, FileSessionStore, LoginCredentials};
use crate::config::Config;
use crate::models::{
    sort_by_recorded_time, AddressUpdate, Incident, InventorySummary, LocationEntry, NewIncident,
    NewLocation, Orientation, Package, RoadType, StreetAddress, Waypoint,
};
use crate::tracking::TrackingReport;

pub struct App {
    pub config: Config,
    pub auth: AuthService,
    packages: PackageService,
    incidents: IncidentService,
}

impl App {
    pub fn new() -> Result<Self> {
        let config = Config::load().unwrap_or_else(|e| {
            warn!(error = %e, "Could not load config, using defaults");
            Config::default()
        });

        let state_dir = config
            .state_dir()
            .context("Could not resolve the state directory")?;
        let store = Arc::new(FileSessionStore::new(state_dir));

        let http = http_client().context("Failed to build HTTP client")?;
        let auth = AuthService::new(http.clone(), config.auth_url.clone(), store);
        let client = ApiClient::new(http, config.inventory_url.clone(), auth.clone());

        Ok(Self {
            config,
            auth,
            packages: PackageService::new(client.clone()),
            incidents: IncidentService::new(client),
        })
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Interactive login: remembers the last username and offers the
    /// keychain-stored password before prompting.
    pub async fn login_interactive(&mut self) -> Result<()> {
        println!("\n=== CourierSync Login ===\n");

        let username = match self.config.last_username.clone() {
            Some(last_user) => {
                print!("Username [{}]: ", last_user);
                io::stdout().flush()?;

                let mut input = String::new();
                io::stdin().read_line(&mut input)?;
                let input = input.trim();

                if input.is_empty() {
                    last_user
                } else {
                    input.to_string()
                }
            }
            None => Self::prompt_required("Username: ")?,
        };

        let (password, from_keychain) = match CredentialStore::stored_password(&username) {
            Some(stored) => {
                print!("Use stored password? [Y/n]: ");
                io::stdout().flush()?;

                let mut input = String::new();
                io::stdin().read_line(&mut input)?;

                if input.trim().eq_ignore_ascii_case("n") {
                    (rpassword::prompt_password("Password: ")?, false)
                } else {
                    (stored, true)
                }
            }
            None => (rpassword::prompt_password("Password: ")?, false),
        };

        println!("\nAuthenticating...");

        let credentials = LoginCredentials {
            username: username.clone(),
            password: password.clone(),
        };
        let session = match self.auth.login(&credentials).await {
            Ok(session) => session,
            Err(e) => {
                // A remembered password the service no longer accepts is
                // stale; drop it so the next attempt prompts.
                if from_keychain && matches!(e, ApiError::Authentication(_)) {
                    if let Err(forget_err) = CredentialStore::forget(&username) {
                        debug!(error = %forget_err, "could not drop stale keychain entry");
                    }
                }
                return Err(e.into());
            }
        };

        if let Err(e) = CredentialStore::store(&username, &password) {
            warn!(error = %e, "Failed to store credentials in keychain");
        }

        self.config.last_username = Some(username);
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }

        info!(role = %session.role, "Login successful");
        println!("Login successful! Role: {}", session.role);
        if !session.permissions.is_empty() {
            println!("Permissions: {}", session.permissions.join(", "));
        }
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Tracking report for a code; `None` when the service does not know it.
    pub async fn track(&self, code: &str) -> Result<Option<TrackingReport>> {
        let package = match self.packages.by_code(code).await {
            Ok(Some(package)) => package,
            Ok(None) => return Ok(None),
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        // A package without history still tracks; it just has no route yet.
        let locations = match self.packages.locations(code).await {
            Ok(locations) => locations,
            Err(e) if e.is_not_found() => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Some(TrackingReport::build(code, &package, locations)))
    }

    /// All packages, optionally filtered to tracking codes containing `filter`.
    pub async fn list_packages(&self, filter: Option<&str>) -> Result<Vec<Package>> {
        let mut packages = self.packages.all().await?;
        if let Some(term) = filter {
            packages.retain(|p| {
                p.tracking_code()
                    .map(|code| code.contains(term))
                    .unwrap_or(false)
            });
        }
        Ok(packages)
    }

    /// Packages on a route; with a code, just that package (empty when the
    /// code is unknown or not on a route).
    pub async fn in_route(&self, code: Option<&str>) -> Result<Vec<Package>> {
        match code {
            Some(code) => match self.packages.in_route_by_code(code).await {
                Ok(Some(package)) => Ok(vec![package]),
                Ok(None) => Ok(Vec::new()),
                Err(e) if e.is_not_found() => Ok(Vec::new()),
                Err(e) => Err(e.into()),
            },
            None => Ok(self.packages.in_route().await?),
        }
    }

    pub async fn inventory_summary(&self) -> Result<InventorySummary> {
        let packages = self.packages.all().await?;
        Ok(InventorySummary::from_packages(&packages))
    }

    /// Location history for a package, oldest first.
    pub async fn location_history(&self, code: &str) -> Result<Vec<LocationEntry>> {
        match self.packages.locations(code).await {
            Ok(mut entries) => {
                sort_by_recorded_time(&mut entries);
                Ok(entries)
            }
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn last_location(&self, code: &str) -> Result<Option<LocationEntry>> {
        match self.packages.last_location(code).await {
            Ok(entry) => Ok(entry),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Incidents, either all of them or those of one package.
    pub async fn incident_list(&self, code: Option<&str>) -> Result<Vec<Incident>> {
        match code {
            Some(code) => Ok(self.incidents.for_package(code).await?),
            None => Ok(self.incidents.all().await?),
        }
    }

    // =========================================================================
    // Updates
    // =========================================================================

    /// Prompt for a checkpoint kind and city, then register the location.
    pub async fn register_checkpoint_interactive(&self, code: &str) -> Result<()> {
        println!("\nCheckpoint kinds:");
        for (index, waypoint) in Waypoint::ALL.iter().enumerate() {
            println!("  {}. {}", index + 1, waypoint.label());
        }

        let waypoint = loop {
            let input = Self::prompt_required("Checkpoint [1-4]: ")?;
            match Waypoint::parse(&input) {
                Some(waypoint) => break waypoint,
                None => println!("Unrecognized checkpoint, try again."),
            }
        };
        let city = Self::prompt_required("City: ")?;

        let place = format!("{}, {}", waypoint.label(), city);
        let location = NewLocation::new(place.clone());
        self.packages.register_location(code, &location).await?;

        info!(code, place = %place, "Checkpoint registered");
        println!("Checkpoint registered: {place}");
        Ok(())
    }

    /// Prompt for the address parts, preview the composed line, and save.
    pub async fn correct_address_interactive(&self, code: &str) -> Result<()> {
        println!("\nRoad types:");
        for road in RoadType::ALL {
            println!("  {} ({})", road.abbreviation(), road.name());
        }

        let road_type = loop {
            let input = Self::prompt_required("Road type: ")?;
            match RoadType::parse(&input) {
                Some(road) => break road,
                None => println!("Unrecognized road type, try again."),
            }
        };
        let number = Self::prompt_required("Number: ")?;
        let section = Self::prompt_optional("Section (optional): ")?;
        let orientation = match Self::prompt_optional("Orientation [Sur/Este/Oeste] (optional): ")? {
            Some(input) => match Orientation::parse(&input) {
                Some(orientation) => Some(orientation),
                None => {
                    println!("Unrecognized orientation, leaving it out.");
                    None
                }
            },
            None => None,
        };
        let crossing = Self::prompt_optional("Crossing number (optional): ")?;
        let meters = Self::prompt_optional("Meters (optional): ")?;
        let neighborhood = Self::prompt_optional("Neighborhood (optional): ")?;
        let recipient = Self::prompt_optional("New recipient (optional): ")?;

        let address = StreetAddress {
            road_type,
            number,
            section,
            orientation,
            crossing,
            meters,
            neighborhood,
        };
        println!("\nAddress preview: {}", address.line());

        print!("Save? [Y/n]: ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if input.trim().eq_ignore_ascii_case("n") {
            println!("Discarded.");
            return Ok(());
        }

        let update = AddressUpdate {
            address: Some(address.line()),
            recipient,
        };
        self.packages.update_address(code, &update).await?;

        info!(code, "Delivery address updated");
        println!("Delivery address updated.");
        Ok(())
    }

    /// Record a shipment incident against a package.
    pub async fn report_incident(
        &self,
        code: &str,
        description: &str,
        kind: Option<String>,
    ) -> Result<Option<Incident>> {
        let incident = NewIncident {
            package_code: code.to_string(),
            description: description.to_string(),
            kind,
        };
        Ok(self.incidents.create(&incident).await?)
    }

    // =========================================================================
    // Prompt helpers
    // =========================================================================

    fn prompt_required(prompt: &str) -> Result<String> {
        loop {
            print!("{prompt}");
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            let input = input.trim();
            if !input.is_empty() {
                return Ok(input.to_string());
            }
            println!("A value is required.");
        }
    }

    fn prompt_optional(prompt: &str) -> Result<Option<String>> {
        print!("{prompt}");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();
        Ok(if input.is_empty() {
            None
        } else {
            Some(input.to_string())
        })
    }
}
