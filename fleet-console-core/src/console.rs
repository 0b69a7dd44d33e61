use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use log::info;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::api::{FleetClient, Resource};
use crate::clock::{Clock, SystemClock};
use crate::config::ConsoleConfig;
use crate::controller::{CompletionOutcome, ListSettings, PagedListController};
use crate::endpoint::ReportEndpoint;
use crate::error::ConsoleError;
use crate::export::{ExportFormat, FileSink, export_report};
use crate::models::{Driver, Maintenance, Report, ReportKind, Trip, Vehicle};
use crate::report::{ReportPeriod, ReportScreen};
use crate::session::ListSession;

/// The four server-paged entity lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Vehicles,
    Drivers,
    Trips,
    Maintenances,
}

impl EntityKind {
    pub fn default_sort(self) -> &'static str {
        match self {
            EntityKind::Vehicles => "licensePlate",
            EntityKind::Drivers => "name",
            EntityKind::Trips => "startDateTime",
            EntityKind::Maintenances => "scheduledDate",
        }
    }

    pub fn error_message(self) -> &'static str {
        match self {
            EntityKind::Vehicles => "Failed to load vehicles",
            EntityKind::Drivers => "Failed to load drivers",
            EntityKind::Trips => "Failed to load trips",
            EntityKind::Maintenances => "Failed to load maintenances",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Vehicles => "vehicles",
            EntityKind::Drivers => "drivers",
            EntityKind::Trips => "trips",
            EntityKind::Maintenances => "maintenances",
        };
        f.write_str(name)
    }
}

/// Entry point tying configuration, the API client and the clock together.
pub struct FleetConsole {
    config: ConsoleConfig,
    client: FleetClient,
    clock: Arc<dyn Clock>,
}

impl FleetConsole {
    pub fn new(config: ConsoleConfig) -> Result<Self, ConsoleError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: ConsoleConfig, clock: Arc<dyn Clock>) -> Result<Self, ConsoleError> {
        config.validate()?;
        let client = FleetClient::from_config(&config)?;
        info!("Fleet console bound to {}", client.base_url());
        Ok(Self {
            config,
            client,
            clock,
        })
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn client(&self) -> &FleetClient {
        &self.client
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn list_settings(&self, entity: EntityKind) -> ListSettings {
        ListSettings::new(entity.default_sort(), entity.error_message())
            .with_page_sizes(
                self.config.page_size_options.clone(),
                self.config.default_page_size,
            )
            .with_window_width(self.config.page_window_width)
    }

    fn session<T>(
        &self,
        entity: EntityKind,
        resource: Resource<T>,
    ) -> Result<ListSession<T, Resource<T>>, ConsoleError>
    where
        T: DeserializeOwned + Serialize + Send + Sync + 'static,
    {
        let controller = PagedListController::new(self.list_settings(entity))?;
        Ok(ListSession::new(controller, Arc::new(resource)))
    }

    pub fn vehicle_list(&self) -> Result<ListSession<Vehicle, Resource<Vehicle>>, ConsoleError> {
        self.session(EntityKind::Vehicles, self.client.vehicles())
    }

    pub fn driver_list(&self) -> Result<ListSession<Driver, Resource<Driver>>, ConsoleError> {
        self.session(EntityKind::Drivers, self.client.drivers())
    }

    pub fn trip_list(&self) -> Result<ListSession<Trip, Resource<Trip>>, ConsoleError> {
        self.session(EntityKind::Trips, self.client.trips())
    }

    pub fn maintenance_list(
        &self,
    ) -> Result<ListSession<Maintenance, Resource<Maintenance>>, ConsoleError> {
        self.session(EntityKind::Maintenances, self.client.maintenances())
    }

    pub fn report_screen<R: Report>(&self) -> ReportScreen<R> {
        ReportScreen::with_page_sizes(
            self.clock.as_ref(),
            self.config.report_page_size_options.clone(),
        )
    }

    pub async fn export(
        &self,
        kind: ReportKind,
        period: Option<&ReportPeriod>,
        format: ExportFormat,
        sink: &dyn FileSink,
    ) -> Result<PathBuf, ConsoleError> {
        export_report(&self.client, kind, period, format, self.clock.as_ref(), sink).await
    }
}

/// Issues the screen's report request through `endpoint` and applies the
/// response. `None` when the screen issued nothing.
pub async fn generate_report<R, E>(
    screen: &mut ReportScreen<R>,
    endpoint: &E,
) -> Option<CompletionOutcome>
where
    R: Report,
    E: ReportEndpoint<R>,
{
    let ticket = screen.generate()?;
    let result = endpoint.fetch_report(&ticket).await;
    Some(screen.complete(ticket.seq, result))
}
