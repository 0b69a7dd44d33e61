mod render;

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use itertools::Itertools;
use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;

use fleet_console_core::clock::parse_iso_date;
use fleet_console_core::models::{
    CorrectiveMaintenanceReport, CostReport, DepreciationReport, DriverFilter,
    DriverPerformanceReport, DriverStatus, FleetUtilizationReport, MaintenanceFilter,
    MaintenanceReport, MaintenanceStatus, MaintenanceType, ReportKind, TripFilter, TripReport,
    VehicleFilter,
};
use fleet_console_core::{
    Clock, ConsoleConfig, DirectorySink, ExportFormat, FilterState, FleetConsole, ListEndpoint,
    ListSession, ReportPeriod, ReportTab, Resource, SubTable, default_period, generate_report,
};

use render::{RenderReport, Tabular, dashboard_pairs, page_links, print_pairs, print_table};

type CliResult = Result<(), Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "fleet-console")]
#[command(about = "Browse the fleet back office and its reports from the command line")]
struct Cli {
    /// API root URL, overriding the config file and FLEET_CONSOLE_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Config file to use instead of the platform default
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Vehicles
    Vehicles {
        #[command(subcommand)]
        action: VehicleAction,
    },
    /// Drivers
    Drivers {
        #[command(subcommand)]
        action: DriverAction,
    },
    /// Trips
    Trips {
        #[command(subcommand)]
        action: TripAction,
    },
    /// Maintenance orders
    Maintenances {
        #[command(subcommand)]
        action: MaintenanceAction,
    },
    /// Generate a report and show one of its tables
    Report {
        /// costs, fleet-utilization, maintenance, corrective-maintenance,
        /// driver-performance, trips or depreciation
        kind: String,
        #[command(flatten)]
        period: PeriodArgs,
        /// Sub-table to show (defaults to the report's first tab)
        #[arg(long)]
        table: Option<String>,
        /// Page of the sub-table, counting from 1
        #[arg(long, default_value_t = 1, value_parser = parse_page)]
        page: usize,
        /// Rows per page (5, 10, 25, 50 or 100)
        #[arg(long)]
        size: Option<usize>,
    },
    /// Download a report as a spreadsheet or PDF
    Export {
        kind: String,
        /// excel or pdf
        format: String,
        #[command(flatten)]
        period: PeriodArgs,
        /// Target directory (defaults to export_dir from the config, then ".")
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Fleet totals
    Dashboard,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Page to show, counting from 1
    #[arg(long, default_value_t = 1, value_parser = parse_page)]
    page: usize,
    /// Rows per page
    #[arg(long)]
    size: Option<usize>,
    /// Sort field; repeat the same field to sort descending
    #[arg(long = "sort")]
    sort: Vec<String>,
}

#[derive(Args, Debug)]
struct PeriodArgs {
    /// First day, yyyy-MM-dd
    #[arg(long)]
    start: Option<String>,
    /// Last day, yyyy-MM-dd
    #[arg(long)]
    end: Option<String>,
}

#[derive(Subcommand)]
enum CrudAction {
    /// Print one record as JSON
    Show { id: String },
    /// Create a record from a JSON file
    Create { file: PathBuf },
    /// Replace a record with the contents of a JSON file
    Update { id: String, file: PathBuf },
    /// Delete a record
    Delete { id: String },
}

#[derive(Subcommand)]
enum VehicleAction {
    /// List vehicles one page at a time
    List {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        plate: Option<String>,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        year_from: Option<i32>,
        #[arg(long)]
        year_to: Option<i32>,
    },
    #[command(flatten)]
    Record(CrudAction),
}

#[derive(Subcommand)]
enum DriverAction {
    /// List drivers one page at a time
    List {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        cpf: Option<String>,
        /// active, inactive, on-leave or suspended
        #[arg(long)]
        status: Option<String>,
    },
    #[command(flatten)]
    Record(CrudAction),
}

#[derive(Subcommand)]
enum TripAction {
    /// List trips one page at a time
    List {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        vehicle_id: Option<String>,
        #[arg(long)]
        driver_id: Option<String>,
        /// Only trips that have not ended
        #[arg(long)]
        in_progress: bool,
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        end_date: Option<String>,
    },
    /// Close a trip at the given odometer reading
    Complete {
        id: String,
        #[arg(long)]
        end_mileage: f64,
        #[arg(long)]
        notes: Option<String>,
    },
    #[command(flatten)]
    Record(CrudAction),
}

#[derive(Subcommand)]
enum MaintenanceAction {
    /// List maintenance orders one page at a time
    List {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        vehicle_id: Option<String>,
        /// scheduled, in-progress, completed or cancelled
        #[arg(long)]
        status: Option<String>,
        /// preventive, corrective, inspection or repair
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        end_date: Option<String>,
    },
    /// Move a scheduled order into the shop
    Start { id: String },
    /// Close an order in progress
    Complete {
        id: String,
        #[arg(long)]
        final_cost: Option<f64>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Cancel a scheduled or running order
    Cancel {
        id: String,
        #[arg(long)]
        reason: Option<String>,
    },
    #[command(flatten)]
    Record(CrudAction),
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            // RUST_LOG=fleet_console_core::session=debug shows every request
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fleet_console_core=info,fleet_console=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> CliResult {
    init_logging();

    let cli = Cli::parse();
    let mut config = ConsoleConfig::load(cli.config.as_deref())?;
    if let Some(url) = &cli.api_url {
        config.apply_api_url_override(url);
    }
    let console = FleetConsole::new(config)?;

    match cli.command {
        Commands::Vehicles { action } => match action {
            VehicleAction::List {
                list,
                plate,
                brand,
                model,
                year_from,
                year_to,
            } => {
                let filter = VehicleFilter {
                    license_plate: plate,
                    brand,
                    model,
                    year_from,
                    year_to,
                };
                run_list(console.vehicle_list()?, filter.into(), &list, console.clock()).await
            }
            VehicleAction::Record(action) => run_record(console.client().vehicles(), action).await,
        },
        Commands::Drivers { action } => match action {
            DriverAction::List {
                list,
                name,
                cpf,
                status,
            } => {
                let filter = DriverFilter {
                    name,
                    cpf,
                    status: parse_opt(status, "driver status", DriverStatus::from_param)?,
                };
                run_list(console.driver_list()?, filter.into(), &list, console.clock()).await
            }
            DriverAction::Record(action) => run_record(console.client().drivers(), action).await,
        },
        Commands::Trips { action } => match action {
            TripAction::List {
                list,
                vehicle_id,
                driver_id,
                in_progress,
                start_date,
                end_date,
            } => {
                let filter = TripFilter {
                    vehicle_id,
                    driver_id,
                    in_progress: in_progress.then_some(true),
                    start_date: start_date.as_deref().map(parse_iso_date).transpose()?,
                    end_date: end_date.as_deref().map(parse_iso_date).transpose()?,
                };
                run_list(console.trip_list()?, filter.into(), &list, console.clock()).await
            }
            TripAction::Complete {
                id,
                end_mileage,
                notes,
            } => {
                let trip = console
                    .client()
                    .trips()
                    .complete_trip(&id, end_mileage, notes.as_deref())
                    .await?;
                print_json(&trip)
            }
            TripAction::Record(action) => run_record(console.client().trips(), action).await,
        },
        Commands::Maintenances { action } => {
            let resource = console.client().maintenances();
            match action {
                MaintenanceAction::List {
                    list,
                    vehicle_id,
                    status,
                    kind,
                    start_date,
                    end_date,
                } => {
                    let filter = MaintenanceFilter {
                        vehicle_id,
                        status: parse_opt(
                            status,
                            "maintenance status",
                            MaintenanceStatus::from_param,
                        )?,
                        kind: parse_opt(kind, "maintenance type", MaintenanceType::from_param)?,
                        start_date: start_date.as_deref().map(parse_iso_date).transpose()?,
                        end_date: end_date.as_deref().map(parse_iso_date).transpose()?,
                    };
                    run_list(
                        console.maintenance_list()?,
                        filter.into(),
                        &list,
                        console.clock(),
                    )
                    .await
                }
                MaintenanceAction::Start { id } => {
                    print_json(&resource.start_maintenance(&id).await?)
                }
                MaintenanceAction::Complete {
                    id,
                    final_cost,
                    notes,
                } => print_json(
                    &resource
                        .complete_maintenance(&id, final_cost, notes.as_deref())
                        .await?,
                ),
                MaintenanceAction::Cancel { id, reason } => {
                    print_json(&resource.cancel_maintenance(&id, reason.as_deref()).await?)
                }
                MaintenanceAction::Record(action) => run_record(resource, action).await,
            }
        }
        Commands::Report {
            kind,
            period,
            table,
            page,
            size,
        } => {
            let view = TableArgs { table, page, size };
            match parse_kind(&kind)? {
                ReportKind::Costs => run_report::<CostReport>(&console, &period, &view).await,
                ReportKind::FleetUtilization => {
                    run_report::<FleetUtilizationReport>(&console, &period, &view).await
                }
                ReportKind::Maintenance => {
                    run_report::<MaintenanceReport>(&console, &period, &view).await
                }
                ReportKind::CorrectiveMaintenance => {
                    run_report::<CorrectiveMaintenanceReport>(&console, &period, &view).await
                }
                ReportKind::DriverPerformance => {
                    run_report::<DriverPerformanceReport>(&console, &period, &view).await
                }
                ReportKind::Trips => run_report::<TripReport>(&console, &period, &view).await,
                ReportKind::Depreciation => {
                    run_report::<DepreciationReport>(&console, &period, &view).await
                }
            }
        }
        Commands::Export {
            kind,
            format,
            period,
            out,
        } => {
            let kind = parse_kind(&kind)?;
            let format = ExportFormat::from_name(&format).ok_or_else(|| {
                format!("unknown export format '{}', expected excel or pdf", format)
            })?;
            let period = resolve_period(kind, console.clock(), &period)?;
            let dir = out
                .or_else(|| console.config().export_dir.clone())
                .unwrap_or_else(|| PathBuf::from("."));
            let sink = DirectorySink::new(dir);
            let path = console.export(kind, period.as_ref(), format, &sink).await?;
            println!("Saved {}", path.display());
            Ok(())
        }
        Commands::Dashboard => {
            let stats = console.client().fetch_dashboard().await?;
            print_pairs(&dashboard_pairs(&stats));
            Ok(())
        }
    }
}

/// Pages on the command line count from 1.
fn parse_page(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("pages count from 1".to_string()),
        Ok(page) => Ok(page),
        Err(e) => Err(e.to_string()),
    }
}

fn parse_opt<T>(
    value: Option<String>,
    what: &str,
    parse: fn(&str) -> Option<T>,
) -> Result<Option<T>, Box<dyn Error>> {
    value
        .map(|v| parse(&v).ok_or_else(|| format!("unknown {} '{}'", what, v).into()))
        .transpose()
}

fn parse_kind(slug: &str) -> Result<ReportKind, Box<dyn Error>> {
    ReportKind::from_slug(slug).ok_or_else(|| {
        format!(
            "unknown report '{}', expected one of: {}",
            slug,
            ReportKind::ALL.iter().map(|k| k.slug()).join(", ")
        )
        .into()
    })
}

/// The report's default period with any bound given on the command line
/// replaced.
fn resolve_period(
    kind: ReportKind,
    clock: &dyn Clock,
    args: &PeriodArgs,
) -> Result<Option<ReportPeriod>, Box<dyn Error>> {
    let Some(default) = default_period(kind, clock) else {
        return Ok(None);
    };
    let start = match &args.start {
        Some(s) => parse_iso_date(s)?,
        None => default.start(),
    };
    let end = match &args.end {
        Some(s) => parse_iso_date(s)?,
        None => default.end(),
    };
    Ok(Some(ReportPeriod::new(start, end)?))
}

fn print_json<T: Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn Error>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    Ok(serde_json::from_str(&contents)?)
}

async fn run_record<T>(resource: Resource<T>, action: CrudAction) -> CliResult
where
    T: DeserializeOwned + Serialize,
{
    match action {
        CrudAction::Show { id } => print_json(&resource.get(&id).await?),
        CrudAction::Create { file } => {
            let row: T = read_json(&file)?;
            print_json(&resource.create(&row).await?)
        }
        CrudAction::Update { id, file } => {
            let row: T = read_json(&file)?;
            print_json(&resource.update(&id, &row).await?)
        }
        CrudAction::Delete { id } => {
            resource.delete(&id).await?;
            println!("Deleted {}/{}", resource.path(), id);
            Ok(())
        }
    }
}

/// Applies filter, page size and sort, then moves to the requested page.
/// Filter, size and sort requests are fired back to back; only the last one
/// is applied.
async fn run_list<T, E>(
    mut session: ListSession<T, E>,
    filter: FilterState,
    args: &ListArgs,
    clock: &dyn Clock,
) -> CliResult
where
    T: Tabular + Send + 'static,
    E: ListEndpoint<T>,
{
    session.act(|c| c.set_filter(filter));
    if let Some(size) = args.size {
        if !session.act(|c| c.set_page_size(size)) {
            return Err(format!(
                "page size {} is not one of {:?}",
                size,
                session.controller().settings().allowed_sizes
            )
            .into());
        }
    }
    for field in &args.sort {
        session.act(|c| c.set_sort(field));
    }
    let outcomes = session.settle().await;
    debug!("initial load outcomes: {:?}", outcomes);

    if args.page > 1 {
        if !session.act(|c| c.go_to_page(args.page - 1)) {
            return Err(format!(
                "page {} is out of range (1-{})",
                args.page,
                session.controller().total_pages()
            )
            .into());
        }
        session.settle().await;
    }

    let list = session.controller();
    if let Some(error) = list.view().error() {
        return Err(error.into());
    }

    if list.rows().is_empty() {
        println!("No records found.");
    } else {
        let rows: Vec<Vec<String>> = list.rows().iter().map(|row| row.cells(clock)).collect();
        print_table(T::HEADERS, &rows);
    }

    // The controller pages from 0; people count from 1.
    let current = list.page() + 1;
    println!();
    println!(
        "Page {} of {} ({} records, sorted by {} {})  {}",
        current,
        list.total_pages().max(1),
        list.total_elements(),
        list.sort().field,
        list.sort().direction,
        page_links(list.page_window().map(|p| p + 1), current)
    );
    Ok(())
}

struct TableArgs {
    table: Option<String>,
    page: usize,
    size: Option<usize>,
}

async fn run_report<R: RenderReport>(
    console: &FleetConsole,
    period: &PeriodArgs,
    view: &TableArgs,
) -> CliResult {
    let mut screen = console.report_screen::<R>();
    if period.start.is_some() || period.end.is_some() {
        let current = screen.period();
        let start = match &period.start {
            Some(s) => Some(parse_iso_date(s)?),
            None => current.map(|p| p.start()),
        };
        let end = match &period.end {
            Some(s) => Some(parse_iso_date(s)?),
            None => current.map(|p| p.end()),
        };
        screen.set_period(start, end);
    }

    generate_report(&mut screen, console.client()).await;
    if let Some(error) = screen.view().error() {
        return Err(error.into());
    }
    let Some(report) = screen.report() else {
        return Err("report was not loaded".into());
    };
    if let Some(period) = screen.period() {
        debug!("{} report for {}", R::KIND, period);
    }
    print_pairs(&report.summary());

    let tab = match &view.table {
        Some(slug) => {
            let table = SubTable::from_slug(slug)
                .ok_or_else(|| format!("unknown table '{}'", slug))?;
            if !screen.set_active_tab(ReportTab::Table(table)) {
                let tabs = R::KIND.sub_tables().iter().map(|t| t.slug()).join(", ");
                return Err(
                    format!("{} report has no '{}' table (tables: {})", R::KIND, slug, tabs).into(),
                );
            }
            screen.active_tab()
        }
        None => screen.active_tab(),
    };
    let ReportTab::Table(table) = tab else {
        return Ok(());
    };

    if let Some(size) = view.size {
        if !screen.set_page_size(table, size) {
            return Err(format!("page size {} is not allowed here", size).into());
        }
    }
    if view.page > 1 && !screen.change_page(table, view.page) {
        return Err(format!("page {} is out of range", view.page).into());
    }

    let (Some(report), Some(pager)) = (screen.report(), screen.pager(table)) else {
        return Ok(());
    };
    let (headers, rows) = report.table(table);
    println!();
    println!("{}", table);
    print_table(headers, pager.slice(&rows));
    println!(
        "{}  {}",
        pager.range_label(rows.len()),
        page_links(
            pager.page_links(rows.len(), console.config().page_window_width),
            pager.current_page()
        )
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_zero_is_rejected() {
        assert!(parse_page("0").is_err());
        assert!(parse_page("-1").is_err());
        assert_eq!(parse_page("3"), Ok(3));

        assert!(Cli::try_parse_from(["fleet-console", "drivers", "list", "--page", "0"]).is_err());
        assert!(
            Cli::try_parse_from(["fleet-console", "report", "trips", "--page", "0"]).is_err()
        );
    }

    #[test]
    fn test_list_page_defaults_to_first() {
        let cli = Cli::try_parse_from(["fleet-console", "vehicles", "list"]).unwrap();
        let Commands::Vehicles {
            action: VehicleAction::List { list, .. },
        } = cli.command
        else {
            panic!("expected vehicles list");
        };
        assert_eq!(list.page, 1);
    }
}
