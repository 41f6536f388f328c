//! `eventdash` command-line front end.
//!
//! # Responsibility
//! - Parse commands and hand them to `EventDashboard`.
//! - Print tables, charts and outcomes; exit non-zero on any failure.

mod commands;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use eventdash_core::{
    Backend, Category, DashboardConfig, EventDashboard, EventId, Priority, RsvpStatus, TaskStatus,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "eventdash")]
#[command(about = "Manage events, guest lists and tasks stored as CSV files or SQLite")]
#[command(version)]
struct Cli {
    /// Config file (defaults to <config dir>/eventdash/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the storage backend from the config file
    #[arg(long, global = true, value_enum)]
    backend: Option<BackendArg>,

    /// Override the data directory (CSV files, or the folder holding eventdash.db)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    Csv,
    Sqlite,
}

#[derive(Subcommand)]
enum Commands {
    /// Create, list and delete events
    #[command(subcommand)]
    Events(EventCommand),
    /// Manage the guest list of an event
    #[command(subcommand)]
    Attendees(AttendeeCommand),
    /// Track tasks for an event
    #[command(subcommand)]
    Tasks(TaskCommand),
    /// Show RSVP, task status or timeline charts
    Chart(ChartArgs),
    /// Inspect or create the config file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
enum EventCommand {
    List,
    Add {
        #[arg(long)]
        name: String,
        /// Date, e.g. 2025-06-01
        #[arg(long)]
        date: String,
        /// Time, e.g. 18:30:00
        #[arg(long, default_value = "")]
        time: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Delete an event together with its attendees and tasks
    Delete { id: EventId },
}

#[derive(Subcommand)]
enum AttendeeCommand {
    List {
        #[arg(short, long)]
        event: Option<EventId>,
    },
    Add {
        #[arg(short, long)]
        event: EventId,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Pending, Confirmed or Declined
        #[arg(long, default_value = "Pending", value_parser = parse_category::<RsvpStatus>)]
        rsvp: RsvpStatus,
        /// e.g. Guest, Speaker
        #[arg(long, default_value = "")]
        role: String,
        #[arg(long, default_value = "")]
        dietary: String,
    },
}

#[derive(Subcommand)]
enum TaskCommand {
    List {
        #[arg(short, long)]
        event: Option<EventId>,
    },
    Add {
        #[arg(short, long)]
        event: EventId,
        #[arg(long)]
        name: String,
        /// Deadline, e.g. 2025-05-20
        #[arg(long)]
        deadline: String,
        /// Not Started, In Progress, Completed or Delayed
        #[arg(long, default_value = "Not Started", value_parser = parse_category::<TaskStatus>)]
        status: TaskStatus,
        /// Low, Medium or High (default Medium)
        #[arg(long, value_parser = parse_category::<Priority>)]
        priority: Option<Priority>,
    },
    /// Set the status of every task with this name in the event
    Update {
        #[arg(short, long)]
        event: EventId,
        #[arg(long)]
        name: String,
        #[arg(long, value_parser = parse_category::<TaskStatus>)]
        status: TaskStatus,
    },
}

#[derive(Args)]
struct ChartArgs {
    #[arg(value_enum)]
    kind: ChartArg,
    #[arg(short, long)]
    event: EventId,
    /// Print chart data as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ChartArg {
    Rsvp,
    Tasks,
    Timeline,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Write a commented default config file
    Init,
    /// Print the effective configuration
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = match cli.config.clone() {
        Some(path) => path,
        None => default_config_path()?,
    };

    if let Commands::Config(ConfigCommand::Init) = cli.command {
        return commands::config_init(&config_path);
    }

    let config = effective_config(&cli, &config_path)?;
    if let Err(err) = eventdash_core::init_logging_from(&config.logging) {
        eprintln!("warning: logging disabled: {err}");
    }

    if let Commands::Config(ConfigCommand::Show) = cli.command {
        return commands::config_show(&config_path, &config);
    }

    let store = config
        .open_store()
        .context("could not open the dashboard store")?;
    let dashboard = EventDashboard::with_tables(store, config.tables.clone());

    match cli.command {
        Commands::Events(command) => match command {
            EventCommand::List => commands::events_list(&dashboard),
            EventCommand::Add {
                name,
                date,
                time,
                location,
                description,
            } => commands::events_add(&dashboard, name, date, time, location, description),
            EventCommand::Delete { id } => commands::events_delete(&dashboard, id),
        },
        Commands::Attendees(command) => match command {
            AttendeeCommand::List { event } => commands::attendees_list(&dashboard, event),
            AttendeeCommand::Add {
                event,
                name,
                email,
                rsvp,
                role,
                dietary,
            } => {
                let attendee = eventdash_core::Attendee::new(event, name, email)
                    .rsvp(rsvp)
                    .role(role)
                    .dietary(dietary);
                commands::attendees_add(&dashboard, &attendee)
            }
        },
        Commands::Tasks(command) => match command {
            TaskCommand::List { event } => commands::tasks_list(&dashboard, event),
            TaskCommand::Add {
                event,
                name,
                deadline,
                status,
                priority,
            } => {
                let mut task = eventdash_core::NewTask::new(event, name, deadline).status(status);
                if let Some(priority) = priority {
                    task = task.priority(priority);
                }
                commands::tasks_add(&dashboard, task)
            }
            TaskCommand::Update {
                event,
                name,
                status,
            } => commands::tasks_update(&dashboard, event, &name, &status),
        },
        Commands::Chart(args) => match args.kind {
            ChartArg::Rsvp => commands::chart_rsvp(&dashboard, args.event, args.json),
            ChartArg::Tasks => commands::chart_tasks(&dashboard, args.event, args.json),
            ChartArg::Timeline => commands::chart_timeline(&dashboard, args.event, args.json),
        },
        Commands::Config(_) => Ok(()),
    }
}

fn default_config_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().context("could not determine the config directory")?;
    Ok(dir.join("eventdash").join("config.toml"))
}

/// Loads the config file and applies command-line overrides.
///
/// Relative storage paths are resolved against the current directory.
fn effective_config(cli: &Cli, config_path: &Path) -> Result<DashboardConfig> {
    let mut config = DashboardConfig::load(config_path)?;
    if let Some(backend) = cli.backend {
        config.storage.backend = match backend {
            BackendArg::Csv => Backend::Csv,
            BackendArg::Sqlite => Backend::Sqlite,
        };
    }
    if let Some(path) = &cli.data_dir {
        match config.storage.backend {
            Backend::Csv => config.storage.data_dir = path.clone(),
            Backend::Sqlite => config.storage.database = path.join("eventdash.db"),
        }
    }
    let cwd = std::env::current_dir().context("could not read the current directory")?;
    Ok(config.resolve_relative_to(&cwd))
}

fn parse_category<C: Category + Send + Sync + 'static>(input: &str) -> Result<C, String> {
    C::parse_known(input).ok_or_else(|| {
        let known = C::declared()
            .iter()
            .map(|value| value.label().to_string())
            .collect::<Vec<_>>();
        format!("expected one of: {}", known.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use super::{effective_config, parse_category, Cli};
    use clap::{CommandFactory, Parser};
    use eventdash_core::{Backend, TaskStatus};
    use std::path::PathBuf;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("eventdash").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_overrides_keeps_file_settings() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            "[storage]\nbackend = \"sqlite\"\ndatabase = \"/srv/dash/events.db\"\n",
        )
        .unwrap();

        let config = effective_config(&parse(&["events", "list"]), &config_path).unwrap();
        assert_eq!(config.storage.backend, Backend::Sqlite);
        assert_eq!(config.storage.database, PathBuf::from("/srv/dash/events.db"));
    }

    #[test]
    fn data_dir_override_targets_the_csv_directory() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("tables");
        let cli = parse(&[
            "--data-dir",
            data_dir.to_str().unwrap(),
            "events",
            "list",
        ]);

        let config = effective_config(&cli, &dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.storage.backend, Backend::Csv);
        assert_eq!(config.storage.data_dir, data_dir);
    }

    #[test]
    fn sqlite_override_places_database_inside_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let cli = parse(&[
            "--backend",
            "sqlite",
            "--data-dir",
            dir.path().to_str().unwrap(),
            "tasks",
            "list",
        ]);

        let config = effective_config(&cli, &dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.storage.backend, Backend::Sqlite);
        assert_eq!(config.storage.database, dir.path().join("eventdash.db"));
    }

    #[test]
    fn relative_storage_paths_resolve_against_current_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = effective_config(&parse(&["events", "list"]), &dir.path().join("absent.toml"))
            .unwrap();
        assert!(config.storage.data_dir.is_absolute());
        assert!(config.storage.data_dir.ends_with("eventdash-data"));
    }

    #[test]
    fn category_parser_accepts_declared_labels_only() {
        assert_eq!(
            parse_category::<TaskStatus>(" in progress "),
            Ok(TaskStatus::InProgress)
        );
        let err = parse_category::<TaskStatus>("blocked").unwrap_err();
        assert_eq!(
            err,
            "expected one of: Not Started, In Progress, Completed, Delayed"
        );
    }

    #[test]
    fn status_flag_rejects_unknown_labels() {
        let result = Cli::try_parse_from([
            "eventdash", "tasks", "update", "--event", "1", "--name", "Setup", "--status", "Done",
        ]);
        assert!(result.is_err());
    }
}
