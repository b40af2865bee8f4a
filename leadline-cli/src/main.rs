use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use colored::*;
use leadline_core::logging::init_tracing;
use leadline_core::json::to_pretty_json;
use leadline_core::{Clock, CoreConfig, SystemClock};
use leadline_engine::{CreatorScope, LeadService, LeadUpdate};
use leadline_protocol::lead::{
    CallStatus, Caller, FollowupStatus, LeadFilter, LeadId, LeadRecord, LeadStatus,
    LeadTemperature, MonthFilter, NewLead,
};
use leadline_store::SqliteLeadStore;
use serde::Serialize;
use tracing::debug;

mod error;
mod output;

use error::CliError;

type Service = LeadService<SqliteLeadStore>;

#[derive(Parser)]
#[command(name = "leadline")]
#[command(about = "Leadline - sales lead tracking and reporting", long_about = None)]
struct Cli {
    /// Identity of the caller, as issued by the identity provider
    #[arg(long, global = true, env = "LEADLINE_USER")]
    user: Option<String>,
    /// Caller holds the admin role
    #[arg(long, global = true, default_value_t = false)]
    admin: bool,
    /// Caller holds the superuser role
    #[arg(long, global = true, default_value_t = false)]
    superuser: bool,
    /// Overrides LEADLINE_DATABASE_PATH
    #[arg(long, global = true)]
    database: Option<PathBuf>,
    /// Overrides LEADLINE_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a new lead
    Add(AddArgs),
    /// Update status, scheduling or notes of a lead
    Update(UpdateArgs),
    /// Move a lead to the trash
    Delete {
        id: LeadId,
    },
    /// List active leads, most recent first
    List(ListArgs),
    /// List deleted leads
    Trash,
    /// Performance summaries
    #[command(subcommand)]
    Report(ReportCommands),
    /// Leads with a follow-up due today or earlier
    Followups,
    /// Mark a lead's follow-up as completed
    Complete {
        id: LeadId,
    },
    /// List everyone who has created visible leads
    Creators,
    /// Write the filtered leads as JSON
    Export(ExportArgs),
    /// Show version information
    Version,
}

#[derive(Args)]
struct AddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    email: Option<String>,
    #[arg(long, default_value = "Cold")]
    temperature: LeadTemperature,
    #[arg(long, default_value = "Student")]
    status: LeadStatus,
    #[arg(long, default_value = "Call taken")]
    call_status: CallStatus,
    #[arg(long, default_value_t = false)]
    details_shared: bool,
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Args)]
struct UpdateArgs {
    id: LeadId,
    #[arg(long)]
    status: Option<LeadStatus>,
    #[arg(long)]
    call_status: Option<CallStatus>,
    #[arg(long)]
    temperature: Option<LeadTemperature>,
    #[arg(long)]
    followup_status: Option<FollowupStatus>,
    /// Next follow-up date (YYYY-MM-DD)
    #[arg(long, conflicts_with = "clear_next_followup")]
    next_followup: Option<NaiveDate>,
    #[arg(long, default_value_t = false)]
    clear_next_followup: bool,
    /// Note appended to the follow-up history
    #[arg(long)]
    note: Option<String>,
}

#[derive(Args)]
struct ScopeArgs {
    /// Restrict to these creators (admins only; comma separated)
    #[arg(long = "creator", value_delimiter = ',')]
    creators: Vec<String>,
}

impl ScopeArgs {
    fn scope(&self) -> CreatorScope {
        CreatorScope::only(self.creators.iter().cloned())
    }
}

#[derive(Args)]
struct FilterArgs {
    /// `All`, 1-12 or a month name
    #[arg(long, default_value = "All")]
    month: MonthFilter,
    #[arg(long = "status", value_delimiter = ',')]
    statuses: Vec<LeadStatus>,
    #[arg(long = "call-status", value_delimiter = ',')]
    call_statuses: Vec<CallStatus>,
    /// First added date to include (YYYY-MM-DD)
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,
    /// Last added date to include (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,
    #[command(flatten)]
    scope: ScopeArgs,
}

impl FilterArgs {
    fn filter(&self) -> LeadFilter {
        let filter = LeadFilter::new()
            .month(self.month)
            .lead_statuses(self.statuses.iter().copied())
            .call_statuses(self.call_statuses.iter().copied());
        match (self.from, self.to) {
            (Some(from), Some(to)) => filter.created_between(from, to),
            _ => filter,
        }
    }
}

#[derive(Args)]
struct ListArgs {
    #[command(flatten)]
    filter: FilterArgs,
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Args)]
struct ExportArgs {
    #[command(flatten)]
    filter: FilterArgs,
    /// Output file; stdout when omitted
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum ReportCommands {
    /// Leads added today
    Daily {
        #[command(flatten)]
        scope: ScopeArgs,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Leads added in a month, with the per-day distribution
    Monthly {
        #[arg(long, default_value = "All")]
        month: MonthFilter,
        #[command(flatten)]
        scope: ScopeArgs,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    generated_by: &'a str,
    filter: &'a LeadFilter,
    leads: &'a [LeadRecord],
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let Cli {
        user,
        admin,
        superuser,
        database,
        log_level,
        command,
    } = cli;

    if let Commands::Version = command {
        println!("Leadline v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut config = CoreConfig::from_env()?;
    if let Some(path) = database {
        config.database_path = path;
    }
    init_tracing(log_level.as_deref().unwrap_or(&config.log_level))?;
    debug!(
        path = %config.database_path.display(),
        month_scope = ?config.month_scope,
        "configuration loaded"
    );

    let caller = Caller {
        identity: user
            .filter(|user| !user.trim().is_empty())
            .ok_or(CliError::MissingUser)?,
        is_admin: admin,
        is_superuser: superuser,
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = SqliteLeadStore::open(&config.database_path, clock.clone())?;
    let service = LeadService::new(store, clock).with_month_scope(config.month_scope);

    execute(&service, &caller, command)
}

fn execute(service: &Service, caller: &Caller, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Add(args) => {
            let mut lead = NewLead::new(args.name.clone(), args.phone)
                .temperature(args.temperature)
                .status(args.status)
                .call_status(args.call_status)
                .details_shared(args.details_shared);
            if let Some(email) = args.email {
                lead = lead.email(email);
            }
            if let Some(notes) = args.notes {
                lead = lead.notes(notes);
            }
            let id = service.add_lead(caller, lead)?;
            output::print_lead_added(id, args.name.trim());
        }
        Commands::Update(args) => {
            let id = args.id;
            let update = update_from_args(args);
            if !service.update_lead(caller, id, update)? {
                return Err(CliError::NotFound(id));
            }
            output::print_success(&format!("Lead {id} updated"));
        }
        Commands::Delete { id } => {
            if !service.delete_lead(caller, id)? {
                return Err(CliError::NotFound(id));
            }
            output::print_success(&format!("Lead {id} moved to trash"));
        }
        Commands::List(args) => {
            let filter = args.filter.filter();
            let leads = service.filter_leads(caller, args.filter.scope.scope(), &filter)?;
            if args.json {
                println!("{}", to_pretty_json(&leads)?);
            } else if leads.is_empty() {
                output::print_empty("No leads found matching the criteria");
            } else {
                leads.iter().for_each(output::print_lead);
            }
        }
        Commands::Trash => {
            let trashed = service.trash(caller)?;
            if trashed.is_empty() {
                output::print_empty("No deleted leads found");
            }
            trashed.iter().for_each(output::print_trashed);
        }
        Commands::Report(ReportCommands::Daily { scope, json }) => {
            let report = service.daily_report(caller, scope.scope())?;
            if json {
                println!("{}", to_pretty_json(&report)?);
            } else {
                output::print_report(&format!("Daily report {}", service.today()), &report);
            }
        }
        Commands::Report(ReportCommands::Monthly { month, scope, json }) => {
            let report = service.monthly_report(caller, scope.scope(), month)?;
            if json {
                println!("{}", to_pretty_json(&report)?);
            } else {
                output::print_report(&format!("Monthly report ({month})"), &report);
            }
        }
        Commands::Followups => {
            let due = service.pending_followups(caller)?;
            if due.is_empty() {
                output::print_empty("No pending follow-ups");
            }
            due.iter().for_each(output::print_followup);
        }
        Commands::Complete { id } => {
            if !service.mark_complete(caller, id)? {
                return Err(CliError::NotFound(id));
            }
            output::print_success(&format!("Follow-up for lead {id} completed"));
        }
        Commands::Creators => {
            for creator in service.creators(caller)? {
                println!("{creator}");
            }
        }
        Commands::Export(args) => {
            let filter = args.filter.filter();
            let leads = service.filter_leads(caller, args.filter.scope.scope(), &filter)?;
            let document = ExportDocument {
                generated_by: &caller.identity,
                filter: &filter,
                leads: &leads,
            };
            let json = to_pretty_json(&document)?;
            match args.output {
                Some(path) => {
                    std::fs::write(&path, json).map_err(|source| CliError::Output {
                        path: path.display().to_string(),
                        source,
                    })?;
                    output::print_success(&format!(
                        "Exported {} leads to {}",
                        leads.len(),
                        path.display()
                    ));
                }
                None => println!("{json}"),
            }
        }
        Commands::Version => {}
    }
    Ok(())
}

fn update_from_args(args: UpdateArgs) -> LeadUpdate {
    let mut update = LeadUpdate::new();
    update.lead_status = args.status;
    update.call_status = args.call_status;
    update.lead_temperature = args.temperature;
    update.followup_status = args.followup_status;
    if args.clear_next_followup {
        update.next_followup = Some(None);
    } else if let Some(date) = args.next_followup {
        update.next_followup = Some(Some(date));
    }
    update.note = args.note;
    update
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use leadline_core::FixedClock;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_filters_and_labels() {
        let cli = Cli::parse_from([
            "leadline",
            "--user",
            "alice",
            "list",
            "--month",
            "march",
            "--status",
            "student,working",
            "--call-status",
            "call-taken",
        ]);
        let Commands::List(args) = cli.command else {
            panic!("expected list");
        };
        let filter = args.filter.filter();
        assert_eq!(filter.month, MonthFilter::month(3).unwrap());
        assert_eq!(filter.lead_statuses.len(), 2);
        assert!(filter.call_statuses.contains(&CallStatus::CallTaken));
    }

    #[test]
    fn clear_wins_over_missing_date() {
        let cli = Cli::parse_from([
            "leadline",
            "update",
            "3",
            "--clear-next-followup",
            "--note",
            "hi",
        ]);
        let Commands::Update(args) = cli.command else {
            panic!("expected update");
        };
        let update = update_from_args(args);
        assert_eq!(update.next_followup, Some(None));
        assert_eq!(update.note.as_deref(), Some("hi"));
    }

    #[test]
    fn export_writes_json_document() {
        let dir = tempfile::tempdir().unwrap();
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::at_date(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        ));
        let store = SqliteLeadStore::open(dir.path().join("leads.db"), clock.clone()).unwrap();
        let service = LeadService::new(store, clock);
        let caller = Caller::member("alice");
        service
            .add_lead(&caller, NewLead::new("Asha", "555-0100"))
            .unwrap();

        let target = dir.path().join("export.json");
        let cli = Cli::parse_from([
            "leadline",
            "export",
            "--output",
            target.to_str().unwrap(),
        ]);
        execute(&service, &caller, cli.command).unwrap();

        let written = std::fs::read_to_string(&target).unwrap();
        let json: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(json["leads"][0]["name"], "Asha");
        assert_eq!(json["generated_by"], "alice");
    }

    #[test]
    fn unknown_lead_is_reported() {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let store = SqliteLeadStore::open_in_memory(clock.clone()).unwrap();
        let service = LeadService::new(store, clock);
        let err = execute(&service, &Caller::member("alice"), Commands::Complete { id: 9 })
            .unwrap_err();
        assert!(matches!(err, CliError::NotFound(9)));
    }
}
