use crate::report::{run_admin_report, run_personal_report, AdminReportArgs, PersonalReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use mindbalance::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "MindBalance",
    about = "Run the MindBalance wellbeing service or print dashboards from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print a wellbeing dashboard from the stored check-ins
    Dashboard {
        #[command(subcommand)]
        command: DashboardCommand,
    },
}

#[derive(Subcommand, Debug)]
enum DashboardCommand {
    /// Weekly and monthly summary for one person
    Personal(PersonalReportArgs),
    /// Anonymised team aggregate with department alerts
    Admin(AdminReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the directory holding the JSON collections
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Dashboard {
            command: DashboardCommand::Personal(args),
        } => run_personal_report(args),
        Command::Dashboard {
            command: DashboardCommand::Admin(args),
        } => run_admin_report(args),
    }
}
