use crate::demo::{run_demo, run_quarters, DemoArgs, QuartersArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use tradepost::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Tradepost Marketplace",
    about = "Run and demonstrate the marketplace listing backend from the command line",
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
    /// Inspect the dynamic field catalogs
    Fields {
        #[command(subcommand)]
        command: FieldsCommand,
    },
    /// Run an end-to-end CLI demo covering submission, blocking, and the feed
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum FieldsCommand {
    /// Print the quarterly delivery labels valid for a given date
    Quarters(QuartersArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Fields {
            command: FieldsCommand::Quarters(args),
        } => run_quarters(args),
        Command::Demo(args) => run_demo(args),
    }
}
