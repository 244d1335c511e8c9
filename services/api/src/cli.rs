use crate::score::{run_questions, run_score, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use homecheck::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Remote Home Check Scorer",
    about = "Score remote home-check questionnaires over HTTP or from the command line",
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
    /// Print the questionnaire with its accepted answers
    Questions,
    /// Score an assessment payload stored in a JSON file
    Score(ScoreArgs),
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
        Command::Questions => run_questions(),
        Command::Score(args) => run_score(args),
    }
}
