use crate::server;
use clap::{Args, Parser, Subcommand};
use job_portal::config::AppConfig;
use job_portal::error::AppError;
use job_portal::persistence::SqliteStore;

#[derive(Parser, Debug)]
#[command(
    name = "job-portal-api",
    about = "Run the job portal HTTP service",
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
    /// Create or validate the database schema, then exit
    InitDb(InitDbArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured database path
    #[arg(long)]
    pub(crate) database: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct InitDbArgs {
    /// Database path; defaults to DATABASE_URL
    #[arg(long)]
    pub(crate) database: Option<String>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::InitDb(args) => init_db(args),
    }
}

fn init_db(args: InitDbArgs) -> Result<(), AppError> {
    let url = match args.database {
        Some(url) => url,
        None => AppConfig::load()?.database.url,
    };
    let store = SqliteStore::open(&url)?;
    store.ping()?;
    println!("database ready at {url}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_accepts_overrides() {
        let cli = Cli::try_parse_from([
            "job-portal-api",
            "serve",
            "--host",
            "0.0.0.0",
            "--port",
            "9000",
            "--database",
            ":memory:",
        ])
        .expect("arguments parse");
        match cli.command {
            Some(Command::Serve(args)) => {
                assert_eq!(args.host.as_deref(), Some("0.0.0.0"));
                assert_eq!(args.port, Some(9000));
                assert_eq!(args.database.as_deref(), Some(":memory:"));
            }
            other => panic!("expected serve, got {other:?}"),
        }
    }

    #[test]
    fn init_db_creates_in_memory_schema() {
        init_db(InitDbArgs {
            database: Some(":memory:".to_string()),
        })
        .expect("schema created");
    }
}
