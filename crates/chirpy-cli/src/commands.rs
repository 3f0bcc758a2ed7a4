use std::path::{Path, PathBuf};

use anyhow::Context;
use chirpy_server::config::ENV_DATABASE_PATH;
use chirpy_server::{ChirpyServer, ServerConfig};
use chirpy_store::{FileStore, Store};
use colored::Colorize;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Chirps(args) => cmd_chirps(&database_path(args.database, env_lookup), cli.format),
        Command::Users(args) => cmd_users(&database_path(args.database, env_lookup), cli.format),
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// The flag, then `CHIRPY_DATABASE_PATH`, then the server default.
fn database_path(flag: Option<PathBuf>, lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
    flag.or_else(|| lookup(ENV_DATABASE_PATH).map(PathBuf::from))
        .unwrap_or_else(|| ServerConfig::default().database_path)
}

fn resolve_config(args: &ServeArgs) -> anyhow::Result<ServerConfig> {
    resolve_config_with(args, env_lookup)
}

/// File, then environment, then flags.
fn resolve_config_with(
    args: &ServeArgs,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    config.apply_env_with(lookup)?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(database) = &args.database {
        config.database_path = database.clone();
    }
    Ok(config)
}

fn remove_database(path: &Path) -> anyhow::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "debug mode: database removed");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("removing {}", path.display())),
    }
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args)?;
    if args.debug {
        remove_database(&config.database_path)?;
    }
    let server = ChirpyServer::open(config)?;
    println!(
        "{} Chirpy listening on {} (database: {})",
        "✓".green().bold(),
        server.config().bind_addr.to_string().bold(),
        server.config().database_path.display()
    );

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime.block_on(server.serve())?;
    Ok(())
}

/// Listing never creates a database.
fn open_store(path: &Path) -> anyhow::Result<FileStore> {
    FileStore::open_existing(path).with_context(|| format!("opening database {}", path.display()))
}

fn cmd_chirps(database: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let chirps = open_store(database)?.list_chirps()?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&chirps)?),
        OutputFormat::Text if chirps.is_empty() => println!("No chirps."),
        OutputFormat::Text => {
            for chirp in &chirps {
                println!("{} {}", format!("#{}", chirp.id).yellow(), chirp.body);
            }
        }
    }
    Ok(())
}

fn cmd_users(database: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let users = open_store(database)?.list_users()?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&users)?),
        OutputFormat::Text if users.is_empty() => println!("No users."),
        OutputFormat::Text => {
            for user in &users {
                println!("{} {}", format!("#{}", user.id).yellow(), user.email.cyan());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serve_args() -> ServeArgs {
        ServeArgs {
            config: None,
            bind: None,
            database: None,
            debug: false,
        }
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("chirpy.toml");
        std::fs::write(
            &file,
            "bind_addr = \"127.0.0.1:7000\"\ndatabase_path = \"from-file.json\"\n",
        )
        .unwrap();

        let mut args = serve_args();
        args.config = Some(file.clone());
        let config = resolve_config_with(&args, no_env).unwrap();
        assert_eq!(config.bind_addr.port(), 7000);

        args.bind = Some("127.0.0.1:7001".parse().unwrap());
        args.database = Some(PathBuf::from("from-flag.json"));
        let config = resolve_config_with(&args, no_env).unwrap();
        assert_eq!(config.bind_addr.port(), 7001);
        assert_eq!(config.database_path, PathBuf::from("from-flag.json"));
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let mut args = serve_args();
        args.config = Some(PathBuf::from("/nonexistent/chirpy.toml"));
        assert!(resolve_config_with(&args, no_env).is_err());
    }

    #[test]
    fn env_sits_between_file_and_flags() {
        let env = |key: &str| (key == "CHIRPY_BIND_ADDR").then(|| "127.0.0.1:7100".to_string());
        let mut args = serve_args();
        assert_eq!(resolve_config_with(&args, env).unwrap().bind_addr.port(), 7100);
        args.bind = Some("127.0.0.1:7101".parse().unwrap());
        assert_eq!(resolve_config_with(&args, env).unwrap().bind_addr.port(), 7101);
    }

    #[test]
    fn database_path_precedence() {
        let env = |key: &str| (key == ENV_DATABASE_PATH).then(|| "from-env.json".to_string());
        assert_eq!(database_path(None, no_env), PathBuf::from("database.json"));
        assert_eq!(database_path(None, env), PathBuf::from("from-env.json"));
        assert_eq!(
            database_path(Some(PathBuf::from("from-flag.json")), env),
            PathBuf::from("from-flag.json")
        );
    }

    #[test]
    fn listing_a_missing_database_fails_without_creating_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("typo/database.json");
        assert!(cmd_chirps(&path, OutputFormat::Text).is_err());
        assert!(cmd_users(&path, OutputFormat::Json).is_err());
        assert!(!dir.path().join("typo").exists());
    }

    #[test]
    fn remove_database_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        remove_database(&path).unwrap();

        std::fs::write(&path, "{}").unwrap();
        remove_database(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn listing_commands_read_the_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        {
            let store = FileStore::open(&path).unwrap();
            store.create_chirp("hello").unwrap();
        }
        cmd_chirps(&path, OutputFormat::Json).unwrap();
        cmd_chirps(&path, OutputFormat::Text).unwrap();
        cmd_users(&path, OutputFormat::Text).unwrap();
    }
}
