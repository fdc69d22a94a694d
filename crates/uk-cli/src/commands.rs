use std::io::Write;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use uk_server::{ServerConfig, UkServer};
use uk_store::{FsStore, KeyHasher, KeyValueStore, StoreConfig};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Hash(args) => cmd_hash(args, &cli.format),
        Command::Get(args) => cmd_get(args),
        Command::List(args) => cmd_list(args, &cli.format),
    }
}

fn serve_config(args: &ServeArgs) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    if let Some(addr) = args.addr {
        config.bind_addr = addr;
    }
    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(mode) = args.lock_mode {
        config.lock_mode = mode.into();
    }
    if args.sync_writes {
        config.sync_writes = true;
    }
    Ok(config)
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = serve_config(&args)?;
    let runtime = tokio::runtime::Runtime::new().context("could not start tokio runtime")?;
    runtime.block_on(UkServer::new(config).serve())?;
    Ok(())
}

fn cmd_hash(args: HashArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let id = KeyHasher::STORE_KEY.hash_str(&args.key);
    match format {
        OutputFormat::Text => println!("{}", id.to_hex()),
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "key": args.key, "id": id.to_hex() }))
        }
    }
    Ok(())
}

/// Open an existing store without creating its directory.
fn open_existing(dir: &Path) -> anyhow::Result<FsStore> {
    anyhow::ensure!(dir.is_dir(), "store directory {} does not exist", dir.display());
    Ok(FsStore::open(StoreConfig::new(dir))?)
}

fn cmd_get(args: GetArgs) -> anyhow::Result<()> {
    let store = open_existing(&args.store.data_dir)?;
    let record = store
        .get(&args.key)
        .with_context(|| format!("could not read {}", args.key))?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&record.value)?;
    stdout.flush()?;
    Ok(())
}

fn cmd_list(args: ListArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let store = open_existing(&args.store.data_dir)?;
    let records = store.list()?;
    match format {
        OutputFormat::Json => {
            let items: Vec<_> = records
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "id": r.id.to_hex(),
                        "key": r.key,
                        "contentType": r.content_type,
                        "size": r.size,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        OutputFormat::Text => {
            if records.is_empty() {
                println!("No records in {}.", args.store.data_dir.display());
            }
            for r in &records {
                let content_type = if r.content_type.is_empty() {
                    "-"
                } else {
                    r.content_type.as_str()
                };
                println!(
                    "{}  {:>10}  {:<24}  {}",
                    r.id.short_hex().yellow(),
                    r.size,
                    content_type.cyan(),
                    r.key.bold()
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::path::PathBuf;

    fn serve_args() -> ServeArgs {
        ServeArgs {
            config: None,
            addr: None,
            data_dir: None,
            lock_mode: None,
            sync_writes: false,
        }
    }

    #[test]
    fn serve_config_defaults() {
        let config = serve_config(&serve_args()).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("uk.toml");
        std::fs::write(
            &path,
            "bind_addr = \"127.0.0.1:9000\"\ndata_dir = \"/from/file\"\n",
        )
        .unwrap();

        let args = ServeArgs {
            config: Some(path),
            data_dir: Some(PathBuf::from("/from/flag")),
            lock_mode: Some(LockModeArg::PerKey),
            ..serve_args()
        };
        let config = serve_config(&args).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.data_dir, PathBuf::from("/from/flag"));
        assert_eq!(config.lock_mode, uk_store::LockMode::PerKey);
    }

    #[test]
    fn open_existing_refuses_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(open_existing(&missing).is_err());
        assert!(!missing.exists());
    }

    #[test]
    fn list_and_get_on_populated_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::open(StoreConfig::new(dir.path())).unwrap();
        store.put("/data/a", "text/plain", b"x".to_vec()).unwrap();

        let store_args = || StoreArgs {
            data_dir: dir.path().to_path_buf(),
        };
        cmd_list(ListArgs { store: store_args() }, &OutputFormat::Json).unwrap();

        let get = GetArgs {
            store: store_args(),
            key: "/data/a".into(),
        };
        cmd_get(get).unwrap();

        let missing = GetArgs {
            store: store_args(),
            key: "/data/b".into(),
        };
        assert!(cmd_get(missing).is_err());
    }
}
