use anyhow::{Context, Result};
use sheetscraper::{
    catalog::Catalog,
    config::Config,
    fetch,
    nav::NavState,
    router::{Page, Route, Router},
    CatalogError, SHARING_HINT,
};
use std::{env, path::PathBuf, process::exit};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Used when `--config` is not given and the file exists.
const DEFAULT_CONFIG: &str = "sheetscraper.yaml";

#[derive(Debug, Default)]
struct Cli {
    config: Option<PathBuf>,
    url: Option<String>,
    route: Option<String>,
    query: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) args ─────────────────────────────────────────────────────
    let cli = parse_cli(env::args().skip(1))?;

    // ─── 3) load, route, print ───────────────────────────────────────
    println!("Chargement…");
    match run(&cli).await {
        Ok(page) => {
            print!("{page}");
            Ok(())
        }
        Err(err) => {
            error!(error = %err, "could not render page");
            println!("Erreur : {err:#}");
            if err
                .downcast_ref::<CatalogError>()
                .is_some_and(CatalogError::is_sheet_misconfigured)
            {
                println!("{SHARING_HINT}");
            }
            exit(1);
        }
    }
}

async fn run(cli: &Cli) -> Result<Page> {
    let config = load_config(cli)?;
    let state = NavState::from_query(&cli.query);
    let route = match &cli.route {
        Some(id) => Route::from_id(id)?,
        None => Route::for_state(&state),
    };
    info!(%route, url = %config.source.url, "loading catalog");

    let client = fetch::build_client(&config.fetch)?;
    let table = fetch::load_table(&client, &config).await?;
    let catalog = Catalog::new(table, &config.columns)?;
    Ok(Router::default().dispatch(route, &catalog, &state)?)
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None if PathBuf::from(DEFAULT_CONFIG).is_file() => Config::load(DEFAULT_CONFIG)?,
        None => Config::default(),
    };
    Ok(config.with_env().with_url_override(cli.url.clone()))
}

fn parse_cli(args: impl IntoIterator<Item = String>) -> Result<Cli> {
    let mut cli = Cli::default();
    let mut args = args.into_iter();
    while let Some(a) = args.next() {
        match a.as_str() {
            "-c" | "--config" => {
                cli.config = Some(PathBuf::from(
                    args.next().context("Missing value for --config")?,
                ))
            }
            "-u" | "--url" => cli.url = Some(args.next().context("Missing value for --url")?),
            "-h" | "--help" => {
                eprintln!(
                    "Usage: sheetscraper [--config <file.yaml>] [--url <sheet url>] [<route>] [<query>]\n\
                     Routes: index, pole, specialite, groupe (default: implied by the query)\n\
                     Example: sheetscraper pole 'pole=Digital'"
                );
                exit(0);
            }
            s if s.starts_with('-') => anyhow::bail!("Unknown arg: {s}"),
            s if s.contains('=') || s.starts_with('?') => cli.query = s.to_string(),
            s if cli.route.is_none() => cli.route = Some(s.to_string()),
            s => anyhow::bail!("Unexpected argument: {s}"),
        }
    }
    Ok(cli)
}
