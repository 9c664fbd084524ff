use anyhow::{Context, Result};
use sheetscraper::{
    catalog::{unique_by_first, Catalog},
    config::{Config, SourceFormat},
    fetch,
    process::{detect_delimiter, Table},
    schema::{resolve, Column, ColumnAliases},
};
use std::{env, fs, path::Path, process::exit};
use tracing_subscriber::{fmt, EnvFilter};

const PREVIEW_ROWS: usize = 5;

#[tokio::main]
async fn main() {
    let _ = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .try_init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "Usage: {} <CSV_OR_JSON_FILE | URL> [--delimiter <c>] [--json]",
            args[0]
        );
        exit(1);
    }
    if let Err(e) = inspect(&args[1], &args[2..]).await {
        eprintln!("Error: {:#}", e);
        exit(1);
    }
}

/// Load a sheet from disk or the network and print what the parser and the
/// header resolver make of it.
async fn inspect(source: &str, flags: &[String]) -> Result<()> {
    let mut config = Config::default().with_url_override(Some(source.to_string()));
    let mut flags = flags.iter();
    while let Some(f) = flags.next() {
        match f.as_str() {
            "--json" => config.source.format = SourceFormat::Json,
            "--delimiter" => {
                let d = flags.next().context("Missing value for --delimiter")?;
                let mut chars = d.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => config.source.delimiter = Some(c),
                    _ => anyhow::bail!("delimiter must be one character, got {d:?}"),
                }
            }
            other => anyhow::bail!("Unknown arg: {other}"),
        }
    }

    // 1) raw text
    let path = Path::new(source);
    let (body, table) = if path.is_file() {
        let body = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let table = fetch::table_from_body(&body, &config.source, config.fetch.sniff_window)?;
        (Some(body), table)
    } else {
        let client = fetch::build_client(&config.fetch)?;
        (None, fetch::load_table(&client, &config).await?)
    };

    println!("=== Sheet: {} ===", source);
    match (config.source.format, config.source.delimiter, &body) {
        (SourceFormat::Json, ..) => println!("Format:     JSON records"),
        (_, Some(d), _) => println!("Delimiter:  {:?} (configured)", d),
        (_, None, Some(b)) => println!("Delimiter:  {:?} (detected)", detect_delimiter(b)),
        (_, None, None) => println!("Delimiter:  detected from response"),
    }
    println!("Rows:       {} (including header)", table.len());
    println!();

    // 2) header + resolution
    print_columns(&table, &config.columns);

    // 3) preview
    println!("=== First rows ===");
    for row in table.records().iter().take(PREVIEW_ROWS) {
        println!("  {}", row.join(" | "));
    }
    println!();

    // 4) drill-down summary, if the pole column exists
    match Catalog::new(table, &config.columns) {
        Ok(catalog) => {
            if let Some(idx) = catalog.column(Column::Pole) {
                let poles = unique_by_first(catalog.table().records(), idx);
                println!("=== {} distinct pôles ===", poles.len());
                for p in poles {
                    println!("  {:<30} first at data row {}", p.label, p.row);
                }
            }
        }
        Err(e) => println!("Catalog: {e}"),
    }
    Ok(())
}

fn print_columns(table: &Table, aliases: &ColumnAliases) {
    println!("=== Columns ===");
    let Some(headers) = table.headers() else {
        println!("  <no header: empty sheet>");
        println!();
        return;
    };
    for (i, h) in headers.iter().enumerate() {
        println!("  [{:>2}] {}", i, h);
    }
    println!();

    for column in Column::ALL {
        let found = resolve(headers, aliases.get(column));
        println!(
            "  {:<12} -> {}",
            column.display_name(),
            found.map_or("<not found>".to_string(), |i| format!("column {i}"))
        );
    }
    println!();
}
