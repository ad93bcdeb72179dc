mod edit;
mod prompt;

use std::fs;
use std::path::PathBuf;
use std::process;

use bc_core::{BinaryRecord, EditorConfig, Enigma, SaveCursor};
use bc_fetch::{CountryCode, EnigmaNames, FetchConfig, GameDataClient, NameTable};
use clap::Parser;

use edit::{edit_fields, edit_stages};
use prompt::ConsolePrompt;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Enigma chunk extracted from a save file
    #[arg(value_name = "CHUNK")]
    path: PathBuf,
    /// Game region the save belongs to
    #[arg(long, default_value = "en")]
    region: CountryCode,
    /// Print the decoded chunk as JSON and exit
    #[arg(long)]
    json: bool,
    /// Run the stage start/wipe workflow (the default)
    #[arg(long)]
    stages: bool,
    /// Edit the enigma level and energy timers
    #[arg(long)]
    fields: bool,
    /// Skip name fetching; use whatever the local cache has
    #[arg(long)]
    offline: bool,
    /// Ignore per-field maximums when editing
    #[arg(long = "disable-maxes")]
    disable_maxes: bool,
    /// UI locale for localized resource packs
    #[arg(long)]
    locale: Option<String>,
    /// Cache directory for game data and name tables
    #[arg(long = "cache-dir")]
    cache_dir: Option<PathBuf>,
    /// Where to write the edited chunk (defaults to in-place)
    #[arg(long)]
    output: Option<PathBuf>,
}

fn fetch_config(cli: &Cli) -> FetchConfig {
    let mut config = FetchConfig::default();
    if let Some(locale) = &cli.locale {
        config.locale = locale.clone();
    }
    if let Some(cache_dir) = &cli.cache_dir {
        config.cache_root = cache_dir.clone();
    }
    config
}

/// Resolve the stage name table before any interactive prompt runs; the
/// editor owns the console and fetch tasks must not.
fn load_names(cli: &Cli) -> NameTable {
    let config = fetch_config(cli);
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Error starting runtime: {e}");
        process::exit(1);
    });
    runtime.block_on(async {
        if cli.offline {
            let client = match GameDataClient::offline(config, cli.region, None) {
                Ok(client) => client,
                Err(e) => {
                    eprintln!("Error creating client: {e}");
                    process::exit(1);
                }
            };
            return EnigmaNames::load(client).await.into_table();
        }
        let client = match GameDataClient::new(config, cli.region).await {
            Ok(client) => client,
            Err(e) => {
                eprintln!("Error creating client: {e}");
                process::exit(1);
            }
        };
        let mut names = EnigmaNames::load(client).await;
        if let Err(e) = names.refresh().await {
            eprintln!("Warning: could not refresh stage names: {e}");
        }
        names.into_table()
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let bytes = fs::read(&cli.path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", cli.path.display());
        process::exit(1);
    });
    let mut cursor = SaveCursor::new(bytes);
    let mut enigma = Enigma::read(&mut cursor).unwrap_or_else(|e| {
        eprintln!("Error decoding {}: {e}", cli.path.display());
        process::exit(1);
    });

    if cli.json {
        let value = enigma.serialize();
        println!(
            "{}",
            serde_json::to_string_pretty(&value).unwrap_or_else(|e| {
                eprintln!("Error rendering JSON: {e}");
                process::exit(1);
            })
        );
        return;
    }

    let config = EditorConfig {
        disable_maxes: cli.disable_maxes,
        ..EditorConfig::default()
    };
    let mut prompt = ConsolePrompt;

    if cli.fields {
        edit_fields(&mut enigma, &mut prompt, &config);
    }
    if cli.stages || !cli.fields {
        let names = load_names(&cli);
        edit_stages(&mut enigma, &names, &mut prompt, &config);
    }

    let mut out = SaveCursor::empty();
    enigma.write(&mut out).unwrap_or_else(|e| {
        eprintln!("Error encoding chunk: {e}");
        process::exit(1);
    });
    let target = cli.output.as_ref().unwrap_or(&cli.path);
    fs::write(target, out.into_inner()).unwrap_or_else(|e| {
        eprintln!("Error writing {}: {e}", target.display());
        process::exit(1);
    });
    println!("wrote {}", target.display());
}
