mod configure;
mod tracker;

use std::fmt::Write as _;
use std::io;
use std::path::Path;
use std::time::Duration;

use clap::{CommandFactory, Parser, Subcommand};
use pricetrack_core::{
    chart_batches, load_app_config, load_settings, price_series, save_settings, AppConfig,
    ProductCatalog, Settings,
};
use pricetrack_scraper::{with_session, Scraper, ScraperOptions, SessionConfig};
use tracing_subscriber::EnvFilter;

use crate::tracker::{lookup_products, split_names, Tracker};

#[derive(Debug, Parser)]
#[command(name = "pricetrack")]
#[command(about = "Track product prices on an online perfume retailer")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Show the browser window instead of running headless
    #[arg(long, global = true)]
    headed: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Edit the settings file interactively
    Config,
    /// Point the settings at another product data file
    Datafile {
        /// Path to an existing JSON file (".json" is appended if missing)
        path: String,
    },
    /// Print every tracked product and its recorded prices
    Print,
    /// Record today's prices for every tracked product
    Snapshot,
    /// Print price histories grouped per product and size
    Report,
    /// Look products up and add them to the catalog
    Add {
        /// Product names separated by ";"
        names: String,
    },
    /// Print the current information and prices of products
    Price {
        /// Product names separated by ";"
        names: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_app_config()?;
    init_tracing(&config.log_level, cli.verbose)?;

    let mut settings = load_settings(&config.settings_path)?;

    match cli.command {
        Some(Commands::Config) => {
            let stdin = io::stdin();
            configure::prompt_settings(&mut settings, &mut stdin.lock(), &mut io::stdout())?;
            save_settings(&config.settings_path, &settings)?;
        }
        Some(Commands::Datafile { path }) => {
            settings.update_datafile(&path)?;
            save_settings(&config.settings_path, &settings)?;
            tracing::info!(datafile = %settings.datafile()?.display(), "datafile updated");
        }
        Some(Commands::Print) => {
            let catalog = ProductCatalog::load(settings.datafile()?)?;
            println!("{catalog}");
        }
        Some(Commands::Report) => {
            let catalog = ProductCatalog::load(settings.datafile()?)?;
            print!(
                "{}",
                render_report(
                    &catalog,
                    settings.products_per_plot,
                    settings.img_folder.as_deref()
                )
            );
        }
        Some(Commands::Snapshot) => {
            let mut catalog = ProductCatalog::load(settings.datafile()?)?;
            let options = scraper_options(&config, &settings);
            let report = with_session(&session_config(&config, cli.headed), async |browser| {
                let scraper = Scraper::new(browser, options);
                Tracker::new(&mut catalog, scraper).take_snapshot().await
            })
            .await?;
            println!("{report}");
        }
        Some(Commands::Add { names }) => {
            let names = split_names(&names);
            let mut catalog = ProductCatalog::load(settings.datafile()?)?;
            let options = scraper_options(&config, &settings);
            let report = with_session(&session_config(&config, cli.headed), async |browser| {
                let scraper = Scraper::new(browser, options);
                Tracker::new(&mut catalog, scraper).add_products(&names).await
            })
            .await?;
            println!("{report}");
        }
        Some(Commands::Price { names }) => {
            let names = split_names(&names);
            let options = scraper_options(&config, &settings);
            let products = with_session(&session_config(&config, cli.headed), async |browser| {
                let mut scraper = Scraper::new(browser, options);
                anyhow::Ok(lookup_products(&mut scraper, &names).await)
            })
            .await?;
            for product in products {
                println!("{product}\n");
            }
        }
        None => Cli::command().print_help()?,
    }

    Ok(())
}

/// `RUST_LOG` takes precedence; otherwise `--verbose` means debug and the
/// configured level applies.
fn init_tracing(log_level: &str, verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { log_level };
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}

fn session_config(config: &AppConfig, headed: bool) -> SessionConfig {
    SessionConfig {
        webdriver_url: config.webdriver_url.clone(),
        base_url: config.base_url.clone(),
        headless: !headed,
    }
}

fn scraper_options(config: &AppConfig, settings: &Settings) -> ScraperOptions {
    ScraperOptions {
        match_threshold: settings.match_threshold,
        wait_timeout: Duration::from_secs(settings.wait_timeout_secs),
        poll_interval: Duration::from_millis(config.poll_interval_ms),
    }
}

/// Text rendering of the price charts: one block per batch of
/// `per_chart` series, each series listed with its dated amounts.
fn render_report(
    catalog: &ProductCatalog,
    per_chart: usize,
    img_folder: Option<&Path>,
) -> String {
    let series = price_series(catalog.products());
    if series.is_empty() {
        return "No observed prices to report.\n".to_string();
    }

    let mut out = String::new();
    if let Some(folder) = img_folder {
        let _ = writeln!(out, "Chart folder: {}", folder.display());
    }
    for (index, batch) in chart_batches(&series, per_chart).into_iter().enumerate() {
        let _ = writeln!(out, "Chart {}", index + 1);
        for line in batch {
            let _ = writeln!(out, "  {}", line.label);
            for (date, amount) in &line.points {
                let _ = writeln!(out, "    {date}: {amount:.2}");
            }
        }
    }
    out
}
