use anyhow::Context;
use clap::Parser;
use renthawk_core::config::{ProxyRotation, ScraperConfig};
use renthawk_scraper::adapters;
use renthawk_scraper::cli::{CliProxyRotation, Cli, Command};
use renthawk_scraper::fetcher::Fetcher;
use renthawk_scraper::scheduler::{Scheduler, SchedulerOptions};
use renthawk_store::DuckDbBackend;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();

    if cli.list_sources {
        for source in adapters::known_sources() {
            println!("{source}");
        }
        return Ok(());
    }

    let mut config = ScraperConfig::from_env().context("loading scraper configuration")?;
    if let Some(interval) = cli.interval {
        config.scan_interval_seconds = interval.clamp(10, 3600);
    }
    if let Some(max_concurrent) = cli.max_concurrent {
        config.max_concurrent_requests = max_concurrent;
    }
    if cli.use_proxies {
        config.use_proxies = true;
    }
    if !cli.proxy_list.is_empty() {
        config.proxy_list = cli.proxy_list.clone();
    }
    if let Some(rotation) = cli.proxy_rotation {
        config.proxy_rotation = match rotation {
            CliProxyRotation::RoundRobin => ProxyRotation::RoundRobin,
            CliProxyRotation::Random => ProxyRotation::Random,
            CliProxyRotation::Fallback => ProxyRotation::Fallback,
        };
    }

    let store = DuckDbBackend::open(&config.db_path).context("opening renthawk store")?;

    if let Some(command) = &cli.command {
        return run_admin_command(&store, command).await;
    }

    let fetcher = Fetcher::new(config.http_timeout(), config.max_concurrent_requests)
        .context("building HTTP fetcher")?;

    let cities = if cli.cities.is_empty() {
        default_cities()
    } else {
        cli.cities.clone()
    };

    let options = SchedulerOptions {
        sources: cli.sources.clone(),
        max_results_per_page: cli.max_results,
        skip_cities: cli.skip_cities,
        skip_query_urls: cli.skip_query_urls,
    };
    let scheduler = Scheduler::with_options(store, fetcher, config, cities, options);

    if cli.once {
        scheduler.run_cycle().await.context("running scan cycle")?;
        return Ok(());
    }

    let (tx, rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("received shutdown signal");
            let _ = tx.send(true);
        }
    });
    scheduler.run(rx).await
}

async fn run_admin_command(store: &DuckDbBackend, command: &Command) -> anyhow::Result<()> {
    match command {
        Command::AddQueryUrl {
            source,
            url,
            description,
            request_body,
            custom_headers,
        } => {
            url::Url::parse(url).context("query url is not a valid absolute URL")?;
            if request_body.is_some() || custom_headers.is_some() {
                tracing::debug!(source, url, "request_body/custom_headers accepted but not persisted");
            }
            let id = store
                .add_query_url(source, url, description.as_deref())
                .await
                .context("adding query url")?;
            println!("added query url #{id}");
        }
        Command::ListQueryUrls => {
            for entry in store.list_query_urls().await.context("listing query urls")? {
                println!("{}\t{}\t{}\tenabled={}", entry.id, entry.source, entry.url, entry.enabled);
            }
        }
        Command::ToggleQueryUrl { id, enabled } => {
            store.toggle_query_url(*id, *enabled).await.context("toggling query url")?;
        }
        Command::DeleteQueryUrl { id } => {
            store.delete_query_url(*id).await.context("deleting query url")?;
        }
        Command::AddUser { user_id, display_name } => {
            store
                .upsert_user(*user_id, display_name.as_deref())
                .await
                .context("adding user")?;
        }
        Command::SetUserActive { user_id, active } => {
            store.set_user_active(*user_id, *active).await.context("setting user active")?;
        }
    }
    Ok(())
}

fn default_cities() -> Vec<String> {
    vec![
        "Amsterdam".to_string(),
        "Rotterdam".to_string(),
        "Utrecht".to_string(),
        "Den Haag".to_string(),
        "Eindhoven".to_string(),
        "Groningen".to_string(),
    ]
}
