use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "renthawk-scraper", about = "Scheduled scraper for Dutch rental listings")]
pub struct Cli {
    /// Restrict the cycle to these source names (default: all known sources).
    #[arg(long, value_delimiter = ',')]
    pub sources: Vec<String>,

    /// Cities to scan when a source has no dedicated query URLs.
    #[arg(long, value_delimiter = ',')]
    pub cities: Vec<String>,

    /// Override RENTHAWK_SCAN_INTERVAL_SECONDS for this run.
    #[arg(long)]
    pub interval: Option<u64>,

    /// Cap listings kept per list page (0 = unlimited).
    #[arg(long, default_value_t = 0)]
    pub max_results: usize,

    /// Override RENTHAWK_MAX_CONCURRENT for this run.
    #[arg(long)]
    pub max_concurrent: Option<usize>,

    /// Run a single scan cycle and exit instead of looping.
    #[arg(long)]
    pub once: bool,

    /// Enable proxy use for this run.
    #[arg(long)]
    pub use_proxies: bool,

    #[arg(long, value_delimiter = ',')]
    pub proxy_list: Vec<String>,

    #[arg(long, value_enum)]
    pub proxy_rotation: Option<CliProxyRotation>,

    /// Skip the per-(source, city) scan pass, running only query URLs.
    #[arg(long)]
    pub skip_cities: bool,

    /// Skip the per-source query URL scan pass, running only cities.
    #[arg(long)]
    pub skip_query_urls: bool,

    /// Print every known source name and exit.
    #[arg(long)]
    pub list_sources: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliProxyRotation {
    RoundRobin,
    Random,
    Fallback,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    AddQueryUrl {
        source: String,
        url: String,
        #[arg(long)]
        description: Option<String>,
        /// Accepted for operator convenience; not persisted.
        #[arg(long)]
        request_body: Option<String>,
        #[arg(long)]
        custom_headers: Option<String>,
    },
    ListQueryUrls,
    ToggleQueryUrl {
        id: i64,
        #[arg(long)]
        enabled: bool,
    },
    DeleteQueryUrl {
        id: i64,
    },
    AddUser {
        user_id: i64,
        #[arg(long)]
        display_name: Option<String>,
    },
    SetUserActive {
        user_id: i64,
        #[arg(long)]
        active: bool,
    },
}
