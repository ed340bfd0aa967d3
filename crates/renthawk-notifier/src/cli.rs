use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "renthawk-notifier", about = "Delivers matched listings to chat users")]
pub struct Cli {
    /// Process the queue once and exit instead of looping.
    #[arg(long)]
    pub once: bool,

    /// Override RENTHAWK_NOTIFICATION_INTERVAL_SECONDS for this run.
    #[arg(long)]
    pub interval: Option<u64>,

    /// Skip starting the `/start`/`/preferences`/`/stop` command listener.
    #[arg(long)]
    pub skip_commands: bool,
}
