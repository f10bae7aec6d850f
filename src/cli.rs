use clap::Parser;

#[derive(Parser)]
#[command(
    name = "ytsum",
    about = "YouTube caption summarization service",
    version,
)]
pub struct Cli {
    /// Bind host (overrides config file)
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (overrides config file)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
