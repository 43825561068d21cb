use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "link-optimizer")]
#[command(about = "Internal-link suggestion tool: site crawler, keyword matcher and SEO scorer")]
#[command(version)]
pub struct Args {
    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API server
    Serve {
        /// Address to bind, overriding the configured one
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Crawl a site once and print the page index as JSON
    Crawl {
        /// Root URL to crawl
        url: String,

        /// Maximum number of pages to collect
        #[arg(short, long, default_value_t = 500)]
        max_pages: usize,
    },
}
