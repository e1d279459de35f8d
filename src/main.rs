//! Page Layout CLI
//!
//! Usage:
//!   page-layout [OPTIONS] [SITE] [PAGE]
//!
//! Options:
//!   -l, --list      List the pages of the site
//!   -e, --example   Print an example site file
//!   -d, --debug     Log layout activity to stderr
//!   -h, --help      Print help

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use page_layout::site::EXAMPLE_SITE;
use page_layout::Site;

#[derive(Parser)]
#[command(name = "page-layout")]
#[command(about = "Render pages composed from layouts and component overrides")]
struct Cli {
    /// Site file (TOML)
    site: Option<PathBuf>,

    /// Page path to render
    #[arg(default_value = "/index")]
    page: String,

    /// List the pages of the site
    #[arg(short, long)]
    list: bool,

    /// Print an example site file
    #[arg(short, long)]
    example: bool,

    /// Log layout activity to stderr
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("page_layout=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if cli.example {
        println!("{}", EXAMPLE_SITE.trim_start());
        return;
    }

    let Some(path) = &cli.site else {
        eprintln!("Error: no site file given (try --example for a starting point)");
        std::process::exit(1);
    };

    let site = match Site::from_file(path) {
        Ok(site) => site,
        Err(e) => {
            eprintln!("Error loading site '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    };

    if cli.list {
        for page in site.pages.paths() {
            println!("{}", page);
        }
        return;
    }

    let engine = site.into_engine();
    match engine.render(&cli.page) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
