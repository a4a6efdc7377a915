use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use x86_levels::cpuinfo;
use x86_levels::levels::{self, FeatureLevel};

#[derive(Parser, Debug)]
#[command(author, about = "Check for supported x86-64 feature sets.", long_about = None)]
struct Args {
    /// Show not only the latest, but all supported feature sets.
    #[arg(long)]
    all: bool,

    /// Emit the result as JSON.
    #[arg(long)]
    json: bool,

    /// Read this file instead of /proc/cpuinfo.
    #[arg(long, value_name = "PATH")]
    cpuinfo: Option<PathBuf>,
}

#[derive(Serialize)]
struct Report {
    level: FeatureLevel,
    supported: Vec<FeatureLevel>,
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let path = args
        .cpuinfo
        .unwrap_or_else(|| PathBuf::from(cpuinfo::CPUINFO_PATH));

    let flags = match cpuinfo::read_cpu_flags_from(&path) {
        Ok(flags) => flags,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let supported = levels::supported_levels(&flags);
    let Some(level) = levels::classify(&flags) else {
        eprintln!("No x86-64 feature set fully supported!");
        std::process::exit(1);
    };

    if args.json {
        let report = Report { level, supported };
        match serde_json::to_string(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    } else if args.all {
        let names: Vec<&str> = supported.iter().map(|l| l.as_str()).collect();
        println!("{}", names.join(" "));
    } else {
        println!("{}", level);
    }
}
