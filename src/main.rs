use clap::Parser;
use log::{error, LevelFilter};

mod args;
mod report;

fn main() {
    let args = args::Args::parse();

    if args.verbose {
        env_logger::Builder::new()
            .filter_level(LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }

    let res = report::config_reader::settings_from_args(&args).and_then(|s| report::run_report(&s));

    if let Err(e) = res {
        error!("Error occured: {:?}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
