use std::env;
use std::path::PathBuf;

mod audio;
mod config;
mod library;
mod playback;
mod runtime;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.iter().any(|a| a == "--dump-config") {
        let settings = runtime::load_settings();
        print!("{}", settings.to_toml()?);
        return Ok(());
    }
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("usage: cadenza [--dump-config] [PATH...]");
        return Ok(());
    }

    runtime::run(args.into_iter().map(PathBuf::from).collect())
}
