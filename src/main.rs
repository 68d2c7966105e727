use std::path::PathBuf;
use std::process::exit;
use std::time::Instant;

use log::{error, info, LevelFilter};
use simplelog::{Config, TermLogger, TerminalMode};

use squish::compression::{compress, decompress};
use squish::error::Result;
use squish::tools::cli::{opts_init, Mode, SquishOpts};

/// Extension given to new archives and stripped on decompression.
const EXTENSION: &str = "sqz";

fn main() {
    // Available log levels are Error, Warn, Info, Debug, Trace; the CLI
    // lowers the max level after parsing.
    TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Stdout,
        simplelog::ColorChoice::AlwaysAnsi,
    )
    .unwrap();

    let opts = opts_init();
    if opts.files.is_empty() {
        error!("No input files given.");
        exit(1);
    }

    let timer = Instant::now();
    for file in &opts.files {
        if let Err(e) = run_one(&opts, file) {
            error!("{}: {}", file, e);
            exit(1);
        }
    }
    info!("Done in {:?}.", timer.elapsed());
}

fn run_one(opts: &SquishOpts, file: &str) -> Result<()> {
    let in_path = PathBuf::from(file);
    match opts.op_mode {
        Mode::Zip => {
            let mut out_path = in_path.clone().into_os_string();
            out_path.push(".");
            out_path.push(EXTENSION);
            let out_path = PathBuf::from(out_path);
            compress(&in_path, &out_path, opts.profile, opts.force_overwrite)?;
            info!("Created {}.", out_path.display());
        }
        Mode::Unzip => {
            let out_path = match in_path.extension() {
                Some(ext) if ext == EXTENSION => in_path.with_extension(""),
                _ => {
                    let mut renamed = in_path.clone().into_os_string();
                    renamed.push(".out");
                    PathBuf::from(renamed)
                }
            };
            decompress(&in_path, &out_path, opts.profile, opts.force_overwrite)?;
            info!("Restored {}.", out_path.display());
        }
    }
    if !opts.keep_input_files {
        std::fs::remove_file(&in_path)?;
    }
    Ok(())
}
