use std::process::exit;
use std::{fmt::Display, fmt::Formatter};

use crate::compression::Profile;

/// Verbosity of user information
#[derive(Debug)]
pub enum Verbosity {
    Quiet,
    Errors,
    Warnings,
    Info,
    Debug,
    Trace,
}

/// Zip or Unzip
#[derive(Debug)]
pub enum Mode {
    Zip,
    Unzip,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// All user settable options controlling program behavior.
#[derive(Debug)]
pub struct SquishOpts {
    /// Coder profile used for new archives and expected from old ones
    pub profile: Profile,
    /// Vec of names of files to process
    pub files: Vec<String>,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// Don't remove input files after processing
    pub keep_input_files: bool,
    /// Compress or decompress
    pub op_mode: Mode,
    /// Verbosity of user information
    pub verbose: Verbosity,
}

impl SquishOpts {
    pub fn new() -> Self {
        Self {
            profile: Profile::Bwt,
            files: vec![],
            force_overwrite: false,
            keep_input_files: false,
            op_mode: Mode::Zip,
            verbose: Verbosity::Errors,
        }
    }
}

impl Default for SquishOpts {
    fn default() -> Self {
        Self::new()
    }
}

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse the command line into a SquishOpts. Help, license and version
/// requests print and exit here.
pub fn opts_init() -> SquishOpts {
    let mut cli = SquishOpts::new();

    let args = std::env::args().skip(1);
    for mut arg in args {
        if arg.starts_with("--") {
            match arg.as_str() {
                "--help" => help(),
                "--decompress" => cli.op_mode = Mode::Unzip,
                "--compress" => cli.op_mode = Mode::Zip,
                "--keep" => cli.keep_input_files = true,
                "--force" => cli.force_overwrite = true,
                "--order0" => cli.profile = Profile::Order0,
                "--ctxmix" => cli.profile = Profile::CtxMix,
                "--bwt" => cli.profile = Profile::Bwt,
                "--paq" => cli.profile = Profile::Paq,
                "--quiet" => cli.verbose = Verbosity::Quiet,
                "--verbose" => cli.verbose = Verbosity::Info,
                "--version" => version(),
                other => {
                    eprintln!("Unexpected command line argument: {}", other);
                    help()
                }
            }
        } else if arg.starts_with('-') {
            arg.remove(0);
            while !arg.is_empty() {
                // Count the v's for the verbosity level first.
                let vs = arg.chars().take_while(|&c| c == 'v').count();
                if vs > 0 {
                    cli.verbose = match vs {
                        1 => Verbosity::Errors,
                        2 => Verbosity::Warnings,
                        3 => Verbosity::Info,
                        4 => Verbosity::Debug,
                        _ => Verbosity::Trace,
                    };
                    arg = arg.split_off(vs);
                    continue;
                }
                let flag = arg.remove(0);
                match flag {
                    'h' => help(),
                    'd' => cli.op_mode = Mode::Unzip,
                    'z' => cli.op_mode = Mode::Zip,
                    'k' => cli.keep_input_files = true,
                    'f' => cli.force_overwrite = true,
                    '0' => cli.profile = Profile::Order0,
                    'x' => cli.profile = Profile::CtxMix,
                    'b' => cli.profile = Profile::Bwt,
                    'p' => cli.profile = Profile::Paq,
                    'q' => cli.verbose = Verbosity::Quiet,
                    'V' => version(),
                    other => {
                        eprintln!("Unexpected command line argument: -{}", other);
                        help()
                    }
                }
            }
        } else {
            cli.files.push(arg);
        };
    }

    // Set the log level
    match cli.verbose {
        Verbosity::Quiet => log::set_max_level(log::LevelFilter::Off),
        Verbosity::Errors => log::set_max_level(log::LevelFilter::Error),
        Verbosity::Warnings => log::set_max_level(log::LevelFilter::Warn),
        Verbosity::Info => log::set_max_level(log::LevelFilter::Info),
        Verbosity::Debug => log::set_max_level(log::LevelFilter::Debug),
        Verbosity::Trace => log::set_max_level(log::LevelFilter::Trace),
    };
    cli
}

/// Prints help information
fn help() {
    println!(
        "
   usage: squish [flags and input files in any order]

   -h --help           print this message
   -d --decompress     force decompression
   -z --compress       force compression
   -k --keep           keep (don't delete) input files
   -f --force          overwrite existing output files
   -0 --order0         adaptive order-0 profile (arithmetic coder)
   -x --ctxmix         context-mixing profile (range coder)
   -b --bwt            block-sorting profile (default)
   -p --paq            legacy single-predictor profile
   -q --quiet          suppress noncritical error messages
   -v --verbose        be verbose (more v's give more)
   -V --version        display software version

    If invoked as `squish', default action is to compress with the
    block-sorting profile. Decompression must use the same profile the
    archive was written with; the archive magic enforces this.
   "
    );
    exit(0);
}

fn version() {
    println!("Version: {}, written in Rust", VERSION);
    exit(0);
}
