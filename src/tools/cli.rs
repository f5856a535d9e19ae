//! Command line handling for the `lohz` binary.

use std::fmt::{Display, Formatter};

use clap::Parser;
use log::{info, warn};

/// Zip or Unzip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Zip,
    Unzip,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "lohz, a lookback-and-huffman file compressor.",
    long_about = "
    Compresses files through an optional delta filter, a lookback stage that
    replaces repeated data with backreferences, and a huffman entropy coder.
    Every container carries a checksum of the original bytes, verified on
    decompression."
)]
pub struct Args {
    /// Filenames of files to process
    #[clap()]
    files: Vec<String>,

    /// Perform compression on the input files
    #[clap(short = 'z', long = "compress")]
    compress: bool,

    /// Perform decompression on the input files
    #[clap(short = 'd', long = "decompress")]
    decompress: bool,

    /// Skip the lookback stage when compressing
    #[clap(long = "no-lookback")]
    no_lookback: bool,

    /// Skip the huffman stage when compressing
    #[clap(long = "no-huffman")]
    no_huffman: bool,

    /// Delta filter distance, 0 disables the filter. Try 1-4 for audio or
    /// image data
    #[clap(long = "delta", default_value_t = 0)]
    delta: u8,

    /// Force overwriting output files
    #[clap(short = 'f', long = "force")]
    force: bool,

    /// Sets verbosity. Repeat for more detail
    #[clap(short = 'v', parse(from_occurrences))]
    verbose: u8,
}

/// All user settable options, after command line interpretation.
#[derive(Debug)]
pub struct LohOpts {
    /// Names of files to read for input
    pub files: Vec<String>,
    /// Zip unless decompression was requested
    pub op_mode: Option<Mode>,
    /// Feed the lookback stage when compressing
    pub lookback: bool,
    /// Feed the huffman stage when compressing
    pub huffman: bool,
    /// Delta filter distance, 0 for off
    pub delta_distance: u8,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
}

impl LohOpts {
    /// The mode for one input file: an explicit -z/-d flag wins, otherwise
    /// the file extension decides.
    pub fn mode_for(&self, file: &str) -> Mode {
        match self.op_mode {
            Some(mode) => mode,
            None if file.ends_with(".loh") => Mode::Unzip,
            None => Mode::Zip,
        }
    }
}

/// The output name paired with an input name: append `.loh` when
/// compressing, strip it (or fall back to `.out`) when decompressing.
pub fn output_name(file: &str, mode: Mode) -> String {
    match mode {
        Mode::Zip => format!("{}.loh", file),
        Mode::Unzip => match file.strip_suffix(".loh") {
            Some(stem) => stem.to_string(),
            None => format!("{}.out", file),
        },
    }
}

/// Put command line information from CLAP into our internal structure and
/// set the log level.
pub fn loh_opts_init() -> LohOpts {
    let args = Args::parse();

    match args.verbose {
        0 => log::set_max_level(log::LevelFilter::Warn),
        1 => log::set_max_level(log::LevelFilter::Info),
        2 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    };

    let opts = LohOpts {
        files: args.files,
        op_mode: match (args.compress, args.decompress) {
            (true, _) => Some(Mode::Zip),
            (_, true) => Some(Mode::Unzip),
            _ => None,
        },
        lookback: !args.no_lookback,
        huffman: !args.no_huffman,
        delta_distance: args.delta,
        force_overwrite: args.force,
    };

    info!("Verbosity set to {}", log::max_level());
    match opts.op_mode {
        Some(mode) => info!("Operational mode set to {}", mode),
        None => info!("Operational mode decided per file"),
    }
    if opts.files.is_empty() {
        warn!("No input files given");
    }
    if !opts.lookback {
        info!("Lookback stage disabled");
    }
    if !opts.huffman {
        info!("Huffman stage disabled");
    }
    if opts.delta_distance > 0 {
        info!("Delta filter distance set to {}", opts.delta_distance);
    }
    if opts.force_overwrite {
        info!("Forcing file overwriting");
    }
    opts
}
