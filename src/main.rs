//Enable more cargo lint tests
#![warn(rust_2018_idioms)]
#![warn(clippy::disallowed_types)]

use std::fs;
use std::io::{Error, ErrorKind};
use std::path::Path;

use log::{error, info, LevelFilter};
use simplelog::{Config, TermLogger, TerminalMode};

use lohz::tools::cli::{loh_opts_init, output_name, Mode};
use lohz::{compress, decompress};

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() -> Result<(), Error> {
    // Available log levels are Error, Warn, Info, Debug, Trace. The cli
    // lowers the max level according to -v before any work happens.
    TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Stdout,
        simplelog::ColorChoice::AlwaysAnsi,
    )
    .unwrap();

    let options = loh_opts_init();
    if options.files.is_empty() {
        return Err(Error::new(ErrorKind::InvalidInput, "no input files"));
    }

    for file in &options.files {
        let mode = options.mode_for(file);
        let out_name = output_name(file, mode);
        if !options.force_overwrite && Path::new(&out_name).exists() {
            error!("{} exists, use -f to overwrite", out_name);
            return Err(Error::new(ErrorKind::AlreadyExists, out_name));
        }

        let input = fs::read(file)?;
        let output = match mode {
            Mode::Zip => compress(
                &input,
                options.lookback,
                options.huffman,
                options.delta_distance,
            ),
            Mode::Unzip => decompress(&input).map_err(|cause| {
                error!("{}: {}", file, cause);
                Error::new(ErrorKind::InvalidData, cause.to_string())
            })?,
        };
        fs::write(&out_name, &output)?;
        info!(
            "{}: {} bytes in, {} bytes out -> {}",
            file,
            input.len(),
            output.len(),
            out_name
        );
    }

    info!("Done.\n");
    Ok(())
}
