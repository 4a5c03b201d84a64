/*

Render a Penrose tiling described by a tiling file to PDF or PNG.

usage: pentagrid TILINGFILE

set RUST_LOG=debug for more chatter.

 */

// bunch of standard library stuff
use std::fs::File;
use std::io::BufReader;

use tracing::info;
use tracing_subscriber::EnvFilter;

//////////////////////////////////////////////////////////////////////
// use error chain so we can use Result<> everywhere
// for error handling

#[macro_use]
extern crate error_chain;

mod errors {

    error_chain!{

        links {
            Pentagrid(::pentagrid_rs::errors::Error, ::pentagrid_rs::errors::ErrorKind);
        }

        foreign_links {
            Io(::std::io::Error);
            Cairo(::cairo::Error);
            CairoIo(::cairo::IoError);
        }

    }

}

use errors::*;

mod render;
mod tiling_spec;

use tiling_spec::{OutputFormat, TilingSpec};

type Vec3d = nalgebra::Vector3<f64>;

//////////////////////////////////////////////////////////////////////

fn init_logging() {

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

}

fn run() -> Result<()> {

    init_logging();

    let args: Vec<String> = std::env::args().collect();

    if args.len() != 2 {
        eprintln!("usage: {:?} TILINGFILE", args[0]);
        std::process::exit(1);
    }

    let filename = &args[1];

    let f = File::open(filename).chain_err(|| format!("opening {:}", filename))?;
    let mut reader = BufReader::new(f);

    let ts = TilingSpec::parse(filename, &mut reader)?;

    let grid = ts.pentagrid()?;
    let page = ts.page_settings()?;
    let tiling = grid.tiling(ts.size())?;

    info!(offsets = ?grid.offsets(), size = ts.size(), tiles = tiling.len(),
          "tiling pentagrid");

    let (outfile, format) = ts.output(filename);

    let count = match format {
        OutputFormat::Pdf => render::write_pdf(tiling, &page, &outfile)?,
        OutputFormat::Png => render::write_png(tiling, &page, &outfile)?
    };

    println!("wrote {:} tiles to {:}", count, outfile);

    Ok(())

}

quick_main!(run);
