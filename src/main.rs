use std::io::{self, Write};

use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};
use log::LevelFilter;

use numview::demos;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Demo {
    /// Advanced indexing with index arrays
    Slice,
    /// Which operations return views and which return copies
    ViewOrCopy,
    /// Global variables shared between importing units
    Globals,
    /// All of the above, in order
    All,
}

#[derive(Parser)]
#[clap(version, about)]
struct Cli {
    /// The demonstration to run
    #[clap(value_enum, default_value_t = Demo::All)]
    demo: Demo,

    /// Log more; repeat for even more
    #[clap(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn run(demo: Demo, out: &mut impl Write) -> Result<()> {
    match demo {
        Demo::Slice => demos::slice(out),
        Demo::ViewOrCopy => demos::view_or_copy(out),
        Demo::Globals => demos::globals(out),
        Demo::All => {
            for demo in [Demo::Slice, Demo::ViewOrCopy, Demo::Globals] {
                log::info!("running {:?}", demo);
                run(demo, out)?;
            }
            Ok(())
        },
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::default()
        .filter_level(level)
        .parse_env(env_logger::Env::default().filter("NUMVIEW_LOG"))
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(cli.demo, &mut out)?;
    out.flush()?;
    Ok(())
}
