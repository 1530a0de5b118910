mod cli;
mod config;
mod consts;
mod daemon;
mod event;
mod io;
mod mappings;
mod source;
mod state;
mod tap;

use crate::{
    cli::Args,
    config::config,
    daemon::{run, shutdown_flag},
    io::{NoEmit, UinputInjector},
    mappings::Mappings,
    source::EvdevSource,
    tap::TapFilter,
};
use anyhow::Result;
use clap::Parser;
use log::info;

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = config(args.config.as_deref())?.with_overrides(args.timeout, args.dry_run)?;

    let mappings = Mappings::from_pairs(args.pairs)?;
    for (natural, artificial) in mappings.iter() {
        info!("Tap {:?} -> {:?}", natural, artificial);
    }

    let shutdown = shutdown_flag()?;
    // Open the devices before the virtual keyboard so it never reads itself.
    let source = EvdevSource::open(&config)?;
    let filter = TapFilter::new(mappings, config.tap_timeout());

    if config.no_emit {
        run(source, filter, NoEmit, &shutdown, config.poll_interval())
    } else {
        let injector = UinputInjector::new(filter.mappings())?;
        run(source, filter, injector, &shutdown, config.poll_interval())
    }
}
