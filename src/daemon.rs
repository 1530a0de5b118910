use crate::{io::Injector, source::EventSource, tap::TapFilter};
use anyhow::Result;
use log::{debug, error, info};
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

pub(crate) const TERM_SIGNALS: &[i32] = &[SIGINT, SIGTERM, SIGHUP];

/// Returns a flag the termination signals set. The handler does nothing
/// else.
pub(crate) fn shutdown_flag() -> Result<Arc<AtomicBool>> {
    let shutdown = Arc::new(AtomicBool::new(false));
    for signal in TERM_SIGNALS {
        signal_hook::flag::register(*signal, Arc::clone(&shutdown))?;
    }
    Ok(shutdown)
}

/// Pumps the source into the filter until `shutdown` is set, then closes
/// both ends. Errors while closing are reported, not returned.
pub(crate) fn run<S, I>(
    mut source: S,
    mut filter: TapFilter,
    mut injector: I,
    shutdown: &AtomicBool,
    poll_interval: Duration,
) -> Result<()>
where
    S: EventSource,
    I: Injector,
{
    info!("Watching {} natural key(s)", filter.mappings().len());

    let result = pump(&mut source, &mut filter, &mut injector, shutdown, poll_interval);

    info!("Shutting down");
    if let Err(e) = injector.close() {
        error!("Failed to close the virtual keyboard: {e:#}");
    }
    if let Err(e) = source.close() {
        error!("Failed to close the input devices: {e:#}");
    }

    result
}

fn pump<S, I>(
    source: &mut S,
    filter: &mut TapFilter,
    injector: &mut I,
    shutdown: &AtomicBool,
    poll_interval: Duration,
) -> Result<()>
where
    S: EventSource,
    I: Injector,
{
    while !shutdown.load(Ordering::Relaxed) {
        for event in source.next_batch()? {
            if let Err(e) = filter.on_event(&event, injector) {
                error!("Failed to inject tap for {:?}: {e:#}", event.key);
            }
        }
        thread::sleep(poll_interval);
    }
    debug!("Shutdown requested");
    Ok(())
}
