use crate::{config::Config, consts::VIRTUAL_DEVICE_NAME, event::KeyEvent};
use anyhow::{Context, Result, bail};
use evdev::Device as EvDevDevice;
use log::{debug, info, warn};
use std::io::ErrorKind;
use std::path::PathBuf;
use udev::Enumerator;

/// Ordered stream of input events.
pub(crate) trait EventSource {
    /// Everything that arrived since the last call, oldest first. Never blocks.
    fn next_batch(&mut self) -> Result<Vec<KeyEvent>>;

    fn close(self) -> Result<()>
    where
        Self: Sized;
}

struct Watched {
    device: EvDevDevice,
    path: PathBuf,
}

/// Reads every keyboard and pointer without grabbing them, so the keys keep
/// doing what they normally do.
pub(crate) struct EvdevSource {
    devices: Vec<Watched>,
}

impl EvdevSource {
    pub fn open(config: &Config) -> Result<Self> {
        debug!("Detecting input devices");

        let mut enumerator = Enumerator::new()?;
        enumerator.match_subsystem("input")?;

        let mut devices = Vec::new();

        for udev_device in enumerator.scan_devices()? {
            let is_input = ["ID_INPUT_KEYBOARD", "ID_INPUT_MOUSE"]
                .iter()
                .any(|property| udev_device.property_value(property).is_some_and(|v| v == "1"));
            let is_evdev = udev_device
                .sysname()
                .to_str()
                .is_some_and(|name| name.starts_with("event"));
            if !is_input || !is_evdev {
                continue;
            }

            let Some(devnode) = udev_device.devnode() else {
                continue;
            };
            let device = match EvDevDevice::open(devnode) {
                Ok(device) => device,
                Err(e) => {
                    warn!("Cannot open {}: {e}", devnode.display());
                    continue;
                }
            };

            let name = device.name().unwrap_or_default().to_owned();
            if name == VIRTUAL_DEVICE_NAME {
                continue;
            }
            if !config.devices.is_empty() && !config.devices.contains(&name) {
                debug!("Device ignored: {name}");
                continue;
            }

            device
                .set_nonblocking(true)
                .with_context(|| format!("Failed to set {} non-blocking", devnode.display()))?;

            info!("Device monitored: {} ({})", name, devnode.display());
            devices.push(Watched {
                device,
                path: devnode.to_path_buf(),
            });
        }

        if devices.is_empty() {
            bail!("No readable keyboard or pointer found (are you in the 'input' group?)");
        }

        Ok(Self { devices })
    }
}

impl EventSource for EvdevSource {
    fn next_batch(&mut self) -> Result<Vec<KeyEvent>> {
        let mut batch = Vec::new();

        let mut i = 0;
        while i < self.devices.len() {
            let fetched = match self.devices[i].device.fetch_events() {
                Ok(events) => {
                    batch.extend(
                        events
                            .map(|event| KeyEvent::from(&event))
                            .filter(|event| !event.is_ignored()),
                    );
                    Ok(())
                }
                Err(e) => Err(e),
            };
            match fetched {
                Ok(()) => i += 1,
                Err(e) if e.kind() == ErrorKind::WouldBlock => i += 1,
                Err(e) => {
                    let lost = self.devices.swap_remove(i);
                    warn!("Lost {}: {e}", lost.path.display());
                }
            }
        }

        if self.devices.is_empty() {
            bail!("All input devices are gone");
        }

        // Stable, so each device keeps its own order.
        batch.sort_by_key(|event| event.time);
        Ok(batch)
    }

    fn close(self) -> Result<()> {
        for watched in self.devices {
            debug!("Closing {}", watched.path.display());
            drop(watched.device);
        }
        Ok(())
    }
}
