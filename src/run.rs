//! The main translation loop.
//!
//! Opens and exclusively grabs the physical device, brings up the
//! virtual output device, then pulls events until an interrupt or
//! termination signal flips the stop flag. Key-class events go through
//! the engine; everything else is forwarded verbatim. A short sleep per
//! iteration throttles emission — flow control, not a timing contract.

use crate::config::Settings;
use crate::engine::{describe_key, Engine, Outcome};
use crate::event::RawEvent;
use crate::sink::{EmitError, EventSink, UinputSink};
use crate::velocity::VelocityTracker;
use evdev::Device;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Delay inserted after each loop iteration.
const LOOP_THROTTLE: Duration = Duration::from_millis(15);

#[derive(Debug, Error)]
pub enum LoopError {
    #[error("failed to open input device {path}: {source}")]
    OpenDevice {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to grab input device: {0}")]
    GrabDevice(#[source] std::io::Error),
    #[error("failed to set input device non-blocking: {0}")]
    SetNonBlocking(#[source] std::io::Error),
    #[error("failed to read from input device: {0}")]
    ReadEvents(#[source] std::io::Error),
    #[error(transparent)]
    Emit(#[from] EmitError),
}

/// Run the translation loop until interrupted. Returns cleanly on
/// SIGINT/SIGTERM; any device I/O failure is fatal and propagates.
pub fn run(device_path: &Path, settings: Settings) -> Result<(), LoopError> {
    let stop = Arc::new(AtomicBool::new(false));
    let stop_signal = stop.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        stop_signal.store(true, Ordering::SeqCst);
    }) {
        warn!(error = %e, "could not install signal handler");
    }

    let mut device = Device::open(device_path).map_err(|source| LoopError::OpenDevice {
        path: device_path.to_path_buf(),
        source,
    })?;
    info!(
        path = %device_path.display(),
        name = device.name().unwrap_or("unknown"),
        "opened input device"
    );

    // Exclusive grab: nothing else sees the physical events while we run.
    device.grab().map_err(LoopError::GrabDevice)?;
    set_nonblocking(&device).map_err(LoopError::SetNonBlocking)?;

    let mut sink = UinputSink::new()?;
    if let Some(path) = sink.device_path() {
        info!(path = %path.display(), "created virtual device");
    }

    let mut engine = Engine::new(
        settings.table,
        VelocityTracker::new(settings.base_speed, settings.repeat_increment),
        settings.combo_trailing_sync,
    );
    info!(
        mappings = engine.table().len(),
        "entering translation loop"
    );

    let result = translate_until_stopped(&stop, &mut device, &mut engine, &mut sink);

    // Release the grab so the OS input stack returns to normal routing;
    // the virtual device is destroyed when the sink drops.
    if let Err(e) = device.ungrab() {
        warn!(error = %e, "failed to release device grab");
    }
    info!("translation loop stopped");
    result
}

fn translate_until_stopped(
    stop: &AtomicBool,
    device: &mut Device,
    engine: &mut Engine,
    sink: &mut UinputSink,
) -> Result<(), LoopError> {
    while !stop.load(Ordering::SeqCst) {
        match device.fetch_events() {
            Ok(events) => {
                for ev in events {
                    let raw = RawEvent::from(ev);
                    if raw.is_key() {
                        debug!(
                            key = %describe_key(raw.code),
                            value = raw.value,
                            "key event"
                        );
                        if engine.dispatch(&raw, sink)? == Outcome::Forward {
                            sink.forward(&raw)?;
                        }
                    } else {
                        sink.forward(&raw)?;
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {}
            // A read interrupted by the signal comes back around to the
            // stop check; anything else is fatal.
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(LoopError::ReadEvents(e)),
        }
        std::thread::sleep(LOOP_THROTTLE);
    }
    Ok(())
}

fn set_nonblocking(device: &Device) -> std::io::Result<()> {
    let fd = device.as_raw_fd();
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(std::io::Error::last_os_error());
    }
    let rc = unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) };
    if rc < 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}
