//! Headless controller for channelmix.
//!
//! Hosts a `SoundSystem` for multi-threaded callers: one lock guards every
//! channel, a background thread drives the fixed-rate tick, and bindings
//! hold cloneable handles to issue commands.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use cm_engine::VirtualDevices;
use log::{info, warn};
use parking_lot::{Mutex, MutexGuard};

// Re-export common types so callers don't need cm-ir/cm-engine directly.
pub use cm_engine::{ChannelSnapshot, ConfigurationError, SoundSystem};
pub use cm_formats::{FormatError, Manifest};
pub use cm_ir::{ChannelMask, Clip, ClipKey};

/// Tick rate used by [`Controller::start`] callers that have no host frame rate.
pub const DEFAULT_TICK_HZ: u32 = 60;

/// Cloneable reference to a shared sound system, for UI bindings and other
/// threads.
#[derive(Clone)]
pub struct SystemHandle {
    system: Arc<Mutex<SoundSystem>>,
}

impl SystemHandle {
    /// Lock the system for a sequence of commands.
    pub fn lock(&self) -> MutexGuard<'_, SoundSystem> {
        self.system.lock()
    }

    /// Run `f` with the system locked.
    pub fn with<R>(&self, f: impl FnOnce(&mut SoundSystem) -> R) -> R {
        f(&mut self.system.lock())
    }
}

/// Owns a sound system and its tick thread.
pub struct Controller {
    handle: SystemHandle,
    ticker: Option<TickerHandle>,
    ticks: Arc<AtomicU64>,
}

struct TickerHandle {
    stop_signal: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl Controller {
    pub fn new(system: SoundSystem) -> Self {
        Self {
            handle: SystemHandle { system: Arc::new(Mutex::new(system)) },
            ticker: None,
            ticks: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Build a system on in-memory devices from a loaded manifest.
    pub fn from_manifest(manifest: Manifest) -> anyhow::Result<Self> {
        let system = SoundSystem::new(&manifest.config, manifest.clips, &mut VirtualDevices)
            .context("building sound system")?;
        Ok(Self::new(system))
    }

    /// Load a RON manifest from disk and build a system from it.
    pub fn load_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let manifest = cm_formats::load_config_file(path)
            .with_context(|| format!("loading {}", path.display()))?;
        Self::from_manifest(manifest)
    }

    /// The six reference channels with the demo clip set.
    pub fn reference() -> anyhow::Result<Self> {
        Self::from_manifest(cm_formats::reference_manifest())
    }

    pub fn handle(&self) -> SystemHandle {
        self.handle.clone()
    }

    pub fn lock(&self) -> MutexGuard<'_, SoundSystem> {
        self.handle.lock()
    }

    pub fn snapshot(&self) -> Vec<ChannelSnapshot> {
        self.handle.lock().snapshot()
    }

    /// Ticks run since construction, by the thread or by [`Controller::tick`].
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Advance the system by hand. Useful when the host owns the frame loop.
    pub fn tick(&self, dt: f32) {
        tick_once(&self.handle.system, dt);
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    // --- Background tick ---

    /// Start ticking at `rate_hz` on a background thread, replacing any
    /// running ticker.
    pub fn start(&mut self, rate_hz: u32) {
        self.stop();

        let period = Duration::from_secs_f64(1.0 / f64::from(rate_hz.max(1)));
        let stop_signal = Arc::new(AtomicBool::new(false));

        let stop = stop_signal.clone();
        let system = self.handle.system.clone();
        let ticks = self.ticks.clone();

        let thread = std::thread::spawn(move || {
            tick_thread(system, period, stop, ticks);
        });
        info!("tick thread started at {} Hz", rate_hz.max(1));

        self.ticker = Some(TickerHandle { stop_signal, thread: Some(thread) });
    }

    pub fn stop(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.stop_signal.store(true, Ordering::Relaxed);
            if let Some(thread) = ticker.thread.take() {
                if thread.join().is_err() {
                    warn!("tick thread panicked");
                }
            }
            info!("tick thread stopped after {} tick(s)", self.ticks());
        }
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    /// Stop ticking and tear the system down. Fails if a [`SystemHandle`]
    /// is still alive elsewhere.
    pub fn shutdown(mut self) -> anyhow::Result<()> {
        self.stop();
        let system = self.handle.system.clone();
        drop(self);
        match Arc::try_unwrap(system) {
            Ok(system) => {
                system.into_inner().shutdown();
                Ok(())
            }
            Err(shared) => bail!(
                "cannot shut down: {} handle(s) still reference the sound system",
                Arc::strong_count(&shared) - 1
            ),
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.stop();
    }
}

fn tick_once(system: &Mutex<SoundSystem>, dt: f32) {
    let mut system = system.lock();
    #[cfg(feature = "alloc_check")]
    assert_no_alloc::assert_no_alloc(|| system.tick(dt));
    #[cfg(not(feature = "alloc_check"))]
    system.tick(dt);
}

fn tick_thread(
    system: Arc<Mutex<SoundSystem>>,
    period: Duration,
    stop_signal: Arc<AtomicBool>,
    ticks: Arc<AtomicU64>,
) {
    let mut last = Instant::now();
    let mut next = last + period;

    while !stop_signal.load(Ordering::Relaxed) {
        let now = Instant::now();
        if now < next {
            std::thread::sleep(next - now);
            continue;
        }
        tick_once(&system, now.duration_since(last).as_secs_f32());
        ticks.fetch_add(1, Ordering::Relaxed);
        last = now;
        next += period;
        // Don't try to catch up after a long stall.
        if next < now {
            next = now + period;
        }
    }
}
