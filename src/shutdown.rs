//! Structured shutdown: release the pins exactly once on every exit path.
//!
//! A [`ShutdownHook`] wraps the release action.  It can be fired from
//! several places, and whichever gets there first runs the action:
//!
//! - a [`ShutdownGuard`] held by `main` (normal return, unwinding),
//! - the panic hook chained in by [`install`] (abnormal termination),
//! - on ESP-IDF, the `esp_register_shutdown_handler` callback, which runs
//!   before every `esp_restart()` (the platform's termination path).
//!
//! The action reports whether it actually released.  A `false` return
//! leaves the hook armed so a later exit path can try again.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use log::{error, info};

use crate::error::{Error, Result};

type ReleaseAction = Box<dyn FnMut() -> bool + Send>;

struct Inner {
    fired: AtomicBool,
    action: Mutex<ReleaseAction>,
}

/// Idempotent release callback, cheap to clone and share.
#[derive(Clone)]
pub struct ShutdownHook {
    inner: Arc<Inner>,
}

impl ShutdownHook {
    pub fn new(action: impl FnMut() -> bool + Send + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                fired: AtomicBool::new(false),
                action: Mutex::new(Box::new(action)),
            }),
        }
    }

    /// Run the action unless it already completed.  Returns `true` only for
    /// the call that completed it.
    pub fn fire(&self) -> bool {
        if self.has_fired() {
            return false;
        }
        let mut action = self
            .inner
            .action
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Another path may have completed while we waited for the lock.
        if self.has_fired() {
            return false;
        }
        if action() {
            self.inner.fired.store(true, Ordering::Release);
            true
        } else {
            false
        }
    }

    pub fn has_fired(&self) -> bool {
        self.inner.fired.load(Ordering::Acquire)
    }

    /// A guard that fires the hook when dropped.
    pub fn guard(&self) -> ShutdownGuard {
        ShutdownGuard { hook: self.clone() }
    }
}

/// Fires its [`ShutdownHook`] on drop.
pub struct ShutdownGuard {
    hook: ShutdownHook,
}

impl Drop for ShutdownGuard {
    fn drop(&mut self) {
        self.hook.fire();
    }
}

// ── Process-wide registration ─────────────────────────────────

static PROCESS_HOOK: OnceLock<ShutdownHook> = OnceLock::new();

/// Register `hook` with the process lifecycle.  Only one hook may be
/// installed per process.
pub fn install(hook: &ShutdownHook) -> Result<()> {
    PROCESS_HOOK
        .set(hook.clone())
        .map_err(|_| Error::Init("shutdown hook already installed"))?;

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        error!("PANIC: {}", panic_info);
        fire_process_hook();
        previous(panic_info);
    }));

    register_platform_handler()?;
    info!("shutdown: release hook installed");
    Ok(())
}

/// Fire the installed process hook, if any.
pub fn fire_process_hook() -> bool {
    PROCESS_HOOK.get().is_some_and(ShutdownHook::fire)
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn on_platform_shutdown() {
    fire_process_hook();
}

#[cfg(target_os = "espidf")]
fn register_platform_handler() -> Result<()> {
    // SAFETY: registers a plain function pointer; the callback only touches
    // the process hook, which is 'static once installed.
    let rc = unsafe {
        esp_idf_svc::sys::esp_register_shutdown_handler(Some(on_platform_shutdown))
    };
    if rc != esp_idf_svc::sys::ESP_OK as i32 {
        return Err(Error::Init("esp_register_shutdown_handler failed"));
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
fn register_platform_handler() -> Result<()> {
    info!("shutdown(sim): no platform handler to register");
    Ok(())
}
