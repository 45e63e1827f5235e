//! Debounced tray update scheduling.
//!
//! Probe results and settings changes arrive in bursts; re-rendering
//! the tray for each one is wasted work. A single actor task owns the
//! pending deadline and the in-flight flag, so at most one render is
//! in flight and at most one is queued. Requests arriving while a
//! render is in flight are dropped; the next natural trigger picks up
//! whatever data is current by then.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use burnbar_core::{TrayIconStyle, TrayPrimaryBar};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::TrayError;
use crate::render::{render_tray_icon, RenderParams, RenderedIcon};

// ============================================================================
// Triggers
// ============================================================================

/// What caused a tray update request. Each trigger kind carries its
/// own debounce window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateTrigger {
    /// A persisted setting changed; batch rapid edits.
    SettingsChanged,
    /// A provider probe completed; batch multi-provider completions.
    ProbeArrived,
    /// A direct user toggle; render immediately.
    Direct,
}

impl UpdateTrigger {
    /// Quiet period before a render fires for this trigger kind.
    pub fn delay(self) -> Duration {
        match self {
            UpdateTrigger::SettingsChanged => Duration::from_secs(2),
            UpdateTrigger::ProbeArrived => Duration::from_millis(500),
            UpdateTrigger::Direct => Duration::ZERO,
        }
    }
}

// ============================================================================
// Render Job
// ============================================================================

/// A self-contained snapshot of everything one render needs. Built by
/// the scheduler's source callback when the timer fires, never earlier,
/// so a delayed render reflects current data rather than the state at
/// request time.
#[derive(Debug, Clone)]
pub struct RenderJob {
    /// Bars in settings order, already capped by the style.
    pub bars: Vec<TrayPrimaryBar>,
    /// Visual style to draw.
    pub style: TrayIconStyle,
    /// Percent text drawn next to the glyph.
    pub percent_text: Option<String>,
    /// Encoded provider icon bytes for the provider style.
    pub provider_icon: Option<Vec<u8>>,
    /// Device pixel ratio of the target screen.
    pub dpr: f64,
}

impl RenderJob {
    /// Rasterizes this job.
    pub fn render(&self) -> Result<RenderedIcon, TrayError> {
        let params = RenderParams {
            style: self.style,
            percent_text: self.percent_text.as_deref(),
            provider_icon: self.provider_icon.as_deref(),
            dpr: self.dpr,
        };
        render_tray_icon(&self.bars, &params)
    }
}

// ============================================================================
// Scheduler
// ============================================================================

/// Handle to the scheduler actor. Cloneable; dropping every handle
/// stops the actor.
#[derive(Clone)]
pub struct IconScheduler {
    tx: mpsc::UnboundedSender<UpdateTrigger>,
}

impl IconScheduler {
    /// Spawns the scheduler actor.
    ///
    /// `source` builds the render job at fire time from current state;
    /// `apply` receives each finished raster, typically submitting it
    /// to the host tray API.
    pub fn spawn<S, A>(source: S, apply: A) -> Self
    where
        S: Fn() -> RenderJob + Send + Sync + 'static,
        A: Fn(RenderedIcon) + Send + Sync + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_actor(rx, Arc::new(source), Arc::new(apply)));
        Self { tx }
    }

    /// Requests a tray update. Never blocks; if the actor has stopped
    /// the request is silently discarded.
    pub fn request(&self, trigger: UpdateTrigger) {
        let _ = self.tx.send(trigger);
    }
}

async fn run_actor<S, A>(
    mut rx: mpsc::UnboundedReceiver<UpdateTrigger>,
    source: Arc<S>,
    apply: Arc<A>,
) where
    S: Fn() -> RenderJob + Send + Sync + 'static,
    A: Fn(RenderedIcon) + Send + Sync + 'static,
{
    let in_flight = Arc::new(AtomicBool::new(false));
    let mut pending: Option<(UpdateTrigger, Instant)> = None;

    loop {
        match pending {
            Some((trigger, deadline)) => {
                tokio::select! {
                    () = tokio::time::sleep_until(deadline) => {
                        pending = None;
                        fire(trigger, &in_flight, &source, &apply);
                    }
                    received = rx.recv() => {
                        let Some(received) = received else { return };
                        pending = merge_pending(pending, received, Instant::now(), &in_flight);
                    }
                }
            }
            None => {
                let Some(received) = rx.recv().await else { return };
                pending = merge_pending(pending, received, Instant::now(), &in_flight);
            }
        }
    }
}

/// Folds a new request into the pending deadline. A repeat of the
/// pending trigger restarts its quiet period; a different trigger
/// keeps whichever deadline comes first. Requests during an in-flight
/// render are dropped outright.
fn merge_pending(
    pending: Option<(UpdateTrigger, Instant)>,
    trigger: UpdateTrigger,
    now: Instant,
    in_flight: &AtomicBool,
) -> Option<(UpdateTrigger, Instant)> {
    if in_flight.load(Ordering::Acquire) {
        debug!(?trigger, "render in flight, dropping update request");
        return pending;
    }

    let deadline = now + trigger.delay();
    match pending {
        None => Some((trigger, deadline)),
        Some((current, _)) if current == trigger => Some((trigger, deadline)),
        Some((current, existing)) => {
            if deadline < existing {
                Some((trigger, deadline))
            } else {
                Some((current, existing))
            }
        }
    }
}

fn fire<S, A>(trigger: UpdateTrigger, in_flight: &Arc<AtomicBool>, source: &Arc<S>, apply: &Arc<A>)
where
    S: Fn() -> RenderJob + Send + Sync + 'static,
    A: Fn(RenderedIcon) + Send + Sync + 'static,
{
    if in_flight.swap(true, Ordering::AcqRel) {
        debug!(?trigger, "render already in flight, dropping fire");
        return;
    }

    let in_flight = Arc::clone(in_flight);
    let source = Arc::clone(source);
    let apply = Arc::clone(apply);
    tokio::spawn(async move {
        let job = source();
        match job.render() {
            Ok(icon) => apply(icon),
            Err(err) => {
                // Must not leave the flag set, or updates stall forever.
                warn!(?trigger, error = %err, "tray render failed");
            }
        }
        in_flight.store(false, Ordering::Release);
    });
}

// ============================================================================
// Tests
// ============================================================================
