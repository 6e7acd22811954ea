//! The cooperative tick

use kairos_hal::{MatrixSink, MonotonicClock, NetError, TcpServer, TimeSource};

use super::state::ClockState;
use crate::config::{
    NetworkMode, ACCEPT_TIMEOUT_MS, BOOT_BRIGHTNESS, BOOT_MESSAGE, SCROLL_SPEED_MS, SYNC_RETRIES,
    SYNC_RETRY_DELAY_MS, TICK_SLEEP_MS,
};
use crate::display::DisplayController;
use crate::fmt::{debug, info, trace, warn};
use crate::router::{RequestRouter, RouteKind};
use crate::time::{SyncOutcome, TimeService};

/// What one tick did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// Outcome of a scheduled resync, if one ran
    pub sync: Option<SyncOutcome>,
    /// Separator flipped this tick
    pub blink_toggled: bool,
    /// Route served to a client
    pub served: Option<RouteKind>,
    /// Transport error while accepting or serving
    pub transport_error: Option<NetError>,
}

/// Owner of all application state
///
/// `server` is `None` in offline mode; the loop then never resyncs and
/// never polls the network.
pub struct MainLoop<S, M, T, C> {
    time: TimeService<S>,
    display: DisplayController<M>,
    router: RequestRouter,
    server: Option<T>,
    clock: C,
    state: ClockState,
}

impl<S, M, T, C> MainLoop<S, M, T, C>
where
    S: TimeSource,
    M: MatrixSink,
    T: TcpServer,
    C: MonotonicClock,
{
    pub fn new(time: TimeService<S>, display: DisplayController<M>, server: Option<T>, clock: C) -> Self {
        let state = ClockState::new(time.utc_now(&clock), clock.now_ms());
        Self {
            time,
            display,
            router: RequestRouter::new(),
            server,
            clock,
            state,
        }
    }

    pub fn mode(&self) -> NetworkMode {
        if self.server.is_some() {
            NetworkMode::Online
        } else {
            NetworkMode::Offline
        }
    }

    /// Boot sequence: first sync when online, then the greeting scroll
    ///
    /// The resync interval is measured from here whether or not the sync
    /// succeeded.
    pub async fn boot(&mut self) -> Option<SyncOutcome> {
        self.display.set_intensity(BOOT_BRIGHTNESS);

        let outcome = match self.mode() {
            NetworkMode::Online => Some(
                self.time
                    .synchronize(&mut self.clock, SYNC_RETRIES, SYNC_RETRY_DELAY_MS)
                    .await,
            ),
            NetworkMode::Offline => {
                info!("offline, skipping time sync");
                None
            }
        };
        let utc = self.time.utc_now(&self.clock);

        self.display
            .scroll_text(BOOT_MESSAGE, SCROLL_SPEED_MS, &mut self.clock)
            .await;

        self.state = ClockState::new(utc, self.clock.now_ms());
        info!("boot complete at utc {}", utc);
        outcome
    }

    /// One pass of the loop
    pub async fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();

        let utc = self.time.utc_now(&self.clock);
        if self.mode() == NetworkMode::Online && self.state.resync_due(utc) {
            info!("scheduled time resync");
            let outcome = self
                .time
                .synchronize(&mut self.clock, SYNC_RETRIES, SYNC_RETRY_DELAY_MS)
                .await;
            match outcome {
                SyncOutcome::Synced { epoch, .. } => self.state.record_sync(epoch),
                SyncOutcome::Failed { .. } => {
                    let utc = self.time.utc_now(&self.clock);
                    self.state.defer_resync(utc);
                }
            }
            report.sync = Some(outcome);
        }

        let now_ms = self.clock.now_ms();
        report.blink_toggled = self.state.update_blink(now_ms);

        let local = self.time.local_time(self.time.utc_now(&self.clock));
        self.display.set_brightness_for_hour(local.hour);

        if self.display.is_scrolling() {
            self.display.advance_scroll(now_ms);
        } else {
            self.display.render_clock(&local.hhmm(), self.state.blink_on);
        }

        let accept_timeout = self.pacing_ms(ACCEPT_TIMEOUT_MS);
        if let Some(server) = self.server.as_mut() {
            match server.accept(accept_timeout).await {
                Ok(()) => {
                    let now_ms = self.clock.now_ms();
                    match self
                        .router
                        .serve(server, &local, &mut self.display, now_ms)
                        .await
                    {
                        Ok(kind) => {
                            debug!("served {:?}", kind);
                            report.served = Some(kind);
                        }
                        Err(e) => {
                            debug!("request dropped: {:?}", e);
                            report.transport_error = Some(e);
                        }
                    }
                }
                Err(NetError::Timeout) => {}
                Err(e) => {
                    warn!("accept failed: {:?}", e);
                    report.transport_error = Some(e);
                }
            }
        }

        let sleep = self.pacing_ms(TICK_SLEEP_MS);
        self.clock.delay_ms(sleep).await;
        report
    }

    /// Run forever
    pub async fn run(&mut self) -> ! {
        loop {
            let report = self.tick().await;
            trace!("tick {:?}", report);
        }
    }

    /// Wait budget for the accept or the end-of-tick sleep
    ///
    /// Halved frame interval while a scroll runs, `idle_ms` otherwise.
    fn pacing_ms(&self, idle_ms: u32) -> u32 {
        match self.display.scroll_interval_ms() {
            Some(interval) => idle_ms.min(interval / 2),
            None => idle_ms,
        }
    }

    pub fn state(&self) -> &ClockState {
        &self.state
    }

    pub fn time(&self) -> &TimeService<S> {
        &self.time
    }

    pub fn display(&self) -> &DisplayController<M> {
        &self.display
    }

    pub fn server(&self) -> Option<&T> {
        self.server.as_ref()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
