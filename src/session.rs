//! Session control
//!
//! Drives the probe loop: one awaited warm-up round, then a recurring tick
//! that fires `parallelism` concurrent probes per round. Measurements flow
//! over a channel into a single writer task, which serializes all CSV
//! appends. Shutdown stops the ticker, drains rows already delivered to the
//! writer, flushes the file and returns without awaiting in-flight probes.

use crate::config::{RunConfig, SchedulePolicy};
use crate::logging::Logger;
use crate::probe::Probe;
use crate::sink::ResultSink;
use crate::timing::{self, Measurement};
use crate::Result;
use futures::future::join_all;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// The prompt accepts an interval of 0 seconds; the ticker needs a non-zero
/// period, so zero is floored to this.
const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

/// Lifecycle of one session. Terminating is reachable from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Prompts not yet answered.
    AwaitingInput,
    /// Warm-up round in progress, first connections being established.
    Connecting,
    /// Ticker active.
    Running,
    /// Shutdown signal received.
    Terminating,
}

/// Everything a running session shares: the immutable config, the probe and
/// the logger. Created once, passed to every component that needs it.
pub struct SessionContext {
    pub config: RunConfig,
    pub probe: Arc<dyn Probe>,
    pub log: Logger,
}

pub struct SessionController {
    ctx: SessionContext,
    state: SessionState,
    in_flight: Arc<AtomicUsize>,
}

impl SessionController {
    pub fn new(ctx: SessionContext) -> Self {
        Self {
            ctx,
            state: SessionState::AwaitingInput,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run the session until `shutdown` resolves with a signal name.
    ///
    /// The warm-up round is awaited before the ticker starts; a signal during
    /// warm-up terminates without waiting for its probes.
    pub async fn run<F>(&mut self, sink: ResultSink, shutdown: F) -> Result<()>
    where
        F: Future<Output = &'static str>,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = watch::channel(false);
        let writer = spawn_sink_writer(sink, rx, stop_rx, self.ctx.log.for_component("SINK"));

        tokio::pin!(shutdown);
        self.state = SessionState::Connecting;

        let interrupted = tokio::select! {
            _ = self.round(&tx) => false,
            signal = &mut shutdown => {
                self.ctx.log.info(&format!("Received {} during warm-up, shutting down", signal));
                true
            }
        };

        if !interrupted {
            self.state = SessionState::Running;
            let mut ticker = tokio::time::interval(self.ctx.config.interval.max(MIN_TICK_PERIOD));
            if self.ctx.config.policy == SchedulePolicy::QueueAndSerialize {
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            }
            // The first tick of a tokio interval is immediate; the warm-up
            // round already covered it.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => self.on_tick(&tx).await,
                    signal = &mut shutdown => {
                        self.ctx.log.info(&format!("Received {}, shutting down", signal));
                        break;
                    }
                }
            }
        }

        self.state = SessionState::Terminating;

        // Stop the writer: it drains rows already delivered, then flushes and
        // closes the file. In-flight probes are not awaited.
        drop(tx);
        let _ = stop_tx.send(true);
        if let Err(e) = writer.await {
            self.ctx.log.error(&format!("Sink writer task failed: {}", e));
        }
        Ok(())
    }

    async fn on_tick(&self, tx: &mpsc::UnboundedSender<Measurement>) {
        match self.ctx.config.policy {
            SchedulePolicy::AllowOverlap => {
                self.spawn_round(tx);
            }
            SchedulePolicy::SkipIfBusy => {
                if self.in_flight.load(Ordering::Acquire) == 0 {
                    self.spawn_round(tx);
                } else {
                    self.ctx.log.debug("round still in flight, skipping tick");
                }
            }
            SchedulePolicy::QueueAndSerialize => {
                self.round(tx).await;
            }
        }
    }

    /// Fire one round without awaiting it.
    fn spawn_round(&self, tx: &mpsc::UnboundedSender<Measurement>) {
        let probe = Arc::clone(&self.ctx.probe);
        let parallelism = self.ctx.config.parallelism;
        let tx = tx.clone();
        let log = self.ctx.log.clone();
        let in_flight = Arc::clone(&self.in_flight);

        in_flight.fetch_add(1, Ordering::AcqRel);
        tokio::spawn(async move {
            run_round(probe, parallelism, &tx, &log).await;
            in_flight.fetch_sub(1, Ordering::AcqRel);
        });
    }

    /// Run one round to completion.
    async fn round(&self, tx: &mpsc::UnboundedSender<Measurement>) {
        run_round(
            Arc::clone(&self.ctx.probe),
            self.ctx.config.parallelism,
            tx,
            &self.ctx.log,
        )
        .await;
    }
}

/// Issue `parallelism` probes back-to-back and wait for all of them. Each
/// completed probe, success or failure, sends exactly one measurement.
/// Completion order is whatever the underlying I/O resolves first.
async fn run_round(
    probe: Arc<dyn Probe>,
    parallelism: u32,
    tx: &mpsc::UnboundedSender<Measurement>,
    log: &Logger,
) {
    let mut probes = Vec::with_capacity(parallelism as usize);
    for _ in 0..parallelism {
        let probe = Arc::clone(&probe);
        let tx = tx.clone();
        let log = log.clone();
        probes.push(tokio::spawn(async move {
            let measurement = timing::measure(probe.as_ref(), &log).await;
            // Send fails only once the writer is gone during shutdown.
            let _ = tx.send(measurement);
        }));
    }

    for joined in join_all(probes).await {
        if let Err(e) = joined {
            // A panicking probe task is logged and otherwise ignored.
            log.error(&format!("probe task failed: {}", e));
        }
    }
}

/// Single writer task: serializes every CSV append. Ends when all senders
/// are gone or the stop channel fires, whichever comes first, then drains
/// rows that were already delivered and flushes the file.
fn spawn_sink_writer(
    mut sink: ResultSink,
    mut rx: mpsc::UnboundedReceiver<Measurement>,
    mut stop: watch::Receiver<bool>,
    log: Logger,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                maybe = rx.recv() => match maybe {
                    Some(m) => append_row(&mut sink, &m, &log),
                    None => break,
                },
                _ = stop.changed() => break,
            }
        }

        while let Ok(m) = rx.try_recv() {
            append_row(&mut sink, &m, &log);
        }

        if let Err(e) = sink.finish() {
            log.warn(&format!("Failed to flush output file: {}", e));
        }
    })
}

fn append_row(sink: &mut ResultSink, measurement: &Measurement, log: &Logger) {
    if let Err(e) = sink.append(measurement) {
        log.warn(&format!("Failed to append result row: {}", e));
    }
}
