//! High-level runtime orchestrator.
//!
//! The runtime owns the tracking worker (and an optional ticker), wires up
//! command/event channels, and exposes a builder-based API for clients.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::api::{Result, RuntimeError, TrackerHandle};
use crate::events::EventBus;
use crate::workers::{Command, TrackingWorker};
use crate::world::MemoryWorld;

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Tick automatically at this interval. `None` leaves ticking to callers.
    pub tick_interval: Option<Duration>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 256,
            command_buffer_size: 32,
            tick_interval: None,
        }
    }
}

/// Main runtime that orchestrates device tracking
///
/// [`TrackerHandle`] provides a cloneable façade for clients.
pub struct TrackerRuntime {
    handle: TrackerHandle,
    worker_handle: JoinHandle<()>,
    ticker_handle: Option<JoinHandle<()>>,
}

impl TrackerRuntime {
    /// Create a new runtime builder
    pub fn builder() -> TrackerRuntimeBuilder {
        TrackerRuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> TrackerHandle {
        self.handle.clone()
    }

    /// Shutdown the runtime gracefully
    ///
    /// Waits for the worker to drain its queue, which happens once every
    /// handle clone held by clients has been dropped as well.
    pub async fn shutdown(self) -> Result<()> {
        if let Some(ticker) = self.ticker_handle {
            ticker.abort();
            if let Err(e) = ticker.await
                && !e.is_cancelled()
            {
                return Err(RuntimeError::WorkerJoin(e));
            }
        }

        drop(self.handle);
        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`TrackerRuntime`] with flexible configuration.
pub struct TrackerRuntimeBuilder {
    config: RuntimeConfig,
    world: MemoryWorld,
}

impl TrackerRuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            world: MemoryWorld::new(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide the initial world
    pub fn world(mut self, world: MemoryWorld) -> Self {
        self.world = world;
        self
    }

    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.config.tick_interval = Some(interval);
        self
    }

    /// Build the runtime and spawn its workers on the current tokio runtime.
    pub async fn build(self) -> Result<TrackerRuntime> {
        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = TrackerHandle::new(command_tx, event_bus.clone());

        let worker = TrackingWorker::new(self.world, command_rx, event_bus);
        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        let ticker_handle = self.config.tick_interval.map(|period| {
            info!("Automatic ticking every {:?}", period);
            let ticker = handle.clone();
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(period);
                loop {
                    interval.tick().await;
                    if let Err(e) = ticker.tick().await {
                        warn!("Ticker stopped: {}", e);
                        break;
                    }
                }
            })
        });

        Ok(TrackerRuntime {
            handle,
            worker_handle,
            ticker_handle,
        })
    }
}
