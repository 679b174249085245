//! Plays a [`Scenario`] against a running tracker.

use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use tracing::{debug, warn};

use pinpointer_content::{EntitySpec, Scenario, ScriptAction};
use pinpointer_core::{EntityId, ErrorSeverity, TrackerError};
use pinpointer_runtime::{DeviceId, DeviceView, RuntimeError, TrackerHandle, TrackingEvent};

/// Everything observed during one tick.
#[derive(Debug, Clone, Serialize)]
pub struct TickOutput {
    pub tick: u64,
    /// Events from scripted controls followed by those of the update pass.
    pub events: Vec<TrackingEvent>,
    pub devices: Vec<DeviceView>,
}

pub struct Simulation {
    handle: TrackerHandle,
    labels: HashMap<String, EntityId>,
    devices: Vec<DeviceId>,
}

impl Simulation {
    /// Spawns the scenario's entities and attaches its devices.
    pub async fn setup(handle: TrackerHandle, scenario: &Scenario) -> Result<Self> {
        let mut sim = Self {
            handle,
            labels: HashMap::new(),
            devices: Vec::with_capacity(scenario.devices.len()),
        };

        for spec in &scenario.entities {
            sim.spawn(spec).await?;
        }

        for (index, spec) in scenario.devices.iter().enumerate() {
            let carrier = sim.entity(&spec.carrier)?;
            let device = spec
                .profile
                .build()
                .with_context(|| format!("device {index}"))?;
            let id = sim.handle.attach(carrier, device).await?;
            if spec.active {
                sim.handle.activate(id).await?;
            }
            sim.devices.push(id);
        }

        Ok(sim)
    }

    pub fn devices(&self) -> &[DeviceId] {
        &self.devices
    }

    pub fn entity(&self, label: &str) -> Result<EntityId> {
        self.labels
            .get(label)
            .copied()
            .ok_or_else(|| anyhow!("unknown entity '{label}'"))
    }

    fn device(&self, index: usize) -> Result<DeviceId> {
        self.devices
            .get(index)
            .copied()
            .ok_or_else(|| anyhow!("unknown device {index}"))
    }

    async fn spawn(&mut self, spec: &EntitySpec) -> Result<()> {
        let id = self
            .handle
            .spawn(spec.position, spec.capabilities, spec.name.clone())
            .await?;
        debug!(label = %spec.label, entity = %id, "spawned");
        self.labels.insert(spec.label.clone(), id);
        Ok(())
    }

    /// Applies the steps scheduled for `tick`, then advances the tracker.
    pub async fn step(&mut self, scenario: &Scenario, tick: u64) -> Result<TickOutput> {
        let mut events = Vec::new();
        for action in scenario.steps_at(tick) {
            events.extend(self.apply(action).await?);
        }

        let report = self.handle.tick().await?;
        events.extend(report.events);

        Ok(TickOutput {
            tick: report.tick,
            events,
            devices: self.handle.query_devices().await?,
        })
    }

    /// Runs every tick of `scenario` in order.
    pub async fn run(&mut self, scenario: &Scenario, ticks: u64) -> Result<Vec<TickOutput>> {
        let mut outputs = Vec::with_capacity(ticks as usize);
        for tick in 1..=ticks {
            outputs.push(self.step(scenario, tick).await?);
        }
        Ok(outputs)
    }

    async fn apply(&mut self, action: &ScriptAction) -> Result<Vec<TrackingEvent>> {
        let result = match action {
            ScriptAction::Spawn(spec) => {
                self.spawn(spec).await?;
                Ok(Vec::new())
            }
            ScriptAction::Move { entity, to } => {
                let id = self.entity(entity)?;
                self.handle.move_entity(id, *to).await.map(|()| Vec::new())
            }
            ScriptAction::Despawn { entity } => {
                let id = self.entity(entity)?;
                self.handle.despawn(id).await.map(|()| Vec::new())
            }
            ScriptAction::Toggle { device } => self.handle.toggle(self.device(*device)?).await,
            ScriptAction::Retarget { device, entity } => {
                let target = self.entity(entity)?;
                self.handle.retarget(self.device(*device)?, target).await
            }
            ScriptAction::Scan { device } => self.handle.scan(self.device(*device)?).await,
        };

        tolerate(result)
    }
}

/// Scripted steps may fail the way a player's input would; only internal
/// failures stop the run.
fn tolerate(result: Result<Vec<TrackingEvent>, RuntimeError>) -> Result<Vec<TrackingEvent>> {
    match result {
        Ok(events) => Ok(events),
        Err(e) if e.severity() == ErrorSeverity::Internal => Err(e.into()),
        Err(e) => {
            warn!(code = e.error_code(), "script step rejected: {}", e);
            Ok(Vec::new())
        }
    }
}
