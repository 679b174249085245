//! Tracking worker that owns the authoritative [`MemoryWorld`] and every
//! attached device.
//!
//! Receives commands from [`TrackerHandle`](crate::TrackerHandle), applies
//! them through [`TrackingSystem`], and publishes the resulting events to the
//! [`EventBus`].

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use pinpointer_core::{CapabilitySet, EntityId, PinpointerDevice, Position};

use crate::api::{Result, RuntimeError};
use crate::events::{ControlEvent, Event, EventBus};
use crate::system::{
    DeviceControl, DeviceId, DeviceView, TrackingEvent, TrackingSystem, denied_event,
};
use crate::world::MemoryWorld;

/// Outcome of one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    pub events: Vec<TrackingEvent>,
}

/// Commands that can be sent to the tracking worker
pub enum Command {
    /// Update every active device once.
    Tick { reply: oneshot::Sender<TickReport> },
    Attach {
        carrier: EntityId,
        device: Box<PinpointerDevice>,
        reply: oneshot::Sender<Result<DeviceId>>,
    },
    Detach {
        device: DeviceId,
        reply: oneshot::Sender<Result<()>>,
    },
    Control {
        device: DeviceId,
        op: DeviceControl,
        reply: oneshot::Sender<Result<Vec<TrackingEvent>>>,
    },
    Spawn {
        position: Position,
        capabilities: CapabilitySet,
        name: Option<String>,
        reply: oneshot::Sender<EntityId>,
    },
    Move {
        entity: EntityId,
        to: Position,
        reply: oneshot::Sender<Result<()>>,
    },
    Rename {
        entity: EntityId,
        name: Option<String>,
        reply: oneshot::Sender<Result<()>>,
    },
    Despawn {
        entity: EntityId,
        reply: oneshot::Sender<Result<()>>,
    },
    QueryDevice {
        device: DeviceId,
        reply: oneshot::Sender<Result<DeviceView>>,
    },
    QueryDevices { reply: oneshot::Sender<Vec<DeviceView>> },
    /// Clone of the current world (read-only).
    QueryWorld { reply: oneshot::Sender<MemoryWorld> },
}

/// Background task that processes tracking commands.
pub struct TrackingWorker {
    world: MemoryWorld,
    system: TrackingSystem,
    tick: u64,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl TrackingWorker {
    pub fn new(
        world: MemoryWorld,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        info!("TrackingWorker initialized with {} entities", world.len());

        Self {
            world,
            system: TrackingSystem::new(),
            tick: 0,
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop. Returns once every command sender is dropped.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }
        info!(
            "TrackingWorker stopped after {} ticks with {} devices",
            self.tick,
            self.system.len()
        );
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Tick { reply } => {
                let report = self.handle_tick();
                if reply.send(report).is_err() {
                    debug!("Tick reply channel closed (caller dropped)");
                }
            }
            Command::Attach {
                carrier,
                device,
                reply,
            } => {
                let result = self.handle_attach(carrier, *device);
                if reply.send(result).is_err() {
                    debug!("Attach reply channel closed (caller dropped)");
                }
            }
            Command::Detach { device, reply } => {
                let result = match self.system.detach(device) {
                    Some(_) => {
                        self.publish_control(ControlEvent::DeviceDetached { device });
                        Ok(())
                    }
                    None => Err(RuntimeError::DeviceNotFound(device)),
                };
                if reply.send(result).is_err() {
                    debug!("Detach reply channel closed (caller dropped)");
                }
            }
            Command::Control { device, op, reply } => {
                let result = self.handle_control(device, op);
                if reply.send(result).is_err() {
                    debug!("Control reply channel closed (caller dropped)");
                }
            }
            Command::Spawn {
                position,
                capabilities,
                name,
                reply,
            } => {
                let entity = self.world.spawn(position, capabilities, name);
                self.publish_control(ControlEvent::EntitySpawned { entity, position });
                if reply.send(entity).is_err() {
                    debug!("Spawn reply channel closed (caller dropped)");
                }
            }
            Command::Move { entity, to, reply } => {
                let result = if self.world.move_to(entity, to) {
                    self.publish_control(ControlEvent::EntityMoved {
                        entity,
                        position: to,
                    });
                    Ok(())
                } else {
                    Err(RuntimeError::EntityNotFound(entity))
                };
                if reply.send(result).is_err() {
                    debug!("Move reply channel closed (caller dropped)");
                }
            }
            Command::Rename {
                entity,
                name,
                reply,
            } => {
                let result = if self.world.rename(entity, name) {
                    Ok(())
                } else {
                    Err(RuntimeError::EntityNotFound(entity))
                };
                if reply.send(result).is_err() {
                    debug!("Rename reply channel closed (caller dropped)");
                }
            }
            Command::Despawn { entity, reply } => {
                let result = match self.world.despawn(entity) {
                    Some(_) => {
                        self.publish_control(ControlEvent::EntityDespawned { entity });
                        Ok(())
                    }
                    None => Err(RuntimeError::EntityNotFound(entity)),
                };
                if reply.send(result).is_err() {
                    debug!("Despawn reply channel closed (caller dropped)");
                }
            }
            Command::QueryDevice { device, reply } => {
                let result = self
                    .system
                    .view(device)
                    .ok_or(RuntimeError::DeviceNotFound(device));
                if reply.send(result).is_err() {
                    debug!("QueryDevice reply channel closed (caller dropped)");
                }
            }
            Command::QueryDevices { reply } => {
                let views = self
                    .system
                    .ids()
                    .filter_map(|id| self.system.view(id))
                    .collect();
                if reply.send(views).is_err() {
                    debug!("QueryDevices reply channel closed (caller dropped)");
                }
            }
            Command::QueryWorld { reply } => {
                if reply.send(self.world.clone()).is_err() {
                    debug!("QueryWorld reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn handle_tick(&mut self) -> TickReport {
        self.tick += 1;
        let events = self.system.tick(&self.world);
        self.publish_tracking(&events);
        self.publish_control(ControlEvent::TickCompleted { tick: self.tick });

        TickReport {
            tick: self.tick,
            events,
        }
    }

    fn handle_attach(&mut self, carrier: EntityId, device: PinpointerDevice) -> Result<DeviceId> {
        if !self.world.contains(carrier) {
            return Err(RuntimeError::EntityNotFound(carrier));
        }
        let id = self.system.attach(carrier, device);
        debug!(device = %id, %carrier, "device attached");
        self.publish_control(ControlEvent::DeviceAttached {
            device: id,
            carrier,
        });
        Ok(id)
    }

    fn handle_control(&mut self, device: DeviceId, op: DeviceControl) -> Result<Vec<TrackingEvent>> {
        match self.system.control(device, op, &self.world) {
            Ok(events) => {
                self.publish_tracking(&events);
                Ok(events)
            }
            Err(error) => {
                if let Some(event) = denied_event(device, &error) {
                    self.event_bus.publish(Event::Tracking(event));
                }
                Err(error)
            }
        }
    }

    fn publish_tracking(&self, events: &[TrackingEvent]) {
        for event in events {
            self.event_bus.publish(Event::Tracking(event.clone()));
        }
    }

    fn publish_control(&self, event: ControlEvent) {
        self.event_bus.publish(Event::Control(event));
    }
}
