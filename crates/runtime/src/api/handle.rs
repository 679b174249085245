//! Cloneable façade for issuing commands to the runtime.
//!
//! [`TrackerHandle`] hides channel plumbing and offers async helpers for
//! editing the world, driving devices and streaming events from topics.
use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};

use pinpointer_core::{CapabilitySet, EntityId, PinpointerConfig, PinpointerDevice, Position};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::system::{DeviceControl, DeviceId, DeviceView, TrackingEvent};
use crate::workers::{Command, TickReport};
use crate::world::MemoryWorld;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct TrackerHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl TrackerHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Advance the simulation by one tick.
    pub async fn tick(&self) -> Result<TickReport> {
        self.request(|reply| Command::Tick { reply }).await
    }

    // ===== devices =====

    /// Attach `device` to an existing `carrier` entity.
    pub async fn attach(&self, carrier: EntityId, device: PinpointerDevice) -> Result<DeviceId> {
        self.request(|reply| Command::Attach {
            carrier,
            device: Box::new(device),
            reply,
        })
        .await?
    }

    pub async fn detach(&self, device: DeviceId) -> Result<()> {
        self.request(|reply| Command::Detach { device, reply })
            .await?
    }

    /// Apply a control operation and return the events it produced.
    pub async fn control(&self, device: DeviceId, op: DeviceControl) -> Result<Vec<TrackingEvent>> {
        self.request(|reply| Command::Control { device, op, reply })
            .await?
    }

    pub async fn activate(&self, device: DeviceId) -> Result<Vec<TrackingEvent>> {
        self.control(device, DeviceControl::Activate).await
    }

    pub async fn deactivate(&self, device: DeviceId) -> Result<Vec<TrackingEvent>> {
        self.control(device, DeviceControl::Deactivate).await
    }

    pub async fn toggle(&self, device: DeviceId) -> Result<Vec<TrackingEvent>> {
        self.control(device, DeviceControl::Toggle).await
    }

    /// Fails with [`RuntimeError::Retarget`] when the device is locked.
    pub async fn retarget(&self, device: DeviceId, entity: EntityId) -> Result<Vec<TrackingEvent>> {
        self.control(device, DeviceControl::Retarget(entity)).await
    }

    pub async fn clear_target(&self, device: DeviceId) -> Result<Vec<TrackingEvent>> {
        self.control(device, DeviceControl::ClearTarget).await
    }

    pub async fn scan(&self, device: DeviceId) -> Result<Vec<TrackingEvent>> {
        self.control(device, DeviceControl::Scan).await
    }

    pub async fn set_can_retarget(
        &self,
        device: DeviceId,
        can_retarget: bool,
    ) -> Result<Vec<TrackingEvent>> {
        self.control(device, DeviceControl::SetCanRetarget(can_retarget))
            .await
    }

    pub async fn reconfigure_capabilities(
        &self,
        device: DeviceId,
        capabilities: CapabilitySet,
    ) -> Result<Vec<TrackingEvent>> {
        self.control(device, DeviceControl::ReconfigureCapabilities(capabilities))
            .await
    }

    pub async fn set_config(
        &self,
        device: DeviceId,
        config: PinpointerConfig,
    ) -> Result<Vec<TrackingEvent>> {
        self.control(device, DeviceControl::SetConfig(config)).await
    }

    pub async fn query_device(&self, device: DeviceId) -> Result<DeviceView> {
        self.request(|reply| Command::QueryDevice { device, reply })
            .await?
    }

    /// Every attached device, in [`DeviceId`] order.
    pub async fn query_devices(&self) -> Result<Vec<DeviceView>> {
        self.request(|reply| Command::QueryDevices { reply }).await
    }

    // ===== world =====

    pub async fn spawn(
        &self,
        position: Position,
        capabilities: CapabilitySet,
        name: Option<String>,
    ) -> Result<EntityId> {
        self.request(|reply| Command::Spawn {
            position,
            capabilities,
            name,
            reply,
        })
        .await
    }

    pub async fn move_entity(&self, entity: EntityId, to: Position) -> Result<()> {
        self.request(|reply| Command::Move { entity, to, reply })
            .await?
    }

    pub async fn rename(&self, entity: EntityId, name: Option<String>) -> Result<()> {
        self.request(|reply| Command::Rename {
            entity,
            name,
            reply,
        })
        .await?
    }

    pub async fn despawn(&self, entity: EntityId) -> Result<()> {
        self.request(|reply| Command::Despawn { entity, reply })
            .await?
    }

    /// Query the current world (read-only snapshot)
    pub async fn query_world(&self) -> Result<MemoryWorld> {
        self.request(|reply| Command::QueryWorld { reply }).await
    }

    // ===== events =====

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Tracking` - Device activation, target and reading changes
    /// - `Topic::Control` - World edits, attachment and tick boundaries
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
