//! Simulation scenario loader.
//!
//! A scenario names entities by label (ids are allocated by whichever world
//! spawns them), attaches devices to carriers, and scripts world edits and
//! device controls against tick numbers.

use std::collections::HashSet;
use std::path::Path;

use pinpointer_core::{CapabilitySet, Position};
use serde::{Deserialize, Serialize};

use crate::loaders::{DeviceProfile, LoadResult, read_file};

/// An entity to spawn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntitySpec {
    /// Scenario-local reference used by devices and script steps.
    pub label: String,
    /// Display name reported to pinpointers. Defaults to none.
    #[serde(default)]
    pub name: Option<String>,
    pub position: Position,
    #[serde(default)]
    pub capabilities: CapabilitySet,
}

/// A pinpointer carried by one of the scenario entities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeviceSpec {
    pub carrier: String,
    #[serde(default)]
    pub profile: DeviceProfile,
    /// Switch the device on before the first tick.
    #[serde(default)]
    pub active: bool,
}

/// Scripted change applied at the start of a tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ScriptAction {
    Spawn(EntitySpec),
    Move { entity: String, to: Position },
    Despawn { entity: String },
    /// Index into [`Scenario::devices`].
    Toggle { device: usize },
    Retarget { device: usize, entity: String },
    Scan { device: usize },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub tick: u64,
    pub action: ScriptAction,
}

/// A complete simulation setup.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub entities: Vec<EntitySpec>,
    pub devices: Vec<DeviceSpec>,
    pub script: Vec<ScriptStep>,
    /// Number of ticks to run.
    pub ticks: u64,
}

impl Scenario {
    /// Script steps scheduled for `tick`, in file order.
    pub fn steps_at(&self, tick: u64) -> impl Iterator<Item = &ScriptAction> {
        self.script
            .iter()
            .filter(move |step| step.tick == tick)
            .map(|step| &step.action)
    }

    /// Script steps in the order they run: by tick, then file order.
    pub fn ordered_steps(&self) -> Vec<&ScriptStep> {
        let mut steps: Vec<_> = self.script.iter().collect();
        steps.sort_by_key(|step| step.tick);
        steps
    }

    /// Checks label uniqueness, references and device profiles.
    ///
    /// Devices may only be carried by initial entities. A script step may only
    /// name an entity that exists by the time the step runs.
    pub fn validate(&self) -> LoadResult<()> {
        let mut labels = HashSet::new();
        for entity in &self.entities {
            if !labels.insert(entity.label.as_str()) {
                anyhow::bail!("duplicate entity label '{}'", entity.label);
            }
        }

        for (index, device) in self.devices.iter().enumerate() {
            if !labels.contains(device.carrier.as_str()) {
                anyhow::bail!("device {} carried by unknown entity '{}'", index, device.carrier);
            }
            device
                .profile
                .config
                .validate()
                .map_err(|e| anyhow::anyhow!("device {}: {}", index, e))?;
        }

        for step in self.ordered_steps() {
            let (entity, device) = match &step.action {
                ScriptAction::Spawn(spawned) => {
                    if !labels.insert(spawned.label.as_str()) {
                        anyhow::bail!("duplicate entity label '{}'", spawned.label);
                    }
                    (None, None)
                }
                ScriptAction::Move { entity, .. } | ScriptAction::Despawn { entity } => {
                    (Some(entity), None)
                }
                ScriptAction::Toggle { device } | ScriptAction::Scan { device } => {
                    (None, Some(*device))
                }
                ScriptAction::Retarget { device, entity } => (Some(entity), Some(*device)),
            };
            if let Some(entity) = entity
                && !labels.contains(entity.as_str())
            {
                anyhow::bail!("tick {}: unknown entity '{}'", step.tick, entity);
            }
            if let Some(device) = device
                && device >= self.devices.len()
            {
                anyhow::bail!("tick {}: unknown device {}", step.tick, device);
            }
        }

        Ok(())
    }
}

/// Loader for scenarios from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    /// Load and validate a scenario from a RON file.
    pub fn load(path: &Path) -> LoadResult<Scenario> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid scenario {}: {:#}", path.display(), e))
    }

    /// Parse and validate a scenario from RON text.
    pub fn parse(content: &str) -> LoadResult<Scenario> {
        let scenario: Scenario = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))?;
        scenario.validate()?;
        Ok(scenario)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::bundled_data_dir;

    const MINIMAL: &str = r#"
        (
            entities: [
                (label: "captain", position: (x: 0.0, y: 0.0)),
                (
                    label: "disk",
                    name: Some("nuclear authentication disk"),
                    position: (x: 12.0, y: 5.0),
                    capabilities: "NUCLEAR_DISK",
                ),
            ],
            devices: [
                (carrier: "captain", profile: (capabilities: "NUCLEAR_DISK"), active: true),
            ],
            script: [
                (tick: 2, action: Move(entity: "disk", to: (x: 3.0, y: 0.0))),
                (tick: 4, action: Despawn(entity: "disk")),
            ],
            ticks: 6,
        )
    "#;

    #[test]
    fn parses_minimal_scenario() {
        let scenario = ScenarioLoader::parse(MINIMAL).unwrap();
        assert_eq!(scenario.entities.len(), 2);
        assert_eq!(scenario.entities[1].capabilities, CapabilitySet::NUCLEAR_DISK);
        assert_eq!(scenario.devices[0].profile.capabilities, CapabilitySet::NUCLEAR_DISK);
        assert!(scenario.devices[0].active);
        assert_eq!(scenario.ticks, 6);

        let at_two: Vec<_> = scenario.steps_at(2).collect();
        assert_eq!(
            at_two,
            vec![&ScriptAction::Move {
                entity: "disk".into(),
                to: Position::new(3.0, 0.0)
            }]
        );
        assert_eq!(scenario.steps_at(3).count(), 0);
    }

    #[test]
    fn rejects_dangling_references() {
        let mut scenario = ScenarioLoader::parse(MINIMAL).unwrap();
        scenario.script.push(ScriptStep {
            tick: 1,
            action: ScriptAction::Toggle { device: 3 },
        });
        assert!(scenario.validate().is_err());

        let mut scenario = ScenarioLoader::parse(MINIMAL).unwrap();
        scenario.devices[0].carrier = "ghost".into();
        assert!(scenario.validate().is_err());

        let mut scenario = ScenarioLoader::parse(MINIMAL).unwrap();
        scenario.entities.push(scenario.entities[0].clone());
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn spawned_entities_can_be_referenced() {
        let mut scenario = ScenarioLoader::parse(MINIMAL).unwrap();
        scenario.script.push(ScriptStep {
            tick: 5,
            action: ScriptAction::Spawn(EntitySpec {
                label: "beacon".into(),
                name: None,
                position: Position::new(1.0, 1.0),
                capabilities: CapabilitySet::DISTRESS_BEACON,
            }),
        });
        scenario.script.push(ScriptStep {
            tick: 6,
            action: ScriptAction::Retarget {
                device: 0,
                entity: "beacon".into(),
            },
        });
        assert!(scenario.validate().is_ok());
    }

    #[test]
    fn entities_are_unknown_before_their_spawn_step() {
        let early = r#"(
            entities: [(label: "carrier", position: (x: 0.0, y: 0.0))],
            script: [
                (tick: 1, action: Move(entity: "late", to: (x: 1.0, y: 0.0))),
                (tick: 2, action: Spawn((label: "late", position: (x: 4.0, y: 0.0)))),
            ],
            ticks: 2,
        )"#;
        let err = ScenarioLoader::parse(early).unwrap_err();
        assert!(err.to_string().contains("unknown entity 'late'"));

        // Listed out of tick order in the file, but spawned first at run time.
        let reordered = r#"(
            entities: [(label: "carrier", position: (x: 0.0, y: 0.0))],
            script: [
                (tick: 3, action: Move(entity: "late", to: (x: 1.0, y: 0.0))),
                (tick: 2, action: Spawn((label: "late", position: (x: 4.0, y: 0.0)))),
            ],
            ticks: 3,
        )"#;
        assert!(ScenarioLoader::parse(reordered).is_ok());

        let mut scenario = ScenarioLoader::parse(MINIMAL).unwrap();
        scenario.script.push(ScriptStep {
            tick: 1,
            action: ScriptAction::Spawn(EntitySpec {
                label: "escort".into(),
                name: None,
                position: Position::new(2.0, 2.0),
                capabilities: CapabilitySet::empty(),
            }),
        });
        scenario.devices[0].carrier = "escort".into();
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn bundled_scenario_is_valid() {
        let path = bundled_data_dir().join("scenarios").join("disk_hunt.ron");
        let scenario = ScenarioLoader::load(&path).unwrap();
        assert!(!scenario.devices.is_empty());
        assert!(scenario.ticks > 0);
    }
}
