//! Boundary to the external reconfiguration pathfinder.
//!
//! The pathfinder is opaque: it takes an initial and a final lattice
//! configuration plus search settings, all as JSON documents, and answers with
//! a scenario string in the same grammar [`Scenario::parse`] reads.

use crate::error::PathfinderError;
use crate::lattice::ModuleShape;
use crate::module::ModuleRegistry;
use crate::scenario::Scenario;
use serde::{Deserialize, Serialize};

/// Padding cells the pathfinder reserves around a configuration's tensor.
pub const TENSOR_PADDING: i32 = 5;

/// Search settings forwarded verbatim to the pathfinder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathfinderSettings {
    pub name: String,
    pub description: String,
    /// Search algorithm, e.g. `"A*"` or `"BDBFS"`.
    pub search: String,
    pub heuristic: String,
    /// Move definition directories to load.
    pub move_paths: Vec<String>,
}

impl Default for PathfinderSettings {
    fn default() -> Self {
        Self {
            name: "WebPathfinder-Out".to_string(),
            description: "Output produced by a valid Pathfinder run.".to_string(),
            search: "A*".to_string(),
            heuristic: "MRSH-1".to_string(),
            move_paths: vec!["Moves/PivotCube".to_string()],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorProperty {
    pub color: [u8; 3],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleProperties {
    pub color_property: ColorProperty,
}

/// One module of a pathfinder configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationModule {
    /// Two coordinates for planar cube configurations, three otherwise.
    pub position: Vec<i32>,
    #[serde(rename = "static")]
    pub is_static: bool,
    pub properties: ModuleProperties,
}

/// A lattice configuration document as the pathfinder reads it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathfinderConfiguration {
    pub exists: bool,
    pub name: String,
    pub description: String,
    pub module_type: ModuleShape,
    /// Lattice dimensionality: 2 or 3.
    pub order: u8,
    pub axis_size: i32,
    pub adjacency_mode: String,
    pub tensor_padding: i32,
    pub modules: Vec<ConfigurationModule>,
    pub boundaries: Vec<Vec<i32>>,
}

impl PathfinderConfiguration {
    /// Describes the modules currently in `registry`.
    ///
    /// Cube configurations confined to one z layer are emitted as 2D. The axis
    /// size is the largest extent plus one cell of padding on each side.
    pub fn from_registry(
        registry: &ModuleRegistry,
        shape: ModuleShape,
        settings: &PathfinderSettings,
    ) -> Self {
        let bounds = registry.bounds().unwrap_or_default();
        let planar = shape == ModuleShape::Cube && bounds.is_flat();

        let mut modules: Vec<_> = registry.modules().collect();
        modules.sort_by_key(|m| m.id);
        let modules = modules
            .into_iter()
            .map(|m| ConfigurationModule {
                position: if planar {
                    vec![m.position.x, m.position.y]
                } else {
                    m.position.to_array().to_vec()
                },
                is_static: m.is_static,
                properties: ModuleProperties {
                    color_property: ColorProperty { color: m.color },
                },
            })
            .collect();

        Self {
            exists: true,
            name: settings.name.clone(),
            description: settings.description.clone(),
            module_type: shape,
            order: if planar { 2 } else { 3 },
            axis_size: bounds.radius() + 2,
            adjacency_mode: match shape {
                ModuleShape::Cube => "Cube Face",
                _ => "Cube Edge",
            }
            .to_string(),
            tensor_padding: TENSOR_PADDING,
            modules,
            boundaries: Vec::new(),
        }
    }
}

/// An external pathfinder run, typically a worker process or a foreign module.
///
/// Inputs are the JSON encodings of [`PathfinderConfiguration`] and
/// [`PathfinderSettings`]; every output is a scenario string.
pub trait Pathfinder {
    fn find_path(
        &mut self,
        initial: &str,
        target: &str,
        settings: &str,
    ) -> Result<String, PathfinderError>;

    /// Converts a single configuration into a scenario with no move sets.
    fn config_to_scenario(&mut self, config: &str) -> Result<String, PathfinderError>;
}

/// Runs `pathfinder` between two configurations and loads the resulting scenario.
pub fn plan(
    pathfinder: &mut impl Pathfinder,
    initial: &PathfinderConfiguration,
    target: &PathfinderConfiguration,
    settings: &PathfinderSettings,
) -> Result<Scenario, PathfinderError> {
    let initial = serde_json::to_string(initial)?;
    let target = serde_json::to_string(target)?;
    let settings = serde_json::to_string(settings)?;

    log::info!("running pathfinder");
    let scenario = pathfinder.find_path(&initial, &target, &settings)?;
    Ok(Scenario::parse(&scenario)?)
}

/// Loads one saved configuration through the pathfinder's converter.
pub fn load_configuration(
    pathfinder: &mut impl Pathfinder,
    config: &PathfinderConfiguration,
) -> Result<Scenario, PathfinderError> {
    let config = serde_json::to_string(config)?;

    log::info!("converting configuration to scenario");
    let scenario = pathfinder.config_to_scenario(&config)?;
    Ok(Scenario::parse(&scenario)?)
}
