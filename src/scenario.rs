//! Scenario loader.
//!
//! A scenario is plain text. The header block holds three lines: name,
//! description and module type. Blank lines then separate the body into
//! blocks:
//!
//! 1. visual groups: `id, r, g, b, scale%`
//! 2. modules: `id, group, x, y, z`
//! 3. move sets: `id, adc, dx, dy, dz` per move, one set per block.
//!
//! Spaces are ignored and `//` starts a comment. A line holding only a comment
//! is blank once stripped, so it also ends the current block. A move line
//! prefixed with `*` marks its set as a checkpoint; the first set always is one.

use crate::adc::AnchorDirectionCode;
use crate::error::ScenarioError;
use crate::lattice::{LatticeBounds, ModuleId, ModuleShape};
use crate::module::{LatticeModule, ModuleRegistry};
use crate::move_set::{MoveSet, MoveSetSequence};
use crate::moves::{Move, MoveKind};
use glam::IVec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Colour and scale shared by a group of modules.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Visgroup {
    pub color: [u8; 3],
    /// Render scale, from the percentage in the scenario.
    pub scale: f64,
}

/// A module declaration from the scenario's module block.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModuleSpec {
    pub id: ModuleId,
    pub visgroup: i32,
    pub position: IVec3,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct Scenario {
    pub name: String,
    pub description: String,
    pub shape: ModuleShape,
    pub visgroups: BTreeMap<i32, Visgroup>,
    pub modules: Vec<ModuleSpec>,
    pub move_sets: Vec<MoveSet>,
}

impl Scenario {
    pub fn parse(raw: &str) -> Result<Self, ScenarioError> {
        let raw = raw.replace('\r', "");
        let (header, body) = raw.split_once("\n\n").ok_or(ScenarioError::MissingHeader)?;

        let mut header_lines = header.lines();
        let name = header_lines.next().unwrap_or_default().to_string();
        let description = header_lines.next().unwrap_or_default().to_string();
        let shape = match header_lines.next().unwrap_or_default().parse::<ModuleShape>() {
            Ok(shape) => shape,
            Err(token) => {
                log::warn!("unknown module type '{token}', defaulting to CUBE");
                ModuleShape::Cube
            }
        };

        let mut scenario = Self {
            name,
            description,
            shape,
            ..Default::default()
        };

        // Line numbers are 1-based within the whole file.
        let first_body_line = header.lines().count() + 2;
        let mut block = 0;
        let mut checkpoint = true;
        let mut current = MoveSet::default();

        for (offset, raw_line) in body.split('\n').enumerate() {
            let line_no = first_body_line + offset;
            let line: String = raw_line
                .split("//")
                .next()
                .unwrap_or_default()
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();

            if line.is_empty() {
                block += 1;
                if !current.is_empty() {
                    scenario.move_sets.push(std::mem::take(&mut current));
                    checkpoint = false;
                }
                continue;
            }

            let line = match line.strip_prefix('*') {
                Some(rest) => {
                    checkpoint = true;
                    rest
                }
                None => line.as_str(),
            };
            let values = parse_fields(line, line_no)?;

            match block {
                // --- VISUAL GROUPS ---
                0 => {
                    let [id, r, g, b, scale] = expect_fields::<5>(&values, line_no)?;
                    scenario.visgroups.insert(
                        id,
                        Visgroup {
                            color: [
                                color_component(r, line_no)?,
                                color_component(g, line_no)?,
                                color_component(b, line_no)?,
                            ],
                            scale: f64::from(scale) / 100.0,
                        },
                    );
                }

                // --- MODULES ---
                1 => {
                    let [id, group, x, y, z] = expect_fields::<5>(&values, line_no)?;
                    let id = module_id(id, line_no)?;
                    if !scenario.visgroups.contains_key(&group) {
                        return Err(ScenarioError::UnknownVisgroup {
                            line: line_no,
                            module: id,
                            group,
                        });
                    }
                    scenario.modules.push(ModuleSpec {
                        id,
                        visgroup: group,
                        position: IVec3::new(x, y, z),
                    });
                }

                // --- MOVES ---
                _ => {
                    let [id, adc, dx, dy, dz] = expect_fields::<5>(&values, line_no)?;
                    let id = module_id(id, line_no)?;
                    if !scenario.modules.iter().any(|m| m.id == id) {
                        return Err(ScenarioError::UnknownModule {
                            line: line_no,
                            module: id,
                        });
                    }
                    let adc = AnchorDirectionCode(adc);
                    current.push(Move::new(
                        id,
                        adc,
                        IVec3::new(dx, dy, dz),
                        MoveKind::from_adc(adc),
                        scenario.shape,
                    ));
                    current.checkpoint |= checkpoint;
                }
            }
        }
        if !current.is_empty() {
            scenario.move_sets.push(current);
        }

        log::debug!(
            "loaded scenario '{}': {} modules, {} move sets",
            scenario.name,
            scenario.modules.len(),
            scenario.move_sets.len()
        );
        Ok(scenario)
    }

    /// Builds the module registry for the scenario's initial configuration.
    pub fn registry(&self) -> ModuleRegistry {
        let mut registry = ModuleRegistry::new();
        for decl in &self.modules {
            let mut module = LatticeModule::new(decl.id, self.shape, decl.position);
            if let Some(group) = self.visgroups.get(&decl.visgroup) {
                module = module.with_appearance(group.color, group.scale);
            }
            registry.insert(module);
        }
        registry
    }

    pub fn sequence(&self) -> MoveSetSequence {
        MoveSetSequence::new(self.move_sets.clone())
    }

    /// Consumes the scenario into its playback sequence.
    pub fn into_sequence(self) -> MoveSetSequence {
        MoveSetSequence::new(self.move_sets)
    }

    pub fn bounds(&self) -> Option<LatticeBounds> {
        LatticeBounds::from_cells(self.modules.iter().map(|m| m.position))
    }
}

impl FromStr for Scenario {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_fields(line: &str, line_no: usize) -> Result<Vec<i32>, ScenarioError> {
    line.split(',')
        .map(|value| {
            value.parse::<i32>().map_err(|_| ScenarioError::InvalidInteger {
                line: line_no,
                value: value.to_string(),
            })
        })
        .collect()
}

fn expect_fields<const N: usize>(values: &[i32], line_no: usize) -> Result<[i32; N], ScenarioError> {
    values.try_into().map_err(|_| ScenarioError::FieldCount {
        line: line_no,
        expected: N,
        found: values.len(),
    })
}

fn color_component(value: i32, line_no: usize) -> Result<u8, ScenarioError> {
    u8::try_from(value).map_err(|_| ScenarioError::InvalidColor {
        line: line_no,
        value,
    })
}

fn module_id(value: i32, line_no: usize) -> Result<ModuleId, ScenarioError> {
    ModuleId::try_from(value).map_err(|_| ScenarioError::NegativeModuleId {
        line: line_no,
        value,
    })
}
