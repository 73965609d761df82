// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Process-equipment descriptors
//!
//! Equipment arrives from the process diagram with a loose type tag, a
//! placement and either a uniform scale or explicit parameters. The tag is
//! resolved to a closed [`EquipmentKind`] at the boundary; unknown tags
//! degrade to `None` and the element never synthesizes a solid.

use crate::error::{Error, Result};
use nalgebra::Point3;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Closed set of process-equipment types with a shape builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EquipmentKind {
    Tank,
    Drum,
    HorizontalDrum,
    Tower,
    Reactor,
    Silo,
    StorageSphere,
    ShellTubeExchanger,
    PlateExchanger,
    AirCooler,
    Condenser,
    Reboiler,
    Furnace,
    Boiler,
    Pump,
    Compressor,
    Blower,
    Fan,
    Turbine,
    Mixer,
    GateValve,
    GlobeValve,
    ControlValve,
    CheckValve,
    SafetyValve,
    Strainer,
    Filter,
    Ejector,
    Skid,
    PackageUnit,
    ControlPanel,
    Instrument,
}

impl EquipmentKind {
    /// Resolve a loose tag (case-insensitive, trimmed, `-`/`_`/space folded)
    /// into a kind.
    pub fn parse(tag: &str) -> Option<Self> {
        let folded: String = tag
            .trim()
            .chars()
            .map(|c| match c {
                '-' | '_' | ' ' => '.',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        match folded.as_str() {
            "tank" | "storage.tank" => Some(Self::Tank),
            "drum" | "vessel" => Some(Self::Drum),
            "horizontal.drum" | "horizontal.vessel" => Some(Self::HorizontalDrum),
            "tower" | "column" | "distillation.column" => Some(Self::Tower),
            "reactor" => Some(Self::Reactor),
            "silo" | "hopper" => Some(Self::Silo),
            "sphere" | "storage.sphere" => Some(Self::StorageSphere),
            "heat.exchanger" | "shell.tube" | "exchanger" => Some(Self::ShellTubeExchanger),
            "plate.exchanger" => Some(Self::PlateExchanger),
            "air.cooler" | "fin.fan" => Some(Self::AirCooler),
            "condenser" => Some(Self::Condenser),
            "reboiler" => Some(Self::Reboiler),
            "furnace" | "heater" | "fired.heater" => Some(Self::Furnace),
            "boiler" => Some(Self::Boiler),
            "pump" => Some(Self::Pump),
            "compressor" => Some(Self::Compressor),
            "blower" => Some(Self::Blower),
            "fan" => Some(Self::Fan),
            "turbine" => Some(Self::Turbine),
            "mixer" | "agitator" => Some(Self::Mixer),
            "gate.valve" | "valve" => Some(Self::GateValve),
            "globe.valve" => Some(Self::GlobeValve),
            "control.valve" => Some(Self::ControlValve),
            "check.valve" => Some(Self::CheckValve),
            "safety.valve" | "relief.valve" | "psv" => Some(Self::SafetyValve),
            "strainer" => Some(Self::Strainer),
            "filter" => Some(Self::Filter),
            "ejector" | "eductor" => Some(Self::Ejector),
            "skid" => Some(Self::Skid),
            "package.unit" | "package" => Some(Self::PackageUnit),
            "control.panel" | "panel" => Some(Self::ControlPanel),
            "instrument" => Some(Self::Instrument),
            _ => None,
        }
    }

    pub fn from_tag(tag: &str) -> Result<Self> {
        Self::parse(tag).ok_or_else(|| Error::UnknownEquipmentKind(tag.to_string()))
    }

    fn as_tag(&self) -> &'static str {
        match self {
            Self::Tank => "tank",
            Self::Drum => "drum",
            Self::HorizontalDrum => "horizontal drum",
            Self::Tower => "tower",
            Self::Reactor => "reactor",
            Self::Silo => "silo",
            Self::StorageSphere => "sphere",
            Self::ShellTubeExchanger => "heat exchanger",
            Self::PlateExchanger => "plate exchanger",
            Self::AirCooler => "air cooler",
            Self::Condenser => "condenser",
            Self::Reboiler => "reboiler",
            Self::Furnace => "furnace",
            Self::Boiler => "boiler",
            Self::Pump => "pump",
            Self::Compressor => "compressor",
            Self::Blower => "blower",
            Self::Fan => "fan",
            Self::Turbine => "turbine",
            Self::Mixer => "mixer",
            Self::GateValve => "gate valve",
            Self::GlobeValve => "globe valve",
            Self::ControlValve => "control valve",
            Self::CheckValve => "check valve",
            Self::SafetyValve => "safety valve",
            Self::Strainer => "strainer",
            Self::Filter => "filter",
            Self::Ejector => "ejector",
            Self::Skid => "skid",
            Self::PackageUnit => "package unit",
            Self::ControlPanel => "control panel",
            Self::Instrument => "instrument",
        }
    }
}

fn de_kind<'de, D>(d: D) -> std::result::Result<Option<EquipmentKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let tag = Option::<String>::deserialize(d)?;
    Ok(tag.as_deref().and_then(EquipmentKind::parse))
}

fn ser_kind<S>(kind: &Option<EquipmentKind>, s: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match kind {
        Some(k) => s.serialize_some(k.as_tag()),
        None => s.serialize_none(),
    }
}

/// Explicit sizing parameters (meters). Any field left `None` falls back to
/// the uniform `scale`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct EquipmentParams {
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub diameter: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
}

fn default_scale() -> f64 {
    1.0
}

/// One element of the process diagram.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentSpec {
    #[serde(default, deserialize_with = "de_kind", serialize_with = "ser_kind")]
    pub kind: Option<EquipmentKind>,
    /// Placement position in the project-global frame (meters)
    #[serde(default = "crate::model::origin")]
    pub position: Point3<f64>,
    /// Rotation about the global X/Y/Z axes (degrees)
    #[serde(default)]
    pub rotation_deg: [f64; 3],
    /// Uniform scale applied to the builder's nominal dimensions
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Explicit sizing overriding the uniform scale
    #[serde(default)]
    pub parameters: Option<EquipmentParams>,
}

impl EquipmentSpec {
    pub fn new(kind: EquipmentKind, position: Point3<f64>) -> Self {
        Self {
            kind: Some(kind),
            position,
            rotation_deg: [0.0; 3],
            scale: 1.0,
            parameters: None,
        }
    }
}
