// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structural cross-section descriptors
//!
//! Loose string tags from external data sources are resolved into closed
//! enums here, once, at the ingestion boundary. Everything downstream works
//! with typed variants only.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Cross-section shape family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionFamily {
    /// I / H / wide-flange
    I,
    /// Channel
    C,
    /// Hollow rectangular box
    Box,
    /// Angle
    L,
    /// Round (pipe, tube, rod)
    Round,
}

impl SectionFamily {
    /// Resolve a loose tag (case-insensitive, trimmed) into a family.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_uppercase().as_str() {
            "I" | "H" | "W" | "IPE" | "HEA" | "HEB" => Some(Self::I),
            "C" | "U" | "UPN" | "CHANNEL" => Some(Self::C),
            "BOX" | "RHS" | "SHS" | "B" => Some(Self::Box),
            "L" | "ANGLE" => Some(Self::L),
            "O" | "PIPE" | "TUBE" | "ROD" | "CHS" | "ROUND" => Some(Self::Round),
            _ => None,
        }
    }

    /// Strict variant of [`parse`](Self::parse) for callers that want the
    /// diagnostic instead of silent degradation.
    pub fn from_tag(tag: &str) -> Result<Self> {
        Self::parse(tag).ok_or_else(|| Error::UnknownSectionFamily(tag.to_string()))
    }

    fn as_tag(&self) -> &'static str {
        match self {
            Self::I => "I",
            Self::C => "C",
            Self::Box => "BOX",
            Self::L => "L",
            Self::Round => "O",
        }
    }
}

/// Deserialize an optional loose family tag; unknown tags degrade to `None`
/// (the entity will simply never synthesize a solid).
pub(crate) fn de_family<'de, D>(d: D) -> std::result::Result<Option<SectionFamily>, D::Error>
where
    D: Deserializer<'de>,
{
    let tag = Option::<String>::deserialize(d)?;
    Ok(tag.as_deref().and_then(SectionFamily::parse))
}

pub(crate) fn ser_family<S>(
    family: &Option<SectionFamily>,
    s: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match family {
        Some(f) => s.serialize_some(f.as_tag()),
        None => s.serialize_none(),
    }
}

/// Placement rule for combined (doubled) sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombinedRule {
    /// "B/B Depth" - backs together, gap across the width axis
    BackToBackDepth,
    /// "B/B Width" - backs together, gap across the depth axis
    BackToBackWidth,
    /// "F/F Depth" - faces together, gap across the width axis
    FaceToFaceDepth,
    /// "Star" - second half rotated 180 degrees, diagonal gap
    Star,
}

impl CombinedRule {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_uppercase().as_str() {
            "B/B DEPTH" => Some(Self::BackToBackDepth),
            "B/B WIDTH" => Some(Self::BackToBackWidth),
            "F/F DEPTH" => Some(Self::FaceToFaceDepth),
            "STAR" => Some(Self::Star),
            _ => None,
        }
    }

    pub fn from_tag(tag: &str) -> Result<Self> {
        Self::parse(tag).ok_or_else(|| Error::UnknownCombinedRule(tag.to_string()))
    }

    fn as_tag(&self) -> &'static str {
        match self {
            Self::BackToBackDepth => "B/B Depth",
            Self::BackToBackWidth => "B/B Width",
            Self::FaceToFaceDepth => "F/F Depth",
            Self::Star => "Star",
        }
    }
}

fn de_rule<'de, D>(d: D) -> std::result::Result<Option<CombinedRule>, D::Error>
where
    D: Deserializer<'de>,
{
    let tag = Option::<String>::deserialize(d)?;
    Ok(tag.as_deref().and_then(CombinedRule::parse))
}

fn ser_rule<S>(rule: &Option<CombinedRule>, s: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match rule {
        Some(r) => s.serialize_some(r.as_tag()),
        None => s.serialize_none(),
    }
}

/// A single cover plate fused onto a flange (rolled sections)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct Plate {
    /// Plate width (mm)
    #[serde(default)]
    pub width: f64,
    /// Plate thickness (mm)
    #[serde(default)]
    pub thickness: f64,
}

/// Optional top/bottom cover plates of a rolled section
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct CoverPlates {
    #[serde(default)]
    pub top: Option<Plate>,
    #[serde(default)]
    pub bottom: Option<Plate>,
}

/// Combined-section descriptor: two copies of the base shape placed per rule
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct Combined {
    #[serde(default, deserialize_with = "de_rule", serialize_with = "ser_rule")]
    pub rule: Option<CombinedRule>,
    /// Gap between the two halves (mm)
    #[serde(default)]
    pub gap: f64,
}

/// Parametric structural cross-section. All dimensions in millimeters;
/// missing fields default to 0 (a zero-dimension solid never clashes).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SectionProfile {
    #[serde(
        default,
        deserialize_with = "de_family",
        serialize_with = "ser_family"
    )]
    pub family: Option<SectionFamily>,
    /// Overall depth (mm). Outer diameter for round sections.
    #[serde(default)]
    pub depth: f64,
    /// Overall width (mm)
    #[serde(default)]
    pub width: f64,
    /// Flange thickness (mm)
    #[serde(default)]
    pub flange_thickness: f64,
    /// Web thickness (mm). Wall thickness for round sections.
    #[serde(default)]
    pub web_thickness: f64,
    /// Rolled variant: cover plates fused onto the flanges
    #[serde(default)]
    pub cover_plates: Option<CoverPlates>,
    /// Combined variant: doubled shape placed per rule
    #[serde(default)]
    pub combined: Option<Combined>,
}

impl SectionProfile {
    /// Plain section of a family with the four primary dimensions.
    pub fn new(family: SectionFamily, depth: f64, width: f64, tf: f64, tw: f64) -> Self {
        Self {
            family: Some(family),
            depth: depth.max(0.0),
            width: width.max(0.0),
            flange_thickness: tf.max(0.0),
            web_thickness: tw.max(0.0),
            cover_plates: None,
            combined: None,
        }
    }

    /// Clamp any negative dimensions to zero (ingestion sanitizer).
    pub fn sanitize(&mut self) {
        self.depth = self.depth.max(0.0);
        self.width = self.width.max(0.0);
        self.flange_thickness = self.flange_thickness.max(0.0);
        self.web_thickness = self.web_thickness.max(0.0);
    }
}

/// Pipe cross-section (mm)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct PipeSection {
    #[serde(default)]
    pub outside_diameter: f64,
    #[serde(default)]
    pub wall_thickness: f64,
}

impl PipeSection {
    pub fn new(outside_diameter: f64, wall_thickness: f64) -> Self {
        Self {
            outside_diameter: outside_diameter.max(0.0),
            wall_thickness: wall_thickness.max(0.0),
        }
    }
}

/// One conical segment of a flare stack. Elevations in meters relative to
/// the stack base, diameters and thickness in meters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct FlareShell {
    #[serde(default)]
    pub top_elevation: f64,
    #[serde(default)]
    pub bottom_elevation: f64,
    #[serde(default)]
    pub top_internal_diameter: f64,
    #[serde(default)]
    pub bottom_internal_diameter: f64,
    #[serde(default)]
    pub thickness: f64,
}
