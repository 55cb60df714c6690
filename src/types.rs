//! Shared types used across the rendering pipeline.
//!
//! [`MemberRecord`] is the input contract handed over by whatever parsed the
//! member spreadsheet. [`RenderedSide`] is the raster the compositor produces
//! and the document assembler consumes.

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw spreadsheet cell: either text as typed, or a number.
///
/// Date columns arrive as numbers when the spreadsheet stored them as date
/// serials, and tax IDs arrive as numbers when the column was numeric (which
/// drops leading zeros).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// True for blank text. Numbers are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// One member, as loaded from the member list.
///
/// Only `name` is required. Every other field degrades to a default or a
/// "not informed" placeholder at render time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MemberRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<CellValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<CellValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub congregation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baptism_date: Option<CellValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<CellValue>,
    /// Photo filename inside the photos directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_ref: Option<String>,
}

impl MemberRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Which face of the card a raster belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Front,
    Back,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Front => f.write_str("front"),
            Side::Back => f.write_str("back"),
        }
    }
}

/// One composed side of one card, at exactly the configured card size.
#[derive(Debug, Clone)]
pub struct RenderedSide {
    pub side: Side,
    pub image: RgbaImage,
}

impl RenderedSide {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
