//! Header text measurement.
//!
//! The layout engine needs the extent of page header strings but never
//! rasterizes them. Measurement is an injected collaborator so the core
//! stays independent of whatever text stack the embedding window uses.

use serde::{Deserialize, Serialize};

/// Font description for header text, interpreted by the measurer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
    pub weight: FontWeight,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Regular,
    Bold,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "DejaVu Serif".to_string(),
            size: 28.0,
            weight: FontWeight::Regular,
        }
    }
}

/// Measured extent of a single header string.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
}

/// Text measurement collaborator.
///
/// `max_width` is the wrapping limit in canvas units; implementations
/// return the occupied box and may ignore everything about the font they
/// do not understand.
pub trait TextMeasure {
    fn measure(&self, font: &FontSpec, text: &str, max_width: f64) -> TextMetrics;
}

/// Deterministic measurer for the stub model and tests.
///
/// Assumes an average advance of half the font size per character and a
/// 1.2 line height, wrapping at `max_width`.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasure;

impl TextMeasure for HeuristicTextMeasure {
    fn measure(&self, font: &FontSpec, text: &str, max_width: f64) -> TextMetrics {
        if text.is_empty() || max_width <= 0.0 {
            return TextMetrics::default();
        }
        let advance = font.size * 0.5;
        let line_height = font.size * 1.2;
        let natural = advance * text.chars().count() as f64;
        if natural <= max_width {
            TextMetrics {
                width: natural,
                height: line_height,
            }
        } else {
            TextMetrics {
                width: max_width,
                height: line_height * (natural / max_width).ceil(),
            }
        }
    }
}
