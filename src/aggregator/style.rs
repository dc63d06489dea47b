//! Visual encoding for graph nodes and edges.
//!
//! Node size follows call frequency on a log scale, node color gets darker
//! the longer the function runs relative to others of its direction, and
//! edges thicken and darken with call frequency.

use super::duration::positive_bounds;
use crate::parser::Direction;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An HSL color, rendered in CSS notation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Hsl {
    pub fn darker(self, amount: f64) -> Self {
        Self {
            lightness: self.lightness - amount,
            ..self
        }
    }

    pub fn with_alpha(self, alpha: f64) -> String {
        format!(
            "hsla({}, {}%, {}%, {})",
            self.hue, self.saturation, self.lightness, alpha
        )
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.hue, self.saturation, self.lightness)
    }
}

/// Base hue and saturation of a direction
pub fn base_color(direction: Direction) -> (f64, f64) {
    match direction {
        Direction::Receive => (210.0, 70.0),
        Direction::Send => (35.0, 85.0),
    }
}

fn direction_color(direction: Direction, lightness: f64) -> Hsl {
    let (hue, saturation) = base_color(direction);
    Hsl {
        hue,
        saturation,
        lightness,
    }
}

/// Linear position of `value` in `[min, max]`, 0.5 when the span is empty
fn ratio(value: f64, min: f64, max: f64) -> f64 {
    if max > min {
        (value - min) / (max - min)
    } else {
        0.5
    }
}

/// Average-duration span used to color the nodes of one direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorScale {
    pub min_duration: f64,
    pub max_duration: f64,
}

impl Default for ColorScale {
    fn default() -> Self {
        Self {
            min_duration: 0.0,
            max_duration: 0.001,
        }
    }
}

impl ColorScale {
    pub fn from_averages<I>(averages: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        match positive_bounds(averages) {
            Some((min_duration, max_duration)) => Self {
                min_duration,
                max_duration,
            },
            None => Self::default(),
        }
    }

    pub fn ratio(&self, avg_duration: f64) -> f64 {
        ratio(avg_duration, self.min_duration, self.max_duration)
    }
}

/// Edge weight span over the edges that survived filtering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightScale {
    pub min_weight: u64,
    pub max_weight: u64,
}

impl Default for WeightScale {
    fn default() -> Self {
        Self {
            min_weight: 1,
            max_weight: 1,
        }
    }
}

impl WeightScale {
    pub fn from_weights<I>(weights: I) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        weights
            .into_iter()
            .fold(None, |scale: Option<Self>, weight| {
                Some(match scale {
                    None => Self {
                        min_weight: weight,
                        max_weight: weight,
                    },
                    Some(s) => Self {
                        min_weight: s.min_weight.min(weight),
                        max_weight: s.max_weight.max(weight),
                    },
                })
            })
            .unwrap_or_default()
    }

    pub fn ratio(&self, weight: u64) -> f64 {
        ratio(weight as f64, self.min_weight as f64, self.max_weight as f64)
    }
}

/// Rendering hints for one graph node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStyle {
    pub width: f64,
    pub height: f64,
    pub color: String,
    pub border_color: String,
    pub shadow_color: String,
}

/// Style a node from its label, call count and average duration
pub fn node_style(
    label: &str,
    call_count: u64,
    avg_duration: f64,
    direction: Direction,
    scale: &ColorScale,
) -> NodeStyle {
    let size_multiplier = ((call_count as f64 + 1.0).ln() * 15.0).min(80.0);
    let label_width = label.chars().count() as f64 * 8.0 + 20.0;

    let lightness = 75.0 - scale.ratio(avg_duration) * 40.0;
    let color = direction_color(direction, lightness);

    NodeStyle {
        width: (60.0 + size_multiplier).max(label_width),
        height: 35.0 + (size_multiplier / 4.0).min(15.0),
        color: color.to_string(),
        border_color: color.darker(15.0).to_string(),
        shadow_color: color.with_alpha(0.4),
    }
}

/// Rendering hints for one graph edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeStyle {
    pub width: f64,
    pub emphasis_width: f64,
    pub color: String,
    pub emphasis_color: String,
    pub show_label: bool,
}

/// Style an edge from its weight; colored in the caller's direction
pub fn edge_style(weight: u64, caller: Direction, scale: &WeightScale) -> EdgeStyle {
    let log_weight = (weight as f64 + 1.0).ln();
    let lightness = 65.0 - scale.ratio(weight) * 25.0;
    let color = direction_color(caller, lightness);

    EdgeStyle {
        width: (1.0 + log_weight * 1.5).min(6.0),
        emphasis_width: (2.0 + log_weight * 2.0).min(8.0),
        color: color.to_string(),
        emphasis_color: color.darker(15.0).to_string(),
        show_label: weight > 1,
    }
}
