//! Visual encoding of bias scores.
//!
//! Everything here is pure and total: scores outside [-100, 100] are clamped,
//! NaN is read as zero and unknown labels fall back to Neutral.

use super::entities::BiasLabel;

pub const SCORE_LIMIT: f64 = 100.0;
pub const STRONG_THRESHOLD: f64 = 60.0;
pub const MODERATE_THRESHOLD: f64 = 40.0;
pub const WEAK_THRESHOLD: f64 = 20.0;

/// Magnitude band of a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScoreTier {
    Neutral,
    Weak,
    Moderate,
    Strong,
}

impl ScoreTier {
    pub fn from_magnitude(magnitude: f64) -> Self {
        if magnitude >= STRONG_THRESHOLD {
            ScoreTier::Strong
        } else if magnitude >= MODERATE_THRESHOLD {
            ScoreTier::Moderate
        } else if magnitude >= WEAK_THRESHOLD {
            ScoreTier::Weak
        } else {
            ScoreTier::Neutral
        }
    }
}

/// Display category of a score: tier plus direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualCategory {
    Bullish(ScoreTier),
    Bearish(ScoreTier),
    Neutral,
}

impl VisualCategory {
    pub fn tier(&self) -> ScoreTier {
        match self {
            VisualCategory::Bullish(tier) | VisualCategory::Bearish(tier) => *tier,
            VisualCategory::Neutral => ScoreTier::Neutral,
        }
    }

    pub fn label(&self) -> BiasLabel {
        match self {
            VisualCategory::Bullish(_) => BiasLabel::Bullish,
            VisualCategory::Bearish(_) => BiasLabel::Bearish,
            VisualCategory::Neutral => BiasLabel::Neutral,
        }
    }

    /// Background class of the score badge
    pub fn color_class(&self) -> &'static str {
        match self {
            VisualCategory::Bullish(ScoreTier::Strong) => "bg-green-600",
            VisualCategory::Bullish(ScoreTier::Moderate) => "bg-green-500",
            VisualCategory::Bullish(_) => "bg-green-400",
            VisualCategory::Bearish(ScoreTier::Strong) => "bg-red-600",
            VisualCategory::Bearish(ScoreTier::Moderate) => "bg-red-500",
            VisualCategory::Bearish(_) => "bg-red-400",
            VisualCategory::Neutral => "bg-gray-600",
        }
    }

    pub fn icon(&self) -> BiasIcon {
        map_bias_label(self.label()).icon
    }
}

/// Clamp into the score domain, NaN reads as zero
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(-SCORE_LIMIT, SCORE_LIMIT)
    }
}

pub fn map_score(score: f64) -> VisualCategory {
    let score = clamp_score(score);
    match ScoreTier::from_magnitude(score.abs()) {
        ScoreTier::Neutral => VisualCategory::Neutral,
        tier if score > 0.0 => VisualCategory::Bullish(tier),
        tier => VisualCategory::Bearish(tier),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BiasIcon {
    TrendingUp,
    TrendingDown,
    Flat,
}

impl BiasIcon {
    /// Text glyph used where no icon font is loaded
    pub fn glyph(&self) -> &'static str {
        match self {
            BiasIcon::TrendingUp => "▲",
            BiasIcon::TrendingDown => "▼",
            BiasIcon::Flat => "—",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiasVisual {
    pub icon: BiasIcon,
    pub color_class: &'static str,
}

pub fn map_bias_label(label: BiasLabel) -> BiasVisual {
    match label {
        BiasLabel::Bullish => BiasVisual { icon: BiasIcon::TrendingUp, color_class: "text-green-500" },
        BiasLabel::Bearish => BiasVisual { icon: BiasIcon::TrendingDown, color_class: "text-red-500" },
        BiasLabel::Neutral => BiasVisual { icon: BiasIcon::Flat, color_class: "text-gray-400" },
    }
}

/// Same lookup for a raw label string, never fails
pub fn map_bias_str(raw: &str) -> BiasVisual {
    map_bias_label(BiasLabel::from_str_lossy(raw))
}

/// Confidence bar width in percent, always within [0, 100]
pub fn confidence_width(confidence: f64) -> f64 {
    if confidence.is_nan() {
        return 0.0;
    }
    (confidence * 100.0).clamp(0.0, 100.0)
}

pub fn confidence_percent_label(confidence: f64) -> String {
    format!("{}%", confidence_width(confidence).round() as i64)
}

/// `+42`, `-17.5`, `0`
pub fn format_signed_score(score: f64) -> String {
    if score == 0.0 {
        "0".to_string()
    } else if score > 0.0 {
        format!("+{}", score)
    } else {
        format!("{}", score)
    }
}

/// Green/red text class for sign-only indicator fields
pub fn indicator_tone(positive: bool) -> &'static str {
    if positive { "text-green-400" } else { "text-red-400" }
}

/// Signed value with fixed decimals, e.g. `+0.25`
pub fn format_signed_fixed(value: f64, decimals: usize) -> String {
    if value > 0.0 {
        format!("+{:.*}", decimals, value)
    } else {
        format!("{:.*}", decimals, value)
    }
}
