//! Quality resolution for lossy and lossless encoders

use serde::{Deserialize, Serialize};

/// Named quality tiers accepted from clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    #[default]
    High,
    Medium,
    Low,
}

impl QualityPreset {
    /// Parse a preset name. Unknown names yield `None` so callers fall back to the default.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "high" => Some(QualityPreset::High),
            "medium" => Some(QualityPreset::Medium),
            "low" => Some(QualityPreset::Low),
            _ => None,
        }
    }

    pub fn quality(self) -> u8 {
        match self {
            QualityPreset::High => 90,
            QualityPreset::Medium => 80,
            QualityPreset::Low => 65,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QualityPreset::High => "high",
            QualityPreset::Medium => "medium",
            QualityPreset::Low => "low",
        }
    }
}

/// Resolve the effective encoder quality in 1..=100.
///
/// An explicit finite quality wins and is rounded then clamped. Otherwise the
/// preset decides, defaulting to `high`.
pub fn resolve_quality(preset: Option<QualityPreset>, quality: Option<f64>) -> u8 {
    match quality.filter(|q| q.is_finite()) {
        Some(q) => q.round().clamp(1.0, 100.0) as u8,
        None => preset.unwrap_or_default().quality(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_values() {
        assert_eq!(resolve_quality(Some(QualityPreset::High), None), 90);
        assert_eq!(resolve_quality(Some(QualityPreset::Medium), None), 80);
        assert_eq!(resolve_quality(Some(QualityPreset::Low), None), 65);
    }

    #[test]
    fn test_missing_or_unknown_preset_defaults_to_high() {
        assert_eq!(resolve_quality(None, None), 90);
        assert_eq!(
            resolve_quality(QualityPreset::from_name("ultra"), None),
            90
        );
    }

    #[test]
    fn test_explicit_quality_is_clamped_and_rounded() {
        assert_eq!(resolve_quality(Some(QualityPreset::Low), Some(150.0)), 100);
        assert_eq!(resolve_quality(None, Some(0.0)), 1);
        assert_eq!(resolve_quality(None, Some(-20.0)), 1);
        assert_eq!(resolve_quality(None, Some(72.4)), 72);
        assert_eq!(resolve_quality(None, Some(72.5)), 73);
    }

    #[test]
    fn test_non_finite_quality_is_ignored() {
        assert_eq!(resolve_quality(Some(QualityPreset::Medium), Some(f64::NAN)), 80);
        assert_eq!(resolve_quality(None, Some(f64::INFINITY)), 90);
    }

    #[test]
    fn test_resolved_quality_always_in_range() {
        let inputs = [-1e9, -1.0, 0.4, 1.0, 50.5, 99.6, 100.0, 1e9];
        for q in inputs {
            let resolved = resolve_quality(None, Some(q));
            assert!((1..=100).contains(&resolved), "{} -> {}", q, resolved);
        }
    }

    #[test]
    fn test_from_name_is_case_insensitive() {
        assert_eq!(QualityPreset::from_name(" Medium "), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_name("LOW"), Some(QualityPreset::Low));
    }
}
