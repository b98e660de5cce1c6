use serde::{Deserialize, Serialize};

/// Color used for category labels outside the six standard AQI bands
pub const FALLBACK_COLOR: &str = "#9E9E9E";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    /// All categories in ascending severity
    pub const ALL: [AqiCategory; 6] = [
        AqiCategory::Good,
        AqiCategory::Moderate,
        AqiCategory::UnhealthyForSensitiveGroups,
        AqiCategory::Unhealthy,
        AqiCategory::VeryUnhealthy,
        AqiCategory::Hazardous,
    ];

    pub fn parse(label: &str) -> Option<Self> {
        match label.trim() {
            "Good" => Some(AqiCategory::Good),
            "Moderate" => Some(AqiCategory::Moderate),
            "Unhealthy for Sensitive Groups" => Some(AqiCategory::UnhealthyForSensitiveGroups),
            "Unhealthy" => Some(AqiCategory::Unhealthy),
            "Very Unhealthy" => Some(AqiCategory::VeryUnhealthy),
            "Hazardous" => Some(AqiCategory::Hazardous),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }

    pub const fn color(&self) -> &'static str {
        match self {
            AqiCategory::Good => "#00FF6A",
            AqiCategory::Moderate => "#FFE600",
            AqiCategory::UnhealthyForSensitiveGroups => "#FF9F1C",
            AqiCategory::Unhealthy => "#FF3B3B",
            AqiCategory::VeryUnhealthy => "#B5179E",
            AqiCategory::Hazardous => "#7A0000",
        }
    }
}

impl std::fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Look up the display color for a raw category label.
///
/// Unrecognized labels get [`FALLBACK_COLOR`] so rendering never fails on
/// unexpected data.
pub fn category_color(label: &str) -> &'static str {
    AqiCategory::parse(label)
        .map(|c| c.color())
        .unwrap_or(FALLBACK_COLOR)
}

/// The full label -> color mapping, in severity order
pub fn category_color_map() -> Vec<(&'static str, &'static str)> {
    AqiCategory::ALL
        .iter()
        .map(|c| (c.label(), c.color()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_hex_color(s: &str) -> bool {
        s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
    }

    #[test]
    fn test_all_known_categories_have_colors() {
        for category in AqiCategory::ALL {
            let color = category_color(category.label());
            assert!(is_hex_color(color), "bad color for {}", category);
            assert_ne!(color, FALLBACK_COLOR);
        }
    }

    #[test]
    fn test_known_color_values() {
        assert_eq!(category_color("Good"), "#00FF6A");
        assert_eq!(category_color("Hazardous"), "#7A0000");
        assert_eq!(category_color("Unhealthy for Sensitive Groups"), "#FF9F1C");
    }

    #[test]
    fn test_unknown_category_falls_back() {
        assert_eq!(category_color("Apocalyptic"), FALLBACK_COLOR);
        assert_eq!(category_color(""), FALLBACK_COLOR);
        assert!(is_hex_color(FALLBACK_COLOR));
    }

    #[test]
    fn test_parse_roundtrip_labels() {
        for category in AqiCategory::ALL {
            assert_eq!(AqiCategory::parse(category.label()), Some(category));
        }
        assert_eq!(AqiCategory::parse(" Moderate "), Some(AqiCategory::Moderate));
        assert_eq!(category_color_map().len(), 6);
    }
}
