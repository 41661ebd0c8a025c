//! Road styling: stroke width and theme color per highway class.

use poster_common::{Color, Theme};

/// Stroke width in working-canvas pixels for a highway class.
///
/// The table is fixed; anything unlisted (service roads, paths, links)
/// draws at the 1.0 hairline width.
pub fn road_width(highway: &str) -> f32 {
    match highway {
        "motorway" => 5.0,
        "trunk" => 4.2,
        "primary" => 3.6,
        "secondary" => 3.0,
        "tertiary" => 2.4,
        "residential" => 1.4,
        "unclassified" => 1.2,
        _ => 1.0,
    }
}

/// Theme color for a highway class.
///
/// Link ramps share their parent class color and living streets draw like
/// residentials. Trunk has a width of its own but no color role of its
/// own, so it takes the default road color.
pub fn road_color(theme: &Theme, highway: &str) -> Color {
    match highway {
        "motorway" | "motorway_link" => theme.road_motorway,
        "primary" | "primary_link" => theme.road_primary,
        "secondary" | "secondary_link" => theme.road_secondary,
        "tertiary" | "tertiary_link" => theme.road_tertiary,
        "residential" | "living_street" => theme.road_residential,
        _ => theme.road_default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme() -> Theme {
        Theme {
            name: "test".to_string(),
            description: String::new(),
            bg: Color::rgba(0, 0, 0, 255),
            text: Color::rgba(255, 255, 255, 255),
            gradient_color: Color::rgba(0, 0, 0, 255),
            water: Color::rgba(10, 20, 30, 255),
            parks: Color::rgba(20, 40, 20, 255),
            road_motorway: Color::rgba(250, 250, 250, 255),
            road_primary: Color::rgba(220, 200, 60, 255),
            road_secondary: Color::rgba(180, 140, 200, 255),
            road_tertiary: Color::rgba(120, 200, 220, 255),
            road_residential: Color::rgba(200, 100, 40, 255),
            road_default: Color::rgba(130, 130, 130, 255),
        }
    }

    #[test]
    fn test_widths_decrease_with_class() {
        let ordered = [
            "motorway",
            "trunk",
            "primary",
            "secondary",
            "tertiary",
            "residential",
            "unclassified",
            "service",
        ];
        for pair in ordered.windows(2) {
            assert!(
                road_width(pair[0]) > road_width(pair[1]),
                "{} should be wider than {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_links_share_parent_color() {
        let t = theme();
        assert_eq!(road_color(&t, "motorway_link"), t.road_motorway);
        assert_eq!(road_color(&t, "primary_link"), t.road_primary);
        assert_eq!(road_color(&t, "secondary_link"), t.road_secondary);
        assert_eq!(road_color(&t, "tertiary_link"), t.road_tertiary);
        assert_eq!(road_color(&t, "living_street"), t.road_residential);
    }

    #[test]
    fn test_trunk_is_wide_but_default_colored() {
        let t = theme();
        assert_eq!(road_color(&t, "trunk"), t.road_default);
        assert!(road_width("trunk") > road_width("primary"));
    }

    #[test]
    fn test_unknown_class_gets_hairline_default() {
        let t = theme();
        assert_eq!(road_width("footway"), 1.0);
        assert_eq!(road_color(&t, "footway"), t.road_default);
    }
}
