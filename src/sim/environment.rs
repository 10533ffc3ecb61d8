//! Environment themes
//!
//! The city changes character at fixed distance breakpoints. Each theme
//! carries its own ambient and fog colour; the renderer picks them up when
//! a switch happens.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Environment {
    #[default]
    Downtown,
    Harbor,
    NeonStrip,
    Industrial,
    Capitol,
}

impl Environment {
    pub const ALL: [Environment; 5] = [
        Environment::Downtown,
        Environment::Harbor,
        Environment::NeonStrip,
        Environment::Industrial,
        Environment::Capitol,
    ];

    /// Distance at which this theme takes over
    pub fn start_distance(&self) -> f32 {
        match self {
            Environment::Downtown => 0.0,
            Environment::Harbor => 500.0,
            Environment::NeonStrip => 1000.0,
            Environment::Industrial => 1500.0,
            Environment::Capitol => 2000.0,
        }
    }

    /// Theme for a distance travelled
    pub fn for_distance(distance: f32) -> Self {
        Self::ALL
            .iter()
            .rev()
            .find(|env| distance >= env.start_distance())
            .copied()
            .unwrap_or_default()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Environment::Downtown => "Downtown",
            Environment::Harbor => "Harbor District",
            Environment::NeonStrip => "Neon Strip",
            Environment::Industrial => "Industrial Zone",
            Environment::Capitol => "Capitol Hill",
        }
    }

    /// Ambient light colour (0xRRGGBB)
    pub fn ambient_color(&self) -> u32 {
        match self {
            Environment::Downtown => 0x334466,
            Environment::Harbor => 0x2a4a5a,
            Environment::NeonStrip => 0x663366,
            Environment::Industrial => 0x4a4a33,
            Environment::Capitol => 0x553322,
        }
    }

    /// Fog and sky colour (0xRRGGBB)
    pub fn fog_color(&self) -> u32 {
        match self {
            Environment::Downtown => 0x0a0a1a,
            Environment::Harbor => 0x0a1a24,
            Environment::NeonStrip => 0x1a0a1a,
            Environment::Industrial => 0x1a1a0a,
            Environment::Capitol => 0x1f0f0a,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoints() {
        assert_eq!(Environment::for_distance(0.0), Environment::Downtown);
        assert_eq!(Environment::for_distance(499.9), Environment::Downtown);
        assert_eq!(Environment::for_distance(500.0), Environment::Harbor);
        assert_eq!(Environment::for_distance(1250.0), Environment::NeonStrip);
        assert_eq!(Environment::for_distance(1500.0), Environment::Industrial);
        assert_eq!(Environment::for_distance(99_999.0), Environment::Capitol);
        assert_eq!(Environment::for_distance(-5.0), Environment::Downtown);
    }

    #[test]
    fn test_themes_are_distinct() {
        let names: std::collections::HashSet<_> = Environment::ALL.iter().map(|e| e.name()).collect();
        let fogs: std::collections::HashSet<_> = Environment::ALL.iter().map(|e| e.fog_color()).collect();
        assert_eq!(names.len(), 5);
        assert_eq!(fogs.len(), 5);
    }
}
