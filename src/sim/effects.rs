//! Transient UI effects
//!
//! Pulses and banners are stored as start times and sampled each frame
//! against the simulation clock. Nothing outlives a session reset because
//! the table is part of the session state.

use std::collections::BTreeMap;

/// Effect identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EffectKind {
    /// Money counter swells on collection
    MoneyPulse,
    /// Kid counter swells and glows on collection
    KidPulse,
    /// Environment name banner
    EnvironmentBanner,
}

impl EffectKind {
    pub fn duration_ms(&self) -> f64 {
        match self {
            EffectKind::MoneyPulse => 100.0,
            EffectKind::KidPulse => 150.0,
            EffectKind::EnvironmentBanner => 2500.0,
        }
    }

    /// Peak HUD scale while the effect is active
    pub fn peak_scale(&self) -> f32 {
        match self {
            EffectKind::MoneyPulse => 1.2,
            EffectKind::KidPulse => 1.3,
            EffectKind::EnvironmentBanner => 1.0,
        }
    }
}

/// Effect name → start time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effects {
    started: BTreeMap<EffectKind, f64>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)start an effect
    pub fn start(&mut self, kind: EffectKind, now_ms: f64) {
        self.started.insert(kind, now_ms);
    }

    /// Progress in [0, 1) while active
    pub fn progress(&self, kind: EffectKind, now_ms: f64) -> Option<f32> {
        let start = *self.started.get(&kind)?;
        let t = (now_ms - start) / kind.duration_ms();
        (0.0..1.0).contains(&t).then_some(t as f32)
    }

    pub fn is_active(&self, kind: EffectKind, now_ms: f64) -> bool {
        self.progress(kind, now_ms).is_some()
    }

    /// HUD scale for a pulse effect (1.0 when idle)
    pub fn scale(&self, kind: EffectKind, now_ms: f64) -> f32 {
        if self.is_active(kind, now_ms) {
            kind.peak_scale()
        } else {
            1.0
        }
    }

    /// Opacity for a fade-out effect (0.0 when idle)
    pub fn fade(&self, kind: EffectKind, now_ms: f64) -> f32 {
        self.progress(kind, now_ms).map(|t| 1.0 - t).unwrap_or(0.0)
    }

    /// Drop finished effects
    pub fn expire(&mut self, now_ms: f64) {
        self.started
            .retain(|kind, start| now_ms - *start < kind.duration_ms());
    }

    pub fn clear(&mut self) {
        self.started.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.started.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_lifecycle() {
        let mut effects = Effects::new();
        assert_eq!(effects.scale(EffectKind::MoneyPulse, 0.0), 1.0);
        effects.start(EffectKind::MoneyPulse, 1000.0);
        assert_eq!(effects.scale(EffectKind::MoneyPulse, 1050.0), 1.2);
        assert_eq!(effects.scale(EffectKind::MoneyPulse, 1100.0), 1.0);

        effects.expire(1050.0);
        assert!(!effects.is_empty());
        effects.expire(1100.0);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_banner_fades_out() {
        let mut effects = Effects::new();
        effects.start(EffectKind::EnvironmentBanner, 0.0);
        assert_eq!(effects.fade(EffectKind::EnvironmentBanner, 0.0), 1.0);
        assert!((effects.fade(EffectKind::EnvironmentBanner, 1250.0) - 0.5).abs() < 1e-6);
        assert_eq!(effects.fade(EffectKind::EnvironmentBanner, 2500.0), 0.0);
    }

    #[test]
    fn test_restart_extends_effect() {
        let mut effects = Effects::new();
        effects.start(EffectKind::KidPulse, 0.0);
        effects.start(EffectKind::KidPulse, 140.0);
        assert!(effects.is_active(EffectKind::KidPulse, 200.0));
        effects.clear();
        assert!(!effects.is_active(EffectKind::KidPulse, 200.0));
    }
}
