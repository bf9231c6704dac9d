// Pull-to-refresh gesture recognizer, kept free of DOM types so it can be
// driven by recorded input in tests.
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Divides the raw finger travel so the pull feels resistive.
    pub damping: f64,
    pub max_pull: f64,
    /// Pull below this is treated as finger jitter: no scroll suppression.
    pub jitter_threshold: f64,
    /// Pull strictly above this at touch end commits a refresh.
    pub commit_threshold: f64,
    /// Minimum lifetime of the refreshing indicator.
    pub min_refresh_ms: u32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            damping: 2.0,
            max_pull: 100.0,
            jitter_threshold: 10.0,
            commit_threshold: 60.0,
            min_refresh_ms: 1000,
        }
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct GestureState {
    pub is_tracking: bool,
    pub start_y: f64,
    pub pull_distance: f64,
    pub is_refreshing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureInput {
    TouchStart { y: f64, scroll_top: f64 },
    TouchMove { y: f64, scroll_top: f64 },
    TouchEnd,
    /// Host aborted the touch (`touchcancel`); never commits.
    TouchCancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEffect {
    /// Host must cancel the native scroll/overscroll for this input frame.
    SuppressScroll,
    Refresh,
}

impl GestureState {
    pub fn step(self, input: GestureInput, cfg: &GestureConfig) -> (Self, Option<GestureEffect>) {
        match input {
            GestureInput::TouchStart { y, scroll_top } => {
                if self.is_refreshing || scroll_top != 0.0 || !y.is_finite() {
                    return (self, None);
                }
                let next = Self {
                    is_tracking: true,
                    start_y: y,
                    pull_distance: 0.0,
                    ..self
                };
                (next, None)
            }
            GestureInput::TouchMove { y, scroll_top } => {
                if !self.is_tracking || self.is_refreshing {
                    return (self, None);
                }
                let pull_distance = damped_pull(self.start_y, y, cfg);
                let next = Self { pull_distance, ..self };
                let effect = (pull_distance > cfg.jitter_threshold && scroll_top == 0.0)
                    .then_some(GestureEffect::SuppressScroll);
                (next, effect)
            }
            GestureInput::TouchEnd => {
                if !self.is_tracking {
                    return (self, None);
                }
                let effect = (self.pull_distance > cfg.commit_threshold).then_some(GestureEffect::Refresh);
                let next = Self {
                    is_tracking: false,
                    pull_distance: 0.0,
                    ..self
                };
                (next, effect)
            }
            GestureInput::TouchCancel => {
                if !self.is_tracking {
                    return (self, None);
                }
                let next = Self {
                    is_tracking: false,
                    pull_distance: 0.0,
                    ..self
                };
                (next, None)
            }
        }
    }

    /// Fraction of the maximum pull, for sizing the indicator.
    pub fn pull_progress(&self, cfg: &GestureConfig) -> f64 {
        if cfg.max_pull <= 0.0 {
            return 0.0;
        }
        (self.pull_distance / cfg.max_pull).clamp(0.0, 1.0)
    }
}

fn damped_pull(start_y: f64, current_y: f64, cfg: &GestureConfig) -> f64 {
    let damping = if cfg.damping > 0.0 { cfg.damping } else { 1.0 };
    let raw = (current_y - start_y) / damping;
    if !raw.is_finite() {
        // NaN or an infinite jump: only a downward infinity is a full pull
        return if raw == f64::INFINITY { cfg.max_pull.max(0.0) } else { 0.0 };
    }
    raw.max(0.0).min(cfg.max_pull.max(0.0))
}
