/// Game constants gathered in one place.
///
/// There is deliberately no settings file: `GameConfig::default()` is the
/// game.  `from_env` exists so a run can be made reproducible while
/// debugging.

use std::time::Duration;

use glam::IVec2;

use crate::entities::{Rect, Viewport, ACTOR_SIZE};
use crate::error::{GameError, Result};

pub const SEED_VAR: &str = "KOKATON_SEED";
pub const CULLING_VAR: &str = "KOKATON_CULLING";

/// When a beam counts as gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectileCulling {
    /// Only leaving the field sideways removes a beam; beams fired up or
    /// down keep flying off-screen forever.
    HorizontalOnly,
    #[default]
    BothAxes,
}

impl ProjectileCulling {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectileCulling::HorizontalOnly => "horizontal",
            ProjectileCulling::BothAxes => "both",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "horizontal" | "x" => Some(ProjectileCulling::HorizontalOnly),
            "both" | "xy" => Some(ProjectileCulling::BothAxes),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub viewport: Viewport,
    /// Ticks per second.
    pub tick_rate: u32,
    pub hazard_count: usize,
    /// Frames an explosion stays on screen.
    pub effect_lifetime: u32,
    /// How long the hit sprite is shown before the session ends.
    pub death_pause: Duration,
    pub actor_start: IVec2,
    pub culling: ProjectileCulling,
    /// Fixed RNG seed; `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            viewport: Viewport {
                width: 1100,
                height: 650,
            },
            tick_rate: 50,
            hazard_count: 5,
            effect_lifetime: 50,
            death_pause: Duration::from_secs(1),
            actor_start: IVec2::new(300, 200),
            culling: ProjectileCulling::default(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Defaults with `KOKATON_SEED` / `KOKATON_CULLING` applied.
    pub fn from_env() -> Result<Self> {
        Self::with_overrides(|name| std::env::var(name).ok())
    }

    /// Defaults with overrides pulled from `lookup` (an environment-like
    /// key → value source).
    pub fn with_overrides(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = GameConfig::default();

        if let Some(value) = lookup(SEED_VAR) {
            let seed = value.trim().parse::<u64>().map_err(|_| GameError::InvalidEnv {
                name: SEED_VAR,
                value: value.clone(),
            })?;
            config.seed = Some(seed);
        }

        if let Some(value) = lookup(CULLING_VAR) {
            config.culling =
                ProjectileCulling::parse(&value).ok_or(GameError::InvalidEnv {
                    name: CULLING_VAR,
                    value,
                })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Wall-clock length of one tick.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate.max(1)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_rate == 0 {
            return Err(GameError::InvalidConfig("tick_rate must be positive".into()));
        }
        if self.viewport.width < ACTOR_SIZE.x || self.viewport.height < ACTOR_SIZE.y {
            return Err(GameError::InvalidConfig(format!(
                "viewport {}x{} cannot fit the kokaton ({}x{})",
                self.viewport.width, self.viewport.height, ACTOR_SIZE.x, ACTOR_SIZE.y
            )));
        }
        let start = Rect::from_center(self.actor_start, ACTOR_SIZE);
        if start.left() < 0
            || start.top() < 0
            || start.right() > self.viewport.width
            || start.bottom() > self.viewport.height
        {
            return Err(GameError::InvalidConfig(format!(
                "actor start ({}, {}) is not inside the viewport",
                self.actor_start.x, self.actor_start.y
            )));
        }
        Ok(())
    }
}
