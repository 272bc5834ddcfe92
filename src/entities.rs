/// All game entity types.  Plain data plus a few geometric accessors; the
/// rules that move these around live in `compute`.

use glam::IVec2;

/// Pixels travelled per tick by anything that moves.
pub const STEP: i32 = 5;

/// Bounding box of the kokaton sprite.
pub const ACTOR_SIZE: IVec2 = IVec2::new(90, 80);
/// Bombs are drawn as a circle of this radius.
pub const HAZARD_RADIUS: i32 = 10;
/// Unrotated beam image (pointing right).
pub const BEAM_SIZE: IVec2 = IVec2::new(60, 14);
pub const EFFECT_SIZE: IVec2 = IVec2::new(60, 60);

/// Sprite variant shown after a bomb is shot down.
pub const SPRITE_HAPPY: u8 = 6;
/// Sprite variant shown when the kokaton is hit.
pub const SPRITE_HIT: u8 = 8;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Logical play-field size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

/// Axis-aligned rectangle; `pos` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub pos: IVec2,
    pub size: IVec2,
}

impl Rect {
    pub fn from_center(center: IVec2, size: IVec2) -> Self {
        Rect {
            pos: center - size / 2,
            size,
        }
    }

    pub fn left(&self) -> i32 {
        self.pos.x
    }

    pub fn right(&self) -> i32 {
        self.pos.x + self.size.x
    }

    pub fn top(&self) -> i32 {
        self.pos.y
    }

    pub fn bottom(&self) -> i32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> IVec2 {
        self.pos + self.size / 2
    }

    pub fn translate(&self, by: IVec2) -> Self {
        Rect {
            pos: self.pos + by,
            ..*self
        }
    }

    /// True when the two rectangles share at least one pixel.  Touching
    /// edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

// ── Direction table ───────────────────────────────────────────────────────────

/// The eight facings of the kokaton, counter-clockwise from "right".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Right,
    UpRight,
    Up,
    UpLeft,
    Left,
    DownLeft,
    Down,
    DownRight,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Right,
        Direction::UpRight,
        Direction::Up,
        Direction::UpLeft,
        Direction::Left,
        Direction::DownLeft,
        Direction::Down,
        Direction::DownRight,
    ];

    /// Position in `ALL`; sprite tables are indexed with this.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Per-tick velocity for this facing (screen coordinates, y grows down).
    pub fn vector(self) -> IVec2 {
        self.unit() * STEP
    }

    pub fn unit(self) -> IVec2 {
        match self {
            Direction::Right => IVec2::new(1, 0),
            Direction::UpRight => IVec2::new(1, -1),
            Direction::Up => IVec2::new(0, -1),
            Direction::UpLeft => IVec2::new(-1, -1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::DownLeft => IVec2::new(-1, 1),
            Direction::Down => IVec2::new(0, 1),
            Direction::DownRight => IVec2::new(1, 1),
        }
    }

    /// Reverse lookup.  Anything that is not exactly one of the eight
    /// table vectors (including zero) yields `None`.
    pub fn from_vector(v: IVec2) -> Option<Direction> {
        Direction::ALL.into_iter().find(|d| d.vector() == v)
    }

    /// Counter-clockwise angle from the +x axis, in degrees.
    pub fn angle_degrees(self) -> f32 {
        self.index() as f32 * 45.0
    }
}

// ── Entities ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sprite {
    /// Directional sprite looked up from the facing table.
    Facing(Direction),
    /// Alternate image by number (`SPRITE_HAPPY`, `SPRITE_HIT`, ...).
    Variant(u8),
}

/// The player-controlled kokaton.
#[derive(Clone, Debug, PartialEq)]
pub struct Actor {
    pub rect: Rect,
    pub direction: Direction,
    pub sprite: Sprite,
}

impl Actor {
    pub fn new(center: IVec2) -> Self {
        Actor {
            rect: Rect::from_center(center, ACTOR_SIZE),
            direction: Direction::Right,
            sprite: Sprite::Facing(Direction::Right),
        }
    }

    pub fn center(&self) -> IVec2 {
        self.rect.center()
    }
}

/// A beam fired by the kokaton.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub rect: Rect,
    pub velocity: IVec2,
    /// Facing at fire time; selects the rotated beam image.
    pub direction: Direction,
    pub alive: bool,
}

/// A bouncing bomb.
#[derive(Clone, Debug, PartialEq)]
pub struct Hazard {
    pub rect: Rect,
    pub velocity: IVec2,
    pub alive: bool,
}

/// Explosion left behind by a destroyed bomb.
#[derive(Clone, Debug, PartialEq)]
pub struct Effect {
    pub rect: Rect,
    /// Remaining frames to display.
    pub life: u32,
    /// Which of the two flicker images is showing (0 or 1).
    pub frame_index: usize,
}

impl Effect {
    pub fn is_expired(&self) -> bool {
        self.life == 0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScoreTracker {
    pub score: u32,
}

impl ScoreTracker {
    pub fn increment(&mut self) {
        self.score += 1;
    }

    /// Fresh text for the current score; rebuilt on every call.
    pub fn render(&self) -> String {
        format!("Score: {}", self.score)
    }
}

// ── Input snapshot ────────────────────────────────────────────────────────────

/// Movement keys held during this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Everything the loop learned from the input provider for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub held: HeldKeys,
    /// Fire key went down since the previous tick.
    pub fire: bool,
    pub quit: bool,
}

// ── Master game state ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    /// Kokaton was hit; the loop shows the hit sprite, pauses, then exits.
    Ending,
    Quit,
}

/// The entire game state, owned by the frame loop.  Cloneable so the update
/// functions can hand back a new copy.
#[derive(Clone, Debug)]
pub struct GameState {
    pub actor: Actor,
    pub projectiles: Vec<Projectile>,
    pub hazards: Vec<Hazard>,
    pub effects: Vec<Effect>,
    pub score: ScoreTracker,
    pub status: GameStatus,
    pub frame: u64,
    pub viewport: Viewport,
}
