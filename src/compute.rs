/// Pure game-logic functions.
///
/// Every public function takes immutable references and returns fresh
/// values; the frame loop swaps the result in.  Randomness only enters
/// through an injected `Rng`, so a seeded RNG gives a reproducible session.

use glam::IVec2;
use log::{debug, info, trace};
use rand::Rng;

use crate::config::{GameConfig, ProjectileCulling};
use crate::entities::{
    Actor, Direction, Effect, FrameInput, GameState, GameStatus, Hazard, HeldKeys, Projectile,
    Rect, ScoreTracker, Sprite, Viewport, BEAM_SIZE, EFFECT_SIZE, HAZARD_RADIUS, SPRITE_HAPPY,
    SPRITE_HIT, STEP,
};

/// Re-rolls allowed when a new bomb lands on the kokaton.
const MAX_SPAWN_ATTEMPTS: u32 = 32;

// ── Bounds ───────────────────────────────────────────────────────────────────

/// Whether `rect` lies fully inside the viewport, as
/// `(horizontally, vertically)`.
pub fn check_bound(rect: &Rect, viewport: Viewport) -> (bool, bool) {
    let horizontal = rect.left() >= 0 && rect.right() <= viewport.width;
    let vertical = rect.top() >= 0 && rect.bottom() <= viewport.height;
    (horizontal, vertical)
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the opening state: kokaton at its start point, a fresh set of
/// bombs, nothing else.
pub fn init_state(config: &GameConfig, rng: &mut impl Rng) -> GameState {
    let actor = Actor::new(config.actor_start);
    let hazards = (0..config.hazard_count)
        .map(|_| spawn_hazard(config.viewport, &actor.rect, &mut *rng))
        .collect();

    GameState {
        actor,
        projectiles: Vec::new(),
        hazards,
        effects: Vec::new(),
        score: ScoreTracker::default(),
        status: GameStatus::Running,
        frame: 0,
        viewport: config.viewport,
    }
}

/// A bomb at a random position fully inside the viewport, moving down-right.
/// Positions overlapping `avoid` are re-rolled a bounded number of times.
pub fn spawn_hazard(viewport: Viewport, avoid: &Rect, rng: &mut impl Rng) -> Hazard {
    let size = IVec2::splat(2 * HAZARD_RADIUS);
    let half = size / 2;

    let mut attempts = 0;
    let rect = loop {
        let center = IVec2::new(
            rng.gen_range(half.x..=viewport.width - half.x),
            rng.gen_range(half.y..=viewport.height - half.y),
        );
        let candidate = Rect::from_center(center, size);
        attempts += 1;
        if !candidate.intersects(avoid) || attempts >= MAX_SPAWN_ATTEMPTS {
            break candidate;
        }
    };

    debug!("hazard spawned at {:?}", rect.center());
    Hazard {
        rect,
        velocity: IVec2::new(STEP, STEP),
        alive: true,
    }
}

/// Explosion centred where `hazard` was.
pub fn spawn_effect(hazard: &Hazard, lifetime: u32) -> Effect {
    Effect {
        rect: Rect::from_center(hazard.rect.center(), EFFECT_SIZE),
        life: lifetime,
        frame_index: 0,
    }
}

// ── Kokaton ──────────────────────────────────────────────────────────────────

/// Sum of the per-key deltas for every held movement key.
pub fn key_delta(held: HeldKeys) -> IVec2 {
    let table = [
        (held.up, IVec2::new(0, -STEP)),
        (held.down, IVec2::new(0, STEP)),
        (held.left, IVec2::new(-STEP, 0)),
        (held.right, IVec2::new(STEP, 0)),
    ];
    table
        .iter()
        .filter(|(pressed, _)| *pressed)
        .fold(IVec2::ZERO, |acc, (_, delta)| acc + *delta)
}

/// Apply one frame of held movement keys.
///
/// The move is all-or-nothing: if the new rectangle would leave the
/// viewport on either axis the kokaton stays where it was.  The facing
/// follows the combined vector whenever that vector is in the direction
/// table, even if the move itself was refused.
pub fn move_actor(actor: &Actor, held: HeldKeys, viewport: Viewport) -> Actor {
    let delta = key_delta(held);
    let moved = actor.rect.translate(delta);
    let rect = if check_bound(&moved, viewport) == (true, true) {
        moved
    } else {
        actor.rect
    };

    match Direction::from_vector(delta) {
        Some(direction) => Actor {
            rect,
            direction,
            sprite: Sprite::Facing(direction),
        },
        None => Actor {
            rect,
            ..actor.clone()
        },
    }
}

/// Swap in an alternate image.  Position and facing are untouched.
pub fn set_actor_sprite(actor: &Actor, variant: u8) -> Actor {
    Actor {
        sprite: Sprite::Variant(variant),
        ..actor.clone()
    }
}

// ── Beams ────────────────────────────────────────────────────────────────────

/// Axis-aligned bounds of the beam image rotated to `direction`.
pub fn beam_bounds(direction: Direction) -> IVec2 {
    let (sin, cos) = direction.angle_degrees().to_radians().sin_cos();
    let (w, h) = (BEAM_SIZE.x as f32, BEAM_SIZE.y as f32);
    IVec2::new(
        (w * cos.abs() + h * sin.abs()).round() as i32,
        (w * sin.abs() + h * cos.abs()).round() as i32,
    )
}

/// Fire a beam along the kokaton's current facing.  It starts half a body
/// length out from the kokaton's centre.
pub fn fire_projectile(actor: &Actor) -> Projectile {
    let direction = actor.direction;
    let center = actor.center() + actor.rect.size / 2 * direction.unit();
    trace!("beam fired {:?} from {:?}", direction, center);
    Projectile {
        rect: Rect::from_center(center, beam_bounds(direction)),
        velocity: direction.vector(),
        direction,
        alive: true,
    }
}

pub fn update_projectile(projectile: &Projectile) -> Projectile {
    Projectile {
        rect: projectile.rect.translate(projectile.velocity),
        ..projectile.clone()
    }
}

/// Whether a live beam is still inside the play field under `culling`.
pub fn projectile_in_play(
    projectile: &Projectile,
    viewport: Viewport,
    culling: ProjectileCulling,
) -> bool {
    let (horizontal, vertical) = check_bound(&projectile.rect, viewport);
    projectile.alive
        && match culling {
            ProjectileCulling::HorizontalOnly => horizontal,
            ProjectileCulling::BothAxes => horizontal && vertical,
        }
}

// ── Bombs & explosions ───────────────────────────────────────────────────────

/// Bounce off whichever edges the bomb currently overruns, then move.
pub fn update_hazard(hazard: &Hazard, viewport: Viewport) -> Hazard {
    let (horizontal, vertical) = check_bound(&hazard.rect, viewport);
    let mut velocity = hazard.velocity;
    if !horizontal {
        velocity.x = -velocity.x;
    }
    if !vertical {
        velocity.y = -velocity.y;
    }
    Hazard {
        rect: hazard.rect.translate(velocity),
        velocity,
        ..hazard.clone()
    }
}

/// Count down one frame; flip the image every third frame.
pub fn update_effect(effect: &Effect) -> Effect {
    let life = effect.life.saturating_sub(1);
    let frame_index = if life % 3 == 0 {
        (effect.frame_index + 1) % 2
    } else {
        effect.frame_index
    };
    Effect {
        life,
        frame_index,
        ..effect.clone()
    }
}

// ── Per-frame passes ─────────────────────────────────────────────────────────

/// The single collision pass of a frame.
///
/// A bomb touching the kokaton ends the session before anything else is
/// scored.  Otherwise every live bomb is tested against the live beams; the
/// first beam that overlaps it takes it out.  Both are tagged dead, the score
/// goes up by one and an explosion is spawned.  A beam can only be spent
/// once, so each destroyed bomb scores exactly once.
pub fn resolve_collisions(state: &GameState, effect_lifetime: u32) -> GameState {
    let mut next = state.clone();

    if next
        .hazards
        .iter()
        .any(|h| h.alive && h.rect.intersects(&next.actor.rect))
    {
        info!("kokaton hit at frame {}, final score {}", next.frame, next.score.score);
        next.actor = set_actor_sprite(&next.actor, SPRITE_HIT);
        next.status = GameStatus::Ending;
        return next;
    }

    let mut any_hit = false;
    for hazard in next.hazards.iter_mut().filter(|h| h.alive) {
        let hit = next
            .projectiles
            .iter_mut()
            .find(|p| p.alive && p.rect.intersects(&hazard.rect));
        if let Some(projectile) = hit {
            projectile.alive = false;
            hazard.alive = false;
            next.score.increment();
            next.effects.push(spawn_effect(hazard, effect_lifetime));
            any_hit = true;
            info!("hazard destroyed at {:?}, score {}", hazard.rect.center(), next.score.score);
        }
    }

    if any_hit {
        next.actor = set_actor_sprite(&next.actor, SPRITE_HAPPY);
    }
    next
}

/// Drop dead bombs, spent or departed beams and finished explosions.
pub fn compact(state: &GameState, culling: ProjectileCulling) -> GameState {
    let viewport = state.viewport;
    GameState {
        hazards: state.hazards.iter().filter(|h| h.alive).cloned().collect(),
        projectiles: state
            .projectiles
            .iter()
            .filter(|p| projectile_in_play(p, viewport, culling))
            .cloned()
            .collect(),
        effects: state
            .effects
            .iter()
            .filter(|e| !e.is_expired())
            .cloned()
            .collect(),
        ..state.clone()
    }
}

/// Advance the simulation by one tick.
///
/// Order: quit/fire input, collisions, compaction, movement.  A frame that
/// ends the session returns right after the collision pass.  Drawing and
/// pacing belong to the caller.
pub fn tick(state: &GameState, input: &FrameInput, config: &GameConfig) -> GameState {
    if state.status != GameStatus::Running {
        return state.clone();
    }

    if input.quit {
        info!("quit requested at frame {}", state.frame);
        return GameState {
            status: GameStatus::Quit,
            ..state.clone()
        };
    }

    let mut state = state.clone();
    if input.fire {
        state.projectiles.push(fire_projectile(&state.actor));
    }

    let state = resolve_collisions(&state, config.effect_lifetime);
    if state.status != GameStatus::Running {
        return state;
    }

    let state = compact(&state, config.culling);
    let viewport = state.viewport;

    GameState {
        actor: move_actor(&state.actor, input.held, viewport),
        hazards: state
            .hazards
            .iter()
            .map(|h| update_hazard(h, viewport))
            .collect(),
        projectiles: state.projectiles.iter().map(update_projectile).collect(),
        effects: state.effects.iter().map(update_effect).collect(),
        frame: state.frame + 1,
        ..state
    }
}
