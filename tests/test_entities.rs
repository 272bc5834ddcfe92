use fight_kokaton::entities::*;

use glam::IVec2;

#[test]
fn rect_geometry() {
    let r = Rect::from_center(IVec2::new(300, 200), IVec2::new(90, 80));
    assert_eq!(r.left(), 255);
    assert_eq!(r.right(), 345);
    assert_eq!(r.top(), 160);
    assert_eq!(r.bottom(), 240);
    assert_eq!(r.center(), IVec2::new(300, 200));
    assert_eq!(r.translate(IVec2::new(5, -5)).center(), IVec2::new(305, 195));
}

#[test]
fn rect_touching_edges_do_not_intersect() {
    let a = Rect {
        pos: IVec2::new(0, 0),
        size: IVec2::new(10, 10),
    };
    let touching = Rect {
        pos: IVec2::new(10, 0),
        size: IVec2::new(10, 10),
    };
    let overlapping = Rect {
        pos: IVec2::new(9, 9),
        size: IVec2::new(10, 10),
    };
    assert!(!a.intersects(&touching));
    assert!(a.intersects(&overlapping));
    assert!(overlapping.intersects(&a));
}

#[test]
fn direction_table_lookup() {
    for d in Direction::ALL {
        assert_eq!(Direction::from_vector(d.vector()), Some(d));
        assert_eq!(d.vector().x.abs().max(d.vector().y.abs()), STEP);
    }
    assert_eq!(Direction::from_vector(IVec2::ZERO), None);
    assert_eq!(Direction::from_vector(IVec2::new(10, 0)), None);
    assert_eq!(Direction::from_vector(IVec2::new(5, 10)), None);
}

#[test]
fn direction_angles_run_counter_clockwise() {
    assert_eq!(Direction::Right.angle_degrees(), 0.0);
    assert_eq!(Direction::Up.angle_degrees(), 90.0);
    assert_eq!(Direction::Left.angle_degrees(), 180.0);
    assert_eq!(Direction::DownRight.angle_degrees(), 315.0);
    // Screen y grows downward, so "up" is negative y.
    assert_eq!(Direction::Up.vector(), IVec2::new(0, -5));
}

#[test]
fn new_actor_faces_right() {
    let a = Actor::new(IVec2::new(300, 200));
    assert_eq!(a.center(), IVec2::new(300, 200));
    assert_eq!(a.rect.size, ACTOR_SIZE);
    assert_eq!(a.direction, Direction::Right);
    assert_eq!(a.sprite, Sprite::Facing(Direction::Right));
}

#[test]
fn score_tracker_counts_and_renders_fresh_text() {
    let mut score = ScoreTracker::default();
    assert_eq!(score.render(), "Score: 0");
    score.increment();
    score.increment();
    assert_eq!(score.score, 2);
    assert_eq!(score.render(), "Score: 2");
}

#[test]
fn effect_expiry() {
    let mut e = Effect {
        rect: Rect::from_center(IVec2::new(10, 10), EFFECT_SIZE),
        life: 1,
        frame_index: 0,
    };
    assert!(!e.is_expired());
    e.life = 0;
    assert!(e.is_expired());
}

#[test]
fn game_state_clone_is_independent() {
    let original = GameState {
        actor: Actor::new(IVec2::new(300, 200)),
        projectiles: Vec::new(),
        hazards: Vec::new(),
        effects: Vec::new(),
        score: ScoreTracker::default(),
        status: GameStatus::Running,
        frame: 0,
        viewport: Viewport {
            width: 1100,
            height: 650,
        },
    };
    let mut cloned = original.clone();

    // Mutating the clone must not affect the original
    cloned.actor.rect.pos.x = 999;
    cloned.score.increment();
    cloned.hazards.push(Hazard {
        rect: Rect::from_center(IVec2::new(5, 5), IVec2::splat(20)),
        velocity: IVec2::new(5, 5),
        alive: true,
    });

    assert_eq!(original.actor.center(), IVec2::new(300, 200));
    assert_eq!(original.score.score, 0);
    assert!(original.hazards.is_empty());
}
