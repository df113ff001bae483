pub mod animation;

use glam::Vec2;

use crate::config::Preset;
use crate::input::{ActionEvent, InputSnapshot};

use self::animation::{ActionState, AnimationSet};

/// Spawn x position, pixels from the left edge.
const SPAWN_X: f32 = 100.0;

/// The player character. One instance lives for the whole process;
/// `update` runs exactly once per sim tick.
///
/// Coordinates are screen pixels, y-down. `pos` anchors the bottom-left
/// corner of the current frame, so standing on the ground means
/// `pos.y == preset.ground_y`.
pub struct Hero {
    pub state: ActionState,
    /// Fractional progress through the current clip; truncate for lookup.
    pub frame_index: f32,
    pub facing_right: bool,
    pub pos: Vec2,
    /// Vertical velocity, pixels per tick (gravity presets only).
    pub vel_y: f32,
    /// Latch: punch key is held down. Freezes the punch clip on frame 1.
    pub hold_punch: bool,
    grounded: bool,
}

impl Hero {
    pub fn new(preset: &Preset) -> Self {
        Self {
            state: ActionState::Idle,
            frame_index: 0.0,
            facing_right: true,
            pos: Vec2::new(SPAWN_X, preset.ground_y),
            vel_y: 0.0,
            hold_punch: false,
            grounded: true,
        }
    }

    pub fn grounded(&self) -> bool {
        self.grounded
    }

    /// Truncated frame index into the current clip. Always in bounds:
    /// `advance_animation` wraps or resets before it can run past the end.
    pub fn frame(&self) -> usize {
        self.frame_index as usize
    }

    /// One sim tick: drain action events, then physics, then the state
    /// machine, then animation.
    pub fn update(
        &mut self,
        snap: InputSnapshot,
        events: &[ActionEvent],
        anims: &AnimationSet,
        preset: &Preset,
    ) {
        for &event in events {
            self.apply_event(event, preset);
        }

        // A punch runs to completion: no gravity, no movement, no jump.
        if self.state.is_punch() {
            self.advance_animation(anims, preset);
            return;
        }

        if preset.has_gravity {
            self.vel_y += preset.gravity;
            self.pos.y += self.vel_y;
            if self.pos.y >= preset.ground_y {
                self.pos.y = preset.ground_y;
                self.vel_y = 0.0;
                self.grounded = true;
            } else {
                self.grounded = false;
            }
        }

        let crouching = self.grounded && preset.crouch_enabled && snap.crouch;

        if !self.grounded {
            self.set_state(ActionState::Jump);
        } else if crouching {
            // Crouching pins the hero in place.
            self.set_state(ActionState::Crouch);
        } else if snap.right {
            self.facing_right = true;
            self.pos.x += preset.walk_speed;
            self.set_state(ActionState::Walk);
        } else if snap.left {
            self.facing_right = false;
            self.pos.x -= preset.walk_speed;
            self.set_state(ActionState::Walk);
        } else {
            self.set_state(ActionState::Idle);
        }

        self.advance_animation(anims, preset);
    }

    fn apply_event(&mut self, event: ActionEvent, preset: &Preset) {
        match event {
            ActionEvent::PunchPressed => {
                self.hold_punch = true;
                if self.state == ActionState::Crouch {
                    self.set_state(ActionState::CrouchPunch);
                } else if !self.state.is_punch() {
                    self.set_state(ActionState::Punch);
                }
            }
            ActionEvent::PunchReleased => {
                self.hold_punch = false;
            }
            ActionEvent::JumpPressed => {
                // Only from the ground, and never mid-punch.
                if preset.has_gravity && self.grounded && !self.state.is_punch() {
                    self.vel_y = preset.jump_force;
                }
            }
        }
    }

    fn advance_animation(&mut self, anims: &AnimationSet, preset: &Preset) {
        // Held punch freezes on the extended-fist frame.
        if self.state.is_punch() && self.hold_punch && self.frame() == 1 {
            return;
        }

        self.frame_index += preset.anim_speed;

        if self.frame() >= anims.frame_count(self.state) {
            if self.state.loops() {
                self.frame_index = 0.0;
            } else {
                // Clip done; hand control back to Idle at frame 0.
                self.set_state(ActionState::Idle);
            }
        }
    }

    fn set_state(&mut self, new_state: ActionState) {
        if self.state != new_state {
            self.state = new_state;
            self.frame_index = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn fixture(preset: &Preset) -> (Hero, AnimationSet) {
        // No assets on disk in tests — every clip loads as placeholders,
        // which keeps the real frame counts.
        let anims = AnimationSet::load(Path::new("no-such-dir"), preset);
        (Hero::new(preset), anims)
    }

    fn tick(hero: &mut Hero, anims: &AnimationSet, preset: &Preset, snap: InputSnapshot) {
        hero.update(snap, &[], anims, preset);
    }

    fn tick_with(
        hero: &mut Hero,
        anims: &AnimationSet,
        preset: &Preset,
        snap: InputSnapshot,
        events: &[ActionEvent],
    ) {
        hero.update(snap, events, anims, preset);
    }

    const IDLE: InputSnapshot = InputSnapshot {
        left: false,
        right: false,
        crouch: false,
    };
    const RIGHT: InputSnapshot = InputSnapshot {
        left: false,
        right: true,
        crouch: false,
    };
    const LEFT: InputSnapshot = InputSnapshot {
        left: true,
        right: false,
        crouch: false,
    };
    const CROUCH: InputSnapshot = InputSnapshot {
        left: false,
        right: false,
        crouch: true,
    };

    #[test]
    fn starts_idle_grounded_facing_right() {
        let preset = Preset::rooftop();
        let (hero, _) = fixture(&preset);
        assert_eq!(hero.state, ActionState::Idle);
        assert_eq!(hero.frame(), 0);
        assert!(hero.facing_right);
        assert!(hero.grounded());
        assert_eq!(hero.pos.y, preset.ground_y);
    }

    #[test]
    fn idle_with_no_input_loops_and_stays_put() {
        let preset = Preset::rooftop();
        let (mut hero, anims) = fixture(&preset);
        let start = hero.pos;
        let idle_len = anims.frame_count(ActionState::Idle);

        let mut seen_wrap = false;
        let mut prev_frame = hero.frame();
        for _ in 0..500 {
            tick(&mut hero, &anims, &preset, IDLE);
            assert_eq!(hero.state, ActionState::Idle);
            assert!(hero.frame() < idle_len);
            if hero.frame() < prev_frame {
                seen_wrap = true;
            }
            prev_frame = hero.frame();
        }
        assert_eq!(hero.pos, start);
        assert!(seen_wrap, "idle clip never wrapped");
    }

    #[test]
    fn walking_moves_and_sets_facing() {
        let preset = Preset::street();
        let (mut hero, anims) = fixture(&preset);
        let x0 = hero.pos.x;

        tick(&mut hero, &anims, &preset, RIGHT);
        assert_eq!(hero.state, ActionState::Walk);
        assert!(hero.facing_right);
        assert_eq!(hero.pos.x, x0 + preset.walk_speed);

        tick(&mut hero, &anims, &preset, LEFT);
        assert!(!hero.facing_right);
        assert_eq!(hero.pos.x, x0);

        tick(&mut hero, &anims, &preset, IDLE);
        assert_eq!(hero.state, ActionState::Idle);
        assert_eq!(hero.frame(), 0); // state change reset the clip
    }

    #[test]
    fn punch_starts_same_tick_and_locks_out_movement() {
        let preset = Preset::street();
        let (mut hero, anims) = fixture(&preset);

        tick_with(&mut hero, &anims, &preset, IDLE, &[ActionEvent::PunchPressed]);
        assert_eq!(hero.state, ActionState::Punch);
        assert!(hero.hold_punch);

        // Movement keys are dead while punching.
        let x = hero.pos.x;
        tick_with(&mut hero, &anims, &preset, RIGHT, &[ActionEvent::PunchReleased]);
        assert_eq!(hero.state, ActionState::Punch);
        assert_eq!(hero.pos.x, x);
    }

    #[test]
    fn punch_completes_back_to_idle() {
        let preset = Preset::street();
        let (mut hero, anims) = fixture(&preset);

        tick_with(&mut hero, &anims, &preset, IDLE, &[ActionEvent::PunchPressed]);
        tick_with(&mut hero, &anims, &preset, IDLE, &[ActionEvent::PunchReleased]);

        // 3 frames at 0.15/tick: the clip is over within 20 ticks of the press.
        for _ in 0..30 {
            tick(&mut hero, &anims, &preset, IDLE);
        }
        assert_eq!(hero.state, ActionState::Idle);
    }

    #[test]
    fn held_punch_freezes_on_frame_one() {
        let preset = Preset::street();
        let (mut hero, anims) = fixture(&preset);

        tick_with(&mut hero, &anims, &preset, IDLE, &[ActionEvent::PunchPressed]);
        // Advance until the truncated index reaches 1, then hold.
        for _ in 0..100 {
            tick(&mut hero, &anims, &preset, IDLE);
            if hero.frame() == 1 {
                break;
            }
        }
        assert_eq!(hero.frame(), 1);

        // Frozen indefinitely while the key stays down.
        for _ in 0..200 {
            tick(&mut hero, &anims, &preset, IDLE);
            assert_eq!(hero.state, ActionState::Punch);
            assert_eq!(hero.frame(), 1);
        }

        // Release: the clip plays out and control returns to Idle.
        tick_with(&mut hero, &anims, &preset, IDLE, &[ActionEvent::PunchReleased]);
        let mut reached_frame_two = false;
        for _ in 0..30 {
            if hero.state == ActionState::Punch && hero.frame() == 2 {
                reached_frame_two = true;
            }
            tick(&mut hero, &anims, &preset, IDLE);
        }
        assert!(reached_frame_two);
        assert_eq!(hero.state, ActionState::Idle);
    }

    #[test]
    fn crouch_pins_in_place_and_chains_to_crouch_punch() {
        let preset = Preset::rooftop();
        let (mut hero, anims) = fixture(&preset);

        let crouch_walk = InputSnapshot {
            left: false,
            right: true,
            crouch: true,
        };
        let x = hero.pos.x;
        tick(&mut hero, &anims, &preset, crouch_walk);
        assert_eq!(hero.state, ActionState::Crouch);
        assert_eq!(hero.pos.x, x, "crouch must disable horizontal movement");

        tick_with(&mut hero, &anims, &preset, CROUCH, &[ActionEvent::PunchPressed]);
        assert_eq!(hero.state, ActionState::CrouchPunch);

        tick_with(&mut hero, &anims, &preset, CROUCH, &[ActionEvent::PunchReleased]);
        for _ in 0..30 {
            tick(&mut hero, &anims, &preset, IDLE);
        }
        assert_eq!(hero.state, ActionState::Idle);
    }

    #[test]
    fn jump_is_parabolic_and_lands_exactly_on_the_ground() {
        let preset = Preset::rooftop();
        let (mut hero, anims) = fixture(&preset);

        tick_with(&mut hero, &anims, &preset, IDLE, &[ActionEvent::JumpPressed]);
        assert_eq!(hero.vel_y, preset.jump_force + preset.gravity);
        assert!(hero.pos.y < preset.ground_y, "launch should leave the ground");
        assert_eq!(hero.state, ActionState::Jump);

        // Rising phase (y-down: y decreases), then falling back.
        let mut min_y = hero.pos.y;
        let mut landed = false;
        let mut airborne_ticks = 0;
        for _ in 0..120 {
            tick(&mut hero, &anims, &preset, IDLE);
            min_y = min_y.min(hero.pos.y);
            if hero.grounded() {
                landed = true;
                break;
            }
            airborne_ticks += 1;
        }
        assert!(landed, "never landed");
        assert!(airborne_ticks > 10, "jump ended suspiciously fast");
        assert!(min_y < preset.ground_y - 50.0, "jump arc too shallow");
        assert_eq!(hero.pos.y, preset.ground_y);
        assert_eq!(hero.vel_y, 0.0, "velocity must reset at ground contact");
        assert_eq!(hero.state, ActionState::Idle);
    }

    #[test]
    fn landing_with_direction_held_resumes_walking() {
        let preset = Preset::rooftop();
        let (mut hero, anims) = fixture(&preset);

        tick_with(&mut hero, &anims, &preset, RIGHT, &[ActionEvent::JumpPressed]);
        for _ in 0..120 {
            tick(&mut hero, &anims, &preset, RIGHT);
            if hero.grounded() {
                break;
            }
        }
        assert!(hero.grounded());
        assert_eq!(hero.state, ActionState::Walk);
    }

    #[test]
    fn jump_event_ignored_while_airborne() {
        let preset = Preset::rooftop();
        let (mut hero, anims) = fixture(&preset);

        tick_with(&mut hero, &anims, &preset, IDLE, &[ActionEvent::JumpPressed]);
        for _ in 0..3 {
            tick(&mut hero, &anims, &preset, IDLE);
        }
        let vel_before = hero.vel_y;
        tick_with(&mut hero, &anims, &preset, IDLE, &[ActionEvent::JumpPressed]);
        assert_eq!(hero.vel_y, vel_before + preset.gravity);
    }

    #[test]
    fn street_preset_ignores_jump_and_crouch() {
        let preset = Preset::street();
        let (mut hero, anims) = fixture(&preset);

        tick_with(&mut hero, &anims, &preset, CROUCH, &[ActionEvent::JumpPressed]);
        assert_eq!(hero.state, ActionState::Idle);
        assert_eq!(hero.vel_y, 0.0);
        assert_eq!(hero.pos.y, preset.ground_y);
    }

    #[test]
    fn frame_index_stays_in_bounds_under_mixed_input() {
        let preset = Preset::rooftop();
        let (mut hero, anims) = fixture(&preset);

        // A scripted mess of inputs; the invariant must hold every tick.
        let script: &[(InputSnapshot, &[ActionEvent])] = &[
            (RIGHT, &[]),
            (RIGHT, &[ActionEvent::PunchPressed]),
            (LEFT, &[]),
            (IDLE, &[ActionEvent::PunchReleased]),
            (CROUCH, &[ActionEvent::PunchPressed]),
            (CROUCH, &[ActionEvent::PunchReleased]),
            (IDLE, &[ActionEvent::JumpPressed]),
            (LEFT, &[]),
            (IDLE, &[]),
        ];
        for round in 0..200 {
            let (snap, events) = script[round % script.len()];
            tick_with(&mut hero, &anims, &preset, snap, events);
            assert!(
                hero.frame() < anims.frame_count(hero.state),
                "frame {} out of bounds for {:?}",
                hero.frame(),
                hero.state
            );
        }
    }

    #[test]
    fn punch_hold_tick_sequence() {
        // [punch-down, tick.., punch-up, tick..] must walk through
        // Punch(0) -> Punch(1 frozen) -> Punch(2) -> Idle.
        let preset = Preset::street();
        let (mut hero, anims) = fixture(&preset);

        tick_with(&mut hero, &anims, &preset, IDLE, &[ActionEvent::PunchPressed]);
        let mut states = vec![(hero.state, hero.frame())];

        for _ in 0..10 {
            tick(&mut hero, &anims, &preset, IDLE);
            states.push((hero.state, hero.frame()));
        }
        tick_with(&mut hero, &anims, &preset, IDLE, &[ActionEvent::PunchReleased]);
        states.push((hero.state, hero.frame()));
        for _ in 0..20 {
            tick(&mut hero, &anims, &preset, IDLE);
            states.push((hero.state, hero.frame()));
        }

        assert!(states.contains(&(ActionState::Punch, 0)));
        assert!(states.contains(&(ActionState::Punch, 1)));
        assert!(states.contains(&(ActionState::Punch, 2)));
        assert!(states.contains(&(ActionState::Idle, 0)));
        assert_eq!(states.last().unwrap().0, ActionState::Idle);

        // Frame order is monotone through the punch: 0s, then 1s, then 2s.
        let punch_frames: Vec<usize> = states
            .iter()
            .filter(|(s, _)| *s == ActionState::Punch)
            .map(|&(_, f)| f)
            .collect();
        assert!(punch_frames.windows(2).all(|w| w[0] <= w[1]));
    }
}
