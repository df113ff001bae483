use std::path::Path;

use crate::assets::{self, FrameImage};
use crate::config::Preset;

/// Every pose the hero can hold. Clip indices into [`AnimationSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ActionState {
    Idle,
    Walk,
    Punch,
    Jump,
    Crouch,
    CrouchPunch,
}

pub const ACTION_COUNT: usize = 6;

pub const ALL_ACTIONS: [ActionState; ACTION_COUNT] = [
    ActionState::Idle,
    ActionState::Walk,
    ActionState::Punch,
    ActionState::Jump,
    ActionState::Crouch,
    ActionState::CrouchPunch,
];

impl ActionState {
    pub fn index(self) -> usize {
        self as usize
    }

    /// Looping clips wrap on completion; the rest hand control back to Idle.
    pub fn loops(self) -> bool {
        matches!(
            self,
            ActionState::Idle | ActionState::Walk | ActionState::Crouch
        )
    }

    /// Punch states lock out movement input until the clip finishes.
    pub fn is_punch(self) -> bool {
        matches!(self, ActionState::Punch | ActionState::CrouchPunch)
    }

    /// Sprite sheet file prefix and frame count for this clip.
    fn clip_source(self) -> (&'static str, usize) {
        match self {
            ActionState::Idle => ("idle", 4),
            ActionState::Walk => ("walk", 6),
            ActionState::Punch => ("punch", 3),
            ActionState::Jump => ("jump", 6),
            ActionState::Crouch => ("crouch", 1),
            ActionState::CrouchPunch => ("crouchpunch", 3),
        }
    }
}

/// Frame clips for every action state, exhaustively indexed by the enum.
/// Construction guarantees each clip is non-empty (missing files load as
/// placeholders), so frame lookups never need a bounds check.
pub struct AnimationSet {
    clips: [Vec<FrameImage>; ACTION_COUNT],
}

impl AnimationSet {
    /// Load all clips from `dir`, scaled per the preset. Never fails;
    /// absent art is substituted frame by frame.
    pub fn load(dir: &Path, preset: &Preset) -> Self {
        let clips = ALL_ACTIONS.map(|action| {
            let (prefix, count) = action.clip_source();
            assets::load_frame_sequence(dir, prefix, count, preset.scale)
        });
        Self { clips }
    }

    pub fn clip(&self, action: ActionState) -> &[FrameImage] {
        &self.clips[action.index()]
    }

    pub fn frame_count(&self, action: ActionState) -> usize {
        self.clips[action.index()].len()
    }

    pub fn frame(&self, action: ActionState, index: usize) -> &FrameImage {
        &self.clips[action.index()][index]
    }
}
