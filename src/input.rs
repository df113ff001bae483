use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Edge-triggered action, queued once per key transition (OS key repeats
/// are filtered out). Drained by the controller each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEvent {
    JumpPressed,
    PunchPressed,
    PunchReleased,
}

/// Level-triggered key state, sampled by the controller once per tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub crouch: bool,
}

/// Bridges winit keyboard events into the two shapes the controller
/// consumes: a polled snapshot for held keys and a queue of discrete
/// action events.
#[derive(Debug, Default)]
pub struct InputState {
    left: bool,
    right: bool,
    crouch: bool,
    events: Vec<ActionEvent>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one winit keyboard event.
    pub fn handle_key(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(code) = event.physical_key {
            self.apply(code, event.state == ElementState::Pressed, event.repeat);
        }
    }

    fn apply(&mut self, code: KeyCode, pressed: bool, repeat: bool) {
        match code {
            KeyCode::ArrowLeft | KeyCode::KeyA => self.left = pressed,
            KeyCode::ArrowRight | KeyCode::KeyD => self.right = pressed,
            KeyCode::ArrowDown | KeyCode::KeyS => self.crouch = pressed,
            KeyCode::ArrowUp | KeyCode::Space | KeyCode::KeyW => {
                if pressed && !repeat {
                    self.events.push(ActionEvent::JumpPressed);
                }
            }
            KeyCode::KeyP => {
                if pressed && !repeat {
                    self.events.push(ActionEvent::PunchPressed);
                } else if !pressed {
                    self.events.push(ActionEvent::PunchReleased);
                }
            }
            _ => {}
        }
    }

    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            left: self.left,
            right: self.right,
            crouch: self.crouch,
        }
    }

    pub fn events(&self) -> &[ActionEvent] {
        &self.events
    }

    /// Called after the tick has consumed the queue.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_keys_show_up_in_snapshot() {
        let mut input = InputState::new();
        input.apply(KeyCode::ArrowRight, true, false);
        input.apply(KeyCode::KeyS, true, false);
        let snap = input.snapshot();
        assert!(snap.right && snap.crouch && !snap.left);

        input.apply(KeyCode::ArrowRight, false, false);
        assert!(!input.snapshot().right);
    }

    #[test]
    fn punch_press_and_release_queue_one_event_each() {
        let mut input = InputState::new();
        input.apply(KeyCode::KeyP, true, false);
        input.apply(KeyCode::KeyP, false, false);
        assert_eq!(
            input.events(),
            &[ActionEvent::PunchPressed, ActionEvent::PunchReleased]
        );
        input.clear_events();
        assert!(input.events().is_empty());
    }

    #[test]
    fn os_key_repeats_are_ignored() {
        let mut input = InputState::new();
        input.apply(KeyCode::Space, true, false);
        input.apply(KeyCode::Space, true, true);
        input.apply(KeyCode::Space, true, true);
        assert_eq!(input.events(), &[ActionEvent::JumpPressed]);

        // WASD walk keys are level-triggered, not queued
        input.clear_events();
        input.apply(KeyCode::KeyA, true, false);
        assert!(input.events().is_empty());
        assert!(input.snapshot().left);
    }
}
