/// Height of the strip below the ground line, in pixels.
const GROUND_MARGIN: f32 = 50.0;

/// One behavior preset — window geometry plus the tuning constants that
/// differ between the two demo variants. All movement constants are
/// per-tick (the sim runs at a fixed 60 Hz).
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    pub title: &'static str,
    pub window_w: u32,
    pub window_h: u32,
    /// Sprite scale applied to every frame at load time.
    pub scale: f32,
    /// Y coordinate of the ground line (bottom edge of the sprite rests here).
    pub ground_y: f32,
    /// Horizontal walk speed (pixels per tick).
    pub walk_speed: f32,
    /// Animation advance rate (frames per tick).
    pub anim_speed: f32,
    pub has_gravity: bool,
    /// Downward acceleration (pixels per tick^2). Unused when `has_gravity` is false.
    pub gravity: f32,
    /// Initial vertical velocity on jump (negative = up).
    pub jump_force: f32,
    /// Whether the crouch / crouch-punch states are reachable.
    pub crouch_enabled: bool,
    /// Solid RGB fill used when background.png is missing.
    pub backdrop_fill: [u8; 3],
}

impl Preset {
    /// Wide cinematic window, gravity jumps, crouching. The full moveset.
    pub fn rooftop() -> Self {
        Self {
            title: "Rooftop Patrol",
            window_w: 1000,
            window_h: 450,
            scale: 2.0,
            ground_y: 450.0 - GROUND_MARGIN,
            walk_speed: 5.0,
            anim_speed: 0.15,
            has_gravity: true,
            gravity: 0.8,
            jump_force: -16.0,
            crouch_enabled: true,
            backdrop_fill: [40, 40, 60], // dark asphalt blue
        }
    }

    /// Taller window, ground-only moveset: idle, walk, punch.
    pub fn street() -> Self {
        Self {
            title: "Street Patrol",
            window_w: 800,
            window_h: 600,
            scale: 1.5,
            ground_y: 600.0 - GROUND_MARGIN,
            walk_speed: 5.0,
            anim_speed: 0.15,
            has_gravity: false,
            gravity: 0.0,
            jump_force: 0.0,
            crouch_enabled: false,
            backdrop_fill: [25, 25, 25],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ground_line_sits_above_window_bottom() {
        for preset in [Preset::rooftop(), Preset::street()] {
            assert!(preset.ground_y < preset.window_h as f32);
            assert!(preset.ground_y > 0.0);
        }
    }

    #[test]
    fn street_variant_has_no_air_or_crouch_moves() {
        let p = Preset::street();
        assert!(!p.has_gravity);
        assert!(!p.crouch_enabled);
    }

    #[test]
    fn rooftop_jump_launches_upward() {
        let p = Preset::rooftop();
        assert!(p.has_gravity);
        assert!(p.jump_force < 0.0);
        assert!(p.gravity > 0.0);
    }
}
