use bytemuck::{Pod, Zeroable};

use super::atlas::SpriteAtlas;
use crate::hero::Hero;

/// Per-instance sprite data uploaded to the GPU each frame.
/// Stride = 36 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SpriteInstance {
    /// Top-left corner in screen pixels (y-down).
    pub position: [f32; 2],
    /// Quad size in pixels.
    pub size: [f32; 2],
    /// Atlas UV rect of the frame to draw.
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
    /// Nonzero mirrors the frame horizontally (facing left).
    pub flip: u32,
}

impl SpriteInstance {
    /// Build the hero's instance for this frame. The hero's position is
    /// bottom-left anchored; the quad wants top-left.
    pub fn from_hero(hero: &Hero, atlas: &SpriteAtlas) -> Self {
        let region = atlas.region(hero.state, hero.frame());
        Self {
            position: [hero.pos.x, hero.pos.y - region.size[1]],
            size: region.size,
            uv_min: region.uv_min,
            uv_max: region.uv_max,
            flip: u32::from(!hero.facing_right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;
    use crate::hero::animation::AnimationSet;
    use std::path::Path;

    #[test]
    fn instance_anchors_bottom_left_and_flips_with_facing() {
        let preset = Preset::rooftop();
        let anims = AnimationSet::load(Path::new("no-such-dir"), &preset);
        let atlas = SpriteAtlas::build(&anims);
        let mut hero = Hero::new(&preset);

        let inst = SpriteInstance::from_hero(&hero, &atlas);
        assert_eq!(inst.flip, 0);
        // Bottom edge of the quad sits on the ground line.
        assert_eq!(inst.position[1] + inst.size[1], preset.ground_y);

        hero.facing_right = false;
        let inst = SpriteInstance::from_hero(&hero, &atlas);
        assert_eq!(inst.flip, 1);
    }
}
