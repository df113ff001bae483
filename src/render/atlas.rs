use crate::assets::FrameImage;
use crate::hero::animation::{ActionState, AnimationSet, ACTION_COUNT, ALL_ACTIONS};

/// UV rectangle and pixel size of one packed frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameRegion {
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
    /// On-screen size in pixels (already scaled at load).
    pub size: [f32; 2],
}

/// All animation clips packed into one RGBA texture, one shelf row per
/// action state. Built on the CPU at startup, uploaded once.
pub struct SpriteAtlas {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    regions: [Vec<FrameRegion>; ACTION_COUNT],
}

impl SpriteAtlas {
    pub fn build(anims: &AnimationSet) -> Self {
        // Shelf layout: row per clip, row height = tallest frame in it.
        let mut width = 0u32;
        let mut height = 0u32;
        for action in ALL_ACTIONS {
            let clip = anims.clip(action);
            let row_w: u32 = clip.iter().map(|f| f.width).sum();
            let row_h: u32 = clip.iter().map(|f| f.height).max().unwrap_or(0);
            width = width.max(row_w);
            height += row_h;
        }

        let mut pixels = vec![0u8; (width * height * 4) as usize];
        let mut regions: [Vec<FrameRegion>; ACTION_COUNT] = std::array::from_fn(|_| Vec::new());

        let mut y_off = 0u32;
        for action in ALL_ACTIONS {
            let clip = anims.clip(action);
            let row_h = clip.iter().map(|f| f.height).max().unwrap_or(0);

            let mut x_off = 0u32;
            for frame in clip {
                blit(&mut pixels, width, frame, x_off, y_off);
                regions[action.index()].push(FrameRegion {
                    uv_min: [
                        x_off as f32 / width as f32,
                        y_off as f32 / height as f32,
                    ],
                    uv_max: [
                        (x_off + frame.width) as f32 / width as f32,
                        (y_off + frame.height) as f32 / height as f32,
                    ],
                    size: [frame.width as f32, frame.height as f32],
                });
                x_off += frame.width;
            }
            y_off += row_h;
        }

        log::info!("sprite atlas packed: {width}x{height}");
        Self {
            width,
            height,
            pixels,
            regions,
        }
    }

    pub fn region(&self, action: ActionState, frame: usize) -> FrameRegion {
        self.regions[action.index()][frame]
    }
}

/// Copy one frame into the atlas buffer at (x, y).
fn blit(pixels: &mut [u8], atlas_w: u32, frame: &FrameImage, x: u32, y: u32) {
    for row in 0..frame.height {
        let src = (row * frame.width * 4) as usize;
        let dst = (((y + row) * atlas_w + x) * 4) as usize;
        let len = (frame.width * 4) as usize;
        pixels[dst..dst + len].copy_from_slice(&frame.pixels[src..src + len]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;
    use std::path::Path;

    fn atlas() -> (AnimationSet, SpriteAtlas) {
        let anims = AnimationSet::load(Path::new("no-such-dir"), &Preset::rooftop());
        let atlas = SpriteAtlas::build(&anims);
        (anims, atlas)
    }

    #[test]
    fn regions_stay_inside_the_texture() {
        let (anims, atlas) = atlas();
        for action in ALL_ACTIONS {
            for i in 0..anims.frame_count(action) {
                let r = atlas.region(action, i);
                assert!(r.uv_min[0] >= 0.0 && r.uv_min[1] >= 0.0);
                assert!(r.uv_max[0] <= 1.0 && r.uv_max[1] <= 1.0);
                assert!(r.uv_min[0] < r.uv_max[0]);
                assert!(r.uv_min[1] < r.uv_max[1]);
            }
        }
    }

    #[test]
    fn frames_in_a_row_do_not_overlap() {
        let (anims, atlas) = atlas();
        for action in ALL_ACTIONS {
            for i in 1..anims.frame_count(action) {
                let prev = atlas.region(action, i - 1);
                let cur = atlas.region(action, i);
                assert!(prev.uv_max[0] <= cur.uv_min[0]);
            }
        }
    }

    #[test]
    fn region_sizes_match_source_frames() {
        let (anims, atlas) = atlas();
        for action in ALL_ACTIONS {
            for (i, frame) in anims.clip(action).iter().enumerate() {
                let r = atlas.region(action, i);
                assert_eq!(r.size, [frame.width as f32, frame.height as f32]);
            }
        }
    }

    #[test]
    fn packed_pixels_carry_frame_data() {
        let (_, atlas) = atlas();
        assert_eq!(
            atlas.pixels.len(),
            (atlas.width * atlas.height * 4) as usize
        );
        // Top-left texel belongs to the first idle frame — placeholder red.
        assert_eq!(&atlas.pixels[..4], &[255, 0, 0, 255]);
    }
}
