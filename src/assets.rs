use std::path::Path;

use image::imageops::FilterType;

/// Side length of the placeholder frame substituted for a missing asset.
const PLACEHOLDER_SIZE: u32 = 50;
/// Placeholder fill — solid red so missing art is obvious on screen.
const PLACEHOLDER_COLOR: [u8; 4] = [255, 0, 0, 255];

/// A decoded sprite frame, RGBA8, tightly packed.
#[derive(Debug, Clone)]
pub struct FrameImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl FrameImage {
    /// Solid-colored stand-in for a frame that failed to load.
    pub fn placeholder() -> Self {
        let mut pixels = Vec::with_capacity((PLACEHOLDER_SIZE * PLACEHOLDER_SIZE * 4) as usize);
        for _ in 0..PLACEHOLDER_SIZE * PLACEHOLDER_SIZE {
            pixels.extend_from_slice(&PLACEHOLDER_COLOR);
        }
        Self {
            width: PLACEHOLDER_SIZE,
            height: PLACEHOLDER_SIZE,
            pixels,
        }
    }

    /// 1x1 solid frame — used to stretch a fill color over the backdrop.
    pub fn solid(rgb: [u8; 3]) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![rgb[0], rgb[1], rgb[2], 255],
        }
    }
}

/// Load `{prefix}_1.png` .. `{prefix}_{count}.png` from `dir`, scaled by
/// `scale` with nearest-neighbor (pixel art). A frame that is missing or
/// fails to decode becomes a placeholder — asset problems never abort the
/// demo, they just show up red.
pub fn load_frame_sequence(dir: &Path, prefix: &str, count: usize, scale: f32) -> Vec<FrameImage> {
    let mut frames = Vec::with_capacity(count);
    for i in 1..=count {
        let path = dir.join(format!("{prefix}_{i}.png"));
        match load_scaled(&path, scale) {
            Some(frame) => frames.push(frame),
            None => {
                log::warn!("missing sprite frame {}, using placeholder", path.display());
                frames.push(FrameImage::placeholder());
            }
        }
    }
    frames
}

/// Load `background.png` from `dir` resized to the window. None when absent
/// (the renderer stretches the preset's fill color instead).
pub fn load_background(dir: &Path, width: u32, height: u32) -> Option<FrameImage> {
    let path = dir.join("background.png");
    let img = match image::open(&path) {
        Ok(img) => img,
        Err(e) => {
            log::warn!("no background at {} ({e}), using solid fill", path.display());
            return None;
        }
    };
    let resized = img.resize_exact(width, height, FilterType::Nearest);
    let rgba = resized.into_rgba8();
    Some(FrameImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

fn load_scaled(path: &Path, scale: f32) -> Option<FrameImage> {
    let img = image::open(path).ok()?;
    let w = ((img.width() as f32 * scale) as u32).max(1);
    let h = ((img.height() as f32 * scale) as u32).max(1);
    let rgba = img.resize_exact(w, h, FilterType::Nearest).into_rgba8();
    Some(FrameImage {
        width: w,
        height: h,
        pixels: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_files_become_placeholders() {
        let frames = load_frame_sequence(Path::new("no-such-dir"), "idle", 4, 2.0);
        assert_eq!(frames.len(), 4);
        for f in &frames {
            assert_eq!((f.width, f.height), (PLACEHOLDER_SIZE, PLACEHOLDER_SIZE));
            assert_eq!(f.pixels.len(), (f.width * f.height * 4) as usize);
            assert_eq!(&f.pixels[..4], &PLACEHOLDER_COLOR);
        }
    }

    #[test]
    fn missing_background_is_none() {
        assert!(load_background(Path::new("no-such-dir"), 800, 600).is_none());
    }

    #[test]
    fn solid_frame_is_single_opaque_pixel() {
        let f = FrameImage::solid([40, 40, 60]);
        assert_eq!((f.width, f.height), (1, 1));
        assert_eq!(f.pixels, vec![40, 40, 60, 255]);
    }
}
