//! Colour policies for escape counts.
//!
//! Two policies exist side by side and are deliberately kept apart:
//! - palette banding, used by the CPU backends, cycles a four-colour gradient every
//!   [`PERIOD`] iterations so detail stays visible at any depth;
//! - the hue policy, used by the shader backend, spreads the hue wheel once over the
//!   iteration depth.

/// Length, in iterations, of one full cycle of the palette.
pub const PERIOD: u32 = 512;

/// Palette anchors, in 1/256ths. The last red component is out of gamut and saturates.
const ANCHORS: [[f64; 3]; 4] = [
    [0.0, 7.0, 100.0],
    [32.0, 107.0, 203.0],
    [237.0, 255.0, 255.0],
    [266.0, 170.0, 0.0],
];

const STEPS_PER_BAND: u32 = PERIOD / ANCHORS.len() as u32;

/// Opaque black, for points inside the set.
pub const BLACK: [u8; 4] = [0x00, 0x00, 0x00, 0xFF];

const SHADER_SATURATION: f64 = 0.8;
const SHADER_VALUE: f64 = 1.0;

/// Banded colour for an escape count, as `[r, g, b]` components in [0, 1].
pub fn colour_for(iterations: u32) -> [f64; 3] {
    let iterations = iterations % PERIOD;
    let band = (iterations / STEPS_PER_BAND) as usize;
    let current = ANCHORS[band];
    let next = ANCHORS[(band + 1) % ANCHORS.len()];
    let d = (iterations % STEPS_PER_BAND) as f64;
    let steps = STEPS_PER_BAND as f64;

    let mut rgb = [0.0; 3];
    for (out, (c, n)) in rgb.iter_mut().zip(current.iter().zip(next.iter())) {
        let delta = (n - c) / steps;
        *out = ((c + delta * d) / 256.0).clamp(0.0, 1.0);
    }
    rgb
}

/// Scales a [0, 1] component to a byte.
#[inline]
pub fn to_byte(component: f64) -> u8 {
    (component * 255.0).round() as u8
}

/// RGBA bytes for a kernel result under palette banding.
#[inline]
pub fn palette_pixel(escape: Option<u32>) -> [u8; 4] {
    match escape {
        None => BLACK,
        Some(i) => {
            let [r, g, b] = colour_for(i);
            [to_byte(r), to_byte(g), to_byte(b), 0xFF]
        }
    }
}

/// RGBA bytes under the hue policy, for an escape at `iteration` out of `depth`.
///
/// The caller classifies bounded points; `iteration` must be below `depth`.
pub fn hue_pixel(iteration: u32, depth: u32) -> [u8; 4] {
    let hue = iteration as f64 / depth as f64;
    let (r, g, b) = hsv::hsv_to_rgb(hue * 360.0, SHADER_SATURATION, SHADER_VALUE);
    [r, g, b, 0xFF]
}
