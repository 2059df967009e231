//! The fragment-shader formulation of the renderer, evaluated on the CPU.
//!
//! A GPU runs one invocation per pixel; here rayon's global pool stands in for the
//! hardware scheduler. The numerics follow the shader rather than the CPU backends:
//! single precision, pixel-centre sampling, a fixed loop bound, a strict bailout test,
//! and hue colouring.

use std::time::Instant;

use mandel_core::{
    colour, framebuffer::BYTES_PER_PIXEL, AffineTransform, Complex, Error, Framebuffer,
    RenderResult, Size, ViewParameters,
};
use rayon::prelude::*;

use crate::Renderer;

/// Compile-time loop bound of the shader; independent of the iteration depth.
pub const SHADER_ITERATION_BOUND: u32 = 10000;

const FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;
precision highp int;
out vec4 fragColor;

uniform int u_iterationDepth;
uniform vec2 u_resolution;

uniform float u_m11;
uniform float u_m21;
uniform float u_m31;
uniform float u_m12;
uniform float u_m22;
uniform float u_m32;

vec3 hsv2rgb(vec3 c) {
    vec4 K = vec4(1.0, 2.0 / 3.0, 1.0 / 3.0, 3.0);
    vec3 p = abs(fract(c.xxx + K.xyz) * 6.0 - K.www);
    return c.z * mix(K.xxx, clamp(p - K.xxx, 0.0, 1.0), c.y);
}

void main() {
    float sx = gl_FragCoord.x;
    float sy = u_resolution.y - gl_FragCoord.y;

    vec2 c = vec2(u_m11 * sx + u_m21 * sy + u_m31,
                  u_m12 * sx + u_m22 * sy + u_m32);
    vec2 z = vec2(0.0);
    int i = 0;

    for (int j = 0; j < ITERATION_BOUND; j++) {
        z = vec2(z.x * z.x - z.y * z.y + c.x, 2.0 * z.x * z.y + c.y);
        i = j;
        if (dot(z, z) > 4.0) {
            break;
        }
    }

    if (i >= u_iterationDepth - 1) {
        fragColor = vec4(0.0, 0.0, 0.0, 1.0);
    } else {
        float hue = float(i) / float(u_iterationDepth);
        fragColor = vec4(hsv2rgb(vec3(hue, 0.8, 1.0)), 1.0);
    }
}
"#;

/// GLSL ES 3.0 source of the fragment shader this backend evaluates,
/// for hosts that own a GPU context. Uniforms are the six transform coefficients,
/// the iteration depth, and the canvas resolution.
pub fn fragment_shader_source(iteration_bound: u32) -> String {
    FRAGMENT_SHADER.replace("ITERATION_BOUND", &iteration_bound.to_string())
}

/// The transform as the shader receives it: six single-precision uniforms.
#[derive(Copy, Clone, Debug)]
struct Uniforms {
    m: [f32; 6],
    iteration_depth: u32,
}

impl Uniforms {
    fn new(transform: &AffineTransform, iteration_depth: u32) -> Self {
        let c = transform.coefficients();
        Uniforms {
            m: c.map(|v| v as f32),
            iteration_depth,
        }
    }

    /// One fragment, at screen position `(sx, sy)` with y measured from the top.
    fn shade(&self, sx: f32, sy: f32) -> [u8; 4] {
        let [m11, m21, m31, m12, m22, m32] = self.m;
        let c = Complex::new(m11 * sx + m21 * sy + m31, m12 * sx + m22 * sy + m32);

        let mut z = Complex::new(0f32, 0f32);
        let mut i = 0;
        for j in 0..SHADER_ITERATION_BOUND {
            z = z.square() + c;
            i = j;
            if z.norm_sqr() > 4.0 {
                break;
            }
        }

        if i + 1 >= self.iteration_depth {
            colour::BLACK
        } else {
            colour::hue_pixel(i, self.iteration_depth)
        }
    }
}

/// Backend evaluating the fragment shader per pixel.
pub struct ShaderRenderer {
    framebuffer: Framebuffer,
}

impl ShaderRenderer {
    pub fn new() -> Self {
        ShaderRenderer {
            framebuffer: Framebuffer::new(Size {
                width: 0,
                height: 0,
            }),
        }
    }
}

impl Default for ShaderRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for ShaderRenderer {
    fn name(&self) -> &'static str {
        "shader"
    }

    fn draw(&mut self, params: &ViewParameters) -> Result<RenderResult, Error> {
        params.validate()?;
        let span = tracing::info_span!("draw", backend = self.name());
        let _guard = span.enter();

        let start = Instant::now();
        let size = params.size();
        let uniforms = Uniforms::new(&params.transform(), params.iteration_limit());
        let mut frame = Framebuffer::new(size);
        let stride = frame.stride();
        frame
            .rows_mut(0..size.height)
            .par_chunks_mut(stride)
            .enumerate()
            .for_each(|(y, row)| {
                // gl_FragCoord samples pixel centres; flipping y back to a top-left origin
                // leaves the centre of row y at y + 0.5.
                let sy = y as f32 + 0.5;
                for (x, px) in row.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
                    px.copy_from_slice(&uniforms.shade(x as f32 + 0.5, sy));
                }
            });

        self.framebuffer = frame;
        let result = RenderResult::since(start);
        tracing::debug!(elapsed_ms = result.elapsed_ms, "shader draw complete");
        Ok(result)
    }

    fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }
}
