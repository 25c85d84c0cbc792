//! WGSL sources for the update and render passes.
//!
//! The update shader is fixed; the render shader is generated for a
//! [`ColorMode`] / [`SizeMode`] pair so that palette mode carries no texture
//! bindings at all.
//!
//! # Update bindings (group 0)
//!
//! | Binding | Resource |
//! |---------|----------|
//! | 0 | `particles_in`, read-only storage |
//! | 1 | `particles_out`, read-write storage |
//! | 2 | `params`, uniform [`SimUniforms`](crate::emitter::SimUniforms) |
//! | 3 | `rg_noise`, RG8 texture read with `textureLoad` |
//!
//! # Render bindings (group 0)
//!
//! | Binding | Resource |
//! |---------|----------|
//! | 0 | `camera`, uniform [`CameraUniforms`] |
//! | 1 | `gradient` texture (gradient mode only) |
//! | 2 | `gradient_sampler` (gradient mode only) |

use bytemuck::{Pod, Zeroable};

use crate::particle::PARTICLE_WGSL;
use crate::render::{ColorMode, SizeMode, MAX_POINT_SIZE, PALETTE_A, PALETTE_B, PALETTE_C, PALETTE_D};

/// Compute workgroup width of the update shader.
pub const WORKGROUP_SIZE: u32 = 256;

/// Uniform block for the render shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct CameraUniforms {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    /// Surface size in pixels.
    pub viewport: [f32; 2],
    pub _padding: [f32; 2],
}

const UPDATE_BODY: &str = r#"
struct SimParams {
    gravity: vec3<f32>,
    delta_time: f32,
    origin: vec3<f32>,
    min_theta: f32,
    max_theta: f32,
    min_speed: f32,
    max_speed: f32,
    num_particles: u32,
};

@group(0) @binding(0)
var<storage, read> particles_in: array<Particle>;

@group(0) @binding(1)
var<storage, read_write> particles_out: array<Particle>;

@group(0) @binding(2)
var<uniform> params: SimParams;

@group(0) @binding(3)
var rg_noise: texture_2d<f32>;

fn noise_sample(index: u32) -> vec2<f32> {
    let dims = textureDimensions(rg_noise);
    let coord = vec2<u32>(index % dims.x, index / dims.x);
    return textureLoad(rg_noise, coord, 0).rg;
}

@compute @workgroup_size(256)
fn main(@builtin(global_invocation_id) global_id: vec3<u32>) {
    let index = global_id.x;
    if index >= params.num_particles {
        return;
    }

    let p = particles_in[index];
    var next: Particle;

    if p.age >= p.life {
        let r = noise_sample(index);
        let theta = params.min_theta + r.x * (params.max_theta - params.min_theta);
        let speed = params.min_speed + r.y * (params.max_speed - params.min_speed);
        next.position = params.origin;
        next.age = 0.0;
        next.life = p.life;
        next.velocity = vec3<f32>(cos(theta), 0.0, sin(theta)) * speed;
    } else {
        next.position = p.position + p.velocity * params.delta_time;
        next.age = p.age + params.delta_time;
        next.life = p.life;
        next.velocity = p.velocity + params.gravity * params.delta_time;
    }

    particles_out[index] = next;
}
"#;

/// Full WGSL source of the update compute shader.
pub fn update_shader() -> String {
    format!("{PARTICLE_WGSL}{UPDATE_BODY}")
}

fn wgsl_vec3(v: glam::Vec3) -> String {
    format!("vec3<f32>({:?}, {:?}, {:?})", v.x, v.y, v.z)
}

/// Generate the render shader for a color and size mode.
pub fn render_shader(color: &ColorMode, size: SizeMode) -> String {
    let (color_bindings, color_expr) = match color {
        ColorMode::Palette => (
            String::new(),
            format!(
                "{a} + {b} * cos(6.28318530718 * ({c} * t + {d}))",
                a = wgsl_vec3(PALETTE_A),
                b = wgsl_vec3(PALETTE_B),
                c = wgsl_vec3(PALETTE_C),
                d = wgsl_vec3(PALETTE_D),
            ),
        ),
        ColorMode::Gradient(_) => (
            r#"
@group(0) @binding(1)
var gradient: texture_2d<f32>;

@group(0) @binding(2)
var gradient_sampler: sampler;
"#
            .to_string(),
            "textureSampleLevel(gradient, gradient_sampler, vec2<f32>(t, 0.5), 0.0).rgb".to_string(),
        ),
    };

    let size_expr = match size {
        SizeMode::Shrink => format!("1.0 + {:?} * (1.0 - t)", MAX_POINT_SIZE - 1.0),
        SizeMode::Constant => "1.0".to_string(),
    };

    format!(
        r#"struct CameraUniforms {{
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    viewport: vec2<f32>,
}};

@group(0) @binding(0)
var<uniform> camera: CameraUniforms;
{color_bindings}
struct VertexOutput {{
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) opacity: f32,
}};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) particle_pos: vec3<f32>,
    @location(1) particle_age: f32,
    @location(2) particle_life: f32,
) -> VertexOutput {{
    var quad_vertices = array<vec2<f32>, 6>(
        vec2<f32>(-0.5, -0.5),
        vec2<f32>( 0.5, -0.5),
        vec2<f32>(-0.5,  0.5),
        vec2<f32>(-0.5,  0.5),
        vec2<f32>( 0.5, -0.5),
        vec2<f32>( 0.5,  0.5),
    );

    let t = particle_age / particle_life;
    let point_size = {size_expr};

    var clip_pos = camera.projection * camera.view * vec4<f32>(particle_pos, 1.0);

    // Point size is in pixels; one pixel spans 2 / viewport in NDC.
    let offset = quad_vertices[vertex_index] * point_size * 2.0 / camera.viewport;
    clip_pos.x += offset.x * clip_pos.w;
    clip_pos.y += offset.y * clip_pos.w;

    var out: VertexOutput;
    out.clip_position = clip_pos;
    out.color = {color_expr};
    out.opacity = 1.0 - t;
    return out;
}}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {{
    return vec4<f32>(in.color, in.opacity);
}}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradient::Gradient;

    #[test]
    fn test_update_shader_contains_particle_struct() {
        let src = update_shader();
        assert!(src.starts_with("struct Particle"));
        assert!(src.contains("@workgroup_size(256)"));
    }

    #[test]
    fn test_palette_has_no_texture_bindings() {
        let src = render_shader(&ColorMode::Palette, SizeMode::Shrink);
        assert!(!src.contains("gradient_sampler"));
        assert!(src.contains("vec3<f32>(1.0, 0.7, 0.4)"));
    }

    #[test]
    fn test_gradient_binds_ramp() {
        let src = render_shader(&ColorMode::Gradient(Gradient::fireball()), SizeMode::Shrink);
        assert!(src.contains("var gradient: texture_2d<f32>;"));
        assert!(src.contains("vec2<f32>(t, 0.5)"));
    }

    #[test]
    fn test_size_modes() {
        let shrink = render_shader(&ColorMode::Palette, SizeMode::Shrink);
        assert!(shrink.contains("let point_size = 1.0 + 6.0 * (1.0 - t);"));
        let constant = render_shader(&ColorMode::Palette, SizeMode::Constant);
        assert!(constant.contains("let point_size = 1.0;"));
    }

    #[test]
    fn test_camera_uniform_size() {
        assert_eq!(std::mem::size_of::<CameraUniforms>(), 144);
    }
}
