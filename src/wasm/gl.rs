use std::collections::hash_map::Entry;
use std::collections::HashMap;

use glam::{Mat4, Vec3};
use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlFramebuffer, WebGlProgram,
    WebGlShader, WebGlTexture, WebGlUniformLocation, WebGlVertexArrayObject, WebglLoseContext,
};

use crate::camera::Camera;
use crate::config::{BloomSettings, DepthOfFieldSettings};
use crate::error::{Result, VizError};
use crate::pipeline::{FrameView, PassStats, RenderBackend, SurfaceSize};
use crate::scene::{Geometry, Material, ReleaseSink, ResourceId, ResourceKind, Topology};

const SCENE_VS: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
uniform mat4 u_view_projection;
uniform mat4 u_model;
uniform float u_point_size;
out vec3 v_normal;
void main() {
    vec4 world = u_model * vec4(a_position, 1.0);
    v_normal = mat3(u_model) * a_normal;
    gl_PointSize = u_point_size;
    gl_Position = u_view_projection * world;
}
"#;

const SCENE_FS: &str = r#"#version 300 es
precision highp float;
in vec3 v_normal;
uniform vec3 u_color;
uniform vec3 u_emissive;
uniform float u_opacity;
uniform float u_lit;
uniform float u_round;
out vec4 out_color;
const vec3 LIGHT_DIR = vec3(0.37, 0.74, 0.56);
void main() {
    if (u_round > 0.5) {
        vec2 c = gl_PointCoord - 0.5;
        if (dot(c, c) > 0.25) discard;
    }
    float diffuse = 1.0;
    if (u_lit > 0.5) {
        diffuse = 0.35 + 0.65 * max(dot(normalize(v_normal), LIGHT_DIR), 0.0);
    }
    out_color = vec4(u_color * diffuse + u_emissive, u_opacity);
}
"#;

// Fullscreen triangle from gl_VertexID; no vertex buffers.
const POST_VS: &str = r#"#version 300 es
out vec2 v_uv;
void main() {
    vec2 p = vec2(float((gl_VertexID << 1) & 2), float(gl_VertexID & 2));
    v_uv = p;
    gl_Position = vec4(p * 2.0 - 1.0, 0.0, 1.0);
}
"#;

const BRIGHT_FS: &str = r#"#version 300 es
precision highp float;
in vec2 v_uv;
uniform sampler2D u_source;
uniform float u_threshold;
out vec4 out_color;
void main() {
    vec4 c = texture(u_source, v_uv);
    float lum = dot(c.rgb, vec3(0.2126, 0.7152, 0.0722));
    out_color = c * smoothstep(u_threshold, u_threshold + 0.1, lum);
}
"#;

const BLUR_FS: &str = r#"#version 300 es
precision highp float;
in vec2 v_uv;
uniform sampler2D u_source;
uniform vec2 u_step;
out vec4 out_color;
const float WEIGHTS[5] = float[](0.227027, 0.1945946, 0.1216216, 0.054054, 0.016216);
void main() {
    vec4 sum = texture(u_source, v_uv) * WEIGHTS[0];
    for (int i = 1; i < 5; i++) {
        vec2 offset = u_step * float(i);
        sum += texture(u_source, v_uv + offset) * WEIGHTS[i];
        sum += texture(u_source, v_uv - offset) * WEIGHTS[i];
    }
    out_color = sum;
}
"#;

const COMPOSITE_FS: &str = r#"#version 300 es
precision highp float;
in vec2 v_uv;
uniform sampler2D u_scene;
uniform sampler2D u_bloom;
uniform float u_intensity;
out vec4 out_color;
void main() {
    vec4 base = texture(u_scene, v_uv);
    vec3 glow = texture(u_bloom, v_uv).rgb * u_intensity;
    float glow_alpha = dot(glow, vec3(0.2126, 0.7152, 0.0722));
    out_color = vec4(base.rgb + glow, clamp(max(base.a, glow_alpha), 0.0, 1.0));
}
"#;

const DOF_FS: &str = r#"#version 300 es
precision highp float;
in vec2 v_uv;
uniform sampler2D u_color;
uniform sampler2D u_depth;
uniform vec2 u_texel;
uniform float u_near;
uniform float u_far;
uniform float u_focal_distance;
uniform float u_focal_range;
uniform float u_max_blur;
out vec4 out_color;
float linear_depth(float d) {
    float z = d * 2.0 - 1.0;
    return 2.0 * u_near * u_far / (u_far + u_near - z * (u_far - u_near));
}
void main() {
    float depth = linear_depth(texture(u_depth, v_uv).r);
    float blur = clamp((abs(depth - u_focal_distance) - u_focal_range) / u_focal_range, 0.0, 1.0) * u_max_blur;
    vec4 sum = texture(u_color, v_uv);
    if (blur > 0.01) {
        for (int i = 0; i < 8; i++) {
            float a = float(i) * 0.785398;
            sum += texture(u_color, v_uv + vec2(cos(a), sin(a)) * u_texel * blur);
        }
        sum /= 9.0;
    }
    out_color = sum;
}
"#;

const POINT_SCALE: f32 = 24.0;

fn compile(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader> {
    let shader = gl.create_shader(kind).ok_or(VizError::GpuAllocation("shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if gl.get_shader_parameter(&shader, GL::COMPILE_STATUS).as_bool().unwrap_or(false) {
        Ok(shader)
    } else {
        let info = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(VizError::ShaderCompile(info))
    }
}

struct Program {
    program: WebGlProgram,
}

impl Program {
    fn link(gl: &GL, vertex: &str, fragment: &str) -> Result<Self> {
        let vs = compile(gl, GL::VERTEX_SHADER, vertex)?;
        let fs = compile(gl, GL::FRAGMENT_SHADER, fragment)?;
        let program = gl.create_program().ok_or(VizError::GpuAllocation("program"))?;
        gl.attach_shader(&program, &vs);
        gl.attach_shader(&program, &fs);
        gl.link_program(&program);
        gl.delete_shader(Some(&vs));
        gl.delete_shader(Some(&fs));
        if gl.get_program_parameter(&program, GL::LINK_STATUS).as_bool().unwrap_or(false) {
            Ok(Self { program })
        } else {
            let info = gl.get_program_info_log(&program).unwrap_or_default();
            gl.delete_program(Some(&program));
            Err(VizError::ProgramLink(info))
        }
    }

    fn bind(&self, gl: &GL) {
        gl.use_program(Some(&self.program));
    }

    fn uniform(&self, gl: &GL, name: &str) -> Option<WebGlUniformLocation> {
        gl.get_uniform_location(&self.program, name)
    }

    fn set_f32(&self, gl: &GL, name: &str, value: f32) {
        gl.uniform1f(self.uniform(gl, name).as_ref(), value);
    }

    fn set_vec2(&self, gl: &GL, name: &str, x: f32, y: f32) {
        gl.uniform2f(self.uniform(gl, name).as_ref(), x, y);
    }

    fn set_vec3(&self, gl: &GL, name: &str, v: Vec3) {
        gl.uniform3f(self.uniform(gl, name).as_ref(), v.x, v.y, v.z);
    }

    fn set_mat4(&self, gl: &GL, name: &str, m: &Mat4) {
        gl.uniform_matrix4fv_with_f32_array(self.uniform(gl, name).as_ref(), false, &m.to_cols_array());
    }

    fn set_sampler(&self, gl: &GL, name: &str, unit: u32, texture: &WebGlTexture) {
        gl.active_texture(GL::TEXTURE0 + unit);
        gl.bind_texture(GL::TEXTURE_2D, Some(texture));
        gl.uniform1i(self.uniform(gl, name).as_ref(), unit as i32);
    }

    fn delete(&self, gl: &GL) {
        gl.delete_program(Some(&self.program));
    }
}

/// Uploaded geometry: one VAO plus its buffers.
struct Mesh {
    vao: WebGlVertexArrayObject,
    buffers: Vec<WebGlBuffer>,
    mode: u32,
    count: i32,
    indexed: bool,
    lit: bool,
}

fn upload_attribute(gl: &GL, location: u32, data: &[f32]) -> Result<WebGlBuffer> {
    let buffer = gl.create_buffer().ok_or(VizError::GpuAllocation("vertex buffer"))?;
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
    let view = js_sys::Float32Array::from(data);
    gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &view, GL::STATIC_DRAW);
    gl.enable_vertex_attrib_array(location);
    gl.vertex_attrib_pointer_with_i32(location, 3, GL::FLOAT, false, 0, 0);
    Ok(buffer)
}

impl Mesh {
    fn upload(gl: &GL, geometry: &Geometry) -> Result<Self> {
        let vao = gl.create_vertex_array().ok_or(VizError::GpuAllocation("vertex array"))?;
        let mut buffers = Vec::with_capacity(3);
        gl.bind_vertex_array(Some(&vao));
        let filled = Self::fill(gl, geometry, &mut buffers);
        gl.bind_vertex_array(None);

        // Nothing half-uploaded outlives a failed attempt.
        let lit = match filled {
            Ok(lit) => lit,
            Err(err) => {
                for buffer in &buffers {
                    gl.delete_buffer(Some(buffer));
                }
                gl.delete_vertex_array(Some(&vao));
                return Err(err);
            }
        };

        let mode = match geometry.topology() {
            Topology::Triangles => GL::TRIANGLES,
            Topology::Lines => GL::LINES,
            Topology::Points => GL::POINTS,
        };
        Ok(Self {
            vao,
            buffers,
            mode,
            count: geometry.element_count() as i32,
            indexed: !geometry.indices().is_empty(),
            lit: lit && mode == GL::TRIANGLES,
        })
    }

    /// Uploads attributes and indices into the bound VAO, pushing every
    /// created buffer. Returns whether normals were supplied.
    fn fill(gl: &GL, geometry: &Geometry, buffers: &mut Vec<WebGlBuffer>) -> Result<bool> {
        let positions: Vec<f32> = geometry.positions().iter().flat_map(|p| p.to_array()).collect();
        buffers.push(upload_attribute(gl, 0, &positions)?);

        let lit = geometry.normals().len() == geometry.positions().len();
        if lit {
            let normals: Vec<f32> = geometry.normals().iter().flat_map(|n| n.to_array()).collect();
            buffers.push(upload_attribute(gl, 1, &normals)?);
        } else {
            gl.disable_vertex_attrib_array(1);
        }

        if !geometry.indices().is_empty() {
            let buffer = gl.create_buffer().ok_or(VizError::GpuAllocation("index buffer"))?;
            gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&buffer));
            buffers.push(buffer);
            let view = js_sys::Uint32Array::from(geometry.indices());
            gl.buffer_data_with_array_buffer_view(GL::ELEMENT_ARRAY_BUFFER, &view, GL::STATIC_DRAW);
        }
        Ok(lit)
    }

    fn draw(&self, gl: &GL) {
        gl.bind_vertex_array(Some(&self.vao));
        if self.indexed {
            gl.draw_elements_with_i32(self.mode, self.count, GL::UNSIGNED_INT, 0);
        } else {
            gl.draw_arrays(self.mode, 0, self.count);
        }
    }

    fn delete(&self, gl: &GL) {
        for buffer in &self.buffers {
            gl.delete_buffer(Some(buffer));
        }
        gl.delete_vertex_array(Some(&self.vao));
    }
}

fn texture(gl: &GL, format: u32, filter: u32, width: i32, height: i32) -> Result<WebGlTexture> {
    let texture = gl.create_texture().ok_or(VizError::GpuAllocation("texture"))?;
    gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
    gl.tex_storage_2d(GL::TEXTURE_2D, 1, format, width, height);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, filter as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, filter as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);
    Ok(texture)
}

/// Offscreen color target, optionally sharing a depth texture.
struct Target {
    framebuffer: WebGlFramebuffer,
    color: WebGlTexture,
    width: i32,
    height: i32,
}

impl Target {
    fn new(gl: &GL, width: i32, height: i32, depth: Option<&WebGlTexture>) -> Result<Self> {
        let color = texture(gl, GL::RGBA8, GL::LINEAR, width, height)?;
        let framebuffer = gl.create_framebuffer().ok_or(VizError::GpuAllocation("framebuffer"))?;
        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&framebuffer));
        gl.framebuffer_texture_2d(GL::FRAMEBUFFER, GL::COLOR_ATTACHMENT0, GL::TEXTURE_2D, Some(&color), 0);
        if let Some(depth) = depth {
            gl.framebuffer_texture_2d(GL::FRAMEBUFFER, GL::DEPTH_ATTACHMENT, GL::TEXTURE_2D, Some(depth), 0);
        }
        gl.bind_framebuffer(GL::FRAMEBUFFER, None);
        Ok(Self {
            framebuffer,
            color,
            width,
            height,
        })
    }

    fn bind(&self, gl: &GL) {
        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&self.framebuffer));
        gl.viewport(0, 0, self.width, self.height);
    }

    fn delete(&self, gl: &GL) {
        gl.delete_framebuffer(Some(&self.framebuffer));
        gl.delete_texture(Some(&self.color));
    }
}

/// Scene color + depth at full resolution, bloom ping-pong at half.
struct RenderTargets {
    depth: WebGlTexture,
    scene: Target,
    bright: Target,
    blur: Target,
    composite: Target,
}

impl RenderTargets {
    fn new(gl: &GL, size: SurfaceSize) -> Result<Self> {
        let width = size.pixel_width() as i32;
        let height = size.pixel_height() as i32;
        let half_w = (width / 2).max(1);
        let half_h = (height / 2).max(1);
        let depth = texture(gl, GL::DEPTH_COMPONENT24, GL::NEAREST, width, height)?;
        Ok(Self {
            scene: Target::new(gl, width, height, Some(&depth))?,
            bright: Target::new(gl, half_w, half_h, None)?,
            blur: Target::new(gl, half_w, half_h, None)?,
            composite: Target::new(gl, width, height, None)?,
            depth,
        })
    }

    fn delete(&self, gl: &GL) {
        for target in [&self.scene, &self.bright, &self.blur, &self.composite] {
            target.delete(gl);
        }
        gl.delete_texture(Some(&self.depth));
    }
}

/// WebGL2 implementation of the scene, bloom and depth-of-field passes.
/// Geometry is uploaded lazily on first draw and freed when released.
pub struct WebGlBackend {
    gl: GL,
    canvas: HtmlCanvasElement,
    scene: Program,
    bright: Program,
    blur: Program,
    composite: Program,
    dof: Program,
    quad: WebGlVertexArrayObject,
    meshes: HashMap<ResourceId, Mesh>,
    targets: Option<RenderTargets>,
    released: bool,
}

impl WebGlBackend {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self> {
        let gl: GL = canvas
            .get_context("webgl2")?
            .ok_or(VizError::ContextUnavailable)?
            .dyn_into()
            .map_err(|_| VizError::ContextUnavailable)?;

        let scene = Program::link(&gl, SCENE_VS, SCENE_FS)?;
        let bright = Program::link(&gl, POST_VS, BRIGHT_FS)?;
        let blur = Program::link(&gl, POST_VS, BLUR_FS)?;
        let composite = Program::link(&gl, POST_VS, COMPOSITE_FS)?;
        let dof = Program::link(&gl, POST_VS, DOF_FS)?;
        let quad = gl.create_vertex_array().ok_or(VizError::GpuAllocation("vertex array"))?;
        gl.vertex_attrib3f(1, 0.0, 0.0, 1.0);

        Ok(Self {
            gl,
            canvas: canvas.clone(),
            scene,
            bright,
            blur,
            composite,
            dof,
            quad,
            meshes: HashMap::new(),
            targets: None,
            released: false,
        })
    }

    fn fullscreen(&self, target: Option<&Target>) {
        match target {
            Some(target) => target.bind(&self.gl),
            None => {
                self.gl.bind_framebuffer(GL::FRAMEBUFFER, None);
                self.gl.viewport(0, 0, self.canvas.width() as i32, self.canvas.height() as i32);
            }
        }
        self.gl.bind_vertex_array(Some(&self.quad));
        self.gl.draw_arrays(GL::TRIANGLES, 0, 3);
    }

    fn apply_material(gl: &GL, program: &Program, material: &Material, opacity: f32, lit: bool, mode: u32) {
        program.set_vec3(gl, "u_color", material.color);
        program.set_vec3(gl, "u_emissive", material.emissive * material.emissive_intensity);
        program.set_f32(gl, "u_opacity", opacity);
        program.set_f32(gl, "u_lit", if lit { 1.0 } else { 0.0 });
        let points = mode == GL::POINTS;
        program.set_f32(gl, "u_round", if points { 1.0 } else { 0.0 });
        program.set_f32(gl, "u_point_size", material.point_size * POINT_SCALE);

        if material.additive {
            gl.blend_func_separate(GL::SRC_ALPHA, GL::ONE, GL::ONE, GL::ONE);
        } else {
            gl.blend_func_separate(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA, GL::ONE, GL::ONE_MINUS_SRC_ALPHA);
        }
        gl.depth_mask(!material.transparent);
    }
}

impl ReleaseSink for WebGlBackend {
    fn release(&mut self, kind: ResourceKind, id: ResourceId) {
        // Materials live in uniforms only.
        if kind == ResourceKind::Geometry {
            if let Some(mesh) = self.meshes.remove(&id) {
                mesh.delete(&self.gl);
            }
        }
    }
}

impl RenderBackend for WebGlBackend {
    fn resize(&mut self, size: SurfaceSize) {
        self.canvas.set_width(size.pixel_width());
        self.canvas.set_height(size.pixel_height());
        if let Some(old) = self.targets.take() {
            old.delete(&self.gl);
        }
        match RenderTargets::new(&self.gl, size) {
            Ok(targets) => self.targets = Some(targets),
            Err(err) => log::warn!("render targets unavailable: {err}"),
        }
    }

    fn scene_pass(&mut self, frame: &FrameView<'_>) -> PassStats {
        let Some(targets) = self.targets.as_ref() else {
            return PassStats::default();
        };
        let gl = &self.gl;
        targets.scene.bind(gl);
        gl.depth_mask(true);
        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);
        gl.enable(GL::DEPTH_TEST);
        gl.enable(GL::BLEND);

        let program = &self.scene;
        program.bind(gl);
        program.set_mat4(gl, "u_view_projection", &frame.view_projection);

        let meshes = &mut self.meshes;
        let mut stats = PassStats::default();
        for layer in frame.layers {
            layer.walk(Mat4::IDENTITY, &mut |_, surface, world| {
                let opacity = surface.material.effective_opacity();
                if opacity <= 0.0 || surface.geometry.is_disposed() {
                    return;
                }
                let mesh = match meshes.entry(surface.geometry.id()) {
                    Entry::Occupied(entry) => entry.into_mut(),
                    Entry::Vacant(entry) => match Mesh::upload(gl, &surface.geometry) {
                        Ok(mesh) => entry.insert(mesh),
                        Err(err) => {
                            log::warn!("skipping surface: {err}");
                            return;
                        }
                    },
                };
                program.set_mat4(gl, "u_model", &world);
                Self::apply_material(gl, program, &surface.material, opacity, mesh.lit, mesh.mode);
                mesh.draw(gl);
                stats.draw_calls += 1;
                stats.primitives += mesh.count as u32;
            });
        }
        gl.depth_mask(true);
        gl.bind_vertex_array(None);
        stats
    }

    fn bloom_pass(&mut self, settings: &BloomSettings) -> PassStats {
        let Some(targets) = self.targets.as_ref() else {
            return PassStats::default();
        };
        let gl = &self.gl;
        gl.disable(GL::DEPTH_TEST);
        gl.disable(GL::BLEND);

        self.bright.bind(gl);
        self.bright.set_sampler(gl, "u_source", 0, &targets.scene.color);
        self.bright.set_f32(gl, "u_threshold", settings.threshold);
        self.fullscreen(Some(&targets.bright));

        let texel_x = settings.radius / targets.bright.width as f32;
        let texel_y = settings.radius / targets.bright.height as f32;
        self.blur.bind(gl);
        self.blur.set_sampler(gl, "u_source", 0, &targets.bright.color);
        self.blur.set_vec2(gl, "u_step", texel_x, 0.0);
        self.fullscreen(Some(&targets.blur));
        self.blur.set_sampler(gl, "u_source", 0, &targets.blur.color);
        self.blur.set_vec2(gl, "u_step", 0.0, texel_y);
        self.fullscreen(Some(&targets.bright));

        self.composite.bind(gl);
        self.composite.set_sampler(gl, "u_scene", 0, &targets.scene.color);
        self.composite.set_sampler(gl, "u_bloom", 1, &targets.bright.color);
        self.composite.set_f32(gl, "u_intensity", settings.intensity);
        self.fullscreen(Some(&targets.composite));

        PassStats {
            draw_calls: 4,
            primitives: 12,
        }
    }

    fn depth_of_field_pass(&mut self, settings: &DepthOfFieldSettings, camera: &Camera) -> PassStats {
        let Some(targets) = self.targets.as_ref() else {
            return PassStats::default();
        };
        let gl = &self.gl;
        gl.bind_framebuffer(GL::FRAMEBUFFER, None);
        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        gl.clear(GL::COLOR_BUFFER_BIT);

        self.dof.bind(gl);
        self.dof.set_sampler(gl, "u_color", 0, &targets.composite.color);
        self.dof.set_sampler(gl, "u_depth", 1, &targets.depth);
        self.dof
            .set_vec2(gl, "u_texel", 1.0 / targets.composite.width as f32, 1.0 / targets.composite.height as f32);
        self.dof.set_f32(gl, "u_near", camera.znear);
        self.dof.set_f32(gl, "u_far", camera.zfar);
        self.dof.set_f32(gl, "u_focal_distance", settings.focal_distance);
        self.dof.set_f32(gl, "u_focal_range", settings.focal_range.max(f32::EPSILON));
        self.dof.set_f32(gl, "u_max_blur", settings.max_blur);
        self.fullscreen(None);
        gl.bind_vertex_array(None);

        PassStats {
            draw_calls: 1,
            primitives: 3,
        }
    }

    fn release_all(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        let gl = &self.gl;
        for (_, mesh) in self.meshes.drain() {
            mesh.delete(gl);
        }
        if let Some(targets) = self.targets.take() {
            targets.delete(gl);
        }
        for program in [&self.scene, &self.bright, &self.blur, &self.composite, &self.dof] {
            program.delete(gl);
        }
        gl.delete_vertex_array(Some(&self.quad));

        if let Ok(Some(ext)) = gl.get_extension("WEBGL_lose_context") {
            ext.unchecked_into::<WebglLoseContext>().lose_context();
        }
    }
}
