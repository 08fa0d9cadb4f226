//! Provides the software rasterizer behind the model viewer canvas.
//!
//! Triangles are projected through a perspective camera, shaded per face with
//! an ambient term plus one point light, and resolved with a z-buffer.
//! No GPU is required; it runs entirely on the CPU.
//!
//! # Examples
//! ```
//! use shapecast::formats::ModelData;
//! use shapecast::renderer::{render_scene, Camera, Lighting};
//!
//! let frame = render_scene(&ModelData::default(), &Camera::default(), &Lighting::default(), 8, 8);
//! assert_eq!(frame.pixels().len(), 8 * 8 * 4);
//! ```

use std::path::Path;

use glam::{Mat4, Vec3, Vec4};

use crate::formats::{ModelData, Triangle};

/// Canvas background color (RGB, 0..1).
pub const BACKGROUND: [f32; 3] = [249.0 / 255.0, 250.0 / 255.0, 251.0 / 255.0];

/// A perspective camera looking at a target point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(2.0, 2.0, 2.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_degrees: 50.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    /// Returns the combined projection and view matrix for an aspect ratio.
    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.target, self.up);
        let proj = Mat4::perspective_rh_gl(self.fov_y_degrees.to_radians(), aspect, self.near, self.far);
        proj * view
    }
}

/// A light radiating from a point in all directions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub intensity: f32,
}

/// Scene lighting: uniform ambient light plus one point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient: f32,
    pub point: PointLight,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: 0.5,
            point: PointLight {
                position: Vec3::new(10.0, 10.0, 10.0),
                intensity: 1.0,
            },
        }
    }
}

impl Lighting {
    /// Returns the brightness of a face given its normal and centroid.
    /// Faces are lit from both sides.
    pub fn shade(&self, normal: Vec3, centroid: Vec3) -> f32 {
        let to_light = (self.point.position - centroid).normalize_or_zero();
        let diffuse = normal.dot(to_light).abs() * self.point.intensity;
        self.ambient + diffuse
    }
}

/// A rendered RGBA8 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Frame {
    /// Returns the width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the row-major RGBA bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the RGBA value at `(x, y)`, if inside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 4) as usize;
        let px = self.pixels.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Writes the frame as a PNG file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be encoded or written.
    pub fn save_png(&self, path: &Path) -> image::ImageResult<()> {
        image::save_buffer(
            path,
            &self.pixels,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
        )
    }
}

/// Renders a model as seen from `camera` under `lighting`.
pub fn render_scene(
    model: &ModelData,
    camera: &Camera,
    lighting: &Lighting,
    width: u32,
    height: u32,
) -> Frame {
    let w = width as usize;
    let h = height as usize;
    let background = [BACKGROUND[0], BACKGROUND[1], BACKGROUND[2], 1.0];
    let mut color_buf = vec![background; w * h];
    let mut depth_buf = vec![f32::INFINITY; w * h];

    if w > 0 && h > 0 {
        let view_proj = camera.view_proj(width as f32 / height as f32);
        for tri in &model.triangles {
            rasterize_triangle(
                tri,
                view_proj,
                lighting,
                (w, h),
                &mut color_buf,
                &mut depth_buf,
            );
        }
    }

    // ---- Convert f32 → u8 RGBA ----
    let pixels = color_buf
        .iter()
        .flat_map(|c| c.map(|ch| (ch.clamp(0.0, 1.0) * 255.0).round() as u8))
        .collect();

    Frame {
        width,
        height,
        pixels,
    }
}

fn rasterize_triangle(
    tri: &Triangle,
    view_proj: Mat4,
    lighting: &Lighting,
    (w, h): (usize, usize),
    color_buf: &mut [[f32; 4]],
    depth_buf: &mut [f32],
) {
    let mut screen = [Vec3::ZERO; 3];

    for i in 0..3 {
        let clip: Vec4 = view_proj * Vec3::from_array(tri.verts[i]).extend(1.0);

        // Behind the camera; no near-plane clipping
        if clip.w <= 0.0 {
            return;
        }

        let inv_w = 1.0 / clip.w;
        screen[i] = Vec3::new(
            (clip.x * inv_w * 0.5 + 0.5) * w as f32,
            (0.5 - clip.y * inv_w * 0.5) * h as f32,
            clip.z * inv_w,
        );
    }

    // Flat shading from the world-space face normal
    let v0 = Vec3::from_array(tri.verts[0]);
    let v1 = Vec3::from_array(tri.verts[1]);
    let v2 = Vec3::from_array(tri.verts[2]);
    let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
    let shade = lighting.shade(normal, (v0 + v1 + v2) / 3.0);

    // Screen-space bounding box
    let min_x = screen[0].x.min(screen[1].x).min(screen[2].x).max(0.0) as usize;
    let max_x = (screen[0].x.max(screen[1].x).max(screen[2].x).ceil().max(0.0) as usize).min(w);
    let min_y = screen[0].y.min(screen[1].y).min(screen[2].y).max(0.0) as usize;
    let max_y = (screen[0].y.max(screen[1].y).max(screen[2].y).ceil().max(0.0) as usize).min(h);

    for y in min_y..max_y {
        for x in min_x..max_x {
            let (u, v, wb) = barycentric(screen, x as f32 + 0.5, y as f32 + 0.5);
            if u < 0.0 || v < 0.0 || wb < 0.0 {
                continue;
            }

            let z = u * screen[0].z + v * screen[1].z + wb * screen[2].z;
            let idx = y * w + x;
            if z >= depth_buf[idx] {
                continue;
            }

            let (base, alpha) = match &tri.texture {
                Some(tex) => {
                    let tex_u = u * tri.uvs[0][0] + v * tri.uvs[1][0] + wb * tri.uvs[2][0];
                    let tex_v = u * tri.uvs[0][1] + v * tri.uvs[1][1] + wb * tri.uvs[2][1];
                    let s = tex.sample(tex_u, tex_v);
                    (
                        [s[0] * tri.color[0], s[1] * tri.color[1], s[2] * tri.color[2]],
                        s[3],
                    )
                }
                None => (tri.color, 1.0),
            };

            // Alpha cutoff
            if alpha < 0.5 {
                continue;
            }

            depth_buf[idx] = z;
            color_buf[idx] = [
                (base[0] * shade).min(1.0),
                (base[1] * shade).min(1.0),
                (base[2] * shade).min(1.0),
                1.0,
            ];
        }
    }
}

fn barycentric(tri: [Vec3; 3], px: f32, py: f32) -> (f32, f32, f32) {
    let v0x = tri[1].x - tri[0].x;
    let v0y = tri[1].y - tri[0].y;
    let v1x = tri[2].x - tri[0].x;
    let v1y = tri[2].y - tri[0].y;
    let v2x = px - tri[0].x;
    let v2y = py - tri[0].y;

    let d00 = v0x * v0x + v0y * v0y;
    let d01 = v0x * v1x + v0y * v1y;
    let d11 = v1x * v1x + v1y * v1y;
    let d20 = v2x * v0x + v2y * v0y;
    let d21 = v2x * v1x + v2y * v1y;

    let denom = d00 * d11 - d01 * d01;
    if denom.abs() < 1e-10 {
        return (-1.0, -1.0, -1.0);
    }

    let inv = 1.0 / denom;
    let v = (d11 * d20 - d01 * d21) * inv;
    let w = (d00 * d21 - d01 * d20) * inv;
    (1.0 - v - w, v, w)
}
