//! Provides the glTF/GLB loader.
//!
//! Binary GLB and embedded JSON glTF are both accepted. Buffers and images
//! must be contained in the blob (GLB binary chunk or data URIs); external
//! references resolve to empty buffers and their primitives are skipped.
//!
//! # Examples
//! ```
//! use shapecast::formats::gltf::{is_glb, load_gltf};
//!
//! assert!(is_glb(b"glTF\x02\x00\x00\x00"));
//! assert!(load_gltf(b"glTF").is_err());
//! ```

use std::sync::Arc;

use crate::codec;

use super::{LoadError, LoadResult, Mat4, ModelData, TextureData, Triangle, Vec2, Vec3};

/// Checks for the GLB magic bytes.
pub fn is_glb(data: &[u8]) -> bool {
    data.starts_with(b"glTF")
}

/// Loads triangles from GLB or embedded glTF bytes.
///
/// # Errors
/// Returns an error if the data is not valid glTF or contains no triangles.
pub fn load_gltf(data: &[u8]) -> LoadResult {
    // Fully self-contained files go through the standard importer
    if let Ok((document, buffers, images)) = gltf::import_slice(data) {
        return load_from_document(document, buffers, images);
    }

    let gltf_data = gltf::Gltf::from_slice(data)
        .map_err(|e| LoadError::InvalidData(format!("Failed to parse glTF: {}", e)))?;
    let document = gltf_data.document;

    let buffers: Vec<gltf::buffer::Data> = document
        .buffers()
        .map(|buffer| {
            let bytes = match buffer.source() {
                gltf::buffer::Source::Bin => gltf_data.blob.clone().unwrap_or_default(),
                gltf::buffer::Source::Uri(uri) => codec::decode_data_url(uri).unwrap_or_default(),
            };
            gltf::buffer::Data(bytes)
        })
        .collect();

    // Images are matched to textures by index, so keep a slot for every image
    let images: Vec<Option<gltf::image::Data>> = document
        .images()
        .map(|image| match image.source() {
            gltf::image::Source::View { view, .. } => {
                let buffer = buffers.get(view.buffer().index())?;
                let start = view.offset();
                let bytes = buffer.0.get(start..start + view.length())?;
                decode_image_data(bytes)
            }
            gltf::image::Source::Uri { uri, .. } => {
                decode_image_data(&codec::decode_data_url(uri)?)
            }
        })
        .collect();

    build_model(&document, &buffers, images)
}

fn load_from_document(
    document: gltf::Document,
    buffers: Vec<gltf::buffer::Data>,
    images: Vec<gltf::image::Data>,
) -> LoadResult {
    build_model(&document, &buffers, images.into_iter().map(Some).collect())
}

const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

fn build_model(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
    images: Vec<Option<gltf::image::Data>>,
) -> LoadResult {
    let textures: Vec<Option<Arc<TextureData>>> = document
        .textures()
        .map(|tex| {
            let img = images.get(tex.source().index())?.as_ref()?;
            Some(Arc::new(TextureData {
                width: img.width,
                height: img.height,
                data: convert_to_rgba(&img.pixels, img.format),
            }))
        })
        .collect();

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or(LoadError::NoGeometry)?;

    let mut triangles = Vec::new();
    for node in scene.nodes() {
        extract_node_triangles(&node, buffers, &textures, &mut triangles, IDENTITY);
    }

    if triangles.is_empty() {
        return Err(LoadError::NoGeometry);
    }

    log::debug!("Loaded {} triangles", triangles.len());
    Ok(ModelData { triangles })
}

/// Recursively walks the scene graph and collects world-space triangles.
fn extract_node_triangles(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    textures: &[Option<Arc<TextureData>>],
    triangles: &mut Vec<Triangle>,
    parent_transform: Mat4,
) {
    let world = mat4_mul(parent_transform, node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                continue;
            }

            let reader = primitive.reader(|buffer| {
                buffers
                    .get(buffer.index())
                    .map(|d| d.0.as_slice())
                    .filter(|bytes| !bytes.is_empty())
            });

            let positions: Vec<Vec3> = match reader.read_positions() {
                Some(iter) => iter.collect(),
                None => continue,
            };

            let uvs: Vec<Vec2> = reader
                .read_tex_coords(0)
                .map(|iter| iter.into_f32().collect())
                .unwrap_or_default();

            let pbr = primitive.material().pbr_metallic_roughness();
            let factor = pbr.base_color_factor();
            let material_color = [factor[0], factor[1], factor[2]];

            let texture = pbr
                .base_color_texture()
                .and_then(|info| textures.get(info.texture().index()).cloned().flatten());

            let vertex_colors: Option<Vec<[f32; 4]>> = reader
                .read_colors(0)
                .map(|iter| iter.into_rgba_f32().collect());

            let indices: Vec<u32> = match reader.read_indices() {
                Some(iter) => iter.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };

            for tri in indices.chunks_exact(3) {
                let idx = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
                if idx.iter().any(|&i| i >= positions.len()) {
                    continue;
                }

                let verts = idx.map(|i| transform_point(world, positions[i]));
                let tri_uvs = idx.map(|i| uvs.get(i).copied().unwrap_or([0.0, 0.0]));

                // Vertex colors are averaged per face and tint the material color
                let color = match &vertex_colors {
                    Some(vc) => {
                        let mut avg = [0.0_f32; 3];
                        for &i in &idx {
                            let c = vc.get(i).copied().unwrap_or([1.0; 4]);
                            for ch in 0..3 {
                                avg[ch] += c[ch] / 3.0;
                            }
                        }
                        [
                            avg[0] * material_color[0],
                            avg[1] * material_color[1],
                            avg[2] * material_color[2],
                        ]
                    }
                    None => material_color,
                };

                triangles.push(Triangle {
                    verts,
                    uvs: tri_uvs,
                    color,
                    texture: texture.clone(),
                });
            }
        }
    }

    for child in node.children() {
        extract_node_triangles(&child, buffers, textures, triangles, world);
    }
}

/// Decodes embedded PNG/JPEG image bytes to RGBA pixels.
fn decode_image_data(data: &[u8]) -> Option<gltf::image::Data> {
    let rgba = image::load_from_memory(data).ok()?.to_rgba8();
    let (width, height) = rgba.dimensions();

    Some(gltf::image::Data {
        width,
        height,
        format: gltf::image::Format::R8G8B8A8,
        pixels: rgba.into_raw(),
    })
}

/// Converts 8-bit pixel data to RGBA. Wider formats become opaque white.
fn convert_to_rgba(pixels: &[u8], format: gltf::image::Format) -> Vec<u8> {
    use gltf::image::Format;
    match format {
        Format::R8G8B8A8 => pixels.to_vec(),
        Format::R8G8B8 => pixels
            .chunks_exact(3)
            .flat_map(|c| [c[0], c[1], c[2], 255])
            .collect(),
        Format::R8G8 => pixels
            .chunks_exact(2)
            .flat_map(|c| [c[0], c[1], 0, 255])
            .collect(),
        Format::R8 => pixels.iter().flat_map(|&g| [g, g, g, 255]).collect(),
        Format::R16 => vec![255u8; pixels.len() / 2 * 4],
        Format::R16G16 => vec![255u8; pixels.len() / 4 * 4],
        Format::R16G16B16 => vec![255u8; pixels.len() / 6 * 4],
        Format::R16G16B16A16 => vec![255u8; pixels.len() / 8 * 4],
        Format::R32G32B32FLOAT => vec![255u8; pixels.len() / 12 * 4],
        Format::R32G32B32A32FLOAT => vec![255u8; pixels.len() / 16 * 4],
    }
}

// Linear algebra helpers

fn transform_point(m: Mat4, p: Vec3) -> Vec3 {
    let x = m[0][0] * p[0] + m[1][0] * p[1] + m[2][0] * p[2] + m[3][0];
    let y = m[0][1] * p[0] + m[1][1] * p[1] + m[2][1] * p[2] + m[3][1];
    let z = m[0][2] * p[0] + m[1][2] * p[1] + m[2][2] * p[2] + m[3][2];
    let w = m[0][3] * p[0] + m[1][3] * p[1] + m[2][3] * p[2] + m[3][3];
    if w.abs() < 1e-10 {
        [x, y, z]
    } else {
        [x / w, y / w, z / w]
    }
}

fn mat4_mul(a: Mat4, b: Mat4) -> Mat4 {
    let mut r = [[0.0_f32; 4]; 4];
    for col in 0..4 {
        for row in 0..4 {
            r[col][row] = (0..4).map(|k| a[k][row] * b[col][k]).sum();
        }
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_detection() {
        assert!(is_glb(b"glTF\x02\x00\x00\x00"));
        assert!(!is_glb(b"glT"));
        assert!(!is_glb(b"{\"asset\":{}}"));
    }

    #[test]
    fn test_truncated_glb_is_invalid() {
        assert!(matches!(load_gltf(b"glTF"), Err(LoadError::InvalidData(_))));
    }

    #[test]
    fn test_json_without_scene_has_no_geometry() {
        let json = br#"{"asset":{"version":"2.0"}}"#;
        assert_eq!(load_gltf(json).unwrap_err(), LoadError::NoGeometry);
    }

    #[test]
    fn test_mat4_mul_translation() {
        let mut t = IDENTITY;
        t[3] = [1.0, 2.0, 3.0, 1.0];
        let m = mat4_mul(t, t);
        assert_eq!(transform_point(m, [0.0, 0.0, 0.0]), [2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_convert_rgb_to_rgba() {
        let rgba = convert_to_rgba(&[1, 2, 3, 4, 5, 6], gltf::image::Format::R8G8B8);
        assert_eq!(rgba, vec![1, 2, 3, 255, 4, 5, 6, 255]);
    }
}
