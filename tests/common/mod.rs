//! Shared fixtures: tiny glTF models and image files built in memory.

#![allow(dead_code)]

use std::path::PathBuf;

use serde_json::json;

/// Vertices of a triangle around the origin in the z = 0 plane.
pub const TRIANGLE: [[f32; 3]; 3] = [[-0.5, -0.5, 0.0], [0.5, -0.5, 0.0], [0.0, 0.5, 0.0]];

pub const RED: [f32; 4] = [0.8, 0.1, 0.1, 1.0];
pub const BLUE: [f32; 4] = [0.1, 0.1, 0.8, 1.0];

fn triangle_bin() -> Vec<u8> {
    TRIANGLE
        .iter()
        .flatten()
        .flat_map(|f| f.to_le_bytes())
        .collect()
}

/// glTF JSON for one colored triangle whose node is moved by `translation`.
/// The buffer `uri` is omitted for GLB use.
pub fn triangle_document(color: [f32; 4], translation: [f32; 3], uri: Option<String>) -> String {
    let mut buffer = json!({ "byteLength": 36 });
    if let Some(uri) = uri {
        buffer["uri"] = json!(uri);
    }

    json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "mesh": 0, "translation": translation }],
        "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 }, "material": 0 }] }],
        "materials": [{ "pbrMetallicRoughness": { "baseColorFactor": color } }],
        "accessors": [{
            "bufferView": 0,
            "componentType": 5126,
            "count": 3,
            "type": "VEC3",
            "min": [-0.5, -0.5, 0.0],
            "max": [0.5, 0.5, 0.0]
        }],
        "bufferViews": [{ "buffer": 0, "byteLength": 36 }],
        "buffers": [buffer]
    })
    .to_string()
}

/// Packs a JSON chunk and an optional binary chunk into a GLB container.
pub fn pack_glb(json: &str, bin: &[u8]) -> Vec<u8> {
    let mut json = json.as_bytes().to_vec();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let mut bin = bin.to_vec();
    while bin.len() % 4 != 0 {
        bin.push(0);
    }

    let bin_chunk = if bin.is_empty() { 0 } else { 8 + bin.len() };
    let total = 12 + 8 + json.len() + bin_chunk;
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(&0x4E4F_534Au32.to_le_bytes());
    out.extend_from_slice(&json);
    if !bin.is_empty() {
        out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        out.extend_from_slice(&0x004E_4942u32.to_le_bytes());
        out.extend_from_slice(&bin);
    }
    out
}

/// A GLB with one colored triangle at the origin.
pub fn triangle_glb(color: [f32; 4]) -> Vec<u8> {
    pack_glb(&triangle_document(color, [0.0; 3], None), &triangle_bin())
}

/// A GLB with one triangle moved by `translation`.
pub fn translated_glb(translation: [f32; 3]) -> Vec<u8> {
    pack_glb(&triangle_document(RED, translation, None), &triangle_bin())
}

/// A JSON glTF whose buffer is an embedded data URI.
pub fn embedded_gltf(color: [f32; 4]) -> Vec<u8> {
    let uri = shapecast::codec::encode_data_url("application/octet-stream", &triangle_bin());
    triangle_document(color, [0.0; 3], Some(uri)).into_bytes()
}

/// Base64 payload of [`triangle_glb`], as the generation service returns it.
pub fn triangle_payload(color: [f32; 4]) -> String {
    shapecast::codec::encode_base64(&triangle_glb(color))
}

/// Writes a 2x2 image into a fresh temp directory and returns its path.
pub fn write_image(test_name: &str, file_name: &str) -> PathBuf {
    use image::{ImageBuffer, Rgba};

    let dir = std::env::temp_dir().join(format!(
        "shapecast-{}-{}",
        test_name,
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).expect("Failed to create temp dir");
    let path = dir.join(file_name);

    let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_pixel(2, 2, Rgba([200, 120, 40, 255]));
    let format = if file_name.ends_with(".png") {
        image::ImageFormat::Png
    } else {
        image::ImageFormat::Jpeg
    };
    let img = image::DynamicImage::ImageRgba8(img).to_rgb8();
    img.save_with_format(&path, format).expect("Failed to write test image");
    path
}
