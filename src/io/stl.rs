//! Binary STL export.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use nalgebra::{Point3, Vector3};

use crate::error::{PatternError, Result};

/// Save triangles to a binary STL file.
///
/// Degenerate triangles are written with a zero normal.
pub fn save<P: AsRef<Path>>(positions: &[Point3<f64>], triangles: &[[usize; 3]], path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let triangles: Vec<stl_io::Triangle> = triangles
        .iter()
        .map(|&[a, b, c]| {
            let (p0, p1, p2) = (&positions[a], &positions[b], &positions[c]);
            let n = (p1 - p0)
                .cross(&(p2 - p0))
                .try_normalize(1e-12)
                .unwrap_or_else(Vector3::zeros);

            stl_io::Triangle {
                normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [
                    stl_io::Vertex::new([p0.x as f32, p0.y as f32, p0.z as f32]),
                    stl_io::Vertex::new([p1.x as f32, p1.y as f32, p1.z as f32]),
                    stl_io::Vertex::new([p2.x as f32, p2.y as f32, p2.z as f32]),
                ],
            }
        })
        .collect();

    stl_io::write_stl(&mut writer, triangles.iter()).map_err(|e| PatternError::Export {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(())
}
