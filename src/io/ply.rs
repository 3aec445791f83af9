//! ASCII PLY export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::error::Result;

/// Save vertices and triangles to an ASCII PLY file.
pub fn save<P: AsRef<Path>>(positions: &[Point3<f64>], triangles: &[[usize; 3]], path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write(&mut writer, positions, triangles)?;
    writer.flush()?;
    Ok(())
}

/// Write a PLY document to any writer.
pub fn write<W: Write>(writer: &mut W, positions: &[Point3<f64>], triangles: &[[usize; 3]]) -> Result<()> {
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by amigurumi")?;
    writeln!(writer, "element vertex {}", positions.len())?;
    writeln!(writer, "property float x")?;
    writeln!(writer, "property float y")?;
    writeln!(writer, "property float z")?;
    writeln!(writer, "element face {}", triangles.len())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    for p in positions {
        writeln!(writer, "{} {} {}", p.x, p.y, p.z)?;
    }
    for [a, b, c] in triangles {
        writeln!(writer, "3 {} {} {}", a, b, c)?;
    }
    Ok(())
}
