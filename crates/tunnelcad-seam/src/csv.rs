//! Grid point CSV files: `Index,X,Y,Z`, coordinates to 4 decimals.

use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;
use tunnelcad_math::Point3;

use crate::plan::GridPoint;
use crate::{Result, SeamError};

/// Header row of a grid file.
pub const CSV_HEADER: &str = "Index,X,Y,Z";

/// Write grid points to any writer.
pub fn write_grid_csv<W: Write>(mut writer: W, points: &[GridPoint]) -> std::io::Result<()> {
    writeln!(writer, "{CSV_HEADER}")?;
    for gp in points {
        let p = &gp.point;
        writeln!(writer, "{},{:.4},{:.4},{:.4}", gp.index, p.x, p.y, p.z)?;
    }
    writer.flush()
}

/// Write grid points to a file.
pub fn write_grid_csv_file(path: impl AsRef<Path>, points: &[GridPoint]) -> Result<()> {
    let path = path.as_ref();
    let io_err = |source: std::io::Error| SeamError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    write_grid_csv(BufWriter::new(file), points).map_err(io_err)?;
    info!(path = %path.display(), points = points.len(), "grid points exported");
    Ok(())
}

/// Read grid points back.
pub fn read_grid_csv<R: BufRead>(reader: R) -> Result<Vec<GridPoint>> {
    let mut points = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let number = i + 1;
        let line = line.map_err(|source| SeamError::Io {
            path: PathBuf::new(),
            source,
        })?;
        let line = line.trim();
        if number == 1 {
            if line != CSV_HEADER {
                return Err(SeamError::Csv {
                    line: number,
                    message: format!("expected header '{CSV_HEADER}', found '{line}'"),
                });
            }
            continue;
        }
        if line.is_empty() {
            continue;
        }
        points.push(parse_row(line).map_err(|message| SeamError::Csv {
            line: number,
            message,
        })?);
    }
    Ok(points)
}

fn parse_row(line: &str) -> std::result::Result<GridPoint, String> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 4 {
        return Err(format!("expected 4 fields, found {}", fields.len()));
    }
    let index = fields[0]
        .parse::<usize>()
        .map_err(|e| format!("bad index '{}': {e}", fields[0]))?;
    let mut coords = [0.0; 3];
    for (slot, field) in coords.iter_mut().zip(&fields[1..]) {
        *slot = field
            .parse::<f64>()
            .map_err(|e| format!("bad coordinate '{field}': {e}"))?;
    }
    Ok(GridPoint {
        index,
        point: Point3::new(coords[0], coords[1], coords[2]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::plan_coal_seam;
    use crate::spec::sample_spec;
    use crate::CoalSeamSpec;
    use approx::assert_relative_eq;
    use tunnelcad_math::Vec3;

    #[test]
    fn test_format() {
        let points = [GridPoint {
            index: 1,
            point: Point3::new(1.0, -2.5, 1.0 / 3.0),
        }];
        let mut out = Vec::new();
        write_grid_csv(&mut out, &points).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Index,X,Y,Z\n1,1.0000,-2.5000,0.3333\n");
    }

    #[test]
    fn test_round_trip_tilted_grid() {
        let spec = CoalSeamSpec {
            origin: Point3::new(512.25, -81.5, 33.0),
            x_axis: Vec3::new(1.0, 1.0, 0.0),
            y_axis: Vec3::new(-1.0, 1.0, 0.0),
            towards: 7.5,
            angle_x: 12.0,
            angle_y: -35.0,
            ..sample_spec()
        };
        let plan = plan_coal_seam(&spec).unwrap();
        let mut out = Vec::new();
        write_grid_csv(&mut out, &plan.grid_points).unwrap();

        let back = read_grid_csv(out.as_slice()).unwrap();
        assert_eq!(back.len(), plan.grid_points.len());
        for (a, b) in plan.grid_points.iter().zip(&back) {
            assert_eq!(a.index, b.index);
            assert_relative_eq!(a.point, b.point, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_wrong_header_rejected() {
        let err = read_grid_csv("id,x,y,z\n1,0,0,0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SeamError::Csv { line: 1, .. }));
    }

    #[test]
    fn test_malformed_row_rejected() {
        let text = "Index,X,Y,Z\n1,0,0,0\n2,1.0,abc,0\n";
        let err = read_grid_csv(text.as_bytes()).unwrap_err();
        assert!(matches!(err, SeamError::Csv { line: 3, .. }));

        let short = "Index,X,Y,Z\n1,0,0\n";
        assert!(matches!(
            read_grid_csv(short.as_bytes()),
            Err(SeamError::Csv { line: 2, .. })
        ));
    }

    #[test]
    fn test_file_export() {
        let path = std::env::temp_dir().join(format!("tunnelcad-grid-{}.csv", std::process::id()));
        let plan = plan_coal_seam(&sample_spec()).unwrap();
        write_grid_csv_file(&path, &plan.grid_points).unwrap();
        let file = std::io::BufReader::new(File::open(&path).unwrap());
        let back = read_grid_csv(file).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(back.len(), 77);
        assert_eq!(back[76].index, 77);
    }
}
