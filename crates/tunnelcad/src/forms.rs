//! Dialog input validation.
//!
//! Fields arrive as text. Numbers use a period as the decimal separator
//! whatever the system locale. A field that fails yields a [`FieldError`]
//! naming it, so the dialog can stay open and refocus that field.

use std::path::PathBuf;

use thiserror::Error;
use tunnelcad_math::{Point3, Vec3};
use tunnelcad_seam::CoalSeamSpec;
use tunnelcad_section::{Boundary, ParameterVector, SectionError, TunnelType};
use tunnelcad_sweep::read_path_file;

use crate::commands::{SeamRequest, TunnelRequest};

/// A form field that did not validate.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{field}: {message}")]
pub struct FieldError {
    /// Field name as shown in the form.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Parse a required number.
pub fn parse_number(field: &str, text: &str) -> Result<f64, FieldError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(FieldError::new(field, "a value is required"));
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(FieldError::new(field, format!("'{text}' is not a number"))),
    }
}

fn parse_positive(field: &str, text: &str) -> Result<f64, FieldError> {
    let v = parse_number(field, text)?;
    if v <= 0.0 {
        return Err(FieldError::new(field, format!("must be positive, got {v}")));
    }
    Ok(v)
}

/// Parse three numbers separated by commas or whitespace.
pub fn parse_triple(field: &str, text: &str) -> Result<[f64; 3], FieldError> {
    let parts: Vec<&str> = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();
    if parts.len() != 3 {
        return Err(FieldError::new(
            field,
            format!("expected 3 values, got {}", parts.len()),
        ));
    }
    let mut out = [0.0; 3];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = parse_number(field, part)?;
    }
    Ok(out)
}

/// The tunnel dialog.
#[derive(Debug, Clone, Default)]
pub struct TunnelForm {
    /// Section family name or label.
    pub tunnel_type: String,
    /// Dimension boxes, in slot order. Blank boxes past the ones the family
    /// needs are ignored.
    pub dimensions: Vec<String>,
    /// Path point file.
    pub path_file: String,
    /// Center the section on the path.
    pub auto_center: bool,
}

/// A validated tunnel dialog, before the path file is read.
#[derive(Debug, Clone)]
pub struct TunnelInput {
    /// Section family.
    pub tunnel_type: TunnelType,
    /// Section dimensions.
    pub parameters: ParameterVector,
    /// Path point file.
    pub path_file: PathBuf,
    /// Center the section on the path.
    pub auto_center: bool,
}

impl TunnelForm {
    /// Check every field.
    pub fn validate(&self) -> Result<TunnelInput, FieldError> {
        let tunnel_type: TunnelType = self
            .tunnel_type
            .parse()
            .map_err(|e: SectionError| FieldError::new("tunnel_type", e.to_string()))?;

        let required = tunnel_type.required_parameters();
        let mut values = Vec::with_capacity(ParameterVector::CAPACITY);
        for (slot, text) in self.dimensions.iter().enumerate() {
            let field = format!("dimensions[{slot}]");
            if slot >= required && text.trim().is_empty() {
                continue;
            }
            values.push(parse_positive(&field, text)?);
        }
        if values.len() < required {
            return Err(FieldError::new(
                format!("dimensions[{}]", values.len()),
                format!("{tunnel_type} needs {required} dimensions"),
            ));
        }
        let parameters = ParameterVector::new(&values)
            .map_err(|e| FieldError::new("dimensions", e.to_string()))?;

        let path_file = self.path_file.trim();
        if path_file.is_empty() {
            return Err(FieldError::new("path_file", "select a path file"));
        }
        let path_file = PathBuf::from(path_file);
        if !path_file.is_file() {
            return Err(FieldError::new(
                "path_file",
                format!("{} does not exist", path_file.display()),
            ));
        }

        Ok(TunnelInput {
            tunnel_type,
            parameters,
            path_file,
            auto_center: self.auto_center,
        })
    }
}

impl TunnelInput {
    /// Read the path file and attach the selected curve, if any.
    pub fn into_request(self, curve: Option<Boundary>) -> crate::Result<TunnelRequest> {
        let path = read_path_file(&self.path_file)?;
        Ok(TunnelRequest {
            tunnel_type: self.tunnel_type,
            parameters: self.parameters,
            curve,
            path,
            auto_center: self.auto_center,
        })
    }
}

/// The coal-seam dialog.
#[derive(Debug, Clone, Default)]
pub struct SeamForm {
    /// Frame origin, `x,y,z`.
    pub origin: String,
    /// Frame X axis, `x,y,z`.
    pub x_axis: String,
    /// Frame Y axis, `x,y,z`.
    pub y_axis: String,
    /// Distance to the seam along local Z.
    pub towards: String,
    /// Extent along local X.
    pub length: String,
    /// Extent along local Y.
    pub width: String,
    /// Extent along local Z.
    pub thickness: String,
    /// Tilt about local X, degrees.
    pub angle_x: String,
    /// Tilt about local Y, degrees.
    pub angle_y: String,
    /// Grid spacing along X.
    pub grid_length: String,
    /// Grid spacing along Y.
    pub grid_width: String,
    /// Grid export file; blank for none.
    pub export: String,
}

impl SeamForm {
    /// Check every field.
    ///
    /// Axis orthogonality is left to the planner, which rejects the frame
    /// as a whole.
    pub fn validate(&self) -> Result<SeamRequest, FieldError> {
        let origin = parse_triple("origin", &self.origin)?;
        let x_axis = parse_triple("x_axis", &self.x_axis)?;
        let y_axis = parse_triple("y_axis", &self.y_axis)?;
        let towards = parse_number("towards", &self.towards)?;
        let length = parse_positive("length", &self.length)?;
        let width = parse_positive("width", &self.width)?;
        let thickness = parse_positive("thickness", &self.thickness)?;
        let angle_x = parse_angle("angle_x", &self.angle_x)?;
        let angle_y = parse_angle("angle_y", &self.angle_y)?;
        let grid_length = parse_positive("grid_length", &self.grid_length)?;
        let grid_width = parse_positive("grid_width", &self.grid_width)?;
        let export = match self.export.trim() {
            "" => None,
            path => Some(PathBuf::from(path)),
        };

        Ok(SeamRequest {
            spec: CoalSeamSpec {
                origin: Point3::from(origin),
                x_axis: Vec3::from(x_axis),
                y_axis: Vec3::from(y_axis),
                towards,
                length,
                width,
                thickness,
                angle_x,
                angle_y,
                grid_length,
                grid_width,
            },
            export,
        })
    }
}

fn parse_angle(field: &str, text: &str) -> Result<f64, FieldError> {
    let v = parse_number(field, text)?;
    if !(-90.0..=90.0).contains(&v) {
        return Err(FieldError::new(field, format!("must be within ±90°, got {v}")));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seam_form() -> SeamForm {
        SeamForm {
            origin: "0,0,0".into(),
            x_axis: "1,0,0".into(),
            y_axis: "0 1 0".into(),
            towards: "5".into(),
            length: "100".into(),
            width: "60".into(),
            thickness: "3.5".into(),
            angle_x: "15".into(),
            angle_y: "-30".into(),
            grid_length: "10".into(),
            grid_width: "10".into(),
            export: String::new(),
        }
    }

    #[test]
    fn test_comma_decimal_rejected() {
        let err = parse_number("length", "1,5").unwrap_err();
        assert_eq!(err.field, "length");
    }

    #[test]
    fn test_triple_separators() {
        assert_eq!(parse_triple("origin", " 1.5, -2\t3 ").unwrap(), [1.5, -2.0, 3.0]);
        assert!(parse_triple("origin", "1,2").is_err());
    }

    #[test]
    fn test_seam_form_valid() {
        let req = seam_form().validate().unwrap();
        assert_eq!(req.spec.thickness, 3.5);
        assert_eq!(req.spec.y_axis, Vec3::y());
        assert!(req.export.is_none());
    }

    #[test]
    fn test_seam_form_names_offending_field() {
        let mut form = seam_form();
        form.angle_y = "91".into();
        assert_eq!(form.validate().unwrap_err().field, "angle_y");

        let mut form = seam_form();
        form.grid_width = "0".into();
        assert_eq!(form.validate().unwrap_err().field, "grid_width");

        let mut form = seam_form();
        form.towards = "".into();
        assert_eq!(form.validate().unwrap_err().field, "towards");
    }

    #[test]
    fn test_tunnel_form_blank_optional_slots() {
        let path = std::env::temp_dir().join(format!("tunnelcad-form-{}.txt", std::process::id()));
        std::fs::write(&path, "0 0 0\n1 0 0\n").unwrap();
        let form = TunnelForm {
            tunnel_type: "半圆形".into(),
            dimensions: vec!["2.5".into(), "".into(), "".into(), "".into()],
            path_file: path.display().to_string(),
            auto_center: false,
        };
        let input = form.validate().unwrap();
        assert_eq!(input.tunnel_type, TunnelType::HalfCircle);
        assert_eq!(input.parameters.as_slice(), &[2.5]);
        let request = input.into_request(None).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(request.path.len(), 2);
    }

    #[test]
    fn test_tunnel_form_missing_dimension() {
        let form = TunnelForm {
            tunnel_type: "trapezoid".into(),
            dimensions: vec!["3".into(), "5".into(), " ".into()],
            path_file: "unused.txt".into(),
            auto_center: false,
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.field, "dimensions[2]");
    }

    #[test]
    fn test_tunnel_form_unknown_type() {
        let form = TunnelForm {
            tunnel_type: "oval".into(),
            ..TunnelForm::default()
        };
        assert_eq!(form.validate().unwrap_err().field, "tunnel_type");
    }

    #[test]
    fn test_tunnel_form_missing_path() {
        let form = TunnelForm {
            tunnel_type: "half-circle".into(),
            dimensions: vec!["2".into()],
            path_file: "/nonexistent/path.txt".into(),
            auto_center: false,
        };
        assert_eq!(form.validate().unwrap_err().field, "path_file");
    }
}
