//! Tunnel type tags and positional parameter vectors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Result, SectionError};

/// Cross-section family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TunnelType {
    /// Rectangle with an arched top edge: `[width, height]`.
    #[serde(alias = "三星形")]
    ThreeStar,
    /// Half-circle arch with a flat floor: `[radius]`.
    #[serde(alias = "半圆形")]
    HalfCircle,
    /// Trapezoid, top centered over bottom: `[top_width, bottom_width, height]`.
    #[serde(alias = "梯形")]
    Trapezoid,
    /// User-supplied closed curve; takes no parameters.
    #[serde(alias = "自定义")]
    Custom,
}

impl TunnelType {
    /// Number of leading parameter slots this family reads.
    pub fn required_parameters(self) -> usize {
        match self {
            TunnelType::ThreeStar => 2,
            TunnelType::HalfCircle => 1,
            TunnelType::Trapezoid => 3,
            TunnelType::Custom => 0,
        }
    }

    /// Kebab-case name.
    pub fn name(self) -> &'static str {
        match self {
            TunnelType::ThreeStar => "three-star",
            TunnelType::HalfCircle => "half-circle",
            TunnelType::Trapezoid => "trapezoid",
            TunnelType::Custom => "custom",
        }
    }
}

impl fmt::Display for TunnelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TunnelType {
    type Err = SectionError;

    /// Accepts the kebab-case names (any case, `_` or `-`) and the host
    /// dialog's labels.
    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase().replace('_', "-");
        match key.as_str() {
            "three-star" | "threestar" | "三星形" => Ok(TunnelType::ThreeStar),
            "half-circle" | "halfcircle" | "半圆形" => Ok(TunnelType::HalfCircle),
            "trapezoid" | "梯形" => Ok(TunnelType::Trapezoid),
            "custom" | "自定义" => Ok(TunnelType::Custom),
            _ => Err(SectionError::UnknownTunnelType(s.to_string())),
        }
    }
}

/// Validated positional section dimensions.
///
/// Holds up to [`ParameterVector::CAPACITY`] strictly positive, finite
/// values. Slot meaning depends on the [`TunnelType`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterVector {
    values: Vec<f64>,
}

impl ParameterVector {
    /// Maximum number of slots.
    pub const CAPACITY: usize = 4;

    /// Validate and wrap a slice of dimensions.
    pub fn new(values: &[f64]) -> Result<Self> {
        if values.len() > Self::CAPACITY {
            return Err(SectionError::TooManyParameters(values.len()));
        }
        for (slot, &value) in values.iter().enumerate() {
            if !(value.is_finite() && value > 0.0) {
                return Err(SectionError::NonPositiveParameter { slot, value });
            }
        }
        Ok(Self {
            values: values.to_vec(),
        })
    }

    /// Number of populated slots.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no slot is populated.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `slot`, if populated.
    pub fn get(&self, slot: usize) -> Option<f64> {
        self.values.get(slot).copied()
    }

    /// All populated values.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Leading `N` values, or `InsufficientParameters` for `tunnel_type`.
    pub(crate) fn leading<const N: usize>(&self, tunnel_type: TunnelType) -> Result<[f64; N]> {
        if self.values.len() < N {
            return Err(SectionError::InsufficientParameters {
                tunnel_type,
                expected: N,
                given: self.values.len(),
            });
        }
        let mut out = [0.0; N];
        out.copy_from_slice(&self.values[..N]);
        Ok(out)
    }
}

impl<'de> Deserialize<'de> for ParameterVector {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let values = Vec::<f64>::deserialize(d)?;
        ParameterVector::new(&values).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_and_labels() {
        assert_eq!("three-star".parse::<TunnelType>().unwrap(), TunnelType::ThreeStar);
        assert_eq!("Half_Circle".parse::<TunnelType>().unwrap(), TunnelType::HalfCircle);
        assert_eq!("梯形".parse::<TunnelType>().unwrap(), TunnelType::Trapezoid);
        assert_eq!("三星形".parse::<TunnelType>().unwrap(), TunnelType::ThreeStar);
        assert_eq!("半圆形".parse::<TunnelType>().unwrap(), TunnelType::HalfCircle);
        assert!(matches!(
            "oval".parse::<TunnelType>(),
            Err(SectionError::UnknownTunnelType(_))
        ));
    }

    #[test]
    fn test_display_round_trips() {
        for t in [
            TunnelType::ThreeStar,
            TunnelType::HalfCircle,
            TunnelType::Trapezoid,
            TunnelType::Custom,
        ] {
            assert_eq!(t.to_string().parse::<TunnelType>().unwrap(), t);
        }
    }

    #[test]
    fn test_rejects_non_positive_slots() {
        assert!(matches!(
            ParameterVector::new(&[4.0, 0.0]),
            Err(SectionError::NonPositiveParameter { slot: 1, .. })
        ));
        assert!(matches!(
            ParameterVector::new(&[f64::NAN]),
            Err(SectionError::NonPositiveParameter { slot: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_more_than_four_slots() {
        assert!(matches!(
            ParameterVector::new(&[1.0, 2.0, 3.0, 4.0, 5.0]),
            Err(SectionError::TooManyParameters(5))
        ));
    }

    #[test]
    fn test_leading_reports_shortfall() {
        let p = ParameterVector::new(&[4.0]).unwrap();
        let err = p.leading::<2>(TunnelType::ThreeStar).unwrap_err();
        assert!(matches!(
            err,
            SectionError::InsufficientParameters {
                expected: 2,
                given: 1,
                ..
            }
        ));
        assert_eq!(p.leading::<1>(TunnelType::HalfCircle).unwrap(), [4.0]);
    }
}
