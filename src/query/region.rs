//! Validation of genomic regions and normalization of variant length bounds.

use super::chrom;
use crate::pbs::Chromosome;

/// A validated genomic region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Canonical chromosome, never `Unspecified`.
    pub chromosome: Chromosome,
    /// 1-based start position.
    pub start: u32,
    /// 1-based end position, at least `start`.
    pub end: u32,
}

/// Error type for `validate_region()`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegionError {
    #[error("invalid range: start={start}, end={end}")]
    InvalidRange { start: i64, end: i64 },
    #[error("unknown chromosome: {0:?}")]
    UnknownChromosome(String),
}

/// Validate a region given as contig name and coordinates.
///
/// The range is checked before the chromosome, so an inverted range is
/// reported even on an unknown contig.
pub fn validate_region(chromosome: &str, start: i64, end: i64) -> Result<Region, RegionError> {
    let invalid = || RegionError::InvalidRange { start, end };
    if start < 0 || end < start {
        return Err(invalid());
    }
    let start = u32::try_from(start).map_err(|_| invalid())?;
    let end = u32::try_from(end).map_err(|_| invalid())?;
    let chromosome = chrom::resolve(chromosome)
        .ok_or_else(|| RegionError::UnknownChromosome(chromosome.to_owned()))?;

    Ok(Region {
        chromosome,
        start,
        end,
    })
}

/// Convention for encoding "no upper bound" on the variant length.
///
/// The count and the list RPCs use different sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthConvention {
    /// Count queries: `0` means unbounded.
    Count,
    /// List queries: the maximal signed 32 bit integer means unbounded.
    List,
}

impl LengthConvention {
    /// The sentinel for "no upper bound".
    pub fn unbounded(&self) -> u32 {
        match self {
            LengthConvention::Count => 0,
            LengthConvention::List => i32::MAX as u32,
        }
    }
}

/// Bounds on the variant length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBound {
    pub min: u32,
    pub max: u32,
}

fn clamp_to_u32(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Normalize optional length bounds.
///
/// Negative or absent bounds default to `0` (min) and the convention's
/// unbounded sentinel (max); under the list convention `max` is capped at the
/// sentinel.  If afterwards `min > max`, the range is reset to `{0, unbounded}`
/// instead of rejecting the query.
pub fn normalize_length(
    min: Option<i64>,
    max: Option<i64>,
    convention: LengthConvention,
) -> LengthBound {
    let unbounded = convention.unbounded();
    let min = match min {
        Some(min) if min >= 0 => clamp_to_u32(min),
        _ => 0,
    };
    let max = match (max, convention) {
        (Some(max), LengthConvention::List) if max >= 0 => clamp_to_u32(max).min(unbounded),
        (Some(max), LengthConvention::Count) if max >= 0 => clamp_to_u32(max),
        _ => unbounded,
    };

    if min > max {
        tracing::debug!(
            "ignoring inverted length range {}..{}, using unbounded",
            min,
            max
        );
        LengthBound {
            min: 0,
            max: unbounded,
        }
    } else {
        LengthBound { min, max }
    }
}
