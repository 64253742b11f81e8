//! Quartile estimation and directional letter grading

use crate::data::RfvData;
use crate::error::RfvError;
use log::{debug, warn};
use ndarray::Array2;
use std::fmt;

/// One of the three RFV axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    Recency,
    Frequency,
    Value,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Recency, Dimension::Frequency, Dimension::Value];

    /// Column of this dimension in the raw metrics matrix
    pub fn index(self) -> usize {
        match self {
            Dimension::Recency => 0,
            Dimension::Frequency => 1,
            Dimension::Value => 2,
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            Dimension::Recency => Direction::LowerIsBetter,
            Dimension::Frequency | Dimension::Value => Direction::HigherIsBetter,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Dimension::Recency => "recency",
            Dimension::Frequency => "frequency",
            Dimension::Value => "value",
        }
    }
}

/// Which end of a dimension's range earns the best grade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    LowerIsBetter,
    HigherIsBetter,
}

/// Quartile letter grade, `A` best and `D` worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Grade {
    A,
    B,
    C,
    D,
}

impl Grade {
    pub const ALL: [Grade; 4] = [Grade::A, Grade::B, Grade::C, Grade::D];

    pub fn as_char(self) -> char {
        match self {
            Grade::A => 'A',
            Grade::B => 'B',
            Grade::C => 'C',
            Grade::D => 'D',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(Grade::A),
            'B' => Some(Grade::B),
            'C' => Some(Grade::C),
            'D' => Some(Grade::D),
            _ => None,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// 25th, 50th and 75th percentile of one dimension
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cuts {
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
}

impl Cuts {
    /// Estimate cuts with linear interpolation between the nearest ranks
    ///
    /// Returns `None` when `values` is empty.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut sorted: Vec<f64> = values.into_iter().collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        Some(Self {
            q25: quantile(&sorted, 0.25),
            q50: quantile(&sorted, 0.50),
            q75: quantile(&sorted, 0.75),
        })
    }

    /// All three cuts equal, as when most customers share a value
    pub fn is_degenerate(&self) -> bool {
        self.q25 == self.q50 && self.q50 == self.q75
    }
}

/// Linear-interpolation quantile of a sorted, non-empty slice
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Grade a value against cut points
///
/// Boundaries are inclusive toward the lower quartile: a value equal to `q25`
/// falls in the first bucket whatever the direction.
pub fn classify(value: f64, cuts: &Cuts, direction: Direction) -> Grade {
    let bucket = if value <= cuts.q25 {
        0
    } else if value <= cuts.q50 {
        1
    } else if value <= cuts.q75 {
        2
    } else {
        3
    };

    match direction {
        Direction::LowerIsBetter => Grade::ALL[bucket],
        Direction::HigherIsBetter => Grade::ALL[3 - bucket],
    }
}

/// Quartile cut points for all three dimensions of one run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuartileCuts {
    pub recency: Cuts,
    pub frequency: Cuts,
    pub value: Cuts,
}

impl QuartileCuts {
    /// Fit cuts from the aggregated customer table
    pub fn fit(rfv_data: &RfvData) -> crate::Result<Self> {
        Self::from_features(&rfv_data.raw_features)
    }

    /// Fit cuts from a raw metrics matrix with recency, frequency and value columns
    pub fn from_features(features: &Array2<f64>) -> crate::Result<Self> {
        let fit_column = |dimension: Dimension| -> crate::Result<Cuts> {
            let cuts = Cuts::from_values(features.column(dimension.index()).iter().copied())
                .ok_or(RfvError::EmptyDataset)?;

            debug!(
                "{} cuts: q25={} q50={} q75={}",
                dimension.name(),
                cuts.q25,
                cuts.q50,
                cuts.q75
            );
            if cuts.is_degenerate() && features.nrows() > 1 {
                warn!(
                    "All {} cuts collapse to {}; grades cluster on the boundary",
                    dimension.name(),
                    cuts.q25
                );
            }

            Ok(cuts)
        };

        Ok(Self {
            recency: fit_column(Dimension::Recency)?,
            frequency: fit_column(Dimension::Frequency)?,
            value: fit_column(Dimension::Value)?,
        })
    }

    pub fn get(&self, dimension: Dimension) -> &Cuts {
        match dimension {
            Dimension::Recency => &self.recency,
            Dimension::Frequency => &self.frequency,
            Dimension::Value => &self.value,
        }
    }

    /// Grade a raw value of `dimension` with that dimension's cuts and direction
    pub fn grade(&self, dimension: Dimension, value: f64) -> Grade {
        classify(value, self.get(dimension), dimension.direction())
    }
}

impl fmt::Display for QuartileCuts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<10} {:>12} {:>12} {:>12}", "quantile", "recency", "frequency", "value")?;
        let rows = [
            ("0.25", self.recency.q25, self.frequency.q25, self.value.q25),
            ("0.50", self.recency.q50, self.frequency.q50, self.value.q50),
            ("0.75", self.recency.q75, self.frequency.q75, self.value.q75),
        ];
        for (label, r, fr, v) in rows {
            writeln!(f, "{:<10} {:>12.2} {:>12.2} {:>12.2}", label, r, fr, v)?;
        }
        Ok(())
    }
}
