//! Equal-tempered note to frequency table

use crate::core::note::{Chroma, Note};
use serde::{Deserialize, Serialize};

/// Lowest C of the keyboard: C1 (32.70 Hz) four octaves up, i.e. C3.
pub const REFERENCE_C_HZ: f64 = 32.703195662574829 * 4.0;

/// Octave transposition step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transpose {
    Up,
    Down,
}

impl Transpose {
    pub fn factor(self) -> f64 {
        match self {
            Transpose::Up => 2.0,
            Transpose::Down => 0.5,
        }
    }

    pub fn step(self) -> i8 {
        match self {
            Transpose::Up => 1,
            Transpose::Down => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyTable {
    // `octave_count` rows of 12 entries followed by one row holding only C
    octaves: Vec<Vec<f64>>,
}

impl FrequencyTable {
    pub fn build(octave_count: u8) -> Self {
        Self::build_from(REFERENCE_C_HZ, octave_count)
    }

    pub fn build_from(reference_c: f64, octave_count: u8) -> Self {
        let mut octaves = Vec::with_capacity(octave_count as usize + 1);
        let mut c = reference_c;

        for _ in 0..octave_count {
            let row = (0..12)
                .map(|k| c * 2f64.powf(k as f64 / 12.0))
                .collect();
            octaves.push(row);
            c *= 2.0;
        }
        octaves.push(vec![c]);

        Self { octaves }
    }

    /// Number of full octaves, the boundary C octave excluded
    pub fn octave_count(&self) -> u8 {
        (self.octaves.len() - 1) as u8
    }

    pub fn frequency(&self, note: Note) -> Option<f64> {
        self.octaves
            .get(note.octave as usize)
            .and_then(|row| row.get(note.chroma.index()))
            .copied()
    }

    pub fn contains(&self, note: Note) -> bool {
        self.frequency(note).is_some()
    }

    pub fn len(&self) -> usize {
        self.octaves.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entries in ascending pitch order
    pub fn iter(&self) -> impl Iterator<Item = (Note, f64)> + '_ {
        self.octaves.iter().enumerate().flat_map(|(octave, row)| {
            row.iter().enumerate().filter_map(move |(k, freq)| {
                Chroma::from_index(k).map(|chroma| (Note::new(octave as u8, chroma), *freq))
            })
        })
    }

    /// A copy of the table one octave up or down. `self` is left untouched.
    pub fn transposed(&self, direction: Transpose) -> Self {
        self.scaled(direction.factor())
    }

    pub fn shifted(&self, octaves: i32) -> Self {
        self.scaled(2f64.powi(octaves))
    }

    fn scaled(&self, factor: f64) -> Self {
        Self {
            octaves: self
                .octaves
                .iter()
                .map(|row| row.iter().map(|freq| freq * factor).collect())
                .collect(),
        }
    }
}
