use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the 12 pitch classes of an equal-tempered octave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Chroma {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl Chroma {
    pub const ALL: [Chroma; 12] = [
        Chroma::C,
        Chroma::CSharp,
        Chroma::D,
        Chroma::DSharp,
        Chroma::E,
        Chroma::F,
        Chroma::FSharp,
        Chroma::G,
        Chroma::GSharp,
        Chroma::A,
        Chroma::ASharp,
        Chroma::B,
    ];

    /// Semitones above C (0..=11)
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Chroma> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Chroma::C => "C",
            Chroma::CSharp => "C#",
            Chroma::D => "D",
            Chroma::DSharp => "D#",
            Chroma::E => "E",
            Chroma::F => "F",
            Chroma::FSharp => "F#",
            Chroma::G => "G",
            Chroma::GSharp => "G#",
            Chroma::A => "A",
            Chroma::ASharp => "A#",
            Chroma::B => "B",
        }
    }

    pub fn is_sharp(self) -> bool {
        matches!(
            self,
            Chroma::CSharp | Chroma::DSharp | Chroma::FSharp | Chroma::GSharp | Chroma::ASharp
        )
    }
}

impl fmt::Display for Chroma {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A key of the keyboard. `octave` counts table octaves, 0 being the
/// reference C octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Note {
    pub octave: u8,
    pub chroma: Chroma,
}

impl Note {
    pub fn new(octave: u8, chroma: Chroma) -> Self {
        Self { octave, chroma }
    }

    /// True when the note lies on a keyboard of `octave_count` full octaves
    /// topped by a single boundary C.
    pub fn is_playable(&self, octave_count: u8) -> bool {
        self.octave < octave_count || (self.octave == octave_count && self.chroma == Chroma::C)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.chroma, self.octave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chroma_index_round_trips() {
        for (i, chroma) in Chroma::ALL.iter().enumerate() {
            assert_eq!(chroma.index(), i);
            assert_eq!(Chroma::from_index(i), Some(*chroma));
        }
        assert_eq!(Chroma::from_index(12), None);
    }

    #[test]
    fn five_chromas_are_sharp() {
        let sharps = Chroma::ALL.iter().filter(|c| c.is_sharp()).count();
        assert_eq!(sharps, 5);
        assert!(Chroma::FSharp.is_sharp());
        assert!(!Chroma::E.is_sharp());
    }

    #[test]
    fn only_the_boundary_c_is_playable_in_the_top_octave() {
        assert!(Note::new(2, Chroma::B).is_playable(3));
        assert!(Note::new(3, Chroma::C).is_playable(3));
        assert!(!Note::new(3, Chroma::CSharp).is_playable(3));
        assert!(!Note::new(4, Chroma::C).is_playable(3));
    }

    #[test]
    fn displays_name_and_octave() {
        assert_eq!(Note::new(1, Chroma::GSharp).to_string(), "G#1");
    }
}
