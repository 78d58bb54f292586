use crate::core::note::Note;
use crate::core::voice::Voice;
use std::collections::BTreeMap;

/// Result of asking the registry to sound a note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Started,
    AlreadyActive,
    OutOfRange,
}

/// Tracks the sounding voice of every key. At most one voice per note.
#[derive(Debug, Default)]
pub struct VoiceRegistry {
    octave_count: u8,
    slots: BTreeMap<Note, Voice>,
}

impl VoiceRegistry {
    pub fn new(octave_count: u8) -> Self {
        Self {
            octave_count,
            slots: BTreeMap::new(),
        }
    }

    /// Runs `start` and stores its voice only when `note` is playable and
    /// silent.
    pub fn activate(&mut self, note: Note, start: impl FnOnce() -> Voice) -> Activation {
        if !note.is_playable(self.octave_count) {
            return Activation::OutOfRange;
        }
        if self.slots.contains_key(&note) {
            return Activation::AlreadyActive;
        }
        self.slots.insert(note, start());
        Activation::Started
    }

    pub fn deactivate(&mut self, note: Note) -> Option<Voice> {
        self.slots.remove(&note)
    }

    pub fn release_all(&mut self) -> Vec<Voice> {
        std::mem::take(&mut self.slots).into_values().collect()
    }

    pub fn is_active(&self, note: Note) -> bool {
        self.slots.contains_key(&note)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.octave_count as usize * 12 + 1
    }

    pub fn voices_mut(&mut self) -> impl Iterator<Item = &mut Voice> {
        self.slots.values_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::note::Chroma;
    use crate::core::oscillator::Waveform;

    fn voice(note: Note) -> Voice {
        Voice::new(note, 261.63, Waveform::Sine, true)
    }

    #[test]
    fn second_activation_is_ignored() {
        let mut registry = VoiceRegistry::new(3);
        let note = Note::new(1, Chroma::C);
        let mut created = 0;

        for _ in 0..2 {
            registry.activate(note, || {
                created += 1;
                voice(note)
            });
        }

        assert_eq!(created, 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn reports_already_active() {
        let mut registry = VoiceRegistry::new(3);
        let note = Note::new(0, Chroma::E);
        assert_eq!(registry.activate(note, || voice(note)), Activation::Started);
        assert_eq!(registry.activate(note, || voice(note)), Activation::AlreadyActive);
    }

    #[test]
    fn release_without_press_is_a_no_op() {
        let mut registry = VoiceRegistry::new(3);
        let held = Note::new(0, Chroma::C);
        registry.activate(held, || voice(held));

        assert!(registry.deactivate(Note::new(2, Chroma::B)).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn deactivate_hands_back_the_voice_once() {
        let mut registry = VoiceRegistry::new(3);
        let note = Note::new(2, Chroma::FSharp);
        registry.activate(note, || voice(note));

        let released = registry.deactivate(note).unwrap();
        assert_eq!(released.note(), note);
        assert!(registry.deactivate(note).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn notes_outside_the_keyboard_are_refused() {
        let mut registry = VoiceRegistry::new(3);
        let above = Note::new(3, Chroma::D);
        let mut called = false;
        let activation = registry.activate(above, || {
            called = true;
            voice(above)
        });
        assert_eq!(activation, Activation::OutOfRange);
        assert!(!called);

        let boundary = Note::new(3, Chroma::C);
        assert_eq!(registry.activate(boundary, || voice(boundary)), Activation::Started);
    }

    #[test]
    fn capacity_covers_every_key() {
        let mut registry = VoiceRegistry::new(2);
        assert_eq!(registry.capacity(), 25);
        for octave in 0..3u8 {
            for chroma in Chroma::ALL {
                let note = Note::new(octave, chroma);
                registry.activate(note, || voice(note));
            }
        }
        assert_eq!(registry.len(), registry.capacity());
    }

    #[test]
    fn release_all_empties_the_registry() {
        let mut registry = VoiceRegistry::new(3);
        for chroma in [Chroma::C, Chroma::E, Chroma::G] {
            let note = Note::new(1, chroma);
            registry.activate(note, || voice(note));
        }
        let released = registry.release_all();
        assert_eq!(released.len(), 3);
        assert!(registry.is_empty());
    }
}
