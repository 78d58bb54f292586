//! Translation of pointer and controller input into key events

use crate::core::note::{Chroma, Note};
use serde::{Deserialize, Serialize};

pub const NOTE_OFF: u8 = 0x80;
pub const NOTE_ON: u8 = 0x90;
pub const CONTROL_CHANGE: u8 = 0xB0;

pub const CC_MODULATION: u8 = 1;
pub const CC_VOLUME: u8 = 7;
pub const CC_ALL_SOUND_OFF: u8 = 120;
pub const CC_ALL_NOTES_OFF: u8 = 123;

/// The MIDI octave that holds table octave 0
pub const DEFAULT_BASE_OCTAVE: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Press(Note),
    Release(Note),
}

impl InputEvent {
    pub fn note(&self) -> Note {
        match self {
            InputEvent::Press(note) | InputEvent::Release(note) => *note,
        }
    }

    pub fn from_pointer(note: Note, event: PointerEvent) -> Option<InputEvent> {
        match event {
            PointerEvent::Down { primary: true } | PointerEvent::Enter { primary_held: true } => {
                Some(InputEvent::Press(note))
            }
            PointerEvent::Up | PointerEvent::Leave => Some(InputEvent::Release(note)),
            _ => None,
        }
    }
}

/// What happened to the pointer relative to one key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Down { primary: bool },
    Up,
    Enter { primary_held: bool },
    Leave,
}

/// Pointer state sampled once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerSample {
    pub hovered: Option<Note>,
    pub primary_pressed: bool,
    pub primary_released: bool,
    pub primary_down: bool,
}

/// Turns successive pointer samples into per-key pointer events
#[derive(Debug, Default)]
pub struct PointerTracker {
    hovered: Option<Note>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<Note> {
        self.hovered
    }

    pub fn update(&mut self, sample: PointerSample) -> Vec<(Note, PointerEvent)> {
        let mut events = Vec::new();

        if sample.hovered != self.hovered {
            if let Some(previous) = self.hovered {
                events.push((previous, PointerEvent::Leave));
            }
            if let Some(current) = sample.hovered {
                // a press on a freshly entered key is reported as Down below
                let held = sample.primary_down && !sample.primary_pressed;
                events.push((current, PointerEvent::Enter { primary_held: held }));
            }
            self.hovered = sample.hovered;
        }

        if let Some(current) = sample.hovered {
            if sample.primary_pressed {
                events.push((current, PointerEvent::Down { primary: true }));
            }
            if sample.primary_released {
                events.push((current, PointerEvent::Up));
            }
        }

        events
    }

    /// Input events for one frame
    pub fn input_events(&mut self, sample: PointerSample) -> Vec<InputEvent> {
        self.update(sample)
            .into_iter()
            .filter_map(|(note, event)| InputEvent::from_pointer(note, event))
            .collect()
    }
}

/// A raw performance-controller message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerMessage {
    pub command: u8,
    pub data1: u8,
    pub data2: Option<u8>,
}

impl ControllerMessage {
    pub fn new(command: u8, data1: u8, data2: Option<u8>) -> Self {
        Self {
            command,
            data1,
            data2,
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [command, data1] => Some(Self::new(*command, *data1, None)),
            [command, data1, data2, ..] => Some(Self::new(*command, *data1, Some(*data2))),
            _ => None,
        }
    }

    pub fn status(&self) -> u8 {
        self.command & 0xF0
    }

    pub fn channel(&self) -> u8 {
        self.command & 0x0F
    }
}

/// What a controller message asks the synth to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControllerAction {
    Input(InputEvent),
    SetVolume(f32),
    SetRingDepth(f32),
    AllNotesOff,
}

/// Maps controller note numbers onto keyboard notes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerMapping {
    base_octave: i32,
    octave_count: u8,
}

impl ControllerMapping {
    pub fn new(base_octave: i32, octave_count: u8) -> Self {
        Self {
            base_octave,
            octave_count,
        }
    }

    /// `None` when the note falls outside the keyboard
    pub fn note_for(&self, note_number: u8) -> Option<Note> {
        let midi_octave = (note_number / 12) as i32 - 1;
        let chroma = Chroma::from_index((note_number % 12) as usize)?;
        let octave = midi_octave
            .checked_sub(self.base_octave)
            .and_then(|octave| u8::try_from(octave).ok())?;
        let note = Note::new(octave, chroma);
        note.is_playable(self.octave_count).then_some(note)
    }

    /// Inverse of `note_for`
    pub fn note_number(&self, note: Note) -> Option<u8> {
        let number = (note.octave as i32)
            .checked_add(self.base_octave)?
            .checked_add(1)?
            .checked_mul(12)?
            .checked_add(note.chroma.index() as i32)?;
        u8::try_from(number).ok().filter(|n| *n < 128)
    }

    pub fn map(&self, message: &ControllerMessage) -> Option<ControllerAction> {
        match message.status() {
            NOTE_ON | NOTE_OFF => {
                let Some(note) = self.note_for(message.data1) else {
                    log::debug!("dropping note {} outside the keyboard", message.data1);
                    return None;
                };
                let velocity = message.data2.unwrap_or(0);
                let event = if message.status() == NOTE_ON && velocity > 0 {
                    InputEvent::Press(note)
                } else {
                    InputEvent::Release(note)
                };
                Some(ControllerAction::Input(event))
            }
            CONTROL_CHANGE => {
                let value = message.data2? as f32 / 127.0;
                match message.data1 {
                    CC_VOLUME => Some(ControllerAction::SetVolume(value)),
                    CC_MODULATION => Some(ControllerAction::SetRingDepth(value)),
                    CC_ALL_SOUND_OFF | CC_ALL_NOTES_OFF => Some(ControllerAction::AllNotesOff),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

impl Default for ControllerMapping {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_OCTAVE, 3)
    }
}
