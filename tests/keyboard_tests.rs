// End-to-end keyboard behaviour through the public API: messages in,
// voices and samples out.

use crossbeam_channel::Sender;
use keytheorem::core::frequency::{FrequencyTable, Transpose, REFERENCE_C_HZ};
use keytheorem::core::input::{ControllerMessage, InputEvent, PointerSample, PointerTracker};
use keytheorem::core::note::{Chroma, Note};
use keytheorem::core::oscillator::{Oscillator, Waveform, WaveformKind};
use keytheorem::core::synth::{Synth, SynthConfig};
use keytheorem::messaging::{MessageBus, SynthMessage};
use std::sync::{Arc, RwLock};

const SAMPLE_RATE: f32 = 44_100.0;

fn setup() -> (Arc<RwLock<Synth>>, MessageBus, Sender<SynthMessage>) {
    let synth = Arc::new(RwLock::new(Synth::new(&SynthConfig::default(), SAMPLE_RATE)));
    let bus = MessageBus::new(Arc::clone(&synth));
    let sender = bus.sender();
    (synth, bus, sender)
}

fn c(octave: u8) -> Note {
    Note::new(octave, Chroma::C)
}

#[test]
fn reference_and_fifth_frequencies() {
    let table = FrequencyTable::build(3);
    let c0 = table.frequency(c(0)).unwrap();
    let g0 = table.frequency(Note::new(0, Chroma::G)).unwrap();

    assert!((c0 - 130.812_782_650_299_3).abs() < 1e-9);
    assert!((c0 - REFERENCE_C_HZ).abs() < 1e-12);
    assert!((g0 - 195.997_717_990_874_6).abs() < 1e-6);
}

#[test]
fn table_is_equal_tempered() {
    let table = FrequencyTable::build(3);
    let entries: Vec<(Note, f64)> = table.iter().collect();
    assert_eq!(entries.len(), 3 * 12 + 1);

    let ratio = 2f64.powf(1.0 / 12.0);
    for pair in entries.windows(2) {
        assert!((pair[1].1 / pair[0].1 - ratio).abs() < 1e-9);
    }
    assert!((table.frequency(c(3)).unwrap() - 8.0 * REFERENCE_C_HZ).abs() < 1e-9);
    assert!(table.frequency(Note::new(3, Chroma::CSharp)).is_none());
}

#[test]
fn repeated_presses_start_one_voice() {
    let (synth, bus, sender) = setup();
    for _ in 0..3 {
        sender.send(SynthMessage::Input(InputEvent::Press(c(1)))).unwrap();
    }
    bus.process_messages(16);

    let synth = synth.read().unwrap();
    assert_eq!(synth.active_voices(), 1);
    assert_eq!(synth.stats().started, 1);
}

#[test]
fn release_without_press_is_ignored() {
    let (synth, bus, sender) = setup();
    sender.send(SynthMessage::Input(InputEvent::Release(c(1)))).unwrap();
    bus.process_messages(16);

    let synth = synth.read().unwrap();
    assert_eq!(synth.active_voices(), 0);
    assert_eq!(synth.stats().stopped, 0);
}

#[test]
fn press_release_cycles_are_counted() {
    let (synth, bus, sender) = setup();
    let note = Note::new(1, Chroma::E);
    for _ in 0..2 {
        sender.send(SynthMessage::Input(InputEvent::Press(note))).unwrap();
        sender.send(SynthMessage::Input(InputEvent::Release(note))).unwrap();
    }
    bus.process_messages(16);

    let synth = synth.read().unwrap();
    assert_eq!(synth.stats().started, 2);
    assert_eq!(synth.stats().stopped, 2);
    assert_eq!(synth.active_voices(), 0);
}

#[test]
fn transposing_up_then_down_restores_pitches() {
    let (synth, bus, sender) = setup();
    let before: Vec<f64> = synth.read().unwrap().keys().iter().map(|k| k.frequency).collect();

    sender.send(SynthMessage::Transpose(Transpose::Up)).unwrap();
    bus.process_messages(16);
    {
        let synth = synth.read().unwrap();
        assert_eq!(synth.octave_shift(), 1);
        let up = synth.key_frequency(c(0)).unwrap();
        assert!((up - 2.0 * REFERENCE_C_HZ).abs() < 1e-9);
    }

    sender.send(SynthMessage::Transpose(Transpose::Down)).unwrap();
    bus.process_messages(16);
    let after: Vec<f64> = synth.read().unwrap().keys().iter().map(|k| k.frequency).collect();
    assert_eq!(before, after);
}

#[test]
fn transposition_stops_at_the_limit() {
    let (synth, bus, sender) = setup();
    for _ in 0..5 {
        sender.send(SynthMessage::Transpose(Transpose::Down)).unwrap();
    }
    bus.process_messages(16);
    assert_eq!(synth.read().unwrap().octave_shift(), -2);
}

#[test]
fn controller_note_60_is_c1() {
    let (synth, bus, sender) = setup();
    let on = ControllerMessage::from_bytes(&[0x90, 60, 100]).unwrap();
    sender.send(SynthMessage::Controller(on)).unwrap();
    bus.process_messages(16);

    let synth = synth.read().unwrap();
    assert!(synth.is_pressed(c(1)));
    assert_eq!(synth.mapping().note_number(c(1)), Some(60));
}

#[test]
fn zero_velocity_note_on_is_a_release() {
    for release in [[0x90u8, 48, 0], [0x80, 48, 64]] {
        let (synth, bus, sender) = setup();
        let on = ControllerMessage::from_bytes(&[0x90, 48, 90]).unwrap();
        let off = ControllerMessage::from_bytes(&release).unwrap();
        sender.send(SynthMessage::Controller(on)).unwrap();
        sender.send(SynthMessage::Controller(off)).unwrap();
        bus.process_messages(16);

        let synth = synth.read().unwrap();
        assert!(!synth.is_pressed(c(0)));
        assert_eq!(synth.stats().stopped, 1);
    }
}

#[test]
fn notes_outside_the_keyboard_are_dropped() {
    let (synth, bus, sender) = setup();
    for note in [21u8, 47, 85, 127] {
        let on = ControllerMessage::new(0x90, note, Some(100));
        sender.send(SynthMessage::Controller(on)).unwrap();
    }
    bus.process_messages(16);
    assert_eq!(synth.read().unwrap().active_voices(), 0);
}

#[test]
fn zero_ring_depth_is_the_plain_oscillator() {
    let (synth, bus, sender) = setup();
    let note = Note::new(0, Chroma::A);
    sender.send(SynthMessage::SetRingDepth(0.0)).unwrap();
    sender.send(SynthMessage::Input(InputEvent::Press(note))).unwrap();
    bus.process_messages(16);

    let mut synth = synth.write().unwrap();
    let volume = synth.master().volume();
    let mut reference = Oscillator::new(Waveform::Sine, synth.key_frequency(note).unwrap());
    reference.start();

    for _ in 0..512 {
        let expected = volume * reference.next_sample(SAMPLE_RATE);
        assert!((synth.get_sample() - expected).abs() < 1e-6);
    }
}

#[test]
fn full_ring_depth_changes_the_signal() {
    let (synth, bus, sender) = setup();
    sender.send(SynthMessage::SetRingDepth(1.0)).unwrap();
    sender.send(SynthMessage::Input(InputEvent::Press(Note::new(0, Chroma::A)))).unwrap();
    bus.process_messages(16);

    let mut synth = synth.write().unwrap();
    let mut buffer = vec![0.0f32; 512];
    synth.render(&mut buffer);
    assert!(buffer.iter().any(|s| s.abs() > 1e-3));
    assert!(buffer.iter().all(|s| s.abs() <= synth.master().volume() + 1e-6));
}

#[test]
fn waveform_changes_apply_to_new_voices() {
    let (synth, bus, sender) = setup();
    sender.send(SynthMessage::SetWaveform(WaveformKind::Square)).unwrap();
    sender.send(SynthMessage::Input(InputEvent::Press(c(0)))).unwrap();
    bus.process_messages(16);

    let mut synth = synth.write().unwrap();
    assert_eq!(synth.waveform(), WaveformKind::Square);
    // square starts high
    let volume = synth.master().volume();
    assert!((synth.get_sample() - volume).abs() < 1e-6);
}

#[test]
fn dragging_across_keys_hands_the_note_over() {
    let (synth, bus, sender) = setup();
    let mut tracker = PointerTracker::new();
    let frames = [
        PointerSample {
            hovered: Some(c(0)),
            primary_pressed: true,
            primary_down: true,
            ..Default::default()
        },
        PointerSample {
            hovered: Some(Note::new(0, Chroma::D)),
            primary_down: true,
            ..Default::default()
        },
        PointerSample {
            hovered: Some(Note::new(0, Chroma::D)),
            primary_released: true,
            ..Default::default()
        },
    ];

    let mut pressed_after = Vec::new();
    for frame in frames {
        for event in tracker.input_events(frame) {
            sender.send(SynthMessage::Input(event)).unwrap();
        }
        bus.process_messages(16);
        let synth = synth.read().unwrap();
        pressed_after.push((synth.is_pressed(c(0)), synth.is_pressed(Note::new(0, Chroma::D))));
    }

    assert_eq!(pressed_after, vec![(true, false), (false, true), (false, false)]);
}

#[test]
fn all_notes_off_silences_everything() {
    let (synth, bus, sender) = setup();
    for octave in 0..3 {
        sender.send(SynthMessage::Input(InputEvent::Press(c(octave)))).unwrap();
    }
    sender.send(SynthMessage::AllNotesOff).unwrap();
    bus.process_messages(16);

    let mut synth = synth.write().unwrap();
    assert_eq!(synth.active_voices(), 0);
    assert_eq!(synth.stats().stopped, 3);
    assert_eq!(synth.get_sample(), 0.0);
}
