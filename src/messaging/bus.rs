use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::{Arc, RwLock};
use crate::core::synth::Synth;
use super::SynthMessage;

/// MessageBus serializes every synth mutation onto the thread that drains it
pub struct MessageBus {
    pub(crate) sender: Sender<SynthMessage>,
    pub(crate) receiver: Receiver<SynthMessage>,
    synth_ref: Arc<RwLock<Synth>>,
}

impl MessageBus {
    /// Create a new message bus connected to the synth engine
    pub fn new(synth: Arc<RwLock<Synth>>) -> Self {
        let (sender, receiver) = unbounded();

        MessageBus {
            sender,
            receiver,
            synth_ref: synth,
        }
    }

    /// Get a sender that can be cloned and passed to input collaborators
    pub fn sender(&self) -> Sender<SynthMessage> {
        self.sender.clone()
    }

    /// Process pending messages, at most `max_messages` of them.
    /// Returns how many were handled.
    pub fn process_messages(&self, max_messages: usize) -> usize {
        let mut count = 0;

        while count < max_messages {
            let Ok(msg) = self.receiver.try_recv() else {
                break;
            };
            count += 1;

            self.handle_message(msg);
        }

        count
    }

    fn handle_message(&self, msg: SynthMessage) {
        let mut synth = match self.synth_ref.write() {
            Ok(synth) => synth,
            Err(err) => {
                log::error!("synth lock poisoned, dropping {:?}: {}", msg, err);
                return;
            }
        };

        match msg {
            SynthMessage::Input(event) => {
                synth.dispatch(event);
            }
            SynthMessage::Controller(message) => synth.handle_controller(&message),
            SynthMessage::SetVolume(volume) => {
                synth.set_volume(volume);
            }
            SynthMessage::SetRingDepth(depth) => {
                synth.set_ring_depth(depth);
            }
            SynthMessage::SetWaveform(waveform) => synth.set_waveform(waveform),
            SynthMessage::Transpose(direction) => {
                synth.transpose(direction);
            }
            SynthMessage::AllNotesOff => synth.all_notes_off(),
        }
    }

    /// Public method to send a message
    pub fn send(&self, msg: SynthMessage) {
        if let Err(err) = self.sender.send(msg) {
            log::warn!("message bus closed: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::frequency::Transpose;
    use crate::core::input::{ControllerMessage, InputEvent};
    use crate::core::note::{Chroma, Note};
    use crate::core::synth::SynthConfig;

    fn bus() -> (MessageBus, Arc<RwLock<Synth>>) {
        let synth = Arc::new(RwLock::new(Synth::new(&SynthConfig::default(), 44_100.0)));
        (MessageBus::new(Arc::clone(&synth)), synth)
    }

    #[test]
    fn messages_apply_in_order() {
        let (bus, synth) = bus();
        let note = Note::new(0, Chroma::E);
        bus.send(SynthMessage::Input(InputEvent::Press(note)));
        bus.send(SynthMessage::SetVolume(0.9));
        bus.send(SynthMessage::Transpose(Transpose::Down));

        assert_eq!(bus.process_messages(10), 3);
        let synth = synth.read().unwrap();
        assert!(synth.is_pressed(note));
        assert_eq!(synth.master().volume(), 0.9);
        assert_eq!(synth.octave_shift(), -1);
    }

    #[test]
    fn respects_the_batch_limit() {
        let (bus, _synth) = bus();
        for _ in 0..5 {
            bus.send(SynthMessage::SetRingDepth(0.5));
        }
        assert_eq!(bus.process_messages(2), 2);
        assert_eq!(bus.process_messages(10), 3);
        assert_eq!(bus.process_messages(10), 0);
    }

    #[test]
    fn senders_from_other_threads_are_drained() {
        let (bus, synth) = bus();
        let sender = bus.sender();
        std::thread::spawn(move || {
            sender
                .send(SynthMessage::Controller(ControllerMessage::new(0x90, 64, Some(70))))
                .unwrap();
        })
        .join()
        .unwrap();

        bus.process_messages(10);
        assert!(synth.read().unwrap().is_pressed(Note::new(1, Chroma::E)));
    }

    #[test]
    fn non_finite_volume_is_ignored() {
        let (bus, synth) = bus();
        bus.send(SynthMessage::SetVolume(f32::NAN));
        bus.process_messages(1);
        assert_eq!(synth.read().unwrap().master().volume(), SynthConfig::default().volume);
    }
}
