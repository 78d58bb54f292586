use egui::{ComboBox, Ui};
use crate::core::input::{ControllerMessage, CONTROL_CHANGE, NOTE_OFF, NOTE_ON};
use crate::core::midi::MidiInputHandler;

/// Port selection for the hardware controller
pub struct MidiConfigPanel {
    input_ports: Vec<String>,
    selected_input: Option<String>,
    status_message: Option<String>,
}

impl MidiConfigPanel {
    pub fn new(selected_input: Option<String>) -> Self {
        Self {
            input_ports: Vec::new(),
            selected_input,
            status_message: None,
        }
    }

    pub fn refresh_ports(&mut self, midi: &MidiInputHandler) {
        self.input_ports = midi.list_ports();
        log::debug!("found {} MIDI input ports", self.input_ports.len());
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status_message = Some(status.into());
    }

    /// Returns true when the connected port changed.
    pub fn show(
        &mut self,
        ui: &mut Ui,
        midi: &mut MidiInputHandler,
        last_message: Option<ControllerMessage>,
    ) -> bool {
        ui.heading("MIDI Settings");

        if let Some(msg) = &self.status_message {
            ui.label(msg);
            ui.separator();
        }

        let mut changed = false;

        ui.horizontal(|ui| {
            ui.label("MIDI Input Device:");
            let selected_text = self.selected_input.as_deref().unwrap_or("None").to_string();
            ComboBox::new("midi_input_port", "")
                .selected_text(selected_text)
                .show_ui(ui, |ui| {
                    for port in &self.input_ports {
                        let selected = self.selected_input.as_deref() == Some(port.as_str());
                        if ui.selectable_label(selected, port).clicked() {
                            self.selected_input = Some(port.clone());
                        }
                    }
                });

            if ui.button("Refresh MIDI Ports").clicked() {
                self.refresh_ports(midi);
            }
        });

        ui.horizontal(|ui| {
            let can_connect = self.selected_input.is_some()
                && midi.connected_port() != self.selected_input.as_deref();
            if ui.add_enabled(can_connect, egui::Button::new("Connect")).clicked() {
                if let Some(port) = self.selected_input.clone() {
                    match midi.connect_to_port(&port) {
                        Ok(()) => self.set_status(format!("Connected to {}", port)),
                        Err(err) => {
                            log::error!("{:#}", err);
                            self.set_status(format!("Error: {:#}", err));
                        }
                    }
                    changed = true;
                }
            }
            if ui.add_enabled(midi.is_connected(), egui::Button::new("Disconnect")).clicked() {
                midi.disconnect();
                self.selected_input = None;
                self.set_status("Disconnected");
                changed = true;
            }
        });

        ui.label(match midi.connected_port() {
            Some(port) => format!("Connected: {}", port),
            None => "Not connected".to_string(),
        });

        if let Some(message) = last_message {
            ui.label(format!("Last MIDI message: {}", describe(&message)));
        }

        changed
    }
}

/// Human readable form of a controller message
pub fn describe(message: &ControllerMessage) -> String {
    let channel = message.channel() + 1;
    match (message.status(), message.data2) {
        (NOTE_ON, Some(velocity)) => {
            format!("Note On ch {} note {} vel {}", channel, message.data1, velocity)
        }
        (NOTE_OFF, _) | (NOTE_ON, None) => {
            format!("Note Off ch {} note {}", channel, message.data1)
        }
        (CONTROL_CHANGE, value) => format!(
            "CC ch {} #{} = {}",
            channel,
            message.data1,
            value.unwrap_or_default()
        ),
        _ => format!("0x{:02X} {} {:?}", message.command, message.data1, message.data2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_common_messages() {
        assert_eq!(
            describe(&ControllerMessage::new(0x91, 60, Some(100))),
            "Note On ch 2 note 60 vel 100"
        );
        assert_eq!(
            describe(&ControllerMessage::new(0x80, 60, Some(0))),
            "Note Off ch 1 note 60"
        );
        assert_eq!(
            describe(&ControllerMessage::new(0xB0, 7, Some(64))),
            "CC ch 1 #7 = 64"
        );
        assert_eq!(
            describe(&ControllerMessage::new(0xE0, 0, Some(64))),
            "0xE0 0 Some(64)"
        );
    }
}
