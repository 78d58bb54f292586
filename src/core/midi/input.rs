use anyhow::{anyhow, Context, Result};
use crossbeam_channel::Sender;
use midir::{Ignore, MidiInput, MidiInputConnection};
use crate::core::input::ControllerMessage;
use crate::messaging::SynthMessage;

const CLIENT_NAME: &str = "KeyTheorem MIDI Input";

/// Handles MIDI input from connected devices
pub struct MidiInputHandler {
    connection: Option<MidiInputConnection<()>>,
    connected_port: Option<String>,
    message_sender: Sender<SynthMessage>,
}

impl MidiInputHandler {
    /// Create a new MIDI input handler
    pub fn new(message_sender: Sender<SynthMessage>) -> Self {
        Self {
            connection: None,
            connected_port: None,
            message_sender,
        }
    }

    /// List all available MIDI input ports. Empty when MIDI is unavailable.
    pub fn list_ports(&self) -> Vec<String> {
        match MidiInput::new(CLIENT_NAME) {
            Ok(midi_in) => midi_in
                .ports()
                .iter()
                .filter_map(|port| midi_in.port_name(port).ok())
                .collect(),
            Err(err) => {
                log::warn!("MIDI input unavailable: {}", err);
                Vec::new()
            }
        }
    }

    /// Connect to a specific MIDI input port by name
    pub fn connect_to_port(&mut self, port_name: &str) -> Result<()> {
        self.disconnect();

        let mut midi_in = MidiInput::new(CLIENT_NAME).context("Failed to create MIDI input")?;
        midi_in.ignore(Ignore::All);

        let port = midi_in
            .ports()
            .into_iter()
            .find(|port| {
                midi_in
                    .port_name(port)
                    .map(|name| name == port_name)
                    .unwrap_or(false)
            })
            .ok_or_else(|| anyhow!("MIDI port '{}' not found", port_name))?;

        let sender = self.message_sender.clone();
        let connection = midi_in
            .connect(
                &port,
                "keytheorem-read-input",
                move |_stamp, message, _| Self::handle_midi_message(message, &sender),
                (),
            )
            .map_err(|err| anyhow!("Failed to connect to MIDI port '{}': {}", port_name, err))?;

        log::info!("connected to MIDI port {}", port_name);
        self.connection = Some(connection);
        self.connected_port = Some(port_name.to_string());
        Ok(())
    }

    /// Disconnect from the currently connected MIDI port
    pub fn disconnect(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.close();
            log::info!("disconnected from MIDI port");
        }
        self.connected_port = None;
    }

    pub fn connected_port(&self) -> Option<&str> {
        self.connected_port.as_deref()
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Forward a raw message to the synth. Malformed messages are dropped.
    fn handle_midi_message(message: &[u8], sender: &Sender<SynthMessage>) {
        if let Some(parsed) = ControllerMessage::from_bytes(message) {
            sender.send(SynthMessage::Controller(parsed)).ok();
        }
    }
}
