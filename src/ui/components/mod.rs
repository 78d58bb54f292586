mod keyboard;
mod waveform_plot;

pub use keyboard::{KeyLayout, KeyboardView};
pub use waveform_plot::WaveformPlot;
