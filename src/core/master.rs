use serde::{Deserialize, Serialize};

pub const DEFAULT_VOLUME: f32 = 0.5;
pub const DEFAULT_RING_DEPTH: f32 = 0.0;

/// Gain stage shared by every voice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MasterBus {
    volume: f32,
    ring_depth: f32,
}

impl MasterBus {
    pub fn new(volume: f32, ring_depth: f32) -> Self {
        let mut bus = Self::default();
        bus.set_volume(volume);
        bus.set_ring_depth(ring_depth);
        bus
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn ring_depth(&self) -> f32 {
        self.ring_depth
    }

    /// Returns false and keeps the previous value for non-finite input.
    pub fn set_volume(&mut self, volume: f32) -> bool {
        if !volume.is_finite() {
            log::warn!("ignoring volume {}", volume);
            return false;
        }
        self.volume = volume;
        true
    }

    pub fn set_ring_depth(&mut self, depth: f32) -> bool {
        if !depth.is_finite() {
            log::warn!("ignoring ring depth {}", depth);
            return false;
        }
        self.ring_depth = depth;
        true
    }

    /// Parses a control-surface value; anything but a finite number is None.
    pub fn parse_level(text: &str) -> Option<f32> {
        text.trim().parse::<f32>().ok().filter(|v| v.is_finite())
    }

    /// Crossfades the summed dry and ring-modulated signals, then applies
    /// the master volume.
    pub fn mix(&self, dry: f32, ring: f32) -> f32 {
        let depth = self.ring_depth;
        self.volume * ((1.0 - depth) * dry + depth * ring)
    }
}

impl Default for MasterBus {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            ring_depth: DEFAULT_RING_DEPTH,
        }
    }
}
