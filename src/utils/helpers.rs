/// Format a frequency value with appropriate unit suffix (Hz, kHz)
pub fn format_frequency(freq: f64) -> String {
    if freq >= 1000.0 {
        format!("{:.2} kHz", freq / 1000.0)
    } else {
        format!("{:.1} Hz", freq)
    }
}

/// Calculate decibels from a linear amplitude value
pub fn amplitude_to_db(amplitude: f32) -> f32 {
    // Avoid log of zero
    if amplitude <= 0.0 {
        -96.0
    } else {
        20.0 * amplitude.log10()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_frequencies() {
        assert_eq!(format_frequency(130.8127826), "130.8 Hz");
        assert_eq!(format_frequency(1046.5), "1.05 kHz");
    }

    #[test]
    fn silence_has_a_floor() {
        assert_eq!(amplitude_to_db(0.0), -96.0);
        assert!((amplitude_to_db(1.0)).abs() < 1e-6);
        assert!((amplitude_to_db(0.5) + 6.0206).abs() < 1e-3);
    }
}
