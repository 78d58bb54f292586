//! cpal output stream feeding the synth to the sound card

use anyhow::{anyhow, bail, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Sample, SampleFormat, Stream};
use std::sync::{Arc, RwLock};
use crate::core::synth::Synth;

pub const FALLBACK_SAMPLE_RATE: f32 = 44_100.0;

/// Frames reserved for one callback when the host picks the buffer size
const DEFAULT_CALLBACK_FRAMES: usize = 8192;

/// An output device with the configuration it will be opened with
pub struct OutputDevice {
    pub device: cpal::Device,
    pub name: String,
    pub config: cpal::SupportedStreamConfig,
}

impl OutputDevice {
    /// The device called `preferred`, or the host default
    pub fn open(preferred: Option<&str>) -> Result<Self> {
        let host = cpal::default_host();
        log::info!("using audio host: {}", host.id().name());

        let device = match preferred {
            Some(name) => match find_output_device(&host, name) {
                Some(device) => device,
                None => {
                    log::warn!("output device '{}' not found, using default", name);
                    default_output_device(&host)?
                }
            },
            None => default_output_device(&host)?,
        };

        let name = device.name().unwrap_or_else(|_| "unknown".to_string());
        let config = device
            .default_output_config()
            .with_context(|| format!("No output config for '{}'", name))?;
        log::info!("output device {} at {:?}", name, config);

        Ok(Self {
            device,
            name,
            config,
        })
    }

    pub fn sample_rate(&self) -> f32 {
        self.config.sample_rate().0 as f32
    }
}

/// Names of every output device of the default host
pub fn output_device_names() -> Vec<String> {
    let host = cpal::default_host();
    match host.output_devices() {
        Ok(devices) => devices.filter_map(|d| d.name().ok()).collect(),
        Err(err) => {
            log::warn!("cannot list output devices: {}", err);
            Vec::new()
        }
    }
}

fn default_output_device(host: &cpal::Host) -> Result<cpal::Device> {
    host.default_output_device()
        .ok_or_else(|| anyhow!("No output device available"))
}

fn find_output_device(host: &cpal::Host, name: &str) -> Option<cpal::Device> {
    host.output_devices()
        .ok()?
        .find(|d| d.name().map(|n| n == name).unwrap_or(false))
}

/// A playing output stream. Dropping it stops the sound.
pub struct AudioOutput {
    _stream: Stream,
    device_name: String,
    sample_rate: f32,
}

impl AudioOutput {
    pub fn start(output: &OutputDevice, synth: Arc<RwLock<Synth>>) -> Result<Self> {
        let sample_format = output.config.sample_format();
        let config = cpal::StreamConfig::from(output.config.clone());

        let stream = match sample_format {
            SampleFormat::F32 => create_stream::<f32>(&output.device, &config, synth),
            SampleFormat::I16 => create_stream::<i16>(&output.device, &config, synth),
            SampleFormat::U16 => create_stream::<u16>(&output.device, &config, synth),
            other => bail!("Unsupported sample format {:?}", other),
        }?;

        stream.play().context("Failed to start the output stream")?;
        log::info!("audio stream started on {}", output.name);

        Ok(Self {
            _stream: stream,
            device_name: output.name.clone(),
            sample_rate: output.sample_rate(),
        })
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}

/// Mono scratch length for one callback, allocated before the stream runs
fn callback_frames(buffer_size: &cpal::BufferSize) -> usize {
    match buffer_size {
        cpal::BufferSize::Fixed(frames) => (*frames as usize).max(1),
        cpal::BufferSize::Default => DEFAULT_CALLBACK_FRAMES,
    }
}

fn create_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    synth: Arc<RwLock<Synth>>,
) -> Result<Stream>
where
    T: Sample + Send + 'static + cpal::SizedSample + cpal::FromSample<f32>,
{
    let channels = config.channels as usize;
    let err_fn = |err| log::error!("an error occurred on the audio stream: {}", err);
    let mut mono = vec![0.0f32; callback_frames(&config.buffer_size)];

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let frames = data.len() / channels;
            if frames > mono.len() {
                // only when the host hands out more than it announced
                mono.resize(frames, 0.0);
            }
            let block = &mut mono[..frames];

            match synth.write() {
                Ok(mut guard) => guard.render(block),
                Err(_) => block.iter_mut().for_each(|s| *s = 0.0),
            }

            for (frame, value) in data.chunks_mut(channels).zip(block.iter()) {
                let value_t = T::from_sample(*value);
                for sample in frame.iter_mut() {
                    *sample = value_t;
                }
            }
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}
