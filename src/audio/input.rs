use crate::audio::rms_energy;
use crate::config::AssistantConfig;
use crate::{HarkError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, Device, SampleRate, Stream, StreamConfig};
use crossbeam_channel::Sender;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Microphone capture producer
///
/// Opens a mono 16-bit input stream at the configured rate and forwards
/// energy-gated blocks into the frame queue. The capture callback never
/// blocks: if the listener falls behind, frames are dropped.
pub struct FrameCapture {
    device: Device,
    config: StreamConfig,
    energy_threshold: f32,
    stream: Option<Stream>,
    is_capturing: Arc<Mutex<bool>>,
}

impl FrameCapture {
    /// Create a capture producer on the default input device
    pub fn new(config: &AssistantConfig) -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| HarkError::AudioDeviceError("No input device available".into()))?;

        info!(
            "Using input device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let stream_config = StreamConfig {
            channels: 1,
            sample_rate: SampleRate(config.sample_rate),
            buffer_size: BufferSize::Fixed(config.block_size),
        };

        Ok(Self {
            device,
            config: stream_config,
            energy_threshold: config.energy_threshold,
            stream: None,
            is_capturing: Arc::new(Mutex::new(false)),
        })
    }

    /// Get the sample rate of the capture stream
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    /// Start capturing and send frames to the provided channel
    pub fn start(&mut self, frame_tx: Sender<Vec<i16>>) -> Result<()> {
        if *self.is_capturing.lock() {
            warn!("Already capturing");
            return Ok(());
        }

        let energy_threshold = self.energy_threshold;
        let is_capturing = Arc::clone(&self.is_capturing);

        let err_fn = |err| {
            error!("Audio input stream error: {}", err);
        };

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    if !*is_capturing.lock() {
                        return;
                    }

                    // Gate out low-level noise before it reaches the recognizer
                    if rms_energy(data) < energy_threshold {
                        return;
                    }

                    if let Err(e) = frame_tx.try_send(data.to_vec()) {
                        debug!("Dropping audio frame: {}", e);
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| {
                HarkError::AudioDeviceError(format!("Failed to build input stream: {}", e))
            })?;

        stream.play().map_err(|e| {
            HarkError::AudioDeviceError(format!("Failed to start input stream: {}", e))
        })?;

        *self.is_capturing.lock() = true;
        self.stream = Some(stream);

        info!("Started audio capture");
        Ok(())
    }

    /// Stop capturing
    pub fn stop(&mut self) -> Result<()> {
        *self.is_capturing.lock() = false;

        if let Some(stream) = self.stream.take() {
            drop(stream);
            info!("Stopped audio capture");
        }

        Ok(())
    }

    /// Check if currently capturing
    pub fn is_capturing(&self) -> bool {
        *self.is_capturing.lock()
    }
}

impl Drop for FrameCapture {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
