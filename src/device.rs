//! CPAL device discovery and sink creation.
//!
//! ```no_run
//! use cuetone::{CpalDevice, Engine};
//!
//! for device in CpalDevice::list_outputs() {
//!     println!("{} ({} Hz, {} ch)", device.name(), device.sample_rate(), device.channels());
//! }
//!
//! let device = CpalDevice::default_output().expect("no output device");
//! let engine = Engine::with_layout(device.sample_rate(), device.channels() as usize)
//!     .with_output(device.create_sink().expect("stream failed"));
//! ```

use cpal::traits::{DeviceTrait, HostTrait};

use crate::error::Result;
use crate::nodes::CpalSink;

/// A discovered audio output device.
pub struct CpalDevice {
    device: cpal::Device,
    config: cpal::SupportedStreamConfig,

    name: String,
    sample_rate: u32,
    channels: u16,
}

impl CpalDevice {
    fn from_device(device: cpal::Device) -> Option<Self> {
        let config = match device.default_output_config() {
            Ok(config) => config,
            Err(err) => {
                tracing::debug!("skipping output device: {}", err);
                return None;
            }
        };
        let name = device.name().unwrap_or_else(|_| "Unknown".into());

        Some(Self {
            sample_rate: config.sample_rate().0,
            channels: config.channels(),
            name,
            device,
            config,
        })
    }

    /// Get the system's default output device.
    ///
    /// Returns `None` if no audio device is available.
    pub fn default_output() -> Option<Self> {
        let host = cpal::default_host();
        host.default_output_device().and_then(Self::from_device)
    }

    /// List all available output devices
    pub fn list_outputs() -> Vec<Self> {
        let host = cpal::default_host();
        host.output_devices()
            .map(|devices| devices.filter_map(Self::from_device).collect())
            .unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Open an output stream on this device and wrap it in a sink node
    pub fn create_sink(&self) -> Result<CpalSink> {
        CpalSink::new(&self.device, &self.config)
    }
}
