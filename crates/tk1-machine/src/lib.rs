//! Composition layer: turns a [`MachineConfig`] plus a set of host
//! collaborators into a running [`Machine`]. Mirrors the way the wider
//! emulator's own machine crate takes a plain configuration struct rather
//! than a class hierarchy — there is no CPU, ROM, or RAM simulation here,
//! only the MMIO core and its validated construction parameters.

use std::path::PathBuf;
use std::sync::Arc;

use tk1_device::{Device, InitError, Profile};
use tk1_platform::{CharDeviceBackend, EntropySource, GuestLog, HostClock, ResetRequester, TimeSource};

/// The RAM size every supported board ships with. Not configurable on real
/// hardware; construction rejects anything else rather than silently
/// reinterpreting it.
pub const EXPECTED_RAM_SIZE: u32 = 128 * 1024;

#[derive(Debug, Clone)]
pub struct MachineConfig {
    pub profile: Profile,
    pub fifo_channel_name: String,
    pub firmware_path: PathBuf,
    pub ram_size: u32,
}

pub struct Machine {
    device: Device,
}

impl std::fmt::Debug for Machine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Machine").finish_non_exhaustive()
    }
}

impl Machine {
    /// Validates `config`, then wires the MMIO core to the given host
    /// collaborators. Firmware loading and CPU/ROM/RAM instantiation are a
    /// hosting emulator's responsibility, not this crate's; construction
    /// here only checks that a firmware image exists at the given path.
    pub fn new(
        config: MachineConfig,
        clock: Arc<dyn HostClock>,
        chardev: Box<dyn CharDeviceBackend>,
        entropy: Box<dyn EntropySource>,
        log: Box<dyn GuestLog>,
        reset: Box<dyn ResetRequester>,
    ) -> Result<Self, InitError> {
        if config.ram_size != EXPECTED_RAM_SIZE {
            return Err(InitError::WrongRamSize {
                got: config.ram_size,
                expected: EXPECTED_RAM_SIZE,
            });
        }
        if config.fifo_channel_name.trim().is_empty() {
            return Err(InitError::MissingFifoChannel);
        }
        if !config.firmware_path.is_file() {
            return Err(InitError::MissingFirmware(config.firmware_path));
        }

        let device = Device::new(
            config.profile,
            TimeSource::new(clock),
            chardev,
            entropy,
            log,
            reset,
        );
        Ok(Self { device })
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut Device {
        &mut self.device
    }
}
