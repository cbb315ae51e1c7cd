//! The outward half of the FIFO bridge: pushing guest-written bytes to
//! whatever the host attached as the device's serial backend.

use std::cell::RefCell;

/// A sink the device writes guest TX bytes to. Writes are fire-and-forget;
/// the device does not learn whether the backend accepted them.
pub trait CharDeviceBackend {
    fn write(&mut self, bytes: &[u8]);
}

/// Discards everything written to it.
#[derive(Debug, Default)]
pub struct NullCharDevice;

impl CharDeviceBackend for NullCharDevice {
    fn write(&mut self, _bytes: &[u8]) {}
}

/// Records every write for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingCharDevice {
    pub written: RefCell<Vec<u8>>,
}

impl CharDeviceBackend for RecordingCharDevice {
    fn write(&mut self, bytes: &[u8]) {
        self.written.borrow_mut().extend_from_slice(bytes);
    }
}
