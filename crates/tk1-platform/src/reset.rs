//! Best-effort machine-reset hook the watchdog calls after it has already
//! reset its own device-level state.

pub trait ResetRequester {
    fn request_machine_reset(&mut self);
}

/// No machine to reset; the device-level reset already applied is all there is.
#[derive(Debug, Default)]
pub struct NullResetRequester;

impl ResetRequester for NullResetRequester {
    fn request_machine_reset(&mut self) {}
}

/// Counts calls, for asserting the watchdog actually asked for a reset.
#[derive(Debug, Default)]
pub struct RecordingResetRequester {
    pub requests: u32,
}

impl ResetRequester for RecordingResetRequester {
    fn request_machine_reset(&mut self) {
        self.requests += 1;
    }
}
