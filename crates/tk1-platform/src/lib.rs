//! Host-collaborator interfaces shared by the device crates.
//!
//! Everything here is a narrow trait plus a fake/recording implementation,
//! handed to a device at construction rather than reached for through a
//! global. This mirrors how the wider emulator wires interrupt sinks and
//! snapshot targets into its own device crates.

mod chardev;
mod entropy;
mod log;
mod reset;
mod time;

pub use chardev::{CharDeviceBackend, NullCharDevice, RecordingCharDevice};
pub use entropy::{EntropySource, FakeEntropySource};
pub use log::{GuestLog, NullLog, RecordingLog};
pub use reset::{NullResetRequester, RecordingResetRequester, ResetRequester};
pub use time::{Event, FakeHostClock, HostClock, TimeSource, TimerQueue};
