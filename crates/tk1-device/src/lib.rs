//! The TK1 / MTA1-MKDF MMIO security-token core: register map, device
//! state, FIFO bridge, timer subsystem, and the dispatcher tying them
//! together. Host collaborators (clock, character device, entropy, guest
//! log, reset) live in `tk1-platform` and are injected at construction.

mod dispatch;
mod error;
mod fifo;
mod profile;
mod regs;
mod state;
mod timers;

pub use dispatch::Device;
pub use error::{BadAccessReason, InitError};
pub use fifo::{CAPACITY as FIFO_CAPACITY, EMPTY_SENTINEL as FIFO_EMPTY_SENTINEL};
pub use profile::Profile;
pub use regs::{
    CORE_BASE, EMULATOR_BASE, FW_RAM_BASE, FW_RAM_SIZE, RegisterId, TIMER_BASE, TOUCH_BASE,
    TRNG_BASE, UART_BASE, UDS_BASE,
};
pub use state::{interval_ns, DeviceState, CLOCK_FREQ_HZ, NANOS_PER_SECOND, WATCHDOG_DEFAULT};
pub use timers::Tk1Timer;
