use crate::fifo::Fifo;
use crate::profile::Profile;
use crate::regs::{CDI_WORDS, UDA_WORDS, UDI_WORDS, UDS_WORDS};

pub const CLOCK_FREQ_HZ: u64 = 18_000_000;
pub const NANOS_PER_SECOND: u64 = 1_000_000_000;
pub const WATCHDOG_DEFAULT: u32 = 0x07FF_FFFF;

/// Development-fixture device secrets. This is an emulator, not a
/// provisioning device: every instance boots with the same values.
pub const UDS_DEFAULT: [u32; UDS_WORDS] = [
    0x8080_8080,
    0x9191_9191,
    0xa2a2_a2a2,
    0xb3b3_b3b3,
    0xc4c4_c4c4,
    0xd5d5_d5d5,
    0xe6e6_e6e6,
    0xf7f7_f7f7,
];

pub const UDI_DEFAULT: [u32; UDI_WORDS] = [0x0001_0203, 0x0405_0607];

/// Not given upstream; chosen in the same incrementing-nibble style as
/// [`UDS_DEFAULT`] since the model needs *some* fixed literal value here.
pub const UDA_DEFAULT: [u32; UDA_WORDS] = [0x1010_1010, 0x2121_2121, 0x3232_3232, 0x4343_4343];

/// Returns the nanosecond period of one timer tick at the given prescaler.
/// `max(1, prescaler)` folds the zero-prescaler case (one tick per clock
/// cycle) into the general formula instead of special-casing it.
pub fn interval_ns(prescaler: u32) -> u64 {
    (prescaler.max(1) as u64) * NANOS_PER_SECOND / CLOCK_FREQ_HZ
}

pub struct DeviceState {
    pub profile: Profile,

    pub uds: [u32; UDS_WORDS],
    pub uds_read: [bool; UDS_WORDS],
    pub uda: [u32; UDA_WORDS],
    pub udi: [u32; UDI_WORDS],
    pub cdi: [u32; CDI_WORDS],
    pub fw_ram: Vec<u8>,

    pub app_mode: bool,
    pub app_addr: u32,
    pub app_size: u32,
    pub led: u32,
    pub blake2s: u32,

    pub fifo: Fifo,

    pub timer_initial: u32,
    pub timer: u32,
    pub timer_prescaler: u32,
    pub timer_interval_ns: u64,
    pub timer_running: bool,

    pub watchdog_initial: u32,
    pub watchdog_running: bool,
}

impl DeviceState {
    pub fn new(profile: Profile, fw_ram_size: usize) -> Self {
        Self {
            profile,
            uds: UDS_DEFAULT,
            uds_read: [false; UDS_WORDS],
            uda: UDA_DEFAULT,
            udi: UDI_DEFAULT,
            cdi: [0; CDI_WORDS],
            fw_ram: vec![0; fw_ram_size],
            app_mode: false,
            app_addr: 0,
            app_size: 0,
            led: 0,
            blake2s: 0,
            fifo: Fifo::new(),
            timer_initial: 0,
            timer: 0,
            timer_prescaler: 0,
            timer_interval_ns: interval_ns(0),
            timer_running: false,
            watchdog_initial: WATCHDOG_DEFAULT,
            watchdog_running: false,
        }
    }

    /// Applied on watchdog expiry: returns every gated field to its
    /// power-on value, including re-arming UDS one-shot reads. The device
    /// secrets themselves are not regenerated — they are device fixtures,
    /// not derived from mode.
    pub fn watchdog_reset(&mut self) {
        self.app_mode = false;
        self.app_addr = 0;
        self.app_size = 0;
        self.led = 0;
        self.blake2s = 0;
        self.uds_read = [false; UDS_WORDS];
        self.cdi = [0; CDI_WORDS];

        self.timer_initial = 0;
        self.timer = 0;
        self.timer_prescaler = 0;
        self.timer_interval_ns = interval_ns(0);
        self.timer_running = false;

        self.watchdog_initial = WATCHDOG_DEFAULT;
        self.watchdog_running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_prescaler_ticks_once_per_clock_cycle() {
        assert_eq!(interval_ns(0), NANOS_PER_SECOND / CLOCK_FREQ_HZ);
        assert_eq!(interval_ns(1), NANOS_PER_SECOND / CLOCK_FREQ_HZ);
    }

    #[test]
    fn watchdog_reset_clears_mode_and_rearms_uds() {
        let mut state = DeviceState::new(Profile::Tk1, 0x1000);
        state.app_mode = true;
        state.uds_read[3] = true;
        state.cdi[0] = 0xdead_beef;

        state.watchdog_reset();

        assert!(!state.app_mode);
        assert!(!state.uds_read[3]);
        assert_eq!(state.cdi[0], 0);
        assert_eq!(state.uds, UDS_DEFAULT);
    }
}
