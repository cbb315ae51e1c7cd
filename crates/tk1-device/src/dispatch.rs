use std::io::Write as _;

use tk1_platform::{CharDeviceBackend, EntropySource, GuestLog, ResetRequester, TimeSource, TimerQueue};

use crate::error::BadAccessReason;
use crate::fifo::EMPTY_SENTINEL;
use crate::profile::Profile;
use crate::regs::{self, RegisterId, EMULATOR_BASE, FW_RAM_BASE, FW_RAM_SIZE};
use crate::state::{interval_ns, DeviceState};
use crate::timers::{self, Tk1Timer};

const DEBUG_REGISTER: u32 = EMULATOR_BASE + 0x1000;

/// The MMIO core: owns device state, the pending-timer queue, and every
/// host collaborator it was constructed with. This is the one type most
/// callers touch; everything else in the crate is a building block of it.
pub struct Device {
    state: DeviceState,
    queue: TimerQueue<Tk1Timer>,
    clock: TimeSource,
    chardev: Box<dyn CharDeviceBackend>,
    entropy: Box<dyn EntropySource>,
    log: Box<dyn GuestLog>,
    reset: Box<dyn ResetRequester>,
}

impl Device {
    pub fn new(
        profile: Profile,
        clock: TimeSource,
        chardev: Box<dyn CharDeviceBackend>,
        entropy: Box<dyn EntropySource>,
        log: Box<dyn GuestLog>,
        reset: Box<dyn ResetRequester>,
    ) -> Self {
        Self {
            state: DeviceState::new(profile, FW_RAM_SIZE),
            queue: TimerQueue::new(),
            clock,
            chardev,
            entropy,
            log,
            reset,
        }
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    /// Room left in the RX FIFO; the character-device backend must not
    /// deliver more bytes than this without risking a drop.
    pub fn can_receive(&self) -> usize {
        self.state.fifo.can_receive()
    }

    /// Delivers bytes from the character-device backend into the RX FIFO.
    /// Bytes beyond capacity are dropped and logged, never overrunning the
    /// buffer.
    pub fn receive_bytes(&mut self, bytes: &[u8]) {
        let dropped = self.state.fifo.receive(bytes);
        if dropped > 0 {
            self.log.log(&format!(
                "rx fifo: {}",
                BadAccessReason::FifoOverflow.as_str()
            ));
        }
    }

    /// The next virtual-clock deadline a host should wake this device at,
    /// if any timer is armed.
    pub fn next_deadline_ns(&self) -> Option<u64> {
        self.queue.next_deadline_ns()
    }

    /// Drains every timer event due at or before `now_ns`, applying each
    /// one in deadline order.
    pub fn on_clock_tick(&mut self, now_ns: u64) {
        while let Some(ev) = self.queue.pop_due(now_ns) {
            match ev.payload {
                Tk1Timer::Countdown => {
                    timers::handle_countdown_tick(&mut self.state, &mut self.queue, ev.deadline_ns)
                }
                Tk1Timer::Watchdog => {
                    timers::handle_watchdog_tick(&mut self.state, self.reset.as_mut())
                }
            }
        }
    }

    fn bad(&mut self, offset: u32, width: u32, value: Option<u32>, reason: BadAccessReason) -> u32 {
        match value {
            Some(v) => self.log.log(&format!(
                "bad mmio write at {offset:#010x} (width {width}): {} (value {v:#010x})",
                reason.as_str()
            )),
            None => self.log.log(&format!(
                "bad mmio read at {offset:#010x} (width {width}): {}",
                reason.as_str()
            )),
        }
        0
    }

    pub fn mmio_read(&mut self, offset: u32, width: u32) -> u32 {
        if offset == DEBUG_REGISTER {
            return self.bad(offset, width, None, BadAccessReason::WriteOnlyRegister);
        }
        if let Some(fw_offset) = self.fw_ram_offset(offset) {
            if width != 1 {
                return self.bad(offset, width, None, BadAccessReason::WrongWidth);
            }
            if self.state.app_mode {
                return self.bad(offset, width, None, BadAccessReason::GatedByAppMode);
            }
            return self.state.fw_ram[fw_offset] as u32;
        }
        if width != 4 {
            return self.bad(offset, width, None, BadAccessReason::WrongWidth);
        }
        if offset % 4 != 0 {
            return self.bad(offset, width, None, BadAccessReason::Unaligned);
        }
        let Some(id) = regs::decode(offset) else {
            return self.bad(offset, width, None, BadAccessReason::UnknownAddress);
        };
        self.read_register(offset, width, id)
    }

    pub fn mmio_write(&mut self, offset: u32, value: u32, width: u32) {
        if offset == DEBUG_REGISTER {
            let _ = std::io::stdout().write_all(&[value as u8]);
            return;
        }
        if let Some(fw_offset) = self.fw_ram_offset(offset) {
            if width != 1 {
                self.bad(offset, width, Some(value), BadAccessReason::WrongWidth);
                return;
            }
            if self.state.app_mode {
                self.bad(offset, width, Some(value), BadAccessReason::GatedByAppMode);
                return;
            }
            self.state.fw_ram[fw_offset] = value as u8;
            return;
        }
        if width != 4 {
            self.bad(offset, width, Some(value), BadAccessReason::WrongWidth);
            return;
        }
        if offset % 4 != 0 {
            self.bad(offset, width, Some(value), BadAccessReason::Unaligned);
            return;
        }
        let Some(id) = regs::decode(offset) else {
            self.bad(offset, width, Some(value), BadAccessReason::UnknownAddress);
            return;
        };
        self.write_register(offset, width, value, id);
    }

    fn fw_ram_offset(&self, offset: u32) -> Option<usize> {
        let rel = offset.checked_sub(FW_RAM_BASE)?;
        let rel = rel as usize;
        (rel < self.state.fw_ram.len()).then_some(rel)
    }

    fn read_register(&mut self, offset: u32, width: u32, id: RegisterId) -> u32 {
        if let Some(v) = regs::static_value(id) {
            return v;
        }
        match id {
            RegisterId::TrngStatus => 1,
            RegisterId::TrngEntropy => self.entropy.next_u32(),

            RegisterId::TimerCtrl => self.bad(offset, width, None, BadAccessReason::UnknownAddress),
            RegisterId::TimerStatus => (!self.state.timer_running) as u32,
            RegisterId::TimerPrescaler => self.state.timer_prescaler,
            RegisterId::TimerTimer => self.state.timer,

            RegisterId::Uds(i) => {
                if self.state.app_mode {
                    return self.bad(offset, width, None, BadAccessReason::GatedByAppMode);
                }
                if self.state.uds_read[i] {
                    return self.bad(offset, width, None, BadAccessReason::UdsAlreadyRead);
                }
                self.state.uds_read[i] = true;
                self.state.uds[i]
            }

            RegisterId::RxStatus => self.state.fifo.len() as u32,
            RegisterId::RxData => match self.state.fifo.pop() {
                Some(b) => b as u32,
                None => EMPTY_SENTINEL,
            },
            RegisterId::TxStatus => 1,
            RegisterId::TxData => self.bad(offset, width, None, BadAccessReason::WriteOnlyRegister),

            RegisterId::TouchStatus => 1,

            RegisterId::Uda(i) => {
                if self.state.app_mode {
                    return self.bad(offset, width, None, BadAccessReason::GatedByAppMode);
                }
                self.state.uda[i]
            }

            RegisterId::CoreName0 => self.state.profile.core_name0(),
            // Readable in both modes: firmware/app code needs to be able to
            // query the latch state, not just flip it.
            RegisterId::SwitchApp => {
                if self.state.app_mode {
                    0xFFFF_FFFF
                } else {
                    0
                }
            }
            RegisterId::Led => self.state.led,
            RegisterId::AppAddr => {
                if self.state.app_mode {
                    return self.bad(offset, width, None, BadAccessReason::GatedByAppMode);
                }
                self.state.app_addr
            }
            RegisterId::AppSize => {
                if self.state.app_mode {
                    return self.bad(offset, width, None, BadAccessReason::GatedByAppMode);
                }
                self.state.app_size
            }
            RegisterId::Blake2s => self.state.blake2s,
            RegisterId::WatchdogCtrl => self.bad(offset, width, None, BadAccessReason::UnknownAddress),
            RegisterId::WatchdogTimerInit => {
                self.bad(offset, width, None, BadAccessReason::UnknownAddress)
            }

            RegisterId::Cdi(i) => self.state.cdi[i],
            RegisterId::Udi(i) => {
                if self.state.profile.gates_udi_by_mode() && self.state.app_mode {
                    return self.bad(offset, width, None, BadAccessReason::GatedByAppMode);
                }
                self.state.udi[i]
            }

            _ => self.bad(offset, width, None, BadAccessReason::UnknownAddress),
        }
    }

    fn write_register(&mut self, offset: u32, width: u32, value: u32, id: RegisterId) {
        if regs::is_read_only(id) {
            self.bad(offset, width, Some(value), BadAccessReason::ReadOnlyRegister);
            return;
        }
        match id {
            RegisterId::TimerCtrl => {
                if self.state.timer_running {
                    timers::stop_countdown(&mut self.state);
                } else {
                    let now = self.clock.now_ns();
                    timers::start_countdown(&mut self.state, &mut self.queue, now);
                }
            }
            RegisterId::TimerPrescaler => {
                self.state.timer_prescaler = value;
                self.state.timer_interval_ns = interval_ns(value);
            }
            RegisterId::TimerTimer => {
                if self.state.app_mode {
                    self.bad(offset, width, Some(value), BadAccessReason::GatedByAppMode);
                    return;
                }
                if self.state.timer_running {
                    self.bad(offset, width, Some(value), BadAccessReason::TimerRunning);
                    return;
                }
                self.state.timer_initial = value;
                self.state.timer = value;
            }

            RegisterId::TouchStatus => {}

            RegisterId::SwitchApp => {
                if self.state.app_mode {
                    self.bad(offset, width, Some(value), BadAccessReason::GatedByAppMode);
                    return;
                }
                self.state.app_mode = true;
            }
            RegisterId::Led => self.state.led = value,
            RegisterId::AppAddr => {
                if self.state.app_mode {
                    self.bad(offset, width, Some(value), BadAccessReason::GatedByAppMode);
                    return;
                }
                self.state.app_addr = value;
            }
            RegisterId::AppSize => {
                if self.state.app_mode {
                    self.bad(offset, width, Some(value), BadAccessReason::GatedByAppMode);
                    return;
                }
                self.state.app_size = value;
            }
            RegisterId::Blake2s => self.state.blake2s = value,

            RegisterId::WatchdogCtrl => {
                if value & 0x1 != 0 {
                    let now = self.clock.now_ns();
                    timers::start_watchdog(&mut self.state, &mut self.queue, now);
                }
                if value & 0x2 != 0 {
                    timers::disarm_watchdog(&mut self.state);
                }
            }
            RegisterId::WatchdogTimerInit => self.state.watchdog_initial = value,

            RegisterId::Cdi(i) => {
                if self.state.app_mode {
                    self.bad(offset, width, Some(value), BadAccessReason::GatedByAppMode);
                    return;
                }
                self.state.cdi[i] = value;
            }
            RegisterId::TxData => self.chardev.write(&[value as u8]),

            _ => {
                self.bad(offset, width, Some(value), BadAccessReason::UnknownAddress);
            }
        }
    }
}
