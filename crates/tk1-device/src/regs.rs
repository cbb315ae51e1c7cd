//! The MMIO register table: one place mapping an offset to what it means,
//! rather than the decoding logic being scattered through the dispatcher
//! as a chain of address comparisons.

pub const TRNG_BASE: u32 = 0x00_000000;
pub const TIMER_BASE: u32 = 0x01_000000;
pub const UDS_BASE: u32 = 0x02_000000;
pub const UART_BASE: u32 = 0x03_000000;
pub const TOUCH_BASE: u32 = 0x04_000000;
pub const EMULATOR_BASE: u32 = 0x3e_000000;
pub const CORE_BASE: u32 = 0x3f_000000;

/// Firmware scratch RAM lives outside every sub-block above; it's a plain
/// byte-addressable window, not a register file. The base is an emulator
/// convention, not silicon, since the real hardware maps it through SRAM.
pub const FW_RAM_BASE: u32 = 0x1000_0000;
pub const FW_RAM_SIZE: usize = 0x2000;

const NAME1_MKDF: u32 = 0x6d6b_6466; // "mkdf"
const VERSION_1: u32 = 1;

pub const UDS_WORDS: usize = 8;
pub const UDA_WORDS: usize = 4;
pub const UDI_WORDS: usize = 2;
pub const CDI_WORDS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterId {
    TrngName0,
    TrngName1,
    TrngVersion,
    TrngStatus,
    TrngEntropy,

    TimerName0,
    TimerName1,
    TimerVersion,
    TimerCtrl,
    TimerStatus,
    TimerPrescaler,
    TimerTimer,

    UdsName0,
    UdsName1,
    UdsVersion,
    Uds(usize),

    UartName0,
    UartName1,
    UartVersion,
    RxStatus,
    RxData,
    TxStatus,
    TxData,

    TouchName0,
    TouchName1,
    TouchVersion,
    TouchStatus,

    Uda(usize),
    Debug,

    CoreName0,
    CoreName1,
    CoreVersion,
    SwitchApp,
    Led,
    AppAddr,
    AppSize,
    Blake2s,
    WatchdogCtrl,
    WatchdogTimerInit,
    Cdi(usize),
    Udi(usize),
}

/// Registers whose value never depends on profile or state — the identity
/// triplets, plus the other always-constant reads. Profile-dependent NAME0
/// (Core) and live state reads are handled by the dispatcher.
pub fn static_value(id: RegisterId) -> Option<u32> {
    match id {
        RegisterId::TrngName0 => Some(u32::from_be_bytes(*b"trng")),
        RegisterId::TrngName1 => Some(NAME1_MKDF),
        RegisterId::TrngVersion => Some(VERSION_1),
        RegisterId::TimerName0 => Some(u32::from_be_bytes(*b"timr")),
        RegisterId::TimerName1 => Some(NAME1_MKDF),
        RegisterId::TimerVersion => Some(VERSION_1),
        RegisterId::UdsName0 => Some(u32::from_be_bytes(*b"uds ")),
        RegisterId::UdsName1 => Some(NAME1_MKDF),
        RegisterId::UdsVersion => Some(VERSION_1),
        RegisterId::UartName0 => Some(u32::from_be_bytes(*b"uart")),
        RegisterId::UartName1 => Some(NAME1_MKDF),
        RegisterId::UartVersion => Some(VERSION_1),
        RegisterId::TouchName0 => Some(u32::from_be_bytes(*b"touc")),
        RegisterId::TouchName1 => Some(NAME1_MKDF),
        RegisterId::TouchVersion => Some(VERSION_1),
        RegisterId::CoreName1 => Some(NAME1_MKDF),
        RegisterId::CoreVersion => Some(VERSION_1),
        _ => None,
    }
}

/// True for registers that only ever accept reads; writes to them are bad
/// regardless of mode.
pub fn is_read_only(id: RegisterId) -> bool {
    matches!(
        id,
        RegisterId::TrngName0
            | RegisterId::TrngName1
            | RegisterId::TrngVersion
            | RegisterId::TrngStatus
            | RegisterId::TrngEntropy
            | RegisterId::TimerName0
            | RegisterId::TimerName1
            | RegisterId::TimerVersion
            | RegisterId::TimerStatus
            | RegisterId::UdsName0
            | RegisterId::UdsName1
            | RegisterId::UdsVersion
            | RegisterId::Uds(_)
            | RegisterId::UartName0
            | RegisterId::UartName1
            | RegisterId::UartVersion
            | RegisterId::RxStatus
            | RegisterId::RxData
            | RegisterId::TxStatus
            | RegisterId::TouchName0
            | RegisterId::TouchName1
            | RegisterId::TouchVersion
            | RegisterId::Uda(_)
            | RegisterId::CoreName0
            | RegisterId::CoreName1
            | RegisterId::CoreVersion
            | RegisterId::Udi(_)
    )
}

fn decode_word_array(offset: u32, base: u32, first: u32, count: usize) -> Option<usize> {
    if offset < base + first {
        return None;
    }
    let idx = (offset - (base + first)) / 4;
    if (idx as usize) < count && offset == base + first + idx * 4 {
        Some(idx as usize)
    } else {
        None
    }
}

/// Resolves an MMIO-base-relative offset to the register it names, or
/// `None` if nothing is mapped there. Callers are responsible for width and
/// alignment checks; this only answers "what is at this address".
pub fn decode(offset: u32) -> Option<RegisterId> {
    if let Some(id) = decode_fixed(offset, TRNG_BASE, |o| match o {
        0x00 => Some(RegisterId::TrngName0),
        0x04 => Some(RegisterId::TrngName1),
        0x08 => Some(RegisterId::TrngVersion),
        0x24 => Some(RegisterId::TrngStatus),
        0x80 => Some(RegisterId::TrngEntropy),
        _ => None,
    }) {
        return Some(id);
    }
    if let Some(id) = decode_fixed(offset, TIMER_BASE, |o| match o {
        0x00 => Some(RegisterId::TimerName0),
        0x04 => Some(RegisterId::TimerName1),
        0x08 => Some(RegisterId::TimerVersion),
        0x20 => Some(RegisterId::TimerCtrl),
        0x24 => Some(RegisterId::TimerStatus),
        0x28 => Some(RegisterId::TimerPrescaler),
        0x2c => Some(RegisterId::TimerTimer),
        _ => None,
    }) {
        return Some(id);
    }
    if let Some(id) = decode_fixed(offset, UDS_BASE, |o| match o {
        0x00 => Some(RegisterId::UdsName0),
        0x04 => Some(RegisterId::UdsName1),
        0x08 => Some(RegisterId::UdsVersion),
        _ => None,
    }) {
        return Some(id);
    }
    if let Some(idx) = decode_word_array(offset, UDS_BASE, 0x40, UDS_WORDS) {
        return Some(RegisterId::Uds(idx));
    }
    if let Some(id) = decode_fixed(offset, UART_BASE, |o| match o {
        0x00 => Some(RegisterId::UartName0),
        0x04 => Some(RegisterId::UartName1),
        0x08 => Some(RegisterId::UartVersion),
        0x80 => Some(RegisterId::RxStatus),
        0x84 => Some(RegisterId::RxData),
        0x100 => Some(RegisterId::TxStatus),
        0x104 => Some(RegisterId::TxData),
        _ => None,
    }) {
        return Some(id);
    }
    if let Some(id) = decode_fixed(offset, TOUCH_BASE, |o| match o {
        0x00 => Some(RegisterId::TouchName0),
        0x04 => Some(RegisterId::TouchName1),
        0x08 => Some(RegisterId::TouchVersion),
        0x24 => Some(RegisterId::TouchStatus),
        _ => None,
    }) {
        return Some(id);
    }
    if let Some(idx) = decode_word_array(offset, EMULATOR_BASE, 0x20, UDA_WORDS) {
        return Some(RegisterId::Uda(idx));
    }
    if offset == EMULATOR_BASE + 0x1000 {
        return Some(RegisterId::Debug);
    }
    if let Some(id) = decode_fixed(offset, CORE_BASE, |o| match o {
        0x00 => Some(RegisterId::CoreName0),
        0x04 => Some(RegisterId::CoreName1),
        0x08 => Some(RegisterId::CoreVersion),
        0x20 => Some(RegisterId::SwitchApp),
        0x24 => Some(RegisterId::Led),
        0x30 => Some(RegisterId::AppAddr),
        0x34 => Some(RegisterId::AppSize),
        0x38 => Some(RegisterId::Blake2s),
        0x40 => Some(RegisterId::WatchdogCtrl),
        0x44 => Some(RegisterId::WatchdogTimerInit),
        _ => None,
    }) {
        return Some(id);
    }
    if let Some(idx) = decode_word_array(offset, CORE_BASE, 0x80, CDI_WORDS) {
        return Some(RegisterId::Cdi(idx));
    }
    if let Some(idx) = decode_word_array(offset, CORE_BASE, 0xc0, UDI_WORDS) {
        return Some(RegisterId::Udi(idx));
    }
    None
}

fn decode_fixed(offset: u32, base: u32, f: impl Fn(u32) -> Option<RegisterId>) -> Option<RegisterId> {
    offset.checked_sub(base).and_then(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_literal_scenario_addresses() {
        assert_eq!(decode(0x0200_0040), Some(RegisterId::Uds(0)));
        assert_eq!(decode(0x0200_0044), Some(RegisterId::Uds(1)));
        assert_eq!(decode(0x3f00_0020), Some(RegisterId::SwitchApp));
        assert_eq!(decode(0x3f00_0000), Some(RegisterId::CoreName0));
        assert_eq!(decode(0x3f00_0004), Some(RegisterId::CoreName1));
        assert_eq!(decode(0x3f00_0008), Some(RegisterId::CoreVersion));
        assert_eq!(decode(0x0100_002c), Some(RegisterId::TimerTimer));
        assert_eq!(decode(0x0100_0028), Some(RegisterId::TimerPrescaler));
        assert_eq!(decode(0x0100_0020), Some(RegisterId::TimerCtrl));
        assert_eq!(decode(0x0100_0024), Some(RegisterId::TimerStatus));
        assert_eq!(decode(0x0300_0080), Some(RegisterId::RxStatus));
        assert_eq!(decode(0x0300_0084), Some(RegisterId::RxData));
    }

    #[test]
    fn unknown_offset_decodes_to_none() {
        assert_eq!(decode(0x3f00_0fff), None);
        assert_eq!(decode(0x0500_0000), None);
    }

    #[test]
    fn word_arrays_reject_misaligned_indices() {
        // One byte into the UDS array should not alias word 0.
        assert_eq!(decode(UDS_BASE + 0x41), None);
    }

    #[test]
    fn name0_values_match_ascii_big_endian_packing() {
        assert_eq!(static_value(RegisterId::TrngName0), Some(0x7472_6e67));
    }
}
