use std::path::PathBuf;

/// Construction-time failures. The only `Result`-returning errors in the
/// crate; everything past construction is either a value or a logged bad
/// access (see [`BadAccessReason`]).
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("unsupported RAM size {got} (expected {expected})")]
    WrongRamSize { got: u32, expected: u32 },

    #[error("unknown machine profile {0:?}")]
    UnknownProfile(String),

    #[error("firmware image not found: {0}")]
    MissingFirmware(PathBuf),

    #[error("no FIFO channel name given")]
    MissingFifoChannel,
}

/// Why a single MMIO access was rejected. Never surfaced to the guest as an
/// error value — reads return 0 and writes are silently dropped — but gives
/// the dispatcher one place to format a log line and gives tests something
/// to assert on besides a bare string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadAccessReason {
    Unaligned,
    WrongWidth,
    UnknownAddress,
    ReadOnlyRegister,
    GatedByAppMode,
    UdsAlreadyRead,
    TimerRunning,
    WriteOnlyRegister,
    FifoOverflow,
}

impl BadAccessReason {
    pub fn as_str(self) -> &'static str {
        match self {
            BadAccessReason::Unaligned => "addr not 32-bit aligned",
            BadAccessReason::WrongWidth => "access width must be 4 bytes",
            BadAccessReason::UnknownAddress => "no register at this address",
            BadAccessReason::ReadOnlyRegister => "register is read-only",
            BadAccessReason::GatedByAppMode => "register inaccessible in app mode",
            BadAccessReason::UdsAlreadyRead => "UDS word already consumed",
            BadAccessReason::TimerRunning => "timer load register is locked while running",
            BadAccessReason::WriteOnlyRegister => "register is write-only",
            BadAccessReason::FifoOverflow => "RX FIFO full, byte dropped",
        }
    }
}
