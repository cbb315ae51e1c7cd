//! Command-line entry point mirroring the hosting emulator's own machine
//! selector: a board profile, a firmware image, and a FIFO channel name.
//! Construction failures are the only error path and map to a nonzero
//! exit code.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, ValueEnum};

use tk1_device::Profile;
use tk1_machine::{Machine, MachineConfig};
use tk1_platform::{FakeEntropySource, GuestLog, HostClock, NullCharDevice, ResetRequester};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MachineKind {
    Tk1,
    #[value(name = "mta1_mkdf")]
    Mta1Mkdf,
}

impl From<MachineKind> for Profile {
    fn from(kind: MachineKind) -> Self {
        match kind {
            MachineKind::Tk1 => Profile::Tk1,
            MachineKind::Mta1Mkdf => Profile::Mta1Mkdf,
        }
    }
}

/// Emulates a Tillitis TK1 (or legacy MTA1-MKDF) security token's MMIO core.
#[derive(Debug, Parser)]
#[command(name = "tk1-machine")]
struct Cli {
    /// Which board profile to emulate.
    #[arg(value_enum)]
    machine: MachineKind,

    /// Path to the firmware image to attach.
    #[arg(long = "bios")]
    firmware: PathBuf,

    /// Name of the FIFO channel the UART sub-block bridges to.
    #[arg(long = "chardev")]
    chardev_name: String,

    /// RAM size in bytes; only the board default is accepted.
    #[arg(long, default_value_t = tk1_machine::EXPECTED_RAM_SIZE)]
    ram_size: u32,
}

struct WallClock {
    start: Instant,
}

impl HostClock for WallClock {
    fn now_ns(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }
}

struct StderrLog;

impl GuestLog for StderrLog {
    fn log(&self, message: &str) {
        eprintln!("tk1-machine: {message}");
    }
}

struct PrintingResetRequester;

impl ResetRequester for PrintingResetRequester {
    fn request_machine_reset(&mut self) {
        eprintln!("tk1-machine: watchdog requested a machine reset");
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = MachineConfig {
        profile: cli.machine.into(),
        fifo_channel_name: cli.chardev_name,
        firmware_path: cli.firmware,
        ram_size: cli.ram_size,
    };

    let clock: Arc<dyn HostClock> = Arc::new(WallClock {
        start: Instant::now(),
    });

    let machine = Machine::new(
        config,
        clock,
        Box::new(NullCharDevice),
        Box::new(FakeEntropySource::new(0xC0FF_EE11)),
        Box::new(StderrLog),
        Box::new(PrintingResetRequester),
    )
    .context("failed to initialize machine")?;

    eprintln!(
        "tk1-machine: initialized ({} sub-block identity confirmed)",
        if matches!(machine.device().state().profile, Profile::Tk1) {
            "tk1"
        } else {
            "mta1_mkdf"
        }
    );

    Ok(())
}
