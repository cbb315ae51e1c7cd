use std::sync::Arc;

use tk1_device::{Device, Profile, CORE_BASE, FIFO_EMPTY_SENTINEL, TIMER_BASE, UART_BASE, UDS_BASE};
use tk1_platform::{
    FakeEntropySource, FakeHostClock, NullResetRequester, RecordingCharDevice, RecordingLog,
    TimeSource,
};

fn device(profile: Profile) -> (Device, Arc<FakeHostClock>) {
    let clock = Arc::new(FakeHostClock::new(0));
    let time = TimeSource::new(clock.clone());
    let dev = Device::new(
        profile,
        time,
        Box::new(RecordingCharDevice::default()),
        Box::new(FakeEntropySource::new(1)),
        Box::new(RecordingLog::default()),
        Box::new(NullResetRequester),
    );
    (dev, clock)
}

#[test]
fn uds_one_shot_per_word() {
    let (mut dev, _clock) = device(Profile::Tk1);

    assert_eq!(dev.mmio_read(UDS_BASE + 0x40, 4), 0x8080_8080);
    assert_eq!(dev.mmio_read(UDS_BASE + 0x40, 4), 0);
    assert_eq!(dev.mmio_read(UDS_BASE + 0x44, 4), 0x9191_9191);
}

#[test]
fn mode_latch_gates_secrets_and_is_readable_both_ways() {
    let (mut dev, _clock) = device(Profile::Tk1);

    dev.mmio_write(CORE_BASE + 0x20, 1, 4);
    assert_eq!(dev.mmio_read(CORE_BASE + 0x20, 4), 0xFFFF_FFFF);
    assert_eq!(dev.mmio_read(UDS_BASE + 0x40, 4), 0);
}

#[test]
fn name_identity_triplet() {
    let (mut dev, _clock) = device(Profile::Tk1);

    assert_eq!(dev.mmio_read(CORE_BASE, 4), 0x746b_3120);
    assert_eq!(dev.mmio_read(CORE_BASE + 0x04, 4), 0x6d6b_6466);
    assert_eq!(dev.mmio_read(CORE_BASE + 0x08, 4), 1);
}

#[test]
fn timer_roundtrip_reaches_zero_and_reports_ready() {
    let (mut dev, clock) = device(Profile::Tk1);

    dev.mmio_write(TIMER_BASE + 0x2c, 10, 4);
    dev.mmio_write(TIMER_BASE + 0x28, 0, 4);
    dev.mmio_write(TIMER_BASE + 0x20, 1, 4);

    loop {
        let Some(deadline) = dev.next_deadline_ns() else {
            break;
        };
        clock.set_ns(deadline);
        dev.on_clock_tick(deadline);
    }

    assert_eq!(dev.mmio_read(TIMER_BASE + 0x2c, 4), 0);
    assert_eq!(dev.mmio_read(TIMER_BASE + 0x24, 4), 1);
}

#[test]
fn fifo_roundtrip_drains_in_order_then_reports_empty() {
    let (mut dev, _clock) = device(Profile::Tk1);

    dev.receive_bytes(&[0xAA, 0xBB]);
    assert_eq!(dev.mmio_read(UART_BASE + 0x80, 4), 2);
    assert_eq!(dev.mmio_read(UART_BASE + 0x84, 4), 0xAA);
    assert_eq!(dev.mmio_read(UART_BASE + 0x84, 4), 0xBB);
    assert_eq!(dev.mmio_read(UART_BASE + 0x84, 4), FIFO_EMPTY_SENTINEL);
}

#[test]
fn unaligned_access_is_rejected() {
    let (mut dev, _clock) = device(Profile::Tk1);
    assert_eq!(dev.mmio_read(CORE_BASE + 1, 4), 0);
}

#[test]
fn watchdog_expiry_returns_device_to_firmware_mode() {
    let (mut dev, clock) = device(Profile::Tk1);

    dev.mmio_write(CORE_BASE + 0x20, 1, 4); // enter app mode
    dev.mmio_write(CORE_BASE + 0x44, 1, 4); // watchdog_initial = 1 cycle
    dev.mmio_write(CORE_BASE + 0x40, 0x1, 4); // arm

    let deadline = dev.next_deadline_ns().unwrap();
    clock.set_ns(deadline);
    dev.on_clock_tick(deadline);

    // Back in firmware mode: the latch cleared and UDS is readable again.
    assert_eq!(dev.mmio_read(CORE_BASE + 0x20, 4), 0);
    assert_eq!(dev.mmio_read(UDS_BASE + 0x40, 4), 0x8080_8080);
}

#[test]
fn legacy_profile_allows_udi_read_in_app_mode() {
    let (mut dev, _clock) = device(Profile::Mta1Mkdf);
    dev.mmio_write(CORE_BASE + 0x20, 1, 4);
    assert_eq!(dev.mmio_read(CORE_BASE + 0xc0, 4), 0x0001_0203);
}

#[test]
fn tk1_profile_gates_udi_read_in_app_mode() {
    let (mut dev, _clock) = device(Profile::Tk1);
    dev.mmio_write(CORE_BASE + 0x20, 1, 4);
    assert_eq!(dev.mmio_read(CORE_BASE + 0xc0, 4), 0);
}
