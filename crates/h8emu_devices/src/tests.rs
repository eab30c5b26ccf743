use super::*;
use h8emu_core::{shared, Bus, ConfigError, DeviceBus, Machine, MemoryImage, SharedDevice};

use crate::board::{ADC_BASE, DMA_BASE, IER_ADDRESS, REFRESH_BASE, SERIAL_BASES};
use crate::timers::TIMER_BASE;

fn bus() -> DeviceBus {
    DeviceBus::new(MemoryImage::new(0x1000))
}

fn mapped<D: h8emu_core::Device + 'static>(
    bus: &mut DeviceBus,
    base: u32,
    len: u32,
    device: D,
) -> SharedDevice<D> {
    let device = shared(device);
    bus.register(base, len, device.clone()).unwrap();
    device
}

#[test]
fn timer_compare_match_clears_counter_and_raises() {
    let mut bus = bus();
    let timers = mapped(&mut bus, TIMER_BASE, 0x40, Timers::default());

    // Channel 0: clear on GRA, internal clock / 1, IMIA enabled.
    bus.write8(TIMER_BASE + 0x04, 0x20).unwrap();
    bus.write8(TIMER_BASE + 0x06, 0xF9).unwrap();
    bus.write8(TIMER_BASE + 0x0A, 0x00).unwrap();
    bus.write8(TIMER_BASE + 0x0B, 0x03).unwrap();
    bus.write8(TIMER_BASE, 0xC1).unwrap();

    assert_eq!(bus.tick(0).unwrap(), 0);
    assert_eq!(bus.tick(4).unwrap(), 1 << 24);
    assert_eq!(timers.lock().tcnt(0), Some(0));
    // IMFA and OVF latched on top of the reset value.
    assert_eq!(bus.read8(TIMER_BASE + 0x07).unwrap(), 0xFD);
}

#[test]
fn stopped_and_external_channels_do_not_count() {
    let mut bus = bus();
    let timers = mapped(&mut bus, TIMER_BASE, 0x40, Timers::default());

    bus.tick(100).unwrap();
    assert_eq!(timers.lock().tcnt(0), Some(0));

    // Channel 1 started but externally clocked.
    bus.write8(TIMER_BASE + 0x0E, 0x04).unwrap();
    bus.write8(TIMER_BASE, 0xC2).unwrap();
    bus.tick(200).unwrap();
    assert_eq!(timers.lock().tcnt(1), Some(0));

    timers.lock().tick_external(1);
    assert_eq!(bus.read8(TIMER_BASE + 0x0E + 6).unwrap(), 0x00);
    assert_eq!(bus.read8(TIMER_BASE + 0x0E + 7).unwrap(), 0x00);
}

#[test]
fn timer_prescaler_divides_the_clock() {
    let mut bus = bus();
    let timers = mapped(&mut bus, TIMER_BASE, 0x40, Timers::default());
    // Channel 2, clock / 8, free running.
    bus.write8(TIMER_BASE + 0x18, 0x03).unwrap();
    bus.write8(TIMER_BASE, 0xC4).unwrap();
    bus.tick(80).unwrap();
    assert_eq!(timers.lock().tcnt(2), Some(10));
    assert_eq!(bus.read8(TIMER_BASE + 0x18 + 5).unwrap(), 10);
}

#[test]
fn timer_spare_registers_hold_values() {
    let mut bus = bus();
    mapped(&mut bus, TIMER_BASE, 0x40, Timers::default());
    bus.write8(TIMER_BASE + 0x2C, 0x5A).unwrap();
    assert_eq!(bus.read8(TIMER_BASE + 0x2C).unwrap(), 0x5A);
    assert_eq!(bus.read8(TIMER_BASE + 2).unwrap(), 0x80);
}

#[test]
fn refresh_compare_match() {
    let mut bus = bus();
    mapped(&mut bus, REFRESH_BASE, 4, RefreshController::default());

    assert_eq!(bus.read8(REFRESH_BASE).unwrap(), 0x02);
    // Interrupt enabled, clock / 2, match at 2.
    bus.write8(REFRESH_BASE + 1, 0x48).unwrap();
    bus.write8(REFRESH_BASE + 3, 2).unwrap();

    assert_eq!(bus.tick(4).unwrap(), 1 << 21);
    assert_eq!(bus.read8(REFRESH_BASE + 2).unwrap(), 0);
    assert_eq!(bus.read8(REFRESH_BASE + 1).unwrap(), 0xCF);
    assert_eq!(bus.tick(6).unwrap(), 0);
}

#[test]
fn serial_output_and_transmit_interrupts() {
    let mut bus = bus();
    let base = SERIAL_BASES[0];
    let serial = mapped(&mut bus, base, 8, Serial::new(0));

    bus.write8(base + 2, 0x84).unwrap();
    bus.write8(base + 3, 0x90).unwrap();
    bus.write8(base + 3, 0xFE).unwrap();
    assert_eq!(serial.lock().take_output(), vec![0x90]);
    assert_eq!(bus.read8(base + 4).unwrap(), 0x00);

    assert_eq!(bus.tick(5_119).unwrap(), 0);
    assert_eq!(bus.tick(5_120).unwrap(), 1 << 54 | 1 << 55);
    assert_eq!(bus.read8(base + 4).unwrap(), 0x84);
    assert!(serial.lock().take_output().is_empty());
}

#[test]
fn serial_input_waits_for_rdrf_to_clear() {
    let mut bus = bus();
    let base = SERIAL_BASES[1];
    let serial = mapped(&mut bus, base, 8, Serial::new(4));
    serial.lock().provide_input(&[0xF0, 0x41]);

    assert_eq!(bus.tick(0).unwrap(), 1 << 57);
    assert_eq!(bus.read8(base + 5).unwrap(), 0xF0);
    assert_eq!(bus.tick(10).unwrap(), 0);

    bus.write8(base + 4, 0x80).unwrap();
    assert_eq!(bus.tick(20).unwrap(), 1 << 57);
    assert_eq!(bus.read8(base + 5).unwrap(), 0x41);
    assert_eq!(serial.lock().pending_input(), 0);
}

#[test]
fn dma_copies_on_next_tick() {
    let mut bus = bus();
    bus.memory_mut().load(0x100, &[1, 2, 3, 4]).unwrap();
    let dma = mapped(&mut bus, DMA_BASE, 16, Dma::new(0));

    let setup = [
        (1, 0x00),
        (2, 0x01),
        (3, 0x00), // MARA = 0x000100
        (4, 0x00),
        (5, 0x04), // ETCRA = 4
        (9, 0x00),
        (10, 0x02),
        (11, 0x00), // MARB = 0x000200
        (15, 0x98), // DTCRB: enabled, incrementing, DTIE
    ];
    for (reg, value) in setup {
        bus.write8(DMA_BASE + reg, value).unwrap();
    }
    bus.write8(DMA_BASE + 7, 0x96).unwrap();
    assert!(dma.lock().is_busy());
    assert_eq!(bus.memory().slice(0x200, 4), Some(&[0, 0, 0, 0][..]));

    assert_eq!(bus.tick(1).unwrap(), 1 << 45);
    assert_eq!(bus.memory().slice(0x200, 4), Some(&[1, 2, 3, 4][..]));
    assert!(!dma.lock().is_busy());
    assert_eq!(bus.tick(2).unwrap(), 0);
}

#[test]
fn dma_ignores_unsupported_modes() {
    let mut bus = bus();
    let dma = mapped(&mut bus, DMA_BASE, 16, Dma::new(0));
    bus.write8(DMA_BASE + 15, 0x80).unwrap();
    // Word transfers are not modelled.
    bus.write8(DMA_BASE + 7, 0xC6).unwrap();
    assert!(!dma.lock().is_busy());
    assert_eq!(bus.read8(DMA_BASE + 7).unwrap(), 0xC6);
}

#[test]
fn fixed_value_registers() {
    let mut bus = bus();
    let adc = mapped(&mut bus, ADC_BASE, 8, Adc::new(0x1234));
    mapped(&mut bus, IER_ADDRESS, 1, Ier::default());
    mapped(&mut bus, 0xFF_FFC0, 0x20, HwRegs::default());
    mapped(&mut bus, 0x800, 0x10, CatchAll);

    assert_eq!(bus.read8(ADC_BASE).unwrap(), 0x12);
    assert_eq!(bus.read8(ADC_BASE + 3).unwrap(), 0x34);
    adc.lock().set_value(0xABCD);
    assert_eq!(bus.read16(ADC_BASE + 6).unwrap(), 0xABCD);

    bus.write8(IER_ADDRESS, 0x3F).unwrap();
    assert_eq!(bus.read8(IER_ADDRESS).unwrap(), 0x3F);

    bus.write8(0xFF_FFC7, 0x11).unwrap();
    assert_eq!(bus.read8(0xFF_FFC7).unwrap(), 0x11);

    bus.write8(0x804, 0x55).unwrap();
    assert_eq!(bus.read8(0x804).unwrap(), 0);
    assert_eq!(bus.memory().read8(0x804).unwrap(), 0);
}

#[test]
fn board_covers_register_area() {
    let mut machine = Machine::default();
    Board::install(&mut machine, &BoardConfig::default()).unwrap();

    let bus = machine.bus();
    assert!(!bus.is_mapped(0xFF_FF1B));
    for addr in [0xFF_FF1C, 0xFF_FF20, 0xFF_FF30, 0xFF_FFAC, 0xFF_FFF5, 0xFF_FFFF] {
        assert!(bus.is_mapped(addr), "0x{:06X} unmapped", addr);
    }
    // Seven devices and six filler windows.
    assert_eq!(bus.device_count(), 13);

    assert!(matches!(
        Board::install(&mut machine, &BoardConfig::default()),
        Err(ConfigError::OverlappingDevice { .. })
    ));
}

#[test]
fn board_without_optional_devices() {
    let mut machine = Machine::default();
    let config = BoardConfig::builder()
        .dma(false)
        .refresh(false)
        .catch_all(vec![(0x20_0000, 0x1000)])
        .build();
    Board::install(&mut machine, &config).unwrap();

    // DMA and refresh windows are plain registers now.
    let bus = machine.bus_mut();
    bus.write8(DMA_BASE + 7, 0x96).unwrap();
    assert_eq!(bus.read8(DMA_BASE + 7).unwrap(), 0x96);
    assert_eq!(bus.read8(REFRESH_BASE).unwrap(), 0);
    assert!(bus.is_mapped(0x20_0800));
}

#[test]
fn firmware_talks_to_board_serial() {
    let mut machine = Machine::default();
    let board = Board::install(&mut machine, &BoardConfig::default()).unwrap();
    machine.load(0, &[0x00, 0x00, 0x01, 0x00]).unwrap();
    machine
        .load(
            0x100,
            &[
                0xF8, 0x90, // MOV.B #0x90,R0L
                0x38, 0xB3, // MOV.B R0L,@TDR0
                0x40, 0xFE, // BRA .
            ],
        )
        .unwrap();
    machine.boot().unwrap();
    machine.run_with_devices(200).unwrap();

    assert_eq!(board.serial[0].lock().take_output(), vec![0x90]);
    assert!(board.serial[1].lock().take_output().is_empty());
}
