use super::*;
use crate::bus::TickContext;
use crate::error::Access;

const PROGRAM: [u8; 10] = [
    0x7A, 0x07, 0x00, 0xFF, 0xFF, 0x00, // MOV.L #0xFFFF00,ER7
    0x07, 0x00, // LDC #0x00,CCR
    0x40, 0xFE, // BRA .
];

const HANDLER: [u8; 4] = [
    0x0A, 0x08, // INC.B R0L
    0x56, 0x70, // RTE
];

/// Raises interrupt 20 once, after `at` cycles.
struct OneShot {
    at: u64,
    fired: bool,
}

impl Device for OneShot {
    fn read8(&mut self, _addr: u32) -> u8 {
        self.fired as u8
    }

    fn write8(&mut self, _addr: u32, _value: u8) {}

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> crate::error::Result<()> {
        if !self.fired && ctx.cycles() >= self.at {
            self.fired = true;
            ctx.raise(20);
        }
        Ok(())
    }
}

fn machine_with(config: CpuConfig) -> Machine {
    let mut machine = Machine::new(config);
    machine.load(0, &[0x00, 0x00, 0x01, 0x00]).unwrap();
    machine.load(20 * 4, &[0x00, 0x00, 0x02, 0x00]).unwrap();
    machine.load(0x100, &PROGRAM).unwrap();
    machine.load(0x200, &HANDLER).unwrap();
    machine.boot().unwrap();
    machine
}

fn machine() -> Machine {
    machine_with(CpuConfig::default())
}

#[test]
fn run_stops_once_budget_is_spent() {
    let mut machine = machine();
    let outcome = machine.run(1_000).unwrap();
    let RunOutcome::BudgetExhausted { cycles } = outcome else {
        panic!("unexpected outcome {:?}", outcome);
    };
    assert!(cycles >= 1_000);
    assert_eq!(machine.cycles(), cycles);
    assert_eq!(machine.pc(), 0x108);
    assert_eq!(machine.regs().sp(), 0xFF_FF00);
}

#[test]
fn halt_handle_stops_a_run() {
    let mut machine = machine();
    let handle = machine.halt_handle();
    std::thread::spawn(move || handle.halt()).join().unwrap();

    assert_eq!(machine.run(1_000).unwrap(), RunOutcome::Halted { cycles: 0 });
    assert_eq!(machine.cycles(), 0);

    machine.halt_handle().resume();
    assert!(matches!(
        machine.run(100).unwrap(),
        RunOutcome::BudgetExhausted { .. }
    ));
}

#[test]
fn devices_raise_interrupts_between_steps() {
    let mut machine = machine();
    machine
        .register_device(0x40_0000, 4, OneShot { at: 100, fired: false })
        .unwrap();

    machine.run(1_000).unwrap();
    assert_eq!(machine.regs().read_byte(8), 0);

    machine.run_with_devices(1_000).unwrap();
    assert_eq!(machine.regs().read_byte(8), 1);
    assert_eq!(machine.pc(), 0x108);
    assert_eq!(machine.cpu().call_depth(), 0);
    assert_eq!(machine.cpu().pending(), 0);
}

#[test]
fn fault_is_sticky_until_boot() {
    let mut machine = machine();
    machine.load(0x100, &[0x01, 0xA0]).unwrap();

    let err = machine.step().unwrap_err();
    assert!(matches!(err, CpuError::IllegalInstruction { pc: 0x100, .. }));
    assert_eq!(machine.fault(), Some(&err));
    assert_eq!(machine.pc(), 0x100);
    assert_eq!(machine.run(100).unwrap_err(), err);

    machine.load(0x100, &PROGRAM).unwrap();
    machine.boot().unwrap();
    assert!(machine.fault().is_none());
    machine.step().unwrap();
}

#[test]
fn accesses_beyond_memory_fault() {
    let config = CpuConfig::builder().memory_size(0x1000).build();
    let mut machine = Machine::new(config);
    machine.load(0, &[0x00, 0x00, 0x01, 0x00]).unwrap();
    // MOV.B @0xFF8000,R0L
    machine.load(0x100, &[0x6A, 0x08, 0x80, 0x00]).unwrap();
    machine.boot().unwrap();

    assert_eq!(
        machine.step().unwrap_err(),
        CpuError::OutOfRange {
            addr: 0xFF_8000,
            access: Access::read(8),
        }
    );
    assert_eq!(machine.pc(), 0x100);

    assert_eq!(
        machine.load(0xFF0, &[0; 32]),
        Err(ConfigError::ImageTooLarge {
            offset: 0xFF0,
            len: 32,
            size: 0x1000,
        })
    );
}

#[test]
fn overlapping_devices_are_rejected() {
    let mut machine = machine();
    let device = || OneShot { at: 0, fired: false };
    machine.register_device(0x40_0000, 0x10, device()).unwrap();
    assert!(matches!(
        machine.register_device(0x40_000F, 2, device()),
        Err(ConfigError::OverlappingDevice { .. })
    ));
    assert_eq!(machine.bus().device_count(), 1);
}

#[test]
fn disassembly_has_no_side_effects() {
    let machine = machine();
    assert_eq!(
        machine.disassemble(0x100).unwrap(),
        ("MOV.L #0x00FFFF00,ER7".to_string(), 6)
    );
    assert_eq!(
        machine.disassemble_range(0x100, 3),
        vec![
            "000100: MOV.L #0x00FFFF00,ER7",
            "000106: LDC #0x00,CCR",
            "000108: BRA 0x000108",
        ]
    );
    assert_eq!(machine.cycles(), 0);
    assert_eq!(machine.pc(), 0x100);
}

#[test]
fn undecodable_words_are_listed_and_skipped() {
    let mut machine = machine();
    machine.load(0x300, &[0x01, 0xA0, 0x00, 0x00]).unwrap();
    assert_eq!(
        machine.disassemble_range(0x300, 2),
        vec!["000300: .word 0x01A0", "000302: NOP"]
    );
}

#[test]
fn register_dump_display() {
    let machine = machine();
    let text = machine.dump().to_string();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("PC=0x000100 CCR=0x80 [I-------] EXR=0x00 cycles=0")
    );
    assert_eq!(
        lines.next(),
        Some("ER0=0x00000000 ER1=0x00000000 ER2=0x00000000 ER3=0x00000000")
    );
    assert_eq!(lines.count(), 1);
}

#[test]
fn real_time_follows_clock_rate() {
    let mut machine = machine_with(CpuConfig::builder().clock_hz(1_000).build());
    machine.run(500).unwrap();
    let expected = machine.cycles() as f64 / 1_000.0;
    assert!((machine.real_time_secs() - expected).abs() < f64::EPSILON);
}

#[test]
fn stack_dump_surrounds_stack_pointer() {
    let mut machine = machine();
    machine.step().unwrap();
    machine
        .bus_mut()
        .memory_mut()
        .load(0xFF_FF00, &[0xDE, 0xAD, 0xBE, 0xEF])
        .unwrap();

    let words = machine.stack_dump(2);
    assert_eq!(words.len(), 6);
    assert_eq!(words[0].0, 0xFF_FEF0);
    assert_eq!(words[4], (0xFF_FF00, 0xDEAD_BEEF));
    assert_eq!(words[5], (0xFF_FF04, 0));
}

#[test]
fn stack_dump_stops_at_end_of_memory() {
    let mut machine = machine();
    machine.cpu_mut().regs.set_sp(0xFF_FFF8);

    let words = machine.stack_dump(usize::MAX);
    assert_eq!(words.len(), 6);
    assert_eq!(words[0].0, 0xFF_FFE8);
    assert_eq!(words.last().map(|w| w.0), Some(0xFF_FFFC));

    let mut small = machine_with(CpuConfig::builder().memory_size(0x1000).build());
    small.cpu_mut().regs.set_sp(0xFF8);
    assert_eq!(small.stack_dump(100).len(), 6);
}
