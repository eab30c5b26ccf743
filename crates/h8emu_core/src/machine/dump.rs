use std::fmt;

use crate::cpu::{Ccr, Cpu, Exr};

/// Snapshot of the architectural registers for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegisterDump {
    pub pc: u32,
    pub er: [u32; 8],
    pub ccr: Ccr,
    pub exr: Exr,
    pub cycles: u64,
}

impl RegisterDump {
    pub(crate) fn from_cpu(cpu: &Cpu) -> Self {
        Self {
            pc: cpu.regs.pc,
            er: cpu.regs.er,
            ccr: cpu.regs.ccr,
            exr: cpu.regs.exr,
            cycles: cpu.cycles(),
        }
    }

    /// CCR as flag letters from bit 7 down, `-` for a clear flag.
    pub fn ccr_letters(&self) -> String {
        const LETTERS: [(Ccr, char); 8] = [
            (Ccr::I, 'I'),
            (Ccr::UI, 'u'),
            (Ccr::H, 'H'),
            (Ccr::U, 'U'),
            (Ccr::N, 'N'),
            (Ccr::Z, 'Z'),
            (Ccr::V, 'V'),
            (Ccr::C, 'C'),
        ];
        LETTERS
            .iter()
            .map(|&(flag, letter)| if self.ccr.contains(flag) { letter } else { '-' })
            .collect()
    }
}

impl fmt::Display for RegisterDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "PC=0x{:06X} CCR=0x{:02X} [{}] EXR=0x{:02X} cycles={}",
            self.pc,
            self.ccr.bits(),
            self.ccr_letters(),
            self.exr.bits(),
            self.cycles
        )?;
        for (i, value) in self.er.iter().enumerate() {
            let sep = if i == 3 || i == 7 { "\n" } else { " " };
            write!(f, "ER{}=0x{:08X}{}", i, value, sep)?;
        }
        Ok(())
    }
}
