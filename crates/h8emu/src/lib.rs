use anyhow::{anyhow, bail, Context, Result};
use h8emu_core::{CpuConfig, DisasmConfig, Machine, RunOutcome};
use h8emu_devices::{Board, BoardConfig};

/// One second of emulated time at the default clock.
pub const DEFAULT_CYCLES: u64 = 16_000_000;
pub const DEFAULT_LISTING: usize = 32;

const USAGE: &str = "usage:\n  \
    h8emu run <firmware> [cycles] [--trace] [--board]\n  \
    h8emu disasm <firmware> <hex-addr> [count]";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Run {
        firmware: String,
        cycles: u64,
        trace: bool,
        board: bool,
    },
    Disasm {
        firmware: String,
        addr: u32,
        count: usize,
    },
}

pub fn usage() -> &'static str {
    USAGE
}

pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Command> {
    let mut args = args.into_iter();
    let command = args.next().ok_or_else(|| anyhow!("missing command"))?;
    let firmware = args
        .next()
        .ok_or_else(|| anyhow!("missing firmware path"))?;

    match command.as_str() {
        "run" => {
            let mut cycles = DEFAULT_CYCLES;
            let mut trace = false;
            let mut board = false;
            for arg in args {
                match arg.as_str() {
                    "--trace" => trace = true,
                    "--board" => board = true,
                    other => {
                        cycles = other
                            .parse()
                            .with_context(|| format!("invalid cycle count '{}'", other))?
                    }
                }
            }
            Ok(Command::Run {
                firmware,
                cycles,
                trace,
                board,
            })
        }
        "disasm" => {
            let addr = args.next().ok_or_else(|| anyhow!("missing address"))?;
            let addr = u32::from_str_radix(addr.trim_start_matches("0x"), 16)
                .with_context(|| format!("invalid address '{}'", addr))?;
            let count = match args.next() {
                Some(count) => count
                    .parse()
                    .with_context(|| format!("invalid count '{}'", count))?,
                None => DEFAULT_LISTING,
            };
            Ok(Command::Disasm {
                firmware,
                addr,
                count,
            })
        }
        other => bail!("unknown command '{}'", other),
    }
}

pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Run {
            firmware,
            cycles,
            trace,
            board,
        } => {
            let image = read_firmware(&firmware)?;
            run_firmware(&image, cycles, trace, board)
        }
        Command::Disasm {
            firmware,
            addr,
            count,
        } => {
            let image = read_firmware(&firmware)?;
            for line in disassemble_firmware(&image, addr, count)? {
                println!("{}", line);
            }
            Ok(())
        }
    }
}

fn read_firmware(path: &str) -> Result<Vec<u8>> {
    log::info!("Loading firmware '{}'", path);
    std::fs::read(path).with_context(|| format!("failed to read firmware '{}'", path))
}

fn machine(image: &[u8], trace: bool) -> Result<Machine> {
    let config = if trace {
        CpuConfig::builder().trace(DisasmConfig::default()).build()
    } else {
        CpuConfig::default()
    };
    let mut machine = Machine::new(config);
    machine.load(0, image).context("failed to load firmware")?;
    Ok(machine)
}

pub fn run_firmware(image: &[u8], cycles: u64, trace: bool, board: bool) -> Result<()> {
    let mut machine = machine(image, trace)?;
    let board = if board {
        Some(Board::install(&mut machine, &BoardConfig::default()).context("failed to map board")?)
    } else {
        None
    };
    machine.boot().context("boot failed")?;

    let result = if board.is_some() {
        machine.run_with_devices(cycles)
    } else {
        machine.run(cycles)
    };

    if let Some(board) = &board {
        for (i, serial) in board.serial.iter().enumerate() {
            let output = serial.lock().take_output();
            if !output.is_empty() {
                println!("serial {}: {:02X?}", i, output);
            }
        }
    }
    print!("{}", machine.dump());
    println!("emulated time: {:.6} s", machine.real_time_secs());

    match result {
        Ok(RunOutcome::BudgetExhausted { cycles }) => {
            log::info!("Ran {} cycles", cycles);
            Ok(())
        }
        Ok(RunOutcome::Halted { cycles }) => {
            log::info!("Halted after {} cycles", cycles);
            Ok(())
        }
        Err(err) => {
            for (addr, value) in machine.stack_dump(8) {
                println!("  {:06X}: {:08X}", addr, value);
            }
            Err(err).context("firmware faulted")
        }
    }
}

pub fn disassemble_firmware(image: &[u8], addr: u32, count: usize) -> Result<Vec<String>> {
    let machine = machine(image, false)?;
    Ok(machine.disassemble_range(addr, count))
}
