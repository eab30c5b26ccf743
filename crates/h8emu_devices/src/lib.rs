//! On-chip peripherals of the H8S family for the `h8emu_core` device bus.
//!
//! Every device receives absolute bus addresses and talks back to the
//! interpreter only through the tick context. [`Board::install`] maps the
//! whole set at the standard register addresses.

pub mod board;
pub mod dma;
pub mod refresh;
pub mod regs;
pub mod serial;
pub mod timers;

#[cfg(test)]
mod tests;

pub use board::{Board, BoardConfig};
pub use dma::Dma;
pub use refresh::RefreshController;
pub use regs::{Adc, CatchAll, HwRegs, Ier};
pub use serial::Serial;
pub use timers::Timers;
