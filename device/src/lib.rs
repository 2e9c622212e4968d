//! Host-side transport to a memory-mapped accelerator board.
//!
//! The board sits behind a TCP bridge speaking a fixed 24-byte header
//! protocol ([`packet`]). [`RemoteBoard`] drives memory reads, memory
//! writes, and kernel execution over it; [`CycleTimer`] mirrors the
//! firmware's cycle-counter stopwatch on the host side.

pub mod board;
pub mod error;
pub mod packet;
pub mod timer;


pub use board::RemoteBoard;
pub use error::{Error, Result};
pub use packet::{ACK, PACKET_LEN, Packet};
pub use timer::CycleTimer;
