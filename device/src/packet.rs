//! Wire format for the accelerator bridge.
//!
//! Every exchange starts with one fixed 24-byte header: a 32-bit kind,
//! four bytes of padding, and two 64-bit fields, all little-endian. Reads
//! answer with raw bytes; writes and executions answer with [`ACK`].

use crate::error::{Result, UnknownPacketKindSnafu};

/// Acknowledgment word sent by the board after writes and executions.
pub const ACK: u32 = 0x4c3f_2baf;

/// Encoded header size on the wire.
pub const PACKET_LEN: usize = 24;

/// Host-to-board request header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Packet {
    /// Read `len` bytes of board memory starting at `addr`.
    Read { addr: u64, len: u64 },
    /// Write `len` bytes starting at `addr`; the payload follows the
    /// header on the wire.
    Write { addr: u64, len: u64 },
    /// Start execution at `addr` and run until the core halts at `stop`.
    Execute { addr: u64, stop: u64 },
}

impl Packet {
    const KIND_READ: u32 = 0;
    const KIND_WRITE: u32 = 1;
    const KIND_EXECUTE: u32 = 2;

    pub fn encode(&self) -> [u8; PACKET_LEN] {
        let (kind, a, b) = match *self {
            Self::Read { addr, len } => (Self::KIND_READ, addr, len),
            Self::Write { addr, len } => (Self::KIND_WRITE, addr, len),
            Self::Execute { addr, stop } => (Self::KIND_EXECUTE, addr, stop),
        };
        let mut buf = [0u8; PACKET_LEN];
        buf[..4].copy_from_slice(&kind.to_le_bytes());
        buf[8..16].copy_from_slice(&a.to_le_bytes());
        buf[16..24].copy_from_slice(&b.to_le_bytes());
        buf
    }

    pub fn decode(buf: &[u8; PACKET_LEN]) -> Result<Self> {
        let a = u64_at(buf, 8);
        let b = u64_at(buf, 16);
        match u32_at(buf, 0) {
            Self::KIND_READ => Ok(Self::Read { addr: a, len: b }),
            Self::KIND_WRITE => Ok(Self::Write { addr: a, len: b }),
            Self::KIND_EXECUTE => Ok(Self::Execute { addr: a, stop: b }),
            kind => UnknownPacketKindSnafu { kind }.fail(),
        }
    }
}

fn u32_at(buf: &[u8; PACKET_LEN], offset: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&buf[offset..offset + 4]);
    u32::from_le_bytes(word)
}

fn u64_at(buf: &[u8; PACKET_LEN], offset: usize) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&buf[offset..offset + 8]);
    u64::from_le_bytes(word)
}
