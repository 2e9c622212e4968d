//! TCP bridge to a memory-mapped accelerator board.

use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};

use snafu::{ResultExt, ensure};

use crate::error::{BadAckSnafu, ConnectSnafu, RecvSnafu, Result, SendSnafu};
use crate::packet::{ACK, Packet};

/// Synchronous connection to the board's bridge server.
///
/// Every request is one header packet, an optional payload, and one
/// reply. The protocol has no framing beyond that, so requests on a
/// single connection must not be interleaved.
#[derive(Debug)]
pub struct RemoteBoard {
    stream: TcpStream,
}

impl RemoteBoard {
    /// Dials the bridge server.
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr).context(ConnectSnafu)?;
        if let Ok(peer) = stream.peer_addr() {
            tracing::debug!(%peer, "connected to board bridge");
        }
        Ok(Self { stream })
    }

    /// Reads `len` bytes of board memory starting at `addr`. The board
    /// answers with the raw bytes and nothing else.
    pub fn read_bytes(&mut self, addr: u64, len: usize) -> Result<Vec<u8>> {
        let header = Packet::Read { addr, len: len as u64 };
        self.stream.write_all(&header.encode()).context(SendSnafu)?;

        let mut data = vec![0u8; len];
        self.stream.read_exact(&mut data).context(RecvSnafu)?;
        tracing::trace!(addr = format_args!("{addr:#x}"), len, "read board memory");
        Ok(data)
    }

    /// Writes `data` to board memory starting at `addr` and waits for the
    /// acknowledgment word.
    pub fn write_bytes(&mut self, addr: u64, data: &[u8]) -> Result<()> {
        let header = Packet::Write { addr, len: data.len() as u64 };
        self.stream.write_all(&header.encode()).context(SendSnafu)?;
        self.stream.write_all(data).context(SendSnafu)?;

        self.await_ack()?;
        tracing::trace!(addr = format_args!("{addr:#x}"), len = data.len(), "wrote board memory");
        Ok(())
    }

    /// Starts execution at `func_addr`. The board acknowledges once the
    /// core halts at `stop_addr`, so this blocks for the whole run.
    pub fn execute(&mut self, func_addr: u64, stop_addr: u64) -> Result<()> {
        let header = Packet::Execute { addr: func_addr, stop: stop_addr };
        self.stream.write_all(&header.encode()).context(SendSnafu)?;

        self.await_ack()?;
        tracing::debug!(
            func = format_args!("{func_addr:#x}"),
            stop = format_args!("{stop_addr:#x}"),
            "board execution finished"
        );
        Ok(())
    }

    fn await_ack(&mut self) -> Result<()> {
        let mut word = [0u8; 4];
        self.stream.read_exact(&mut word).context(RecvSnafu)?;
        let got = u32::from_le_bytes(word);
        ensure!(got == ACK, BadAckSnafu { got });
        Ok(())
    }
}
