use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Failed to reach the bridge server.
    #[snafu(display("unable to connect to the board bridge: {source}"))]
    Connect { source: std::io::Error },

    /// A request header or payload could not be sent in full.
    #[snafu(display("send to board failed: {source}"))]
    Send { source: std::io::Error },

    /// The board's reply ended early or the socket broke.
    #[snafu(display("receive from board failed: {source}"))]
    Recv { source: std::io::Error },

    /// The board answered a write or execution with the wrong word.
    #[snafu(display("bad acknowledgment word {got:#010x}"))]
    BadAck { got: u32 },

    /// A packet header carried an unassigned kind discriminant.
    #[snafu(display("unknown packet kind {kind}"))]
    UnknownPacketKind { kind: u32 },
}
