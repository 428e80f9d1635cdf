use core::fmt;

use crate::host::Status;

/// A convenience result alias for session operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors surfaced by the channel session.
///
/// Every variant corresponds to a logged event and a well-defined session
/// state; none of them leaves a handle half-open.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// `open` was called while a channel is already open.
    AlreadyOpen,
    /// A send or read was attempted with no channel open.
    NotOpen,
    /// The network collaborator reports no established network.
    NetworkUnavailable,
    /// The supervisor rejected the channel open.
    OpenRejected(Status),
    /// The supervisor rejected the request send.
    SendRejected(Status),
    /// The supervisor rejected the response metadata read.
    ResponseRejected(Status),
    /// The supervisor rejected the channel close with a status other than
    /// "already closed".
    CloseRejected(Status),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyOpen => write!(f, "a channel is already open"),
            Self::NotOpen => write!(f, "no channel is open"),
            Self::NetworkUnavailable => write!(f, "network is not established"),
            Self::OpenRejected(status) => write!(f, "channel open rejected: {status:?}"),
            Self::SendRejected(status) => write!(f, "request send rejected: {status:?}"),
            Self::ResponseRejected(status) => {
                write!(f, "response metadata read rejected: {status:?}")
            }
            Self::CloseRejected(status) => write!(f, "channel close rejected: {status:?}"),
        }
    }
}

impl core::error::Error for Error {}
