use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Crate-wide error type.
///
/// Channel initialization is the only fully fatal path in the crate and
/// reports each precondition failure distinctly. The polling read path
/// degrades instead of erroring (see [`crate::Reading`]).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    #[error("cannot open {}: {source}", .path.display())]
    ResourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("channel {channel} out of range: platform exposes {count} analog inputs")]
    ChannelOutOfRange { channel: u32, count: u32 },

    #[error("pin backing channel {0} is not analog capable")]
    NotAnalogCapable(u32),

    #[error("multiplexer setup failed for channel {0}")]
    MuxSetup(u32),

    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("{0}")]
    Unspecified(&'static str),

    #[error(transparent)]
    Io(#[from] io::Error),
}
