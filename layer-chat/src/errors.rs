//! Error types for layer-chat.
//!
//! RPC failures keep the [`InvocationError`] produced by `layer-client` so the
//! caller can still match on Telegram error names with [`Error::is`].

use std::{fmt, io};

use layer_client::InvocationError;

// ─── ConfigError ──────────────────────────────────────────────────────────────

/// A required environment variable is missing or malformed.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigError {
    /// Name of the offending environment variable.
    pub var:    &'static str,
    pub reason: String,
}

impl ConfigError {
    pub(crate) fn new(var: &'static str, reason: impl Into<String>) -> Self {
        Self { var, reason: reason.into() }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.var, self.reason)
    }
}

impl std::error::Error for ConfigError {}

// ─── SrpError ─────────────────────────────────────────────────────────────────

/// The 2FA challenge could not be turned into a password proof.
#[derive(Clone, Debug, PartialEq)]
pub enum SrpError {
    /// `account.password` carried no `current_algo` (2FA not enabled).
    MissingAlgo,
    /// The server asked for a KDF algorithm other than the SHA256/PBKDF2/ModPow one.
    UnsupportedAlgo,
    /// A field required for the proof (`srp_id`, `srp_B`) was absent.
    MissingField(&'static str),
    /// Generator outside `2..=7`.
    BadGenerator(i32),
    /// Modulus empty or wider than 2048 bits.
    BadModulus,
    /// `g_b` is not in `(1, p - 1)`.
    PublicOutOfRange,
    /// The OS random source failed.
    Random,
    /// PBKDF2 rejected its parameters.
    KeyDerivation,
}

impl fmt::Display for SrpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAlgo        => write!(f, "account has no password algorithm"),
            Self::UnsupportedAlgo    => write!(f, "unsupported password KDF algorithm"),
            Self::MissingField(name) => write!(f, "password challenge is missing {name}"),
            Self::BadGenerator(g)    => write!(f, "invalid SRP generator g={g}"),
            Self::BadModulus         => write!(f, "invalid SRP modulus"),
            Self::PublicOutOfRange   => write!(f, "server SRP value g_b out of range"),
            Self::Random             => write!(f, "random source unavailable"),
            Self::KeyDerivation      => write!(f, "password key derivation failed"),
        }
    }
}

impl std::error::Error for SrpError {}

// ─── PeerError ────────────────────────────────────────────────────────────────

/// A fetched entity cannot be turned into an addressable peer.
#[derive(Clone, Debug, PartialEq)]
pub enum PeerError {
    /// `chatEmpty` / `userEmpty`.
    Empty(i64),
    /// Basic group that was deactivated without a migration target.
    Deactivated(i64),
    /// Basic group the account was removed from (`chatForbidden`).
    Forbidden(i64),
    /// Channel or user seen without its access hash.
    MissingAccessHash(i64),
    /// `migrated_to` pointed at an input channel we cannot address directly.
    UnresolvedChannel,
    /// The dialog refers to an entity the server did not include in the response.
    Missing(i64),
}

impl fmt::Display for PeerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty(id)             => write!(f, "entity {id} is empty"),
            Self::Deactivated(id)       => write!(f, "group {id} was deactivated"),
            Self::Forbidden(id)         => write!(f, "no longer a member of group {id}"),
            Self::MissingAccessHash(id) => write!(f, "access_hash unknown for {id}"),
            Self::UnresolvedChannel     => write!(f, "migration target cannot be addressed"),
            Self::Missing(id)           => write!(f, "entity {id} missing from response"),
        }
    }
}

impl std::error::Error for PeerError {}

// ─── Error ────────────────────────────────────────────────────────────────────

/// Top-level error for a layer-chat run.
#[derive(Debug)]
pub enum Error {
    Config(ConfigError),
    /// Telegram (or the transport under it) rejected a call.
    Rpc(InvocationError),
    /// Terminal I/O failed or stdin was closed.
    Io(io::Error),
    Srp(SrpError),
    Peer(PeerError),
    /// The phone number has no account; sign up in an official app first.
    SignUpRequired,
    /// The dialog page came back empty.
    NoDialogs,
    /// The server answered with a constructor we have no use for.
    UnexpectedResponse(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e)             => write!(f, "config error: {e}"),
            Self::Rpc(e)                => write!(f, "{e}"),
            Self::Io(e)                 => write!(f, "I/O error: {e}"),
            Self::Srp(e)                => write!(f, "2FA error: {e}"),
            Self::Peer(e)               => write!(f, "peer error: {e}"),
            Self::SignUpRequired        => write!(f, "sign up required: register with an official Telegram app first"),
            Self::NoDialogs             => write!(f, "no dialogs to choose from"),
            Self::UnexpectedResponse(s) => write!(f, "unexpected response: {s}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Rpc(e)    => Some(e),
            Self::Io(e)     => Some(e),
            Self::Srp(e)    => Some(e),
            Self::Peer(e)   => Some(e),
            _               => None,
        }
    }
}

impl Error {
    /// Returns `true` if this is the named RPC error (supports `'*'` wildcards).
    pub fn is(&self, pattern: &str) -> bool {
        match self {
            Self::Rpc(e) => e.is(pattern),
            _            => false,
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self { Self::Config(e) }
}

impl From<InvocationError> for Error {
    fn from(e: InvocationError) -> Self { Self::Rpc(e) }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self { Self::Io(e) }
}

impl From<SrpError> for Error {
    fn from(e: SrpError) -> Self { Self::Srp(e) }
}

impl From<PeerError> for Error {
    fn from(e: PeerError) -> Self { Self::Peer(e) }
}
