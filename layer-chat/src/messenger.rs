//! High-level operations the login flow and the action loop are written against.
//!
//! [`crate::api::Api`] implements [`Messenger`] on top of a real client; tests
//! script it directly.

use std::fmt;

use crate::errors::{Error, PeerError};
use crate::peer::{Peer, PeerKind};
use crate::srp::{PasswordChallenge, SrpProof};

/// The logged-in account.
#[derive(Clone, Debug, PartialEq)]
pub struct Account {
    pub id:       i64,
    pub name:     String,
    pub username: Option<String>,
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.username {
            Some(u) => write!(f, "{} (@{u})", self.name),
            None    => write!(f, "{} (id={})", self.name, self.id),
        }
    }
}

/// Result of `auth.sendCode`, needed to complete `auth.signIn`.
#[derive(Clone, Debug, PartialEq)]
pub struct LoginCode {
    pub phone:           String,
    pub phone_code_hash: String,
}

/// Outcome of submitting the login code.
#[derive(Clone, Debug, PartialEq)]
pub enum SignIn {
    Authorized(Account),
    /// The account has 2FA enabled (`SESSION_PASSWORD_NEEDED`).
    PasswordNeeded,
}

/// One entry of the dialog list.
#[derive(Clone, Debug, PartialEq)]
pub struct Dialog {
    pub title:        String,
    /// `Err` when the entity behind the dialog cannot be addressed.
    pub peer:         Result<Peer, PeerError>,
    pub unread_count: i32,
}

impl Dialog {
    pub fn kind(&self) -> Option<PeerKind> {
        self.peer.as_ref().ok().map(Peer::kind)
    }
}

/// One message of a conversation's history.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryMessage {
    pub id:       i32,
    /// Unix timestamp.
    pub date:     i32,
    pub outgoing: bool,
    pub text:     String,
    /// Service messages (joins, pins, ...) carry no text.
    pub service:  bool,
}

#[allow(async_fn_in_trait)]
pub trait Messenger {
    /// The logged-in account, or `None` when not authorized (errors are logged, not returned).
    async fn current_user(&mut self) -> Option<Account>;

    async fn send_code(&mut self, phone: &str) -> Result<LoginCode, Error>;

    async fn sign_in(&mut self, login: &LoginCode, code: &str) -> Result<SignIn, Error>;

    async fn password_challenge(&mut self) -> Result<PasswordChallenge, Error>;

    async fn check_password(&mut self, proof: &SrpProof) -> Result<Account, Error>;

    /// Most recent dialogs, at most `limit`.
    async fn dialogs(&mut self, limit: i32) -> Result<Vec<Dialog>, Error>;

    async fn send_message(&mut self, peer: &Peer, text: &str) -> Result<(), Error>;

    /// Newest messages first, at most `limit`.
    async fn history(&mut self, peer: &Peer, limit: i32) -> Result<Vec<HistoryMessage>, Error>;
}
