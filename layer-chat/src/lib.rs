//! # layer-chat
//!
//! Log in to Telegram with a user account, pick a conversation and send or
//! read messages in it.
//!
//! All protocol work (transport, encryption, auth keys, DC connections) is
//! done by [`layer_client`]; this crate only sequences high-level calls:
//!
//! 1. [`config`] reads credentials from the environment.
//! 2. [`auth::authenticate`] logs in: code, then SRP 2FA when required.
//! 3. [`dialogs::choose`] lists dialogs and lets the user pick one.
//! 4. [`actions::run`] loops over send / get-history / exit.
//!
//! Calls go through [`api::Api`], which retries a `303 *_MIGRATE_X` answer
//! once on the indicated data center.

#![deny(unsafe_code)]

pub mod actions;
pub mod api;
pub mod auth;
pub mod config;
pub mod dialogs;
mod errors;
pub mod messenger;
pub mod peer;
pub mod prompt;
pub mod rpc;
pub mod srp;

pub use api::Api;
pub use config::Config;
pub use errors::{ConfigError, Error, PeerError, SrpError};
pub use messenger::{Account, Dialog, HistoryMessage, LoginCode, Messenger, SignIn};
pub use peer::{Peer, PeerKind};
pub use prompt::{Prompt, StdinPrompt};
pub use rpc::{LayerBackend, Migration, MigrationKind, RpcBackend};
pub use srp::{PasswordChallenge, SrpProof};
