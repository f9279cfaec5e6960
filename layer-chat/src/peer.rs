//! Peer descriptors: how a fetched chat or user is addressed in later calls.

use std::fmt;

use layer_tl_types as tl;

use crate::errors::PeerError;

/// Coarse kind of a conversation, for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeerKind {
    User,
    Group,
    Channel,
}

impl fmt::Display for PeerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::User    => "user",
            Self::Group   => "group",
            Self::Channel => "channel",
        })
    }
}

/// Addressing information for one conversation.
///
/// The variant always matches the kind of entity it was built from; a basic
/// group that was upgraded to a supergroup resolves to the supergroup's
/// [`Peer::Channel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Peer {
    /// The logged-in account (Saved Messages).
    SelfUser,
    User    { user_id: i64, access_hash: i64 },
    Chat    { chat_id: i64 },
    Channel { channel_id: i64, access_hash: i64 },
}

impl Peer {
    pub fn from_chat(chat: &tl::enums::Chat) -> Result<Self, PeerError> {
        match chat {
            tl::enums::Chat::Chat(c) => {
                if let Some(target) = &c.migrated_to {
                    return Self::from_input_channel(target);
                }
                if c.deactivated {
                    return Err(PeerError::Deactivated(c.id));
                }
                Ok(Self::Chat { chat_id: c.id })
            }
            tl::enums::Chat::Forbidden(c) => Err(PeerError::Forbidden(c.id)),
            tl::enums::Chat::Channel(c) => c.access_hash
                .map(|access_hash| Self::Channel { channel_id: c.id, access_hash })
                .ok_or(PeerError::MissingAccessHash(c.id)),
            tl::enums::Chat::ChannelForbidden(c) => Ok(Self::Channel {
                channel_id: c.id, access_hash: c.access_hash,
            }),
            tl::enums::Chat::Empty(c) => Err(PeerError::Empty(c.id)),
        }
    }

    pub fn from_user(user: &tl::enums::User) -> Result<Self, PeerError> {
        match user {
            tl::enums::User::User(u) if u.is_self => Ok(Self::SelfUser),
            tl::enums::User::User(u) => u.access_hash
                .map(|access_hash| Self::User { user_id: u.id, access_hash })
                .ok_or(PeerError::MissingAccessHash(u.id)),
            tl::enums::User::Empty(u) => Err(PeerError::Empty(u.id)),
        }
    }

    pub fn from_input_channel(channel: &tl::enums::InputChannel) -> Result<Self, PeerError> {
        match channel {
            tl::enums::InputChannel::InputChannel(c) => Ok(Self::Channel {
                channel_id: c.channel_id, access_hash: c.access_hash,
            }),
            _ => Err(PeerError::UnresolvedChannel),
        }
    }

    pub fn kind(&self) -> PeerKind {
        match self {
            Self::SelfUser | Self::User { .. } => PeerKind::User,
            Self::Chat { .. }                  => PeerKind::Group,
            Self::Channel { .. }               => PeerKind::Channel,
        }
    }

    /// The `InputPeer` sent with requests that target this conversation.
    ///
    /// Carries the access hash itself, so no client-side cache lookup is needed.
    pub fn input_peer(&self) -> tl::enums::InputPeer {
        match *self {
            Self::SelfUser => tl::enums::InputPeer::PeerSelf,
            Self::User { user_id, access_hash } => tl::enums::InputPeer::User(
                tl::types::InputPeerUser { user_id, access_hash },
            ),
            Self::Chat { chat_id } => tl::enums::InputPeer::Chat(
                tl::types::InputPeerChat { chat_id },
            ),
            Self::Channel { channel_id, access_hash } => tl::enums::InputPeer::Channel(
                tl::types::InputPeerChannel { channel_id, access_hash },
            ),
        }
    }
}

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfUser                => write!(f, "self"),
            Self::User { user_id, .. }    => write!(f, "user {user_id}"),
            Self::Chat { chat_id }        => write!(f, "chat {chat_id}"),
            Self::Channel { channel_id, .. } => write!(f, "channel {channel_id}"),
        }
    }
}
