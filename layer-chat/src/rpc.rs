//! The seam to `layer-client`, plus data-center migration errors.

use layer_client::{Client, InvocationError};
use layer_tl_types as tl;
use layer_tl_types::RemoteCall;

/// Everything layer-chat needs from an MTProto client.
///
/// `dc = None` targets the client's home connection, `Some(id)` a worker
/// connection to that DC. The home connection is the one that carries the
/// login: a `PHONE_MIGRATE`/`USER_MIGRATE` redirect is always retried on it,
/// and the backend is expected to re-home it (reconnect plus
/// `initConnection`) when the server answers that way.
#[allow(async_fn_in_trait)]
pub trait RpcBackend {
    async fn invoke<R: RemoteCall>(&mut self, dc: Option<i32>, req: &R) -> Result<R::Return, InvocationError>;

    /// Entities seen in a response; lets the client learn their access hashes.
    async fn remember(&mut self, _users: &[tl::enums::User], _chats: &[tl::enums::Chat]) {}
}

// ─── LayerBackend ─────────────────────────────────────────────────────────────

/// [`RpcBackend`] over a connected [`layer_client::Client`].
///
/// `Client::invoke` follows `*_MIGRATE_X` on the home connection by itself
/// (`migrate_to` + `initConnection`), so home redirects never need a worker
/// connection. `invoke_on_dc` is only used for per-call redirects.
pub struct LayerBackend {
    client: Client,
}

impl LayerBackend {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl RpcBackend for LayerBackend {
    async fn invoke<R: RemoteCall>(&mut self, dc: Option<i32>, req: &R) -> Result<R::Return, InvocationError> {
        match dc {
            Some(dc_id) => self.client.invoke_on_dc(dc_id, req).await,
            None        => self.client.invoke(req).await,
        }
    }

    async fn remember(&mut self, users: &[tl::enums::User], chats: &[tl::enums::Chat]) {
        self.client.cache_users_slice_pub(users).await;
        self.client.cache_chats_slice_pub(chats).await;
    }
}

// ─── Migration ────────────────────────────────────────────────────────────────

/// Which `*_MIGRATE_X` error the server sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MigrationKind {
    /// The phone number is registered on another DC.
    Phone,
    /// The account lives on another DC.
    User,
    /// The client's IP is served by another DC.
    Network,
    File,
    Stats,
    Other,
}

/// A `303 SEE_OTHER` answer: repeat the call on `dc_id`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Migration {
    pub kind:  MigrationKind,
    pub dc_id: i32,
}

impl Migration {
    /// Parse `PHONE_MIGRATE_4` and friends; `None` for any other error.
    pub fn from_error(err: &InvocationError) -> Option<Self> {
        match err {
            InvocationError::Rpc(rpc) if rpc.code == 303 => {
                let prefix = rpc.name.strip_suffix("_MIGRATE")?;
                let dc_id  = i32::try_from(rpc.value?).ok()?;
                let kind = match prefix {
                    "PHONE"   => MigrationKind::Phone,
                    "USER"    => MigrationKind::User,
                    "NETWORK" => MigrationKind::Network,
                    "FILE"    => MigrationKind::File,
                    "STATS"   => MigrationKind::Stats,
                    _         => MigrationKind::Other,
                };
                Some(Self { kind, dc_id })
            }
            InvocationError::Migrate(dc_id) => Some(Self { kind: MigrationKind::User, dc_id: *dc_id }),
            _ => None,
        }
    }

    /// Whether the account itself lives on the new DC: the retry goes to the
    /// home connection and every later call follows it there.
    pub fn moves_home(&self) -> bool {
        matches!(self.kind, MigrationKind::Phone | MigrationKind::User)
    }
}
