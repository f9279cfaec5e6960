//! [`Messenger`] over raw TL calls, with one-shot DC redirects.

use std::collections::HashMap;
use std::fmt;

use layer_client::InvocationError;
use layer_tl_types as tl;
use layer_tl_types::RemoteCall;

use crate::errors::{Error, PeerError, SrpError};
use crate::messenger::{Account, Dialog, HistoryMessage, LoginCode, Messenger, SignIn};
use crate::peer::Peer;
use crate::rpc::{Migration, RpcBackend};
use crate::srp::{PasswordChallenge, SrpProof};

/// Routes every call through an [`RpcBackend`].
///
/// A `303 *_MIGRATE_X` answer is retried exactly once. Phone and user
/// migrations are retried on the home connection, which moves to DC `X` and
/// takes all later calls with it; other kinds retry only that call on DC `X`.
pub struct Api<B> {
    backend:  B,
    api_id:   i32,
    api_hash: String,
    home_dc:  Option<i32>,
}

impl<B: RpcBackend> Api<B> {
    pub fn new(backend: B, api_id: i32, api_hash: impl Into<String>) -> Self {
        Self { backend, api_id, api_hash: api_hash.into(), home_dc: None }
    }

    /// The DC the home connection was moved to by a migration, if any.
    pub fn home_dc(&self) -> Option<i32> {
        self.home_dc
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Invoke `req`, following a single DC redirect.
    ///
    /// The request is logged at debug level, the answer at trace level.
    pub async fn invoke<R>(&mut self, method: &str, req: &R) -> Result<R::Return, InvocationError>
    where
        R: RemoteCall + fmt::Debug,
        R::Return: fmt::Debug,
    {
        log::debug!("→ {method} (dc={}) {req:?}", dc_label(self.home_dc));
        let reply = match self.backend.invoke(None, req).await {
            Ok(v) => Ok(v),
            Err(e) => {
                let dc = self.redirect(method, e)?;
                self.backend.invoke(dc, req).await
                    .map_err(|e| logged(method, e))
            }
        };
        if let Ok(v) = &reply {
            log::trace!("← {method} {v:?}");
        }
        reply
    }

    /// Log a failure; hand back where to retry, or the error itself.
    ///
    /// `None` means the home connection, which follows the account to its
    /// new DC; `Some(dc)` redirects only the failed call.
    fn redirect(&mut self, method: &str, err: InvocationError) -> Result<Option<i32>, InvocationError> {
        let err = logged(method, err);
        let Some(migration) = Migration::from_error(&err) else { return Err(err) };
        if migration.moves_home() {
            log::info!("{method}: home connection moves to DC{}", migration.dc_id);
            self.home_dc = Some(migration.dc_id);
            Ok(None)
        } else {
            log::info!("{method}: retrying on DC{}", migration.dc_id);
            Ok(Some(migration.dc_id))
        }
    }
}

impl<B: RpcBackend> Messenger for Api<B> {
    async fn current_user(&mut self) -> Option<Account> {
        let req = tl::functions::users::GetFullUser { id: tl::enums::InputUser::UserSelf };
        match self.invoke("users.getFullUser", &req).await {
            Ok(tl::enums::users::UserFull::UserFull(full)) => {
                let me = full.users.iter()
                    .find(|u| matches!(u, tl::enums::User::User(x) if x.is_self))
                    .or_else(|| full.users.first())
                    .and_then(account_from);
                self.backend.remember(&full.users, &full.chats).await;
                me
            }
            Err(e) => {
                log::info!("Not logged in yet ({e})");
                None
            }
        }
    }

    async fn send_code(&mut self, phone: &str) -> Result<LoginCode, Error> {
        use tl::enums::auth::SentCode;

        let req = tl::functions::auth::SendCode {
            phone_number: phone.to_string(),
            api_id:       self.api_id,
            api_hash:     self.api_hash.clone(),
            settings:     tl::enums::CodeSettings::CodeSettings(
                tl::types::CodeSettings {
                    allow_flashcall: false, current_number: false, allow_app_hash: false,
                    allow_missed_call: false, allow_firebase: false, unknown_number: false,
                    logout_tokens: None, token: None, app_sandbox: None,
                },
            ),
        };
        let phone_code_hash = match self.invoke("auth.sendCode", &req).await? {
            SentCode::SentCode(s)        => s.phone_code_hash,
            SentCode::Success(_)         => return Err(Error::UnexpectedResponse("auth.sentCodeSuccess".into())),
            SentCode::PaymentRequired(_) => return Err(Error::UnexpectedResponse("payment required to send code".into())),
        };
        log::info!("Login code sent to {phone}");
        Ok(LoginCode { phone: phone.to_string(), phone_code_hash })
    }

    async fn sign_in(&mut self, login: &LoginCode, code: &str) -> Result<SignIn, Error> {
        let req = tl::functions::auth::SignIn {
            phone_number:       login.phone.clone(),
            phone_code_hash:    login.phone_code_hash.clone(),
            phone_code:         Some(code.trim().to_string()),
            email_verification: None,
        };
        match self.invoke("auth.signIn", &req).await {
            Ok(auth) => authorized(auth).map(SignIn::Authorized),
            Err(e) if e.is("SESSION_PASSWORD_NEEDED") => Ok(SignIn::PasswordNeeded),
            Err(e) => Err(e.into()),
        }
    }

    async fn password_challenge(&mut self) -> Result<PasswordChallenge, Error> {
        let tl::enums::account::Password::Password(pw) =
            self.invoke("account.getPassword", &tl::functions::account::GetPassword {}).await?;

        let algo = pw.current_algo.ok_or(SrpError::MissingAlgo)?;
        let tl::enums::PasswordKdfAlgo::Sha256Sha256Pbkdf2Hmacsha512iter100000Sha256ModPow(algo) = algo else {
            return Err(SrpError::UnsupportedAlgo.into());
        };
        Ok(PasswordChallenge {
            srp_id: pw.srp_id.ok_or(SrpError::MissingField("srp_id"))?,
            g:      algo.g,
            p:      algo.p,
            salt1:  algo.salt1,
            salt2:  algo.salt2,
            srp_b:  pw.srp_b.ok_or(SrpError::MissingField("srp_B"))?,
            hint:   pw.hint,
        })
    }

    async fn check_password(&mut self, proof: &SrpProof) -> Result<Account, Error> {
        let req = tl::functions::auth::CheckPassword {
            password: tl::enums::InputCheckPasswordSrp::InputCheckPasswordSrp(
                tl::types::InputCheckPasswordSrp {
                    srp_id: proof.srp_id, a: proof.a.to_vec(), m1: proof.m1.to_vec(),
                },
            ),
        };
        authorized(self.invoke("auth.checkPassword", &req).await?)
    }

    async fn dialogs(&mut self, limit: i32) -> Result<Vec<Dialog>, Error> {
        let req = tl::functions::messages::GetDialogs {
            exclude_pinned: false,
            folder_id:      None,
            offset_date:    0,
            offset_id:      0,
            offset_peer:    tl::enums::InputPeer::Empty,
            limit,
            hash:           0,
        };
        let raw = match self.invoke("messages.getDialogs", &req).await? {
            tl::enums::messages::Dialogs::Dialogs(d) => d,
            tl::enums::messages::Dialogs::Slice(d)   => tl::types::messages::Dialogs {
                dialogs: d.dialogs, messages: d.messages, chats: d.chats, users: d.users,
            },
            tl::enums::messages::Dialogs::NotModified(_) => return Ok(vec![]),
        };
        self.backend.remember(&raw.users, &raw.chats).await;

        let users: HashMap<i64, &tl::enums::User> = raw.users.iter()
            .map(|u| (user_id(u), u))
            .collect();
        let chats: HashMap<i64, &tl::enums::Chat> = raw.chats.iter()
            .map(|c| (chat_id(c), c))
            .collect();

        let dialogs = raw.dialogs.iter()
            .filter_map(|d| match d {
                tl::enums::Dialog::Dialog(d) => Some(d),
                tl::enums::Dialog::Folder(_) => None,
            })
            .map(|d| {
                let (title, peer) = match &d.peer {
                    tl::enums::Peer::User(p) => match users.get(&p.user_id) {
                        Some(u) => (user_title(u), Peer::from_user(u)),
                        None    => (format!("user {}", p.user_id), Err(PeerError::Missing(p.user_id))),
                    },
                    tl::enums::Peer::Chat(p) => entity_of(&chats, p.chat_id),
                    tl::enums::Peer::Channel(p) => entity_of(&chats, p.channel_id),
                };
                Dialog { title, peer, unread_count: d.unread_count }
            })
            .collect();
        Ok(dialogs)
    }

    async fn send_message(&mut self, peer: &Peer, text: &str) -> Result<(), Error> {
        let req = tl::functions::messages::SendMessage {
            no_webpage:               false,
            silent:                   false,
            background:               false,
            clear_draft:              false,
            noforwards:               false,
            update_stickersets_order: false,
            invert_media:             false,
            allow_paid_floodskip:     false,
            peer:                     peer.input_peer(),
            reply_to:                 None,
            message:                  text.to_string(),
            random_id:                random_i64()?,
            reply_markup:             None,
            entities:                 None,
            schedule_date:            None,
            schedule_repeat_period:   None,
            send_as:                  None,
            quick_reply_shortcut:     None,
            effect:                   None,
            allow_paid_stars:         None,
            suggested_post:           None,
        };
        self.invoke("messages.sendMessage", &req).await?;
        Ok(())
    }

    async fn history(&mut self, peer: &Peer, limit: i32) -> Result<Vec<HistoryMessage>, Error> {
        let req = tl::functions::messages::GetHistory {
            peer: peer.input_peer(), offset_id: 0, offset_date: 0, add_offset: 0,
            limit, max_id: 0, min_id: 0, hash: 0,
        };
        let messages = match self.invoke("messages.getHistory", &req).await? {
            tl::enums::messages::Messages::Messages(m)        => m.messages,
            tl::enums::messages::Messages::Slice(m)           => m.messages,
            tl::enums::messages::Messages::ChannelMessages(m) => m.messages,
            tl::enums::messages::Messages::NotModified(_)     => vec![],
        };
        log::trace!("messages.getHistory returned {} messages", messages.len());
        Ok(messages.iter().filter_map(history_message).collect())
    }
}

// ─── TL → domain ──────────────────────────────────────────────────────────────

fn authorized(auth: tl::enums::auth::Authorization) -> Result<Account, Error> {
    match auth {
        tl::enums::auth::Authorization::Authorization(a) => account_from(&a.user)
            .ok_or_else(|| Error::UnexpectedResponse("authorization without user".into())),
        tl::enums::auth::Authorization::SignUpRequired(_) => Err(Error::SignUpRequired),
    }
}

fn account_from(user: &tl::enums::User) -> Option<Account> {
    match user {
        tl::enums::User::User(u) => Some(Account {
            id:       u.id,
            name:     user_title(user),
            username: u.username.clone(),
        }),
        tl::enums::User::Empty(_) => None,
    }
}

fn user_title(user: &tl::enums::User) -> String {
    match user {
        tl::enums::User::User(u) => {
            let name = format!("{} {}",
                u.first_name.as_deref().unwrap_or(""),
                u.last_name.as_deref().unwrap_or(""));
            let name = name.trim();
            if u.is_self {
                "Saved Messages".to_string()
            } else if name.is_empty() {
                format!("user {}", u.id)
            } else {
                name.to_string()
            }
        }
        tl::enums::User::Empty(u) => format!("user {}", u.id),
    }
}

fn user_id(user: &tl::enums::User) -> i64 {
    match user {
        tl::enums::User::User(u)  => u.id,
        tl::enums::User::Empty(u) => u.id,
    }
}

fn chat_id(chat: &tl::enums::Chat) -> i64 {
    match chat {
        tl::enums::Chat::Chat(c)             => c.id,
        tl::enums::Chat::Forbidden(c)        => c.id,
        tl::enums::Chat::Channel(c)          => c.id,
        tl::enums::Chat::ChannelForbidden(c) => c.id,
        tl::enums::Chat::Empty(c)            => c.id,
    }
}

fn chat_title(chat: &tl::enums::Chat) -> String {
    match chat {
        tl::enums::Chat::Chat(c)             => c.title.clone(),
        tl::enums::Chat::Forbidden(c)        => c.title.clone(),
        tl::enums::Chat::Channel(c)          => c.title.clone(),
        tl::enums::Chat::ChannelForbidden(c) => c.title.clone(),
        tl::enums::Chat::Empty(c)            => format!("chat {}", c.id),
    }
}

fn entity_of(chats: &HashMap<i64, &tl::enums::Chat>, id: i64) -> (String, Result<Peer, PeerError>) {
    match chats.get(&id) {
        Some(c) => (chat_title(c), Peer::from_chat(c)),
        None    => (format!("chat {id}"), Err(PeerError::Missing(id))),
    }
}

fn history_message(msg: &tl::enums::Message) -> Option<HistoryMessage> {
    match msg {
        tl::enums::Message::Message(m) => Some(HistoryMessage {
            id: m.id, date: m.date, outgoing: m.out, text: m.message.clone(), service: false,
        }),
        tl::enums::Message::Service(m) => Some(HistoryMessage {
            id: m.id, date: m.date, outgoing: m.out, text: String::new(), service: true,
        }),
        tl::enums::Message::Empty(_) => None,
    }
}

fn dc_label(dc: Option<i32>) -> String {
    dc.map_or_else(|| "home".to_string(), |id| id.to_string())
}

fn logged(method: &str, err: InvocationError) -> InvocationError {
    match &err {
        InvocationError::Rpc(rpc) => log::warn!(
            "{method} error: error_code={} error_message={}{}",
            rpc.code, rpc.name, rpc.value.map(|v| format!("_{v}")).unwrap_or_default(),
        ),
        other => log::warn!("{method} error: {other}"),
    }
    err
}

fn random_i64() -> Result<i64, Error> {
    let mut b = [0u8; 8];
    getrandom::getrandom(&mut b)
        .map_err(|e| Error::Io(std::io::Error::other(e.to_string())))?;
    Ok(i64::from_le_bytes(b))
}
