//! Scripted stand-ins for the client, the messenger and the terminal.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;

use layer_chat::{
    Account, Config, Dialog, Error, HistoryMessage, LoginCode, Messenger, PasswordChallenge,
    Peer, Prompt, RpcBackend, SignIn, SrpProof,
};
use layer_client::{InvocationError, RpcError};
use layer_tl_types as tl;
use layer_tl_types::{Deserializable, RemoteCall, Serializable};

pub fn rpc_error(code: i32, message: &str) -> InvocationError {
    InvocationError::Rpc(RpcError::from_telegram(code, message))
}

pub fn config(password: Option<&str>) -> Config {
    Config {
        api_id:        12345,
        api_hash:      "0123456789abcdef".into(),
        phone:         "+15550001111".into(),
        password:      password.map(str::to_string),
        dialog_limit:  50,
        history_limit: 20,
    }
}

pub fn account() -> Account {
    Account { id: 42, name: "Test User".into(), username: Some("tester".into()) }
}

/// 2048-bit modulus with an in-range server value; enough for the proof math.
pub fn challenge(hint: Option<&str>) -> PasswordChallenge {
    let mut p = vec![0xc7u8; 256];
    p[255] = 0x5b;
    PasswordChallenge {
        srp_id: 7,
        g:      3,
        p,
        salt1:  b"salt-one".to_vec(),
        salt2:  b"salt-two".to_vec(),
        srp_b:  vec![0x05; 200],
        hint:   hint.map(str::to_string),
    }
}

// ─── FakeBackend ──────────────────────────────────────────────────────────────

/// Answers `invoke` from serialized replies and records what was asked where.
#[derive(Default)]
pub struct FakeBackend {
    pub replies:    VecDeque<Result<Vec<u8>, InvocationError>>,
    /// DC of each `invoke`, in order.
    pub calls:      Vec<Option<i32>>,
    /// Serialized request of each `invoke`, in order.
    pub requests:   Vec<Vec<u8>>,
    /// `(users, chats)` counts handed to `remember`.
    pub remembered: Vec<(usize, usize)>,
}

impl FakeBackend {
    pub fn reply(mut self, r: Result<Vec<u8>, InvocationError>) -> Self {
        self.replies.push_back(r);
        self
    }
}

impl RpcBackend for FakeBackend {
    async fn invoke<R: RemoteCall>(&mut self, dc: Option<i32>, req: &R) -> Result<R::Return, InvocationError> {
        self.calls.push(dc);
        self.requests.push(req.to_bytes());
        let bytes = self.replies.pop_front().expect("unexpected invoke")?;
        Ok(R::Return::from_bytes(&bytes)?)
    }

    async fn remember(&mut self, users: &[tl::enums::User], chats: &[tl::enums::Chat]) {
        self.remembered.push((users.len(), chats.len()));
    }
}

/// Whether `needle` occurs somewhere in `haystack`.
pub fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

// ─── TL payloads ──────────────────────────────────────────────────────────────

/// Hand-assembled TL object. Optional fields stay unset, so only the flags a
/// test needs are written.
pub struct Tl(Vec<u8>);

impl Tl {
    pub fn new(constructor: u32) -> Self {
        Self(constructor.to_bytes())
    }

    pub fn uint(mut self, v: u32) -> Self {
        self.0.extend(v.to_bytes());
        self
    }

    pub fn int(mut self, v: i32) -> Self {
        self.0.extend(v.to_bytes());
        self
    }

    pub fn long(mut self, v: i64) -> Self {
        self.0.extend(v.to_bytes());
        self
    }

    pub fn string(mut self, v: &str) -> Self {
        self.0.extend(v.to_string().to_bytes());
        self
    }

    pub fn obj(mut self, v: Tl) -> Self {
        self.0.extend(v.0);
        self
    }

    pub fn vec(mut self, items: Vec<Tl>) -> Self {
        self.0.extend(0x1cb5c415u32.to_bytes());
        self.0.extend((items.len() as i32).to_bytes());
        for item in items {
            self.0.extend(item.0);
        }
        self
    }

    pub fn bytes(self) -> Vec<u8> {
        self.0
    }
}

pub fn peer_user(user_id: i64) -> Tl    { Tl::new(0x59511722).long(user_id) }
pub fn peer_chat(chat_id: i64) -> Tl    { Tl::new(0x36c6019a).long(chat_id) }
pub fn peer_channel(id: i64) -> Tl      { Tl::new(0xa2a5371e).long(id) }

/// `user#31774388` with only `self`, `access_hash` and `first_name` flags.
pub fn user(id: i64, access_hash: Option<i64>, is_self: bool, first_name: &str) -> Tl {
    let mut flags = 1 << 1;
    if is_self { flags |= 1 << 10; }
    if access_hash.is_some() { flags |= 1; }
    let t = Tl::new(0x31774388).uint(flags).uint(0).long(id);
    let t = match access_hash {
        Some(h) => t.long(h),
        None    => t,
    };
    t.string(first_name)
}

/// `chat#41cbf256`; `migrated_to` is `(channel_id, access_hash)`.
pub fn chat(id: i64, title: &str, deactivated: bool, migrated_to: Option<(i64, i64)>) -> Tl {
    let mut flags = 0u32;
    if deactivated { flags |= 1 << 5; }
    if migrated_to.is_some() { flags |= 1 << 6; }
    let t = Tl::new(0x41cbf256).uint(flags).long(id).string(title)
        .obj(Tl::new(0x37c1011c)) // chatPhotoEmpty
        .int(3).int(0).int(1);
    match migrated_to {
        Some((channel_id, hash)) => t.obj(Tl::new(0xf35aec28).long(channel_id).long(hash)),
        None                     => t,
    }
}

pub fn chat_forbidden(id: i64, title: &str) -> Tl {
    Tl::new(0x6592a1a7).long(id).string(title)
}

pub fn chat_empty(id: i64) -> Tl {
    Tl::new(0x29562865).long(id)
}

/// `channel#1c32b11c` with or without its access hash.
pub fn channel(id: i64, access_hash: Option<i64>, title: &str) -> Tl {
    let flags = if access_hash.is_some() { 1 << 13 } else { 0 };
    let t = Tl::new(0x1c32b11c).uint(flags).uint(0).long(id);
    let t = match access_hash {
        Some(h) => t.long(h),
        None    => t,
    };
    t.string(title).obj(Tl::new(0x37c1011c)).int(0)
}

pub fn channel_forbidden(id: i64, access_hash: i64, title: &str) -> Tl {
    Tl::new(0x17d493d5).uint(0).long(id).long(access_hash).string(title)
}

/// `dialog#fc89f7f3` with default notify settings.
pub fn dialog(peer: Tl, unread_count: i32) -> Tl {
    Tl::new(0xfc89f7f3).uint(0).obj(peer)
        .int(100).int(0).int(0).int(unread_count).int(0).int(0).int(0)
        .obj(Tl::new(0x99622c0c).uint(0))
}

pub fn dialog_folder(peer: Tl) -> Tl {
    Tl::new(0x71bd134c).uint(0)
        .obj(Tl::new(0xff544e65).uint(0).int(1).string("Archived"))
        .obj(peer)
        .int(0).int(0).int(0).int(0).int(0)
}

/// `messages.dialogs` (or `messages.dialogsSlice` when `slice_count` is set).
pub fn dialogs_reply(slice_count: Option<i32>, dialogs: Vec<Tl>, chats: Vec<Tl>, users: Vec<Tl>) -> Vec<u8> {
    let t = match slice_count {
        Some(count) => Tl::new(0x71e094f3).int(count),
        None        => Tl::new(0x15ba6c40),
    };
    t.vec(dialogs).vec(vec![]).vec(chats).vec(users).bytes()
}

pub fn message(id: i32, date: i32, out: bool, text: &str, peer: Tl) -> Tl {
    let flags = if out { 1 << 1 } else { 0 };
    Tl::new(0x3ae56482).uint(flags).uint(0).int(id).obj(peer).int(date).string(text)
}

pub fn message_service(id: i32, date: i32, peer: Tl) -> Tl {
    Tl::new(0x7a800e0a).uint(0).int(id).obj(peer).int(date)
        .obj(Tl::new(0xb6aef7b0)) // messageActionEmpty
}

pub fn message_empty(id: i32) -> Tl {
    Tl::new(0x90a6ca84).uint(0).int(id)
}

/// `messages.messages` (or `messages.messagesSlice` when `slice_count` is set).
pub fn messages_reply(slice_count: Option<i32>, messages: Vec<Tl>) -> Vec<u8> {
    let t = match slice_count {
        Some(count) => Tl::new(0x5f206716).uint(0).int(count),
        None        => Tl::new(0x1d73e7ea),
    };
    t.vec(messages).vec(vec![]).vec(vec![]).vec(vec![]).bytes()
}

/// `updatesTooLong`, the smallest valid answer to `messages.sendMessage`.
pub fn updates_reply() -> Vec<u8> {
    Tl::new(0xe317af7e).bytes()
}

// ─── FakeMessenger ────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeMessenger {
    pub me:             Option<Account>,
    pub sign_in_result: Option<Result<SignIn, Error>>,
    pub challenge:      Option<PasswordChallenge>,
    pub dialogs:        Vec<Dialog>,
    pub messages:       Vec<HistoryMessage>,
    pub history_error:  Option<Error>,
    /// Names of the operations called, in order.
    pub log:            Vec<&'static str>,
    pub proofs:         Vec<SrpProof>,
    pub sent:           Vec<(Peer, String)>,
}

impl Messenger for FakeMessenger {
    async fn current_user(&mut self) -> Option<Account> {
        self.log.push("current_user");
        self.me.clone()
    }

    async fn send_code(&mut self, phone: &str) -> Result<LoginCode, Error> {
        self.log.push("send_code");
        Ok(LoginCode { phone: phone.to_string(), phone_code_hash: "hash".into() })
    }

    async fn sign_in(&mut self, login: &LoginCode, code: &str) -> Result<SignIn, Error> {
        self.log.push("sign_in");
        assert_eq!(login.phone_code_hash, "hash");
        assert_eq!(code, "12345");
        self.sign_in_result.take().expect("sign_in not scripted")
    }

    async fn password_challenge(&mut self) -> Result<PasswordChallenge, Error> {
        self.log.push("password_challenge");
        Ok(self.challenge.clone().expect("challenge not scripted"))
    }

    async fn check_password(&mut self, proof: &SrpProof) -> Result<Account, Error> {
        self.log.push("check_password");
        self.proofs.push(proof.clone());
        Ok(account())
    }

    async fn dialogs(&mut self, _limit: i32) -> Result<Vec<Dialog>, Error> {
        self.log.push("dialogs");
        Ok(self.dialogs.clone())
    }

    async fn send_message(&mut self, peer: &Peer, text: &str) -> Result<(), Error> {
        self.log.push("send_message");
        self.sent.push((*peer, text.to_string()));
        Ok(())
    }

    async fn history(&mut self, _peer: &Peer, _limit: i32) -> Result<Vec<HistoryMessage>, Error> {
        self.log.push("history");
        match self.history_error.take() {
            Some(e) => Err(e),
            None    => Ok(self.messages.clone()),
        }
    }
}

// ─── ScriptedPrompt ───────────────────────────────────────────────────────────

/// Replays canned answers; runs dry with `UnexpectedEof` like a closed stdin.
#[derive(Default)]
pub struct ScriptedPrompt {
    pub answers: VecDeque<String>,
    pub asked:   Vec<String>,
}

impl ScriptedPrompt {
    pub fn new(answers: &[&str]) -> Self {
        Self { answers: answers.iter().map(|a| a.to_string()).collect(), asked: Vec::new() }
    }
}

impl Prompt for ScriptedPrompt {
    fn line(&mut self, question: &str) -> io::Result<String> {
        self.asked.push(question.to_string());
        self.answers.pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }
}
