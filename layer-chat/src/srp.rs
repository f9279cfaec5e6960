//! Client side of Telegram's SRP 2FA check.
//!
//! Algorithm `SHA256-SHA256-PBKDF2-HMAC-SHA512-iter100000-SHA256-ModPow`: the
//! password never leaves the process, only `A = g^a mod p` and the proof `M1`.

use hmac::Hmac;
use num_bigint::{BigInt, Sign};
use num_traits::{One, ops::euclid::Euclid};
use sha2::{Digest, Sha256, Sha512};

use crate::errors::SrpError;

const PBKDF2_ROUNDS: u32 = 100_000;

/// Parameters of `account.getPassword` needed to answer the challenge.
#[derive(Clone, Debug, PartialEq)]
pub struct PasswordChallenge {
    pub srp_id: i64,
    pub g:      i32,
    pub p:      Vec<u8>,
    pub salt1:  Vec<u8>,
    pub salt2:  Vec<u8>,
    /// Server public value `g_b`.
    pub srp_b:  Vec<u8>,
    pub hint:   Option<String>,
}

/// Answer to a [`PasswordChallenge`], sent with `auth.checkPassword`.
#[derive(Clone, Debug, PartialEq)]
pub struct SrpProof {
    pub srp_id: i64,
    /// Client public value `g_a`, padded to 256 bytes.
    pub a:      [u8; 256],
    pub m1:     [u8; 32],
}

impl SrpProof {
    /// Compute a proof with a fresh random 2048-bit secret.
    pub fn compute(challenge: &PasswordChallenge, password: impl AsRef<[u8]>) -> Result<Self, SrpError> {
        let mut secret = [0u8; 256];
        getrandom::getrandom(&mut secret).map_err(|_| SrpError::Random)?;
        Self::compute_with_secret(challenge, password, &secret)
    }

    /// Compute a proof with the given client secret `a`.
    pub fn compute_with_secret(
        challenge: &PasswordChallenge,
        password:  impl AsRef<[u8]>,
        secret:    &[u8],
    ) -> Result<Self, SrpError> {
        let p     = challenge.p.as_slice();
        let salt1 = challenge.salt1.as_slice();
        let salt2 = challenge.salt2.as_slice();
        let srp_b = challenge.srp_b.as_slice();
        let group = Group::new(challenge.g, p)?;

        let big_g_b = BigInt::from_bytes_be(Sign::Plus, srp_b);
        if srp_b.len() > 256 || big_g_b <= BigInt::one() || big_g_b >= &group.p - 1u32 {
            return Err(SrpError::PublicOutOfRange);
        }
        let g_b = pad256(srp_b);

        let big_a = BigInt::from_bytes_be(Sign::Plus, &pad256(secret));
        let g_a   = pad256(&group.g.modpow(&big_a, &group.p).to_bytes_be().1);

        let big_u = to_int(&sha256(&[&g_a, &g_b]));
        let big_x = to_int(&password_hash(password.as_ref(), salt1, salt2)?);
        let big_v = group.g.modpow(&big_x, &group.p);
        let big_k = to_int(&sha256(&[p, &group.g_padded]));

        // S = (g_b - k·v)^(a + u·x) mod p
        let base   = (big_g_b - (big_k * big_v) % &group.p).rem_euclid(&group.p);
        let big_s  = base.modpow(&(big_a + big_u * big_x), &group.p);
        let k_a    = sha256(&[&pad256(&big_s.to_bytes_be().1)]);

        let m1 = sha256(&[
            &xor32(&sha256(&[p]), &sha256(&[&group.g_padded])),
            &sha256(&[salt1]),
            &sha256(&[salt2]),
            &g_a,
            &g_b,
            &k_a,
        ]);

        Ok(Self { srp_id: challenge.srp_id, a: g_a, m1 })
    }
}

struct Group {
    g:        BigInt,
    g_padded: [u8; 256],
    p:        BigInt,
}

impl Group {
    fn new(g: i32, p: &[u8]) -> Result<Self, SrpError> {
        if !(2..=7).contains(&g) {
            return Err(SrpError::BadGenerator(g));
        }
        if p.is_empty() || p.len() > 256 {
            return Err(SrpError::BadModulus);
        }
        let big_p = BigInt::from_bytes_be(Sign::Plus, p);
        if big_p <= BigInt::from(g) {
            return Err(SrpError::BadModulus);
        }
        Ok(Self { g: BigInt::from(g), g_padded: pad256(&[g as u8]), p: big_p })
    }
}

fn sha256(parts: &[&[u8]]) -> [u8; 32] {
    let mut h = Sha256::new();
    for p in parts { h.update(p); }
    h.finalize().into()
}

/// `SH(data, salt) = H(salt | data | salt)`
fn salted(data: &[u8], salt: &[u8]) -> [u8; 32] {
    sha256(&[salt, data, salt])
}

/// `x = SH(pbkdf2(sha512, SH(SH(password, salt1), salt2), salt1, 100000), salt2)`
fn password_hash(password: &[u8], salt1: &[u8], salt2: &[u8]) -> Result<[u8; 32], SrpError> {
    let inner = salted(&salted(password, salt1), salt2);
    let mut stretched = [0u8; 64];
    pbkdf2::pbkdf2::<Hmac<Sha512>>(&inner, salt1, PBKDF2_ROUNDS, &mut stretched)
        .map_err(|_| SrpError::KeyDerivation)?;
    Ok(salted(&stretched, salt2))
}

fn to_int(bytes: &[u8]) -> BigInt {
    BigInt::from_bytes_be(Sign::Plus, bytes)
}

fn pad256(data: &[u8]) -> [u8; 256] {
    let mut out = [0u8; 256];
    let tail = &data[data.len().saturating_sub(256)..];
    out[256 - tail.len()..].copy_from_slice(tail);
    out
}

fn xor32(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    let mut out = [0u8; 32];
    for (o, (x, y)) in out.iter_mut().zip(a.iter().zip(b)) { *o = x ^ y; }
    out
}
