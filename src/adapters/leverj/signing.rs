//! LeverJ Signing
//!
//! Request authentication for the LeverJ REST API.
//!
//! The signed message is the canonical JSON of `{method, uri, nonce[, body]}`:
//! keys in that order, `,`/`:` separators with no whitespace, non-ASCII
//! escaped as `\uXXXX`. The exchange verifies the exact bytes, so the
//! serializer below must not be swapped for `serde_json::to_string`.
//! The bytes are signed as an Ethereum personal message and the
//! resulting `(v, r, s)` goes into the Authorization header.

use std::io;

use ethers::signers::{LocalWallet, Signer};
use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::Value;

use crate::adapters::errors::{ExchangeError, ExchangeResult};

// =============================================================================
// Canonical JSON
// =============================================================================

/// Control characters below 0x20 reach the formatter already escaped;
/// DEL does not.
fn is_printable_ascii(byte: u8) -> bool {
    byte < 0x7f
}

/// Compact formatter that escapes every character outside printable ASCII
struct AsciiCompactFormatter;

impl Formatter for AsciiCompactFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if fragment.bytes().all(is_printable_ascii) {
            return writer.write_all(fragment.as_bytes());
        }
        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() && is_printable_ascii(ch as u8) {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

/// Serialize `value` to the canonical compact JSON the exchange verifies
pub fn canonical_json<T: Serialize + ?Sized>(value: &T) -> ExchangeResult<String> {
    let mut out = Vec::with_capacity(128);
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, AsciiCompactFormatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| ExchangeError::AuthenticationFailed(format!("Canonical JSON failed: {}", e)))?;
    String::from_utf8(out)
        .map_err(|e| ExchangeError::AuthenticationFailed(format!("Canonical JSON not UTF-8: {}", e)))
}

/// The object whose canonical JSON gets signed
///
/// Field order is part of the wire contract.
#[derive(Debug, Clone, Serialize)]
pub struct SigningPayload<'a> {
    pub method: &'a str,
    pub uri: &'a str,
    pub nonce: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<&'a Value>,
}

impl<'a> SigningPayload<'a> {
    pub fn new(method: &'a str, uri: &'a str, nonce: u64, body: Option<&'a Value>) -> Self {
        Self {
            method,
            uri,
            nonce,
            body,
        }
    }

    pub fn to_canonical_json(&self) -> ExchangeResult<String> {
        canonical_json(self)
    }
}

// =============================================================================
// Signature
// =============================================================================

/// Recoverable secp256k1 signature split into its parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VrsSignature {
    pub v: u8,
    pub r: [u8; 32],
    pub s: [u8; 32],
}

impl VrsSignature {
    /// Split a 65-byte `r || s || v` signature
    pub fn from_bytes(bytes: &[u8]) -> ExchangeResult<Self> {
        if bytes.len() != 65 {
            return Err(ExchangeError::AuthenticationFailed(format!(
                "Invalid signature length: {} (expected 65)",
                bytes.len()
            )));
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);

        // Personal-message signatures must carry v = 27/28
        let v = match bytes[64] {
            v @ (0 | 1) => v + 27,
            v @ (27 | 28) => v,
            v => {
                return Err(ExchangeError::AuthenticationFailed(format!(
                    "Invalid signature v value: {} (expected 0, 1, 27, or 28)",
                    v
                )))
            }
        };

        Ok(Self { v, r, s })
    }

    pub fn r_hex(&self) -> String {
        format!("0x{}", hex::encode(self.r))
    }

    pub fn s_hex(&self) -> String {
        format!("0x{}", hex::encode(self.s))
    }
}

/// Sign `message` as an Ethereum personal message
pub async fn sign_message(wallet: &LocalWallet, message: &str) -> ExchangeResult<VrsSignature> {
    let signature = wallet
        .sign_message(message.as_bytes())
        .await
        .map_err(|e| ExchangeError::AuthenticationFailed(format!("Request signing failed: {}", e)))?;

    VrsSignature::from_bytes(&signature.to_vec())
}

/// `SIGN {account}.{api_key}.{v}.{r}.{s}`
pub fn authorization_header(account_id: &str, api_key: &str, signature: &VrsSignature) -> String {
    format!(
        "SIGN {}.{}.{}.{}.{}",
        account_id,
        api_key,
        signature.v,
        signature.r_hex(),
        signature.s_hex()
    )
}
