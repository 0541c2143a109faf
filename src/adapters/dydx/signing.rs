//! dYdX Signing
//!
//! EIP-712 signing of order cancellations for the dYdX v1 API.
//!
//! The cancel struct is `CancelLimitOrder(string action,bytes32[] orderHashes)`
//! under the `CancelOrder` / `1.0` / chain 1 domain (no verifying contract).
//! The EIP-712 hash is signed as a personal message and suffixed with the
//! signature-type byte `0x01`.

use ethers::abi::{encode, Token};
use ethers::core::types::U256;
use ethers::core::utils::keccak256;
use ethers::signers::{LocalWallet, Signer};

use crate::adapters::errors::{ExchangeError, ExchangeResult};

const CANCEL_DOMAIN_NAME: &str = "CancelOrder";
const CANCEL_DOMAIN_VERSION: &str = "1.0";
const CANCEL_CHAIN_ID: u64 = 1;
const CANCEL_ACTION: &str = "Cancel Orders";

/// Signature type byte appended after (r, s, v)
const SIGNATURE_TYPE_DECIMAL: u8 = 0x01;

/// Parse a 32-byte order hash given as `0x` + 64 hex digits
pub fn parse_order_hash(order_hash: &str) -> ExchangeResult<[u8; 32]> {
    let digits = order_hash
        .strip_prefix("0x")
        .ok_or_else(|| ExchangeError::Validation(format!("Order hash must start with 0x: {}", order_hash)))?;

    let bytes = hex::decode(digits)
        .map_err(|e| ExchangeError::Validation(format!("Order hash is not hex ({}): {}", e, order_hash)))?;

    bytes.try_into().map_err(|b: Vec<u8>| {
        ExchangeError::Validation(format!(
            "Order hash must be 32 bytes, got {}: {}",
            b.len(),
            order_hash
        ))
    })
}

/// EIP-712 digest of a single-order cancellation
pub fn cancel_order_hash(order_hash: &[u8; 32]) -> [u8; 32] {
    let domain_type_hash = keccak256("EIP712Domain(string name,string version,uint256 chainId)");
    let domain_separator = keccak256(encode(&[
        Token::FixedBytes(domain_type_hash.to_vec()),
        Token::FixedBytes(keccak256(CANCEL_DOMAIN_NAME).to_vec()),
        Token::FixedBytes(keccak256(CANCEL_DOMAIN_VERSION).to_vec()),
        Token::Uint(U256::from(CANCEL_CHAIN_ID)),
    ]));

    let struct_type_hash = keccak256("CancelLimitOrder(string action,bytes32[] orderHashes)");
    // bytes32[] encodes as the hash of the concatenated elements
    let order_hashes = keccak256(order_hash);
    let struct_hash = keccak256(encode(&[
        Token::FixedBytes(struct_type_hash.to_vec()),
        Token::FixedBytes(keccak256(CANCEL_ACTION).to_vec()),
        Token::FixedBytes(order_hashes.to_vec()),
    ]));

    let mut data = Vec::with_capacity(66);
    data.push(0x19);
    data.push(0x01);
    data.extend_from_slice(&domain_separator);
    data.extend_from_slice(&struct_hash);
    keccak256(&data)
}

/// Sign a cancellation; returns the typed signature as `0x` + 132 hex digits
pub async fn sign_cancel_order(wallet: &LocalWallet, order_hash: &str) -> ExchangeResult<String> {
    let hash = parse_order_hash(order_hash)?;
    let digest = cancel_order_hash(&hash);

    let signature = wallet
        .sign_message(digest)
        .await
        .map_err(|e| ExchangeError::AuthenticationFailed(format!("Cancel signing failed: {}", e)))?;

    let mut sig_bytes = signature.to_vec();
    if sig_bytes.len() != 65 {
        return Err(ExchangeError::AuthenticationFailed(format!(
            "Invalid cancel signature length: {} (expected 65)",
            sig_bytes.len()
        )));
    }
    sig_bytes.push(SIGNATURE_TYPE_DECIMAL);

    Ok(format!("0x{}", hex::encode(sig_bytes)))
}
