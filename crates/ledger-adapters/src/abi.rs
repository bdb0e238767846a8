//! # Contract ABI
//!
//! Head/tail encoding of call data and decoding of return data for the
//! supply-chain contract:
//!
//! ```text
//! addProduct(uint256,string,string)
//! updateStage(uint256,uint8,string,string)
//! transferOwnership(uint256,address)
//! getProduct(uint256)  -> (uint256,string,address,string,uint8,bool,bool)
//! getHistory(uint256)  -> ((uint8,string,string,uint256)[], address[])
//! ```
//!
//! Only the types above are supported. Every read from return data is
//! bounds-checked; malformed data is an [`AbiError`], never a panic.

use sha3::{Digest, Keccak256};
use shared_types::{
    Address, LedgerCall, ProductId, RawHistory, RawProduct, RawStageRecord, U256,
};
use thiserror::Error;

const WORD: usize = 32;

pub const ADD_PRODUCT: &str = "addProduct(uint256,string,string)";
pub const UPDATE_STAGE: &str = "updateStage(uint256,uint8,string,string)";
pub const TRANSFER_OWNERSHIP: &str = "transferOwnership(uint256,address)";
pub const GET_PRODUCT: &str = "getProduct(uint256)";
pub const GET_HISTORY: &str = "getHistory(uint256)";

/// Selector of `Error(string)` revert data.
pub const ERROR_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];
/// Selector of `Panic(uint256)` revert data.
pub const PANIC_SELECTOR: [u8; 4] = [0x4e, 0x48, 0x7b, 0x71];

/// Return-data decoding failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    #[error("return data truncated at byte {0}")]
    Truncated(usize),
    #[error("{0} does not fit the native integer width")]
    Overflow(&'static str),
    #[error("invalid bool word")]
    InvalidBool,
    #[error("address word has non-zero padding")]
    InvalidAddress,
    #[error("string is not valid UTF-8")]
    InvalidUtf8,
}

/// A single ABI value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Uint(U256),
    Address(Address),
    String(String),
}

/// First four bytes of the Keccak-256 hash of `signature`.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

fn uint_word(value: U256) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    value.to_big_endian(&mut word);
    word
}

fn padded_len(len: usize) -> usize {
    len.div_ceil(WORD) * WORD
}

/// Encode `tokens` as a top-level tuple.
pub fn encode_tokens(tokens: &[Token]) -> Vec<u8> {
    let head_len = tokens.len() * WORD;
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for token in tokens {
        match token {
            Token::Uint(value) => head.extend_from_slice(&uint_word(*value)),
            Token::Address(address) => {
                let mut word = [0u8; WORD];
                word[12..].copy_from_slice(address.as_bytes());
                head.extend_from_slice(&word);
            }
            Token::String(text) => {
                let offset = head_len + tail.len();
                head.extend_from_slice(&uint_word(U256::from(offset as u64)));
                tail.extend_from_slice(&uint_word(U256::from(text.len() as u64)));
                tail.extend_from_slice(text.as_bytes());
                tail.resize(tail.len() + padded_len(text.len()) - text.len(), 0);
            }
        }
    }

    head.extend_from_slice(&tail);
    head
}

/// Selector followed by the encoded arguments.
pub fn encode_call(signature: &str, tokens: &[Token]) -> Vec<u8> {
    let mut data = selector(signature).to_vec();
    data.extend_from_slice(&encode_tokens(tokens));
    data
}

/// Call data for a mutating contract call.
pub fn encode_ledger_call(call: &LedgerCall) -> Vec<u8> {
    match call {
        LedgerCall::AddProduct {
            id,
            description,
            location,
        } => encode_call(
            ADD_PRODUCT,
            &[
                Token::Uint(id.value()),
                Token::String(description.clone()),
                Token::String(location.clone()),
            ],
        ),
        LedgerCall::UpdateStage {
            id,
            stage,
            location,
            action,
        } => encode_call(
            UPDATE_STAGE,
            &[
                Token::Uint(id.value()),
                Token::Uint(U256::from(stage.index())),
                Token::String(location.clone()),
                Token::String(action.clone()),
            ],
        ),
        LedgerCall::TransferOwnership { id, new_owner } => encode_call(
            TRANSFER_OWNERSHIP,
            &[Token::Uint(id.value()), Token::Address(*new_owner)],
        ),
    }
}

pub fn encode_get_product(id: ProductId) -> Vec<u8> {
    encode_call(GET_PRODUCT, &[Token::Uint(id.value())])
}

pub fn encode_get_history(id: ProductId) -> Vec<u8> {
    encode_call(GET_HISTORY, &[Token::Uint(id.value())])
}

/// Bounds-checked view over return data.
struct Reader<'a> {
    data: &'a [u8],
}

impl<'a> Reader<'a> {
    fn word(&self, pos: usize) -> Result<&'a [u8], AbiError> {
        let end = pos.checked_add(WORD).ok_or(AbiError::Truncated(pos))?;
        self.data.get(pos..end).ok_or(AbiError::Truncated(pos))
    }

    fn uint(&self, pos: usize) -> Result<U256, AbiError> {
        Ok(U256::from_big_endian(self.word(pos)?))
    }

    fn u64(&self, pos: usize, what: &'static str) -> Result<u64, AbiError> {
        let value = self.uint(pos)?;
        if value > U256::from(u64::MAX) {
            return Err(AbiError::Overflow(what));
        }
        Ok(value.low_u64())
    }

    /// Offsets and lengths.
    fn usize(&self, pos: usize) -> Result<usize, AbiError> {
        usize::try_from(self.u64(pos, "offset")?).map_err(|_| AbiError::Overflow("offset"))
    }

    /// Offset stored at `pos`, resolved against `base`.
    fn pointer(&self, base: usize, pos: usize) -> Result<usize, AbiError> {
        base.checked_add(self.usize(pos)?)
            .ok_or(AbiError::Overflow("offset"))
    }

    fn boolean(&self, pos: usize) -> Result<bool, AbiError> {
        let value = self.uint(pos)?;
        if value.is_zero() {
            Ok(false)
        } else if value == U256::one() {
            Ok(true)
        } else {
            Err(AbiError::InvalidBool)
        }
    }

    fn address(&self, pos: usize) -> Result<Address, AbiError> {
        let word = self.word(pos)?;
        if word[..12].iter().any(|b| *b != 0) {
            return Err(AbiError::InvalidAddress);
        }
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&word[12..]);
        Ok(Address::from_bytes(bytes))
    }

    /// Length-prefixed string starting at `pos`.
    fn string(&self, pos: usize) -> Result<String, AbiError> {
        let len = self.usize(pos)?;
        let start = pos + WORD;
        let end = start.checked_add(len).ok_or(AbiError::Overflow("length"))?;
        let bytes = self.data.get(start..end).ok_or(AbiError::Truncated(start))?;
        String::from_utf8(bytes.to_vec()).map_err(|_| AbiError::InvalidUtf8)
    }
}

/// Decode the `getProduct` return tuple.
pub fn decode_product(data: &[u8]) -> Result<RawProduct, AbiError> {
    let r = Reader { data };

    Ok(RawProduct {
        id: r.uint(0)?,
        description: r.string(r.pointer(0, WORD)?)?,
        owner: r.address(2 * WORD)?,
        location: r.string(r.pointer(0, 3 * WORD)?)?,
        stage: r.u64(4 * WORD, "stage")?,
        is_ethical: r.boolean(5 * WORD)?,
        is_compliant: r.boolean(6 * WORD)?,
    })
}

/// Decode the `getHistory` return pair.
pub fn decode_history(data: &[u8]) -> Result<RawHistory, AbiError> {
    let r = Reader { data };

    let details_at = r.pointer(0, 0)?;
    let count = r.usize(details_at)?;
    let elements = details_at + WORD;

    let records = (0..count)
        .map(|i| {
            let tuple = r.pointer(elements, elements + i * WORD)?;
            Ok(RawStageRecord {
                stage: r.u64(tuple, "stage")?,
                location: r.string(r.pointer(tuple, tuple + WORD)?)?,
                action: r.string(r.pointer(tuple, tuple + 2 * WORD)?)?,
                timestamp: r.u64(tuple + 3 * WORD, "timestamp")?,
            })
        })
        .collect::<Result<Vec<_>, AbiError>>()?;

    let owners_at = r.pointer(0, WORD)?;
    let count = r.usize(owners_at)?;
    let owners = (0..count)
        .map(|i| r.address(owners_at + WORD + i * WORD))
        .collect::<Result<Vec<_>, AbiError>>()?;

    Ok(RawHistory { records, owners })
}

/// Human-readable reason from revert data.
///
/// `Error(string)` yields its message, `Panic(uint256)` a panic code
/// description. Returns `None` for empty or unrecognized data.
pub fn decode_revert_reason(data: &[u8]) -> Option<String> {
    let (selector, body) = data.split_at_checked(4)?;
    let r = Reader { data: body };

    if selector == ERROR_SELECTOR {
        r.pointer(0, 0).and_then(|at| r.string(at)).ok()
    } else if selector == PANIC_SELECTOR {
        r.uint(0)
            .ok()
            .map(|code| format!("panic code {:#x}", code.low_u64()))
    } else {
        None
    }
}
