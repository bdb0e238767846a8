//! # Core Domain Entities
//!
//! Defines the product lifecycle entities exchanged between the ledger and
//! the presentation layer.
//!
//! ## Clusters
//!
//! - **Identifiers**: `ProductId`, `Address`, `TxHash`
//! - **Lifecycle**: `Stage`, `StageRecord`, `TimelineEntry`, `LifecycleTimeline`
//! - **Snapshots**: `Product`, `ProductView`
//! - **Ledger wire shapes**: `RawProduct`, `RawStageRecord`, `RawHistory`, `Receipt`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};

use crate::errors::{AddressFormatError, ProductIdFormatError, UnknownStage};

// Re-export the fixed-width integers from primitive-types for use across all subsystems
pub use primitive_types::{H160, H256, U256};

/// Hash of a submitted ledger transaction.
pub type TxHash = H256;

// =============================================================================
// CLUSTER A: IDENTIFIERS
// =============================================================================

/// Ledger-unique product identifier.
///
/// # Invariants
/// - Always >= 1.
/// - Fits the ledger's native `uint256` width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(U256);

impl ProductId {
    /// Wraps a raw ledger integer, rejecting zero.
    pub fn new(value: U256) -> Option<Self> {
        if value.is_zero() {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Convenience constructor for small identifiers.
    pub fn from_u64(value: u64) -> Option<Self> {
        Self::new(U256::from(value))
    }

    /// Returns the raw ledger integer.
    pub fn value(&self) -> U256 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // U256 renders in decimal
        fmt::Display::fmt(&self.0, f)
    }
}

/// Parses the canonical form only: ASCII decimal digits, nothing else.
impl FromStr for ProductId {
    type Err = ProductIdFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ProductIdFormatError::Empty);
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ProductIdFormatError::NonDigit);
        }
        let value = U256::from_dec_str(s).map_err(|_| ProductIdFormatError::Overflow)?;
        Self::new(value).ok_or(ProductIdFormatError::Zero)
    }
}

impl Serialize for ProductId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A 20-byte ledger account.
///
/// Equality is byte-wise, so two textual forms differing only in case are the
/// same address. The textual form is always the EIP-55 checksum encoding.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(H160);

impl Address {
    /// The all-zero address, used by the ledger for "no owner".
    pub const ZERO: Address = Address(H160([0u8; 20]));

    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(H160(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        self.0.as_fixed_bytes()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// EIP-55 mixed-case checksum encoding, `0x`-prefixed.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0.as_bytes());
        let hash = Keccak256::digest(lower.as_bytes());

        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }

    /// Ledger address format validator.
    ///
    /// Accepts 40 hex digits with an optional `0x` prefix. All-lowercase and
    /// all-uppercase bodies carry no checksum; a mixed-case body must match
    /// its EIP-55 encoding exactly.
    pub fn parse(s: &str) -> Result<Self, AddressFormatError> {
        let body = s.strip_prefix("0x").unwrap_or(s);
        if body.len() != 40 {
            return Err(AddressFormatError::BadLength(body.len()));
        }
        if !body.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(AddressFormatError::NonHex);
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(body, &mut bytes).map_err(|_| AddressFormatError::NonHex)?;
        let address = Self::from_bytes(bytes);

        let has_lower = body.bytes().any(|b| b.is_ascii_lowercase());
        let has_upper = body.bytes().any(|b| b.is_ascii_uppercase());
        if has_lower && has_upper && address.to_checksum()[2..] != *body {
            return Err(AddressFormatError::BadChecksum);
        }

        Ok(address)
    }
}

impl From<H160> for Address {
    fn from(value: H160) -> Self {
        Self(value)
    }
}

impl From<Address> for H160 {
    fn from(value: Address) -> Self {
        value.0
    }
}

impl FromStr for Address {
    type Err = AddressFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// CLUSTER B: LIFECYCLE
// =============================================================================

/// One step in a product's fixed six-step lifecycle.
///
/// The discriminant is the ledger's `uint8` representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    Created = 0,
    InProduction = 1,
    ReadyToShip = 2,
    InTransit = 3,
    Delivered = 4,
    Completed = 5,
}

impl Stage {
    /// Every stage, in ledger order.
    pub const ALL: [Stage; 6] = [
        Stage::Created,
        Stage::InProduction,
        Stage::ReadyToShip,
        Stage::InTransit,
        Stage::Delivered,
        Stage::Completed,
    ];

    /// Range-checked lookup of a ledger stage index.
    pub fn from_index(index: u64) -> Option<Stage> {
        let index = usize::try_from(index).ok()?;
        Self::ALL.get(index).copied()
    }

    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Human-readable label used by the presentation layer.
    pub const fn label(self) -> &'static str {
        match self {
            Stage::Created => "Created",
            Stage::InProduction => "In Production",
            Stage::ReadyToShip => "Ready to Ship",
            Stage::InTransit => "In Transit",
            Stage::Delivered => "Delivered",
            Stage::Completed => "Completed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts the ledger index (`"1"`), the label (`"In Production"`) or the
/// variant name in any case with `-`, `_` or spaces as separators.
impl FromStr for Stage {
    type Err = UnknownStage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(index) = trimmed.parse::<u64>() {
            return Stage::from_index(index).ok_or_else(|| UnknownStage(s.to_string()));
        }

        let folded: String = trimmed
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        Stage::ALL
            .into_iter()
            .find(|stage| {
                let name: String = stage
                    .label()
                    .chars()
                    .filter(|c| *c != ' ')
                    .flat_map(char::to_lowercase)
                    .collect();
                name == folded
            })
            .ok_or_else(|| UnknownStage(s.to_string()))
    }
}

/// A validated stage transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord {
    pub stage: Stage,
    pub location: String,
    pub action: String,
    /// Seconds since the Unix epoch, exactly as recorded by the ledger.
    pub timestamp: u64,
}

/// One position of a reconstructed timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub record: StageRecord,
    /// Owner in effect when `record` was written.
    pub owner: Address,
}

/// Position-aligned stage transitions and owners for one product.
///
/// Derived on every query and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LifecycleTimeline {
    entries: Vec<TimelineEntry>,
}

impl LifecycleTimeline {
    pub fn new(entries: Vec<TimelineEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimelineEntry> {
        self.entries.iter()
    }

    /// Most recent transition, if any.
    pub fn latest(&self) -> Option<&TimelineEntry> {
        self.entries.last()
    }

    /// Owners in ledger order.
    pub fn ownership_chain(&self) -> impl Iterator<Item = Address> + '_ {
        self.entries.iter().map(|entry| entry.owner)
    }
}

impl<'a> IntoIterator for &'a LifecycleTimeline {
    type Item = &'a TimelineEntry;
    type IntoIter = std::slice::Iter<'a, TimelineEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// =============================================================================
// CLUSTER C: SNAPSHOTS
// =============================================================================

/// Current state of a registered product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub description: String,
    pub current_owner: Address,
    pub location: String,
    pub current_stage: Stage,
    pub is_ethical: bool,
    pub is_compliant: bool,
}

/// Render-ready view of one product: snapshot plus reconstructed timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductView {
    pub product: Product,
    pub timeline: LifecycleTimeline,
}

// =============================================================================
// CLUSTER D: LEDGER WIRE SHAPES
// =============================================================================

/// Product tuple as returned by `getProduct`; the stage is unchecked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProduct {
    pub id: U256,
    pub description: String,
    pub owner: Address,
    pub location: String,
    pub stage: u64,
    pub is_ethical: bool,
    pub is_compliant: bool,
}

/// Stage record as returned by `getHistory`; the stage is unchecked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStageRecord {
    pub stage: u64,
    pub location: String,
    pub action: String,
    pub timestamp: u64,
}

/// The two parallel arrays returned by `getHistory`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawHistory {
    pub records: Vec<RawStageRecord>,
    pub owners: Vec<Address>,
}

/// Confirmation that a transaction reached finality and succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub tx_hash: TxHash,
    pub block_number: u64,
}
