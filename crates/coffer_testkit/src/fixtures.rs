//! Test fixtures and database helpers.
//!
//! The fixture types cover the six item shapes the typed layer supports:
//! hand-coded and serde-coded primary payloads, each paired with no
//! metadata, serde-coded metadata, or hand-coded metadata.
//!
//! | item       | primary codec | metadata            |
//! |------------|---------------|---------------------|
//! | `Person`   | hand-coded    | none                |
//! | `Employee` | hand-coded    | `Badge` (serde)     |
//! | `Manager`  | hand-coded    | `Reports` (hand)    |
//! | `Currency` | serde         | none                |
//! | `Barcode`  | serde         | `Scanned` (serde)   |
//! | `Product`  | serde         | `Inventory` (hand)  |

use coffer_core::{
    from_cbor, to_cbor, CoreResult, Database, MetadataCodec, NoMetadata, Payload, Persistable,
    Storable,
};
use serde::{Deserialize, Serialize};

/// Field separator for the hand-coded fixture payloads.
const SEP: char = '\x1f';

/// Runs `f` against a fresh in-memory database.
///
/// # Example
///
/// ```rust,ignore
/// use coffer_testkit::{with_test_db, Person};
///
/// #[test]
/// fn my_test() {
///     with_test_db(|db| {
///         let connection = db.connection();
///         // ... test operations
///     });
/// }
/// ```
pub fn with_test_db<F, R>(f: F) -> R
where
    F: FnOnce(&Database) -> R,
{
    let db = Database::open_in_memory();
    f(&db)
}

// ---------------------------------------------------------------------------
// Hand-coded primary payloads
// ---------------------------------------------------------------------------

/// A person, stored with a hand-written codec and no metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Person {
    /// Key within the `people` collection.
    pub identifier: String,
    /// Display name.
    pub name: String,
}

impl Person {
    /// Creates a person.
    pub fn new(identifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
        }
    }
}

impl Storable for Person {
    fn encode(&self) -> CoreResult<Payload> {
        Ok(format!("{}{SEP}{}", self.identifier, self.name).into_bytes())
    }

    fn decode(bytes: &[u8]) -> Option<Self> {
        let text = std::str::from_utf8(bytes).ok()?;
        let (identifier, name) = text.split_once(SEP)?;
        Some(Self::new(identifier, name))
    }
}

impl Persistable for Person {
    const COLLECTION: &'static str = "people";
    type Metadata = NoMetadata;

    fn key(&self) -> String {
        self.identifier.clone()
    }
}

/// An employee, hand-coded, carrying serde-coded [`Badge`] metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    /// Key within the `employees` collection.
    pub identifier: String,
    /// Display name.
    pub name: String,
    /// Metadata slot.
    pub badge: Option<Badge>,
}

impl Employee {
    /// Creates an employee with an optional badge.
    pub fn new(
        identifier: impl Into<String>,
        name: impl Into<String>,
        badge: Option<Badge>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            badge,
        }
    }
}

/// Badge metadata for [`Employee`], serde-coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    /// Badge number.
    pub number: u32,
}

impl MetadataCodec for Badge {
    fn encode_metadata(&self) -> CoreResult<Payload> {
        to_cbor(self)
    }

    fn decode_metadata(bytes: &[u8]) -> Option<Self> {
        from_cbor(bytes)
    }
}

impl Storable for Employee {
    fn encode(&self) -> CoreResult<Payload> {
        Ok(format!("{}{SEP}{}", self.identifier, self.name).into_bytes())
    }

    fn decode(bytes: &[u8]) -> Option<Self> {
        let text = std::str::from_utf8(bytes).ok()?;
        let (identifier, name) = text.split_once(SEP)?;
        Some(Self::new(identifier, name, None))
    }
}

impl Persistable for Employee {
    const COLLECTION: &'static str = "employees";
    type Metadata = Badge;

    fn key(&self) -> String {
        self.identifier.clone()
    }

    fn metadata(&self) -> Option<&Badge> {
        self.badge.as_ref()
    }

    fn set_metadata(&mut self, metadata: Badge) {
        self.badge = Some(metadata);
    }
}

/// A manager, hand-coded, carrying hand-coded [`Reports`] metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manager {
    /// Key within the `managers` collection.
    pub identifier: String,
    /// Display name.
    pub name: String,
    /// Metadata slot.
    pub reports: Option<Reports>,
}

impl Manager {
    /// Creates a manager with an optional report count.
    pub fn new(
        identifier: impl Into<String>,
        name: impl Into<String>,
        reports: Option<Reports>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            reports,
        }
    }
}

/// Direct-report metadata for [`Manager`], stored as a big-endian `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reports {
    /// Number of direct reports.
    pub count: u32,
}

impl MetadataCodec for Reports {
    fn encode_metadata(&self) -> CoreResult<Payload> {
        Ok(self.count.to_be_bytes().to_vec())
    }

    fn decode_metadata(bytes: &[u8]) -> Option<Self> {
        let count = u32::from_be_bytes(bytes.try_into().ok()?);
        Some(Self { count })
    }
}

impl Storable for Manager {
    fn encode(&self) -> CoreResult<Payload> {
        Ok(format!("{}{SEP}{}", self.identifier, self.name).into_bytes())
    }

    fn decode(bytes: &[u8]) -> Option<Self> {
        let text = std::str::from_utf8(bytes).ok()?;
        let (identifier, name) = text.split_once(SEP)?;
        Some(Self::new(identifier, name, None))
    }
}

impl Persistable for Manager {
    const COLLECTION: &'static str = "managers";
    type Metadata = Reports;

    fn key(&self) -> String {
        self.identifier.clone()
    }

    fn metadata(&self) -> Option<&Reports> {
        self.reports.as_ref()
    }

    fn set_metadata(&mut self, metadata: Reports) {
        self.reports = Some(metadata);
    }
}

// ---------------------------------------------------------------------------
// Serde-coded primary payloads
// ---------------------------------------------------------------------------

/// A currency, serde-coded, with no metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// ISO code; key within the `currencies` collection.
    pub code: String,
    /// Display symbol.
    pub symbol: String,
}

impl Currency {
    /// Creates a currency.
    pub fn new(code: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            symbol: symbol.into(),
        }
    }
}

impl Storable for Currency {
    fn encode(&self) -> CoreResult<Payload> {
        to_cbor(self)
    }

    fn decode(bytes: &[u8]) -> Option<Self> {
        from_cbor(bytes)
    }
}

impl Persistable for Currency {
    const COLLECTION: &'static str = "currencies";
    type Metadata = NoMetadata;

    fn key(&self) -> String {
        self.code.clone()
    }
}

/// A barcode, serde-coded, carrying serde-coded [`Scanned`] metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barcode {
    /// Code; key within the `barcodes` collection.
    pub code: String,
    /// Metadata slot.
    #[serde(skip)]
    pub scanned: Option<Scanned>,
}

impl Barcode {
    /// Creates a barcode with an optional scan state.
    pub fn new(code: impl Into<String>, scanned: Option<Scanned>) -> Self {
        Self {
            code: code.into(),
            scanned,
        }
    }
}

/// Scan-state metadata for [`Barcode`], serde-coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scanned {
    /// Whether the barcode has been scanned.
    pub scanned: bool,
}

impl MetadataCodec for Scanned {
    fn encode_metadata(&self) -> CoreResult<Payload> {
        to_cbor(self)
    }

    fn decode_metadata(bytes: &[u8]) -> Option<Self> {
        from_cbor(bytes)
    }
}

impl Storable for Barcode {
    fn encode(&self) -> CoreResult<Payload> {
        to_cbor(self)
    }

    fn decode(bytes: &[u8]) -> Option<Self> {
        from_cbor(bytes)
    }
}

impl Persistable for Barcode {
    const COLLECTION: &'static str = "barcodes";
    type Metadata = Scanned;

    fn key(&self) -> String {
        self.code.clone()
    }

    fn metadata(&self) -> Option<&Scanned> {
        self.scanned.as_ref()
    }

    fn set_metadata(&mut self, metadata: Scanned) {
        self.scanned = Some(metadata);
    }
}

/// A product, serde-coded, carrying hand-coded [`Inventory`] metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Key within the `products` collection.
    pub identifier: String,
    /// Display name.
    pub name: String,
    /// Price in cents.
    pub price_cents: u64,
    /// Metadata slot.
    #[serde(skip)]
    pub inventory: Option<Inventory>,
}

impl Product {
    /// Creates a product with an optional inventory state.
    pub fn new(
        identifier: impl Into<String>,
        name: impl Into<String>,
        price_cents: u64,
        inventory: Option<Inventory>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            price_cents,
            inventory,
        }
    }
}

/// Inventory metadata for [`Product`], stored as two big-endian `u32`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inventory {
    /// Units on hand.
    pub on_hand: u32,
    /// Reorder threshold.
    pub reorder_at: u32,
}

impl MetadataCodec for Inventory {
    fn encode_metadata(&self) -> CoreResult<Payload> {
        let mut bytes = Payload::with_capacity(8);
        bytes.extend_from_slice(&self.on_hand.to_be_bytes());
        bytes.extend_from_slice(&self.reorder_at.to_be_bytes());
        Ok(bytes)
    }

    fn decode_metadata(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != 8 {
            return None;
        }
        Some(Self {
            on_hand: u32::from_be_bytes(bytes[..4].try_into().ok()?),
            reorder_at: u32::from_be_bytes(bytes[4..].try_into().ok()?),
        })
    }
}

impl Storable for Product {
    fn encode(&self) -> CoreResult<Payload> {
        to_cbor(self)
    }

    fn decode(bytes: &[u8]) -> Option<Self> {
        from_cbor(bytes)
    }
}

impl Persistable for Product {
    const COLLECTION: &'static str = "products";
    type Metadata = Inventory;

    fn key(&self) -> String {
        self.identifier.clone()
    }

    fn metadata(&self) -> Option<&Inventory> {
        self.inventory.as_ref()
    }

    fn set_metadata(&mut self, metadata: Inventory) {
        self.inventory = Some(metadata);
    }
}
