use crate::core::capacity::{capacity_from_symbol, Availability, CapacityQuote, GradeSchedule};
use crate::core::house::HouseId;
use chrono::{DateTime, Utc};
use log::warn;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Errors arising from credit line administration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreditLineError {
    #[error("overdraft on {from} -> {to}: requested {requested}, remaining {remaining}")]
    Overdraft {
        from: HouseId,
        to: HouseId,
        requested: i64,
        remaining: i64,
    },
    #[error("credit amounts must be non-negative, got {0}")]
    NegativeAmount(i64),
}

/// A directed, capacity-bounded credit line from one house to another.
///
/// `source` may trade against `destination`'s exposure up to `capacity` for
/// the given product and tenor. Usage is tracked separately so the line can
/// be reset between trading sessions without losing the agreed capacity.
///
/// # Examples
///
/// ```
/// use creditline_engine::core::house::HouseId;
/// use creditline_engine::core::line::CreditLine;
///
/// let mut line = CreditLine::new(HouseId::new("A"), HouseId::new("B"), "swap", "1m", 20);
/// line.use_credit(15).unwrap();
/// assert_eq!(line.remaining(), 5);
/// assert!(line.use_credit(10).is_err());
/// assert_eq!(line.remaining(), 5);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct CreditLine {
    id: Uuid,
    source: HouseId,
    destination: HouseId,
    product: String,
    tenor: String,
    capacity: i64,
    used: i64,
    availability: Availability,
    /// The source house may act as a switch on this line.
    can_switch: bool,
    /// The destination house accepts trades switched through a third house.
    allows_switch: bool,
    registered_at: DateTime<Utc>,
    last_modified_at: DateTime<Utc>,
}

impl CreditLine {
    /// Create an open line with the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is negative.
    pub fn new(
        source: HouseId,
        destination: HouseId,
        product: impl AsRef<str>,
        tenor: impl AsRef<str>,
        capacity: i64,
    ) -> Self {
        assert!(
            capacity >= 0,
            "Credit line capacity must be non-negative, got {}",
            capacity
        );
        Self::from_quote(source, destination, product, tenor, CapacityQuote::open(capacity))
    }

    /// Create a line from an already decoded capacity quote.
    pub fn from_quote(
        source: HouseId,
        destination: HouseId,
        product: impl AsRef<str>,
        tenor: impl AsRef<str>,
        quote: CapacityQuote,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            source,
            destination,
            product: product.as_ref().trim().to_uppercase(),
            tenor: tenor.as_ref().trim().to_uppercase(),
            capacity: quote.amount.max(0),
            used: 0,
            availability: quote.availability,
            can_switch: false,
            allows_switch: false,
            registered_at: now,
            last_modified_at: now,
        }
    }

    /// Create a line from a grid symbol. Unreadable symbols yield a closed
    /// zero-capacity line.
    pub fn from_symbol(
        source: HouseId,
        destination: HouseId,
        product: impl AsRef<str>,
        tenor: impl AsRef<str>,
        symbol: &str,
        grades: &GradeSchedule,
    ) -> Self {
        let quote = capacity_from_symbol(symbol, grades);
        Self::from_quote(source, destination, product, tenor, quote)
    }

    /// Set the switch flags.
    pub fn with_switch_flags(mut self, can_switch: bool, allows_switch: bool) -> Self {
        self.set_switch_flags(can_switch, allows_switch);
        self
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn source(&self) -> &HouseId {
        &self.source
    }

    pub fn destination(&self) -> &HouseId {
        &self.destination
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn tenor(&self) -> &str {
        &self.tenor
    }

    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    pub fn used(&self) -> i64 {
        self.used
    }

    pub fn availability(&self) -> Availability {
        self.availability
    }

    pub fn can_switch(&self) -> bool {
        self.can_switch
    }

    pub fn allows_switch(&self) -> bool {
        self.allows_switch
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    pub fn last_modified_at(&self) -> DateTime<Utc> {
        self.last_modified_at
    }

    // --- Derived state ---

    /// Unused capacity. Can be negative if the line was re-opened below its usage.
    pub fn remaining(&self) -> i64 {
        self.capacity - self.used
    }

    pub fn is_open(&self) -> bool {
        self.remaining() > 0
    }

    pub fn is_closed(&self) -> bool {
        !self.is_open()
    }

    // --- Administration ---

    /// Open the line with a new capacity.
    pub fn open(&mut self, amount: i64) -> Result<(), CreditLineError> {
        self.set_capacity(amount, Availability::Open)
    }

    /// Close the line. Capacity drops to zero.
    pub fn close(&mut self) {
        self.capacity = 0;
        self.availability = Availability::Closed;
        self.touch();
    }

    /// Record a capacity that still has to be confirmed with the counterparty.
    pub fn mark_uncertain(&mut self, amount: i64) -> Result<(), CreditLineError> {
        self.set_capacity(amount, Availability::NeedsCheck)
    }

    pub fn set_switch_flags(&mut self, can_switch: bool, allows_switch: bool) {
        self.can_switch = can_switch;
        self.allows_switch = allows_switch;
        self.touch();
    }

    /// Consume `amount` of the remaining capacity.
    ///
    /// Returns the capacity left afterwards. An amount larger than
    /// [`remaining`](Self::remaining) is rejected and the line is unchanged.
    pub fn use_credit(&mut self, amount: i64) -> Result<i64, CreditLineError> {
        if amount < 0 {
            return Err(CreditLineError::NegativeAmount(amount));
        }
        let remaining = self.remaining();
        if amount > remaining {
            warn!(
                "Rejected overdraft on {} -> {} ({} {}): requested {}, remaining {}",
                self.source, self.destination, self.product, self.tenor, amount, remaining
            );
            return Err(CreditLineError::Overdraft {
                from: self.source.clone(),
                to: self.destination.clone(),
                requested: amount,
                remaining,
            });
        }
        self.used += amount;
        self.touch();
        Ok(self.remaining())
    }

    /// Clear all usage, restoring the full capacity.
    pub fn reset_usage(&mut self) {
        self.used = 0;
        self.touch();
    }

    fn set_capacity(&mut self, amount: i64, availability: Availability) -> Result<(), CreditLineError> {
        if amount < 0 {
            return Err(CreditLineError::NegativeAmount(amount));
        }
        self.capacity = amount;
        self.availability = availability;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.last_modified_at = Utc::now();
    }
}
