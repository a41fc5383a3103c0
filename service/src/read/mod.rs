//! Read entities definitions.

pub mod award;
pub mod enquiry;
pub mod invoice;

#[cfg(doc)]
use common::Date;

pub use self::award::Summary as AwardSummary;

/// Calendar month selecting monthly listings.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Month {
    /// Calendar year.
    year: i32,

    /// Calendar month (1 through 12).
    month: u8,
}

impl Month {
    /// Creates a new [`Month`] if the given `month` is a valid calendar
    /// month.
    #[must_use]
    pub fn new(year: i32, month: u8) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Returns the [`Month`] the provided [`Date`] falls into.
    ///
    /// [`Date`]: common::Date
    #[must_use]
    pub fn of<Of: ?Sized>(date: common::DateOf<Of>) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Returns the calendar year of this [`Month`].
    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Returns the calendar month of this [`Month`] (1 through 12).
    #[must_use]
    pub fn month(&self) -> u8 {
        self.month
    }
}
