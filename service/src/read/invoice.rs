//! [`Invoice`]-related read definitions.

use common::Money;

use crate::domain::Invoice;
#[cfg(doc)]
use crate::domain::Award;

use super::award::Summary;

/// Aggregated state of the [`Invoice`]s of a single [`Award`].
#[derive(Clone, Copy, Debug)]
pub struct Stats {
    /// Number of the [`Invoice`]s.
    pub count: i64,

    /// Sum of the total values of the [`Invoice`]s.
    pub total: Money,
}

/// [`Invoice`] along with the [`Summary`] of the [`Award`] it was raised
/// against.
#[derive(Clone, Debug)]
pub struct Entry {
    /// The [`Invoice`] itself.
    pub invoice: Invoice,

    /// [`Summary`] of the [`Award`] the [`Invoice`] was raised against.
    pub award: Summary,
}

pub mod monthly {
    //! Monthly [`Invoice`] listing definitions.

    use common::Money;

    #[cfg(doc)]
    use crate::domain::{invoice, Invoice};

    use super::Entry;

    /// Monthly listing of [`Invoice`]s.
    #[derive(Clone, Debug)]
    pub struct Listing {
        /// [`Entry`]s of the month.
        pub entries: Vec<Entry>,

        /// Sum of the total values of the month's
        /// [`invoice::Status::Invoiced`] [`Invoice`]s.
        pub invoiced_total: Money,

        /// Sum of the total values of the month's
        /// [`invoice::Status::Pending`] [`Invoice`]s.
        pub pending_total: Money,
    }
}
