//! [`Award`]-related read definitions.

use common::Money;

use crate::domain::Award;
#[cfg(doc)]
use crate::domain::Invoice;

/// [`Award`] along with the aggregated state of its [`Invoice`]s.
#[derive(Clone, Debug)]
pub struct Summary {
    /// The [`Award`] itself.
    pub award: Award,

    /// Number of [`Invoice`]s raised against the [`Award`].
    pub invoice_count: u64,

    /// Sum of the total values of the [`Award`]'s [`Invoice`]s.
    pub total_invoiced: Money,
}

impl Summary {
    /// Indicates whether the [`Award`] has no [`Invoice`]s at all.
    #[must_use]
    pub fn is_missing_invoice(&self) -> bool {
        self.invoice_count == 0
    }

    /// Indicates whether the invoiced total disagrees with the awarded
    /// value, both compared rounded to 2 decimal places.
    #[must_use]
    pub fn has_mismatch(&self) -> bool {
        self.award.has_mismatch(self.total_invoiced)
    }
}

pub mod monthly {
    //! Monthly [`Award`] listing definitions.

    use common::Money;

    #[cfg(doc)]
    use crate::domain::Award;

    use super::Summary;

    /// Monthly listing of [`Award`]s.
    #[derive(Clone, Debug)]
    pub struct Listing {
        /// [`Summary`]s of the [`Award`]s of the month.
        pub summaries: Vec<Summary>,

        /// Sum of the awarded values of the month.
        pub total_awarded: Money,
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{DateTime, Money};

    use crate::domain::{enquiry, Award};

    use super::Summary;

    fn test_award(value: &str) -> Award {
        let now = DateTime::from_rfc3339("2026-08-01T09:00:00Z").unwrap();
        Award {
            id: crate::domain::award::Id::new(),
            enquiry_id: None,
            job_number: enquiry::JobNumber::new("321").unwrap(),
            location: enquiry::Location::new("Bath").unwrap(),
            client: enquiry::Client::new("Acme Ltd").unwrap(),
            client_contact: enquiry::ClientContact::new("J. Doe").unwrap(),
            email: None,
            phone: None,
            value: Money::from_str(value).unwrap(),
            date: now.date().coerce(),
            created_by: None,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        }
    }

    #[test]
    fn flags_missing_invoices_and_mismatches() {
        let uninvoiced = Summary {
            award: test_award("1000.00"),
            invoice_count: 0,
            total_invoiced: Money::ZERO,
        };
        assert!(uninvoiced.is_missing_invoice());
        assert!(uninvoiced.has_mismatch());

        let partially_invoiced = Summary {
            award: test_award("1000.00"),
            invoice_count: 2,
            total_invoiced: Money::from_str("400.00").unwrap(),
        };
        assert!(!partially_invoiced.is_missing_invoice());
        assert!(partially_invoiced.has_mismatch());

        let fully_invoiced = Summary {
            award: test_award("1000.00"),
            invoice_count: 2,
            total_invoiced: Money::from_str("1000.00").unwrap(),
        };
        assert!(!fully_invoiced.has_mismatch());
    }

    #[test]
    fn zero_valued_award_without_invoices_matches() {
        let summary = Summary {
            award: test_award("0.00"),
            invoice_count: 0,
            total_invoiced: Money::ZERO,
        };
        assert!(summary.is_missing_invoice());
        assert!(!summary.has_mismatch());
    }
}
