//! [`Enquiry`]-related read definitions.

#[cfg(doc)]
use crate::domain::Enquiry;

pub mod list {
    //! [`Enquiry`] list definitions.

    use crate::domain::enquiry;
    #[cfg(doc)]
    use crate::domain::Enquiry;

    /// Filter narrowing down an [`Enquiry`] list.
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`enquiry::JobNumber`] (or its part) to fuzzy search for.
        pub job_number: Option<enquiry::JobNumber>,

        /// [`enquiry::Location`] (or its part) to fuzzy search for.
        pub location: Option<enquiry::Location>,
    }

    /// Ordering of an [`Enquiry`] list.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub enum Ordering {
        /// Newest receipt date first, ties broken by the creation time.
        #[default]
        Date,

        /// Numeric [`enquiry::JobNumber`]s first (highest first), then
        /// free-form ones.
        JobNumber,
    }
}
