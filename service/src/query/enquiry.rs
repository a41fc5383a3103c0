//! [`Query`] collection related to a single [`Enquiry`].

use common::operations::By;

use crate::domain::{enquiry, Enquiry};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries an [`Enquiry`] by its [`enquiry::Id`].
pub type ById = DatabaseQuery<By<Option<Enquiry>, enquiry::Id>>;
