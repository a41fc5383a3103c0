//! [`Query`] collection related to a single [`Award`].

use common::operations::By;

use crate::domain::{award, Award};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries an [`Award`] by its [`award::Id`].
pub type ById = DatabaseQuery<By<Option<Award>, award::Id>>;
