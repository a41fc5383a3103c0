//! In-memory [`Database`] for exercising [`Command`]s and [`Query`]s
//! without PostgreSQL.
//!
//! [`Command`]: crate::Command
//! [`Query`]: crate::Query

use std::sync::{Arc, Mutex, MutexGuard};

use common::operations::{
    By, Commit, Delete, Insert, Lock, Select, Transact, Update,
};
use tracerr::Traced;

use crate::{
    domain::{award, enquiry, Award, Enquiry, Invoice},
    read,
};

use super::{Database, Error};

/// In-memory [`Database`].
///
/// A transaction is a handle onto the same shared state, and locks are
/// no-ops: a single test drives the [`Database`] sequentially.
#[derive(Clone, Debug, Default)]
pub(crate) struct Memory(Arc<Mutex<State>>);

/// Tables of a [`Memory`] database.
#[derive(Debug, Default)]
struct State {
    /// Stored [`Enquiry`]s.
    enquiries: Vec<Enquiry>,

    /// Stored [`Award`]s.
    awards: Vec<Award>,

    /// Stored [`Invoice`]s.
    invoices: Vec<Invoice>,
}

impl Memory {
    /// Creates a new [`Memory`] database seeded with the provided rows.
    pub(crate) fn with(
        enquiries: impl IntoIterator<Item = Enquiry>,
        awards: impl IntoIterator<Item = Award>,
        invoices: impl IntoIterator<Item = Invoice>,
    ) -> Self {
        Self(Arc::new(Mutex::new(State {
            enquiries: enquiries.into_iter().collect(),
            awards: awards.into_iter().collect(),
            invoices: invoices.into_iter().collect(),
        })))
    }

    /// Locks the [`State`] of this [`Memory`] database.
    fn state(&self) -> MutexGuard<'_, State> {
        self.0.lock().unwrap()
    }

    /// Returns all the stored [`Enquiry`]s.
    pub(crate) fn enquiries(&self) -> Vec<Enquiry> {
        self.state().enquiries.clone()
    }

    /// Returns all the stored [`Award`]s.
    pub(crate) fn awards(&self) -> Vec<Award> {
        self.state().awards.clone()
    }

    /// Returns all the stored [`Invoice`]s.
    pub(crate) fn invoices(&self) -> Vec<Invoice> {
        self.state().invoices.clone()
    }
}

/// Case-insensitive "contains" matching, approximating the fuzzy SQL
/// search.
fn fuzzy(hay: impl AsRef<str>, needle: impl AsRef<str>) -> bool {
    hay.as_ref()
        .to_lowercase()
        .contains(&needle.as_ref().to_lowercase())
}

impl Database<Transact> for Memory {
    type Ok = Self;
    type Err = Traced<Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Lock<By<Enquiry, enquiry::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        _: Lock<By<Enquiry, enquiry::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Lock<By<Award, award::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        _: Lock<By<Award, award::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Select<By<Option<Enquiry>, enquiry::Id>>> for Memory {
    type Ok = Option<Enquiry>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Enquiry>, enquiry::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.state().enquiries.iter().find(|e| e.id == id).cloned())
    }
}

impl Database<Select<By<Vec<Enquiry>, read::enquiry::list::Filter>>>
    for Memory
{
    type Ok = Vec<Enquiry>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Enquiry>, read::enquiry::list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::enquiry::list::Filter {
            job_number,
            location,
        } = by.into_inner();

        let mut enquiries = self
            .state()
            .enquiries
            .iter()
            .filter(|e| {
                job_number
                    .as_ref()
                    .map_or(true, |n| fuzzy(&e.job_number, n))
                    && location.as_ref().map_or(true, |l| fuzzy(&e.location, l))
            })
            .cloned()
            .collect::<Vec<_>>();
        // Same ordering as the SQL selection provides.
        enquiries.sort_by(|a, b| {
            (b.date, b.created_at).cmp(&(a.date, a.created_at))
        });

        Ok(enquiries)
    }
}

impl Database<Update<Enquiry>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Update(enquiry): Update<Enquiry>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state();
        if let Some(stored) =
            state.enquiries.iter_mut().find(|e| e.id == enquiry.id)
        {
            *stored = enquiry;
        }
        Ok(())
    }
}

impl Database<Delete<By<Enquiry, enquiry::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Enquiry, enquiry::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.state().enquiries.retain(|e| e.id != id);
        Ok(())
    }
}

impl Database<Select<By<Option<Award>, award::Id>>> for Memory {
    type Ok = Option<Award>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Award>, award::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.state().awards.iter().find(|a| a.id == id).cloned())
    }
}

impl Database<Select<By<Vec<Award>, enquiry::Id>>> for Memory {
    type Ok = Vec<Award>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Award>, enquiry::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .state()
            .awards
            .iter()
            .filter(|a| a.enquiry_id == Some(id))
            .cloned()
            .collect())
    }
}

impl Database<Insert<Award>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert(award): Insert<Award>,
    ) -> Result<Self::Ok, Self::Err> {
        self.state().awards.push(award);
        Ok(())
    }
}

impl Database<Update<Award>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Update(award): Update<Award>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state();
        if let Some(stored) = state.awards.iter_mut().find(|a| a.id == award.id)
        {
            *stored = award;
        }
        Ok(())
    }
}

impl Database<Delete<By<Award, award::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Award, award::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.state().awards.retain(|a| a.id != id);
        Ok(())
    }
}

impl Database<Select<By<Vec<Invoice>, award::Id>>> for Memory {
    type Ok = Vec<Invoice>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Invoice>, award::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .state()
            .invoices
            .iter()
            .filter(|i| i.award_id == id)
            .cloned()
            .collect())
    }
}

impl Database<Insert<Invoice>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert(invoice): Insert<Invoice>,
    ) -> Result<Self::Ok, Self::Err> {
        self.state().invoices.push(invoice);
        Ok(())
    }
}

impl Database<Delete<By<Vec<Invoice>, award::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Vec<Invoice>, award::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.state().invoices.retain(|i| i.award_id != id);
        Ok(())
    }
}
