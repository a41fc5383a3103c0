//! [`Command`] for deleting an [`Enquiry`].

use common::operations::{
    By, Commit, Delete, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{award, enquiry, Award, Enquiry},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting an [`Enquiry`].
///
/// Linked [`Award`]s are kept as historical records: only their
/// back-reference to the deleted [`Enquiry`] is cleared, so they become
/// indistinguishable from manually created ones.
#[derive(Clone, Copy, Debug)]
pub struct DeleteEnquiry {
    /// ID of the [`Enquiry`] to be deleted.
    pub enquiry_id: enquiry::Id,
}

/// Output of a [`DeleteEnquiry`] [`Command`] execution.
#[derive(Clone, Debug)]
pub struct Output {
    /// Deleted [`Enquiry`].
    pub enquiry: Enquiry,

    /// Number of [`Award`]s unlinked from the deleted [`Enquiry`].
    pub awards_unlinked: u64,
}

impl<Db> Command<DeleteEnquiry> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Enquiry, enquiry::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Enquiry>, enquiry::Id>>,
            Ok = Option<Enquiry>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Enquiry, enquiry::Id>>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Vec<Award>, enquiry::Id>>,
            Ok = Vec<Award>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Award, award::Id>>, Err = Traced<database::Error>>
        + Database<Update<Award>, Err = Traced<database::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteEnquiry,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteEnquiry { enquiry_id } = cmd;

        let now = self.clock().now();

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent lifecycle decisions upon the same `Enquiry`.
        tx.execute(Lock(By::new(enquiry_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let enquiry = tx
            .execute(Select(By::<Option<Enquiry>, _>::new(enquiry_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::EnquiryNotExists(enquiry_id))
            .map_err(tracerr::wrap!())?;

        let awards = tx
            .execute(Select(By::<Vec<Award>, _>::new(enquiry_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        for mut award in awards.iter().cloned() {
            tx.execute(Lock(By::new(award.id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;

            award.enquiry_id = None;
            award.updated_at = now.coerce();
            tx.execute(Update(award))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        tx.execute(Delete(By::<Enquiry, _>::new(enquiry_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(Output {
            enquiry,
            awards_unlinked: awards.len() as u64,
        })
    }
}

/// Error of [`DeleteEnquiry`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Enquiry`] with the provided ID does not exist.
    #[display("`Enquiry(id: {_0})` does not exist")]
    EnquiryNotExists(#[error(not(source))] enquiry::Id),
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{Clock, DateTime, Money};
    use futures::executor::block_on;

    use crate::{
        domain::{enquiry, Award, Enquiry},
        infra::database::memory::Memory,
        Command as _, Config, Service,
    };

    use super::DeleteEnquiry;

    fn now() -> DateTime {
        DateTime::from_rfc3339("2026-08-29T12:00:00Z").unwrap()
    }

    fn test_enquiry() -> Enquiry {
        let created = DateTime::from_rfc3339("2026-08-01T09:00:00Z").unwrap();
        Enquiry {
            id: enquiry::Id::new(),
            job_number: enquiry::JobNumber::new("555").unwrap(),
            date: created.date().coerce(),
            value: Money::from_str("5000.00").unwrap(),
            location: enquiry::Location::new("Bristol").unwrap(),
            client: enquiry::Client::new("Acme Ltd").unwrap(),
            client_contact: enquiry::ClientContact::new("J. Doe").unwrap(),
            email: None,
            phone: None,
            status: enquiry::Status::Awarded,
            created_by: None,
            created_at: created.coerce(),
            updated_at: created.coerce(),
        }
    }

    #[test]
    fn unlinks_surviving_awards() {
        let enquiry = test_enquiry();
        let award = Award::from_enquiry(
            &enquiry,
            now().date().coerce(),
            None,
            now().coerce(),
        );
        let db = Memory::with([enquiry.clone()], [award.clone()], []);
        let service = Service::new(
            Config {
                clock: Clock::Fixed(now()),
            },
            db.clone(),
        );

        let output = block_on(service.execute(DeleteEnquiry {
            enquiry_id: enquiry.id,
        }))
        .unwrap();

        assert_eq!(output.awards_unlinked, 1);
        assert!(db.enquiries().is_empty());

        let stored = db.awards();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, award.id);
        assert_eq!(stored[0].enquiry_id, None);
    }
}
