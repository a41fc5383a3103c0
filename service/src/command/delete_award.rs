//! [`Command`] for deleting an [`Award`].

use common::operations::{
    By, Commit, Delete, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{award, enquiry, Award, Enquiry, Invoice},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting an [`Award`].
///
/// [`Invoice`]s of the [`Award`] are deleted with it. If the [`Award`]
/// was derived from an [`Enquiry`] still marked as
/// [`enquiry::Status::Awarded`], the [`Enquiry`] is reverted to
/// [`enquiry::Status::Pending`], so its status never claims an award
/// that no longer exists.
#[derive(Clone, Copy, Debug)]
pub struct DeleteAward {
    /// ID of the [`Award`] to be deleted.
    pub award_id: award::Id,
}

/// Output of a [`DeleteAward`] [`Command`] execution.
#[derive(Clone, Debug)]
pub struct Output {
    /// Deleted [`Award`].
    pub award: Award,

    /// Number of [`Invoice`]s deleted along with the [`Award`].
    pub invoices_deleted: u64,

    /// Whether the linked [`Enquiry`] was reverted to
    /// [`enquiry::Status::Pending`].
    pub enquiry_reverted: bool,
}

impl<Db> Command<DeleteAward> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Award, award::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Award>, award::Id>>,
            Ok = Option<Award>,
            Err = Traced<database::Error>,
        > + Database<Delete<By<Award, award::Id>>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Vec<Invoice>, award::Id>>,
            Ok = Vec<Invoice>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Vec<Invoice>, award::Id>>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Enquiry, enquiry::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Enquiry>, enquiry::Id>>,
            Ok = Option<Enquiry>,
            Err = Traced<database::Error>,
        > + Database<Update<Enquiry>, Err = Traced<database::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteAward) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteAward { award_id } = cmd;

        let now = self.clock().now();

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Award`.
        tx.execute(Lock(By::new(award_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let award = tx
            .execute(Select(By::<Option<Award>, _>::new(award_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::AwardNotExists(award_id))
            .map_err(tracerr::wrap!())?;

        let invoices = tx
            .execute(Select(By::<Vec<Invoice>, _>::new(award_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Delete(By::<Vec<Invoice>, _>::new(award_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Delete(By::<Award, _>::new(award_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut enquiry_reverted = false;
        if let Some(enquiry_id) = award.enquiry_id {
            tx.execute(Lock(By::new(enquiry_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;

            let enquiry = tx
                .execute(Select(By::<Option<Enquiry>, _>::new(enquiry_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            if let Some(mut enquiry) = enquiry {
                if enquiry.status == enquiry::Status::Awarded {
                    log::info!(
                        "`Award(id: {award_id})` deleted: reverting \
                         `Enquiry(id: {enquiry_id})` to `Pending`",
                    );
                    enquiry.status = enquiry::Status::Pending;
                    enquiry.updated_at = now.coerce();
                    tx.execute(Update(enquiry))
                        .await
                        .map_err(tracerr::map_from_and_wrap!(=> E))
                        .map(drop)?;
                    enquiry_reverted = true;
                }
            }
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(Output {
            award,
            invoices_deleted: invoices.len() as u64,
            enquiry_reverted,
        })
    }
}

/// Error of [`DeleteAward`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Award`] with the provided ID does not exist.
    #[display("`Award(id: {_0})` does not exist")]
    AwardNotExists(#[error(not(source))] award::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{Clock, DateTime, Money};
    use futures::executor::block_on;

    use crate::{
        domain::{enquiry, Award, Enquiry, Invoice},
        infra::database::memory::Memory,
        Command as _, Config, Service,
    };

    use super::DeleteAward;

    fn now() -> DateTime {
        DateTime::from_rfc3339("2026-08-29T12:00:00Z").unwrap()
    }

    fn test_enquiry(status: enquiry::Status) -> Enquiry {
        let created = DateTime::from_rfc3339("2026-08-01T09:00:00Z").unwrap();
        Enquiry {
            id: enquiry::Id::new(),
            job_number: enquiry::JobNumber::new("321").unwrap(),
            date: created.date().coerce(),
            value: Money::from_str("5000.00").unwrap(),
            location: enquiry::Location::new("Bristol").unwrap(),
            client: enquiry::Client::new("Acme Ltd").unwrap(),
            client_contact: enquiry::ClientContact::new("J. Doe").unwrap(),
            email: None,
            phone: None,
            status,
            created_by: None,
            created_at: created.coerce(),
            updated_at: created.coerce(),
        }
    }

    fn service_over(db: &Memory) -> Service<Memory> {
        Service::new(
            Config {
                clock: Clock::Fixed(now()),
            },
            db.clone(),
        )
    }

    #[test]
    fn deletes_invoices_and_reverts_awarded_enquiry() {
        let enquiry = test_enquiry(enquiry::Status::Awarded);
        let award = Award::from_enquiry(
            &enquiry,
            now().date().coerce(),
            None,
            now().coerce(),
        );
        let invoices = [
            Invoice::zero_valued(award.id, now().date(), None, now().coerce()),
            Invoice::zero_valued(award.id, now().date(), None, now().coerce()),
        ];
        let db = Memory::with([enquiry.clone()], [award.clone()], invoices);

        let output = block_on(
            service_over(&db).execute(DeleteAward { award_id: award.id }),
        )
        .unwrap();

        assert_eq!(output.invoices_deleted, 2);
        assert!(output.enquiry_reverted);
        assert!(db.awards().is_empty());
        assert!(db.invoices().is_empty());

        let enquiries = db.enquiries();
        assert_eq!(enquiries.len(), 1);
        assert_eq!(enquiries[0].status, enquiry::Status::Pending);
    }

    #[test]
    fn keeps_unlinked_enquiries_untouched() {
        let award = {
            let enquiry = test_enquiry(enquiry::Status::Awarded);
            let mut award = Award::from_enquiry(
                &enquiry,
                now().date().coerce(),
                None,
                now().coerce(),
            );
            award.enquiry_id = None;
            award
        };
        let db = Memory::with([], [award.clone()], []);

        let output = block_on(
            service_over(&db).execute(DeleteAward { award_id: award.id }),
        )
        .unwrap();

        assert_eq!(output.invoices_deleted, 0);
        assert!(!output.enquiry_reverted);
        assert!(db.awards().is_empty());
    }
}
