//! [`Command`] for editing an [`Enquiry`].

use common::operations::{
    By, Commit, Delete, Insert, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{award, enquiry, invoice, user, Award, Enquiry, Invoice},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for editing an [`Enquiry`].
///
/// Besides persisting the field edits, applies the award lifecycle
/// [`Transition`] evaluated on the old and the new [`enquiry::Status`]
/// pair, all within a single transaction.
///
/// [`Transition`]: award::Transition
#[derive(Clone, Debug)]
pub struct UpdateEnquiry {
    /// ID of the [`Enquiry`] to be edited.
    pub enquiry_id: enquiry::Id,

    /// New [`enquiry::JobNumber`] of the [`Enquiry`].
    pub job_number: enquiry::JobNumber,

    /// New receipt [`Date`] of the [`Enquiry`].
    ///
    /// [`Date`]: common::Date
    pub date: enquiry::ReceiptDate,

    /// New estimated [`Money`] value of the [`Enquiry`].
    ///
    /// [`Money`]: common::Money
    pub value: common::Money,

    /// New [`enquiry::Location`] of the [`Enquiry`].
    pub location: enquiry::Location,

    /// New [`enquiry::Client`] of the [`Enquiry`].
    pub client: enquiry::Client,

    /// New [`enquiry::ClientContact`] of the [`Enquiry`].
    pub client_contact: enquiry::ClientContact,

    /// New [`enquiry::Email`] of the [`Enquiry`].
    pub email: Option<enquiry::Email>,

    /// New [`enquiry::Phone`] of the [`Enquiry`].
    pub phone: Option<enquiry::Phone>,

    /// New [`enquiry::Status`] of the [`Enquiry`].
    pub status: enquiry::Status,

    /// ID of the user applying the edit.
    ///
    /// Stamped onto the [`Award`] and the [`Invoice`] derived when the
    /// edit transitions the [`Enquiry`] into
    /// [`enquiry::Status::Awarded`].
    pub created_by: Option<user::Id>,
}

/// Output of an [`UpdateEnquiry`] [`Command`] execution.
#[derive(Clone, Debug)]
pub struct Output {
    /// Edited [`Enquiry`].
    pub enquiry: Enquiry,

    /// Award lifecycle [`Outcome`] of the edit.
    pub outcome: Outcome,
}

/// Award lifecycle side effect applied by an [`UpdateEnquiry`]
/// [`Command`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// New [`Award`] was created, along with its initial zero-valued
    /// [`Invoice`].
    AwardCreated {
        /// ID of the created [`Award`].
        award_id: award::Id,

        /// ID of the created [`Invoice`].
        invoice_id: invoice::Id,
    },

    /// Linked [`Award`]s were deleted along with their [`Invoice`]s.
    AwardsDeleted {
        /// Number of the deleted [`Award`]s.
        awards: u64,

        /// Number of the deleted [`Invoice`]s.
        invoices: u64,
    },

    /// [`Enquiry`] fields were re-mirrored onto the linked [`Award`]s.
    AwardsSynced {
        /// Number of the re-mirrored [`Award`]s.
        awards: u64,
    },

    /// No award lifecycle effect.
    Unchanged,
}

impl<Db> Command<UpdateEnquiry> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Enquiry, enquiry::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Enquiry>, enquiry::Id>>,
            Ok = Option<Enquiry>,
            Err = Traced<database::Error>,
        > + Database<Update<Enquiry>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Award, award::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Award>, enquiry::Id>>,
            Ok = Vec<Award>,
            Err = Traced<database::Error>,
        > + Database<Insert<Award>, Err = Traced<database::Error>>
        + Database<Update<Award>, Err = Traced<database::Error>>
        + Database<Delete<By<Award, award::Id>>, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Vec<Invoice>, award::Id>>,
            Ok = Vec<Invoice>,
            Err = Traced<database::Error>,
        > + Database<Insert<Invoice>, Err = Traced<database::Error>>
        + Database<
            Delete<By<Vec<Invoice>, award::Id>>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    #[expect(clippy::too_many_lines, reason = "single transaction script")]
    async fn execute(
        &self,
        cmd: UpdateEnquiry,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateEnquiry {
            enquiry_id,
            job_number,
            date,
            value,
            location,
            client,
            client_contact,
            email,
            phone,
            status,
            created_by,
        } = cmd;

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

        let mut enquiry = tx
            .execute(Select(By::<Option<Enquiry>, _>::new(enquiry_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::EnquiryNotExists(enquiry_id))
            .map_err(tracerr::wrap!())?;

        let old_status = enquiry.status;

        enquiry.job_number = job_number;
        enquiry.date = date;
        enquiry.value = value;
        enquiry.location = location;
        enquiry.client = client;
        enquiry.client_contact = client_contact;
        enquiry.email = email;
        enquiry.phone = phone;
        enquiry.status = status;
        enquiry.updated_at = now.coerce();

        tx.execute(Update(enquiry.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let outcome = match award::Transition::evaluate(old_status, status) {
            award::Transition::CreateAward => {
                let award = Award::from_enquiry(
                    &enquiry,
                    now.date().coerce(),
                    created_by,
                    now.coerce(),
                );
                tx.execute(Insert(award.clone()))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;

                let invoice = Invoice::zero_valued(
                    award.id,
                    now.date(),
                    created_by,
                    now.coerce(),
                );
                tx.execute(Insert(invoice.clone()))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;

                Outcome::AwardCreated {
                    award_id: award.id,
                    invoice_id: invoice.id,
                }
            }

            award::Transition::DeleteAwards => {
                let awards = tx
                    .execute(Select(By::<Vec<Award>, _>::new(enquiry_id)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?;

                log::info!(
                    "`Enquiry(id: {enquiry_id})` left `Awarded`: \
                     deleting {} linked `Award`(s)",
                    awards.len(),
                );

                let mut invoices = 0;
                for award in &awards {
                    // Avoid concurrent actions upon the deleted `Award`.
                    tx.execute(Lock(By::new(award.id)))
                        .await
                        .map_err(tracerr::map_from_and_wrap!(=> E))
                        .map(drop)?;

                    invoices += tx
                        .execute(Select(By::<Vec<Invoice>, _>::new(award.id)))
                        .await
                        .map_err(tracerr::map_from_and_wrap!(=> E))?
                        .len() as u64;

                    tx.execute(Delete(By::<Vec<Invoice>, _>::new(award.id)))
                        .await
                        .map_err(tracerr::map_from_and_wrap!(=> E))
                        .map(drop)?;
                    tx.execute(Delete(By::<Award, _>::new(award.id)))
                        .await
                        .map_err(tracerr::map_from_and_wrap!(=> E))
                        .map(drop)?;
                }

                Outcome::AwardsDeleted {
                    awards: awards.len() as u64,
                    invoices,
                }
            }

            award::Transition::SyncAwards => {
                let awards = tx
                    .execute(Select(By::<Vec<Award>, _>::new(enquiry_id)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?;

                for mut award in awards.iter().cloned() {
                    award.sync_from_enquiry(&enquiry);
                    award.updated_at = now.coerce();
                    tx.execute(Update(award))
                        .await
                        .map_err(tracerr::map_from_and_wrap!(=> E))
                        .map(drop)?;
                }

                Outcome::AwardsSynced {
                    awards: awards.len() as u64,
                }
            }

            award::Transition::None => Outcome::Unchanged,
        };

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(Output { enquiry, outcome })
    }
}

/// Error of [`UpdateEnquiry`] [`Command`] execution.
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
        domain::{enquiry, invoice, user, Award, Enquiry, Invoice},
        infra::database::memory::Memory,
        Command as _, Config, Service,
    };

    use super::{ExecutionError, Outcome, UpdateEnquiry};

    fn now() -> DateTime {
        DateTime::from_rfc3339("2026-08-29T12:00:00Z").unwrap()
    }

    fn test_enquiry(status: enquiry::Status) -> Enquiry {
        let created = DateTime::from_rfc3339("2026-08-01T09:00:00Z").unwrap();
        Enquiry {
            id: enquiry::Id::new(),
            job_number: enquiry::JobNumber::new("123.2").unwrap(),
            date: created.date().coerce(),
            value: Money::from_str("5000.00").unwrap(),
            location: enquiry::Location::new("Bristol").unwrap(),
            client: enquiry::Client::new("Acme Ltd").unwrap(),
            client_contact: enquiry::ClientContact::new("J. Doe").unwrap(),
            email: enquiry::Email::new("j.doe@acme.test"),
            phone: enquiry::Phone::new("+44 117 000 0000"),
            status,
            created_by: None,
            created_at: created.coerce(),
            updated_at: created.coerce(),
        }
    }

    fn edit_of(enquiry: &Enquiry, status: enquiry::Status) -> UpdateEnquiry {
        UpdateEnquiry {
            enquiry_id: enquiry.id,
            job_number: enquiry.job_number.clone(),
            date: enquiry.date,
            value: enquiry.value,
            location: enquiry.location.clone(),
            client: enquiry.client.clone(),
            client_contact: enquiry.client_contact.clone(),
            email: enquiry.email.clone(),
            phone: enquiry.phone.clone(),
            status,
            created_by: None,
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
    fn awarding_derives_award_with_zero_valued_invoice() {
        let enquiry = test_enquiry(enquiry::Status::Pending);
        let db = Memory::with([enquiry.clone()], [], []);
        let editor = user::Id::new();

        let mut cmd = edit_of(&enquiry, enquiry::Status::Awarded);
        cmd.created_by = Some(editor);
        let output = block_on(service_over(&db).execute(cmd)).unwrap();

        let Outcome::AwardCreated {
            award_id,
            invoice_id,
        } = output.outcome
        else {
            panic!("expected `AwardCreated`, got {:?}", output.outcome);
        };

        let awards = db.awards();
        assert_eq!(awards.len(), 1);
        assert_eq!(awards[0].id, award_id);
        assert_eq!(awards[0].enquiry_id, Some(enquiry.id));
        assert_eq!(awards[0].value, enquiry.value);
        assert_eq!(awards[0].date, now().date().coerce());
        assert_eq!(awards[0].created_by, Some(editor));

        let invoices = db.invoices();
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].id, invoice_id);
        assert_eq!(invoices[0].award_id, award_id);
        assert_eq!(invoices[0].total_value(), Money::ZERO);
        assert_eq!(invoices[0].status, invoice::Status::Pending);
        assert_eq!(invoices[0].created_by, Some(editor));
    }

    #[test]
    fn leaving_awarded_deletes_awards_with_invoices() {
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
        let db = Memory::with([enquiry.clone()], [award], invoices);

        let cmd = edit_of(&enquiry, enquiry::Status::Rejected);
        let output = block_on(service_over(&db).execute(cmd)).unwrap();

        assert_eq!(
            output.outcome,
            Outcome::AwardsDeleted {
                awards: 1,
                invoices: 2,
            },
        );
        assert!(db.awards().is_empty());
        assert!(db.invoices().is_empty());

        let enquiries = db.enquiries();
        assert_eq!(enquiries.len(), 1);
        assert_eq!(enquiries[0].status, enquiry::Status::Rejected);
    }

    #[test]
    fn awarded_edit_syncs_values_keeping_awarding_date() {
        let enquiry = test_enquiry(enquiry::Status::Awarded);
        let awarded =
            DateTime::from_rfc3339("2026-07-15T10:00:00Z").unwrap();
        let award = Award::from_enquiry(
            &enquiry,
            awarded.date().coerce(),
            None,
            awarded.coerce(),
        );
        let db = Memory::with([enquiry.clone()], [award.clone()], []);

        let mut cmd = edit_of(&enquiry, enquiry::Status::Awarded);
        cmd.value = Money::from_str("7500.00").unwrap();
        let output = block_on(service_over(&db).execute(cmd)).unwrap();

        assert_eq!(output.outcome, Outcome::AwardsSynced { awards: 1 });

        let stored = db.awards();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].value, Money::from_str("7500.00").unwrap());
        assert_eq!(stored[0].date, award.date);
        assert!(db.invoices().is_empty());
    }

    #[test]
    fn fails_on_missing_enquiry() {
        let db = Memory::default();
        let enquiry = test_enquiry(enquiry::Status::Pending);

        let cmd = edit_of(&enquiry, enquiry::Status::Pending);
        let err = block_on(service_over(&db).execute(cmd)).unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::EnquiryNotExists(_)
        ));
    }
}
