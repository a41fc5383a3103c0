//! [`Command`] for editing an [`Award`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{award, enquiry, Award, Enquiry},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for editing an [`Award`].
///
/// If the [`Award`] is linked to an [`Enquiry`], the edited fields are
/// mirrored back onto it, keeping both sides of the link in agreement.
/// The awarding date belongs to the [`Award`] alone and is never
/// mirrored.
#[derive(Clone, Debug)]
pub struct UpdateAward {
    /// ID of the [`Award`] to be edited.
    pub award_id: award::Id,

    /// New [`enquiry::JobNumber`] of the [`Award`].
    pub job_number: enquiry::JobNumber,

    /// New [`enquiry::Location`] of the [`Award`].
    pub location: enquiry::Location,

    /// New [`enquiry::Client`] of the [`Award`].
    pub client: enquiry::Client,

    /// New [`enquiry::ClientContact`] of the [`Award`].
    pub client_contact: enquiry::ClientContact,

    /// New [`enquiry::Email`] of the [`Award`].
    pub email: Option<enquiry::Email>,

    /// New [`enquiry::Phone`] of the [`Award`].
    pub phone: Option<enquiry::Phone>,

    /// New awarded [`Money`] value of the [`Award`].
    ///
    /// [`Money`]: common::Money
    pub value: common::Money,

    /// New awarding [`Date`] of the [`Award`].
    ///
    /// [`Date`]: common::Date
    pub date: award::AwardingDate,
}

impl<Db> Command<UpdateAward> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Award, award::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Award>, award::Id>>,
            Ok = Option<Award>,
            Err = Traced<database::Error>,
        > + Database<Update<Award>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Enquiry, enquiry::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Enquiry>, enquiry::Id>>,
            Ok = Option<Enquiry>,
            Err = Traced<database::Error>,
        > + Database<Update<Enquiry>, Err = Traced<database::Error>>,
{
    type Ok = Award;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateAward) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateAward {
            award_id,
            job_number,
            location,
            client,
            client_contact,
            email,
            phone,
            value,
            date,
        } = cmd;

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

        let mut award = tx
            .execute(Select(By::<Option<Award>, _>::new(award_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::AwardNotExists(award_id))
            .map_err(tracerr::wrap!())?;

        award.job_number = job_number;
        award.location = location;
        award.client = client;
        award.client_contact = client_contact;
        award.email = email;
        award.phone = phone;
        award.value = value;
        award.date = date;
        award.updated_at = now.coerce();

        tx.execute(Update(award.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

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
                enquiry.sync_from_award(&award);
                enquiry.updated_at = now.coerce();
                tx.execute(Update(enquiry))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
            }
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(award)
    }
}

/// Error of [`UpdateAward`] [`Command`] execution.
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
