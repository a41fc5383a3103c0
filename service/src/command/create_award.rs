//! [`Command`] for recording a manual [`Award`].

use common::operations::Insert;
use tracerr::Traced;

use crate::{
    domain::{award, enquiry, user, Award},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for recording a manual [`Award`].
///
/// The recorded [`Award`] carries no [`Enquiry`] back-reference and no
/// initial [`Invoice`]: both belong to the enquiry-driven lifecycle of
/// [`UpdateEnquiry`] only.
///
/// [`Enquiry`]: crate::domain::Enquiry
/// [`Invoice`]: crate::domain::Invoice
/// [`UpdateEnquiry`]: super::UpdateEnquiry
#[derive(Clone, Debug)]
pub struct CreateAward {
    /// [`enquiry::JobNumber`] of a new [`Award`].
    pub job_number: enquiry::JobNumber,

    /// [`enquiry::Location`] of a new [`Award`].
    pub location: enquiry::Location,

    /// [`enquiry::Client`] of a new [`Award`].
    pub client: enquiry::Client,

    /// [`enquiry::ClientContact`] of a new [`Award`].
    pub client_contact: enquiry::ClientContact,

    /// [`enquiry::Email`] of a new [`Award`].
    pub email: Option<enquiry::Email>,

    /// [`enquiry::Phone`] of a new [`Award`].
    pub phone: Option<enquiry::Phone>,

    /// Awarded [`Money`] value of a new [`Award`].
    ///
    /// [`Money`]: common::Money
    pub value: common::Money,

    /// [`Date`] when the job was awarded.
    ///
    /// [`Date`]: common::Date
    pub date: award::AwardingDate,

    /// ID of the user recording a new [`Award`].
    pub created_by: Option<user::Id>,
}

impl<Db> Command<CreateAward> for Service<Db>
where
    Db: Database<Insert<Award>, Err = Traced<database::Error>>,
{
    type Ok = Award;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateAward) -> Result<Self::Ok, Self::Err> {
        let CreateAward {
            job_number,
            location,
            client,
            client_contact,
            email,
            phone,
            value,
            date,
            created_by,
        } = cmd;

        let now = self.clock().now();
        let award = Award {
            id: award::Id::new(),
            enquiry_id: None,
            job_number,
            location,
            client,
            client_contact,
            email,
            phone,
            value,
            date,
            created_by,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        };

        self.database()
            .execute(Insert(award.clone()))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        Ok(award)
    }
}

/// Error of [`CreateAward`] [`Command`] execution.
pub type ExecutionError = database::Error;

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{Clock, DateTime, Money};
    use futures::executor::block_on;

    use crate::{
        domain::enquiry, infra::database::memory::Memory, Command as _,
        Config, Service,
    };

    use super::CreateAward;

    #[test]
    fn manual_award_gets_no_invoice() {
        let now = DateTime::from_rfc3339("2026-08-29T12:00:00Z").unwrap();
        let db = Memory::default();
        let service = Service::new(
            Config {
                clock: Clock::Fixed(now),
            },
            db.clone(),
        );

        let award = block_on(service.execute(CreateAward {
            job_number: enquiry::JobNumber::new("901").unwrap(),
            location: enquiry::Location::new("Bath").unwrap(),
            client: enquiry::Client::new("Acme Ltd").unwrap(),
            client_contact: enquiry::ClientContact::new("J. Doe").unwrap(),
            email: None,
            phone: None,
            value: Money::from_str("1200.00").unwrap(),
            date: now.date().coerce(),
            created_by: None,
        }))
        .unwrap();

        assert_eq!(award.enquiry_id, None);

        let stored = db.awards();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, award.id);
        assert!(db.invoices().is_empty());
    }
}
