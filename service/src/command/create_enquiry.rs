//! [`Command`] for recording a new [`Enquiry`].

use common::operations::Insert;
use tracerr::Traced;

use crate::{
    domain::{enquiry, user, Enquiry},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for recording a new [`Enquiry`].
///
/// A new [`Enquiry`] always starts as [`enquiry::Status::Pending`]: the
/// award lifecycle is driven by [`UpdateEnquiry`] edits only.
///
/// [`UpdateEnquiry`]: super::UpdateEnquiry
#[derive(Clone, Debug)]
pub struct CreateEnquiry {
    /// [`enquiry::JobNumber`] of a new [`Enquiry`].
    pub job_number: enquiry::JobNumber,

    /// [`Date`] when a new [`Enquiry`] was received.
    ///
    /// [`Date`]: common::Date
    pub date: enquiry::ReceiptDate,

    /// Estimated [`Money`] value of a new [`Enquiry`].
    ///
    /// [`Money`]: common::Money
    pub value: common::Money,

    /// [`enquiry::Location`] of a new [`Enquiry`].
    pub location: enquiry::Location,

    /// [`enquiry::Client`] of a new [`Enquiry`].
    pub client: enquiry::Client,

    /// [`enquiry::ClientContact`] of a new [`Enquiry`].
    pub client_contact: enquiry::ClientContact,

    /// [`enquiry::Email`] of a new [`Enquiry`].
    pub email: Option<enquiry::Email>,

    /// [`enquiry::Phone`] of a new [`Enquiry`].
    pub phone: Option<enquiry::Phone>,

    /// ID of the user recording a new [`Enquiry`].
    pub created_by: Option<user::Id>,
}

impl<Db> Command<CreateEnquiry> for Service<Db>
where
    Db: Database<Insert<Enquiry>, Err = Traced<database::Error>>,
{
    type Ok = Enquiry;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateEnquiry,
    ) -> Result<Self::Ok, Self::Err> {
        let CreateEnquiry {
            job_number,
            date,
            value,
            location,
            client,
            client_contact,
            email,
            phone,
            created_by,
        } = cmd;

        let now = self.clock().now();
        let enquiry = Enquiry {
            id: enquiry::Id::new(),
            job_number,
            date,
            value,
            location,
            client,
            client_contact,
            email,
            phone,
            status: enquiry::Status::Pending,
            created_by,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        };

        self.database()
            .execute(Insert(enquiry.clone()))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        Ok(enquiry)
    }
}

/// Error of [`CreateEnquiry`] [`Command`] execution.
pub type ExecutionError = database::Error;
