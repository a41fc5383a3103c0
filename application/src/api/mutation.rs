//! GraphQL [`Mutation`]s definitions.

use common::{Date, Money};
use derive_more::From;
use juniper::{graphql_object, GraphQLEnum};
use service::{command, Command as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `Enquiry` with the provided details.
    ///
    /// The created `Enquiry` always starts out `PENDING`.
    #[tracing::instrument(
        skip_all,
        fields(
            client = %client,
            created_by = ?created_by.as_ref().map(ToString::to_string),
            date = %date.to_iso8601(),
            gql.name = "createEnquiry",
            job_number = %job_number,
            location = %location,
            otel.name = Self::SPAN_NAME,
            value = %value,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn create_enquiry(
        job_number: api::enquiry::JobNumber,
        date: Date,
        value: Money,
        location: api::enquiry::Location,
        client: api::enquiry::Client,
        client_contact: api::enquiry::ClientContact,
        email: Option<api::enquiry::Email>,
        phone: Option<api::enquiry::Phone>,
        created_by: Option<api::user::Id>,
        ctx: &Context,
    ) -> Result<api::Enquiry, Error> {
        ctx.service()
            .execute(command::CreateEnquiry {
                job_number: job_number.into(),
                date: date.coerce(),
                value,
                location: location.into(),
                client: client.into(),
                client_contact: client_contact.into(),
                email: email.map(Into::into),
                phone: phone.map(Into::into),
                created_by: created_by.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the `Enquiry` with the specified ID.
    ///
    /// Changing the status drives the `Award` lifecycle: transitioning into
    /// `AWARDED` derives an `Award` (along with its initial zero-valued
    /// `Invoice`), transitioning out of it deletes the linked `Award`s and
    /// their `Invoice`s, while a save staying `AWARDED` re-mirrors the
    /// enquiry fields onto the linked `Award`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `ENQUIRY_NOT_EXISTS` - the `Enquiry` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            client = %client,
            date = %date.to_iso8601(),
            gql.name = "updateEnquiry",
            id = %id,
            job_number = %job_number,
            location = %location,
            otel.name = Self::SPAN_NAME,
            status = ?status,
            value = %value,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn update_enquiry(
        id: api::enquiry::Id,
        job_number: api::enquiry::JobNumber,
        date: Date,
        value: Money,
        location: api::enquiry::Location,
        client: api::enquiry::Client,
        client_contact: api::enquiry::ClientContact,
        email: Option<api::enquiry::Email>,
        phone: Option<api::enquiry::Phone>,
        status: api::enquiry::Status,
        created_by: Option<api::user::Id>,
        ctx: &Context,
    ) -> Result<UpdateEnquiryPayload, Error> {
        ctx.service()
            .execute(command::UpdateEnquiry {
                enquiry_id: id.into(),
                job_number: job_number.into(),
                date: date.coerce(),
                value,
                location: location.into(),
                client: client.into(),
                client_contact: client_contact.into(),
                email: email.map(Into::into),
                phone: phone.map(Into::into),
                status: status.into(),
                created_by: created_by.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `Enquiry` with the specified ID.
    ///
    /// `Award`s derived from the `Enquiry` survive with their link cleared.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `ENQUIRY_NOT_EXISTS` - the `Enquiry` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteEnquiry",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_enquiry(
        id: api::enquiry::Id,
        ctx: &Context,
    ) -> Result<DeleteEnquiryPayload, Error> {
        ctx.service()
            .execute(command::DeleteEnquiry {
                enquiry_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `Award` with the provided details.
    ///
    /// The created `Award` carries no `Enquiry` link and no initial
    /// `Invoice`.
    #[tracing::instrument(
        skip_all,
        fields(
            client = %client,
            created_by = ?created_by.as_ref().map(ToString::to_string),
            date = %date.to_iso8601(),
            gql.name = "createAward",
            job_number = %job_number,
            location = %location,
            otel.name = Self::SPAN_NAME,
            value = %value,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn create_award(
        job_number: api::enquiry::JobNumber,
        location: api::enquiry::Location,
        client: api::enquiry::Client,
        client_contact: api::enquiry::ClientContact,
        email: Option<api::enquiry::Email>,
        phone: Option<api::enquiry::Phone>,
        value: Money,
        date: Date,
        created_by: Option<api::user::Id>,
        ctx: &Context,
    ) -> Result<api::Award, Error> {
        ctx.service()
            .execute(command::CreateAward {
                job_number: job_number.into(),
                location: location.into(),
                client: client.into(),
                client_contact: client_contact.into(),
                email: email.map(Into::into),
                phone: phone.map(Into::into),
                value,
                date: date.coerce(),
                created_by: created_by.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the `Award` with the specified ID.
    ///
    /// If the `Award` is linked to an `Enquiry`, the shared fields are
    /// mirrored back onto it.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AWARD_NOT_EXISTS` - the `Award` with the specified ID does not
    ///                        exist.
    #[tracing::instrument(
        skip_all,
        fields(
            client = %client,
            date = %date.to_iso8601(),
            gql.name = "updateAward",
            id = %id,
            job_number = %job_number,
            location = %location,
            otel.name = Self::SPAN_NAME,
            value = %value,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn update_award(
        id: api::award::Id,
        job_number: api::enquiry::JobNumber,
        location: api::enquiry::Location,
        client: api::enquiry::Client,
        client_contact: api::enquiry::ClientContact,
        email: Option<api::enquiry::Email>,
        phone: Option<api::enquiry::Phone>,
        value: Money,
        date: Date,
        ctx: &Context,
    ) -> Result<api::Award, Error> {
        ctx.service()
            .execute(command::UpdateAward {
                award_id: id.into(),
                job_number: job_number.into(),
                location: location.into(),
                client: client.into(),
                client_contact: client_contact.into(),
                email: email.map(Into::into),
                phone: phone.map(Into::into),
                value,
                date: date.coerce(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `Award` with the specified ID, along with all the
    /// `Invoice`s raised against it.
    ///
    /// If the `Award` is linked to an `AWARDED` `Enquiry`, the `Enquiry`
    /// reverts to `PENDING`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AWARD_NOT_EXISTS` - the `Award` with the specified ID does not
    ///                        exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteAward",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_award(
        id: api::award::Id,
        ctx: &Context,
    ) -> Result<DeleteAwardPayload, Error> {
        ctx.service()
            .execute(command::DeleteAward {
                award_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `Invoice` against the `Award` with the specified ID.
    ///
    /// The PSL value is derived on save, and a `PENDING` `Invoice` dated in
    /// the past rolls forward to the first day of the current month.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AWARD_NOT_EXISTS` - the `Award` with the specified ID does not
    ///                        exist.
    #[tracing::instrument(
        skip_all,
        fields(
            award_id = %award_id,
            cad_value = %cad_value,
            contractor_value = %contractor_value,
            created_by = ?created_by.as_ref().map(ToString::to_string),
            date = %date.to_iso8601(),
            gql.name = "createInvoice",
            otel.name = Self::SPAN_NAME,
            status = ?status,
            topo_value = %topo_value,
            utility_value = %utility_value,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn create_invoice(
        award_id: api::award::Id,
        description: Option<api::invoice::Description>,
        date: Date,
        utility_value: Money,
        cad_value: Money,
        topo_value: Money,
        contractor_value: Money,
        status: api::invoice::Status,
        created_by: Option<api::user::Id>,
        ctx: &Context,
    ) -> Result<api::Invoice, Error> {
        ctx.service()
            .execute(command::CreateInvoice {
                award_id: award_id.into(),
                description: description.map(Into::into),
                date: date.coerce(),
                utility_value,
                cad_value,
                topo_value,
                contractor_value,
                status: status.into(),
                created_by: created_by.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the `Invoice` with the specified ID.
    ///
    /// The PSL value is re-derived on every save, and a `PENDING` `Invoice`
    /// dated in the past rolls forward to the first day of the current
    /// month.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVOICE_NOT_EXISTS` - the `Invoice` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            cad_value = %cad_value,
            contractor_value = %contractor_value,
            date = %date.to_iso8601(),
            gql.name = "updateInvoice",
            id = %id,
            otel.name = Self::SPAN_NAME,
            status = ?status,
            topo_value = %topo_value,
            utility_value = %utility_value,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn update_invoice(
        id: api::invoice::Id,
        description: Option<api::invoice::Description>,
        date: Date,
        utility_value: Money,
        cad_value: Money,
        topo_value: Money,
        contractor_value: Money,
        status: api::invoice::Status,
        ctx: &Context,
    ) -> Result<api::Invoice, Error> {
        ctx.service()
            .execute(command::UpdateInvoice {
                invoice_id: id.into(),
                description: description.map(Into::into),
                date: date.coerce(),
                utility_value,
                cad_value,
                topo_value,
                contractor_value,
                status: status.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `Invoice` with the specified ID.
    ///
    /// The `Award` it was raised against is left in place, even when this
    /// was its last `Invoice`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVOICE_NOT_EXISTS` - the `Invoice` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteInvoice",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_invoice(
        id: api::invoice::Id,
        ctx: &Context,
    ) -> Result<DeleteInvoicePayload, Error> {
        ctx.service()
            .execute(command::DeleteInvoice {
                invoice_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

/// Result of the `updateEnquiry` mutation.
#[derive(Debug, From)]
pub struct UpdateEnquiryPayload(command::update_enquiry::Output);

/// Result of the `updateEnquiry` mutation.
#[graphql_object(context = Context)]
impl UpdateEnquiryPayload {
    /// Updated `Enquiry`.
    #[must_use]
    pub fn enquiry(&self) -> api::Enquiry {
        self.0.enquiry.clone().into()
    }

    /// `Award` lifecycle effect of the update.
    #[must_use]
    pub fn outcome(&self) -> UpdateEnquiryOutcome {
        use command::update_enquiry::Outcome as O;
        match self.0.outcome {
            O::AwardCreated { .. } => UpdateEnquiryOutcome::AwardCreated,
            O::AwardsDeleted { .. } => UpdateEnquiryOutcome::AwardsDeleted,
            O::AwardsSynced { .. } => UpdateEnquiryOutcome::AwardsSynced,
            O::Unchanged => UpdateEnquiryOutcome::Unchanged,
        }
    }

    /// `Award` derived by the update, if the `Enquiry` transitioned into
    /// `AWARDED`.
    #[must_use]
    pub fn created_award(&self) -> Option<api::Award> {
        use command::update_enquiry::Outcome as O;
        match self.0.outcome {
            O::AwardCreated { award_id, .. } => {
                #[expect(
                    unsafe_code,
                    reason = "just created in the same transaction"
                )]
                let award = unsafe { api::Award::new_unchecked(award_id) };
                Some(award)
            }
            O::AwardsDeleted { .. } | O::AwardsSynced { .. } | O::Unchanged => {
                None
            }
        }
    }

    /// Initial zero-valued `Invoice` raised against the derived `Award`, if
    /// the `Enquiry` transitioned into `AWARDED`.
    #[must_use]
    pub fn created_invoice(&self) -> Option<api::Invoice> {
        use command::update_enquiry::Outcome as O;
        match self.0.outcome {
            O::AwardCreated { invoice_id, .. } => {
                #[expect(
                    unsafe_code,
                    reason = "just created in the same transaction"
                )]
                let invoice =
                    unsafe { api::Invoice::new_unchecked(invoice_id) };
                Some(invoice)
            }
            O::AwardsDeleted { .. } | O::AwardsSynced { .. } | O::Unchanged => {
                None
            }
        }
    }

    /// Number of `Award`s affected by the update: deleted on an `AWARDED`
    /// exit, or re-mirrored on an `AWARDED` stay.
    #[must_use]
    pub fn affected_awards(&self) -> i32 {
        use command::update_enquiry::Outcome as O;
        let n = match self.0.outcome {
            O::AwardCreated { .. } | O::Unchanged => 0,
            O::AwardsDeleted { awards, .. } => awards,
            O::AwardsSynced { awards } => awards,
        };
        i32::try_from(n).unwrap_or(i32::MAX)
    }

    /// Number of `Invoice`s deleted along with the `Award`s on an `AWARDED`
    /// exit.
    #[must_use]
    pub fn deleted_invoices(&self) -> i32 {
        use command::update_enquiry::Outcome as O;
        let n = match self.0.outcome {
            O::AwardCreated { .. }
            | O::AwardsSynced { .. }
            | O::Unchanged => 0,
            O::AwardsDeleted { invoices, .. } => invoices,
        };
        i32::try_from(n).unwrap_or(i32::MAX)
    }
}

/// `Award` lifecycle effect of an `updateEnquiry` mutation.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
pub enum UpdateEnquiryOutcome {
    /// New `Award` was derived, along with its initial zero-valued
    /// `Invoice`.
    AwardCreated,

    /// Linked `Award`s were deleted along with their `Invoice`s.
    AwardsDeleted,

    /// `Enquiry` fields were re-mirrored onto the linked `Award`s.
    AwardsSynced,

    /// No `Award` lifecycle effect.
    Unchanged,
}

/// Result of the `deleteEnquiry` mutation.
#[derive(Debug, From)]
pub struct DeleteEnquiryPayload(command::delete_enquiry::Output);

/// Result of the `deleteEnquiry` mutation.
#[graphql_object(context = Context)]
impl DeleteEnquiryPayload {
    /// Deleted `Enquiry`.
    #[must_use]
    pub fn enquiry(&self) -> api::Enquiry {
        self.0.enquiry.clone().into()
    }

    /// Number of `Award`s that survived the deletion with their `Enquiry`
    /// link cleared.
    #[must_use]
    pub fn unlinked_awards(&self) -> i32 {
        i32::try_from(self.0.awards_unlinked).unwrap_or(i32::MAX)
    }
}

/// Result of the `deleteAward` mutation.
#[derive(Debug, From)]
pub struct DeleteAwardPayload(command::delete_award::Output);

/// Result of the `deleteAward` mutation.
#[graphql_object(context = Context)]
impl DeleteAwardPayload {
    /// Deleted `Award`.
    #[must_use]
    pub fn award(&self) -> api::Award {
        self.0.award.clone().into()
    }

    /// Number of `Invoice`s deleted along with the `Award`.
    #[must_use]
    pub fn deleted_invoices(&self) -> i32 {
        i32::try_from(self.0.invoices_deleted).unwrap_or(i32::MAX)
    }

    /// Indicator whether the linked `Enquiry` reverted to `PENDING`.
    #[must_use]
    pub fn enquiry_reverted(&self) -> bool {
        self.0.enquiry_reverted
    }
}

/// Result of the `deleteInvoice` mutation.
#[derive(Debug, From)]
pub struct DeleteInvoicePayload(command::delete_invoice::Output);

/// Result of the `deleteInvoice` mutation.
#[graphql_object(context = Context)]
impl DeleteInvoicePayload {
    /// Deleted `Invoice`.
    #[must_use]
    pub fn invoice(&self) -> api::Invoice {
        self.0.invoice.clone().into()
    }

    /// Indicator whether the `Award` is left with no `Invoice`s at all.
    #[must_use]
    pub fn award_left_empty(&self) -> bool {
        self.0.award_left_empty
    }
}

impl AsError for command::update_enquiry::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EnquiryNotExists(_) => {
                Some(api::query::EnquiryError::NotExists.into())
            }
        }
    }
}

impl AsError for command::delete_enquiry::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EnquiryNotExists(_) => {
                Some(api::query::EnquiryError::NotExists.into())
            }
        }
    }
}

impl AsError for command::update_award::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::AwardNotExists(_) => {
                Some(api::query::AwardError::NotExists.into())
            }
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::delete_award::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::AwardNotExists(_) => {
                Some(api::query::AwardError::NotExists.into())
            }
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::create_invoice::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "AWARD_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Award` with the provided ID does not exist"]
                AwardNotExists,
            }
        }

        match self {
            Self::AwardNotExists(_) => Some(Error::AwardNotExists.into()),
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::update_invoice::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InvoiceNotExists(_) => {
                Some(api::query::InvoiceError::NotExists.into())
            }
        }
    }
}

impl AsError for command::delete_invoice::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InvoiceNotExists(_) => {
                Some(api::query::InvoiceError::NotExists.into())
            }
        }
    }
}
