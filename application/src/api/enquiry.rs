//! [`Enquiry`]-related definitions.

use std::future;

use common::{Date, DateTime, Handler as _, Money};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query, read};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A sales enquiry.
#[derive(Clone, Debug, From)]
pub struct Enquiry {
    /// ID of this [`Enquiry`].
    id: Id,

    /// Underlying [`domain::Enquiry`].
    enquiry: OnceCell<domain::Enquiry>,
}

impl From<domain::Enquiry> for Enquiry {
    fn from(enquiry: domain::Enquiry) -> Self {
        Self {
            id: enquiry.id.into(),
            enquiry: OnceCell::new_with(Some(enquiry)),
        }
    }
}

impl Enquiry {
    /// Creates a new [`Enquiry`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Enquiry`] with the provided ID exists,
    /// otherwise accessing this [`Enquiry`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            enquiry: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Enquiry`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Enquiry`] doesn't exist.
    async fn enquiry(&self, ctx: &Context) -> Result<&domain::Enquiry, Error> {
        let id = self.id.into();
        self.enquiry
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::enquiry::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|e| {
                        future::ready(e.ok_or_else(|| {
                            api::query::EnquiryError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A sales enquiry.
#[graphql_object(context = Context)]
impl Enquiry {
    /// Unique identifier of this `Enquiry`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Enquiry.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Job number of this `Enquiry`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Enquiry.jobNumber",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn job_number(&self, ctx: &Context) -> Result<JobNumber, Error> {
        Ok(self.enquiry(ctx).await?.job_number.clone().into())
    }

    /// `Date` this `Enquiry` was received on.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Enquiry.date",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn date(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.enquiry(ctx).await?.date.coerce())
    }

    /// Quoted `Money` value of this `Enquiry`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Enquiry.value",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn value(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.enquiry(ctx).await?.value)
    }

    /// Site location of this `Enquiry`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Enquiry.location",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn location(&self, ctx: &Context) -> Result<Location, Error> {
        Ok(self.enquiry(ctx).await?.location.clone().into())
    }

    /// Client of this `Enquiry`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Enquiry.client",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn client(&self, ctx: &Context) -> Result<Client, Error> {
        Ok(self.enquiry(ctx).await?.client.clone().into())
    }

    /// Contact person of the client of this `Enquiry`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Enquiry.clientContact",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn client_contact(
        &self,
        ctx: &Context,
    ) -> Result<ClientContact, Error> {
        Ok(self.enquiry(ctx).await?.client_contact.clone().into())
    }

    /// Contact email of this `Enquiry`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Enquiry.email",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn email(&self, ctx: &Context) -> Result<Option<Email>, Error> {
        Ok(self.enquiry(ctx).await?.email.clone().map(Into::into))
    }

    /// Contact phone of this `Enquiry`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Enquiry.phone",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn phone(&self, ctx: &Context) -> Result<Option<Phone>, Error> {
        Ok(self.enquiry(ctx).await?.phone.clone().map(Into::into))
    }

    /// Status of this `Enquiry`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Enquiry.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.enquiry(ctx).await?.status.into())
    }

    /// ID of the `User` who created this `Enquiry`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Enquiry.createdBy",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_by(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::user::Id>, Error> {
        Ok(self.enquiry(ctx).await?.created_by.map(Into::into))
    }

    /// `DateTime` when this `Enquiry` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Enquiry.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.enquiry(ctx).await?.created_at.coerce())
    }

    /// `DateTime` when this `Enquiry` was updated last time.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Enquiry.updatedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn updated_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.enquiry(ctx).await?.updated_at.coerce())
    }
}

/// Unique identifier of an `Enquiry`.
#[derive(Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[from(domain::enquiry::Id)]
#[into(domain::enquiry::Id)]
#[graphql(name = "EnquiryId", transparent)]
pub struct Id(Uuid);

/// Job number of an `Enquiry`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "EnquiryJobNumber",
    with = scalar::Via::<domain::enquiry::JobNumber>,
)]
pub struct JobNumber(domain::enquiry::JobNumber);

/// Site location of an `Enquiry`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "EnquiryLocation",
    with = scalar::Via::<domain::enquiry::Location>,
)]
pub struct Location(domain::enquiry::Location);

/// Client of an `Enquiry`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "EnquiryClient",
    with = scalar::Via::<domain::enquiry::Client>,
)]
pub struct Client(domain::enquiry::Client);

/// Contact person of an `Enquiry` client.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "EnquiryClientContact",
    with = scalar::Via::<domain::enquiry::ClientContact>,
)]
pub struct ClientContact(domain::enquiry::ClientContact);

/// Contact email of an `Enquiry`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "EnquiryEmail",
    with = scalar::Via::<domain::enquiry::Email>,
)]
pub struct Email(domain::enquiry::Email);

/// Contact phone of an `Enquiry`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "EnquiryPhone",
    with = scalar::Via::<domain::enquiry::Phone>,
)]
pub struct Phone(domain::enquiry::Phone);

/// Status of an `Enquiry`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "EnquiryStatus")]
pub enum Status {
    /// Awaiting the client's decision.
    Pending,

    /// Turned down by the client.
    Rejected,

    /// Won and backed by an `Award`.
    Awarded,
}

impl From<domain::enquiry::Status> for Status {
    fn from(status: domain::enquiry::Status) -> Self {
        use domain::enquiry::Status as S;
        match status {
            S::Pending => Self::Pending,
            S::Rejected => Self::Rejected,
            S::Awarded => Self::Awarded,
        }
    }
}

impl From<Status> for domain::enquiry::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Pending => Self::Pending,
            Status::Rejected => Self::Rejected,
            Status::Awarded => Self::Awarded,
        }
    }
}

/// Ordering of an `Enquiry` list.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "EnquirySort")]
pub enum Sort {
    /// Newest receipt date first.
    Date,

    /// Numeric job numbers first (highest first), then free-form ones.
    JobNumber,
}

impl From<Sort> for read::enquiry::list::Ordering {
    fn from(sort: Sort) -> Self {
        match sort {
            Sort::Date => Self::Date,
            Sort::JobNumber => Self::JobNumber,
        }
    }
}
