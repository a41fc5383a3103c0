//! [`Award`]-related definitions.

use std::future;

use common::{Date, DateTime, Handler as _, Money};
use derive_more::{Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, AsError, Context, Error};

/// A monthly award of a won job.
#[derive(Clone, Debug, From)]
pub struct Award {
    /// ID of this [`Award`].
    id: Id,

    /// Underlying [`domain::Award`].
    award: OnceCell<domain::Award>,
}

impl From<domain::Award> for Award {
    fn from(award: domain::Award) -> Self {
        Self {
            id: award.id.into(),
            award: OnceCell::new_with(Some(award)),
        }
    }
}

impl Award {
    /// Creates a new [`Award`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Award`] with the provided ID exists,
    /// otherwise accessing this [`Award`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            award: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Award`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Award`] doesn't exist.
    async fn award(&self, ctx: &Context) -> Result<&domain::Award, Error> {
        let id = self.id.into();
        self.award
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::award::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|a| {
                        future::ready(a.ok_or_else(|| {
                            api::query::AwardError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A monthly award of a won job.
#[graphql_object(context = Context)]
impl Award {
    /// Unique identifier of this `Award`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Award.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// `Enquiry` this `Award` was derived from, if any.
    ///
    /// Manually created `Award`s carry no `Enquiry` link.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Award.enquiry",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn enquiry(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Enquiry>, Error> {
        Ok(self.award(ctx).await?.enquiry_id.map(|id| {
            #[expect(
                unsafe_code,
                reason = "`Award` link guarantees `Enquiry` existence"
            )]
            unsafe {
                api::Enquiry::new_unchecked(id)
            }
        }))
    }

    /// Job number of this `Award`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Award.jobNumber",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn job_number(
        &self,
        ctx: &Context,
    ) -> Result<api::enquiry::JobNumber, Error> {
        Ok(self.award(ctx).await?.job_number.clone().into())
    }

    /// Site location of this `Award`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Award.location",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn location(
        &self,
        ctx: &Context,
    ) -> Result<api::enquiry::Location, Error> {
        Ok(self.award(ctx).await?.location.clone().into())
    }

    /// Client of this `Award`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Award.client",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn client(
        &self,
        ctx: &Context,
    ) -> Result<api::enquiry::Client, Error> {
        Ok(self.award(ctx).await?.client.clone().into())
    }

    /// Contact person of the client of this `Award`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Award.clientContact",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn client_contact(
        &self,
        ctx: &Context,
    ) -> Result<api::enquiry::ClientContact, Error> {
        Ok(self.award(ctx).await?.client_contact.clone().into())
    }

    /// Contact email of this `Award`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Award.email",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn email(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::enquiry::Email>, Error> {
        Ok(self.award(ctx).await?.email.clone().map(Into::into))
    }

    /// Contact phone of this `Award`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Award.phone",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn phone(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::enquiry::Phone>, Error> {
        Ok(self.award(ctx).await?.phone.clone().map(Into::into))
    }

    /// Awarded `Money` value of this `Award`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Award.value",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn value(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.award(ctx).await?.value)
    }

    /// `Date` this `Award` was given on.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Award.date",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn date(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.award(ctx).await?.date.coerce())
    }

    /// ID of the `User` who created this `Award`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Award.createdBy",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_by(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::user::Id>, Error> {
        Ok(self.award(ctx).await?.created_by.map(Into::into))
    }

    /// `DateTime` when this `Award` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Award.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.award(ctx).await?.created_at.coerce())
    }

    /// `DateTime` when this `Award` was updated last time.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Award.updatedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn updated_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.award(ctx).await?.updated_at.coerce())
    }
}

/// Unique identifier of an `Award`.
#[derive(Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[from(domain::award::Id)]
#[into(domain::award::Id)]
#[graphql(name = "AwardId", transparent)]
pub struct Id(Uuid);

pub mod monthly {
    //! Definitions related to the monthly [`Award`] listing.

    use common::Money;
    use derive_more::{From, Into};
    use juniper::graphql_object;
    use service::read;

    use super::Award;
    use crate::Context;

    /// `Award` of a month along with its invoicing progress.
    #[derive(Clone, Debug, From, Into)]
    pub struct Summary(read::AwardSummary);

    /// `Award` of a month along with its invoicing progress.
    #[graphql_object(name = "AwardMonthlySummary", context = Context)]
    impl Summary {
        /// `Award` this `AwardMonthlySummary` describes.
        #[must_use]
        pub fn award(&self) -> Award {
            self.0.award.clone().into()
        }

        /// Number of `Invoice`s raised against the `Award`.
        #[must_use]
        pub fn invoice_count(&self) -> i32 {
            i32::try_from(self.0.invoice_count).unwrap_or(i32::MAX)
        }

        /// Total `Money` value invoiced against the `Award` so far.
        #[must_use]
        pub fn total_invoiced(&self) -> Money {
            self.0.total_invoiced
        }

        /// Indicator whether the `Award` has no `Invoice`s at all.
        #[must_use]
        pub fn missing_invoice(&self) -> bool {
            self.0.is_missing_invoice()
        }

        /// Indicator whether the invoiced total diverges from the `Award`
        /// value.
        #[must_use]
        pub fn value_mismatch(&self) -> bool {
            self.0.has_mismatch()
        }
    }

    /// Listing of `Award`s given in a single month.
    #[derive(Clone, Debug, From, Into)]
    pub struct Listing(read::award::monthly::Listing);

    /// Listing of `Award`s given in a single month.
    #[graphql_object(name = "AwardMonthlyListing", context = Context)]
    impl Listing {
        /// Per-`Award` summaries of the month.
        #[must_use]
        pub fn summaries(&self) -> Vec<Summary> {
            self.0.summaries.iter().cloned().map(Into::into).collect()
        }

        /// Total `Money` value awarded in the month.
        #[must_use]
        pub fn total_awarded(&self) -> Money {
            self.0.total_awarded
        }
    }
}
