//! [`Invoice`]-related definitions.

use std::future;

use common::{Date, DateTime, Handler as _, Money};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// An invoice raised against an `Award`.
#[derive(Clone, Debug, From)]
pub struct Invoice {
    /// ID of this [`Invoice`].
    id: Id,

    /// Underlying [`domain::Invoice`].
    invoice: OnceCell<domain::Invoice>,
}

impl From<domain::Invoice> for Invoice {
    fn from(invoice: domain::Invoice) -> Self {
        Self {
            id: invoice.id.into(),
            invoice: OnceCell::new_with(Some(invoice)),
        }
    }
}

impl Invoice {
    /// Creates a new [`Invoice`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Invoice`] with the provided ID exists,
    /// otherwise accessing this [`Invoice`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            invoice: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Invoice`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Invoice`] doesn't exist.
    async fn invoice(&self, ctx: &Context) -> Result<&domain::Invoice, Error> {
        let id = self.id.into();
        self.invoice
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::invoice::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|i| {
                        future::ready(i.ok_or_else(|| {
                            api::query::InvoiceError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// An invoice raised against an `Award`.
#[graphql_object(context = Context)]
impl Invoice {
    /// Unique identifier of this `Invoice`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// `Award` this `Invoice` is raised against.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.award",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn award(&self, ctx: &Context) -> Result<api::Award, Error> {
        let id = self.invoice(ctx).await?.award_id;
        #[expect(
            unsafe_code,
            reason = "`Invoice` link guarantees `Award` existence"
        )]
        let award = unsafe { api::Award::new_unchecked(id) };
        Ok(award)
    }

    /// Description of this `Invoice`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.description",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn description(
        &self,
        ctx: &Context,
    ) -> Result<Option<Description>, Error> {
        Ok(self.invoice(ctx).await?.description.clone().map(Into::into))
    }

    /// `Date` this `Invoice` is dated with.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.date",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn date(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.invoice(ctx).await?.date.coerce())
    }

    /// `Money` value of the utility works on this `Invoice`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.utilityValue",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn utility_value(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.invoice(ctx).await?.utility_value)
    }

    /// `Money` value of the CAD works on this `Invoice`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.cadValue",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn cad_value(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.invoice(ctx).await?.cad_value)
    }

    /// `Money` value of the topographical works on this `Invoice`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.topoValue",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn topo_value(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.invoice(ctx).await?.topo_value)
    }

    /// `Money` value of the contractor works on this `Invoice`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.contractorValue",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn contractor_value(
        &self,
        ctx: &Context,
    ) -> Result<Money, Error> {
        Ok(self.invoice(ctx).await?.contractor_value)
    }

    /// Derived PSL `Money` value of this `Invoice`.
    ///
    /// Sums the utility, CAD and topographical values, leaving the
    /// contractor one out.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.pslValue",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn psl_value(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.invoice(ctx).await?.psl_value)
    }

    /// Total `Money` value of this `Invoice`, including the contractor
    /// works.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.totalValue",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn total_value(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.invoice(ctx).await?.total_value())
    }

    /// Status of this `Invoice`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.invoice(ctx).await?.status.into())
    }

    /// ID of the `User` who created this `Invoice`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.createdBy",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_by(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::user::Id>, Error> {
        Ok(self.invoice(ctx).await?.created_by.map(Into::into))
    }

    /// `DateTime` when this `Invoice` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.invoice(ctx).await?.created_at.coerce())
    }

    /// `DateTime` when this `Invoice` was updated last time.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.updatedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn updated_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.invoice(ctx).await?.updated_at.coerce())
    }
}

/// Unique identifier of an `Invoice`.
#[derive(Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[from(domain::invoice::Id)]
#[into(domain::invoice::Id)]
#[graphql(name = "InvoiceId", transparent)]
pub struct Id(Uuid);

/// Description of an `Invoice`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "InvoiceDescription",
    with = scalar::Via::<domain::invoice::Description>,
)]
pub struct Description(domain::invoice::Description);

/// Status of an `Invoice`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "InvoiceStatus")]
pub enum Status {
    /// Raised but not yet sent out.
    Pending,

    /// Sent out to the client.
    Invoiced,
}

impl From<domain::invoice::Status> for Status {
    fn from(status: domain::invoice::Status) -> Self {
        use domain::invoice::Status as S;
        match status {
            S::Pending => Self::Pending,
            S::Invoiced => Self::Invoiced,
        }
    }
}

impl From<Status> for domain::invoice::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Pending => Self::Pending,
            Status::Invoiced => Self::Invoiced,
        }
    }
}

pub mod monthly {
    //! Definitions related to the monthly [`Invoice`] listing.

    use common::Money;
    use derive_more::{From, Into};
    use juniper::graphql_object;
    use service::{domain, read};

    use super::Invoice;
    use crate::{api, Context};

    /// `Invoice` of a month along with the `Award` it is raised against.
    #[derive(Clone, Debug, From, Into)]
    pub struct Entry(read::invoice::Entry);

    /// `Invoice` of a month along with the `Award` it is raised against.
    #[graphql_object(name = "InvoiceMonthlyEntry", context = Context)]
    impl Entry {
        /// `Invoice` of this `InvoiceMonthlyEntry`.
        #[must_use]
        pub fn invoice(&self) -> Invoice {
            self.0.invoice.clone().into()
        }

        /// Invoicing summary of the `Award` the `Invoice` is raised
        /// against.
        #[must_use]
        pub fn award(&self) -> api::award::monthly::Summary {
            self.0.award.clone().into()
        }
    }

    /// Listing of `Invoice`s dated within a single month.
    #[derive(Clone, Debug, From, Into)]
    pub struct Listing(read::invoice::monthly::Listing);

    impl Listing {
        /// Counts the `Invoice`s of this [`Listing`] having the provided
        /// [`domain::invoice::Status`].
        fn count_with(&self, status: domain::invoice::Status) -> i32 {
            i32::try_from(
                self.0
                    .entries
                    .iter()
                    .filter(|e| e.invoice.status == status)
                    .count(),
            )
            .unwrap_or(i32::MAX)
        }
    }

    /// Listing of `Invoice`s dated within a single month.
    #[graphql_object(name = "InvoiceMonthlyListing", context = Context)]
    impl Listing {
        /// Entries of the month, one per `Invoice`.
        #[must_use]
        pub fn entries(&self) -> Vec<Entry> {
            self.0.entries.iter().cloned().map(Into::into).collect()
        }

        /// Total `Money` value of the already sent out `Invoice`s.
        #[must_use]
        pub fn invoiced_total(&self) -> Money {
            self.0.invoiced_total
        }

        /// Total `Money` value of the still pending `Invoice`s.
        #[must_use]
        pub fn pending_total(&self) -> Money {
            self.0.pending_total
        }

        /// Number of the already sent out `Invoice`s in the month.
        #[must_use]
        pub fn invoiced_count(&self) -> i32 {
            self.count_with(domain::invoice::Status::Invoiced)
        }

        /// Number of the still pending `Invoice`s in the month.
        #[must_use]
        pub fn pending_count(&self) -> i32 {
            self.count_with(domain::invoice::Status::Pending)
        }
    }
}
