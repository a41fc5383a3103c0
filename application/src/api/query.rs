//! GraphQL [`Query`]s definitions.

use juniper::graphql_object;
use service::{query, read, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the `Enquiry` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `ENQUIRY_NOT_EXISTS` - the `Enquiry` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "enquiry",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn enquiry(
        id: api::enquiry::Id,
        ctx: &Context,
    ) -> Result<api::Enquiry, Error> {
        ctx.service()
            .execute(query::enquiry::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| EnquiryError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches `Enquiry`s matching the provided filters.
    ///
    /// Both filters fuzzy match a part of the field, and combine as a
    /// conjunction. The result is ordered by receipt date (newest first)
    /// unless `sortBy` requests the job-number ordering.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "enquiries",
            job_number = ?job_number.as_ref().map(ToString::to_string),
            location = ?location.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
            sort_by = ?sort_by,
        ),
    )]
    pub async fn enquiries(
        job_number: Option<api::enquiry::JobNumber>,
        location: Option<api::enquiry::Location>,
        sort_by: Option<api::enquiry::Sort>,
        ctx: &Context,
    ) -> Result<Vec<api::Enquiry>, Error> {
        ctx.service()
            .execute(query::enquiries::List {
                filter: read::enquiry::list::Filter {
                    job_number: job_number.map(Into::into),
                    location: location.map(Into::into),
                },
                ordering: sort_by.map_or_else(Default::default, Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|enquiries| enquiries.into_iter().map(Into::into).collect())
    }

    /// Returns the `Award` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AWARD_NOT_EXISTS` - the `Award` with the specified ID does not
    ///                        exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "award",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn award(
        id: api::award::Id,
        ctx: &Context,
    ) -> Result<api::Award, Error> {
        ctx.service()
            .execute(query::award::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| AwardError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the listing of `Award`s given in the specified month.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_MONTH` - the specified month is not in the `1..=12` range.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "monthlyAwards",
            month = month,
            otel.name = Self::SPAN_NAME,
            year = year,
        ),
    )]
    pub async fn monthly_awards(
        year: i32,
        month: i32,
        ctx: &Context,
    ) -> Result<api::award::monthly::Listing, Error> {
        let month = u8::try_from(month)
            .ok()
            .and_then(|m| read::Month::new(year, m))
            .ok_or_else(|| MonthError::Invalid.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::awards::Monthly { month })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Invoice` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVOICE_NOT_EXISTS` - the `Invoice` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "invoice",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn invoice(
        id: api::invoice::Id,
        ctx: &Context,
    ) -> Result<api::Invoice, Error> {
        ctx.service()
            .execute(query::invoice::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| InvoiceError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the listing of `Invoice`s dated within the specified month.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_MONTH` - the specified month is not in the `1..=12` range.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "monthlyInvoices",
            month = month,
            otel.name = Self::SPAN_NAME,
            year = year,
        ),
    )]
    pub async fn monthly_invoices(
        year: i32,
        month: i32,
        ctx: &Context,
    ) -> Result<api::invoice::monthly::Listing, Error> {
        let month = u8::try_from(month)
            .ok()
            .and_then(|m| read::Month::new(year, m))
            .ok_or_else(|| MonthError::Invalid.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::invoices::Monthly { month })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

impl AsError for query::invoices::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            // A dangling `Award` reference is data corruption, so it
            // surfaces as an internal error.
            Self::AwardNotExists(_) => None,
            Self::Db(e) => e.try_as_error(),
        }
    }
}

define_error! {
    enum AwardError {
        #[code = "AWARD_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Award` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum EnquiryError {
        #[code = "ENQUIRY_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Enquiry` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum InvoiceError {
        #[code = "INVOICE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Invoice` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum MonthError {
        #[code = "INVALID_MONTH"]
        #[status = BAD_REQUEST]
        #[message = "Month must be in the `1..=12` range"]
        Invalid,
    }
}
