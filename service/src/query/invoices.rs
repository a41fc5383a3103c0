//! [`Query`] collection related to the multiple [`Invoice`].

use std::collections::HashMap;

use common::{
    operations::{By, Select},
    Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{award, invoice, Award, Invoice},
    infra::{database, Database},
    read, Service,
};

use super::Query;

/// Queries the [`read::invoice::monthly::Listing`] of a [`Month`].
///
/// [`Month`]: read::Month
#[derive(Clone, Copy, Debug)]
pub struct Monthly {
    /// [`Month`] to list the [`Invoice`]s of.
    ///
    /// [`Month`]: read::Month
    pub month: read::Month,
}

impl<Db> Query<Monthly> for Service<Db>
where
    Db: Database<
            Select<By<Vec<Invoice>, read::Month>>,
            Ok = Vec<Invoice>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Award>, Vec<award::Id>>>,
            Ok = Vec<Award>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<read::invoice::Stats, award::Id>>,
            Ok = read::invoice::Stats,
            Err = Traced<database::Error>,
        >,
{
    type Ok = read::invoice::monthly::Listing;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, query: Monthly) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let invoices = self
            .database()
            .execute(Select(By::<Vec<Invoice>, _>::new(query.month)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Duplicates are fine here: the selection below is keyed by ID.
        let award_ids =
            invoices.iter().map(|i| i.award_id).collect::<Vec<_>>();
        let awards = self
            .database()
            .execute(Select(By::<Vec<Award>, _>::new(award_ids)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut summaries = HashMap::with_capacity(awards.len());
        for award in awards {
            let stats = self
                .database()
                .execute(Select(By::<read::invoice::Stats, _>::new(award.id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;

            drop(summaries.insert(
                award.id,
                read::award::Summary {
                    award,
                    invoice_count: stats.count.unsigned_abs(),
                    total_invoiced: stats.total,
                },
            ));
        }

        let mut invoiced_total = Money::ZERO;
        let mut pending_total = Money::ZERO;
        let mut entries = Vec::with_capacity(invoices.len());
        for invoice in invoices {
            let award = summaries
                .get(&invoice.award_id)
                .cloned()
                .ok_or(E::AwardNotExists(invoice.award_id))
                .map_err(tracerr::wrap!())?;

            match invoice.status {
                invoice::Status::Invoiced => {
                    invoiced_total += invoice.total_value();
                }
                invoice::Status::Pending => {
                    pending_total += invoice.total_value();
                }
            }

            entries.push(read::invoice::Entry { invoice, award });
        }

        Ok(read::invoice::monthly::Listing {
            entries,
            invoiced_total: invoiced_total.rounded(),
            pending_total: pending_total.rounded(),
        })
    }
}

/// Error of [`Monthly`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Award`] referenced by an [`Invoice`] does not exist.
    #[display("`Award(id: {_0})` does not exist")]
    AwardNotExists(#[error(not(source))] award::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}
