//! [`Query`] collection related to the multiple [`Award`].

use common::{
    operations::{By, Select},
    Money,
};
use tracerr::Traced;

use crate::{
    domain::{award, Award},
    infra::{database, Database},
    read, Service,
};

use super::Query;

/// Queries the [`read::award::monthly::Listing`] of a [`Month`].
///
/// [`Month`]: read::Month
#[derive(Clone, Copy, Debug)]
pub struct Monthly {
    /// [`Month`] to list the [`Award`]s of.
    ///
    /// [`Month`]: read::Month
    pub month: read::Month,
}

impl<Db> Query<Monthly> for Service<Db>
where
    Db: Database<
            Select<By<Vec<Award>, read::Month>>,
            Ok = Vec<Award>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<read::invoice::Stats, award::Id>>,
            Ok = read::invoice::Stats,
            Err = Traced<database::Error>,
        >,
{
    type Ok = read::award::monthly::Listing;
    type Err = Traced<database::Error>;

    async fn execute(&self, query: Monthly) -> Result<Self::Ok, Self::Err> {
        let awards = self
            .database()
            .execute(Select(By::<Vec<Award>, _>::new(query.month)))
            .await
            .map_err(tracerr::wrap!())?;

        let total_awarded =
            awards.iter().map(|a| a.value).sum::<Money>().rounded();

        let mut summaries = Vec::with_capacity(awards.len());
        for award in awards {
            let stats = self
                .database()
                .execute(Select(By::<read::invoice::Stats, _>::new(award.id)))
                .await
                .map_err(tracerr::wrap!())?;

            summaries.push(read::award::Summary {
                award,
                invoice_count: stats.count.unsigned_abs(),
                total_invoiced: stats.total,
            });
        }

        Ok(read::award::monthly::Listing {
            summaries,
            total_awarded,
        })
    }
}
