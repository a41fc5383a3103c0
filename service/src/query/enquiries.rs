//! [`Query`] collection related to the multiple [`Enquiry`].

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::Enquiry,
    infra::{database, Database},
    read, Service,
};

use super::Query;

/// Queries a list of [`Enquiry`] matching the [`Filter`].
///
/// The list follows the requested [`Ordering`]: newest receipt date
/// first by default, or the job-number ordering (numeric job numbers
/// first, then free-form ones) on request.
///
/// [`Filter`]: read::enquiry::list::Filter
/// [`Ordering`]: read::enquiry::list::Ordering
#[derive(Clone, Debug, Default)]
pub struct List {
    /// [`Filter`] narrowing down the list.
    ///
    /// [`Filter`]: read::enquiry::list::Filter
    pub filter: read::enquiry::list::Filter,

    /// [`Ordering`] of the list.
    ///
    /// [`Ordering`]: read::enquiry::list::Ordering
    pub ordering: read::enquiry::list::Ordering,
}

impl<Db> Query<List> for Service<Db>
where
    Db: Database<
        Select<By<Vec<Enquiry>, read::enquiry::list::Filter>>,
        Ok = Vec<Enquiry>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Enquiry>;
    type Err = Traced<database::Error>;

    async fn execute(&self, query: List) -> Result<Self::Ok, Self::Err> {
        let mut enquiries = self
            .database()
            .execute(Select(By::new(query.filter)))
            .await
            .map_err(tracerr::wrap!())?;

        match query.ordering {
            // The selection arrives date-ordered already.
            read::enquiry::list::Ordering::Date => {}

            // Job-number ordering cannot be expressed in SQL, as it
            // parses the dotted numeric format.
            read::enquiry::list::Ordering::JobNumber => {
                enquiries.sort_by_cached_key(|e| e.job_number.sort_key());
            }
        }

        Ok(enquiries)
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{Date, DateTime, Money};
    use futures::executor::block_on;

    use crate::{
        domain::{enquiry, Enquiry},
        infra::database::memory::Memory,
        read, Config, Query as _, Service,
    };

    use super::List;

    fn test_enquiry(job_number: &str, date: &str, created: &str) -> Enquiry {
        let created = DateTime::from_rfc3339(created).unwrap();
        Enquiry {
            id: enquiry::Id::new(),
            job_number: enquiry::JobNumber::new(job_number).unwrap(),
            date: Date::from_iso8601(date).unwrap().coerce(),
            value: Money::from_str("100.00").unwrap(),
            location: enquiry::Location::new("Bristol").unwrap(),
            client: enquiry::Client::new("Acme Ltd").unwrap(),
            client_contact: enquiry::ClientContact::new("J. Doe").unwrap(),
            email: None,
            phone: None,
            status: enquiry::Status::Pending,
            created_by: None,
            created_at: created.coerce(),
            updated_at: created.coerce(),
        }
    }

    fn seeded() -> Memory {
        Memory::with(
            [
                test_enquiry("7", "2026-08-10", "2026-08-10T09:00:00Z"),
                test_enquiry("alpha", "2026-08-20", "2026-08-20T09:00:00Z"),
                test_enquiry("9.1", "2026-08-10", "2026-08-10T18:00:00Z"),
            ],
            [],
            [],
        )
    }

    fn job_numbers(enquiries: &[Enquiry]) -> Vec<String> {
        enquiries.iter().map(|e| e.job_number.to_string()).collect()
    }

    #[test]
    fn orders_by_date_descending_by_default() {
        let service = Service::new(Config::default(), seeded());

        let enquiries =
            block_on(service.execute(List::default())).unwrap();

        assert_eq!(job_numbers(&enquiries), ["alpha", "9.1", "7"]);
    }

    #[test]
    fn orders_by_job_number_on_request() {
        let service = Service::new(Config::default(), seeded());

        let enquiries = block_on(service.execute(List {
            filter: read::enquiry::list::Filter::default(),
            ordering: read::enquiry::list::Ordering::JobNumber,
        }))
        .unwrap();

        assert_eq!(job_numbers(&enquiries), ["9.1", "7", "alpha"]);
    }
}
