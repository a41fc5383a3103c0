//! [`Enquiry`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{enquiry, Enquiry},
    infra::{
        database::{
            self,
            postgres::{Connection, FuzzPattern},
            Postgres,
        },
        Database,
    },
    read,
};

/// Columns of the `enquiries` table.
const COLUMNS: &str = "\
    id, job_number, date, value, \
    location, client, client_contact, \
    email, phone, status, \
    created_by, created_at, updated_at";

/// Decodes an [`Enquiry`] out of the provided [`Row`].
fn decode(row: &Row) -> Enquiry {
    Enquiry {
        id: row.get("id"),
        job_number: row.get("job_number"),
        date: row.get("date"),
        value: row.get("value"),
        location: row.get("location"),
        client: row.get("client"),
        client_contact: row.get("client_contact"),
        email: row.get("email"),
        phone: row.get("phone"),
        status: row.get("status"),
        created_by: row.get("created_by"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl<C, IDs> Database<Select<By<HashMap<enquiry::Id, Enquiry>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[enquiry::Id]>,
{
    type Ok = HashMap<enquiry::Id, Enquiry>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<enquiry::Id, Enquiry>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[enquiry::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM enquiries \
             WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
             LIMIT $2::INT4",
        );
        Ok(self
            .query(&sql, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| {
                let enquiry = decode(row);
                (enquiry.id, enquiry)
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Enquiry>, enquiry::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<enquiry::Id, Enquiry>, [enquiry::Id; 1]>>,
        Ok = HashMap<enquiry::Id, Enquiry>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Enquiry>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Enquiry>, enquiry::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Insert<Enquiry>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Enquiry>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(enquiry): Insert<Enquiry>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(enquiry))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Enquiry>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(enquiry): Update<Enquiry>,
    ) -> Result<Self::Ok, Self::Err> {
        let Enquiry {
            id,
            job_number,
            date,
            value,
            location,
            client,
            client_contact,
            email,
            phone,
            status,
            created_by,
            created_at,
            updated_at,
        } = enquiry;

        const SQL: &str = "\
            INSERT INTO enquiries (\
                id, job_number, date, value, \
                location, client, client_contact, \
                email, phone, status, \
                created_by, created_at, updated_at\
            ) \
            VALUES (\
                $1::UUID, $2::VARCHAR, $3::DATE, $4::NUMERIC, \
                $5::VARCHAR, $6::VARCHAR, $7::VARCHAR, \
                $8::VARCHAR, $9::VARCHAR, $10::INT2, \
                $11::UUID, $12::TIMESTAMPTZ, $13::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET job_number = EXCLUDED.job_number, \
                date = EXCLUDED.date, \
                value = EXCLUDED.value, \
                location = EXCLUDED.location, \
                client = EXCLUDED.client, \
                client_contact = EXCLUDED.client_contact, \
                email = EXCLUDED.email, \
                phone = EXCLUDED.phone, \
                status = EXCLUDED.status, \
                created_by = EXCLUDED.created_by, \
                created_at = EXCLUDED.created_at, \
                updated_at = EXCLUDED.updated_at";
        self.exec(
            SQL,
            &[
                &id,
                &job_number,
                &date,
                &value,
                &location,
                &client,
                &client_contact,
                &email,
                &phone,
                &status,
                &created_by,
                &created_at,
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Enquiry, enquiry::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Enquiry, enquiry::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: enquiry::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM enquiries \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<Enquiry, enquiry::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Enquiry, enquiry::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: enquiry::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO enquiries_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Vec<Enquiry>, read::enquiry::list::Filter>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Enquiry>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Enquiry>, read::enquiry::list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::enquiry::list::Filter {
            job_number,
            location,
        } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];

        let job_number_pattern =
            job_number.as_ref().map(|n| FuzzPattern::new(n.as_ref()));
        let job_number_idx = job_number_pattern.as_ref().map(|n| {
            ps.push(n);
            ps.len()
        });

        let location_pattern =
            location.as_ref().map(|n| FuzzPattern::new(n.as_ref()));
        let location_idx = location_pattern.as_ref().map(|n| {
            ps.push(n);
            ps.len()
        });

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM enquiries \
             WHERE true \
                   {job_number_filtering} \
                   {location_filtering} \
             ORDER BY date DESC, created_at DESC",
            job_number_filtering =
                job_number_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!(
                        "AND LOWER(job_number) \
                         SIMILAR TO LOWER(${idx}::VARCHAR)"
                    ))
                }),
            location_filtering =
                location_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!(
                        "AND LOWER(location) \
                         SIMILAR TO LOWER(${idx}::VARCHAR)"
                    ))
                }),
        );
        Ok(self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(decode)
            .collect())
    }
}
