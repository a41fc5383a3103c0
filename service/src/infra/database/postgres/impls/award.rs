//! [`Award`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{award, enquiry, Award},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Columns of the `awards` table.
const COLUMNS: &str = "\
    id, enquiry_id, job_number, \
    location, client, client_contact, \
    email, phone, value, date, \
    created_by, created_at, updated_at";

/// Decodes an [`Award`] out of the provided [`Row`].
fn decode(row: &Row) -> Award {
    Award {
        id: row.get("id"),
        enquiry_id: row.get("enquiry_id"),
        job_number: row.get("job_number"),
        location: row.get("location"),
        client: row.get("client"),
        client_contact: row.get("client_contact"),
        email: row.get("email"),
        phone: row.get("phone"),
        value: row.get("value"),
        date: row.get("date"),
        created_by: row.get("created_by"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl<C, IDs> Database<Select<By<HashMap<award::Id, Award>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[award::Id]>,
{
    type Ok = HashMap<award::Id, Award>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<award::Id, Award>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[award::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM awards \
             WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
             LIMIT $2::INT4",
        );
        Ok(self
            .query(&sql, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| {
                let award = decode(row);
                (award.id, award)
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Award>, award::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<award::Id, Award>, [award::Id; 1]>>,
        Ok = HashMap<award::Id, Award>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Award>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Award>, award::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Select<By<Vec<Award>, Vec<award::Id>>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<award::Id, Award>, Vec<award::Id>>>,
        Ok = HashMap<award::Id, Award>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Award>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Award>, Vec<award::Id>>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .execute(Select(By::new(by.into_inner())))
            .await
            .map_err(tracerr::wrap!())?
            .into_values()
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Award>, enquiry::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Award>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Award>, enquiry::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let enquiry_id: enquiry::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM awards \
             WHERE enquiry_id = $1::UUID \
             ORDER BY date, id",
        );
        Ok(self
            .query(&sql, &[&enquiry_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(decode)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Award>, read::Month>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Award>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Award>, read::Month>>,
    ) -> Result<Self::Ok, Self::Err> {
        let month = by.into_inner();
        let year = month.year();
        let month = i32::from(month.month());

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM awards \
             WHERE date >= make_date($1::INT4, $2::INT4, 1) \
               AND date < make_date($1::INT4, $2::INT4, 1) \
                          + INTERVAL '1 month' \
             ORDER BY date, id",
        );
        Ok(self
            .query(&sql, &[&year, &month])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(decode)
            .collect())
    }
}

impl<C> Database<Insert<Award>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Award>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(award): Insert<Award>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(award)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Award>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(award): Update<Award>,
    ) -> Result<Self::Ok, Self::Err> {
        let Award {
            id,
            enquiry_id,
            job_number,
            location,
            client,
            client_contact,
            email,
            phone,
            value,
            date,
            created_by,
            created_at,
            updated_at,
        } = award;

        const SQL: &str = "\
            INSERT INTO awards (\
                id, enquiry_id, job_number, \
                location, client, client_contact, \
                email, phone, value, date, \
                created_by, created_at, updated_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::VARCHAR, \
                $4::VARCHAR, $5::VARCHAR, $6::VARCHAR, \
                $7::VARCHAR, $8::VARCHAR, $9::NUMERIC, $10::DATE, \
                $11::UUID, $12::TIMESTAMPTZ, $13::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET enquiry_id = EXCLUDED.enquiry_id, \
                job_number = EXCLUDED.job_number, \
                location = EXCLUDED.location, \
                client = EXCLUDED.client, \
                client_contact = EXCLUDED.client_contact, \
                email = EXCLUDED.email, \
                phone = EXCLUDED.phone, \
                value = EXCLUDED.value, \
                date = EXCLUDED.date, \
                created_by = EXCLUDED.created_by, \
                created_at = EXCLUDED.created_at, \
                updated_at = EXCLUDED.updated_at";
        self.exec(
            SQL,
            &[
                &id,
                &enquiry_id,
                &job_number,
                &location,
                &client,
                &client_contact,
                &email,
                &phone,
                &value,
                &date,
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

impl<C> Database<Delete<By<Award, award::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Award, award::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: award::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM awards \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<Award, award::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Award, award::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: award::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO awards_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
