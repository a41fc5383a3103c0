//! [`Invoice`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{award, invoice, Invoice},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Columns of the `invoices` table.
const COLUMNS: &str = "\
    id, award_id, description, date, \
    utility_value, cad_value, topo_value, contractor_value, \
    psl_value, status, \
    created_by, created_at, updated_at";

/// Decodes an [`Invoice`] out of the provided [`Row`].
fn decode(row: &Row) -> Invoice {
    Invoice {
        id: row.get("id"),
        award_id: row.get("award_id"),
        description: row.get("description"),
        date: row.get("date"),
        utility_value: row.get("utility_value"),
        cad_value: row.get("cad_value"),
        topo_value: row.get("topo_value"),
        contractor_value: row.get("contractor_value"),
        psl_value: row.get("psl_value"),
        status: row.get("status"),
        created_by: row.get("created_by"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl<C, IDs> Database<Select<By<HashMap<invoice::Id, Invoice>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[invoice::Id]>,
{
    type Ok = HashMap<invoice::Id, Invoice>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<invoice::Id, Invoice>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[invoice::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM invoices \
             WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
             LIMIT $2::INT4",
        );
        Ok(self
            .query(&sql, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| {
                let invoice = decode(row);
                (invoice.id, invoice)
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Invoice>, invoice::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<invoice::Id, Invoice>, [invoice::Id; 1]>>,
        Ok = HashMap<invoice::Id, Invoice>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Invoice>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Invoice>, invoice::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Select<By<Vec<Invoice>, award::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Invoice>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Invoice>, award::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let award_id: award::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM invoices \
             WHERE award_id = $1::UUID \
             ORDER BY date, id",
        );
        Ok(self
            .query(&sql, &[&award_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(decode)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Invoice>, read::Month>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Invoice>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Invoice>, read::Month>>,
    ) -> Result<Self::Ok, Self::Err> {
        let month = by.into_inner();
        let year = month.year();
        let month = i32::from(month.month());

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM invoices \
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

impl<C> Database<Select<By<read::invoice::Stats, award::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = read::invoice::Stats;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::invoice::Stats, award::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let award_id: award::Id = by.into_inner();

        const SQL: &str = "\
            SELECT COUNT(*)::INT8 AS count, \
                   COALESCE(SUM(utility_value + cad_value \
                                + topo_value + contractor_value), \
                            0)::NUMERIC AS total \
            FROM invoices \
            WHERE award_id = $1::UUID";
        self.query_opt(SQL, &[&award_id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| {
                let row = row.expect("always exists");
                read::invoice::Stats {
                    count: row.get("count"),
                    total: row.get("total"),
                }
            })
    }
}

impl<C> Database<Insert<Invoice>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Invoice>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(invoice): Insert<Invoice>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(invoice))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Invoice>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(invoice): Update<Invoice>,
    ) -> Result<Self::Ok, Self::Err> {
        let Invoice {
            id,
            award_id,
            description,
            date,
            utility_value,
            cad_value,
            topo_value,
            contractor_value,
            psl_value,
            status,
            created_by,
            created_at,
            updated_at,
        } = invoice;

        const SQL: &str = "\
            INSERT INTO invoices (\
                id, award_id, description, date, \
                utility_value, cad_value, topo_value, contractor_value, \
                psl_value, status, \
                created_by, created_at, updated_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::VARCHAR, $4::DATE, \
                $5::NUMERIC, $6::NUMERIC, $7::NUMERIC, $8::NUMERIC, \
                $9::NUMERIC, $10::INT2, \
                $11::UUID, $12::TIMESTAMPTZ, $13::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET award_id = EXCLUDED.award_id, \
                description = EXCLUDED.description, \
                date = EXCLUDED.date, \
                utility_value = EXCLUDED.utility_value, \
                cad_value = EXCLUDED.cad_value, \
                topo_value = EXCLUDED.topo_value, \
                contractor_value = EXCLUDED.contractor_value, \
                psl_value = EXCLUDED.psl_value, \
                status = EXCLUDED.status, \
                created_by = EXCLUDED.created_by, \
                created_at = EXCLUDED.created_at, \
                updated_at = EXCLUDED.updated_at";
        self.exec(
            SQL,
            &[
                &id,
                &award_id,
                &description,
                &date,
                &utility_value,
                &cad_value,
                &topo_value,
                &contractor_value,
                &psl_value,
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

impl<C> Database<Delete<By<Invoice, invoice::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Invoice, invoice::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: invoice::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM invoices \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Delete<By<Vec<Invoice>, award::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Vec<Invoice>, award::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let award_id: award::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM invoices \
            WHERE award_id = $1::UUID";
        self.exec(SQL, &[&award_id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<Invoice, invoice::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Invoice, invoice::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: invoice::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO invoices_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
