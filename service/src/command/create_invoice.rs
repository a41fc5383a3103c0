//! [`Command`] for raising a new [`Invoice`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{award, invoice, user, Award, Invoice},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for raising a new [`Invoice`] against an [`Award`].
///
/// The PSL value is derived from the component values and the pending
/// date normalization is applied before the [`Invoice`] is persisted:
/// see [`Invoice::recompute()`].
#[derive(Clone, Debug)]
pub struct CreateInvoice {
    /// ID of the [`Award`] to raise a new [`Invoice`] against.
    pub award_id: award::Id,

    /// [`invoice::Description`] of a new [`Invoice`].
    pub description: Option<invoice::Description>,

    /// [`Date`] a new [`Invoice`] is dated with.
    ///
    /// [`Date`]: common::Date
    pub date: invoice::InvoicingDate,

    /// Invoiced [`Money`] value of utility surveys.
    pub utility_value: Money,

    /// Invoiced [`Money`] value of CAD work.
    pub cad_value: Money,

    /// Invoiced [`Money`] value of topographical surveys.
    pub topo_value: Money,

    /// Invoiced [`Money`] value of contracted-out work.
    pub contractor_value: Money,

    /// [`invoice::Status`] of a new [`Invoice`].
    pub status: invoice::Status,

    /// ID of the user raising a new [`Invoice`].
    pub created_by: Option<user::Id>,
}

impl<Db> Command<CreateInvoice> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Award, award::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Award>, award::Id>>,
            Ok = Option<Award>,
            Err = Traced<database::Error>,
        > + Database<Insert<Invoice>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Invoice;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateInvoice,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateInvoice {
            award_id,
            description,
            date,
            utility_value,
            cad_value,
            topo_value,
            contractor_value,
            status,
            created_by,
        } = cmd;

        let now = self.clock().now();

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid raising an `Invoice` against a concurrently deleted
        // `Award`.
        tx.execute(Lock(By::new(award_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Select(By::<Option<Award>, _>::new(award_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::AwardNotExists(award_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let mut invoice = Invoice {
            id: invoice::Id::new(),
            award_id,
            description,
            date,
            utility_value,
            cad_value,
            topo_value,
            contractor_value,
            psl_value: Money::ZERO,
            status,
            created_by,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        };
        invoice.recompute(self.clock().today());

        tx.execute(Insert(invoice.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(invoice)
    }
}

/// Error of [`CreateInvoice`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Award`] with the provided ID does not exist.
    #[display("`Award(id: {_0})` does not exist")]
    AwardNotExists(#[error(not(source))] award::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}
