//! [`Command`] for editing an [`Invoice`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{invoice, Invoice},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for editing an [`Invoice`].
///
/// The derived fields are recomputed on every save, regardless of which
/// fields changed: see [`Invoice::recompute()`].
#[derive(Clone, Debug)]
pub struct UpdateInvoice {
    /// ID of the [`Invoice`] to be edited.
    pub invoice_id: invoice::Id,

    /// New [`invoice::Description`] of the [`Invoice`].
    pub description: Option<invoice::Description>,

    /// New [`Date`] the [`Invoice`] is dated with.
    ///
    /// [`Date`]: common::Date
    pub date: invoice::InvoicingDate,

    /// New invoiced [`Money`] value of utility surveys.
    pub utility_value: Money,

    /// New invoiced [`Money`] value of CAD work.
    pub cad_value: Money,

    /// New invoiced [`Money`] value of topographical surveys.
    pub topo_value: Money,

    /// New invoiced [`Money`] value of contracted-out work.
    pub contractor_value: Money,

    /// New [`invoice::Status`] of the [`Invoice`].
    pub status: invoice::Status,
}

impl<Db> Command<UpdateInvoice> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Invoice, invoice::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Invoice>, invoice::Id>>,
            Ok = Option<Invoice>,
            Err = Traced<database::Error>,
        > + Database<Update<Invoice>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Invoice;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateInvoice,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateInvoice {
            invoice_id,
            description,
            date,
            utility_value,
            cad_value,
            topo_value,
            contractor_value,
            status,
        } = cmd;

        let now = self.clock().now();

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Invoice`.
        tx.execute(Lock(By::new(invoice_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut invoice = tx
            .execute(Select(By::<Option<Invoice>, _>::new(invoice_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::InvoiceNotExists(invoice_id))
            .map_err(tracerr::wrap!())?;

        invoice.description = description;
        invoice.date = date;
        invoice.utility_value = utility_value;
        invoice.cad_value = cad_value;
        invoice.topo_value = topo_value;
        invoice.contractor_value = contractor_value;
        invoice.status = status;
        invoice.updated_at = now.coerce();
        invoice.recompute(self.clock().today());

        tx.execute(Update(invoice.clone()))
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

/// Error of [`UpdateInvoice`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Invoice`] with the provided ID does not exist.
    #[display("`Invoice(id: {_0})` does not exist")]
    InvoiceNotExists(#[error(not(source))] invoice::Id),
}
