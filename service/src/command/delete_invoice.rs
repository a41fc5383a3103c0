//! [`Command`] for deleting an [`Invoice`].

use common::operations::{
    By, Commit, Delete, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Award;
use crate::{
    domain::{award, invoice, Invoice},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting an [`Invoice`].
///
/// Deletion is unconditional, but the output reports whether the owning
/// [`Award`] was left with no [`Invoice`]s at all, so the caller can
/// surface a warning.
#[derive(Clone, Copy, Debug)]
pub struct DeleteInvoice {
    /// ID of the [`Invoice`] to be deleted.
    pub invoice_id: invoice::Id,
}

/// Output of a [`DeleteInvoice`] [`Command`] execution.
#[derive(Clone, Debug)]
pub struct Output {
    /// Deleted [`Invoice`].
    pub invoice: Invoice,

    /// Whether the owning [`Award`] has no [`Invoice`]s left.
    pub award_left_empty: bool,
}

impl<Db> Command<DeleteInvoice> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Invoice, invoice::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Invoice>, invoice::Id>>,
            Ok = Option<Invoice>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Invoice, invoice::Id>>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Vec<Invoice>, award::Id>>,
            Ok = Vec<Invoice>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteInvoice,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteInvoice { invoice_id } = cmd;

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

        let invoice = tx
            .execute(Select(By::<Option<Invoice>, _>::new(invoice_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::InvoiceNotExists(invoice_id))
            .map_err(tracerr::wrap!())?;

        tx.execute(Delete(By::<Invoice, _>::new(invoice_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let remaining = tx
            .execute(Select(By::<Vec<Invoice>, _>::new(invoice.award_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(Output {
            invoice,
            award_left_empty: remaining.is_empty(),
        })
    }
}

/// Error of [`DeleteInvoice`] [`Command`] execution.
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
