//! [`Command`] definition.

pub mod create_award;
pub mod create_enquiry;
pub mod create_invoice;
pub mod delete_award;
pub mod delete_enquiry;
pub mod delete_invoice;
pub mod update_award;
pub mod update_enquiry;
pub mod update_invoice;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    create_award::CreateAward, create_enquiry::CreateEnquiry,
    create_invoice::CreateInvoice, delete_award::DeleteAward,
    delete_enquiry::DeleteEnquiry, delete_invoice::DeleteInvoice,
    update_award::UpdateAward, update_enquiry::UpdateEnquiry,
    update_invoice::UpdateInvoice,
};
