//! Domain definitions.

pub mod award;
pub mod enquiry;
pub mod invoice;
pub mod user;

pub use self::{award::Award, enquiry::Enquiry, invoice::Invoice};
