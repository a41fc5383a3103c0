//! GraphQL API definitions.

pub mod award;
pub mod enquiry;
pub mod invoice;
mod mutation;
mod query;
pub mod scalar;
pub mod user;

use juniper::EmptySubscription;

use crate::Context;

pub use self::{
    award::Award,
    enquiry::Enquiry,
    invoice::Invoice,
    mutation::{
        DeleteAwardPayload, DeleteEnquiryPayload, DeleteInvoicePayload,
        Mutation, UpdateEnquiryOutcome, UpdateEnquiryPayload,
    },
    query::Query,
};

/// GraphQL schema.
pub type Schema =
    juniper::RootNode<'static, Query, Mutation, EmptySubscription<Context>>;
