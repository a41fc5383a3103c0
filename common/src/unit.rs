//! Marker types.

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing an entity update.
#[derive(Clone, Copy, Debug)]
pub struct Update;

/// Marker type describing a receipt of a sales enquiry.
#[derive(Clone, Copy, Debug)]
pub struct Receipt;

/// Marker type describing an awarding of a job.
#[derive(Clone, Copy, Debug)]
pub struct Awarding;

/// Marker type describing an invoicing of a job.
#[derive(Clone, Copy, Debug)]
pub struct Invoicing;
