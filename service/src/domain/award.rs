//! [`Award`] definitions.

#[cfg(doc)]
use common::{Date, DateTime};
use common::{unit, DateOf, DateTimeOf, Money};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use crate::domain::Invoice;
use crate::domain::{enquiry, user, Enquiry};

/// Monthly award of a won job.
///
/// Either derived from an [`Enquiry`] transitioning into
/// [`enquiry::Status::Awarded`] (in which case it keeps a back-reference
/// and mirrors the enquiry's fields), or created manually with no
/// [`Enquiry`] link at all.
#[derive(Clone, Debug)]
pub struct Award {
    /// ID of this [`Award`].
    pub id: Id,

    /// ID of the [`Enquiry`] this [`Award`] was derived from.
    ///
    /// [`None`] for manually created [`Award`]s.
    pub enquiry_id: Option<enquiry::Id>,

    /// [`enquiry::JobNumber`] of the awarded job.
    pub job_number: enquiry::JobNumber,

    /// [`enquiry::Location`] of the awarded job.
    pub location: enquiry::Location,

    /// [`enquiry::Client`] the job was awarded by.
    pub client: enquiry::Client,

    /// [`enquiry::ClientContact`] person of the client.
    pub client_contact: enquiry::ClientContact,

    /// [`enquiry::Email`] of the client, if known.
    pub email: Option<enquiry::Email>,

    /// [`enquiry::Phone`] of the client, if known.
    pub phone: Option<enquiry::Phone>,

    /// Awarded [`Money`] value of the job.
    pub value: Money,

    /// [`Date`] when the job was awarded.
    pub date: AwardingDate,

    /// ID of the user who created this [`Award`], if known.
    ///
    /// Attached on creation only and never mutated afterwards.
    pub created_by: Option<user::Id>,

    /// [`DateTime`] when this [`Award`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Award`] was edited the last time.
    pub updated_at: UpdateDateTime,
}

impl Award {
    /// Creates a new [`Award`] derived from the provided [`Enquiry`],
    /// mirroring all its shared fields.
    #[must_use]
    pub fn from_enquiry(
        enquiry: &Enquiry,
        date: AwardingDate,
        created_by: Option<user::Id>,
        now: CreationDateTime,
    ) -> Self {
        Self {
            id: Id::new(),
            enquiry_id: Some(enquiry.id),
            job_number: enquiry.job_number.clone(),
            location: enquiry.location.clone(),
            client: enquiry.client.clone(),
            client_contact: enquiry.client_contact.clone(),
            email: enquiry.email.clone(),
            phone: enquiry.phone.clone(),
            value: enquiry.value,
            date,
            created_by,
            created_at: now,
            updated_at: now.coerce(),
        }
    }

    /// Mirrors the shared fields of the provided [`Enquiry`] onto this
    /// [`Award`], leaving the awarding [`date`] untouched.
    ///
    /// This is the enquiry-to-award sync direction, applied to linked
    /// [`Award`]s while the [`Enquiry`] stays in
    /// [`enquiry::Status::Awarded`]. The opposite direction lives in
    /// [`Enquiry::sync_from_award()`].
    ///
    /// [`date`]: Award::date
    pub fn sync_from_enquiry(&mut self, enquiry: &Enquiry) {
        self.job_number = enquiry.job_number.clone();
        self.location = enquiry.location.clone();
        self.client = enquiry.client.clone();
        self.client_contact = enquiry.client_contact.clone();
        self.email = enquiry.email.clone();
        self.phone = enquiry.phone.clone();
        self.value = enquiry.value;
    }

    /// Indicates whether the provided total of invoiced values mismatches
    /// the [`value`] of this [`Award`].
    ///
    /// Both sides are compared rounded to 2 decimal places.
    ///
    /// [`value`]: Award::value
    #[must_use]
    pub fn has_mismatch(&self, invoiced_total: Money) -> bool {
        invoiced_total.rounded() != self.value.rounded()
    }
}

/// ID of an [`Award`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Side effect of an [`Enquiry`] edit onto its linked [`Award`]s.
///
/// Evaluated on the `(old, new)` [`enquiry::Status`] pair of the edit.
/// This is the only place deciding when [`Award`]s (and their derived
/// [`Invoice`]s) are created, destroyed or re-synced.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Transition {
    /// [`Enquiry`] became [`enquiry::Status::Awarded`]: one new [`Award`]
    /// mirroring it is created, along with a zero-valued pending
    /// [`Invoice`].
    CreateAward,

    /// [`Enquiry`] left [`enquiry::Status::Awarded`]: all linked
    /// [`Award`]s are deleted along with their [`Invoice`]s.
    DeleteAwards,

    /// [`Enquiry`] stayed [`enquiry::Status::Awarded`]: its fields are
    /// re-mirrored onto all linked [`Award`]s.
    SyncAwards,

    /// No award-side effect.
    None,
}

impl Transition {
    /// Evaluates the [`Transition`] of the provided [`enquiry::Status`]
    /// edit.
    #[must_use]
    pub fn evaluate(old: enquiry::Status, new: enquiry::Status) -> Self {
        use enquiry::Status as S;

        match (old, new) {
            (S::Pending | S::Rejected, S::Awarded) => Self::CreateAward,
            (S::Awarded, S::Pending | S::Rejected) => Self::DeleteAwards,
            (S::Awarded, S::Awarded) => Self::SyncAwards,
            (S::Pending | S::Rejected, S::Pending | S::Rejected) => Self::None,
        }
    }
}

/// [`Date`] when a job was awarded.
///
/// [`Date`]: common::Date
pub type AwardingDate = DateOf<(Award, unit::Awarding)>;

/// [`DateTime`] when an [`Award`] was created.
///
/// [`DateTime`]: common::DateTime
pub type CreationDateTime = DateTimeOf<(Award, unit::Creation)>;

/// [`DateTime`] when an [`Award`] was edited the last time.
///
/// [`DateTime`]: common::DateTime
pub type UpdateDateTime = DateTimeOf<(Award, unit::Update)>;

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{DateTime, Money};

    use crate::domain::{enquiry, Enquiry};

    use super::{Award, Transition};

    fn test_enquiry(value: &str) -> Enquiry {
        let now = DateTime::from_rfc3339("2026-08-01T09:00:00Z").unwrap();
        Enquiry {
            id: enquiry::Id::new(),
            job_number: enquiry::JobNumber::new("123.2").unwrap(),
            date: now.date().coerce(),
            value: Money::from_str(value).unwrap(),
            location: enquiry::Location::new("Bristol").unwrap(),
            client: enquiry::Client::new("Acme Ltd").unwrap(),
            client_contact: enquiry::ClientContact::new("J. Doe").unwrap(),
            email: enquiry::Email::new("j.doe@acme.test"),
            phone: enquiry::Phone::new("+44 117 000 0000"),
            status: enquiry::Status::Awarded,
            created_by: None,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        }
    }

    #[test]
    fn transition_table() {
        use enquiry::Status as S;
        use Transition as T;

        assert_eq!(T::evaluate(S::Pending, S::Awarded), T::CreateAward);
        assert_eq!(T::evaluate(S::Rejected, S::Awarded), T::CreateAward);
        assert_eq!(T::evaluate(S::Awarded, S::Pending), T::DeleteAwards);
        assert_eq!(T::evaluate(S::Awarded, S::Rejected), T::DeleteAwards);
        assert_eq!(T::evaluate(S::Awarded, S::Awarded), T::SyncAwards);
        assert_eq!(T::evaluate(S::Pending, S::Pending), T::None);
        assert_eq!(T::evaluate(S::Pending, S::Rejected), T::None);
        assert_eq!(T::evaluate(S::Rejected, S::Pending), T::None);
        assert_eq!(T::evaluate(S::Rejected, S::Rejected), T::None);
    }

    #[test]
    fn from_enquiry_mirrors_fields() {
        let enquiry = test_enquiry("5000.00");
        let now = DateTime::from_rfc3339("2026-08-29T12:00:00Z").unwrap();

        let award =
            Award::from_enquiry(&enquiry, now.date().coerce(), None, now.coerce());

        assert_eq!(award.enquiry_id, Some(enquiry.id));
        assert_eq!(award.job_number, enquiry.job_number);
        assert_eq!(award.location, enquiry.location);
        assert_eq!(award.client, enquiry.client);
        assert_eq!(award.client_contact, enquiry.client_contact);
        assert_eq!(award.email, enquiry.email);
        assert_eq!(award.phone, enquiry.phone);
        assert_eq!(award.value, enquiry.value);
        assert_eq!(award.date, now.date().coerce());
    }

    #[test]
    fn sync_from_enquiry_keeps_awarding_date() {
        let mut enquiry = test_enquiry("5000.00");
        let now = DateTime::from_rfc3339("2026-08-29T12:00:00Z").unwrap();
        let mut award =
            Award::from_enquiry(&enquiry, now.date().coerce(), None, now.coerce());

        enquiry.value = Money::from_str("6000.00").unwrap();
        enquiry.location = enquiry::Location::new("Leeds").unwrap();
        award.sync_from_enquiry(&enquiry);

        assert_eq!(award.value, Money::from_str("6000.00").unwrap());
        assert_eq!(award.location, enquiry.location);
        assert_eq!(award.date, now.date().coerce());
    }

    #[test]
    fn sync_from_award_mirrors_back() {
        let mut enquiry = test_enquiry("5000.00");
        let now = DateTime::from_rfc3339("2026-08-29T12:00:00Z").unwrap();
        let mut award =
            Award::from_enquiry(&enquiry, now.date().coerce(), None, now.coerce());

        award.value = Money::from_str("6500.00").unwrap();
        award.job_number = enquiry::JobNumber::new("124").unwrap();
        enquiry.sync_from_award(&award);

        assert_eq!(enquiry.value, award.value);
        assert_eq!(enquiry.job_number, award.job_number);
        // The status itself is never touched by field mirroring.
        assert_eq!(enquiry.status, enquiry::Status::Awarded);
    }

    #[test]
    fn mismatch_compares_rounded() {
        let enquiry = test_enquiry("5000.00");
        let now = DateTime::from_rfc3339("2026-08-29T12:00:00Z").unwrap();
        let award =
            Award::from_enquiry(&enquiry, now.date().coerce(), None, now.coerce());

        assert!(award.has_mismatch(Money::ZERO));
        assert!(award.has_mismatch(Money::from_str("4999.99").unwrap()));
        assert!(!award.has_mismatch(Money::from_str("5000.00").unwrap()));
        assert!(!award.has_mismatch(Money::from_str("5000.0049").unwrap()));
        assert!(award.has_mismatch(Money::from_str("5000.005").unwrap()));
    }
}
