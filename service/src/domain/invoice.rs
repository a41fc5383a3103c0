//! [`Invoice`] definitions.

#[cfg(doc)]
use common::{Date, DateTime};
use common::{define_kind, unit, DateOf, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use crate::domain::Award;
use crate::domain::{award, user};

/// Invoice raised against an [`Award`].
#[derive(Clone, Debug)]
pub struct Invoice {
    /// ID of this [`Invoice`].
    pub id: Id,

    /// ID of the [`Award`] this [`Invoice`] is raised against.
    pub award_id: award::Id,

    /// Free-form [`Description`] of the invoiced work, if any.
    pub description: Option<Description>,

    /// [`Date`] this [`Invoice`] is dated with.
    ///
    /// While the [`Invoice`] stays [`Status::Pending`], this date never
    /// lags behind the current month: see [`Invoice::recompute()`].
    pub date: InvoicingDate,

    /// Invoiced [`Money`] value of utility surveys.
    pub utility_value: Money,

    /// Invoiced [`Money`] value of CAD work.
    pub cad_value: Money,

    /// Invoiced [`Money`] value of topographical surveys.
    pub topo_value: Money,

    /// Invoiced [`Money`] value of contracted-out work.
    pub contractor_value: Money,

    /// Derived PSL [`Money`] value of this [`Invoice`].
    ///
    /// Always equal to [`utility_value`] + [`cad_value`] + [`topo_value`],
    /// excluding [`contractor_value`]. Recomputed on every write via
    /// [`Invoice::recompute()`], never accepted from input.
    ///
    /// [`utility_value`]: Invoice::utility_value
    /// [`cad_value`]: Invoice::cad_value
    /// [`topo_value`]: Invoice::topo_value
    /// [`contractor_value`]: Invoice::contractor_value
    pub psl_value: Money,

    /// [`Status`] of this [`Invoice`].
    pub status: Status,

    /// ID of the user who created this [`Invoice`], if known.
    ///
    /// Attached on creation only and never mutated afterwards.
    pub created_by: Option<user::Id>,

    /// [`DateTime`] when this [`Invoice`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Invoice`] was edited the last time.
    pub updated_at: UpdateDateTime,
}

impl Invoice {
    /// Creates a new zero-valued [`Status::Pending`] [`Invoice`] for the
    /// provided [`Award`], dated with the first day of the current month.
    #[must_use]
    pub fn zero_valued(
        award_id: award::Id,
        today: common::Date,
        created_by: Option<user::Id>,
        now: CreationDateTime,
    ) -> Self {
        Self {
            id: Id::new(),
            award_id,
            description: None,
            date: today.first_of_month().coerce(),
            utility_value: Money::ZERO,
            cad_value: Money::ZERO,
            topo_value: Money::ZERO,
            contractor_value: Money::ZERO,
            psl_value: Money::ZERO,
            status: Status::Pending,
            created_by,
            created_at: now,
            updated_at: now.coerce(),
        }
    }

    /// Re-derives the computed fields of this [`Invoice`].
    ///
    /// Recomputes [`psl_value`] from the component values, and rolls a
    /// [`Status::Pending`] [`date`] lying in a past month forward to the
    /// first day of the current month. [`Status::Invoiced`] dates are
    /// historical facts and stay untouched.
    ///
    /// Applied on every create and edit, so stored state never drifts
    /// from the component values.
    ///
    /// [`date`]: Invoice::date
    /// [`psl_value`]: Invoice::psl_value
    pub fn recompute(&mut self, today: common::Date) {
        self.psl_value = self.utility_value + self.cad_value + self.topo_value;

        let month_start = today.first_of_month();
        if self.status == Status::Pending && self.date < month_start.coerce() {
            self.date = month_start.coerce();
        }
    }

    /// Returns the total invoiced [`Money`] value of this [`Invoice`],
    /// including [`contractor_value`].
    ///
    /// [`contractor_value`]: Invoice::contractor_value
    #[must_use]
    pub fn total_value(&self) -> Money {
        self.utility_value
            + self.cad_value
            + self.topo_value
            + self.contractor_value
    }
}

/// ID of an [`Invoice`].
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

/// Description of an [`Invoice`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `description` matches the
    /// format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(description: impl Into<String>) -> Self {
        Self(description.into())
    }

    /// Creates a new [`Description`] if the given `description` is valid.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Option<Self> {
        let description = description.into();
        Self::check(&description).then_some(Self(description))
    }

    /// Checks whether the given `description` is a valid [`Description`].
    fn check(description: impl AsRef<str>) -> bool {
        let description = description.as_ref();
        description.trim() == description
            && !description.is_empty()
            && description.len() <= 512
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

define_kind! {
    #[doc = "Status of an [`Invoice`]."]
    enum Status {
        #[doc = "Raised but not yet sent out."]
        Pending = 1,

        #[doc = "Sent out to the client."]
        Invoiced = 2,
    }
}

/// [`Date`] an [`Invoice`] is dated with.
///
/// [`Date`]: common::Date
pub type InvoicingDate = DateOf<(Invoice, unit::Invoicing)>;

/// [`DateTime`] when an [`Invoice`] was created.
///
/// [`DateTime`]: common::DateTime
pub type CreationDateTime = DateTimeOf<(Invoice, unit::Creation)>;

/// [`DateTime`] when an [`Invoice`] was edited the last time.
///
/// [`DateTime`]: common::DateTime
pub type UpdateDateTime = DateTimeOf<(Invoice, unit::Update)>;

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{Date, DateTime, Money};

    use crate::domain::award;

    use super::{Invoice, Status};

    fn test_invoice(date: &str, status: Status) -> Invoice {
        let now = DateTime::from_rfc3339("2026-08-29T09:00:00Z").unwrap();
        Invoice {
            id: super::Id::new(),
            award_id: award::Id::new(),
            description: None,
            date: Date::from_iso8601(date).unwrap().coerce(),
            utility_value: Money::from_str("100.00").unwrap(),
            cad_value: Money::from_str("20.50").unwrap(),
            topo_value: Money::from_str("30.25").unwrap(),
            contractor_value: Money::from_str("400.00").unwrap(),
            psl_value: Money::ZERO,
            status,
            created_by: None,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        }
    }

    #[test]
    fn recompute_derives_psl_without_contractor() {
        let today = Date::from_iso8601("2026-08-29").unwrap();
        let mut invoice = test_invoice("2026-08-10", Status::Pending);

        invoice.recompute(today);

        assert_eq!(invoice.psl_value, Money::from_str("150.75").unwrap());
        assert_eq!(invoice.total_value(), Money::from_str("550.75").unwrap());
    }

    #[test]
    fn recompute_rolls_stale_pending_date_forward() {
        let today = Date::from_iso8601("2026-08-29").unwrap();

        let mut stale = test_invoice("2026-06-15", Status::Pending);
        stale.recompute(today);
        assert_eq!(
            stale.date,
            Date::from_iso8601("2026-08-01").unwrap().coerce(),
        );

        let mut current = test_invoice("2026-08-10", Status::Pending);
        current.recompute(today);
        assert_eq!(
            current.date,
            Date::from_iso8601("2026-08-10").unwrap().coerce(),
        );

        let mut future = test_invoice("2026-09-02", Status::Pending);
        future.recompute(today);
        assert_eq!(
            future.date,
            Date::from_iso8601("2026-09-02").unwrap().coerce(),
        );
    }

    #[test]
    fn recompute_keeps_invoiced_date_untouched() {
        let today = Date::from_iso8601("2026-08-29").unwrap();
        let mut invoice = test_invoice("2026-06-15", Status::Invoiced);

        invoice.recompute(today);

        assert_eq!(
            invoice.date,
            Date::from_iso8601("2026-06-15").unwrap().coerce(),
        );
    }

    #[test]
    fn zero_valued_invoice_is_pending_on_month_start() {
        let now = DateTime::from_rfc3339("2026-08-29T09:00:00Z").unwrap();
        let invoice = Invoice::zero_valued(
            award::Id::new(),
            now.date(),
            None,
            now.coerce(),
        );

        assert_eq!(invoice.status, Status::Pending);
        assert_eq!(invoice.total_value(), Money::ZERO);
        assert_eq!(invoice.psl_value, Money::ZERO);
        assert_eq!(
            invoice.date,
            Date::from_iso8601("2026-08-01").unwrap().coerce(),
        );
    }
}
