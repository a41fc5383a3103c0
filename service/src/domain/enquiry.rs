//! [`Enquiry`] definitions.

use std::{cmp::Ordering, sync::LazyLock};

use common::{define_kind, unit, DateOf, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(doc)]
use common::{Date, DateTime};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user;
#[cfg(doc)]
use crate::domain::Award;

/// Recorded sales enquiry.
///
/// The only user-initiated entry point into the sales pipeline: enquiries
/// are created as [`Status::Pending`] and drive the [`Award`] lifecycle
/// through their [`Status`] transitions.
#[derive(Clone, Debug)]
pub struct Enquiry {
    /// ID of this [`Enquiry`].
    pub id: Id,

    /// [`JobNumber`] of this [`Enquiry`].
    pub job_number: JobNumber,

    /// [`Date`] when this [`Enquiry`] was received.
    pub date: ReceiptDate,

    /// Estimated [`Money`] value of the enquired job.
    pub value: Money,

    /// [`Location`] of the enquired job.
    pub location: Location,

    /// [`Client`] who raised this [`Enquiry`].
    pub client: Client,

    /// [`ClientContact`] person of the [`Client`].
    pub client_contact: ClientContact,

    /// [`Email`] of the [`Client`], if known.
    pub email: Option<Email>,

    /// [`Phone`] of the [`Client`], if known.
    pub phone: Option<Phone>,

    /// [`Status`] of this [`Enquiry`].
    pub status: Status,

    /// ID of the user who created this [`Enquiry`], if known.
    ///
    /// Attached on creation only and never mutated afterwards.
    pub created_by: Option<user::Id>,

    /// [`DateTime`] when this [`Enquiry`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Enquiry`] was edited the last time.
    pub updated_at: UpdateDateTime,
}

impl Enquiry {
    /// Mirrors the shared fields of the provided [`Award`] onto this
    /// [`Enquiry`].
    ///
    /// This is the award-to-enquiry sync direction, applied when a linked
    /// [`Award`] is edited manually. The opposite direction lives in
    /// [`Award::sync_from_enquiry()`].
    ///
    /// [`Award`]: crate::domain::Award
    /// [`Award::sync_from_enquiry()`]: crate::domain::Award::sync_from_enquiry
    pub fn sync_from_award(&mut self, award: &crate::domain::Award) {
        self.job_number = award.job_number.clone();
        self.location = award.location.clone();
        self.client = award.client.clone();
        self.client_contact = award.client_contact.clone();
        self.email = award.email.clone();
        self.phone = award.phone.clone();
        self.value = award.value;
    }
}

/// ID of an [`Enquiry`].
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

/// Job number of an [`Enquiry`].
///
/// Usually numeric, optionally with a dotted sub-number (like `123.2`),
/// but free-form identifiers are allowed too.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct JobNumber(String);

impl JobNumber {
    /// Creates a new [`JobNumber`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `number` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Creates a new [`JobNumber`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`JobNumber`].
    fn check(number: impl AsRef<str>) -> bool {
        let number = number.as_ref();
        number.trim() == number && !number.is_empty() && number.len() <= 20
    }

    /// Returns the [`SortKey`] of this [`JobNumber`].
    #[must_use]
    pub fn sort_key(&self) -> SortKey {
        let mut parts = self.0.splitn(3, '.');
        let major = parts.next().unwrap_or_default();
        if let Ok(major) = major.parse::<u64>() {
            match parts.next() {
                None => {
                    return SortKey::Numeric { major, minor: 0 };
                }
                Some(minor) => {
                    if let Ok(minor) = minor.parse::<u64>() {
                        return SortKey::Numeric { major, minor };
                    }
                }
            }
        }
        SortKey::Text(self.0.clone())
    }
}

impl FromStr for JobNumber {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `JobNumber`")
    }
}

/// Listing key of a [`JobNumber`].
///
/// The [`Ord`] implementation yields the job-number listing order
/// directly: numeric identifiers always come before non-numeric ones,
/// and each group is ordered descending.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SortKey {
    /// Numeric [`JobNumber`], optionally with a dotted sub-number.
    Numeric {
        /// Part before the dot.
        major: u64,

        /// Part after the dot (`0` if there is none).
        minor: u64,
    },

    /// Free-form [`JobNumber`].
    Text(String),
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (
                Self::Numeric { major, minor },
                Self::Numeric {
                    major: other_major,
                    minor: other_minor,
                },
            ) => (other_major, other_minor).cmp(&(major, minor)),
            (Self::Numeric { .. }, Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Numeric { .. }) => Ordering::Greater,
            (Self::Text(this), Self::Text(other)) => other.cmp(this),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Location of an enquired job.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Location(String);

impl Location {
    /// Creates a new [`Location`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `location` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    /// Creates a new [`Location`] if the given `location` is valid.
    #[must_use]
    pub fn new(location: impl Into<String>) -> Option<Self> {
        let location = location.into();
        Self::check(&location).then_some(Self(location))
    }

    /// Checks whether the given `location` is a valid [`Location`].
    fn check(location: impl AsRef<str>) -> bool {
        let location = location.as_ref();
        location.trim() == location
            && !location.is_empty()
            && location.len() <= 512
    }
}

impl FromStr for Location {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Location`")
    }
}

/// Name of a client raising enquiries.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Client(String);

impl Client {
    /// Creates a new [`Client`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `client` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(client: impl Into<String>) -> Self {
        Self(client.into())
    }

    /// Creates a new [`Client`] if the given `client` is valid.
    #[must_use]
    pub fn new(client: impl Into<String>) -> Option<Self> {
        let client = client.into();
        Self::check(&client).then_some(Self(client))
    }

    /// Checks whether the given `client` is a valid [`Client`].
    fn check(client: impl AsRef<str>) -> bool {
        let client = client.as_ref();
        client.trim() == client && !client.is_empty() && client.len() <= 255
    }
}

impl FromStr for Client {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Client`")
    }
}

/// Contact person of a [`Client`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct ClientContact(String);

impl ClientContact {
    /// Creates a new [`ClientContact`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `contact` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(contact: impl Into<String>) -> Self {
        Self(contact.into())
    }

    /// Creates a new [`ClientContact`] if the given `contact` is valid.
    #[must_use]
    pub fn new(contact: impl Into<String>) -> Option<Self> {
        let contact = contact.into();
        Self::check(&contact).then_some(Self(contact))
    }

    /// Checks whether the given `contact` is a valid [`ClientContact`].
    fn check(contact: impl AsRef<str>) -> bool {
        let contact = contact.as_ref();
        contact.trim() == contact && !contact.is_empty() && contact.len() <= 255
    }
}

impl FromStr for ClientContact {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `ClientContact`")
    }
}

/// Email address of a [`Client`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `address` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Creates a new [`Email`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex")
        });

        let address = address.as_ref();
        address.len() <= 254 && REGEX.is_match(address)
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

/// Phone number of a [`Client`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Phone(String);

impl Phone {
    /// Creates a new [`Phone`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `number` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Creates a new [`Phone`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`Phone`].
    fn check(number: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Phone`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^\+?[0-9][0-9 ().-]{1,98}$").expect("valid regex")
        });

        REGEX.is_match(number.as_ref())
    }
}

impl FromStr for Phone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Phone`")
    }
}

define_kind! {
    #[doc = "Status of an [`Enquiry`]."]
    enum Status {
        #[doc = "Awaiting a decision."]
        Pending = 1,

        #[doc = "Turned down by the client."]
        Rejected = 2,

        #[doc = "Won and promoted to a monthly award."]
        Awarded = 3,
    }
}

/// [`Date`] when an [`Enquiry`] was received.
///
/// [`Date`]: common::Date
pub type ReceiptDate = DateOf<(Enquiry, unit::Receipt)>;

/// [`DateTime`] when an [`Enquiry`] was created.
///
/// [`DateTime`]: common::DateTime
pub type CreationDateTime = DateTimeOf<(Enquiry, unit::Creation)>;

/// [`DateTime`] when an [`Enquiry`] was edited the last time.
///
/// [`DateTime`]: common::DateTime
pub type UpdateDateTime = DateTimeOf<(Enquiry, unit::Update)>;

#[cfg(test)]
mod spec {
    use super::{JobNumber, SortKey};

    fn key(s: &str) -> SortKey {
        JobNumber::new(s).unwrap().sort_key()
    }

    #[test]
    fn sort_key_parses_job_numbers() {
        assert_eq!(
            key("123.2"),
            SortKey::Numeric {
                major: 123,
                minor: 2,
            },
        );
        assert_eq!(key("123"), SortKey::Numeric { major: 123, minor: 0 });
        assert_eq!(key("abc"), SortKey::Text("abc".into()));
        assert_eq!(key("12a"), SortKey::Text("12a".into()));
        assert_eq!(key("12.x"), SortKey::Text("12.x".into()));
    }

    #[test]
    fn sort_key_orders_numeric_before_text_descending() {
        let mut numbers =
            ["abc", "7", "123.2", "zzz", "123.10", "124"].map(key);
        numbers.sort();

        assert_eq!(
            numbers,
            ["124", "123.10", "123.2", "7", "zzz", "abc"].map(key),
        );
    }
}
