//! Authenticated actors: user identifiers, roles, and the request principal.
//!
//! Identity is supplied by an external provider. The domain only relies on a
//! stable [`UserId`], a display name to snapshot onto rides, and the set of
//! [`Role`]s the principal holds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Error;

/// Validation errors raised while building identity values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrincipalValidationError {
    /// Identifier was empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// Identifier was not a canonical UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// Role name was not recognised.
    #[error("unknown role `{0}`; expected rider or driver")]
    UnknownRole(String),
    /// Display name was blank.
    #[error("display name must not be empty")]
    EmptyDisplayName,
}

/// Stable user identifier.
///
/// # Examples
/// ```
/// use ride_dispatch::domain::UserId;
///
/// let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
/// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    ///
    /// # Errors
    ///
    /// Returns [`PrincipalValidationError`] when the input is empty, padded,
    /// or not a UUID.
    pub fn new(id: impl AsRef<str>) -> Result<Self, PrincipalValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    #[must_use]
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, PrincipalValidationError> {
        if id.is_empty() {
            return Err(PrincipalValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(PrincipalValidationError::InvalidId);
        }
        let parsed = Uuid::parse_str(&id).map_err(|_| PrincipalValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = PrincipalValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Role a principal may act in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Requests, cancels, pays for and rates rides.
    Rider,
    /// Accepts and completes rides, reports location.
    Driver,
}

impl Role {
    /// Lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rider => "rider",
            Self::Driver => "driver",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = PrincipalValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "rider" => Ok(Self::Rider),
            "driver" => Ok(Self::Driver),
            _ => Err(PrincipalValidationError::UnknownRole(value.to_owned())),
        }
    }
}

/// A ride participant as recorded on the ride: identifier plus the display
/// name captured when they joined it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Participant identifier.
    pub id: UserId,
    /// Display name snapshot.
    pub display_name: String,
}

/// The authenticated actor invoking an operation.
///
/// ## Invariants
/// - `display_name` is non-empty once trimmed.
///
/// # Examples
/// ```
/// use ride_dispatch::domain::{Principal, Role, UserId};
///
/// let rider = Principal::new(UserId::random(), "Ada", [Role::Rider]).expect("valid principal");
/// assert!(rider.has_role(Role::Rider));
/// assert!(rider.require_role(Role::Driver).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    user_id: UserId,
    display_name: String,
    roles: Vec<Role>,
}

impl Principal {
    /// Build a principal from validated parts.
    ///
    /// # Errors
    ///
    /// Returns [`PrincipalValidationError::EmptyDisplayName`] for blank names.
    pub fn new(
        user_id: UserId,
        display_name: impl Into<String>,
        roles: impl IntoIterator<Item = Role>,
    ) -> Result<Self, PrincipalValidationError> {
        let display_name = display_name.into().trim().to_owned();
        if display_name.is_empty() {
            return Err(PrincipalValidationError::EmptyDisplayName);
        }
        let mut roles: Vec<Role> = roles.into_iter().collect();
        roles.sort_by_key(|role| role.as_str());
        roles.dedup();
        Ok(Self {
            user_id,
            display_name,
            roles,
        })
    }

    /// Principal identifier.
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Display name supplied by the identity provider.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Roles held by the principal.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Whether the principal holds `role`.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Fail with [`super::ErrorCode::Unauthorized`] unless the principal
    /// holds `role`.
    ///
    /// # Errors
    ///
    /// Returns an unauthorized [`Error`] naming the missing role.
    pub fn require_role(&self, role: Role) -> Result<(), Error> {
        if self.has_role(role) {
            Ok(())
        } else {
            Err(Error::unauthorized(format!("{role} role required")))
        }
    }

    /// Snapshot of the principal as a ride participant.
    #[must_use]
    pub fn as_participant(&self) -> Participant {
        Participant {
            id: self.user_id.clone(),
            display_name: self.display_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for identity primitives.

    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    #[rstest]
    #[case("", PrincipalValidationError::EmptyId)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", PrincipalValidationError::InvalidId)]
    #[case("not-a-uuid", PrincipalValidationError::InvalidId)]
    fn user_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: PrincipalValidationError) {
        assert_eq!(UserId::new(raw), Err(expected));
    }

    #[rstest]
    #[case("rider", Role::Rider)]
    #[case("Driver", Role::Driver)]
    fn role_parses_case_insensitively(#[case] raw: &str, #[case] expected: Role) {
        assert_eq!(raw.parse::<Role>(), Ok(expected));
    }

    #[rstest]
    fn role_rejects_unknown_names() {
        assert!(matches!(
            "admin".parse::<Role>(),
            Err(PrincipalValidationError::UnknownRole(_))
        ));
    }

    #[rstest]
    fn principal_rejects_blank_display_name() {
        let result = Principal::new(UserId::random(), "  ", [Role::Rider]);
        assert_eq!(result, Err(PrincipalValidationError::EmptyDisplayName));
    }

    #[rstest]
    fn principal_deduplicates_roles() {
        let principal = Principal::new(
            UserId::random(),
            "Sam",
            [Role::Driver, Role::Rider, Role::Driver],
        )
        .expect("valid principal");
        assert_eq!(principal.roles(), &[Role::Driver, Role::Rider]);
    }

    #[rstest]
    fn require_role_reports_unauthorized() {
        let principal = Principal::new(UserId::random(), "Sam", [Role::Rider]).expect("principal");
        let error = principal
            .require_role(Role::Driver)
            .expect_err("driver role missing");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }
}
