use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Prefix turning a role name into an authority token.
pub const ROLE_PREFIX: &str = "ROLE_";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "member_role")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberRole {
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    #[sea_orm(string_value = "USER")]
    User,
}

impl MemberRole {
    pub fn authority(&self) -> String {
        format!("{}{}", ROLE_PREFIX, self)
    }
}

/// A stored member. `password` holds an argon2 PHC string, never plaintext.
#[derive(Clone, PartialEq, Eq)]
pub struct Member {
    pub id: i32,
    pub email: String,
    pub password: String,
    pub roles: BTreeSet<MemberRole>,
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .field("roles", &self.roles)
            .finish()
    }
}

/// Input for registering a member. The password is plaintext here and is
/// hashed by [`crate::MemberService::register`].
#[derive(Clone)]
pub struct NewMember {
    pub email: String,
    pub password: String,
    pub roles: BTreeSet<MemberRole>,
}

impl NewMember {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        roles: impl IntoIterator<Item = MemberRole>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            roles: roles.into_iter().collect(),
        }
    }
}

impl fmt::Debug for NewMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewMember")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .field("roles", &self.roles)
            .finish()
    }
}

/// Member record as handed to a repository, password already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRecord {
    pub email: String,
    pub password_hash: String,
    pub roles: BTreeSet<MemberRole>,
}

/// Authenticated identity attached to a request.
///
/// Independent of any web framework: a login name, the stored credential
/// hash and the set of `ROLE_*` authorities. Authorities cannot be changed
/// once the principal is built.
#[derive(Clone, PartialEq, Eq)]
pub struct Principal {
    username: String,
    password_hash: String,
    authorities: BTreeSet<String>,
}

impl Principal {
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        roles: impl IntoIterator<Item = MemberRole>,
    ) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            authorities: roles.into_iter().map(|r| r.authority()).collect(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn authorities(&self) -> &BTreeSet<String> {
        &self.authorities
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }

    pub fn has_role(&self, role: MemberRole) -> bool {
        self.has_authority(&role.authority())
    }
}

impl From<&Member> for Principal {
    fn from(member: &Member) -> Self {
        Principal::new(&member.email, &member.password, member.roles.iter().copied())
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Principal")
            .field("username", &self.username)
            .field("password_hash", &"[redacted]")
            .field("authorities", &self.authorities)
            .finish()
    }
}

/// Emails are matched case-insensitively; this is the stored form.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
