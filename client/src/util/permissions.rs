//! Role hierarchy and route requirements.
//!
//! This is view gating only. The API enforces access on its own; a user who
//! edits these checks in the browser still gets 403s from the server.

#[cfg(test)]
#[path = "permissions_test.rs"]
mod permissions_test;

/// Known roles in ascending order of privilege.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Role {
    User,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "user" => Some(Self::User),
            "admin" => Some(Self::Admin),
            "super_admin" => Some(Self::SuperAdmin),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }

    pub fn level(self) -> u8 {
        match self {
            Self::User => 1,
            Self::Admin => 2,
            Self::SuperAdmin => 3,
        }
    }
}

/// Level of a role name; unknown names rank at 0.
pub fn role_level(name: &str) -> u8 {
    Role::parse(name).map_or(0, Role::level)
}

/// Whether the highest role in `roles` reaches `required`.
///
/// An empty role set ranks at 0. An unrecognized `required` name also ranks
/// at 0, so every user satisfies it.
pub fn has_permission<S: AsRef<str>>(roles: &[S], required: &str) -> bool {
    let held = roles.iter().map(|r| role_level(r.as_ref())).max().unwrap_or(0);
    held >= role_level(required)
}

/// Minimum role for a path, matched by prefix.
pub fn required_role(path: &str) -> Option<&'static str> {
    if path.starts_with("/admin") {
        Some(Role::Admin.as_str())
    } else if path.starts_with("/dashboard") {
        Some(Role::User.as_str())
    } else {
        None
    }
}
