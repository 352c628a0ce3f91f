//! Role-gated navigation.
//!
//! The gate is a pure function of the caller's [`SessionContext`] and the
//! section being requested. The context is resolved once per request and
//! passed in explicitly.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Staff,
    CallCenter,
    Supervisor,
    /// Recognized but not granted any section.
    Admin,
}

impl Role {
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "staff" => Some(Role::Staff),
            "callcenter" => Some(Role::CallCenter),
            "supervisor" => Some(Role::Supervisor),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Staff => "staff",
            Role::CallCenter => "callcenter",
            Role::Supervisor => "supervisor",
            Role::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Login,
    /// The default section: booking, editing and filtering appointments.
    Booking,
    Supervisor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub uid: String,
    pub display_name: String,
    pub email: String,
    /// `None` when the stored role is missing or unrecognized.
    pub role: Option<Role>,
}

impl Principal {
    /// Display name, falling back to the email address.
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.email
        } else {
            &self.display_name
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    principal: Option<Principal>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self { principal: None }
    }

    pub fn signed_in(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
        }
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(Section),
    Deny,
}

/// Where a role lands after sign-in. Roles without a section get `None`.
pub fn home_section(role: Option<Role>) -> Option<Section> {
    match role {
        Some(Role::Supervisor) => Some(Section::Supervisor),
        Some(Role::Staff) | Some(Role::CallCenter) => Some(Section::Booking),
        Some(Role::Admin) | None => None,
    }
}

pub fn authorize(ctx: &SessionContext, requested: Section) -> Access {
    let principal = match ctx.principal() {
        Some(principal) => principal,
        None if requested == Section::Login => return Access::Allow,
        None => return Access::Redirect(Section::Login),
    };

    match home_section(principal.role) {
        Some(home) if home == requested => Access::Allow,
        Some(home) => Access::Redirect(home),
        None => Access::Deny,
    }
}

/// Gate check for handlers: yields the principal or the matching access error.
pub fn require(ctx: &SessionContext, section: Section) -> Result<&Principal, AppError> {
    match authorize(ctx, section) {
        Access::Allow => ctx.principal().ok_or(AppError::Unauthenticated),
        Access::Redirect(Section::Login) => Err(AppError::Unauthenticated),
        Access::Redirect(home) => Err(AppError::Forbidden {
            redirect: Some(home),
        }),
        Access::Deny => Err(AppError::Forbidden { redirect: None }),
    }
}
