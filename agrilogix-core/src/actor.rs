use crate::{CoreError, CoreResult};
use agrilogix_shared::pii::Masked;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Platform roles
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Farmer,
    Buyer,
    Driver,
    ColdStorage,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Farmer => "farmer",
            Role::Buyer => "buyer",
            Role::Driver => "driver",
            Role::ColdStorage => "cold_storage",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "farmer" => Ok(Role::Farmer),
            "buyer" => Ok(Role::Buyer),
            "driver" => Ok(Role::Driver),
            "cold_storage" => Ok(Role::ColdStorage),
            "admin" => Ok(Role::Admin),
            other => Err(CoreError::ValidationError(format!(
                "Unknown role: {}",
                other
            ))),
        }
    }
}

/// The authenticated caller of a ledger operation. Every mutation takes one of
/// these explicitly; there is no ambient current-user state.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
    pub display_name: String,
    pub phone: Option<Masked<String>>,
}

impl Actor {
    pub fn new(id: Uuid, role: Role, display_name: impl Into<String>) -> Self {
        Self {
            id,
            role,
            display_name: display_name.into(),
            phone: None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Require an exact role. Admins do not bypass this; operations that admit
    /// admins list the role explicitly via `require_any`.
    pub fn require_role(&self, role: Role) -> CoreResult<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(CoreError::Forbidden(format!(
                "Requires {} role, caller is {}",
                role, self.role
            )))
        }
    }

    pub fn require_any(&self, roles: &[Role]) -> CoreResult<()> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(CoreError::Forbidden(format!(
                "Requires one of {:?}, caller is {}",
                roles, self.role
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trip() {
        for s in ["farmer", "buyer", "driver", "cold_storage", "admin"] {
            let role: Role = s.parse().unwrap();
            assert_eq!(role.as_str(), s);
        }
        assert!("middleman".parse::<Role>().is_err());
    }

    #[test]
    fn require_role_rejects_mismatch() {
        let buyer = Actor::new(Uuid::new_v4(), Role::Buyer, "Nairobi Fresh Market");
        assert!(buyer.require_role(Role::Buyer).is_ok());
        assert!(matches!(
            buyer.require_role(Role::Farmer),
            Err(CoreError::Forbidden(_))
        ));
    }

    #[test]
    fn require_any_admits_listed_roles() {
        let admin = Actor::new(Uuid::new_v4(), Role::Admin, "Platform Ops");
        assert!(admin.require_any(&[Role::Farmer, Role::Admin]).is_ok());
        assert!(admin.require_any(&[Role::Driver]).is_err());
    }
}
