use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Dashboard roles. Admin passes every module gate; everyone may read.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
pub enum Role {
    Admin = 1,
    Hr = 2,
    Finance = 3,
    Procurement = 4,
    Sales = 5,
    Viewer = 6,
}

impl Role {
    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Hr),
            3 => Some(Role::Finance),
            4 => Some(Role::Procurement),
            5 => Some(Role::Sales),
            6 => Some(Role::Viewer),
            _ => None,
        }
    }

    pub fn id(self) -> i64 {
        self as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for role in [
            Role::Admin,
            Role::Hr,
            Role::Finance,
            Role::Procurement,
            Role::Sales,
            Role::Viewer,
        ] {
            assert_eq!(Role::from_id(role.id()), Some(role));
        }
        assert_eq!(Role::from_id(0), None);
        assert_eq!(Role::from_id(7), None);
    }
}
