use std::collections::HashSet;

use actix_web::{FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized, web::Data};
use futures::future::{Ready, ready};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::config::Config;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Role {
    Admin = 1,
    Hr = 2,
    Employee = 3,
    System = 4,
    ApiUser = 5,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Hr),
            3 => Some(Role::Employee),
            4 => Some(Role::System),
            5 => Some(Role::ApiUser),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    pub sub: String,
    pub role: u8,
    pub exp: usize,
    pub jti: String,

    /// Present only if this user is linked to a staff record
    pub staff_member_id: Option<u64>,
}

/// Who is asking. Passed explicitly into queries and handlers; the payroll
/// calculator and generator never read ambient identity state.
pub struct ActorContext {
    pub user_id: u64,
    pub username: String,
    pub roles: HashSet<Role>,

    /// Present only if this user is linked to a staff record
    pub staff_member_id: Option<u64>,
}

impl FromRequest for ActorContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = match req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
        {
            Some(t) => t,
            None => return ready(Err(ErrorUnauthorized("Missing token"))),
        };

        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => {
                return ready(Err(actix_web::error::ErrorInternalServerError(
                    "Config missing",
                )));
            }
        };

        let data = match decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            &Validation::default(),
        ) {
            Ok(d) => d,
            Err(_) => return ready(Err(ErrorUnauthorized("Invalid token"))),
        };

        let role = match Role::from_id(data.claims.role) {
            Some(r) => r,
            None => return ready(Err(ErrorUnauthorized("Invalid role"))),
        };

        ready(Ok(ActorContext {
            user_id: data.claims.user_id,
            username: data.claims.sub,
            roles: HashSet::from([role]),
            staff_member_id: data.claims.staff_member_id,
        }))
    }
}

impl ActorContext {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn require_admin(&self) -> actix_web::Result<()> {
        if self.has_role(Role::Admin) {
            Ok(())
        } else {
            Err(actix_web::error::ErrorForbidden("Admin only"))
        }
    }

    pub fn require_hr_or_admin(&self) -> actix_web::Result<()> {
        if self.has_role(Role::Admin) || self.has_role(Role::Hr) {
            Ok(())
        } else {
            Err(actix_web::error::ErrorForbidden("HR/Admin only"))
        }
    }

    /// Admin/HR see everyone; an employee only their own staff record.
    pub fn can_view(&self, staff_member_id: u64) -> bool {
        if self.has_role(Role::Admin) || self.has_role(Role::Hr) || self.has_role(Role::System) {
            return true;
        }
        self.staff_member_id == Some(staff_member_id)
    }
}
