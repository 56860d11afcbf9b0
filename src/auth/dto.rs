use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::User;

/// Request body for signup and login.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Identity envelope returned by signup and login. Password hash and
/// anything else internal never appear here.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityBody {
    pub email: String,
    pub id: Uuid,
    pub access_token: String,
}

impl From<User> for IdentityBody {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            id: user.id,
            access_token: user.access_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_body_is_camel_case_and_hash_free() {
        let body = IdentityBody {
            email: "a@x.com".into(),
            id: Uuid::new_v4(),
            access_token: "tok".into(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["email"], "a@x.com");
        assert_eq!(json["accessToken"], "tok");
        assert!(json.get("password_hash").is_none());
        assert!(json.get("passwordHash").is_none());
    }
}
