//! User model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::validation::{validate_email, validate_password, validate_username};

/// Marketplace role; every role except `Client` is a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Client,
    #[serde(alias = "stylist")]
    Hairstylist,
    Barber,
    NailTech,
    MassageTherapist,
}

impl Role {
    /// Get the role name as stored and sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Hairstylist => "hairstylist",
            Role::Barber => "barber",
            Role::NailTech => "nail_tech",
            Role::MassageTherapist => "massage_therapist",
        }
    }

    pub fn is_provider(&self) -> bool {
        !matches!(self, Role::Client)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Role::Client),
            "hairstylist" | "stylist" => Ok(Role::Hairstylist),
            "barber" => Ok(Role::Barber),
            "nail_tech" => Ok(Role::NailTech),
            "massage_therapist" => Ok(Role::MassageTherapist),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// User entity as held by storage; carries the password hash
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn from_new(id: String, new_user: NewUser, now: DateTime<Utc>) -> Self {
        Self {
            id,
            username: new_user.username,
            password_hash: new_user.password_hash,
            email: new_user.email,
            full_name: new_user.full_name,
            role: new_user.role,
            profile_image: new_user.profile_image,
            bio: new_user.bio,
            location: new_user.location,
            city: new_user.city,
            state: new_user.state,
            created_at: now,
        }
    }

    /// Merge the provided profile fields
    pub fn apply(&mut self, changes: UpdateUser) {
        if let Some(full_name) = changes.full_name {
            self.full_name = full_name;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(profile_image) = changes.profile_image {
            self.profile_image = Some(profile_image);
        }
        if let Some(bio) = changes.bio {
            self.bio = Some(bio);
        }
        if let Some(location) = changes.location {
            self.location = Some(location);
        }
        if let Some(city) = changes.city {
            self.city = Some(city);
        }
        if let Some(state) = changes.state {
            self.state = Some(state);
        }
    }

    pub fn matches(&self, filter: &UserFilter) -> bool {
        if let Some(role) = filter.role {
            if self.role != role {
                return false;
            }
        }
        if filter.providers_only && !self.role.is_provider() {
            return false;
        }
        if let Some(city) = &filter.city {
            if !eq_ignore_case(self.city.as_deref(), city) {
                return false;
            }
        }
        if let Some(state) = &filter.state {
            if !eq_ignore_case(self.state.as_deref(), state) {
                return false;
            }
        }
        true
    }
}

fn eq_ignore_case(value: Option<&str>, wanted: &str) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case(wanted))
}

/// User as returned by the API; the password hash never leaves the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            profile_image: user.profile_image,
            bio: user.bio,
            location: user.location,
            city: user.city,
            state: user.state,
            created_at: user.created_at,
        }
    }
}

/// Minimal identity embedded in jobs and conversations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub full_name: String,
    pub username: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            full_name: user.full_name.clone(),
            username: user.username.clone(),
        }
    }
}

/// New user creation payload, password already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
    #[validate(custom(function = "validate_email"))]
    pub email: String,
    #[validate(length(min = 1, max = 120, message = "Full name is required"))]
    pub full_name: String,
    #[serde(default)]
    pub role: Role,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

impl RegisterRequest {
    /// Turn the request into a storable user once the password is hashed
    pub fn into_new_user(self, password_hash: String) -> NewUser {
        NewUser {
            username: self.username,
            password_hash,
            email: self.email,
            full_name: self.full_name,
            role: self.role,
            profile_image: self.profile_image,
            bio: self.bio,
            location: self.location,
            city: self.city,
            state: self.state,
        }
    }
}

/// User login credentials
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Profile update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 120))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[validate(custom(function = "validate_email"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// Equality filters for user listings
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub providers_only: bool,
    pub city: Option<String>,
    pub state: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(role: Role) -> User {
        User {
            id: "u1".to_string(),
            username: "jane".to_string(),
            password_hash: "hash".to_string(),
            email: "jane@example.com".to_string(),
            full_name: "Jane Doe".to_string(),
            role,
            profile_image: None,
            bio: None,
            location: Some("Austin, TX".to_string()),
            city: Some("Austin".to_string()),
            state: Some("TX".to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::NailTech).unwrap(), "\"nail_tech\"");
        let role: Role = serde_json::from_str("\"stylist\"").unwrap();
        assert_eq!(role, Role::Hairstylist);
        assert_eq!("massage_therapist".parse::<Role>(), Ok(Role::MassageTherapist));
        assert!("wizard".parse::<Role>().is_err());
        assert!(!Role::Client.is_provider());
        assert!(Role::Barber.is_provider());
    }

    #[test]
    fn public_user_hides_password() {
        let public = PublicUser::from(sample_user(Role::Client));
        let json = serde_json::to_value(&public).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password").is_none());
        assert_eq!(json["fullName"], "Jane Doe");
    }

    #[test]
    fn filter_matches_city_case_insensitively() {
        let user = sample_user(Role::Barber);
        let filter = UserFilter {
            providers_only: true,
            city: Some("austin".to_string()),
            ..Default::default()
        };
        assert!(user.matches(&filter));

        let filter = UserFilter {
            role: Some(Role::Hairstylist),
            ..Default::default()
        };
        assert!(!user.matches(&filter));
    }

    #[test]
    fn register_request_defaults_to_client() {
        let request: RegisterRequest = serde_json::from_value(serde_json::json!({
            "username": "jane",
            "password": "password123",
            "email": "jane@example.com",
            "fullName": "Jane Doe"
        }))
        .unwrap();
        assert_eq!(request.role, Role::Client);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn apply_only_touches_provided_fields() {
        let mut user = sample_user(Role::Client);
        user.apply(UpdateUser {
            bio: Some("Curly hair specialist".to_string()),
            ..Default::default()
        });
        assert_eq!(user.bio.as_deref(), Some("Curly hair specialist"));
        assert_eq!(user.full_name, "Jane Doe");
    }
}
