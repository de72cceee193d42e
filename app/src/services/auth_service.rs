// app/src/services/auth_service.rs

//! Password hashing, registration rules and bearer-token issuance.

use crate::db::UserRepository;
use crate::errors::AppError;
use crate::models::{NewUser, User};
use argon2::{
  password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use storefront::UserId;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Hashes a plain-text password with Argon2 and a fresh random salt.
#[instrument(name = "auth_service::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String, AppError> {
  if password.is_empty() {
    return Err(AppError::Validation("Password cannot be empty.".to_string()));
  }

  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|argon_err| {
      error!(error = %argon_err, "Argon2 password hashing failed.");
      AppError::Internal(format!("Password hashing process failed: {}", argon_err))
    })
}

/// `Ok(false)` on a mismatch; `Err` only when the stored hash is unusable.
#[instrument(name = "auth_service::verify_password", skip_all, err(Display))]
pub fn verify_password(hashed_password_str: &str, provided_password: &str) -> Result<bool, AppError> {
  if provided_password.is_empty() {
    return Ok(false);
  }

  let parsed_hash = PasswordHash::new(hashed_password_str).map_err(|parse_err| {
    error!(error = %parse_err, "Failed to parse stored password hash string.");
    AppError::Internal(format!("Invalid stored password hash format: {}", parse_err))
  })?;

  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => {
      debug!("Password verification failed: Passwords do not match.");
      Ok(false)
    }
    Err(other_argon_err) => {
      error!(error = %other_argon_err, "Argon2 password verification process encountered an error.");
      Err(AppError::Internal(format!(
        "Password verification process failed: {}",
        other_argon_err
      )))
    }
  }
}

/// At least `MIN_PASSWORD_LEN` characters with one letter and one digit.
pub fn check_password_strength(password: &str) -> Result<(), AppError> {
  if password.chars().count() < MIN_PASSWORD_LEN {
    return Err(AppError::Validation(format!(
      "Password must be at least {} characters long.",
      MIN_PASSWORD_LEN
    )));
  }
  let has_letter = password.chars().any(char::is_alphabetic);
  let has_digit = password.chars().any(|c| c.is_ascii_digit());
  if !(has_letter && has_digit) {
    return Err(AppError::Validation(
      "Password must contain at least one letter and one digit.".to_string(),
    ));
  }
  Ok(())
}

/// Trims and lowercases `raw`, then checks it has the `local@domain.tld` shape.
pub fn normalize_email(raw: &str) -> Result<String, AppError> {
  let email = raw.trim().to_lowercase();
  let valid = match email.split_once('@') {
    Some((local, domain)) => {
      !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
    }
    None => false,
  };
  if !valid {
    return Err(AppError::Validation(format!("'{}' is not a valid email address.", raw.trim())));
  }
  Ok(email)
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
  sub: String,
  exp: i64,
  iat: i64,
  jti: String,
}

/// Issues and verifies HS256 bearer tokens carrying the user id in `sub`.
pub struct TokenIssuer {
  encoding_key: EncodingKey,
  decoding_key: DecodingKey,
  ttl: Duration,
}

impl TokenIssuer {
  pub fn new(secret: &str, ttl: Duration) -> Self {
    Self {
      encoding_key: EncodingKey::from_secret(secret.as_bytes()),
      decoding_key: DecodingKey::from_secret(secret.as_bytes()),
      ttl,
    }
  }

  pub fn issue(&self, user_id: UserId) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = TokenClaims {
      sub: user_id.to_string(),
      exp: (now + self.ttl).timestamp(),
      iat: now.timestamp(),
      jti: Uuid::new_v4().to_string(),
    };
    encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
      .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
  }

  pub fn verify(&self, token: &str) -> Result<UserId, AppError> {
    let validation = Validation::new(Algorithm::HS256);
    let token_data = decode::<TokenClaims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
      ErrorKind::ExpiredSignature => AppError::Auth("Token has expired.".to_string()),
      _ => AppError::Auth(format!("Invalid token: {}", e)),
    })?;

    let user_id = token_data
      .claims
      .sub
      .parse::<i64>()
      .map(UserId)
      .map_err(|_| AppError::Auth("Token subject is not a user id.".to_string()))?;
    if !user_id.is_valid() {
      return Err(AppError::Auth("Token subject is not a user id.".to_string()));
    }
    Ok(user_id)
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterPayload {
  pub email: String,
  pub password: String,
  pub name: String,
}

#[instrument(name = "auth_service::register", skip(users, payload), err(Display))]
pub async fn register(users: &dyn UserRepository, payload: RegisterPayload, as_admin: bool) -> Result<User, AppError> {
  let email = normalize_email(&payload.email)?;
  let name = payload.name.trim().to_string();
  if name.is_empty() {
    return Err(AppError::Validation("Name is required.".to_string()));
  }
  check_password_strength(&payload.password)?;

  let password_hash = hash_password(&payload.password)?;
  let created = users
    .create(NewUser {
      email,
      name,
      password_hash,
      is_admin: as_admin,
    })
    .await?;

  match created {
    Some(user) => {
      info!(user_id = %user.id, "User registered.");
      Ok(user)
    }
    None => {
      warn!("Registration rejected: email already registered.");
      Err(AppError::Conflict("User with email already exists".to_string()))
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginPayload {
  pub email: String,
  pub password: String,
}

/// Returns a signed token for valid credentials.
#[instrument(name = "auth_service::login", skip_all, err(Display))]
pub async fn login(users: &dyn UserRepository, tokens: &TokenIssuer, payload: LoginPayload) -> Result<String, AppError> {
  let email = payload.email.trim().to_lowercase();
  let user = users
    .find_by_email(&email)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

  if !verify_password(&user.password_hash, &payload.password)? {
    warn!(user_id = %user.id, "Login rejected: wrong password.");
    return Err(AppError::Auth("Invalid credentials".to_string()));
  }

  let token = tokens.issue(user.id)?;
  info!(user_id = %user.id, "User logged in.");
  Ok(token)
}
