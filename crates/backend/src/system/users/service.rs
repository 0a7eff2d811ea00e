use anyhow::Result;
use chrono::Utc;
use contracts::system::users::{CreateUserDto, User};

use super::repository;
use crate::system::auth::password;

/// Create a new user with a hashed password.
pub async fn create(dto: CreateUserDto) -> Result<String> {
    if dto.username.trim().is_empty() {
        return Err(anyhow::anyhow!("Username cannot be empty"));
    }
    if repository::get_by_username(&dto.username).await?.is_some() {
        return Err(anyhow::anyhow!("Username already exists"));
    }

    password::validate_password_strength(&dto.password)?;
    let password_hash = password::hash_password(&dto.password)?;

    let user_id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    let user = User {
        id: user_id.clone(),
        username: dto.username,
        full_name: dto.full_name,
        role: dto.role,
        is_active: true,
        created_at: now.clone(),
        updated_at: now,
        last_login_at: None,
    };

    repository::create_with_password(&user, &password_hash).await?;

    Ok(user_id)
}

pub async fn get_by_id(id: &str) -> Result<Option<User>> {
    repository::get_by_id(id).await
}

/// Check username/password; returns the user when both match and the
/// account is active, None otherwise.
pub async fn verify_credentials(username: &str, raw_password: &str) -> Result<Option<User>> {
    let user = match repository::get_by_username(username).await? {
        Some(u) if u.is_active => u,
        _ => return Ok(None),
    };

    let hash = match repository::get_password_hash(&user.id).await? {
        Some(h) => h,
        None => return Ok(None),
    };

    if !password::verify_password(raw_password, &hash)? {
        return Ok(None);
    }

    repository::touch_last_login(&user.id, &Utc::now().to_rfc3339()).await?;

    Ok(Some(user))
}
