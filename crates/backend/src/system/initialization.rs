use anyhow::Result;
use contracts::system::users::CreateUserDto;

use crate::system::users::{repository, service};

/// Seed the default admin account when the user table is empty.
pub async fn ensure_admin_user_exists() -> Result<()> {
    let count = repository::count_users().await?;

    if count == 0 {
        tracing::info!("No users found. Creating default admin user...");

        let admin_dto = CreateUserDto {
            username: "admin".to_string(),
            password: "admin".to_string(),
            full_name: Some("Administrator".to_string()),
            role: "admin".to_string(),
        };

        let admin_id = service::create(admin_dto).await?;

        tracing::warn!("Default admin user created (username: admin, password: admin)");
        tracing::warn!("User ID: {} — change the password immediately!", admin_id);
    }

    Ok(())
}
