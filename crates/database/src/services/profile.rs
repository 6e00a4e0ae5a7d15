use crate::{
    entities::{profiles, users},
    error::ServiceError,
};
use chrono::Utc;
use log::info;
use models::role::Role;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait};
use uuid::Uuid;

pub struct ProfileService;

impl ProfileService {
    pub async fn get(
        db: &DatabaseConnection,
        user_id: Uuid,
    ) -> Result<profiles::Model, ServiceError> {
        profiles::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("profile"))
    }

    pub async fn set_role(
        db: &DatabaseConnection,
        user_id: Uuid,
        role: Role,
    ) -> Result<profiles::Model, ServiceError> {
        let mut active: profiles::ActiveModel = Self::get(db, user_id).await?.into();
        active.role = Set(role);
        active.updated_at = Set(Utc::now().naive_utc());

        Ok(active.update(db).await?)
    }

    /// Makes `user` an admin when its email is in `admin_emails`. Returns
    /// whether the role changed. Nobody is ever demoted here.
    pub async fn promote_if_listed(
        db: &DatabaseConnection,
        user: &users::Model,
        admin_emails: &[String],
    ) -> Result<bool, ServiceError> {
        if !admin_emails.contains(&user.email) {
            return Ok(false);
        }

        let profile = Self::get(db, user.id).await?;
        if profile.role.is_admin() {
            return Ok(false);
        }

        Self::set_role(db, user.id, Role::Admin).await?;
        info!("Promoted user {} to admin", user.id);
        Ok(true)
    }
}
