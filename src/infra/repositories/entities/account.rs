//! Account database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Account, AccountStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub full_name: String,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub phone: String,
    pub password_hash: String,
    pub dob: Date,
    pub status: String,
    pub accepted_terms: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
    /// Set once verification completes (NULL while pending)
    pub verified_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Account {
    fn from(model: Model) -> Self {
        Account {
            id: model.id,
            full_name: model.full_name,
            username: model.username,
            email: model.email,
            phone: model.phone,
            password_hash: model.password_hash,
            dob: model.dob,
            status: AccountStatus::from(model.status.as_str()),
            accepted_terms: model.accepted_terms,
            created_at: model.created_at,
            updated_at: model.updated_at,
            verified_at: model.verified_at,
        }
    }
}
