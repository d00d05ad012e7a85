// gallery-backend/src/domain/submitter_model.rs

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 投稿者エンティティ（作成後は変更・削除しない）
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub social_handle: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::image_model::Entity")]
    Images,
}

impl Related<super::image_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
}

// created_at はデータベースの DEFAULT CURRENT_TIMESTAMP で設定する
impl ActiveModelBehavior for ActiveModel {}
