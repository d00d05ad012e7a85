// gallery-backend/src/repository/image_repository.rs

use crate::db::DbPool;
use crate::domain::image_model::{self, ActiveModel as ImageActiveModel, Entity as ImageEntity};
use sea_orm::{entity::*, ConnectionTrait, DbErr, QueryFilter, QueryOrder, Set};

pub struct ImageRepository {
    db: DbPool,
}

impl ImageRepository {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// 画像URLを記録
    pub async fn create<C>(
        conn: &C,
        user_id: i32,
        image_url: String,
    ) -> Result<image_model::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let image = ImageActiveModel {
            user_id: Set(user_id),
            image_url: Set(image_url),
            ..Default::default()
        };

        image.insert(conn).await
    }

    /// 指定した投稿者の画像を挿入順（ID昇順）で取得
    pub async fn find_by_submitter_ids(
        &self,
        submitter_ids: Vec<i32>,
    ) -> Result<Vec<image_model::Model>, DbErr> {
        if submitter_ids.is_empty() {
            return Ok(Vec::new());
        }

        ImageEntity::find()
            .filter(image_model::Column::UserId.is_in(submitter_ids))
            .order_by_asc(image_model::Column::Id)
            .all(&self.db)
            .await
    }
}
