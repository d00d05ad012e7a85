// gallery-backend/src/repository/submitter_repository.rs

use crate::db::DbPool;
use crate::domain::submitter_model::{
    self, ActiveModel as SubmitterActiveModel, Entity as SubmitterEntity,
};
use sea_orm::{entity::*, ConnectionTrait, DbErr, QueryOrder, Set};

pub struct SubmitterRepository {
    db: DbPool,
}

impl SubmitterRepository {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// 新しい投稿者を作成（トランザクション内からも呼べるよう接続を受け取る）
    pub async fn create<C>(
        conn: &C,
        name: String,
        social_handle: String,
    ) -> Result<submitter_model::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let submitter = SubmitterActiveModel {
            name: Set(name),
            social_handle: Set(social_handle),
            ..Default::default()
        };

        submitter.insert(conn).await
    }

    /// 作成日時の新しい順（同時刻は ID の大きい順）で全件取得
    pub async fn find_all_newest_first(&self) -> Result<Vec<submitter_model::Model>, DbErr> {
        SubmitterEntity::find()
            .order_by_desc(submitter_model::Column::CreatedAt)
            .order_by_desc(submitter_model::Column::Id)
            .all(&self.db)
            .await
    }
}
