use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::Brand;

/// Read/update view of the brands table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "brands")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub logo_url: Option<String>,
    pub website: Option<String>,
    pub readiness_score: i32,
    pub ready_to_publish: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Brand {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            workspace_id: model.workspace_id,
            name: model.name,
            description: model.description,
            logo_url: model.logo_url,
            website: model.website,
            readiness_score: model.readiness_score,
            ready_to_publish: model.ready_to_publish,
            updated_at: model.updated_at.into(),
        }
    }
}
