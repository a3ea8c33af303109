//! `SeaORM` Entity for user_investments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "user_investments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    #[sea_orm(unique)]
    pub goal_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub percentage_debt: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub percentage_equity: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_goals::Entity",
        from = "Column::GoalId",
        to = "super::user_goals::Column::Id",
        on_delete = "Cascade"
    )]
    UserGoals,
}

impl Related<super::user_goals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserGoals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
