use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Insights::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Insights::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Insights::UserId).integer().not_null())
                    .col(ColumnDef::new(Insights::InsightType).string().not_null())
                    .col(ColumnDef::new(Insights::Title).string().not_null())
                    .col(ColumnDef::new(Insights::Description).text().not_null())
                    .col(ColumnDef::new(Insights::Date).date_time().not_null())
                    .col(ColumnDef::new(Insights::UpdatedDate).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-insight-user_id")
                            .from(Insights::Table, Insights::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Insights::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Insights {
    Table,
    Id,
    UserId,
    InsightType,
    Title,
    Description,
    Date,
    UpdatedDate,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
