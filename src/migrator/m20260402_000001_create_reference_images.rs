use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EmotionReferenceImages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmotionReferenceImages::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EmotionReferenceImages::UserId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmotionReferenceImages::Emotion)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmotionReferenceImages::ImageData)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EmotionReferenceImages::Description).text())
                    .col(
                        ColumnDef::new(EmotionReferenceImages::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmotionReferenceImages::UpdatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-reference_image-user_id")
                            .from(
                                EmotionReferenceImages::Table,
                                EmotionReferenceImages::UserId,
                            )
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
            .drop_table(
                Table::drop()
                    .table(EmotionReferenceImages::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum EmotionReferenceImages {
    Table,
    Id,
    UserId,
    Emotion,
    ImageData,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
