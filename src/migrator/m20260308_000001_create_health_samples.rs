use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HealthSamples::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HealthSamples::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HealthSamples::UserId).integer().not_null())
                    .col(ColumnDef::new(HealthSamples::Metric).string().not_null())
                    .col(ColumnDef::new(HealthSamples::Value).double().not_null())
                    .col(ColumnDef::new(HealthSamples::Unit).string().not_null())
                    .col(ColumnDef::new(HealthSamples::Source).string().not_null())
                    .col(
                        ColumnDef::new(HealthSamples::Timestamp)
                            .date_time()
                            .not_null(),
                    )
                    .col(ColumnDef::new(HealthSamples::Metadata).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-health_sample-user_id")
                            .from(HealthSamples::Table, HealthSamples::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Stats queries filter by user, metric and trailing window
        manager
            .create_index(
                Index::create()
                    .name("idx-health_samples-user-metric-ts")
                    .table(HealthSamples::Table)
                    .col(HealthSamples::UserId)
                    .col(HealthSamples::Metric)
                    .col(HealthSamples::Timestamp)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HealthSamples::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum HealthSamples {
    Table,
    Id,
    UserId,
    Metric,
    Value,
    Unit,
    Source,
    Timestamp,
    Metadata,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
