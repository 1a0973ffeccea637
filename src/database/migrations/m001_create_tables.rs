use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Datasets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Datasets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Datasets::Filename).string().not_null())
                    .col(
                        ColumnDef::new(Datasets::Fingerprint)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Datasets::TotalEquipmentCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Datasets::AvgFlowrate).double())
                    .col(ColumnDef::new(Datasets::AvgPressure).double())
                    .col(ColumnDef::new(Datasets::AvgTemperature).double())
                    .col(
                        ColumnDef::new(Datasets::FileSize)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Datasets::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_datasets_created_at")
                    .table(Datasets::Table)
                    .col(Datasets::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EquipmentRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EquipmentRecords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EquipmentRecords::DatasetId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EquipmentRecords::EquipmentName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EquipmentRecords::EquipmentType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EquipmentRecords::Flowrate).double().not_null())
                    .col(ColumnDef::new(EquipmentRecords::Pressure).double().not_null())
                    .col(
                        ColumnDef::new(EquipmentRecords::Temperature)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EquipmentRecords::SequenceIndex)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_equipment_records_dataset_id")
                            .from(EquipmentRecords::Table, EquipmentRecords::DatasetId)
                            .to(Datasets::Table, Datasets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_equipment_records_dataset_sequence")
                    .table(EquipmentRecords::Table)
                    .col(EquipmentRecords::DatasetId)
                    .col(EquipmentRecords::SequenceIndex)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TypeSummaries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TypeSummaries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TypeSummaries::DatasetId).integer().not_null())
                    .col(
                        ColumnDef::new(TypeSummaries::EquipmentType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TypeSummaries::Position).integer().not_null())
                    .col(ColumnDef::new(TypeSummaries::Count).integer().not_null())
                    .col(ColumnDef::new(TypeSummaries::AvgFlowrate).double().not_null())
                    .col(ColumnDef::new(TypeSummaries::MinFlowrate).double().not_null())
                    .col(ColumnDef::new(TypeSummaries::MaxFlowrate).double().not_null())
                    .col(ColumnDef::new(TypeSummaries::AvgPressure).double().not_null())
                    .col(ColumnDef::new(TypeSummaries::MinPressure).double().not_null())
                    .col(ColumnDef::new(TypeSummaries::MaxPressure).double().not_null())
                    .col(
                        ColumnDef::new(TypeSummaries::AvgTemperature)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TypeSummaries::MinTemperature)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TypeSummaries::MaxTemperature)
                            .double()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_type_summaries_dataset_id")
                            .from(TypeSummaries::Table, TypeSummaries::DatasetId)
                            .to(Datasets::Table, Datasets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_type_summaries_dataset_type")
                    .table(TypeSummaries::Table)
                    .col(TypeSummaries::DatasetId)
                    .col(TypeSummaries::EquipmentType)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TypeSummaries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EquipmentRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Datasets::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Datasets {
    Table,
    Id,
    Filename,
    Fingerprint,
    TotalEquipmentCount,
    AvgFlowrate,
    AvgPressure,
    AvgTemperature,
    FileSize,
    CreatedAt,
}

#[derive(Iden)]
enum EquipmentRecords {
    Table,
    Id,
    DatasetId,
    EquipmentName,
    EquipmentType,
    Flowrate,
    Pressure,
    Temperature,
    SequenceIndex,
}

#[derive(Iden)]
enum TypeSummaries {
    Table,
    Id,
    DatasetId,
    EquipmentType,
    Position,
    Count,
    AvgFlowrate,
    MinFlowrate,
    MaxFlowrate,
    AvgPressure,
    MinPressure,
    MaxPressure,
    AvgTemperature,
    MinTemperature,
    MaxTemperature,
}
