use anyhow::Result;
use sea_orm::*;
use tracing::info;

use crate::database::entities::datasets;
use crate::ingest;
use crate::services::{DatasetService, IngestOutcome};

pub const SAMPLE_FILENAME: &str = "sample_equipment.csv";

/// Bundled demonstration dataset
pub const SAMPLE_CSV: &str = include_str!("sample_equipment.csv");

/// Ingest the bundled sample unless an identical upload is already stored
pub async fn seed_sample_dataset(service: &DatasetService, db: &DatabaseConnection) -> Result<Option<IngestOutcome>> {
    let fingerprint = ingest::fingerprint(SAMPLE_CSV.as_bytes());
    let existing = datasets::Entity::find()
        .filter(datasets::Column::Fingerprint.eq(fingerprint.to_hex()))
        .one(db)
        .await?;

    if let Some(dataset) = existing {
        info!("Sample dataset already present as {}, skipping seed", dataset.id);
        return Ok(None);
    }

    let outcome = service.ingest(SAMPLE_FILENAME, SAMPLE_CSV.as_bytes()).await?;
    info!("Seeded sample dataset {}", outcome.dataset.id);
    Ok(Some(outcome))
}
