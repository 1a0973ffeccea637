use indexmap::IndexMap;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;

use crate::database::entities::{datasets, equipment_records, type_summaries};
use crate::errors::{DatasetError, DatasetResult, IngestError, IngestResult};
use crate::ingest::retention::{self, DatasetAge};
use crate::ingest::{self, EquipmentRecord, Fingerprint, TypeSummary};

const RECORD_BATCH_SIZE: usize = 500;

/// Largest page a caller may request from [`DatasetService::records_page`]
pub const MAX_PAGE_SIZE: u64 = 1000;

/// Result of a successful ingestion
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub dataset: datasets::Model,
    pub type_summaries: Vec<type_summaries::Model>,
    /// Datasets removed by the retention policy, ascending
    pub evicted: Vec<i32>,
}

/// A dataset with everything it owns, records ordered by sequence index
#[derive(Debug, Clone)]
pub struct DatasetDetail {
    pub dataset: datasets::Model,
    pub records: Vec<equipment_records::Model>,
    pub type_summaries: Vec<type_summaries::Model>,
}

/// One page of equipment records
#[derive(Debug, Clone)]
pub struct RecordPage {
    pub count: u64,
    pub page: u64,
    pub page_size: u64,
    pub results: Vec<equipment_records::Model>,
}

/// Summary statistics as served to charts and tables
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DatasetSummary {
    pub dataset_id: i32,
    pub filename: String,
    pub total_count: i32,
    pub avg_flowrate: Option<f64>,
    pub avg_pressure: Option<f64>,
    pub avg_temperature: Option<f64>,
    /// Record count per type, in first-seen order
    pub equipment_type_distribution: IndexMap<String, i32>,
    pub min_flowrate: Option<f64>,
    pub max_flowrate: Option<f64>,
    pub min_pressure: Option<f64>,
    pub max_pressure: Option<f64>,
    pub min_temperature: Option<f64>,
    pub max_temperature: Option<f64>,
}

/// Service for ingesting, reading and deleting datasets
#[derive(Clone)]
pub struct DatasetService {
    db: DatabaseConnection,
    max_datasets: usize,
}

impl DatasetService {
    pub fn new(db: DatabaseConnection, max_datasets: usize) -> Self {
        Self { db, max_datasets }
    }

    pub fn max_datasets(&self) -> usize {
        self.max_datasets
    }

    /// Ingest an upload as one unit of work.
    ///
    /// The duplicate check runs before validation. Dataset, records, type
    /// summaries and retention evictions are written in a single transaction;
    /// any error drops the transaction and leaves the store untouched.
    #[instrument(skip(self, raw), fields(bytes = raw.len()))]
    pub async fn ingest(&self, filename: &str, raw: &[u8]) -> IngestResult<IngestOutcome> {
        let fingerprint = ingest::fingerprint(raw);
        if self.fingerprint_exists(&fingerprint).await? {
            warn!("Rejected duplicate upload {} ({})", filename, fingerprint);
            return Err(IngestError::DuplicateContent {
                fingerprint: fingerprint.to_hex(),
            });
        }

        let analysis = ingest::analyze(raw).inspect_err(|e| {
            warn!("Rejected upload {}: {}", filename, e);
        })?;
        let stats = &analysis.aggregate.dataset;
        debug!(
            "Validated {} records across {} types",
            stats.total_count,
            analysis.aggregate.types.len()
        );

        let txn = self.db.begin().await?;

        let dataset = datasets::ActiveModel {
            filename: Set(filename.to_string()),
            fingerprint: Set(fingerprint.to_hex()),
            total_equipment_count: Set(stats.total_count as i32),
            avg_flowrate: Set(stats.avg_flowrate()),
            avg_pressure: Set(stats.avg_pressure()),
            avg_temperature: Set(stats.avg_temperature()),
            file_size: Set(raw.len() as i64),
            ..datasets::ActiveModel::new()
        };
        let dataset = datasets::Entity::insert(dataset)
            .exec_with_returning(&txn)
            .await
            .map_err(|e| duplicate_or_failure(e, &fingerprint))?;

        insert_records(&txn, dataset.id, &analysis.records).await?;
        let summaries = insert_type_summaries(
            &txn,
            dataset.id,
            analysis.aggregate.types.values(),
        )
        .await?;

        let evicted = self.apply_retention(&txn, dataset.id).await?;

        txn.commit().await?;

        info!(
            "Ingested dataset {} from {} ({} records, {} evicted)",
            dataset.id,
            filename,
            dataset.total_equipment_count,
            evicted.len()
        );

        Ok(IngestOutcome {
            dataset,
            type_summaries: summaries,
            evicted,
        })
    }

    async fn fingerprint_exists(&self, fingerprint: &Fingerprint) -> Result<bool, DbErr> {
        let count = datasets::Entity::find()
            .filter(datasets::Column::Fingerprint.eq(fingerprint.to_hex()))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    /// Evict everything beyond the configured capacity; `newest` is kept
    /// unless the capacity is zero
    async fn apply_retention<C>(&self, conn: &C, newest: i32) -> Result<Vec<i32>, DbErr>
    where
        C: ConnectionTrait,
    {
        let ages = datasets::Entity::find()
            .all(conn)
            .await?
            .into_iter()
            .map(|d| DatasetAge {
                id: d.id,
                created_at: d.created_at,
            })
            .collect();

        let ranked = retention::rank_after_insert(newest, ages);
        let evicted: Vec<i32> = retention::enforce(&ranked, self.max_datasets)
            .into_iter()
            .collect();

        if !evicted.is_empty() {
            delete_datasets(conn, &evicted).await?;
            info!("Retention evicted datasets {:?}", evicted);
        }

        Ok(evicted)
    }

    /// Datasets newest first
    pub async fn list(&self, limit: Option<u64>) -> DatasetResult<Vec<datasets::Model>> {
        let mut query = datasets::Entity::find()
            .order_by_desc(datasets::Column::CreatedAt)
            .order_by_desc(datasets::Column::Id);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        Ok(query.all(&self.db).await?)
    }

    pub async fn get(&self, id: i32) -> DatasetResult<datasets::Model> {
        datasets::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DatasetError::NotFound(id))
    }

    /// All records of a dataset ordered by sequence index
    pub async fn records(&self, id: i32) -> DatasetResult<Vec<equipment_records::Model>> {
        self.get(id).await?;
        Ok(equipment_records::Entity::find()
            .filter(equipment_records::Column::DatasetId.eq(id))
            .order_by_asc(equipment_records::Column::SequenceIndex)
            .all(&self.db)
            .await?)
    }

    /// One page of records; `page` is 1-based
    pub async fn records_page(&self, id: i32, page: u64, page_size: u64) -> DatasetResult<RecordPage> {
        self.get(id).await?;
        let page = page.max(1);
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);

        let paginator = equipment_records::Entity::find()
            .filter(equipment_records::Column::DatasetId.eq(id))
            .order_by_asc(equipment_records::Column::SequenceIndex)
            .paginate(&self.db, page_size);

        let count = paginator.num_items().await?;
        let results = paginator.fetch_page(page - 1).await?;

        Ok(RecordPage {
            count,
            page,
            page_size,
            results,
        })
    }

    /// Type summaries in first-seen order
    pub async fn type_summaries(&self, id: i32) -> DatasetResult<Vec<type_summaries::Model>> {
        self.get(id).await?;
        Ok(type_summaries::Entity::find()
            .filter(type_summaries::Column::DatasetId.eq(id))
            .order_by_asc(type_summaries::Column::Position)
            .all(&self.db)
            .await?)
    }

    pub async fn detail(&self, id: i32) -> DatasetResult<DatasetDetail> {
        let dataset = self.get(id).await?;
        let records = self.records(id).await?;
        let type_summaries = self.type_summaries(id).await?;
        Ok(DatasetDetail {
            dataset,
            records,
            type_summaries,
        })
    }

    /// Totals, means, type distribution and dataset-wide min/max.
    ///
    /// Min and max are taken over the per-type summaries, which cover every
    /// record of the dataset.
    pub async fn summary(&self, id: i32) -> DatasetResult<DatasetSummary> {
        let dataset = self.get(id).await?;
        let summaries = self.type_summaries(id).await?;
        Ok(summarize(&dataset, &summaries))
    }

    /// Explicitly delete a dataset and everything it owns
    pub async fn delete(&self, id: i32) -> DatasetResult<()> {
        self.get(id).await?;
        let txn = self.db.begin().await?;
        delete_datasets(&txn, &[id]).await?;
        txn.commit().await?;
        info!("Deleted dataset {}", id);
        Ok(())
    }
}

pub(crate) fn summarize(
    dataset: &datasets::Model,
    summaries: &[type_summaries::Model],
) -> DatasetSummary {
    let min_of = |f: fn(&type_summaries::Model) -> f64| {
        summaries.iter().map(f).reduce(f64::min)
    };
    let max_of = |f: fn(&type_summaries::Model) -> f64| {
        summaries.iter().map(f).reduce(f64::max)
    };

    DatasetSummary {
        dataset_id: dataset.id,
        filename: dataset.filename.clone(),
        total_count: dataset.total_equipment_count,
        avg_flowrate: dataset.avg_flowrate,
        avg_pressure: dataset.avg_pressure,
        avg_temperature: dataset.avg_temperature,
        equipment_type_distribution: summaries
            .iter()
            .map(|s| (s.equipment_type.clone(), s.count))
            .collect(),
        min_flowrate: min_of(|s| s.min_flowrate),
        max_flowrate: max_of(|s| s.max_flowrate),
        min_pressure: min_of(|s| s.min_pressure),
        max_pressure: max_of(|s| s.max_pressure),
        min_temperature: min_of(|s| s.min_temperature),
        max_temperature: max_of(|s| s.max_temperature),
    }
}

fn duplicate_or_failure(err: DbErr, fingerprint: &Fingerprint) -> IngestError {
    if is_unique_violation(&err) {
        warn!("Lost duplicate insert race for {}", fingerprint);
        IngestError::DuplicateContent {
            fingerprint: fingerprint.to_hex(),
        }
    } else {
        err.into()
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
        || err.to_string().contains("UNIQUE constraint failed")
}

async fn insert_records<C>(conn: &C, dataset_id: i32, records: &[EquipmentRecord]) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    for batch in records.chunks(RECORD_BATCH_SIZE) {
        let models = batch.iter().map(|record| equipment_records::ActiveModel {
            dataset_id: Set(dataset_id),
            equipment_name: Set(record.name.clone()),
            equipment_type: Set(record.equipment_type.clone()),
            flowrate: Set(record.flowrate),
            pressure: Set(record.pressure),
            temperature: Set(record.temperature),
            sequence_index: Set(record.sequence_index as i32),
            ..Default::default()
        });
        equipment_records::Entity::insert_many(models).exec(conn).await?;
    }
    Ok(())
}

async fn insert_type_summaries<'a, C, I>(
    conn: &C,
    dataset_id: i32,
    summaries: I,
) -> Result<Vec<type_summaries::Model>, DbErr>
where
    C: ConnectionTrait,
    I: IntoIterator<Item = &'a TypeSummary>,
{
    let mut stored = Vec::new();
    for (position, summary) in summaries.into_iter().enumerate() {
        let model = type_summaries::ActiveModel {
            dataset_id: Set(dataset_id),
            equipment_type: Set(summary.equipment_type.clone()),
            position: Set(position as i32),
            count: Set(summary.count as i32),
            avg_flowrate: Set(summary.flowrate.mean),
            min_flowrate: Set(summary.flowrate.min),
            max_flowrate: Set(summary.flowrate.max),
            avg_pressure: Set(summary.pressure.mean),
            min_pressure: Set(summary.pressure.min),
            max_pressure: Set(summary.pressure.max),
            avg_temperature: Set(summary.temperature.mean),
            min_temperature: Set(summary.temperature.min),
            max_temperature: Set(summary.temperature.max),
            ..Default::default()
        };
        stored.push(
            type_summaries::Entity::insert(model)
                .exec_with_returning(conn)
                .await?,
        );
    }
    Ok(stored)
}

/// Delete datasets together with their records and summaries
async fn delete_datasets<C>(conn: &C, ids: &[i32]) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    equipment_records::Entity::delete_many()
        .filter(equipment_records::Column::DatasetId.is_in(ids.iter().copied()))
        .exec(conn)
        .await?;

    type_summaries::Entity::delete_many()
        .filter(type_summaries::Column::DatasetId.is_in(ids.iter().copied()))
        .exec(conn)
        .await?;

    datasets::Entity::delete_many()
        .filter(datasets::Column::Id.is_in(ids.iter().copied()))
        .exec(conn)
        .await?;

    Ok(())
}
