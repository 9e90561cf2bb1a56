use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::debug;
use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};
use crate::structure::accessor::StructureAccessor;
use crate::structure::id::StructureId;
use crate::structure::id_generator::StructureIdGenerator;
use crate::structure::indexes_factory::create_indexes;
use crate::structure::schema::StructureSchema;
use crate::structure::serializer::StructureSerializer;
use crate::structure::structure::Structure;

/// Where a structure's id comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdStrategy {
    #[default]
    GenerateNew,       // Always assign a fresh id
    ReadExisting,      // Keep the id already on the item
    GenerateIfAbsent,  // Keep it when present, assign otherwise
}

/// Turns items into structures ready for persistence
pub struct StructureBuilder<T> {
    accessor: Arc<dyn StructureAccessor<T>>,
    serializer: Arc<dyn StructureSerializer<T>>,
    id_generator: Arc<dyn StructureIdGenerator>,
    strategy: IdStrategy,
    parallel_threshold: usize,
    clock: fn() -> DateTime<Utc>,
}

impl<T: Send + Sync> StructureBuilder<T> {
    pub fn new(
        accessor: Arc<dyn StructureAccessor<T>>,
        serializer: Arc<dyn StructureSerializer<T>>,
        id_generator: Arc<dyn StructureIdGenerator>,
    ) -> Self {
        StructureBuilder {
            accessor,
            serializer,
            id_generator,
            strategy: IdStrategy::default(),
            parallel_threshold: Config::default().parallel_build_threshold,
            clock: Utc::now,
        }
    }

    pub fn with_config(mut self, config: &Config) -> Self {
        self.parallel_threshold = config.parallel_build_threshold;
        self
    }

    pub fn with_strategy(mut self, strategy: IdStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn strategy(&self) -> IdStrategy {
        self.strategy
    }

    pub fn create_structure(&self, item: &mut T, schema: &StructureSchema) -> Result<Structure> {
        let id = self
            .resolve_ids(std::slice::from_ref(&*item), schema)?
            .pop()
            .ok_or_else(|| Error::new(ErrorKind::InvalidOperation, "No id resolved for item"))?;

        self.build(item, id, schema)
    }

    /// Builds a batch. Ids are resolved up front in item order, so the
    /// parallel path never touches the id generator.
    pub fn create_structures(&self, items: &mut [T], schema: &StructureSchema) -> Result<Vec<Structure>> {
        let ids = self.resolve_ids(items, schema)?;
        if ids.len() != items.len() {
            return Err(Error::new(
                ErrorKind::InvalidOperation,
                format!(
                    "Resolved {} ids for {} items of structure '{}'",
                    ids.len(),
                    items.len(),
                    schema.name
                ),
            ));
        }

        if items.len() <= self.parallel_threshold {
            debug!(structure = %schema.name, items = items.len(), "building structures serially");
            return items
                .iter_mut()
                .zip(ids)
                .map(|(item, id)| self.build(item, id, schema))
                .collect();
        }

        debug!(structure = %schema.name, items = items.len(), "building structures in parallel");
        items
            .par_iter_mut()
            .zip(ids.into_par_iter())
            .map(|(item, id)| self.build(item, id, schema))
            .collect()
    }

    fn resolve_ids(&self, items: &[T], schema: &StructureSchema) -> Result<Vec<StructureId>> {
        match self.strategy {
            IdStrategy::GenerateNew => self.id_generator.generate_block(schema, items.len()),
            IdStrategy::ReadExisting => items
                .iter()
                .map(|item| {
                    let id = self.accessor.get_id(schema, item)?;
                    if id.is_empty() {
                        return Err(Error::new(
                            ErrorKind::InvalidOperation,
                            format!("Item of structure '{}' has no id to preserve", schema.name),
                        ));
                    }
                    Ok(id)
                })
                .collect(),
            IdStrategy::GenerateIfAbsent => {
                let existing = items
                    .iter()
                    .map(|item| self.accessor.get_id(schema, item))
                    .collect::<Result<Vec<StructureId>>>()?;

                let missing = existing.iter().filter(|id| id.is_empty()).count();
                let mut generated = self.id_generator.generate_block(schema, missing)?.into_iter();

                existing
                    .into_iter()
                    .map(|id| {
                        if !id.is_empty() {
                            return Ok(id);
                        }
                        generated.next().ok_or_else(|| {
                            Error::new(ErrorKind::InvalidOperation, "Id generator returned too few ids")
                        })
                    })
                    .collect()
            }
        }
    }

    fn build(&self, item: &mut T, id: StructureId, schema: &StructureSchema) -> Result<Structure> {
        self.accessor.set_id(schema, item, &id)?;

        if let Some(path) = &schema.timestamp_member {
            self.accessor.set_timestamp(item, path, (self.clock)())?;
        }

        let indexes = create_indexes(schema, &*item, &id, self.accessor.as_ref())?;
        let data = self.serializer.serialize(item, schema)?;

        Structure::new(&schema.name, id, indexes, Some(data))
    }
}
