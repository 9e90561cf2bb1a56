use crate::core::error::Result;
use crate::schema::naming::{IndexTableRole, ModelTableNames};
use crate::sql::client::DbClient;

/// Existence of the seven index tables, as read from the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexesTableStatuses {
    pub integers_table_exists: bool,
    pub fractals_table_exists: bool,
    pub booleans_table_exists: bool,
    pub dates_table_exists: bool,
    pub guids_table_exists: bool,
    pub strings_table_exists: bool,
    pub texts_table_exists: bool,
    pub all_exists: bool,
}

impl IndexesTableStatuses {
    pub fn new(
        integers_table_exists: bool,
        fractals_table_exists: bool,
        booleans_table_exists: bool,
        dates_table_exists: bool,
        guids_table_exists: bool,
        strings_table_exists: bool,
        texts_table_exists: bool,
    ) -> Self {
        IndexesTableStatuses {
            integers_table_exists,
            fractals_table_exists,
            booleans_table_exists,
            dates_table_exists,
            guids_table_exists,
            strings_table_exists,
            texts_table_exists,
            all_exists: integers_table_exists
                && fractals_table_exists
                && booleans_table_exists
                && dates_table_exists
                && guids_table_exists
                && strings_table_exists
                && texts_table_exists,
        }
    }

    pub fn uniform(exists: bool) -> Self {
        Self::new(exists, exists, exists, exists, exists, exists, exists)
    }

    pub fn exists(&self, role: IndexTableRole) -> bool {
        match role {
            IndexTableRole::Integers => self.integers_table_exists,
            IndexTableRole::Fractals => self.fractals_table_exists,
            IndexTableRole::Booleans => self.booleans_table_exists,
            IndexTableRole::Dates => self.dates_table_exists,
            IndexTableRole::Guids => self.guids_table_exists,
            IndexTableRole::Strings => self.strings_table_exists,
            IndexTableRole::Texts => self.texts_table_exists,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelTableStatuses {
    pub structure_table_exists: bool,
    pub uniques_table_exists: bool,
    pub indexes_table_statuses: IndexesTableStatuses,
    pub all_exists: bool,
}

impl ModelTableStatuses {
    pub fn new(
        structure_table_exists: bool,
        uniques_table_exists: bool,
        indexes_table_statuses: IndexesTableStatuses,
    ) -> Self {
        ModelTableStatuses {
            structure_table_exists,
            uniques_table_exists,
            indexes_table_statuses,
            all_exists: structure_table_exists
                && uniques_table_exists
                && indexes_table_statuses.all_exists,
        }
    }
}

/// Table names of a structure paired with a status snapshot
#[derive(Debug, Clone)]
pub struct ModelTablesInfo {
    pub names: ModelTableNames,
    pub statuses: ModelTableStatuses,
}

impl ModelTablesInfo {
    pub fn new(names: ModelTableNames, statuses: ModelTableStatuses) -> Self {
        ModelTablesInfo { names, statuses }
    }

    /// Probes the store for every table of `names`.
    pub fn load(client: &dyn DbClient, names: ModelTableNames) -> Result<Self> {
        let indexes = &names.indexes_table_names;
        let mut index_exists = [false; 7];
        for (slot, role) in index_exists.iter_mut().zip(IndexTableRole::ALL) {
            *slot = client.table_exists(indexes.get(role))?;
        }
        let [integers, fractals, booleans, dates, guids, strings, texts] = index_exists;

        let statuses = ModelTableStatuses::new(
            client.table_exists(&names.structure_table_name)?,
            client.table_exists(&names.uniques_table_name)?,
            IndexesTableStatuses::new(integers, fractals, booleans, dates, guids, strings, texts),
        );

        Ok(ModelTablesInfo::new(names, statuses))
    }

    pub fn structure_table_name(&self) -> &str {
        &self.names.structure_table_name
    }

    pub fn uniques_table_name(&self) -> &str {
        &self.names.uniques_table_name
    }

    /// Index tables currently present, in `IndexTableRole::ALL` order.
    pub fn existing_index_table_names(&self) -> Vec<&str> {
        IndexTableRole::ALL
            .into_iter()
            .filter(|role| self.statuses.indexes_table_statuses.exists(*role))
            .map(|role| self.names.indexes_table_names.get(role))
            .collect()
    }
}
