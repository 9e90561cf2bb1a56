use serde::{Serialize, Deserialize};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::DataTypeCode;
use crate::query::lambda::{ParsedLambda, SortDirection, SortingNode};

/// Zero-based page of a sorted result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    pub page_index: usize,
    pub page_size: usize,
}

impl Paging {
    /// Rejects an empty page and offsets that can not be sent as a bigint.
    pub fn new(page_index: usize, page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(Error::new(ErrorKind::InvalidArgument, "Page size must be greater than zero"));
        }
        let paging = Paging { page_index, page_size };
        let skip = paging.skip()?;
        if i64::try_from(skip).is_err() || i64::try_from(page_size).is_err() {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                format!("Page {} of size {} is out of range", page_index, page_size),
            ));
        }
        Ok(paging)
    }

    pub fn skip(&self) -> Result<usize> {
        self.page_index.checked_mul(self.page_size).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidArgument,
                format!("Page {} of size {} overflows the row offset", self.page_index, self.page_size),
            )
        })
    }

    pub fn take(&self) -> usize {
        self.page_size
    }
}

/// Structure-relative query: predicate, sorting and size limits.
///
/// Paging and skip/take are exclusive through the builder methods, but
/// both are representable on the struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureQuery {
    pub where_lambda: Option<ParsedLambda>,
    pub sortings: Vec<SortingNode>,
    pub paging: Option<Paging>,
    pub skip_num: Option<usize>,
    pub take_num: Option<usize>,
    pub is_cacheable: bool,
}

impl StructureQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, lambda: ParsedLambda) -> Self {
        self.where_lambda = Some(lambda);
        self
    }

    pub fn sort_by(mut self, path: &str, data_type_code: DataTypeCode, direction: SortDirection) -> Self {
        self.sortings.push(SortingNode::new(path, data_type_code, direction));
        self
    }

    pub fn sort_asc(self, path: &str, data_type_code: DataTypeCode) -> Self {
        self.sort_by(path, data_type_code, SortDirection::Asc)
    }

    pub fn sort_desc(self, path: &str, data_type_code: DataTypeCode) -> Self {
        self.sort_by(path, data_type_code, SortDirection::Desc)
    }

    pub fn page(mut self, paging: Paging) -> Self {
        self.paging = Some(paging);
        self.skip_num = None;
        self.take_num = None;
        self
    }

    pub fn skip(mut self, n: usize) -> Self {
        self.skip_num = Some(n);
        self.paging = None;
        self
    }

    pub fn take(mut self, n: usize) -> Self {
        self.take_num = Some(n);
        self.paging = None;
        self
    }

    pub fn cacheable(mut self, is_cacheable: bool) -> Self {
        self.is_cacheable = is_cacheable;
        self
    }

    pub fn has_where(&self) -> bool {
        self.where_lambda.as_ref().is_some_and(|l| !l.is_empty())
    }

    pub fn has_sortings(&self) -> bool {
        !self.sortings.is_empty()
    }

    pub fn has_paging(&self) -> bool {
        self.paging.is_some()
    }

    pub fn has_skip(&self) -> bool {
        self.skip_num.is_some()
    }

    pub fn has_take(&self) -> bool {
        self.take_num.is_some()
    }

    /// Nothing but (at most) a take.
    pub fn has_no_dependencies(&self) -> bool {
        !self.has_where() && !self.has_sortings() && !self.has_paging() && !self.has_skip()
    }

    pub fn is_empty(&self) -> bool {
        self.has_no_dependencies() && !self.has_take()
    }
}
