//! Paging, filtering, searching and sorting parameters for employee lists.

use serde::{Deserialize, Serialize};

const MAX_PAGE_SIZE: i32 = 50;
const DEFAULT_PAGE_SIZE: i32 = 10;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmployeeParameters {
    pub page_number: i32,
    pub page_size: i32,
    pub min_age: i32,
    pub max_age: i32,
    pub search_term: Option<String>,
    pub order_by: Option<String>,
    pub fields: Option<String>,
}

impl Default for EmployeeParameters {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
            min_age: 0,
            max_age: i32::MAX,
            search_term: None,
            order_by: Some("name".into()),
            fields: None,
        }
    }
}

impl EmployeeParameters {
    pub fn page_number(&self) -> u32 {
        self.page_number.max(1).unsigned_abs()
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE).unsigned_abs()
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page_number() - 1) * u64::from(self.page_size())
    }

    pub fn valid_age_range(&self) -> bool {
        self.max_age >= self.min_age
    }

    /// Lower-cased, trimmed search term; `None` when there is nothing to search for.
    pub fn normalized_search_term(&self) -> Option<String> {
        self.search_term
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase)
    }

    pub fn order(&self) -> OrderBy {
        OrderBy::parse(self.order_by.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeSortField {
    Id,
    Name,
    Age,
    Position,
}

impl EmployeeSortField {
    fn from_property(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "age" => Some(Self::Age),
            "position" => Some(Self::Position),
            _ => None,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Age => "age",
            Self::Position => "position",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortClause {
    pub field: EmployeeSortField,
    pub descending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy(Vec<SortClause>);

impl OrderBy {
    /// Parses `"name desc, age"`. Unknown properties are skipped; when
    /// nothing usable remains the order falls back to `name` ascending.
    pub fn parse(order_by: Option<&str>) -> Self {
        let mut clauses = Vec::new();

        for param in order_by.unwrap_or_default().split(',') {
            let mut tokens = param.split_whitespace();
            let Some(property) = tokens.next() else {
                continue;
            };
            let Some(field) = EmployeeSortField::from_property(property) else {
                continue;
            };
            let descending = tokens
                .last()
                .is_some_and(|direction| direction.eq_ignore_ascii_case("desc"));
            clauses.push(SortClause { field, descending });
        }

        if clauses.is_empty() {
            clauses.push(SortClause {
                field: EmployeeSortField::Name,
                descending: false,
            });
        }

        Self(clauses)
    }

    pub fn clauses(&self) -> &[SortClause] {
        &self.0
    }

    /// Body of an `ORDER BY`; built only from whitelisted column names.
    pub fn to_sql(&self) -> String {
        self.0
            .iter()
            .map(|clause| {
                format!(
                    "{} {}",
                    clause.field.column(),
                    if clause.descending { "DESC" } else { "ASC" }
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaData {
    pub current_page: u32,
    pub total_pages: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl MetaData {
    pub fn new(total_count: u64, page_number: u32, page_size: u32) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_count.div_ceil(u64::from(page_size)) as u32;
        Self {
            current_page: page_number,
            total_pages,
            page_size,
            total_count,
            has_previous: page_number > 1,
            has_next: page_number < total_pages,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PagedList<T> {
    pub items: Vec<T>,
    pub meta_data: MetaData,
}

impl<T> PagedList<T> {
    pub fn new(items: Vec<T>, total_count: u64, page_number: u32, page_size: u32) -> Self {
        Self {
            items,
            meta_data: MetaData::new(total_count, page_number, page_size),
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PagedList<U> {
        PagedList {
            items: self.items.into_iter().map(f).collect(),
            meta_data: self.meta_data,
        }
    }
}
