//! Catalog extractors
//!
//! Each extractor runs one query against its source, filters and reshapes
//! the raw rows into records, and projects every record onto a catalog
//! model. Records missing a required key are skipped with a warning.

pub mod snowflake;
pub mod tableau;

pub use snowflake::{RoleMapping, SnowflakeTableOwnerConfig, SnowflakeTableOwnerExtractor};
pub use tableau::{
    TableauDashboardOwnerExtractor, TableauDashboardUserExtractor, TableauDashboardViewExtractor,
    TableauExtractor, TableauGraphQlExtractor, WorkbookQuery, sanitize_workbook_name,
};
