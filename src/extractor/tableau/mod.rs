//! Tableau extractors
//!
//! Tableau workbooks map to catalog dashboards and the project holding a
//! workbook maps to the dashboard group. All extractors read from the
//! Metadata API with a single GraphQL query.
//! See <https://help.tableau.com/current/api/metadata_api/en-us/index.html>.

mod graphql;
mod owner;
mod user;
mod view;

pub use graphql::{
    GRAPHQL_SCOPE, TableauExtractor, TableauGraphQlExtractor, View, Workbook, WorkbookOwner,
    WorkbookQuery, sanitize_workbook_name,
};
pub use owner::{OwnerQuery, TableauDashboardOwnerExtractor};
pub use user::{TableauDashboardUserExtractor, UserQuery};
pub use view::{TableauDashboardViewExtractor, ViewQuery};

/// Shared config section for Tableau extractors
pub const SHARED_SCOPE: &str = "tableau";
