//! Resource services for the Domo REST API.
//!
//! Each service covers one resource family and is obtained from
//! [`DomoClient`](crate::DomoClient). Services are cheap to create and
//! share the client's transport; request and response bodies are
//! [`serde_json::Value`].

pub(crate) mod base;

pub(crate) mod accounts;
pub(crate) mod activity_log;
pub mod ai;
pub(crate) mod alerts;
pub(crate) mod cards;
pub(crate) mod connectors;
pub(crate) mod dataflows;
pub(crate) mod datasets;
pub(crate) mod embed;
pub(crate) mod files;
pub(crate) mod groups;
pub(crate) mod pages;
pub(crate) mod projects;
pub(crate) mod roles;
pub(crate) mod s3_export;
pub(crate) mod search;
pub(crate) mod streams;
pub(crate) mod users;
pub(crate) mod workflows;

pub use base::{ResourceClient, UpdateVerb, CSV_CONTENT_TYPE};

pub use accounts::AccountsService;
pub use activity_log::{ActivityLogQuery, ActivityLogService};
pub use ai::AiService;
pub use alerts::AlertsService;
pub use cards::CardsService;
pub use connectors::ConnectorsService;
pub use dataflows::DataflowsService;
pub use datasets::{DatasetListQuery, DatasetsService, ImportMethod};
pub use embed::EmbedService;
pub use files::FilesService;
pub use groups::GroupsService;
pub use pages::PagesService;
pub use projects::ProjectsService;
pub use roles::RolesService;
pub use s3_export::S3ExportService;
pub use search::SearchService;
pub use streams::StreamsService;
pub use users::UsersService;
pub use workflows::WorkflowsService;
