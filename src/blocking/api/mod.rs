//! Blocking resource services.
//!
//! Method names, arguments and paths match the async services in
//! [`crate::api`]; only the return is immediate rather than a future.

macro_rules! blocking_service {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            resource: $crate::blocking::ResourceClient,
        }

        impl $name {
            pub(crate) fn new(transport: ::std::sync::Arc<$crate::blocking::Transport>) -> Self {
                Self {
                    resource: $crate::blocking::ResourceClient::new(transport),
                }
            }
        }
    };
}

mod content;
mod data;
mod directory;
mod platform;

pub use content::{ActivityLogService, AlertsService, CardsService, PagesService, ProjectsService};
pub use data::{DatasetsService, S3ExportService, StreamsService};
pub use directory::{AccountsService, GroupsService, RolesService, UsersService};
pub use platform::{
    AiAnalysisService, AiMediaService, AiMessagesService, AiService, AiTextService,
    ConnectorsService, DataflowsService, EmbedService, FilesService, SearchService,
    WorkflowsService,
};
