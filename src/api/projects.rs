//! Projects, lists and tasks service.

use std::sync::Arc;

use serde_json::Value;

use super::base::{ResourceClient, UpdateVerb};
use crate::client::paginated::PageRequest;
use crate::client::Transport;
use crate::Result;

pub(crate) const URL_BASE: &str = "/v1/projects";

pub(crate) fn project_path(project_id: u64) -> String {
    format!("{URL_BASE}/{project_id}")
}

pub(crate) fn list_path(project_id: u64, list_id: u64) -> String {
    format!("{URL_BASE}/{project_id}/lists/{list_id}")
}

pub(crate) fn task_path(project_id: u64, list_id: u64, task_id: u64) -> String {
    format!("{}/tasks/{task_id}", list_path(project_id, list_id))
}

/// Service for projects and their task lists.
#[derive(Debug, Clone)]
pub struct ProjectsService {
    resource: ResourceClient,
}

impl ProjectsService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self {
            resource: ResourceClient::new(transport),
        }
    }

    /// Create a project.
    pub async fn create_project(&self, project: &Value) -> Result<Value> {
        self.resource.create(URL_BASE, project).await
    }

    /// Get a project by id.
    pub async fn get_project(&self, project_id: u64) -> Result<Value> {
        self.resource.fetch(&project_path(project_id)).await
    }

    /// Fetch a single page of projects.
    pub async fn list_projects(&self, per_page: u32, offset: u64) -> Result<Vec<Value>> {
        let page = PageRequest::new(per_page, offset)?;
        self.resource.list(URL_BASE, &page).await
    }

    /// Update a project.
    pub async fn update_project(&self, project_id: u64, update: &Value) -> Result<Value> {
        self.resource
            .update(&project_path(project_id), update, UpdateVerb::Put)
            .await
    }

    /// Delete a project.
    pub async fn delete_project(&self, project_id: u64) -> Result<()> {
        self.resource.remove(&project_path(project_id)).await
    }

    /// Create a list within a project.
    pub async fn create_list(&self, project_id: u64, list: &Value) -> Result<Value> {
        let path = format!("{}/lists", project_path(project_id));
        self.resource.create(&path, list).await
    }

    /// Get a list by id.
    pub async fn get_list(&self, project_id: u64, list_id: u64) -> Result<Value> {
        self.resource.fetch(&list_path(project_id, list_id)).await
    }

    /// Create a task within a list.
    pub async fn create_task(&self, project_id: u64, list_id: u64, task: &Value) -> Result<Value> {
        let path = format!("{}/tasks", list_path(project_id, list_id));
        self.resource.create(&path, task).await
    }

    /// Get a task by id.
    pub async fn get_task(&self, project_id: u64, list_id: u64, task_id: u64) -> Result<Value> {
        self.resource
            .fetch(&task_path(project_id, list_id, task_id))
            .await
    }

    /// Update a task.
    pub async fn update_task(
        &self,
        project_id: u64,
        list_id: u64,
        task_id: u64,
        update: &Value,
    ) -> Result<Value> {
        self.resource
            .update(
                &task_path(project_id, list_id, task_id),
                update,
                UpdateVerb::Put,
            )
            .await
    }
}
