use serde_json::Value;

use crate::api::alerts::alert_path;
use crate::api::cards::card_path;
use crate::api::pages::{collection_path, page_path};
use crate::api::projects::{list_path, project_path, task_path};
use crate::api::{activity_log, cards, pages, projects, ActivityLogQuery, UpdateVerb};
use crate::blocking::ValueIter;
use crate::client::paginated::{PageAdvance, PageOptions, PageRequest, PaginationQuery};
use crate::Result;

blocking_service! {
    /// Blocking pages service.
    PagesService
}

impl PagesService {
    /// Create a page.
    pub fn create(&self, page: &Value) -> Result<Value> {
        self.resource.create(pages::URL_BASE, page)
    }

    /// Get a page by id.
    pub fn get(&self, page_id: u64) -> Result<Value> {
        self.resource.fetch(&page_path(page_id))
    }

    /// List pages.
    pub fn list(&self) -> Result<Vec<Value>> {
        self.resource.list(pages::URL_BASE, &())
    }

    /// Update a page.
    pub fn update(&self, page_id: u64, update: &Value) -> Result<Value> {
        self.resource
            .update(&page_path(page_id), update, UpdateVerb::Put)
    }

    /// Delete a page.
    pub fn delete(&self, page_id: u64) -> Result<()> {
        self.resource.remove(&page_path(page_id))
    }

    /// List a page's collections.
    pub fn list_collections(&self, page_id: u64) -> Result<Vec<Value>> {
        let path = format!("{}/collections", page_path(page_id));
        self.resource.list(&path, &())
    }

    /// Create a collection on a page.
    pub fn create_collection(&self, page_id: u64, collection: &Value) -> Result<Value> {
        let path = format!("{}/collections", page_path(page_id));
        self.resource.create(&path, collection)
    }

    /// Update a collection.
    pub fn update_collection(
        &self,
        page_id: u64,
        collection_id: u64,
        update: &Value,
    ) -> Result<Value> {
        self.resource.update(
            &collection_path(page_id, collection_id),
            update,
            UpdateVerb::Put,
        )
    }

    /// Delete a collection.
    pub fn delete_collection(&self, page_id: u64, collection_id: u64) -> Result<()> {
        self.resource.remove(&collection_path(page_id, collection_id))
    }
}

blocking_service! {
    /// Blocking cards service.
    CardsService
}

impl CardsService {
    /// Create a card.
    pub fn create(&self, card: &Value) -> Result<Value> {
        self.resource.create(cards::URL_BASE, card)
    }

    /// Get a card by id.
    pub fn get(&self, card_id: u64) -> Result<Value> {
        self.resource.fetch(&card_path(card_id))
    }

    /// Fetch a single page of cards.
    pub fn list(&self, per_page: u32, offset: u64) -> Result<Vec<Value>> {
        let page = PageRequest::new(per_page, offset)?;
        self.resource.list(cards::URL_BASE, &page)
    }

    /// Update a card.
    pub fn update(&self, card_id: u64, update: &Value) -> Result<Value> {
        self.resource
            .update(&card_path(card_id), update, UpdateVerb::Put)
    }

    /// Delete a card.
    pub fn delete(&self, card_id: u64) -> Result<()> {
        self.resource.remove(&card_path(card_id))
    }
}

blocking_service! {
    /// Blocking alerts service.
    AlertsService
}

impl AlertsService {
    /// Fetch a single page of alerts.
    pub fn query(&self, limit: u32, offset: u64) -> Result<Vec<Value>> {
        let page = PageRequest::new(limit, offset)?;
        self.resource.list(crate::api::alerts::URL_BASE, &page)
    }

    /// Get an alert by id.
    pub fn get(&self, alert_id: u64) -> Result<Value> {
        self.resource.fetch(&alert_path(alert_id))
    }

    /// Subscribe the caller to an alert.
    pub fn subscribe(&self, alert_id: u64) -> Result<()> {
        self.resource
            .action(&format!("{}/subscribe", alert_path(alert_id)))?;
        Ok(())
    }

    /// Unsubscribe the caller from an alert.
    pub fn unsubscribe(&self, alert_id: u64) -> Result<()> {
        self.resource
            .remove(&format!("{}/subscribe", alert_path(alert_id)))
    }

    /// Share an alert with other users.
    pub fn share(&self, alert_id: u64, share: &Value) -> Result<()> {
        self.resource
            .create(&format!("{}/share", alert_path(alert_id)), share)?;
        Ok(())
    }
}

blocking_service! {
    /// Blocking projects service.
    ProjectsService
}

impl ProjectsService {
    /// Create a project.
    pub fn create_project(&self, project: &Value) -> Result<Value> {
        self.resource.create(projects::URL_BASE, project)
    }

    /// Get a project by id.
    pub fn get_project(&self, project_id: u64) -> Result<Value> {
        self.resource.fetch(&project_path(project_id))
    }

    /// Fetch a single page of projects.
    pub fn list_projects(&self, per_page: u32, offset: u64) -> Result<Vec<Value>> {
        let page = PageRequest::new(per_page, offset)?;
        self.resource.list(projects::URL_BASE, &page)
    }

    /// Update a project.
    pub fn update_project(&self, project_id: u64, update: &Value) -> Result<Value> {
        self.resource
            .update(&project_path(project_id), update, UpdateVerb::Put)
    }

    /// Delete a project.
    pub fn delete_project(&self, project_id: u64) -> Result<()> {
        self.resource.remove(&project_path(project_id))
    }

    /// Create a list within a project.
    pub fn create_list(&self, project_id: u64, list: &Value) -> Result<Value> {
        let path = format!("{}/lists", project_path(project_id));
        self.resource.create(&path, list)
    }

    /// Get a list by id.
    pub fn get_list(&self, project_id: u64, list_id: u64) -> Result<Value> {
        self.resource.fetch(&list_path(project_id, list_id))
    }

    /// Create a task within a list.
    pub fn create_task(&self, project_id: u64, list_id: u64, task: &Value) -> Result<Value> {
        let path = format!("{}/tasks", list_path(project_id, list_id));
        self.resource.create(&path, task)
    }

    /// Get a task by id.
    pub fn get_task(&self, project_id: u64, list_id: u64, task_id: u64) -> Result<Value> {
        self.resource.fetch(&task_path(project_id, list_id, task_id))
    }

    /// Update a task.
    pub fn update_task(
        &self,
        project_id: u64,
        list_id: u64,
        task_id: u64,
        update: &Value,
    ) -> Result<Value> {
        self.resource.update(
            &task_path(project_id, list_id, task_id),
            update,
            UpdateVerb::Put,
        )
    }
}

blocking_service! {
    /// Blocking activity log service.
    ActivityLogService
}

impl ActivityLogService {
    /// Fetch a single page of entries.
    pub fn query(&self, query: &ActivityLogQuery, limit: u32, offset: u64) -> Result<Vec<Value>> {
        let page = PageRequest::new(limit, offset)?;
        let params = PaginationQuery {
            limit: page.limit,
            offset: page.offset,
            extra: query,
        };
        self.resource.list(activity_log::URL_BASE, &params)
    }

    /// Iterate all matching entries; a short page ends the iteration.
    pub fn stream(&self, query: ActivityLogQuery, options: PageOptions) -> Result<ValueIter> {
        self.resource.paginate(
            activity_log::URL_BASE,
            query,
            options,
            PageAdvance::StopOnShortPage,
        )
    }
}
