use serde_json::Value;

use crate::api::accounts::account_path;
use crate::api::groups::{group_path, member_path};
use crate::api::roles::role_path;
use crate::api::users::{user_path, CreateUserQuery};
use crate::api::{accounts, groups, roles, users, UpdateVerb};
use crate::blocking::ValueIter;
use crate::client::paginated::{PageAdvance, PageOptions, PageRequest};
use crate::Result;

blocking_service! {
    /// Blocking users service.
    UsersService
}

impl UsersService {
    /// Create a user, optionally sending an invitation email.
    pub fn create(&self, user: &Value, send_invite: bool) -> Result<Value> {
        let query = CreateUserQuery { send_invite };
        self.resource.create_with_query(users::URL_BASE, &query, user)
    }

    /// Get a user by id.
    pub fn get(&self, user_id: u64) -> Result<Value> {
        self.resource.fetch(&user_path(user_id))
    }

    /// List users, collecting every page.
    pub fn list(&self, options: PageOptions) -> Result<Vec<Value>> {
        self.list_stream(options)?.collect_all()
    }

    /// Iterate users lazily.
    pub fn list_stream(&self, options: PageOptions) -> Result<ValueIter> {
        self.resource
            .paginate(users::URL_BASE, (), options, PageAdvance::DeclaredSize)
    }

    /// Update a user.
    pub fn update(&self, user_id: u64, update: &Value) -> Result<Value> {
        self.resource
            .update(&user_path(user_id), update, UpdateVerb::Put)
    }

    /// Delete a user.
    pub fn delete(&self, user_id: u64) -> Result<()> {
        self.resource.remove(&user_path(user_id))
    }
}

blocking_service! {
    /// Blocking groups service.
    GroupsService
}

impl GroupsService {
    /// Create a group.
    pub fn create(&self, group: &Value) -> Result<Value> {
        self.resource.create(groups::URL_BASE, group)
    }

    /// Get a group by id.
    pub fn get(&self, group_id: u64) -> Result<Value> {
        self.resource.fetch(&group_path(group_id))
    }

    /// Fetch a single page of groups.
    pub fn list(&self, per_page: u32, offset: u64) -> Result<Vec<Value>> {
        let page = PageRequest::new(per_page, offset)?;
        self.resource.list(groups::URL_BASE, &page)
    }

    /// Iterate all groups; a short page ends the iteration.
    pub fn list_stream(&self, options: PageOptions) -> Result<ValueIter> {
        self.resource
            .paginate(groups::URL_BASE, (), options, PageAdvance::StopOnShortPage)
    }

    /// Update a group.
    pub fn update(&self, group_id: u64, update: &Value) -> Result<Value> {
        self.resource
            .update(&group_path(group_id), update, UpdateVerb::Put)
    }

    /// Delete a group.
    pub fn delete(&self, group_id: u64) -> Result<()> {
        self.resource.remove(&group_path(group_id))
    }

    /// Add a user to a group.
    pub fn add_user(&self, group_id: u64, user_id: u64) -> Result<()> {
        self.resource.touch(&member_path(group_id, user_id))?;
        Ok(())
    }

    /// Remove a user from a group.
    pub fn remove_user(&self, group_id: u64, user_id: u64) -> Result<()> {
        self.resource.remove(&member_path(group_id, user_id))
    }

    /// Fetch a single page of a group's members.
    pub fn list_users(&self, group_id: u64, limit: u32, offset: u64) -> Result<Vec<Value>> {
        let page = PageRequest::new(limit, offset)?;
        let path = format!("{}/users", group_path(group_id));
        self.resource.list(&path, &page)
    }
}

blocking_service! {
    /// Blocking roles service.
    RolesService
}

impl RolesService {
    /// List roles.
    pub fn list(&self) -> Result<Vec<Value>> {
        self.resource.list(roles::URL_BASE, &())
    }

    /// Create a role.
    pub fn create(&self, role: &Value) -> Result<Value> {
        self.resource.create(roles::URL_BASE, role)
    }

    /// Get a role by id.
    pub fn get(&self, role_id: u64) -> Result<Value> {
        self.resource.fetch(&role_path(role_id))
    }

    /// Delete a role.
    pub fn delete(&self, role_id: u64) -> Result<()> {
        self.resource.remove(&role_path(role_id))
    }

    /// Authorities granted by a role.
    pub fn list_authorities(&self, role_id: u64) -> Result<Value> {
        let path = format!("{}/authorities", role_path(role_id));
        self.resource.fetch(&path)
    }

    /// Patch a role's authorities.
    pub fn update_authorities(&self, role_id: u64, authorities: &Value) -> Result<Value> {
        let path = format!("{}/authorities", role_path(role_id));
        self.resource.update(&path, authorities, UpdateVerb::Patch)
    }
}

blocking_service! {
    /// Blocking accounts service.
    AccountsService
}

impl AccountsService {
    /// Create an account.
    pub fn create(&self, account: &Value) -> Result<Value> {
        self.resource.create(accounts::URL_BASE, account)
    }

    /// Get an account by id.
    pub fn get(&self, account_id: &str) -> Result<Value> {
        self.resource.fetch(&account_path(account_id))
    }

    /// List accounts, collecting every page.
    pub fn list(&self, options: PageOptions) -> Result<Vec<Value>> {
        self.list_stream(options)?.collect_all()
    }

    /// Iterate accounts lazily.
    pub fn list_stream(&self, options: PageOptions) -> Result<ValueIter> {
        self.resource
            .paginate(accounts::URL_BASE, (), options, PageAdvance::DeclaredSize)
    }

    /// Patch an account.
    pub fn update(&self, account_id: &str, update: &Value) -> Result<Value> {
        self.resource
            .update(&account_path(account_id), update, UpdateVerb::Patch)
    }

    /// Delete an account.
    pub fn delete(&self, account_id: &str) -> Result<()> {
        self.resource.remove(&account_path(account_id))
    }
}
