use crate::data_sources::{Listing, contains_ignore_case, equals};
use crate::isard::Isard;
use crate::isard::types::User;
use isard_common::prelude::Result;

/// Filters applied to the user listing. Every set filter must match.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    /// Case-insensitive substring of the user's name.
    pub name: Option<String>,
    pub category_id: Option<String>,
    pub group_id: Option<String>,
    /// One of `admin`, `manager`, `advanced` or `user`.
    pub role: Option<String>,
    pub active: Option<bool>,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        contains_ignore_case(&user.name, &self.name)
            && equals(user.category.as_deref(), &self.category_id)
            && equals(user.group.as_deref(), &self.group_id)
            && equals(user.role.as_deref(), &self.role)
            && self.active.is_none_or(|active| user.active == active)
    }
}

/// Lists the users matching the filter.
///
#[tracing::instrument(level = "trace", target = "data_source", skip(isard))]
pub async fn read(isard: &dyn Isard, filter: &UserFilter) -> Result<Listing<User>> {
    let users = isard
        .users()
        .await?
        .into_iter()
        .filter(|user| filter.matches(user))
        .collect();

    Ok(Listing::new("users", users))
}
