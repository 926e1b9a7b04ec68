use crate::data_sources::{Listing, contains_ignore_case};
use crate::isard::Isard;
use crate::isard::types::Template;
use isard_common::prelude::Result;

/// Lists the templates visible to the current user.
///
/// # Arguments
///
/// * `isard`: Isard API client.
/// * `name`: Optional case-insensitive substring of the template name.
///
#[tracing::instrument(level = "trace", target = "data_source", skip(isard))]
pub async fn read(isard: &dyn Isard, name: &Option<String>) -> Result<Listing<Template>> {
    let templates = isard.templates().await?;
    Ok(Listing::new("templates", filter(templates, name)))
}

fn filter(templates: Vec<Template>, name: &Option<String>) -> Vec<Template> {
    templates
        .into_iter()
        .filter(|template| contains_ignore_case(&template.name, name))
        .collect()
}
