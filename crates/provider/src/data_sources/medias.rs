use crate::data_sources::{Listing, contains_ignore_case, equals};
use crate::isard::Isard;
use crate::isard::types::Media;
use isard_common::prelude::Result;

/// Filters applied to the media listing. Every set filter must match.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaFilter {
    /// Case-insensitive substring of the media name.
    pub name: Option<String>,
    /// `iso` or `floppy`.
    pub kind: Option<String>,
    pub status: Option<String>,
    pub category_id: Option<String>,
    pub group_id: Option<String>,
    pub user_id: Option<String>,
}

impl MediaFilter {
    pub fn matches(&self, media: &Media) -> bool {
        contains_ignore_case(&media.name, &self.name)
            && equals(media.kind.as_deref(), &self.kind)
            && equals(media.status.as_deref(), &self.status)
            && equals(media.category.as_deref(), &self.category_id)
            && equals(media.group.as_deref(), &self.group_id)
            && equals(media.user.as_deref(), &self.user_id)
    }
}

/// Lists the medias matching the filter.
///
#[tracing::instrument(level = "trace", target = "data_source", skip(isard))]
pub async fn read(isard: &dyn Isard, filter: &MediaFilter) -> Result<Listing<Media>> {
    let medias = isard
        .medias()
        .await?
        .into_iter()
        .filter(|media| filter.matches(media))
        .collect();

    Ok(Listing::new("medias", medias))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_and_owner_filters_are_exact() {
        let medias: Vec<Media> = serde_json::from_value(json!([
            {"id": "m1", "name": "Debian 12", "kind": "iso", "user": "u1", "status": "Downloaded"},
            {"id": "m2", "name": "debian drivers", "kind": "floppy", "user": "u1", "status": "Downloaded"},
            {"id": "m3", "name": "Debian 13", "kind": "iso", "user": "u2", "status": "Downloading"}
        ]))
        .unwrap();
        let filter = MediaFilter {
            name: Some("DEBIAN".to_owned()),
            kind: Some("iso".to_owned()),
            user_id: Some("u1".to_owned()),
            ..MediaFilter::default()
        };

        let ids: Vec<_> = medias
            .iter()
            .filter(|media| filter.matches(media))
            .map(|media| media.id.as_str())
            .collect();

        assert_eq!(ids, ["m1"]);
    }
}
