use crate::isard::types::{Media, NewMedia};
use crate::resources::{Diagnostics, Resource};
use crate::state::ProviderState;
use async_trait::async_trait;
use isard_common::prelude::{Error, Result};

/// Known state of a media. `url` and `kind` never change after creation.
///
#[derive(Debug, Clone, PartialEq)]
pub struct MediaState {
    pub id: String,
    pub media: NewMedia,
    pub status: Option<String>,
}

/// ISO or floppy image downloaded by Isard from a URL.
///
pub struct MediaResource {
    provider: ProviderState,
}

impl MediaResource {
    pub fn new(provider: ProviderState) -> Self {
        Self { provider }
    }

    /// Adopts an existing media by ID.
    ///
    /// # Returns
    ///
    /// The media state, or `None` if no live media has that ID.
    ///
    #[tracing::instrument(level = "trace", target = "resource", skip(self))]
    pub async fn import(&self, id: &str) -> Result<Option<MediaState>> {
        let Some(remote) = self.live(id).await? else {
            return Ok(None);
        };

        Ok(Some(MediaState {
            id: remote.id.clone(),
            status: remote.status.clone(),
            media: NewMedia {
                url: remote.url().unwrap_or_default().to_owned(),
                kind: remote.kind.clone().unwrap_or_default(),
                name: remote.name,
                description: remote.description.unwrap_or_default(),
                allowed: remote.allowed,
            },
        }))
    }

    /// Looks a media up, treating a missing or `deleted` one as absent.
    ///
    async fn live(&self, id: &str) -> Result<Option<Media>> {
        match self.provider.isard.media(id).await {
            Ok(media) if media.is_deleted() => Ok(None),
            Ok(media) => Ok(Some(media)),
            Err(error) if error.is_not_found() => Ok(None),
            Err(error) => Err(error),
        }
    }

    /// Finds the ID of a freshly created media by its name, after giving the
    /// API time to register it.
    ///
    async fn find_created(&self, name: &str) -> Result<String> {
        tokio::time::sleep(self.provider.poll.media_settle()).await;

        self.provider
            .isard
            .medias()
            .await?
            .into_iter()
            .find(|media| media.name == name && !media.is_deleted())
            .map(|media| media.id)
            .ok_or_else(|| Error::NotFound(format!("created media named {}", name)))
    }
}

#[async_trait]
impl Resource for MediaResource {
    type Plan = NewMedia;
    type State = MediaState;

    #[tracing::instrument(level = "trace", target = "resource", skip_all, fields(name = %plan.name))]
    async fn create(&self, plan: &NewMedia, _diagnostics: &mut Diagnostics) -> Result<MediaState> {
        let id = match self.provider.isard.create_media(plan).await? {
            Some(id) => id,
            None => self.find_created(&plan.name).await?,
        };
        tracing::info!(target: "resource", %id, "Media created");

        Ok(MediaState {
            id,
            media: plan.clone(),
            status: None,
        })
    }

    async fn read(&self, state: &MediaState, _diagnostics: &mut Diagnostics) -> Result<Option<MediaState>> {
        let Some(remote) = self.live(&state.id).await? else {
            tracing::info!(target: "resource", id = %state.id, "Media is gone");
            return Ok(None);
        };

        let mut refreshed = state.clone();
        refreshed.media.name = remote.name;
        refreshed.media.description = remote.description.unwrap_or_default();
        refreshed.status = remote.status;
        Ok(Some(refreshed))
    }

    /// Medias cannot be modified; the plan is recorded and a warning issued.
    ///
    async fn update(
        &self,
        plan: &NewMedia,
        state: &MediaState,
        diagnostics: &mut Diagnostics,
    ) -> Result<MediaState> {
        diagnostics.add_warning(
            "Limited update",
            "Medias cannot be modified in place. Delete and recreate the media to change it.",
        );

        Ok(MediaState {
            media: plan.clone(),
            ..state.clone()
        })
    }

    #[tracing::instrument(level = "trace", target = "resource", skip_all, fields(id = %state.id))]
    async fn delete(&self, state: &MediaState, diagnostics: &mut Diagnostics) -> Result<()> {
        let isard = &self.provider.isard;

        let media = match isard.media(&state.id).await {
            Ok(media) => media,
            Err(error) if error.is_not_found() => {
                diagnostics.add_warning(
                    "Media not found",
                    format!("Media {} was not found, it may have been removed by hand", state.id),
                );
                return Ok(());
            }
            Err(error) => return Err(error),
        };

        if media.is_deleted() {
            diagnostics.add_warning(
                "Media already deleted",
                format!("Media {} is already in 'deleted' status", state.id),
            );
            return Ok(());
        }

        isard.delete_media(&state.id).await?;
        tracing::info!(target: "resource", "Media deleted");
        Ok(())
    }
}
