use crate::isard::Medias;
use crate::isard::client::{IsardClient, segment};
use crate::isard::types::{Created, Media, NewMedia};
use async_trait::async_trait;
use isard_common::prelude::{Error, IsardError, Result};
use reqwest::Method;

#[async_trait]
impl Medias for IsardClient {
    /// Returns the new ID when the API includes one in its answer. Some Isard
    /// versions reply with an empty body, in which case `None` is returned and
    /// the caller has to find the media by name.
    ///
    #[tracing::instrument(level = "trace", target = "client", skip(self, media), fields(name = %media.name))]
    async fn create_media(&self, media: &NewMedia) -> Result<Option<String>> {
        let response = self
            .send(Method::POST, "/api/v3/media", Some(media), IsardError::Create)
            .await?;
        let body = response.text().await?;

        let id = serde_json::from_str::<Created>(&body)
            .ok()
            .map(|created| created.id)
            .filter(|id| !id.is_empty());

        tracing::info!(target: "client", id = ?id, "Media download requested");
        Ok(id)
    }

    async fn media(&self, id: &str) -> Result<Media> {
        self.medias()
            .await?
            .into_iter()
            .find(|media| media.id == id)
            .ok_or_else(|| Error::NotFound(format!("media {}", id)))
    }

    async fn medias(&self) -> Result<Vec<Media>> {
        self.make_request::<(), Vec<Media>>(Method::GET, "/api/v3/media", None, IsardError::List)
            .await
    }

    async fn delete_media(&self, id: &str) -> Result<()> {
        let path = format!("/api/v3/media/{}", segment(id));
        self.make_empty_request::<()>(Method::DELETE, &path, None, IsardError::Delete)
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::isard::Medias;
    use crate::isard::client::tests::{BEARER, setup};
    use crate::isard::types::NewMedia;
    use isard_common::prelude::Error;
    use reqwest::Method;
    use reqwest::header::AUTHORIZATION;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, ResponseTemplate};

    fn request() -> NewMedia {
        NewMedia {
            name: "debian.iso".to_owned(),
            description: "Debian netinst".to_owned(),
            url: "https://example.org/debian.iso".to_owned(),
            kind: "iso".to_owned(),
            allowed: None,
        }
    }

    #[tokio::test]
    async fn create_media_returns_id_when_present() {
        // Arrange
        let (mock_server, client) = setup().await;
        Mock::given(method(Method::POST))
            .and(path("/api/v3/media"))
            .and(header(AUTHORIZATION.as_str(), BEARER))
            .and(body_json(json!({
                "name": "debian.iso",
                "description": "Debian netinst",
                "url": "https://example.org/debian.iso",
                "kind": "iso"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "m1"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        // Act
        let result = client.create_media(&request()).await;

        // Assert
        assert_eq!(result.unwrap().as_deref(), Some("m1"));
    }

    #[tokio::test]
    async fn create_media_with_empty_body_has_no_id() {
        // Arrange
        let (mock_server, client) = setup().await;
        Mock::given(method(Method::POST))
            .and(path("/api/v3/media"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        // Act
        let result = client.create_media(&request()).await;

        // Assert
        assert_eq!(result.unwrap(), None);
    }

    #[tokio::test]
    async fn media_is_found_in_listing() {
        // Arrange
        let (mock_server, client) = setup().await;
        Mock::given(method(Method::GET))
            .and(path("/api/v3/media"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "m1", "name": "debian.iso", "kind": "iso", "url-isard": false},
                {"id": "m2", "name": "drivers.vfd", "kind": "floppy", "status": "Downloaded"}
            ])))
            .mount(&mock_server)
            .await;

        // Act
        let found = client.media("m2").await;
        let missing = client.media("m3").await;

        // Assert
        let found = found.unwrap();
        assert_eq!(found.kind.as_deref(), Some("floppy"));
        assert_eq!(found.status.as_deref(), Some("Downloaded"));
        match missing.unwrap_err() {
            error @ Error::NotFound(_) => assert!(error.is_not_found()),
            error => panic!("unexpected error: {}", error),
        }
    }
}
