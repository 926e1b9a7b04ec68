use crate::isard::Directory;
use crate::isard::client::{IsardClient, segment};
use crate::isard::types::{SearchTerm, Template, User};
use async_trait::async_trait;
use isard_common::prelude::{IsardError, Result};
use reqwest::Method;

#[async_trait]
impl Directory for IsardClient {
    async fn users(&self) -> Result<Vec<User>> {
        self.make_request::<(), Vec<User>>(
            Method::GET,
            "/api/v3/admin/users/management/users",
            None,
            IsardError::List,
        )
        .await
    }

    async fn search_users(&self, term: &str) -> Result<Vec<User>> {
        self.make_request(
            Method::POST,
            "/api/v3/admin/users/search",
            Some(&SearchTerm { term }),
            IsardError::Search,
        )
        .await
    }

    async fn user(&self, id: &str) -> Result<User> {
        let path = format!("/api/v3/admin/user/{}", segment(id));
        self.make_request::<(), User>(Method::GET, &path, None, IsardError::Read)
            .await
    }

    async fn templates(&self) -> Result<Vec<Template>> {
        self.make_request::<(), Vec<Template>>(
            Method::GET,
            "/api/v3/user/templates",
            None,
            IsardError::List,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use crate::isard::Directory;
    use crate::isard::client::tests::{BEARER, setup};
    use isard_common::prelude::{Error, IsardError};
    use reqwest::header::AUTHORIZATION;
    use reqwest::{Method, StatusCode};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, ResponseTemplate};

    #[tokio::test]
    async fn list_users_with_polymorphic_flags() {
        // Arrange
        let (mock_server, client) = setup().await;
        Mock::given(method(Method::GET))
            .and(path("/api/v3/admin/users/management/users"))
            .and(header(AUTHORIZATION.as_str(), BEARER))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "u1", "name": "Ada", "role": "admin", "active": true, "email_verified": true},
                {"id": "u2", "name": "Bob", "role": "user", "active": false, "email_verified": 0, "disclaimer_acknowledged": 1}
            ])))
            .mount(&mock_server)
            .await;

        // Act
        let users = client.users().await.unwrap();

        // Assert
        assert_eq!(users.len(), 2);
        assert!(users[0].email_verified.as_bool());
        assert!(!users[1].email_verified.as_bool());
        assert!(users[1].disclaimer_acknowledged.as_bool());
        assert!(!users[0].disclaimer_acknowledged.as_bool());
    }

    #[tokio::test]
    async fn search_users_posts_term() {
        // Arrange
        let (mock_server, client) = setup().await;
        Mock::given(method(Method::POST))
            .and(path("/api/v3/admin/users/search"))
            .and(body_json(json!({"term": "ada"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "u1", "name": "Ada"}])))
            .expect(1)
            .mount(&mock_server)
            .await;

        // Act
        let users = client.search_users("ada").await.unwrap();

        // Assert
        assert_eq!(users[0].id, "u1");
    }

    #[tokio::test]
    async fn templates_tolerate_float_sizes() {
        // Arrange
        let (mock_server, client) = setup().await;
        Mock::given(method(Method::GET))
            .and(path("/api/v3/user/templates"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "t1", "name": "Ubuntu 24.04", "enabled": true, "desktop_size": 21474836480.0}
            ])))
            .mount(&mock_server)
            .await;

        // Act
        let templates = client.templates().await.unwrap();

        // Assert
        assert!(templates[0].enabled);
        assert_eq!(templates[0].desktop_size, Some(21_474_836_480));
    }

    #[tokio::test]
    async fn user_forbidden() {
        // Arrange
        let (mock_server, client) = setup().await;
        Mock::given(method(Method::GET))
            .and(path("/api/v3/admin/user/u1"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
            .mount(&mock_server)
            .await;

        // Act
        let result = client.user("u1").await;

        // Assert
        match result.unwrap_err() {
            Error::Isard(IsardError::Read, status, text) => {
                assert_eq!(status, StatusCode::FORBIDDEN);
                assert_eq!(text, "Forbidden");
            }
            error => panic!("unexpected error: {}", error),
        }
    }
}
