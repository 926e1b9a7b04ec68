use crate::helpers::TestProvider;
use isard_provider::data_sources::medias::MediaFilter;
use isard_provider::data_sources::network_interfaces::{InterfaceFilter, InterfaceQuery};
use isard_provider::data_sources::users::UserFilter;
use isard_provider::data_sources::{medias, network_interfaces, templates, users};
use reqwest::Method;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn templates_are_filtered_by_name() {
    // Arrange
    let app = TestProvider::new().await;
    Mock::given(method(Method::GET))
        .and(path("/api/v3/user/templates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "t1", "name": "Ubuntu 24.04", "enabled": true},
            {"id": "t2", "name": "Windows 11", "enabled": true}
        ])))
        .mount(&app.server)
        .await;

    // Act
    let listing = templates::read(app.state.isard.as_ref(), &Some("ubuntu".to_owned()))
        .await
        .unwrap();

    // Assert
    assert_eq!(listing.id, "templates");
    assert_eq!(listing.items.len(), 1);
    assert_eq!(listing.items[0].id, "t1");
}

#[tokio::test]
async fn users_keep_only_active_admins() {
    // Arrange
    let app = TestProvider::new().await;
    Mock::given(method(Method::GET))
        .and(path("/api/v3/admin/users/management/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "u1", "name": "Admin", "role": "admin", "active": true},
            {"id": "u2", "name": "Old admin", "role": "admin", "active": false},
            {"id": "u3", "name": "Student", "role": "user", "active": true}
        ])))
        .mount(&app.server)
        .await;
    let filter = UserFilter {
        role: Some("admin".to_owned()),
        active: Some(true),
        ..UserFilter::default()
    };

    // Act
    let listing = users::read(app.state.isard.as_ref(), &filter).await.unwrap();

    // Assert
    assert_eq!(listing.id, "users");
    let ids: Vec<_> = listing.items.iter().map(|user| user.id.as_str()).collect();
    assert_eq!(ids, ["u1"]);
}

#[tokio::test]
async fn medias_are_filtered_by_kind() {
    // Arrange
    let app = TestProvider::new().await;
    Mock::given(method(Method::GET))
        .and(path("/api/v3/media"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "m1", "name": "Debian", "kind": "iso"},
            {"id": "m2", "name": "Drivers", "kind": "floppy"}
        ])))
        .mount(&app.server)
        .await;
    let filter = MediaFilter {
        kind: Some("floppy".to_owned()),
        ..MediaFilter::default()
    };

    // Act
    let listing = medias::read(app.state.isard.as_ref(), &filter).await.unwrap();

    // Assert
    assert_eq!(listing.id, "medias");
    assert_eq!(listing.items[0].id, "m2");
}

#[tokio::test]
async fn interfaces_are_listed_with_a_filter() {
    // Arrange
    let app = TestProvider::new().await;
    Mock::given(method(Method::GET))
        .and(path("/api/v3/admin/table/interfaces"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "default", "name": "Default", "net": "default", "kind": "network"},
            {"id": "vlan-20", "name": "VLAN 20", "net": "20", "kind": "ovs"}
        ])))
        .mount(&app.server)
        .await;
    let query = InterfaceQuery {
        name: None,
        filter: Some(InterfaceFilter {
            kind: Some("ovs".to_owned()),
            ..InterfaceFilter::default()
        }),
    };

    // Act
    let listing = network_interfaces::read(app.state.isard.as_ref(), &query)
        .await
        .unwrap();

    // Assert
    assert_eq!(listing.id, "network-interfaces-all");
    assert_eq!(listing.items.len(), 1);
    assert_eq!(listing.items[0].id, "vlan-20");
}
