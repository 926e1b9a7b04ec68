use crate::helpers::TestProvider;
use isard_provider::isard::types::{NetworkInterface, NewDesktop};
use isard_provider::resources::desktop::{DesktopResource, DesktopState};
use isard_provider::resources::network::{NetworkPlan, NetworkResource};
use isard_provider::resources::network_interface::NetworkInterfaceResource;
use isard_provider::resources::{Diagnostics, Resource};
use reqwest::Method;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn network_round_trip_keeps_computed_fields() {
    // Arrange
    let app = TestProvider::new().await;
    Mock::given(method(Method::POST))
        .and(path("/api/v3/user/networks"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "net-1"})))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method(Method::GET))
        .and(path("/api/v3/user/networks/net-1"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"id": "net-1", "name": "classroom", "description": "Room 4", "model": "virtio", "qos_id": "unlimited", "metadata_id": 18446744073709551615}"#,
            "application/json",
        ))
        .mount(&app.server)
        .await;
    let resource = NetworkResource::new(app.state.clone());
    let plan = NetworkPlan {
        name: "classroom".to_owned(),
        description: "Room 4".to_owned(),
        ..NetworkPlan::default()
    };
    let mut diagnostics = Diagnostics::new();

    // Act
    let created = resource.create(&plan, &mut diagnostics).await.unwrap();
    let refreshed = resource
        .read(&created, &mut diagnostics)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(refreshed, created);
    assert_eq!(refreshed.metadata_id.as_deref(), Some("18446744073709551615"));
    assert_eq!(refreshed.qos_id.as_deref(), Some("unlimited"));
    assert!(diagnostics.is_empty());
}

#[tokio::test]
async fn interface_round_trip_fills_kind() {
    // Arrange
    let app = TestProvider::new().await;
    Mock::given(method(Method::POST))
        .and(path("/api/v3/admin/table/add/interfaces"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method(Method::POST))
        .and(path("/api/v3/admin/table/interfaces"))
        .and(body_json(json!({"id": "vlan-20"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "vlan-20",
            "name": "VLAN 20",
            "net": "20",
            "kind": "ovs",
            "model": "virtio",
            "qos_id": "unlimited"
        })))
        .mount(&app.server)
        .await;
    let resource = NetworkInterfaceResource::new(app.state.clone());
    let plan = NetworkInterface {
        id: "vlan-20".to_owned(),
        name: "VLAN 20".to_owned(),
        net: "20".to_owned(),
        ..NetworkInterface::default()
    };
    let mut diagnostics = Diagnostics::new();

    // Act
    let created = resource.create(&plan, &mut diagnostics).await.unwrap();
    let refreshed = resource
        .read(&created, &mut diagnostics)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(refreshed.kind.as_deref(), Some("ovs"));
    assert_eq!(refreshed, created);
}

#[tokio::test]
async fn deleting_an_absent_desktop_succeeds_with_a_warning() {
    // Arrange
    let app = TestProvider::new().await;
    Mock::given(method(Method::GET))
        .and(path("/api/v3/desktop/stop/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Desktop not found"))
        .mount(&app.server)
        .await;
    Mock::given(method(Method::DELETE))
        .and(path("/api/v3/desktop/gone/true"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&app.server)
        .await;
    let resource = DesktopResource::new(app.state.clone());
    let state = DesktopState {
        id: "gone".to_owned(),
        desktop: NewDesktop {
            name: "gone".to_owned(),
            template_id: "tpl".to_owned(),
            ..NewDesktop::default()
        },
        force_stop_on_destroy: true,
    };
    let mut diagnostics = Diagnostics::new();

    // Act
    let result = resource.delete(&state, &mut diagnostics).await;

    // Assert
    assert!(result.is_ok());
    assert_eq!(diagnostics.warnings().len(), 1);
}

#[tokio::test]
async fn deleting_a_running_desktop_waits_for_it_to_stop() {
    // Arrange
    let app = TestProvider::new().await;
    Mock::given(method(Method::GET))
        .and(path("/api/v3/desktop/stop/d1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method(Method::GET))
        .and(path("/api/v3/domain/info/d1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "lab", "status": "Stopping"})))
        .up_to_n_times(2)
        .mount(&app.server)
        .await;
    Mock::given(method(Method::GET))
        .and(path("/api/v3/domain/info/d1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "lab", "status": "Stopped"})))
        .mount(&app.server)
        .await;
    Mock::given(method(Method::DELETE))
        .and(path("/api/v3/desktop/d1/true"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.server)
        .await;
    let resource = DesktopResource::new(app.state.clone());
    let state = DesktopState {
        id: "d1".to_owned(),
        desktop: NewDesktop::default(),
        force_stop_on_destroy: true,
    };
    let mut diagnostics = Diagnostics::new();

    // Act
    let result = resource.delete(&state, &mut diagnostics).await;

    // Assert
    assert!(result.is_ok());
    assert!(diagnostics.is_empty());
}
