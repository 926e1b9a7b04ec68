use crate::config::{DeploymentDefaults, DesktopDefaults};
use crate::isard::json::{self, FlexBool};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Body returned by the create endpoints.
///
#[derive(Debug, Deserialize)]
pub struct Created {
    pub id: String,
}

/// `{"id": ...}` fragment used in lookups and hardware lists.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdRef {
    pub id: String,
}

impl IdRef {
    pub fn new(id: &str) -> Self {
        Self { id: id.to_owned() }
    }

    /// Wraps every ID of the list.
    ///
    pub fn list(ids: &[String]) -> Vec<Self> {
        ids.iter().map(|id| Self::new(id)).collect()
    }
}

/// Body of the user search endpoint.
///
#[derive(Debug, Serialize)]
pub struct SearchTerm<'a> {
    pub term: &'a str,
}

// -----------------------------------------------------------------------------

/// One entry of an allowed map: either a list of IDs or a plain flag, where
/// `false` means "nobody from this axis".
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Access {
    Flag(bool),
    List(Vec<String>),
}

impl Access {
    /// Returns the listed IDs, if this entry is a list.
    ///
    pub fn ids(&self) -> Option<&[String]> {
        match self {
            Access::List(ids) => Some(ids),
            Access::Flag(_) => None,
        }
    }
}

/// Access-control payload fragment as the API sends and receives it.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Allowed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Access>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Access>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Access>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Access>,
}

impl Allowed {
    /// Allowed map that grants nothing through roles, categories or groups and
    /// lists no users.
    ///
    pub fn closed() -> Self {
        Self {
            roles: Some(Access::Flag(false)),
            categories: Some(Access::Flag(false)),
            groups: Some(Access::Flag(false)),
            users: Some(Access::List(Vec::new())),
        }
    }

    /// Every key is present; unset or empty lists are sent as `false`.
    ///
    pub fn with_false_for_empty(lists: &AccessLists) -> Self {
        let entry = |ids: &Option<Vec<String>>| match ids {
            Some(ids) if !ids.is_empty() => Some(Access::List(ids.clone())),
            _ => Some(Access::Flag(false)),
        };
        Self {
            roles: entry(&lists.roles),
            categories: entry(&lists.categories),
            groups: entry(&lists.groups),
            users: entry(&lists.users),
        }
    }

    /// Only non-empty lists are present.
    ///
    pub fn non_empty(lists: &AccessLists) -> Self {
        let entry = |ids: &Option<Vec<String>>| match ids {
            Some(ids) if !ids.is_empty() => Some(Access::List(ids.clone())),
            _ => None,
        };
        Self {
            roles: entry(&lists.roles),
            categories: entry(&lists.categories),
            groups: entry(&lists.groups),
            users: entry(&lists.users),
        }
    }
}

/// Declarative side of an allowed map: each axis is an optional list of IDs.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessLists {
    pub roles: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
    pub groups: Option<Vec<String>>,
    pub users: Option<Vec<String>>,
}

impl AccessLists {
    pub fn is_empty(&self) -> bool {
        [&self.roles, &self.categories, &self.groups, &self.users]
            .iter()
            .all(|ids| ids.as_ref().is_none_or(|ids| ids.is_empty()))
    }
}

impl From<&Allowed> for AccessLists {
    fn from(allowed: &Allowed) -> Self {
        let ids = |access: &Option<Access>| {
            access
                .as_ref()
                .and_then(Access::ids)
                .map(<[String]>::to_vec)
        };
        Self {
            roles: ids(&allowed.roles),
            categories: ids(&allowed.categories),
            groups: ids(&allowed.groups),
            users: ids(&allowed.users),
        }
    }
}

// -----------------------------------------------------------------------------

/// Raw body of `domain/info`, shared by desktops and templates.
///
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DomainInfo {
    #[serde(default, deserialize_with = "json::lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub create_dict: Option<CreateDict>,
    #[serde(default, deserialize_with = "json::null_as_default")]
    pub hardware: Map<String, Value>,
    #[serde(default, deserialize_with = "json::null_as_default")]
    pub guest_properties: Map<String, Value>,
    #[serde(default)]
    pub image: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateDict {
    #[serde(default, deserialize_with = "json::lenient")]
    pub origin: Option<String>,
}

impl DomainInfo {
    fn hardware_value(&self, key: &str) -> Option<Value> {
        self.hardware.get(key).filter(|value| !value.is_null()).cloned()
    }

    fn hardware_number(&self, key: &str) -> Option<f64> {
        self.hardware.get(key).and_then(Value::as_f64)
    }

    /// Converts the raw body into a desktop record.
    ///
    pub fn into_desktop(self, id: &str) -> Desktop {
        Desktop {
            id: id.to_owned(),
            vcpus: self.hardware_number("vcpus").map(|vcpus| vcpus as i64),
            memory: self.hardware_number("memory"),
            template_id: self.create_dict.and_then(|dict| dict.origin),
            name: self.name.unwrap_or_default(),
            description: self.description,
            status: self.status,
        }
    }
}

/// Desktop as read back from the API.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Desktop {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub template_id: Option<String>,
    pub vcpus: Option<i64>,
    pub memory: Option<f64>,
    pub status: Option<String>,
}

/// Declarative request for a persistent desktop.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewDesktop {
    pub name: String,
    pub description: Option<String>,
    pub template_id: String,
    pub vcpus: Option<i64>,
    pub memory: Option<f64>,
    pub interfaces: Option<Vec<String>>,
    pub isos: Option<Vec<String>>,
    pub floppies: Option<Vec<String>>,
    pub viewers: Option<Vec<String>>,
}

/// Body of `POST persistent_desktop`.
///
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesktopPayload {
    pub name: String,
    pub template_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub hardware: DesktopHardware,
    pub guest_properties: Map<String, Value>,
    pub image: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesktopHardware {
    pub boot_order: Value,
    pub disk_bus: Value,
    pub disks: Value,
    pub videos: Value,
    pub vcpus: i64,
    pub memory: f64,
    pub interfaces: Value,
    pub isos: Value,
    pub floppies: Value,
    pub reservables: Value,
}

impl DesktopPayload {
    /// Builds the create payload from the request, the template it derives
    /// from, and the configured fallbacks, in that order of precedence.
    ///
    pub fn build(desktop: &NewDesktop, template: &DomainInfo, defaults: &DesktopDefaults) -> Self {
        let requested = |ids: &Option<Vec<String>>| ids.as_ref().filter(|ids| !ids.is_empty()).cloned();

        let interfaces = requested(&desktop.interfaces)
            .map(|ids| json!(ids))
            .or_else(|| template.hardware_value("interfaces"))
            .unwrap_or_else(|| json!(defaults.interfaces));
        let isos = requested(&desktop.isos)
            .map(|ids| json!(IdRef::list(&ids)))
            .or_else(|| template.hardware_value("isos"))
            .unwrap_or_else(|| json!([]));
        let floppies = requested(&desktop.floppies)
            .map(|ids| json!(IdRef::list(&ids)))
            .or_else(|| template.hardware_value("floppies"))
            .unwrap_or_else(|| json!([]));

        let hardware = DesktopHardware {
            boot_order: template
                .hardware_value("boot_order")
                .unwrap_or_else(|| json!(defaults.boot_order)),
            disk_bus: template
                .hardware_value("disk_bus")
                .unwrap_or_else(|| json!(defaults.disk_bus)),
            disks: template.hardware_value("disks").unwrap_or_else(|| json!([])),
            videos: template
                .hardware_value("videos")
                .or_else(|| template.hardware_value("video"))
                .unwrap_or_else(|| json!(defaults.videos)),
            vcpus: desktop
                .vcpus
                .or_else(|| template.hardware_number("vcpus").map(|vcpus| vcpus as i64))
                .unwrap_or(defaults.vcpus),
            memory: desktop
                .memory
                .or_else(|| template.hardware_number("memory"))
                .unwrap_or(defaults.memory),
            interfaces,
            isos,
            floppies,
            reservables: template
                .hardware_value("reservables")
                .unwrap_or_else(|| json!({ "vgpus": defaults.vgpus })),
        };

        let mut guest_properties = template.guest_properties.clone();
        if let Some(viewers) = requested(&desktop.viewers) {
            guest_properties.insert("viewers".to_owned(), viewer_map(&viewers));
        }

        Self {
            name: desktop.name.clone(),
            template_id: desktop.template_id.clone(),
            description: desktop.description.clone().filter(|text| !text.is_empty()),
            hardware,
            guest_properties,
            image: template
                .image
                .clone()
                .filter(|image| !image.is_null())
                .unwrap_or_else(|| json!({ "type": defaults.image_type })),
        }
    }
}

/// Renders viewer names as `{name: {"options": null}}`.
///
pub fn viewer_map(viewers: &[String]) -> Value {
    Value::Object(
        viewers
            .iter()
            .map(|viewer| (viewer.clone(), json!({ "options": null })))
            .collect(),
    )
}

// -----------------------------------------------------------------------------

/// Declarative request for a deployment, with defaults already resolved.
///
#[derive(Debug, Clone, PartialEq)]
pub struct NewDeployment {
    pub name: String,
    pub description: String,
    pub template_id: String,
    pub desktop_name: String,
    pub visible: bool,
    pub allowed: AccessLists,
    pub vcpus: i64,
    pub memory: f64,
    pub interfaces: Vec<String>,
    pub isos: Vec<String>,
    pub floppies: Vec<String>,
    pub user_permissions: Vec<String>,
    pub viewers: Vec<String>,
}

impl NewDeployment {
    /// Creates a request using the configured hardware defaults.
    ///
    pub fn new(
        name: &str,
        template_id: &str,
        desktop_name: &str,
        allowed: AccessLists,
        defaults: &DeploymentDefaults,
    ) -> Self {
        Self {
            name: name.to_owned(),
            description: String::new(),
            template_id: template_id.to_owned(),
            desktop_name: desktop_name.to_owned(),
            visible: defaults.visible,
            allowed,
            vcpus: defaults.vcpus,
            memory: defaults.memory,
            interfaces: defaults.interfaces.clone(),
            isos: Vec::new(),
            floppies: Vec::new(),
            user_permissions: Vec::new(),
            viewers: Vec::new(),
        }
    }
}

/// Body of `POST deployments`.
///
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentPayload {
    pub name: String,
    pub description: String,
    pub template_id: String,
    pub desktop_name: String,
    pub visible: bool,
    pub allowed: Allowed,
    pub hardware: DeploymentHardware,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_properties: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub user_permissions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentHardware {
    pub vcpus: i64,
    pub memory: f64,
    pub interfaces: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub isos: Vec<IdRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub floppies: Vec<IdRef>,
}

impl From<&NewDeployment> for DeploymentPayload {
    fn from(deployment: &NewDeployment) -> Self {
        Self {
            name: deployment.name.clone(),
            description: deployment.description.clone(),
            template_id: deployment.template_id.clone(),
            desktop_name: deployment.desktop_name.clone(),
            visible: deployment.visible,
            allowed: Allowed::with_false_for_empty(&deployment.allowed),
            hardware: DeploymentHardware {
                vcpus: deployment.vcpus,
                memory: deployment.memory,
                interfaces: deployment.interfaces.clone(),
                isos: IdRef::list(&deployment.isos),
                floppies: IdRef::list(&deployment.floppies),
            },
            guest_properties: guest_viewers(&deployment.viewers),
            user_permissions: deployment.user_permissions.clone(),
        }
    }
}

/// Body of `PUT deployment/{id}`.
///
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentUpdate {
    pub name: String,
    pub description: String,
    pub desktop_name: String,
    pub allowed: Allowed,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_properties: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardware: Option<HardwareUpdate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HardwareUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vcpus: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interfaces: Option<Vec<IdRef>>,
}

impl From<&NewDeployment> for DeploymentUpdate {
    fn from(deployment: &NewDeployment) -> Self {
        let interfaces = Some(&deployment.interfaces)
            .filter(|ids| !ids.is_empty())
            .map(|ids| IdRef::list(ids));
        Self {
            name: deployment.name.clone(),
            description: deployment.description.clone(),
            desktop_name: deployment.desktop_name.clone(),
            allowed: Allowed::non_empty(&deployment.allowed),
            guest_properties: guest_viewers(&deployment.viewers),
            hardware: Some(HardwareUpdate {
                vcpus: Some(deployment.vcpus),
                memory: Some(deployment.memory),
                interfaces,
            }),
        }
    }
}

fn guest_viewers(viewers: &[String]) -> Option<Value> {
    (!viewers.is_empty()).then(|| json!({ "viewers": viewer_map(viewers) }))
}

/// Deployment as read back from the API.
///
#[derive(Debug, Clone, Deserialize)]
pub struct Deployment {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "json::lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub desktop_name: Option<String>,
    #[serde(default, alias = "template", deserialize_with = "json::lenient")]
    pub template_id: Option<String>,
    #[serde(default, deserialize_with = "json::null_as_default")]
    pub visible: bool,
    #[serde(default, deserialize_with = "json::lenient")]
    pub allowed: Option<Allowed>,
    #[serde(default, deserialize_with = "json::null_as_default")]
    pub desktops: Vec<DeploymentDesktop>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentDesktop {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub status: Option<String>,
}

// -----------------------------------------------------------------------------

/// Body of `POST user/networks`.
///
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewNetwork {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qos_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Allowed>,
}

/// Body of `PUT user/networks/{id}`; only set fields are sent.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qos_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Allowed>,
}

impl NetworkUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// User network as read back from the API.
///
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Network {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "json::lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub qos_id: Option<String>,
    #[serde(default, deserialize_with = "json::metadata_id")]
    pub metadata_id: Option<String>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub allowed: Option<Allowed>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub user: Option<String>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub group: Option<String>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub created: Option<String>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub modified: Option<String>,
}

// -----------------------------------------------------------------------------

/// System network interface. The same shape is used to create and to read.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkInterface {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "json::lenient")]
    pub description: Option<String>,
    #[serde(default)]
    pub net: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "json::lenient")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "json::lenient")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "json::lenient")]
    pub qos_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "json::lenient")]
    pub ifname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "json::lenient")]
    pub allowed: Option<Allowed>,
}

/// Body of `PUT admin/table/update/interfaces`; only changed fields are sent.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkInterfaceUpdate {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qos_id: Option<String>,
}

// -----------------------------------------------------------------------------

/// Bandwidth limits of a QoS profile. The API may encode the integers as
/// floats.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bandwidth {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "json::lenient_i64")]
    pub average_download: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "json::lenient_i64")]
    pub average_upload: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "json::lenient_i64")]
    pub peak_download: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "json::lenient_i64")]
    pub peak_upload: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "json::lenient_i64")]
    pub burst_download: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "json::lenient_i64")]
    pub burst_upload: Option<i64>,
}

impl Bandwidth {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Body of `POST admin/table/add/qos_net`.
///
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewQosNet {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<Bandwidth>,
}

/// Body of `PUT admin/table/update/qos_net`.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QosNetUpdate {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<Bandwidth>,
}

/// QoS profile as read back from the API.
///
#[derive(Debug, Clone, Deserialize)]
pub struct QosNet {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "json::lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "json::null_as_default")]
    pub bandwidth: Bandwidth,
}

// -----------------------------------------------------------------------------

/// Status the API keeps on media that were removed but not purged.
///
pub const MEDIA_DELETED: &str = "deleted";

/// Body of `POST media`.
///
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMedia {
    pub name: String,
    pub description: String,
    pub url: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Allowed>,
}

/// Media (ISO or floppy image) as listed by the API.
///
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Media {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "json::lenient")]
    pub description: Option<String>,
    #[serde(rename = "url-web", default, deserialize_with = "json::lenient")]
    pub url_web: Option<String>,
    #[serde(rename = "url-isard", default, deserialize_with = "json::lenient")]
    pub url_isard: Option<String>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub user: Option<String>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub group: Option<String>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub allowed: Option<Allowed>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub path: Option<String>,
    #[serde(default)]
    pub progress: Option<Value>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub accessed: Option<f64>,
}

impl Media {
    pub fn is_deleted(&self) -> bool {
        self.status.as_deref() == Some(MEDIA_DELETED)
    }

    /// Download URL, preferring the one Isard rewrote for itself.
    ///
    pub fn url(&self) -> Option<&str> {
        self.url_isard.as_deref().or(self.url_web.as_deref())
    }

    pub fn accessed_at(&self) -> Option<DateTime<Utc>> {
        self.accessed.and_then(epoch_to_datetime)
    }
}

// -----------------------------------------------------------------------------

/// User as returned by the admin endpoints.
///
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "json::lenient")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub uid: Option<String>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "json::null_as_default")]
    pub active: bool,
    #[serde(default, deserialize_with = "json::lenient")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub group: Option<String>,
    #[serde(default, deserialize_with = "json::null_as_default")]
    pub secondary_groups: Vec<String>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub provider: Option<String>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub accessed: Option<f64>,
    #[serde(default)]
    pub email_verified: FlexBool,
    #[serde(default)]
    pub disclaimer_acknowledged: FlexBool,
    #[serde(default, deserialize_with = "json::lenient")]
    pub role_name: Option<String>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub category_name: Option<String>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub group_name: Option<String>,
    #[serde(default, deserialize_with = "json::null_as_default")]
    pub secondary_groups_names: Vec<String>,
}

impl User {
    pub fn accessed_at(&self) -> Option<DateTime<Utc>> {
        self.accessed.and_then(epoch_to_datetime)
    }
}

/// Template as listed for the current user.
///
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "json::lenient")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub group: Option<String>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "json::lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "json::null_as_default")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "json::lenient")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "json::lenient_i64")]
    pub desktop_size: Option<i64>,
}

fn epoch_to_datetime(seconds: f64) -> Option<DateTime<Utc>> {
    let whole = seconds.trunc() as i64;
    let nanos = (seconds.fract() * 1e9) as u32;
    DateTime::from_timestamp(whole, nanos)
}
