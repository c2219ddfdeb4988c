//! Cloud provider schemas.
//!
//! A `Provider` is one of a closed set of backend kinds. Each kind declares
//! its authentication scheme and the ordered fields a user fills in to build
//! a credential. Lookup goes through the fixed [`SCHEMA`] registry.

pub mod maas;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::error::{ProviderError, SchemaError};
use crate::domain::field::Field;

/// Supported provider kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Aws,
    Maas,
    Azure,
    Google,
    CloudSigma,
    Joyent,
    OpenStack,
    VSphere,
    Oracle,
    Localhost,
}

/// Cloud type tag → provider kind.
pub const SCHEMA: &[(&str, ProviderKind)] = &[
    ("ec2", ProviderKind::Aws),
    ("maas", ProviderKind::Maas),
    ("azure", ProviderKind::Azure),
    ("gce", ProviderKind::Google),
    ("cloudsigma", ProviderKind::CloudSigma),
    ("joyent", ProviderKind::Joyent),
    ("openstack", ProviderKind::OpenStack),
    ("rackspace", ProviderKind::OpenStack),
    ("vsphere", ProviderKind::VSphere),
    ("oracle", ProviderKind::Oracle),
    ("localhost", ProviderKind::Localhost),
    ("lxd", ProviderKind::Localhost),
];

impl ProviderKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Aws => "aws",
            Self::Maas => "maas",
            Self::Azure => "azure",
            Self::Google => "google",
            Self::CloudSigma => "cloudsigma",
            Self::Joyent => "joyent",
            Self::OpenStack => "openstack",
            Self::VSphere => "vsphere",
            Self::Oracle => "oracle",
            Self::Localhost => "localhost",
        }
    }

    /// Authentication scheme tag, `None` for providers without credentials.
    #[must_use]
    pub fn auth_type(self) -> Option<&'static str> {
        match self {
            Self::Aws => Some("access-key"),
            Self::Maas => Some("oauth1"),
            Self::Azure => Some("service-principal-secret"),
            Self::Google => Some("oauth2"),
            Self::CloudSigma | Self::Joyent | Self::OpenStack | Self::VSphere | Self::Oracle => {
                Some("userpass")
            }
            Self::Localhost => None,
        }
    }

    fn fields(self) -> Vec<Field> {
        match self {
            Self::Aws => vec![
                Field::new("AWS Access Key", "access-key"),
                Field::new("AWS Secret Key", "secret-key"),
            ],
            Self::Maas => vec![
                Field::new("api endpoint (http://example.com:5240/MAAS)", "endpoint")
                    .not_storable()
                    .with_validator(maas::validate_endpoint),
                Field::new("api key", "maas-oauth").with_validator(maas::validate_api_key),
            ],
            Self::Azure => vec![
                Field::new("application id", "application-id"),
                Field::new("subscription id", "subscription-id"),
                Field::new("application password", "application-password").secret(),
            ],
            Self::Google => vec![
                Field::new("private key", "private-key"),
                Field::new("client id", "client-id"),
                Field::new("client email", "client-email"),
                Field::new("project id", "project-id"),
            ],
            Self::CloudSigma => vec![
                Field::new("username", "username"),
                Field::new("password", "password"),
            ],
            Self::Joyent => vec![
                Field::new("sdc user", "sdc-user"),
                Field::new("sdc key id", "sdc-key-id"),
                Field::new("private key", "private-key"),
                Field::new("algorithm", "algorithm").with_default("rsa-sha256"),
            ],
            Self::OpenStack => vec![
                Field::new("username", "username"),
                Field::new("password", "password").secret(),
                Field::new("domain name", "domain-name"),
                Field::new("project domain name", "project-domain-name"),
                Field::new("access key", "access-key"),
                Field::new("secret key", "secret-key"),
            ],
            Self::VSphere => vec![
                Field::new("api endpoint", "endpoint").not_storable(),
                Field::new("user", "user"),
                Field::new("password", "password").secret(),
            ],
            Self::Oracle => vec![
                Field::new("identity domain", "identity-domain"),
                Field::new("username or e-mail", "username"),
                Field::new("password", "password").secret(),
            ],
            Self::Localhost => vec![
                Field::new("network interface to create a LXD bridge for", "network-interface")
                    .not_storable()
                    .choice(Vec::new()),
            ],
        }
    }
}

/// Load the provider schema registered for `cloud_type`.
///
/// # Errors
///
/// Returns [`SchemaError`] if no provider is registered for the tag.
pub fn load_schema(cloud_type: &str) -> Result<Provider, SchemaError> {
    SCHEMA
        .iter()
        .find(|(tag, _)| *tag == cloud_type)
        .map(|(_, kind)| Provider::new(*kind))
        .ok_or_else(|| SchemaError(cloud_type.to_string()))
}

/// Credential key-value set built from storable fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credential {
    #[serde(rename = "auth-type", skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<String>,
    #[serde(flatten)]
    pub attrs: BTreeMap<String, String>,
}

/// Backend-native cloud definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloudConfig {
    #[serde(rename = "type")]
    pub cloud_type: String,
    #[serde(rename = "auth-types")]
    pub auth_types: Vec<String>,
    pub endpoint: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub regions: BTreeMap<String, BTreeMap<String, String>>,
}

/// An instantiated provider with its fields and session state.
#[derive(Debug, Clone)]
pub struct Provider {
    kind: ProviderKind,
    fields: Vec<Field>,
    authenticated: bool,
    datacenters: Vec<String>,
}

impl Provider {
    #[must_use]
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            fields: kind.fields(),
            authenticated: false,
            datacenters: Vec::new(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    #[must_use]
    pub fn auth_type(&self) -> Option<&'static str> {
        self.kind.auth_type()
    }

    #[must_use]
    pub fn default_region(&self) -> Option<&'static str> {
        match self.kind {
            ProviderKind::Aws => Some("us-east-1"),
            _ => None,
        }
    }

    /// Fields in display and entry order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut [Field] {
        &mut self.fields
    }

    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Set a field value by key. Returns `false` if no such field exists.
    pub fn set_value(&mut self, key: &str, value: &str) -> bool {
        match self.fields.iter_mut().find(|f| f.key == key) {
            Some(f) => {
                f.set_value(value);
                true
            }
            None => false,
        }
    }

    /// Replace the options of a choice field.
    pub fn offer_choices(&mut self, key: &str, options: Vec<String>) {
        if let Some(f) = self.fields.iter_mut().find(|f| f.key == key) {
            f.kind = crate::domain::field::FieldKind::Choice(options);
        }
    }

    /// Validate every field. All fields are evaluated so each one carries
    /// its own error afterwards.
    pub fn is_valid(&mut self) -> bool {
        let results: Vec<bool> = self.fields.iter_mut().map(Field::validate).collect();
        results.into_iter().all(|ok| ok)
    }

    /// Credential built from the storable fields.
    #[must_use]
    pub fn credential(&self) -> Credential {
        Credential {
            auth_type: self.auth_type().map(str::to_string),
            attrs: self
                .fields
                .iter()
                .filter(|f| f.storable)
                .map(|f| (f.key.clone(), f.value().to_string()))
                .collect(),
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Record a successful login together with the datacenters it exposed.
    pub fn mark_authenticated(&mut self, datacenters: Vec<String>) {
        self.authenticated = true;
        self.datacenters = datacenters;
    }

    #[must_use]
    pub fn datacenters(&self) -> &[String] {
        &self.datacenters
    }

    /// Backend-native cloud definition for providers that describe a cloud.
    ///
    /// # Errors
    ///
    /// `CloudConfigUnsupported` for credential-only providers, and
    /// `NotAuthenticated` for vSphere before `login`.
    pub fn cloud_config(&self) -> Result<CloudConfig, ProviderError> {
        let endpoint = self.field("endpoint").map(|f| f.value().to_string());
        match (self.kind, endpoint) {
            (ProviderKind::Maas, Some(endpoint)) => Ok(CloudConfig {
                cloud_type: "maas".to_string(),
                auth_types: vec!["oauth1".to_string()],
                endpoint,
                regions: BTreeMap::new(),
            }),
            (ProviderKind::VSphere, Some(endpoint)) => {
                if !self.authenticated {
                    return Err(ProviderError::NotAuthenticated(self.kind.name()));
                }
                let regions = self
                    .datacenters
                    .iter()
                    .map(|dc| {
                        let region = BTreeMap::from([("endpoint".to_string(), endpoint.clone())]);
                        (dc.clone(), region)
                    })
                    .collect();
                Ok(CloudConfig {
                    cloud_type: "vsphere".to_string(),
                    auth_types: vec!["userpass".to_string()],
                    endpoint,
                    regions,
                })
            }
            _ => Err(ProviderError::CloudConfigUnsupported(self.kind.name())),
        }
    }
}
