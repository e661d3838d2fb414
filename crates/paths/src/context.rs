//! Derived URL layout of one mounted instance.

use serde::{Deserialize, Serialize};

use crate::compose::{compose, normalize};
use crate::{
    INSTANCE_NAME_PREFIX, SWAGGER_LISTING_PATH, SWAGGER_LOGIN_PATH, SWAGGER_PATH,
    SWAGGER_URI_PATH,
};

/// Router-level mount points, shared by every instance on the same router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterPaths {
    /// Where the application is mounted, e.g. `/` or `/app`.
    pub application_context_path: String,

    /// Where the API router is mounted inside the application context.
    pub root_path: String,
}

impl RouterPaths {
    /// Build router paths; both values are normalized.
    pub fn new(application_context_path: &str, root_path: &str) -> Self {
        Self {
            application_context_path: normalize(application_context_path),
            root_path: normalize(root_path),
        }
    }

    /// `compose(application_context_path, root_path)`.
    pub fn base_url(&self) -> String {
        compose(&self.application_context_path, &self.root_path)
    }

    /// Login endpoint, shared by all instances on the router.
    pub fn login_path(&self) -> String {
        compose(&self.base_url(), SWAGGER_LOGIN_PATH)
    }
}

impl Default for RouterPaths {
    fn default() -> Self {
        Self::new("/", "/")
    }
}

/// The three primitives a layout is derived from, each normalized on its own.
///
/// Never cached: derive it again whenever configuration changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathContext {
    pub application_context_path: String,
    pub router_root_path: String,
    pub uri_prefix: String,
}

impl PathContext {
    pub fn new(router: &RouterPaths, uri_prefix: &str) -> Self {
        Self {
            application_context_path: normalize(&router.application_context_path),
            router_root_path: normalize(&router.root_path),
            uri_prefix: normalize(uri_prefix),
        }
    }

    pub fn base_url(&self) -> String {
        compose(&self.application_context_path, &self.router_root_path)
    }

    pub fn view_path(&self) -> String {
        compose(&self.base_url(), &self.uri_prefix)
    }

    /// Viewer page, relative to the router base URL.
    pub fn html_resource_path(&self) -> String {
        compose(&self.uri_prefix, SWAGGER_PATH)
    }

    /// Static asset mount, relative to the application context.
    pub fn document_uri_path(&self) -> String {
        compose(
            &compose(&self.router_root_path, &self.uri_prefix),
            SWAGGER_URI_PATH,
        )
    }

    /// Document endpoint template, relative to the router base URL.
    pub fn document_listing_path(&self) -> String {
        compose(&self.uri_prefix, SWAGGER_LISTING_PATH)
    }

    pub fn login_path(&self) -> String {
        compose(&self.base_url(), SWAGGER_LOGIN_PATH)
    }

    /// Shared-storage attribute key of the instance.
    ///
    /// Unique per instance only if every instance under the same application
    /// context has a distinct URI prefix. That is the caller's obligation.
    pub fn instance_name(&self) -> String {
        format!("{INSTANCE_NAME_PREFIX}{}", self.view_path())
    }

    /// Compute every URL of the layout at once.
    pub fn derive(&self) -> InstancePaths {
        InstancePaths {
            base_url: self.base_url(),
            view_path: self.view_path(),
            html_resource_path: self.html_resource_path(),
            document_uri_path: self.document_uri_path(),
            document_listing_path: self.document_listing_path(),
            login_path: self.login_path(),
            instance_name: self.instance_name(),
        }
    }
}

/// Every URL derived for one instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstancePaths {
    pub base_url: String,
    pub view_path: String,
    pub html_resource_path: String,
    pub document_uri_path: String,
    pub document_listing_path: String,
    pub login_path: String,
    pub instance_name: String,
}
