use std::{collections::HashMap, fmt, sync::Arc};

use axum::http::HeaderMap;
use axum_extra::extract::cookie::CookieJar;
use serde_json::Value;

/// Storage slot holding the viewer's role.
pub const ROLE_KEY: &str = "role";
/// Storage slot holding the bearer credential.
pub const TOKEN_KEY: &str = "token";

/// Role
///
/// The access class of the signed-in viewer. Decides which route family
/// (`/administrators` or `/member`) is reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    /// Maps a stored value onto a role. Only the exact strings `admin` and
    /// `member` are roles; anything else reads as "no role".
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Role::Admin),
            "member" => Some(Role::Member),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Member => "member",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// StoredCredential
///
/// What the token slot turned out to contain. The login flow writes either the
/// bare token or the backend's token payload (`{"access": "...", ...}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredCredential {
    /// Not a JSON object with an `access` field; used verbatim.
    Raw(String),
    /// JSON object carrying the token in its `access` field.
    Structured { access: String },
}

impl StoredCredential {
    /// extract
    ///
    /// Two-step extraction of the stored token slot:
    /// 1. a JSON object with a scalar `access` field yields `Structured`;
    /// 2. every other value, including text that is not JSON at all, yields `Raw`.
    ///
    /// Never fails.
    pub fn extract(stored: &str) -> Self {
        match structured_access(stored) {
            Some(access) => StoredCredential::Structured { access },
            None => StoredCredential::Raw(stored.to_string()),
        }
    }

    /// The token to place after `Bearer `. `None` when it is empty.
    pub fn bearer(&self) -> Option<&str> {
        let token = match self {
            StoredCredential::Raw(raw) => raw.as_str(),
            StoredCredential::Structured { access } => access.as_str(),
        };
        (!token.is_empty()).then_some(token)
    }
}

fn structured_access(stored: &str) -> Option<String> {
    let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(stored) else {
        return None;
    };
    match fields.get("access")? {
        Value::String(access) => Some(access.clone()),
        scalar @ (Value::Number(_) | Value::Bool(_)) => Some(scalar.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// SessionStore Contract
///
/// Read-only, key-based view of client-side session storage. The login and
/// logout flows own writing; nothing in this crate writes to a store.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// In-memory store, used by tests and by callers that already hold the values.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    slots: HashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.slots.insert(key.to_string(), value.to_string());
        self
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.slots.get(key).cloned()
    }
}

/// CookieSessionStore
///
/// Session storage as the browser sends it: the `role` and `token` cookies of
/// the incoming request.
#[derive(Debug, Clone)]
pub struct CookieSessionStore {
    jar: CookieJar,
}

impl CookieSessionStore {
    pub fn from_jar(jar: CookieJar) -> Self {
        Self { jar }
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self::from_jar(CookieJar::from_headers(headers))
    }
}

impl SessionStore for CookieSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.jar.get(key).map(|cookie| cookie.value().to_string())
    }
}

/// SessionContext
///
/// Explicit handle on the session passed to both the Route Guard and the
/// Gateway. Exposes only the two reads they need.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
}

impl SessionContext {
    pub fn new(store: impl SessionStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// A context over an empty store: no role, no credential.
    pub fn anonymous() -> Self {
        Self::new(MemorySessionStore::new())
    }

    /// The stored role, or `None` when the slot is empty or holds an unknown value.
    pub fn role(&self) -> Option<Role> {
        self.store.get(ROLE_KEY).as_deref().and_then(Role::parse)
    }

    /// The stored credential, or `None` when the slot is empty.
    pub fn credential(&self) -> Option<StoredCredential> {
        self.store
            .get(TOKEN_KEY)
            .filter(|stored| !stored.is_empty())
            .map(|stored| StoredCredential::extract(&stored))
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Credential omitted.
        f.debug_struct("SessionContext")
            .field("role", &self.role())
            .finish_non_exhaustive()
    }
}
