//! Cached list of gestures the service can recognize.

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::gesture::display_name;
use crate::service::api::GestureApi;
use crate::service::error::ServiceError;
use crate::service::types::DeleteResponse;

/// Shown when the service has no list of its own or cannot be reached.
pub const PRETRAINED_DEFAULTS: &[&str] = &[
    "Swipe_Left",
    "Swipe_Right",
    "Palm_Open",
    "Fist",
    "Pointer",
    "Pinch",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GestureKind {
    Pretrained,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GestureEntry {
    pub name: String,
    pub display_name: String,
    pub kind: GestureKind,
}

/// Result of a delete request as seen by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The service answered but declined, e.g. `not_found`.
    Refused { message: String },
    /// No usable answer: transport failure, error status, or a body that
    /// would not parse.
    Failed,
}

impl DeleteOutcome {
    pub(crate) fn from_reply(reply: Result<DeleteResponse, ServiceError>) -> Self {
        match reply {
            Ok(response) if response.is_success() => Self::Deleted,
            Ok(response) => Self::Refused {
                message: response.message.unwrap_or(response.status),
            },
            Err(e) => {
                warn!("delete request failed: {e}");
                Self::Failed
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Lists {
    pretrained: Vec<String>,
    custom: Vec<String>,
}

impl Lists {
    fn defaults() -> Self {
        Self {
            pretrained: PRETRAINED_DEFAULTS.iter().map(|s| s.to_string()).collect(),
            custom: Vec::new(),
        }
    }
}

pub struct GestureLibrary {
    api: Arc<dyn GestureApi>,
    lists: Mutex<Lists>,
}

impl GestureLibrary {
    pub fn new(api: Arc<dyn GestureApi>) -> Self {
        Self {
            api,
            lists: Mutex::new(Lists::defaults()),
        }
    }

    /// Reload both lists from the service, falling back to the defaults.
    pub async fn refresh(&self) -> Vec<GestureEntry> {
        let lists = match self.api.list_gestures().await {
            Ok(reply) => match reply.gestures {
                Some(pretrained) => Lists {
                    pretrained,
                    custom: reply.custom_gestures,
                },
                None => Lists::defaults(),
            },
            Err(e) => {
                warn!("could not load gesture list: {e}");
                Lists::defaults()
            }
        };
        *self.lists.lock() = lists;
        self.entries()
    }

    pub fn is_custom(&self, name: &str) -> bool {
        self.lists.lock().custom.iter().any(|g| g == name)
    }

    pub fn entries(&self) -> Vec<GestureEntry> {
        let lists = self.lists.lock();
        let entry = |name: &String, kind| GestureEntry {
            name: name.clone(),
            display_name: display_name(name),
            kind,
        };
        lists
            .pretrained
            .iter()
            .map(|n| entry(n, GestureKind::Pretrained))
            .chain(lists.custom.iter().map(|n| entry(n, GestureKind::Custom)))
            .collect()
    }

    /// Delete a gesture on the service.
    ///
    /// The name leaves the local lists unless the service explicitly refuses.
    pub async fn delete(&self, name: &str) -> DeleteOutcome {
        let outcome = DeleteOutcome::from_reply(self.api.delete_gesture(name).await);
        if !matches!(outcome, DeleteOutcome::Refused { .. }) {
            let mut lists = self.lists.lock();
            lists.pretrained.retain(|g| g != name);
            lists.custom.retain(|g| g != name);
            info!(gesture = name, "removed gesture from library");
        }
        outcome
    }
}
