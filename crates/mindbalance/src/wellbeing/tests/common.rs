use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use axum::response::Response;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde_json::{json, Value};

use crate::wellbeing::domain::{CheckInSubmission, UserId, Workload};
use crate::wellbeing::store::{Collection, DocumentStore, MemoryStore, StoreError};
use crate::wellbeing::{wellbeing_router, WellbeingService};

pub(super) const OVERLOAD_MESSAGE: &str =
    "You've carried a heavy workload for several days. Talk to your manager about priorities.";
pub(super) const LOW_MOOD_MESSAGE: &str =
    "It sounds like a hard day. A short breathing exercise can help you reset.";
pub(super) const HIGH_SPIRITS_MESSAGE: &str = "Great to see you in high spirits!";

pub(super) fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 9, 16)
        .expect("valid date")
        .and_hms_micro_opt(9, 30, 15, 250_000)
        .expect("valid time")
}

pub(super) fn days_ago(days: i64) -> NaiveDateTime {
    now() - Duration::days(days)
}

pub(super) fn users_document() -> Value {
    json!({
        "users": [
            {
                "id": "u1",
                "name": "Ana Souza",
                "email": "ana@example.com",
                "department": "Engineering",
                "role": "employee",
                "password": "not-used"
            },
            {
                "id": "u2",
                "name": "Bruno Lima",
                "email": "bruno@example.com",
                "department": "Engineering",
                "role": "employee"
            },
            {
                "id": "u3",
                "name": "Carla Dias",
                "email": "carla@example.com",
                "department": "People",
                "role": "manager"
            }
        ]
    })
}

pub(super) fn suggestions_document() -> Value {
    json!({
        "suggestions": [
            {
                "id": "overload",
                "trigger": { "workload": "heavy", "consecutiveDays": 3 },
                "priority": "high",
                "message": OVERLOAD_MESSAGE,
                "resourcesRecommended": [2],
                "actions": ["Block focus time", "Review deadlines with your manager"]
            },
            {
                "id": "low-mood",
                "trigger": { "mood": "<=2" },
                "priority": "high",
                "message": LOW_MOOD_MESSAGE,
                "resourcesRecommended": [1],
                "actions": ["Take a five minute break"]
            },
            {
                "id": "high-spirits",
                "trigger": { "mood": ">=4", "energy": ">=4" },
                "priority": "normal",
                "message": HIGH_SPIRITS_MESSAGE,
                "resourcesRecommended": [],
                "actions": []
            }
        ]
    })
}

pub(super) fn resources_document() -> Value {
    json!({
        "resources": [
            {
                "id": 1,
                "title": "Box breathing",
                "category": "mindfulness",
                "type": "exercise",
                "difficulty": "beginner",
                "duration": "5 min",
                "description": "Four counts in, hold, out, hold.",
                "content": "Breathe in for four seconds...",
                "tags": ["stress", "focus"],
                "rating": 4.8,
                "views": 120
            },
            {
                "id": 2,
                "title": "Time blocking",
                "category": "productivity",
                "type": "article",
                "difficulty": "intermediate",
                "duration": "10 min",
                "description": "Plan the week in focused blocks.",
                "content": "Start by listing your commitments...",
                "tags": ["workload"]
            },
            {
                "id": 3,
                "title": "Body scan",
                "category": "mindfulness",
                "type": "audio",
                "difficulty": "intermediate",
                "duration": "15 min",
                "description": "Guided relaxation from head to toe.",
                "content": "Settle into a comfortable position...",
                "tags": ["sleep"]
            }
        ],
        "categories": ["mindfulness", "productivity", "sleep"]
    })
}

pub(super) fn seeded_store() -> MemoryStore {
    MemoryStore::new()
        .with_document(Collection::Users, users_document())
        .with_document(Collection::SuggestionRules, suggestions_document())
        .with_document(Collection::Resources, resources_document())
}

pub(super) fn build_service() -> (WellbeingService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(seeded_store());
    (WellbeingService::new(store.clone()), store)
}

pub(super) fn submission(user: &str, mood: u8, energy: u8, workload: Workload) -> CheckInSubmission {
    CheckInSubmission {
        user_id: UserId::from(user),
        mood,
        energy,
        workload,
        comment: None,
    }
}

pub(super) fn router_with_service(service: WellbeingService<MemoryStore>) -> axum::Router {
    wellbeing_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Store whose every operation fails, for exercising the 500 path.
pub(super) struct UnavailableStore;

impl DocumentStore for UnavailableStore {
    fn load(&self, _collection: Collection) -> Result<Value, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    fn save(&self, _collection: Collection, _document: Value) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }
}

/// Store whose first load waits for a release signal from another task.
///
/// On a single-threaded runtime the signal can only arrive if the load runs
/// off the runtime thread.
pub(super) struct GatedStore {
    inner: MemoryStore,
    gate: Mutex<Option<Receiver<()>>>,
}

impl GatedStore {
    pub(super) fn new(inner: MemoryStore, gate: Receiver<()>) -> Self {
        Self {
            inner,
            gate: Mutex::new(Some(gate)),
        }
    }
}

impl DocumentStore for GatedStore {
    fn load(&self, collection: Collection) -> Result<Value, StoreError> {
        let gate = self.gate.lock().expect("gate lock").take();
        if let Some(gate) = gate {
            gate.recv_timeout(StdDuration::from_secs(2))
                .map_err(|_| StoreError::Unavailable("gate never opened".to_string()))?;
        }
        self.inner.load(collection)
    }

    fn save(&self, collection: Collection, document: Value) -> Result<(), StoreError> {
        self.inner.save(collection, document)
    }
}
