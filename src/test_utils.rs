//! In-memory fakes and request helpers for router-level tests.

use std::{
    ops::Deref,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use anyhow::anyhow;
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use time::{macros::date, OffsetDateTime};
use tower::ServiceExt;

use crate::{
    app::build_app,
    auth::{repo::UserRepo, repo_types::User},
    config::{AppConfig, DatabaseConfig, EmailConfig, JwtConfig, ServerConfig},
    events::{dto::EventRequest, repo::EventRepo, repo_types::Event},
    expenses::{
        dto::{ExpenseRequest, ExpenseUpdate},
        repo::ExpenseRepo,
        repo_types::Expense,
    },
    guests::{
        dto::{GuestRequest, GuestUpdate},
        repo::GuestRepo,
        repo_types::Guest,
    },
    mailer::{MailMessage, Mailer, NotifyError},
    ownership::{OwnershipRepo, Resource},
    state::AppState,
    tasks::{
        dto::{TaskRequest, TaskUpdate},
        repo::TaskRepo,
        repo_types::Task,
    },
};

pub fn email_config() -> EmailConfig {
    EmailConfig {
        enabled: true,
        smtp_host: "smtp.invalid".into(),
        smtp_port: 587,
        smtp_username: String::new(),
        smtp_password: String::new(),
        from_address: "no-reply@event-planner.local".into(),
        public_base_url: "http://localhost:5173".into(),
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database: DatabaseConfig {
            url: None,
            host: "localhost".into(),
            port: 5432,
            user: "postgres".into(),
            password: String::new(),
            name: "event_planner_test".into(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: "test-secret".into(),
            issuer: "test-issuer".into(),
            audience: "test-audience".into(),
        },
        email: email_config(),
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
        },
    }
}

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: Vec<User>,
    events: Vec<Event>,
    guests: Vec<Guest>,
    expenses: Vec<Expense>,
    tasks: Vec<Task>,
}

impl Tables {
    fn id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Store fake with the same owner filtering as the SQL queries.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Inserts a user directly, skipping password hashing.
    pub fn seed_user(&self, email: &str) -> User {
        let mut t = self.tables.lock().unwrap();
        let user = User {
            id: t.id(),
            name: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            password_hash: "seeded".into(),
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.push(user.clone());
        user
    }

    pub fn seed_event(&self, owner: i64, name: &str) -> Event {
        let mut t = self.tables.lock().unwrap();
        let event = Event {
            id: t.id(),
            user_id: owner,
            name: name.to_string(),
            date: date!(2025 - 06 - 14),
            location: "Town hall".into(),
            image: None,
            created_at: OffsetDateTime::now_utc(),
        };
        t.events.push(event.clone());
        event
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<User> {
        let mut t = self.tables.lock().unwrap();
        if t.users.iter().any(|u| u.email == email) {
            return Err(anyhow!("duplicate key value violates unique constraint \"users_email_key\""));
        }
        let user = User {
            id: t.id(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let t = self.tables.lock().unwrap();
        Ok(t.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        let t = self.tables.lock().unwrap();
        Ok(t.users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl EventRepo for MemoryStore {
    async fn create_event(&self, owner: i64, req: &EventRequest) -> anyhow::Result<Event> {
        let mut t = self.tables.lock().unwrap();
        let event = Event {
            id: t.id(),
            user_id: owner,
            name: req.name.clone(),
            date: req.date,
            location: req.location.clone(),
            image: req.image.clone(),
            created_at: OffsetDateTime::now_utc(),
        };
        t.events.push(event.clone());
        Ok(event)
    }

    async fn list_events_for_owner(&self, owner: i64) -> anyhow::Result<Vec<Event>> {
        let t = self.tables.lock().unwrap();
        Ok(t.events.iter().filter(|e| e.user_id == owner).cloned().collect())
    }

    async fn find_event(&self, id: i64) -> anyhow::Result<Option<Event>> {
        let t = self.tables.lock().unwrap();
        Ok(t.events.iter().find(|e| e.id == id).cloned())
    }

    async fn update_event(
        &self,
        id: i64,
        owner: i64,
        req: &EventRequest,
    ) -> anyhow::Result<Option<Event>> {
        let mut t = self.tables.lock().unwrap();
        Ok(t
            .events
            .iter_mut()
            .find(|e| e.id == id && e.user_id == owner)
            .map(|e| {
                e.name = req.name.clone();
                e.date = req.date;
                e.location = req.location.clone();
                e.image = req.image.clone();
                e.clone()
            }))
    }

    async fn delete_event(&self, id: i64, owner: i64) -> anyhow::Result<bool> {
        let mut t = self.tables.lock().unwrap();
        let before = t.events.len();
        t.events.retain(|e| !(e.id == id && e.user_id == owner));
        let deleted = t.events.len() < before;
        if deleted {
            // ON DELETE CASCADE
            t.guests.retain(|g| g.event_id != id);
            t.expenses.retain(|x| x.event_id != id);
            t.tasks.retain(|k| k.event_id != id);
        }
        Ok(deleted)
    }
}

#[async_trait]
impl GuestRepo for MemoryStore {
    async fn create_guest(&self, owner: i64, req: &GuestRequest) -> anyhow::Result<Guest> {
        let mut t = self.tables.lock().unwrap();
        let guest = Guest {
            id: t.id(),
            event_id: req.event_id,
            user_id: owner,
            name: req.name.clone(),
            email: req.email.clone(),
            created_at: OffsetDateTime::now_utc(),
        };
        t.guests.push(guest.clone());
        Ok(guest)
    }

    async fn list_guests_for_owner(&self, owner: i64) -> anyhow::Result<Vec<Guest>> {
        let t = self.tables.lock().unwrap();
        Ok(t.guests.iter().filter(|g| g.user_id == owner).cloned().collect())
    }

    async fn list_guests_for_event(
        &self,
        event_id: i64,
        owner: i64,
    ) -> anyhow::Result<Vec<Guest>> {
        let t = self.tables.lock().unwrap();
        Ok(t
            .guests
            .iter()
            .filter(|g| g.event_id == event_id && g.user_id == owner)
            .cloned()
            .collect())
    }

    async fn find_guest(&self, id: i64, owner: i64) -> anyhow::Result<Option<Guest>> {
        let t = self.tables.lock().unwrap();
        Ok(t.guests.iter().find(|g| g.id == id && g.user_id == owner).cloned())
    }

    async fn update_guest(
        &self,
        id: i64,
        owner: i64,
        req: &GuestUpdate,
    ) -> anyhow::Result<Option<Guest>> {
        let mut t = self.tables.lock().unwrap();
        Ok(t
            .guests
            .iter_mut()
            .find(|g| g.id == id && g.user_id == owner)
            .map(|g| {
                g.name = req.name.clone();
                g.email = req.email.clone();
                g.clone()
            }))
    }

    async fn delete_guest(&self, id: i64, owner: i64) -> anyhow::Result<bool> {
        let mut t = self.tables.lock().unwrap();
        let before = t.guests.len();
        t.guests.retain(|g| !(g.id == id && g.user_id == owner));
        Ok(t.guests.len() < before)
    }
}

#[async_trait]
impl ExpenseRepo for MemoryStore {
    async fn create_expense(&self, owner: i64, req: &ExpenseRequest) -> anyhow::Result<Expense> {
        let mut t = self.tables.lock().unwrap();
        let expense = Expense {
            id: t.id(),
            event_id: req.event_id,
            user_id: owner,
            description: req.description.clone(),
            amount: req.amount,
            category: req.category.clone(),
            created_at: OffsetDateTime::now_utc(),
        };
        t.expenses.push(expense.clone());
        Ok(expense)
    }

    async fn list_expenses_for_owner(&self, owner: i64) -> anyhow::Result<Vec<Expense>> {
        let t = self.tables.lock().unwrap();
        Ok(t.expenses.iter().filter(|x| x.user_id == owner).cloned().collect())
    }

    async fn list_expenses_for_event(
        &self,
        event_id: i64,
        owner: i64,
    ) -> anyhow::Result<Vec<Expense>> {
        let t = self.tables.lock().unwrap();
        Ok(t
            .expenses
            .iter()
            .filter(|x| x.event_id == event_id && x.user_id == owner)
            .cloned()
            .collect())
    }

    async fn find_expense(&self, id: i64, owner: i64) -> anyhow::Result<Option<Expense>> {
        let t = self.tables.lock().unwrap();
        Ok(t.expenses.iter().find(|x| x.id == id && x.user_id == owner).cloned())
    }

    async fn update_expense(
        &self,
        id: i64,
        owner: i64,
        req: &ExpenseUpdate,
    ) -> anyhow::Result<Option<Expense>> {
        let mut t = self.tables.lock().unwrap();
        Ok(t
            .expenses
            .iter_mut()
            .find(|x| x.id == id && x.user_id == owner)
            .map(|x| {
                x.description = req.description.clone();
                x.amount = req.amount;
                x.category = req.category.clone();
                x.clone()
            }))
    }

    async fn delete_expense(&self, id: i64, owner: i64) -> anyhow::Result<bool> {
        let mut t = self.tables.lock().unwrap();
        let before = t.expenses.len();
        t.expenses.retain(|x| !(x.id == id && x.user_id == owner));
        Ok(t.expenses.len() < before)
    }
}

#[async_trait]
impl TaskRepo for MemoryStore {
    async fn create_task(&self, owner: i64, req: &TaskRequest) -> anyhow::Result<Task> {
        let mut t = self.tables.lock().unwrap();
        let task = Task {
            id: t.id(),
            event_id: req.event_id,
            user_id: owner,
            title: req.title.clone(),
            description: req.description.clone(),
            due_date: req.due_date,
            created_at: OffsetDateTime::now_utc(),
        };
        t.tasks.push(task.clone());
        Ok(task)
    }

    async fn list_tasks_for_owner(&self, owner: i64) -> anyhow::Result<Vec<Task>> {
        let t = self.tables.lock().unwrap();
        Ok(t.tasks.iter().filter(|k| k.user_id == owner).cloned().collect())
    }

    async fn list_tasks_for_event(&self, event_id: i64, owner: i64) -> anyhow::Result<Vec<Task>> {
        let t = self.tables.lock().unwrap();
        Ok(t
            .tasks
            .iter()
            .filter(|k| k.event_id == event_id && k.user_id == owner)
            .cloned()
            .collect())
    }

    async fn find_task(&self, id: i64, owner: i64) -> anyhow::Result<Option<Task>> {
        let t = self.tables.lock().unwrap();
        Ok(t.tasks.iter().find(|k| k.id == id && k.user_id == owner).cloned())
    }

    async fn update_task(
        &self,
        id: i64,
        owner: i64,
        req: &TaskUpdate,
    ) -> anyhow::Result<Option<Task>> {
        let mut t = self.tables.lock().unwrap();
        Ok(t
            .tasks
            .iter_mut()
            .find(|k| k.id == id && k.user_id == owner)
            .map(|k| {
                k.title = req.title.clone();
                k.description = req.description.clone();
                k.due_date = req.due_date;
                k.clone()
            }))
    }

    async fn delete_task(&self, id: i64, owner: i64) -> anyhow::Result<bool> {
        let mut t = self.tables.lock().unwrap();
        let before = t.tasks.len();
        t.tasks.retain(|k| !(k.id == id && k.user_id == owner));
        Ok(t.tasks.len() < before)
    }
}

#[async_trait]
impl OwnershipRepo for MemoryStore {
    async fn is_owned_by(&self, resource: Resource, id: i64, owner: i64) -> anyhow::Result<bool> {
        let t = self.tables.lock().unwrap();
        let hit = |row_id: i64, user_id: i64| row_id == id && user_id == owner;
        Ok(match resource {
            Resource::Event => t.events.iter().any(|r| hit(r.id, r.user_id)),
            Resource::Guest => t.guests.iter().any(|r| hit(r.id, r.user_id)),
            Resource::Expense => t.expenses.iter().any(|r| hit(r.id, r.user_id)),
            Resource::Task => t.tasks.iter().any(|r| hit(r.id, r.user_id)),
        })
    }
}

/// Records every send attempt; optionally fails them all.
#[derive(Default)]
pub struct RecordingMailer {
    fail: bool,
    attempts: AtomicUsize,
    sent: Mutex<Vec<(String, MailMessage)>>,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Successfully delivered messages.
    pub fn sent(&self) -> Vec<(String, MailMessage)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, message: &MailMessage) -> Result<(), NotifyError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(NotifyError::Rejected("554 relay unavailable".into()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), message.clone()));
        Ok(())
    }
}

/// App state plus handles on the fakes behind it.
pub struct TestState {
    pub state: AppState,
    pub memory: Arc<MemoryStore>,
    pub mailer: Arc<RecordingMailer>,
}

impl Deref for TestState {
    type Target = AppState;

    fn deref(&self) -> &AppState {
        &self.state
    }
}

fn app_with(mailer: RecordingMailer) -> (Router, TestState) {
    let memory = Arc::new(MemoryStore::default());
    let mailer = Arc::new(mailer);
    let state = AppState::from_parts(&test_config(), memory.clone(), mailer.clone());
    let app = build_app(state.clone());
    (
        app,
        TestState {
            state,
            memory,
            mailer,
        },
    )
}

pub fn test_app() -> (Router, TestState) {
    app_with(RecordingMailer::default())
}

pub fn test_app_with_failing_mailer() -> (Router, TestState) {
    app_with(RecordingMailer::failing())
}

/// Seeds a user and signs a token for them.
pub fn seed_caller(state: &TestState, email: &str) -> (User, String) {
    let user = state.memory.seed_user(email);
    let token = state.jwt.sign(user.id, &user.email).expect("sign token");
    (user, token)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.expect("infallible");
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

pub async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send(app, request(method, uri, None, body)).await
}

pub async fn call_with_token(
    app: &Router,
    method: &str,
    uri: &str,
    token: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    send(app, request(method, uri, Some(token), body)).await
}
