//! Request-level tests. These drive the whole router through `axum-test`
//! against an in-memory store.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{
    HeaderValue, StatusCode,
    header::{CONTENT_DISPOSITION, CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
};
use axum_test::TestServer;

use crate::{
    config::{AppConfig, create_app},
    registry::{Team, TeamStatus},
    settings::Settings,
    state::AppState,
    store::{DEFAULT_QUOTA_BYTES, Store, StoreError, memory::MemoryStore},
};

const ADMIN_PASSWORD: &str = "correct horse";

/// Logs in and returns the value for the `Cookie` header.
async fn login(server: &TestServer) -> HeaderValue {
    let res = server
        .post("/admin/login")
        .form(&[("password", ADMIN_PASSWORD)])
        .await;
    assert_eq!(res.status_code(), StatusCode::SEE_OTHER);

    let set_cookie = res.header(SET_COOKIE);
    let cookie = set_cookie
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();
    HeaderValue::from_str(&cookie).unwrap()
}

struct Harness {
    server: TestServer,
    store: Arc<MemoryStore>,
}

impl Harness {
    async fn new(capacity_limit: u32) -> Self {
        let store = Arc::new(MemoryStore::new(DEFAULT_QUOTA_BYTES));
        store
            .save_settings(&Settings {
                capacity_limit,
                payment_reference: "PT50 0000 1111".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let config = AppConfig {
            admin_password: ADMIN_PASSWORD.to_string(),
            ..Default::default()
        };
        let state = AppState::with_store(store.clone(), &config).await.unwrap();
        let server = TestServer::new(create_app(state)).unwrap();

        Self { server, store }
    }

    async fn register(&self, team_name: &str) -> axum_test::TestResponse {
        let form = [
            ("team_name", team_name.to_string()),
            (
                "contact_email",
                format!("{}@example.com", team_name.to_lowercase()),
            ),
            ("athlete1_name", format!("{team_name} One")),
            ("athlete1_shirt_size", "M".to_string()),
            ("athlete1_phone", "912000001".to_string()),
            ("athlete2_name", format!("{team_name} Two")),
            ("athlete2_shirt_size", "L".to_string()),
            ("athlete2_phone", "912000002".to_string()),
        ];
        self.server.post("/register").form(&form).await
    }

    async fn login(&self) -> HeaderValue {
        login(&self.server).await
    }

    async fn teams(&self) -> Vec<Team> {
        self.store.load_teams().await.unwrap()
    }

    async fn statuses(&self) -> Vec<(String, TeamStatus)> {
        self.teams()
            .await
            .into_iter()
            .map(|team| (team.team_name, team.status))
            .collect()
    }
}

#[tokio::test]
async fn home_page_renders() {
    let h = Harness::new(16).await;
    let res = h.server.get("/").await;

    assert_eq!(res.status_code(), StatusCode::OK);
    let text = res.text();
    assert!(text.contains("0 / 16 teams confirmed"));
    assert!(text.contains("PT50 0000 1111"));
    assert!(text.contains("No teams have registered yet."));
}

#[tokio::test]
async fn teams_past_the_limit_are_waitlisted() {
    let h = Harness::new(2).await;

    for name in ["Alpha", "Bravo"] {
        let res = h.register(name).await;
        assert_eq!(res.status_code(), StatusCode::OK);
        assert!(res.text().contains("is pre-registered"));
    }
    let res = h.register("Charlie").await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert!(res.text().contains("on the waitlist"));

    assert_eq!(
        h.statuses().await,
        vec![
            ("Alpha".to_string(), TeamStatus::Confirmed),
            ("Bravo".to_string(), TeamStatus::Confirmed),
            ("Charlie".to_string(), TeamStatus::Waitlisted),
        ]
    );

    let form = h.server.get("/register").await.text();
    assert!(form.contains("All places are taken"));
}

#[tokio::test]
async fn invalid_registrations_are_rejected() {
    let h = Harness::new(2).await;
    let form = [
        ("team_name", "Alpha"),
        ("contact_email", "not an email"),
        ("athlete1_name", "Ana"),
        ("athlete1_shirt_size", "M"),
        ("athlete1_phone", "912000001"),
        ("athlete2_name", "Rui"),
        ("athlete2_shirt_size", "M"),
        ("athlete2_phone", "912000002"),
    ];
    let res = h.server.post("/register").form(&form).await;

    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    assert!(res.text().contains("valid contact email"));
    assert!(h.teams().await.is_empty());
}

#[tokio::test]
async fn status_fragment_is_just_the_card() {
    let h = Harness::new(4).await;
    h.register("Alpha").await;

    let text = h.server.get("/status").await.text();
    assert!(text.contains("1 / 4 teams confirmed"));
    assert!(!text.contains("<html"));
}

#[tokio::test]
async fn admin_pages_need_a_login() {
    let h = Harness::new(2).await;

    for path in ["/admin", "/admin/clear", "/admin/export.csv"] {
        let res = h.server.get(path).await;
        assert_eq!(res.status_code(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(res.header(LOCATION), "/admin/login");
    }
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let h = Harness::new(2).await;
    let res = h
        .server
        .post("/admin/login")
        .form(&[("password", "hunter2")])
        .await;

    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    assert!(res.headers().get(SET_COOKIE).is_none());
}

#[tokio::test]
async fn login_opens_the_dashboard() {
    let h = Harness::new(2).await;
    h.register("Alpha").await;
    let cookie = h.login().await;

    let res = h.server.get("/admin").add_header(COOKIE, cookie.clone()).await;
    assert_eq!(res.status_code(), StatusCode::OK);
    let text = res.text();
    assert!(text.contains("Save settings"));
    assert!(text.contains("alpha@example.com"));

    let res = h.server.get("/admin/login").add_header(COOKIE, cookie).await;
    assert_eq!(res.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(res.header(LOCATION), "/admin");
}

#[tokio::test]
async fn deleting_a_confirmed_team_promotes_the_waitlist() {
    let h = Harness::new(2).await;
    for name in ["Alpha", "Bravo", "Charlie"] {
        h.register(name).await;
    }
    let cookie = h.login().await;
    let alpha = h.teams().await[0].id;

    let confirm = h
        .server
        .get(&format!("/admin/teams/{alpha}/delete"))
        .add_header(COOKIE, cookie.clone())
        .await;
    assert_eq!(confirm.status_code(), StatusCode::OK);
    assert!(confirm.text().contains("Delete Alpha?"));

    let res = h
        .server
        .post(&format!("/admin/teams/{alpha}/delete"))
        .add_header(COOKIE, cookie)
        .await;
    assert_eq!(res.status_code(), StatusCode::SEE_OTHER);

    assert_eq!(
        h.statuses().await,
        vec![
            ("Bravo".to_string(), TeamStatus::Confirmed),
            ("Charlie".to_string(), TeamStatus::Confirmed),
        ]
    );
}

#[tokio::test]
async fn deleting_an_unknown_team_is_not_found() {
    let h = Harness::new(2).await;
    h.register("Alpha").await;
    let cookie = h.login().await;

    let res = h
        .server
        .post(&format!("/admin/teams/{}/delete", uuid::Uuid::now_v7()))
        .add_header(COOKIE, cookie.clone())
        .await;
    assert_eq!(res.status_code(), StatusCode::NOT_FOUND);

    let res = h
        .server
        .post("/admin/teams/not-a-uuid/delete")
        .add_header(COOKIE, cookie)
        .await;
    assert_eq!(res.status_code(), StatusCode::NOT_FOUND);

    assert_eq!(h.teams().await.len(), 1);
}

#[tokio::test]
async fn export_downloads_a_csv() {
    let h = Harness::new(1).await;
    h.register("Alpha").await;
    h.register("Bravo").await;
    let cookie = h.login().await;

    let res = h
        .server
        .get("/admin/export.csv")
        .add_header(COOKIE, cookie)
        .await;

    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.header(CONTENT_TYPE), "text/csv; charset=utf-8");
    assert_eq!(
        res.header(CONTENT_DISPOSITION),
        "attachment; filename=\"registrations.csv\""
    );
    let text = res.text();
    let lines: Vec<&str> = text.split('\n').collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("#,ID,Team Name"));
    assert!(lines[1].contains("\"Alpha\""));
    assert!(lines[2].contains("\"waitlisted\""));
}

#[tokio::test]
async fn exporting_nothing_is_a_bad_request() {
    let h = Harness::new(2).await;
    let cookie = h.login().await;

    let res = h
        .server
        .get("/admin/export.csv")
        .add_header(COOKIE, cookie)
        .await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    assert!(res.text().contains("no registrations to export"));
}

#[tokio::test]
async fn clearing_needs_the_confirmation_box() {
    let h = Harness::new(2).await;
    h.register("Alpha").await;
    h.register("Bravo").await;
    let cookie = h.login().await;

    let res = h
        .server
        .post("/admin/clear")
        .add_header(COOKIE, cookie.clone())
        .form(&[("confirm", "no")])
        .await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(h.teams().await.len(), 2);

    let res = h
        .server
        .post("/admin/clear")
        .add_header(COOKIE, cookie)
        .form(&[("confirm", "yes")])
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert!(res.text().contains("Deleted 2 registrations."));
    assert!(h.teams().await.is_empty());

    // the list starts again from scratch
    h.register("Charlie").await;
    assert_eq!(
        h.statuses().await,
        vec![("Charlie".to_string(), TeamStatus::Confirmed)]
    );
}

fn settings_form(capacity_limit: &str) -> Vec<(&'static str, String)> {
    vec![
        ("payment_reference", "PT50 9999".to_string()),
        ("capacity_limit", capacity_limit.to_string()),
        ("logo_url", "https://example.com/logo.png".to_string()),
        ("banner_url", String::new()),
        ("admin_email", "organiser@example.com".to_string()),
    ]
}

#[tokio::test]
async fn settings_are_saved() {
    let h = Harness::new(2).await;
    let cookie = h.login().await;

    let res = h
        .server
        .post("/admin/settings")
        .add_header(COOKIE, cookie)
        .form(&settings_form("8"))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);

    let stored = h.store.load_settings(&Settings::default()).await.unwrap();
    assert_eq!(stored.capacity_limit, 8);
    assert_eq!(stored.payment_reference, "PT50 9999");
    assert_eq!(stored.banner_url, None);

    let home = h.server.get("/").await.text();
    assert!(home.contains("PT50 9999"));
    assert!(home.contains("https://example.com/logo.png"));
}

#[tokio::test]
async fn invalid_settings_are_rejected() {
    let h = Harness::new(2).await;
    let cookie = h.login().await;

    for capacity in ["0", "-1", "lots"] {
        let res = h
            .server
            .post("/admin/settings")
            .add_header(COOKIE, cookie.clone())
            .form(&settings_form(capacity))
            .await;
        assert_eq!(res.status_code(), StatusCode::BAD_REQUEST, "{capacity}");
    }

    let mut form = settings_form("4");
    form[4].1 = "nobody".to_string();
    let res = h
        .server
        .post("/admin/settings")
        .add_header(COOKIE, cookie)
        .form(&form)
        .await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);

    let stored = h.store.load_settings(&Settings::default()).await.unwrap();
    assert_eq!(stored.capacity_limit, 2);
}

#[tokio::test]
async fn capacity_cannot_drop_below_the_confirmed_teams() {
    let h = Harness::new(3).await;
    for name in ["Alpha", "Bravo", "Charlie"] {
        h.register(name).await;
    }
    let cookie = h.login().await;

    let res = h
        .server
        .post("/admin/settings")
        .add_header(COOKIE, cookie)
        .form(&settings_form("2"))
        .await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    assert!(
        h.teams()
            .await
            .iter()
            .all(|team| team.status == TeamStatus::Confirmed)
    );
}

#[tokio::test]
async fn raising_capacity_promotes_the_waitlist() {
    let h = Harness::new(1).await;
    for name in ["Alpha", "Bravo", "Charlie", "Delta"] {
        h.register(name).await;
    }
    let cookie = h.login().await;

    let res = h
        .server
        .post("/admin/settings")
        .add_header(COOKIE, cookie)
        .form(&settings_form("3"))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert!(res.text().contains("Moved up from the waitlist"));

    assert_eq!(
        h.statuses().await,
        vec![
            ("Alpha".to_string(), TeamStatus::Confirmed),
            ("Bravo".to_string(), TeamStatus::Confirmed),
            ("Charlie".to_string(), TeamStatus::Confirmed),
            ("Delta".to_string(), TeamStatus::Waitlisted),
        ]
    );
}

#[tokio::test]
async fn contact_messages_are_validated() {
    let h = Harness::new(2).await;

    let res = h.server.get("/contact").await;
    assert_eq!(res.status_code(), StatusCode::OK);

    let res = h
        .server
        .post("/contact")
        .form(&[
            ("name", "Joana"),
            ("email", "joana@example.com"),
            ("subject", "Parking"),
            ("message", "Is there parking at the venue?"),
        ])
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);

    let res = h
        .server
        .post("/contact")
        .form(&[
            ("name", "Joana"),
            ("email", "joana"),
            ("subject", "Parking"),
            ("message", "Is there parking at the venue?"),
        ])
        .await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
}

/// A store whose team list cannot be read or written.
struct BrokenStore;

#[async_trait]
impl Store for BrokenStore {
    fn backend_tag(&self) -> &'static str {
        "broken"
    }

    async fn load_teams(&self) -> Result<Vec<Team>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn save_teams(&self, _teams: &[Team]) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn load_settings(
        &self,
        defaults: &Settings,
    ) -> Result<Settings, StoreError> {
        Ok(defaults.clone())
    }

    async fn save_settings(
        &self,
        _settings: &Settings,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

#[tokio::test]
async fn store_failures_are_service_unavailable() {
    let config = AppConfig {
        admin_password: ADMIN_PASSWORD.to_string(),
        ..Default::default()
    };
    let state = AppState::with_store(Arc::new(BrokenStore), &config)
        .await
        .unwrap();
    let server = TestServer::new(create_app(state)).unwrap();

    let res = server.get("/").await;
    assert_eq!(res.status_code(), StatusCode::SERVICE_UNAVAILABLE);

    let res = server
        .post("/register")
        .form(&[
            ("team_name", "Alpha"),
            ("contact_email", "alpha@example.com"),
            ("athlete1_name", "Ana"),
            ("athlete1_shirt_size", "M"),
            ("athlete1_phone", "912000001"),
            ("athlete2_name", "Rui"),
            ("athlete2_shirt_size", "M"),
            ("athlete2_phone", "912000002"),
        ])
        .await;
    assert_eq!(res.status_code(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn full_storage_keeps_the_old_settings() {
    let config = AppConfig {
        admin_password: ADMIN_PASSWORD.to_string(),
        ..Default::default()
    };
    let state = AppState::with_store(Arc::new(MemoryStore::new(64)), &config)
        .await
        .unwrap();
    let settings_before = state.settings().await;
    let server = TestServer::new(create_app(state.clone())).unwrap();

    let cookie = login(&server).await;
    let res = server
        .post("/admin/settings")
        .add_header(COOKIE, cookie)
        .form(&settings_form("20"))
        .await;
    assert_eq!(res.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(res.text().contains("storage is full"));
    assert_eq!(state.settings().await, settings_before);
}
