use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Form, FromRef, Query, State,
    },
    response::Html,
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::{Key, PrivateCookieJar};
use std::collections::HashMap;
use std::sync::Arc;

use super::client::{ClientError, StatsClient};
use super::forms::{
    parse_match_form, DeleteMatchForm, EditParticipationForm, HomeQuery, LoginForm, PlayerForm, RenameForm,
};
use super::render::{HomeView, Notice, PageError, Pages};
use super::session::{sign_in, sign_out, Session};
use crate::api::models::ParticipationUpdate;
use crate::config::settings::DashboardSettings;
use crate::stats::rank_players;

#[derive(Clone)]
pub struct DashboardState {
    client: StatsClient,
    settings: DashboardSettings,
    pages: Arc<Pages>,
    key: Key,
}

impl DashboardState {
    /// `key` seals the session cookies; sessions do not survive a new key.
    pub fn new(client: StatsClient, settings: DashboardSettings, key: Key) -> Result<Self, tera::Error> {
        Ok(Self {
            client,
            settings,
            pages: Arc::new(Pages::new()?),
            key,
        })
    }
}

impl FromRef<DashboardState> for Key {
    fn from_ref(state: &DashboardState) -> Self {
        state.key.clone()
    }
}

type Page = Result<Html<String>, PageError>;

pub fn create_router(state: DashboardState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/players", post(register_player))
        .route("/players/rename", post(rename_player))
        .route("/matches", post(register_match))
        .route("/matches/delete", post(delete_match))
        .route("/matches/edit", post(edit_participation))
        .with_state(state)
}

async fn home(
    State(state): State<DashboardState>,
    jar: PrivateCookieJar,
    query: Result<Query<HomeQuery>, QueryRejection>,
) -> Page {
    let session = Session::from_jar(&jar);
    match query {
        Ok(Query(query)) => render_home(&state, session, Vec::new(), &query).await,
        Err(rejection) => {
            let notices = vec![Notice::Error(rejection.body_text())];
            render_home(&state, session, notices, &HomeQuery::default()).await
        }
    }
}

async fn login(
    State(state): State<DashboardState>,
    jar: PrivateCookieJar,
    form: Result<Form<LoginForm>, FormRejection>,
) -> (PrivateCookieJar, Page) {
    let (jar, notice) = match form {
        Ok(Form(form)) => match state.client.login(&form.username, &form.password).await {
            Ok(reply) if reply.success => (sign_in(jar), Notice::Success("Logged in as admin.".into())),
            Ok(_) => (jar, Notice::Error("Invalid credentials".into())),
            Err(e) => (jar, client_notice(e)),
        },
        Err(rejection) => (jar, Notice::Error(rejection.body_text())),
    };

    let page = render_home(&state, Session::from_jar(&jar), vec![notice], &HomeQuery::default()).await;
    (jar, page)
}

async fn logout(State(state): State<DashboardState>, jar: PrivateCookieJar) -> (PrivateCookieJar, Page) {
    let jar = sign_out(jar);
    let notices = vec![Notice::Success("Logged out.".into())];
    let page = render_home(&state, Session::guest(), notices, &HomeQuery::default()).await;
    (jar, page)
}

async fn register_player(
    State(state): State<DashboardState>,
    jar: PrivateCookieJar,
    form: Result<Form<PlayerForm>, FormRejection>,
) -> Page {
    let session = Session::from_jar(&jar);
    let notice = match admin_guard(session) {
        Some(denied) => denied,
        None => match form {
            Ok(Form(form)) if form.name.trim().is_empty() => Notice::Warning("Enter a player name.".into()),
            Ok(Form(form)) => match state.client.create_player(form.name.trim()).await {
                Ok(reply) => Notice::Success(reply.msg),
                Err(e) => client_notice(e),
            },
            Err(rejection) => Notice::Error(rejection.body_text()),
        },
    };
    render_home(&state, session, vec![notice], &HomeQuery::default()).await
}

async fn rename_player(
    State(state): State<DashboardState>,
    jar: PrivateCookieJar,
    form: Result<Form<RenameForm>, FormRejection>,
) -> Page {
    let session = Session::from_jar(&jar);
    let notice = match admin_guard(session) {
        Some(denied) => denied,
        None => match form {
            Ok(Form(form)) => match state.client.rename_player(&form.old_name, form.new_name.trim()).await {
                Ok(reply) => Notice::Success(reply.msg),
                Err(e) => client_notice(e),
            },
            Err(rejection) => Notice::Error(rejection.body_text()),
        },
    };
    render_home(&state, session, vec![notice], &HomeQuery::default()).await
}

async fn register_match(
    State(state): State<DashboardState>,
    jar: PrivateCookieJar,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Page {
    let session = Session::from_jar(&jar);
    let mut notices = Vec::new();

    if let Some(denied) = admin_guard(session) {
        notices.push(denied);
    } else {
        match form {
            Ok(Form(fields)) => match parse_match_form(&fields, state.settings.roster_size) {
                Ok(payload) => match state.client.create_match(&payload).await {
                    Ok(created) => {
                        notices.push(Notice::Success(format!("{} (match #{})", created.msg, created.match_id)));
                        if !created.skipped_players.is_empty() {
                            notices.push(Notice::Warning(format!(
                                "Unregistered players were left out: {}",
                                created.skipped_players.join(", ")
                            )));
                        }
                    }
                    Err(e) => notices.push(client_notice(e)),
                },
                Err(e) => notices.push(Notice::Error(e.to_string())),
            },
            Err(rejection) => notices.push(Notice::Error(rejection.body_text())),
        }
    }

    render_home(&state, session, notices, &HomeQuery::default()).await
}

async fn delete_match(
    State(state): State<DashboardState>,
    jar: PrivateCookieJar,
    form: Result<Form<DeleteMatchForm>, FormRejection>,
) -> Page {
    let session = Session::from_jar(&jar);
    let notice = match admin_guard(session) {
        Some(denied) => denied,
        None => match form {
            Ok(Form(form)) => match state.client.delete_match(form.match_id, form.adjust_stats()).await {
                Ok(reply) => Notice::Success(reply.msg),
                Err(e) => client_notice(e),
            },
            Err(rejection) => Notice::Error(rejection.body_text()),
        },
    };
    render_home(&state, session, vec![notice], &HomeQuery::default()).await
}

/// Rewrites one participation row; player totals are left as they are.
async fn edit_participation(
    State(state): State<DashboardState>,
    jar: PrivateCookieJar,
    form: Result<Form<EditParticipationForm>, FormRejection>,
) -> Page {
    let session = Session::from_jar(&jar);
    let notice = match admin_guard(session) {
        Some(denied) => denied,
        None => match form {
            Ok(Form(form)) => {
                let update = ParticipationUpdate {
                    kills: form.kills,
                    deaths: form.deaths,
                    assists: form.assists,
                };
                match state
                    .client
                    .update_participation(form.match_id, &form.player_name, &update)
                    .await
                {
                    Ok(reply) => Notice::Success(reply.msg),
                    Err(e) => client_notice(e),
                }
            }
            Err(rejection) => Notice::Error(rejection.body_text()),
        },
    };
    render_home(&state, session, vec![notice], &HomeQuery::default()).await
}

// --- Helper Functions ---

fn admin_guard(session: Session) -> Option<Notice> {
    if session.is_admin {
        None
    } else {
        Some(Notice::Error("Admin login required.".into()))
    }
}

/// API-reported problems are warnings; failures to talk to the API are errors.
fn client_notice(error: ClientError) -> Notice {
    match error {
        ClientError::Api(msg) => Notice::Warning(msg),
        other => {
            log::warn!("Stats API call failed: {}", other);
            Notice::Error(other.to_string())
        }
    }
}

async fn render_home(state: &DashboardState, session: Session, mut notices: Vec<Notice>, query: &HomeQuery) -> Page {
    let mut view = HomeView::default();

    match state.client.list_players().await {
        Ok(players) => view.players = players,
        Err(e) => notices.push(client_notice(e)),
    }
    view.ranked = rank_players(
        view.players.iter().map(|p| (p.name.as_str(), &p.totals)),
        state.settings.ranking.min_ranked_matches,
    );

    if let Some(name) = query.player.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        match state.client.player_matches(name).await {
            Ok(rows) => view.history = Some((name.to_string(), rows)),
            Err(e) => notices.push(client_notice(e)),
        }
    }

    if let Some(match_id) = query.match_id() {
        match state.client.get_match(match_id).await {
            Ok(game) => view.hud = Some(game),
            Err(e) => notices.push(client_notice(e)),
        }
    }

    if session.is_admin {
        match state.client.overview().await {
            Ok(overview) => view.overview = Some(overview),
            Err(e) => notices.push(client_notice(e)),
        }
    }

    let html = state.pages.home(session, &notices, &view, &state.settings)?;
    Ok(Html(html))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use tower::ServiceExt;

    use crate::api::{self, handlers::AppState};
    use crate::config::settings::{AdminSettings, AppConfig, DatabaseSettings};
    use crate::database;

    struct Reply {
        status: StatusCode,
        cookie: Option<String>,
        html: String,
    }

    fn dashboard_for(api_url: &str) -> Router {
        let settings = DashboardSettings::default().with_api_url(Some(api_url.to_string()));
        let client = StatsClient::new(&settings).unwrap();
        create_router(DashboardState::new(client, settings, Key::generate()).unwrap())
    }

    // Points at a closed port, so every API call fails with a transport error.
    fn offline_app() -> Router {
        dashboard_for("http://127.0.0.1:9")
    }

    /// Serves the stats API over an in-memory database on an ephemeral port.
    async fn spawn_api() -> String {
        let pool = database::create_memory_pool().unwrap();
        {
            let conn = database::get_connection(&pool).unwrap();
            database::setup::ensure_schema(&conn).unwrap();
        }
        let config = AppConfig::new(
            AdminSettings::new("admin", "secret"),
            DatabaseSettings {
                path: ":memory:".into(),
            },
        );
        let app = api::create_router(Arc::new(AppState::new(pool, config)));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn send(app: &Router, method: Method, uri: &str, cookie: Option<&str>, form: &str) -> Reply {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let request = request
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        Reply {
            status,
            cookie,
            html: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    async fn admin_cookie(app: &Router) -> String {
        let reply = send(app, Method::POST, "/login", None, "username=admin&password=secret").await;
        assert!(reply.html.contains("Logged in as admin."));
        reply.cookie.unwrap()
    }

    #[tokio::test]
    async fn test_admin_actions_require_login() {
        let app = offline_app();

        let reply = send(&app, Method::POST, "/players", None, "name=Ash").await;

        assert_eq!(reply.status, StatusCode::OK);
        assert!(reply.html.contains("Admin login required."));
        assert!(!reply.html.contains("Register match"));
    }

    #[tokio::test]
    async fn test_unreachable_api_is_reported() {
        let app = offline_app();

        let reply = send(&app, Method::GET, "/", None, "").await;

        assert!(reply.html.contains("Could not reach the stats API"));
        assert!(reply.html.contains("No players with at least 3 matches yet."));
    }

    #[tokio::test]
    async fn test_forged_session_cookie_is_not_admin() {
        let app = offline_app();

        let reply = send(&app, Method::GET, "/", Some("fpl_session=admin"), "").await;

        assert!(reply.html.contains("Admin login"));
        assert!(!reply.html.contains("Register match"));
    }

    #[tokio::test]
    async fn test_rejected_login_sets_no_cookie() {
        let app = dashboard_for(&spawn_api().await);

        let reply = send(&app, Method::POST, "/login", None, "username=admin&password=wrong").await;

        assert!(reply.html.contains("Invalid credentials"));
        assert!(reply.cookie.is_none());
        assert!(!reply.html.contains("Register match"));
    }

    #[tokio::test]
    async fn test_admin_session_belongs_to_its_cookie() {
        let app = dashboard_for(&spawn_api().await);
        let cookie = admin_cookie(&app).await;

        let admin_view = send(&app, Method::GET, "/", Some(&cookie), "").await;
        assert!(admin_view.html.contains("Register match"));
        assert!(admin_view.html.contains("Total players: <b>0</b>"));

        let other_visitor = send(&app, Method::GET, "/", None, "").await;
        assert!(!other_visitor.html.contains("Register match"));
        assert!(other_visitor.html.contains("Admin login"));

        let denied = send(&app, Method::POST, "/players", None, "name=Ash").await;
        assert!(denied.html.contains("Admin login required."));
        let check = send(&app, Method::GET, "/", Some(&cookie), "").await;
        assert!(check.html.contains("Total players: <b>0</b>"));
    }

    #[tokio::test]
    async fn test_match_flow_through_dashboard() {
        let app = dashboard_for(&spawn_api().await);
        let cookie = admin_cookie(&app).await;

        for name in ["Ash", "Ben"] {
            let reply = send(&app, Method::POST, "/players", Some(&cookie), &format!("name={}", name)).await;
            assert!(reply.html.contains("Player registered successfully."));
        }

        let form = "map=Bank&score_blue=5&score_red=3\
                    &player_0=Ash&kills_0=10&deaths_0=2&assists_0=1\
                    &player_1=Ghost&kills_1=0&deaths_1=0&assists_1=0\
                    &player_5=Ben&kills_5=4&deaths_5=6&assists_5=0";
        let reply = send(&app, Method::POST, "/matches", Some(&cookie), form).await;
        assert!(reply.html.contains("Match saved successfully. (match #1)"));
        assert!(reply.html.contains("Unregistered players were left out: Ghost"));

        let history = send(&app, Method::GET, "/?player=Ash", None, "").await;
        assert!(history.html.contains("Match history: Ash"));
        assert!(history.html.contains("<td>W</td>"));

        let hud = send(&app, Method::GET, "/?match_id=1", None, "").await;
        assert!(hud.html.contains("HUD - Bank"));
        assert!(hud.html.contains("Blue 5 x 3 Red"));
        assert!(hud.html.contains("<td>Ben</td>"));

        let deleted = send(&app, Method::POST, "/matches/delete", None, "match_id=1&adjust_stats=on").await;
        assert!(deleted.html.contains("Admin login required."));
        let still_there = send(&app, Method::GET, "/?match_id=1", None, "").await;
        assert!(still_there.html.contains("HUD - Bank"));

        let deleted = send(&app, Method::POST, "/matches/delete", Some(&cookie), "match_id=1&adjust_stats=on").await;
        assert!(deleted.html.contains("Match deleted; stats reverted for 2 players."));
    }

    #[tokio::test]
    async fn test_missing_match_is_a_warning() {
        let app = dashboard_for(&spawn_api().await);

        let reply = send(&app, Method::GET, "/?match_id=42", None, "").await;

        assert!(reply.html.contains("notice warning\">Match not found"));
    }

    #[tokio::test]
    async fn test_bad_match_form_is_reported_without_calling_api() {
        let app = dashboard_for(&spawn_api().await);
        let cookie = admin_cookie(&app).await;

        let reply = send(&app, Method::POST, "/matches", Some(&cookie), "map=Bank&score_blue=x&score_red=1").await;

        assert!(reply.html.contains("score_blue must be a whole number"));
        let overview = send(&app, Method::GET, "/", Some(&cookie), "").await;
        assert!(overview.html.contains("Total matches: <b>0</b>"));
    }

    #[tokio::test]
    async fn test_logout_clears_the_session() {
        let app = dashboard_for(&spawn_api().await);
        let cookie = admin_cookie(&app).await;

        let reply = send(&app, Method::POST, "/logout", Some(&cookie), "").await;

        assert!(reply.html.contains("Logged out."));
        assert!(reply.html.contains("Admin login"));
        let removal = reply.cookie.unwrap();
        assert!(removal.starts_with("fpl_session="));
    }

    #[test]
    fn test_client_notice_levels() {
        assert_eq!(
            client_notice(ClientError::Api("Match not found".into())),
            Notice::Warning("Match not found".into())
        );
        assert!(matches!(
            client_notice(ClientError::Unexpected {
                status: reqwest::StatusCode::BAD_GATEWAY
            }),
            Notice::Error(_)
        ));
    }
}
