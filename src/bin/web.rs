//! Single binary web server exposing the tournament engine as a JSON REST API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, and the league points POINTS_WIN, POINTS_DRAW, POINTS_LOSS.

use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::{Deserialize, Serialize};
use shuttle_draw::{
    parse_roster_csv, Engine, Format, MatchId, Participant, PointsTable, TournamentError,
    TournamentId, TournamentStatus, TournamentStore,
};
use uuid::Uuid;

/// Engine configuration plus the store all tournaments live in.
struct AppState {
    engine: Engine,
    store: TournamentStore,
}

type State = Data<AppState>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
    tournaments: usize,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(default)]
    format: Format,
}

#[derive(Deserialize)]
struct RosterEntry {
    #[serde(default)]
    id: Option<Uuid>,
    name: String,
    #[serde(default)]
    seed: Option<u32>,
}

impl From<RosterEntry> for Participant {
    fn from(entry: RosterEntry) -> Self {
        let participant = Participant::with_id(entry.id.unwrap_or_else(Uuid::new_v4), entry.name);
        match entry.seed {
            Some(seed) => participant.seeded(seed),
            None => participant,
        }
    }
}

#[derive(Deserialize)]
struct BuildDrawBody {
    participants: Vec<RosterEntry>,
}

#[derive(Deserialize)]
struct RecordResultBody {
    score_1: i64,
    score_2: i64,
    /// Version from the caller's last read; omit to skip the optimistic check.
    #[serde(default)]
    expected_version: Option<u64>,
}

#[derive(Deserialize)]
struct StatusBody {
    status: TournamentStatus,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and match id
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: MatchId,
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string(), "retryable": e.is_retryable() });
    match e {
        TournamentError::TournamentNotFound(_) | TournamentError::MatchNotFound(_) => {
            HttpResponse::NotFound().json(body)
        }
        TournamentError::AlreadyBuilt
        | TournamentError::AlreadyRecorded(_)
        | TournamentError::NotReady(_)
        | TournamentError::InvalidStateTransition { .. }
        | TournamentError::TournamentCompleted
        | TournamentError::Conflict { .. } => HttpResponse::Conflict().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn respond<T: Serialize>(result: Result<T, TournamentError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => {
            log::warn!("Rejected request: {}", e);
            error_response(&e)
        }
    }
}

#[get("/api/health")]
async fn api_health(state: State) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "shuttle-draw",
        tournaments: state.store.len(),
    })
}

/// Create a tournament (returns it with id; client stores id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: State, body: Json<CreateTournamentBody>) -> HttpResponse {
    let body = body.into_inner();
    if body.name.trim().is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": "Name is required" }));
    }
    let tournament = state
        .engine
        .create_tournament(&state.store, body.name.trim(), body.format);
    HttpResponse::Created().json(tournament)
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: State, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.store.get(path.id))
}

#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: State, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.engine.remove_tournament(&state.store, path.id))
}

/// Build the bracket or fixture list from a JSON roster.
#[post("/api/tournaments/{id}/draw")]
async fn api_build_draw(state: State, path: Path<TournamentPath>, body: Json<BuildDrawBody>) -> HttpResponse {
    let participants = body
        .into_inner()
        .participants
        .into_iter()
        .map(Participant::from)
        .collect();
    respond(state.engine.build_bracket(&state.store, path.id, participants))
}

/// Build the draw from a CSV roster (`name,seed,id` header).
#[post("/api/tournaments/{id}/draw/csv")]
async fn api_build_draw_csv(state: State, path: Path<TournamentPath>, body: String) -> HttpResponse {
    let result = parse_roster_csv(body.as_bytes())
        .and_then(|participants| state.engine.build_bracket(&state.store, path.id, participants));
    respond(result)
}

/// Bracket (knockout) or fixtures and standings (round robin).
#[get("/api/tournaments/{id}/bracket")]
async fn api_bracket(state: State, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.engine.bracket_view(&state.store, path.id))
}

#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: State, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.engine.standings(&state.store, path.id))
}

/// Match ids awaiting a result.
#[get("/api/tournaments/{id}/matches/pending")]
async fn api_pending_matches(state: State, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.engine.pending_matches(&state.store, path.id))
}

#[put("/api/tournaments/{id}/matches/{match_id}/result")]
async fn api_record_result(
    state: State,
    path: Path<TournamentMatchPath>,
    body: Json<RecordResultBody>,
) -> HttpResponse {
    respond(state.engine.record_result(
        &state.store,
        path.id,
        path.match_id,
        body.score_1,
        body.score_2,
        body.expected_version,
    ))
}

#[put("/api/tournaments/{id}/status")]
async fn api_set_status(state: State, path: Path<TournamentPath>, body: Json<StatusBody>) -> HttpResponse {
    respond(state.engine.transition_status(&state.store, path.id, body.status))
}

fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(api_create_tournament)
        .service(api_get_tournament)
        .service(api_delete_tournament)
        .service(api_build_draw)
        .service(api_build_draw_csv)
        .service(api_bracket)
        .service(api_standings)
        .service(api_pending_matches)
        .service(api_record_result)
        .service(api_set_status);
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn points_from_env() -> PointsTable {
    let defaults = PointsTable::default();
    PointsTable {
        win: env_or("POINTS_WIN", defaults.win),
        draw: env_or("POINTS_DRAW", defaults.draw),
        loss: env_or("POINTS_LOSS", defaults.loss),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = env_or("PORT", default_port());
    let points = points_from_env();
    log::info!(
        "Starting server at http://{}:{} (points win/draw/loss {}/{}/{})",
        host,
        port,
        points.win,
        points.draw,
        points.loss
    );

    let state = Data::new(AppState {
        engine: Engine::new(points),
        store: TournamentStore::new(),
    });

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind((host.as_str(), port))?
        .run()
        .await
}
