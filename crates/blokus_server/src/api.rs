//! HTTP transport.
//!
//! JSON request/response routes per session, plus a server-sent-events
//! stream of game events. Rejected placements are answered with a 200
//! and a rejected outcome; HTTP errors are reserved for malformed or
//! misrouted requests.

use crate::authority::SessionId;
use crate::error::ServerError;
use crate::session::SessionManager;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{Request, StatusCode};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::{get, post};
use axum::{Json, Router};
use blokus_core::{
    Cell, ClientId, GameOverSummary, GamePhase, GameSnapshot, Occupant, Outcome, PieceId,
    PlayerColor, Shape,
};
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use tokio::sync::broadcast::error::RecvError;
use tower::ServiceBuilder;
use tracing::{debug, info, instrument, warn};

/// Body of `POST /sessions/{id}/players`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRequest {
    /// Joining client.
    pub client_id: ClientId,
    /// Requested color; the first free color if absent.
    #[serde(default)]
    pub color: Option<PlayerColor>,
}

/// Answer to a join.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinResponse {
    /// Assigned color.
    pub color: PlayerColor,
}

/// Body of `POST /sessions/{id}/placements`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementRequest {
    /// Requesting client.
    pub client_id: ClientId,
    /// Piece to place.
    pub piece_id: PieceId,
    /// Offsets in the orientation the client chose.
    pub shape: Shape,
    /// Board cell under the `(0, 0)` offset.
    pub anchor: Cell,
}

/// Body of `POST /sessions/{id}/finish`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinishRequest {
    /// Requesting client.
    pub client_id: ClientId,
}

/// Turn state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResponse {
    /// Lifecycle phase.
    pub phase: GamePhase,
    /// Acting color, if any.
    pub acting_color: Option<PlayerColor>,
}

/// Board state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardResponse {
    /// 400 row-major occupant codes.
    pub grid: Vec<i8>,
    /// Text rendering, top row first.
    pub rendering: String,
}

/// One cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellResponse {
    /// The cell.
    pub cell: Cell,
    /// Its occupant.
    pub occupant: Occupant,
    /// The occupant's wire code.
    pub code: i8,
}

/// Created session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCreated {
    /// New session id.
    pub session_id: SessionId,
}

/// Query of `GET /sessions/{id}/events`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventsQuery {
    /// Receive rejections addressed to this client.
    pub client_id: Option<ClientId>,
}

/// Builds the router over `sessions`.
#[instrument(skip(sessions))]
pub fn router(sessions: SessionManager) -> Router {
    Router::new()
        .route("/sessions", get(list_sessions))
        .route("/sessions/{session_id}", post(create_session))
        .route("/sessions/{session_id}/players", post(join))
        .route("/sessions/{session_id}/placements", post(place))
        .route("/sessions/{session_id}/finish", post(finish))
        .route("/sessions/{session_id}/board", get(board))
        .route("/sessions/{session_id}/cells/{x}/{y}", get(cell))
        .route("/sessions/{session_id}/turn", get(turn))
        .route("/sessions/{session_id}/summary", get(summary))
        .route("/sessions/{session_id}/snapshot", get(snapshot))
        .route("/sessions/{session_id}/events", get(events))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            debug!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(sessions)
}

async fn list_sessions(
    State(sessions): State<SessionManager>,
) -> Result<Json<Vec<SessionId>>, ServerError> {
    Ok(Json(sessions.list_sessions()?))
}

#[instrument(skip(sessions))]
async fn create_session(
    State(sessions): State<SessionManager>,
    Path(session_id): Path<SessionId>,
) -> Result<(StatusCode, Json<SessionCreated>), ServerError> {
    let authority = sessions.create_session(session_id)?;
    Ok((
        StatusCode::CREATED,
        Json(SessionCreated {
            session_id: authority.session_id().to_string(),
        }),
    ))
}

#[instrument(skip(sessions, request), fields(client_id = %request.client_id))]
async fn join(
    State(sessions): State<SessionManager>,
    Path(session_id): Path<SessionId>,
    Json(request): Json<JoinRequest>,
) -> Result<Json<JoinResponse>, ServerError> {
    let color = sessions
        .get_session(&session_id)?
        .join(request.client_id, request.color)?;
    info!(%color, "Player seated");
    Ok(Json(JoinResponse { color }))
}

#[instrument(skip(sessions, request), fields(client_id = %request.client_id, piece_id = request.piece_id))]
async fn place(
    State(sessions): State<SessionManager>,
    Path(session_id): Path<SessionId>,
    Json(request): Json<PlacementRequest>,
) -> Result<Json<Outcome>, ServerError> {
    let outcome = sessions.get_session(&session_id)?.submit_placement(
        &request.client_id,
        request.piece_id,
        request.shape,
        request.anchor,
    )?;
    Ok(Json(outcome))
}

#[instrument(skip(sessions, request), fields(client_id = %request.client_id))]
async fn finish(
    State(sessions): State<SessionManager>,
    Path(session_id): Path<SessionId>,
    Json(request): Json<FinishRequest>,
) -> Result<Json<TurnResponse>, ServerError> {
    let (phase, acting_color) = sessions
        .get_session(&session_id)?
        .request_finish(&request.client_id)?;
    Ok(Json(TurnResponse { phase, acting_color }))
}

async fn board(
    State(sessions): State<SessionManager>,
    Path(session_id): Path<SessionId>,
) -> Result<Json<BoardResponse>, ServerError> {
    let (grid, rendering) = sessions.get_session(&session_id)?.board()?;
    Ok(Json(BoardResponse { grid, rendering }))
}

async fn cell(
    State(sessions): State<SessionManager>,
    Path((session_id, x, y)): Path<(SessionId, i32, i32)>,
) -> Result<Json<CellResponse>, ServerError> {
    let cell = Cell::new(x, y);
    let occupant = sessions.get_session(&session_id)?.occupant_at(cell)?;
    Ok(Json(CellResponse {
        cell,
        occupant,
        code: occupant.code(),
    }))
}

async fn turn(
    State(sessions): State<SessionManager>,
    Path(session_id): Path<SessionId>,
) -> Result<Json<TurnResponse>, ServerError> {
    let (phase, acting_color) = sessions.get_session(&session_id)?.turn()?;
    Ok(Json(TurnResponse { phase, acting_color }))
}

async fn summary(
    State(sessions): State<SessionManager>,
    Path(session_id): Path<SessionId>,
) -> Result<Json<GameOverSummary>, ServerError> {
    Ok(Json(sessions.get_session(&session_id)?.summary()?))
}

async fn snapshot(
    State(sessions): State<SessionManager>,
    Path(session_id): Path<SessionId>,
) -> Result<Json<GameSnapshot>, ServerError> {
    Ok(Json(sessions.get_session(&session_id)?.snapshot()?))
}

#[instrument(skip(sessions, query))]
async fn events(
    State(sessions): State<SessionManager>,
    Path(session_id): Path<SessionId>,
    Query(query): Query<EventsQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ServerError> {
    let receiver = sessions.get_session(&session_id)?.subscribe();
    info!(client_id = ?query.client_id, "Event stream opened");

    let stream = futures::stream::unfold(
        (receiver, query.client_id),
        |(mut receiver, client_id)| async move {
            loop {
                let event = match receiver.recv().await {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Event stream lagged");
                        continue;
                    }
                    Err(RecvError::Closed) => return None,
                };
                if event
                    .recipient()
                    .is_some_and(|to| Some(to) != client_id.as_deref())
                {
                    continue;
                }
                match Event::default().event(event.kind()).json_data(&event) {
                    Ok(sse) => return Some((Ok::<_, Infallible>(sse), (receiver, client_id))),
                    Err(e) => warn!(error = %e, "Failed to encode event"),
                }
            }
        },
    );

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
