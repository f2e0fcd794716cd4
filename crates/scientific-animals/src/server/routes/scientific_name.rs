//! Scientific-name endpoint

use axum::{body::Bytes, extract::State, Json};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{ScientificNameRequest, ScientificNameResponse};

/// POST /scientific-name - Ask for an animal's scientific name
///
/// The body is read raw so that a missing body, a wrong content type and
/// malformed JSON all produce the same 400 payload.
pub async fn scientific_name(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ScientificNameResponse>> {
    let request = ScientificNameRequest::from_body(&body)?;
    let question = request.question();

    tracing::info!("Question: \"{}\"", question);

    let answer = state.pipeline().get_scientific_name(&question).await?;

    Ok(Json(ScientificNameResponse::new(answer)))
}
