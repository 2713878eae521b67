// src/handlers/funil.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::funil::{FinancialMetrics, FunilTipo},
};

// =============================================================================
//  QUADRO (Funil de Vendas)
// =============================================================================

// GET /api/funil
#[utoipa::path(
    get,
    path = "/api/funil",
    tag = "Funil",
    responses(
        (status = 200, description = "Quadro completo: as sete etapas com seus cards, do lead mais antigo para o mais novo")
    )
)]
pub async fn get_funil(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {

    let board = app_state.funil_service.montar_funil().await?;

    Ok((StatusCode::OK, Json(board)))
}

// =============================================================================
//  TRANSIÇÃO (drag-and-drop do operador)
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransicaoPayload {
    // O dropdown do operador sempre oferece o status fino do tipo,
    // nunca o nome da etapa
    #[schema(example = "quote")]
    pub item_type: FunilTipo,

    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub item_id: Uuid,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "contatado")]
    pub target_status: String,
}

// POST /api/funil/transicao
#[utoipa::path(
    post,
    path = "/api/funil/transicao",
    tag = "Funil",
    request_body = TransicaoPayload,
    responses(
        (status = 204, description = "Status gravado; o quadro deve ser relido (ou o card corrigido localmente)"),
        (status = 404, description = "Registro não existe mais no store"),
        (status = 422, description = "Status fora do vocabulário do tipo")
    )
)]
pub async fn transicionar(
    State(app_state): State<AppState>,
    Json(payload): Json<TransicaoPayload>,
) -> Result<impl IntoResponse, AppError> {

    payload.validate()?;

    app_state.funil_service
        .transicionar(payload.item_type, payload.item_id, &payload.target_status)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  KPIs
// =============================================================================

// GET /api/funil/metricas
#[utoipa::path(
    get,
    path = "/api/funil/metricas",
    tag = "Funil",
    responses(
        (status = 200, description = "KPIs financeiros do pipeline", body = FinancialMetrics)
    )
)]
pub async fn get_metricas(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {

    let metricas = app_state.funil_service.calcular_metricas().await?;

    Ok((StatusCode::OK, Json(metricas)))
}
