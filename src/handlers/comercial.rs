// src/handlers/comercial.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::comercial::{Contract, Lead, Proposal},
};

// =============================================================================
//  ÁREA 1: LEADS (Pedidos de Orçamento)
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Mariana Castro")]
    pub name: String,

    #[validate(email(message = "invalid_email"))]
    #[schema(example = "mariana@email.com")]
    pub email: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "+55 11 98888-0000")]
    pub phone: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "casamento")]
    pub event_type: String,

    #[schema(value_type = Option<String>, format = Date, example = "2027-09-18")]
    pub event_date: Option<NaiveDate>,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "São Paulo - SP")]
    pub event_location: String,
}

// POST /api/comercial/leads
#[utoipa::path(
    post,
    path = "/api/comercial/leads",
    tag = "Comercial",
    request_body = CreateLeadPayload,
    responses(
        (status = 201, description = "Lead capturado (entra como 'aguardando')", body = Lead),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_lead(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateLeadPayload>,
) -> Result<impl IntoResponse, AppError> {

    payload.validate()?;

    let lead = app_state.comercial_service
        .criar_lead(
            &payload.name,
            &payload.email,
            &payload.phone,
            &payload.event_type,
            payload.event_date,
            &payload.event_location,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(lead)))
}

// GET /api/comercial/leads
#[utoipa::path(
    get,
    path = "/api/comercial/leads",
    tag = "Comercial",
    responses(
        (status = 200, description = "Todos os leads, do mais antigo para o mais novo", body = Vec<Lead>)
    )
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {

    let leads = app_state.comercial_service.listar_leads().await?;

    Ok((StatusCode::OK, Json(leads)))
}

// =============================================================================
//  ÁREA 2: PROPOSTAS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePropostaPayload {
    // Lead de origem; quando presente, o lead é marcado 'contatado'
    pub quote_request_id: Option<Uuid>,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Mariana Castro")]
    pub client_name: String,

    #[validate(email(message = "invalid_email"))]
    pub email: String,

    #[validate(length(min = 1, message = "required"))]
    pub phone: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "casamento")]
    pub event_type: String,

    #[schema(value_type = Option<String>, format = Date)]
    pub event_date: Option<NaiveDate>,

    #[validate(length(min = 1, message = "required"))]
    pub event_location: String,

    #[schema(example = "18500.00")]
    pub total_price: Decimal,
}

// POST /api/comercial/propostas
#[utoipa::path(
    post,
    path = "/api/comercial/propostas",
    tag = "Comercial",
    request_body = CreatePropostaPayload,
    responses(
        (status = 201, description = "Proposta gerada (entra como 'draft')", body = Proposal),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Lead de origem não encontrado")
    )
)]
pub async fn create_proposta(
    State(app_state): State<AppState>,
    Json(payload): Json<CreatePropostaPayload>,
) -> Result<impl IntoResponse, AppError> {

    payload.validate()?;

    let proposta = app_state.comercial_service
        .criar_proposta(
            payload.quote_request_id,
            &payload.client_name,
            &payload.email,
            &payload.phone,
            &payload.event_type,
            payload.event_date,
            &payload.event_location,
            payload.total_price,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(proposta)))
}

// GET /api/comercial/propostas
#[utoipa::path(
    get,
    path = "/api/comercial/propostas",
    tag = "Comercial",
    responses(
        (status = 200, description = "Todas as propostas", body = Vec<Proposal>)
    )
)]
pub async fn list_propostas(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {

    let propostas = app_state.comercial_service.listar_propostas().await?;

    Ok((StatusCode::OK, Json(propostas)))
}

// =============================================================================
//  ÁREA 3: CONTRATOS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateContratoPayload {
    // Proposta de origem; quando presente, a proposta é marcada 'aprovado'
    pub proposal_id: Option<Uuid>,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Mariana Castro")]
    pub client_name: String,

    #[validate(email(message = "invalid_email"))]
    pub email: String,

    #[validate(length(min = 1, message = "required"))]
    pub phone: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "casamento")]
    pub event_type: String,

    #[schema(value_type = Option<String>, format = Date)]
    pub event_date: Option<NaiveDate>,

    #[validate(length(min = 1, message = "required"))]
    pub event_location: String,

    #[schema(example = "18500.00")]
    pub total_price: Decimal,
}

// POST /api/comercial/contratos
#[utoipa::path(
    post,
    path = "/api/comercial/contratos",
    tag = "Comercial",
    request_body = CreateContratoPayload,
    responses(
        (status = 201, description = "Contrato minutado (entra como 'draft')", body = Contract),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Proposta de origem não encontrada")
    )
)]
pub async fn create_contrato(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateContratoPayload>,
) -> Result<impl IntoResponse, AppError> {

    payload.validate()?;

    let contrato = app_state.comercial_service
        .criar_contrato(
            payload.proposal_id,
            &payload.client_name,
            &payload.email,
            &payload.phone,
            &payload.event_type,
            payload.event_date,
            &payload.event_location,
            payload.total_price,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(contrato)))
}

// GET /api/comercial/contratos
#[utoipa::path(
    get,
    path = "/api/comercial/contratos",
    tag = "Comercial",
    responses(
        (status = 200, description = "Todos os contratos", body = Vec<Contract>)
    )
)]
pub async fn list_contratos(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {

    let contratos = app_state.comercial_service.listar_contratos().await?;

    Ok((StatusCode::OK, Json(contratos)))
}
