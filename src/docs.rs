// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Funil ---
        handlers::funil::get_funil,
        handlers::funil::transicionar,
        handlers::funil::get_metricas,

        // --- Comercial ---
        handlers::comercial::create_lead,
        handlers::comercial::list_leads,
        handlers::comercial::create_proposta,
        handlers::comercial::list_propostas,
        handlers::comercial::create_contrato,
        handlers::comercial::list_contratos,
    ),
    components(
        schemas(
            models::comercial::Lead,
            models::comercial::LeadStatus,
            models::comercial::Proposal,
            models::comercial::ProposalStatus,
            models::comercial::Contract,
            models::comercial::ContractStatus,
            models::funil::FunilTipo,
            models::funil::Stage,
            models::funil::FunilItem,
            models::funil::FinancialMetrics,

            // --- Payloads ---
            handlers::funil::TransicaoPayload,
            handlers::comercial::CreateLeadPayload,
            handlers::comercial::CreatePropostaPayload,
            handlers::comercial::CreateContratoPayload,
        )
    ),
    tags(
        (name = "Funil", description = "Quadro unificado do pipeline comercial e KPIs"),
        (name = "Comercial", description = "Captação de leads, propostas e contratos")
    )
)]
pub struct ApiDoc;
