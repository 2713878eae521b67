// src/models/comercial.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- ENUMS DE STATUS ---
// Cada coleção tem o seu próprio vocabulário fechado. Os três vocabulários
// são disjuntos em significado mesmo onde a grafia coincide ('perdido' e
// 'draft' existem em mais de um, mas nunca atravessam tipos).

// Mapeia o CREATE TYPE lead_status do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "lead_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    Aguardando,
    Contatado,
    Perdido,
}

impl LeadStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LeadStatus::Aguardando => "aguardando",
            LeadStatus::Contatado => "contatado",
            LeadStatus::Perdido => "perdido",
        }
    }

    /// Aceita apenas valores do vocabulário de leads.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "aguardando" => Some(LeadStatus::Aguardando),
            "contatado" => Some(LeadStatus::Contatado),
            "perdido" => Some(LeadStatus::Perdido),
            _ => None,
        }
    }
}

// Mapeia o CREATE TYPE proposal_status do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "proposal_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Draft,
    Enviado,
    Negociacao,
    Aprovado,
    Perdido,
}

impl ProposalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProposalStatus::Draft => "draft",
            ProposalStatus::Enviado => "enviado",
            ProposalStatus::Negociacao => "negociacao",
            ProposalStatus::Aprovado => "aprovado",
            ProposalStatus::Perdido => "perdido",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(ProposalStatus::Draft),
            "enviado" => Some(ProposalStatus::Enviado),
            "negociacao" => Some(ProposalStatus::Negociacao),
            "aprovado" => Some(ProposalStatus::Aprovado),
            "perdido" => Some(ProposalStatus::Perdido),
            _ => None,
        }
    }
}

// Mapeia o CREATE TYPE contract_status do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "contract_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Draft,
    Enviado,
    EmAndamento,
    Assinado,
    Perdido,
}

impl ContractStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ContractStatus::Draft => "draft",
            ContractStatus::Enviado => "enviado",
            ContractStatus::EmAndamento => "em_andamento",
            ContractStatus::Assinado => "assinado",
            ContractStatus::Perdido => "perdido",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(ContractStatus::Draft),
            "enviado" => Some(ContractStatus::Enviado),
            "em_andamento" => Some(ContractStatus::EmAndamento),
            "assinado" => Some(ContractStatus::Assinado),
            "perdido" => Some(ContractStatus::Perdido),
            _ => None,
        }
    }
}

// --- REGISTROS DE ORIGEM ---

// Pedido de orçamento capturado pelo site (o "lead")
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,

    #[schema(example = "Mariana Castro")]
    pub name: String,
    #[schema(example = "mariana@email.com")]
    pub email: String,
    #[schema(example = "+55 11 98888-0000")]
    pub phone: String,

    #[schema(example = "casamento")]
    pub event_type: String,
    #[schema(value_type = Option<String>, format = Date, example = "2027-09-18")]
    pub event_date: Option<NaiveDate>,
    #[schema(example = "São Paulo - SP")]
    pub event_location: String,

    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: Uuid,

    // Lead que originou a proposta (nem toda proposta nasce de um lead)
    pub quote_request_id: Option<Uuid>,

    #[schema(example = "Mariana Castro")]
    pub client_name: String,
    pub email: String,
    pub phone: String,

    pub event_type: String,
    #[schema(value_type = Option<String>, format = Date)]
    pub event_date: Option<NaiveDate>,
    pub event_location: String,

    #[schema(example = "18500.00")]
    pub total_price: Decimal,

    pub status: ProposalStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: Uuid,

    // Proposta aprovada que virou contrato
    pub proposal_id: Option<Uuid>,

    #[schema(example = "Mariana Castro")]
    pub client_name: String,
    pub email: String,
    pub phone: String,

    pub event_type: String,
    #[schema(value_type = Option<String>, format = Date)]
    pub event_date: Option<NaiveDate>,
    pub event_location: String,

    #[schema(example = "18500.00")]
    pub total_price: Decimal,

    pub status: ContractStatus,
    pub created_at: DateTime<Utc>,
}
