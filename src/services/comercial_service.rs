// src/services/comercial_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ComercialRepository, FunilStore},
    models::comercial::{Contract, Lead, Proposal},
};

// Fluxos de entrada do pipeline: captação de lead, geração de proposta e
// minuta de contrato. As cascatas de status (lead -> 'contatado',
// proposta -> 'aprovado') vivem nestes fluxos, dentro do repositório,
// nunca na transição do funil.
#[derive(Clone)]
pub struct ComercialService {
    repo: ComercialRepository,
}

impl ComercialService {
    pub fn new(repo: ComercialRepository) -> Self {
        Self { repo }
    }

    // --- LEADS ---

    pub async fn criar_lead(
        &self,
        name: &str,
        email: &str,
        phone: &str,
        event_type: &str,
        event_date: Option<NaiveDate>,
        event_location: &str,
    ) -> Result<Lead, AppError> {
        self.repo
            .create_lead(name, email, phone, event_type, event_date, event_location)
            .await
    }

    pub async fn listar_leads(&self) -> Result<Vec<Lead>, AppError> {
        self.repo.list_leads().await
    }

    // --- PROPOSTAS ---

    pub async fn criar_proposta(
        &self,
        quote_request_id: Option<Uuid>,
        client_name: &str,
        email: &str,
        phone: &str,
        event_type: &str,
        event_date: Option<NaiveDate>,
        event_location: &str,
        total_price: Decimal,
    ) -> Result<Proposal, AppError> {
        self.repo
            .create_proposal(
                quote_request_id,
                client_name,
                email,
                phone,
                event_type,
                event_date,
                event_location,
                total_price,
            )
            .await
    }

    pub async fn listar_propostas(&self) -> Result<Vec<Proposal>, AppError> {
        self.repo.list_proposals().await
    }

    // --- CONTRATOS ---

    pub async fn criar_contrato(
        &self,
        proposal_id: Option<Uuid>,
        client_name: &str,
        email: &str,
        phone: &str,
        event_type: &str,
        event_date: Option<NaiveDate>,
        event_location: &str,
        total_price: Decimal,
    ) -> Result<Contract, AppError> {
        self.repo
            .create_contract(
                proposal_id,
                client_name,
                email,
                phone,
                event_type,
                event_date,
                event_location,
                total_price,
            )
            .await
    }

    pub async fn listar_contratos(&self) -> Result<Vec<Contract>, AppError> {
        self.repo.list_contracts().await
    }
}
