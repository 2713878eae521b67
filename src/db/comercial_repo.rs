// src/db/comercial_repo.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::comercial::{Contract, Lead, LeadStatus, Proposal, ProposalStatus},
    models::funil::StatusAlvo,
};

// O contrato que o funil consome dos stores de entidade. O serviço do funil
// só conhece esta trait; o Postgres entra aqui, o dublê em memória entra nos
// testes.
#[async_trait]
pub trait FunilStore: Send + Sync {
    async fn list_leads(&self) -> Result<Vec<Lead>, AppError>;
    async fn list_proposals(&self) -> Result<Vec<Proposal>, AppError>;
    async fn list_contracts(&self) -> Result<Vec<Contract>, AppError>;

    /// Grava UM status no registro correto. `StatusAlvo` já carrega a prova
    /// de que o valor pertence ao vocabulário do tipo.
    async fn update_status(&self, id: Uuid, alvo: StatusAlvo) -> Result<(), AppError>;
}

// O repositório comercial, responsável pelas três tabelas do pipeline
#[derive(Clone)]
pub struct ComercialRepository {
    pool: PgPool,
}

impl ComercialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  LEADS (Pedidos de Orçamento)
    // =========================================================================

    /// Captura um lead vindo do site; entra sempre como 'aguardando'
    pub async fn create_lead(
        &self,
        name: &str,
        email: &str,
        phone: &str,
        event_type: &str,
        event_date: Option<NaiveDate>,
        event_location: &str,
    ) -> Result<Lead, AppError> {
        let lead = sqlx::query_as::<_, Lead>(
            r#"
            INSERT INTO leads (name, email, phone, event_type, event_date, event_location, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'aguardando')
            RETURNING id, name, email, phone, event_type, event_date, event_location, status, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(event_type)
        .bind(event_date)
        .bind(event_location)
        .fetch_one(&self.pool)
        .await?;

        Ok(lead)
    }

    // =========================================================================
    //  PROPOSTAS
    // =========================================================================

    /// Gera uma proposta. Se nasceu de um lead, o lead vira 'contatado'
    /// na mesma transação (a cascata mora aqui, nunca na transição).
    pub async fn create_proposal(
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
        let mut tx = self.pool.begin().await?;

        let proposal = sqlx::query_as::<_, Proposal>(
            r#"
            INSERT INTO proposals (
                quote_request_id, client_name, email, phone,
                event_type, event_date, event_location, total_price, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'draft')
            RETURNING
                id, quote_request_id, client_name, email, phone,
                event_type, event_date, event_location, total_price, status, created_at
            "#,
        )
        .bind(quote_request_id)
        .bind(client_name)
        .bind(email)
        .bind(phone)
        .bind(event_type)
        .bind(event_date)
        .bind(event_location)
        .bind(total_price)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(lead_id) = quote_request_id {
            let result = sqlx::query("UPDATE leads SET status = $1 WHERE id = $2")
                .bind(LeadStatus::Contatado)
                .bind(lead_id)
                .execute(&mut *tx)
                .await?;

            // Lead inexistente = pedido malformado; desfaz a proposta junto
            if result.rows_affected() == 0 {
                return Err(AppError::NotFound);
            }
        }

        tx.commit().await?;

        Ok(proposal)
    }

    // =========================================================================
    //  CONTRATOS
    // =========================================================================

    /// Minuta um contrato. Se veio de uma proposta, a proposta é marcada
    /// 'aprovado' na mesma transação.
    pub async fn create_contract(
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
        let mut tx = self.pool.begin().await?;

        let contract = sqlx::query_as::<_, Contract>(
            r#"
            INSERT INTO contracts (
                proposal_id, client_name, email, phone,
                event_type, event_date, event_location, total_price, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'draft')
            RETURNING
                id, proposal_id, client_name, email, phone,
                event_type, event_date, event_location, total_price, status, created_at
            "#,
        )
        .bind(proposal_id)
        .bind(client_name)
        .bind(email)
        .bind(phone)
        .bind(event_type)
        .bind(event_date)
        .bind(event_location)
        .bind(total_price)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(origem) = proposal_id {
            let result = sqlx::query("UPDATE proposals SET status = $1 WHERE id = $2")
                .bind(ProposalStatus::Aprovado)
                .bind(origem)
                .execute(&mut *tx)
                .await?;

            if result.rows_affected() == 0 {
                return Err(AppError::NotFound);
            }
        }

        tx.commit().await?;

        Ok(contract)
    }
}

#[async_trait]
impl FunilStore for ComercialRepository {
    async fn list_leads(&self) -> Result<Vec<Lead>, AppError> {
        let leads = sqlx::query_as::<_, Lead>(
            r#"
            SELECT id, name, email, phone, event_type, event_date, event_location, status, created_at
            FROM leads
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(leads)
    }

    async fn list_proposals(&self) -> Result<Vec<Proposal>, AppError> {
        let proposals = sqlx::query_as::<_, Proposal>(
            r#"
            SELECT
                id, quote_request_id, client_name, email, phone,
                event_type, event_date, event_location, total_price, status, created_at
            FROM proposals
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(proposals)
    }

    async fn list_contracts(&self) -> Result<Vec<Contract>, AppError> {
        let contracts = sqlx::query_as::<_, Contract>(
            r#"
            SELECT
                id, proposal_id, client_name, email, phone,
                event_type, event_date, event_location, total_price, status, created_at
            FROM contracts
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(contracts)
    }

    async fn update_status(&self, id: Uuid, alvo: StatusAlvo) -> Result<(), AppError> {
        // Cada braço grava na tabela do seu tipo; nenhuma etapa é persistida,
        // ela é sempre recalculada na próxima leitura.
        let result = match alvo {
            StatusAlvo::Quote(status) => {
                sqlx::query("UPDATE leads SET status = $1 WHERE id = $2")
                    .bind(status)
                    .bind(id)
                    .execute(&self.pool)
                    .await?
            }
            StatusAlvo::Proposal(status) => {
                sqlx::query("UPDATE proposals SET status = $1 WHERE id = $2")
                    .bind(status)
                    .bind(id)
                    .execute(&self.pool)
                    .await?
            }
            StatusAlvo::Contract(status) => {
                sqlx::query("UPDATE contracts SET status = $1 WHERE id = $2")
                    .bind(status)
                    .bind(id)
                    .execute(&self.pool)
                    .await?
            }
        };

        // Registro apagado por outro operador entre a leitura e o drag
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
