// src/models/funil.rs

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::comercial::{
    Contract, ContractStatus, Lead, LeadStatus, Proposal, ProposalStatus,
};

// --- TIPO DE ORIGEM ---

// De qual das três coleções o card veio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FunilTipo {
    Quote,
    Proposal,
    Contract,
}

impl FunilTipo {
    pub fn as_str(self) -> &'static str {
        match self {
            FunilTipo::Quote => "quote",
            FunilTipo::Proposal => "proposal",
            FunilTipo::Contract => "contract",
        }
    }
}

impl fmt::Display for FunilTipo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- ETAPAS DO FUNIL ---

// Conjunto fechado e ordenado. A ordem de declaração É a ordem do funil
// (derive Ord), com 'perdido' como estado absorvente no final.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    LeadCaptado,
    ContatoRealizado,
    OrcamentoEnviado,
    EmNegociacao,
    ProntoContrato,
    ContratoAssinado,
    Perdido,
}

impl Stage {
    // As sete colunas do quadro, na ordem de exibição
    pub const TODAS: [Stage; 7] = [
        Stage::LeadCaptado,
        Stage::ContatoRealizado,
        Stage::OrcamentoEnviado,
        Stage::EmNegociacao,
        Stage::ProntoContrato,
        Stage::ContratoAssinado,
        Stage::Perdido,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::LeadCaptado => "lead-captado",
            Stage::ContatoRealizado => "contato-realizado",
            Stage::OrcamentoEnviado => "orcamento-enviado",
            Stage::EmNegociacao => "em-negociacao",
            Stage::ProntoContrato => "pronto-contrato",
            Stage::ContratoAssinado => "contrato-assinado",
            Stage::Perdido => "perdido",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- CLASSIFICADOR ---
// Função total (tipo, status) -> etapa. Como os vocabulários são enums
// fechados, um par desconhecido é irrepresentável: o compilador exige que
// cada braço exista.

impl From<LeadStatus> for Stage {
    fn from(status: LeadStatus) -> Self {
        match status {
            LeadStatus::Aguardando => Stage::LeadCaptado,
            LeadStatus::Contatado => Stage::ContatoRealizado,
            LeadStatus::Perdido => Stage::Perdido,
        }
    }
}

impl From<ProposalStatus> for Stage {
    fn from(status: ProposalStatus) -> Self {
        match status {
            ProposalStatus::Draft | ProposalStatus::Enviado => Stage::OrcamentoEnviado,
            ProposalStatus::Negociacao => Stage::EmNegociacao,
            ProposalStatus::Aprovado => Stage::ProntoContrato,
            ProposalStatus::Perdido => Stage::Perdido,
        }
    }
}

impl From<ContractStatus> for Stage {
    fn from(status: ContractStatus) -> Self {
        // Contrato só existe depois da proposta aprovada; enquanto não for
        // assinado ele permanece em 'pronto-contrato', sem etapa redundante.
        match status {
            ContractStatus::Draft | ContractStatus::Enviado | ContractStatus::EmAndamento => {
                Stage::ProntoContrato
            }
            ContractStatus::Assinado => Stage::ContratoAssinado,
            ContractStatus::Perdido => Stage::Perdido,
        }
    }
}

// --- STATUS ALVO DE UMA TRANSIÇÃO ---

// Um status que já provou pertencer ao vocabulário do seu tipo.
// É o único caminho para chegar num UPDATE de status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAlvo {
    Quote(LeadStatus),
    Proposal(ProposalStatus),
    Contract(ContractStatus),
}

impl StatusAlvo {
    /// Valida `value` contra o vocabulário de `tipo`. `None` = transição
    /// inválida (o valor pode até existir em OUTRO tipo, não importa).
    pub fn parse(tipo: FunilTipo, value: &str) -> Option<Self> {
        match tipo {
            FunilTipo::Quote => LeadStatus::parse(value).map(StatusAlvo::Quote),
            FunilTipo::Proposal => ProposalStatus::parse(value).map(StatusAlvo::Proposal),
            FunilTipo::Contract => ContractStatus::parse(value).map(StatusAlvo::Contract),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusAlvo::Quote(s) => s.as_str(),
            StatusAlvo::Proposal(s) => s.as_str(),
            StatusAlvo::Contract(s) => s.as_str(),
        }
    }
}

// --- ITEM DO FUNIL ---

// Projeção derivada, montada a cada leitura e nunca persistida.
// A etapa é sempre recalculada a partir de (tipo, status).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FunilItem {
    // Sintético: "{tipo}:{original_id}", único entre as três coleções
    #[schema(example = "proposal:550e8400-e29b-41d4-a716-446655440000")]
    pub id: String,
    pub original_id: Uuid,

    #[serde(rename = "type")]
    pub tipo: FunilTipo,

    pub name: String,
    pub email: String,
    pub phone: String,

    pub event_type: String,
    #[schema(value_type = Option<String>, format = Date)]
    pub event_date: Option<NaiveDate>,
    pub event_location: String,

    // Leads ainda não têm valor
    pub total_price: Option<Decimal>,

    // Status literal do registro de origem, sempre no vocabulário do tipo
    #[schema(example = "enviado")]
    pub status: String,
    pub stage: Stage,

    pub created_at: DateTime<Utc>,
}

impl From<Lead> for FunilItem {
    fn from(lead: Lead) -> Self {
        FunilItem {
            id: format!("{}:{}", FunilTipo::Quote, lead.id),
            original_id: lead.id,
            tipo: FunilTipo::Quote,
            name: lead.name,
            email: lead.email,
            phone: lead.phone,
            event_type: lead.event_type,
            event_date: lead.event_date,
            event_location: lead.event_location,
            total_price: None,
            status: lead.status.as_str().to_string(),
            stage: Stage::from(lead.status),
            created_at: lead.created_at,
        }
    }
}

impl From<Proposal> for FunilItem {
    fn from(proposal: Proposal) -> Self {
        FunilItem {
            id: format!("{}:{}", FunilTipo::Proposal, proposal.id),
            original_id: proposal.id,
            tipo: FunilTipo::Proposal,
            name: proposal.client_name,
            email: proposal.email,
            phone: proposal.phone,
            event_type: proposal.event_type,
            event_date: proposal.event_date,
            event_location: proposal.event_location,
            total_price: Some(proposal.total_price),
            status: proposal.status.as_str().to_string(),
            stage: Stage::from(proposal.status),
            created_at: proposal.created_at,
        }
    }
}

impl From<Contract> for FunilItem {
    fn from(contract: Contract) -> Self {
        FunilItem {
            id: format!("{}:{}", FunilTipo::Contract, contract.id),
            original_id: contract.id,
            tipo: FunilTipo::Contract,
            name: contract.client_name,
            email: contract.email,
            phone: contract.phone,
            event_type: contract.event_type,
            event_date: contract.event_date,
            event_location: contract.event_location,
            total_price: Some(contract.total_price),
            status: contract.status.as_str().to_string(),
            stage: Stage::from(contract.status),
            created_at: contract.created_at,
        }
    }
}

// O quadro completo: as sete colunas sempre presentes, mesmo vazias.
// BTreeMap + Ord de Stage mantém as colunas na ordem do funil.
pub type FunilBoard = BTreeMap<Stage, Vec<FunilItem>>;

// --- KPIs FINANCEIROS (Os Cards do Topo) ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialMetrics {
    #[schema(example = 42)]
    pub total_leads: u64,
    pub orcamentos_abertos: u64,
    pub contratos_andamento: u64,
    pub contratos_assinados: u64,

    #[schema(example = "37000.00")]
    pub valor_orcamentos_abertos: Decimal,
    #[schema(example = "125000.00")]
    pub valor_contratos_assinados: Decimal,

    // Médias sempre definidas: 0 quando o denominador é 0
    #[schema(example = "12500.00")]
    pub ticket_medio: Decimal,
    #[schema(example = "23.81")]
    pub taxa_conversao: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classificacao_cobre_todo_o_vocabulario_de_cada_tipo() {
        // Leads
        assert_eq!(Stage::from(LeadStatus::Aguardando), Stage::LeadCaptado);
        assert_eq!(Stage::from(LeadStatus::Contatado), Stage::ContatoRealizado);
        assert_eq!(Stage::from(LeadStatus::Perdido), Stage::Perdido);

        // Propostas
        assert_eq!(Stage::from(ProposalStatus::Draft), Stage::OrcamentoEnviado);
        assert_eq!(Stage::from(ProposalStatus::Enviado), Stage::OrcamentoEnviado);
        assert_eq!(Stage::from(ProposalStatus::Negociacao), Stage::EmNegociacao);
        assert_eq!(Stage::from(ProposalStatus::Aprovado), Stage::ProntoContrato);
        assert_eq!(Stage::from(ProposalStatus::Perdido), Stage::Perdido);

        // Contratos
        assert_eq!(Stage::from(ContractStatus::Draft), Stage::ProntoContrato);
        assert_eq!(Stage::from(ContractStatus::Enviado), Stage::ProntoContrato);
        assert_eq!(Stage::from(ContractStatus::EmAndamento), Stage::ProntoContrato);
        assert_eq!(Stage::from(ContractStatus::Assinado), Stage::ContratoAssinado);
        assert_eq!(Stage::from(ContractStatus::Perdido), Stage::Perdido);
    }

    #[test]
    fn etapas_seguem_a_ordem_do_funil() {
        let mut anterior = Stage::TODAS[0];
        for etapa in &Stage::TODAS[1..] {
            assert!(anterior < *etapa, "{:?} deveria vir antes de {:?}", anterior, etapa);
            anterior = *etapa;
        }
        // 'perdido' fecha a lista
        assert_eq!(*Stage::TODAS.last().unwrap(), Stage::Perdido);
    }

    #[test]
    fn nomes_das_etapas_batem_com_o_quadro() {
        assert_eq!(Stage::LeadCaptado.as_str(), "lead-captado");
        assert_eq!(Stage::ContatoRealizado.as_str(), "contato-realizado");
        assert_eq!(Stage::OrcamentoEnviado.as_str(), "orcamento-enviado");
        assert_eq!(Stage::EmNegociacao.as_str(), "em-negociacao");
        assert_eq!(Stage::ProntoContrato.as_str(), "pronto-contrato");
        assert_eq!(Stage::ContratoAssinado.as_str(), "contrato-assinado");
        assert_eq!(Stage::Perdido.as_str(), "perdido");

        // serde usa os mesmos nomes kebab-case
        for etapa in Stage::TODAS {
            let json = serde_json::to_value(etapa).unwrap();
            assert_eq!(json, serde_json::Value::String(etapa.as_str().to_string()));
        }
    }

    #[test]
    fn status_alvo_respeita_o_vocabulario_do_tipo() {
        // 'assinado' é de contrato, não de lead
        assert!(StatusAlvo::parse(FunilTipo::Quote, "assinado").is_none());
        // 'contatado' só existe para leads
        assert!(StatusAlvo::parse(FunilTipo::Proposal, "contatado").is_none());
        // 'em_andamento' só existe para contratos
        assert!(StatusAlvo::parse(FunilTipo::Proposal, "em_andamento").is_none());

        assert_eq!(
            StatusAlvo::parse(FunilTipo::Quote, "contatado"),
            Some(StatusAlvo::Quote(LeadStatus::Contatado))
        );
        assert_eq!(
            StatusAlvo::parse(FunilTipo::Proposal, "negociacao"),
            Some(StatusAlvo::Proposal(ProposalStatus::Negociacao))
        );
        assert_eq!(
            StatusAlvo::parse(FunilTipo::Contract, "em_andamento"),
            Some(StatusAlvo::Contract(ContractStatus::EmAndamento))
        );

        // 'perdido' existe nos três vocabulários, cada um no seu tipo
        assert_eq!(
            StatusAlvo::parse(FunilTipo::Quote, "perdido"),
            Some(StatusAlvo::Quote(LeadStatus::Perdido))
        );
        assert_eq!(
            StatusAlvo::parse(FunilTipo::Contract, "perdido"),
            Some(StatusAlvo::Contract(ContractStatus::Perdido))
        );
    }
}
