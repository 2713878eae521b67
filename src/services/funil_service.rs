// src/services/funil_service.rs

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::FunilStore,
    models::comercial::{Contract, ContractStatus, Lead, Proposal, ProposalStatus},
    models::funil::{FinancialMetrics, FunilBoard, FunilItem, FunilTipo, Stage, StatusAlvo},
};

// O coração do painel comercial: unifica leads, propostas e contratos num
// único funil ordenado e resolve o drag-and-drop de volta para um UPDATE de
// status no registro certo.
#[derive(Clone)]
pub struct FunilService {
    store: Arc<dyn FunilStore>,
}

impl FunilService {
    pub fn new(store: Arc<dyn FunilStore>) -> Self {
        Self { store }
    }

    /// Leitura completa das três coleções -> quadro com as sete colunas.
    /// Sem cache: staleness é problema de quem chama.
    pub async fn montar_funil(&self) -> Result<FunilBoard, AppError> {
        let leads = self.store.list_leads().await?;
        let proposals = self.store.list_proposals().await?;
        let contracts = self.store.list_contracts().await?;

        Ok(montar_board(leads, proposals, contracts))
    }

    /// Executa uma transição pedida pelo operador. A ordem de validação
    /// importa: primeiro o vocabulário, depois a existência do registro.
    pub async fn transicionar(
        &self,
        tipo: FunilTipo,
        item_id: Uuid,
        target_status: &str,
    ) -> Result<(), AppError> {
        let alvo = StatusAlvo::parse(tipo, target_status).ok_or_else(|| {
            AppError::InvalidTransition {
                tipo,
                status: target_status.to_string(),
            }
        })?;

        tracing::debug!("Transição: {} {} -> '{}'", tipo, item_id, alvo.as_str());

        // Um único UPDATE; nenhuma cascata acontece aqui
        self.store.update_status(item_id, alvo).await
    }

    /// KPIs sobre as coleções cruas (as regras de "aberto"/"andamento" são
    /// por tipo, então não dá para calcular em cima dos FunilItem).
    pub async fn calcular_metricas(&self) -> Result<FinancialMetrics, AppError> {
        let leads = self.store.list_leads().await?;
        let proposals = self.store.list_proposals().await?;
        let contracts = self.store.list_contracts().await?;

        Ok(calcular_metricas_de(&leads, &proposals, &contracts))
    }
}

// --- MONTAGEM DO QUADRO ---
// Pura e determinística: mesmas coleções, mesmo quadro.
fn montar_board(leads: Vec<Lead>, proposals: Vec<Proposal>, contracts: Vec<Contract>) -> FunilBoard {
    // As sete colunas existem mesmo vazias
    let mut board: FunilBoard = BTreeMap::new();
    for etapa in Stage::TODAS {
        board.insert(etapa, Vec::new());
    }

    let items = leads
        .into_iter()
        .map(FunilItem::from)
        .chain(proposals.into_iter().map(FunilItem::from))
        .chain(contracts.into_iter().map(FunilItem::from));

    for item in items {
        board.entry(item.stage).or_default().push(item);
    }

    // Mais antigo primeiro: o operador atende quem espera há mais tempo.
    // Desempate pelo id sintético para a ordem ser estável entre leituras.
    for coluna in board.values_mut() {
        coluna.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    }

    board
}

// --- KPIs ---
fn calcular_metricas_de(
    leads: &[Lead],
    proposals: &[Proposal],
    contracts: &[Contract],
) -> FinancialMetrics {
    let abertos: Vec<&Proposal> = proposals
        .iter()
        .filter(|p| {
            matches!(
                p.status,
                ProposalStatus::Draft | ProposalStatus::Enviado | ProposalStatus::Negociacao
            )
        })
        .collect();

    let contratos_andamento = contracts
        .iter()
        .filter(|c| {
            matches!(
                c.status,
                ContractStatus::Draft | ContractStatus::Enviado | ContractStatus::EmAndamento
            )
        })
        .count() as u64;

    let assinados: Vec<&Contract> = contracts
        .iter()
        .filter(|c| c.status == ContractStatus::Assinado)
        .collect();

    let valor_orcamentos_abertos: Decimal = abertos.iter().map(|p| p.total_price).sum();
    let valor_contratos_assinados: Decimal = assinados.iter().map(|c| c.total_price).sum();

    let orcamentos_abertos = abertos.len() as u64;
    let contratos_assinados = assinados.len() as u64;
    // Todos os leads já capturados, não só os 'aguardando'
    let total_leads = leads.len() as u64;

    // Divisões guardadas: zero assinado/zero lead => 0, nunca NaN
    let ticket_medio = if contratos_assinados == 0 {
        Decimal::ZERO
    } else {
        (valor_contratos_assinados / Decimal::from(contratos_assinados)).round_dp(2)
    };

    let taxa_conversao = if total_leads == 0 {
        Decimal::ZERO
    } else {
        (Decimal::from(contratos_assinados) / Decimal::from(total_leads) * Decimal::ONE_HUNDRED)
            .round_dp(2)
    };

    FinancialMetrics {
        total_leads,
        orcamentos_abertos,
        contratos_andamento,
        contratos_assinados,
        valor_orcamentos_abertos,
        valor_contratos_assinados,
        ticket_medio,
        taxa_conversao,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};

    use crate::models::comercial::LeadStatus;

    // Dublê em memória do contrato de store; last-write-wins como o real
    #[derive(Default)]
    struct StoreEmMemoria {
        leads: Mutex<Vec<Lead>>,
        proposals: Mutex<Vec<Proposal>>,
        contracts: Mutex<Vec<Contract>>,
    }

    #[async_trait]
    impl FunilStore for StoreEmMemoria {
        async fn list_leads(&self) -> Result<Vec<Lead>, AppError> {
            Ok(self.leads.lock().unwrap().clone())
        }

        async fn list_proposals(&self) -> Result<Vec<Proposal>, AppError> {
            Ok(self.proposals.lock().unwrap().clone())
        }

        async fn list_contracts(&self) -> Result<Vec<Contract>, AppError> {
            Ok(self.contracts.lock().unwrap().clone())
        }

        async fn update_status(&self, id: Uuid, alvo: StatusAlvo) -> Result<(), AppError> {
            match alvo {
                StatusAlvo::Quote(status) => {
                    let mut leads = self.leads.lock().unwrap();
                    let lead = leads.iter_mut().find(|l| l.id == id).ok_or(AppError::NotFound)?;
                    lead.status = status;
                }
                StatusAlvo::Proposal(status) => {
                    let mut proposals = self.proposals.lock().unwrap();
                    let proposal = proposals
                        .iter_mut()
                        .find(|p| p.id == id)
                        .ok_or(AppError::NotFound)?;
                    proposal.status = status;
                }
                StatusAlvo::Contract(status) => {
                    let mut contracts = self.contracts.lock().unwrap();
                    let contract = contracts
                        .iter_mut()
                        .find(|c| c.id == id)
                        .ok_or(AppError::NotFound)?;
                    contract.status = status;
                }
            }
            Ok(())
        }
    }

    fn dia(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, d, 10, 0, 0).unwrap()
    }

    fn lead(nome: &str, status: LeadStatus, criado: DateTime<Utc>) -> Lead {
        Lead {
            id: Uuid::new_v4(),
            name: nome.to_string(),
            email: format!("{}@email.com", nome.to_lowercase()),
            phone: "+55 11 90000-0000".to_string(),
            event_type: "casamento".to_string(),
            event_date: None,
            event_location: "Campinas - SP".to_string(),
            status,
            created_at: criado,
        }
    }

    fn proposta(
        nome: &str,
        status: ProposalStatus,
        valor: i64,
        lead_id: Option<Uuid>,
        criado: DateTime<Utc>,
    ) -> Proposal {
        Proposal {
            id: Uuid::new_v4(),
            quote_request_id: lead_id,
            client_name: nome.to_string(),
            email: format!("{}@email.com", nome.to_lowercase()),
            phone: "+55 11 90000-0000".to_string(),
            event_type: "casamento".to_string(),
            event_date: None,
            event_location: "Campinas - SP".to_string(),
            total_price: Decimal::from(valor),
            status,
            created_at: criado,
        }
    }

    fn contrato(
        nome: &str,
        status: ContractStatus,
        valor: i64,
        criado: DateTime<Utc>,
    ) -> Contract {
        Contract {
            id: Uuid::new_v4(),
            proposal_id: None,
            client_name: nome.to_string(),
            email: format!("{}@email.com", nome.to_lowercase()),
            phone: "+55 11 90000-0000".to_string(),
            event_type: "casamento".to_string(),
            event_date: None,
            event_location: "Campinas - SP".to_string(),
            total_price: Decimal::from(valor),
            status,
            created_at: criado,
        }
    }

    fn servico(store: StoreEmMemoria) -> FunilService {
        FunilService::new(Arc::new(store))
    }

    #[tokio::test]
    async fn quadro_vazio_ainda_tem_as_sete_colunas() {
        let service = servico(StoreEmMemoria::default());

        let board = service.montar_funil().await.unwrap();

        assert_eq!(board.len(), 7);
        let colunas: Vec<Stage> = board.keys().copied().collect();
        assert_eq!(colunas, Stage::TODAS.to_vec());
        assert!(board.values().all(|coluna| coluna.is_empty()));
    }

    #[tokio::test]
    async fn quadro_e_deterministico_para_o_mesmo_dataset() {
        let store = StoreEmMemoria::default();
        store.leads.lock().unwrap().extend([
            lead("Ana", LeadStatus::Aguardando, dia(3)),
            lead("Bia", LeadStatus::Aguardando, dia(1)),
        ]);
        store
            .proposals
            .lock()
            .unwrap()
            .push(proposta("Carla", ProposalStatus::Negociacao, 8000, None, dia(2)));
        let service = servico(store);

        let primeira = serde_json::to_value(service.montar_funil().await.unwrap()).unwrap();
        let segunda = serde_json::to_value(service.montar_funil().await.unwrap()).unwrap();

        assert_eq!(primeira, segunda);
    }

    #[tokio::test]
    async fn colunas_ordenadas_do_mais_antigo_para_o_mais_novo() {
        let store = StoreEmMemoria::default();
        // Inseridos fora de ordem de propósito
        store.leads.lock().unwrap().extend([
            lead("Ana", LeadStatus::Aguardando, dia(20)),
            lead("Bia", LeadStatus::Aguardando, dia(5)),
            lead("Carla", LeadStatus::Aguardando, dia(12)),
        ]);
        let service = servico(store);

        let board = service.montar_funil().await.unwrap();
        let nomes: Vec<&str> = board[&Stage::LeadCaptado]
            .iter()
            .map(|item| item.name.as_str())
            .collect();

        assert_eq!(nomes, vec!["Bia", "Carla", "Ana"]);
    }

    #[tokio::test]
    async fn registro_mais_antigo_inserido_depois_entra_na_frente() {
        let store = Arc::new(StoreEmMemoria::default());
        store
            .leads
            .lock()
            .unwrap()
            .push(lead("Ana", LeadStatus::Aguardando, dia(10)));
        let service = FunilService::new(store.clone());

        let board = service.montar_funil().await.unwrap();
        assert_eq!(board[&Stage::LeadCaptado][0].name, "Ana");

        // Chega um lead importado com data anterior: reposiciona na frente
        store
            .leads
            .lock()
            .unwrap()
            .push(lead("Bia", LeadStatus::Aguardando, dia(2)));

        let board = service.montar_funil().await.unwrap();
        let nomes: Vec<&str> = board[&Stage::LeadCaptado]
            .iter()
            .map(|item| item.name.as_str())
            .collect();
        assert_eq!(nomes, vec!["Bia", "Ana"]);
    }

    #[tokio::test]
    async fn perdido_absorve_qualquer_um_dos_tres_tipos() {
        let store = StoreEmMemoria::default();
        store
            .leads
            .lock()
            .unwrap()
            .push(lead("Ana", LeadStatus::Perdido, dia(1)));
        store
            .proposals
            .lock()
            .unwrap()
            .push(proposta("Bia", ProposalStatus::Perdido, 5000, None, dia(2)));
        store
            .contracts
            .lock()
            .unwrap()
            .push(contrato("Carla", ContractStatus::Perdido, 9000, dia(3)));
        let service = servico(store);

        let board = service.montar_funil().await.unwrap();

        assert_eq!(board[&Stage::Perdido].len(), 3);
        // e em nenhuma outra coluna
        for etapa in Stage::TODAS.iter().filter(|e| **e != Stage::Perdido) {
            assert!(board[etapa].is_empty(), "coluna {:?} deveria estar vazia", etapa);
        }
    }

    #[tokio::test]
    async fn transicao_rejeita_status_fora_do_vocabulario_do_tipo() {
        let store = StoreEmMemoria::default();
        let ana = lead("Ana", LeadStatus::Aguardando, dia(1));
        let ana_id = ana.id;
        store.leads.lock().unwrap().push(ana);
        let service = servico(store);

        let antes = serde_json::to_value(service.montar_funil().await.unwrap()).unwrap();

        // 'assinado' é vocabulário de contrato
        let err = service
            .transicionar(FunilTipo::Quote, ana_id, "assinado")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));

        // e o funil fica exatamente como estava
        let depois = serde_json::to_value(service.montar_funil().await.unwrap()).unwrap();
        assert_eq!(antes, depois);
    }

    #[tokio::test]
    async fn transicao_valida_move_o_card_na_proxima_leitura() {
        let store = StoreEmMemoria::default();
        let ana = lead("Ana", LeadStatus::Aguardando, dia(1));
        let ana_id = ana.id;
        store.leads.lock().unwrap().push(ana);
        let service = servico(store);

        service
            .transicionar(FunilTipo::Quote, ana_id, "contatado")
            .await
            .unwrap();

        let board = service.montar_funil().await.unwrap();
        assert!(board[&Stage::LeadCaptado].is_empty());
        assert_eq!(board[&Stage::ContatoRealizado].len(), 1);
        assert_eq!(board[&Stage::ContatoRealizado][0].original_id, ana_id);
        assert_eq!(board[&Stage::ContatoRealizado][0].status, "contatado");
    }

    #[tokio::test]
    async fn transicao_para_o_mesmo_status_e_idempotente() {
        let store = StoreEmMemoria::default();
        let ana = lead("Ana", LeadStatus::Contatado, dia(1));
        let ana_id = ana.id;
        store.leads.lock().unwrap().push(ana);
        let service = servico(store);

        service
            .transicionar(FunilTipo::Quote, ana_id, "contatado")
            .await
            .unwrap();

        let board = service.montar_funil().await.unwrap();
        assert_eq!(board[&Stage::ContatoRealizado].len(), 1);
    }

    #[tokio::test]
    async fn operador_pode_reverter_um_perdido() {
        // Sem grafo de transição: qualquer status do vocabulário é alcançável
        let store = StoreEmMemoria::default();
        let ana = lead("Ana", LeadStatus::Perdido, dia(1));
        let ana_id = ana.id;
        store.leads.lock().unwrap().push(ana);
        let service = servico(store);

        service
            .transicionar(FunilTipo::Quote, ana_id, "aguardando")
            .await
            .unwrap();

        let board = service.montar_funil().await.unwrap();
        assert!(board[&Stage::Perdido].is_empty());
        assert_eq!(board[&Stage::LeadCaptado].len(), 1);
    }

    #[tokio::test]
    async fn transicao_em_registro_apagado_da_not_found() {
        let service = servico(StoreEmMemoria::default());

        let err = service
            .transicionar(FunilTipo::Contract, Uuid::new_v4(), "assinado")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn metricas_sobre_colecoes_vazias_sao_todas_zero() {
        let service = servico(StoreEmMemoria::default());

        let metricas = service.calcular_metricas().await.unwrap();

        assert_eq!(metricas.total_leads, 0);
        assert_eq!(metricas.orcamentos_abertos, 0);
        assert_eq!(metricas.contratos_andamento, 0);
        assert_eq!(metricas.contratos_assinados, 0);
        assert_eq!(metricas.valor_orcamentos_abertos, Decimal::ZERO);
        assert_eq!(metricas.valor_contratos_assinados, Decimal::ZERO);
        // Divisões guardadas: 0, não NaN/Infinity
        assert_eq!(metricas.ticket_medio, Decimal::ZERO);
        assert_eq!(metricas.taxa_conversao, Decimal::ZERO);
    }

    #[tokio::test]
    async fn cenario_ponta_a_ponta_do_painel() {
        let store = StoreEmMemoria::default();

        let ana = lead("Ana", LeadStatus::Aguardando, dia(1));
        let bia = lead("Bia", LeadStatus::Contatado, dia(2));
        let proposta_bia =
            proposta("Bia", ProposalStatus::Enviado, 5000, Some(bia.id), dia(3));
        let contrato_carla = contrato("Carla", ContractStatus::Assinado, 12000, dia(4));

        let proposta_id = proposta_bia.id;
        store.leads.lock().unwrap().extend([ana.clone(), bia]);
        store.proposals.lock().unwrap().push(proposta_bia);
        store.contracts.lock().unwrap().push(contrato_carla.clone());
        let service = servico(store);

        // KPIs
        let metricas = service.calcular_metricas().await.unwrap();
        assert_eq!(metricas.total_leads, 2);
        assert_eq!(metricas.orcamentos_abertos, 1);
        assert_eq!(metricas.valor_orcamentos_abertos, Decimal::from(5000));
        assert_eq!(metricas.contratos_andamento, 0);
        assert_eq!(metricas.contratos_assinados, 1);
        assert_eq!(metricas.valor_contratos_assinados, Decimal::from(12000));
        assert_eq!(metricas.ticket_medio, Decimal::from(12000));
        // 1 assinado / 2 leads = 50%
        assert_eq!(metricas.taxa_conversao, Decimal::from(50));

        // Quadro
        let board = service.montar_funil().await.unwrap();
        assert_eq!(board[&Stage::LeadCaptado][0].original_id, ana.id);
        assert_eq!(board[&Stage::ContatoRealizado].len(), 1);

        let card_proposta = &board[&Stage::OrcamentoEnviado][0];
        assert_eq!(card_proposta.id, format!("proposal:{}", proposta_id));
        assert_eq!(card_proposta.status, "enviado");
        assert_eq!(card_proposta.total_price, Some(Decimal::from(5000)));

        let card_contrato = &board[&Stage::ContratoAssinado][0];
        assert_eq!(card_contrato.original_id, contrato_carla.id);
        assert_eq!(card_contrato.id, format!("contract:{}", contrato_carla.id));

        // Leads não carregam valor
        assert!(board[&Stage::LeadCaptado][0].total_price.is_none());
    }
}
