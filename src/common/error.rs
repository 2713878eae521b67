use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::funil::FunilTipo;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // O status alvo não pertence ao vocabulário do tipo do card.
    // Nunca é retentado: a ação é rejeitada e o funil fica como estava.
    #[error("Status '{status}' não pertence ao vocabulário de '{tipo}'")]
    InvalidTransition { tipo: FunilTipo, status: String },

    #[error("Registro não encontrado")]
    NotFound,

    // Reservado para stores que reportam versão defasada; o Postgres daqui
    // opera em last-write-wins e nunca levanta este erro.
    #[error("O registro foi alterado por outro operador")]
    Conflict,

    // Falha transitória de I/O do store externo. Propagada sem retry:
    // política de retry (se houver) pertence ao cliente do store.
    #[error("Erro de banco de dados")]
    StoreUnavailable(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidTransition { ref tipo, ref status } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("O status '{}' não é válido para um registro do tipo '{}'.", status, tipo),
            ),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                "Registro não encontrado. Atualize o funil e tente novamente.".to_string(),
            ),
            AppError::Conflict => (
                StatusCode::CONFLICT,
                "O registro foi alterado por outro operador.".to_string(),
            ),

            // Todos os outros erros (StoreUnavailable, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
