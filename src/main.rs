//src/main.rs

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod models;
mod services;

use crate::config::AppState;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Fluxos de entrada do pipeline (captação e geração de documentos)
    let comercial_routes = Router::new()
        .route("/leads"
               ,post(handlers::comercial::create_lead)
               .get(handlers::comercial::list_leads)
        )
        .route("/propostas"
               ,post(handlers::comercial::create_proposta)
               .get(handlers::comercial::list_propostas)
        )
        .route("/contratos"
               ,post(handlers::comercial::create_contrato)
               .get(handlers::comercial::list_contratos)
        );

    // O quadro unificado e o drag-and-drop do operador
    let funil_routes = Router::new()
        .route("/", get(handlers::funil::get_funil))
        .route("/transicao", post(handlers::funil::transicionar))
        .route("/metricas", get(handlers::funil::get_metricas));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/comercial", comercial_routes)
        .nest("/api/funil", funil_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
