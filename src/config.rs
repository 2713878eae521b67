// src/config.rs

use std::sync::Arc;
use std::{env, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::ComercialRepository,
    services::{ComercialService, FunilService},
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub comercial_service: ComercialService,
    pub funil_service: FunilService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let repo = ComercialRepository::new(db_pool.clone());
        let comercial_service = ComercialService::new(repo.clone());
        // O funil só enxerga o contrato de store, nunca a pool
        let funil_service = FunilService::new(Arc::new(repo));

        Ok(Self {
            db_pool,
            comercial_service,
            funil_service,
        })
    }
}
