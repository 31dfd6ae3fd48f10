use axum::{
    routing::{get, post},
    Router,
};
use quiz_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;

    // Idempotent schema setup, before the listener binds.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    let app = Router::new()
        .route("/health", get(routes::health::health))
        .route("/questao/listar/", get(routes::question::list_questions))
        .route("/questao/buscar/:id", get(routes::question::get_question))
        .route(
            "/questao/items/:id",
            get(routes::question::list_question_choices),
        )
        .route("/questao/quiz/aleatorio", get(routes::question::random_quiz))
        .route("/questao/:id/verificar", get(routes::question::verify_choice))
        .route("/questao/criar", post(routes::question::create_question))
        .route("/questao/:id/update", post(routes::question::update_question))
        .route(
            "/questao/items/:id/update",
            post(routes::question::update_choice),
        )
        .route("/questao/:id/deletar", post(routes::question::delete_question))
        .route("/items/:id/deletar", post(routes::question::delete_choice))
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
