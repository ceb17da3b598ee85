use student_records::{
    app::{build_app, serve},
    logging,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init("student_records=debug,axum=info,tower_http=info");

    let app_state = AppState::init().await?;
    let addr = app_state.config.bind_addr()?;

    let app = build_app(app_state);
    serve(app, addr).await
}
