use crate::{api::AppState, config::Config, error, server};

pub async fn serve(config: Config) {
    let state = match AppState::new(config) {
        Ok(state) => state,
        Err(e) => error!("Cannot start web server. Err: {}", e),
    };

    if let Err(e) = server::start_web_server(state).await {
        error!("Web server stopped. Err: {}", e);
    }
}
