use dotenvy::dotenv;
use log::info;
use payment_simulator::{cli::handle_command_line_args, config::SimulatorConfig, server::run_server};

#[actix_web::main]
async fn main() {
    dotenv().ok();
    env_logger::init();
    if handle_command_line_args() {
        return;
    }
    let config = SimulatorConfig::from_env_or_default();

    info!("🚀️ Starting payment simulator on {}:{}", config.host, config.port);
    match run_server(config).await {
        Ok(_) => println!("Bye!"),
        Err(e) => eprintln!("{e}"),
    }
}
