use std::{env, env::VarError};

/// There's no real CLI for the server, so just do quick 'n dirty
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        // We don't expect any CLI args, so always print the help
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    const DISPLAY_ENVS: [&str; 14] = [
        "RUST_LOG",
        "HS_HOST",
        "HS_PORT",
        "HS_DATABASE_URL",
        "HS_PAYMENT_SERVICE_URL",
        "HS_PUBLIC_URL",
        "HS_NGROK_URL",
        "HS_SERVICE_LOCATION",
        "HS_CONNECTION_METHOD",
        "HS_CURRENCY",
        "HS_DISPATCH_TIMEOUT",
        "HS_WEBHOOK_POLICY",
        "HS_PENDING_PAYMENT_TIMEOUT",
        "HS_SWEEP_INTERVAL",
    ];

    println!("Current environment values:");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
