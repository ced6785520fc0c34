use std::{env, fmt::Display, str::FromStr};

use log::*;
use rand::{distributions::Alphanumeric, Rng};

/// Reads and parses the environment variable `name`. Missing or unparseable values fall back to `default`, with a log
/// entry saying so.
pub fn env_or_default<T>(name: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(name) {
        Ok(s) => s.trim().parse::<T>().unwrap_or_else(|e| {
            warn!("🪛️ {s} is not a valid value for {name}. {e} Using the default, {default}, instead.");
            default
        }),
        Err(_) => {
            info!("🪛️ {name} is not set. Using the default value of {default}.");
            default
        },
    }
}

/// A random lowercase alphanumeric identifier of the given length. Used for payment ids and log entry ids.
pub fn random_id(len: usize) -> String {
    rand::thread_rng().sample_iter(&Alphanumeric).take(len).map(|c| char::from(c).to_ascii_lowercase()).collect()
}
