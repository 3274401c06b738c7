/*
SIWA_TEAM_ID='team_id' SIWA_CLIENT_ID='client_id' SIWA_KEY_ID='key_id' \
SIWA_AUTH_KEY_FILE='/path/AuthKey_xxx.p8' \
cargo run -p supabase-siwa-client-secret-cli --bin supabase_siwa_client_secret_gen

Or put the variables in a .env file next to the binary.

If SIWA_KEY_ID is unset or still the YOUR_KEY_ID placeholder, the program
prompts for it on stdin.
*/

use std::{
    env, fs,
    io::{self, BufRead as _, Write as _},
    process,
};

use supabase_siwa_client_secret::create;

const KEY_ID_PLACEHOLDER: &str = "YOUR_KEY_ID";
const RULE_WIDTH: usize = 60;

fn main() {
    let _ = dotenvy::dotenv();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    };

    print_rule('=');
    println!("Apple Sign In - Client Secret Generator");
    print_rule('=');
    println!();

    let key_id = match config.key_id {
        Some(key_id) => key_id,
        None => {
            print_key_id_help();
            match prompt_key_id() {
                Ok(key_id) => key_id,
                Err(err) => {
                    eprintln!("{err}");
                    process::exit(1);
                }
            }
        }
    };

    let auth_key_bytes = match fs::read(&config.auth_key_file) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("failed to read {}: {err}", config.auth_key_file);
            process::exit(1);
        }
    };

    println!();
    println!("Generating client secret...");
    println!();

    let client_secret = match create(
        &key_id,
        auth_key_bytes,
        &config.team_id,
        &config.client_id,
        None,
        None,
    ) {
        Ok(client_secret) => client_secret,
        Err(err) => {
            eprintln!("failed to generate client secret: {err}");
            process::exit(1);
        }
    };

    print_rule('=');
    println!("Client secret generated");
    print_rule('=');
    println!();
    println!("Copy the following into Supabase:");
    println!();
    print_rule('-');
    println!("{client_secret}");
    print_rule('-');
    println!();
    println!("Configuration used:");
    println!("  Team ID: {}", config.team_id);
    println!("  Key ID: {key_id}");
    println!("  Client ID: {}", config.client_id);
    println!();
    println!("In the Supabase Dashboard:");
    println!("  Authentication -> Providers -> Apple");
    println!("  - Client ID: {}", config.client_id);
    println!("  - Client Secret: (paste the secret above)");
    println!("  - Key ID: {key_id}");
    println!("  - Team ID: {}", config.team_id);
    println!();
}

//
struct Config {
    team_id: String,
    client_id: String,
    key_id: Option<String>,
    auth_key_file: String,
}

impl Config {
    fn from_env() -> Result<Self, String> {
        let team_id = require_var("SIWA_TEAM_ID")?;
        let client_id = require_var("SIWA_CLIENT_ID")?;
        let auth_key_file = require_var("SIWA_AUTH_KEY_FILE")?;
        let key_id = normalize_key_id(env::var("SIWA_KEY_ID").ok());

        Ok(Self {
            team_id,
            client_id,
            key_id,
            auth_key_file,
        })
    }
}

fn require_var(name: &str) -> Result<String, String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_owned()),
        _ => Err(format!("environment variable {name} is required")),
    }
}

// None means the caller must prompt for a real value.
fn normalize_key_id(raw: Option<String>) -> Option<String> {
    let key_id = raw?.trim().to_owned();
    if key_id.is_empty() || key_id == KEY_ID_PLACEHOLDER {
        None
    } else {
        Some(key_id)
    }
}

fn print_key_id_help() {
    println!("A Key ID is required to generate the client secret.");
    println!();
    println!("To find your Key ID:");
    println!("1. Sign in to Apple Developer");
    println!("2. Open Certificates, Identifiers & Profiles");
    println!("3. Select Keys in the sidebar");
    println!("4. Open the key created for Sign in with Apple");
    println!("5. Copy the Key ID shown there (e.g. ABC123DEF4)");
    println!();
}

fn prompt_key_id() -> Result<String, String> {
    print!("Enter your Key ID: ");
    io::stdout()
        .flush()
        .map_err(|err| format!("failed to flush stdout: {err}"))?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|err| format!("failed to read Key ID: {err}"))?;

    let key_id = line.trim().to_owned();
    if key_id.is_empty() {
        return Err("Key ID must not be empty".to_owned());
    }
    Ok(key_id)
}

fn print_rule(ch: char) {
    println!("{}", ch.to_string().repeat(RULE_WIDTH));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key_id() {
        assert_eq!(normalize_key_id(None), None);
        assert_eq!(normalize_key_id(Some("".to_owned())), None);
        assert_eq!(normalize_key_id(Some("  ".to_owned())), None);
        assert_eq!(normalize_key_id(Some("YOUR_KEY_ID".to_owned())), None);
        assert_eq!(
            normalize_key_id(Some(" 7H3K2M9QX4 ".to_owned())),
            Some("7H3K2M9QX4".to_owned())
        );
    }
}
