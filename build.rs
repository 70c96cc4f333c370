//! Build script for spotify-mcp.
//!
//! Copies the `.env.example` configuration template into the user's local data
//! directory (`<data_local_dir>/spotify-mcp/.env.example`), next to the `.env`
//! the binary loads at startup.

use std::{env, fs, path::PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("spotify-mcp");

    // A read-only home (CI sandboxes) must not fail the build.
    if let Err(e) = fs::create_dir_all(&out_dir) {
        println!(
            "cargo:warning=cannot create {}: {}",
            out_dir.display(),
            e
        );
        return Ok(());
    }

    if env_example_path.is_file() {
        let contents = fs::read_to_string(&env_example_path)?;
        if let Err(e) = fs::write(out_dir.join(".env.example"), contents) {
            println!("cargo:warning=cannot copy .env.example: {}", e);
        }
    } else {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
    }

    Ok(())
}
