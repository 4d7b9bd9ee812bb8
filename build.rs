use std::env;
use std::fs::File;
use std::io::Write;
use std::path::{PathBuf, Path};

use anyhow::{Context, Result};

use reaction_config::ReactionConfig;

/// Generate build metadata file that is then included in code
fn build_metadata() -> Result<()> {
    built::write_built_file()?;
    Ok(())
}

// Copies the `memory.x` file from the crate root into a directory where
// the linker can always find it at build time.
fn memory(out: &Path) -> Result<()> {
    File::create(out.join("memory.x"))
        .and_then(|mut f| f.write_all(include_bytes!("memory.x")))
        .context("Saving memory.x")?;

    println!("cargo:rustc-link-search={}", out.display());
    // Only re-run when the linker script changes
    println!("cargo:rerun-if-changed=memory.x");

    Ok(())
}

fn json_config(out: &Path) -> Result<()>  {
    ReactionConfig::schema_to_file(&out.join("schema.json"))
        .context("While generating JSON schema")?;
    ReactionConfig::schema_to_file(Path::new("./schema.json"))
        .context("While generating JSON schema")?;

    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_JSON_CONFIG");
    println!("cargo:rerun-if-env-changed=REACTION_JSON_CONFIG");
    if env::var_os("CARGO_FEATURE_JSON_CONFIG").is_some() {
        let path = env::var_os("REACTION_JSON_CONFIG")
            .map(|s| s.into_string())
            .transpose()
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidData, "REACTION_JSON_CONFIG is not utf-8"))?
            .unwrap_or_else(|| String::from("reaction.json"));

        println!("cargo:rerun-if-changed={}", path);
        let config = ReactionConfig::from_file(Path::new(&path))
            .context(format!("While reading {}", path))?;

        config.to_file(&out.join("config.rs"))
            .context("While generating config.rs")?;
    } else if env::var_os("REACTION_JSON_CONFIG").is_some() {
        println!("cargo:warning=REACTION_JSON_CONFIG defined but ignored because feature \"json-config\" is not enabled");
    }

    Ok(())
}

fn main() -> Result<()>  {
    build_metadata()?;
    let out = &PathBuf::from(env::var_os("OUT_DIR").context("Could not get OUT_DIR")?);
    memory(out)?;
    json_config(out)?;
    Ok(())
}
