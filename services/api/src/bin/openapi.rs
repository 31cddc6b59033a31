//! services/api/src/bin/openapi.rs
//!
//! Dumps the OpenAPI document of the health reports API (auth, analysis and
//! report endpoints) so client code can be generated without a running server.
//!
//! Usage: `openapi [OUTPUT]`, where `OUTPUT` defaults to `openapi.json`.

use api_lib::{error::ApiError, web::rest::ApiDoc};
use std::path::{Path, PathBuf};
use utoipa::OpenApi;

const DEFAULT_OUTPUT: &str = "openapi.json";

fn write_document(output: &Path) -> Result<(), ApiError> {
    let mut doc = ApiDoc::openapi();
    doc.info.title = "Health Reports API".to_string();
    doc.info.version = env!("CARGO_PKG_VERSION").to_string();

    let json = doc
        .to_pretty_json()
        .map_err(|e| ApiError::Internal(format!("Could not serialise the document: {e}")))?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, json)?;
    Ok(())
}

fn main() -> Result<(), ApiError> {
    let output = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    write_document(&output)?;
    println!("Wrote the health reports OpenAPI document to {}", output.display());
    Ok(())
}
