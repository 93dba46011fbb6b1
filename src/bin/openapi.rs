//! Print the OpenAPI document for the API without starting the server.

use anyhow::Result;

fn main() -> Result<()> {
    println!("{}", ekskurso::api::openapi().to_pretty_json()?);
    Ok(())
}
