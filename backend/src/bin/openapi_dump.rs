//! Print the OpenAPI document as JSON.

use bloodmatch::doc::ApiDoc;
use utoipa::OpenApi;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let document = ApiDoc::openapi().to_pretty_json()?;
    #[expect(clippy::print_stdout, reason = "the dump is written to stdout for tooling")]
    {
        println!("{document}");
    }
    Ok(())
}
