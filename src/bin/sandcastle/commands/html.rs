//! `sandcastle html` command

use anyhow::Result;
use serde_json::json;

use crate::cli::HtmlArgs;
use crate::commands::to_json;
use sandcastle::html::extract;
use sandcastle::util::fs::read_to_string;

pub fn execute(args: HtmlArgs) -> Result<()> {
    let document = read_to_string(&args.file)?;
    let info = extract(Some(&document));

    let output = json!({
        "body": info.body,
        "externalResources": info.external_resources,
    });
    println!("{}", to_json(&output, args.pretty)?);

    Ok(())
}
