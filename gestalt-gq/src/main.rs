use gestalt::{armor, xml, Element};
use std::io::{self, Read};
use anyhow::{Context, Result, anyhow};
use structopt::StructOpt;
use std::str::from_utf8;

/// Validate and print gestalt XML documents, plain or base64 armored
#[derive(StructOpt)]
#[structopt(name = "gq", author = "Liv Fischer")]
struct Opt {
    /// wrap the document into base64 armor instead of printing it
    #[structopt(short, long)]
    armor: bool,
    /// print one element per line
    #[structopt(short, long, conflicts_with = "json")]
    pretty: bool,
    /// print the element tree as JSON
    #[structopt(short, long)]
    json: bool,
    /// line width of the armor, 0 disables wrapping
    #[structopt(short, long, default_value = "64")]
    width: usize,
}

fn main() -> Result<()> {
    let opt = Opt::from_args();
    let mut buffer = Vec::new();
    io::stdin().read_to_end(&mut buffer).context("Failed to read stdin")?;
    let root = parse(&buffer)?;
    if root.name() != xml::ROOT {
        return Err(anyhow!("document root is <{}>, not <{}>", root.name(), xml::ROOT));
    }
    if opt.armor {
        print!("{}", armor::encode(&root.to_string(), opt.width));
    } else if opt.json {
        println!("{}", serde_json::to_string_pretty(&root).context("Failed to serialize element tree")?);
    } else if opt.pretty {
        println!("{:#}", &root);
    } else {
        println!("{}", &root);
    }
    Ok(())
}

/// Markup starts with `<` once leading whitespace is skipped, anything else is taken for armor.
fn parse(buffer: &[u8]) -> Result<Element> {
    let text = from_utf8(buffer).context("input is not utf-8")?;
    if text.trim_start().starts_with('<') {
        return xml::parse_document(text).context("Invalid document");
    }
    let bytes = armor::decode(text).context("Invalid armor")?;
    let text = from_utf8(&bytes).context("armored document is not utf-8")?;
    xml::parse_document(text).context("Invalid armored document")
}
