use anyhow::{ensure, Context, Result};
use gestalt::{aggregate, binary, fragment, xml, Aggregate, BinaryDecoder, Options};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, PartialEq)]
struct Reading {
    idx: i32,
    name: String,
    data: Vec<f64>,
}

impl Aggregate for Reading {
    fn to_bytes(&self) -> gestalt::Result<Vec<u8>> {
        let mut bytes = binary::to_bytes(&self.idx)?;
        bytes.extend(binary::to_bytes(&self.name)?);
        bytes.extend(binary::to_bytes(&self.data)?);
        Ok(bytes)
    }

    fn from_bytes(bytes: &[u8]) -> gestalt::Result<Self> {
        let mut decoder = BinaryDecoder::new(bytes);
        Ok(Reading { idx: decoder.decode()?, name: decoder.decode()?, data: decoder.decode()? })
    }

    fn to_fragments(&self) -> gestalt::Result<Vec<String>> {
        Ok(vec![
            xml::to_string(&self.idx, "idx")?,
            xml::to_string(&self.name, "name")?,
            xml::to_string(&self.data, "data")?,
        ])
    }

    fn from_fragments(fragments: &[String]) -> gestalt::Result<Self> {
        Ok(Reading {
            idx: xml::from_str("idx", fragment(fragments, 0)?)?,
            name: xml::from_str("name", fragment(fragments, 1)?)?,
            data: xml::from_str("data", fragment(fragments, 2)?)?,
        })
    }
}

aggregate!(Reading);

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with_target(false)
        .init();

    let options = Options::new().trace(true);
    let dir = tempfile::tempdir().context("Failed to create a scratch directory")?;
    let reading = Reading { idx: 1, name: "MyName".to_string(), data: vec![4.1, 5.2, 6.3] };

    let path = dir.path().join("reading.bin");
    binary::save_with_options(&reading, &path, options).context("Failed to write binary file")?;
    let decoded: Reading = binary::load_with_options(&path, options).context("Failed to read binary file")?;
    ensure!(reading == decoded, "decoded {:?}, expected {:?}", decoded, reading);
    info!(path = %path.display(), "binary round-trip");

    let path = dir.path().join("reading.xml.b64");
    xml::save_armored_with_options(&reading, "reading", &path, options).context("Failed to write armored file")?;
    let decoded: Reading = xml::load_armored_with_options("reading", &path, options).context("Failed to read armored file")?;
    ensure!(reading == decoded, "decoded {:?}, expected {:?}", decoded, reading);
    info!(path = %path.display(), "armored round-trip");

    println!("{}", xml::to_armored_string(&reading, "reading", options)?);
    Ok(())
}
