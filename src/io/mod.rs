pub mod decoders;
pub mod walker;

pub use decoders::{
    Bzip2Decoder, DecoderRegistry, GzipDecoder, PlainTextDecoder, TextDecoder, TextReader,
};
pub use walker::{find, PathFinder};

use anyhow::Result;
use std::fs;
use std::path::Path;

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)?;
    Ok(())
}
