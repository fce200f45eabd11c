use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tomoview_core::adapter::{DataPort, PipelineServer};

use crate::summary::print_dataset_summary;

#[derive(Args)]
pub struct InfoArgs {
    /// Dataset descriptor (TOML)
    pub descriptor: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let (_, source) = super::load(&args.descriptor)?;

    let server = PipelineServer::new();
    let adapter = server.create_adapter(&source, DataPort::Original);
    let info = adapter.information();

    print_dataset_summary(&source, info.as_ref());
    Ok(())
}
