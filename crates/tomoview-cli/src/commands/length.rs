use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use tomoview_core::geometry::{self, Axis};
use tracing::info;

#[derive(Clone, Copy, ValueEnum)]
pub enum AxisArg {
    X,
    Y,
    Z,
}

impl From<AxisArg> for Axis {
    fn from(arg: AxisArg) -> Self {
        match arg {
            AxisArg::X => Axis::X,
            AxisArg::Y => Axis::Y,
            AxisArg::Z => Axis::Z,
        }
    }
}

#[derive(Args)]
pub struct SetLengthArgs {
    /// Dataset descriptor (TOML), rewritten in place
    pub descriptor: PathBuf,

    /// Axis whose length is set
    #[arg(short, long, value_enum)]
    pub axis: AxisArg,

    /// Physical length of the axis, in the dataset's units
    #[arg(short, long)]
    pub length: f64,

    /// Also set the units of every axis
    #[arg(short, long)]
    pub units: Option<String>,
}

pub fn run(args: &SetLengthArgs) -> Result<()> {
    if !args.length.is_finite() || args.length <= 0.0 {
        bail!("Length must be a positive number, got {}", args.length);
    }

    let (mut descriptor, source) = super::load(&args.descriptor)?;
    let axis = Axis::from(args.axis);

    let Some(spacing) =
        geometry::spacing_for_length(&source.extent(), &source.spacing(), axis, args.length)
    else {
        bail!("{} has no samples along {axis}", source.name());
    };
    source.set_spacing(spacing);
    if let Some(units) = &args.units {
        source.set_units(units);
    }
    info!(%axis, spacing = spacing[axis.index()], "spacing updated");

    descriptor.update_from(&source);
    descriptor
        .save(&args.descriptor)
        .with_context(|| format!("Failed to write {}", args.descriptor.display()))?;

    let lengths = geometry::axis_lengths(&source.extent(), &source.spacing());
    println!(
        "{axis} Length: {} {} (spacing {})",
        lengths[axis.index()],
        source.units(axis),
        spacing[axis.index()]
    );
    Ok(())
}
