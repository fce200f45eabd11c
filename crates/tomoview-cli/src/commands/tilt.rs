use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use clap::Args;
use tomoview_core::data_source::DataSourceKind;
use tomoview_core::io::tilt::{read_tilt_angles, write_tilt_angles};
use tomoview_core::operator::{Operator, SetTiltAnglesOperator};
use tomoview_core::tilt::angles_from_range;
use tracing::info;

#[derive(Args)]
pub struct TiltArgs {
    /// Dataset descriptor (TOML)
    pub descriptor: PathBuf,

    /// Fill the angles evenly from START to END (inclusive)
    #[arg(long, num_args = 2, value_names = ["START", "END"], allow_negative_numbers = true, conflicts_with = "file")]
    pub range: Option<Vec<f64>>,

    /// Read the angles from a .tlt/.rawtlt file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Write the current angles to a tilt file
    #[arg(short, long)]
    pub export: Option<PathBuf>,

    /// Treat the dataset as a tilt series if it is a volume
    #[arg(long)]
    pub mark_tilt_series: bool,
}

pub fn run(args: &TiltArgs) -> Result<()> {
    let (mut descriptor, source) = super::load(&args.descriptor)?;

    if source.kind() != DataSourceKind::TiltSeries {
        if !args.mark_tilt_series {
            bail!(
                "{} is not a tilt series (pass --mark-tilt-series to convert it)",
                source.name()
            );
        }
        source.set_kind(DataSourceKind::TiltSeries);
    }

    let count = source.projection_count();
    let angles = match (&args.range, &args.file) {
        (Some(range), _) => Some(angles_from_range(range[0], range[1], count)),
        (None, Some(file)) => Some(
            read_tilt_angles(file)
                .with_context(|| format!("Failed to read tilt angles from {}", file.display()))?,
        ),
        (None, None) => None,
    };

    let changed = angles.is_some() || args.mark_tilt_series;
    if let Some(angles) = angles {
        if angles.len() != count {
            bail!(
                "Got {} tilt angles but the series has {count} projections",
                angles.len()
            );
        }
        let op = Rc::new(SetTiltAnglesOperator::new(angles));
        source.add_operator(Operator::SetTiltAngles(op));
        info!(count, "tilt angles set");
    }

    if changed {
        descriptor.update_from(&source);
        descriptor
            .save(&args.descriptor)
            .with_context(|| format!("Failed to write {}", args.descriptor.display()))?;
    }

    if let Some(export) = &args.export {
        write_tilt_angles(export, &source.tilt_angles())
            .with_context(|| format!("Failed to write {}", export.display()))?;
        println!("Wrote {count} tilt angles to {}", export.display());
    }

    for (i, angle) in source.tilt_angles().iter().enumerate() {
        println!("{i:>4}  {angle}");
    }
    Ok(())
}
