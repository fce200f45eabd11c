use console::Style;
use tomoview_core::adapter::DataInformation;
use tomoview_core::data_source::{DataSource, DataSourceKind};
use tomoview_core::geometry::{self, Axis};
use tomoview_core::tilt::uniform_step;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    kind: Style,
    disabled: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            kind: Style::new().green(),
            disabled: Style::new().dim().yellow(),
        }
    }
}

pub fn print_dataset_summary(source: &DataSource, info: Option<&DataInformation>) {
    let s = Styles::new();
    let dims = source.dimensions();

    println!();
    println!("  {}", s.title.apply_to(source.name()));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(source.name().chars().count().max(8))));
    println!();

    println!("  {:<14}{}", s.label.apply_to("Kind"), s.kind.apply_to(source.kind()));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Dimensions"),
        s.value.apply_to(format!("{} x {} x {}", dims[0], dims[1], dims[2]))
    );
    println!();

    // Units and Size
    println!("  {}", s.header.apply_to("Units and Size"));
    let lengths = geometry::axis_lengths(&source.extent(), &source.spacing());
    for axis in Axis::ALL {
        let i = axis.index();
        println!(
            "    {:<12}{} {}  {}",
            s.label.apply_to(format!("{axis} Length")),
            s.value.apply_to(lengths[i]),
            source.units(axis),
            s.label.apply_to(format!("(spacing {})", source.spacing()[i]))
        );
    }
    println!();

    if let Some(info) = info {
        println!("  {}", s.header.apply_to("Original Data"));
        println!(
            "    {:<12}{}",
            s.label.apply_to("Voxels"),
            s.value.apply_to(info.voxel_count())
        );
        println!(
            "    {:<12}{}",
            s.label.apply_to("Memory"),
            s.value.apply_to(format!("{:.1} MiB", info.memory_mib()))
        );
        match info.scalar_range {
            Some((lo, hi)) => println!(
                "    {:<12}{}",
                s.label.apply_to("Range"),
                s.value.apply_to(format!("[{lo:.4}, {hi:.4}]"))
            ),
            None => println!(
                "    {:<12}{}",
                s.label.apply_to("Range"),
                s.disabled.apply_to("no voxel data")
            ),
        }
        println!();
    }

    if source.kind() == DataSourceKind::TiltSeries {
        let angles = source.tilt_angles();
        println!("  {}", s.header.apply_to("Tilt Angles"));
        if let (Some(first), Some(last)) = (angles.first(), angles.last()) {
            let step = match uniform_step(&angles) {
                Some(step) => format!("step {step}"),
                None => "non-uniform".to_string(),
            };
            println!(
                "    {:<12}{}",
                s.label.apply_to("Range"),
                s.value.apply_to(format!("{first} .. {last} ({step})"))
            );
        }
        for (i, angle) in angles.iter().enumerate() {
            println!("    {:<12}{}", s.label.apply_to(i), angle);
        }
        println!();
    }

    let operators = source.operators();
    if !operators.is_empty() {
        println!("  {}", s.header.apply_to("Operators"));
        for op in &operators {
            println!("    {}", s.kind.apply_to(op));
        }
        println!();
    }
}
