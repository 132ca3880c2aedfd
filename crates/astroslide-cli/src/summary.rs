use std::path::Path;

use astroslide_core::pipeline::{EnhanceConfig, EnhanceRequest, OutputFormat};
use astroslide_core::presets::PresetDescriptor;
use console::Style;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

fn print_title(s: &Styles, title: &str) {
    println!();
    println!("  {}", s.title.apply_to(title));
    println!(
        "  {}",
        s.title.apply_to("\u{2550}".repeat(title.chars().count()))
    );
    println!();
}

pub fn print_presets(presets: &[PresetDescriptor]) {
    let s = Styles::new();
    print_title(&s, "Presets");

    for preset in presets {
        println!(
            "  {:<22}{}",
            s.method.apply_to(preset.id),
            s.value.apply_to(preset.name)
        );
        println!("  {:<22}{}", "", preset.description);
        println!(
            "  {:<22}{} {}",
            "",
            s.label.apply_to("Best for"),
            preset.best_for
        );
        println!();
    }
}

pub fn print_enhance_summary(config: &EnhanceConfig, request: &EnhanceRequest, format: OutputFormat) {
    let s = Styles::new();
    print_title(&s, "AstroSlide Enhance");

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(config.input.display())
    );
    println!(
        "  {:<14}{} {}",
        s.label.apply_to("Output"),
        s.path.apply_to(config.output.display()),
        s.label.apply_to(format!("({})", format.name()))
    );
    println!();

    print_request(&s, request);
    println!();
}

pub fn print_batch_summary(request: &EnhanceRequest, jobs: usize, workers: usize, dir: &Path) {
    let s = Styles::new();
    print_title(&s, "AstroSlide Batch");

    println!(
        "  {:<14}{}",
        s.label.apply_to("Images"),
        s.value.apply_to(jobs)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Workers"),
        s.value.apply_to(workers.max(1))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(dir.display())
    );
    println!();

    print_request(&s, request);
    println!();
}

fn print_request(s: &Styles, request: &EnhanceRequest) {
    println!("  {}", s.header.apply_to("Enhancement"));
    println!(
        "    {:<12}{} {}",
        s.label.apply_to("Preset"),
        s.method.apply_to(request.preset.id()),
        s.label.apply_to(format!("({})", request.preset.name()))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Intensity"),
        s.value.apply_to(format!("{:.0}%", request.intensity * 100.0))
    );
    if request.star_spikes {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Spikes"),
            s.value.apply_to("on")
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Spikes"),
            s.disabled.apply_to("off")
        );
    }
}
