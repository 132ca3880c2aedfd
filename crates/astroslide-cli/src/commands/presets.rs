use anyhow::Result;
use clap::Args;

#[derive(Args)]
pub struct PresetsArgs {
    /// Print identifiers only, one per line
    #[arg(long)]
    pub ids: bool,
}

pub fn run(args: &PresetsArgs) -> Result<()> {
    if args.ids {
        for id in astroslide_core::presets::preset_ids() {
            println!("{id}");
        }
        return Ok(());
    }
    crate::summary::print_presets(astroslide_core::presets::registry());
    Ok(())
}
