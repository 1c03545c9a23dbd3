//! Export command - write CSV files for the current filters

use clap::{Args, ValueEnum};
use findash::core::Dashboard;
use findash::export::{write_export, ExportPreset};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ExportCommand {
    /// What to export
    #[arg(value_enum)]
    preset: PresetArg,

    /// Directory the CSV files are written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Open each written file with the default application
    #[arg(long)]
    open: bool,

    /// Print the rows as JSON instead of writing files
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PresetArg {
    /// pagamentos.csv
    Payments,
    /// profissionais.csv
    Workers,
    /// lucros.csv
    Profits,
    /// faturas.csv
    Invoices,
    /// faturas_<period>.csv
    Chart,
    /// analytics_por_moeda.csv
    Analytics,
    /// relatorio_completo.csv
    FullReport,
    /// Every export above
    All,
}

impl PresetArg {
    fn presets(self) -> Vec<ExportPreset> {
        match self {
            PresetArg::Payments => vec![ExportPreset::Payments],
            PresetArg::Workers => vec![ExportPreset::Workers],
            PresetArg::Profits => vec![ExportPreset::Profits],
            PresetArg::Invoices => vec![ExportPreset::Invoices],
            PresetArg::Chart => vec![ExportPreset::Chart],
            PresetArg::Analytics => vec![ExportPreset::Analytics],
            PresetArg::FullReport => vec![ExportPreset::FullReport],
            PresetArg::All => ExportPreset::ALL.to_vec(),
        }
    }
}

impl ExportCommand {
    pub fn exec(&self, dashboard: &Dashboard) -> anyhow::Result<()> {
        let snapshot = dashboard.snapshot();
        let presets = self.preset.presets();

        if self.json {
            let mut output = serde_json::Map::new();
            for preset in presets {
                output.insert(preset.name().to_string(), preset.render_json(&snapshot)?);
            }
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        for preset in presets {
            match write_export(preset, &snapshot, &self.out_dir)? {
                Some(path) => {
                    println!("Wrote {}", path.display());
                    if self.open {
                        opener::open(&path)?;
                    }
                }
                None => println!("Skipped {}: no rows match the filters", preset.name()),
            }
        }
        Ok(())
    }
}
