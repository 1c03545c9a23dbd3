//! Schema command - print the dataset format and the export columns

use clap::Args;
use findash::core::{DatasetInput, Period};
use findash::export::ExportPreset;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema or exports
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the dataset file
    JsonSchema,
    /// Columns of every CSV export
    Exports,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::Exports => self.print_exports(),
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(DatasetInput);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_exports(&self) -> anyhow::Result<()> {
        println!("CSV Export Formats");
        println!("==================");
        for preset in ExportPreset::ALL {
            println!();
            println!("{} ({})", preset.name(), preset.filename(Period::Month));
            for field in preset.columns() {
                println!("  {:28} {}", field.name, field.description);
            }
        }
        println!();
        println!("Chart exports are named faturas_diario.csv, faturas_semanal.csv or faturas_mensal.csv");
        Ok(())
    }
}
