use std::fmt::Write as _;
use std::net::IpAddr;

use clap::{Parser, Subcommand};

use crate::core::{
    DashboardView, Dataset, LookupError, Metric, default_dataset, format_currency, format_decimal,
    format_percentage,
};

#[derive(Parser, Debug)]
#[command(
    name = "launch-effort",
    about = "Preco de lancamento vs salario minimo (esforco, variacao percentual, projecao por CAGR)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(about = "Serve o dashboard e sua API JSON")]
    Serve {
        #[arg(long, default_value = "0.0.0.0", help = "Endereco de escuta")]
        host: IpAddr,
        #[arg(long, default_value_t = 8080, help = "Porta de escuta")]
        port: u16,
    },
    #[command(about = "Imprime os indicadores do dashboard para os dados padrao")]
    Report {
        #[arg(long, help = "Ano base, por padrao o primeiro da serie")]
        base: Option<String>,
        #[arg(long, help = "Ano comparado, por padrao o ultimo da serie")]
        compare: Option<String>,
        #[arg(
            long,
            default_value_t = 1,
            help = "Casas decimais para esforco e percentuais"
        )]
        decimals: usize,
    },
}

pub fn build_report(
    dataset: &Dataset,
    base: Option<&str>,
    compare: Option<&str>,
    decimals: usize,
) -> Result<String, LookupError> {
    let base = base.unwrap_or(&dataset.first().year_label);
    let compare = compare.unwrap_or(&dataset.last().year_label);
    let view = DashboardView::build(dataset, base, compare)?;
    Ok(render_report(&view, decimals))
}

pub fn render_report(view: &DashboardView, decimals: usize) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Esforco (salarios minimos por preco de lancamento)");
    for kpi in &view.kpis {
        let _ = write!(
            out,
            "  {:<8} {:<18} {} ({} / {})",
            kpi.tier.short_label(),
            kpi.year_label,
            format_decimal(kpi.effort, decimals),
            format_currency(kpi.price),
            format_currency(kpi.minimum_wage)
        );
        if let Some((trend, reference)) = kpi.trend.zip(kpi.reference_label.as_deref()) {
            let _ = write!(out, "  {}", trend.describe(reference, decimals));
        }
        out.push('\n');
    }

    let comparison = &view.comparison;
    let _ = writeln!(
        out,
        "\nVariacao {} -> {}",
        comparison.base_label, comparison.compare_label
    );
    for entry in &comparison.entries {
        let _ = writeln!(
            out,
            "  {:<20} {} -> {}  {}",
            entry.title,
            entry.base_display,
            entry.compare_display,
            format_percentage(entry.change, decimals)
        );
    }

    let projection = &view.projection.projection;
    let _ = writeln!(out, "\nCAGR e {}", projection.label);
    for metric in Metric::ALL {
        let _ = writeln!(
            out,
            "  {:<20} {:>8}  {}",
            metric.display_name(),
            format_percentage(projection.cagr[&metric], decimals),
            format_currency(projection.values[&metric])
        );
    }

    out
}

pub fn run_report(base: Option<&str>, compare: Option<&str>, decimals: usize) -> Result<String, String> {
    build_report(&default_dataset(), base, compare, decimals).map_err(|e| e.to_string())
}
