use crate::core::report;
use crate::core::{Analysis, Pipeline};
use crate::utils::error::Result;
use std::io::Write;

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub analysis: Analysis,
    pub artifacts: Vec<String>,
}

pub struct CeaEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> CeaEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Prints to stdout without holding its lock across awaits; the future is `Send`.
    pub async fn run(&self) -> Result<RunOutcome> {
        self.run_with_writer(&mut std::io::stdout(), true).await
    }

    /// Evaluates and prints without writing any artifact.
    pub async fn preview(&self) -> Result<RunOutcome> {
        self.run_with_writer(&mut std::io::stdout(), false).await
    }

    pub async fn run_with_writer<W: Write + Send>(
        &self,
        out: &mut W,
        load: bool,
    ) -> Result<RunOutcome> {
        tracing::info!("Starting cost-effectiveness analysis");

        let analysis = self.pipeline.evaluate().await?;
        tracing::info!(
            icer = analysis.comparison.icer,
            delta_cost = analysis.comparison.delta_cost,
            delta_qaly = analysis.comparison.delta_qaly,
            "Comparison complete"
        );

        let result = self.pipeline.report(&analysis).await?;
        writeln!(out, "{}", result.text)?;
        writeln!(out)?;
        writeln!(out, "{}", report::render_table(&result.table))?;
        writeln!(out)?;
        writeln!(out, "{}", result.decision_text)?;

        let artifacts = if load {
            let written = self.pipeline.load(result).await?;
            for path in &written {
                tracing::info!("📁 Output saved to: {}", path);
            }
            written
        } else {
            tracing::info!("🔍 Dry run, no artifacts written");
            Vec::new()
        };

        Ok(RunOutcome {
            analysis,
            artifacts,
        })
    }
}
