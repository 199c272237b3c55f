use crate::core::{calculator, plane, raster, report};
use crate::core::{Analysis, CeaReport, ConfigProvider, Pipeline, Storage};
use crate::utils::error::Result;

pub struct CeaPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> CeaPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CeaPipeline<S, C> {
    async fn evaluate(&self) -> Result<Analysis> {
        let discount = self.config.discount();
        tracing::debug!(
            rate = discount.rate,
            horizon_years = discount.horizon_years,
            discount_qalys = discount.discount_qalys,
            "Evaluating interventions"
        );

        calculator::analyse(
            self.config.intervention_a(),
            self.config.intervention_b(),
            &discount,
            self.config.wtp(),
        )
    }

    async fn report(&self, analysis: &Analysis) -> Result<CeaReport> {
        let output = self.config.output();
        let symbol = self.config.currency_symbol();

        let table = report::summary_table(analysis);
        let decision = report::decision_summary(analysis);

        let plane_png = if output.render_plane {
            let settings = self.config.plane();
            let geometry = plane::plane_geometry(&analysis.comparison, analysis.wtp, &settings);
            if !analysis.comparison.icer.is_finite() {
                tracing::warn!("ICER is infinite, drawing the ICER line along the cost axis");
            }
            Some(raster::render_png(&geometry, settings.width, settings.height)?)
        } else {
            tracing::debug!("Plane rendering disabled");
            None
        };

        Ok(CeaReport {
            text: report::text_summary(analysis, symbol),
            table,
            decision_text: report::decision_text(analysis, &decision, symbol),
            decision,
            plane_png,
        })
    }

    async fn load(&self, result: CeaReport) -> Result<Vec<String>> {
        let output = self.config.output();
        let mut written = Vec::new();

        if let Some(png) = &result.plane_png {
            self.storage.write_file(&output.plane_filename, png).await?;
            written.push(format!("{}/{}", output.output_path, output.plane_filename));
        }

        for format in &output.formats {
            let content = match format.as_str() {
                "csv" => report::table_to_delimited(&result.table, b',')?,
                "tsv" => report::table_to_delimited(&result.table, b'\t')?,
                "json" => report::table_to_json(&result.table)?,
                other => {
                    tracing::warn!("Skipping unsupported table format: {}", other);
                    continue;
                }
            };
            let filename = format!("{}.{}", output.table_basename, format);
            self.storage.write_file(&filename, content.as_bytes()).await?;
            written.push(format!("{}/{}", output.output_path, filename));
        }

        if output.export_decision {
            let content = report::decision_to_json(&result.decision)?;
            self.storage
                .write_file(&output.decision_filename, content.as_bytes())
                .await?;
            written.push(format!("{}/{}", output.output_path, output.decision_filename));
        }

        tracing::debug!("Wrote {} artifacts", written.len());
        Ok(written)
    }
}
