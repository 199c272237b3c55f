use crate::domain::model::{
    Analysis, CeaReport, DiscountParameters, InterventionProfile, OutputSettings, PlaneSettings,
    WtpThreshold,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Inputs for one comparison. Intervention A is always the intervention
/// under evaluation and B the comparator.
pub trait ConfigProvider: Send + Sync {
    fn intervention_a(&self) -> &InterventionProfile;
    fn intervention_b(&self) -> &InterventionProfile;
    fn discount(&self) -> DiscountParameters;
    fn wtp(&self) -> WtpThreshold;
    fn plane(&self) -> PlaneSettings;
    fn output(&self) -> &OutputSettings;
    fn currency_symbol(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn evaluate(&self) -> Result<Analysis>;
    async fn report(&self, analysis: &Analysis) -> Result<CeaReport>;
    async fn load(&self, report: CeaReport) -> Result<Vec<String>>;
}
