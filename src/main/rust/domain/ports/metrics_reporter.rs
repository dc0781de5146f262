/// Port for metrics reporting
pub trait MetricsReporter: Send + Sync {
    fn report_pipeline_started(&self, camera: &str);
    fn report_pipeline_stopped(&self, camera: &str);
    fn report_transport_error(&self, camera: &str);
    fn report_active_pipelines(&self, count: usize);
}
