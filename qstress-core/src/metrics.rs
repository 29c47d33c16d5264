#[derive(Copy, Clone, Debug)]
pub struct QueryLabels {
    pub success: &'static str,
    pub error: &'static str,
    pub latency: &'static str,
}

/// Metric names recorded for every query attempt.
pub const QUERY_LABELS: QueryLabels = QueryLabels {
    success: "qstress_query_success",
    error: "qstress_query_error",
    latency: "qstress_query_latency",
};
