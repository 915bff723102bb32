//! Result payloads returned by the query service.
//!
//! Aggregates come back from SQL, so numbers may be null, strings or
//! floats where an integer is expected. The deserializers in `lenient`
//! absorb that instead of failing the whole batch.

use serde::{Deserialize, Serialize};

/// Compliance status derived from the variance against target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RagStatus {
    Green,
    Amber,
    Red,
    #[default]
    #[serde(other)]
    Unknown,
}

impl RagStatus {
    /// `>= 0` is green, `>= -2` amber, anything lower red.
    pub fn from_variance(variance: Option<f64>) -> Self {
        match variance {
            None => RagStatus::Unknown,
            Some(v) if v >= 0.0 => RagStatus::Green,
            Some(v) if v >= -2.0 => RagStatus::Amber,
            Some(_) => RagStatus::Red,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RagStatus::Green => "Green",
            RagStatus::Amber => "Amber",
            RagStatus::Red => "Red",
            RagStatus::Unknown => "-",
        }
    }
}

pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn number(v: &Value) -> Option<f64> {
        match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(number))
    }

    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        Ok(Option::<Value>::deserialize(d)?
            .as_ref()
            .and_then(number)
            .map_or(0, |n| n.max(0.0).round() as u64))
    }

    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(Option::<Value>::deserialize(d)?
            .as_ref()
            .and_then(number)
            .is_some_and(|n| n != 0.0))
    }

    fn text(v: &Value) -> Option<String> {
        match v {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(Option::<Value>::deserialize(d)?
            .as_ref()
            .and_then(text)
            .filter(|s| !s.is_empty()))
    }

    pub fn labels<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(Option::<Vec<Value>>::deserialize(d)?
            .unwrap_or_default()
            .iter()
            .map(|v| text(v).unwrap_or_else(|| "Not Set".to_string()))
            .collect())
    }

    pub fn values<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<f64>, D::Error> {
        Ok(Option::<Vec<Value>>::deserialize(d)?
            .unwrap_or_default()
            .iter()
            .map(|v| number(v).unwrap_or(0.0))
            .collect())
    }

    pub fn counts<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u64>, D::Error> {
        Ok(Option::<Vec<Value>>::deserialize(d)?
            .unwrap_or_default()
            .iter()
            .map(|v| number(v).map_or(0, |n| n.max(0.0).round() as u64))
            .collect())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Kpis {
    #[serde(deserialize_with = "lenient::count")]
    pub total_employees: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub saudi_employees: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub non_saudi_employees: u64,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub saudization_percent: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub avg_salary_saudi: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub avg_salary_non_saudi: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub avg_tenure_years_saudi: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub avg_tenure_years_non_saudi: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub target_percent: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub variance_percent: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub name: String,
    #[serde(deserialize_with = "lenient::values")]
    pub values: Vec<f64>,
}

/// Chart-ready series: one label per point, one dataset per series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartData {
    #[serde(deserialize_with = "lenient::labels")]
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// `(label, value)` pairs of the first dataset.
    pub fn first_series(&self) -> Vec<(&str, f64)> {
        let values = self.datasets.first().map(|d| d.values.as_slice()).unwrap_or(&[]);
        self.labels
            .iter()
            .zip(values.iter().copied().chain(std::iter::repeat(0.0)))
            .map(|(l, v)| (l.as_str(), v))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActualVsTarget {
    #[serde(flatten)]
    pub chart: ChartData,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub variance_percent: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelValue {
    #[serde(deserialize_with = "lenient::opt_text")]
    pub label: Option<String>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub value: Option<f64>,
}

/// One row of a headcount breakdown (by branch, department, designation
/// or company; the name column is folded into `label`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakdownRow {
    #[serde(
        alias = "branch",
        alias = "department",
        alias = "designation",
        alias = "company",
        deserialize_with = "lenient::opt_text"
    )]
    pub label: Option<String>,
    #[serde(deserialize_with = "lenient::count")]
    pub total_employees: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub saudi_employees: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub non_saudi_employees: u64,
    #[serde(alias = "actual_percent", deserialize_with = "lenient::opt_f64")]
    pub saudization_percent: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub target_percent: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub variance_percent: Option<f64>,
    pub status: RagStatus,
}

impl BreakdownRow {
    pub fn name(&self) -> &str {
        self.label.as_deref().unwrap_or("-")
    }

    /// Reported status, or one derived from the variance when absent.
    pub fn status(&self) -> RagStatus {
        match self.status {
            RagStatus::Unknown => RagStatus::from_variance(self.variance_percent),
            s => s,
        }
    }
}

/// Headcount snapshot of a scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    #[serde(deserialize_with = "lenient::count")]
    pub total_employees: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub saudi_employees: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub non_saudi_employees: u64,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub saudization_percent: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub target_percent: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub variance_percent: Option<f64>,
    pub status: RagStatus,
    #[serde(alias = "mom_change_percent", deserialize_with = "lenient::opt_f64")]
    pub mom_change: Option<f64>,
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

impl Snapshot {
    pub fn status(&self) -> RagStatus {
        match self.status {
            RagStatus::Unknown => RagStatus::from_variance(self.variance_percent),
            s => s,
        }
    }

    /// Sum of disjoint breakdown rows against one target.
    pub fn from_rows(rows: &[BreakdownRow], target_percent: Option<f64>) -> Self {
        let total: u64 = rows.iter().map(|r| r.total_employees).sum();
        let saudi: u64 = rows.iter().map(|r| r.saudi_employees).sum();
        let non_saudi: u64 = rows.iter().map(|r| r.non_saudi_employees).sum();
        let percent = (total > 0).then(|| round1(100.0 * saudi as f64 / total as f64));
        let variance = match (percent, target_percent) {
            (Some(p), Some(t)) => Some(round1(p - t)),
            _ => None,
        };
        Self {
            total_employees: total,
            saudi_employees: saudi,
            non_saudi_employees: non_saudi,
            saudization_percent: percent,
            target_percent,
            variance_percent: variance,
            status: RagStatus::from_variance(variance),
            mom_change: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixRow {
    #[serde(deserialize_with = "lenient::opt_text")]
    pub department: Option<String>,
    #[serde(deserialize_with = "lenient::opt_text")]
    pub designation: Option<String>,
    #[serde(deserialize_with = "lenient::count")]
    pub headcount: u64,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub saudization_percent: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub target_percent: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub variance_percent: Option<f64>,
}

/// The matrix arrives either as a bare list or wrapped in `{rows: [...]}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MatrixShape {
    List(Vec<MatrixRow>),
    Wrapped {
        #[serde(default)]
        rows: Vec<MatrixRow>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "MatrixShape")]
pub struct Matrix {
    pub rows: Vec<MatrixRow>,
}

impl From<MatrixShape> for Matrix {
    fn from(shape: MatrixShape) -> Self {
        match shape {
            MatrixShape::List(rows) | MatrixShape::Wrapped { rows } => Self { rows },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyDrilldown {
    pub company: String,
    pub as_on_date: String,
    #[serde(deserialize_with = "lenient::opt_text")]
    pub branch: Option<String>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub target_percent: Option<f64>,
    pub overall: Option<Snapshot>,
    pub branches: Vec<BreakdownRow>,
    pub departments: Vec<BreakdownRow>,
}

impl CompanyDrilldown {
    /// Reported overall snapshot, or the sum of the branch rows.
    ///
    /// Branch rows exclude employees without a branch, so the derived
    /// figure may undercount.
    pub fn overall(&self) -> Snapshot {
        self.overall
            .clone()
            .unwrap_or_else(|| Snapshot::from_rows(&self.branches, self.target_percent))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignationBreakdown {
    pub company: String,
    pub department: String,
    #[serde(deserialize_with = "lenient::opt_text")]
    pub branch: Option<String>,
    pub as_on_date: String,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub target_percent: Option<f64>,
    pub designations: Vec<BreakdownRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskyPositions {
    pub company: String,
    #[serde(deserialize_with = "lenient::opt_text")]
    pub branch: Option<String>,
    pub as_on_date: String,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub target_percent: Option<f64>,
    pub items: Vec<BreakdownRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeeRow {
    pub employee: String,
    #[serde(deserialize_with = "lenient::opt_text")]
    pub employee_name: Option<String>,
    #[serde(deserialize_with = "lenient::opt_text")]
    pub employee_number: Option<String>,
    #[serde(deserialize_with = "lenient::opt_text")]
    pub branch: Option<String>,
    #[serde(deserialize_with = "lenient::opt_text")]
    pub department: Option<String>,
    #[serde(deserialize_with = "lenient::opt_text")]
    pub designation: Option<String>,
    #[serde(deserialize_with = "lenient::flag")]
    pub is_saudi: bool,
    #[serde(deserialize_with = "lenient::opt_text")]
    pub nationality: Option<String>,
    #[serde(deserialize_with = "lenient::opt_text")]
    pub nationality_group: Option<String>,
    #[serde(deserialize_with = "lenient::opt_text")]
    pub date_of_joining: Option<String>,
}

impl EmployeeRow {
    pub fn type_label(&self) -> &'static str {
        if self.is_saudi {
            "Saudi"
        } else {
            "Non-Saudi"
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeePage {
    #[serde(deserialize_with = "lenient::count")]
    pub total: u64,
    pub rows: Vec<EmployeeRow>,
}

/// Actual vs target per label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonSeries {
    #[serde(deserialize_with = "lenient::labels")]
    pub labels: Vec<String>,
    #[serde(deserialize_with = "lenient::values")]
    pub actual_values: Vec<f64>,
    #[serde(deserialize_with = "lenient::values")]
    pub target_values: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldingComparison {
    pub rows: Vec<BreakdownRow>,
    pub chart: ComparisonSeries,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldingRisk {
    #[serde(deserialize_with = "lenient::labels")]
    pub labels: Vec<String>,
    #[serde(deserialize_with = "lenient::values")]
    pub variance_values: Vec<f64>,
    pub rows: Vec<BreakdownRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutiveScorecard {
    pub overall: Snapshot,
    pub trend: ComparisonSeries,
    pub holding: HoldingRisk,
}

impl ExecutiveScorecard {
    /// Company with the lowest variance. Rows arrive sorted risk-first.
    pub fn highest_risk(&self) -> Option<&str> {
        self.holding
            .rows
            .iter()
            .filter(|r| r.variance_percent.is_some())
            .min_by(|a, b| {
                a.variance_percent
                    .partial_cmp(&b.variance_percent)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .or_else(|| self.holding.rows.first())
            .and_then(|r| r.label.as_deref())
    }
}

/// Month-end series for the selected scope, oldest month first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendOverall {
    #[serde(deserialize_with = "lenient::labels")]
    pub labels: Vec<String>,
    #[serde(alias = "actual_percent_values", deserialize_with = "lenient::values")]
    pub actual_values: Vec<f64>,
    #[serde(alias = "target_percent_values", deserialize_with = "lenient::values")]
    pub target_values: Vec<f64>,
    #[serde(deserialize_with = "lenient::counts")]
    pub saudi_counts: Vec<u64>,
    #[serde(deserialize_with = "lenient::counts")]
    pub non_saudi_counts: Vec<u64>,
}

/// One month of [`TrendOverall`], with missing trailing values as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint<'a> {
    pub label: &'a str,
    pub actual: f64,
    pub target: f64,
    pub saudi: u64,
    pub non_saudi: u64,
}

impl TrendOverall {
    pub fn points(&self) -> Vec<TrendPoint<'_>> {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, label)| TrendPoint {
                label,
                actual: self.actual_values.get(i).copied().unwrap_or(0.0),
                target: self.target_values.get(i).copied().unwrap_or(0.0),
                saudi: self.saudi_counts.get(i).copied().unwrap_or(0),
                non_saudi: self.non_saudi_counts.get(i).copied().unwrap_or(0),
            })
            .collect()
    }

    pub fn latest(&self) -> Option<TrendPoint<'_>> {
        self.points().pop()
    }

    /// Change in actual percent between the first and last month.
    pub fn drift(&self) -> Option<f64> {
        match (self.actual_values.first(), self.actual_values.last()) {
            (Some(first), Some(last)) if self.actual_values.len() > 1 => Some(last - first),
            _ => None,
        }
    }
}

/// Saudization trend payload. `branch_level` carries one dataset per
/// branch and is only filled when a company is in scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendData {
    pub overall: TrendOverall,
    pub branch_level: ChartData,
}

/// Reference to a generated export file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportReceipt {
    #[serde(default)]
    pub file_url: Option<String>,
}
