//! Chart configuration as exchanged with the outer layer (CLI flags, query strings, JSON), and
//! its validation into an [`AnalysisConfig`].

use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisConfig, DateAgg};
use crate::container::DataContainer;
use crate::error::{ExplorerError, ExplorerResult};
use crate::processing::ReduceOp;
use crate::types::{Cell, ColumnType, Row};

/// A column given by header index or by header name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnRef {
    Index(usize),
    Name(String),
}

impl ColumnRef {
    /// Resolve against the header.
    ///
    /// A name that matches no header but parses as an in-range index is accepted as that index
    /// (query strings carry indices as text).
    pub fn resolve(&self, container: &DataContainer) -> ExplorerResult<usize> {
        let found = match self {
            ColumnRef::Index(i) => Some(*i).filter(|i| *i < container.column_count()),
            ColumnRef::Name(name) => container.index_of(name).or_else(|| {
                name.trim()
                    .parse::<usize>()
                    .ok()
                    .filter(|i| *i < container.column_count())
            }),
        };
        found.ok_or_else(|| ExplorerError::UnknownColumn {
            column: self.to_string(),
            available: container.header().to_vec(),
        })
    }
}

impl std::fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnRef::Index(i) => write!(f, "{i}"),
            ColumnRef::Name(name) => f.write_str(name),
        }
    }
}

impl From<usize> for ColumnRef {
    fn from(i: usize) -> Self {
        ColumnRef::Index(i)
    }
}

impl From<&str> for ColumnRef {
    fn from(name: &str) -> Self {
        ColumnRef::Name(name.to_string())
    }
}

/// User-facing chart configuration. Every field is optional.
///
/// ```
/// use data_explorer::config::ChartConfig;
///
/// let config: ChartConfig =
///     serde_json::from_str(r#"{"x": "city", "y": 2, "yAgg": "Mean"}"#).unwrap();
/// assert_eq!(config.y_agg.as_deref(), Some("Mean"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<ColumnRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<ColumnRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facet: Option<ColumnRef>,
    /// Aggregate name, case-insensitive (`"mean"`, `"P95"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_agg: Option<String>,
    /// Date granularity name, case-insensitive (`"year"`, `"month"`, `"day"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_agg: Option<String>,
}

impl ChartConfig {
    /// Validate against `container` and produce an [`AnalysisConfig`].
    ///
    /// # Errors
    ///
    /// - [`ExplorerError::UnknownColumn`] for a column that is not in the header
    /// - [`ExplorerError::InvalidOption`] for an unknown aggregate or granularity
    /// - [`ExplorerError::MissingXAxis`] when a Y axis or aggregate is given without X
    /// - [`ExplorerError::NonNumericY`] when Y is not `num` and the aggregate is not `count`
    pub fn resolve(&self, container: &DataContainer) -> ExplorerResult<AnalysisConfig> {
        let resolve = |c: &Option<ColumnRef>| c.as_ref().map(|c| c.resolve(container)).transpose();
        let x = resolve(&self.x)?;
        let y = resolve(&self.y)?;
        let facet = resolve(&self.facet)?;
        let y_agg = self
            .y_agg
            .as_deref()
            .map(str::parse::<ReduceOp>)
            .transpose()?;
        let date_agg = self
            .date_agg
            .as_deref()
            .map(str::parse::<DateAgg>)
            .transpose()?;

        if x.is_none() && (y.is_some() || y_agg.is_some()) {
            return Err(ExplorerError::MissingXAxis);
        }
        if let Some(y) = y {
            let numeric = container.column_type(y) == Some(ColumnType::Num);
            if !numeric && y_agg.unwrap_or_default() != ReduceOp::Count {
                return Err(ExplorerError::NonNumericY {
                    column: container.header()[y].clone(),
                });
            }
        }

        Ok(AnalysisConfig {
            x,
            y,
            y_agg,
            date_agg,
            facet,
        })
    }
}

/// Payload handed to the browser: the chart configuration, the source file name, and the
/// row matrix with the header row first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataResponse {
    pub chart_config: ChartConfig,
    pub file: Option<String>,
    pub data: Vec<Row>,
}

impl DataResponse {
    pub fn from_container(
        container: &DataContainer,
        chart_config: ChartConfig,
        file: Option<String>,
    ) -> Self {
        let header: Row = container.header().iter().map(|h| Cell::from(h.as_str())).collect();
        let mut data = Vec::with_capacity(container.row_count() + 1);
        data.push(header);
        data.extend(container.rows().iter().cloned());
        Self {
            chart_config,
            file,
            data,
        }
    }

    pub fn to_json(&self) -> ExplorerResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container() -> DataContainer {
        DataContainer::from_parts(
            vec!["city".to_string(), "sales".to_string(), "when".to_string()],
            vec![
                vec![Cell::from("Oslo"), Cell::Num(3.0), Cell::from("2020-01-01")],
                vec![Cell::from("Lima"), Cell::Num(4.0), Cell::from("2020-02-01")],
            ],
        )
    }

    #[test]
    fn resolves_names_and_indices() {
        let dc = container();
        let config = ChartConfig {
            x: Some("city".into()),
            y: Some(1.into()),
            facet: Some(ColumnRef::Name("2".to_string())),
            y_agg: Some("MEAN".to_string()),
            date_agg: Some("month".to_string()),
        };
        let resolved = config.resolve(&dc).unwrap();
        assert_eq!(
            resolved,
            AnalysisConfig {
                x: Some(0),
                y: Some(1),
                y_agg: Some(ReduceOp::Mean),
                date_agg: Some(DateAgg::Month),
                facet: Some(2),
            }
        );
    }

    #[test]
    fn empty_config_resolves_to_nothing() {
        let resolved = ChartConfig::default().resolve(&container()).unwrap();
        assert_eq!(resolved, AnalysisConfig::default());
    }

    #[test]
    fn rejects_unknown_columns() {
        let config = ChartConfig {
            x: Some("country".into()),
            ..Default::default()
        };
        let err = config.resolve(&container()).unwrap_err();
        match err {
            ExplorerError::UnknownColumn { column, available } => {
                assert_eq!(column, "country");
                assert_eq!(available, vec!["city", "sales", "when"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        let config = ChartConfig {
            x: Some(3.into()),
            ..Default::default()
        };
        assert!(config.resolve(&container()).is_err());
    }

    #[test]
    fn y_requires_x() {
        let config = ChartConfig {
            y: Some("sales".into()),
            ..Default::default()
        };
        assert!(matches!(
            config.resolve(&container()),
            Err(ExplorerError::MissingXAxis)
        ));
    }

    #[test]
    fn text_y_only_allows_count() {
        let mut config = ChartConfig {
            x: Some("when".into()),
            y: Some("city".into()),
            y_agg: Some("sum".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.resolve(&container()),
            Err(ExplorerError::NonNumericY { .. })
        ));
        config.y_agg = Some("count".to_string());
        assert!(config.resolve(&container()).is_ok());
    }

    #[test]
    fn rejects_unknown_aggregate() {
        let config = ChartConfig {
            x: Some(0.into()),
            y: Some(1.into()),
            y_agg: Some("mode".to_string()),
            ..Default::default()
        };
        let err = config.resolve(&container()).unwrap_err();
        assert_eq!(err.to_string(), "invalid value 'mode' for aggregate");
    }

    #[test]
    fn response_puts_header_first() {
        let dc = container();
        let config = ChartConfig {
            x: Some(0.into()),
            ..Default::default()
        };
        let response = DataResponse::from_container(&dc, config, Some("sales.csv".to_string()));
        assert_eq!(response.data.len(), 3);
        let json = response.to_json().unwrap();
        let expected = concat!(
            r#"{"chartConfig":{"x":0},"file":"sales.csv","#,
            r#""data":[["city","sales","when"],["Oslo",3.0,"2020-01-01"]"#,
        );
        assert!(json.starts_with(expected), "{json}");
    }
}
